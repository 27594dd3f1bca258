use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;
use mygit::Repository;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives
const LOG_FILTER_VAR: &str = "MYGIT_LOG";

#[derive(Parser)]
#[command(
    name = "mygit",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A minimal version control system",
    long_about = "mygit keeps snapshots of a directory in a content-addressed object store. \
    It supports staging, commits, branches, checkouts and timestamp-based merges.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<PathBuf>,
    },
    #[command(
        name = "add",
        about = "Stage paths for the next commit",
        long_about = "This command stages files and directories. \
        Staged untracked paths are added by the next commit and staged missing paths are removed."
    )]
    Add {
        #[arg(index = 1, required = true, help = "The paths to stage")]
        paths: Vec<PathBuf>,
    },
    #[command(
        name = "reset",
        about = "Unstage paths and restore their committed content",
        long_about = "This command removes paths from the index and rewrites tracked paths from HEAD."
    )]
    Reset {
        #[arg(index = 1, required = true, help = "The paths to reset")]
        paths: Vec<PathBuf>,
    },
    #[command(
        name = "rm",
        about = "Remove paths from the working tree",
        long_about = "This command deletes paths and stages the removal of tracked ones."
    )]
    Rm {
        #[arg(index = 1, required = true, help = "The paths to remove")]
        paths: Vec<PathBuf>,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command creates a new commit in the repository with the specified commit message."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "checkout",
        about = "Switch to a branch or commit",
        long_about = "This command replaces the working tree with the given branch or commit. \
        Commits may be abbreviated to four or more hex characters."
    )]
    Checkout {
        #[arg(index = 1, help = "The branch name or commit hash")]
        revision: String,
    },
    #[command(
        name = "branch",
        about = "List, create, or delete branches",
        long_about = "This command manages branches. Without a subcommand it lists them."
    )]
    Branch {
        #[command(subcommand)]
        action: Option<BranchAction>,
    },
    #[command(
        name = "merge",
        about = "Merge a branch into the current one",
        long_about = "This command merges the given branch into the current branch. \
        Clashing files are resolved in favor of the most recently modified version."
    )]
    Merge {
        #[arg(index = 1, help = "The branch to merge")]
        branch: String,
    },
    #[command(
        name = "log",
        about = "Show commit history",
        long_about = "This command lists every commit reachable from HEAD, newest first."
    )]
    Log,
    #[command(
        name = "status",
        about = "Show the working tree status",
        long_about = "This command lists staged, deleted, modified and untracked paths."
    )]
    Status {
        #[arg(short, long, help = "Print two-letter status codes")]
        short: bool,
    },
    #[command(
        name = "clean",
        about = "Remove untracked files",
        long_about = "This command deletes every untracked path that is not staged."
    )]
    Clean,
    #[command(
        name = "head",
        about = "Show what HEAD points at",
        long_about = "This command prints the current branch, or the commit for a detached HEAD, \
        followed by the full hash HEAD resolves to."
    )]
    Head,
}

#[derive(Subcommand)]
enum BranchAction {
    #[command(name = "list", about = "List branches")]
    List,
    #[command(name = "create", about = "Create a branch at HEAD")]
    Create {
        #[arg(index = 1, help = "The branch name")]
        name: String,
    },
    #[command(name = "delete", about = "Delete a branch")]
    Delete {
        #[arg(index = 1, help = "The branch name")]
        name: String,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_FILTER_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn open_repository() -> Result<Repository> {
    let pwd = std::env::current_dir().context("Unable to read the current directory")?;
    Ok(Repository::open(pwd)?)
}

fn main() -> Result<()> {
    init_tracing();
    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { path } => {
            let path = match path {
                Some(path) => path.clone(),
                None => std::env::current_dir().context("Unable to read the current directory")?,
            };
            let repository = Repository::init(&path)?;

            println!(
                "Initialized empty mygit repository in {}",
                repository.marker_path().display()
            );
        }
        Commands::Add { paths } => open_repository()?.add(paths.as_slice())?,
        Commands::Reset { paths } => open_repository()?.reset(paths.as_slice())?,
        Commands::Rm { paths } => open_repository()?.rm(paths.as_slice())?,
        Commands::Commit { message } => {
            let repository = open_repository()?;
            let oid = repository.commit(message)?;

            println!("[{}] {}", oid.to_short_oid(), message.trim());
        }
        Commands::Checkout { revision } => {
            let head = open_repository()?.checkout(revision)?;
            println!("HEAD is now {head}");
        }
        Commands::Branch { action } => {
            let repository = open_repository()?;

            match action.as_ref().unwrap_or(&BranchAction::List) {
                BranchAction::List => {
                    let head = repository.head_status()?;
                    for branch in repository.list_branches()? {
                        if head.branch() == Some(&branch) {
                            println!("* {branch}");
                        } else {
                            println!("  {branch}");
                        }
                    }
                }
                BranchAction::Create { name } => {
                    let oid = repository.create_branch(name)?;
                    println!("Created branch {name} at {}", oid.to_short_oid());
                }
                BranchAction::Delete { name } => {
                    let oid = repository.delete_branch(name)?;
                    println!("Deleted branch {name} (was {})", oid.to_short_oid());
                }
            }
        }
        Commands::Merge { branch } => {
            let oid = open_repository()?.merge(branch)?;
            println!("Merge made commit {}", oid.to_short_oid());
        }
        Commands::Log => {
            for commit in open_repository()?.log()? {
                println!("{commit}");
            }
        }
        Commands::Status { short } => {
            let repository = open_repository()?;
            let statuses = repository.status()?;

            if *short {
                for (path, status) in &statuses {
                    println!("{} {}", status.short_code(), path.display());
                }
                return Ok(());
            }

            println!("HEAD is {}", repository.head_status()?);
            if statuses.is_empty() {
                println!("nothing to commit, working tree clean");
            }
            for (path, status) in &statuses {
                println!("{status}{}", path.display());
            }
        }
        Commands::Clean => {
            for path in open_repository()?.clean()? {
                println!("Removing {}", path.display());
            }
        }
        Commands::Head => {
            let repository = open_repository()?;
            let head = repository.head_status()?;

            println!("{head} ({})", repository.head_commit_id()?);
        }
    }

    Ok(())
}
