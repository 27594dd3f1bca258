use assert_fs::TempDir;
use common::command::{mygit_commit, pause, repository_dir, run_mygit_command, stdout_of};
use common::file::write_generated_files;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
fn log_lists_commits_newest_first(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = repository_dir.path();
    run_mygit_command(root, &["init"]).assert().success();

    let messages = ["First commit", "Second commit", "Third commit"];
    for message in messages {
        pause();
        write_generated_files(root, 1);
        run_mygit_command(root, &["add", "."]).assert().success();
        mygit_commit(root, message).assert().success();
    }

    let log = stdout_of(root, &["log"])?;
    let logged = log
        .lines()
        .filter_map(|line| line.strip_prefix("    "))
        .collect::<Vec<_>>();

    assert_eq!(
        logged,
        vec!["Third commit", "Second commit", "First commit", "initial commit"]
    );

    Ok(())
}

#[rstest]
fn log_entries_show_author_and_date(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = repository_dir.path();
    run_mygit_command(root, &["init"])
        .env("MYGIT_AUTHOR_NAME", "Grace_Hopper")
        .assert()
        .success();

    let log = stdout_of(root, &["log"])?;
    let lines = log.lines().collect::<Vec<_>>();

    assert!(lines[0].starts_with("commit "));
    assert_eq!(lines[1], "Author: Grace_Hopper");
    assert!(lines[2].starts_with("Date:   "));
    assert!(lines[2].ends_with("+0000"));

    Ok(())
}

#[rstest]
fn log_follows_head_after_checkout(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = repository_dir.path();
    run_mygit_command(root, &["init"]).assert().success();
    run_mygit_command(root, &["branch", "create", "feature"])
        .assert()
        .success();
    write_generated_files(root, 1);
    run_mygit_command(root, &["add", "."]).assert().success();
    mygit_commit(root, "master only").assert().success();

    run_mygit_command(root, &["checkout", "feature"])
        .assert()
        .success();

    let log = stdout_of(root, &["log"])?;
    assert!(!log.contains("master only"));
    assert_eq!(log.lines().filter(|l| l.starts_with("commit ")).count(), 1);

    Ok(())
}
