use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;
use std::time::Duration;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// A repository holding `1.txt`, `a/2.txt` and `a/b/3.txt` in one commit
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_mygit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("b").join("3.txt"),
        "three".to_string(),
    ));

    run_mygit_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();
    mygit_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

pub fn run_mygit_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("mygit").expect("Failed to find mygit binary");
    cmd.env_remove("MYGIT_LOG");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

fn generate_random_author() -> String {
    use fake::Fake;
    use fake::faker::name::en::Name;

    Name().fake::<String>().replace(' ', "_")
}

pub fn mygit_commit(dir: &Path, message: &str) -> Command {
    let mut cmd = run_mygit_command(dir, &["commit", "-m", message]);
    cmd.env("MYGIT_AUTHOR_NAME", generate_random_author());
    cmd
}

/// Standard output of a successful command
pub fn stdout_of(dir: &Path, args: &[&str]) -> Result<String, Box<dyn std::error::Error>> {
    let output = run_mygit_command(dir, args).assert().success();
    Ok(String::from_utf8(output.get_output().stdout.clone())?)
}

/// `status --short` output
pub fn short_status(dir: &Path) -> Result<String, Box<dyn std::error::Error>> {
    stdout_of(dir, &["status", "--short"])
}

/// Full hash HEAD resolves to, read from the repository files
pub fn head_commit_id(dir: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let marker_dir = dir.join(".mygit");
    let head = std::fs::read_to_string(marker_dir.join("HEAD"))?;
    let lines = head.lines().collect::<Vec<_>>();

    match lines.as_slice() {
        ["branch", name] => Ok(std::fs::read_to_string(marker_dir.join("branches").join(name))?
            .trim()
            .to_string()),
        ["commit", oid] => Ok(oid.to_string()),
        _ => Err(format!("unexpected HEAD content: {head:?}").into()),
    }
}

/// Commit timestamps have nanosecond resolution; keep consecutive commits apart
pub fn pause() {
    std::thread::sleep(Duration::from_millis(20));
}
