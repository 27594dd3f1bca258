use assert_fs::TempDir;
use common::command::{head_commit_id, init_repository_dir, run_mygit_command, stdout_of};
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
fn created_branches_point_at_head(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = init_repository_dir.path();
    let head = head_commit_id(root)?;

    run_mygit_command(root, &["branch", "create", "feature"])
        .assert()
        .success()
        .stdout(predicate::str::diff(format!("Created branch feature at {}\n", &head[..7])));

    assert_eq!(
        std::fs::read_to_string(root.join(".mygit/branches/feature"))?,
        format!("{head}\n")
    );
    // HEAD stays where it was
    assert_eq!(stdout_of(root, &["branch"])?, "  feature\n* master\n");

    Ok(())
}

#[rstest]
#[case::with_dots("release.1.0")]
#[case::with_dashes("fix-the-thing")]
#[case::with_underscores("topic_branch")]
fn valid_branch_names_are_accepted(
    init_repository_dir: TempDir,
    #[case] name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    run_mygit_command(init_repository_dir.path(), &["branch", "create", name])
        .assert()
        .success();

    Ok(())
}

#[rstest]
#[case::hidden(".hidden")]
#[case::slash("feature/x")]
#[case::double_dot("a..b")]
#[case::lock_suffix("topic.lock")]
#[case::reflog("a@{1}")]
#[case::space("has space")]
#[case::glob("star*")]
fn invalid_branch_names_are_rejected(
    init_repository_dir: TempDir,
    #[case] name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    run_mygit_command(init_repository_dir.path(), &["branch", "create", name])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid argument"));

    Ok(())
}

#[rstest]
fn duplicate_branches_are_rejected(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_mygit_command(init_repository_dir.path(), &["branch", "create", "master"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    Ok(())
}

#[rstest]
fn deleting_a_branch_reports_its_tip(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = init_repository_dir.path();
    let head = head_commit_id(root)?;
    run_mygit_command(root, &["branch", "create", "feature"])
        .assert()
        .success();

    run_mygit_command(root, &["branch", "delete", "feature"])
        .assert()
        .success()
        .stdout(predicate::str::diff(format!("Deleted branch feature (was {})\n", &head[..7])));

    assert_eq!(stdout_of(root, &["branch", "list"])?, "* master\n");

    Ok(())
}

#[rstest]
fn deleting_the_current_branch_fails(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_mygit_command(init_repository_dir.path(), &["branch", "delete", "master"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("checked out"));

    assert!(init_repository_dir.path().join(".mygit/branches/master").is_file());

    Ok(())
}

#[rstest]
fn deleting_an_unknown_branch_fails(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_mygit_command(init_repository_dir.path(), &["branch", "delete", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));

    Ok(())
}
