use assert_fs::TempDir;
use common::command::{
    init_repository_dir, mygit_commit, repository_dir, run_mygit_command, short_status,
};
use common::file::{FileSpec, create_directory, read_file, write_file, write_generated_files};
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
fn add_stages_untracked_files(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    run_mygit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    let files = write_generated_files(repository_dir.path(), 2);
    let staged = files[0].path.file_name().unwrap().to_string_lossy().to_string();
    let untracked = files[1].path.file_name().unwrap().to_string_lossy().to_string();

    run_mygit_command(repository_dir.path(), &["add", &staged])
        .assert()
        .success();

    assert_eq!(
        short_status(repository_dir.path())?,
        format!("A  {staged}\n?? {untracked}\n")
    );

    Ok(())
}

#[rstest]
fn add_records_absolute_paths_in_the_index(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_mygit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    write_file(FileSpec::new(
        repository_dir.path().join("dir").join("f.txt"),
        "f".to_string(),
    ));

    run_mygit_command(&repository_dir.path().join("dir"), &["add", "f.txt"])
        .assert()
        .success();

    let root = repository_dir.path().canonicalize()?;
    assert_eq!(
        read_file(&repository_dir.path().join(".mygit").join("index")),
        format!("{}\n", root.join("dir").join("f.txt").display())
    );

    Ok(())
}

#[rstest]
fn adding_a_missing_untracked_path_fails(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_mygit_command(init_repository_dir.path(), &["add", "1.txt", "missing.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.txt"));

    // nothing was staged
    assert_eq!(short_status(init_repository_dir.path())?, "");

    Ok(())
}

#[rstest]
#[case::outside("../elsewhere.txt")]
#[case::metadata(".mygit/HEAD")]
#[case::line_break("a\nb.txt")]
fn adding_foreign_paths_fails(
    init_repository_dir: TempDir,
    #[case] path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    run_mygit_command(init_repository_dir.path(), &["add", path])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid argument"));

    Ok(())
}

#[rstest]
fn file_names_with_line_breaks_cannot_be_staged(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = init_repository_dir.path();
    write_file(FileSpec::new(root.join("a\nb.txt"), "x".to_string()));

    run_mygit_command(root, &["add", "a\nb.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("line break"));

    // the index is still readable
    write_file(FileSpec::new(root.join("1.txt"), "changed".to_string()));
    run_mygit_command(root, &["add", "1.txt"]).assert().success();
    mygit_commit(root, "still works").assert().success();

    Ok(())
}

#[rstest]
fn reset_unstages_without_touching_untracked_files(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    write_file(FileSpec::new(
        init_repository_dir.path().join("new.txt"),
        "new".to_string(),
    ));
    run_mygit_command(init_repository_dir.path(), &["add", "new.txt"])
        .assert()
        .success();

    run_mygit_command(init_repository_dir.path(), &["reset", "new.txt"])
        .assert()
        .success();

    assert_eq!(short_status(init_repository_dir.path())?, "?? new.txt\n");
    assert_eq!(read_file(&init_repository_dir.path().join("new.txt")), "new");

    Ok(())
}

#[rstest]
fn reset_restores_committed_content(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    write_file(FileSpec::new(
        init_repository_dir.path().join("1.txt"),
        "changed".to_string(),
    ));
    std::fs::remove_dir_all(init_repository_dir.path().join("a"))?;

    run_mygit_command(init_repository_dir.path(), &["reset", "1.txt", "a"])
        .assert()
        .success();

    assert_eq!(read_file(&init_repository_dir.path().join("1.txt")), "one");
    assert_eq!(
        read_file(&init_repository_dir.path().join("a/b/3.txt")),
        "three"
    );
    assert_eq!(short_status(init_repository_dir.path())?, "");

    Ok(())
}

#[rstest]
fn rm_deletes_and_stages_tracked_paths(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_mygit_command(init_repository_dir.path(), &["rm", "a"])
        .assert()
        .success();

    assert!(!init_repository_dir.path().join("a").exists());

    mygit_commit(init_repository_dir.path(), "remove a")
        .assert()
        .success();
    assert_eq!(short_status(init_repository_dir.path())?, "");

    // the removal is committed: restoring the directory makes it untracked
    write_file(FileSpec::new(
        init_repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    ));
    assert_eq!(
        short_status(init_repository_dir.path())?,
        "?? a/2.txt\n"
    );

    Ok(())
}

#[rstest]
fn rm_reports_every_missing_path(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_mygit_command(
        init_repository_dir.path(),
        &["rm", "1.txt", "ghost.txt", "phantom.txt"],
    )
    .assert()
    .failure()
    .stderr(predicate::str::contains("Following paths did not match any files"))
    .stderr(predicate::str::contains("ghost.txt"))
    .stderr(predicate::str::contains("phantom.txt"));

    assert!(init_repository_dir.path().join("1.txt").exists());

    Ok(())
}

#[rstest]
fn clean_removes_only_untracked_unstaged_paths(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = init_repository_dir.path();
    write_file(FileSpec::new(root.join("stray.txt"), "x".to_string()));
    write_file(FileSpec::new(root.join("a/stray.txt"), "x".to_string()));
    write_file(FileSpec::new(root.join("keep.txt"), "x".to_string()));
    create_directory(&root.join("empty"));
    run_mygit_command(root, &["add", "keep.txt"])
        .assert()
        .success();

    run_mygit_command(root, &["clean"])
        .assert()
        .success()
        .stdout("Removing a/stray.txt\nRemoving empty\nRemoving stray.txt\n");

    assert!(!root.join("stray.txt").exists());
    assert!(!root.join("empty").exists());
    assert!(root.join("keep.txt").exists());
    assert!(root.join("a/2.txt").exists());
    assert_eq!(short_status(root)?, "A  keep.txt\n");

    Ok(())
}
