use crate::common::command::{commit_file, run_got_command};
use crate::common::file::{FileSpec, snapshot_dir, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

/// Two commits, with HEAD detached at the first one
#[fixture]
pub fn repository_for_conflicts() -> TempDir {
    let repository_dir = TempDir::new().expect("Failed to create temp dir");
    let dir = repository_dir.path();

    run_got_command(dir, &["init"]).assert().success();
    let first = commit_file(dir, "file1.txt", "initial content", "First commit")
        .expect("first commit");
    commit_file(dir, "file2.txt", "new file in second commit", "Second commit")
        .expect("second commit");

    run_got_command(dir, &["checkout", &first])
        .assert()
        .success();

    repository_dir
}

#[rstest]
fn checkout_fails_with_untracked_file_in_the_way(
    repository_for_conflicts: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_for_conflicts.path();
    write_file(FileSpec::new(
        dir.join("file2.txt"),
        "precious local work".to_string(),
    ));
    let before = snapshot_dir(dir);

    run_got_command(dir, &["checkout", "master"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "checkout would overwrite local changes or untracked files",
        ))
        .stderr(predicate::str::contains("\tfile2.txt"));

    assert_eq!(snapshot_dir(dir), before);

    Ok(())
}

#[rstest]
fn checkout_fails_with_modified_tracked_file(
    repository_for_conflicts: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_for_conflicts.path();
    run_got_command(dir, &["checkout", "master"])
        .assert()
        .success();
    commit_file(dir, "file1.txt", "changed on master", "Third commit")?;

    write_file(FileSpec::new(
        dir.join("file1.txt"),
        "uncommitted edit".to_string(),
    ));
    let before = snapshot_dir(dir);

    run_got_command(dir, &["checkout", "HEAD~2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\tfile1.txt"));

    assert_eq!(snapshot_dir(dir), before);

    Ok(())
}

#[rstest]
fn forced_checkout_overwrites_untracked_file(
    repository_for_conflicts: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_for_conflicts.path();
    write_file(FileSpec::new(
        dir.join("file2.txt"),
        "precious local work".to_string(),
    ));

    run_got_command(dir, &["checkout", "--force", "master"])
        .assert()
        .success();

    assert_eq!(
        std::fs::read_to_string(dir.join("file2.txt"))?,
        "new file in second commit"
    );

    Ok(())
}
