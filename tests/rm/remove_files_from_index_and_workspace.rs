use crate::common::command::{got_stdout, init_repository_dir, run_got_command};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn remove_files_from_index_and_workspace(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();

    run_got_command(dir, &["rm", "a"])
        .assert()
        .success()
        .stdout("rm 'a/2.txt'\nrm 'a/b/3.txt'\n");

    assert_eq!(got_stdout(dir, &["ls-files"])?, "1.txt\n");
    assert!(!dir.join("a").exists());
    assert_eq!(
        got_stdout(dir, &["status", "--porcelain"])?,
        "D  a/2.txt\nD  a/b/3.txt\n"
    );

    Ok(())
}

#[rstest]
fn cached_removal_keeps_the_file(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();

    run_got_command(dir, &["rm", "--cached", "1.txt"])
        .assert()
        .success();

    assert!(dir.join("1.txt").is_file());
    assert_eq!(
        got_stdout(dir, &["status", "--porcelain"])?,
        "D  1.txt\n?? 1.txt\n"
    );

    Ok(())
}

#[rstest]
fn removing_an_unstaged_path_fails(init_repository_dir: TempDir) {
    run_got_command(init_repository_dir.path(), &["rm", "nope.txt"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "pathspec 'nope.txt' did not match any staged file",
        ));
}
