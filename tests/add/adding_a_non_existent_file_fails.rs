use crate::common::command::{got_stdout, repository_dir, run_got_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn adding_a_non_existent_file_fails(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir.path();
    run_got_command(dir, &["init"]).assert().success();
    write_file(FileSpec::new(dir.join("real.txt"), "real".to_string()));

    run_got_command(dir, &["add", "real.txt", "missing.txt"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("did not match any files"));

    // nothing is staged when one pathspec is bad
    assert_eq!(got_stdout(dir, &["ls-files"])?, "");

    Ok(())
}
