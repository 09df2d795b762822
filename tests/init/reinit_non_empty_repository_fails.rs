use crate::common::command::{init_repository_dir, run_got_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn reinit_non_empty_repository_fails(init_repository_dir: TempDir) {
    run_got_command(init_repository_dir.path(), &["init"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("already exists and is not empty"));
}
