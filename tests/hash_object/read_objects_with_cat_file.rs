use crate::common::command::{
    AUTHOR_EMAIL, AUTHOR_NAME, got_stdout, init_repository_dir, rev_parse, run_got_command,
};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn cat_file_prints_commit_content(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    let tree = rev_parse(dir, "HEAD^{tree}")?;

    let commit = got_stdout(dir, &["cat-file", "commit", "HEAD"])?;

    assert!(commit.starts_with(&format!("tree {tree}\n")));
    assert!(commit.contains(&format!(
        "author {AUTHOR_NAME} <{AUTHOR_EMAIL}> 1672574400 +0000\n"
    )));
    assert!(commit.ends_with("\nInitial commit\n"));

    Ok(())
}

#[rstest]
fn cat_file_peels_commit_to_tree(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();

    let listing = got_stdout(dir, &["cat-file", "tree", "HEAD"])?;
    let names = listing
        .lines()
        .filter_map(|line| line.split('\t').nth(1))
        .collect::<Vec<_>>();

    assert_eq!(names, vec!["1.txt", "a"]);

    Ok(())
}

#[rstest]
fn cat_file_with_wrong_kind_fails(init_repository_dir: TempDir) {
    run_got_command(init_repository_dir.path(), &["cat-file", "blob", "HEAD"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("cannot be peeled to a blob"));
}
