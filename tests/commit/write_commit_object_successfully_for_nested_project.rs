use crate::common::command::{
    get_head_commit_sha, got_commit, got_stdout, init_repository_dir, repository_dir,
    run_got_command,
};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn write_commit_object_successfully_for_nested_project(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    let first = get_head_commit_sha(dir)?;

    write_file(FileSpec::new(
        dir.join("a").join("b").join("4.txt"),
        "four".to_string(),
    ));
    run_got_command(dir, &["add", "a/b/4.txt"])
        .assert()
        .success();

    got_commit(dir, "  Add a fourth file\n\nWith a body\n\n")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\[master [0-9a-f]{7}\] Add a fourth file\n$")?);

    let second = get_head_commit_sha(dir)?;
    let content = got_stdout(dir, &["cat-file", "commit", &second])?;
    assert!(content.contains(&format!("\nparent {first}\n")));
    assert!(content.ends_with("\n\nAdd a fourth file\n\nWith a body\n"));

    let files = got_stdout(dir, &["ls-tree", "-r", "HEAD"])?;
    assert_eq!(files.lines().count(), 4);

    Ok(())
}

#[rstest]
fn first_commit_is_a_root_commit(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir.path();
    run_got_command(dir, &["init"]).assert().success();
    write_file(FileSpec::new(dir.join("file.txt"), "content".to_string()));
    run_got_command(dir, &["add", "file.txt"])
        .assert()
        .success();

    got_commit(dir, "Initial")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[master (root-commit) "));

    let content = got_stdout(dir, &["cat-file", "commit", "master"])?;
    assert!(!content.contains("parent "));

    Ok(())
}

#[rstest]
fn commit_without_identity_fails(repository_dir: TempDir) {
    let dir = repository_dir.path();
    run_got_command(dir, &["init"]).assert().success();

    run_got_command(dir, &["commit", "-m", "anonymous"])
        .env_remove("GOT_AUTHOR_NAME")
        .env_remove("GOT_AUTHOR_EMAIL")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("GOT_AUTHOR_NAME not set"));
}
