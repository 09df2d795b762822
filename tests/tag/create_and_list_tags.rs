use crate::common::command::{
    AUTHOR_DATE, AUTHOR_EMAIL, AUTHOR_NAME, commit_file, got_stdout, init_repository_dir,
    rev_parse, run_got_command,
};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn lightweight_tag_points_at_the_commit(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    let first = rev_parse(dir, "HEAD")?;
    commit_file(dir, "later.txt", "later", "Later commit")?;

    run_got_command(dir, &["tag", "v1.0", "HEAD^"])
        .assert()
        .success()
        .stdout("");
    run_got_command(dir, &["tag", "v2.0"]).assert().success();

    assert_eq!(
        std::fs::read_to_string(dir.join(".got/refs/tags/v1.0"))?,
        format!("{first}\n")
    );
    assert_eq!(rev_parse(dir, "v1.0")?, first);
    assert_eq!(got_stdout(dir, &["tag"])?, "v1.0\nv2.0\n");

    Ok(())
}

#[rstest]
fn annotated_tag_writes_a_tag_object(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    let head = rev_parse(dir, "HEAD")?;

    run_got_command(dir, &["tag", "-a", "release", "-m", "First release"])
        .envs(vec![
            ("GOT_AUTHOR_NAME", AUTHOR_NAME),
            ("GOT_AUTHOR_EMAIL", AUTHOR_EMAIL),
            ("GOT_AUTHOR_DATE", AUTHOR_DATE),
        ])
        .assert()
        .success();

    let tag_oid = rev_parse(dir, "release")?;
    assert_ne!(tag_oid, head);

    let content = got_stdout(dir, &["cat-file", "tag", "release"])?;
    assert!(content.starts_with(&format!("object {head}\ntype commit\ntag release\n")));
    assert!(content.ends_with("\n\nFirst release\n"));

    assert_eq!(rev_parse(dir, "release^{}")?, head);
    assert_eq!(
        got_stdout(dir, &["rev-parse", "--type", "commit", "release"])?,
        format!("{head}\n")
    );
    // parent lookups see through the tag to the root commit
    run_got_command(dir, &["rev-parse", "release^"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(format!("commit {head} has no parent")));

    Ok(())
}

#[rstest]
fn duplicate_tag_fails(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_got_command(dir, &["tag", "v1"]).assert().success();

    run_got_command(dir, &["tag", "v1"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("tag 'v1' already exists"));
}

#[rstest]
fn annotate_without_message_is_a_usage_error(init_repository_dir: TempDir) {
    run_got_command(init_repository_dir.path(), &["tag", "-a", "v1"])
        .assert()
        .failure()
        .code(2);
}

#[rstest]
fn message_alone_creates_an_annotated_tag(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    let head = rev_parse(dir, "HEAD")?;

    run_got_command(dir, &["tag", "-m", "Quick note", "note"])
        .envs(vec![
            ("GOT_AUTHOR_NAME", AUTHOR_NAME),
            ("GOT_AUTHOR_EMAIL", AUTHOR_EMAIL),
            ("GOT_AUTHOR_DATE", AUTHOR_DATE),
        ])
        .assert()
        .success();

    assert_ne!(rev_parse(dir, "note")?, head);
    assert_eq!(rev_parse(dir, "note^{}")?, head);

    Ok(())
}
