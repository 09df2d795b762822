use crate::common::command::{
    AUTHOR_EMAIL, AUTHOR_NAME, commit_file, got_stdout, repository_dir, run_got_command,
};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn show_history_from_head(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir.path();
    run_got_command(dir, &["init"]).assert().success();

    let c1 = commit_file(dir, "file1.txt", "content 1", "First commit")?;
    let c2 = commit_file(dir, "file2.txt", "content 2", "Second commit")?;

    let stdout = got_stdout(dir, &["log"])?;
    let commits = stdout
        .lines()
        .filter_map(|line| line.strip_prefix("commit "))
        .collect::<Vec<_>>();
    assert_eq!(commits, vec![c2.as_str(), c1.as_str()]);

    assert!(stdout.contains(&format!("Author: {AUTHOR_NAME} <{AUTHOR_EMAIL}>\n")));
    assert!(stdout.contains("Date:   Sun Jan 1 12:00:00 2023 +0000\n"));
    assert!(stdout.contains("\n    Second commit\n"));

    Ok(())
}

#[rstest]
fn show_history_in_oneline_format_from_a_revision(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir.path();
    run_got_command(dir, &["init"]).assert().success();

    let c1 = commit_file(dir, "file1.txt", "content 1", "First commit")?;
    let c2 = commit_file(dir, "file2.txt", "content 2", "Second commit")?;
    let c3 = commit_file(dir, "file3.txt", "content 3", "Third commit")?;

    let expected = format!(
        "{} Third commit\n{} Second commit\n{} First commit\n",
        &c3[..7],
        &c2[..7],
        &c1[..7]
    );
    assert_eq!(got_stdout(dir, &["log", "--oneline"])?, expected);

    let expected = format!("{} Second commit\n{} First commit\n", &c2[..7], &c1[..7]);
    assert_eq!(got_stdout(dir, &["log", "--oneline", "HEAD^"])?, expected);

    Ok(())
}

#[rstest]
fn show_log_with_no_commits(repository_dir: TempDir) {
    let dir = repository_dir.path();
    run_got_command(dir, &["init"]).assert().success();

    run_got_command(dir, &["log"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("does not have any commits yet"));
}
