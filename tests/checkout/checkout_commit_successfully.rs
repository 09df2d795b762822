use crate::common::command::{
    commit_file, get_head_commit_sha, got_stdout, repository_dir, run_got_command,
};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn checkout_commit_detaches_head_and_updates_workspace(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir.path();
    run_got_command(dir, &["init"]).assert().success();

    let c1 = commit_file(dir, "file1.txt", "first version", "First commit")?;
    commit_file(dir, "file1.txt", "second version", "Second commit")?;
    commit_file(dir, "file2.txt", "extra", "Third commit")?;

    run_got_command(dir, &["checkout", &c1[..8]])
        .assert()
        .success()
        .stdout(format!("HEAD is now at {} First commit\n", &c1[..7]))
        .stderr(predicate::str::contains("detached HEAD"));

    assert_eq!(std::fs::read_to_string(dir.join("file1.txt"))?, "first version");
    assert!(!dir.join("file2.txt").exists());
    assert_eq!(std::fs::read_to_string(dir.join(".got/HEAD"))?, format!("{c1}\n"));
    assert_eq!(got_stdout(dir, &["ls-files"])?, "file1.txt\n");
    assert_eq!(got_stdout(dir, &["status", "--porcelain"])?, "");

    run_got_command(dir, &["checkout", "master"])
        .assert()
        .success()
        .stdout("Switched to branch 'master'\n");

    assert_eq!(std::fs::read_to_string(dir.join("file1.txt"))?, "second version");
    assert_eq!(std::fs::read_to_string(dir.join("file2.txt"))?, "extra");
    assert_eq!(
        std::fs::read_to_string(dir.join(".got/HEAD"))?,
        "ref: refs/heads/master\n"
    );

    Ok(())
}

#[rstest]
fn checkout_into_another_directory(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir.path();
    run_got_command(dir, &["init"]).assert().success();
    commit_file(dir, "src/main.rs", "fn main() {}", "First commit")?;
    let head = get_head_commit_sha(dir)?;

    let target = TempDir::new()?;
    let target_path = target.path().join("export");
    run_got_command(dir, &["checkout", "HEAD", target_path.to_str().ok_or("path")?])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!(
            "Checked out {} into ",
            &head[..7]
        )));

    assert_eq!(
        std::fs::read_to_string(target_path.join("src/main.rs"))?,
        "fn main() {}"
    );
    assert!(!target_path.join(".got").exists());
    // the worktree and HEAD are untouched
    assert_eq!(get_head_commit_sha(dir)?, head);
    assert_eq!(
        std::fs::read_to_string(dir.join(".got/HEAD"))?,
        "ref: refs/heads/master\n"
    );

    Ok(())
}
