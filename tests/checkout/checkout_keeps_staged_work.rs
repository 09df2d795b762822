use crate::common::command::{commit_file, got_stdout, repository_dir, run_got_command};
use crate::common::file::{FileSpec, snapshot_dir, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

/// Two commits of a.txt on master
#[fixture]
pub fn repository_with_history(repository_dir: TempDir) -> TempDir {
    let dir = repository_dir.path();

    run_got_command(dir, &["init"]).assert().success();
    commit_file(dir, "a.txt", "a1", "First commit").expect("first commit");
    commit_file(dir, "a.txt", "a2", "Second commit").expect("second commit");

    repository_dir
}

#[rstest]
fn staged_new_file_survives_checkout(
    repository_with_history: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_with_history.path();
    write_file(FileSpec::new(dir.join("new.txt"), "not committed".to_string()));
    run_got_command(dir, &["add", "new.txt"]).assert().success();

    run_got_command(dir, &["checkout", "master~1"])
        .assert()
        .success();

    assert_eq!(std::fs::read_to_string(dir.join("a.txt"))?, "a1");
    assert_eq!(std::fs::read_to_string(dir.join("new.txt"))?, "not committed");
    assert_eq!(got_stdout(dir, &["ls-files"])?, "a.txt\nnew.txt\n");
    assert_eq!(got_stdout(dir, &["status", "--porcelain"])?, "A  new.txt\n");

    Ok(())
}

#[rstest]
fn staged_edit_blocks_checkout(
    repository_with_history: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_with_history.path();
    write_file(FileSpec::new(dir.join("a.txt"), "staged edit".to_string()));
    run_got_command(dir, &["add", "a.txt"]).assert().success();
    let before = snapshot_dir(dir);

    run_got_command(dir, &["checkout", "master~1"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("\ta.txt"));

    assert_eq!(snapshot_dir(dir), before);
    assert_eq!(std::fs::read_to_string(dir.join("a.txt"))?, "staged edit");

    Ok(())
}

#[rstest]
fn local_edit_to_an_unchanged_file_is_carried_over(
    repository_with_history: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_with_history.path();
    commit_file(dir, "b.txt", "b", "Third commit")?;
    commit_file(dir, "a.txt", "a3", "Fourth commit")?;
    write_file(FileSpec::new(dir.join("b.txt"), "edited".to_string()));

    run_got_command(dir, &["checkout", "master~1"])
        .assert()
        .success();

    assert_eq!(std::fs::read_to_string(dir.join("a.txt"))?, "a2");
    assert_eq!(std::fs::read_to_string(dir.join("b.txt"))?, "edited");
    assert_eq!(got_stdout(dir, &["status", "--porcelain"])?, " M b.txt
");

    Ok(())
}

#[rstest]
#[case("HEAD")]
#[case("@")]
fn checkout_of_head_stays_on_the_branch(
    repository_with_history: TempDir,
    #[case] target: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_with_history.path();

    run_got_command(dir, &["checkout", target])
        .assert()
        .success()
        .stdout("Already on 'master'\n");

    assert_eq!(
        std::fs::read_to_string(dir.join(".got/HEAD"))?,
        "ref: refs/heads/master\n"
    );

    Ok(())
}
