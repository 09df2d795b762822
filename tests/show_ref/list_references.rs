use crate::common::command::{
    got_stdout, init_repository_dir, repository_dir, rev_parse, run_got_command,
};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn list_references(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    let head = rev_parse(dir, "HEAD")?;

    run_got_command(dir, &["tag", "v1"]).assert().success();
    std::fs::create_dir_all(dir.join(".got/refs/heads/feature"))?;
    std::fs::write(
        dir.join(".got/refs/heads/feature/login"),
        format!("{head}\n"),
    )?;

    let expected = format!(
        "{head} refs/heads/feature/login\n{head} refs/heads/master\n{head} refs/tags/v1\n"
    );
    assert_eq!(got_stdout(dir, &["show-ref"])?, expected);

    Ok(())
}

#[rstest]
fn fresh_repository_has_no_references(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir.path();
    run_got_command(dir, &["init"]).assert().success();

    assert_eq!(got_stdout(dir, &["show-ref"])?, "");

    Ok(())
}
