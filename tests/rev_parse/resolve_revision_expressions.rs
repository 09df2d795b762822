use crate::common::command::{commit_file, got_stdout, rev_parse, repository_dir, run_got_command};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn resolve_revision_expressions(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir.path();
    run_got_command(dir, &["init"]).assert().success();

    let c1 = commit_file(dir, "file1.txt", "content 1", "First commit")?;
    let c2 = commit_file(dir, "file2.txt", "content 2", "Second commit")?;
    let c3 = commit_file(dir, "file3.txt", "content 3", "Third commit")?;

    assert_eq!(rev_parse(dir, "HEAD")?, c3);
    assert_eq!(rev_parse(dir, "@")?, c3);
    assert_eq!(rev_parse(dir, "master")?, c3);
    assert_eq!(rev_parse(dir, "refs/heads/master")?, c3);
    assert_eq!(rev_parse(dir, "HEAD^")?, c2);
    assert_eq!(rev_parse(dir, "HEAD~")?, c2);
    assert_eq!(rev_parse(dir, "HEAD~2")?, c1);
    assert_eq!(rev_parse(dir, "master^^")?, c1);
    assert_eq!(rev_parse(dir, &c2[..6])?, c2);
    assert_eq!(rev_parse(dir, &format!("{}~1", &c3[..10]))?, c2);

    Ok(())
}

#[rstest]
fn resolve_with_type_peels_to_tree(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir.path();
    run_got_command(dir, &["init"]).assert().success();
    commit_file(dir, "file1.txt", "content 1", "First commit")?;

    let tree = got_stdout(dir, &["write-tree"])?;

    assert_eq!(got_stdout(dir, &["rev-parse", "--type", "tree", "HEAD"])?, tree);
    assert_eq!(got_stdout(dir, &["rev-parse", "HEAD^{tree}"])?, tree);

    Ok(())
}
