use crate::common::command::{got_commit, got_stdout, repository_dir, run_got_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn list_root_tree_and_subtree(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir.path();
    run_got_command(dir, &["init"]).assert().success();

    write_file(FileSpec::new(dir.join("a.txt"), "alpha\n".to_string()));
    write_file(FileSpec::new(dir.join("b").join("c.txt"), "gamma\n".to_string()));
    run_got_command(dir, &["add", "a.txt", "b/c.txt"])
        .assert()
        .success();
    got_commit(dir, "first").assert().success();

    let a_oid = got_stdout(dir, &["hash-object", "a.txt"])?;
    let c_oid = got_stdout(dir, &["hash-object", "b/c.txt"])?;

    let root = got_stdout(dir, &["ls-tree", "HEAD"])?;
    let lines = root.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], format!("100644 blob {}\ta.txt", a_oid.trim()));
    assert!(lines[1].starts_with("040000 tree "));
    assert!(lines[1].ends_with("\tb"));

    let subtree_oid = lines[1]
        .split(['\t', ' '])
        .nth(2)
        .ok_or("missing subtree id")?;
    let subtree = got_stdout(dir, &["ls-tree", subtree_oid])?;
    assert_eq!(subtree, format!("100644 blob {}\tc.txt\n", c_oid.trim()));

    Ok(())
}
