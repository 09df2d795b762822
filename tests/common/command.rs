use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

pub const AUTHOR_NAME: &str = "fake_user";
pub const AUTHOR_EMAIL: &str = "fake_email@email.com";
pub const AUTHOR_DATE: &str = "2023-01-01 12:00:00 +0000";

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Repository with `1.txt`, `a/2.txt` and `a/b/3.txt` committed on master
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_got_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("b").join("3.txt"),
        "three".to_string(),
    ));

    run_got_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();
    got_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

pub fn run_got_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("got").expect("Failed to find got binary");
    cmd.env_remove("GOT_LOG");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn got_commit(dir: &Path, message: &str) -> Command {
    let mut cmd = run_got_command(dir, &["commit", "-m", message]);
    cmd.envs(vec![
        ("GOT_AUTHOR_NAME", AUTHOR_NAME),
        ("GOT_AUTHOR_EMAIL", AUTHOR_EMAIL),
        ("GOT_AUTHOR_DATE", AUTHOR_DATE), // %Y-%m-%d %H:%M:%S %z
    ]);
    cmd
}

/// Stdout of a command that is expected to succeed
pub fn got_stdout(dir: &Path, args: &[&str]) -> Result<String, Box<dyn std::error::Error>> {
    let output = run_got_command(dir, args).assert().success();
    Ok(String::from_utf8(output.get_output().stdout.clone())?)
}

/// Resolve a revision with `got rev-parse`
pub fn rev_parse(dir: &Path, spec: &str) -> Result<String, Box<dyn std::error::Error>> {
    Ok(got_stdout(dir, &["rev-parse", spec])?.trim().to_string())
}

/// Read the commit HEAD points to straight from `.got`
pub fn get_head_commit_sha(dir: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let head_content = std::fs::read_to_string(dir.join(".got").join("HEAD"))?;

    // HEAD holds either a commit id or "ref: refs/heads/<branch>"
    match head_content.strip_prefix("ref: ") {
        Some(ref_path) => {
            let ref_file = dir.join(".got").join(ref_path.trim());
            Ok(std::fs::read_to_string(ref_file)?.trim().to_string())
        }
        None => Ok(head_content.trim().to_string()),
    }
}

/// Write, stage and commit a single file
pub fn commit_file(
    dir: &Path,
    name: &str,
    content: &str,
    message: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    write_file(FileSpec::new(dir.join(name), content.to_string()));
    run_got_command(dir, &["add", name]).assert().success();
    got_commit(dir, message).assert().success();

    get_head_commit_sha(dir)
}
