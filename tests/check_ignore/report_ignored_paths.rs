use crate::common::command::{got_stdout, repository_dir, run_got_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn report_ignored_paths(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir.path();
    run_got_command(dir, &["init"]).assert().success();

    std::fs::write(dir.join(".got/info/exclude"), "*.tmp\n")?;
    write_file(FileSpec::new(
        dir.join(".gotignore"),
        "# build output\n/target\n*.log\n".to_string(),
    ));
    write_file(FileSpec::new(
        dir.join("docs").join(".gotignore"),
        "!keep.log\n".to_string(),
    ));
    write_file(FileSpec::new(dir.join("target").join("out"), String::new()));

    let stdout = got_stdout(
        dir,
        &[
            "check-ignore",
            "scratch.tmp",
            "target",
            "target/out",
            "src/target",
            "debug.log",
            "docs/keep.log",
            "docs/other.log",
            "main.rs",
        ],
    )?;

    assert_eq!(
        stdout,
        "scratch.tmp\ntarget\ntarget/out\ndebug.log\ndocs/other.log\n"
    );

    Ok(())
}
