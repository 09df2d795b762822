use crate::common::command::{got_stdout, repository_dir, run_got_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn ignored_files_are_not_added(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir.path();
    run_got_command(dir, &["init"]).assert().success();

    write_file(FileSpec::new(
        dir.join(".gotignore"),
        "*.log\nbuild/\n".to_string(),
    ));
    write_file(FileSpec::new(dir.join("main.c"), "int main;".to_string()));
    write_file(FileSpec::new(dir.join("debug.log"), "noise".to_string()));
    write_file(FileSpec::new(dir.join("build").join("out.o"), "obj".to_string()));
    write_file(FileSpec::new(
        dir.join("docs").join("trace.log"),
        "noise".to_string(),
    ));

    run_got_command(dir, &["add", "."]).assert().success();

    assert_eq!(got_stdout(dir, &["ls-files"])?, ".gotignore\nmain.c\n");

    Ok(())
}
