use crate::common::command::{got_stdout, repository_dir, run_got_command};
use crate::common::file::{FileSpec, write_file, write_generated_files};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn add_files_from_nested_directories_to_index_successfully(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir.path();
    run_got_command(dir, &["init"]).assert().success();

    let nested = dir.join("src").join("deep");
    let mut files = write_generated_files(&nested, 3);
    let top = FileSpec::new(dir.join("README"), "readme".to_string());
    write_file(top.clone());
    files.push(top);

    run_got_command(dir, &["add", "."]).assert().success();

    let mut expected = files
        .iter()
        .map(|file| {
            file.path
                .strip_prefix(dir)
                .expect("file below repository")
                .display()
                .to_string()
        })
        .collect::<Vec<_>>();
    expected.sort();

    let listed = got_stdout(dir, &["ls-files"])?;
    assert_eq!(listed.lines().collect::<Vec<_>>(), expected);

    Ok(())
}

#[rstest]
fn add_from_a_subdirectory_stages_repository_relative_paths(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir.path();
    run_got_command(dir, &["init"]).assert().success();
    write_file(FileSpec::new(dir.join("sub").join("file.txt"), "x".to_string()));

    run_got_command(&dir.join("sub"), &["add", "file.txt"])
        .assert()
        .success();

    assert_eq!(got_stdout(dir, &["ls-files"])?, "sub/file.txt\n");

    Ok(())
}
