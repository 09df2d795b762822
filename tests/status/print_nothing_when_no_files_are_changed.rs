use crate::common::command::{got_stdout, init_repository_dir};
use assert_fs::TempDir;
use filetime::FileTime;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn print_nothing_when_no_files_are_changed(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();

    assert_eq!(got_stdout(dir, &["status", "--porcelain"])?, "");

    Ok(())
}

#[rstest]
fn print_nothing_if_a_file_is_touched(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    filetime::set_file_mtime(dir.join("1.txt"), FileTime::from_unix_time(1_000_000, 0))?;

    assert_eq!(got_stdout(dir, &["status", "--porcelain"])?, "");
    // the refreshed stat data is saved, so a second run sees the same thing
    assert_eq!(got_stdout(dir, &["status", "--porcelain"])?, "");

    Ok(())
}
