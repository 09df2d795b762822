use crate::common::command::{commit_file, init_repository_dir, repository_dir, run_got_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;
use sha1::{Digest, Sha1};
use std::collections::HashMap;

#[rstest]
fn parent_of_root_commit_fails(init_repository_dir: TempDir) {
    run_got_command(init_repository_dir.path(), &["rev-parse", "HEAD^"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("has no parent"));
}

#[rstest]
#[case("no-such-branch", "reference no-such-branch not found")]
#[case("HEAD^^^", "has no parent")]
#[case("..", "invalid revision syntax")]
#[case("ffffffff", "object ffffffff not found")]
fn unresolvable_revisions_fail(
    init_repository_dir: TempDir,
    #[case] spec: &str,
    #[case] message: &str,
) {
    run_got_command(init_repository_dir.path(), &["rev-parse", spec])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(message));
}

#[rstest]
fn ambiguous_prefix_lists_candidates(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir.path();
    run_got_command(dir, &["init"]).assert().success();

    // find two contents whose blob ids share a four character prefix
    let mut seen = HashMap::new();
    let (prefix, first, second) = (0..)
        .find_map(|index: usize| {
            let content = format!("content {index}");
            let digest = Sha1::digest(format!("blob {}\0{content}", content.len()));
            let prefix = format!("{digest:x}")[..4].to_string();
            seen.insert(prefix.clone(), content.clone())
                .map(|previous| (prefix, previous, content))
        })
        .ok_or("no colliding prefix")?;

    for (name, content) in [("first.txt", first), ("second.txt", second)] {
        std::fs::write(dir.join(name), content)?;
        run_got_command(dir, &["hash-object", "-w", name])
            .assert()
            .success()
            .stdout(predicate::str::starts_with(prefix.as_str()));
    }

    run_got_command(dir, &["rev-parse", &prefix])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(format!(
            "short object id {prefix} is ambiguous"
        )));

    Ok(())
}

#[rstest]
fn dangling_branch_is_reported(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir.path();
    run_got_command(dir, &["init"]).assert().success();
    commit_file(dir, "file.txt", "content", "Commit")?;
    std::fs::write(
        dir.join(".got/refs/heads/broken"),
        format!("{}\n", "1".repeat(40)),
    )?;

    run_got_command(dir, &["rev-parse", "broken"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("points to missing object"));

    Ok(())
}
