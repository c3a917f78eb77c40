use crate::common::{TestRepo, repo, stderr, stdout};
use rstest::rstest;

#[rstest]
fn test_clone_fork_adds_upstream(repo: TestRepo) {
    let source = repo.root_path().display().to_string();
    repo.respond(
        "GET projects/zaquestion%2Ftest",
        &format!(
            r#"{{
                "id": 1,
                "path_with_namespace": "zaquestion/test",
                "web_url": "https://gitlab.com/zaquestion/test",
                "ssh_url_to_repo": "{source}",
                "forked_from_project": {{
                    "id": 2,
                    "path_with_namespace": "lab-testing/test",
                    "web_url": "https://gitlab.com/lab-testing/test",
                    "ssh_url_to_repo": "{source}"
                }}
            }}"#
        ),
    );

    let output = repo.lab(&["clone", "zaquestion/test", "cloned", "--", "--quiet"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(
        stderr(&output).contains("new remote: upstream (lab-testing/test)"),
        "{}",
        stderr(&output)
    );

    let remotes = repo
        .git_command()
        .current_dir(repo.root_path().join("cloned"))
        .args(["remote"])
        .output()
        .unwrap();
    assert_eq!(stdout(&remotes), "origin\nupstream\n");
}
