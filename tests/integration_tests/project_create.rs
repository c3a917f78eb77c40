use crate::common::{TestRepo, repo, stderr, stdout};
use rstest::rstest;

const CREATED: &str = r#"{
    "id": 30,
    "path_with_namespace": "company/group/tool",
    "default_branch": null,
    "web_url": "https://gitlab.com/company/group/tool",
    "ssh_url_to_repo": "git@gitlab.com:company/group/tool.git"
}"#;

#[rstest]
fn test_project_create_adds_origin(repo: TestRepo) {
    repo.run_git(&["remote", "remove", "origin"]);
    repo.respond("GET namespaces/company%2Fgroup", r#"{"id": 9, "full_path": "company/group"}"#);
    repo.respond("POST projects", CREATED);

    let output = repo.lab(&["project", "create", "company/group/tool", "--public"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "https://gitlab.com/company/group/tool\n");

    let post = repo.post_to("projects").unwrap();
    for field in ["path=tool", "visibility=public"] {
        assert!(post.contains(&field.to_string()), "{post:?}");
    }
    assert!(post.contains(&"namespace_id=9".to_string()), "{post:?}");

    let remote = repo
        .git_command()
        .args(["remote", "get-url", "origin"])
        .output()
        .unwrap();
    assert_eq!(stdout(&remote), "git@gitlab.com:company/group/tool.git\n");
}

#[rstest]
fn test_project_create_unknown_namespace(repo: TestRepo) {
    let output = repo.lab(&["project", "create", "nogroup/tool"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr(&output).contains("GitLab group or user nogroup not found"),
        "{}",
        stderr(&output)
    );
    assert!(repo.post_to("projects").is_none());
}
