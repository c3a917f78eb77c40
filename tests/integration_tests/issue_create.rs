use crate::common::{TestRepo, gitlab_repo, stderr, stdout};
use rstest::rstest;

#[rstest]
fn test_issue_create(gitlab_repo: TestRepo) {
    gitlab_repo.respond(
        "POST projects/2/issues",
        r#"{"iid": 7, "web_url": "https://gitlab.com/lab-testing/test/-/issues/7"}"#,
    );

    let output = gitlab_repo.lab(&["issue", "create", "-m", "issue title", "-m", "issue body"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "https://gitlab.com/lab-testing/test/-/issues/7\n");

    let post = gitlab_repo.post_to("projects/2/issues").unwrap();
    assert!(post.contains(&"title=issue title".to_string()), "{post:?}");
}

#[rstest]
fn test_issue_create_uses_project_template(gitlab_repo: TestRepo) {
    gitlab_repo.respond(
        "POST projects/1/issues",
        r#"{"iid": 3, "web_url": "https://gitlab.com/zaquestion/test/-/issues/3"}"#,
    );
    let dir = gitlab_repo.root_path().join(".gitlab/issue_templates");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("default.md"),
        "This is the default issue template for lab\n",
    )
    .unwrap();

    let output = gitlab_repo
        .lab_command()
        .args(["issue", "new", "origin"])
        .env("GIT_EDITOR", "true")
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    let post = gitlab_repo.post_to("projects/1/issues").unwrap();
    assert!(
        post.contains(&"title=This is the default issue template for lab".to_string()),
        "{post:?}"
    );
}

#[rstest]
fn test_issue_create_empty_message(gitlab_repo: TestRepo) {
    let output = gitlab_repo
        .lab_command()
        .args(["issue", "create"])
        .env("GIT_EDITOR", "true")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Aborting issue due to empty issue message"));
    assert!(gitlab_repo.post_to("projects/2/issues").is_none());
}
