use crate::common::{TestRepo, gitlab_repo, repo, stderr, stdout};
use rstest::rstest;

#[rstest]
fn test_project_users(gitlab_repo: TestRepo) {
    gitlab_repo.respond(
        "GET projects/2/members/all",
        r#"[
            {"id": 10, "username": "zaquestion", "name": "Zaq Wiedmann", "access_level": 50},
            {"id": 11, "username": "prarit", "name": "Prarit Bhargava", "access_level": 40},
            {"id": 12, "username": "bot", "name": "CI Bot", "access_level": 20}
        ]"#,
    );

    let output = gitlab_repo.lab(&["project", "users"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "zaquestion (Zaq Wiedmann) Owner\nprarit (Prarit Bhargava) Maintainer\nbot (CI Bot) Reporter\n"
    );
}

#[rstest]
fn test_project_users_unknown_project(repo: TestRepo) {
    let output = repo.lab(&["project", "users"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr(&output).contains("GitLab project lab-testing/test not found"),
        "{}",
        stderr(&output)
    );
}

