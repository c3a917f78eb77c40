use crate::common::{ORIGIN_PROJECT, TestRepo, UPSTREAM_PROJECT, gitlab_repo, repo, stderr, stdout};
use rstest::rstest;

const CREATED: &str = r#"{"id": 99, "iid": 42, "web_url": "https://gitlab.com/lab-testing/test/-/merge_requests/42"}"#;

fn has_field(call: &[String], flag: &str, field: &str) -> bool {
    call.windows(2).any(|w| w[0] == flag && w[1] == field)
}

#[rstest]
fn test_mr_create_with_messages(gitlab_repo: TestRepo) {
    gitlab_repo.respond("POST projects/1/merge_requests", CREATED);

    let output = gitlab_repo.lab(&["mr", "create", "-m", "Add X", "-m", "Details"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "https://gitlab.com/lab-testing/test/-/merge_requests/42/diffs\n"
    );

    let post = gitlab_repo
        .post_to("projects/1/merge_requests")
        .expect("merge request submitted");
    assert!(has_field(&post, "--raw-field", "title=Add X"), "{post:?}");
    assert!(has_field(&post, "--raw-field", "description=Details"));
    assert!(has_field(&post, "--raw-field", "source_branch=feature"));
    assert!(has_field(&post, "--raw-field", "target_branch=master"));
    assert!(has_field(&post, "--field", "target_project_id=2"));
    assert!(has_field(&post, "--hostname", "gitlab.com"));
}

#[rstest]
fn test_mr_create_with_metadata(gitlab_repo: TestRepo) {
    gitlab_repo.respond("POST projects/1/merge_requests", CREATED);
    gitlab_repo.respond(
        "GET projects/2/labels",
        r#"[{"name": "bug", "description": "Something is broken"}, {"name": "docs", "description": null}]"#,
    );
    gitlab_repo.respond(
        "GET users?username=zaquestion",
        r#"[{"id": 10, "username": "zaquestion"}]"#,
    );

    let output = gitlab_repo.lab(&[
        "mr", "create", "-m", "Add X", "-l", "broken", "-a", "@zaquestion,ghost",
        "--milestone", "5", "--draft", "-s",
    ]);
    assert!(output.status.success(), "{}", stderr(&output));

    let post = gitlab_repo.post_to("projects/1/merge_requests").unwrap();
    assert!(has_field(&post, "--raw-field", "title=Draft: Add X"), "{post:?}");
    assert!(has_field(&post, "--raw-field", "labels=bug"));
    assert!(has_field(&post, "--field", "milestone_id=5"));
    assert!(has_field(&post, "--field", "assignee_ids[]=10"));
    assert!(has_field(&post, "--field", "squash=true"));
    assert!(!post.iter().any(|arg| arg.starts_with("assignee_ids[]=") && arg != "assignee_ids[]=10"));

    // A numeric milestone is used as is
    let calls = gitlab_repo.glab_calls();
    assert!(!calls.iter().any(|c| c[1].contains("milestones")));
}

#[rstest]
fn test_mr_create_empty_range(gitlab_repo: TestRepo) {
    gitlab_repo.run_git(&["update-ref", "refs/remotes/upstream/master", "refs/remotes/origin/feature"]);

    let output = gitlab_repo.lab(&["mr", "create", "-m", "Add X"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "");
    let err = stderr(&output);
    assert!(
        err.contains("from upstream/master to origin/feature has 0 commits"),
        "{err}"
    );
    assert!(gitlab_repo.post_to("projects/1/merge_requests").is_none());
}

#[rstest]
fn test_mr_create_unpushed_branch(repo: TestRepo) {
    repo.respond("GET projects/lab-testing%2Ftest", UPSTREAM_PROJECT);
    repo.respond("GET projects/zaquestion%2Ftest", ORIGIN_PROJECT);

    let output = repo.lab(&["mr", "create", "-m", "Add X"]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(
        err.contains("Aborting MR, source branch feature not present on remote origin"),
        "{err}"
    );
    assert!(err.contains("git push -u origin feature"), "{err}");
    assert_eq!(stdout(&output), "");
}

#[rstest]
fn test_mr_create_invalid_remote(gitlab_repo: TestRepo) {
    let output = gitlab_repo.lab(&["mr", "create", "upstrem", "-m", "Add X"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("upstrem is not a valid remote"));
    assert!(gitlab_repo.glab_calls().is_empty(), "no API call for a typo");
}

#[rstest]
fn test_mr_create_missing_target_branch(gitlab_repo: TestRepo) {
    let output = gitlab_repo.lab(&["mr", "create", "upstream", "release", "-m", "Add X"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr(&output).contains("Aborting MR, upstream:release is not a valid target"),
        "{}",
        stderr(&output)
    );
}

#[rstest]
#[case::file_and_message(&["-F", "mr.md", "-m", "Add X"])]
#[case::file_and_cover_letter(&["-F", "mr.md", "-c"])]
#[case::message_and_cover_letter(&["-m", "Add X", "-c"])]
fn test_mr_create_conflicting_message_options(gitlab_repo: TestRepo, #[case] flags: &[&str]) {
    let mut args = vec!["mr", "create"];
    args.extend_from_slice(flags);

    let output = gitlab_repo.lab(&args);
    assert_eq!(output.status.code(), Some(2), "usage error");
    assert!(stderr(&output).contains("cannot be used with"), "{}", stderr(&output));
    assert!(gitlab_repo.glab_calls().is_empty());
}

#[rstest]
fn test_mr_create_from_file(gitlab_repo: TestRepo) {
    gitlab_repo.respond("POST projects/1/merge_requests", CREATED);
    let file = gitlab_repo.root_path().join("mr.md");
    std::fs::write(&file, "Add X\n\nDetails\n").unwrap();

    let output = gitlab_repo.lab(&["mr", "create", "-F", file.to_str().unwrap()]);
    assert!(output.status.success(), "{}", stderr(&output));
    let post = gitlab_repo.post_to("projects/1/merge_requests").unwrap();
    assert!(has_field(&post, "--raw-field", "title=Add X"));
    assert!(has_field(&post, "--raw-field", "description=Details"));
}

#[rstest]
fn test_mr_create_with_editor(gitlab_repo: TestRepo) {
    gitlab_repo.respond("POST projects/1/merge_requests", CREATED);

    let output = gitlab_repo
        .lab_command()
        .args(["mr", "create"])
        .env(
            "GIT_EDITOR",
            r#"sh -c 'grep -q "Requesting a merge into upstream:master from origin:feature (3 commits)" "$1" && printf "Edited title\n" > "$1"' -"#,
        )
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    let post = gitlab_repo.post_to("projects/1/merge_requests").unwrap();
    assert!(has_field(&post, "--raw-field", "title=Edited title"), "{post:?}");
}

#[rstest]
fn test_mr_create_editor_saved_unchanged(gitlab_repo: TestRepo) {
    let output = gitlab_repo
        .lab_command()
        .args(["mr", "create"])
        .env("GIT_EDITOR", "true")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Aborting MR due to empty MR message"));
    assert!(gitlab_repo.post_to("projects/1/merge_requests").is_none());
}

#[rstest]
fn test_mr_create_submission_failure(gitlab_repo: TestRepo) {
    gitlab_repo.respond_error(
        "POST projects/1/merge_requests",
        r#"{"message": ["Another open merge request already exists for this source branch: !41"]}"#,
        "glab: 409 Conflict (HTTP 409)",
    );

    let output = gitlab_repo.lab(&["mr", "create", "-m", "Add X"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "");
    assert!(stderr(&output).contains("Another open merge request already exists"));
    let posts = gitlab_repo
        .glab_calls()
        .into_iter()
        .filter(|c| c.iter().any(|a| a == "POST"))
        .count();
    assert_eq!(posts, 1, "not retried");
}
