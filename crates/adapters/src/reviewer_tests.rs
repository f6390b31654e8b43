// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn statuses_are_recorded() {
    let reviewer = FakeReviewer::new();
    reviewer
        .create_status(
            "acme",
            "widget",
            "abc123",
            Status {
                state: StatusState::Pending,
                description: "Build enqueued.".into(),
                context: "ci/unit".into(),
                target_url: "https://ci/unit/1".into(),
            },
        )
        .await
        .unwrap();

    let statuses = reviewer.statuses();
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].sha, "abc123");
    assert_eq!(statuses[0].status.context, "ci/unit");
}

#[tokio::test]
async fn comments_get_sequential_ids() {
    let reviewer = FakeReviewer::new();
    reviewer.create_comment("acme", "widget", 42, "first").await.unwrap();
    reviewer.create_comment("acme", "widget", 42, "second").await.unwrap();

    let comments = reviewer.list_issue_comments("acme", "widget", 42).await.unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].id, 1);
    assert_eq!(comments[1].id, 2);
    assert_eq!(comments[0].author, FAKE_BOT_NAME);
}

#[tokio::test]
async fn delete_and_edit_mutate_comments() {
    let reviewer = FakeReviewer::new();
    let first = reviewer.seed_comment("acme", "widget", 42, "gaffer-bot", "old");
    let second = reviewer.seed_comment("acme", "widget", 42, "human", "keep");

    reviewer.edit_comment("acme", "widget", first, "new").await.unwrap();
    assert_eq!(reviewer.comments("acme", "widget", 42)[0].body, "new");

    reviewer.delete_comment("acme", "widget", first).await.unwrap();
    let left = reviewer.comments("acme", "widget", 42);
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].id, second);
    assert_eq!(reviewer.deleted(), vec![first]);
}

#[tokio::test]
async fn changes_are_scripted_per_pull() {
    let reviewer = FakeReviewer::new();
    reviewer.set_changes(42, &["src/lib.rs", "README.md"]);

    let changes = reviewer.get_pull_request_changes("acme", "widget", 42).await.unwrap();
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0].filename, "src/lib.rs");

    assert!(reviewer.get_pull_request_changes("acme", "widget", 7).await.unwrap().is_empty());

    reviewer.fail_changes("rate limited");
    assert!(reviewer.get_pull_request_changes("acme", "widget", 42).await.is_err());
}
