#![allow(missing_docs, clippy::expect_used, clippy::unwrap_used)]

mod common;

use common::Workspace;
use predicates::prelude::*;
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn document(base: &str) -> String {
    format!(
        "---\nname: convex-docs\nmetadata:\n  updated: 2024-01-01 00:00:00 UTC\n---\n\nintro\n\n<convex-docs-list>\n\nCORE {base}/\ntutorial\n\nDATABASE /database/\nschemas, reading/filters, paginate\n\n</convex-docs-list>\n"
    )
}

async fn head_ok(server: &MockServer, p: &str) {
    Mock::given(method("HEAD"))
        .and(path(p))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

#[tokio::test]
async fn all_links_working_succeeds() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    head_ok(&server, "/tutorial.md").await;
    head_ok(&server, "/database/schemas.md").await;
    head_ok(&server, "/database/reading/filters.md").await;
    head_ok(&server, "/database/reading/paginate").await;
    let ws = Workspace::new(&server);
    std::fs::write(&ws.document, document(&server.uri()))?;

    let out = ws
        .cmd()
        .args(["check", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: Value = serde_json::from_slice(&out)?;
    let results = v["results"].as_array().unwrap();
    assert_eq!(results.len(), 4);
    assert_eq!(results[3]["md_status"], 404);
    assert_eq!(results[3]["plain_status"], 200);
    Ok(())
}

#[tokio::test]
async fn broken_link_exits_with_failure() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    head_ok(&server, "/tutorial.md").await;
    let ws = Workspace::new(&server);
    std::fs::write(&ws.document, document(&server.uri()))?;

    ws.cmd()
        .args(["check", "--format", "text"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Completely broken: 3"))
        .stdout(predicate::str::contains("database/reading/filters"))
        .stderr(predicate::str::contains("3 of 4 URLs are broken"));
    Ok(())
}

#[tokio::test]
async fn check_without_document_is_not_found() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let ws = Workspace::new(&server);

    ws.cmd()
        .args(["check", "-f", "json"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("does not exist"));
    Ok(())
}
