use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use votex_gateway::mocks::MockElection;

use crate::{app, AppStateInner};

const STRANGER: &str = "0x00000000000000000000000000000000000000aa";

fn create_test_server() -> (TestServer, Arc<MockElection>) {
    let election = Arc::new(MockElection::new("Class President"));
    let app_state = Arc::new(AppStateInner::new(election.clone()));
    let server = TestServer::new(app(app_state).into_make_service()).unwrap();
    (server, election)
}

fn address(election: &MockElection) -> String {
    format!("{:?}", election.signer())
}

async fn add_candidates(server: &TestServer, names: &[&str]) {
    for name in names {
        server
            .post("/api/add-candidate")
            .json(&json!({ "name": name }))
            .await
            .assert_status_ok();
    }
}

fn assert_error(status: StatusCode, body: &Value, expected_status: StatusCode, code: &str) {
    assert_eq!(status, expected_status, "unexpected body {}", body);
    assert_eq!(body["code"], code);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn candidates_are_listed_in_order_with_string_votes() {
    let (server, election) = create_test_server();
    let empty = server.get("/api/candidates").await.json::<Value>();
    assert_eq!(empty, json!([]));

    add_candidates(&server, &["Alice", "Bob"]).await;
    election.set_votes(1, 4);

    let candidates = server.get("/api/candidates").await.json::<Value>();
    assert_eq!(
        candidates,
        json!([
            { "id": 0, "name": "Alice", "votes": "0" },
            { "id": 1, "name": "Bob", "votes": "4" },
        ])
    );
}

#[tokio::test]
async fn add_candidate_returns_transaction() {
    let (server, _) = create_test_server();
    let response = server
        .post("/api/add-candidate")
        .json(&json!({ "name": "Alice" }))
        .await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["success"], true);
    assert!(!body["txHash"].as_str().unwrap().is_empty());
    assert_eq!(body["receipt"]["transactionHash"], body["txHash"]);
    assert!(body.get("message").is_none());
}

#[tokio::test]
async fn add_candidate_without_name_is_rejected() {
    let (server, _) = create_test_server();
    let response = server.post("/api/add-candidate").json(&json!({})).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Missing 'name' in body", "code": "MISSING_FIELD" })
    );

    let response = server.post("/api/add-candidate").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "MISSING_FIELD");
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let (server, _) = create_test_server();
    let response = server
        .post("/api/add-candidate")
        .bytes("{\"name\":".into())
        .content_type("application/json")
        .await;
    let status = response.status_code();
    assert_error(status, &response.json::<Value>(), StatusCode::BAD_REQUEST, "INVALID_INPUT");
}

#[tokio::test]
async fn contract_reverts_are_classified() {
    let (server, _) = create_test_server();
    add_candidates(&server, &["Alice"]).await;

    let response = server
        .post("/api/add-candidate")
        .json(&json!({ "name": "Alice" }))
        .await;
    let body = response.json::<Value>();
    assert_error(
        response.status_code(),
        &body,
        StatusCode::INTERNAL_SERVER_ERROR,
        "DUPLICATE_CANDIDATE",
    );
    assert_eq!(body["error"], "Candidate already exists");
}

#[tokio::test]
async fn authorize_validates_address() {
    let (server, _) = create_test_server();

    let response = server.post("/api/authorize").json(&json!({})).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Missing 'address' in body");

    let response = server
        .post("/api/authorize")
        .json(&json!({ "address": "0x1234" }))
        .await;
    let status = response.status_code();
    assert_error(status, &response.json::<Value>(), StatusCode::BAD_REQUEST, "INVALID_ADDRESS");

    server
        .post("/api/authorize")
        .json(&json!({ "address": STRANGER }))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/authorize")
        .json(&json!({ "address": STRANGER }))
        .await;
    let status = response.status_code();
    assert_error(
        status,
        &response.json::<Value>(),
        StatusCode::INTERNAL_SERVER_ERROR,
        "ALREADY_AUTHORIZED",
    );
}

#[tokio::test]
async fn unauthorized_voter_is_forbidden_and_nothing_changes() {
    let (server, _) = create_test_server();
    add_candidates(&server, &["Alice"]).await;

    let response = server
        .post("/api/vote")
        .json(&json!({ "candidateIndex": 0, "voterAddress": STRANGER }))
        .await;
    let body = response.json::<Value>();
    assert_error(
        response.status_code(),
        &body,
        StatusCode::FORBIDDEN,
        "VOTER_NOT_AUTHORIZED",
    );
    assert_eq!(body["error"], "Voter not authorized");

    let results = server.get("/api/results").await.json::<Value>();
    assert_eq!(results["totalVotes"], "0");
}

#[tokio::test]
async fn authorized_voter_votes_exactly_once() {
    let (server, election) = create_test_server();
    let voter = address(&election);
    add_candidates(&server, &["Alice", "Bob"]).await;
    server
        .post("/api/authorize")
        .json(&json!({ "address": voter }))
        .await
        .assert_status_ok();

    let has_voted = server
        .get(&format!("/api/has-voted/{}", voter))
        .await
        .json::<Value>();
    assert_eq!(has_voted["voted"], false);

    let response = server
        .post("/api/vote")
        .json(&json!({ "candidateIndex": 1, "voterAddress": voter }))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Vote cast successfully");

    let response = server
        .post("/api/vote")
        .json(&json!({ "candidateIndex": 1, "voterAddress": voter }))
        .await;
    let body = response.json::<Value>();
    assert_error(response.status_code(), &body, StatusCode::FORBIDDEN, "ALREADY_VOTED");
    assert_eq!(body["error"], "Voter has already voted");

    let has_voted = server
        .get(&format!("/api/has-voted/{}", voter))
        .await
        .json::<Value>();
    assert_eq!(has_voted["voted"], true);

    let results = server.get("/api/results").await.json::<Value>();
    assert_eq!(results["totalVotes"], "1");
    assert_eq!(results["winner"], "Bob");
}

#[tokio::test]
async fn voting_after_the_end_is_forbidden() {
    let (server, election) = create_test_server();
    let voter = address(&election);
    add_candidates(&server, &["Alice"]).await;
    server
        .post("/api/authorize")
        .json(&json!({ "address": voter }))
        .await
        .assert_status_ok();
    server.post("/api/end").await.assert_status_ok();

    let response = server
        .post("/api/vote")
        .json(&json!({ "candidateIndex": 0, "voterAddress": voter }))
        .await;
    let body = response.json::<Value>();
    assert_error(response.status_code(), &body, StatusCode::FORBIDDEN, "ELECTION_ENDED");
    assert_eq!(body["error"], "Election has ended");
}

#[tokio::test]
async fn vote_requires_both_fields() {
    let (server, election) = create_test_server();
    for body in [
        json!({}),
        json!({ "candidateIndex": 0 }),
        json!({ "voterAddress": address(&election) }),
    ] {
        let response = server.post("/api/vote").json(&body).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>(),
            json!({ "error": "Missing candidateIndex or voterAddress", "code": "MISSING_FIELD" })
        );
    }
}

#[tokio::test]
async fn results_pick_first_candidate_with_most_votes() {
    let (server, election) = create_test_server();
    let results = server.get("/api/results").await.json::<Value>();
    assert_eq!(
        results,
        json!({ "totalVotes": "0", "candidates": [], "winner": null })
    );

    add_candidates(&server, &["Alice", "Bob", "Carol"]).await;
    election.set_votes(0, 3);
    election.set_votes(1, 5);
    election.set_votes(2, 5);

    let results = server.get("/api/results").await.json::<Value>();
    assert_eq!(results["totalVotes"], "13");
    assert_eq!(results["winner"], "Bob");
    assert_eq!(
        results["candidates"][2],
        json!({ "index": 2, "name": "Carol", "votes": "5" })
    );
}

#[tokio::test]
async fn status_reports_contract_state() {
    let (server, election) = create_test_server();
    let status = server.get("/api/status").await.json::<Value>();
    assert_eq!(
        status,
        json!({
            "owner": address(&election),
            "electionName": "Class President",
            "electionEnded": false,
            "totalVotes": "0",
            "electionRound": "1",
            "restartPasswordSet": false,
        })
    );
}

#[tokio::test]
async fn restart_with_wrong_password_is_forbidden() {
    let (server, _) = create_test_server();
    add_candidates(&server, &["Alice"]).await;

    let response = server.post("/api/restart").json(&json!({})).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Missing 'password' in body");

    server.post("/api/end").await.assert_status_ok();
    let response = server
        .post("/api/set-restart-password")
        .json(&json!({ "password": "secret1" }))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["message"],
        "Restart password updated successfully"
    );

    let response = server
        .post("/api/restart")
        .json(&json!({ "password": "wrong-one" }))
        .await;
    let status = response.status_code();
    assert_error(status, &response.json::<Value>(), StatusCode::FORBIDDEN, "RESTART_REJECTED");

    let response = server
        .post("/api/restart")
        .json(&json!({ "password": "secret1" }))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["message"],
        "Election restarted successfully"
    );

    let status = server.get("/api/status").await.json::<Value>();
    assert_eq!(status["electionRound"], "2");
    assert_eq!(status["electionEnded"], false);
    assert_eq!(status["restartPasswordSet"], true);
    let candidates = server.get("/api/candidates").await.json::<Value>();
    assert_eq!(candidates, json!([]));
}

#[tokio::test]
async fn restart_while_active_is_forbidden() {
    let (server, _) = create_test_server();
    let response = server
        .post("/api/restart")
        .json(&json!({ "password": "secret1" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn has_voted_needs_an_address() {
    let (server, _) = create_test_server();
    for path in ["/api/has-voted", "/api/has-voted/"] {
        let response = server.get(path).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>(),
            json!({ "error": "Missing address param", "code": "MISSING_FIELD" })
        );
    }

    let response = server.get("/api/has-voted/not-an-address").await;
    let status = response.status_code();
    assert_error(status, &response.json::<Value>(), StatusCode::BAD_REQUEST, "INVALID_ADDRESS");

    let response = server.get(&format!("/api/has-voted/{}", STRANGER)).await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({ "address": STRANGER, "voted": false })
    );
}

#[tokio::test]
async fn node_failures_are_internal_errors() {
    let (server, election) = create_test_server();
    election.go_offline();

    for path in ["/api/candidates", "/api/status", "/api/results"] {
        let response = server.get(path).await;
        let body = response.json::<Value>();
        assert_error(
            response.status_code(),
            &body,
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL",
        );
        assert_eq!(body["error"], votex_gateway::mocks::OFFLINE_MESSAGE);
    }

    let response = server.post("/api/end").await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}
