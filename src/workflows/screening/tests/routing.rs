use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::workflows::screening::router::{
    begin_final_handler, rank_handler, session_handler, verbal_answer_handler, RankRequest,
    VerbalAnswerRequest,
};
use crate::workflows::screening::{screening_router, ScreeningService};

type TestService = ScreeningService<MemoryNotifier, ScriptedSpeech, StaticQuestions>;

fn arc_service() -> Arc<TestService> {
    let (service, _notifier, _speech) = build_service();
    Arc::new(service)
}

fn arc_ranked_service() -> Arc<TestService> {
    let (service, _notifier, _speech) = ranked_service();
    Arc::new(service)
}

async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[tokio::test]
async fn rank_handler_rejects_an_empty_pool() {
    let service = arc_service();

    let response = rank_handler::<MemoryNotifier, ScriptedSpeech, StaticQuestions>(
        State(service),
        axum::Json(RankRequest {
            requirement_label: "Python Developer".to_string(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rank_handler_returns_the_ordered_ranking() {
    let service = arc_ranked_service();

    let response = rank_handler::<MemoryNotifier, ScriptedSpeech, StaticQuestions>(
        State(service),
        axum::Json(RankRequest {
            requirement_label: "Python Developer".to_string(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["requirement_label"], "Python Developer");
    assert_eq!(body["ranked"][0]["candidate_id"], "A.pdf");
    assert_eq!(body["ranked"][0]["eligible"], true);
    assert_eq!(body["ranked"][1]["eligible"], false);
}

#[tokio::test]
async fn session_handler_returns_not_found_for_unknown_candidates() {
    let service = arc_ranked_service();

    let response = session_handler::<MemoryNotifier, ScriptedSpeech, StaticQuestions>(
        State(service),
        Path("missing.pdf".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn null_transcript_maps_to_unprocessable_entity() {
    let service = arc_ranked_service();
    service
        .begin_verbal_check("A.pdf")
        .expect("verbal check opens");

    let response = verbal_answer_handler::<MemoryNotifier, ScriptedSpeech, StaticQuestions>(
        State(service.clone()),
        Path("A.pdf".to_string()),
        axum::Json(VerbalAnswerRequest { transcript: None }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    // The failed transcription must not move the stage.
    let view = service.session("A.pdf").expect("session exists");
    assert_eq!(view.stage, "verbal_pending");
}

#[tokio::test]
async fn skipping_to_the_final_stage_maps_to_conflict() {
    let service = arc_ranked_service();

    let response = begin_final_handler::<MemoryNotifier, ScriptedSpeech, StaticQuestions>(
        State(service),
        Path("A.pdf".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn documents_endpoint_loads_a_pool_over_http() {
    let app = screening_router(arc_service());

    let load = Request::builder()
        .method("POST")
        .uri("/api/v1/screening/documents")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "A.pdf": "python sql apis",
                "B.pdf": "html css javascript"
            })
            .to_string(),
        ))
        .expect("request builds");

    let response = app.clone().oneshot(load).await.expect("router responds");
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = read_json_body(response).await;
    assert_eq!(body["loaded"], 2);

    let rank = Request::builder()
        .method("POST")
        .uri("/api/v1/screening/rank")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "requirement_label": "Python Developer" }).to_string(),
        ))
        .expect("request builds");

    let response = app.oneshot(rank).await.expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["ranked"].as_array().map(Vec::len), Some(2));
}
