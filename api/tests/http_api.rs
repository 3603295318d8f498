//! Integration tests for the HTTP client against a mock server
//!
//! Covers the envelope unwrapping and error mapping the state layer relies
//! on: bare-array reads, `{data: {item}}` mutations, `resultCode`
//! rejections, and HTTP status mapping.

use boardsync_api::{
    ApiConfig, ApiError, TaskId, TaskPriority, TaskStatus, TaskTransport, TodoApiClient,
    TodolistId, TodolistTransport, UpdateTaskModel,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> TodoApiClient {
    TodoApiClient::new(ApiConfig::new(server.uri(), "test-key"))
}

fn task_body(id: &str, list: &str, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "todoListId": list,
        "title": title,
        "description": null,
        "status": 0,
        "priority": 0,
        "startDate": null,
        "deadline": null,
        "addedDate": "2026-08-01T09:30:00Z",
        "order": 0
    })
}

#[tokio::test]
async fn get_todolists_parses_bare_array_and_sends_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/todo-lists"))
        .and(header("API-KEY", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "lst-1", "title": "What to learn", "addedDate": "2026-08-01T09:30:00Z", "order": 0},
            {"id": "lst-2", "title": "What to buy", "addedDate": "2026-08-02T09:30:00Z", "order": 1}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let todolists = client_for(&server).get_todolists().await.unwrap();

    assert_eq!(todolists.len(), 2);
    assert_eq!(todolists[0].id, TodolistId::from("lst-1"));
    assert_eq!(todolists[1].title, "What to buy");
}

#[tokio::test]
async fn create_todolist_unwraps_item_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/todo-lists"))
        .and(body_json(json!({"title": "Groceries"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resultCode": 0,
            "messages": [],
            "data": {"item": {
                "id": "lst-9",
                "title": "Groceries",
                "addedDate": "2026-08-07T10:00:00Z",
                "order": 2
            }}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let todolist = client_for(&server).create_todolist("Groceries").await.unwrap();

    assert_eq!(todolist.id, TodolistId::from("lst-9"));
    assert_eq!(todolist.title, "Groceries");
}

#[tokio::test]
async fn result_code_rejection_surfaces_messages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/todo-lists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resultCode": 1,
            "messages": ["title too long"],
            "data": {}
        })))
        .mount(&server)
        .await;

    let error = client_for(&server).create_todolist("x".repeat(200).as_str()).await.unwrap_err();

    match error {
        ApiError::Rejected { messages } => assert_eq!(messages, vec!["title too long".to_string()]),
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn unauthorized_maps_to_dedicated_variant() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/todo-lists"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let error = client_for(&server).get_todolists().await.unwrap_err();
    assert!(matches!(error, ApiError::Unauthorized));
}

#[tokio::test]
async fn server_errors_carry_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/todo-lists"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let error = client_for(&server).get_todolists().await.unwrap_err();
    match error {
        ApiError::HttpStatus { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        },
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn get_tasks_unwraps_items() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/todo-lists/lst-1/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [task_body("tsk-1", "lst-1", "CSS"), task_body("tsk-2", "lst-1", "JS")],
            "totalCount": 2,
            "error": null
        })))
        .mount(&server)
        .await;

    let tasks = client_for(&server)
        .get_tasks(&TodolistId::from("lst-1"))
        .await
        .unwrap();

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id, TaskId::from("tsk-1"));
    assert_eq!(tasks[1].title, "JS");
}

#[tokio::test]
async fn update_task_sends_complete_model() {
    let server = MockServer::start().await;

    let model = UpdateTaskModel {
        title: "JS".to_string(),
        description: Some("weekend reading".to_string()),
        status: TaskStatus::Completed,
        priority: TaskPriority::Middle,
        start_date: None,
        deadline: None,
    };

    // the backend demands every field, so the request body must carry them all
    Mock::given(method("PUT"))
        .and(path("/todo-lists/lst-1/tasks/tsk-2"))
        .and(body_json(json!({
            "title": "JS",
            "description": "weekend reading",
            "status": 2,
            "priority": 1,
            "startDate": null,
            "deadline": null
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resultCode": 0,
            "messages": [],
            "data": {"item": {
                "id": "tsk-2",
                "todoListId": "lst-1",
                "title": "JS",
                "description": "weekend reading",
                "status": 2,
                "priority": 1,
                "startDate": null,
                "deadline": null,
                "addedDate": "2026-08-01T09:30:00Z",
                "order": 0
            }}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let task = client_for(&server)
        .update_task(&TodolistId::from("lst-1"), &TaskId::from("tsk-2"), &model)
        .await
        .unwrap();

    assert_eq!(task.status, TaskStatus::Completed);
    assert_eq!(task.description.as_deref(), Some("weekend reading"));
}

#[tokio::test]
async fn delete_task_accepts_empty_data() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/todo-lists/lst-1/tasks/tsk-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resultCode": 0,
            "messages": [],
            "data": {}
        })))
        .mount(&server)
        .await;

    client_for(&server)
        .delete_task(&TodolistId::from("lst-1"), &TaskId::from("tsk-2"))
        .await
        .unwrap();
}
