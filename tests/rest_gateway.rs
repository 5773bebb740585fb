//! Contract tests of the PostgREST gateway, against a mocked HTTP server

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use task_board::config::GatewayConfig;
use task_board::gateway::RestGateway;
use task_board::traits::TaskGateway;
use task_board::views;
use task_board::{Deadline, NewTask, TaskBoard, TaskId};

const KEY: &str = "test-anon-key";

fn gateway_for(server: &MockServer) -> RestGateway {
    let config = GatewayConfig::new(server.uri(), KEY).unwrap();
    RestGateway::new(config).unwrap()
}

#[tokio::test]
async fn list_all_requests_ordered_rows() {
    let _ = env_logger::builder().is_test(true).try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/tasks"))
        .and(query_param("select", "*"))
        .and(query_param("order", "deadline.asc"))
        .and(header("apikey", KEY))
        .and(header("authorization", "Bearer test-anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "text": "Water plants", "deadline": "2024-06-01T09:00", "completed": false},
            {"id": 2, "text": "Pay rent", "deadline": "2024-06-02T23:59:00", "completed": true},
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let tasks = gateway_for(&server).list_all().await.unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id(), &TaskId::from("1"));
    assert_eq!(tasks[1].date(), "2024-06-02");
    assert!(tasks[1].completed());
}

#[tokio::test]
async fn rows_without_deadline_still_load() {
    let _ = env_logger::builder().is_test(true).try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "text": "no deadline", "deadline": null, "completed": false},
            {"id": 2, "text": "Pay rent", "deadline": "2024-06-02T23:59", "completed": false},
            {"id": 3, "text": "no deadline key", "completed": false},
        ])))
        .mount(&server)
        .await;

    let mut board = TaskBoard::new(gateway_for(&server));
    assert_eq!(board.load().await.unwrap(), 3);
    assert_eq!(board.active_dates(), vec!["2024-06-02"]);

    let undated = &board.tasks()[0];
    assert_eq!(undated.due(), None);
    assert!(board.is_overdue(undated) == false);
    assert!(board.is_overdue(&board.tasks()[2]) == false);
    // 2024-06-02 is long gone
    assert!(board.is_overdue(&board.tasks()[1]));
}

#[tokio::test]
async fn insert_returns_the_persisted_row() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/tasks"))
        .and(header("prefer", "return=representation"))
        .and(body_json(json!([
            {"text": "Buy milk", "deadline": "2024-06-01T23:59", "completed": false}
        ])))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            {"id": "42", "text": "Buy milk", "deadline": "2024-06-01T23:59", "completed": false}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let created = gateway_for(&server)
        .insert(NewTask::new("Buy milk", Deadline::from("2024-06-01T23:59")))
        .await
        .unwrap();
    assert_eq!(created.id().as_str(), "42");
}

#[tokio::test]
async fn set_completed_patches_one_row() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/tasks"))
        .and(query_param("id", "eq.7"))
        .and(body_json(json!({"completed": true})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    gateway_for(&server).set_completed(&TaskId::from("7"), true).await.unwrap();
}

#[tokio::test]
async fn deletes_by_id_and_by_id_set() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/tasks"))
        .and(query_param("id", "eq.7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/tasks"))
        .and(query_param("id", "in.(1,2,3)"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    gateway.delete_by_id(&TaskId::from("7")).await.unwrap();
    gateway.delete_by_ids(&[TaskId::from("1"), TaskId::from("2"), TaskId::from("3")]).await.unwrap();
}

#[tokio::test]
async fn http_errors_are_store_errors() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"message":"Invalid API key"}"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("this is not json"))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let err = gateway.set_completed(&TaskId::from("1"), true).await.unwrap_err();
    assert!(err.message().contains("401"));
    assert!(err.message().contains("Invalid API key"));

    assert!(gateway.list_all().await.is_err());
}

#[tokio::test]
async fn add_task_round_trip() {
    let _ = env_logger::builder().is_test(true).try_init();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/tasks"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            {"id": "42", "text": "Buy milk", "deadline": "2024-06-01T23:59", "completed": false}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut board = TaskBoard::new(gateway_for(&server));
    board.load().await.unwrap();
    board.select_date("2024-06-01");
    board.set_draft_text("Buy milk");

    let id = board.add_task().await.unwrap();
    assert_eq!(id, Some(TaskId::from("42")));
    assert_eq!(board.tasks().len(), 1);
    let task = &board.tasks()[0];
    assert_eq!(task.text(), "Buy milk");
    assert_eq!(task.deadline().as_str(), "2024-06-01T23:59");
    assert_eq!(task.completed(), false);
    assert!(views::active_dates(board.tasks()).contains(&"2024-06-01".to_string()));
}
