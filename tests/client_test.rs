use mockito::{Matcher, Server};
use reqwest::StatusCode;
use serde_json::json;

use quiz_service::client::{AnswerStatus, ClientError, DataSource, HttpSource, QuizSession};
use quiz_service::protocol::SubmitAnswer;

fn question_body() -> String {
    json!([{
        "id": 7,
        "stem": "HTTP 200 的含义？",
        "explanation": "200 表示请求成功",
        "options": [
            { "id": 70, "text": "未找到" },
            { "id": 71, "text": "成功" }
        ]
    }])
    .to_string()
}

#[tokio::test]
async fn test_fetch_questions_sends_limit() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/questions")
        .match_query(Matcher::UrlEncoded("limit".into(), "1".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(question_body())
        .create_async()
        .await;

    let source = HttpSource::new(&format!("{}/api", server.url())).unwrap();
    let questions = source.fetch_questions(1).await.unwrap();

    mock.assert_async().await;
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].id, 7);
    assert_eq!(questions[0].options[1].text, "成功");
}

#[tokio::test]
async fn test_submit_answer_posts_camel_case() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/answers")
        .match_body(Matcher::PartialJson(
            json!({ "questionId": 7, "selectedOptionId": 71 }),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({ "correct": true, "correctOptionId": 71, "explanation": "200 表示请求成功" })
                .to_string(),
        )
        .create_async()
        .await;

    let source = HttpSource::new(&format!("{}/api/", server.url())).unwrap();
    let feedback = source
        .submit_answer(SubmitAnswer {
            question_id: 7,
            selected_option_id: 71,
            elapsed_ms: Some(500),
        })
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(feedback.correct);
    assert_eq!(feedback.correct_option_id, Some(71));
}

#[tokio::test]
async fn test_server_error_is_reported() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/questions")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let source = HttpSource::new(&format!("{}/api", server.url())).unwrap();
    let err = source.fetch_questions(1).await.unwrap_err();
    assert!(matches!(err, ClientError::Status(StatusCode::INTERNAL_SERVER_ERROR)));
}

#[tokio::test]
async fn test_session_marks_failed_submission_wrong() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/questions")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(question_body())
        .create_async()
        .await;
    server
        .mock("POST", "/api/answers")
        .with_status(404)
        .with_body(json!({ "error": "Option not found" }).to_string())
        .create_async()
        .await;

    let source = HttpSource::new(&format!("{}/api", server.url())).unwrap();
    let mut session = QuizSession::new(source);
    session.load_next().await;
    assert_eq!(session.question().map(|q| q.id), Some(7));

    let feedback = session.choose(71).await.unwrap();
    assert!(!feedback.correct);
    assert_eq!(feedback.correct_option_id, None);
    assert_eq!(session.status(), AnswerStatus::Wrong);
    assert!(session.error().is_some());
    assert!(!session.has_pending_advance());
}

#[tokio::test]
async fn test_session_load_failure_clears_question() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/questions")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let source = HttpSource::new(&format!("{}/api", server.url())).unwrap();
    let mut session = QuizSession::new(source);
    session.load_next().await;

    assert!(session.question().is_none());
    assert!(session.error().is_some());
    assert!(!session.is_loading());
    assert!(session.choose(1).await.is_none());
}

#[tokio::test]
async fn test_session_reports_elapsed_time() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/questions")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(question_body())
        .create_async()
        .await;
    let answer = server
        .mock("POST", "/api/answers")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({ "questionId": 7, "selectedOptionId": 70 })),
            Matcher::Regex(r#""elapsedMs":[0-9]+"#.to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({ "correct": false, "correctOptionId": 71, "explanation": null }).to_string(),
        )
        .create_async()
        .await;

    let source = HttpSource::new(&format!("{}/api", server.url())).unwrap();
    let mut session = QuizSession::new(source);
    session.load_next().await;
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    let feedback = session.choose(70).await.unwrap();

    answer.assert_async().await;
    assert!(!feedback.correct);
    assert!(session.error().is_none());
}
