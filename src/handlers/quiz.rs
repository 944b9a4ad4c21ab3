//! Quiz Handlers

use axum::{
    extract::{Path, State},
    response::Json,
};
use rand::{rngs::StdRng, SeedableRng};
use std::time::Instant;
use tracing::info;

use super::router::AppState;
use super::types::{QuizRequest, QuizResponse};
use crate::errors::{AppError, ValidationErrorExt};
use crate::storage::StoredQuiz;
use crate::validation;

fn quiz_response(quiz: StoredQuiz) -> QuizResponse {
    QuizResponse {
        document_id: quiz.document_id,
        quiz_id: quiz.quiz_id,
        total_questions: quiz.questions.len(),
        questions: quiz.questions,
        difficulty: quiz.difficulty,
        source: quiz.source,
        created_at: quiz.created_at,
    }
}

/// POST /quiz/generate
pub async fn generate(
    State(state): State<AppState>,
    Json(req): Json<QuizRequest>,
) -> Result<Json<QuizResponse>, AppError> {
    let start = Instant::now();

    validation::validate_num_questions(req.num_questions).map_validation_err("num_questions")?;
    if !req.question_types.any() {
        return Err(AppError::InvalidInput {
            field: "question_types".to_string(),
            reason: "at least one question type must be selected".to_string(),
        });
    }
    let doc = state.load_document(&req.document_id)?;

    let mut rng = StdRng::from_entropy();
    let generated = state
        .engine
        .generate_quiz(
            &doc.extracted_text,
            req.question_types,
            req.num_questions,
            req.difficulty,
            &mut rng,
        )
        .await;

    if generated.value.is_empty() {
        return Err(AppError::InvalidInput {
            field: "document_id".to_string(),
            reason: "could not generate questions from this document".to_string(),
        });
    }

    let quiz = StoredQuiz {
        quiz_id: uuid::Uuid::new_v4().to_string(),
        document_id: doc.id,
        questions: generated.value,
        difficulty: req.difficulty,
        source: generated.source,
        created_at: chrono::Utc::now(),
    };
    state.store.put_quiz(&quiz)?;

    info!(
        document_id = %quiz.document_id,
        quiz_id = %quiz.quiz_id,
        questions = quiz.questions.len(),
        source = quiz.source.as_str(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Quiz generated"
    );

    Ok(Json(quiz_response(quiz)))
}

/// GET /quiz/{quiz_id}
pub async fn get_quiz(
    State(state): State<AppState>,
    Path(quiz_id): Path<String>,
) -> Result<Json<QuizResponse>, AppError> {
    validation::validate_id(&quiz_id).map_validation_err("quiz_id")?;

    let quiz = state
        .store
        .get_quiz(&quiz_id)?
        .ok_or(AppError::QuizNotFound(quiz_id))?;

    Ok(Json(quiz_response(quiz)))
}

#[cfg(test)]
mod tests {
    use super::super::test_helpers::*;
    use axum::http::StatusCode;
    use serde_json::json;

    const TEXT: &str = "Photosynthesis is the process plants use to make food from sunlight. \
        Chlorophyll is the green pigment that captures light energy in leaves. \
        About 70 percent of the oxygen on Earth is made by ocean plants. \
        Plants are important because they produce oxygen for animals. \
        The roots of a plant can absorb water and minerals from the soil.";

    #[tokio::test]
    async fn test_generate_and_fetch_quiz() {
        let h = TestHarness::new();
        let id = h.upload_text("bio.txt", TEXT).await;
        let req = json!({
            "document_id": id,
            "question_types": { "mcq": true, "true_false": true, "short_answer": true },
            "num_questions": 3
        });

        let (status, body) = send(h.router(), post_json("/quiz/generate", &req)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "rule_based");
        assert_eq!(body["difficulty"], "medium");
        assert_eq!(body["total_questions"], 3);
        let questions = body["questions"].as_array().unwrap();
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[0]["question_type"], "mcq");
        assert_eq!(questions[0]["options"].as_array().unwrap().len(), 4);

        let quiz_id = body["quiz_id"].as_str().unwrap();
        let (status, stored) = send(h.router(), get(&format!("/quiz/{quiz_id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stored["questions"], body["questions"]);
    }

    #[tokio::test]
    async fn test_generate_requires_a_question_type() {
        let h = TestHarness::new();
        let id = h.upload_text("bio.txt", TEXT).await;
        let req = json!({
            "document_id": id,
            "question_types": { "mcq": false, "true_false": false, "short_answer": false }
        });
        let (status, body) = send(h.router(), post_json("/quiz/generate", &req)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_generate_validates_count() {
        let h = TestHarness::new();
        let id = h.upload_text("bio.txt", TEXT).await;
        let req = json!({
            "document_id": id,
            "question_types": { "mcq": true },
            "num_questions": 0
        });
        let (status, _) = send(h.router(), post_json("/quiz/generate", &req)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_quiz_is_404() {
        let h = TestHarness::new();
        let (status, body) = send(
            h.router(),
            get(&format!("/quiz/{}", uuid::Uuid::new_v4())),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "QUIZ_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_deleting_document_removes_its_quizzes() {
        let h = TestHarness::new();
        let id = h.upload_text("bio.txt", TEXT).await;
        let req = json!({ "document_id": id, "question_types": { "true_false": true } });
        let (_, body) = send(h.router(), post_json("/quiz/generate", &req)).await;
        let quiz_id = body["quiz_id"].as_str().unwrap().to_string();

        send(h.router(), delete(&format!("/documents/{id}"))).await;
        let (status, _) = send(h.router(), get(&format!("/quiz/{quiz_id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
