use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::question::{CreateQuestionRequest, DeleteQuestionResponse, QuestionSummary},
    error::AppError,
    routes::auth::AuthenticatedUser,
    services::question_service,
    state::SharedState,
};

/// Question bank routes.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/questions", get(list_questions).post(add_question))
        .route("/questions/{id}", delete(delete_question))
}

#[utoipa::path(
    get,
    path = "/questions",
    tag = "questions",
    responses((status = 200, description = "Full question bank", body = [QuestionSummary]))
)]
/// Return every question in the bank, in insertion order.
pub async fn list_questions(State(state): State<SharedState>) -> Json<Vec<QuestionSummary>> {
    Json(question_service::list_questions(&state).await)
}

#[utoipa::path(
    post,
    path = "/questions",
    tag = "questions",
    request_body = CreateQuestionRequest,
    responses(
        (status = 200, description = "Question added", body = QuestionSummary),
        (status = 400, description = "Choice count, point range, or text validation failed"),
        (status = 401, description = "Missing or invalid session credential")
    )
)]
/// Add a question to the bank.
pub async fn add_question(
    State(state): State<SharedState>,
    _session: AuthenticatedUser,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<Json<QuestionSummary>, AppError> {
    payload.validate()?;
    let summary = question_service::add_question(&state, payload).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    delete,
    path = "/questions/{id}",
    tag = "questions",
    params(("id" = Uuid, Path, description = "Identifier of the question to delete")),
    responses(
        (status = 200, description = "Deletion acknowledged", body = DeleteQuestionResponse),
        (status = 401, description = "Missing or invalid session credential")
    )
)]
/// Delete a question. Removing an unknown id still reports success.
pub async fn delete_question(
    State(state): State<SharedState>,
    _session: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Json<DeleteQuestionResponse> {
    Json(question_service::delete_question(&state, id).await)
}
