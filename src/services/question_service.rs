use tracing::info;
use uuid::Uuid;

use crate::{
    dto::question::{CreateQuestionRequest, DeleteQuestionResponse, QuestionSummary},
    error::ServiceError,
    state::SharedState,
};

/// The whole question bank, in insertion order.
pub async fn list_questions(state: &SharedState) -> Vec<QuestionSummary> {
    state
        .store()
        .questions()
        .await
        .into_iter()
        .map(Into::into)
        .collect()
}

/// Add a question to the bank after store-side validation.
pub async fn add_question(
    state: &SharedState,
    request: CreateQuestionRequest,
) -> Result<QuestionSummary, ServiceError> {
    let question = state.store().add_question(request.into()).await?;
    info!(question_id = %question.id, category = %question.category, "question added");
    Ok(question.into())
}

/// Remove a question by id. Always reports success; deleting an id that does
/// not exist is a no-op.
pub async fn delete_question(state: &SharedState, id: Uuid) -> DeleteQuestionResponse {
    let removed = state.store().delete_question(id).await;
    if removed {
        info!(question_id = %id, "question deleted");
    }
    DeleteQuestionResponse { success: true }
}
