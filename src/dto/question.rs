use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::dao::models::{NewQuestion, Question};

/// Payload used to add a question to the bank.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateQuestionRequest {
    /// Category the question is filed under.
    pub category: String,
    /// The question text read to players.
    #[validate(length(min = 1, message = "question text must not be empty"))]
    pub text: String,
    /// Expected answer.
    #[validate(length(min = 1, message = "answer must not be empty"))]
    pub answer: String,
    /// Ordered multiple-choice options.
    #[validate(length(min = 2, max = 6, message = "expected between 2 and 6 choices"))]
    pub choices: Vec<String>,
    /// Points awarded for a correct answer.
    #[validate(range(min = 1, max = 1000, message = "points must be between 1 and 1000"))]
    pub points: u32,
}

impl From<CreateQuestionRequest> for NewQuestion {
    fn from(request: CreateQuestionRequest) -> Self {
        Self {
            category: request.category,
            text: request.text,
            answer: request.answer,
            choices: request.choices,
            points: request.points,
        }
    }
}

/// Public projection of a stored question.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuestionSummary {
    /// Identifier of the question.
    pub id: Uuid,
    /// Category the question is filed under.
    pub category: String,
    /// The question text.
    pub text: String,
    /// Expected answer.
    pub answer: String,
    /// Ordered multiple-choice options.
    pub choices: Vec<String>,
    /// Points awarded for a correct answer.
    pub points: u32,
}

impl From<Question> for QuestionSummary {
    fn from(question: Question) -> Self {
        Self {
            id: question.id,
            category: question.category,
            text: question.text,
            answer: question.answer,
            choices: question.choices,
            points: question.points,
        }
    }
}

/// Acknowledgement returned by the delete route; deletion always succeeds.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteQuestionResponse {
    /// Always true: deleting an unknown id is a no-op, not an error.
    pub success: bool,
}
