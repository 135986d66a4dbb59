use std::time::SystemTime;
use uuid::Uuid;

/// Registered organizer account able to authenticate against the access gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Primary key, allocated by the store and never reused.
    pub id: Uuid,
    /// Login name, unique across the store (case-sensitive).
    pub username: String,
    /// Opaque argon2 hash of the account password.
    pub password_hash: String,
}

/// Tournament owned by an organizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tournament {
    /// Primary key of the tournament.
    pub id: Uuid,
    /// Display name shown to players.
    pub name: String,
    /// Owning user; must exist when the tournament is created and never changes.
    pub owner_user_id: Uuid,
    /// Creation timestamp for auditing/ordering.
    pub created_at: SystemTime,
}

/// Multiple-choice trivia question stored in the question bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Primary key of the question.
    pub id: Uuid,
    /// Category used for themed round draws.
    pub category: String,
    /// The question text read to players.
    pub text: String,
    /// Expected answer. Not checked against `choices` (see [`add_question`]).
    ///
    /// [`add_question`]: crate::dao::entity_store::EntityStore::add_question
    pub answer: String,
    /// Ordered multiple-choice options, between 2 and 6 entries.
    pub choices: Vec<String>,
    /// Points awarded for a correct answer, between 1 and 1000.
    pub points: u32,
}

/// Field set required to insert a new question; the store allocates the id.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    /// Category the question belongs to.
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
