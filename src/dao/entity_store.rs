use std::collections::HashMap;

use indexmap::IndexMap;
use rand::seq::IndexedRandom;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::dao::models::{NewQuestion, Question, Tournament, User};
use crate::dao::{StoreError, StoreResult};

/// Bounds enforced on [`EntityStore::add_question`] inputs.
pub const MIN_CHOICES: usize = 2;
/// Upper bound on the number of multiple-choice options.
pub const MAX_CHOICES: usize = 6;
/// Lowest allowed point value for a question.
pub const MIN_POINTS: u32 = 1;
/// Highest allowed point value for a question.
pub const MAX_POINTS: u32 = 1000;

/// Authoritative in-process store of users, tournaments, and questions.
///
/// All tables live behind a single [`RwLock`]; every create/delete holds the
/// write guard across its whole check-then-insert sequence so concurrent
/// callers can never both observe a key as absent. Read operations return
/// cloned records; mutating a returned value never affects stored state.
pub struct EntityStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    users: IndexMap<Uuid, User>,
    /// Uniqueness index over `users`, keyed by exact (case-sensitive) username.
    usernames: HashMap<String, Uuid>,
    tournaments: IndexMap<Uuid, Tournament>,
    questions: IndexMap<Uuid, Question>,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    /// Construct an empty store. Seeding happens separately via [`Self::initialize`].
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }

    /// Seed the store with the administrative account and, when the question
    /// table is empty, the built-in demo question bank.
    ///
    /// Idempotent: repeated calls leave an already-seeded store untouched.
    pub async fn initialize(&self, admin_username: &str, admin_password_hash: &str) {
        let mut tables = self.tables.write().await;

        if !tables.usernames.contains_key(admin_username) {
            let id = Uuid::new_v4();
            tables.usernames.insert(admin_username.to_owned(), id);
            tables.users.insert(
                id,
                User {
                    id,
                    username: admin_username.to_owned(),
                    password_hash: admin_password_hash.to_owned(),
                },
            );
            info!(username = admin_username, "seeded administrative user");
        }

        if tables.questions.is_empty() {
            for question in default_question_bank() {
                let id = Uuid::new_v4();
                tables.questions.insert(
                    id,
                    Question {
                        id,
                        category: question.category,
                        text: question.text,
                        answer: question.answer,
                        choices: question.choices,
                        points: question.points,
                    },
                );
            }
            info!(count = tables.questions.len(), "seeded demo question bank");
        }
    }

    /// Insert a new user, failing when the username is already taken.
    pub async fn create_user(&self, username: &str, password_hash: &str) -> StoreResult<User> {
        let mut tables = self.tables.write().await;

        if let Some(existing_id) = tables.usernames.get(username) {
            // The index and the primary table must agree; a dangling index
            // entry means the store is no longer trustworthy.
            if !tables.users.contains_key(existing_id) {
                return Err(StoreError::Corrupted(format!(
                    "username index references missing user `{existing_id}`"
                )));
            }
            return Err(StoreError::Duplicate {
                field: "username",
                value: username.to_owned(),
            });
        }

        let id = Uuid::new_v4();
        let user = User {
            id,
            username: username.to_owned(),
            password_hash: password_hash.to_owned(),
        };
        tables.usernames.insert(username.to_owned(), id);
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    /// Look up a user by exact username.
    pub async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        let Some(id) = tables.usernames.get(username) else {
            return Ok(None);
        };
        match tables.users.get(id) {
            Some(user) => Ok(Some(user.clone())),
            None => Err(StoreError::Corrupted(format!(
                "username index references missing user `{id}`"
            ))),
        }
    }

    /// Look up a user by id.
    pub async fn find_user(&self, id: Uuid) -> Option<User> {
        self.tables.read().await.users.get(&id).cloned()
    }

    /// Insert a new tournament owned by an existing user.
    pub async fn create_tournament(
        &self,
        name: &str,
        owner_user_id: Uuid,
    ) -> StoreResult<Tournament> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&owner_user_id) {
            return Err(StoreError::NotFound {
                entity: "user",
                id: owner_user_id.to_string(),
            });
        }

        let tournament = Tournament {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            owner_user_id,
            created_at: std::time::SystemTime::now(),
        };
        tables.tournaments.insert(tournament.id, tournament.clone());
        Ok(tournament)
    }

    /// All tournaments in insertion order.
    pub async fn list_tournaments(&self) -> Vec<Tournament> {
        self.tables.read().await.tournaments.values().cloned().collect()
    }

    /// Look up a tournament by id.
    pub async fn get_tournament(&self, id: Uuid) -> Option<Tournament> {
        self.tables.read().await.tournaments.get(&id).cloned()
    }

    /// Insert a new question after validating its shape.
    ///
    /// `answer` is deliberately not checked for membership in `choices`.
    pub async fn add_question(&self, question: NewQuestion) -> StoreResult<Question> {
        if question.text.trim().is_empty() {
            return Err(StoreError::Invalid {
                field: "text",
                constraint: "must not be empty".into(),
            });
        }
        if !(MIN_CHOICES..=MAX_CHOICES).contains(&question.choices.len()) {
            return Err(StoreError::Invalid {
                field: "choices",
                constraint: format!(
                    "expected between {MIN_CHOICES} and {MAX_CHOICES} entries, got {}",
                    question.choices.len()
                ),
            });
        }
        if !(MIN_POINTS..=MAX_POINTS).contains(&question.points) {
            return Err(StoreError::Invalid {
                field: "points",
                constraint: format!(
                    "expected a value between {MIN_POINTS} and {MAX_POINTS}, got {}",
                    question.points
                ),
            });
        }

        let mut tables = self.tables.write().await;
        let id = Uuid::new_v4();
        let question = Question {
            id,
            category: question.category,
            text: question.text,
            answer: question.answer,
            choices: question.choices,
            points: question.points,
        };
        tables.questions.insert(id, question.clone());
        Ok(question)
    }

    /// Remove a question by id. Deleting an unknown id is a no-op; the
    /// operation always reports success.
    pub async fn delete_question(&self, id: Uuid) -> bool {
        self.tables.write().await.questions.shift_remove(&id).is_some()
    }

    /// All questions in insertion order.
    pub async fn questions(&self) -> Vec<Question> {
        self.tables.read().await.questions.values().cloned().collect()
    }

    /// Look up a question by id.
    pub async fn get_question(&self, id: Uuid) -> Option<Question> {
        self.tables.read().await.questions.get(&id).cloned()
    }

    /// Draw a random question from the whole bank.
    pub async fn random_question(&self) -> Option<Question> {
        let tables = self.tables.read().await;
        let ids: Vec<Uuid> = tables.questions.keys().copied().collect();
        let id = ids.choose(&mut rand::rng())?;
        tables.questions.get(id).cloned()
    }

    /// Draw a random question from a category, falling back to the whole bank
    /// when the category holds no questions.
    pub async fn random_question_in_category(&self, category: &str) -> Option<Question> {
        {
            let tables = self.tables.read().await;
            let ids: Vec<Uuid> = tables
                .questions
                .iter()
                .filter(|(_, q)| q.category == category)
                .map(|(id, _)| *id)
                .collect();
            if let Some(id) = ids.choose(&mut rand::rng()) {
                return tables.questions.get(id).cloned();
            }
        }
        self.random_question().await
    }
}

/// Demo question bank installed when the store starts empty.
fn default_question_bank() -> Vec<NewQuestion> {
    fn q(category: &str, text: &str, answer: &str, choices: &[&str], points: u32) -> NewQuestion {
        NewQuestion {
            category: category.into(),
            text: text.into(),
            answer: answer.into(),
            choices: choices.iter().map(|c| (*c).into()).collect(),
            points,
        }
    }

    vec![
        q(
            "General",
            "What is the capital of France?",
            "Paris",
            &["London", "Paris", "Berlin", "Madrid"],
            100,
        ),
        q(
            "General",
            "How many continents are there?",
            "7",
            &["5", "6", "7", "8"],
            100,
        ),
        q(
            "Music",
            "Who is known as the King of Pop?",
            "Michael Jackson",
            &["Elvis Presley", "Michael Jackson", "Prince", "Madonna"],
            150,
        ),
        q(
            "Movies",
            "Who directed 'Jurassic Park'?",
            "Steven Spielberg",
            &[
                "James Cameron",
                "Steven Spielberg",
                "George Lucas",
                "Peter Jackson",
            ],
            200,
        ),
        q(
            "Science",
            "What is the chemical symbol for Gold?",
            "Au",
            &["Go", "Au", "Gd", "Ag"],
            250,
        ),
        q(
            "History",
            "In which year did World War II end?",
            "1945",
            &["1943", "1944", "1945", "1946"],
            300,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn sample_question() -> NewQuestion {
        NewQuestion {
            category: "General".into(),
            text: "What is the capital of France?".into(),
            answer: "Paris".into(),
            choices: vec!["London".into(), "Paris".into()],
            points: 100,
        }
    }

    #[tokio::test]
    async fn duplicate_usernames_are_rejected() {
        let store = EntityStore::new();
        store.create_user("admin", "hash-a").await.unwrap();

        let err = store.create_user("admin", "hash-b").await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Duplicate {
                field: "username",
                ..
            }
        ));

        // Case-sensitive: a different casing is a different username.
        store.create_user("Admin", "hash-c").await.unwrap();
    }

    #[tokio::test]
    async fn concurrent_user_creation_yields_one_winner() {
        let store = Arc::new(EntityStore::new());

        let a = tokio::spawn({
            let store = store.clone();
            async move { store.create_user("admin", "hash-a").await }
        });
        let b = tokio::spawn({
            let store = store.clone();
            async move { store.create_user("admin", "hash-b").await }
        });

        let results = [a.await.unwrap(), b.await.unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        let duplicates = results
            .iter()
            .filter(|r| matches!(r, Err(StoreError::Duplicate { .. })))
            .count();
        assert_eq!(successes, 1);
        assert_eq!(duplicates, 1);
    }

    #[tokio::test]
    async fn tournament_requires_existing_owner() {
        let store = EntityStore::new();

        let err = store
            .create_tournament("Cup", Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "user", .. }));

        let owner = store.create_user("host", "hash").await.unwrap();
        let tournament = store.create_tournament("Cup", owner.id).await.unwrap();
        assert_eq!(tournament.owner_user_id, owner.id);
        assert_eq!(tournament.name, "Cup");
    }

    #[tokio::test]
    async fn tournaments_list_in_insertion_order() {
        let store = EntityStore::new();
        let owner = store.create_user("host", "hash").await.unwrap();

        for name in ["First", "Second", "Third"] {
            store.create_tournament(name, owner.id).await.unwrap();
        }

        let names: Vec<String> = store
            .list_tournaments()
            .await
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, ["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn question_validation_boundaries() {
        let store = EntityStore::new();

        // Choice count: 2 and 6 pass, 1 and 7 fail.
        for count in [2usize, 6] {
            let mut question = sample_question();
            question.choices = (0..count).map(|i| format!("choice-{i}")).collect();
            store.add_question(question).await.unwrap();
        }
        for count in [1usize, 7] {
            let mut question = sample_question();
            question.choices = (0..count).map(|i| format!("choice-{i}")).collect();
            let err = store.add_question(question).await.unwrap_err();
            assert!(matches!(err, StoreError::Invalid { field: "choices", .. }));
        }

        // Points: 1 and 1000 pass, 0 and 1001 fail.
        for points in [1u32, 1000] {
            let mut question = sample_question();
            question.points = points;
            store.add_question(question).await.unwrap();
        }
        for points in [0u32, 1001] {
            let mut question = sample_question();
            question.points = points;
            let err = store.add_question(question).await.unwrap_err();
            assert!(matches!(err, StoreError::Invalid { field: "points", .. }));
        }

        let mut question = sample_question();
        question.text = "   ".into();
        let err = store.add_question(question).await.unwrap_err();
        assert!(matches!(err, StoreError::Invalid { field: "text", .. }));
    }

    #[tokio::test]
    async fn question_deletion_is_idempotent() {
        let store = EntityStore::new();
        let question = store.add_question(sample_question()).await.unwrap();

        assert!(store.delete_question(question.id).await);
        assert!(!store.delete_question(question.id).await);
        assert!(!store.delete_question(Uuid::new_v4()).await);
    }

    #[tokio::test]
    async fn reads_return_defensive_copies() {
        let store = EntityStore::new();
        let created = store.add_question(sample_question()).await.unwrap();

        let mut fetched = store.get_question(created.id).await.unwrap();
        fetched.choices.push("tampered".into());
        fetched.points = 999;

        let stored = store.get_question(created.id).await.unwrap();
        assert_eq!(stored, created);
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let store = EntityStore::new();
        store.initialize("admin", "hash").await;

        let users_before = store.find_user_by_username("admin").await.unwrap();
        let questions_before = store.questions().await.len();
        assert!(users_before.is_some());
        assert!(questions_before > 0);

        store.initialize("admin", "other-hash").await;

        let admin = store.find_user_by_username("admin").await.unwrap().unwrap();
        assert_eq!(admin.password_hash, "hash");
        assert_eq!(store.questions().await.len(), questions_before);
    }

    #[tokio::test]
    async fn random_category_draw_falls_back_to_full_bank() {
        let store = EntityStore::new();
        let question = store.add_question(sample_question()).await.unwrap();

        let drawn = store.random_question_in_category("General").await.unwrap();
        assert_eq!(drawn.id, question.id);

        // Unknown category falls back to any question rather than none.
        let fallback = store.random_question_in_category("Sports").await.unwrap();
        assert_eq!(fallback.id, question.id);
    }
}
