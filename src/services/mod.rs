/// Organizer login and password hashing.
pub mod auth_service;
/// Signed session credential issuing and verification.
pub mod credentials;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Question bank operations.
pub mod question_service;
/// Round lifecycle orchestration and timing.
pub mod round_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// Tournament operations.
pub mod tournament_service;
