use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Game Show Back.
#[openapi(
    paths(
        crate::routes::auth::login,
        crate::routes::questions::list_questions,
        crate::routes::questions::add_question,
        crate::routes::questions::delete_question,
        crate::routes::tournaments::create_tournament,
        crate::routes::tournaments::list_tournaments,
        crate::routes::tournaments::get_tournament,
        crate::routes::game::current_round,
        crate::routes::game::start_round,
        crate::routes::game::finish_round,
        crate::routes::game::adjust_timer,
        crate::routes::sse::event_stream,
        crate::routes::health::healthcheck,
    ),
    components(
        schemas(
            crate::dto::auth::LoginRequest,
            crate::dto::auth::LoginResponse,
            crate::dto::question::CreateQuestionRequest,
            crate::dto::question::QuestionSummary,
            crate::dto::question::DeleteQuestionResponse,
            crate::dto::tournament::CreateTournamentRequest,
            crate::dto::tournament::TournamentSummary,
            crate::dto::round::StartRoundRequest,
            crate::dto::round::AdjustTimerRequest,
            crate::dto::round::RoundSnapshot,
            crate::dto::round::RoundPhaseDto,
            crate::dto::round::FinishKindDto,
            crate::dto::sse::RoundStartedEvent,
            crate::dto::sse::TimerUpdateEvent,
            crate::dto::sse::RoundFinishedEvent,
            crate::dto::health::HealthResponse,
        )
    ),
    tags(
        (name = "auth", description = "Organizer authentication"),
        (name = "questions", description = "Question bank management"),
        (name = "tournaments", description = "Tournament management"),
        (name = "game", description = "Round control and timing"),
        (name = "sse", description = "Server-sent events stream"),
        (name = "health", description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
