pub mod countdown;
pub mod round;
mod sse;

use std::sync::Arc;

use tokio::sync::RwLock;

pub use self::sse::SseHub;
use crate::{
    config::AppConfig, dao::entity_store::EntityStore, services::credentials::TokenSigner,
    state::round::RoundSession,
};

/// Cheaply cloneable handle to the application state.
pub type SharedState = Arc<AppState>;

/// Central application state: the authoritative entity store, the current
/// round slot, the credential signer, and the SSE hub.
pub struct AppState {
    config: AppConfig,
    store: EntityStore,
    credentials: TokenSigner,
    current_round: RwLock<Option<RoundSession>>,
    sse: SseHub,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The store starts empty; callers seed it via
    /// [`EntityStore::initialize`] once at startup.
    pub fn new(config: AppConfig) -> SharedState {
        let credentials = TokenSigner::new(&config.token_secret, config.token_ttl);
        Arc::new(Self {
            store: EntityStore::new(),
            credentials,
            current_round: RwLock::new(None),
            sse: SseHub::new(16),
            config,
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The authoritative entity store.
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Signer used to issue and verify session credentials.
    pub fn credentials(&self) -> &TokenSigner {
        &self.credentials
    }

    /// Slot holding the round currently presented, if any.
    ///
    /// At most one round occupies the slot; a finished round stays visible
    /// until the next one replaces it.
    pub fn current_round(&self) -> &RwLock<Option<RoundSession>> {
        &self.current_round
    }

    /// Broadcast hub used for the SSE event stream.
    pub fn events(&self) -> &SseHub {
        &self.sse
    }
}
