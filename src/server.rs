use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tokio::{
    net::TcpListener,
    sync::{Mutex, oneshot},
};

use crate::{api, types::Token, warning};

/// Outcome of the OAuth callback, either a token or a message for the user.
pub type CallbackOutcome = Result<Token, String>;

/// State shared with the `/callback` handler for one login attempt.
#[derive(Clone)]
pub struct CallbackState {
    pub code_verifier: String,
    sender: Arc<Mutex<Option<oneshot::Sender<CallbackOutcome>>>>,
}

impl CallbackState {
    pub fn new(code_verifier: String, sender: oneshot::Sender<CallbackOutcome>) -> Self {
        Self {
            code_verifier,
            sender: Arc::new(Mutex::new(Some(sender))),
        }
    }

    /// Delivers the outcome; only the first call has an effect.
    pub async fn complete(&self, outcome: CallbackOutcome) -> bool {
        match self.sender.lock().await.take() {
            Some(sender) => sender.send(outcome).is_ok(),
            None => false,
        }
    }
}

pub fn router(state: CallbackState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)))
}

pub async fn serve(listener: TcpListener, state: CallbackState) {
    if let Err(e) = axum::serve(listener, router(state)).await {
        warning!("Callback server stopped: {}", e);
    }
}
