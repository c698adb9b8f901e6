use std::collections::HashMap;

use axum::{Extension, extract::Query, response::Html};

use crate::{server::CallbackState, spotify, warning};

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<CallbackState>,
) -> Html<&'static str> {
    if let Some(error) = params.get("error") {
        state
            .complete(Err(format!("Authorization denied: {}", error)))
            .await;
        return Html("<h4>Login cancelled.</h4>");
    }

    let Some(code) = params.get("code") else {
        return Html("<h4>Missing authorization code.</h4>");
    };

    match spotify::auth::exchange_code_pkce(code, &state.code_verifier).await {
        Ok(token) => {
            if state.complete(Ok(token)).await {
                Html("<h2>Authentication successful.</h2><p>You can close this window.</p>")
            } else {
                Html("<h4>Login already completed.</h4>")
            }
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            state.complete(Err(e.to_string())).await;
            Html("<h4>Login failed.</h4>")
        }
    }
}
