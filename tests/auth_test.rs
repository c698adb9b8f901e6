use chrono::Utc;
use tempfile::TempDir;
use tokio::sync::oneshot;
use tunecraft::{
    management::TokenManager,
    server::CallbackState,
    types::Token,
};

fn create_test_token(expires_in: u64, obtained_at: u64) -> Token {
    Token {
        access_token: "access".to_string(),
        refresh_token: "refresh".to_string(),
        scope: "playlist-read-private".to_string(),
        expires_in,
        obtained_at,
    }
}

fn now() -> u64 {
    Utc::now().timestamp() as u64
}

#[test]
fn test_token_expiry_margin() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("token.json");

    let fresh = TokenManager::with_path(create_test_token(3600, now()), path.clone());
    assert!(!fresh.is_expired());

    // inside the refresh margin counts as expired
    let almost = TokenManager::with_path(create_test_token(3600, now() - 3500), path.clone());
    assert!(almost.is_expired());

    let stale = TokenManager::with_path(create_test_token(3600, now() - 7200), path);
    assert!(stale.is_expired());
}

#[tokio::test]
async fn test_token_persist_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cache").join("token.json");

    let manager = TokenManager::with_path(create_test_token(3600, now()), path.clone());
    manager.persist().await.unwrap();

    let mut loaded = TokenManager::load_from(path).await.unwrap();
    assert_eq!(loaded.current_token().refresh_token, "refresh");
    assert_eq!(loaded.current_token().expires_in, 3600);
    // still valid, so no refresh request is made
    assert_eq!(loaded.get_valid_token().await.unwrap(), "access");
}

#[tokio::test]
async fn test_token_load_missing_file() {
    let dir = TempDir::new().unwrap();
    assert!(
        TokenManager::load_from(dir.path().join("absent.json"))
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_callback_state_completes_once() {
    let (sender, receiver) = oneshot::channel();
    let state = CallbackState::new("verifier".to_string(), sender);
    let clone = state.clone();

    assert!(state.complete(Ok(create_test_token(3600, now()))).await);
    assert!(!clone.complete(Err("late".to_string())).await);

    let token = receiver.await.unwrap().unwrap();
    assert_eq!(token.access_token, "access");
}
