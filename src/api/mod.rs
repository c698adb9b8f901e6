//! HTTP endpoints of the local server started by `tunecraft auth`.
//!
//! - [`callback`] - receives the authorization code from Spotify, exchanges
//!   it for a token and hands the token to the waiting login flow
//! - [`health`] - reports status and version

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
