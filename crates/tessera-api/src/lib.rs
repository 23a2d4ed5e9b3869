// tessera-api: Async Rust client for the tessera digital-card backend (Laravel REST)

pub mod error;
pub mod session;
pub mod transport;
pub mod types;

mod account;
mod auth;
mod banners;
mod cards;
mod client;
mod users;

pub use client::ApiClient;
pub use error::Error;
pub use session::{AuthSession, SessionState, TokenPair};
pub use transport::{TlsMode, TransportConfig};
