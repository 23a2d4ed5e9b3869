//! Reactive service layer between `tessera-api` and UI consumers.
//!
//! This crate owns the shared services of the tessera workspace:
//!
//! - **[`Console`]** — Facade wiring config → auth session → API client →
//!   notification store. Consumers construct one per backend and drive the
//!   auth lifecycle ([`login`](Console::login) / [`logout`](Console::logout))
//!   through it.
//!
//! - **[`NotificationStore`]** — Ordered, newest-first, in-memory store of
//!   transient and persistent user-facing messages, with auto-dismiss
//!   timers and `handle_api_error` status mapping. Subscribers consume a
//!   read-only [`NotificationStream`] backed by a `watch` channel.
//!
//! - **[`CoreError`]** — Domain error type; `From<tessera_api::Error>`
//!   translates transport failures at the boundary.

pub mod console;
pub mod error;
pub mod notify;

// ── Primary re-exports ──────────────────────────────────────────────
pub use console::{Console, ConsoleConfig, TlsVerification};
pub use error::CoreError;
pub use notify::{
    Action, ActionStyle, Category, Notification, NotificationStore, NotificationStream,
};
