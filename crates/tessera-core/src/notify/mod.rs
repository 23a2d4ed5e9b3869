// ── Notification subsystem ──
//
// In-memory toast/notification store with reactive subscriptions and
// auto-dismiss timers.

mod model;
mod store;
mod stream;

pub use model::{Action, ActionStyle, Category, Notification};
pub use store::NotificationStore;
pub use stream::{NotificationStream, NotificationWatchStream};
