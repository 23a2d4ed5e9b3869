// Notification model types.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Severity/category of a notification. Controls the rendering surface's
/// badge and color only — lifecycle is driven by duration/persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    Success,
    Error,
    Warning,
    Info,
}

/// Rendering hint for an action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStyle {
    Primary,
    Secondary,
}

/// A user-invokable action attached to a notification.
///
/// The effect is an arbitrary stored closure owned by its notification;
/// it is dropped together with the entry when the notification is removed.
#[derive(Clone)]
pub struct Action {
    pub label: String,
    pub style: ActionStyle,
    effect: Arc<dyn Fn() + Send + Sync>,
}

impl Action {
    pub fn new(
        label: impl Into<String>,
        style: ActionStyle,
        effect: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            style,
            effect: Arc::new(effect),
        }
    }

    /// Run the stored effect (called by the rendering surface on user
    /// interaction).
    pub fn invoke(&self) {
        (self.effect)();
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("label", &self.label)
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}

/// A single entry in the notification store.
#[derive(Debug, Clone)]
pub struct Notification {
    /// Globally unique for the process lifetime; never reused.
    pub id: String,
    pub category: Category,
    pub title: String,
    pub message: Option<String>,
    /// Auto-dismiss delay. `None` means no timer is armed.
    pub duration: Option<Duration>,
    /// Suppresses the auto-dismiss timer regardless of duration.
    pub persistent: bool,
    pub actions: Vec<Action>,
}
