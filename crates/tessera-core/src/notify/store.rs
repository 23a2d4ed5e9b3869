// ── Reactive notification store ──
//
// Ordered, newest-first storage for transient and persistent user-facing
// messages. Mutations rebuild a snapshot that is broadcast to subscribers
// via a `watch` channel; timed entries arm a one-shot dismiss task that
// holds only a weak store reference.

use std::collections::VecDeque;
use std::sync::{Arc, RwLock, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, warn};
use uuid::Uuid;

use super::model::{Action, ActionStyle, Category, Notification};
use super::stream::NotificationStream;

const SUCCESS_DISMISS: Duration = Duration::from_millis(5_000);
const ERROR_DISMISS: Duration = Duration::from_millis(8_000);
const WARNING_DISMISS: Duration = Duration::from_millis(6_000);
const INFO_DISMISS: Duration = Duration::from_millis(4_000);

/// Process-wide, in-memory collection of user-facing notifications.
///
/// Newest entries sit at index 0. The store exclusively owns every entry
/// from insertion to removal; subscribers only ever see `Arc` snapshots.
/// Created behind an `Arc` so dismiss timers can hold a `Weak` reference —
/// a timer that outlives the store (or its entry) is a no-op.
pub struct NotificationStore {
    entries: RwLock<VecDeque<Arc<Notification>>>,
    snapshot: watch::Sender<Arc<Vec<Arc<Notification>>>>,
    weak: Weak<NotificationStore>,
}

impl NotificationStore {
    pub fn new() -> Arc<Self> {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Arc::new_cyclic(|weak| Self {
            entries: RwLock::new(VecDeque::new()),
            snapshot,
            weak: weak.clone(),
        })
    }

    // ── Category constructors ────────────────────────────────────────

    /// Insert a success notification (auto-dismissed after 5s).
    pub fn success(&self, title: impl Into<String>, message: Option<String>) -> String {
        self.notify(Category::Success, title, message, Some(SUCCESS_DISMISS), false)
    }

    /// Insert an error notification (auto-dismissed after 8s unless
    /// `persistent`).
    pub fn error(
        &self,
        title: impl Into<String>,
        message: Option<String>,
        persistent: bool,
    ) -> String {
        self.notify(Category::Error, title, message, Some(ERROR_DISMISS), persistent)
    }

    /// Insert a warning notification (auto-dismissed after 6s).
    pub fn warning(&self, title: impl Into<String>, message: Option<String>) -> String {
        self.notify(Category::Warning, title, message, Some(WARNING_DISMISS), false)
    }

    /// Insert an info notification (auto-dismissed after 4s).
    pub fn info(&self, title: impl Into<String>, message: Option<String>) -> String {
        self.notify(Category::Info, title, message, Some(INFO_DISMISS), false)
    }

    /// Insert a notification with custom category, duration, and
    /// persistence. A persistent entry never arms a timer, whatever the
    /// duration says.
    pub fn notify(
        &self,
        category: Category,
        title: impl Into<String>,
        message: Option<String>,
        duration: Option<Duration>,
        persistent: bool,
    ) -> String {
        self.insert(Notification {
            id: next_id(),
            category,
            title: title.into(),
            message,
            duration: if persistent { None } else { duration },
            persistent,
            actions: Vec::new(),
        })
    }

    /// Insert a notification carrying user-invokable actions. Without an
    /// explicit duration the entry is persistent.
    pub fn with_actions(
        &self,
        category: Category,
        title: impl Into<String>,
        message: impl Into<String>,
        actions: Vec<Action>,
        duration: Option<Duration>,
    ) -> String {
        self.insert(Notification {
            id: next_id(),
            category,
            title: title.into(),
            message: Some(message.into()),
            persistent: duration.is_none(),
            duration,
            actions,
        })
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Remove a notification by id. Removing an absent id (e.g. a timer
    /// firing after a manual dismiss) is a no-op.
    pub fn remove(&self, id: &str) {
        let removed = {
            let mut entries = self.entries.write().expect("notification list poisoned");
            let before = entries.len();
            entries.retain(|n| n.id != id);
            entries.len() != before
        };
        if removed {
            debug!(id, "notification removed");
            self.rebuild_snapshot();
        }
    }

    /// Remove all notifications. Pending dismiss timers become no-ops.
    pub fn clear(&self) {
        self.entries
            .write()
            .expect("notification list poisoned")
            .clear();
        self.rebuild_snapshot();
    }

    // ── Read access ──────────────────────────────────────────────────

    /// The current snapshot, newest first (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<Vec<Arc<Notification>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> NotificationStream {
        NotificationStream::new(self.snapshot.subscribe())
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .expect("notification list poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ── API error mapping ────────────────────────────────────────────

    /// Map a failed API call to a canned, categorized notification.
    ///
    /// `context` is a short gerund phrase ("listing cards", "deleting the
    /// banner") interpolated into the permission and fallback messages.
    pub fn handle_api_error(&self, error: &tessera_api::Error, context: &str) -> String {
        warn!(%error, context, "API operation failed");

        match error.status() {
            Some(401) => self.session_expired(),
            Some(403) => self.error(
                "Insufficient permissions",
                Some(format!(
                    "You do not have sufficient permissions for {context}."
                )),
                false,
            ),
            Some(404) => self.error(
                "Resource not found",
                Some("The requested item does not exist or has been deleted.".to_owned()),
                false,
            ),
            Some(422) => self.error(
                "Invalid data",
                Some(
                    "The submitted data is not valid. Check the fields and try again.".to_owned(),
                ),
                false,
            ),
            Some(500) => self.error(
                "Server error",
                Some("Internal server error. Please contact the administrator.".to_owned()),
                false,
            ),
            None => self.network_error(),
            Some(status) => {
                let message = error.message().map_or_else(
                    || format!("An unexpected error occurred while {context} (HTTP {status})."),
                    str::to_owned,
                );
                self.error(format!("Error while {context}"), Some(message), false)
            }
        }
    }

    // ── Canned notifications ─────────────────────────────────────────

    pub fn session_expired(&self) -> String {
        self.error(
            "Session expired",
            Some("Your session has expired. Please sign in again.".to_owned()),
            true,
        )
    }

    pub fn network_error(&self) -> String {
        self.error(
            "Connection error",
            Some("Could not reach the server. Check your network connection.".to_owned()),
            true,
        )
    }

    pub fn validation_error(&self) -> String {
        self.warning(
            "Incomplete data",
            Some("Please fill in all required fields before continuing.".to_owned()),
        )
    }

    pub fn card_created(&self, name: &str) -> String {
        self.success(
            "Card created",
            Some(format!("\"{name}\" was created and is ready to use.")),
        )
    }

    pub fn card_updated(&self, name: &str) -> String {
        self.success(
            "Card updated",
            Some(format!("Changes to \"{name}\" were saved.")),
        )
    }

    pub fn card_deleted(&self, name: &str) -> String {
        self.success(
            "Card deleted",
            Some(format!("\"{name}\" was permanently deleted.")),
        )
    }

    pub fn card_delete_error(&self, name: &str) -> String {
        self.error(
            "Could not delete card",
            Some(format!(
                "\"{name}\" could not be deleted. Try again or contact the administrator."
            )),
            true,
        )
    }

    pub fn image_uploaded(&self) -> String {
        self.success(
            "Image updated",
            Some("The profile image was uploaded successfully.".to_owned()),
        )
    }

    pub fn image_upload_error(&self, detail: Option<String>) -> String {
        self.error(
            "Image upload failed",
            Some(detail.unwrap_or_else(|| {
                "The image could not be uploaded. Check the file format and size.".to_owned()
            })),
            true,
        )
    }

    /// Persistent confirmation prompt with Cancel/Delete actions.
    pub fn confirm_delete<F>(&self, item: &str, on_confirm: F) -> String
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.with_actions(
            Category::Warning,
            "Confirm deletion",
            format!("Are you sure you want to delete \"{item}\"? This cannot be undone."),
            vec![
                Action::new("Cancel", ActionStyle::Secondary, || {}),
                Action::new("Delete", ActionStyle::Primary, on_confirm),
            ],
            None,
        )
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Prepend the entry, broadcast the new snapshot, and arm the dismiss
    /// timer when applicable.
    fn insert(&self, notification: Notification) -> String {
        let id = notification.id.clone();
        let timer = if notification.persistent {
            None
        } else {
            notification.duration
        };

        {
            let mut entries = self.entries.write().expect("notification list poisoned");
            entries.push_front(Arc::new(notification));
        }
        self.rebuild_snapshot();

        if let Some(duration) = timer {
            self.arm_dismiss_timer(id.clone(), duration);
        }
        id
    }

    fn arm_dismiss_timer(&self, id: String, duration: Duration) {
        let store = self.weak.clone();
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            // Ids are never reused, so a fire after removal (or after the
            // store itself is gone) does nothing.
            if let Some(store) = store.upgrade() {
                store.remove(&id);
            }
        });
    }

    /// Collect the current entries into a snapshot vec and broadcast it.
    fn rebuild_snapshot(&self) {
        let values: Vec<Arc<Notification>> = self
            .entries
            .read()
            .expect("notification list poisoned")
            .iter()
            .map(Arc::clone)
            .collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }
}

/// Generate a process-unique notification id.
fn next_id() -> String {
    format!("ntf_{}", Uuid::new_v4())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;

    #[tokio::test]
    async fn entries_are_newest_first_with_unique_ids() {
        let store = NotificationStore::new();
        let first = store.success("first", None);
        let second = store.error("second", None, false);
        let third = store.warning("third", None);

        let snap = store.snapshot();
        assert_eq!(snap.len(), 3);
        assert_eq!(snap[0].title, "third");
        assert_eq!(snap[1].title, "second");
        assert_eq!(snap[2].title, "first");

        assert_ne!(first, second);
        assert_ne!(second, third);
        assert_ne!(first, third);
    }

    #[tokio::test]
    async fn remove_absent_id_is_a_noop() {
        let store = NotificationStore::new();
        store.info("hello", None);
        store.remove("ntf_does-not-exist");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn clear_empties_persistent_and_timed_entries_alike() {
        let store = NotificationStore::new();
        store.success("timed", None);
        store.error("sticky", None, true);
        assert_eq!(store.len(), 2);

        store.clear();
        assert!(store.is_empty());
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn timed_entry_is_auto_dismissed() {
        let store = NotificationStore::new();
        store.notify(
            Category::Success,
            "Saved",
            Some("ok".to_owned()),
            Some(Duration::from_millis(100)),
            false,
        );
        assert_eq!(store.len(), 1);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn late_timer_after_manual_remove_is_a_noop() {
        let store = NotificationStore::new();
        let id = store.notify(
            Category::Success,
            "Saved",
            None,
            Some(Duration::from_millis(100)),
            false,
        );

        tokio::time::sleep(Duration::from_millis(50)).await;
        store.remove(&id);
        assert!(store.is_empty());

        // Another entry inserted before the stale timer fires must survive.
        store.error("sticky", None, true);
        tokio::time::sleep(Duration::from_millis(100)).await;

        let snap = store.snapshot();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].title, "sticky");
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_error_ignores_its_duration() {
        let store = NotificationStore::new();
        store.error("sticky", None, true);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(store.len(), 1);
        assert!(store.snapshot()[0].persistent);
        assert!(store.snapshot()[0].duration.is_none());
    }

    #[tokio::test]
    async fn with_actions_without_duration_is_persistent() {
        let store = NotificationStore::new();
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);

        store.with_actions(
            Category::Warning,
            "Confirm",
            "Really?",
            vec![Action::new("Yes", ActionStyle::Primary, move || {
                flag.store(true, Ordering::SeqCst);
            })],
            None,
        );

        let snap = store.snapshot();
        assert!(snap[0].persistent);
        assert_eq!(snap[0].actions.len(), 1);

        snap[0].actions[0].invoke();
        assert!(fired.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn subscribers_observe_mutations() {
        let store = NotificationStore::new();
        let mut stream = store.subscribe();
        assert!(stream.current().is_empty());

        store.info("hello", None);
        let snap = stream.changed().await.unwrap();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].title, "hello");
    }

    // ── handle_api_error mapping ─────────────────────────────────────

    #[tokio::test]
    async fn api_error_404_maps_to_not_found() {
        let store = NotificationStore::new();
        store.handle_api_error(
            &tessera_api::Error::Api {
                status: 404,
                message: "No query results".to_owned(),
            },
            "fetching the card",
        );

        let snap = store.snapshot();
        assert_eq!(snap[0].category, Category::Error);
        assert_eq!(snap[0].title, "Resource not found");
        assert!(!snap[0].persistent);
    }

    #[tokio::test]
    async fn api_error_without_status_maps_to_persistent_network_error() {
        let store = NotificationStore::new();
        store.handle_api_error(
            &tessera_api::Error::Tls("handshake failed".to_owned()),
            "listing cards",
        );

        let snap = store.snapshot();
        assert_eq!(snap[0].title, "Connection error");
        assert!(snap[0].persistent);
    }

    #[tokio::test]
    async fn api_error_401_maps_to_persistent_session_expired() {
        let store = NotificationStore::new();
        store.handle_api_error(&tessera_api::Error::SessionExpired, "listing cards");

        let snap = store.snapshot();
        assert_eq!(snap[0].title, "Session expired");
        assert!(snap[0].persistent);
    }

    #[tokio::test]
    async fn unknown_status_uses_the_backend_message() {
        let store = NotificationStore::new();
        store.handle_api_error(
            &tessera_api::Error::Api {
                status: 409,
                message: "Slug already taken".to_owned(),
            },
            "creating the card",
        );

        let snap = store.snapshot();
        assert_eq!(snap[0].title, "Error while creating the card");
        assert_eq!(snap[0].message.as_deref(), Some("Slug already taken"));
    }
}
