//! Toast rendering surface for the notification store.
//!
//! The CLI is a oneshot process, so instead of a live subscription it
//! drains the store after each command: every entry is printed to stderr
//! as a categorized toast, action labels are shown as hints, and the store
//! is cleared. In quiet mode only error-category entries survive.

use std::sync::Arc;

use owo_colors::OwoColorize;

use tessera_core::{Category, Notification, NotificationStore};

/// Print all pending notifications (oldest first) and clear the store.
pub fn flush(store: &Arc<NotificationStore>, color: bool, quiet: bool) {
    let snapshot = store.snapshot();
    for entry in snapshot.iter().rev() {
        if quiet && entry.category != Category::Error {
            continue;
        }
        render(entry, color);
    }
    store.clear();
}

fn render(entry: &Notification, color: bool) {
    let badge = badge(entry.category);
    let headline = if color {
        match entry.category {
            Category::Success => format!("{} {}", badge.green(), entry.title.green()),
            Category::Error => format!("{} {}", badge.red(), entry.title.red()),
            Category::Warning => format!("{} {}", badge.yellow(), entry.title.yellow()),
            Category::Info => format!("{} {}", badge.cyan(), entry.title.cyan()),
        }
    } else {
        format!("{badge} {}", entry.title)
    };
    eprintln!("{headline}");

    if let Some(ref message) = entry.message {
        if color {
            eprintln!("  {}", message.dimmed());
        } else {
            eprintln!("  {message}");
        }
    }

    if !entry.actions.is_empty() {
        let labels: Vec<String> = entry
            .actions
            .iter()
            .map(|action| format!("[{}]", action.label))
            .collect();
        eprintln!("  {}", labels.join(" "));
    }
}

fn badge(category: Category) -> &'static str {
    match category {
        Category::Success => "✓",
        Category::Error => "✗",
        Category::Warning => "⚠",
        Category::Info => "ℹ",
    }
}
