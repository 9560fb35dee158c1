//! Application event handling.
//!
//! Applies results from background tasks (feed fetches, contact submissions)
//! to the application state.

use crate::app::{App, AppEvent};
use crate::feed::FetchError;
use tokio::time::Instant;

use super::helpers::CONTACT_TASK;

const CONTACT_SUCCESS: &str = "Thank you for your message! I will get back to you soon.";

pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::FeedLoaded { generation, result } => {
            let loaded = result.is_ok();
            let panicked = matches!(result, Err(FetchError::TaskPanicked(_)));
            if app.controller.finish_fetch(generation, result, Instant::now()) {
                app.fetch_handle = None;
                if panicked {
                    app.set_status("Internal error in feed fetch");
                }
                // A fresh feed starts over on page 1
                if loaded {
                    app.selected = 0;
                }
                app.clamp_selection();
            }
        }
        AppEvent::FeedRateLimited { delay_secs } => {
            app.set_status(format!("Rate limited (retrying in {}s)", delay_secs));
        }
        AppEvent::ContactSubmitted(Ok(())) => {
            app.contact_handle = None;
            app.contact = None;
            app.set_status(CONTACT_SUCCESS);
        }
        AppEvent::ContactSubmitted(Err(message)) => {
            app.contact_handle = None;
            // Keep what the user typed so they can retry
            if let Some(dialog) = app.contact.as_mut() {
                dialog.submitting = false;
            }
            app.set_status(format!("Error: {}", message));
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error, "Background task panicked");
            if task == CONTACT_TASK {
                app.contact_handle = None;
                if let Some(dialog) = app.contact.as_mut() {
                    dialog.submitting = false;
                }
            }
            app.set_status(format!("Internal error in {} task", task));
        }
    }
}
