//! Helper functions for UI operations: background task spawning and
//! opening articles in the system browser.

use crate::app::{App, AppEvent};
use crate::contact;
use crate::feed::{FeedDocument, FetchError};
use crate::util::validate_url_for_open;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

pub(super) const CONTACT_TASK: &str = "contact_submit";

/// Wraps a future to catch panics and convert them to errors.
///
/// # Example
///
/// ```ignore
/// tokio::spawn(async move {
///     match catch_task_panic(async { do_work().await }).await {
///         Ok(result) => handle_result(result),
///         Err(panic_msg) => {
///             let _ = tx.send(AppEvent::TaskPanicked { task: "work", error: panic_msg }).await;
///         }
///     }
/// });
/// ```
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                format!("Unknown panic: {:?}", (*panic).type_id())
            }
        })
}

/// Start a feed fetch in the background.
///
/// Any fetch still in flight is aborted first; its generation is superseded
/// so a result that slips through is discarded by the controller.
pub(super) fn spawn_fetch(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    if let Some(handle) = app.fetch_handle.take() {
        handle.abort();
        tracing::debug!("Aborted previous feed fetch");
    }

    let generation = app.controller.begin_fetch();
    app.selected = 0;

    let fetcher = app.fetcher.clone();
    let tx = event_tx.clone();

    tracing::debug!(url = %fetcher.url(), generation, "Spawning feed fetch");

    app.fetch_handle = Some(tokio::spawn(async move {
        let result = guarded_fetch(fetcher.fetch(Some(&tx))).await;
        if let Err(e) = tx.send(AppEvent::FeedLoaded { generation, result }).await {
            tracing::warn!(error = %e, "Failed to send feed result (receiver dropped)");
        }
    }));
}

/// Runs a fetch, turning a panic into a [`FetchError::TaskPanicked`] so the
/// fetch still settles under its own generation.
pub(super) async fn guarded_fetch<F>(fetch: F) -> Result<FeedDocument, FetchError>
where
    F: std::future::Future<Output = Result<FeedDocument, FetchError>>,
{
    catch_task_panic(fetch).await.unwrap_or_else(|panic_msg| {
        tracing::error!(error = %panic_msg, "Feed fetch task panicked");
        Err(FetchError::TaskPanicked(panic_msg))
    })
}

/// Validate and submit the open contact form in the background.
///
/// Validation failures are reported in the status bar and leave the dialog open.
pub(super) fn spawn_contact_submit(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let Some(dialog) = app.contact.as_ref() else {
        return;
    };
    if dialog.submitting {
        return;
    }
    if let Err(e) = dialog.form.validate() {
        app.set_status(e.to_string());
        return;
    }

    let form = dialog.form.clone();
    if let Some(dialog) = app.contact.as_mut() {
        dialog.submitting = true;
    }
    let client = app.http_client.clone();
    let endpoint = app.contact_endpoint.clone();
    let tx = event_tx.clone();

    app.set_status("Sending message...");

    app.contact_handle = Some(tokio::spawn(async move {
        let outcome =
            catch_task_panic(async { contact::submit(&client, &endpoint, &form).await }).await;
        let event = match outcome {
            Ok(result) => AppEvent::ContactSubmitted(result.map_err(|e| e.to_string())),
            Err(panic_msg) => AppEvent::TaskPanicked {
                task: CONTACT_TASK,
                error: panic_msg,
            },
        };
        if let Err(e) = tx.send(event).await {
            tracing::warn!(error = %e, "Failed to send contact result (receiver dropped)");
        }
    }));
}

/// Open the selected article in the system browser.
///
/// The browser runs as a separate process with no handle back to this one.
pub(super) fn open_selected_article(app: &mut App) {
    let Some(url) = app.selected_article().map(|a| a.url.clone()) else {
        return;
    };
    if url.is_empty() {
        app.set_status("Article has no URL");
        return;
    }
    if let Err(e) = validate_url_for_open(&url) {
        app.set_status(e.to_string());
        return;
    }
    match open::that_detached(&url) {
        Ok(()) => {
            tracing::debug!(url = %url, "Opened article in browser");
            app.set_status("Opened in browser");
        }
        Err(e) => app.set_status(format!("Failed to open browser: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[tokio::test]
    async fn test_catch_task_panic_ok() {
        assert_eq!(catch_task_panic(async { 7 }).await, Ok(7));
    }

    #[tokio::test]
    async fn test_catch_task_panic_message() {
        let result = catch_task_panic(async {
            panic!("boom");
        })
        .await;
        assert_eq!(result, Err::<(), _>("boom".to_string()));
    }

    async fn exploding_fetch() -> Result<FeedDocument, FetchError> {
        panic!("decoder blew up")
    }

    #[tokio::test]
    async fn test_guarded_fetch_maps_panic_to_error() {
        let result = guarded_fetch(exploding_fetch()).await;
        match result {
            Err(FetchError::TaskPanicked(msg)) => assert_eq!(msg, "decoder blew up"),
            other => panic!("Expected TaskPanicked, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_contact_form_not_sent() {
        let mut app = App::new(&Config::default()).unwrap();
        let (tx, _rx) = mpsc::channel(4);
        app.open_contact();
        spawn_contact_submit(&mut app, &tx);

        assert!(app.contact_handle.is_none());
        assert!(!app.contact.as_ref().unwrap().submitting);
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert!(msg.contains("required"));
    }

    #[tokio::test]
    async fn test_spawn_fetch_marks_loading() {
        let mut app = App::new(&Config {
            feed_url: "http://127.0.0.1:9/feed.json".to_string(),
            ..Config::default()
        })
        .unwrap();
        let (tx, _rx) = mpsc::channel(4);
        app.selected = 3;
        spawn_fetch(&mut app, &tx);
        assert!(app.fetch_handle.is_some());
        assert!(app.controller.is_loading());
        assert_eq!(app.selected, 0);
    }
}
