//! Input handling for the TUI.
//!
//! Overlays capture keys first (help, then the contact form), then search
//! mode, then the browse keybindings.

use crate::app::{App, AppEvent};
use crate::feed::PageDirection;
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crate::util::MAX_SEARCH_QUERY_LENGTH;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::{open_selected_article, spawn_contact_submit, spawn_fetch};
use super::Action;

pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    if app.show_help {
        handle_help_input(app, code);
        return Action::Continue;
    }

    if app.contact.is_some() {
        handle_contact_input(app, code, event_tx);
        return Action::Continue;
    }

    if app.search_mode {
        handle_search_input(app, code, modifiers);
        return Action::Continue;
    }

    handle_browse_input(app, code, modifiers, event_tx)
}

/// j/k scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_contact_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) {
    if code == KeyCode::Esc {
        app.close_contact();
        return;
    }

    let Some(dialog) = app.contact.as_mut() else {
        return;
    };
    if dialog.submitting {
        return;
    }

    match code {
        KeyCode::Tab | KeyCode::Down => dialog.field = dialog.field.next(),
        KeyCode::BackTab | KeyCode::Up => dialog.field = dialog.field.prev(),
        KeyCode::Backspace => dialog.backspace(),
        KeyCode::Enter => spawn_contact_submit(app, event_tx),
        KeyCode::Char(c) => {
            if !dialog.push_char(c) {
                app.set_status("Field is at maximum length");
            }
        }
        _ => {}
    }
}

fn handle_search_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Search)
    {
        Some(KbAction::ExitSearch) => app.cancel_search(),
        Some(KbAction::CommitSearch) => app.commit_search(),
        _ => match code {
            KeyCode::Backspace => {
                app.search_input.pop();
                app.queue_search();
            }
            KeyCode::Char(c) => {
                if app.search_input.chars().count() >= MAX_SEARCH_QUERY_LENGTH {
                    app.set_status(format!(
                        "Search query at max length ({} chars)",
                        MAX_SEARCH_QUERY_LENGTH
                    ));
                    return;
                }
                app.search_input.push(c);
                app.queue_search();
            }
            _ => {}
        },
    }
}

fn handle_browse_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    let Some(action) = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Browse)
    else {
        return Action::Continue;
    };

    match action {
        KbAction::Quit => return Action::Quit,
        KbAction::NavDown => app.nav_down(),
        KbAction::NavUp => app.nav_up(),
        KbAction::NextPage => {
            if !app.turn_page(PageDirection::Next) {
                app.set_status("Already on the last page");
            }
        }
        KbAction::PrevPage => {
            if !app.turn_page(PageDirection::Prev) {
                app.set_status("Already on the first page");
            }
        }
        KbAction::Refresh => {
            spawn_fetch(app, event_tx);
            app.set_status("Refreshing...");
        }
        KbAction::EnterSearch => app.enter_search(),
        KbAction::ClearSearch => {
            if !app.controller.state().search_term.is_empty() {
                app.clear_search();
                app.set_status("Search cleared");
            }
        }
        KbAction::CycleFilter => app.cycle_filter(),
        KbAction::ResetFilter => app.reset_filter(),
        KbAction::OpenArticle => open_selected_article(app),
        KbAction::ToggleTheme => app.toggle_theme(),
        KbAction::ContactForm => app.open_contact(),
        KbAction::ShowHelp => app.show_help = true,
        // Search-only actions
        KbAction::ExitSearch | KbAction::CommitSearch => {}
    }
    Action::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ContactField;
    use crate::config::Config;
    use crate::feed::{Article, FeedDocument};
    use tokio::time::Instant;

    fn press(app: &mut App, tx: &mpsc::Sender<AppEvent>, code: KeyCode) -> Action {
        handle_input(app, code, KeyModifiers::NONE, tx)
    }

    fn type_str(app: &mut App, tx: &mpsc::Sender<AppEvent>, s: &str) {
        for c in s.chars() {
            press(app, tx, KeyCode::Char(c));
        }
    }

    fn loaded_app(titles: &[&str]) -> App {
        let mut app = App::new(&Config::default()).unwrap();
        let generation = app.controller.begin_fetch();
        let doc = FeedDocument {
            articles: titles
                .iter()
                .map(|t| Article {
                    title: t.to_string(),
                    description: None,
                    url: format!("https://example.com/{}", t),
                    source: None,
                    published_at: None,
                    category: None,
                    image: None,
                    reading_time: None,
                })
                .collect(),
            last_updated: None,
            total_articles: None,
        };
        app.controller.finish_fetch(generation, Ok(doc), Instant::now());
        app
    }

    #[tokio::test]
    async fn test_quit() {
        let mut app = loaded_app(&[]);
        let (tx, _rx) = mpsc::channel(4);
        assert!(matches!(press(&mut app, &tx, KeyCode::Char('q')), Action::Quit));
    }

    #[tokio::test]
    async fn test_search_typing_does_not_trigger_actions() {
        let mut app = loaded_app(&["OpenAI", "Rust"]);
        let (tx, _rx) = mpsc::channel(4);

        press(&mut app, &tx, KeyCode::Char('/'));
        assert!(app.search_mode);
        type_str(&mut app, &tx, "qt");
        assert_eq!(app.search_input, "qt");
        assert!(app.search_mode);
        assert_eq!(app.pending_search.as_deref(), Some("qt"));

        press(&mut app, &tx, KeyCode::Backspace);
        press(&mut app, &tx, KeyCode::Backspace);
        type_str(&mut app, &tx, "rust");
        press(&mut app, &tx, KeyCode::Enter);
        assert!(!app.search_mode);
        assert_eq!(app.controller.filtered_count(), 1);

        // Esc in browse mode clears the committed search
        press(&mut app, &tx, KeyCode::Esc);
        assert_eq!(app.controller.filtered_count(), 2);
    }

    #[tokio::test]
    async fn test_page_keys_report_bounds() {
        let mut app = loaded_app(&["a"]);
        let (tx, _rx) = mpsc::channel(4);
        press(&mut app, &tx, KeyCode::Char('n'));
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "Already on the last page");
    }

    #[tokio::test]
    async fn test_contact_dialog_captures_keys() {
        let mut app = loaded_app(&["a"]);
        let (tx, _rx) = mpsc::channel(4);

        press(&mut app, &tx, KeyCode::Char('c'));
        assert!(app.contact.is_some());

        type_str(&mut app, &tx, "Ada");
        press(&mut app, &tx, KeyCode::Tab);
        type_str(&mut app, &tx, "q@x.io");

        let dialog = app.contact.as_ref().unwrap();
        assert_eq!(dialog.form.name, "Ada");
        assert_eq!(dialog.form.email, "q@x.io");
        assert_eq!(dialog.field, ContactField::Email);

        // Message is blank: submit is refused locally
        press(&mut app, &tx, KeyCode::Enter);
        assert!(!app.contact.as_ref().unwrap().submitting);

        press(&mut app, &tx, KeyCode::Esc);
        assert!(app.contact.is_none());
    }

    #[tokio::test]
    async fn test_help_overlay_toggles() {
        let mut app = loaded_app(&["a"]);
        let (tx, _rx) = mpsc::channel(4);
        press(&mut app, &tx, KeyCode::Char('?'));
        assert!(app.show_help);
        // 'q' closes help rather than quitting
        assert!(matches!(press(&mut app, &tx, KeyCode::Char('q')), Action::Continue));
        assert!(!app.show_help);
    }
}
