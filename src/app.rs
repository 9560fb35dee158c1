use crate::config::Config;
use crate::contact::ContactForm;
use crate::feed::{
    Article, FeedDocument, FeedFetcher, FetchError, NewsFeedController, PageDirection,
};
use crate::keybindings::KeybindingRegistry;
use crate::theme::{StyleMap, ThemeVariant};
use anyhow::Result;
use ratatui::style::Style;
use reqwest::redirect::Policy;
use std::borrow::Cow;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// How long a status message stays visible.
pub const STATUS_TTL: Duration = Duration::from_secs(5);

// ============================================================================
// HTTP Client Configuration
// ============================================================================

/// Create a custom redirect policy with loop detection and limited hops.
///
/// - Limits redirects to 3 hops maximum
/// - Detects redirect loops (same URL appearing twice in chain)
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        if attempt.previous().iter().any(|prev| prev.as_str() == url.as_str()) {
            return attempt.error("Redirect loop detected");
        }

        tracing::debug!(
            from = %attempt.previous().last().map(|u| u.as_str()).unwrap_or("initial"),
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );

        attempt.follow()
    })
}

// ============================================================================
// Events
// ============================================================================

/// Messages from background tasks to the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    /// A feed fetch finished. `generation` comes from
    /// [`NewsFeedController::begin_fetch`].
    FeedLoaded {
        generation: u64,
        result: Result<FeedDocument, FetchError>,
    },
    /// The feed server answered 429; the fetcher is backing off.
    FeedRateLimited { delay_secs: u64 },
    /// Contact form submission finished; `Err` holds the user-facing message.
    ContactSubmitted(Result<(), String>),
    /// A background task panicked. Feed fetches report panics through
    /// `FeedLoaded` instead, so the fetch still settles.
    TaskPanicked { task: &'static str, error: String },
}

// ============================================================================
// Contact Dialog
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Email,
    Message,
}

impl ContactField {
    pub fn next(self) -> Self {
        match self {
            Self::Name => Self::Email,
            Self::Email => Self::Message,
            Self::Message => Self::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Name => Self::Message,
            Self::Email => Self::Name,
            Self::Message => Self::Email,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Message => "Message",
        }
    }
}

/// Longest value accepted in any contact field.
pub const MAX_CONTACT_FIELD_LENGTH: usize = 2000;

/// State of the open contact form overlay.
#[derive(Debug, Clone)]
pub struct ContactDialog {
    pub form: ContactForm,
    pub field: ContactField,
    /// A submission is in flight; input is ignored until it reports back.
    pub submitting: bool,
}

impl ContactDialog {
    pub fn new() -> Self {
        Self {
            form: ContactForm::default(),
            field: ContactField::Name,
            submitting: false,
        }
    }

    pub fn value(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.form.name,
            ContactField::Email => &self.form.email,
            ContactField::Message => &self.form.message,
        }
    }

    fn active_mut(&mut self) -> &mut String {
        match self.field {
            ContactField::Name => &mut self.form.name,
            ContactField::Email => &mut self.form.email,
            ContactField::Message => &mut self.form.message,
        }
    }

    /// Returns false if the field is already at its maximum length.
    pub fn push_char(&mut self, c: char) -> bool {
        let input = self.active_mut();
        if input.chars().count() >= MAX_CONTACT_FIELD_LENGTH {
            return false;
        }
        input.push(c);
        true
    }

    pub fn backspace(&mut self) {
        self.active_mut().pop();
    }
}

impl Default for ContactDialog {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Application State
// ============================================================================

pub struct App {
    pub http_client: reqwest::Client,
    pub fetcher: FeedFetcher,
    pub contact_endpoint: String,

    // Feed view
    pub controller: NewsFeedController,
    /// Selected card, as an index into the current page.
    pub selected: usize,

    // Theme
    pub theme_variant: ThemeVariant,
    pub theme: StyleMap,

    pub keybindings: KeybindingRegistry,

    // Search
    pub search_mode: bool,
    pub search_input: String,
    /// Time of the last search keystroke, while a debounced search is pending.
    pub search_debounce: Option<Instant>,
    pub pending_search: Option<String>,
    pub search_delay: Duration,

    // Overlays
    pub contact: Option<ContactDialog>,
    pub show_help: bool,
    pub help_scroll_offset: usize,

    pub status_message: Option<(Cow<'static, str>, Instant)>,
    /// Set whenever state changes; the loop renders only when true.
    pub needs_redraw: bool,

    // Background tasks
    pub fetch_handle: Option<JoinHandle<()>>,
    pub contact_handle: Option<JoinHandle<()>>,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .redirect(create_redirect_policy())
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .timeout(Duration::from_secs(30))
            .build()?;

        let theme_variant = ThemeVariant::from_str_name(&config.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %config.theme, "Unknown theme, falling back to dark");
            ThemeVariant::Dark
        });

        let mut keybindings = KeybindingRegistry::new();
        let warnings = keybindings.apply_overrides(&config.keybindings);
        for warning in &warnings {
            tracing::warn!(warning = %warning, "Keybinding override rejected");
        }

        let mut app = Self {
            fetcher: FeedFetcher::new(http_client.clone(), config.feed_url.clone()),
            http_client,
            contact_endpoint: config.contact_endpoint.clone(),
            controller: NewsFeedController::new(config.page_size, config.refresh_interval()),
            selected: 0,
            theme_variant,
            theme: StyleMap::from_palette(&theme_variant.palette()),
            keybindings,
            search_mode: false,
            search_input: String::new(),
            search_debounce: None,
            pending_search: None,
            search_delay: config.search_debounce(),
            contact: None,
            show_help: false,
            help_scroll_offset: 0,
            status_message: None,
            needs_redraw: true,
            fetch_handle: None,
            contact_handle: None,
        };

        if let Some(first) = warnings.first() {
            app.set_status(first.clone());
        }

        Ok(app)
    }

    /// Resolve a semantic style role from the active theme.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    pub fn toggle_theme(&mut self) {
        self.set_theme(self.theme_variant.toggled());
        self.set_status(format!("Theme: {}", self.theme_variant.name()));
    }

    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if older than [`STATUS_TTL`].
    /// Returns true if a message was actually cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed() >= STATUS_TTL {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    fn page_len(&self) -> usize {
        self.controller.visible_page().len()
    }

    pub fn nav_down(&mut self) {
        let len = self.page_len();
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn nav_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Keep `selected` inside the current page after the page contents change.
    pub fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.page_len().saturating_sub(1));
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.controller.visible_page().get(self.selected).copied()
    }

    /// Turn the page; the selection moves to the first card on success.
    pub fn turn_page(&mut self, direction: PageDirection) -> bool {
        let moved = self.controller.paginate(direction);
        if moved {
            self.selected = 0;
        }
        moved
    }

    pub fn cycle_filter(&mut self) {
        let filter = self.controller.cycle_filter();
        self.selected = 0;
        self.set_status(format!("Filter: {}", filter));
    }

    pub fn reset_filter(&mut self) {
        self.controller.apply_filter(crate::feed::ALL_CATEGORIES);
        self.selected = 0;
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// Enter search mode, seeding the prompt with the active term.
    pub fn enter_search(&mut self) {
        self.search_mode = true;
        self.search_input = self.controller.state().search_term.clone();
        self.search_debounce = None;
        self.pending_search = None;
    }

    /// Queue the current prompt contents for a debounced search.
    pub fn queue_search(&mut self) {
        self.search_debounce = Some(Instant::now());
        self.pending_search = Some(self.search_input.clone());
    }

    /// Apply the queued search if the debounce delay has passed.
    /// Returns true if a search was applied.
    pub fn apply_debounced_search(&mut self) -> bool {
        let Some(last_keystroke) = self.search_debounce else {
            return false;
        };
        if last_keystroke.elapsed() < self.search_delay {
            return false;
        }
        self.search_debounce = None;
        match self.pending_search.take() {
            Some(query) => {
                self.run_search(&query);
                true
            }
            None => false,
        }
    }

    /// Apply the prompt immediately and leave search mode.
    pub fn commit_search(&mut self) {
        self.search_debounce = None;
        self.search_mode = false;
        let query = self
            .pending_search
            .take()
            .unwrap_or_else(|| self.search_input.clone());
        self.run_search(&query);
    }

    /// Leave search mode and drop the search term.
    pub fn cancel_search(&mut self) {
        self.search_mode = false;
        self.clear_search();
    }

    pub fn clear_search(&mut self) {
        self.search_input.clear();
        self.search_debounce = None;
        self.pending_search = None;
        self.controller.clear_search();
        self.selected = 0;
    }

    fn run_search(&mut self, query: &str) {
        tracing::debug!(query = %query, "Applying search");
        self.controller.apply_search(query);
        self.selected = 0;
    }

    // ------------------------------------------------------------------
    // Overlays
    // ------------------------------------------------------------------

    pub fn open_contact(&mut self) {
        if self.contact.is_none() {
            self.contact = Some(ContactDialog::new());
        }
    }

    pub fn close_contact(&mut self) {
        if let Some(handle) = self.contact_handle.take() {
            handle.abort();
            tracing::debug!("Aborted contact submission on dialog close");
        }
        self.contact = None;
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.fetch_handle.take() {
            handle.abort();
            tracing::debug!("Aborted feed fetch task on App drop");
        }
        if let Some(handle) = self.contact_handle.take() {
            handle.abort();
            tracing::debug!("Aborted contact task on App drop");
        }
    }
}
