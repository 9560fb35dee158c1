use crate::app::App;
use crate::feed::{ArticleCard, LoadState, ALL_CATEGORIES};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crate::util::truncate_to_width;
use chrono::Utc;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

const HEADER_TITLE: &str = "Latest AI News";
const EMPTY_MESSAGE: &str = "No news articles available at the moment.";
const LOADING_MESSAGE: &str = "Loading latest news...";

/// Title line with the feed's "last updated" stamp and article count.
pub fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let state = app.controller.state();
    let mut spans = vec![Span::styled(HEADER_TITLE, app.style("header"))];

    if let Some(updated) = &state.last_updated {
        spans.push(Span::styled(
            format!("  Last updated: {}", updated),
            app.style("card_meta"),
        ));
    }
    if matches!(app.controller.load_state(), LoadState::Loaded | LoadState::Empty) {
        let count = state.total_articles.unwrap_or(state.articles.len());
        spans.push(Span::styled(
            format!("  ({} articles)", count),
            app.style("card_meta"),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// "all" plus every category in the loaded feed, active one highlighted.
pub fn render_filter_bar(f: &mut Frame, app: &App, area: Rect) {
    let active = &app.controller.state().active_filter;
    let mut spans = vec![Span::styled("Filter: ", app.style("card_meta"))];

    let options =
        std::iter::once(ALL_CATEGORIES.to_string()).chain(app.controller.categories());
    for option in options {
        let style = if option.eq_ignore_ascii_case(active) {
            app.style("filter_active")
        } else {
            app.style("filter_inactive")
        };
        spans.push(Span::styled(format!(" {} ", option), style));
        spans.push(Span::raw(" "));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// The article panel: cards for the current page, or a state message.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let title = if app.search_mode {
        format!(" Search: {}_ ", app.search_input)
    } else if !app.controller.state().search_term.is_empty() {
        format!(" News (search: \"{}\") ", app.controller.state().search_term)
    } else {
        " News ".to_string()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border_focused"))
        .title(title);

    let message = match app.controller.load_state() {
        LoadState::Idle | LoadState::Loading => {
            Some(Text::styled(LOADING_MESSAGE, app.style("message_loading")))
        }
        LoadState::Error(msg) => {
            let retry_key = app
                .keybindings
                .key_for(KbAction::Refresh, KbContext::Browse)
                .unwrap_or_else(|| "r".to_string());
            Some(Text::from(vec![
                Line::styled(msg.clone(), app.style("message_error")),
                Line::raw(""),
                Line::styled(format!("Press {} to retry", retry_key), app.style("card_meta")),
            ]))
        }
        LoadState::Empty => Some(Text::styled(EMPTY_MESSAGE, app.style("message_empty"))),
        LoadState::Loaded if app.controller.no_matches() => Some(no_match_text(app)),
        LoadState::Loaded => None,
    };

    if let Some(text) = message {
        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
        return;
    }

    let inner_width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = app
        .controller
        .cards(Utc::now())
        .iter()
        .enumerate()
        .map(|(i, card)| card_item(app, card, i == app.selected, inner_width))
        .collect();

    let list = List::new(items).block(block);
    let mut state = ListState::default().with_selected(Some(app.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn no_match_text(app: &App) -> Text<'static> {
    let state = app.controller.state();
    let headline = if state.search_term.is_empty() {
        format!("No articles in category \"{}\"", state.active_filter)
    } else {
        format!("No articles found matching \"{}\"", state.search_term)
    };
    let hint = if state.search_term.is_empty() {
        app.keybindings
            .key_for(KbAction::ResetFilter, KbContext::Browse)
            .map(|k| format!("Press {} to show all categories", k))
    } else {
        app.keybindings
            .key_for(KbAction::ClearSearch, KbContext::Browse)
            .map(|k| format!("Press {} to clear search", k))
    };

    let mut lines = vec![Line::styled(headline, app.style("message_empty"))];
    if let Some(hint) = hint {
        lines.push(Line::raw(""));
        lines.push(Line::styled(hint, app.style("card_meta")));
    }
    Text::from(lines)
}

/// One card: title, meta line, optional description, blank separator.
fn card_item(app: &App, card: &ArticleCard, selected: bool, width: usize) -> ListItem<'static> {
    let title_style = if selected {
        app.style("card_selected")
    } else {
        app.style("card_title")
    };

    let mut meta = vec![
        Span::styled(card.source.clone(), app.style("card_meta")),
        Span::styled(format!(" | {}", card.timestamp), app.style("card_meta")),
    ];
    if let Some(category) = &card.category {
        meta.push(Span::raw(" "));
        meta.push(Span::styled(format!("[{}]", category), app.style("card_category")));
    }
    if let Some(reading_time) = &card.reading_time {
        meta.push(Span::styled(format!(" | {}", reading_time), app.style("card_meta")));
    }

    let mut lines = vec![
        Line::styled(truncate_to_width(&card.title, width).into_owned(), title_style),
        Line::from(meta),
    ];
    if let Some(description) = &card.description {
        lines.push(Line::styled(
            truncate_to_width(description, width).into_owned(),
            app.style("card_description"),
        ));
    }
    lines.push(Line::raw(""));

    ListItem::new(Text::from(lines))
}

/// "Page x/y" with previous/next availability.
pub fn render_pager(f: &mut Frame, app: &App, area: Rect) {
    let c = &app.controller;
    let enabled = app.style("filter_active");
    let disabled = app.style("card_meta");

    let prev_key = app
        .keybindings
        .key_for(KbAction::PrevPage, KbContext::Browse)
        .unwrap_or_default();
    let next_key = app
        .keybindings
        .key_for(KbAction::NextPage, KbContext::Browse)
        .unwrap_or_default();

    let line = Line::from(vec![
        Span::styled(
            format!(" < Prev ({}) ", prev_key),
            if c.has_prev_page() { enabled } else { disabled },
        ),
        Span::raw(format!(
            "  Page {}/{}  ",
            c.state().current_page,
            c.total_pages()
        )),
        Span::styled(
            format!(" Next ({}) > ", next_key),
            if c.has_next_page() { enabled } else { disabled },
        ),
        Span::styled(
            format!("  {} shown", c.filtered_count()),
            app.style("card_meta"),
        ),
    ]);

    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}
