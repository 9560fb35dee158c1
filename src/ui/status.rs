use crate::app::App;
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(&**msg)
    } else if app.contact.is_some() {
        Cow::Borrowed("Tab next field | Shift+Tab previous | Enter send | Esc cancel")
    } else if app.search_mode {
        Cow::Borrowed("Type to search | Esc cancel | Enter apply")
    } else if app.controller.is_loading() {
        Cow::Borrowed("Loading...")
    } else {
        Cow::Borrowed(
            "[j/k]select [n/p]page [/]search [f]filter [o]pen [r]efresh [t]heme [c]ontact [?]help [q]uit",
        )
    };

    f.render_widget(Paragraph::new(text).style(app.style("status_bar")), area);
}
