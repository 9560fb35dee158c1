//! Contact form overlay.

use crate::app::{App, ContactDialog, ContactField};
use crate::util::display_width;
use ratatui::{
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::render::centered_fixed;

const FIELDS: [ContactField; 3] = [ContactField::Name, ContactField::Email, ContactField::Message];
const LABEL_WIDTH: usize = 9;

pub fn render(f: &mut Frame, app: &App, dialog: &ContactDialog) {
    let overlay = centered_fixed(70, 14, f.area());
    if overlay.width < 30 || overlay.height < 8 {
        return;
    }

    f.render_widget(Clear, overlay);

    // Room for the value after the label, inside the borders
    let value_width = (overlay.width as usize).saturating_sub(LABEL_WIDTH + 4);

    let mut lines = Vec::new();
    for field in FIELDS {
        let active = field == dialog.field;
        let style = if active {
            app.style("dialog_field_active")
        } else {
            app.style("dialog_field")
        };
        let cursor = if active && !dialog.submitting { "_" } else { "" };
        let value = tail_to_width(dialog.value(field), value_width.saturating_sub(1));

        lines.push(Line::from(vec![
            Span::styled(format!("{:<width$}", format!("{}:", field.label()), width = LABEL_WIDTH), style),
            Span::raw(format!("{}{}", value, cursor)),
        ]));
        lines.push(Line::raw(""));
    }

    lines.push(if dialog.submitting {
        Line::styled("Sending...", app.style("message_loading"))
    } else {
        Line::styled("(Enter) Send  (Tab) Next field  (Esc) Cancel", app.style("card_meta"))
    });

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border_focused"))
                .title(" Contact "),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, overlay);
}

/// The end of `s` that fits in `max_width` columns, so the cursor stays visible.
fn tail_to_width(s: &str, max_width: usize) -> &str {
    if display_width(s) <= max_width {
        return s;
    }
    let mut start = s.len();
    for (idx, _) in s.char_indices().rev() {
        if display_width(&s[idx..]) > max_width {
            break;
        }
        start = idx;
    }
    &s[start..]
}
