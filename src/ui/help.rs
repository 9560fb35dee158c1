//! Help overlay: scrollable keybinding table.
//!
//! Shows the live bindings, including any overrides from config.

use crate::app::App;
use crate::keybindings::Context;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table},
    Frame,
};

use super::render::centered_rect;

const CONTEXT_ORDER: [(Context, &str); 2] = [(Context::Browse, "Browse"), (Context::Search, "Search")];

/// The contact dialog reads raw keys, so its bindings are fixed.
const CONTACT_ROWS: [(&str, &str); 4] = [
    ("Tab", "Next field"),
    ("Shift+Tab", "Previous field"),
    ("Enter", "Send message"),
    ("Esc", "Close form"),
];

pub fn render(f: &mut Frame, app: &App) {
    let overlay = centered_rect(80, 80, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    f.render_widget(Clear, overlay);

    let bindings = app.keybindings.all_bindings();
    let mut rows: Vec<Row> = Vec::new();

    let section = |label: &str| {
        Row::new(vec![
            Line::from(Span::styled(
                format!("-- {} --", label),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ])
        .style(app.style("header"))
    };

    for &(ctx, label) in &CONTEXT_ORDER {
        rows.push(section(label));
        for (_, key, description) in bindings.iter().filter(|(c, _, _)| *c == ctx) {
            rows.push(Row::new(vec![format!("  {}", key), description.to_string()]));
        }
        rows.push(Row::new(vec![String::new(), String::new()]));
    }

    rows.push(section("Contact form"));
    for (key, description) in CONTACT_ROWS {
        rows.push(Row::new(vec![format!("  {}", key), description.to_string()]));
    }

    let total_rows = rows.len();
    let visible_height = overlay.height.saturating_sub(4) as usize; // borders + header
    let max_scroll = total_rows.saturating_sub(visible_height);
    let scroll = app.help_scroll_offset.min(max_scroll);
    let visible_rows: Vec<Row> = rows.into_iter().skip(scroll).take(visible_height).collect();

    let title = if max_scroll > 0 {
        format!(" Help ({}/{}) ", scroll + 1, max_scroll + 1)
    } else {
        " Help (? to close) ".to_string()
    };

    let table = Table::new(visible_rows, [Constraint::Length(16), Constraint::Min(20)])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border_focused"))
                .title(title),
        )
        .header(
            Row::new(vec!["Key", "Action"])
                .style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .add_modifier(Modifier::UNDERLINED),
                )
                .bottom_margin(1),
        );

    f.render_widget(table, overlay);

    if scroll < max_scroll {
        let hint_area = Rect {
            x: overlay.x + 1,
            y: overlay.y + overlay.height.saturating_sub(1),
            width: overlay.width.saturating_sub(2),
            height: 1,
        };
        f.render_widget(
            Paragraph::new(Line::styled(
                " j/k to scroll, ? or Esc to close ",
                app.style("card_meta"),
            )),
            hint_area,
        );
    }
}
