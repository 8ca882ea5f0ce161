use chrono::Local;
use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.events.is_empty() {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled("No events", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Create one with :event <YYYY-MM-DD> <HH:MM> <price> <name>",
                theme::dim_style(),
            )),
        ];
        f.render_widget(
            Paragraph::new(msg).centered().block(theme::panel("Events (0)")),
            area,
        );
        return;
    }

    let now = Local::now().naive_local();
    let header = Row::new(
        ["When", "Name", "Price", "Location", "Contact"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    );

    let rows: Vec<Row> = app
        .events
        .iter()
        .enumerate()
        .skip(app.event_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, e)| {
            let when = e.starts_at.format("%d/%m/%Y %H:%M").to_string();
            let when_cell = if e.is_past(now) {
                Cell::from(Span::styled(when, theme::dim_style()))
            } else {
                Cell::from(when)
            };
            Row::new(vec![
                when_cell,
                Cell::from(truncate(&e.name, 30)),
                Cell::from(format_amount(e.price)),
                Cell::from(truncate(&e.location, 24)),
                Cell::from(truncate(&e.contact, 20)),
            ])
            .style(theme::row_style(i, Some(app.event_index)))
        })
        .collect();

    let widths = [
        Constraint::Length(17),
        Constraint::Min(16),
        Constraint::Length(14),
        Constraint::Length(25),
        Constraint::Length(21),
    ];
    let upcoming = app.events.iter().filter(|e| !e.is_past(now)).count();
    let table = Table::new(rows, widths).header(header).block(theme::panel(format!(
        "Events ({}, {upcoming} upcoming)",
        app.events.len()
    )));
    f.render_widget(table, area);
}
