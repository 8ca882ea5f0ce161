use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, progress_bar, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.plans.is_empty() {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled("No savings plans yet", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Create one with :plan <target> <start> <end> <description>",
                theme::dim_style(),
            )),
        ];
        f.render_widget(
            Paragraph::new(msg).centered().block(theme::panel("Plans (0)")),
            area,
        );
        return;
    }

    let header = Row::new(
        ["#", "Description", "Period", "Months", "People", "Target", "Saved", "Progress"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    )
    .height(1);

    let rows: Vec<Row> = app
        .plans
        .iter()
        .enumerate()
        .skip(app.plan_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, plan)| {
            let months = plan
                .period_months()
                .map(|m| m.to_string())
                .unwrap_or_else(|_| "?".into());
            let saved = plan.total_contributed();
            Row::new(vec![
                Cell::from(plan.id.unwrap_or_default().to_string()),
                Cell::from(truncate(&plan.description, 30)),
                Cell::from(format!(
                    "{} → {}",
                    plan.start_date.format("%d/%m/%Y"),
                    plan.end_date.format("%d/%m/%Y")
                )),
                Cell::from(months),
                Cell::from(plan.participants.len().to_string()),
                Cell::from(format_amount(plan.target)),
                Cell::from(Span::styled(format_amount(saved), theme::amount_style(saved))),
                Cell::from(progress_bar(plan.progress(), 12)),
            ])
            .style(theme::row_style(i, Some(app.plan_index)))
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Min(16),
        Constraint::Length(25),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(16),
        Constraint::Length(16),
        Constraint::Length(13),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(theme::panel(format!("Plans ({})", app.plans.len())));
    f.render_widget(table, area);
}
