use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::ledger::MonthlyMatrix;
use crate::models::SavingsPlan;
use crate::ui::app::{App, PlanFocus};
use crate::ui::theme;
use crate::ui::util::{format_amount, progress_bar, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let Some(plan) = &app.plan else {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No plan open", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Pick one on the Plans tab and press Enter",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(theme::panel("Plan"));
        f.render_widget(msg, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),  // Summary
            Constraint::Min(6),     // Matrix
            Constraint::Length(12), // Lists + chart
        ])
        .split(area);

    render_summary(f, chunks[0], plan);
    match (&app.matrix, &app.matrix_error) {
        (Some(m), _) => {
            let highlight = match app.plan_focus {
                PlanFocus::Participants => plan
                    .participants
                    .get(app.participant_index)
                    .and_then(|p| p.id),
                PlanFocus::Contributions => plan
                    .contributions
                    .get(app.contribution_index)
                    .map(|c| c.participant_id),
            };
            render_matrix(f, chunks[1], m, highlight)
        }
        (None, Some(err)) => {
            let msg = Paragraph::new(Line::from(Span::styled(
                err.as_str(),
                Style::default().fg(theme::RED),
            )))
            .block(theme::panel("Monthly contributions"));
            f.render_widget(msg, chunks[1]);
        }
        (None, None) => {}
    }

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(35),
            Constraint::Percentage(40),
        ])
        .split(chunks[2]);

    render_participants(f, bottom[0], app, plan);
    render_contributions(f, bottom[1], app, plan);
    if let Some(m) = &app.matrix {
        render_chart(f, bottom[2], m);
    }
}

fn render_summary(f: &mut Frame, area: Rect, plan: &SavingsPlan) {
    let saved = plan.total_contributed();
    let months = plan.period_months().unwrap_or_default();
    let pct = (plan.progress() * Decimal::ONE_HUNDRED).round_dp(1);

    let lines = vec![
        Line::from(vec![
            Span::styled("Target ", theme::dim_style()),
            Span::styled(
                format_amount(plan.target),
                Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD),
            ),
            Span::styled("   Period ", theme::dim_style()),
            Span::styled(
                format!(
                    "{} → {} ({months} months)",
                    plan.start_date.format("%d/%m/%Y"),
                    plan.end_date.format("%d/%m/%Y")
                ),
                theme::normal_style(),
            ),
        ]),
        Line::from(vec![
            Span::styled("Saved  ", theme::dim_style()),
            Span::styled(format_amount(saved), theme::amount_style(saved)),
            Span::raw("  "),
            Span::styled(progress_bar(plan.progress(), 30), Style::default().fg(theme::TEAL)),
            Span::styled(format!(" {pct}%"), theme::dim_style()),
        ]),
    ];

    let title = format!("#{} {}", plan.id.unwrap_or_default(), plan.description);
    f.render_widget(Paragraph::new(lines).block(theme::panel(title)), area);
}

/// `highlight` marks the row of the participant under the cursor.
fn render_matrix(f: &mut Frame, area: Rect, matrix: &MonthlyMatrix, highlight: Option<i64>) {
    let mut header_cells = vec![Cell::from("Participant").style(theme::header_style())];
    header_cells.extend(
        matrix
            .labels()
            .into_iter()
            .map(|l| Cell::from(l).style(theme::header_style())),
    );
    header_cells.push(Cell::from("Total").style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let cell = |v: Decimal| {
        if v.is_zero() {
            Cell::from(Span::styled("·", theme::dim_style()))
        } else {
            Cell::from(Span::styled(format_amount(v), theme::amount_style(v)))
        }
    };

    let mut rows: Vec<Row> = matrix
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut cells = vec![Cell::from(truncate(&row.label, 16))];
            cells.extend(row.cells.iter().copied().map(cell));
            cells.push(cell(row.total()));
            let style = if highlight.is_some() && row.participant_id == highlight {
                Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD)
            } else {
                theme::row_style(i, None)
            };
            Row::new(cells).style(style)
        })
        .collect();

    let mut totals = vec![Cell::from("Total")];
    totals.extend(matrix.column_totals().into_iter().map(cell));
    totals.push(cell(matrix.grand_total()));
    rows.push(Row::new(totals).style(Style::default().add_modifier(Modifier::BOLD)));

    let mut widths = vec![Constraint::Length(17)];
    widths.extend((0..=matrix.months).map(|_| Constraint::Length(14)));

    let table = Table::new(rows, widths)
        .header(header)
        .block(theme::panel("Monthly contributions"));
    f.render_widget(table, area);
}

fn render_participants(f: &mut Frame, area: Rect, app: &App, plan: &SavingsPlan) {
    let focused = app.plan_focus == PlanFocus::Participants;
    let cursor = focused.then_some(app.participant_index);

    let rows: Vec<Row> = plan
        .participants
        .iter()
        .enumerate()
        .map(|(i, p)| {
            Row::new(vec![
                Cell::from(truncate(&p.name, 16)),
                Cell::from(truncate(&p.contact, 18)),
            ])
            .style(theme::row_style(i, cursor))
        })
        .collect();

    let table = Table::new(rows, [Constraint::Min(8), Constraint::Min(8)]).block(
        theme::focus_panel(format!("Participants ({})", plan.participants.len()), focused),
    );
    f.render_widget(table, area);
}

fn render_contributions(f: &mut Frame, area: Rect, app: &App, plan: &SavingsPlan) {
    let focused = app.plan_focus == PlanFocus::Contributions;
    let cursor = focused.then_some(app.contribution_index);

    let rows: Vec<Row> = plan
        .contributions
        .iter()
        .enumerate()
        .skip(app.contribution_scroll)
        .take(area.height.saturating_sub(2) as usize)
        .map(|(i, c)| {
            let who = plan
                .find_participant(c.participant_id)
                .map(|p| p.name.as_str())
                .unwrap_or("?");
            Row::new(vec![
                Cell::from(c.date.format("%d/%m/%Y").to_string()),
                Cell::from(truncate(who, 12)),
                Cell::from(Span::styled(format_amount(c.amount), theme::amount_style(c.amount))),
                Cell::from(truncate(&c.description, 20)),
            ])
            .style(theme::row_style(i, cursor))
        })
        .collect();

    let widths = [
        Constraint::Length(11),
        Constraint::Length(12),
        Constraint::Length(14),
        Constraint::Min(6),
    ];
    let table = Table::new(rows, widths).block(theme::focus_panel(
        format!("Contributions ({})", plan.contributions.len()),
        focused,
    ));
    f.render_widget(table, area);
}

fn render_chart(f: &mut Frame, area: Rect, matrix: &MonthlyMatrix) {
    let labels = matrix.labels();
    let bars: Vec<Bar> = matrix
        .column_totals()
        .into_iter()
        .zip(labels)
        .map(|(total, label)| {
            Bar::default()
                .value(total.max(Decimal::ZERO).round().to_u64().unwrap_or(0))
                .label(Line::from(label))
                .style(Style::default().fg(theme::ACCENT))
        })
        .collect();

    let chart = BarChart::default()
        .block(theme::panel("Group total per month"))
        .data(BarGroup::default().bars(&bars))
        .bar_width(5)
        .bar_gap(1)
        .value_style(Style::default().fg(theme::HEADER_BG).bg(theme::ACCENT));
    f.render_widget(chart, area);
}
