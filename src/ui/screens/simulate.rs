use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Sparkline, Table},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;

use crate::projection;
use crate::ui::app::{App, Simulation};
use crate::ui::theme;
use crate::ui::util::{format_amount, format_rate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let Some(sim) = &app.simulation else {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled("No projection yet", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                ":sim zero <target> <installments> <participants>",
                theme::dim_style(),
            )),
            Line::from(Span::styled(
                ":sim compound <target> <annual %> <months> <participants>",
                theme::dim_style(),
            )),
            Line::from(Span::styled(
                ":sim plan <annual %> <participants>   (uses the open plan)",
                theme::dim_style(),
            )),
        ];
        f.render_widget(
            Paragraph::new(msg).centered().block(theme::panel("Simulate")),
            area,
        );
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Inputs + results
            Constraint::Length(6), // Growth sparkline
            Constraint::Min(3),    // Schedule
        ])
        .split(area);

    render_result(f, chunks[0], sim);
    render_growth(f, chunks[1], sim);
    render_schedule(f, chunks[2], sim);
}

fn render_result(f: &mut Frame, area: Rect, sim: &Simulation) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let field = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:<16}"), theme::dim_style()),
            Span::styled(value, theme::normal_style()),
        ])
    };

    let annual = projection::annual_percent_from_monthly(sim.monthly_rate).round_dp(4).normalize();
    let inputs = vec![
        field("Target", format_amount(sim.target)),
        field("Monthly rate", format!("{} ({annual}% a.a.)", format_rate(sim.monthly_rate))),
        field("Months", sim.months.to_string()),
        field("Participants", sim.participants.to_string()),
    ];
    f.render_widget(
        Paragraph::new(inputs).block(theme::panel(format!("Inputs · {}", sim.policy))),
        halves[0],
    );

    let r = sim.result.rounded();
    let bold = Style::default()
        .fg(theme::GREEN)
        .add_modifier(Modifier::BOLD);
    let results = vec![
        field("Per participant", format_amount(r.per_participant)),
        field("Group per month", format_amount(r.total_per_month)),
        Line::from(vec![
            Span::styled(format!("{:<16}", "Accumulated"), theme::dim_style()),
            Span::styled(format_amount(r.accumulated), bold),
        ]),
        field("Yield", format_amount(r.accumulated - sim.target)),
    ];
    f.render_widget(
        Paragraph::new(results).block(theme::panel("Projection")),
        halves[1],
    );
}

fn render_growth(f: &mut Frame, area: Rect, sim: &Simulation) {
    let data: Vec<u64> = sim
        .schedule
        .iter()
        .map(|b| b.round().to_u64().unwrap_or(0))
        .collect();

    let sparkline = Sparkline::default()
        .block(theme::panel("Balance growth"))
        .data(&data)
        .style(Style::default().fg(theme::YELLOW));
    f.render_widget(sparkline, area);
}

fn render_schedule(f: &mut Frame, area: Rect, sim: &Simulation) {
    let header = Row::new(
        ["Month", "Paid in", "Balance", "Earned"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    );

    let rows: Vec<Row> = sim
        .schedule
        .iter()
        .enumerate()
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, balance)| {
            let paid = sim.result.total_per_month * rust_decimal::Decimal::from(i + 1);
            Row::new(vec![
                Cell::from((i + 1).to_string()),
                Cell::from(format_amount(paid)),
                Cell::from(format_amount(*balance)),
                Cell::from(format_amount(*balance - paid)),
            ])
            .style(theme::row_style(i, None))
        })
        .collect();

    let widths = [
        Constraint::Length(7),
        Constraint::Length(18),
        Constraint::Length(18),
        Constraint::Length(18),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(theme::panel("Schedule"));
    f.render_widget(table, area);
}
