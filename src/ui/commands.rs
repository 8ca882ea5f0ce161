use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::NaiveTime;
use rust_decimal::Decimal;

use super::app::{App, PendingAction, PlanFocus, Screen, Simulation};
use super::util::{format_amount, parse_amount, parse_count, parse_date};
use crate::db::Database;
use crate::models::{Contribution, Event, Participant, SavingsPlan};
use crate::projection::{self, Projection};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit GroupSave", cmd_quit, r);
    register_command!("quit", "Quit GroupSave", cmd_quit, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!("plans", "Go to Plans", cmd_plans, r);
    register_command!("p", "Go to Plans", cmd_plans, r);
    register_command!("events", "Go to Events", cmd_events, r);
    register_command!("e", "Go to Events", cmd_events, r);
    register_command!("open", "Open selected plan (or :open <id>)", cmd_open, r);
    register_command!(
        "plan",
        "Create plan (e.g. :plan 3000 2024-01-01 2024-12-31 Trip)",
        cmd_plan,
        r
    );
    register_command!(
        "participant",
        "Add participant to open plan (e.g. :participant Ana 11-9999)",
        cmd_participant,
        r
    );
    register_command!(
        "pa",
        "Add participant to open plan",
        cmd_participant,
        r
    );
    register_command!(
        "contrib",
        "Add contribution (e.g. :contrib Ana 2024-02-10 150 February)",
        cmd_contrib,
        r
    );
    register_command!("c", "Add contribution", cmd_contrib, r);
    register_command!(
        "simulate",
        "Project: zero <G> <N> <P> | compound <G> <%a.a.> <T> <P> | plan <%a.a.> <P>",
        cmd_simulate,
        r
    );
    register_command!("sim", "Run a projection", cmd_simulate, r);
    register_command!(
        "event",
        "Create event (e.g. :event 2024-06-15 18:30 45 Barbecue)",
        cmd_event,
        r
    );
    register_command!(
        "event-edit",
        "Edit selected event field (name|contact|price|when|location <value>)",
        cmd_event_edit,
        r
    );
    register_command!("delete", "Delete item under the cursor", cmd_delete, r);
    register_command!("del", "Delete item under the cursor", cmd_delete, r);
    register_command!(
        "export",
        "Export open plan matrix to CSV (e.g. :export ~/trip.csv)",
        cmd_export,
        r
    );

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 2)
        .min_by_key(|k| (levenshtein(input, k), **k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Navigation ───────────────────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_plans(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Plans;
    app.refresh_plans(db)?;
    Ok(())
}

fn cmd_events(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Events;
    app.refresh_events(db)?;
    Ok(())
}

pub(crate) fn cmd_open(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let id = if args.is_empty() {
        app.selected_plan().and_then(|p| p.id)
    } else {
        args.parse::<i64>().ok()
    };
    let Some(id) = id else {
        app.set_status("No plan selected. Usage: :open <id>");
        return Ok(());
    };
    let owned = app.plans.iter().any(|p| p.id == Some(id));
    if owned && app.open_plan(db, id)? {
        app.screen = Screen::Plan;
        if let Some(err) = app.matrix_error.clone() {
            app.set_status(format!("Chart unavailable: {err}"));
        }
    } else {
        app.set_status(format!("Plan {id} not found"));
    }
    Ok(())
}

// ── Plans ────────────────────────────────────────────────────

fn cmd_plan(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    const USAGE: &str = "Usage: :plan <target> <start> <end> <description>";
    let parts: Vec<&str> = args.splitn(4, ' ').collect();
    if parts.len() < 4 || parts[3].trim().is_empty() {
        app.set_status(USAGE);
        return Ok(());
    }

    let Some(target) = parse_amount(parts[0]).filter(|t| *t > Decimal::ZERO)
    else {
        app.set_status(format!("Invalid target: {}", parts[0]));
        return Ok(());
    };
    let (Some(start), Some(end)) = (parse_date(parts[1]), parse_date(parts[2])) else {
        app.set_status("Invalid date. Use YYYY-MM-DD or DD/MM/YYYY");
        return Ok(());
    };

    let description = parts[3].trim().to_string();
    let plan = match SavingsPlan::new(app.user_id(), description.clone(), target, start, end) {
        Ok(p) => p,
        Err(e) => {
            app.set_status(e.to_string());
            return Ok(());
        }
    };
    let id = db.insert_plan(&plan)?;
    app.refresh_plans(db)?;
    if let Some(pos) = app.plans.iter().position(|p| p.id == Some(id)) {
        app.plan_index = pos;
    }
    app.set_status(format!("Created plan #{id}: {description}"));
    Ok(())
}

fn cmd_participant(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some(plan_id) = app.current_plan_id() else {
        app.set_status("Open a plan first");
        return Ok(());
    };
    let mut parts = args.split_whitespace();
    let Some(name) = parts.next() else {
        app.set_status("Usage: :participant <name> [contact]");
        return Ok(());
    };
    let contact = parts.collect::<Vec<_>>().join(" ");

    let participant = Participant::new(plan_id, name.to_string(), contact);
    db.insert_participant(&participant)?;
    refresh_after_plan_change(app, db, plan_id)?;
    app.set_status(format!("Added participant: {name}"));
    Ok(())
}

fn cmd_contrib(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    const USAGE: &str = "Usage: :contrib <participant> <date> <amount> [description]";
    let Some(plan_id) = app.current_plan_id() else {
        app.set_status("Open a plan first");
        return Ok(());
    };
    let parts: Vec<&str> = args.splitn(4, ' ').collect();
    if parts.len() < 3 {
        app.set_status(USAGE);
        return Ok(());
    }

    let Some(plan) = db.get_plan(plan_id)? else {
        app.set_status(format!("Plan {plan_id} not found"));
        return Ok(());
    };
    let Some(participant_id) = Participant::find_by_name(&plan.participants, parts[0])
        .and_then(|p| p.id)
    else {
        app.set_status(format!("No participant named '{}' in this plan", parts[0]));
        return Ok(());
    };
    let Some(date) = parse_date(parts[1]) else {
        app.set_status(format!("Invalid date: {}", parts[1]));
        return Ok(());
    };
    if date < plan.start_date || date > plan.end_date {
        app.set_status(format!(
            "{date} is outside the plan ({} to {})",
            plan.start_date, plan.end_date
        ));
        return Ok(());
    }
    let Some(amount) = parse_amount(parts[2]) else {
        app.set_status(format!("Invalid amount: {}", parts[2]));
        return Ok(());
    };
    let description = parts.get(3).map(|s| s.trim().to_string()).unwrap_or_default();

    let contribution = Contribution::new(plan_id, participant_id, description, date, amount);
    db.insert_contribution(&contribution)?;
    refresh_after_plan_change(app, db, plan_id)?;
    let verb = if contribution.is_withdrawal() {
        "Withdrawal"
    } else {
        "Contribution"
    };
    app.set_status(format!("{verb} of {} recorded", format_amount(amount.abs())));
    Ok(())
}

fn refresh_after_plan_change(app: &mut App, db: &Database, plan_id: i64) -> anyhow::Result<()> {
    app.refresh_plans(db)?;
    app.open_plan(db, plan_id)?;
    Ok(())
}

// ── Simulation ───────────────────────────────────────────────

fn cmd_simulate(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    const USAGE: &str =
        "Usage: :simulate zero <target> <installments> <participants> | compound <target> <annual%> <months> <participants> | plan <annual%> <participants>";
    let parts: Vec<&str> = args.split_whitespace().collect();
    app.screen = Screen::Simulate;

    // (compound?, target, monthly rate, months, participants)
    let inputs = match parts.as_slice() {
        ["zero", target, n, p] => match (parse_amount(target), parse_count(n), parse_count(p)) {
            (Some(target), Some(n), Some(p)) => Some((false, target, Decimal::ZERO, n, p)),
            _ => None,
        },
        ["compound", target, pct, t, p] => {
            match (parse_amount(target), parse_amount(pct), parse_count(t), parse_count(p)) {
                (Some(target), Some(pct), Some(t), Some(p)) => Some((
                    true,
                    target,
                    projection::monthly_rate_from_annual_percent(pct),
                    t,
                    p,
                )),
                _ => None,
            }
        }
        ["plan", pct, p] => {
            let plan = match app.current_plan_id() {
                Some(id) => db.get_plan(id)?,
                None => None,
            };
            let Some(plan) = plan else {
                app.set_status("Open a plan first");
                return Ok(());
            };
            match (parse_amount(pct), parse_count(p), plan.period_months()) {
                (Some(pct), Some(p), Ok(t)) => Some((
                    true,
                    plan.target,
                    projection::monthly_rate_from_annual_percent(pct),
                    t,
                    p,
                )),
                _ => None,
            }
        }
        _ => None,
    };

    let Some((compound, target, monthly_rate, months, participants)) = inputs else {
        app.set_status(USAGE);
        return Ok(());
    };

    let policy: Box<dyn Projection> = if compound {
        Box::new(projection::CompoundYield {
            target,
            monthly_rate,
            period_months: months,
            participants,
        })
    } else {
        Box::new(projection::ZeroYield {
            target,
            installments: months,
            participants,
        })
    };

    let projected = policy.project().and_then(|result| {
        projection::accumulation_schedule(result.total_per_month, monthly_rate, months)
            .map(|schedule| (result, schedule))
    });
    match projected {
        Ok((result, schedule)) => {
            tracing::info!(policy = policy.name(), months, participants, "projection requested");
            let rounded = result.rounded();
            app.set_status(format!(
                "{}: {} per participant per month, {} accumulated",
                policy.name(),
                format_amount(rounded.per_participant),
                format_amount(rounded.accumulated)
            ));
            app.simulation = Some(Simulation {
                policy: policy.name(),
                target,
                monthly_rate,
                months,
                participants,
                result,
                schedule,
            });
        }
        Err(e) => app.set_status(e.to_string()),
    }
    Ok(())
}

// ── Events ───────────────────────────────────────────────────

fn cmd_event(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    const USAGE: &str = "Usage: :event <YYYY-MM-DD> <HH:MM> <price> <name>";
    let parts: Vec<&str> = args.splitn(4, ' ').collect();
    if parts.len() < 4 || parts[3].trim().is_empty() {
        app.set_status(USAGE);
        return Ok(());
    }
    let Some(starts_at) = Event::parse_starts_at(&format!("{} {}", parts[0], parts[1])) else {
        app.set_status(format!("Invalid date/time: {} {}", parts[0], parts[1]));
        return Ok(());
    };
    let Some(price) = parse_amount(parts[2]).filter(|p| !p.is_sign_negative()) else {
        app.set_status(format!("Invalid price: {}", parts[2]));
        return Ok(());
    };

    let name = parts[3].trim().to_string();
    let event = Event::new(
        app.user_id(),
        name.clone(),
        String::new(),
        price,
        starts_at,
        String::new(),
    );
    db.insert_event(&event)?;
    app.screen = Screen::Events;
    app.refresh_events(db)?;
    app.set_status(format!("Created event: {name}"));
    Ok(())
}

fn cmd_event_edit(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    const USAGE: &str = "Usage: :event-edit <name|contact|price|when|location> <value>";
    let Some(mut event) = app.selected_event().cloned() else {
        app.set_status("No event selected");
        return Ok(());
    };
    let Some((field, value)) = args.split_once(' ') else {
        app.set_status(USAGE);
        return Ok(());
    };
    let value = value.trim();

    match field {
        "name" if !value.is_empty() => event.name = value.to_string(),
        "contact" => event.contact = value.to_string(),
        "location" => event.location = value.to_string(),
        "price" => match parse_amount(value).filter(|p| !p.is_sign_negative()) {
            Some(p) => event.price = p,
            None => {
                app.set_status(format!("Invalid price: {value}"));
                return Ok(());
            }
        },
        "when" => {
            let parsed = Event::parse_starts_at(value).or_else(|| {
                // Time only keeps the date
                NaiveTime::parse_from_str(value, "%H:%M")
                    .ok()
                    .map(|t| event.starts_at.date().and_time(t))
            });
            match parsed {
                Some(at) => event.starts_at = at,
                None => {
                    app.set_status(format!("Invalid date/time: {value}"));
                    return Ok(());
                }
            }
        }
        _ => {
            app.set_status(USAGE);
            return Ok(());
        }
    }

    db.update_event(&event)?;
    app.refresh_events(db)?;
    app.set_status(format!("Updated {field} of {}", event.name));
    Ok(())
}

// ── Delete / export ──────────────────────────────────────────

pub(crate) fn cmd_delete(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let action = match app.screen {
        Screen::Plans => app.selected_plan().and_then(|p| {
            p.id.map(|id| PendingAction::DeletePlan {
                id,
                description: p.description.clone(),
            })
        }),
        Screen::Plan => app.plan.as_ref().and_then(|plan| match app.plan_focus {
            PlanFocus::Participants => {
                plan.participants.get(app.participant_index).and_then(|p| {
                    p.id.map(|id| PendingAction::DeleteParticipant {
                        id,
                        name: p.name.clone(),
                    })
                })
            }
            PlanFocus::Contributions => {
                plan.contributions.get(app.contribution_index).and_then(|c| {
                    c.id.map(|id| PendingAction::DeleteContribution {
                        id,
                        plan_id: c.plan_id,
                        description: format!("{} {}", c.date, format_amount(c.amount)),
                    })
                })
            }
        }),
        Screen::Events => app.selected_event().and_then(|e| {
            e.id.map(|id| PendingAction::DeleteEvent {
                id,
                name: e.name.clone(),
            })
        }),
        Screen::Simulate => None,
    };

    let Some(action) = action else {
        app.set_status("Nothing to delete");
        return Ok(());
    };
    let message = match &action {
        PendingAction::DeletePlan { description, .. } => {
            format!("Delete plan '{description}' with all participants and contributions?")
        }
        PendingAction::DeleteParticipant { name, .. } => {
            format!("Delete participant '{name}' and their contributions?")
        }
        PendingAction::DeleteContribution { description, .. } => {
            format!("Delete contribution {description}?")
        }
        PendingAction::DeleteEvent { name, .. } => format!("Delete event '{name}'?"),
    };
    app.confirm(action, message);
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some(plan_id) = app.current_plan_id() else {
        app.set_status("Open a plan first");
        return Ok(());
    };
    let Some(plan) = db.get_plan(plan_id)? else {
        app.set_status(format!("Plan {plan_id} not found"));
        return Ok(());
    };
    let matrix = match plan.monthly_matrix() {
        Ok(m) => m,
        Err(e) => {
            app.set_status(format!("Export failed: {e}"));
            return Ok(());
        }
    };
    let path = if args.is_empty() {
        crate::run::default_export_path(plan_id)
    } else {
        crate::run::shellexpand(args)
    };
    match crate::export::write_matrix_to_path(&matrix, std::path::Path::new(&path)) {
        Ok(()) => app.set_status(format!("Exported {} to {path}", plan.description)),
        Err(e) => app.set_status(format!("Export failed: {e:#}")),
    }
    Ok(())
}
