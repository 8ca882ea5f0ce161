use anyhow::{bail, Context, Result};
use chrono::Datelike;
use rust_decimal::Decimal;
use std::path::Path;

use crate::dates;
use crate::db::Database;
use crate::models::{Contribution, Event, Participant, SavingsPlan, User};
use crate::projection::{self, ProjectionResult};
use crate::ui::util::{format_amount, format_rate, parse_amount, parse_count, parse_date};

pub(crate) fn as_cli(args: &[String], db: &mut Database, user: &User) -> Result<()> {
    let rest = &args[2..];
    match args[1].as_str() {
        "plans" => cli_plans(db, user),
        "plan" => cli_plan(rest, db, user),
        "participant" => cli_participant(rest, db, user),
        "contrib" => cli_contrib(rest, db, user),
        "simulate" | "sim" => cli_simulate(rest, db, user),
        "export" => cli_export(rest, db, user),
        "events" => cli_events(db, user),
        "event" => cli_event(rest, db, user),
        "users" => cli_users(db),
        "user" => cli_user(rest, db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("groupsave {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("GroupSave - group savings plans, projections and events");
    println!();
    println!("Usage: groupsave [command]");
    println!();
    println!("Commands:");
    println!("  (none)                                      Launch interactive TUI");
    println!("  plans                                       List your plans");
    println!("  plan add <description> <target> <start> <end>");
    println!("  plan show <id>                              Monthly matrix and totals");
    println!("  plan delete <id>                            Delete plan and everything in it");
    println!("  participant add <plan> <name> [contact]");
    println!("  participant delete <id>                     Also deletes their contributions");
    println!("  contrib add <plan> <participant> <date> <amount> [description]");
    println!("  contrib delete <id>");
    println!("  simulate zero <target> <installments> <participants>");
    println!("  simulate compound <target> <annual%> <months> <participants>");
    println!("  simulate plan <id> <annual%> <participants>");
    println!("  simulate range <start> <end> <target> <annual%> <participants> [--create <description>]");
    println!("  export <plan> [path]                        Write the monthly matrix as CSV");
    println!("  events                                      List your events");
    println!("  event add <date> <HH:MM> <price> <name> [location] [contact]");
    println!("  event edit <id> <name|contact|price|when|location> <value>");
    println!("  event delete <id>");
    println!("  users | user add <name> <email>");
    println!("  --help, -h                                  Show this help");
    println!("  --version, -V                               Show version");
    println!();
    println!("Dates are YYYY-MM-DD or DD/MM/YYYY. Participants may be given by id or name.");
}

fn owner_id(user: &User) -> Result<i64> {
    user.id.context("Current user has no ID")
}

fn parse_id(s: &str, what: &str) -> Result<i64> {
    s.parse::<i64>()
        .with_context(|| format!("Invalid {what} id: {s}"))
}

fn arg<'a>(args: &'a [String], i: usize, usage: &str) -> Result<&'a str> {
    match args.get(i) {
        Some(a) => Ok(a.as_str()),
        None => bail!("Usage: groupsave {usage}"),
    }
}

/// Load a plan the current user owns.
fn owned_plan(db: &Database, user: &User, id: i64) -> Result<SavingsPlan> {
    match db.get_plan(id)? {
        Some(plan) if Some(plan.owner_id) == user.id => Ok(plan),
        _ => bail!("Plan {id} not found"),
    }
}

// ── Plans ────────────────────────────────────────────────────

fn cli_plans(db: &Database, user: &User) -> Result<()> {
    let plans = db.get_plans(owner_id(user)?)?;
    if plans.is_empty() {
        println!("No plans");
        return Ok(());
    }

    println!(
        "{:<4} {:<24} {:<23} {:>6} {:>16} {:>16}",
        "ID", "Description", "Period", "People", "Target", "Saved"
    );
    println!("{}", "─".repeat(94));
    for plan in &plans {
        println!(
            "{:<4} {:<24} {:<23} {:>6} {:>16} {:>16}",
            plan.id.unwrap_or(0),
            plan.description,
            format!("{} → {}", plan.start_date, plan.end_date),
            plan.participants.len(),
            format_amount(plan.target),
            format_amount(plan.total_contributed()),
        );
    }
    Ok(())
}

fn cli_plan(args: &[String], db: &mut Database, user: &User) -> Result<()> {
    const USAGE: &str = "plan <add|show|delete> ...";
    match arg(args, 0, USAGE)? {
        "add" => {
            const ADD: &str = "plan add <description> <target> <start> <end>";
            let description = arg(args, 1, ADD)?;
            let target = parse_amount(arg(args, 2, ADD)?)
                .filter(|t| *t > Decimal::ZERO)
                .with_context(|| format!("Invalid target: {}", args[2]))?;
            let start = parse_date(arg(args, 3, ADD)?)
                .with_context(|| format!("Invalid start date: {}", args[3]))?;
            let end = parse_date(arg(args, 4, ADD)?)
                .with_context(|| format!("Invalid end date: {}", args[4]))?;

            let plan = SavingsPlan::new(owner_id(user)?, description.to_string(), target, start, end)?;
            let id = db.insert_plan(&plan)?;
            println!(
                "Created plan #{id}: {description} ({} months)",
                plan.period_months()?
            );
            Ok(())
        }
        "show" => {
            let id = parse_id(arg(args, 1, "plan show <id>")?, "plan")?;
            let plan = owned_plan(db, user, id)?;
            print_plan(&plan)
        }
        "delete" => {
            let id = parse_id(arg(args, 1, "plan delete <id>")?, "plan")?;
            let plan = owned_plan(db, user, id)?;
            db.delete_plan(id)?;
            println!(
                "Deleted plan #{id} ({} participants, {} contributions)",
                plan.participants.len(),
                plan.contributions.len()
            );
            Ok(())
        }
        other => bail!("Unknown plan action: {other}. Usage: groupsave {USAGE}"),
    }
}

fn print_plan(plan: &SavingsPlan) -> Result<()> {
    println!("#{} {}", plan.id.unwrap_or(0), plan.description);
    println!("{}", "─".repeat(40));
    println!("  Target:   {}", format_amount(plan.target));
    println!(
        "  Period:   {} → {} ({} months)",
        plan.start_date,
        plan.end_date,
        plan.period_months()?
    );
    println!(
        "  Months:   {}/{} → {}/{}",
        dates::month_name(plan.start_date.month())?,
        plan.start_date.year(),
        dates::month_name(plan.end_date.month())?,
        plan.end_date.year()
    );
    println!("  Saved:    {}", format_amount(plan.total_contributed()));
    println!();

    if plan.participants.is_empty() {
        println!("No participants yet");
        return Ok(());
    }

    println!("Participants:");
    for p in &plan.participants {
        println!("  {:<4} {:<20} {}", p.id.unwrap_or(0), p.name, p.contact);
    }
    println!();

    let matrix = plan.monthly_matrix()?;
    let labels = plan.month_labels()?;
    let mut header = format!("{:<16}", "");
    for label in &labels {
        header.push_str(&format!(" {label:>14}"));
    }
    header.push_str(&format!(" {:>14}", "total"));
    println!("{header}");
    println!("{}", "─".repeat(header.chars().count()));

    let line = |label: &str, cells: &[Decimal], total| {
        let mut out = format!("{label:<16}");
        for cell in cells {
            out.push_str(&format!(" {:>14}", format_amount(*cell)));
        }
        out.push_str(&format!(" {:>14}", format_amount(total)));
        out
    };
    for row in &matrix.rows {
        println!("{}", line(&row.label, &row.cells, row.total()));
    }
    println!("{}", line("total", &matrix.column_totals(), matrix.grand_total()));

    if !plan.contributions.is_empty() {
        println!();
        println!("Contributions:");
        for c in &plan.contributions {
            let who = plan
                .find_participant(c.participant_id)
                .map(|p| p.name.as_str())
                .unwrap_or("?");
            println!(
                "  {:<4} {} {:<16} {:>14}  {}",
                c.id.unwrap_or(0),
                c.date,
                who,
                format_amount(c.amount),
                c.description
            );
        }
    }
    Ok(())
}

// ── Participants & contributions ─────────────────────────────

fn cli_participant(args: &[String], db: &mut Database, user: &User) -> Result<()> {
    const USAGE: &str = "participant <add|delete> ...";
    match arg(args, 0, USAGE)? {
        "add" => {
            const ADD: &str = "participant add <plan> <name> [contact]";
            let plan_id = parse_id(arg(args, 1, ADD)?, "plan")?;
            let name = arg(args, 2, ADD)?;
            let contact = args.get(3..).map(|c| c.join(" ")).unwrap_or_default();
            owned_plan(db, user, plan_id)?;

            let id = db.insert_participant(&Participant::new(plan_id, name.to_string(), contact))?;
            println!("Added participant #{id}: {name}");
            Ok(())
        }
        "delete" => {
            let id = parse_id(arg(args, 1, "participant delete <id>")?, "participant")?;
            let participant = db
                .get_participant_by_id(id)?
                .with_context(|| format!("Participant {id} not found"))?;
            owned_plan(db, user, participant.plan_id)?;
            db.delete_participant(id)?;
            println!("Deleted participant #{id}: {}", participant.name);
            Ok(())
        }
        other => bail!("Unknown participant action: {other}. Usage: groupsave {USAGE}"),
    }
}

fn cli_contrib(args: &[String], db: &mut Database, user: &User) -> Result<()> {
    const USAGE: &str = "contrib <add|delete> ...";
    match arg(args, 0, USAGE)? {
        "add" => {
            const ADD: &str = "contrib add <plan> <participant> <date> <amount> [description]";
            let plan_id = parse_id(arg(args, 1, ADD)?, "plan")?;
            let plan = owned_plan(db, user, plan_id)?;

            let who = arg(args, 2, ADD)?;
            let participant = match who.parse::<i64>() {
                Ok(id) => plan.find_participant(id),
                Err(_) => Participant::find_by_name(&plan.participants, who),
            }
            .with_context(|| format!("No participant '{who}' in plan {plan_id}"))?;
            let participant_id = participant.id.context("Participant has no ID")?;

            let date = parse_date(arg(args, 3, ADD)?)
                .with_context(|| format!("Invalid date: {}", args[3]))?;
            if date < plan.start_date || date > plan.end_date {
                bail!(
                    "{date} is outside the plan ({} to {})",
                    plan.start_date,
                    plan.end_date
                );
            }
            let amount = parse_amount(arg(args, 4, ADD)?)
                .with_context(|| format!("Invalid amount: {}", args[4]))?;
            let description = args.get(5..).map(|d| d.join(" ")).unwrap_or_default();

            let contribution = Contribution::new(plan_id, participant_id, description, date, amount);
            let id = db.insert_contribution(&contribution)?;
            let kind = if contribution.is_withdrawal() {
                "withdrawal"
            } else {
                "contribution"
            };
            println!(
                "Recorded {kind} #{id}: {} by {} on {date}",
                format_amount(amount),
                participant.name
            );
            Ok(())
        }
        "delete" => {
            let id = parse_id(arg(args, 1, "contrib delete <id>")?, "contribution")?;
            let contribution = db
                .get_contribution_by_id(id)?
                .with_context(|| format!("Contribution {id} not found"))?;
            owned_plan(db, user, contribution.plan_id)
                .with_context(|| format!("Contribution {id} not found"))?;
            db.delete_contribution(id, contribution.plan_id)?;
            println!("Deleted contribution #{id}");
            Ok(())
        }
        other => bail!("Unknown contrib action: {other}. Usage: groupsave {USAGE}"),
    }
}

// ── Projections ──────────────────────────────────────────────

fn cli_simulate(args: &[String], db: &mut Database, user: &User) -> Result<()> {
    const USAGE: &str = "simulate <zero|compound|plan|range> ...";
    let count = |i: usize, what: &str, usage: &str| -> Result<u32> {
        let raw = arg(args, i, usage)?;
        parse_count(raw).with_context(|| format!("{what} must be a positive whole number, got {raw}"))
    };
    let amount = |i: usize, what: &str, usage: &str| -> Result<Decimal> {
        let raw = arg(args, i, usage)?;
        parse_amount(raw).with_context(|| format!("Invalid {what}: {raw}"))
    };

    match arg(args, 0, USAGE)? {
        "zero" => {
            const ZERO: &str = "simulate zero <target> <installments> <participants>";
            let target = amount(1, "target", ZERO)?;
            let installments = count(2, "installments", ZERO)?;
            let participants = count(3, "participants", ZERO)?;
            let r = projection::compute_zero_yield(target, installments, participants)?;
            tracing::info!(policy = "zero-yield", installments, participants, "projection requested");
            print_projection("zero-yield", &r, None);
            Ok(())
        }
        "compound" => {
            const COMPOUND: &str = "simulate compound <target> <annual%> <months> <participants>";
            let target = amount(1, "target", COMPOUND)?;
            let rate = projection::monthly_rate_from_annual_percent(amount(2, "rate", COMPOUND)?);
            let months = count(3, "months", COMPOUND)?;
            let participants = count(4, "participants", COMPOUND)?;
            let r = projection::compute_compound_yield(target, rate, months, participants)?;
            tracing::info!(policy = "compound-yield", months, participants, "projection requested");
            print_projection("compound-yield", &r, Some(rate));
            Ok(())
        }
        "plan" => {
            const PLAN: &str = "simulate plan <id> <annual%> <participants>";
            let id = parse_id(arg(args, 1, PLAN)?, "plan")?;
            let plan = owned_plan(db, user, id)?;
            let annual = amount(2, "rate", PLAN)?;
            let participants = count(3, "participants", PLAN)?;
            let r = projection::project_plan(&plan, annual, participants)?;
            tracing::info!(policy = "compound-yield", plan_id = id, participants, "projection requested");
            println!(
                "{} over {} months",
                plan.description,
                plan.period_months()?
            );
            print_projection(
                "compound-yield",
                &r,
                Some(projection::monthly_rate_from_annual_percent(annual)),
            );
            Ok(())
        }
        "range" => {
            const RANGE: &str =
                "simulate range <start> <end> <target> <annual%> <participants> [--create <description>]";
            let start = parse_date(arg(args, 1, RANGE)?)
                .with_context(|| format!("Invalid start date: {}", args[1]))?;
            let end = parse_date(arg(args, 2, RANGE)?)
                .with_context(|| format!("Invalid end date: {}", args[2]))?;
            let target = amount(3, "target", RANGE)?;
            let annual = amount(4, "rate", RANGE)?;
            let participants = count(5, "participants", RANGE)?;
            let description = match args.get(6).map(String::as_str) {
                Some("--create") => {
                    let d = args.get(7..).map(|d| d.join(" ")).unwrap_or_default();
                    if d.trim().is_empty() {
                        bail!("Usage: groupsave {RANGE}");
                    }
                    Some(d)
                }
                Some(other) => bail!("Unexpected argument: {other}. Usage: groupsave {RANGE}"),
                None => None,
            };

            let plan = SavingsPlan::new(
                owner_id(user)?,
                description.clone().unwrap_or_default(),
                target,
                start,
                end,
            )?;
            let r = projection::project_plan(&plan, annual, participants)?;
            tracing::info!(policy = "compound-yield", participants, "projection requested");
            println!("{start} → {end} over {} months", plan.period_months()?);
            print_projection(
                "compound-yield",
                &r,
                Some(projection::monthly_rate_from_annual_percent(annual)),
            );

            if let Some(description) = description {
                let id = db.insert_plan(&plan)?;
                println!();
                println!("Created plan #{id}: {description}");
            }
            Ok(())
        }
        other => bail!("Unknown projection: {other}. Usage: groupsave {USAGE}"),
    }
}

fn print_projection(policy: &str, result: &ProjectionResult, rate: Option<Decimal>) {
    let r = result.rounded();
    println!("Projection ({policy})");
    println!("{}", "─".repeat(40));
    if let Some(rate) = rate {
        println!("  Rate:             {}", format_rate(rate));
    }
    println!("  Per participant:  {}", format_amount(r.per_participant));
    println!("  Group per month:  {}", format_amount(r.total_per_month));
    println!("  Accumulated:      {}", format_amount(r.accumulated));
}

fn cli_export(args: &[String], db: &mut Database, user: &User) -> Result<()> {
    let plan_id = parse_id(arg(args, 0, "export <plan> [path]")?, "plan")?;
    let plan = owned_plan(db, user, plan_id)?;
    let matrix = plan.monthly_matrix()?;

    let output_path = args
        .get(1)
        .map(|a| super::shellexpand(a))
        .unwrap_or_else(|| super::default_export_path(plan_id));

    crate::export::write_matrix_to_path(&matrix, Path::new(&output_path))?;
    println!(
        "Exported {} participants x {} months to {output_path}",
        matrix.rows.len(),
        matrix.months
    );
    Ok(())
}

// ── Events ───────────────────────────────────────────────────

fn cli_events(db: &Database, user: &User) -> Result<()> {
    let events = db.get_events(owner_id(user)?)?;
    if events.is_empty() {
        println!("No events");
        return Ok(());
    }

    println!(
        "{:<4} {:<17} {:<24} {:>12} {:<20} Contact",
        "ID", "When", "Name", "Price", "Location"
    );
    println!("{}", "─".repeat(90));
    for e in &events {
        println!(
            "{:<4} {:<17} {:<24} {:>12} {:<20} {}",
            e.id.unwrap_or(0),
            e.starts_at.format(Event::DATETIME_FORMAT).to_string(),
            e.name,
            format_amount(e.price),
            e.location,
            e.contact,
        );
    }
    Ok(())
}

fn cli_event(args: &[String], db: &mut Database, user: &User) -> Result<()> {
    const USAGE: &str = "event <add|edit|delete> ...";
    let owner = owner_id(user)?;
    match arg(args, 0, USAGE)? {
        "add" => {
            const ADD: &str = "event add <date> <HH:MM> <price> <name> [location] [contact]";
            let when = format!("{} {}", arg(args, 1, ADD)?, arg(args, 2, ADD)?);
            let starts_at = Event::parse_starts_at(&when)
                .with_context(|| format!("Invalid date/time: {when}"))?;
            let price = parse_amount(arg(args, 3, ADD)?)
                .filter(|p| !p.is_sign_negative())
                .with_context(|| format!("Invalid price: {}", args[3]))?;
            let name = arg(args, 4, ADD)?.to_string();
            let location = args.get(5).cloned().unwrap_or_default();
            let contact = args.get(6).cloned().unwrap_or_default();

            let id = db.insert_event(&Event::new(owner, name.clone(), contact, price, starts_at, location))?;
            println!("Created event #{id}: {name}");
            Ok(())
        }
        "edit" => {
            const EDIT: &str = "event edit <id> <name|contact|price|when|location> <value>";
            let id = parse_id(arg(args, 1, EDIT)?, "event")?;
            let field = arg(args, 2, EDIT)?;
            let value = args.get(3..).map(|v| v.join(" ")).unwrap_or_default();
            let mut event = db
                .get_event(id, owner)?
                .with_context(|| format!("Event {id} not found"))?;

            match field {
                "name" if !value.is_empty() => event.name = value,
                "contact" => event.contact = value,
                "location" => event.location = value,
                "price" => {
                    event.price = parse_amount(&value)
                        .filter(|p| !p.is_sign_negative())
                        .with_context(|| format!("Invalid price: {value}"))?;
                }
                "when" => {
                    event.starts_at = Event::parse_starts_at(&value)
                        .with_context(|| format!("Invalid date/time: {value}"))?;
                }
                _ => bail!("Usage: groupsave {EDIT}"),
            }
            db.update_event(&event)?;
            println!("Updated event #{id}");
            Ok(())
        }
        "delete" => {
            let id = parse_id(arg(args, 1, "event delete <id>")?, "event")?;
            db.delete_event(id, owner)?;
            println!("Deleted event #{id}");
            Ok(())
        }
        other => bail!("Unknown event action: {other}. Usage: groupsave {USAGE}"),
    }
}

// ── Users ────────────────────────────────────────────────────

fn cli_users(db: &Database) -> Result<()> {
    let users = db.get_users()?;
    if users.is_empty() {
        println!("No users");
        return Ok(());
    }
    for u in &users {
        println!("{:<4} {u}", u.id.unwrap_or(0));
    }
    Ok(())
}

fn cli_user(args: &[String], db: &mut Database) -> Result<()> {
    const ADD: &str = "user add <name> <email>";
    match arg(args, 0, ADD)? {
        "add" => {
            let name = arg(args, 1, ADD)?;
            let email = arg(args, 2, ADD)?;
            if !email.contains('@') {
                bail!("Invalid e-mail: {email}");
            }
            let user = User::new(name.to_string(), email.to_string());
            let id = db.insert_user(&user)?;
            println!("Created user #{id}: {user}");
            println!("Set GROUPSAVE_USER={} to act as this user", user.email);
            Ok(())
        }
        other => bail!("Unknown user action: {other}. Usage: groupsave {ADD}"),
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
