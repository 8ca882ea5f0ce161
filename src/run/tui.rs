use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::db::Database;
use crate::models::User;
use crate::ui::app::{App, InputMode, PendingAction, PlanFocus, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_up};

pub(crate) fn as_tui(db: &mut Database, user: User) -> Result<()> {
    let mut app = App::new(user);
    app.refresh_all(db)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, db);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "tui exited with error");
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db: &mut Database,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            // tab bar + status + command bar + borders + header
            let content_height = f.area().height.saturating_sub(6) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != event::KeyEventKind::Press {
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, db)?,
                InputMode::Command => handle_command_input(key, app, db)?,
                InputMode::Confirm => handle_confirm_input(key, app, db)?,
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('1') => switch_screen(app, db, Screen::Plans)?,
        KeyCode::Char('2') => switch_screen(app, db, Screen::Plan)?,
        KeyCode::Char('3') => switch_screen(app, db, Screen::Simulate)?,
        KeyCode::Char('4') => switch_screen(app, db, Screen::Events)?,
        KeyCode::Tab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            switch_screen(app, db, screens[(idx + 1) % screens.len()])?;
        }
        KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let prev = if idx == 0 { screens.len() - 1 } else { idx - 1 };
            switch_screen(app, db, screens[prev])?;
        }
        KeyCode::Enter if app.screen == Screen::Plans => {
            commands::cmd_open("", app, db)?;
        }
        KeyCode::Esc => handle_escape(app),
        KeyCode::Char('f') if app.screen == Screen::Plan => {
            app.plan_focus = match app.plan_focus {
                PlanFocus::Participants => PlanFocus::Contributions,
                PlanFocus::Contributions => PlanFocus::Participants,
            };
        }
        KeyCode::Char('g') => handle_goto_top(app),
        KeyCode::Char('G') => handle_goto_bottom(app),
        KeyCode::Char('D') => commands::cmd_delete("", app, db)?,
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, db)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_confirm_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            if let Some(action) = app.pending_action.take() {
                run_pending(action, app, db)?;
            }
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
        }
        _ => {
            // Any other key = cancel
            app.pending_action = None;
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
            app.set_status("Cancelled");
        }
    }
    Ok(())
}

fn run_pending(action: PendingAction, app: &mut App, db: &mut Database) -> Result<()> {
    match action {
        PendingAction::DeletePlan { id, description } => {
            db.delete_plan(id)?;
            if app.plan.as_ref().and_then(|p| p.id) == Some(id) {
                app.close_plan();
            }
            app.refresh_plans(db)?;
            app.set_status(format!("Deleted plan: {description}"));
        }
        PendingAction::DeleteParticipant { id, name } => {
            db.delete_participant(id)?;
            app.refresh_plans(db)?;
            app.refresh_plan(db)?;
            app.set_status(format!("Deleted participant: {name}"));
        }
        PendingAction::DeleteContribution {
            id,
            plan_id,
            description,
        } => {
            db.delete_contribution(id, plan_id)?;
            app.refresh_plans(db)?;
            app.refresh_plan(db)?;
            app.set_status(format!("Deleted contribution: {description}"));
        }
        PendingAction::DeleteEvent { id, name } => {
            db.delete_event(id, app.user_id())?;
            app.refresh_events(db)?;
            app.set_status(format!("Deleted event: {name}"));
        }
    }
    Ok(())
}

// ── Navigation helpers ───────────────────────────────────────

fn switch_screen(app: &mut App, db: &mut Database, screen: Screen) -> Result<()> {
    app.screen = screen;
    match screen {
        Screen::Plans => app.refresh_plans(db)?,
        Screen::Plan => {
            if app.plan.is_none() {
                if let Some(id) = app.selected_plan().and_then(|p| p.id) {
                    app.open_plan(db, id)?;
                }
            } else {
                app.refresh_plan(db)?;
            }
        }
        Screen::Simulate => {}
        Screen::Events => app.refresh_events(db)?,
    }
    Ok(())
}

fn handle_escape(app: &mut App) {
    if app.screen == Screen::Plan {
        app.screen = Screen::Plans;
    }
    app.status_message.clear();
}

fn handle_move_down(app: &mut App) {
    let page = app.visible_rows.max(1);
    match app.screen {
        Screen::Plans => scroll_down(&mut app.plan_index, &mut app.plan_scroll, app.plans.len(), page),
        Screen::Plan => {
            let Some(plan) = &app.plan else { return };
            match app.plan_focus {
                PlanFocus::Participants => {
                    if app.participant_index + 1 < plan.participants.len() {
                        app.participant_index += 1;
                    }
                }
                PlanFocus::Contributions => {
                    // The contributions panel shows about ten rows
                    let len = plan.contributions.len();
                    scroll_down(&mut app.contribution_index, &mut app.contribution_scroll, len, 10);
                }
            }
        }
        Screen::Events => {
            scroll_down(&mut app.event_index, &mut app.event_scroll, app.events.len(), page)
        }
        Screen::Simulate => {}
    }
}

fn handle_move_up(app: &mut App) {
    match app.screen {
        Screen::Plans => scroll_up(&mut app.plan_index, &mut app.plan_scroll),
        Screen::Plan => match app.plan_focus {
            PlanFocus::Participants => {
                app.participant_index = app.participant_index.saturating_sub(1);
            }
            PlanFocus::Contributions => {
                scroll_up(&mut app.contribution_index, &mut app.contribution_scroll)
            }
        },
        Screen::Events => scroll_up(&mut app.event_index, &mut app.event_scroll),
        Screen::Simulate => {}
    }
}

fn handle_goto_top(app: &mut App) {
    match app.screen {
        Screen::Plans => {
            app.plan_index = 0;
            app.plan_scroll = 0;
        }
        Screen::Plan => {
            app.participant_index = 0;
            app.contribution_index = 0;
            app.contribution_scroll = 0;
        }
        Screen::Events => {
            app.event_index = 0;
            app.event_scroll = 0;
        }
        Screen::Simulate => {}
    }
}

fn handle_goto_bottom(app: &mut App) {
    let page = app.visible_rows.max(1);
    match app.screen {
        Screen::Plans if !app.plans.is_empty() => {
            app.plan_index = app.plans.len() - 1;
            app.plan_scroll = app.plan_index.saturating_sub(page - 1);
        }
        Screen::Events if !app.events.is_empty() => {
            app.event_index = app.events.len() - 1;
            app.event_scroll = app.event_index.saturating_sub(page - 1);
        }
        _ => {}
    }
}
