use anyhow::Result;
use rust_decimal::Decimal;

use crate::db::Database;
use crate::ledger::MonthlyMatrix;
use crate::models::*;
use crate::projection::ProjectionResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Plans,
    Plan,
    Simulate,
    Events,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Plans, Self::Plan, Self::Simulate, Self::Events]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plans => write!(f, "Plans"),
            Self::Plan => write!(f, "Plan"),
            Self::Simulate => write!(f, "Simulate"),
            Self::Events => write!(f, "Events"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Which list the cursor moves on the Plan screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlanFocus {
    Participants,
    Contributions,
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone)]
pub(crate) enum PendingAction {
    DeletePlan { id: i64, description: String },
    DeleteParticipant { id: i64, name: String },
    DeleteContribution {
        id: i64,
        plan_id: i64,
        description: String,
    },
    DeleteEvent { id: i64, name: String },
}

/// Inputs and outcome of the last projection run on the Simulate screen.
#[derive(Debug, Clone)]
pub(crate) struct Simulation {
    pub(crate) policy: &'static str,
    pub(crate) target: Decimal,
    pub(crate) monthly_rate: Decimal,
    pub(crate) months: u32,
    pub(crate) participants: u32,
    pub(crate) result: ProjectionResult,
    /// Balance at the end of each month.
    pub(crate) schedule: Vec<Decimal>,
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) user: User,

    // Plans
    pub(crate) plans: Vec<SavingsPlan>,
    pub(crate) plan_index: usize,
    pub(crate) plan_scroll: usize,

    // Open plan
    pub(crate) plan: Option<SavingsPlan>,
    pub(crate) matrix: Option<MonthlyMatrix>,
    pub(crate) matrix_error: Option<String>,
    pub(crate) plan_focus: PlanFocus,
    pub(crate) participant_index: usize,
    pub(crate) contribution_index: usize,
    pub(crate) contribution_scroll: usize,

    // Simulate
    pub(crate) simulation: Option<Simulation>,

    // Events
    pub(crate) events: Vec<Event>,
    pub(crate) event_index: usize,
    pub(crate) event_scroll: usize,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(user: User) -> Self {
        Self {
            running: true,
            screen: Screen::Plans,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,
            user,

            plans: Vec::new(),
            plan_index: 0,
            plan_scroll: 0,

            plan: None,
            matrix: None,
            matrix_error: None,
            plan_focus: PlanFocus::Participants,
            participant_index: 0,
            contribution_index: 0,
            contribution_scroll: 0,

            simulation: None,

            events: Vec::new(),
            event_index: 0,
            event_scroll: 0,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    pub(crate) fn user_id(&self) -> i64 {
        self.user.id.unwrap_or_default()
    }

    pub(crate) fn refresh_plans(&mut self, db: &Database) -> Result<()> {
        self.plans = db.get_plans(self.user_id())?;
        crate::ui::util::clamp_index(&mut self.plan_index, self.plans.len());
        Ok(())
    }

    /// Load `id` as the open plan and rebuild its matrix.
    pub(crate) fn open_plan(&mut self, db: &Database, id: i64) -> Result<bool> {
        let Some(plan) = db.get_plan(id)? else {
            return Ok(false);
        };
        let same_plan = self.plan.as_ref().and_then(|p| p.id) == Some(id);
        if !same_plan {
            self.participant_index = 0;
            self.contribution_index = 0;
            self.contribution_scroll = 0;
        }
        match plan.monthly_matrix() {
            Ok(m) => {
                self.matrix = Some(m);
                self.matrix_error = None;
            }
            Err(e) => {
                tracing::warn!(plan_id = id, error = %e, "monthly matrix build failed");
                self.matrix = None;
                self.matrix_error = Some(e.to_string());
            }
        }
        crate::ui::util::clamp_index(&mut self.participant_index, plan.participants.len());
        crate::ui::util::clamp_index(&mut self.contribution_index, plan.contributions.len());
        self.plan = Some(plan);
        Ok(true)
    }

    /// Reload the open plan after a change.
    pub(crate) fn refresh_plan(&mut self, db: &Database) -> Result<()> {
        if let Some(id) = self.plan.as_ref().and_then(|p| p.id) {
            if !self.open_plan(db, id)? {
                self.close_plan();
            }
        }
        Ok(())
    }

    pub(crate) fn close_plan(&mut self) {
        self.plan = None;
        self.matrix = None;
        self.matrix_error = None;
    }

    pub(crate) fn refresh_events(&mut self, db: &Database) -> Result<()> {
        self.events = db.get_events(self.user_id())?;
        crate::ui::util::clamp_index(&mut self.event_index, self.events.len());
        Ok(())
    }

    pub(crate) fn refresh_all(&mut self, db: &Database) -> Result<()> {
        self.refresh_plans(db)?;
        self.refresh_plan(db)?;
        self.refresh_events(db)?;
        Ok(())
    }

    pub(crate) fn selected_plan(&self) -> Option<&SavingsPlan> {
        self.plans.get(self.plan_index)
    }

    pub(crate) fn selected_event(&self) -> Option<&Event> {
        self.events.get(self.event_index)
    }

    /// Open plan id, or the plan under the cursor on the Plans screen.
    pub(crate) fn current_plan_id(&self) -> Option<i64> {
        self.plan
            .as_ref()
            .or_else(|| self.selected_plan())
            .and_then(|p| p.id)
    }

    pub(crate) fn confirm(&mut self, action: PendingAction, message: String) {
        self.pending_action = Some(action);
        self.confirm_message = message;
        self.input_mode = InputMode::Confirm;
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
