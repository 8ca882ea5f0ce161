mod cli;
mod tui;

pub(crate) use cli::as_cli;
pub(crate) use tui::as_tui;

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

/// `~/groupsave-plan-<id>.csv`
pub(crate) fn default_export_path(plan_id: i64) -> String {
    shellexpand(&format!("~/groupsave-plan-{plan_id}.csv"))
}
