mod config;
mod dates;
mod db;
mod error;
mod export;
mod ledger;
mod logging;
mod models;
mod projection;
mod run;
mod ui;

use anyhow::{Context, Result};

const LOCAL_USER_EMAIL: &str = "local@groupsave";

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = config::Config::load()?;
    logging::init(&config.data_dir)?;

    let mut db = db::Database::open(&config.db_path)?;
    let user = current_user(&mut db, config.user_email.as_deref())?;

    match args.len() {
        1 => run::as_tui(&mut db, user),
        2.. => run::as_cli(&args, &mut db, &user),
        _ => {
            eprintln!("Usage: groupsave [command]");
            Ok(())
        }
    }
}

/// The configured user, created on first use. Without configuration, the
/// first user on record, or a "Local" user on a fresh database.
fn current_user(db: &mut db::Database, email: Option<&str>) -> Result<models::User> {
    if let Some(email) = email {
        if let Some(user) = db.find_user_by_email(email)? {
            return Ok(user);
        }
        let name = email.split('@').next().unwrap_or(email).to_string();
        return create_user(db, models::User::new(name, email.to_string()));
    }

    if let Some(user) = db.get_users()?.into_iter().next() {
        return Ok(user);
    }
    create_user(
        db,
        models::User::new("Local".into(), LOCAL_USER_EMAIL.into()),
    )
}

fn create_user(db: &mut db::Database, mut user: models::User) -> Result<models::User> {
    let id = db
        .insert_user(&user)
        .with_context(|| format!("Failed to create user {}", user.email))?;
    user.id = Some(id);
    Ok(user)
}
