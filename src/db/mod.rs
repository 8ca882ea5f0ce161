mod schema;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::*;

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        tracing::debug!(path = %path.display(), "database opened");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                tracing::info!(from_version, "applying schema migration");
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Users ─────────────────────────────────────────────────

    pub(crate) fn insert_user(&self, user: &User) -> Result<i64> {
        if self.find_user_by_email(&user.email)?.is_some() {
            bail!("A user with e-mail {} already exists", user.email);
        }
        self.conn.execute(
            "INSERT INTO users (name, email, created_at) VALUES (?1, ?2, ?3)",
            params![user.name, user.email, chrono::Utc::now().to_rfc3339()],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(user_id = id, email = %user.email, "user created");
        Ok(id)
    }

    pub(crate) fn get_users(&self) -> Result<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, email FROM users ORDER BY id")?;
        let rows = stmt.query_map([], user_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, name, email FROM users WHERE email = ?1",
                params![email.trim().to_lowercase()],
                user_from_row,
            )
            .optional()?)
    }

    // ── Plans ─────────────────────────────────────────────────

    pub(crate) fn insert_plan(&self, plan: &SavingsPlan) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO plans (owner_id, description, target, start_date, end_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                plan.owner_id,
                plan.description,
                plan.target.to_string(),
                plan.start_date,
                plan.end_date,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(plan_id = id, owner_id = plan.owner_id, "plan created");
        Ok(id)
    }

    /// All plans of `owner_id`, each with its participants and contributions.
    pub(crate) fn get_plans(&self, owner_id: i64) -> Result<Vec<SavingsPlan>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner_id, description, target, start_date, end_date
             FROM plans WHERE owner_id = ?1 ORDER BY start_date, id",
        )?;
        let rows = stmt.query_map(params![owner_id], plan_from_row)?;
        let mut plans = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        for plan in &mut plans {
            self.load_children(plan)?;
        }
        Ok(plans)
    }

    pub(crate) fn get_plan(&self, id: i64) -> Result<Option<SavingsPlan>> {
        let plan = self
            .conn
            .query_row(
                "SELECT id, owner_id, description, target, start_date, end_date
                 FROM plans WHERE id = ?1",
                params![id],
                plan_from_row,
            )
            .optional()?;
        match plan {
            Some(mut p) => {
                self.load_children(&mut p)?;
                Ok(Some(p))
            }
            None => Ok(None),
        }
    }

    fn load_children(&self, plan: &mut SavingsPlan) -> Result<()> {
        let Some(id) = plan.id else {
            return Ok(());
        };
        plan.participants = self.get_participants(id)?;
        plan.contributions = self.get_contributions(id)?;
        Ok(())
    }

    /// Deletes the plan together with its participants and contributions.
    pub(crate) fn delete_plan(&mut self, id: i64) -> Result<()> {
        let tx = self.conn.transaction()?;
        let contributions = tx.execute("DELETE FROM contributions WHERE plan_id = ?1", params![id])?;
        let participants = tx.execute("DELETE FROM participants WHERE plan_id = ?1", params![id])?;
        let plans = tx.execute("DELETE FROM plans WHERE id = ?1", params![id])?;
        tx.commit()?;
        if plans == 0 {
            bail!("Plan {id} not found");
        }
        tracing::info!(plan_id = id, participants, contributions, "plan deleted");
        Ok(())
    }

    // ── Participants ──────────────────────────────────────────

    pub(crate) fn insert_participant(&self, participant: &Participant) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO participants (plan_id, name, contact) VALUES (?1, ?2, ?3)",
                params![participant.plan_id, participant.name, participant.contact],
            )
            .with_context(|| format!("Failed to add participant to plan {}", participant.plan_id))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Participants of a plan in insertion order.
    pub(crate) fn get_participants(&self, plan_id: i64) -> Result<Vec<Participant>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, plan_id, name, contact FROM participants WHERE plan_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![plan_id], participant_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_participant_by_id(&self, id: i64) -> Result<Option<Participant>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, plan_id, name, contact FROM participants WHERE id = ?1",
                params![id],
                participant_from_row,
            )
            .optional()?)
    }

    /// Deletes the participant and every contribution they made.
    pub(crate) fn delete_participant(&mut self, id: i64) -> Result<()> {
        let tx = self.conn.transaction()?;
        let contributions = tx.execute(
            "DELETE FROM contributions WHERE participant_id = ?1",
            params![id],
        )?;
        let removed = tx.execute("DELETE FROM participants WHERE id = ?1", params![id])?;
        tx.commit()?;
        if removed == 0 {
            bail!("Participant {id} not found");
        }
        tracing::info!(participant_id = id, contributions, "participant deleted");
        Ok(())
    }

    // ── Contributions ─────────────────────────────────────────

    pub(crate) fn insert_contribution(&self, contribution: &Contribution) -> Result<i64> {
        let participant = self
            .get_participant_by_id(contribution.participant_id)?
            .with_context(|| format!("Participant {} not found", contribution.participant_id))?;
        if participant.plan_id != contribution.plan_id {
            bail!(
                "Participant {} belongs to plan {}, not plan {}",
                participant.name,
                participant.plan_id,
                contribution.plan_id
            );
        }
        let (start, end): (NaiveDate, NaiveDate) = self
            .conn
            .query_row(
                "SELECT start_date, end_date FROM plans WHERE id = ?1",
                params![contribution.plan_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?
            .with_context(|| format!("Plan {} not found", contribution.plan_id))?;
        if contribution.date < start || contribution.date > end {
            bail!(
                "{} is outside plan {} ({start} to {end})",
                contribution.date,
                contribution.plan_id
            );
        }
        self.conn.execute(
            "INSERT INTO contributions (plan_id, participant_id, description, date, amount)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                contribution.plan_id,
                contribution.participant_id,
                contribution.description,
                contribution.date,
                contribution.amount.to_string(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Contributions of a plan in insertion order.
    pub(crate) fn get_contributions(&self, plan_id: i64) -> Result<Vec<Contribution>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, plan_id, participant_id, description, date, amount
             FROM contributions WHERE plan_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![plan_id], contribution_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_contribution_by_id(&self, id: i64) -> Result<Option<Contribution>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, plan_id, participant_id, description, date, amount
                 FROM contributions WHERE id = ?1",
                params![id],
                contribution_from_row,
            )
            .optional()?)
    }

    /// Deletes a contribution of `plan_id`; ids from other plans are not found.
    pub(crate) fn delete_contribution(&self, id: i64, plan_id: i64) -> Result<()> {
        let removed = self.conn.execute(
            "DELETE FROM contributions WHERE id = ?1 AND plan_id = ?2",
            params![id, plan_id],
        )?;
        if removed == 0 {
            bail!("Contribution {id} not found in plan {plan_id}");
        }
        Ok(())
    }

    // ── Events ────────────────────────────────────────────────

    pub(crate) fn insert_event(&self, event: &Event) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO events (owner_id, name, contact, price, starts_at, location)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                event.owner_id,
                event.name,
                event.contact,
                event.price.to_string(),
                event.starts_at,
                event.location,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_events(&self, owner_id: i64) -> Result<Vec<Event>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner_id, name, contact, price, starts_at, location
             FROM events WHERE owner_id = ?1 ORDER BY starts_at, id",
        )?;
        let rows = stmt.query_map(params![owner_id], event_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_event(&self, id: i64, owner_id: i64) -> Result<Option<Event>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, owner_id, name, contact, price, starts_at, location
                 FROM events WHERE id = ?1 AND owner_id = ?2",
                params![id, owner_id],
                event_from_row,
            )
            .optional()?)
    }

    pub(crate) fn update_event(&self, event: &Event) -> Result<()> {
        let id = event.id.context("Event has no ID")?;
        let changed = self.conn.execute(
            "UPDATE events SET name = ?1, contact = ?2, price = ?3, starts_at = ?4, location = ?5
             WHERE id = ?6 AND owner_id = ?7",
            params![
                event.name,
                event.contact,
                event.price.to_string(),
                event.starts_at,
                event.location,
                id,
                event.owner_id,
            ],
        )?;
        if changed == 0 {
            bail!("Event {id} not found");
        }
        Ok(())
    }

    /// Only the owner can delete an event.
    pub(crate) fn delete_event(&self, id: i64, owner_id: i64) -> Result<()> {
        let removed = self.conn.execute(
            "DELETE FROM events WHERE id = ?1 AND owner_id = ?2",
            params![id, owner_id],
        )?;
        if removed == 0 {
            bail!("Event {id} not found");
        }
        Ok(())
    }
}

// ── Row mapping ───────────────────────────────────────────────

fn decimal_at(row: &Row, idx: usize) -> rusqlite::Result<Decimal> {
    let text: String = row.get(idx)?;
    Decimal::from_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn user_from_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        email: row.get(2)?,
    })
}

fn plan_from_row(row: &Row) -> rusqlite::Result<SavingsPlan> {
    Ok(SavingsPlan {
        id: Some(row.get(0)?),
        owner_id: row.get(1)?,
        description: row.get(2)?,
        target: decimal_at(row, 3)?,
        start_date: row.get(4)?,
        end_date: row.get(5)?,
        participants: Vec::new(),
        contributions: Vec::new(),
    })
}

fn participant_from_row(row: &Row) -> rusqlite::Result<Participant> {
    Ok(Participant {
        id: Some(row.get(0)?),
        plan_id: row.get(1)?,
        name: row.get(2)?,
        contact: row.get(3)?,
    })
}

fn contribution_from_row(row: &Row) -> rusqlite::Result<Contribution> {
    Ok(Contribution {
        id: Some(row.get(0)?),
        plan_id: row.get(1)?,
        participant_id: row.get(2)?,
        description: row.get(3)?,
        date: row.get(4)?,
        amount: decimal_at(row, 5)?,
    })
}

fn event_from_row(row: &Row) -> rusqlite::Result<Event> {
    Ok(Event {
        id: Some(row.get(0)?),
        owner_id: row.get(1)?,
        name: row.get(2)?,
        contact: row.get(3)?,
        price: decimal_at(row, 4)?,
        starts_at: row.get(5)?,
        location: row.get(6)?,
    })
}
