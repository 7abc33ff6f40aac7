use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine};

mod access;
mod expenses;
mod households;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// The domain core: household registry plus expense ledger.
///
/// Every mutating operation runs inside one DB transaction. Mutations that
/// target an existing household additionally serialize on a per-household
/// lock, and household creation serializes on a dedicated lock so invite
/// code check-then-reserve stays atomic across concurrent creations.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    household_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
    creation_lock: tokio::sync::Mutex<()>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub(crate) fn household_lock(&self, household_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .household_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks.entry(household_id.to_string()).or_default().clone()
    }

    /// Drops the lock registry entry for a deleted household so the map
    /// does not grow with every household ever created. Callers holding a
    /// clone of the `Arc` are unaffected.
    pub(crate) fn evict_household_lock(&self, household_id: &str) {
        let mut locks = self
            .household_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks.remove(household_id);
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            household_locks: Mutex::new(HashMap::new()),
            creation_lock: tokio::sync::Mutex::new(()),
        })
    }
}
