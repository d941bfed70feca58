//! Aggregate reconciliation
//!
//! Merges a submitted (detached) athlete graph into storage:
//! 1. Resolve the country by id (reference data is never written here)
//! 2. Insert or update the athlete row
//! 3. Diff submitted results against the persisted ones by id:
//!    update matches, insert the rest, delete what was not submitted
//! 4. Reload the aggregate through the same transaction
//!
//! All steps take a transaction-bound [`Gateway`]; use
//! [`SqliteStore::save_athlete`] to get one transaction per save.

use std::collections::BTreeSet;
use crate::{Error, Result};
use crate::model::{Athlete, Country, Sport};
use crate::storage::{Gateway, ResultValues, SqliteStore};
use crate::submission::{AthleteSubmission, ResultSubmission};

/// What a save did to the result rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub updated: usize,
    pub inserted: usize,
    pub deleted: usize,
}

/// Save a submitted athlete and its results, returning the reloaded aggregate.
pub fn save_athlete(gateway: &Gateway<'_>, submission: &AthleteSubmission) -> Result<Athlete> {
    let (athlete, stats) = reconcile(gateway, submission)?;
    tracing::debug!(
        athlete_id = athlete.id,
        updated = stats.updated,
        inserted = stats.inserted,
        deleted = stats.deleted,
        "Saved athlete"
    );
    Ok(athlete)
}

/// Save a submitted athlete, also reporting how its results changed.
pub fn reconcile(gateway: &Gateway<'_>, submission: &AthleteSubmission) -> Result<(Athlete, ReconcileStats)> {
    let name = submission.name.trim();
    if name.is_empty() {
        return Err(Error::Validation("athlete name must not be empty".to_string()));
    }

    let athlete_id = match submission.id {
        Some(id) => {
            let persisted = gateway
                .find_athlete_by_id(id)?
                .ok_or(Error::NotFound { entity: "athlete", id })?;
            // An existing athlete may omit the country and keep the stored one
            let country = match submission.country.as_ref().and_then(|c| c.id) {
                Some(country_id) => resolve_country(gateway, country_id)?,
                None => persisted.country,
            };
            gateway.update_athlete(id, name, country.id)?;
            id
        }
        None => {
            let country_id = submission
                .country
                .as_ref()
                .and_then(|c| c.id)
                .ok_or_else(|| Error::Validation("a new athlete needs a country id".to_string()))?;
            let country = resolve_country(gateway, country_id)?;
            gateway.insert_athlete(name, country.id)?
        }
    };

    let stats = reconcile_results(gateway, athlete_id, &submission.results)?;

    let athlete = gateway
        .find_athlete_by_id(athlete_id)?
        .ok_or(Error::NotFound { entity: "athlete", id: athlete_id })?;
    Ok((athlete, stats))
}

/// Delete an athlete and its results. Deleting a missing athlete succeeds.
pub fn delete_athlete(gateway: &Gateway<'_>, id: i64) -> Result<()> {
    if gateway.delete_athlete_by_id(id)? {
        tracing::debug!(athlete_id = id, "Deleted athlete");
    } else {
        tracing::debug!(athlete_id = id, "Delete of missing athlete ignored");
    }
    Ok(())
}

/// Set-difference merge of submitted results against the persisted ones.
///
/// Submissions are applied in order, so a duplicated id ends up with the
/// values of its last occurrence. An id the athlete does not own is
/// inserted as a new row rather than taken from another athlete.
fn reconcile_results(
    gateway: &Gateway<'_>,
    athlete_id: i64,
    submitted: &[ResultSubmission],
) -> Result<ReconcileStats> {
    let persisted: BTreeSet<i64> = gateway.result_ids_for_athlete(athlete_id)?.into_iter().collect();
    let mut to_delete = persisted.clone();
    let mut stats = ReconcileStats::default();

    for (position, result) in submitted.iter().enumerate() {
        let values = result_values(gateway, result)?;
        match result.id {
            Some(id) if persisted.contains(&id) => {
                gateway.update_result(id, athlete_id, position, &values)?;
                to_delete.remove(&id);
                stats.updated += 1;
            }
            _ => {
                gateway.insert_result(athlete_id, position, &values)?;
                stats.inserted += 1;
            }
        }
    }

    for id in to_delete {
        gateway.delete_result(id)?;
        stats.deleted += 1;
    }

    Ok(stats)
}

fn result_values(gateway: &Gateway<'_>, result: &ResultSubmission) -> Result<ResultValues> {
    let sport_id = result
        .sport
        .as_ref()
        .and_then(|s| s.id)
        .ok_or_else(|| Error::Validation("every result needs a sport id".to_string()))?;
    let sport = resolve_sport(gateway, sport_id)?;

    if result.gold < 0 || result.silver < 0 || result.bronze < 0 {
        return Err(Error::Validation(format!(
            "medal counts must not be negative (gold {}, silver {}, bronze {})",
            result.gold, result.silver, result.bronze
        )));
    }

    Ok(ResultValues {
        sport_id: sport.id,
        age: result.age,
        year: result.year,
        date: result.date.clone(),
        gold: result.gold,
        silver: result.silver,
        bronze: result.bronze,
    })
}

fn resolve_country(gateway: &Gateway<'_>, id: i64) -> Result<Country> {
    gateway
        .find_country_by_id(id)?
        .ok_or(Error::NotFound { entity: "country", id })
}

fn resolve_sport(gateway: &Gateway<'_>, id: i64) -> Result<Sport> {
    gateway
        .find_sport_by_id(id)?
        .ok_or(Error::NotFound { entity: "sport", id })
}

impl SqliteStore {
    /// Save a submitted athlete in its own transaction
    pub fn save_athlete(&mut self, submission: &AthleteSubmission) -> Result<Athlete> {
        self.write(|gateway| save_athlete(gateway, submission))
    }

    /// Delete an athlete in its own transaction; missing ids are a no-op
    pub fn delete_athlete(&mut self, id: i64) -> Result<()> {
        self.write(|gateway| delete_athlete(gateway, id))
    }
}
