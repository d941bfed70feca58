//! Seed data loading
//!
//! Loads the Olympic winners dataset: a JSON array with one row per athlete
//! per games, e.g.
//!
//! ```json
//! {"athlete": "Michael Phelps", "age": 23, "country": "United States",
//!  "year": 2008, "date": "24/08/2008", "sport": "Swimming",
//!  "gold": 8, "silver": 0, "bronze": 0, "total": 8}
//! ```
//!
//! Countries and sports are created by name when missing. Rows sharing an
//! athlete name and country become one athlete with several results.

use std::collections::HashMap;
use std::path::Path;
use serde::Deserialize;
use crate::Result;
use crate::storage::{Gateway, ResultValues, SqliteStore};

/// One row of the winners dataset
#[derive(Debug, Clone, Deserialize)]
pub struct SeedRow {
    pub athlete: String,
    #[serde(default)]
    pub age: Option<i32>,
    pub country: String,
    pub year: i32,
    #[serde(default)]
    pub date: String,
    pub sport: String,
    #[serde(default)]
    pub gold: i32,
    #[serde(default)]
    pub silver: i32,
    #[serde(default)]
    pub bronze: i32,
}

/// Rows created by a seed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub countries: usize,
    pub sports: usize,
    pub athletes: usize,
    pub results: usize,
}

impl std::fmt::Display for SeedReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} countries, {} sports, {} athletes, {} results",
            self.countries, self.sports, self.athletes, self.results
        )
    }
}

/// Parse a dataset file without touching storage
pub fn read_rows(path: &Path) -> Result<Vec<SeedRow>> {
    let contents = std::fs::read_to_string(path)?;
    let rows = serde_json::from_str(&contents)?;
    Ok(rows)
}

/// Load a dataset file into the store in one transaction
pub fn load_file(store: &mut SqliteStore, path: &Path) -> Result<SeedReport> {
    let rows = read_rows(path)?;
    tracing::info!("Seeding {} rows from {}", rows.len(), path.display());
    let report = store.write(|gw| load_rows(gw, &rows))?;
    tracing::info!("Seed complete: {}", report);
    Ok(report)
}

/// Load parsed rows through a (transaction-bound) gateway
pub fn load_rows(gateway: &Gateway<'_>, rows: &[SeedRow]) -> Result<SeedReport> {
    let mut report = SeedReport::default();
    let mut countries: HashMap<String, i64> = HashMap::new();
    let mut sports: HashMap<String, i64> = HashMap::new();
    let mut athletes: HashMap<(String, i64), i64> = HashMap::new();
    let mut next_position: HashMap<i64, usize> = HashMap::new();

    for row in rows {
        let country_id = match countries.get(&row.country) {
            Some(id) => *id,
            None => {
                let id = match gateway.find_country_by_name(&row.country)? {
                    Some(country) => country.id,
                    None => {
                        report.countries += 1;
                        gateway.insert_country(&row.country)?.id
                    }
                };
                countries.insert(row.country.clone(), id);
                id
            }
        };

        let sport_id = match sports.get(&row.sport) {
            Some(id) => *id,
            None => {
                let id = match gateway.find_sport_by_name(&row.sport)? {
                    Some(sport) => sport.id,
                    None => {
                        report.sports += 1;
                        gateway.insert_sport(&row.sport)?.id
                    }
                };
                sports.insert(row.sport.clone(), id);
                id
            }
        };

        let key = (row.athlete.clone(), country_id);
        let athlete_id = match athletes.get(&key) {
            Some(id) => *id,
            None => {
                let id = gateway.insert_athlete(&row.athlete, country_id)?;
                report.athletes += 1;
                athletes.insert(key, id);
                id
            }
        };

        let position = next_position.entry(athlete_id).or_insert(0);
        let values = ResultValues {
            sport_id,
            age: row.age.unwrap_or(0),
            year: row.year,
            date: row.date.clone(),
            gold: row.gold,
            silver: row.silver,
            bronze: row.bronze,
        };
        gateway.insert_result(athlete_id, *position, &values)?;
        *position += 1;
        report.results += 1;
    }

    Ok(report)
}
