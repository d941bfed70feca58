//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - country(id, name)
//! - sport(id, name)
//! - athlete(id, name, country_id)
//! - result(id, athlete_id, sport_id, position, age, year, date, gold, silver, bronze)
//!
//! `result` rows are owned by `athlete` and cascade on delete.

pub mod schema;
pub mod sqlite;

pub use sqlite::{SqliteStore, Gateway, ResultValues, DbStats};
