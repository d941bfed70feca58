//! SQLite storage implementation

use std::collections::HashMap;
use std::path::Path;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use crate::{Result, Error};
use crate::model::{Athlete, AthleteResult, Country, Sport};
use super::schema;

const ATHLETE_COLUMNS: &str =
    "a.id, a.name, c.id, c.name FROM athlete a JOIN country c ON c.id = a.country_id";

const RESULT_COLUMNS: &str =
    "r.id, r.athlete_id, s.id, s.name, r.age, r.year, r.date, r.gold, r.silver, r.bronze \
     FROM result r JOIN sport s ON s.id = r.sport_id";

/// SQLite-backed storage for athletes and their reference data
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute_batch(schema::PRAGMAS)?;
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    /// Gateway for reads outside of any write transaction
    pub fn reader(&self) -> Gateway<'_> {
        Gateway::new(&self.conn)
    }

    /// Run `f` inside one write transaction.
    ///
    /// The transaction is taken IMMEDIATE so concurrent writers queue on the
    /// database lock. It commits when `f` returns `Ok` and rolls back
    /// otherwise, so no partial writes survive a failed request.
    pub fn write<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&Gateway<'_>) -> Result<T>,
    {
        let tx = self.conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let outcome = f(&Gateway::new(&tx));
        match outcome {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(e) => {
                tracing::debug!("Rolling back write transaction: {}", e);
                if let Err(rollback_err) = tx.rollback() {
                    tracing::warn!("Rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        self.reader().stats()
    }
}

/// Column values of a result row, minus its identity and owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultValues {
    pub sport_id: i64,
    pub age: i32,
    pub year: i32,
    pub date: String,
    pub gold: i32,
    pub silver: i32,
    pub bronze: i32,
}

/// Typed CRUD over one connection or open transaction.
///
/// Every call goes through the connection it was built with, so a gateway
/// built inside [`SqliteStore::write`] sees its own uncommitted writes.
#[derive(Clone, Copy)]
pub struct Gateway<'c> {
    conn: &'c Connection,
}

impl<'c> Gateway<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    // ========== Reference Data ==========

    /// Insert a country, returning it with its assigned id
    pub fn insert_country(&self, name: &str) -> Result<Country> {
        self.conn.execute("INSERT INTO country (name) VALUES (?1)", [name])?;
        Ok(Country { id: self.conn.last_insert_rowid(), name: name.to_string() })
    }

    pub fn find_country_by_id(&self, id: i64) -> Result<Option<Country>> {
        self.conn
            .query_row("SELECT id, name FROM country WHERE id = ?1", [id], row_to_country)
            .optional()
            .map_err(Into::into)
    }

    pub fn find_country_by_name(&self, name: &str) -> Result<Option<Country>> {
        self.conn
            .query_row("SELECT id, name FROM country WHERE name = ?1", [name], row_to_country)
            .optional()
            .map_err(Into::into)
    }

    /// All countries in insertion order
    pub fn list_countries(&self) -> Result<Vec<Country>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM country ORDER BY id")?;
        let countries = stmt
            .query_map([], row_to_country)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(countries)
    }

    /// Insert a sport, returning it with its assigned id
    pub fn insert_sport(&self, name: &str) -> Result<Sport> {
        self.conn.execute("INSERT INTO sport (name) VALUES (?1)", [name])?;
        Ok(Sport { id: self.conn.last_insert_rowid(), name: name.to_string() })
    }

    pub fn find_sport_by_id(&self, id: i64) -> Result<Option<Sport>> {
        self.conn
            .query_row("SELECT id, name FROM sport WHERE id = ?1", [id], row_to_sport)
            .optional()
            .map_err(Into::into)
    }

    pub fn find_sport_by_name(&self, name: &str) -> Result<Option<Sport>> {
        self.conn
            .query_row("SELECT id, name FROM sport WHERE name = ?1", [name], row_to_sport)
            .optional()
            .map_err(Into::into)
    }

    /// All sports in insertion order
    pub fn list_sports(&self) -> Result<Vec<Sport>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM sport ORDER BY id")?;
        let sports = stmt
            .query_map([], row_to_sport)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(sports)
    }

    // ========== Athlete Operations ==========

    /// Load an athlete aggregate by id
    pub fn find_athlete_by_id(&self, id: i64) -> Result<Option<Athlete>> {
        let sql = format!("SELECT {} WHERE a.id = ?1", ATHLETE_COLUMNS);
        let athlete = self.conn.query_row(&sql, [id], row_to_athlete).optional()?;
        athlete.map(|a| self.with_results(a)).transpose()
    }

    /// Load the first athlete (lowest id) with the given name.
    /// Names are not unique in real data.
    pub fn find_athlete_by_name(&self, name: &str) -> Result<Option<Athlete>> {
        let sql = format!("SELECT {} WHERE a.name = ?1 ORDER BY a.id LIMIT 1", ATHLETE_COLUMNS);
        let athlete = self.conn.query_row(&sql, [name], row_to_athlete).optional()?;
        athlete.map(|a| self.with_results(a)).transpose()
    }

    /// Load every athlete aggregate in insertion order
    pub fn list_athletes(&self) -> Result<Vec<Athlete>> {
        let sql = format!("SELECT {} ORDER BY a.id", ATHLETE_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let mut athletes = stmt
            .query_map([], row_to_athlete)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        // One pass over result, bucketed by owner
        let sql = format!("SELECT {} ORDER BY r.athlete_id, r.position, r.id", RESULT_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let mut by_athlete: HashMap<i64, Vec<AthleteResult>> = HashMap::new();
        for result in stmt.query_map([], row_to_result)? {
            let result = result?;
            by_athlete.entry(result.athlete_id).or_default().push(result);
        }

        for athlete in &mut athletes {
            athlete.results = by_athlete.remove(&athlete.id).unwrap_or_default();
        }
        Ok(athletes)
    }

    /// Insert an athlete row, returning its assigned id
    pub fn insert_athlete(&self, name: &str, country_id: i64) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO athlete (name, country_id) VALUES (?1, ?2)",
            params![name, country_id],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Overwrite the mutable scalar fields of an athlete row
    pub fn update_athlete(&self, id: i64, name: &str, country_id: i64) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE athlete SET name = ?2, country_id = ?3 WHERE id = ?1",
            params![id, name, country_id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound { entity: "athlete", id });
        }
        Ok(())
    }

    /// Delete an athlete and, by cascade, all of its results.
    ///
    /// Returns whether a row existed. A missing athlete is not an error.
    pub fn delete_athlete_by_id(&self, id: i64) -> Result<bool> {
        let deleted = self.conn.execute("DELETE FROM athlete WHERE id = ?1", [id])?;
        Ok(deleted > 0)
    }

    // ========== Result Operations ==========

    /// Ids of the results currently owned by an athlete
    pub fn result_ids_for_athlete(&self, athlete_id: i64) -> Result<Vec<i64>> {
        let mut stmt = self.conn.prepare("SELECT id FROM result WHERE athlete_id = ?1 ORDER BY id")?;
        let ids = stmt
            .query_map([athlete_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(ids)
    }

    /// Results owned by an athlete, in submission order
    pub fn results_for_athlete(&self, athlete_id: i64) -> Result<Vec<AthleteResult>> {
        let sql = format!("SELECT {} WHERE r.athlete_id = ?1 ORDER BY r.position, r.id", RESULT_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let results = stmt
            .query_map([athlete_id], row_to_result)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(results)
    }

    /// Insert a result owned by `athlete_id`, returning its assigned id
    pub fn insert_result(&self, athlete_id: i64, position: usize, values: &ResultValues) -> Result<i64> {
        self.conn.execute(
            r#"
            INSERT INTO result (athlete_id, sport_id, position, age, year, date, gold, silver, bronze)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                athlete_id,
                values.sport_id,
                position as i64,
                values.age,
                values.year,
                values.date,
                values.gold,
                values.silver,
                values.bronze,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Overwrite a result row that `athlete_id` owns
    pub fn update_result(&self, id: i64, athlete_id: i64, position: usize, values: &ResultValues) -> Result<()> {
        let changed = self.conn.execute(
            r#"
            UPDATE result
            SET sport_id = ?3, position = ?4, age = ?5, year = ?6, date = ?7,
                gold = ?8, silver = ?9, bronze = ?10
            WHERE id = ?1 AND athlete_id = ?2
            "#,
            params![
                id,
                athlete_id,
                values.sport_id,
                position as i64,
                values.age,
                values.year,
                values.date,
                values.gold,
                values.silver,
                values.bronze,
            ],
        )?;
        if changed == 0 {
            return Err(Error::NotFound { entity: "result", id });
        }
        Ok(())
    }

    /// Delete a single result row
    pub fn delete_result(&self, id: i64) -> Result<()> {
        self.conn.execute("DELETE FROM result WHERE id = ?1", [id])?;
        Ok(())
    }

    // ========== Statistics ==========

    fn count(&self, table: &str) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", table);
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            countries: self.count("country")?,
            sports: self.count("sport")?,
            athletes: self.count("athlete")?,
            results: self.count("result")?,
        })
    }

    fn with_results(&self, mut athlete: Athlete) -> Result<Athlete> {
        athlete.results = self.results_for_athlete(athlete.id)?;
        Ok(athlete)
    }
}

fn row_to_country(row: &rusqlite::Row) -> rusqlite::Result<Country> {
    Ok(Country { id: row.get(0)?, name: row.get(1)? })
}

fn row_to_sport(row: &rusqlite::Row) -> rusqlite::Result<Sport> {
    Ok(Sport { id: row.get(0)?, name: row.get(1)? })
}

/// Athlete without results; the caller attaches them
fn row_to_athlete(row: &rusqlite::Row) -> rusqlite::Result<Athlete> {
    Ok(Athlete {
        id: row.get(0)?,
        name: row.get(1)?,
        country: Country { id: row.get(2)?, name: row.get(3)? },
        results: Vec::new(),
    })
}

fn row_to_result(row: &rusqlite::Row) -> rusqlite::Result<AthleteResult> {
    Ok(AthleteResult {
        id: row.get(0)?,
        athlete_id: row.get(1)?,
        sport: Sport { id: row.get(2)?, name: row.get(3)? },
        age: row.get(4)?,
        year: row.get(5)?,
        date: row.get(6)?,
        gold: row.get(7)?,
        silver: row.get(8)?,
        bronze: row.get(9)?,
    })
}

/// Database statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct DbStats {
    pub countries: usize,
    pub sports: usize,
    pub athletes: usize,
    pub results: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Countries: {}", self.countries)?;
        writeln!(f, "  Sports: {}", self.sports)?;
        writeln!(f, "  Athletes: {}", self.athletes)?;
        writeln!(f, "  Results: {}", self.results)
    }
}
