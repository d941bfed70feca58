//! Submitted (detached) athlete graphs
//!
//! A client posts back an athlete it may have edited: ids select existing
//! rows, missing ids mean "create". Only the ids and the scalar fields the
//! client supplied are trusted. Names on nested countries and sports are
//! informational and never written.

use serde::{Deserialize, Serialize};
use crate::model::{Athlete, AthleteResult, Country, Sport};

/// A by-id pointer at a reference row (country or sport).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

impl Reference {
    pub fn id(id: i64) -> Self {
        Self { id: Some(id), name: None }
    }
}

impl From<&Country> for Reference {
    fn from(country: &Country) -> Self {
        Self { id: Some(country.id), name: Some(country.name.clone()) }
    }
}

impl From<&Sport> for Reference {
    fn from(sport: &Sport) -> Self {
        Self { id: Some(sport.id), name: Some(sport.name.clone()) }
    }
}

/// A submitted result. `id: None` creates a new row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSubmission {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub sport: Option<Reference>,
    #[serde(default)]
    pub age: i32,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub gold: i32,
    #[serde(default)]
    pub silver: i32,
    #[serde(default)]
    pub bronze: i32,
}

impl ResultSubmission {
    /// A new (not yet persisted) result in the given sport
    pub fn new(
        sport_id: i64,
        age: i32,
        year: i32,
        date: impl Into<String>,
        gold: i32,
        silver: i32,
        bronze: i32,
    ) -> Self {
        Self {
            id: None,
            sport: Some(Reference::id(sport_id)),
            age,
            year,
            date: date.into(),
            gold,
            silver,
            bronze,
        }
    }
}

impl From<&AthleteResult> for ResultSubmission {
    fn from(result: &AthleteResult) -> Self {
        Self {
            id: Some(result.id),
            sport: Some(Reference::from(&result.sport)),
            age: result.age,
            year: result.year,
            date: result.date.clone(),
            gold: result.gold,
            silver: result.silver,
            bronze: result.bronze,
        }
    }
}

/// A submitted athlete. `id: None` creates a new athlete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthleteSubmission {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: Option<Reference>,
    #[serde(default)]
    pub results: Vec<ResultSubmission>,
}

impl AthleteSubmission {
    pub fn new(name: impl Into<String>, country_id: i64) -> Self {
        Self {
            id: None,
            name: name.into(),
            country: Some(Reference::id(country_id)),
            results: Vec::new(),
        }
    }

    pub fn with_result(mut self, result: ResultSubmission) -> Self {
        self.results.push(result);
        self
    }
}

impl Athlete {
    /// The submission a client would send back after loading this athlete unchanged
    pub fn to_submission(&self) -> AthleteSubmission {
        AthleteSubmission {
            id: Some(self.id),
            name: self.name.clone(),
            country: Some(Reference::from(&self.country)),
            results: self.results.iter().map(ResultSubmission::from).collect(),
        }
    }
}
