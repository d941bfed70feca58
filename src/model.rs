//! Persisted domain types
//!
//! The fixed hierarchy is Country -> Athlete -> Result:
//! - `Country` and `Sport` are reference data, selected by id on write
//! - `Athlete` owns its `AthleteResult`s exclusively
//! - `AthleteResult` points back at its owner through `athlete_id`
//!
//! Every value here came out of storage, so ids are always present.
//! Client-supplied graphs use the types in [`crate::submission`].

use serde::{Deserialize, Serialize};

/// A country an athlete competes for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Country {
    pub id: i64,
    pub name: String,
}

/// A sport a result was achieved in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sport {
    pub id: i64,
    pub name: String,
}

/// One games appearance of an athlete and the medals won there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthleteResult {
    pub id: i64,
    /// Owning athlete. Not part of the wire format.
    #[serde(skip, default)]
    pub athlete_id: i64,
    pub sport: Sport,
    pub age: i32,
    pub year: i32,
    pub date: String,
    pub gold: i32,
    pub silver: i32,
    pub bronze: i32,
}

impl AthleteResult {
    /// Total medals for this appearance. Widened so stored counts never overflow.
    pub fn total(&self) -> i64 {
        i64::from(self.gold) + i64::from(self.silver) + i64::from(self.bronze)
    }
}

/// An athlete aggregate: the athlete row plus its owned results, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Athlete {
    pub id: i64,
    pub name: String,
    pub country: Country,
    pub results: Vec<AthleteResult>,
}

impl Athlete {
    /// Total medals across all results
    pub fn medal_count(&self) -> i64 {
        self.results.iter().map(AthleteResult::total).sum()
    }

    /// (gold, silver, bronze) summed across all results
    pub fn medals(&self) -> (i64, i64, i64) {
        self.results.iter().fold((0, 0, 0), |(g, s, b), r| {
            (g + i64::from(r.gold), s + i64::from(r.silver), b + i64::from(r.bronze))
        })
    }
}
