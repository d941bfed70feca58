//! Read-only lookups
//!
//! Passthrough listings of reference data plus the athlete reads the HTTP
//! layer needs. Nothing here writes or opens a write transaction.

use crate::{Error, Result};
use crate::model::{Athlete, Country, Sport};
use crate::storage::Gateway;

/// Read-side service over a gateway
pub struct LookupService<'a> {
    gateway: Gateway<'a>,
}

impl<'a> LookupService<'a> {
    pub fn new(gateway: Gateway<'a>) -> Self {
        Self { gateway }
    }

    /// All countries, unfiltered
    pub fn countries(&self) -> Result<Vec<Country>> {
        self.gateway.list_countries()
    }

    /// All sports, unfiltered
    pub fn sports(&self) -> Result<Vec<Sport>> {
        self.gateway.list_sports()
    }

    /// All athletes with their results
    pub fn athletes(&self) -> Result<Vec<Athlete>> {
        self.gateway.list_athletes()
    }

    /// One athlete, or `NotFound`
    pub fn athlete(&self, id: i64) -> Result<Athlete> {
        self.gateway
            .find_athlete_by_id(id)?
            .ok_or(Error::NotFound { entity: "athlete", id })
    }
}
