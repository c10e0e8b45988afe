//! The local progress roster: one record per guard name, keyed
//! case-insensitively, persisted as JSON in browser local storage. Missing
//! or malformed storage degrades to an empty roster rather than failing.

use crate::browser;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

const STORAGE_KEY: &str = "nightshift.roster";

pub const FIRST_NIGHT: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlayerRecord {
    pub name: String,
    pub night: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Roster {
    records: Vec<PlayerRecord>,
}

impl Roster {
    pub fn lookup(&self, name: &str) -> Option<&PlayerRecord> {
        self.records
            .iter()
            .find(|record| record.name.eq_ignore_ascii_case(name))
    }

    /// Which night this guard is up to; new names start on night one.
    pub fn night_for(&self, name: &str) -> u32 {
        self.lookup(name).map(|record| record.night).unwrap_or(FIRST_NIGHT)
    }

    /// Upsert a record, matching existing names case-insensitively and
    /// keeping the casing the record was first created with.
    pub fn set_night(&mut self, name: &str, night: u32) {
        match self
            .records
            .iter_mut()
            .find(|record| record.name.eq_ignore_ascii_case(name))
        {
            Some(record) => record.night = night,
            None => self.records.push(PlayerRecord {
                name: name.to_string(),
                night,
            }),
        }
    }

}

/// Read the roster from local storage. Anything short of a well-formed
/// record list is treated as a fresh start.
pub fn load() -> Roster {
    let stored = browser::local_storage()
        .ok()
        .and_then(|storage| storage.get_item(STORAGE_KEY).ok().flatten());
    match stored {
        Some(json) => serde_json::from_str(&json).unwrap_or_default(),
        None => Roster::default(),
    }
}

pub fn save(roster: &Roster) -> Result<()> {
    let json = serde_json::to_string(roster)?;
    browser::local_storage()?
        .set_item(STORAGE_KEY, &json)
        .map_err(|err| anyhow!("Error writing roster to local storage : {:#?}", err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_start_on_night_one() {
        let roster = Roster::default();
        assert_eq!(roster.night_for("Mike"), FIRST_NIGHT);
        assert!(roster.lookup("Mike").is_none());
    }

    #[test]
    fn lookup_ignores_case_and_keeps_original_casing() {
        let mut roster = Roster::default();
        roster.set_night("Mike", 2);
        roster.set_night("MIKE", 3);

        assert_eq!(roster.records.len(), 1);
        let record = roster.lookup("mike").unwrap();
        assert_eq!(record.name, "Mike");
        assert_eq!(record.night, 3);
    }

    #[test]
    fn records_for_different_names_coexist() {
        let mut roster = Roster::default();
        roster.set_night("Mike", 4);
        roster.set_night("Jeremy", 1);
        assert_eq!(roster.records.len(), 2);
        assert_eq!(roster.night_for("jeremy"), 1);
        assert_eq!(roster.night_for("Mike"), 4);
    }

    #[test]
    fn malformed_json_degrades_to_a_fresh_roster() {
        let roster: Roster = serde_json::from_str("{\"records\": 12}").unwrap_or_default();
        assert!(roster.records.is_empty());
    }

    #[test]
    fn roster_round_trips_through_json() {
        let mut roster = Roster::default();
        roster.set_night("Mike", 5);
        let json = serde_json::to_string(&roster).unwrap();
        let back: Roster = serde_json::from_str(&json).unwrap();
        assert_eq!(back, roster);
    }
}
