//! Local persistence contracts.

pub mod prefs;
