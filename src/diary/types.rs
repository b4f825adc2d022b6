//! Core data types for the health diary
//!
//! - `Entry`: one diary record as stored by the contract
//! - `NewEntry`: the typed arguments of an `addEntry` call
//! - `FormState` / `FormField`: raw form text awaiting parsing

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::{DiaryError, DiaryResult};

/// A single diary record
///
/// Created by the contract when a submission is mined; the client only
/// ever holds a refreshable copy of the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Block timestamp, seconds since the Unix epoch
    pub timestamp: u64,
    pub weight_kg: u16,
    pub steps: u32,
    pub calories_in: u16,
    pub calories_out: u16,
    #[serde(default)]
    pub note: String,
}

impl Entry {
    /// Calendar date of the entry, e.g. `2024-03-01`
    pub fn date_label(&self) -> String {
        i64::try_from(self.timestamp)
            .ok()
            .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Calories burned minus calories eaten
    pub fn calorie_balance(&self) -> i32 {
        self.calories_out as i32 - self.calories_in as i32
    }
}

/// Arguments for the contract's `addEntry` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub weight_kg: u16,
    pub steps: u32,
    pub calories_in: u16,
    pub calories_out: u16,
    pub note: String,
}

/// The five inputs of the entry form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    WeightKg,
    Steps,
    CaloriesIn,
    CaloriesOut,
    Note,
}

impl FormField {
    /// Placeholder text shown in an empty input
    pub fn placeholder(&self) -> &'static str {
        match self {
            FormField::WeightKg => "Weight (kg)",
            FormField::Steps => "Steps",
            FormField::CaloriesIn => "Calories In",
            FormField::CaloriesOut => "Calories Out",
            FormField::Note => "Note (optional)",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormField::WeightKg => write!(f, "weight"),
            FormField::Steps => write!(f, "steps"),
            FormField::CaloriesIn => write!(f, "calories in"),
            FormField::CaloriesOut => write!(f, "calories out"),
            FormField::Note => write!(f, "note"),
        }
    }
}

/// Raw, unvalidated form text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub weight_kg: String,
    pub steps: String,
    pub calories_in: String,
    pub calories_out: String,
    pub note: String,
}

impl FormState {
    /// Current text of a field
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::WeightKg => &self.weight_kg,
            FormField::Steps => &self.steps,
            FormField::CaloriesIn => &self.calories_in,
            FormField::CaloriesOut => &self.calories_out,
            FormField::Note => &self.note,
        }
    }

    /// Replace the text of a field
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::WeightKg => self.weight_kg = value,
            FormField::Steps => self.steps = value,
            FormField::CaloriesIn => self.calories_in = value,
            FormField::CaloriesOut => self.calories_out = value,
            FormField::Note => self.note = value,
        }
    }

    /// Empty every field
    pub fn clear(&mut self) {
        *self = FormState::default();
    }

    /// Whether every field is empty
    pub fn is_empty(&self) -> bool {
        *self == FormState::default()
    }

    /// Parse the numeric fields; the note is passed through verbatim
    pub fn parse(&self) -> DiaryResult<NewEntry> {
        Ok(NewEntry {
            weight_kg: parse_field(FormField::WeightKg, &self.weight_kg)?,
            steps: parse_field(FormField::Steps, &self.steps)?,
            calories_in: parse_field(FormField::CaloriesIn, &self.calories_in)?,
            calories_out: parse_field(FormField::CaloriesOut, &self.calories_out)?,
            note: self.note.clone(),
        })
    }
}

fn parse_field<T: std::str::FromStr>(field: FormField, raw: &str) -> DiaryResult<T> {
    raw.trim().parse().map_err(|_| DiaryError::InvalidField {
        field,
        value: raw.to_string(),
    })
}
