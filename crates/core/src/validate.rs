// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Form-level validation of raw survey input.
//!
//! Validation is all-or-nothing: a record is either fully valid or rejected
//! with a single aggregate error naming every offending field. Nothing is
//! encrypted before this step succeeds.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::{SurveyField, SurveyRecord, FIELD_MAX, FIELD_MIN};

/// Untrusted survey input as captured from a form, one decimal token per
/// field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSurveyInput {
    pub stress_level: String,
    pub anxiety_level: String,
    pub mood_score: String,
    pub sleep_quality: String,
    pub energy_level: String,
}

impl RawSurveyInput {
    pub fn new(
        stress_level: impl Into<String>,
        anxiety_level: impl Into<String>,
        mood_score: impl Into<String>,
        sleep_quality: impl Into<String>,
        energy_level: impl Into<String>,
    ) -> Self {
        Self {
            stress_level: stress_level.into(),
            anxiety_level: anxiety_level.into(),
            mood_score: mood_score.into(),
            sleep_quality: sleep_quality.into(),
            energy_level: energy_level.into(),
        }
    }

    /// The raw token for a single field.
    pub fn token(&self, field: SurveyField) -> &str {
        match field {
            SurveyField::Stress => &self.stress_level,
            SurveyField::Anxiety => &self.anxiety_level,
            SurveyField::Mood => &self.mood_score,
            SurveyField::Sleep => &self.sleep_quality,
            SurveyField::Energy => &self.energy_level,
        }
    }
}

/// Why a single field was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldIssue {
    /// The token did not parse as an integer.
    NotAnInteger { field: SurveyField, raw: String },
    /// The token parsed but the value is outside the accepted range.
    OutOfRange { field: SurveyField, value: i64 },
}

impl FieldIssue {
    pub fn field(&self) -> SurveyField {
        match self {
            FieldIssue::NotAnInteger { field, .. } => *field,
            FieldIssue::OutOfRange { field, .. } => *field,
        }
    }
}

/// Aggregate rejection of a raw input. Lists every offending field so the
/// caller can surface them all at once instead of one per attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid survey input: {}", describe_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// The offending fields, in canonical field order.
    pub fn fields(&self) -> Vec<SurveyField> {
        self.issues.iter().map(|issue| issue.field()).collect()
    }
}

fn describe_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|issue| match issue {
            FieldIssue::NotAnInteger { field, raw } => {
                format!("{field} is not a whole number (got {raw:?})")
            }
            FieldIssue::OutOfRange { field, value } => {
                format!("{field} value {value} is outside {FIELD_MIN}..={FIELD_MAX}")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validate a raw input into a [`SurveyRecord`].
///
/// Tokens are trimmed before parsing. Any parse or range failure rejects
/// the whole record; partial acceptance is never possible.
pub fn validate_input(input: &RawSurveyInput) -> Result<SurveyRecord, ValidationError> {
    let mut values = [0u8; SurveyField::COUNT];
    let mut issues = Vec::new();

    for (slot, field) in values.iter_mut().zip(SurveyField::ALL) {
        let raw = input.token(field);
        match raw.trim().parse::<i64>() {
            Ok(value) if (FIELD_MIN as i64..=FIELD_MAX as i64).contains(&value) => {
                *slot = value as u8;
            }
            Ok(value) => issues.push(FieldIssue::OutOfRange { field, value }),
            Err(_) => issues.push(FieldIssue::NotAnInteger {
                field,
                raw: raw.to_string(),
            }),
        }
    }

    if !issues.is_empty() {
        return Err(ValidationError { issues });
    }

    Ok(SurveyRecord {
        stress_level: values[0],
        anxiety_level: values[1],
        mood_score: values[2],
        sleep_quality: values[3],
        energy_level: values[4],
    })
}
