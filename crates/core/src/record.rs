// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! The five-field wellbeing record and its canonical field order.
//!
//! Every check-in carries exactly five bounded integers. The order of the
//! fields is significant: ciphertext handles are written to and read from
//! the ledger positionally, so [`SurveyField::ALL`] is the single source of
//! truth for that order everywhere in the engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowest accepted value for any survey field.
pub const FIELD_MIN: u8 = 0;
/// Highest accepted value for any survey field.
pub const FIELD_MAX: u8 = 100;

/// One of the five wellbeing dimensions, in canonical submission order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurveyField {
    Stress,
    Anxiety,
    Mood,
    Sleep,
    Energy,
}

impl SurveyField {
    /// Canonical field order. Submissions encrypt fields in exactly this
    /// order and retrievals map handles back by the same positions.
    pub const ALL: [SurveyField; 5] = [
        SurveyField::Stress,
        SurveyField::Anxiety,
        SurveyField::Mood,
        SurveyField::Sleep,
        SurveyField::Energy,
    ];

    /// Number of fields in a record.
    pub const COUNT: usize = 5;

    /// Position of this field in the canonical order.
    pub fn index(&self) -> usize {
        match self {
            SurveyField::Stress => 0,
            SurveyField::Anxiety => 1,
            SurveyField::Mood => 2,
            SurveyField::Sleep => 3,
            SurveyField::Energy => 4,
        }
    }

    /// Stable snake_case label, used in storage keys and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            SurveyField::Stress => "stress_level",
            SurveyField::Anxiety => "anxiety_level",
            SurveyField::Mood => "mood_score",
            SurveyField::Sleep => "sleep_quality",
            SurveyField::Energy => "energy_level",
        }
    }
}

impl fmt::Display for SurveyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A validated wellbeing check-in. All five values are in
/// [`FIELD_MIN`]..=[`FIELD_MAX`]; construction outside the validator goes
/// through [`SurveyRecord::from_values`] which re-checks the range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyRecord {
    pub stress_level: u8,
    pub anxiety_level: u8,
    pub mood_score: u8,
    pub sleep_quality: u8,
    pub energy_level: u8,
}

impl SurveyRecord {
    /// Build a record from plaintext values in canonical field order.
    ///
    /// Used when reconciling decrypted plaintexts back into a record; a
    /// value outside the accepted range rejects the whole record.
    pub fn from_values(values: [u64; SurveyField::COUNT]) -> Result<Self, OutOfRangeValue> {
        for (field, value) in SurveyField::ALL.iter().zip(values.iter()) {
            if *value > FIELD_MAX as u64 {
                return Err(OutOfRangeValue {
                    field: *field,
                    value: *value,
                });
            }
        }
        Ok(Self {
            stress_level: values[0] as u8,
            anxiety_level: values[1] as u8,
            mood_score: values[2] as u8,
            sleep_quality: values[3] as u8,
            energy_level: values[4] as u8,
        })
    }

    /// The value of a single field.
    pub fn value(&self, field: SurveyField) -> u8 {
        match field {
            SurveyField::Stress => self.stress_level,
            SurveyField::Anxiety => self.anxiety_level,
            SurveyField::Mood => self.mood_score,
            SurveyField::Sleep => self.sleep_quality,
            SurveyField::Energy => self.energy_level,
        }
    }

    /// All five values in canonical field order.
    pub fn values(&self) -> [u8; SurveyField::COUNT] {
        [
            self.stress_level,
            self.anxiety_level,
            self.mood_score,
            self.sleep_quality,
            self.energy_level,
        ]
    }
}

/// A decrypted plaintext fell outside the accepted field range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} value {value} is outside {FIELD_MIN}..={FIELD_MAX}")]
pub struct OutOfRangeValue {
    pub field: SurveyField,
    pub value: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order_is_stress_anxiety_mood_sleep_energy() {
        let labels: Vec<&str> = SurveyField::ALL.iter().map(|f| f.label()).collect();
        assert_eq!(
            labels,
            vec![
                "stress_level",
                "anxiety_level",
                "mood_score",
                "sleep_quality",
                "energy_level"
            ]
        );
    }

    #[test]
    fn values_round_trip_in_order() {
        let record = SurveyRecord::from_values([40, 20, 80, 60, 75]).unwrap();
        assert_eq!(record.values(), [40, 20, 80, 60, 75]);
        assert_eq!(record.value(SurveyField::Mood), 80);
    }

    #[test]
    fn from_values_rejects_out_of_range() {
        let err = SurveyRecord::from_values([40, 20, 101, 60, 75]).unwrap_err();
        assert_eq!(err.field, SurveyField::Mood);
        assert_eq!(err.value, 101);
    }

    #[test]
    fn boundary_values_accepted() {
        assert!(SurveyRecord::from_values([0, 0, 0, 0, 0]).is_ok());
        assert!(SurveyRecord::from_values([100, 100, 100, 100, 100]).is_ok());
    }
}
