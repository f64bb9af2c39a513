// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! The encrypted form of one survey.

use alloy::primitives::Bytes;
use serde::{Deserialize, Serialize};

use crate::handle::CiphertextHandle;
use crate::record::SurveyField;

/// Output of the encryption backend: one handle per field in canonical
/// order, plus the zero-knowledge proof binding the handles to the
/// (account, contract) pair they were produced for.
///
/// A submission is built once per encryption attempt and consumed by
/// value when submitted. There is no mutation path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedSubmission {
    handles: [CiphertextHandle; SurveyField::COUNT],
    proof: Bytes,
}

impl EncryptedSubmission {
    pub fn new(handles: [CiphertextHandle; SurveyField::COUNT], proof: Bytes) -> Self {
        Self { handles, proof }
    }

    pub fn handles(&self) -> &[CiphertextHandle; SurveyField::COUNT] {
        &self.handles
    }

    /// The handle at a field's canonical position.
    pub fn handle(&self, field: SurveyField) -> CiphertextHandle {
        self.handles[field.index()]
    }

    pub fn proof(&self) -> &Bytes {
        &self.proof
    }
}
