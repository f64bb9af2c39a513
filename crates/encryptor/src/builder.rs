// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::sync::Arc;

use alloy::primitives::Address;

use cipherwell_core::{EncryptedSubmission, SurveyField, SurveyRecord};

use crate::{EncryptError, EncryptionBackend, EncryptionRequest};

/// Collects field values for one encryption attempt.
///
/// Values are kept in the order they were added; the canonical field
/// order is whatever order the caller feeds. [`InputBuilder::add_record`]
/// is the checked path and always feeds [`SurveyField::ALL`] order.
pub struct InputBuilder {
    backend: Arc<dyn EncryptionBackend>,
    contract_address: Address,
    user_address: Address,
    values: Vec<u8>,
}

impl InputBuilder {
    pub fn new(
        backend: Arc<dyn EncryptionBackend>,
        contract_address: Address,
        user_address: Address,
    ) -> Self {
        Self {
            backend,
            contract_address,
            user_address,
            values: Vec::with_capacity(SurveyField::COUNT),
        }
    }

    /// Append the next field value.
    pub fn add_field(&mut self, value: u8) -> &mut Self {
        self.values.push(value);
        self
    }

    /// Append all five fields of a validated record in canonical order.
    pub fn add_record(&mut self, record: &SurveyRecord) -> &mut Self {
        for field in SurveyField::ALL {
            self.add_field(record.value(field));
        }
        self
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }

    /// Run one encryption attempt over the collected values. Fails
    /// without touching the backend unless exactly one value per field
    /// was added.
    pub async fn encrypt(&self) -> Result<EncryptedSubmission, EncryptError> {
        let values: [u8; SurveyField::COUNT] =
            self.values
                .as_slice()
                .try_into()
                .map_err(|_| EncryptError::WrongFieldCount {
                    expected: SurveyField::COUNT,
                    got: self.values.len(),
                })?;

        let request = EncryptionRequest {
            contract_address: self.contract_address,
            user_address: self.user_address,
            values,
        };
        self.backend.encrypt(&request).await
    }
}
