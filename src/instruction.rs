// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Payment instructions supplied by the caller.

use crate::base::SYSTEM_CURRENCY;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One payment to encode.
///
/// A negative `amount` is a credit deduction. An empty `payer_account`
/// means "the company account of the file".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInstruction {
    #[serde(default)]
    pub payer_account: String,
    pub payee_account: String,
    pub amount: Decimal,
    pub currency: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub internal_reference: String,
    #[serde(default)]
    pub value_date: Option<NaiveDate>,
}

impl PaymentInstruction {
    /// Creates a SEK instruction with empty references and no value date.
    pub fn new(payee_account: impl Into<String>, amount: Decimal) -> Self {
        Self {
            payer_account: String::new(),
            payee_account: payee_account.into(),
            amount,
            currency: SYSTEM_CURRENCY.to_owned(),
            reference: String::new(),
            internal_reference: String::new(),
            value_date: None,
        }
    }

    pub fn with_payer_account(mut self, payer_account: impl Into<String>) -> Self {
        self.payer_account = payer_account.into();
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    pub fn with_internal_reference(mut self, internal_reference: impl Into<String>) -> Self {
        self.internal_reference = internal_reference.into();
        self
    }

    pub fn with_value_date(mut self, value_date: NaiveDate) -> Self {
        self.value_date = Some(value_date);
        self
    }
}
