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

//! Giro account number classification.
//!
//! A raw account number is either a Bankgiro number, a Plusgiro number or
//! invalid. The two schemes differ only by where the hyphen sits:
//!
//! ```text
//!  Bankgiro   (X)XXX-XXXX     7-8 digits, hyphen 5 from the end
//!  Plusgiro   (XXXXXX)X-X     2-8 digits, hyphen 2 from the end
//! ```
//!
//! Both carry a Luhn (mod 10) check digit.
//!
//! # Example
//!
//! ```
//! use bankgiro_lb::{AccountType, classify};
//!
//! assert_eq!(classify("5402-9681"), AccountType::Bankgiro);
//! assert_eq!(classify("90-1"), AccountType::Plusgiro);
//! assert_eq!(classify("5402-9682"), AccountType::Invalid);
//! ```

use crate::base::{ACCOUNT_WIDTH, condense};
use crate::error::{PaymentFileError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::ops::RangeInclusive;

/// Raw lengths (hyphen included) accepted for each scheme.
const BANKGIRO_LENGTH: RangeInclusive<usize> = 8..=9;
const PLUSGIRO_LENGTH: RangeInclusive<usize> = 3..=9;

/// Position of the hyphen counted from the end of the raw string.
const BANKGIRO_HYPHEN_FROM_END: usize = 5;
const PLUSGIRO_HYPHEN_FROM_END: usize = 2;

/// Account scheme derived from the account number string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    Bankgiro,
    Plusgiro,
    Invalid,
}

impl AccountType {
    /// Classifies a raw account number, see [`classify`].
    pub fn of(raw: &str) -> Self {
        classify(raw)
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, Self::Invalid)
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bankgiro => "Bankgiro",
            Self::Plusgiro => "Plusgiro",
            Self::Invalid => "invalid",
        };
        f.write_str(name)
    }
}

/// Classifies a raw account number.
///
/// Only ASCII digits and a single hyphen are accepted. The shape decides the
/// candidate scheme and the Luhn check must pass for it; anything else is
/// [`AccountType::Invalid`]. Never fails.
pub fn classify(raw: &str) -> AccountType {
    if !is_digits_with_single_hyphen(raw) {
        return AccountType::Invalid;
    }

    if has_shape(raw, &BANKGIRO_LENGTH, BANKGIRO_HYPHEN_FROM_END) && luhn_check(raw) {
        AccountType::Bankgiro
    } else if has_shape(raw, &PLUSGIRO_LENGTH, PLUSGIRO_HYPHEN_FROM_END) && luhn_check(raw) {
        AccountType::Plusgiro
    } else {
        AccountType::Invalid
    }
}

/// Luhn (mod 10) check over the digits of `number`, hyphens ignored.
///
/// Walking from the rightmost digit, every second digit is doubled and the
/// decimal digits of the product are summed. Returns `false` for input
/// without digits or with any other character.
pub fn luhn_check(number: &str) -> bool {
    let mut sum = 0;
    let mut digits = 0;

    for (position, c) in number.chars().rev().filter(|c| *c != '-').enumerate() {
        let Some(digit) = c.to_digit(10) else {
            return false;
        };
        sum += if position % 2 == 1 {
            let doubled = digit * 2;
            doubled / 10 + doubled % 10
        } else {
            digit
        };
        digits += 1;
    }

    digits > 0 && sum % 10 == 0
}

fn is_digits_with_single_hyphen(raw: &str) -> bool {
    let hyphens = raw.bytes().filter(|b| *b == b'-').count();
    hyphens <= 1
        && raw.bytes().any(|b| b.is_ascii_digit())
        && raw.bytes().all(|b| b.is_ascii_digit() || b == b'-')
}

// Callers have already restricted `raw` to ASCII, so byte offsets are char offsets.
fn has_shape(raw: &str, length: &RangeInclusive<usize>, hyphen_from_end: usize) -> bool {
    let len = raw.len();
    length.contains(&len) && raw.as_bytes()[len - hyphen_from_end] == b'-'
}

/// Memoizing classifier scoped to one file assembly.
///
/// Account numbers repeat within a batch, so classification is cached per
/// distinct raw string. The cache is dropped with the classifier and never
/// outlives the invocation.
#[derive(Debug, Default)]
pub struct AccountClassifier {
    cache: HashMap<String, AccountType>,
}

impl AccountClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classify(&mut self, raw: &str) -> AccountType {
        if let Some(account_type) = self.cache.get(raw) {
            return *account_type;
        }
        let account_type = classify(raw);
        self.cache.insert(raw.to_owned(), account_type);
        account_type
    }
}

/// The remitting company's Bankgiro account, validated once per file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyAccount {
    raw: String,
    condensed: String,
}

impl CompanyAccount {
    /// Validates the company account.
    ///
    /// # Errors
    ///
    /// - [`PaymentFileError::MissingCompanyAccount`] - blank input.
    /// - [`PaymentFileError::AccountNumberTooLong`] - more than 10 digits.
    /// - [`PaymentFileError::InvalidCompanyAccountType`] - not a valid Bankgiro number.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(PaymentFileError::MissingCompanyAccount);
        }

        let condensed = condense(raw);
        if condensed.chars().count() > ACCOUNT_WIDTH {
            return Err(PaymentFileError::AccountNumberTooLong {
                account: raw.to_owned(),
                digits: condensed.chars().count(),
                limit: ACCOUNT_WIDTH,
            });
        }

        match classify(raw) {
            AccountType::Bankgiro => Ok(Self {
                raw: raw.to_owned(),
                condensed,
            }),
            found => Err(PaymentFileError::InvalidCompanyAccountType {
                account: raw.to_owned(),
                found,
            }),
        }
    }

    /// The account as supplied, e.g. `5402-9681`.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Digits only, e.g. `54029681`.
    pub fn condensed(&self) -> &str {
        &self.condensed
    }

    /// Zero padded account field, e.g. `0054029681`.
    pub fn padded(&self) -> String {
        format!("{:0>width$}", self.condensed, width = ACCOUNT_WIDTH)
    }
}
