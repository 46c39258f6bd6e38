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

//! Error types for payment file generation.
//!
//! Every variant aborts the whole file. Instruction-level variants carry the
//! zero-based position of the offending instruction in the assembled batch.

use crate::account::AccountType;
use rust_decimal::Decimal;
use thiserror::Error;

/// Payment file generation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentFileError {
    /// No remitting account was supplied
    #[error("no company bank account set")]
    MissingCompanyAccount,

    /// The remitting account is not a valid Bankgiro number
    #[error("company bank account {account} is not of type Bankgiro but {found}")]
    InvalidCompanyAccountType { account: String, found: AccountType },

    /// The payee account is blank
    #[error("no account number set for instruction {index}")]
    MissingPayeeAccount { index: usize },

    /// The payee account is neither a valid Bankgiro nor a valid Plusgiro number
    #[error("account {account} of instruction {index} is not a valid Bankgiro or Plusgiro number")]
    UnclassifiablePayeeAccount { index: usize, account: String },

    /// Zero or negative amount to a Plusgiro account
    #[error("cannot process amount {amount} to {account_type} account {account} (instruction {index})")]
    UnsupportedAmountForAccountType {
        index: usize,
        account: String,
        account_type: AccountType,
        amount: Decimal,
    },

    /// Amount does not fit the 12-digit amount field
    #[error("payment amount {amount} of instruction {index} is too big, at most {limit} digits allowed")]
    AmountTooLarge {
        index: usize,
        amount: Decimal,
        limit: usize,
    },

    /// The file total does not fit the 12-digit closing amount field
    #[error("total amount {total} is too big, at most {limit} digits allowed")]
    TotalAmountTooLarge { total: Decimal, limit: usize },

    /// Condensed account number wider than the account field
    #[error("account number {account} has too many digits: {digits}, only {limit} allowed")]
    AccountNumberTooLong {
        account: String,
        digits: usize,
        limit: usize,
    },

    /// More records than the closing count field can hold
    #[error("too many payment records: {count}, at most {limit} allowed")]
    RecordCountOverflow { count: usize, limit: usize },

    /// Currency other than SEK
    #[error("can only make payments in SEK, instruction {index} is in {currency}")]
    UnsupportedCurrency { index: usize, currency: String },

    /// Nothing to encode
    #[error("there are no payment instructions")]
    EmptyInstructionSet,

    /// Instruction remits from an account other than the company account
    #[error("instruction {index} is paid from {account}, not from the company account")]
    PayerAccountMismatch { index: usize, account: String },

    /// Text field holds a character the file charset cannot carry
    #[error("{field} of instruction {index} contains unsupported character {character:?}")]
    UnencodableCharacter {
        index: usize,
        field: &'static str,
        character: char,
    },

    /// Final charset conversion failed
    #[error("payment file could not be encoded as {0}")]
    Encoding(&'static str),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PaymentFileError>;
