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

//! # Bankgiro Leverantörsbetalningar
//!
//! This library encodes supplier payments into the fixed-width Swedish
//! Bankgiro "Leverantörsbetalningar" file format and validates the Bankgiro
//! and Plusgiro account numbers that payments are sent to.
//!
//! ## Core Components
//!
//! - [`classify`]: Bankgiro/Plusgiro shape rules plus Luhn checksum
//! - [`PaymentRecordBuilder`]: One [`PaymentInstruction`] to one [`EncodedRecord`]
//! - [`FileAssembler`]: Opening post, sorted payment records, closing post
//! - [`PaymentFileError`]: Reasons a file cannot be produced
//!
//! ## Example
//!
//! ```
//! use bankgiro_lb::{FileAssembler, PaymentInstruction};
//! use chrono::{NaiveDate, TimeZone, Utc};
//! use rust_decimal_macros::dec;
//!
//! let assembler = FileAssembler::new("991-2346").unwrap();
//!
//! let payment = PaymentInstruction::new("5402-9681", dec!(100.00))
//!     .with_reference("INV001")
//!     .with_value_date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
//!
//! let generated_at = Utc.with_ymd_and_hms(2024, 4, 15, 8, 30, 0).unwrap();
//! let file = assembler.assemble_at(&[payment], &generated_at).unwrap();
//!
//! let text = file.text();
//! let lines: Vec<&str> = text.split("\r\n").collect();
//! assert_eq!(lines[0], "110009912346240415LEVERANTÖRSBETALNINGAR");
//! assert!(lines[1].starts_with("140054029681INV001"));
//! assert_eq!(lines[2], "29000991234600000001000000010000");
//! ```
//!
//! ## Thread Safety
//!
//! Assembly is a pure computation over its arguments. A [`FileAssembler`]
//! holds no mutable state and can be shared between threads.

pub mod account;
mod assembler;
mod base;
pub mod error;
mod grouping;
mod instruction;
mod record;

pub use account::{AccountClassifier, AccountType, CompanyAccount, classify, luhn_check};
pub use assembler::{
    AssemblerConfig, FileAssembler, FileTotals, MAX_RECORDS, PaymentFile, assemble, file_name,
};
pub use base::{
    ACCOUNT_WIDTH, AMOUNT_WIDTH, COUNT_WIDTH, INTERNAL_REFERENCE_WIDTH, OPENING_TEXT,
    REFERENCE_WIDTH, SYSTEM_CURRENCY, TransactionCode, condense,
};
pub use error::{PaymentFileError, Result};
pub use grouping::group_instructions;
pub use instruction::PaymentInstruction;
pub use record::{
    EncodedRecord, FIXED_RECORD_WIDTH, PaymentRecordBuilder, encode_account, encode_amount,
    tail_chars,
};
