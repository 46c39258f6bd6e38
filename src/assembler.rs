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

//! Payment file assembly.
//!
//! The [`FileAssembler`] turns a batch of [`PaymentInstruction`]s into a
//! complete Leverantörsbetalningar file:
//!
//! ```text
//! 11 <company account> <YYMMDD> LEVERANTÖRSBETALNINGAR       CRLF
//! 14|16|54 ... one payment record per instruction, sorted   CRLF
//! 29 <company account> <count (8)> <total (12)> [-]
//! ```
//!
//! # Guarantees
//!
//! - All or nothing: the first failing instruction aborts the whole file.
//! - Output depends only on the instruction set and the generation time,
//!   never on the order instructions arrive in.
//! - No shared state: an assembler may be used from several threads at once.

use crate::account::CompanyAccount;
use crate::base::{
    AMOUNT_WIDTH, COUNT_WIDTH, DATE_FORMAT, LINE_TERMINATOR, OPENING_TEXT, TransactionCode,
};
use crate::error::{PaymentFileError, Result};
use crate::grouping::group_instructions;
use crate::instruction::PaymentInstruction;
use crate::record::{EncodedRecord, PaymentRecordBuilder, encode_amount};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use encoding_rs::WINDOWS_1252;
use rust_decimal::Decimal;
use std::borrow::Cow;

/// Largest record count the closing post can carry.
pub const MAX_RECORDS: usize = 99_999_999;

/// Per-order settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblerConfig {
    /// Order-level payment date, overrides every instruction's value date.
    pub scheduled_date: Option<NaiveDate>,
    /// Move dates in the past to the generation date.
    pub clamp_past_dates: bool,
    /// Merge instructions to the same payee on the same date.
    pub group_lines: bool,
}

/// Aggregate written to the closing post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileTotals {
    pub count: usize,
    /// Signed sum of the encoded amounts.
    pub sum: Decimal,
}

impl FileTotals {
    fn of(records: &[EncodedRecord]) -> Self {
        Self {
            count: records.len(),
            sum: records.iter().map(EncodedRecord::value).sum(),
        }
    }
}

/// An assembled file, ready to be stored or transmitted by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentFile {
    content: Vec<u8>,
    file_name: String,
    totals: FileTotals,
}

impl PaymentFile {
    /// Encoded bytes, one byte per character.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn into_content(self) -> Vec<u8> {
        self.content
    }

    /// Suggested name, e.g. `BG2024-05-01_08:30:00.txt`.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn totals(&self) -> FileTotals {
        self.totals
    }

    /// Decodes the content back to text.
    pub fn text(&self) -> Cow<'_, str> {
        WINDOWS_1252.decode_without_bom_handling(&self.content).0
    }
}

/// Builds payment files for one company Bankgiro account.
///
/// # Example
///
/// ```
/// use bankgiro_lb::{FileAssembler, PaymentInstruction};
/// use chrono::{TimeZone, Utc};
/// use rust_decimal_macros::dec;
///
/// let assembler = FileAssembler::new("991-2346").unwrap();
/// let generated_at = Utc.with_ymd_and_hms(2024, 4, 15, 8, 30, 0).unwrap();
///
/// let file = assembler
///     .assemble_at(&[PaymentInstruction::new("5402-9681", dec!(100.00))], &generated_at)
///     .unwrap();
///
/// assert_eq!(file.file_name(), "BG2024-04-15_08:30:00.txt");
/// assert_eq!(file.totals().count, 1);
/// assert!(file.text().ends_with("29000991234600000001000000010000"));
/// ```
#[derive(Debug, Clone)]
pub struct FileAssembler {
    company: CompanyAccount,
    config: AssemblerConfig,
}

impl FileAssembler {
    /// Validates the company account.
    ///
    /// # Errors
    ///
    /// - [`PaymentFileError::MissingCompanyAccount`] - blank account.
    /// - [`PaymentFileError::AccountNumberTooLong`] - more than 10 digits.
    /// - [`PaymentFileError::InvalidCompanyAccountType`] - not a Bankgiro number.
    pub fn new(company_account: &str) -> Result<Self> {
        Ok(Self {
            company: CompanyAccount::parse(company_account)?,
            config: AssemblerConfig::default(),
        })
    }

    pub fn with_config(mut self, config: AssemblerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn company(&self) -> &CompanyAccount {
        &self.company
    }

    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    /// Assembles a file dated now, in local time.
    pub fn assemble(&self, instructions: &[PaymentInstruction]) -> Result<PaymentFile> {
        self.assemble_at(instructions, &Local::now())
    }

    /// Assembles a file as if generated at `generated_at`.
    ///
    /// The calendar date of `generated_at` in its own time zone dates the
    /// opening post and fills in missing payment dates. The file name uses
    /// the same instant in UTC.
    ///
    /// # Errors
    ///
    /// - [`PaymentFileError::EmptyInstructionSet`] - no instructions.
    /// - [`PaymentFileError::AmountTooLarge`] - a grouped sum overflows.
    /// - Any instruction error, see [`PaymentRecordBuilder::build`].
    /// - [`PaymentFileError::RecordCountOverflow`] - count wider than 8 digits.
    /// - [`PaymentFileError::TotalAmountTooLarge`] - total wider than 12 digits.
    pub fn assemble_at<Tz: TimeZone>(
        &self,
        instructions: &[PaymentInstruction],
        generated_at: &DateTime<Tz>,
    ) -> Result<PaymentFile> {
        if instructions.is_empty() {
            return Err(PaymentFileError::EmptyInstructionSet);
        }

        let today = generated_at.date_naive();
        let mut builder = PaymentRecordBuilder::new(&self.company, today)
            .scheduled_date(self.config.scheduled_date)
            .clamp_past_dates(self.config.clamp_past_dates);

        let grouped;
        let instructions = if self.config.group_lines {
            grouped = group_instructions(instructions, |instruction| {
                builder.payment_date(instruction)
            })?;
            grouped.as_slice()
        } else {
            instructions
        };

        if instructions.len() > MAX_RECORDS {
            return Err(PaymentFileError::RecordCountOverflow {
                count: instructions.len(),
                limit: COUNT_WIDTH,
            });
        }

        let mut records = instructions
            .iter()
            .enumerate()
            .map(|(index, instruction)| builder.build(index, instruction))
            .collect::<Result<Vec<_>>>()?;
        records.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        let totals = FileTotals::of(&records);

        let mut text = self.opening_post(today);
        for record in &records {
            text.push_str(&record.to_line());
        }
        text.push_str(&self.closing_post(&totals)?);

        Ok(PaymentFile {
            content: encode_text(&text)?,
            file_name: file_name(generated_at),
            totals,
        })
    }

    /// `11` + account + date + mandatory text.
    fn opening_post(&self, today: NaiveDate) -> String {
        format!(
            "{}{}{}{}{}",
            TransactionCode::Opening,
            self.company.padded(),
            today.format(DATE_FORMAT),
            OPENING_TEXT,
            LINE_TERMINATOR
        )
    }

    /// `29` + account + count + absolute total + `-` when negative.
    fn closing_post(&self, totals: &FileTotals) -> Result<String> {
        if totals.count > MAX_RECORDS {
            return Err(PaymentFileError::RecordCountOverflow {
                count: totals.count,
                limit: COUNT_WIDTH,
            });
        }

        let amount = encode_amount(totals.sum).ok_or(PaymentFileError::TotalAmountTooLarge {
            total: totals.sum,
            limit: AMOUNT_WIDTH,
        })?;
        let sign = if totals.sum < Decimal::ZERO { "-" } else { "" };

        Ok(format!(
            "{}{}{:0>width$}{}{}",
            TransactionCode::Closing,
            self.company.padded(),
            totals.count,
            amount,
            sign,
            width = COUNT_WIDTH
        ))
    }
}

/// Assembles a file for `company_account` dated now.
pub fn assemble(company_account: &str, instructions: &[PaymentInstruction]) -> Result<PaymentFile> {
    FileAssembler::new(company_account)?.assemble(instructions)
}

/// `BG<yyyy-mm-dd hh:mm:ss>.txt` in UTC, spaces replaced by underscores.
pub fn file_name<Tz: TimeZone>(generated_at: &DateTime<Tz>) -> String {
    generated_at
        .with_timezone(&Utc)
        .format("BG%Y-%m-%d %H:%M:%S.txt")
        .to_string()
        .replace(' ', "_")
}

// Payment text is restricted to Latin-1 printable characters, where
// windows-1252 and ISO-8859-1 agree byte for byte.
fn encode_text(text: &str) -> Result<Vec<u8>> {
    let (bytes, _, had_errors) = WINDOWS_1252.encode(text);
    if had_errors {
        return Err(PaymentFileError::Encoding(WINDOWS_1252.name()));
    }
    Ok(bytes.into_owned())
}
