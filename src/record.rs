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

//! Payment records.
//!
//! A payment record is one fixed-width line:
//!
//! ```text
//! 14 0054029681 INV001                    000000010000 240501 _____ V-2024-0042
//! |  |          |                         |            |      |     |
//! |  account    reference (25, space pad) amount (12)  date   5 sp  internal ref (<= 20)
//! code (2)      (10, zero pad)            (zero pad)   YYMMDD
//! ```
//!
//! # Transaction codes
//!
//! | Account  | Amount | Code |
//! |----------|--------|------|
//! | Bankgiro | >= 0   | 14   |
//! | Bankgiro | < 0    | 16   |
//! | Plusgiro | > 0    | 54   |
//! | Plusgiro | <= 0   | error |
//! | Invalid  | any    | error |

use crate::account::{AccountClassifier, AccountType, CompanyAccount};
use crate::base::{
    ACCOUNT_WIDTH, AMOUNT_WIDTH, DATE_FORMAT, FILLER_WIDTH, INTERNAL_REFERENCE_WIDTH,
    LINE_TERMINATOR, REFERENCE_WIDTH, SYSTEM_CURRENCY, TransactionCode, condense,
};
use crate::error::{PaymentFileError, Result};
use crate::instruction::PaymentInstruction;
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;

/// Width of a payment record without internal reference and terminator.
pub const FIXED_RECORD_WIDTH: usize =
    2 + ACCOUNT_WIDTH + REFERENCE_WIDTH + AMOUNT_WIDTH + 6 + FILLER_WIDTH;

/// One encoded payment line. Every field is already padded to its width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRecord {
    code: TransactionCode,
    account: String,
    reference: String,
    amount: String,
    /// Signed amount rounded to two decimals, as encoded.
    value: Decimal,
    date: String,
    internal_reference: String,
}

impl EncodedRecord {
    pub fn code(&self) -> TransactionCode {
        self.code
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn internal_reference(&self) -> &str {
        &self.internal_reference
    }

    /// Ordering key of the file body.
    ///
    /// Account first, then code, so a payee's credits (16) follow its
    /// payments (14). The remaining fields only break ties to keep the
    /// output independent of input order.
    pub fn sort_key(&self) -> (&str, &str, &str, &str, &str, &str) {
        (
            &self.account,
            self.code.as_str(),
            &self.reference,
            &self.amount,
            &self.date,
            &self.internal_reference,
        )
    }

    /// Line width without terminator.
    pub fn width(&self) -> usize {
        FIXED_RECORD_WIDTH + self.internal_reference.chars().count()
    }

    /// Renders the record followed by CRLF.
    pub fn to_line(&self) -> String {
        format!("{self}{LINE_TERMINATOR}")
    }
}

/// Renders the record without line terminator.
impl fmt::Display for EncodedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{}{:filler$}{}",
            self.code,
            self.account,
            self.reference,
            self.amount,
            self.date,
            "",
            self.internal_reference,
            filler = FILLER_WIDTH
        )
    }
}

/// Turns instructions into [`EncodedRecord`]s for one company account.
///
/// Holds the per-file context: the validated company account, the
/// order-level scheduled date and the generation date used as fallback.
#[derive(Debug)]
pub struct PaymentRecordBuilder<'a> {
    company: &'a CompanyAccount,
    scheduled_date: Option<NaiveDate>,
    today: NaiveDate,
    clamp_past_dates: bool,
    classifier: AccountClassifier,
}

impl<'a> PaymentRecordBuilder<'a> {
    pub fn new(company: &'a CompanyAccount, today: NaiveDate) -> Self {
        Self {
            company,
            scheduled_date: None,
            today,
            clamp_past_dates: false,
            classifier: AccountClassifier::new(),
        }
    }

    /// Order-level date overriding every instruction's value date.
    pub fn scheduled_date(mut self, date: Option<NaiveDate>) -> Self {
        self.scheduled_date = date;
        self
    }

    /// Replace dates before `today` with `today`.
    pub fn clamp_past_dates(mut self, clamp: bool) -> Self {
        self.clamp_past_dates = clamp;
        self
    }

    /// Encodes the instruction at position `index` of the batch.
    ///
    /// # Errors
    ///
    /// - [`PaymentFileError::PayerAccountMismatch`] - paid from another account.
    /// - [`PaymentFileError::MissingPayeeAccount`] - blank payee account.
    /// - [`PaymentFileError::AccountNumberTooLong`] - more than 10 digits.
    /// - [`PaymentFileError::UnclassifiablePayeeAccount`] - neither Bankgiro nor Plusgiro.
    /// - [`PaymentFileError::UnsupportedAmountForAccountType`] - zero or negative to Plusgiro.
    /// - [`PaymentFileError::UnsupportedCurrency`] - not SEK.
    /// - [`PaymentFileError::AmountTooLarge`] - more than 12 digits.
    /// - [`PaymentFileError::UnencodableCharacter`] - reference not representable.
    pub fn build(
        &mut self,
        index: usize,
        instruction: &PaymentInstruction,
    ) -> Result<EncodedRecord> {
        let payer = condense(&instruction.payer_account);
        if !payer.is_empty() && payer != self.company.condensed() {
            return Err(PaymentFileError::PayerAccountMismatch {
                index,
                account: instruction.payer_account.clone(),
            });
        }

        let payee = instruction.payee_account.trim();
        let account = encode_account(payee).ok_or_else(|| match condense(payee).chars().count() {
            0 => PaymentFileError::MissingPayeeAccount { index },
            digits => PaymentFileError::AccountNumberTooLong {
                account: payee.to_owned(),
                digits,
                limit: ACCOUNT_WIDTH,
            },
        })?;

        let account_type = self.classifier.classify(payee);
        let code = transaction_code(index, payee, account_type, instruction.amount)?;

        if instruction.currency.trim() != SYSTEM_CURRENCY {
            return Err(PaymentFileError::UnsupportedCurrency {
                index,
                currency: instruction.currency.clone(),
            });
        }

        let amount = encode_amount(instruction.amount).ok_or(PaymentFileError::AmountTooLarge {
            index,
            amount: instruction.amount,
            limit: AMOUNT_WIDTH,
        })?;

        let reference = check_text(
            index,
            "reference",
            tail_chars(&instruction.reference, REFERENCE_WIDTH),
        )?;
        let internal_reference = check_text(
            index,
            "internal reference",
            tail_chars(&instruction.internal_reference, INTERNAL_REFERENCE_WIDTH),
        )?;

        Ok(EncodedRecord {
            code,
            account,
            reference: format!("{reference:<width$}", width = REFERENCE_WIDTH),
            amount,
            value: round_amount(instruction.amount),
            date: self.payment_date(instruction).format(DATE_FORMAT).to_string(),
            internal_reference: internal_reference.to_owned(),
        })
    }

    /// Date the instruction is paid on: scheduled date, else value date,
    /// else today.
    pub fn payment_date(&self, instruction: &PaymentInstruction) -> NaiveDate {
        let date = self
            .scheduled_date
            .or(instruction.value_date)
            .unwrap_or(self.today);
        if self.clamp_past_dates && date < self.today {
            self.today
        } else {
            date
        }
    }
}

fn transaction_code(
    index: usize,
    account: &str,
    account_type: AccountType,
    amount: Decimal,
) -> Result<TransactionCode> {
    match account_type {
        AccountType::Bankgiro if amount >= Decimal::ZERO => Ok(TransactionCode::BankgiroPayment),
        AccountType::Bankgiro => Ok(TransactionCode::BankgiroCredit),
        AccountType::Plusgiro if amount > Decimal::ZERO => Ok(TransactionCode::PlusgiroPayment),
        AccountType::Plusgiro => Err(PaymentFileError::UnsupportedAmountForAccountType {
            index,
            account: account.to_owned(),
            account_type,
            amount,
        }),
        AccountType::Invalid => Err(PaymentFileError::UnclassifiablePayeeAccount {
            index,
            account: account.to_owned(),
        }),
    }
}

/// Condensed, zero padded account field. `None` when blank or wider than 10.
pub fn encode_account(raw: &str) -> Option<String> {
    let condensed = condense(raw);
    let digits = condensed.chars().count();
    (digits > 0 && digits <= ACCOUNT_WIDTH)
        .then(|| format!("{condensed:0>width$}", width = ACCOUNT_WIDTH))
}

/// Rounds to öre, half away from zero.
fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Absolute amount in öre as a zero padded 12-digit field.
///
/// `100.00` becomes `000000010000`. `None` when the value needs more than
/// 12 digits.
pub fn encode_amount(amount: Decimal) -> Option<String> {
    let minor_units = round_amount(amount)
        .abs()
        .checked_mul(Decimal::ONE_HUNDRED)?
        .trunc()
        .to_u128()?;
    let digits = minor_units.to_string();
    (digits.len() <= AMOUNT_WIDTH).then(|| format!("{digits:0>width$}", width = AMOUNT_WIDTH))
}

/// The last `count` characters of `text`.
pub fn tail_chars(text: &str, count: usize) -> &str {
    let total = text.chars().count();
    if total <= count {
        return text;
    }
    match text.char_indices().nth(total - count) {
        Some((start, _)) => &text[start..],
        None => text,
    }
}

/// Text must stay one byte per character in Latin-1 and must not break the line.
fn check_text<'t>(index: usize, field: &'static str, text: &'t str) -> Result<&'t str> {
    match text.chars().find(|c| !is_encodable(*c)) {
        Some(character) => Err(PaymentFileError::UnencodableCharacter {
            index,
            field,
            character,
        }),
        None => Ok(text),
    }
}

fn is_encodable(c: char) -> bool {
    u32::from(c) <= 0xFF && !c.is_control()
}
