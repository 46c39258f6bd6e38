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


//! Payment record builder integration tests.

use bankgiro_lb::{
    AccountType, CompanyAccount, FIXED_RECORD_WIDTH, PaymentFileError, PaymentInstruction,
    PaymentRecordBuilder, TransactionCode,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// === Helper Functions ===

fn company() -> CompanyAccount {
    CompanyAccount::parse("991-2346").unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, 15).unwrap()
}

fn build(instruction: PaymentInstruction) -> Result<bankgiro_lb::EncodedRecord, PaymentFileError> {
    let company = company();
    let mut builder = PaymentRecordBuilder::new(&company, today());
    builder.build(0, &instruction)
}

fn payment(payee: &str, amount: Decimal) -> PaymentInstruction {
    PaymentInstruction::new(payee, amount)
}

// === Transaction codes ===

#[test]
fn bankgiro_payment_is_code_14() {
    let record = build(payment("5402-9681", dec!(100.00))).unwrap();
    assert_eq!(record.code(), TransactionCode::BankgiroPayment);
    assert!(record.to_string().starts_with("14"));
}

#[test]
fn zero_amount_to_bankgiro_is_code_14() {
    let record = build(payment("5402-9681", dec!(0))).unwrap();
    assert_eq!(record.code(), TransactionCode::BankgiroPayment);
}

#[test]
fn bankgiro_credit_is_code_16() {
    let record = build(payment("5402-9681", dec!(-40.00))).unwrap();
    assert_eq!(record.code(), TransactionCode::BankgiroCredit);
    assert_eq!(record.amount(), "000000004000");
    assert_eq!(record.value(), dec!(-40.00));
}

#[test]
fn plusgiro_payment_is_code_54() {
    let record = build(payment("90-1", dec!(12.34))).unwrap();
    assert_eq!(record.code(), TransactionCode::PlusgiroPayment);
    assert_eq!(record.account(), "0000000901");
}

#[test]
fn zero_or_negative_to_plusgiro_fails() {
    for amount in [dec!(0), dec!(-1.00)] {
        assert_eq!(
            build(payment("90-1", amount)),
            Err(PaymentFileError::UnsupportedAmountForAccountType {
                index: 0,
                account: "90-1".into(),
                account_type: AccountType::Plusgiro,
                amount,
            })
        );
    }
}

#[test]
fn invalid_payee_account_fails() {
    assert_eq!(
        build(payment("5402-9682", dec!(1))),
        Err(PaymentFileError::UnclassifiablePayeeAccount {
            index: 0,
            account: "5402-9682".into(),
        })
    );
}

// === Field validation ===

#[test]
fn blank_payee_account_fails() {
    assert_eq!(
        build(payment("  ", dec!(1))),
        Err(PaymentFileError::MissingPayeeAccount { index: 0 })
    );
}

#[test]
fn eleven_digit_payee_account_is_too_long() {
    assert_eq!(
        build(payment("1234567890-1", dec!(1))),
        Err(PaymentFileError::AccountNumberTooLong {
            account: "1234567890-1".into(),
            digits: 11,
            limit: 10,
        })
    );
}

#[test]
fn non_sek_currency_fails() {
    assert_eq!(
        build(payment("5402-9681", dec!(1)).with_currency("EUR")),
        Err(PaymentFileError::UnsupportedCurrency {
            index: 0,
            currency: "EUR".into(),
        })
    );
}

#[test]
fn largest_amount_fits() {
    let record = build(payment("5402-9681", dec!(9999999999.99))).unwrap();
    assert_eq!(record.amount(), "999999999999");
}

#[test]
fn amount_over_twelve_digits_fails() {
    assert_eq!(
        build(payment("5402-9681", dec!(10000000000.00))),
        Err(PaymentFileError::AmountTooLarge {
            index: 0,
            amount: dec!(10000000000.00),
            limit: 12,
        })
    );
}

#[test]
fn payer_account_must_match_company() {
    assert!(build(payment("5402-9681", dec!(1)).with_payer_account("9912346")).is_ok());
    assert!(build(payment("5402-9681", dec!(1)).with_payer_account("991-2346")).is_ok());
    assert_eq!(
        build(payment("5402-9681", dec!(1)).with_payer_account("5050-1055")),
        Err(PaymentFileError::PayerAccountMismatch {
            index: 0,
            account: "5050-1055".into(),
        })
    );
}

#[test]
fn error_carries_instruction_index() {
    let company = company();
    let mut builder = PaymentRecordBuilder::new(&company, today());
    assert!(builder.build(0, &payment("5402-9681", dec!(1))).is_ok());
    assert_eq!(
        builder.build(7, &payment("", dec!(1))),
        Err(PaymentFileError::MissingPayeeAccount { index: 7 })
    );
}

// === Text fields ===

#[test]
fn long_reference_keeps_tail() {
    let reference = "Faktura 2024 kund 118 nr 4711-0042";
    let record = build(payment("5402-9681", dec!(1)).with_reference(reference)).unwrap();
    assert_eq!(record.reference(), "024 kund 118 nr 4711-0042");
    assert_eq!(record.reference().chars().count(), 25);
}

#[test]
fn short_reference_is_space_padded() {
    let record = build(payment("5402-9681", dec!(1)).with_reference("INV001")).unwrap();
    assert_eq!(record.reference(), format!("{:<25}", "INV001"));
}

#[test]
fn internal_reference_keeps_last_twenty() {
    let record = build(
        payment("5402-9681", dec!(1)).with_internal_reference("LEV/2024/0001LEV/2024/0002"),
    )
    .unwrap();
    assert_eq!(record.internal_reference(), "24/0001LEV/2024/0002");
}

#[test]
fn swedish_characters_are_accepted() {
    let record = build(payment("5402-9681", dec!(1)).with_reference("Ångström & Öberg")).unwrap();
    assert!(record.reference().starts_with("Ångström & Öberg"));
    assert_eq!(record.width(), FIXED_RECORD_WIDTH);
}

#[test]
fn characters_outside_latin1_fail() {
    assert_eq!(
        build(payment("5402-9681", dec!(1)).with_internal_reference("€-42")),
        Err(PaymentFileError::UnencodableCharacter {
            index: 0,
            field: "internal reference",
            character: '€',
        })
    );
}

// === Widths ===

#[test]
fn record_width_is_fixed_plus_internal_reference() {
    let record = build(payment("90-1", dec!(1)).with_internal_reference("V-17")).unwrap();
    assert_eq!(record.width(), 64);
    assert_eq!(record.to_string().chars().count(), 64);
    assert_eq!(record.to_line().len(), 66);
}
