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

//! Merging of instructions that end up as one payment.
//!
//! Instructions with the same payee, payer, currency and payment date
//! collapse into a single instruction: amounts are summed, references are
//! joined with `-` and internal references are concatenated. Members are
//! merged sorted by reference, internal reference and amount, so the result
//! does not depend on input order. Groups keep the order of their first
//! member.

use crate::base::{AMOUNT_WIDTH, condense};
use crate::error::{PaymentFileError, Result};
use crate::instruction::PaymentInstruction;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

const REFERENCE_SEPARATOR: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GroupKey {
    payee_account: String,
    payer_account: String,
    currency: String,
    payment_date: NaiveDate,
}

impl GroupKey {
    fn of(instruction: &PaymentInstruction, payment_date: NaiveDate) -> Self {
        Self {
            payee_account: condense(&instruction.payee_account),
            payer_account: condense(&instruction.payer_account),
            currency: instruction.currency.trim().to_owned(),
            payment_date,
        }
    }
}

/// Groups instructions that would be paid as one.
///
/// `payment_date` gives the date an instruction is actually paid on, after
/// any scheduled date or clamping. The merged instruction carries that date
/// as its value date.
///
/// # Errors
///
/// [`PaymentFileError::AmountTooLarge`] when a group's sum overflows. The
/// index is the group's position in the returned batch.
pub fn group_instructions<F>(
    instructions: &[PaymentInstruction],
    payment_date: F,
) -> Result<Vec<PaymentInstruction>>
where
    F: Fn(&PaymentInstruction) -> NaiveDate,
{
    let mut positions: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<(NaiveDate, Vec<&PaymentInstruction>)> = Vec::new();

    for instruction in instructions {
        let date = payment_date(instruction);
        match positions.entry(GroupKey::of(instruction, date)) {
            Entry::Occupied(entry) => groups[*entry.get()].1.push(instruction),
            Entry::Vacant(entry) => {
                entry.insert(groups.len());
                groups.push((date, vec![instruction]));
            }
        }
    }

    groups
        .into_iter()
        .enumerate()
        .map(|(index, (date, mut members))| {
            members.sort_by(|a, b| member_order(a).cmp(&member_order(b)));
            merge(index, date, &members)
        })
        .collect()
}

// Raw account and currency text only break ties between members whose
// references and amounts are equal.
fn member_order(instruction: &PaymentInstruction) -> (&str, &str, Decimal, &str, &str, &str) {
    (
        &instruction.reference,
        &instruction.internal_reference,
        instruction.amount,
        instruction.payee_account.trim(),
        instruction.payer_account.trim(),
        instruction.currency.trim(),
    )
}

// `members` is never empty.
fn merge(
    index: usize,
    date: NaiveDate,
    members: &[&PaymentInstruction],
) -> Result<PaymentInstruction> {
    let mut group = members[0].clone();
    group.amount = Decimal::ZERO;
    group.reference.clear();
    group.internal_reference.clear();
    group.value_date = Some(date);

    for member in members {
        group.amount = group.amount.checked_add(member.amount).ok_or(
            PaymentFileError::AmountTooLarge {
                index,
                amount: member.amount,
                limit: AMOUNT_WIDTH,
            },
        )?;

        if !member.reference.is_empty() {
            if !group.reference.is_empty() {
                group.reference.push_str(REFERENCE_SEPARATOR);
            }
            group.reference.push_str(&member.reference);
        }

        group.internal_reference.push_str(&member.internal_reference);
    }

    Ok(group)
}
