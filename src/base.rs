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

//! Transaction codes and fixed field widths of the Leverantörsbetalningar layout.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The only currency the file format carries.
pub const SYSTEM_CURRENCY: &str = "SEK";

/// Width of every account number field, zero padded on the left.
pub const ACCOUNT_WIDTH: usize = 10;
/// Width of the payment reference field, space padded on the right.
pub const REFERENCE_WIDTH: usize = 25;
/// Width of amount fields, zero padded on the left.
pub const AMOUNT_WIDTH: usize = 12;
/// Maximum length of the trailing internal reference.
pub const INTERNAL_REFERENCE_WIDTH: usize = 20;
/// Width of the record count in the closing post.
pub const COUNT_WIDTH: usize = 8;
/// Blank filler between payment date and internal reference.
pub const FILLER_WIDTH: usize = 5;

/// Dates are written as `YYMMDD`.
pub const DATE_FORMAT: &str = "%y%m%d";
/// Terminator after every record except the closing post.
pub const LINE_TERMINATOR: &str = "\r\n";
/// Mandatory text of the opening post.
pub const OPENING_TEXT: &str = "LEVERANTÖRSBETALNINGAR";

/// Two-digit record type at the start of every line.
///
/// Variants are declared in ascending code order so the derived ordering
/// agrees with the lexicographic ordering of the encoded field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TransactionCode {
    /// `11`: opening post.
    Opening,
    /// `14`: payment to a Bankgiro account.
    BankgiroPayment,
    /// `16`: credit deduction against a Bankgiro account.
    BankgiroCredit,
    /// `29`: closing post.
    Closing,
    /// `54`: payment to a Plusgiro account.
    PlusgiroPayment,
}

impl TransactionCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Opening => "11",
            Self::BankgiroPayment => "14",
            Self::BankgiroCredit => "16",
            Self::Closing => "29",
            Self::PlusgiroPayment => "54",
        }
    }
}

impl fmt::Display for TransactionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strips hyphens, turning `5402-9681` into `54029681`.
pub fn condense(raw: &str) -> String {
    raw.trim().chars().filter(|c| *c != '-').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_render_two_digits() {
        assert_eq!(TransactionCode::Opening.to_string(), "11");
        assert_eq!(TransactionCode::BankgiroPayment.to_string(), "14");
        assert_eq!(TransactionCode::BankgiroCredit.to_string(), "16");
        assert_eq!(TransactionCode::Closing.to_string(), "29");
        assert_eq!(TransactionCode::PlusgiroPayment.to_string(), "54");
    }

    #[test]
    fn code_ordering_matches_encoded_ordering() {
        let mut codes = vec![
            TransactionCode::PlusgiroPayment,
            TransactionCode::BankgiroCredit,
            TransactionCode::Closing,
            TransactionCode::Opening,
            TransactionCode::BankgiroPayment,
        ];
        codes.sort();
        let encoded: Vec<&str> = codes.iter().map(TransactionCode::as_str).collect();
        let mut lexicographic = encoded.clone();
        lexicographic.sort();
        assert_eq!(encoded, lexicographic);
    }

    #[test]
    fn condense_removes_hyphens() {
        assert_eq!(condense("5402-9681"), "54029681");
        assert_eq!(condense(" 90-1 "), "901");
        assert_eq!(condense("9912346"), "9912346");
    }
}
