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

use bankgiro_lb::{AssemblerConfig, FileAssembler, PaymentInstruction, SYSTEM_CURRENCY};
use chrono::NaiveDate;
use clap::Parser;
use csv::{ReaderBuilder, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process;
use tracing::{Level, debug, error, info};

/// Bankgiro payment file generator
///
/// Reads payment instructions from a CSV file and writes a Bankgiro
/// Leverantörsbetalningar file named `BG<timestamp>.txt`.
#[derive(Parser, Debug)]
#[command(name = "bankgiro-lb")]
#[command(about = "Generates Bankgiro Leverantörsbetalningar payment files", long_about = None)]
struct Args {
    /// Path to CSV file with payment instructions
    ///
    /// Expected header: payee_account,amount,currency,reference,internal_reference,value_date
    /// with an optional payer_account column.
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Company Bankgiro number the payments are made from
    #[arg(long, env = "BANKGIRO_COMPANY_ACCOUNT")]
    company_account: String,

    /// Payment date for every instruction (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    scheduled_date: Option<NaiveDate>,

    /// Merge instructions to the same payee on the same date
    #[arg(long)]
    group_lines: bool,

    /// Move payment dates in the past to today
    #[arg(long)]
    clamp_past_dates: bool,

    /// Directory the payment file is written to
    #[arg(long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Write the payment file to stdout instead of a file
    #[arg(long, conflicts_with = "output_dir")]
    stdout: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let file = match File::open(&args.input) {
        Ok(f) => f,
        Err(e) => {
            error!(path = %args.input.display(), "error opening file: {e}");
            process::exit(1);
        }
    };

    let instructions = match read_instructions(BufReader::new(file)) {
        Ok(instructions) => instructions,
        Err(e) => {
            error!(path = %args.input.display(), "error reading instructions: {e}");
            process::exit(1);
        }
    };
    debug!(count = instructions.len(), "read payment instructions");

    let config = AssemblerConfig {
        scheduled_date: args.scheduled_date,
        clamp_past_dates: args.clamp_past_dates,
        group_lines: args.group_lines,
    };
    let payment_file = match FileAssembler::new(&args.company_account)
        .and_then(|assembler| assembler.with_config(config).assemble(&instructions))
    {
        Ok(payment_file) => payment_file,
        Err(e) => {
            error!("error generating payment file: {e}");
            process::exit(1);
        }
    };

    let totals = payment_file.totals();
    info!(records = totals.count, total = %totals.sum, "payment file assembled");

    if args.stdout {
        let mut stdout = std::io::stdout();
        if let Err(e) = stdout
            .write_all(payment_file.content())
            .and_then(|()| stdout.flush())
        {
            error!("error writing output: {e}");
            process::exit(1);
        }
        return;
    }

    let path = args.output_dir.join(payment_file.file_name());
    if let Err(e) = fs::write(&path, payment_file.content()) {
        error!(path = %path.display(), "error writing payment file: {e}");
        process::exit(1);
    }
    info!(path = %path.display(), "payment file written");
    println!("{}", path.display());
}

/// Raw CSV record matching the input format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    payee_account: String,
    amount: Decimal,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    reference: Option<String>,
    #[serde(default)]
    internal_reference: Option<String>,
    #[serde(default)]
    value_date: Option<NaiveDate>,
    #[serde(default)]
    payer_account: Option<String>,
}

impl CsvRecord {
    fn into_instruction(self) -> PaymentInstruction {
        PaymentInstruction {
            payer_account: self.payer_account.unwrap_or_default(),
            payee_account: self.payee_account,
            amount: self.amount,
            currency: self
                .currency
                .filter(|currency| !currency.is_empty())
                .unwrap_or_else(|| SYSTEM_CURRENCY.to_owned()),
            reference: self.reference.unwrap_or_default(),
            internal_reference: self.internal_reference.unwrap_or_default(),
            value_date: self.value_date,
        }
    }
}

/// Reads payment instructions from a CSV reader.
///
/// Unlike a ledger import, a payment file must never silently drop a
/// payment, so the first malformed row fails the whole read.
///
/// # Example
///
/// ```csv
/// payee_account,amount,currency,reference,internal_reference,value_date
/// 5402-9681,100.00,SEK,INV001,V-17,2024-05-01
/// 90-1,25.50,,OCR 4711,,
/// ```
///
/// # Errors
///
/// Returns a CSV error if the reader fails or any row cannot be parsed.
pub fn read_instructions<R: Read>(reader: R) -> Result<Vec<PaymentInstruction>, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true) // Allow trailing optional columns to be left out
        .has_headers(true)
        .from_reader(reader);

    rdr.deserialize::<CsvRecord>()
        .map(|result| result.map(CsvRecord::into_instruction))
        .collect()
}
