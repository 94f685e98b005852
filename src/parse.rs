//! Turns the fixed-layout confirmation text a brokerage emits into
//! [`Transaction`] records. A confirmation file is a series of six-line
//! blocks separated by a line of dashes:
//!
//! ```text
//! 02/28/2025    Sell to Open
//! Trade Details
//! JEPQ 03/21/2025 53.00 P
//! PUT J P MORGAN EXCHANGE-$53 EXP 03/21/25
//! 1
//! $0.22    $0.66    $21.34
//! -----------
//! ```
use log::warn;

use crate::errors::*;
use crate::Transaction;

pub const BLOCK_DELIMITER: &str = "-----------";

/// The option-contract attributes carried by the first four tokens of
/// the symbol/description field.
#[derive(Debug)]
pub struct OptionFields {
    pub symbol: String,
    pub exp_date: String,
    pub strike: String,
    pub option_type: String,
    pub cash_deployed: Option<f64>,
}

/// Splits the raw text into per-transaction blocks, in input order,
/// dropping segments that are empty once trimmed.
pub fn split_blocks(text: &str) -> impl Iterator<Item = &str> {
    text.split(BLOCK_DELIMITER)
        .map(str::trim)
        .filter(|b| !b.is_empty())
}

/// Parses every block of `text`, skipping the malformed ones with a
/// diagnostic. Record order matches block order.
pub fn parse_confirmations(text: &str) -> Vec<Transaction> {
    let mut transactions = Vec::new();
    for block in split_blocks(text) {
        match parse_transaction(block) {
            Ok(t) => transactions.push(t),
            Err(e) => warn!("skipping block: {}", e),
        }
    }
    transactions
}

/// Parses one block into a [`Transaction`].
///
/// The block must hold six non-blank lines: date and action, the
/// "Trade Details" banner, two symbol/description lines, the quantity,
/// and the price line. A failed option sub-parse leaves the five
/// derived fields empty but is not an error.
pub fn parse_transaction(block: &str) -> Result<Transaction> {
    let lines: Vec<&str> = block
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.len() < 6 {
        error_chain::bail!(ErrorKind::InsufficientLines(lines.len()));
    }

    // Line 1: date, then whatever remains is the action.
    let (date, action) = match lines[0].split_once(char::is_whitespace) {
        Some((date, rest)) => (date, rest.trim_start()),
        None => (lines[0], ""),
    };

    // Line 2 is the "Trade Details" banner; lines 3 and 4 together form
    // the symbol/description.
    let description = format!("{} {}", lines[2], lines[3]);

    let money: Vec<&str> = lines[5].split_whitespace().collect();
    if money.len() != 3 {
        error_chain::bail!(ErrorKind::MalformedPriceLine(lines[5].to_owned()));
    }

    let (symbol, exp_date, strike, option_type, cash_deployed) =
        match parse_option_fields(&description) {
            Some(o) => (
                Some(o.symbol),
                Some(o.exp_date),
                Some(o.strike),
                Some(o.option_type),
                o.cash_deployed,
            ),
            None => (None, None, None, None, None),
        };

    Ok(Transaction {
        date: date.to_owned(),
        action: action.to_owned(),
        description,
        quantity: lines[4].to_owned(),
        price: money[0].to_owned(),
        fees: money[1].to_owned(),
        amount: money[2].to_owned(),
        symbol,
        exp_date,
        strike,
        option_type,
        cash_deployed,
    })
}

/// Decomposes a symbol/description string: symbol, expiration date,
/// strike and option type are its first four tokens, and cash deployed
/// is strike × 100 for one contract. The type token is kept verbatim,
/// "P"/"C" is not enforced. Returns `None` below four tokens.
pub fn parse_option_fields(description: &str) -> Option<OptionFields> {
    let tokens: Vec<&str> = description.split_whitespace().collect();
    if tokens.len() < 4 {
        warn!(
            "'{}': expected at least 4 tokens in symbol/description, found {}",
            description,
            tokens.len()
        );
        return None;
    }

    let cash_deployed = match tokens[2].parse::<f64>() {
        Ok(strike) => Some(strike * 100.0),
        Err(_) => {
            warn!("'{}': strike is not a number, cash deployed unknown", tokens[2]);
            None
        }
    };

    Some(OptionFields {
        symbol: tokens[0].to_owned(),
        exp_date: tokens[1].to_owned(),
        strike: tokens[2].to_owned(),
        option_type: tokens[3].to_owned(),
        cash_deployed,
    })
}
