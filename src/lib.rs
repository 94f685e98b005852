#![recursion_limit = "1024"]
use std::{fmt, fs, io, path};

use log::{info, warn};
use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};
use unicode_truncate::UnicodeTruncateStr;

use crate::errors::*;

pub mod args;
pub mod parse;

pub mod errors {
    error_chain::error_chain! {
        errors {
            InsufficientLines(found: usize) {
                description("transaction block has too few lines")
                display("transaction block has {} non-blank lines, expected 6", found)
            }
            MalformedPriceLine(line: String) {
                description("price line is malformed")
                display("price line '{}' does not split into price, fees and amount", line)
            }
        }
    }
}

pub const CONFIRMATIONS_FILE: &str = "confirmations.txt";
pub const TRANSACTIONS_FILE: &str = "transactions.tsv";

pub struct Store<'a> {
    pub home_dir: &'a path::Path,
}

/// One brokerage confirmation, flattened into the columns of the
/// transactions table. The last five fields come from the option
/// sub-parse of Symbol/Description and are absent when it fails.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Transaction {
    #[serde(rename = "Transaction Date")]
    pub date: String,
    #[serde(rename = "Action")]
    pub action: String,
    #[serde(rename = "Symbol/Description")]
    pub description: String,
    #[serde(rename = "Quantity")]
    pub quantity: String,
    #[serde(rename = "Price")]
    pub price: String,
    #[serde(rename = "Fees & Commission")]
    pub fees: String,
    #[serde(rename = "Amount")]
    pub amount: String,
    #[serde(rename = "Symbol")]
    pub symbol: Option<String>,
    #[serde(rename = "Exp Date")]
    pub exp_date: Option<String>,
    #[serde(rename = "Strike")]
    pub strike: Option<String>,
    #[serde(rename = "Type")]
    pub option_type: Option<String>,
    #[serde(rename = "Cash Deployed")]
    pub cash_deployed: Option<f64>,
}

#[macro_export]
macro_rules! fmt_transaction {
    () => {
        "{:<10}\t{:<14}\t{:<34}\t{:<6}\t{:<10}\t{:>7}\t{:<1}\t{:>5}\t{:>8}\t{:>8}\t{:>10}\t{:>8}"
    };
}

trait Separate {
    fn sep(&self) -> String;
}

impl Separate for f64 {
    fn sep(&self) -> String {
        (self.round() as i64).to_formatted_string(&Locale::en)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            fmt_transaction!(),
            self.date.unicode_truncate(10).0,
            self.action.unicode_truncate(14).0,
            self.description.unicode_truncate(34).0,
            self.symbol
                .as_ref()
                .map_or("<NA>", |s| s.unicode_truncate(6).0),
            self.exp_date
                .as_ref()
                .map_or("<NA>", |d| d.unicode_truncate(10).0),
            self.strike
                .as_ref()
                .map_or("<NA>", |s| s.unicode_truncate(7).0),
            self.option_type
                .as_ref()
                .map_or("?", |t| t.unicode_truncate(1).0),
            self.quantity,
            self.price,
            self.fees,
            self.amount,
            self.cash_deployed
                .map_or("<NA>".to_owned(), |c| c.sep()),
        )
    }
}

impl Store<'_> {
    pub fn open(home_dir: &path::Path) -> Result<Store> {
        if home_dir.is_dir() {
            Ok(Store { home_dir })
        } else {
            error_chain::bail!(
                "Can't find data directory {}.\n Have you run 'tradeconf init'?",
                home_dir.to_string_lossy()
            )
        }
    }

    pub fn new(home_dir: &path::Path, force: bool) -> Result<Store> {
        if force && home_dir.is_dir() {
            fs::remove_dir_all(&home_dir).chain_err(|| "Could not remove data directory")?;
        }
        let home_dir_str = home_dir.to_string_lossy();

        let _ = fs::create_dir_all(&home_dir)
            .chain_err(|| format!("Can't create data directory at {}", home_dir_str));

        let store = Store { home_dir };

        // Only the confirmations file is seeded here. The transactions
        // table is created by the first append, so a run that converts
        // nothing leaves no header-only file behind.
        store.create_file_if_not_exist(CONFIRMATIONS_FILE)?;

        Ok(store)
    }

    fn create_file_if_not_exist(&self, file_name: &str) -> crate::errors::Result<()> {
        let full_path = self.home_dir.join(file_name);
        let str_path = full_path.to_string_lossy();

        let mut res = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full_path);

        match &mut res {
            Ok(_) => Ok(info!("{}: file created", str_path)),
            Err(e) => {
                if e.kind() == io::ErrorKind::AlreadyExists {
                    Ok(warn!("{}: file already exists", str_path))
                } else {
                    res.map(|_| ())
                        .chain_err(|| format!("Error opening {}", str_path))
                }
            }
        }
    }

    /// Reads the raw confirmations text, from `input` when given,
    /// otherwise from the conventional file in the data directory.
    /// A missing file is the "nothing to convert" state, not an error.
    pub fn read_confirmations(&self, input: Option<&path::Path>) -> Result<String> {
        let path = match input {
            Some(p) => p.to_path_buf(),
            None => self.home_dir.join(CONFIRMATIONS_FILE),
        };
        if !path.is_file() {
            warn!("{}: no confirmations file", path.to_string_lossy());
            return Ok(String::new());
        }
        fs::read_to_string(&path)
            .chain_err(|| format!("Cannot read confirmations from {}", path.to_string_lossy()))
    }

    /// Appends one batch to the transactions table, writing the header
    /// row first when the table does not exist yet. An empty batch
    /// mutates nothing.
    pub fn append_transactions(&self, transactions: &[Transaction]) -> Result<()> {
        if transactions.is_empty() {
            return Ok(());
        }
        let path = self.home_dir.join(TRANSACTIONS_FILE);
        let write_header = !path.is_file();

        let file = fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .chain_err(|| "Can't open transactions file")?;

        let mut wtr = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(csv::QuoteStyle::NonNumeric)
            .has_headers(write_header)
            .from_writer(file);

        for t in transactions {
            wtr.serialize(t)
                .chain_err(|| "Error serializing one transaction")?;
        }
        wtr.flush()
            .chain_err(|| "Error flushing the transactions file")
    }

    fn transactions_fold<R, F>(&self, init: &mut R, f: F) -> Result<()>
    where
        F: Fn(&mut R, Transaction) -> (),
    {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_path(self.home_dir.join(TRANSACTIONS_FILE))
            .chain_err(|| "Cannot open transactions file.\n Have you run 'tradeconf convert'?")?;

        let mut raw_record = csv::StringRecord::new();
        let headers = rdr.headers().chain_err(|| "Can't get headers?")?.clone();

        while rdr
            .read_record(&mut raw_record)
            .chain_err(|| "Csv not well formed")?
        {
            let record: Transaction = raw_record
                .deserialize(Some(&headers))
                .chain_err(|| "Csv not well formed")?;
            f(init, record);
        }
        Ok(())
    }

    pub fn load_transactions(&self) -> Result<Vec<Transaction>> {
        let mut v = Vec::new();
        let f = |v: &mut Vec<Transaction>, t: Transaction| v.push(t);
        self.transactions_fold(&mut v, f)?;
        Ok(v)
    }

    pub fn transactions(&self, name_substring: Option<String>) -> Result<()> {
        let s = name_substring.unwrap_or_default().to_lowercase();
        let mut k = ();
        let f = |_: &mut _, t: Transaction| {
            if t.description.to_lowercase().contains(&s) {
                println!("{}", t)
            }
        };
        self.transactions_fold(&mut k, f)?;
        Ok(())
    }

    pub fn check(&self) -> Result<usize> {
        // The table legitimately does not exist before the first convert.
        if !self.home_dir.join(TRANSACTIONS_FILE).is_file() {
            return Ok(0);
        }
        let f = |c: &mut usize, _: Transaction| *c = *c + 1;
        let mut ct = 0;
        self.transactions_fold(&mut ct, f)?;
        Ok(ct)
    }
}
