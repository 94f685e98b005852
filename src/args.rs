use clap::{Parser, Subcommand as ClapSubcommand};
use std::path::PathBuf;

/// Converts fixed-layout brokerage trade confirmations into rows of a
/// tab-separated transactions table.
#[derive(Parser)]
#[clap(version = "1.0")]
pub struct Opts {
    /// Directory for the confirmations and transactions files
    #[clap(short, long)]
    pub directory: Option<PathBuf>,

    #[clap(short, long)]
    pub quiet: bool,
    /// Verbose mode (-v, -vv, -vvv, etc)
    #[clap(short, long, parse(from_occurrences))]
    pub verbose: usize,
    /// Timestamp (sec, ms, ns, none)
    #[clap(short, long)]
    pub ts: Option<stderrlog::Timestamp>,

    #[clap(subcommand)]
    pub subcmd: SubCommand,
}

#[derive(ClapSubcommand)]
pub enum SubCommand {
    /// Initialize the data directory
    Init {
        /// Wipes out existing directory
        #[clap(short, long)]
        force: bool,
    },
    /// Parse the confirmations and append them to the transactions table
    Convert {
        /// Read confirmations from this file instead of the data directory
        file: Option<PathBuf>,
    },
    /// List the converted transactions
    Trades { name_substring: Option<String> },
    /// Count the rows of the transactions table
    Check {},
}

pub fn parse_args() -> Opts {
    let opts = Opts::parse();
    if opts.directory.is_none() {
        let mut dd = dirs::data_dir().expect("Cannot find an home directory on this system");
        dd.push("tradeconf");
        Opts {
            directory: Some(dd),
            ..opts
        }
    } else {
        opts
    }
}
