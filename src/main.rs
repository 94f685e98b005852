use log::error;

use tradeconf::errors::*;
use tradeconf::*;

use tradeconf::args::*;
use tradeconf::parse::parse_confirmations;

// Rust doesn't trap a unix signal appropriately occasionally: https://github.com/rust-lang/rust/issues/46016
fn reset_signal_pipe_handler() -> Result<()> {
    #[cfg(target_family = "unix")]
    {
        use nix::sys::signal;

        unsafe {
            signal::signal(signal::Signal::SIGPIPE, signal::SigHandler::SigDfl)
                .chain_err(|| "Internal error: cannot trap signal")?;
        }
    }

    Ok(())
}

fn main() {
    reset_signal_pipe_handler().unwrap();

    if let Err(ref e) = run() {
        let mut s = e.to_string();

        for e in e.iter().skip(1) {
            s.push_str(&format!("\n\tcaused by: {}", e));
        }

        // with `RUST_BACKTRACE=1`.
        if let Some(backtrace) = e.backtrace() {
            s.push_str(&format!("\n\tbacktrace:\n{:?}", backtrace));
        }

        error!("{}", s);

        ::std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let opts = parse_args();

    stderrlog::new()
        .module(module_path!())
        .show_level(false)
        .quiet(opts.quiet)
        .verbosity(opts.verbose + 1) // The user needs warnings
        .timestamp(opts.ts.unwrap_or(stderrlog::Timestamp::Off))
        .init()
        .unwrap();

    let home_dir = &opts.directory.unwrap();

    match opts.subcmd {
        SubCommand::Init { force } => {
            let store = Store::new(home_dir, force)?;
            println!("Data directory: {}", store.home_dir.to_string_lossy());
            Ok(())
        }
        SubCommand::Convert { file } => {
            let store = Store::open(home_dir)?;
            let text = store.read_confirmations(file.as_deref())?;

            let transactions = parse_confirmations(&text);
            if transactions.is_empty() {
                println!("No valid transactions found.");
                return Ok(());
            }

            println!(
                fmt_transaction!(),
                "DATE",
                "ACTION",
                "SYMBOL/DESCRIPTION",
                "SYMBOL",
                "EXP DATE",
                "STRIKE",
                "T",
                "QTY",
                "PRICE",
                "FEES",
                "AMOUNT",
                "CASH"
            );
            transactions.iter().for_each(|t| println!("{}", t));

            store.append_transactions(&transactions)?;
            println!("{} transactions appended.", transactions.len());
            Ok(())
        }
        SubCommand::Trades { name_substring } => {
            let store = Store::open(home_dir)?;
            println!(
                fmt_transaction!(),
                "DATE",
                "ACTION",
                "SYMBOL/DESCRIPTION",
                "SYMBOL",
                "EXP DATE",
                "STRIKE",
                "T",
                "QTY",
                "PRICE",
                "FEES",
                "AMOUNT",
                "CASH"
            );
            store.transactions(name_substring)?;
            Ok(())
        }
        SubCommand::Check {} => {
            let store = Store::open(home_dir)?;
            let ct = store.check()?;
            println!("{} transactions in the table.", ct);
            Ok(())
        }
    }
}
