//! Minimal CLI driver for manually exercising a store from the shell.
//! Not a specified interface; a debug/ops tool like every comparable crate
//! in this corpus ships alongside its library.

use clap::{Parser, Subcommand};
use semidb::{Mode, Options, Store};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

#[derive(Parser)]
#[command(
    name = "semidb",
    about = "An embedded, single-process, append-only key-value store"
)]
struct Cli {
    /// Store directory.
    #[arg(long, default_value = "semidb.db")]
    dir: String,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the value of a key.
    Get { key: String },
    /// Set a key to a value, creating the store if it doesn't exist.
    Put { key: String, value: String },
    /// Remove a key.
    Delete { key: String },
    /// List all live keys.
    Keys,
    /// Rewrite the log to reclaim space from deleted and superseded keys.
    Compact,
    /// Print key count and disk usage.
    Status,
}

fn main() -> semidb::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .expect("failed to initialize logger");

    let mode = match cli.command {
        Command::Get { .. } | Command::Keys | Command::Status => Mode::Read,
        _ => Mode::Create,
    };
    let mut store = Store::open(&cli.dir, mode, Options::default())?;

    match cli.command {
        Command::Get { key } => match store.get(&key) {
            Ok(value) => println!("{}", String::from_utf8_lossy(&value)),
            Err(semidb::Error::NotFound) => {
                eprintln!("key not found");
                std::process::exit(1);
            }
            Err(err) => return Err(err),
        },
        Command::Put { key, value } => {
            store.put(&key, &value)?;
            store.sync()?;
        }
        Command::Delete { key } => {
            store.delete(&key)?;
            store.sync()?;
        }
        Command::Keys => {
            for key in store.iterate() {
                println!("{}", String::from_utf8_lossy(&key));
            }
        }
        Command::Compact => {
            store.compact()?;
        }
        Command::Status => {
            let status = store.status()?;
            println!("keys:              {}", status.keys);
            println!("live size:         {} bytes", status.live_size);
            println!("total disk size:   {} bytes", status.total_disk_size);
            println!("live disk size:    {} bytes", status.live_disk_size);
            println!("garbage disk size: {} bytes", status.garbage_disk_size);
        }
    }

    Ok(())
}
