mod entry;
mod otp;
mod uri;

use crate::entry::Entry;
use crate::otp::{calculate_code, time_step, OtpType};
use crate::uri::UriTotpFinder;
use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

#[derive(Parser, Debug)]
#[command(
    name = "pentry",
    version,
    about = "Parse pass-style password entries and derive TOTP codes"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show parsed entry fields
    ///
    /// Примеры:
    ///   pentry show entry.txt
    ///   gpg -dq github.gpg | pentry show --json
    Show {
        /// Entry file (stdin if omitted)
        file: Option<PathBuf>,
        /// Show only the password
        #[arg(long)]
        password_only: bool,
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the current OTP code
    ///
    /// Примеры:
    ///   pentry otp entry.txt
    ///   gpg -dq github.gpg | pentry otp
    Otp {
        /// Entry file (stdin if omitted)
        file: Option<PathBuf>,
        /// Unix timestamp to derive the code at (current time by default)
        #[arg(long)]
        at: Option<u64>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Show {
            file,
            password_only,
            json,
        } => cmd_show(file.as_deref(), password_only, json),
        Commands::Otp { file, at } => cmd_otp(file.as_deref(), at),
    }
}

/// Read the decrypted entry text from a file or stdin and parse it.
/// Decryption itself is someone else's job (gpg, the store layer, ...).
fn read_entry(file: Option<&Path>) -> anyhow::Result<Entry> {
    let content = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read entry file {}", path.display()))?,
        None => {
            let mut s = String::new();
            std::io::stdin().read_to_string(&mut s)?;
            s
        }
    };

    Ok(Entry::parse(&content, &UriTotpFinder))
}

fn cmd_show(file: Option<&Path>, password_only: bool, json: bool) -> anyhow::Result<()> {
    let entry = read_entry(file)?;

    if json {
        let s = serde_json::to_string_pretty(&entry)?;
        println!("{s}");
        return Ok(());
    }

    if password_only {
        println!("{}", entry.password);
        return Ok(());
    }

    println!("Password: {}", entry.password);
    if let Some(ref u) = entry.username {
        println!("Username: {u}");
    }
    if entry.has_totp() {
        println!("OTP:      configured");
    } else {
        println!("OTP:      not set");
    }

    Ok(())
}

fn cmd_otp(file: Option<&Path>, at: Option<u64>) -> anyhow::Result<()> {
    let entry = read_entry(file)?;

    let params = entry
        .otp
        .as_ref()
        .ok_or_else(|| anyhow!("No OTP configured in entry"))?;

    let counter = match params.r#type {
        OtpType::Totp => {
            let now = match at {
                Some(t) => t,
                None => OffsetDateTime::now_utc().unix_timestamp() as u64,
            };
            time_step(now, params.period)
        }
        OtpType::Hotp => params.counter.unwrap_or(0),
    };

    let code = calculate_code(&params.secret, counter, params.algorithm, params.digits)?;
    println!("{code}");
    Ok(())
}
