use clap::{Parser, Subcommand};
use recordsheet_api::endpoints::Amount;
use std::str::FromStr;

/// Command-line client for a RecordSheet ledger server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Overrides `server_url` from the settings file.
    #[arg(long, global = true)]
    pub server_url: Option<String>,

    /// Overrides `app_root` from the settings file.
    #[arg(long, global = true)]
    pub app_root: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List every account, sorted by name.
    Accounts,

    /// Show the account autocomplete would pick for a prefix.
    Match { prefix: String },

    /// Create an account.
    AddAccount {
        name: String,
        #[arg(long, default_value = "")]
        desc: String,
    },

    /// Post a journal entry.
    Post {
        #[arg(long)]
        memo: String,

        /// Entry datetime, e.g. 2024-05-03T09:00 (UTC). Defaults to now.
        #[arg(long)]
        datetime: Option<String>,

        /// One post as ACCOUNT=AMOUNT[:MEMO]. Repeat for each post.
        #[arg(long = "line", required = true)]
        lines: Vec<PostLine>,

        /// Add a post to ACCOUNT that brings the entry to zero.
        #[arg(long, value_name = "ACCOUNT")]
        balance: Option<String>,
    },

    /// Print a template fragment.
    Template { name: String },
}

/// A `--line` argument.
#[derive(Debug, Clone, PartialEq)]
pub struct PostLine {
    pub account: String,
    pub amount: Amount,
    pub memo: String,
}

impl FromStr for PostLine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (account, rest) = s
            .split_once('=')
            .ok_or_else(|| format!("Expected ACCOUNT=AMOUNT[:MEMO], got '{}'", s))?;

        let account = account.trim();
        if account.is_empty() {
            return Err(format!("Missing account in '{}'", s));
        }

        // Account names may contain ':', amounts never do.
        let (amount, memo) = rest.split_once(':').unwrap_or((rest, ""));
        let amount = amount.parse::<Amount>().map_err(|e| e.to_string())?;

        Ok(Self {
            account: account.to_string(),
            amount,
            memo: memo.trim().to_string(),
        })
    }
}
