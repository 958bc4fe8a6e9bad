use std::error::Error;

use clap::{Parser, Subcommand};
use masar_app::context::AppContext;
use tabled::{Table, builder::Builder, settings::Style};

use crate::config::{LedgerConfig, LoggingConfig};

mod account;
mod points;
mod rewards;
mod stamps;
mod vouchers;

#[derive(Debug, Parser)]
#[command(name = "masar", about = "Masar passport, points and vouchers", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) ledger: LedgerConfig,

    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the rewards that can be redeemed
    Rewards,

    /// Record a stamp from a scanned QR payload
    Scan(stamps::ScanArgs),

    /// Show collection progress per emirate
    Passport,

    /// Show the points balance
    Balance,

    /// Spend points on a reward
    Redeem(vouchers::RedeemArgs),

    /// List issued vouchers, newest first
    Vouchers,

    /// Mark a voucher as used
    UseVoucher(vouchers::UseVoucherArgs),

    /// Count down the active voucher until it expires
    WatchVoucher,

    /// Delete every ledger entry for the user
    DeleteAccount(account::DeleteAccountArgs),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let ctx = AppContext::from_settings(&self.ledger.settings())
            .await
            .map_err(|error| describe(&error))?;

        let user = self.ledger.user;

        match self.command {
            Commands::Rewards => rewards::list(&ctx, user).await,
            Commands::Scan(args) => stamps::scan(&ctx, user, args).await,
            Commands::Passport => stamps::passport(&ctx, user).await,
            Commands::Balance => points::balance(&ctx, user).await,
            Commands::Redeem(args) => vouchers::redeem(&ctx, user, args).await,
            Commands::Vouchers => vouchers::list(&ctx, user).await,
            Commands::UseVoucher(args) => vouchers::use_voucher(&ctx, user, args).await,
            Commands::WatchVoucher => vouchers::watch(&ctx, user).await,
            Commands::DeleteAccount(args) => account::delete(&ctx, user, args).await,
        }
    }
}

/// An error and its sources on one line.
fn describe(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}

fn render(builder: Builder) -> Table {
    let mut table = builder.build();

    table.with(Style::modern_rounded());

    table
}
