use clap::Args;
use masar_app::{
    context::AppContext,
    domain::{
        accounts::records::UserId,
        stamps::records::StampOutcome,
    },
};
use tabled::builder::Builder;

use super::{describe, render};

#[derive(Debug, Args)]
pub(crate) struct ScanArgs {
    /// Text decoded from the landmark's QR code
    payload: String,
}

pub(crate) async fn scan(ctx: &AppContext, user: UserId, args: ScanArgs) -> Result<(), String> {
    let outcome = ctx
        .stamps
        .record_scan(user, args.payload)
        .await
        .map_err(|error| describe(&error))?;

    match outcome {
        StampOutcome::Collected {
            emirate,
            record,
            points_awarded,
            balance,
        } => println!(
            "collected {} in {}: +{points_awarded} points (balance {balance})",
            record.name,
            emirate.display_name()
        ),
        StampOutcome::AlreadyCollected { emirate, record } => println!(
            "{} in {} was already collected on {}",
            record.name,
            emirate.display_name(),
            record.collected_at.strftime("%Y-%m-%d")
        ),
    }

    Ok(())
}

pub(crate) async fn passport(ctx: &AppContext, user: UserId) -> Result<(), String> {
    let book = ctx
        .stamps
        .stamp_book(user.clone())
        .await
        .map_err(|error| describe(&error))?;

    let passport = ctx
        .stamps
        .passport(user)
        .await
        .map_err(|error| describe(&error))?;

    let mut builder = Builder::default();

    builder.push_record(["Emirate", "Collected", "Stamps"]);

    for progress in passport.emirates() {
        let names: Vec<&str> = book
            .collected_in(progress.emirate)
            .iter()
            .map(|record| record.name.as_str())
            .collect();

        builder.push_record([
            progress.emirate.display_name().to_string(),
            format!("{}/{}", progress.collected, progress.total),
            names.join(", "),
        ]);
    }

    println!("{}", render(builder));
    println!(
        "{}/{} stamps ({}% complete)",
        passport.collected(),
        passport.total(),
        passport.completion_percent()
    );

    Ok(())
}
