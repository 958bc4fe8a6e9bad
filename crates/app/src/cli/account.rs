use clap::Args;
use masar_app::{context::AppContext, domain::accounts::records::UserId};

use super::describe;

#[derive(Debug, Args)]
pub(crate) struct DeleteAccountArgs {
    /// Confirm that stamps, points and vouchers should be erased
    #[arg(long)]
    yes: bool,
}

pub(crate) async fn delete(
    ctx: &AppContext,
    user: UserId,
    args: DeleteAccountArgs,
) -> Result<(), String> {
    if !args.yes {
        return Err(format!("refusing to delete data for {user} without --yes"));
    }

    ctx.accounts
        .delete_account(user.clone())
        .await
        .map_err(|error| describe(&error))?;

    println!("deleted all stamps, points and vouchers for {user}");

    Ok(())
}
