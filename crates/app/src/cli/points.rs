use masar_app::{context::AppContext, domain::accounts::records::UserId};

use super::describe;

pub(crate) async fn balance(ctx: &AppContext, user: UserId) -> Result<(), String> {
    let balance = ctx
        .points
        .balance(user)
        .await
        .map_err(|error| describe(&error))?;

    println!("{balance} points");

    Ok(())
}
