use masar_app::{context::AppContext, domain::accounts::records::UserId};
use tabled::builder::Builder;

use super::{describe, render};

pub(crate) async fn list(ctx: &AppContext, user: UserId) -> Result<(), String> {
    let balance = ctx
        .points
        .balance(user)
        .await
        .map_err(|error| describe(&error))?;

    let mut builder = Builder::default();

    builder.push_record(["Reward", "Platform", "Discount", "Cost", "Needed"]);

    for reward in ctx.catalog.iter() {
        let needed = reward
            .shortfall(balance)
            .map_or_else(|| "-".to_string(), |shortfall| shortfall.to_string());

        builder.push_record([
            reward.id.clone(),
            reward.platform.clone(),
            reward.discount.clone(),
            reward.points_cost.to_string(),
            needed,
        ]);
    }

    println!("{}", render(builder));
    println!("balance: {balance} points");

    Ok(())
}
