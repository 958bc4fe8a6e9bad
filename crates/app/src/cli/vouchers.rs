use std::io::{self, Write};

use clap::Args;
use masar::vouchers::{Voucher, VoucherId, format_countdown};
use masar_app::{
    context::AppContext,
    domain::{
        accounts::records::UserId,
        vouchers::{
            RedemptionError,
            countdown::{CountdownTick, VoucherCountdown},
        },
    },
};
use tabled::builder::Builder;
use uuid::Uuid;

use super::{describe, render};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Args)]
pub(crate) struct RedeemArgs {
    /// Reward id, as listed by `rewards`
    reward_id: String,
}

#[derive(Debug, Args)]
pub(crate) struct UseVoucherArgs {
    /// Voucher id; the active voucher when omitted
    voucher: Option<Uuid>,
}

pub(crate) async fn redeem(ctx: &AppContext, user: UserId, args: RedeemArgs) -> Result<(), String> {
    let voucher = ctx
        .vouchers
        .redeem(user, args.reward_id)
        .await
        .map_err(|error| match error {
            RedemptionError::ActiveVoucherExists { voucher } => {
                format!("voucher {voucher} is still active; use it or let it expire first")
            }
            RedemptionError::InsufficientPoints(insufficient) => format!(
                "not enough points: {} more needed",
                insufficient.shortfall()
            ),
            other => describe(&other),
        })?;

    println!("voucher code: {}", voucher.code);
    println!("voucher id: {}", voucher.id);
    print_validity(ctx, &voucher);

    Ok(())
}

pub(crate) async fn list(ctx: &AppContext, user: UserId) -> Result<(), String> {
    let vouchers = ctx
        .vouchers
        .vouchers(user)
        .await
        .map_err(|error| describe(&error))?;

    if vouchers.is_empty() {
        println!("no vouchers issued yet");
        return Ok(());
    }

    let now = ctx.clock.now();
    let mut builder = Builder::default();

    builder.push_record(["Code", "Reward", "Cost", "Issued", "State", "Remaining"]);

    for voucher in &vouchers {
        let state = voucher.state_at(now);
        let remaining = if state.is_terminal() {
            "-".to_string()
        } else {
            format_countdown(voucher.remaining_seconds(now))
        };

        builder.push_record([
            voucher.code.to_string(),
            voucher.reward_id.clone(),
            voucher.points_cost.to_string(),
            voucher.issued_at.strftime(TIME_FORMAT).to_string(),
            state.to_string(),
            remaining,
        ]);
    }

    println!("{}", render(builder));

    Ok(())
}

pub(crate) async fn use_voucher(
    ctx: &AppContext,
    user: UserId,
    args: UseVoucherArgs,
) -> Result<(), String> {
    let id = match args.voucher {
        Some(uuid) => VoucherId::from_uuid(uuid),
        None => active(ctx, user.clone()).await?.id,
    };

    let voucher = ctx
        .vouchers
        .use_voucher(user, id)
        .await
        .map_err(|error| describe(&error))?;

    println!("voucher {} used", voucher.code);

    Ok(())
}

pub(crate) async fn watch(ctx: &AppContext, user: UserId) -> Result<(), String> {
    let voucher = active(ctx, user.clone()).await?;

    println!("voucher code: {}", voucher.code);

    let mut countdown = VoucherCountdown::start(
        ctx.vouchers.clone(),
        ctx.clock.clone(),
        user,
        &voucher,
    );

    let mut ticks = countdown.ticks();

    show_tick(countdown.latest())?;

    loop {
        tokio::select! {
            changed = ticks.changed() => {
                if changed.is_err() {
                    break;
                }

                let tick = *ticks.borrow_and_update();

                show_tick(tick)?;

                if matches!(tick, CountdownTick::Finished(_)) {
                    break;
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal.map_err(|error| format!("failed to listen for ctrl-c: {error}"))?;

                countdown.cancel();

                println!();
                println!("stopped watching; the voucher is still valid");

                return Ok(());
            }
        }
    }

    countdown.wait().await;

    Ok(())
}

async fn active(ctx: &AppContext, user: UserId) -> Result<Voucher, String> {
    ctx.vouchers
        .active_voucher(user)
        .await
        .map_err(|error| describe(&error))?
        .ok_or_else(|| "no active voucher".to_string())
}

fn print_validity(ctx: &AppContext, voucher: &Voucher) {
    println!(
        "valid until {} ({} left)",
        voucher.expires_at.strftime(TIME_FORMAT),
        format_countdown(voucher.remaining_seconds(ctx.clock.now()))
    );
}

fn show_tick(tick: CountdownTick) -> Result<(), String> {
    let mut out = io::stdout().lock();

    let written = match tick {
        CountdownTick::Running { remaining_seconds } => {
            write!(out, "\r{}", format_countdown(remaining_seconds))
        }
        CountdownTick::Finished(state) => writeln!(out, "\rvoucher {state}"),
    };

    written
        .and_then(|()| out.flush())
        .map_err(|error| format!("failed to write countdown: {error}"))
}
