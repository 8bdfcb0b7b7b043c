//! Pari-mutuel settlement math.
//!
//! A winning bet is paid its own stake back plus a share of the losing pool
//! proportional to the stake's share of the winning pool:
//!
//! ```text
//! payout = stake + losing_pool * stake / winning_pool
//! ```
//!
//! Division floors, so the sum of all payouts never exceeds the total pool.
//! Whatever the flooring leaves behind stays in the market escrow.

use anchor_lang::prelude::*;

use crate::errors::PredictError;

/// Returns `(winning_pool, losing_pool)` for a market resolved to `result`.
pub fn split_pools(total_yes: u64, total_no: u64, result: bool) -> (u64, u64) {
    if result {
        (total_yes, total_no)
    } else {
        (total_no, total_yes)
    }
}

/// Payout for a stake sitting in the winning pool.
pub fn winning_payout(stake: u64, winning_pool: u64, losing_pool: u64) -> Result<u64> {
    require!(winning_pool > 0, PredictError::NoWinningPool);
    require!(stake <= winning_pool, PredictError::MarketInsolvent);

    let share = (losing_pool as u128)
        .checked_mul(stake as u128)
        .ok_or(PredictError::Overflow)?
        / winning_pool as u128;
    // share <= losing_pool because stake <= winning_pool
    let share = u64::try_from(share).map_err(|_| PredictError::Overflow)?;

    Ok(stake.checked_add(share).ok_or(PredictError::Overflow)?)
}

/// Payout for a bet of `stake` on `prediction` in a market resolved to `result`.
///
/// A bet on the losing side is worth zero.
pub fn bet_payout(
    stake: u64,
    prediction: bool,
    total_yes: u64,
    total_no: u64,
    result: bool,
) -> Result<u64> {
    if prediction != result {
        return Ok(0);
    }
    let (winning_pool, losing_pool) = split_pools(total_yes, total_no, result);
    winning_payout(stake, winning_pool, losing_pool)
}
