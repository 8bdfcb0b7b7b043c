//! Coin flip and dice outcome generation.
//!
//! Outcomes come from SHA-256 over a server seed (player, slot, timestamp,
//! house, game index) combined with a player-supplied client seed. Both seeds
//! are stored on the game record, so anyone can recompute the outcome with
//! [`verify_outcome`]. This is reproducibility, not a commitment scheme: the
//! slot and timestamp are known to the validator producing the block.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::TRANSACTION_LEVEL_STACK_HEIGHT;
use anchor_lang::solana_program::pubkey;
use solana_hash::Hash;
use solana_sha256_hasher::hashv;

use crate::constants::{BPS_DENOMINATOR, DICE_FACES};
use crate::errors::PredictError;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum GameType {
    CoinFlip,
    Dice,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoinSide {
    Heads,
    Tails,
}

impl CoinSide {
    /// Encoding used in game records: 0 = heads, 1 = tails.
    pub fn as_u8(self) -> u8 {
        match self {
            CoinSide::Heads => 0,
            CoinSide::Tails => 1,
        }
    }
}

/// Result of one game round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Round {
    pub outcome: u8,
    pub won: bool,
    pub payout: u64,
}

fn digest(parts: &[&[u8]]) -> [u8; 32] {
    let hash: Hash = hashv(parts);
    hash.to_bytes()
}

pub fn server_seed(
    player: &Pubkey,
    slot: u64,
    timestamp: i64,
    house: &Pubkey,
    game_index: u64,
) -> [u8; 32] {
    digest(&[
        player.as_ref(),
        &slot.to_le_bytes(),
        &timestamp.to_le_bytes(),
        house.as_ref(),
        &game_index.to_le_bytes(),
    ])
}

pub fn combine_seeds(server: &[u8; 32], client: &[u8; 32], player: &Pubkey) -> [u8; 32] {
    digest(&[server.as_ref(), client.as_ref(), player.as_ref()])
}

/// Maps combined seed bytes onto the game's outcome set.
///
/// Coin flip yields 0 (heads) or 1 (tails); dice yields a face in 1..=6.
pub fn roll(game_type: GameType, combined: &[u8; 32]) -> u8 {
    let mut head = [0u8; 8];
    head.copy_from_slice(&combined[..8]);
    let draw = u64::from_le_bytes(head);

    match game_type {
        GameType::CoinFlip => (draw % 2) as u8,
        GameType::Dice => (draw % DICE_FACES as u64) as u8 + 1,
    }
}

pub fn validate_prediction(game_type: GameType, prediction: u8) -> Result<()> {
    let valid = match game_type {
        GameType::CoinFlip => prediction <= 1,
        GameType::Dice => (1..=DICE_FACES).contains(&prediction),
    };
    require!(valid, PredictError::InvalidPrediction);
    Ok(())
}

/// `stake * multiplier_bps / 10_000`, floored.
pub fn multiplier_payout(stake: u64, multiplier_bps: u32) -> Result<u64> {
    let gross = (stake as u128)
        .checked_mul(multiplier_bps as u128)
        .ok_or(PredictError::Overflow)?
        / BPS_DENOMINATOR as u128;
    Ok(u64::try_from(gross).map_err(|_| PredictError::Overflow)?)
}

/// Plays one round: draws the outcome and prices the result.
pub fn play_round(
    game_type: GameType,
    prediction: u8,
    stake: u64,
    multiplier_bps: u32,
    combined: &[u8; 32],
) -> Result<Round> {
    validate_prediction(game_type, prediction)?;

    let outcome = roll(game_type, combined);
    let won = outcome == prediction;
    let payout = if won {
        multiplier_payout(stake, multiplier_bps)?
    } else {
        0
    };

    Ok(Round {
        outcome,
        won,
        payout,
    })
}

/// Recomputes a recorded outcome from its seeds.
pub fn verify_outcome(
    game_type: GameType,
    server_seed: &[u8; 32],
    client_seed: &[u8; 32],
    player: &Pubkey,
) -> u8 {
    roll(game_type, &combine_seeds(server_seed, client_seed, player))
}

/// The only program whose instructions may share a transaction with a round.
pub const COMPUTE_BUDGET_PROGRAM_ID: Pubkey =
    pubkey!("ComputeBudget111111111111111111111111111111");

/// Rejects rounds that a caller could inspect and abort after the outcome is
/// known. A round must run at the top level and every other instruction in
/// the transaction must belong to the compute budget program.
pub fn check_isolated<I>(stack_height: usize, other_programs: I) -> Result<()>
where
    I: IntoIterator<Item = Pubkey>,
{
    require!(
        stack_height == TRANSACTION_LEVEL_STACK_HEIGHT,
        PredictError::CpiNotAllowed
    );
    for program_id in other_programs {
        require!(
            program_id == COMPUTE_BUDGET_PROGRAM_ID,
            PredictError::PlayNotIsolated
        );
    }
    Ok(())
}
