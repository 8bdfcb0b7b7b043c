//! PDA seeds and derivation helpers.
//!
//! The seed constants are the ones the program's account constraints use, so
//! clients deriving addresses with these helpers always agree with the program.

use anchor_lang::prelude::*;

pub const HOUSE_SEED: &[u8] = b"house";
pub const GAME_SEED: &[u8] = b"game";
pub const PLAYER_SEED: &[u8] = b"player";
pub const MARKET_SEED: &[u8] = b"market";
pub const BET_SEED: &[u8] = b"bet";

/// Encodes a bet side as a single seed byte.
pub fn side_seed(prediction: bool) -> [u8; 1] {
    [prediction as u8]
}

/// Derive the house PDA address
pub fn derive_house_pda(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[HOUSE_SEED], program_id)
}

/// Derive the game record PDA address
pub fn derive_game_record_pda(house: &Pubkey, game_index: u64, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[GAME_SEED, house.as_ref(), &game_index.to_le_bytes()],
        program_id,
    )
}

/// Derive the player stats PDA address
pub fn derive_player_stats_pda(player: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[PLAYER_SEED, player.as_ref()], program_id)
}

/// Derive the market PDA address
pub fn derive_market_pda(creator: &Pubkey, market_id: u64, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[MARKET_SEED, creator.as_ref(), &market_id.to_le_bytes()],
        program_id,
    )
}

/// Derive the bet PDA address for one side of a market
pub fn derive_bet_pda(
    market: &Pubkey,
    bettor: &Pubkey,
    prediction: bool,
    program_id: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[BET_SEED, market.as_ref(), bettor.as_ref(), &side_seed(prediction)],
        program_id,
    )
}
