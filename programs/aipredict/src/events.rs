use anchor_lang::prelude::*;

use crate::games::GameType;

#[event]
pub struct HouseInitialized {
    pub authority: Pubkey,
    pub coin_flip_multiplier_bps: u32,
    pub dice_multiplier_bps: u32,
    pub min_bet: u64,
    pub max_bet: u64,
}

#[event]
pub struct HouseConfigUpdated {
    pub coin_flip_multiplier_bps: u32,
    pub dice_multiplier_bps: u32,
    pub min_bet: u64,
    pub max_bet: u64,
    pub paused: bool,
}

#[event]
pub struct LiquidityChanged {
    pub account: Pubkey,
    /// Positive for deposits, negative for withdrawals.
    pub delta: i64,
    pub total_pool: u64,
}

#[event]
pub struct GamePlayed {
    pub game_id: u64,
    pub player: Pubkey,
    pub game_type: GameType,
    pub stake: u64,
    pub prediction: u8,
    pub outcome: u8,
    pub payout: u64,
    pub won: bool,
    pub server_seed: [u8; 32],
    pub client_seed: [u8; 32],
    pub slot: u64,
}

#[event]
pub struct MarketCreated {
    pub market: Pubkey,
    pub market_id: u64,
    pub creator: Pubkey,
    pub title: String,
    pub end_time: i64,
}

#[event]
pub struct BetPlaced {
    pub market: Pubkey,
    pub bettor: Pubkey,
    pub prediction: bool,
    pub amount: u64,
    pub total_bet: u64,
    pub total_yes_bets: u64,
    pub total_no_bets: u64,
}

#[event]
pub struct MarketResolved {
    pub market: Pubkey,
    pub result: bool,
    pub winning_pool: u64,
    pub losing_pool: u64,
}

#[event]
pub struct MarketCancelled {
    pub market: Pubkey,
    pub total_pool: u64,
}

#[event]
pub struct WinningsClaimed {
    pub market: Pubkey,
    pub bettor: Pubkey,
    pub bet_amount: u64,
    pub payout: u64,
}

#[event]
pub struct RefundClaimed {
    pub market: Pubkey,
    pub bettor: Pubkey,
    pub refund_amount: u64,
}
