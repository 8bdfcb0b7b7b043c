/// Lamports in one SOL.
pub const ONE_SOL: u64 = 1_000_000_000;

/// Basis-point denominator for multipliers.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Coin flip pays 1.95x on a win (2x less a 2.5% edge).
pub const DEFAULT_COIN_FLIP_MULTIPLIER_BPS: u32 = 19_500;

/// Dice pays 5.7x on a win (6x less a 5% edge).
pub const DEFAULT_DICE_MULTIPLIER_BPS: u32 = 57_000;

/// Upper bound for the coin flip multiplier: a fair 2x.
pub const MAX_COIN_FLIP_MULTIPLIER_BPS: u32 = 20_000;

/// Upper bound for the dice multiplier: a fair 6x.
pub const MAX_DICE_MULTIPLIER_BPS: u32 = 60_000;

/// 0.001 SOL
pub const DEFAULT_MIN_BET: u64 = ONE_SOL / 1_000;

/// 5 SOL
pub const DEFAULT_MAX_BET: u64 = ONE_SOL * 5;

pub const DICE_FACES: u8 = 6;

pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;
pub const MAX_TAGS: usize = 5;
pub const MAX_TAG_LEN: usize = 32;
