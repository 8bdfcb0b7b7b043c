use anchor_lang::prelude::*;

#[error_code]
pub enum PredictError {
    // House / game errors
    #[msg("Invalid amount")]
    InvalidAmount,
    #[msg("Bet is below minimum")]
    BetTooSmall,
    #[msg("Bet exceeds maximum")]
    BetTooLarge,
    #[msg("Insufficient liquidity in house pool")]
    InsufficientLiquidity,
    #[msg("Invalid prediction for this game")]
    InvalidPrediction,
    #[msg("Invalid payout multiplier")]
    InvalidMultiplier,
    #[msg("Invalid bet limits")]
    InvalidBetLimits,
    #[msg("Games are paused")]
    HousePaused,
    #[msg("Only the house authority can do this")]
    NotHouseAuthority,
    // Prediction market errors
    #[msg("Title too long (max 100 bytes)")]
    TitleTooLong,
    #[msg("Description too long (max 500 bytes)")]
    DescriptionTooLong,
    #[msg("Must have 1-5 tags")]
    InvalidTagCount,
    #[msg("Tag must be 1-32 bytes")]
    InvalidTag,
    #[msg("End time must be in the future")]
    InvalidEndTime,
    #[msg("Market is not open")]
    MarketNotOpen,
    #[msg("Market already resolved")]
    AlreadyResolved,
    #[msg("Betting has closed")]
    BettingClosed,
    #[msg("Only the market creator can do this")]
    NotMarketCreator,
    #[msg("Market has not been resolved")]
    MarketNotResolved,
    #[msg("No refund available for this market")]
    RefundUnavailable,
    #[msg("Bet already claimed")]
    AlreadyClaimed,
    #[msg("Your bet did not win")]
    DidNotWin,
    #[msg("Not the bet owner")]
    NotBetOwner,
    #[msg("Bet does not belong to this market")]
    WrongMarket,
    #[msg("Nobody bet on the winning side")]
    NoWinningPool,
    #[msg("Payout exceeds market escrow")]
    MarketInsolvent,
    #[msg("Arithmetic overflow")]
    Overflow,
    #[msg("Title must not be empty")]
    EmptyTitle,
    #[msg("Games cannot be played through CPI")]
    CpiNotAllowed,
    #[msg("A game must be the only instruction in its transaction")]
    PlayNotIsolated,
}
