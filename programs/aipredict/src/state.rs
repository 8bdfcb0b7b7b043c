use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::PredictError;
use crate::games::{GameType, Round};
use crate::settlement;

// === House ===

/// Singleton backing coin flip and dice payouts.
#[account]
#[derive(InitSpace, Default)]
pub struct House {
    pub authority: Pubkey,
    /// Liquidity available for game payouts (lamports).
    pub pool: u64,
    pub coin_flip_multiplier_bps: u32,
    pub dice_multiplier_bps: u32,
    pub min_bet: u64,
    pub max_bet: u64,
    pub paused: bool,
    pub total_games: u64,
    pub total_volume: u64,
    pub total_payout: u64,
    pub bump: u8,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct HouseConfig {
    pub coin_flip_multiplier_bps: u32,
    pub dice_multiplier_bps: u32,
    pub min_bet: u64,
    pub max_bet: u64,
}

impl Default for HouseConfig {
    fn default() -> Self {
        Self {
            coin_flip_multiplier_bps: DEFAULT_COIN_FLIP_MULTIPLIER_BPS,
            dice_multiplier_bps: DEFAULT_DICE_MULTIPLIER_BPS,
            min_bet: DEFAULT_MIN_BET,
            max_bet: DEFAULT_MAX_BET,
        }
    }
}

impl HouseConfig {
    pub fn validate(&self) -> Result<()> {
        require!(
            self.coin_flip_multiplier_bps > 0
                && self.coin_flip_multiplier_bps <= MAX_COIN_FLIP_MULTIPLIER_BPS,
            PredictError::InvalidMultiplier
        );
        require!(
            self.dice_multiplier_bps > 0 && self.dice_multiplier_bps <= MAX_DICE_MULTIPLIER_BPS,
            PredictError::InvalidMultiplier
        );
        require!(
            self.min_bet > 0 && self.min_bet <= self.max_bet,
            PredictError::InvalidBetLimits
        );
        Ok(())
    }
}

impl House {
    pub fn apply_config(&mut self, config: &HouseConfig) -> Result<()> {
        config.validate()?;
        self.coin_flip_multiplier_bps = config.coin_flip_multiplier_bps;
        self.dice_multiplier_bps = config.dice_multiplier_bps;
        self.min_bet = config.min_bet;
        self.max_bet = config.max_bet;
        Ok(())
    }

    pub fn multiplier_bps(&self, game_type: GameType) -> u32 {
        match game_type {
            GameType::CoinFlip => self.coin_flip_multiplier_bps,
            GameType::Dice => self.dice_multiplier_bps,
        }
    }

    /// Checks a wager against the house rules before any lamports move.
    ///
    /// `max_payout` is what the house owes if the player wins; the pool must
    /// cover it on its own.
    pub fn check_wager(&self, stake: u64, max_payout: u64) -> Result<()> {
        require!(!self.paused, PredictError::HousePaused);
        require!(stake > 0, PredictError::InvalidAmount);
        require!(stake >= self.min_bet, PredictError::BetTooSmall);
        require!(stake <= self.max_bet, PredictError::BetTooLarge);
        require!(self.pool >= max_payout, PredictError::InsufficientLiquidity);
        Ok(())
    }

    /// Books a finished game: the stake joins the pool and the payout leaves it.
    pub fn record_game(&mut self, stake: u64, payout: u64) -> Result<()> {
        self.pool = self
            .pool
            .checked_add(stake)
            .and_then(|pool| pool.checked_sub(payout))
            .ok_or(PredictError::InsufficientLiquidity)?;
        self.total_games = self.total_games.checked_add(1).ok_or(PredictError::Overflow)?;
        self.total_volume = self
            .total_volume
            .checked_add(stake)
            .ok_or(PredictError::Overflow)?;
        self.total_payout = self
            .total_payout
            .checked_add(payout)
            .ok_or(PredictError::Overflow)?;
        Ok(())
    }

    pub fn deposit(&mut self, amount: u64) -> Result<()> {
        require!(amount > 0, PredictError::InvalidAmount);
        self.pool = self.pool.checked_add(amount).ok_or(PredictError::Overflow)?;
        Ok(())
    }

    pub fn withdraw(&mut self, amount: u64) -> Result<()> {
        require!(amount > 0, PredictError::InvalidAmount);
        self.pool = self
            .pool
            .checked_sub(amount)
            .ok_or(PredictError::InsufficientLiquidity)?;
        Ok(())
    }

    /// Volume minus payouts, clamped to the `i64` range.
    pub fn profit(&self) -> i64 {
        let profit = self.total_volume as i128 - self.total_payout as i128;
        profit.clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }

    pub fn stats(&self) -> HouseStats {
        HouseStats {
            pool: self.pool,
            coin_flip_multiplier_bps: self.coin_flip_multiplier_bps,
            dice_multiplier_bps: self.dice_multiplier_bps,
            min_bet: self.min_bet,
            max_bet: self.max_bet,
            paused: self.paused,
            total_games: self.total_games,
            total_volume: self.total_volume,
            total_payout: self.total_payout,
            house_profit: self.profit(),
        }
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct HouseStats {
    pub pool: u64,
    pub coin_flip_multiplier_bps: u32,
    pub dice_multiplier_bps: u32,
    pub min_bet: u64,
    pub max_bet: u64,
    pub paused: bool,
    pub total_games: u64,
    pub total_volume: u64,
    pub total_payout: u64,
    pub house_profit: i64,
}

// === Games ===

#[account]
#[derive(InitSpace)]
pub struct GameRecord {
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
    pub timestamp: i64,
    pub slot: u64,
    pub bump: u8,
}

/// Running totals for one game type.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub struct GameTally {
    pub games: u64,
    pub wagered: u64,
    pub payout: u64,
    pub wins: u64,
    pub losses: u64,
}

impl GameTally {
    fn record(&mut self, stake: u64, round: &Round) -> Result<()> {
        self.games = self.games.checked_add(1).ok_or(PredictError::Overflow)?;
        self.wagered = self.wagered.checked_add(stake).ok_or(PredictError::Overflow)?;
        if round.won {
            self.payout = self
                .payout
                .checked_add(round.payout)
                .ok_or(PredictError::Overflow)?;
            self.wins = self.wins.checked_add(1).ok_or(PredictError::Overflow)?;
        } else {
            self.losses = self.losses.checked_add(1).ok_or(PredictError::Overflow)?;
        }
        Ok(())
    }

    fn merge(&self, other: &GameTally) -> GameTally {
        GameTally {
            games: self.games.saturating_add(other.games),
            wagered: self.wagered.saturating_add(other.wagered),
            payout: self.payout.saturating_add(other.payout),
            wins: self.wins.saturating_add(other.wins),
            losses: self.losses.saturating_add(other.losses),
        }
    }
}

#[account]
#[derive(InitSpace, Default)]
pub struct PlayerStats {
    pub player: Pubkey,
    pub coin_flip: GameTally,
    pub dice: GameTally,
    pub bump: u8,
}

impl PlayerStats {
    pub fn tally(&self, game_type: GameType) -> &GameTally {
        match game_type {
            GameType::CoinFlip => &self.coin_flip,
            GameType::Dice => &self.dice,
        }
    }

    pub fn record(&mut self, game_type: GameType, stake: u64, round: &Round) -> Result<()> {
        let tally = match game_type {
            GameType::CoinFlip => &mut self.coin_flip,
            GameType::Dice => &mut self.dice,
        };
        tally.record(stake, round)
    }

    /// Stats for one game type, or across both when `game_type` is `None`.
    pub fn summary(&self, game_type: Option<GameType>) -> GameStats {
        let tally = match game_type {
            Some(game_type) => *self.tally(game_type),
            None => self.coin_flip.merge(&self.dice),
        };
        let win_rate_bps = if tally.games == 0 {
            0
        } else {
            (tally.wins as u128 * BPS_DENOMINATOR as u128 / tally.games as u128) as u16
        };
        GameStats {
            total_games: tally.games,
            total_wagered: tally.wagered,
            total_payout: tally.payout,
            wins: tally.wins,
            losses: tally.losses,
            win_rate_bps,
        }
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameStats {
    pub total_games: u64,
    pub total_wagered: u64,
    pub total_payout: u64,
    pub wins: u64,
    pub losses: u64,
    pub win_rate_bps: u16,
}

// === Prediction markets ===

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, Default, InitSpace)]
pub enum MarketStatus {
    #[default]
    Open,
    Resolved,
    Cancelled,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct CreateMarketParams {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    /// Unix timestamp after which betting closes.
    pub end_time: i64,
}

impl CreateMarketParams {
    pub fn validate(&self, now: i64) -> Result<()> {
        require!(!self.title.trim().is_empty(), PredictError::EmptyTitle);
        require!(self.title.len() <= MAX_TITLE_LEN, PredictError::TitleTooLong);
        require!(
            self.description.len() <= MAX_DESCRIPTION_LEN,
            PredictError::DescriptionTooLong
        );
        require!(
            !self.tags.is_empty() && self.tags.len() <= MAX_TAGS,
            PredictError::InvalidTagCount
        );
        for tag in &self.tags {
            require!(
                !tag.trim().is_empty() && tag.len() <= MAX_TAG_LEN,
                PredictError::InvalidTag
            );
        }
        require!(self.end_time > now, PredictError::InvalidEndTime);
        Ok(())
    }
}

/// Binary YES/NO market settled pari-mutuel.
#[account]
#[derive(InitSpace, Default)]
pub struct Market {
    pub market_id: u64,
    pub creator: Pubkey,
    #[max_len(100)]
    pub title: String,
    #[max_len(500)]
    pub description: String,
    #[max_len(5, 32)]
    pub tags: Vec<String>,
    pub end_time: i64,
    pub total_yes_bets: u64,
    pub total_no_bets: u64,
    pub yes_bettors: u32,
    pub no_bettors: u32,
    pub status: MarketStatus,
    /// `Some(true)` = YES won. Set once, on resolution.
    pub result: Option<bool>,
    /// Lamports paid back out through claims and refunds.
    pub total_claimed: u64,
    pub claims: u32,
    pub created_at: i64,
    pub resolved_at: i64,
    pub bump: u8,
}

impl Market {
    pub fn initialize(
        &mut self,
        market_id: u64,
        creator: Pubkey,
        params: CreateMarketParams,
        now: i64,
        bump: u8,
    ) -> Result<()> {
        params.validate(now)?;

        self.market_id = market_id;
        self.creator = creator;
        self.title = params.title;
        self.description = params.description;
        self.tags = params.tags;
        self.end_time = params.end_time;
        self.total_yes_bets = 0;
        self.total_no_bets = 0;
        self.yes_bettors = 0;
        self.no_bettors = 0;
        self.status = MarketStatus::Open;
        self.result = None;
        self.total_claimed = 0;
        self.claims = 0;
        self.created_at = now;
        self.resolved_at = 0;
        self.bump = bump;
        Ok(())
    }

    pub fn total_pool(&self) -> Result<u64> {
        Ok(self
            .total_yes_bets
            .checked_add(self.total_no_bets)
            .ok_or(PredictError::Overflow)?)
    }

    /// Winning pool size, once resolved.
    pub fn winning_pool(&self) -> Option<u64> {
        self.result
            .map(|result| settlement::split_pools(self.total_yes_bets, self.total_no_bets, result).0)
    }

    /// Adds a stake to one side's pool. `new_bettor` marks the bettor's first
    /// bet on that side.
    pub fn record_bet(&mut self, prediction: bool, amount: u64, new_bettor: bool, now: i64) -> Result<()> {
        require!(self.status == MarketStatus::Open, PredictError::MarketNotOpen);
        require!(now < self.end_time, PredictError::BettingClosed);
        require!(amount > 0, PredictError::InvalidAmount);
        // both pools together must stay addressable
        self.total_pool()?
            .checked_add(amount)
            .ok_or(PredictError::Overflow)?;

        let (pool, bettors) = if prediction {
            (&mut self.total_yes_bets, &mut self.yes_bettors)
        } else {
            (&mut self.total_no_bets, &mut self.no_bettors)
        };
        *pool = pool.checked_add(amount).ok_or(PredictError::Overflow)?;
        if new_bettor {
            *bettors = bettors.checked_add(1).ok_or(PredictError::Overflow)?;
        }
        Ok(())
    }

    pub fn resolve(&mut self, result: bool, now: i64) -> Result<()> {
        match self.status {
            MarketStatus::Open => {}
            MarketStatus::Resolved => return err!(PredictError::AlreadyResolved),
            MarketStatus::Cancelled => return err!(PredictError::MarketNotOpen),
        }
        self.status = MarketStatus::Resolved;
        self.result = Some(result);
        self.resolved_at = now;
        Ok(())
    }

    pub fn cancel(&mut self, now: i64) -> Result<()> {
        match self.status {
            MarketStatus::Open => {}
            MarketStatus::Resolved => return err!(PredictError::AlreadyResolved),
            MarketStatus::Cancelled => return err!(PredictError::MarketNotOpen),
        }
        self.status = MarketStatus::Cancelled;
        self.resolved_at = now;
        Ok(())
    }

    /// Stakes are returned when the market was cancelled, or when it resolved
    /// to a side nobody bet on.
    pub fn refunds_open(&self) -> bool {
        match self.status {
            MarketStatus::Cancelled => true,
            MarketStatus::Resolved => self.winning_pool() == Some(0),
            MarketStatus::Open => false,
        }
    }

    pub fn payout_for(&self, bet: &UserBet) -> Result<u64> {
        require!(self.status == MarketStatus::Resolved, PredictError::MarketNotResolved);
        let result = self.result.ok_or(PredictError::MarketNotResolved)?;
        settlement::bet_payout(
            bet.amount,
            bet.prediction,
            self.total_yes_bets,
            self.total_no_bets,
            result,
        )
    }

    /// Pays out a winning bet. Returns the lamports owed to the bettor.
    pub fn settle_bet(&mut self, bet: &mut UserBet) -> Result<u64> {
        require!(self.status == MarketStatus::Resolved, PredictError::MarketNotResolved);
        require!(!bet.claimed, PredictError::AlreadyClaimed);

        let payout = self.payout_for(bet)?;
        require!(payout > 0, PredictError::DidNotWin);

        self.record_claim(payout)?;
        bet.mark_claimed(payout)?;
        Ok(payout)
    }

    /// Refunds a bet's stake. Returns the lamports owed to the bettor.
    pub fn refund_bet(&mut self, bet: &mut UserBet) -> Result<u64> {
        require!(self.refunds_open(), PredictError::RefundUnavailable);
        require!(!bet.claimed, PredictError::AlreadyClaimed);

        let refund = bet.amount;
        self.record_claim(refund)?;
        bet.mark_claimed(refund)?;
        Ok(refund)
    }

    fn record_claim(&mut self, amount: u64) -> Result<()> {
        let total_claimed = self
            .total_claimed
            .checked_add(amount)
            .ok_or(PredictError::Overflow)?;
        require!(total_claimed <= self.total_pool()?, PredictError::MarketInsolvent);

        self.total_claimed = total_claimed;
        self.claims = self.claims.checked_add(1).ok_or(PredictError::Overflow)?;
        Ok(())
    }
}

/// One bettor's stake on one side of a market.
#[account]
#[derive(InitSpace, Default)]
pub struct UserBet {
    pub market: Pubkey,
    pub bettor: Pubkey,
    pub amount: u64,
    /// `true` = YES.
    pub prediction: bool,
    pub placed_at: i64,
    pub claimed: bool,
    pub payout: u64,
    pub bump: u8,
}

impl UserBet {
    pub fn is_new(&self) -> bool {
        self.bettor == Pubkey::default()
    }

    pub fn add_stake(
        &mut self,
        market: Pubkey,
        bettor: Pubkey,
        prediction: bool,
        amount: u64,
        now: i64,
        bump: u8,
    ) -> Result<()> {
        if self.is_new() {
            self.market = market;
            self.bettor = bettor;
            self.prediction = prediction;
            self.amount = 0;
            self.claimed = false;
            self.payout = 0;
            self.bump = bump;
        }
        require_keys_eq!(self.market, market, PredictError::WrongMarket);
        require_keys_eq!(self.bettor, bettor, PredictError::NotBetOwner);
        require!(self.prediction == prediction, PredictError::InvalidPrediction);

        self.amount = self.amount.checked_add(amount).ok_or(PredictError::Overflow)?;
        self.placed_at = now;
        Ok(())
    }

    pub fn mark_claimed(&mut self, payout: u64) -> Result<()> {
        require!(!self.claimed, PredictError::AlreadyClaimed);
        self.claimed = true;
        self.payout = payout;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;
    const HOUR: i64 = 3_600;

    fn params() -> CreateMarketParams {
        CreateMarketParams {
            title: "Will SOL close above $300 this year?".to_string(),
            description: "Resolves YES on a daily close above $300.".to_string(),
            tags: vec!["crypto".to_string(), "solana".to_string()],
            end_time: NOW + HOUR,
        }
    }

    fn open_market() -> Market {
        let mut market = Market::default();
        market
            .initialize(1, Pubkey::new_unique(), params(), NOW, 255)
            .unwrap();
        market
    }

    fn bet(market: &mut Market, key: Pubkey, prediction: bool, amount: u64) -> UserBet {
        let mut bet = UserBet::default();
        let new_bettor = bet.is_new();
        market.record_bet(prediction, amount, new_bettor, NOW).unwrap();
        bet.add_stake(key, Pubkey::new_unique(), prediction, amount, NOW, 254)
            .unwrap();
        bet
    }

    #[test]
    fn market_params_are_validated() {
        let cases: Vec<(Box<dyn Fn(&mut CreateMarketParams)>, PredictError)> = vec![
            (Box::new(|p: &mut CreateMarketParams| p.title = "  ".into()), PredictError::EmptyTitle),
            (Box::new(|p: &mut CreateMarketParams| p.title = "x".repeat(101)), PredictError::TitleTooLong),
            (Box::new(|p: &mut CreateMarketParams| p.description = "x".repeat(501)), PredictError::DescriptionTooLong),
            (Box::new(|p: &mut CreateMarketParams| p.tags.clear()), PredictError::InvalidTagCount),
            (Box::new(|p: &mut CreateMarketParams| p.tags = vec!["t".into(); 6]), PredictError::InvalidTagCount),
            (Box::new(|p: &mut CreateMarketParams| p.tags.push("x".repeat(33))), PredictError::InvalidTag),
            (Box::new(|p: &mut CreateMarketParams| p.end_time = NOW), PredictError::InvalidEndTime),
        ];

        assert!(params().validate(NOW).is_ok());
        for (mutate, expected) in cases {
            let mut p = params();
            mutate(&mut p);
            assert_eq!(p.validate(NOW).unwrap_err(), expected.into());
        }
    }

    #[test]
    fn bets_grow_their_side_only() {
        let mut market = open_market();
        let key = Pubkey::new_unique();
        let mut yes = bet(&mut market, key, true, 100);
        bet(&mut market, key, false, 40);

        market.record_bet(true, 50, yes.is_new(), NOW + 10).unwrap();
        yes.add_stake(key, yes.bettor, true, 50, NOW + 10, 254).unwrap();

        assert_eq!(market.total_yes_bets, 150);
        assert_eq!(market.total_no_bets, 40);
        assert_eq!((market.yes_bettors, market.no_bettors), (1, 1));
        assert_eq!(yes.amount, 150);
        assert_eq!(market.total_pool().unwrap(), 190);
    }

    #[test]
    fn bet_account_keeps_its_side() {
        let mut market = open_market();
        let key = Pubkey::new_unique();
        let mut yes = bet(&mut market, key, true, 100);

        let err = yes.add_stake(key, yes.bettor, false, 10, NOW, 254).unwrap_err();
        assert_eq!(err, PredictError::InvalidPrediction.into());
    }

    #[test]
    fn betting_closes_at_end_time() {
        let mut market = open_market();
        let err = market.record_bet(true, 10, true, NOW + HOUR).unwrap_err();
        assert_eq!(err, PredictError::BettingClosed.into());

        let err = market.record_bet(true, 0, true, NOW).unwrap_err();
        assert_eq!(err, PredictError::InvalidAmount.into());
    }

    #[test]
    fn resolution_is_terminal() {
        let mut market = open_market();
        let key = Pubkey::new_unique();
        bet(&mut market, key, true, 100);

        market.resolve(true, NOW + 5).unwrap();
        assert_eq!(market.result, Some(true));

        let err = market.resolve(false, NOW + 6).unwrap_err();
        assert_eq!(err, PredictError::AlreadyResolved.into());
        assert_eq!(market.result, Some(true));
        assert_eq!(market.resolved_at, NOW + 5);

        let err = market.record_bet(false, 10, true, NOW + 7).unwrap_err();
        assert_eq!(err, PredictError::MarketNotOpen.into());

        let err = market.cancel(NOW + 8).unwrap_err();
        assert_eq!(err, PredictError::AlreadyResolved.into());
    }

    #[test]
    fn cancelled_market_cannot_resolve() {
        let mut market = open_market();
        market.cancel(NOW).unwrap();

        let err = market.resolve(true, NOW).unwrap_err();
        assert_eq!(err, PredictError::MarketNotOpen.into());
        assert_eq!(market.result, None);
    }

    #[test]
    fn winners_claim_once() {
        let mut market = open_market();
        let key = Pubkey::new_unique();
        let mut alice = bet(&mut market, key, true, 100);
        let mut bob = bet(&mut market, key, true, 200);
        let mut carol = bet(&mut market, key, false, 600);

        let err = market.settle_bet(&mut alice).unwrap_err();
        assert_eq!(err, PredictError::MarketNotResolved.into());

        market.resolve(true, NOW + 1).unwrap();

        assert_eq!(market.settle_bet(&mut alice).unwrap(), 300);
        assert!(alice.claimed);
        assert_eq!(alice.payout, 300);

        let err = market.settle_bet(&mut alice).unwrap_err();
        assert_eq!(err, PredictError::AlreadyClaimed.into());

        let err = market.settle_bet(&mut carol).unwrap_err();
        assert_eq!(err, PredictError::DidNotWin.into());
        assert!(!carol.claimed);

        assert_eq!(market.settle_bet(&mut bob).unwrap(), 600);
        assert_eq!(market.total_claimed, market.total_pool().unwrap());
        assert_eq!(market.claims, 2);
    }

    #[test]
    fn claims_never_exceed_the_pool() {
        let mut market = open_market();
        let key = Pubkey::new_unique();
        let mut winners: Vec<UserBet> = (0..7).map(|i| bet(&mut market, key, false, 3 + i)).collect();
        bet(&mut market, key, true, 1_000);

        market.resolve(false, NOW + 1).unwrap();
        let paid: u64 = winners
            .iter_mut()
            .map(|w| market.settle_bet(w).unwrap())
            .sum();

        let pool = market.total_pool().unwrap();
        assert_eq!(paid, market.total_claimed);
        assert!(paid <= pool);
        assert!(pool - paid < winners.len() as u64);
    }

    #[test]
    fn empty_winning_side_refunds_stakes() {
        let mut market = open_market();
        let key = Pubkey::new_unique();
        let mut loser = bet(&mut market, key, false, 500);

        market.resolve(true, NOW + 1).unwrap();
        assert_eq!(market.winning_pool(), Some(0));
        assert!(market.refunds_open());

        let err = market.settle_bet(&mut loser).unwrap_err();
        assert_eq!(err, PredictError::DidNotWin.into());

        assert_eq!(market.refund_bet(&mut loser).unwrap(), 500);
        let err = market.refund_bet(&mut loser).unwrap_err();
        assert_eq!(err, PredictError::AlreadyClaimed.into());
    }

    #[test]
    fn refunds_need_cancellation_or_empty_winning_side() {
        let mut market = open_market();
        let key = Pubkey::new_unique();
        let mut yes = bet(&mut market, key, true, 100);
        let mut no = bet(&mut market, key, false, 100);

        let err = market.refund_bet(&mut yes).unwrap_err();
        assert_eq!(err, PredictError::RefundUnavailable.into());

        market.cancel(NOW + 1).unwrap();
        assert_eq!(market.refund_bet(&mut yes).unwrap(), 100);
        assert_eq!(market.refund_bet(&mut no).unwrap(), 100);
        assert_eq!(market.total_claimed, 200);

        let mut resolved = open_market();
        let mut winner = bet(&mut resolved, key, true, 100);
        bet(&mut resolved, key, false, 100);
        resolved.resolve(true, NOW + 1).unwrap();
        let err = resolved.refund_bet(&mut winner).unwrap_err();
        assert_eq!(err, PredictError::RefundUnavailable.into());
    }

    #[test]
    fn house_config_validation() {
        assert!(HouseConfig::default().validate().is_ok());

        let too_generous = HouseConfig {
            coin_flip_multiplier_bps: MAX_COIN_FLIP_MULTIPLIER_BPS + 1,
            ..HouseConfig::default()
        };
        assert_eq!(
            too_generous.validate().unwrap_err(),
            PredictError::InvalidMultiplier.into()
        );

        let inverted = HouseConfig {
            min_bet: 10,
            max_bet: 5,
            ..HouseConfig::default()
        };
        assert_eq!(inverted.validate().unwrap_err(), PredictError::InvalidBetLimits.into());
    }

    fn funded_house(pool: u64) -> House {
        let mut house = House::default();
        house.apply_config(&HouseConfig::default()).unwrap();
        house.deposit(pool).unwrap();
        house
    }

    #[test]
    fn wagers_respect_house_rules() {
        let mut house = funded_house(10 * ONE_SOL);
        let payout = 2 * ONE_SOL;

        assert!(house.check_wager(ONE_SOL, payout).is_ok());
        assert_eq!(
            house.check_wager(DEFAULT_MIN_BET - 1, 0).unwrap_err(),
            PredictError::BetTooSmall.into()
        );
        assert_eq!(
            house.check_wager(DEFAULT_MAX_BET + 1, 0).unwrap_err(),
            PredictError::BetTooLarge.into()
        );
        assert_eq!(
            house.check_wager(ONE_SOL, 11 * ONE_SOL).unwrap_err(),
            PredictError::InsufficientLiquidity.into()
        );

        house.paused = true;
        assert_eq!(
            house.check_wager(ONE_SOL, payout).unwrap_err(),
            PredictError::HousePaused.into()
        );
    }

    #[test]
    fn house_pool_tracks_games() {
        let mut house = funded_house(10 * ONE_SOL);

        house.record_game(ONE_SOL, 0).unwrap();
        assert_eq!(house.pool, 11 * ONE_SOL);

        house.record_game(ONE_SOL, 1_950_000_000).unwrap();
        assert_eq!(house.pool, 11 * ONE_SOL - 950_000_000);

        let stats = house.stats();
        assert_eq!(stats.total_games, 2);
        assert_eq!(stats.total_volume, 2 * ONE_SOL);
        assert_eq!(stats.total_payout, 1_950_000_000);
        assert_eq!(stats.house_profit, 50_000_000);

        house.withdraw(house.pool).unwrap();
        assert_eq!(
            house.withdraw(1).unwrap_err(),
            PredictError::InsufficientLiquidity.into()
        );
    }

    #[test]
    fn house_profit_saturates() {
        let mut house = House::default();
        house.total_volume = u64::MAX;
        assert_eq!(house.stats().house_profit, i64::MAX);

        house.total_volume = 0;
        house.total_payout = u64::MAX;
        assert_eq!(house.stats().house_profit, i64::MIN);

        house.total_volume = 3 * ONE_SOL;
        house.total_payout = 5 * ONE_SOL;
        assert_eq!(house.stats().house_profit, -2 * ONE_SOL as i64);
    }

    #[test]
    fn player_stats_summary() {
        let mut stats = PlayerStats::default();
        assert_eq!(stats.summary(None).win_rate_bps, 0);

        let win = Round { outcome: 1, won: true, payout: 195 };
        let loss = Round { outcome: 0, won: false, payout: 0 };
        stats.record(GameType::CoinFlip, 100, &win).unwrap();
        stats.record(GameType::CoinFlip, 100, &loss).unwrap();
        stats.record(GameType::CoinFlip, 100, &loss).unwrap();
        stats.record(GameType::CoinFlip, 100, &win).unwrap();

        let summary = stats.summary(None);
        assert_eq!(summary.total_games, 4);
        assert_eq!(summary.total_wagered, 400);
        assert_eq!(summary.total_payout, 390);
        assert_eq!((summary.wins, summary.losses), (2, 2));
        assert_eq!(summary.win_rate_bps, 5_000);
    }

    #[test]
    fn player_stats_split_by_game() {
        let mut stats = PlayerStats::default();
        let coin_win = Round { outcome: 0, won: true, payout: 195 };
        let dice_win = Round { outcome: 4, won: true, payout: 570 };
        let dice_loss = Round { outcome: 2, won: false, payout: 0 };

        stats.record(GameType::CoinFlip, 100, &coin_win).unwrap();
        stats.record(GameType::Dice, 100, &dice_win).unwrap();
        for _ in 0..3 {
            stats.record(GameType::Dice, 100, &dice_loss).unwrap();
        }

        let coin = stats.summary(Some(GameType::CoinFlip));
        assert_eq!((coin.total_games, coin.wins, coin.losses), (1, 1, 0));
        assert_eq!(coin.total_payout, 195);
        assert_eq!(coin.win_rate_bps, 10_000);

        let dice = stats.summary(Some(GameType::Dice));
        assert_eq!((dice.total_games, dice.wins, dice.losses), (4, 1, 3));
        assert_eq!(dice.total_wagered, 400);
        assert_eq!(dice.win_rate_bps, 2_500);

        let all = stats.summary(None);
        assert_eq!(all.total_games, 5);
        assert_eq!(all.total_payout, 765);
        assert_eq!(all.win_rate_bps, 4_000);
    }

    #[test]
    fn player_stats_counters_do_not_wrap() {
        let mut stats = PlayerStats::default();
        stats.dice.wins = u64::MAX;
        let win = Round { outcome: 1, won: true, payout: 570 };
        assert_eq!(
            stats.record(GameType::Dice, 100, &win).unwrap_err(),
            PredictError::Overflow.into()
        );

        stats.coin_flip.losses = u64::MAX;
        let loss = Round { outcome: 1, won: false, payout: 0 };
        assert_eq!(
            stats.record(GameType::CoinFlip, 100, &loss).unwrap_err(),
            PredictError::Overflow.into()
        );
    }
}
