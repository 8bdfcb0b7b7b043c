use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::get_stack_height;
use anchor_lang::solana_program::sysvar::instructions::{
    load_current_index_checked, load_instruction_at_checked, ID as SYSVAR_INSTRUCTIONS_ID,
};
use anchor_lang::system_program;

pub mod constants;
pub mod errors;
pub mod events;
pub mod games;
pub mod pda;
pub mod settlement;
pub mod state;


use errors::PredictError;
use events::*;
use games::{CoinSide, GameType};
use pda::*;
use state::*;

declare_id!("Bst5Cjp1XMVcEDrHFwMrpSs15ZVfnGGR7Bg8WZuYuZzN");

/// AIPredict
/// Binary prediction markets settled pari-mutuel, plus house-backed
/// coin flip and dice games with recomputable outcomes.

#[program]
pub mod aipredict {
    use super::*;

    // ==================== HOUSE ====================

    /// Initialize the house that backs game payouts
    pub fn initialize_house(ctx: Context<InitializeHouse>, config: HouseConfig) -> Result<()> {
        let house = &mut ctx.accounts.house;
        house.authority = ctx.accounts.authority.key();
        house.apply_config(&config)?;
        house.pool = 0;
        house.paused = false;
        house.total_games = 0;
        house.total_volume = 0;
        house.total_payout = 0;
        house.bump = ctx.bumps.house;

        msg!(
            "House initialized: coin_flip={}bps dice={}bps bets={}..={}",
            config.coin_flip_multiplier_bps,
            config.dice_multiplier_bps,
            config.min_bet,
            config.max_bet,
        );
        emit!(HouseInitialized {
            authority: house.authority,
            coin_flip_multiplier_bps: config.coin_flip_multiplier_bps,
            dice_multiplier_bps: config.dice_multiplier_bps,
            min_bet: config.min_bet,
            max_bet: config.max_bet,
        });

        Ok(())
    }

    /// Replace multipliers and bet limits (authority only)
    pub fn update_house_config(ctx: Context<UpdateHouse>, config: HouseConfig) -> Result<()> {
        let house = &mut ctx.accounts.house;
        house.apply_config(&config)?;

        msg!("House config updated");
        emit_config(house);
        Ok(())
    }

    /// Pause or resume games (authority only)
    pub fn set_paused(ctx: Context<UpdateHouse>, paused: bool) -> Result<()> {
        let house = &mut ctx.accounts.house;
        house.paused = paused;

        msg!("House paused={}", paused);
        emit_config(house);
        Ok(())
    }

    /// Add liquidity to the house pool
    pub fn add_liquidity(ctx: Context<AddLiquidity>, amount: u64) -> Result<()> {
        require!(amount > 0, PredictError::InvalidAmount);

        let cpi_context = CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            system_program::Transfer {
                from: ctx.accounts.provider.to_account_info(),
                to: ctx.accounts.house.to_account_info(),
            },
        );
        system_program::transfer(cpi_context, amount)?;

        let house = &mut ctx.accounts.house;
        house.deposit(amount)?;

        msg!("Liquidity added: {} lamports, pool={}", amount, house.pool);
        emit!(LiquidityChanged {
            account: ctx.accounts.provider.key(),
            delta: amount as i64,
            total_pool: house.pool,
        });

        Ok(())
    }

    /// Withdraw liquidity from the house pool (authority only)
    pub fn withdraw_liquidity(ctx: Context<WithdrawLiquidity>, amount: u64) -> Result<()> {
        ctx.accounts.house.withdraw(amount)?;

        // House is program-owned, lamports can be debited directly
        **ctx.accounts.house.to_account_info().try_borrow_mut_lamports()? -= amount;
        **ctx.accounts.authority.to_account_info().try_borrow_mut_lamports()? += amount;

        let pool = ctx.accounts.house.pool;
        msg!("Liquidity withdrawn: {} lamports, pool={}", amount, pool);
        emit!(LiquidityChanged {
            account: ctx.accounts.authority.key(),
            delta: -(amount as i64),
            total_pool: pool,
        });

        Ok(())
    }

    /// Get house stats
    pub fn get_house_stats(ctx: Context<GetHouseStats>) -> Result<HouseStats> {
        Ok(ctx.accounts.house.stats())
    }

    // ==================== GAMES ====================

    /// Coin flip - pays the coin flip multiplier when the side matches
    pub fn play_coin_flip(
        ctx: Context<PlayGame>,
        stake: u64,
        side: CoinSide,
        client_seed: [u8; 32],
    ) -> Result<()> {
        play_game(ctx, GameType::CoinFlip, side.as_u8(), stake, client_seed)
    }

    /// Dice - predict the face (1-6), pays the dice multiplier on an exact match
    pub fn play_dice(
        ctx: Context<PlayGame>,
        stake: u64,
        face: u8,
        client_seed: [u8; 32],
    ) -> Result<()> {
        play_game(ctx, GameType::Dice, face, stake, client_seed)
    }

    /// Get a player's game stats, for one game type or across both
    pub fn get_player_stats(
        ctx: Context<GetPlayerStats>,
        game_type: Option<GameType>,
    ) -> Result<GameStats> {
        Ok(ctx.accounts.player_stats.summary(game_type))
    }

    // ==================== PREDICTION MARKETS ====================

    /// Create a new YES/NO market
    /// market_id: creator-chosen identifier, unique per creator
    pub fn create_market(
        ctx: Context<CreateMarket>,
        market_id: u64,
        params: CreateMarketParams,
    ) -> Result<()> {
        let clock = Clock::get()?;
        let market_key = ctx.accounts.market.key();
        let creator = ctx.accounts.creator.key();

        let market = &mut ctx.accounts.market;
        market.initialize(market_id, creator, params, clock.unix_timestamp, ctx.bumps.market)?;

        msg!(
            "Market #{} created by {}: ends at {}",
            market_id,
            creator,
            market.end_time,
        );
        emit!(MarketCreated {
            market: market_key,
            market_id,
            creator,
            title: market.title.clone(),
            end_time: market.end_time,
        });

        Ok(())
    }

    /// Place a bet on YES (true) or NO (false)
    pub fn place_bet(ctx: Context<PlaceBet>, prediction: bool, amount: u64) -> Result<()> {
        let clock = Clock::get()?;
        let market_key = ctx.accounts.market.key();
        let bettor_key = ctx.accounts.bettor.key();

        let new_bettor = ctx.accounts.bet.is_new();
        ctx.accounts
            .market
            .record_bet(prediction, amount, new_bettor, clock.unix_timestamp)?;

        // Escrow the stake in the market account
        let cpi_context = CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            system_program::Transfer {
                from: ctx.accounts.bettor.to_account_info(),
                to: ctx.accounts.market.to_account_info(),
            },
        );
        system_program::transfer(cpi_context, amount)?;

        let bet = &mut ctx.accounts.bet;
        bet.add_stake(
            market_key,
            bettor_key,
            prediction,
            amount,
            clock.unix_timestamp,
            ctx.bumps.bet,
        )?;

        let market = &ctx.accounts.market;
        msg!(
            "Bet on market #{}: {} lamports on {}, yes={} no={}",
            market.market_id,
            amount,
            if prediction { "YES" } else { "NO" },
            market.total_yes_bets,
            market.total_no_bets,
        );
        emit!(BetPlaced {
            market: market_key,
            bettor: bettor_key,
            prediction,
            amount,
            total_bet: ctx.accounts.bet.amount,
            total_yes_bets: market.total_yes_bets,
            total_no_bets: market.total_no_bets,
        });

        Ok(())
    }

    /// Resolve a market (creator only). Resolution is final.
    pub fn resolve_market(ctx: Context<ManageMarket>, result: bool) -> Result<()> {
        let clock = Clock::get()?;
        let market_key = ctx.accounts.market.key();

        let market = &mut ctx.accounts.market;
        market.resolve(result, clock.unix_timestamp)?;
        let (winning_pool, losing_pool) =
            settlement::split_pools(market.total_yes_bets, market.total_no_bets, result);

        msg!(
            "Market #{} resolved {}: winning_pool={} losing_pool={}",
            market.market_id,
            if result { "YES" } else { "NO" },
            winning_pool,
            losing_pool,
        );
        if winning_pool == 0 {
            msg!("No bets on the winning side, stakes are refundable");
        }
        emit!(MarketResolved {
            market: market_key,
            result,
            winning_pool,
            losing_pool,
        });

        Ok(())
    }

    /// Cancel an open market (creator only). All bettors can claim refunds.
    pub fn cancel_market(ctx: Context<ManageMarket>) -> Result<()> {
        let clock = Clock::get()?;
        let market_key = ctx.accounts.market.key();

        let market = &mut ctx.accounts.market;
        market.cancel(clock.unix_timestamp)?;
        let total_pool = market.total_pool()?;

        msg!("Market #{} cancelled, {} lamports refundable", market.market_id, total_pool);
        emit!(MarketCancelled {
            market: market_key,
            total_pool,
        });

        Ok(())
    }

    /// Claim the pari-mutuel payout of a winning bet
    pub fn claim_winnings(ctx: Context<ClaimBet>) -> Result<()> {
        let market = &mut ctx.accounts.market;
        let bet = &mut ctx.accounts.bet;
        let payout = market.settle_bet(bet)?;
        let bet_amount = bet.amount;

        **ctx.accounts.market.to_account_info().try_borrow_mut_lamports()? -= payout;
        **ctx.accounts.bettor.to_account_info().try_borrow_mut_lamports()? += payout;

        msg!(
            "Claimed {} lamports on a {} lamport bet, market #{}",
            payout,
            bet_amount,
            ctx.accounts.market.market_id,
        );
        emit!(WinningsClaimed {
            market: ctx.accounts.market.key(),
            bettor: ctx.accounts.bettor.key(),
            bet_amount,
            payout,
        });

        Ok(())
    }

    /// Reclaim a stake from a cancelled market, or from a market resolved
    /// to a side nobody bet on
    pub fn claim_refund(ctx: Context<ClaimBet>) -> Result<()> {
        let market = &mut ctx.accounts.market;
        let bet = &mut ctx.accounts.bet;
        let refund_amount = market.refund_bet(bet)?;

        **ctx.accounts.market.to_account_info().try_borrow_mut_lamports()? -= refund_amount;
        **ctx.accounts.bettor.to_account_info().try_borrow_mut_lamports()? += refund_amount;

        msg!(
            "Refunded {} lamports, market #{}",
            refund_amount,
            ctx.accounts.market.market_id,
        );
        emit!(RefundClaimed {
            market: ctx.accounts.market.key(),
            bettor: ctx.accounts.bettor.key(),
            refund_amount,
        });

        Ok(())
    }
}

// === Helper Functions ===

fn emit_config(house: &House) {
    emit!(HouseConfigUpdated {
        coin_flip_multiplier_bps: house.coin_flip_multiplier_bps,
        dice_multiplier_bps: house.dice_multiplier_bps,
        min_bet: house.min_bet,
        max_bet: house.max_bet,
        paused: house.paused,
    });
}

fn play_game(
    ctx: Context<PlayGame>,
    game_type: GameType,
    prediction: u8,
    stake: u64,
    client_seed: [u8; 32],
) -> Result<()> {
    // Outcomes are visible to anything else running in the same transaction
    let instructions = ctx.accounts.instructions.to_account_info();
    let current = load_current_index_checked(&instructions)? as usize;
    let mut other_programs = Vec::new();
    let mut index = 0;
    while let Ok(ix) = load_instruction_at_checked(index, &instructions) {
        if index != current {
            other_programs.push(ix.program_id);
        }
        index += 1;
    }
    games::check_isolated(get_stack_height(), other_programs)?;

    games::validate_prediction(game_type, prediction)?;

    let house = &ctx.accounts.house;
    let multiplier_bps = house.multiplier_bps(game_type);
    let max_payout = games::multiplier_payout(stake, multiplier_bps)?;
    house.check_wager(stake, max_payout)?;

    let clock = Clock::get()?;
    let player_key = ctx.accounts.player.key();
    let house_key = house.key();
    let game_id = house.total_games;
    let server_seed = games::server_seed(
        &player_key,
        clock.slot,
        clock.unix_timestamp,
        &house_key,
        game_id,
    );
    let combined = games::combine_seeds(&server_seed, &client_seed, &player_key);
    let round = games::play_round(game_type, prediction, stake, multiplier_bps, &combined)?;

    // Transfer stake to house account
    let cpi_context = CpiContext::new(
        ctx.accounts.system_program.to_account_info(),
        system_program::Transfer {
            from: ctx.accounts.player.to_account_info(),
            to: ctx.accounts.house.to_account_info(),
        },
    );
    system_program::transfer(cpi_context, stake)?;

    // Pay out from the house account (program-owned)
    if round.payout > 0 {
        **ctx.accounts.house.to_account_info().try_borrow_mut_lamports()? -= round.payout;
        **ctx.accounts.player.to_account_info().try_borrow_mut_lamports()? += round.payout;
    }

    ctx.accounts.house.record_game(stake, round.payout)?;

    let player_stats = &mut ctx.accounts.player_stats;
    if player_stats.player == Pubkey::default() {
        player_stats.player = player_key;
        player_stats.bump = ctx.bumps.player_stats;
    }
    player_stats.record(game_type, stake, &round)?;

    let game_record = &mut ctx.accounts.game_record;
    game_record.game_id = game_id;
    game_record.player = player_key;
    game_record.game_type = game_type;
    game_record.stake = stake;
    game_record.prediction = prediction;
    game_record.outcome = round.outcome;
    game_record.payout = round.payout;
    game_record.won = round.won;
    game_record.server_seed = server_seed;
    game_record.client_seed = client_seed;
    game_record.timestamp = clock.unix_timestamp;
    game_record.slot = clock.slot;
    game_record.bump = ctx.bumps.game_record;

    msg!(
        "Game #{} {:?}: prediction={} outcome={} stake={} payout={}",
        game_id,
        game_type,
        prediction,
        round.outcome,
        stake,
        round.payout,
    );
    emit!(GamePlayed {
        game_id,
        player: player_key,
        game_type,
        stake,
        prediction,
        outcome: round.outcome,
        payout: round.payout,
        won: round.won,
        server_seed,
        client_seed,
        slot: clock.slot,
    });

    Ok(())
}

// === Account Structures ===

#[derive(Accounts)]
pub struct InitializeHouse<'info> {
    #[account(
        init,
        payer = authority,
        space = 8 + House::INIT_SPACE,
        seeds = [HOUSE_SEED],
        bump
    )]
    pub house: Account<'info, House>,

    #[account(mut)]
    pub authority: Signer<'info>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct UpdateHouse<'info> {
    #[account(
        mut,
        seeds = [HOUSE_SEED],
        bump = house.bump,
        has_one = authority @ PredictError::NotHouseAuthority
    )]
    pub house: Account<'info, House>,

    pub authority: Signer<'info>,
}

#[derive(Accounts)]
pub struct AddLiquidity<'info> {
    #[account(mut, seeds = [HOUSE_SEED], bump = house.bump)]
    pub house: Account<'info, House>,

    #[account(mut)]
    pub provider: Signer<'info>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct WithdrawLiquidity<'info> {
    #[account(
        mut,
        seeds = [HOUSE_SEED],
        bump = house.bump,
        has_one = authority @ PredictError::NotHouseAuthority
    )]
    pub house: Account<'info, House>,

    #[account(mut)]
    pub authority: Signer<'info>,
}

#[derive(Accounts)]
pub struct GetHouseStats<'info> {
    #[account(seeds = [HOUSE_SEED], bump = house.bump)]
    pub house: Account<'info, House>,
}

#[derive(Accounts)]
pub struct PlayGame<'info> {
    #[account(mut, seeds = [HOUSE_SEED], bump = house.bump)]
    pub house: Account<'info, House>,

    #[account(
        init,
        payer = player,
        space = 8 + GameRecord::INIT_SPACE,
        seeds = [GAME_SEED, house.key().as_ref(), &house.total_games.to_le_bytes()],
        bump
    )]
    pub game_record: Account<'info, GameRecord>,

    #[account(
        init_if_needed,
        payer = player,
        space = 8 + PlayerStats::INIT_SPACE,
        seeds = [PLAYER_SEED, player.key().as_ref()],
        bump
    )]
    pub player_stats: Account<'info, PlayerStats>,

    #[account(mut)]
    pub player: Signer<'info>,

    /// CHECK: instructions sysvar, read to reject bundled or CPI plays
    #[account(address = SYSVAR_INSTRUCTIONS_ID)]
    pub instructions: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct GetPlayerStats<'info> {
    #[account(
        seeds = [PLAYER_SEED, player_stats.player.as_ref()],
        bump = player_stats.bump
    )]
    pub player_stats: Account<'info, PlayerStats>,
}

#[derive(Accounts)]
#[instruction(market_id: u64)]
pub struct CreateMarket<'info> {
    #[account(
        init,
        payer = creator,
        space = 8 + Market::INIT_SPACE,
        seeds = [MARKET_SEED, creator.key().as_ref(), &market_id.to_le_bytes()],
        bump
    )]
    pub market: Account<'info, Market>,

    #[account(mut)]
    pub creator: Signer<'info>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(prediction: bool)]
pub struct PlaceBet<'info> {
    #[account(
        mut,
        seeds = [MARKET_SEED, market.creator.as_ref(), &market.market_id.to_le_bytes()],
        bump = market.bump,
        constraint = market.status == MarketStatus::Open @ PredictError::MarketNotOpen
    )]
    pub market: Account<'info, Market>,

    #[account(
        init_if_needed,
        payer = bettor,
        space = 8 + UserBet::INIT_SPACE,
        seeds = [BET_SEED, market.key().as_ref(), bettor.key().as_ref(), &side_seed(prediction)],
        bump
    )]
    pub bet: Account<'info, UserBet>,

    #[account(mut)]
    pub bettor: Signer<'info>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct ManageMarket<'info> {
    #[account(
        mut,
        seeds = [MARKET_SEED, market.creator.as_ref(), &market.market_id.to_le_bytes()],
        bump = market.bump,
        has_one = creator @ PredictError::NotMarketCreator
    )]
    pub market: Account<'info, Market>,

    pub creator: Signer<'info>,
}

#[derive(Accounts)]
pub struct ClaimBet<'info> {
    #[account(
        mut,
        seeds = [MARKET_SEED, market.creator.as_ref(), &market.market_id.to_le_bytes()],
        bump = market.bump
    )]
    pub market: Account<'info, Market>,

    #[account(
        mut,
        seeds = [BET_SEED, market.key().as_ref(), bettor.key().as_ref(), &side_seed(bet.prediction)],
        bump = bet.bump,
        constraint = bet.market == market.key() @ PredictError::WrongMarket,
        constraint = bet.bettor == bettor.key() @ PredictError::NotBetOwner
    )]
    pub bet: Account<'info, UserBet>,

    #[account(mut)]
    pub bettor: Signer<'info>,
}
