//! Market engine: the five public operations.
//!
//! Every operation is one synchronous step driven by the caller's identity
//! and clock:
//! 1. Look up the market book by derived address and lock it
//! 2. Run every admissibility and validation check
//! 3. Apply all mutations (escrow, pools, flags) together
//!
//! Step 2 never mutates and step 3 never fails after its first write, so
//! a rejected call leaves every record exactly as it was.
//!
//! Lock order is always: market book → participant balances → supply
//! tracker.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use sealbet_ledger::{
    BalanceManager, LedgerStore, MarketBook, SupplyConservation, disburse_payout, escrow_stake,
    lock_book,
};
use sealbet_types::{
    Address, CommitBetParams, Commitment, CreateMarketParams, EngineConfig, ErrorClass, Identity,
    Market, MarketStatus, Outcome, ResolveMarketParams, Result, RevealBetParams, SealbetError,
    Vault, address,
};

use crate::{lifecycle, payout::payout};

/// Orchestrates markets, commitments, vaults and participant funds.
pub struct MarketEngine {
    config: EngineConfig,
    store: LedgerStore,
    balances: Mutex<BalanceManager>,
    supply: Mutex<SupplyConservation>,
}

impl MarketEngine {
    /// Create an engine with a validated configuration.
    ///
    /// # Errors
    /// `InvalidConfig` if the configuration is rejected.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            store: LedgerStore::new(),
            balances: Mutex::new(BalanceManager::new()),
            supply: Mutex::new(SupplyConservation::new()),
        })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // =================================================================
    // Participant funds
    // =================================================================

    /// Credit external funds to a participant.
    pub fn deposit(&self, user: Identity, amount: u64) -> Result<()> {
        let mut balances = self.lock_balances()?;
        let mut supply = self.lock_supply()?;
        balances.deposit(user, amount)?;
        supply.record_deposit(amount);
        tracing::debug!(user = %user, amount, "Deposit");
        Ok(())
    }

    /// Move available funds out of the ledger.
    pub fn withdraw(&self, user: Identity, amount: u64) -> Result<()> {
        let mut balances = self.lock_balances()?;
        let mut supply = self.lock_supply()?;
        balances.debit(user, amount)?;
        supply.record_withdrawal(amount);
        tracing::debug!(user = %user, amount, "Withdrawal");
        Ok(())
    }

    pub fn balance(&self, user: Identity) -> Result<u64> {
        Ok(self.lock_balances()?.balance(user))
    }

    // =================================================================
    // createMarket
    // =================================================================

    /// Open a market and its empty vault. Returns the market address.
    ///
    /// # Errors
    /// `QuestionTooLong`, `DeadlineInPast`, `MarketAlreadyExists`, `Overflow`.
    pub fn create_market(
        &self,
        caller: Identity,
        params: CreateMarketParams,
        now: DateTime<Utc>,
    ) -> Result<Address> {
        let market_address = address::market_address(&caller, params.market_id);
        self.create_market_inner(caller, market_address, params, now)
            .inspect_err(|err| log_rejection("create_market", &market_address, &caller, err))
    }

    fn create_market_inner(
        &self,
        caller: Identity,
        market_address: Address,
        params: CreateMarketParams,
        now: DateTime<Utc>,
    ) -> Result<Address> {
        if params.question.len() > self.config.max_question_len {
            return Err(SealbetError::QuestionTooLong {
                len: params.question.len(),
                max: self.config.max_question_len,
            });
        }
        if params.deadline <= now {
            return Err(SealbetError::DeadlineInPast);
        }
        let reveal_deadline = lifecycle::reveal_deadline_for(
            params.deadline,
            params.reveal_period,
            self.config.default_reveal_period(),
        )?;

        let market = Market {
            address: market_address,
            creator: caller,
            oracle: params.oracle,
            market_id: params.market_id,
            question: params.question,
            deadline: params.deadline,
            reveal_deadline,
            total_pool: 0,
            yes_pool: 0,
            no_pool: 0,
            yes_count: 0,
            no_count: 0,
            outcome: None,
            resolved_at: None,
            created_at: now,
        };
        self.store.insert(MarketBook::new(market))?;

        tracing::info!(
            market = %market_address.short(),
            id = params.market_id.0,
            creator = %caller,
            oracle = %params.oracle,
            deadline = %params.deadline,
            reveal_deadline = %reveal_deadline,
            "Market created"
        );
        Ok(market_address)
    }

    // =================================================================
    // commitBet
    // =================================================================

    /// Escrow `amount` behind a sealed commitment hash. Returns the
    /// commitment address.
    ///
    /// # Errors
    /// `MarketNotFound`, `MarketClosed`, `CommitmentAlreadyExists`,
    /// `ZeroBetAmount`, `InsufficientBalance`, `Overflow`.
    pub fn commit_bet(
        &self,
        caller: Identity,
        market: &Address,
        params: CommitBetParams,
        now: DateTime<Utc>,
    ) -> Result<Address> {
        self.store
            .with_book(market, |book| self.commit_in_book(book, caller, params, now))
            .inspect_err(|err| log_rejection("commit_bet", market, &caller, err))
    }

    fn commit_in_book(
        &self,
        book: &mut MarketBook,
        caller: Identity,
        params: CommitBetParams,
        now: DateTime<Utc>,
    ) -> Result<Address> {
        lifecycle::ensure_can_commit(book.market(), now)?;
        book.ensure_no_commitment(&caller)?;
        if params.amount == 0 {
            return Err(SealbetError::ZeroBetAmount);
        }
        let new_total = book
            .market()
            .total_pool
            .checked_add(params.amount)
            .ok_or(SealbetError::Overflow)?;

        {
            let mut balances = self.lock_balances()?;
            escrow_stake(&mut balances, book.vault_mut(), caller, params.amount)?;
        }

        let commitment_address = book.commitment_address(&caller);
        book.market_mut().total_pool = new_total;
        book.insert_commitment(Commitment::new(
            commitment_address,
            book.address(),
            caller,
            params.amount,
            params.commitment_hash,
            now,
        ))?;

        tracing::info!(
            market = %book.address().short(),
            user = %caller,
            amount = params.amount,
            total_pool = new_total,
            "Bet committed"
        );
        Ok(commitment_address)
    }

    // =================================================================
    // revealBet
    // =================================================================

    /// Open the caller's commitment. The stored stake is the amount hashed.
    /// Returns the revealed outcome.
    ///
    /// # Errors
    /// `MarketNotFound`, `MarketAlreadyResolved`, `CommitmentNotFound`,
    /// `AlreadyRevealed`, `DeadlineNotReached`, `RevealWindowClosed`,
    /// `InvalidOutcome`, `CommitmentMismatch`, `Overflow`.
    pub fn reveal_bet(
        &self,
        caller: Identity,
        market: &Address,
        params: RevealBetParams,
        now: DateTime<Utc>,
    ) -> Result<Outcome> {
        self.store
            .with_book(market, |book| Self::reveal_in_book(book, caller, params, now))
            .inspect_err(|err| log_rejection("reveal_bet", market, &caller, err))
    }

    fn reveal_in_book(
        book: &mut MarketBook,
        caller: Identity,
        params: RevealBetParams,
        now: DateTime<Utc>,
    ) -> Result<Outcome> {
        lifecycle::ensure_not_resolved(book.market())?;
        let commitment = book
            .commitment(&caller)
            .ok_or_else(|| SealbetError::CommitmentNotFound(book.commitment_address(&caller)))?;
        if commitment.is_revealed {
            return Err(SealbetError::AlreadyRevealed);
        }
        lifecycle::ensure_reveal_window(book.market(), now)?;
        let outcome = Outcome::try_from(params.outcome)?;
        if !commitment.opens_with(outcome, &params.salt) {
            return Err(SealbetError::CommitmentMismatch);
        }

        let amount = commitment.amount;
        let m = book.market();
        let new_pool = m
            .pool_for(outcome)
            .checked_add(amount)
            .ok_or(SealbetError::Overflow)?;
        let new_count = m
            .count_for(outcome)
            .checked_add(1)
            .ok_or(SealbetError::Overflow)?;

        let m = book.market_mut();
        match outcome {
            Outcome::Yes => {
                m.yes_pool = new_pool;
                m.yes_count = new_count;
            }
            Outcome::No => {
                m.no_pool = new_pool;
                m.no_count = new_count;
            }
        }
        if let Some(c) = book.commitment_mut(&caller) {
            c.record_reveal(outcome, params.salt, now);
        }

        tracing::info!(
            market = %book.address().short(),
            user = %caller,
            outcome = %outcome,
            amount,
            "Bet revealed"
        );
        Ok(outcome)
    }

    // =================================================================
    // resolveMarket
    // =================================================================

    /// Record the market outcome. Exactly once, by the oracle or creator.
    ///
    /// # Errors
    /// `MarketNotFound`, `MarketAlreadyResolved`, `DeadlineNotReached`,
    /// `UnauthorizedResolver`, `InvalidOutcome`.
    pub fn resolve_market(
        &self,
        caller: Identity,
        market: &Address,
        params: ResolveMarketParams,
        now: DateTime<Utc>,
    ) -> Result<Outcome> {
        self.store
            .with_book(market, |book| {
                lifecycle::ensure_can_resolve(book.market(), now)?;
                if !book.market().may_resolve(&caller) {
                    return Err(SealbetError::UnauthorizedResolver(caller));
                }
                let outcome = Outcome::try_from(params.outcome)?;

                let m = book.market_mut();
                m.outcome = Some(outcome);
                m.resolved_at = Some(now);

                tracing::info!(
                    market = %m.address.short(),
                    resolver = %caller,
                    outcome = %outcome,
                    yes_pool = m.yes_pool,
                    no_pool = m.no_pool,
                    unrevealed = m.unrevealed_pool(),
                    "Market resolved"
                );
                Ok(outcome)
            })
            .inspect_err(|err| log_rejection("resolve_market", market, &caller, err))
    }

    // =================================================================
    // claimWinnings
    // =================================================================

    /// Pay the caller's winnings out of the vault. Returns the payout.
    ///
    /// # Errors
    /// `MarketNotFound`, `MarketNotResolved`, `CommitmentNotFound`,
    /// `NotRevealed`, `AlreadyClaimed`, `DidNotWin`,
    /// `InsufficientVaultFunds`, `Overflow`.
    pub fn claim_winnings(&self, caller: Identity, market: &Address) -> Result<u64> {
        self.store
            .with_book(market, |book| {
                let amount = claimable_payout(book, &caller)?;
                {
                    let mut balances = self.lock_balances()?;
                    disburse_payout(book.vault_mut(), &mut balances, caller, amount)?;
                }
                if let Some(c) = book.commitment_mut(&caller) {
                    c.record_claim(amount);
                }

                tracing::info!(
                    market = %book.address().short(),
                    user = %caller,
                    payout = amount,
                    vault_remaining = book.vault().balance,
                    "Winnings claimed"
                );
                Ok(amount)
            })
            .inspect_err(|err| log_rejection("claim_winnings", market, &caller, err))
    }

    /// What `claim_winnings` would pay the caller right now, without
    /// claiming.
    ///
    /// # Errors
    /// The same admissibility errors as `claim_winnings`.
    pub fn quote_payout(&self, caller: Identity, market: &Address) -> Result<u64> {
        self.store.with_book(market, |book| claimable_payout(book, &caller))
    }

    // =================================================================
    // Read side
    // =================================================================

    pub fn market(&self, market: &Address) -> Result<Market> {
        self.store.with_book(market, |book| Ok(book.market().clone()))
    }

    /// Effective status at `now`.
    pub fn market_status(&self, market: &Address, now: DateTime<Utc>) -> Result<MarketStatus> {
        self.store
            .with_book(market, |book| Ok(lifecycle::effective_status(book.market(), now)))
    }

    /// `user`'s commitment on `market`.
    ///
    /// # Errors
    /// `MarketNotFound` or `CommitmentNotFound`.
    pub fn commitment(&self, market: &Address, user: Identity) -> Result<Commitment> {
        self.store.with_book(market, |book| {
            book.commitment(&user)
                .cloned()
                .ok_or_else(|| SealbetError::CommitmentNotFound(book.commitment_address(&user)))
        })
    }

    pub fn vault(&self, market: &Address) -> Result<Vault> {
        self.store.with_book(market, |book| Ok(book.vault().clone()))
    }

    pub fn market_count(&self) -> Result<usize> {
        self.store.len()
    }

    /// Check every market's accounting invariants and global supply
    /// conservation against one consistent snapshot.
    ///
    /// # Errors
    /// `SupplyInvariantViolation` on the first broken invariant.
    pub fn verify_supply(&self) -> Result<()> {
        let handles = self
            .store
            .market_addresses()?
            .iter()
            .map(|addr| self.store.book(addr))
            .collect::<Result<Vec<_>>>()?;
        let books = handles
            .iter()
            .map(lock_book)
            .collect::<Result<Vec<_>>>()?;

        let mut vaults: u128 = 0;
        for book in &books {
            book.verify_invariants()?;
            vaults += u128::from(book.vault().balance);
        }
        let balances = self.lock_balances()?;
        let supply = self.lock_supply()?;
        supply.verify(balances.total_supply() + vaults)
    }

    fn lock_balances(&self) -> Result<MutexGuard<'_, BalanceManager>> {
        self.balances
            .lock()
            .map_err(|_| SealbetError::Internal("balance lock poisoned".into()))
    }

    fn lock_supply(&self) -> Result<MutexGuard<'_, SupplyConservation>> {
        self.supply
            .lock()
            .map_err(|_| SealbetError::Internal("supply lock poisoned".into()))
    }
}

impl Default for MarketEngine {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            store: LedgerStore::new(),
            balances: Mutex::new(BalanceManager::new()),
            supply: Mutex::new(SupplyConservation::new()),
        }
    }
}

/// Run every claim check and compute the payout, without mutating.
fn claimable_payout(book: &MarketBook, caller: &Identity) -> Result<u64> {
    let winner = lifecycle::ensure_resolved(book.market())?;
    let commitment = book
        .commitment(caller)
        .ok_or_else(|| SealbetError::CommitmentNotFound(book.commitment_address(caller)))?;
    if !commitment.is_revealed {
        return Err(SealbetError::NotRevealed);
    }
    if commitment.is_claimed {
        return Err(SealbetError::AlreadyClaimed);
    }
    if !commitment.won(winner) {
        return Err(SealbetError::DidNotWin);
    }
    let (win_pool, lose_pool) = book.market().pools_for_winner(winner);
    payout(commitment.amount, win_pool, lose_pool)
}

fn log_rejection(op: &'static str, market: &Address, caller: &Identity, err: &SealbetError) {
    match err.class() {
        ErrorClass::Integrity | ErrorClass::Authorization | ErrorClass::Internal => {
            tracing::warn!(
                op,
                market = %market.short(),
                caller = %caller,
                error = %err,
                "Rejected"
            );
        }
        _ => {
            tracing::debug!(
                op,
                market = %market.short(),
                caller = %caller,
                error = %err,
                "Rejected"
            );
        }
    }
}
