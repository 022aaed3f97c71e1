//! Vault custody. Moves funds between participants and a market vault.
//!
//! `escrow_stake` moves a stake from the bettor into the vault at commit
//! time; `disburse_payout` moves a payout from the vault to a winner at
//! claim time. Both check every precondition before touching either side,
//! so a failure leaves balances and vault exactly as they were.

use sealbet_types::{Identity, Result, SealbetError, Vault};

use crate::balance_manager::BalanceManager;

/// Debit `amount` from `user` and credit it to `vault`.
///
/// # Errors
/// - `InsufficientBalance` if the user cannot cover the stake
/// - `Overflow` if the vault balance would overflow
pub fn escrow_stake(
    balances: &mut BalanceManager,
    vault: &mut Vault,
    user: Identity,
    amount: u64,
) -> Result<()> {
    let new_balance = vault
        .balance
        .checked_add(amount)
        .ok_or(SealbetError::Overflow)?;
    balances.debit(user, amount)?;
    vault.balance = new_balance;
    Ok(())
}

/// Debit `amount` from `vault` and credit it to `user`.
///
/// # Errors
/// - `InsufficientVaultFunds` if the vault cannot cover the payout
/// - `Overflow` if the user's balance or the disbursed total would overflow
pub fn disburse_payout(
    vault: &mut Vault,
    balances: &mut BalanceManager,
    user: Identity,
    amount: u64,
) -> Result<()> {
    if vault.balance < amount {
        return Err(SealbetError::InsufficientVaultFunds {
            needed: amount,
            available: vault.balance,
        });
    }
    let new_disbursed = vault
        .disbursed
        .checked_add(amount)
        .ok_or(SealbetError::Overflow)?;
    if balances.balance(user).checked_add(amount).is_none() {
        return Err(SealbetError::Overflow);
    }

    balances.credit(user, amount)?;
    vault.balance -= amount;
    vault.disbursed = new_disbursed;
    Ok(())
}

#[cfg(test)]
mod tests {
    use sealbet_types::Address;

    use super::*;

    fn setup() -> (BalanceManager, Vault) {
        (BalanceManager::new(), Vault::new(Address([1; 32]), Address([2; 32])))
    }

    #[test]
    fn escrow_moves_funds_into_vault() {
        let (mut bm, mut vault) = setup();
        let user = Identity::random();
        bm.deposit(user, 10_000).unwrap();

        escrow_stake(&mut bm, &mut vault, user, 4_000).unwrap();

        assert_eq!(bm.balance(user), 6_000);
        assert_eq!(vault.balance, 4_000);
        assert_eq!(vault.disbursed, 0);
    }

    #[test]
    fn escrow_insufficient_balance_changes_nothing() {
        let (mut bm, mut vault) = setup();
        let user = Identity::random();
        bm.deposit(user, 100).unwrap();

        let err = escrow_stake(&mut bm, &mut vault, user, 200).unwrap_err();
        assert!(matches!(err, SealbetError::InsufficientBalance { .. }));
        assert_eq!(bm.balance(user), 100);
        assert_eq!(vault.balance, 0);
    }

    #[test]
    fn escrow_vault_overflow_changes_nothing() {
        let (mut bm, mut vault) = setup();
        let user = Identity::random();
        bm.deposit(user, 10).unwrap();
        vault.balance = u64::MAX;

        let err = escrow_stake(&mut bm, &mut vault, user, 10).unwrap_err();
        assert!(matches!(err, SealbetError::Overflow));
        assert_eq!(bm.balance(user), 10);
    }

    #[test]
    fn disburse_moves_funds_out_of_vault() {
        let (mut bm, mut vault) = setup();
        let user = Identity::random();
        vault.balance = 300;

        disburse_payout(&mut vault, &mut bm, user, 250).unwrap();

        assert_eq!(bm.balance(user), 250);
        assert_eq!(vault.balance, 50);
        assert_eq!(vault.disbursed, 250);
        assert_eq!(vault.total_received(), 300);
    }

    #[test]
    fn disburse_insufficient_vault_changes_nothing() {
        let (mut bm, mut vault) = setup();
        let user = Identity::random();
        vault.balance = 10;

        let err = disburse_payout(&mut vault, &mut bm, user, 11).unwrap_err();
        assert!(matches!(
            err,
            SealbetError::InsufficientVaultFunds {
                needed: 11,
                available: 10
            }
        ));
        assert_eq!(vault.balance, 10);
        assert_eq!(bm.balance(user), 0);
    }
}
