use std::cmp::min;

use cosmwasm_std::{Addr, StdResult, Storage, Uint128};

use crate::accrual::update_pool;
use crate::emission::EmissionSchedule;
use crate::math::accrued_reward;
use crate::registry::load_pool;
use crate::state::{Pool, UserStake, POOLS, REWARD_RESERVE, STAKES};
use crate::ContractError;

impl UserStake {
    /// Rewards earned since the last settlement. Never negative as a
    /// pool's accumulator only grows.
    pub fn pending(&self, pool: &Pool) -> StdResult<Uint128> {
        let growth = pool.acc_reward_per_share.checked_sub(self.reward_debt)?;
        accrued_reward(self.staked, growth)
    }

    fn reset_debt(&mut self, pool: &Pool) {
        self.reward_debt = pool.acc_reward_per_share;
    }
}

/// Everything one user action on one pool reads and writes. Opening
/// the ledger accrues the pool up to the current block, which credits
/// the dev share in storage right away. The pool, stake and reserve
/// are only written by `commit`. A failed action relies on the
/// transaction being reverted to undo the dev credit.
#[derive(Debug, Clone, PartialEq)]
pub struct StakeLedger {
    pub pool: Pool,
    pub user: Addr,
    pub stake: UserStake,
    /// reward tokens available to pay out
    pub reserve: Uint128,
}

impl StakeLedger {
    pub fn open(
        storage: &mut dyn Storage,
        schedule: &EmissionSchedule,
        pool_id: u64,
        user: Addr,
        height: u64,
    ) -> Result<Self, ContractError> {
        let mut pool = load_pool(storage, pool_id)?;
        update_pool(storage, schedule, &mut pool, height)?;
        let stake = STAKES
            .may_load(storage, (pool_id, &user))?
            .unwrap_or_default();
        let reserve = REWARD_RESERVE.may_load(storage)?.unwrap_or_default();
        Ok(Self {
            pool,
            user,
            stake,
            reserve,
        })
    }

    pub fn commit(self, storage: &mut dyn Storage) -> StdResult<()> {
        POOLS.save(storage, self.pool.id, &self.pool)?;
        if self.stake.is_empty() {
            STAKES.remove(storage, (self.pool.id, &self.user));
        } else {
            STAKES.save(storage, (self.pool.id, &self.user), &self.stake)?;
        }
        REWARD_RESERVE.save(storage, &self.reserve)
    }

    /// Pays out pending and previously unpaid rewards as far as the
    /// reserve allows. Returns the amount to transfer.
    fn settle(&mut self) -> Result<Uint128, ContractError> {
        let owed = self
            .stake
            .pending(&self.pool)?
            .checked_add(self.stake.unclaimed)?;
        let paid = min(owed, self.reserve);
        self.reserve -= paid;
        self.stake.unclaimed = owed - paid;
        Ok(paid)
    }

    /// Adds `amount` to the stake. Returns the reward paid out.
    pub fn deposit(&mut self, amount: Uint128) -> Result<Uint128, ContractError> {
        if amount.is_zero() {
            return Err(ContractError::InvalidAmount {});
        }
        let reward = self.settle()?;
        self.stake.staked = self.stake.staked.checked_add(amount)?;
        self.pool.total_staked = self.pool.total_staked.checked_add(amount)?;
        self.stake.reset_debt(&self.pool);
        Ok(reward)
    }

    /// Removes `amount` from the stake. Returns the reward paid out.
    pub fn withdraw(&mut self, amount: Uint128) -> Result<Uint128, ContractError> {
        if amount.is_zero() {
            return Err(ContractError::InvalidAmount {});
        }
        if amount > self.stake.staked {
            return Err(ContractError::InsufficientStake {
                staked: self.stake.staked,
                requested: amount,
            });
        }
        let reward = self.settle()?;
        self.stake.staked -= amount;
        self.pool.total_staked = self.pool.total_staked.checked_sub(amount)?;
        self.stake.reset_debt(&self.pool);
        Ok(reward)
    }

    /// Returns the reward paid out, which may be zero.
    pub fn harvest(&mut self) -> Result<Uint128, ContractError> {
        let reward = self.settle()?;
        self.stake.reset_debt(&self.pool);
        Ok(reward)
    }

    /// Returns the whole stake and forfeits every unpaid reward.
    pub fn emergency_withdraw(&mut self) -> Result<Uint128, ContractError> {
        let amount = self.stake.staked;
        if amount.is_zero() {
            return Err(ContractError::NothingStaked {
                pool_id: self.pool.id,
            });
        }
        self.pool.total_staked = self.pool.total_staked.checked_sub(amount)?;
        self.stake = UserStake::default();
        Ok(amount)
    }
}
