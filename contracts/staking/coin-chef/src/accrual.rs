use cosmwasm_std::{Order, StdResult, Storage, Uint128};

use crate::emission::EmissionSchedule;
use crate::math::{reward_per_share, weighted_share};
use crate::registry::total_weight;
use crate::state::{Pool, DEV_REWARDS, POOLS};
use crate::ContractError;

impl Pool {
    /// Brings the per-share accumulator up to `height` and returns the
    /// rewards emitted to the pool since its last update. Calling this
    /// again at the same height is a no-op.
    pub fn accrue(
        &mut self,
        schedule: &EmissionSchedule,
        total_weight: u64,
        height: u64,
    ) -> StdResult<Uint128> {
        if height <= self.last_reward_block {
            return Ok(Uint128::zero());
        }
        if self.total_staked.is_zero() {
            // nobody is owed anything for the empty period, skip it.
            self.last_reward_block = height;
            return Ok(Uint128::zero());
        }
        let emitted = schedule.reward_between(self.last_reward_block, height)?;
        let reward = weighted_share(emitted, self.weight, total_weight)?;
        self.acc_reward_per_share = self
            .acc_reward_per_share
            .checked_add(reward_per_share(reward, self.total_staked)?)?;
        self.last_reward_block = height;
        Ok(reward)
    }
}

/// Accrues `pool` up to `height` and credits the dev share of what it
/// emitted. The caller is responsible for saving the pool.
pub fn update_pool(
    storage: &mut dyn Storage,
    schedule: &EmissionSchedule,
    pool: &mut Pool,
    height: u64,
) -> Result<Uint128, ContractError> {
    let reward = pool.accrue(schedule, total_weight(storage)?, height)?;
    let dev_reward = reward.checked_mul_floor(schedule.dev_share)?;
    if !dev_reward.is_zero() {
        let pending = DEV_REWARDS.may_load(storage)?.unwrap_or_default();
        DEV_REWARDS.save(storage, &pending.checked_add(dev_reward)?)?;
    }
    Ok(reward)
}

/// Updates and saves every pool. Returns the number of pools visited.
pub fn update_all_pools(
    storage: &mut dyn Storage,
    schedule: &EmissionSchedule,
    height: u64,
) -> Result<u64, ContractError> {
    let pools = POOLS
        .range(storage, None, None, Order::Ascending)
        .map(|item| item.map(|(_, pool)| pool))
        .collect::<StdResult<Vec<Pool>>>()?;
    let count = pools.len() as u64;
    for mut pool in pools {
        update_pool(storage, schedule, &mut pool, height)?;
        POOLS.save(storage, pool.id, &pool)?;
    }
    Ok(count)
}
