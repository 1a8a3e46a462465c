use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128, Uint256};
use cw_denom::CheckedDenom;
use cw_storage_plus::{Item, Map};

use crate::emission::EmissionSchedule;

#[cw_serde]
pub struct Pool {
    pub id: u64,
    pub deposit_token: CheckedDenom,
    /// share of the global emission relative to the sum of all pool
    /// weights
    pub weight: u64,
    pub total_staked: Uint128,
    /// rewards earned per staked token since the pool was created,
    /// scaled by `math::PRECISION`
    pub acc_reward_per_share: Uint256,
    /// height the accumulator was last brought up to date at
    pub last_reward_block: u64,
}

#[cw_serde]
#[derive(Default)]
pub struct UserStake {
    pub staked: Uint128,
    /// the pool's `acc_reward_per_share` at the last settlement. Only
    /// the accumulator growth since then is owed on `staked`.
    pub reward_debt: Uint256,
    /// settled rewards the reserve could not cover yet
    pub unclaimed: Uint128,
}

impl UserStake {
    pub fn is_empty(&self) -> bool {
        self.staked.is_zero() && self.unclaimed.is_zero()
    }
}

pub const SCHEDULE: Item<EmissionSchedule> = Item::new("schedule");

/// pool ID to pool
pub const POOLS: Map<u64, Pool> = Map::new("pools");

/// number of pools created so far, also the ID of the latest pool
pub const POOL_COUNT: Item<u64> = Item::new("pool_count");

/// sum of all pool weights
pub const TOTAL_WEIGHT: Item<u64> = Item::new("total_weight");

/// deposit token key (see `registry::token_key`) to the ID of its pool
pub const POOL_TOKENS: Map<String, u64> = Map::new("pool_tokens");

pub const STAKES: Map<(u64, &Addr), UserStake> = Map::new("stakes");

/// reward tokens funded into the contract and not yet paid out
pub const REWARD_RESERVE: Item<Uint128> = Item::new("reward_reserve");

/// rewards accrued to the dev address and not yet claimed
pub const DEV_REWARDS: Item<Uint128> = Item::new("dev_rewards");
