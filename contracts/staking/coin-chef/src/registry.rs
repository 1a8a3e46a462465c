use cosmwasm_std::{OverflowError, StdResult, Storage, Uint128, Uint256, Uint64};
use cw_denom::CheckedDenom;

use crate::accrual::update_all_pools;
use crate::emission::EmissionSchedule;
use crate::state::{Pool, POOLS, POOL_COUNT, POOL_TOKENS, TOTAL_WEIGHT};
use crate::ContractError;

/// Storage key identifying a token. Native and cw20 tokens live in
/// separate namespaces so a denom can never collide with an address.
pub fn token_key(token: &CheckedDenom) -> String {
    match token {
        CheckedDenom::Native(denom) => format!("native:{denom}"),
        CheckedDenom::Cw20(addr) => format!("cw20:{addr}"),
    }
}

pub fn load_pool(storage: &dyn Storage, pool_id: u64) -> Result<Pool, ContractError> {
    POOLS
        .may_load(storage, pool_id)?
        .ok_or(ContractError::UnknownPool { pool_id })
}

pub fn total_weight(storage: &dyn Storage) -> StdResult<u64> {
    Ok(TOTAL_WEIGHT.may_load(storage)?.unwrap_or_default())
}

/// Registers a pool for `deposit_token`. Every existing pool is
/// brought up to date first as the new weight changes each pool's
/// share of future emissions.
pub fn add_pool(
    storage: &mut dyn Storage,
    schedule: &EmissionSchedule,
    deposit_token: CheckedDenom,
    weight: u64,
    height: u64,
) -> Result<Pool, ContractError> {
    let key = token_key(&deposit_token);
    if POOL_TOKENS.has(storage, key.clone()) {
        return Err(ContractError::DuplicateToken { token: key });
    }
    let total_weight = add_weight(total_weight(storage)?, weight)?;

    update_all_pools(storage, schedule, height)?;

    let id = POOL_COUNT.may_load(storage)?.unwrap_or_default() + 1;
    let pool = Pool {
        id,
        deposit_token,
        weight,
        total_staked: Uint128::zero(),
        acc_reward_per_share: Uint256::zero(),
        last_reward_block: schedule.first_reward_block(height),
    };
    POOLS.save(storage, id, &pool)?;
    POOL_TOKENS.save(storage, key, &id)?;
    POOL_COUNT.save(storage, &id)?;
    TOTAL_WEIGHT.save(storage, &total_weight)?;
    Ok(pool)
}

/// Changes a pool's weight, returning the previous one. Accrual for
/// every pool is settled at the old weights before the change.
pub fn set_weight(
    storage: &mut dyn Storage,
    schedule: &EmissionSchedule,
    pool_id: u64,
    weight: u64,
    height: u64,
) -> Result<u64, ContractError> {
    load_pool(storage, pool_id)?;

    update_all_pools(storage, schedule, height)?;

    let mut pool = load_pool(storage, pool_id)?;
    let old_weight = pool.weight;
    // the old weight is part of the total so this can not underflow
    let total_weight = add_weight(total_weight(storage)? - old_weight, weight)?;
    pool.weight = weight;
    POOLS.save(storage, pool_id, &pool)?;
    TOTAL_WEIGHT.save(storage, &total_weight)?;
    Ok(old_weight)
}

fn add_weight(total: u64, weight: u64) -> Result<u64, OverflowError> {
    Ok(Uint64::new(total).checked_add(Uint64::new(weight))?.u64())
}

#[cfg(test)]
mod tests {
    use cosmwasm_std::Addr;

    use super::*;

    #[test]
    fn test_token_key_namespaces() {
        let native = CheckedDenom::Native("abc".to_string());
        let cw20 = CheckedDenom::Cw20(Addr::unchecked("abc"));
        assert_ne!(token_key(&native), token_key(&cw20));
        assert_eq!(native.to_string(), cw20.to_string());
    }
}
