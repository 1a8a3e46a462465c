#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    from_json, to_json_binary, Addr, Binary, CosmosMsg, Deps, DepsMut, Env, MessageInfo, Order,
    Response, StdError, StdResult, Uint128,
};
use cw2::{get_contract_version, set_contract_version, ContractVersion};
use cw20::Cw20ReceiveMsg;
use cw_denom::{CheckedDenom, UncheckedDenom};
use cw_paginate_storage::{paginate_map, paginate_map_values};
use std::cmp::min;

use crate::accrual::{update_all_pools, update_pool};
use crate::emission::EmissionSchedule;
use crate::ledger::StakeLedger;
use crate::msg::{
    ExecuteMsg, InfoResponse, InstantiateMsg, ListPoolsResponse, ListStakersResponse, MigrateMsg,
    PendingRewardResponse, QueryMsg, ReceiveMsg, StakeResponse,
};
use crate::registry::{self, load_pool, total_weight};
use crate::state::{
    Pool, DEV_REWARDS, POOLS, POOL_COUNT, REWARD_RESERVE, SCHEDULE, STAKES, TOTAL_WEIGHT,
};
use crate::ContractError;

pub(crate) const CONTRACT_NAME: &str = "crates.io:coin-chef";
pub(crate) const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 30;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    cw_ownable::initialize_owner(deps.storage, deps.api, msg.owner.as_deref())?;

    let schedule = EmissionSchedule::new(
        msg.reward_token.into_checked(deps.as_ref())?,
        deps.api.addr_validate(&msg.dev_address)?,
        msg.dev_share,
        msg.reward_per_block,
        msg.start_block,
        env.block.height,
    )?;
    SCHEDULE.save(deps.storage, &schedule)?;
    POOL_COUNT.save(deps.storage, &0)?;
    TOTAL_WEIGHT.save(deps.storage, &0)?;
    REWARD_RESERVE.save(deps.storage, &Uint128::zero())?;
    DEV_REWARDS.save(deps.storage, &Uint128::zero())?;

    Ok(Response::new()
        .add_attribute("owner", msg.owner.unwrap_or_else(|| "None".to_string()))
        .add_attribute("reward_token", schedule.reward_token.to_string())
        .add_attribute("dev_address", schedule.dev_address)
        .add_attribute("dev_share", schedule.dev_share.to_string())
        .add_attribute("reward_per_block", schedule.reward_per_block)
        .add_attribute("start_block", schedule.start_block.to_string()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::AddPool {
            deposit_token,
            weight,
        } => execute_add_pool(deps, env, info, deposit_token, weight),
        ExecuteMsg::SetWeight { pool_id, weight } => {
            execute_set_weight(deps, env, info, pool_id, weight)
        }
        ExecuteMsg::UpdatePool { pool_id } => execute_update_pool(deps, env, pool_id),
        ExecuteMsg::MassUpdatePools {} => execute_mass_update_pools(deps, env),
        ExecuteMsg::Deposit { pool_id } => execute_deposit_native(deps, env, info, pool_id),
        ExecuteMsg::Withdraw { pool_id, amount } => {
            execute_withdraw(deps, env, info, pool_id, amount)
        }
        ExecuteMsg::Harvest { pool_id } => execute_harvest(deps, env, info, pool_id),
        ExecuteMsg::EmergencyWithdraw { pool_id } => {
            execute_emergency_withdraw(deps, env, info, pool_id)
        }
        ExecuteMsg::Receive(msg) => execute_receive(deps, env, info, msg),
        ExecuteMsg::Fund {} => execute_fund_native(deps, info),
        ExecuteMsg::ClaimDevRewards {} => execute_claim_dev_rewards(deps, info),
        ExecuteMsg::UpdateOwnership(action) => execute_update_owner(deps, info, env, action),
    }
}

pub fn execute_add_pool(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    deposit_token: UncheckedDenom,
    weight: u64,
) -> Result<Response, ContractError> {
    cw_ownable::assert_owner(deps.storage, &info.sender)?;

    let deposit_token = deposit_token.into_checked(deps.as_ref())?;
    let schedule = SCHEDULE.load(deps.storage)?;
    let pool = registry::add_pool(
        deps.storage,
        &schedule,
        deposit_token,
        weight,
        env.block.height,
    )?;

    Ok(Response::new()
        .add_attribute("action", "add_pool")
        .add_attribute("pool_id", pool.id.to_string())
        .add_attribute("deposit_token", pool.deposit_token.to_string())
        .add_attribute("weight", weight.to_string())
        .add_attribute("last_reward_block", pool.last_reward_block.to_string()))
}

pub fn execute_set_weight(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    pool_id: u64,
    weight: u64,
) -> Result<Response, ContractError> {
    cw_ownable::assert_owner(deps.storage, &info.sender)?;

    let schedule = SCHEDULE.load(deps.storage)?;
    let old_weight =
        registry::set_weight(deps.storage, &schedule, pool_id, weight, env.block.height)?;

    Ok(Response::new()
        .add_attribute("action", "set_weight")
        .add_attribute("pool_id", pool_id.to_string())
        .add_attribute("old_weight", old_weight.to_string())
        .add_attribute("new_weight", weight.to_string()))
}

pub fn execute_update_pool(
    deps: DepsMut,
    env: Env,
    pool_id: u64,
) -> Result<Response, ContractError> {
    let schedule = SCHEDULE.load(deps.storage)?;
    let mut pool = load_pool(deps.storage, pool_id)?;
    let reward = update_pool(deps.storage, &schedule, &mut pool, env.block.height)?;
    POOLS.save(deps.storage, pool_id, &pool)?;

    Ok(Response::new()
        .add_attribute("action", "update_pool")
        .add_attribute("pool_id", pool_id.to_string())
        .add_attribute("reward", reward)
        .add_attribute("acc_reward_per_share", pool.acc_reward_per_share.to_string())
        .add_attribute("last_reward_block", pool.last_reward_block.to_string()))
}

pub fn execute_mass_update_pools(deps: DepsMut, env: Env) -> Result<Response, ContractError> {
    let schedule = SCHEDULE.load(deps.storage)?;
    let count = update_all_pools(deps.storage, &schedule, env.block.height)?;

    Ok(Response::new()
        .add_attribute("action", "mass_update_pools")
        .add_attribute("pools", count.to_string()))
}

pub fn execute_receive(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    wrapper: Cw20ReceiveMsg,
) -> Result<Response, ContractError> {
    let msg: ReceiveMsg = from_json(&wrapper.msg)?;
    let sender = deps.api.addr_validate(&wrapper.sender)?;
    let token = CheckedDenom::Cw20(info.sender);
    match msg {
        ReceiveMsg::Deposit { pool_id } => {
            if load_pool(deps.storage, pool_id)?.deposit_token != token {
                return Err(ContractError::InvalidCw20 {});
            }
            execute_deposit(deps, env, sender, pool_id, wrapper.amount)
        }
        ReceiveMsg::Fund {} => {
            if SCHEDULE.load(deps.storage)?.reward_token != token {
                return Err(ContractError::InvalidCw20 {});
            }
            execute_fund(deps, sender, wrapper.amount)
        }
    }
}

pub fn execute_deposit_native(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    pool_id: u64,
) -> Result<Response, ContractError> {
    let amount = match load_pool(deps.storage, pool_id)?.deposit_token {
        CheckedDenom::Native(denom) => cw_utils::must_pay(&info, &denom)?,
        CheckedDenom::Cw20(_) => return Err(ContractError::InvalidFunds {}),
    };
    execute_deposit(deps, env, info.sender, pool_id, amount)
}

pub fn execute_deposit(
    deps: DepsMut,
    env: Env,
    user: Addr,
    pool_id: u64,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let schedule = SCHEDULE.load(deps.storage)?;
    let mut ledger = StakeLedger::open(
        deps.storage,
        &schedule,
        pool_id,
        user.clone(),
        env.block.height,
    )?;
    let reward = ledger.deposit(amount)?;
    let staked = ledger.stake.staked;
    ledger.commit(deps.storage)?;

    Ok(Response::new()
        .add_messages(payout_msgs(&user, reward, &schedule.reward_token)?)
        .add_attribute("action", "deposit")
        .add_attribute("pool_id", pool_id.to_string())
        .add_attribute("user", user)
        .add_attribute("amount", amount)
        .add_attribute("staked", staked)
        .add_attribute("reward", reward))
}

pub fn execute_withdraw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    pool_id: u64,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let schedule = SCHEDULE.load(deps.storage)?;
    let mut ledger = StakeLedger::open(
        deps.storage,
        &schedule,
        pool_id,
        info.sender.clone(),
        env.block.height,
    )?;
    let reward = ledger.withdraw(amount)?;
    let staked = ledger.stake.staked;
    let deposit_token = ledger.pool.deposit_token.clone();
    ledger.commit(deps.storage)?;

    Ok(Response::new()
        .add_message(deposit_token.get_transfer_to_message(&info.sender, amount)?)
        .add_messages(payout_msgs(&info.sender, reward, &schedule.reward_token)?)
        .add_attribute("action", "withdraw")
        .add_attribute("pool_id", pool_id.to_string())
        .add_attribute("user", info.sender)
        .add_attribute("amount", amount)
        .add_attribute("staked", staked)
        .add_attribute("reward", reward))
}

pub fn execute_harvest(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    pool_id: u64,
) -> Result<Response, ContractError> {
    let schedule = SCHEDULE.load(deps.storage)?;
    let mut ledger = StakeLedger::open(
        deps.storage,
        &schedule,
        pool_id,
        info.sender.clone(),
        env.block.height,
    )?;
    let reward = ledger.harvest()?;
    let unclaimed = ledger.stake.unclaimed;
    ledger.commit(deps.storage)?;

    Ok(Response::new()
        .add_messages(payout_msgs(&info.sender, reward, &schedule.reward_token)?)
        .add_attribute("action", "harvest")
        .add_attribute("pool_id", pool_id.to_string())
        .add_attribute("user", info.sender)
        .add_attribute("reward", reward)
        .add_attribute("unclaimed", unclaimed))
}

pub fn execute_emergency_withdraw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    pool_id: u64,
) -> Result<Response, ContractError> {
    let schedule = SCHEDULE.load(deps.storage)?;
    let mut ledger = StakeLedger::open(
        deps.storage,
        &schedule,
        pool_id,
        info.sender.clone(),
        env.block.height,
    )?;
    let amount = ledger.emergency_withdraw()?;
    let deposit_token = ledger.pool.deposit_token.clone();
    ledger.commit(deps.storage)?;

    Ok(Response::new()
        .add_message(deposit_token.get_transfer_to_message(&info.sender, amount)?)
        .add_attribute("action", "emergency_withdraw")
        .add_attribute("pool_id", pool_id.to_string())
        .add_attribute("user", info.sender)
        .add_attribute("amount", amount))
}

pub fn execute_fund_native(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    match SCHEDULE.load(deps.storage)?.reward_token {
        CheckedDenom::Native(denom) => {
            let amount = cw_utils::must_pay(&info, &denom)?;
            execute_fund(deps, info.sender, amount)
        }
        CheckedDenom::Cw20(_) => Err(ContractError::InvalidFunds {}),
    }
}

pub fn execute_fund(
    deps: DepsMut,
    sender: Addr,
    amount: Uint128,
) -> Result<Response, ContractError> {
    cw_ownable::assert_owner(deps.storage, &sender)?;

    let reserve = REWARD_RESERVE.load(deps.storage)?.checked_add(amount)?;
    REWARD_RESERVE.save(deps.storage, &reserve)?;

    Ok(Response::new()
        .add_attribute("action", "fund")
        .add_attribute("amount", amount)
        .add_attribute("reserve", reserve))
}

pub fn execute_claim_dev_rewards(
    deps: DepsMut,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let schedule = SCHEDULE.load(deps.storage)?;
    if info.sender != schedule.dev_address {
        return Err(ContractError::NotDev {});
    }

    let pending = DEV_REWARDS.load(deps.storage)?;
    let reserve = REWARD_RESERVE.load(deps.storage)?;
    let paid = min(pending, reserve);
    DEV_REWARDS.save(deps.storage, &(pending - paid))?;
    REWARD_RESERVE.save(deps.storage, &(reserve - paid))?;

    Ok(Response::new()
        .add_messages(payout_msgs(&info.sender, paid, &schedule.reward_token)?)
        .add_attribute("action", "claim_dev_rewards")
        .add_attribute("dev_reward", paid)
        .add_attribute("unclaimed", pending - paid))
}

pub fn execute_update_owner(
    deps: DepsMut,
    info: MessageInfo,
    env: Env,
    action: cw_ownable::Action,
) -> Result<Response, ContractError> {
    let ownership = cw_ownable::update_ownership(deps, &env.block, &info.sender, action)?;
    Ok(Response::default().add_attributes(ownership.into_attributes()))
}

/// Bank sends of zero fail, so an empty payout sends nothing.
fn payout_msgs(
    recipient: &Addr,
    amount: Uint128,
    token: &CheckedDenom,
) -> StdResult<Vec<CosmosMsg>> {
    if amount.is_zero() {
        return Ok(vec![]);
    }
    Ok(vec![token.get_transfer_to_message(recipient, amount)?])
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Info {} => to_json_binary(&query_info(deps)?),
        QueryMsg::Pool { pool_id } => to_json_binary(&query_pool(deps, pool_id)?),
        QueryMsg::ListPools { start_after, limit } => {
            to_json_binary(&query_list_pools(deps, start_after, limit)?)
        }
        QueryMsg::Stake { pool_id, address } => {
            to_json_binary(&query_stake(deps, pool_id, address)?)
        }
        QueryMsg::ListStakers {
            pool_id,
            start_after,
            limit,
        } => to_json_binary(&query_list_stakers(deps, pool_id, start_after, limit)?),
        QueryMsg::PendingReward { pool_id, address } => {
            to_json_binary(&query_pending_reward(deps, env, pool_id, address)?)
        }
        QueryMsg::RewardAt { height } => {
            to_json_binary(&SCHEDULE.load(deps.storage)?.reward_at(height))
        }
        QueryMsg::TotalWeight {} => to_json_binary(&total_weight(deps.storage)?),
        QueryMsg::Ownership {} => to_json_binary(&cw_ownable::get_ownership(deps.storage)?),
    }
}

pub fn query_info(deps: Deps) -> StdResult<InfoResponse> {
    Ok(InfoResponse {
        schedule: SCHEDULE.load(deps.storage)?,
        pool_count: POOL_COUNT.load(deps.storage)?,
        total_weight: total_weight(deps.storage)?,
        reward_reserve: REWARD_RESERVE.load(deps.storage)?,
        dev_rewards: DEV_REWARDS.load(deps.storage)?,
    })
}

pub fn query_pool(deps: Deps, pool_id: u64) -> StdResult<Pool> {
    load_pool(deps.storage, pool_id).map_err(|err| StdError::generic_err(err.to_string()))
}

pub fn query_list_pools(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<ListPoolsResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let pools = paginate_map_values(deps, &POOLS, start_after, Some(limit), Order::Ascending)?;
    Ok(ListPoolsResponse { pools })
}

pub fn query_stake(deps: Deps, pool_id: u64, address: String) -> StdResult<StakeResponse> {
    let address = deps.api.addr_validate(&address)?;
    let stake = STAKES
        .may_load(deps.storage, (pool_id, &address))?
        .unwrap_or_default();
    Ok(StakeResponse {
        pool_id,
        address,
        staked: stake.staked,
        reward_debt: stake.reward_debt,
        unclaimed: stake.unclaimed,
    })
}

pub fn query_list_stakers(
    deps: Deps,
    pool_id: u64,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<ListStakersResponse> {
    let start_after = start_after
        .map(|addr| deps.api.addr_validate(&addr))
        .transpose()?;
    // the empty address sorts before every staker of the pool.
    let pool_start = Addr::unchecked("");
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let stakers = paginate_map(
        deps,
        &STAKES,
        Some((pool_id, start_after.as_ref().unwrap_or(&pool_start))),
        Some(limit),
        Order::Ascending,
    )?
    .into_iter()
    .take_while(|((id, _), _)| *id == pool_id)
    .map(|((_, address), stake)| StakeResponse {
        pool_id,
        address,
        staked: stake.staked,
        reward_debt: stake.reward_debt,
        unclaimed: stake.unclaimed,
    })
    .collect();
    Ok(ListStakersResponse { stakers })
}

pub fn query_pending_reward(
    deps: Deps,
    env: Env,
    pool_id: u64,
    address: String,
) -> StdResult<PendingRewardResponse> {
    let address = deps.api.addr_validate(&address)?;
    let schedule = SCHEDULE.load(deps.storage)?;
    let mut pool = query_pool(deps, pool_id)?;
    // accrue a copy, storage is left untouched.
    pool.accrue(&schedule, total_weight(deps.storage)?, env.block.height)?;
    let stake = STAKES
        .may_load(deps.storage, (pool_id, &address))?
        .unwrap_or_default();
    Ok(PendingRewardResponse {
        pool_id,
        address,
        pending_reward: stake.pending(&pool)?.checked_add(stake.unclaimed)?,
        reward_token: schedule.reward_token,
        last_reward_block: pool.last_reward_block,
    })
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, msg: MigrateMsg) -> Result<Response, ContractError> {
    let ContractVersion { version, .. } = get_contract_version(deps.storage)?;
    match msg {
        MigrateMsg::FromCompatible {} => {
            if version == CONTRACT_VERSION {
                return Err(ContractError::AlreadyMigrated {});
            }
            set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
            Ok(Response::new()
                .add_attribute("action", "migrate")
                .add_attribute("from_version", version)
                .add_attribute("to_version", CONTRACT_VERSION))
        }
    }
}
