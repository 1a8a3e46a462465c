use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Decimal, Uint128, Uint256};
use cw20::Cw20ReceiveMsg;
use cw_denom::{CheckedDenom, UncheckedDenom};
use cw_ownable::cw_ownable_execute;

use crate::emission::EmissionSchedule;
use crate::state::Pool;

// so that consumers don't need a cw_ownable dependency to consume
// this contract's queries.
pub use cw_ownable::Ownership;

#[cw_serde]
pub struct InstantiateMsg {
    /// The owner of the contract. Is able to add pools, change their
    /// weights and fund rewards.
    pub owner: Option<String>,
    /// The token rewards are paid out in.
    pub reward_token: UncheckedDenom,
    /// Receives `dev_share` of every reward emitted to a pool.
    pub dev_address: String,
    /// Fraction of pool rewards credited to the dev address on top of
    /// what stakers earn. Must not exceed one.
    pub dev_share: Decimal,
    /// Rewards emitted per block, split between pools by weight.
    pub reward_per_block: Uint128,
    /// The height emissions start at. Must not be in the past.
    pub start_block: u64,
}

#[cw_ownable_execute]
#[cw_serde]
pub enum ExecuteMsg {
    /// Creates a pool for a token that does not have one yet.
    AddPool {
        deposit_token: UncheckedDenom,
        weight: u64,
    },
    /// Changes a pool's share of emissions. Only affects rewards from
    /// the current block on.
    SetWeight { pool_id: u64, weight: u64 },
    /// Accrues a pool's rewards up to the current block.
    UpdatePool { pool_id: u64 },
    /// Accrues every pool's rewards up to the current block.
    MassUpdatePools {},
    /// Stakes the native tokens sent with this message.
    Deposit { pool_id: u64 },
    /// Unstakes `amount` and pays out pending rewards.
    Withdraw { pool_id: u64, amount: Uint128 },
    /// Pays out pending rewards.
    Harvest { pool_id: u64 },
    /// Unstakes everything and forfeits pending rewards.
    EmergencyWithdraw { pool_id: u64 },
    /// Used to deposit cw20 tokens and to fund cw20 rewards.
    Receive(Cw20ReceiveMsg),
    /// Adds the native reward tokens sent with this message to the
    /// reward reserve.
    Fund {},
    /// Pays the rewards accrued to the dev address.
    ClaimDevRewards {},
}

#[cw_serde]
pub enum ReceiveMsg {
    /// Stakes the received cw20 tokens.
    Deposit { pool_id: u64 },
    /// Adds the received cw20 tokens to the reward reserve.
    Fund {},
}

#[cw_serde]
pub enum MigrateMsg {
    FromCompatible {},
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Returns the emission schedule and global accounting.
    #[returns(InfoResponse)]
    Info {},
    #[returns(Pool)]
    Pool { pool_id: u64 },
    #[returns(ListPoolsResponse)]
    ListPools {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(StakeResponse)]
    Stake { pool_id: u64, address: String },
    #[returns(ListStakersResponse)]
    ListStakers {
        pool_id: u64,
        start_after: Option<String>,
        limit: Option<u32>,
    },
    /// Returns the rewards `address` would receive from harvesting
    /// `pool_id` at the current block.
    #[returns(PendingRewardResponse)]
    PendingReward { pool_id: u64, address: String },
    /// Returns the rewards emitted by the block at `height`.
    #[returns(Uint128)]
    RewardAt { height: u64 },
    /// Returns the sum of all pool weights.
    #[returns(u64)]
    TotalWeight {},
    #[returns(::cw_ownable::Ownership<::cosmwasm_std::Addr>)]
    Ownership {},
}

#[cw_serde]
pub struct InfoResponse {
    pub schedule: EmissionSchedule,
    pub pool_count: u64,
    pub total_weight: u64,
    pub reward_reserve: Uint128,
    pub dev_rewards: Uint128,
}

#[cw_serde]
pub struct ListPoolsResponse {
    pub pools: Vec<Pool>,
}

#[cw_serde]
pub struct StakeResponse {
    pub pool_id: u64,
    pub address: Addr,
    pub staked: Uint128,
    pub reward_debt: Uint256,
    pub unclaimed: Uint128,
}

#[cw_serde]
pub struct ListStakersResponse {
    pub stakers: Vec<StakeResponse>,
}

#[cw_serde]
pub struct PendingRewardResponse {
    pub pool_id: u64,
    pub address: Addr,
    pub pending_reward: Uint128,
    pub reward_token: CheckedDenom,
    pub last_reward_block: u64,
}
