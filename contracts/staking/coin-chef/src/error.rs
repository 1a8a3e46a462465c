use cosmwasm_std::{CheckedMultiplyFractionError, OverflowError, StdError, Uint128};
use cw_denom::DenomError;
use cw_utils::PaymentError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error(transparent)]
    Std(#[from] StdError),

    #[error(transparent)]
    Ownable(#[from] cw_ownable::OwnershipError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Denom(#[from] DenomError),

    #[error(transparent)]
    Overflow(#[from] OverflowError),

    #[error(transparent)]
    CheckedMultiplyFraction(#[from] CheckedMultiplyFractionError),

    #[error("A pool already exists for deposit token {token}")]
    DuplicateToken { token: String },

    #[error("Pool not found with ID {pool_id}")]
    UnknownPool { pool_id: u64 },

    #[error("Can not withdraw {requested} when only {staked} is staked")]
    InsufficientStake { staked: Uint128, requested: Uint128 },

    #[error("Amount must be greater than zero")]
    InvalidAmount {},

    #[error("Nothing staked in pool {pool_id}")]
    NothingStaked { pool_id: u64 },

    #[error("Reward per block can not be zero")]
    ZeroRewardPerBlock {},

    #[error("Start block {start_block} is before the current block {current_block}")]
    StartBlockInPast { start_block: u64, current_block: u64 },

    #[error("Dev share can not be greater than one")]
    InvalidDevShare {},

    #[error("Invalid Cw20")]
    InvalidCw20 {},

    #[error("Invalid funds")]
    InvalidFunds {},

    #[error("Only the dev address may claim dev rewards")]
    NotDev {},

    #[error("can not migrate. current version is up to date")]
    AlreadyMigrated {},
}
