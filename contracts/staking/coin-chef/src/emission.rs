use std::cmp::max;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Decimal, StdResult, Uint128};
use cw_denom::CheckedDenom;

use crate::ContractError;

/// The global reward emission shared by every pool. Built once at
/// instantiation and never modified afterwards.
#[cw_serde]
pub struct EmissionSchedule {
    /// token paid out as rewards
    pub reward_token: CheckedDenom,
    /// receives `dev_share` on top of every reward emitted to a pool
    pub dev_address: Addr,
    pub dev_share: Decimal,
    pub reward_per_block: Uint128,
    /// no rewards are emitted for blocks before this height
    pub start_block: u64,
}

impl EmissionSchedule {
    pub fn new(
        reward_token: CheckedDenom,
        dev_address: Addr,
        dev_share: Decimal,
        reward_per_block: Uint128,
        start_block: u64,
        current_block: u64,
    ) -> Result<Self, ContractError> {
        if reward_per_block.is_zero() {
            return Err(ContractError::ZeroRewardPerBlock {});
        }
        if start_block < current_block {
            return Err(ContractError::StartBlockInPast {
                start_block,
                current_block,
            });
        }
        if dev_share > Decimal::one() {
            return Err(ContractError::InvalidDevShare {});
        }
        Ok(Self {
            reward_token,
            dev_address,
            dev_share,
            reward_per_block,
            start_block,
        })
    }

    /// Rewards emitted by the block at `height`.
    pub fn reward_at(&self, height: u64) -> Uint128 {
        if height >= self.start_block {
            self.reward_per_block
        } else {
            Uint128::zero()
        }
    }

    /// Total rewards emitted by the blocks in `[from, to)`. Blocks
    /// before `start_block` emit nothing.
    pub fn reward_between(&self, from: u64, to: u64) -> StdResult<Uint128> {
        let from = max(from, self.start_block);
        if to <= from {
            return Ok(Uint128::zero());
        }
        Ok(self.reward_per_block.checked_mul(Uint128::from(to - from))?)
    }

    /// The block a newly registered pool starts accruing from.
    pub fn first_reward_block(&self, current_block: u64) -> u64 {
        max(current_block, self.start_block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(start_block: u64) -> EmissionSchedule {
        EmissionSchedule::new(
            CheckedDenom::Native("ureward".to_string()),
            Addr::unchecked("dev"),
            Decimal::percent(10),
            Uint128::new(10),
            start_block,
            0,
        )
        .unwrap()
    }

    #[test]
    fn test_construction_validation() {
        let err = EmissionSchedule::new(
            CheckedDenom::Native("ureward".to_string()),
            Addr::unchecked("dev"),
            Decimal::zero(),
            Uint128::zero(),
            10,
            0,
        )
        .unwrap_err();
        assert_eq!(err, ContractError::ZeroRewardPerBlock {});

        let err = EmissionSchedule::new(
            CheckedDenom::Native("ureward".to_string()),
            Addr::unchecked("dev"),
            Decimal::zero(),
            Uint128::new(1),
            10,
            11,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ContractError::StartBlockInPast {
                start_block: 10,
                current_block: 11
            }
        );

        let err = EmissionSchedule::new(
            CheckedDenom::Native("ureward".to_string()),
            Addr::unchecked("dev"),
            Decimal::percent(101),
            Uint128::new(1),
            10,
            10,
        )
        .unwrap_err();
        assert_eq!(err, ContractError::InvalidDevShare {});
    }

    #[test]
    fn test_reward_at() {
        let schedule = schedule(100);
        assert_eq!(schedule.reward_at(0), Uint128::zero());
        assert_eq!(schedule.reward_at(99), Uint128::zero());
        assert_eq!(schedule.reward_at(100), Uint128::new(10));
        assert_eq!(schedule.reward_at(u64::MAX), Uint128::new(10));
    }

    #[test]
    fn test_reward_between() {
        let schedule = schedule(100);
        assert_eq!(schedule.reward_between(0, 50).unwrap(), Uint128::zero());
        assert_eq!(schedule.reward_between(0, 100).unwrap(), Uint128::zero());
        assert_eq!(schedule.reward_between(90, 105).unwrap(), Uint128::new(50));
        assert_eq!(schedule.reward_between(100, 110).unwrap(), Uint128::new(100));
        assert_eq!(schedule.reward_between(110, 110).unwrap(), Uint128::zero());
        assert_eq!(schedule.reward_between(120, 110).unwrap(), Uint128::zero());
    }

    #[test]
    fn test_first_reward_block() {
        let schedule = schedule(100);
        assert_eq!(schedule.first_reward_block(5), 100);
        assert_eq!(schedule.first_reward_block(150), 150);
    }
}
