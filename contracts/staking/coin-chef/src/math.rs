use std::convert::TryInto;

use cosmwasm_std::{StdResult, Uint128, Uint256};

/// Fixed point scale of a pool's accumulated reward per staked
/// token. Per-share values are stored multiplied by this factor so
/// that fractions of a token survive integer division.
pub const PRECISION: u128 = 1_000_000_000_000;

pub(crate) fn precision() -> Uint256 {
    Uint256::from(PRECISION)
}

/// Computes the part of `emitted` that belongs to a pool.
///
/// # Arguments
///
/// * `emitted` - Rewards released by the schedule over some block range.
/// * `weight` - The pool's weight.
/// * `total_weight` - Sum of the weights of every pool.
///
/// Division truncates. A registry with no weight emits nothing.
pub fn weighted_share(emitted: Uint128, weight: u64, total_weight: u64) -> StdResult<Uint128> {
    if weight == 0 || total_weight == 0 {
        return Ok(Uint128::zero());
    }
    // weight <= total_weight so the result never exceeds `emitted`
    // and always fits back into a u128.
    let share = emitted
        .full_mul(Uint128::from(weight))
        .checked_div(Uint256::from(total_weight))?;
    Ok(share.try_into()?)
}

/// Computes how much `reward` adds to the per-share accumulator of a
/// pool holding `total_staked` tokens. Errors if `total_staked` is
/// zero; callers skip the update in that case.
pub fn reward_per_share(reward: Uint128, total_staked: Uint128) -> StdResult<Uint256> {
    Ok(reward
        .full_mul(Uint128::new(PRECISION))
        .checked_div(Uint256::from(total_staked))?)
}

/// Converts growth of a per-share accumulator back into a token amount
/// for a stake of `staked` tokens, truncating any fractional remainder.
///
/// `acc_growth` must only cover the period `staked` was held for. The
/// result is then bounded by the rewards emitted to the pool over that
/// period, however small the pool's stake was at times.
pub fn accrued_reward(staked: Uint128, acc_growth: Uint256) -> StdResult<Uint128> {
    Ok(Uint256::from(staked)
        .checked_mul(acc_growth)?
        .checked_div(precision())?
        .try_into()?)
}

#[cfg(test)]
mod tests {
    use cosmwasm_std::StdError;

    use super::*;

    #[test]
    fn test_weighted_share() {
        let emitted = Uint128::new(50);
        assert_eq!(weighted_share(emitted, 50, 100).unwrap(), Uint128::new(25));
        assert_eq!(weighted_share(emitted, 100, 100).unwrap(), emitted);
        // 50 * 1 / 3 = 16.66..
        assert_eq!(weighted_share(emitted, 1, 3).unwrap(), Uint128::new(16));
    }

    #[test]
    fn test_weighted_share_with_zeros() {
        let emitted = Uint128::new(50);
        assert_eq!(weighted_share(emitted, 0, 100).unwrap(), Uint128::zero());
        assert_eq!(weighted_share(emitted, 0, 0).unwrap(), Uint128::zero());
    }

    #[test]
    fn test_weighted_share_no_overflow() {
        let emitted = Uint128::MAX;
        let overflows_naively = emitted.checked_mul(Uint128::from(u64::MAX)).is_err();
        assert!(overflows_naively);

        assert_eq!(
            weighted_share(emitted, u64::MAX, u64::MAX).unwrap(),
            Uint128::MAX
        );
    }

    #[test]
    fn test_reward_per_share_divide_by_zero() {
        let err = reward_per_share(Uint128::new(10), Uint128::zero()).unwrap_err();
        assert!(matches!(err, StdError::DivideByZero { .. }));
    }

    #[test]
    fn test_accrued_reward_truncates() {
        // 10 reward over 3 staked tokens.
        let acc = reward_per_share(Uint128::new(10), Uint128::new(3)).unwrap();
        assert_eq!(acc, Uint256::from(3_333_333_333_333u128));
        assert_eq!(accrued_reward(Uint128::new(1), acc).unwrap(), Uint128::new(3));
        assert_eq!(accrued_reward(Uint128::new(3), acc).unwrap(), Uint128::new(9));
    }

    #[test]
    fn test_accrued_reward_over_growth_after_tiny_stake() {
        // a single staked token inflates the accumulator to 10^31.
        let reward = Uint128::new(10u128.pow(19));
        let acc = reward_per_share(reward, Uint128::one()).unwrap();
        let large = Uint128::new(10u128.pow(20));
        assert!(accrued_reward(large, acc).is_err());

        // only the growth while `large` is staked is converted.
        let growth = reward_per_share(reward, large + Uint128::one()).unwrap();
        let after = acc + growth;
        assert_eq!(
            accrued_reward(large, after - acc).unwrap(),
            Uint128::new(9_999_999_999_900_000_000)
        );
    }

    #[test]
    fn test_accrued_reward_never_exceeds_reward() {
        for (reward, staked) in [(1u128, 7u128), (999, 1000), (10, 3), (1, 1_000_000_000_000_000)] {
            let reward = Uint128::new(reward);
            let staked = Uint128::new(staked);
            let acc = reward_per_share(reward, staked).unwrap();
            let accrued = accrued_reward(staked, acc).unwrap();
            assert!(accrued <= reward);
            // the per-update loss is less than total_staked / PRECISION
            // of a token, plus the final truncation.
            let bound = staked.u128() / PRECISION + 1;
            assert!(reward.u128() - accrued.u128() <= bound);
        }
    }
}
