//! Small shared helpers.

pub mod fmt;
pub mod retry;

use alloy_primitives::U256;

/// `n` ether in wei.
pub fn ether(n: u64) -> U256 {
    U256::from(n) * U256::from(10u64).pow(U256::from(18u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ether_is_wei_times_1e18() {
        assert_eq!(ether(1), U256::from(10u64).pow(U256::from(18u64)));
        assert_eq!(ether(0), U256::ZERO);
        assert_eq!(ether(500_000), U256::from(500_000u64) * ether(1));
    }
}
