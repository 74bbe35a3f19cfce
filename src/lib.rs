//! Solutions to the [Capture the Ether](https://capturetheether.com) challenges.
//!
//! Each challenge is an intentionally vulnerable contract deployed on Ropsten;
//! a solution attaches to the player's instance, computes the exploit payload
//! off-chain, submits the transactions in order and verifies the contract's
//! `isComplete()` flag flipped to `true`.
//!
//! The pure computations (key recovery, storage slot arithmetic, overflow
//! searches) live in their own modules so they are testable without a node;
//! the on-chain choreography lives under [`challenges`].

pub mod artifacts;
pub mod challenges;
pub mod ecdsa;
pub mod opts;
pub mod overflow;
pub mod runner;
pub mod slots;
pub mod utils;
pub mod vanity;

pub use challenges::Challenge;
pub use runner::Ctx;
