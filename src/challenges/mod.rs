//! The challenge procedures, one per Capture the Ether level.

pub mod accounts;
pub mod lotteries;
pub mod math;
pub mod misc;
pub mod warmup;

use crate::runner::Ctx;
use alloy_primitives::{address, Address};
use clap::ValueEnum;
use eyre::Result;

/// All solved challenges, in site order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Challenge {
    CallMe,
    Nickname,
    GuessTheNumber,
    GuessTheSecretNumber,
    GuessTheRandomNumber,
    GuessTheNewNumber,
    PredictTheFuture,
    PredictTheBlockhash,
    TokenSale,
    TokenWhale,
    RetirementFund,
    Mapping,
    Donation,
    FiftyYears,
    PublicKey,
    AccountTakeover,
    FuzzyIdentity,
    AssumeOwnership,
    TokenBank,
}

impl Challenge {
    /// The instance this suite was originally solved against (instances are
    /// deployed per player; override with `--target`).
    pub fn default_target(&self) -> Address {
        match self {
            Self::CallMe => address!("0x7e53cBe1AE1D8BCc1e4273ED31eb61bC4513C509"),
            Self::Nickname => address!("0x71c46Ed333C35e4E6c62D32dc7C8F00D125b4fee"),
            Self::GuessTheNumber => address!("0xbF174B38891Bce42E75581f2c55dDD46a1831eDB"),
            Self::GuessTheSecretNumber => address!("0x92e077E6df89B7019954a5a583D76C642a37739D"),
            Self::GuessTheRandomNumber => address!("0x186a8b89Ed6451103b11ECcC30540C440108334f"),
            Self::GuessTheNewNumber => address!("0x93c69C5aFAF1E306DD193B9CE3BF1c9eb70857c7"),
            Self::PredictTheFuture => address!("0x7D6dcd6Cad6c081095663C063439Fec38089a5A2"),
            Self::PredictTheBlockhash => address!("0x7034F8d94eDdcDC13bbD191537594Cc3B9D186e3"),
            Self::TokenSale => address!("0xe8A4E7F02498432a41D60DBdB65394286e2003B1"),
            Self::TokenWhale => address!("0xEcF35a2266BCd5dd1aA6061350F6ef20f508d2bC"),
            Self::RetirementFund => address!("0x92225cCBD11A952e83A4DA42cC50f42BFfa961A4"),
            Self::Mapping => address!("0xc30168e1b42A81936EfAC8e88964E57a88735e13"),
            Self::Donation => address!("0xd46Bf78494E6C15deE40Da3A89317433B263294d"),
            Self::FiftyYears => address!("0x89dc1782C7BE0C91d28FE8Dc33a06e79a43BA2E7"),
            Self::PublicKey => address!("0x66d0abcD3267338C26E4B97250A1295C1aA867fD"),
            Self::AccountTakeover => address!("0x87F4258A257E4f54878fa77A1d534B1dC1Addd99"),
            Self::FuzzyIdentity => address!("0x16d20B998E593eaFffB676f9F5923B1E2173234B"),
            Self::AssumeOwnership => address!("0x5845030FAA1E04D794FE219a1A956b05b86Fcc3d"),
            Self::TokenBank => address!("0xD7FA2C15883faddFB7609fdb1D49175327Cd4Bb0"),
        }
    }

    /// Runs the exploit against `target` and verifies completion.
    pub async fn solve(&self, ctx: &Ctx, target: Address) -> Result<()> {
        match self {
            Self::CallMe => warmup::call_me(ctx, target).await,
            Self::Nickname => warmup::nickname(ctx, target).await,
            Self::GuessTheNumber => lotteries::guess_the_number(ctx, target).await,
            Self::GuessTheSecretNumber => lotteries::guess_the_secret_number(ctx, target).await,
            Self::GuessTheRandomNumber => lotteries::guess_the_random_number(ctx, target).await,
            Self::GuessTheNewNumber => lotteries::guess_the_new_number(ctx, target).await,
            Self::PredictTheFuture => lotteries::predict_the_future(ctx, target).await,
            Self::PredictTheBlockhash => lotteries::predict_the_blockhash(ctx, target).await,
            Self::TokenSale => math::token_sale(ctx, target).await,
            Self::TokenWhale => math::token_whale(ctx, target).await,
            Self::RetirementFund => math::retirement_fund(ctx, target).await,
            Self::Mapping => math::mapping(ctx, target).await,
            Self::Donation => math::donation(ctx, target).await,
            Self::FiftyYears => math::fifty_years(ctx, target).await,
            Self::PublicKey => accounts::public_key(ctx, target).await,
            Self::AccountTakeover => accounts::account_takeover(ctx, target).await,
            Self::FuzzyIdentity => accounts::fuzzy_identity(ctx, target).await,
            Self::AssumeOwnership => misc::assume_ownership(ctx, target).await,
            Self::TokenBank => misc::token_bank(ctx, target).await,
        }
    }
}

/// Fails unless the challenge reports itself complete.
pub(crate) fn verify_complete(is_complete: bool) -> Result<()> {
    eyre::ensure!(is_complete, "challenge still reports isComplete() == false");
    tracing::info!("challenge complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_enum_names_are_kebab_case() {
        let value = Challenge::GuessTheSecretNumber.to_possible_value().unwrap();
        assert_eq!(value.get_name(), "guess-the-secret-number");
        let value = Challenge::CallMe.to_possible_value().unwrap();
        assert_eq!(value.get_name(), "call-me");
    }

    #[test]
    fn verify_complete_rejects_false() {
        assert!(verify_complete(false).is_err());
        assert!(verify_complete(true).is_ok());
    }
}
