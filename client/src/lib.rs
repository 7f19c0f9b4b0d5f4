pub mod airdrop;
pub mod eth;
pub mod stake;

mod errors;
pub use errors::*;

#[cfg(test)]
mod mock;
