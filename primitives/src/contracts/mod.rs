pub mod airdrop;
pub mod erc20;
pub mod staking;
