use clap::Parser;
use htk_primitives::utils::short_address;

use crate::service::{ServiceError, Services};

#[derive(Debug, Clone, Parser)]
/// A command taking a token amount. ex) `12.5`
pub struct AmountCmd {
	/// The amount in whole tokens. Fractions up to the token's decimals are accepted.
	pub amount: String,
}

impl AmountCmd {
	pub async fn stake(&self, services: &Services) -> Result<(), ServiceError> {
		services.stake.load().await?;
		let view = services.stake.stake(&self.amount).await?;
		println!("Staked {} tokens. {}", self.amount.trim(), view);
		Ok(())
	}

	pub async fn withdraw(&self, services: &Services) -> Result<(), ServiceError> {
		services.stake.load().await?;
		let view = services.stake.withdraw(&self.amount).await?;
		println!("Withdrew {} tokens. {}", self.amount.trim(), view);
		Ok(())
	}
}

/// Prints the balances of the connected account.
pub async fn balances(services: &Services) -> Result<(), ServiceError> {
	let view = services.stake.load().await?;
	println!("{} | {}", short_address(&services.session.account), view);
	Ok(())
}
