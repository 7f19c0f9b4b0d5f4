use ethers::types::Address;

/// The user facing confirmation gate of the wallet. Every account unlock and every transaction
/// passes through it before anything is signed.
#[async_trait::async_trait]
pub trait UserPrompt: Send + Sync {
	/// Asks whether the given account may be used on the given chain.
	async fn allow_account_access(&self, account: Address, chain_id: u64) -> bool;

	/// Asks whether the described transaction may be signed and submitted.
	async fn confirm_transaction(&self, description: &str) -> bool;
}

/// Approves every request without asking.
#[derive(Clone, Copy, Debug, Default)]
pub struct AutoApprove;

#[async_trait::async_trait]
impl UserPrompt for AutoApprove {
	async fn allow_account_access(&self, _account: Address, _chain_id: u64) -> bool {
		true
	}

	async fn confirm_transaction(&self, _description: &str) -> bool {
		true
	}
}
