//! An in-memory ledger standing in for the token, staking and airdrop contracts.

use std::{
	collections::{HashMap, HashSet},
	sync::{
		atomic::{AtomicBool, Ordering},
		Mutex,
	},
};

use ethers::types::{Address, TxHash, U256};
use tokio::sync::Notify;

use crate::{
	errors::LedgerError,
	eth::{AirdropLedger, LedgerResult, StakingLedger, TokenLedger, TransactionTracker},
};

pub const DECIMALS: u8 = 18;

/// Returns `amount` whole tokens in the smallest unit.
pub fn tokens(amount: u64) -> U256 {
	U256::from(amount) * U256::exp10(DECIMALS as usize)
}

/// A remote call observed by the mock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
	Decimals,
	BalanceOf(Address),
	Allowance(Address, Address),
	Approve(Address, U256),
	StakedBalanceOf(Address),
	Stake(U256),
	Withdraw(U256),
	Owner,
	HasReceived(Address),
	Airdrop(Address),
	WaitForConfirmation(TxHash),
}

/// The state change a submitted transaction applies once confirmed.
#[derive(Clone, Debug)]
enum Effect {
	Approve(U256),
	Stake(U256),
	Withdraw(U256),
	Airdrop(Address),
}

impl Effect {
	fn method(&self) -> &'static str {
		match self {
			Effect::Approve(_) => "approve",
			Effect::Stake(_) => "stake",
			Effect::Withdraw(_) => "withdraw",
			Effect::Airdrop(_) => "airdrop",
		}
	}
}

#[derive(Default)]
struct LedgerState {
	wallet_balance: U256,
	staked_balance: U256,
	allowance: U256,
	owner: Address,
	received: HashSet<Address>,
	submitted: HashMap<TxHash, Effect>,
	nonce: u64,
}

pub struct MockLedger {
	account: Address,
	staking: Address,
	state: Mutex<LedgerState>,
	calls: Mutex<Vec<Call>>,
	/// Methods failing immediately with the given error.
	failures: Mutex<HashMap<&'static str, LedgerError>>,
	/// Methods whose transactions revert on confirmation.
	reverts: Mutex<HashSet<&'static str>>,
	/// Recipients whose airdrop transaction reverts on confirmation.
	reverted_recipients: Mutex<HashSet<Address>>,
	hold: AtomicBool,
	entered: Notify,
	gate: Notify,
}

impl MockLedger {
	pub fn new(account: Address) -> Self {
		Self {
			account,
			staking: Address::repeat_byte(0x5a),
			state: Mutex::new(LedgerState { owner: account, ..Default::default() }),
			calls: Mutex::new(vec![]),
			failures: Mutex::new(HashMap::new()),
			reverts: Mutex::new(HashSet::new()),
			reverted_recipients: Mutex::new(HashSet::new()),
			hold: AtomicBool::new(false),
			entered: Notify::new(),
			gate: Notify::new(),
		}
	}

	pub fn with_balance(self, amount: U256) -> Self {
		self.state.lock().unwrap().wallet_balance = amount;
		self
	}

	pub fn with_staked(self, amount: U256) -> Self {
		self.state.lock().unwrap().staked_balance = amount;
		self
	}

	pub fn with_allowance(self, amount: U256) -> Self {
		self.state.lock().unwrap().allowance = amount;
		self
	}

	pub fn with_owner(self, owner: Address) -> Self {
		self.state.lock().unwrap().owner = owner;
		self
	}

	pub fn with_received(self, account: Address) -> Self {
		self.state.lock().unwrap().received.insert(account);
		self
	}

	/// Makes every call of `method` fail with `error` before anything is submitted.
	pub fn failing(self, method: &'static str, error: LedgerError) -> Self {
		self.fail(method, error);
		self
	}

	pub fn fail(&self, method: &'static str, error: LedgerError) {
		self.failures.lock().unwrap().insert(method, error);
	}

	/// Makes every transaction of `method` revert on confirmation.
	pub fn reverting(self, method: &'static str) -> Self {
		self.reverts.lock().unwrap().insert(method);
		self
	}

	pub fn reverting_airdrop_for(self, recipient: Address) -> Self {
		self.reverted_recipients.lock().unwrap().insert(recipient);
		self
	}

	/// Parks every confirmation until [`MockLedger::release`] is called.
	pub fn holding_confirmations(self) -> Self {
		self.hold.store(true, Ordering::SeqCst);
		self
	}

	/// Resolves once a confirmation is parked.
	pub async fn confirmation_held(&self) {
		self.entered.notified().await;
	}

	pub fn release(&self) {
		self.hold.store(false, Ordering::SeqCst);
		self.gate.notify_one();
	}

	pub fn set_owner(&self, owner: Address) {
		self.state.lock().unwrap().owner = owner;
	}

	pub fn calls(&self) -> Vec<Call> {
		self.calls.lock().unwrap().clone()
	}

	/// Returns the recorded calls that submit a transaction.
	pub fn submissions(&self) -> Vec<Call> {
		self.calls()
			.into_iter()
			.filter(|call| {
				matches!(
					call,
					Call::Approve(..) | Call::Stake(_) | Call::Withdraw(_) | Call::Airdrop(_)
				)
			})
			.collect()
	}

	pub fn wallet_balance(&self) -> U256 {
		self.state.lock().unwrap().wallet_balance
	}

	pub fn has_received(&self, account: Address) -> bool {
		self.state.lock().unwrap().received.contains(&account)
	}

	fn record(&self, method: &'static str, call: Call) -> LedgerResult<()> {
		self.calls.lock().unwrap().push(call);
		match self.failures.lock().unwrap().get(method) {
			Some(error) => Err(error.clone()),
			None => Ok(()),
		}
	}

	fn submit(&self, effect: Effect) -> TxHash {
		let mut state = self.state.lock().unwrap();
		state.nonce += 1;
		let tx_hash = TxHash::from_low_u64_be(state.nonce);
		state.submitted.insert(tx_hash, effect);
		tx_hash
	}

	fn apply(&self, tx_hash: TxHash) -> LedgerResult<()> {
		let mut state = self.state.lock().unwrap();
		let effect = state.submitted.remove(&tx_hash).ok_or(LedgerError::Dropped(tx_hash))?;

		if self.reverts.lock().unwrap().contains(effect.method()) {
			return Err(LedgerError::Reverted(tx_hash));
		}
		match effect {
			Effect::Approve(amount) => state.allowance = amount,
			Effect::Stake(amount) => {
				if state.allowance < amount || state.wallet_balance < amount {
					return Err(LedgerError::Reverted(tx_hash));
				}
				state.allowance -= amount;
				state.wallet_balance -= amount;
				state.staked_balance += amount;
			},
			Effect::Withdraw(amount) => {
				if state.staked_balance < amount {
					return Err(LedgerError::Reverted(tx_hash));
				}
				state.staked_balance -= amount;
				state.wallet_balance += amount;
			},
			Effect::Airdrop(recipient) => {
				if state.received.contains(&recipient) ||
					self.reverted_recipients.lock().unwrap().contains(&recipient)
				{
					return Err(LedgerError::Reverted(tx_hash));
				}
				state.received.insert(recipient);
			},
		}
		Ok(())
	}
}

#[async_trait::async_trait]
impl TransactionTracker for MockLedger {
	async fn wait_for_confirmation(&self, tx_hash: TxHash) -> LedgerResult<()> {
		self.record("wait_for_confirmation", Call::WaitForConfirmation(tx_hash))?;
		if self.hold.load(Ordering::SeqCst) {
			self.entered.notify_one();
			self.gate.notified().await;
		}
		self.apply(tx_hash)
	}
}

#[async_trait::async_trait]
impl TokenLedger for MockLedger {
	async fn decimals(&self) -> LedgerResult<u8> {
		self.record("decimals", Call::Decimals)?;
		Ok(DECIMALS)
	}

	async fn balance_of(&self, account: Address) -> LedgerResult<U256> {
		self.record("balance_of", Call::BalanceOf(account))?;
		let state = self.state.lock().unwrap();
		Ok(if account == self.account { state.wallet_balance } else { U256::zero() })
	}

	async fn allowance(&self, owner: Address, spender: Address) -> LedgerResult<U256> {
		self.record("allowance", Call::Allowance(owner, spender))?;
		Ok(self.state.lock().unwrap().allowance)
	}

	async fn approve(&self, spender: Address, amount: U256) -> LedgerResult<TxHash> {
		self.record("approve", Call::Approve(spender, amount))?;
		Ok(self.submit(Effect::Approve(amount)))
	}
}

#[async_trait::async_trait]
impl StakingLedger for MockLedger {
	fn address(&self) -> Address {
		self.staking
	}

	async fn staked_balance_of(&self, account: Address) -> LedgerResult<U256> {
		self.record("staked_balance_of", Call::StakedBalanceOf(account))?;
		let state = self.state.lock().unwrap();
		Ok(if account == self.account { state.staked_balance } else { U256::zero() })
	}

	async fn stake(&self, amount: U256) -> LedgerResult<TxHash> {
		self.record("stake", Call::Stake(amount))?;
		Ok(self.submit(Effect::Stake(amount)))
	}

	async fn withdraw(&self, amount: U256) -> LedgerResult<TxHash> {
		self.record("withdraw", Call::Withdraw(amount))?;
		Ok(self.submit(Effect::Withdraw(amount)))
	}
}

#[async_trait::async_trait]
impl AirdropLedger for MockLedger {
	async fn owner(&self) -> LedgerResult<Address> {
		self.record("owner", Call::Owner)?;
		Ok(self.state.lock().unwrap().owner)
	}

	async fn has_received(&self, account: Address) -> LedgerResult<bool> {
		self.record("has_received", Call::HasReceived(account))?;
		Ok(self.state.lock().unwrap().received.contains(&account))
	}

	async fn airdrop(&self, recipient: Address) -> LedgerResult<TxHash> {
		self.record("airdrop", Call::Airdrop(recipient))?;
		Ok(self.submit(Effect::Airdrop(recipient)))
	}
}
