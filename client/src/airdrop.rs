use std::{
	fmt::{Display, Formatter},
	sync::{
		atomic::{AtomicBool, Ordering},
		Arc,
	},
};

use ethers::types::Address;
use htk_primitives::{log_and_capture, sub_display_format, utils::parse_address};
use tokio::sync::{Mutex, RwLock};

use crate::{
	errors::{AirdropError, LedgerError},
	eth::AirdropLedger,
};

const SUB_LOG_TARGET: &str = "airdrop-coordinator";

/// The lifecycle of an [`AirdropCoordinator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AirdropState {
	Initializing,
	Ready,
	Submitting,
}

/// The result of a successful candidate proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CandidateOutcome {
	/// The address was appended to the pending list.
	Queued,
	/// The address was already pending. The list is unchanged.
	AlreadyPending,
}

/// The candidate a batch submission stopped at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailedCandidate {
	pub address: Address,
	pub error: LedgerError,
}

/// The progress of a batch submission.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AirdropReport {
	/// Recipients whose airdrop transaction has been confirmed.
	pub succeeded: Vec<Address>,
	pub failed: Option<FailedCandidate>,
	/// Recipients left untouched after the failure.
	pub not_attempted: Vec<Address>,
}

impl AirdropReport {
	pub fn is_complete(&self) -> bool {
		self.failed.is_none() && self.not_attempted.is_empty()
	}
}

impl Display for AirdropReport {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "succeeded: {}", self.succeeded.len())?;
		if let Some(failed) = &self.failed {
			write!(f, ", failed: {:?} ({})", failed.address, failed.error)?;
		}
		write!(f, ", not attempted: {}", self.not_attempted.len())
	}
}

/// Collects airdrop candidates and submits them as an admin-only sequential batch.
pub struct AirdropCoordinator<A> {
	/// The session account.
	account: Address,
	airdrop: Arc<A>,
	log_target: String,
	/// Whether the session account is the airdrop contract owner, as last queried.
	is_admin: AtomicBool,
	/// Unique candidates in proposal order.
	pending: RwLock<Vec<Address>>,
	state: RwLock<AirdropState>,
	write_lock: Mutex<()>,
}

impl<A: AirdropLedger> AirdropCoordinator<A> {
	pub fn new(account: Address, airdrop: Arc<A>, log_target: String) -> Self {
		Self {
			account,
			airdrop,
			log_target,
			is_admin: AtomicBool::new(false),
			pending: RwLock::new(vec![]),
			state: RwLock::new(AirdropState::Initializing),
			write_lock: Mutex::new(()),
		}
	}

	pub async fn state(&self) -> AirdropState {
		*self.state.read().await
	}

	pub fn is_admin(&self) -> bool {
		self.is_admin.load(Ordering::SeqCst)
	}

	/// Returns a snapshot of the pending candidates.
	pub async fn pending(&self) -> Vec<Address> {
		self.pending.read().await.clone()
	}

	/// Queries the contract owner, derives the admin flag and enters `Ready`.
	pub async fn load(&self) -> Result<bool, AirdropError> {
		let owner = self.airdrop.owner().await.map_err(AirdropError::Query)?;
		let is_admin = owner == self.account;
		self.is_admin.store(is_admin, Ordering::SeqCst);

		let mut state = self.state.write().await;
		if *state == AirdropState::Initializing {
			*state = AirdropState::Ready;
		}
		log::info!(
			target: self.log_target.as_str(),
			"-[{}] 👤 Airdrop owner: {:?}, connected account is admin: {}",
			sub_display_format(SUB_LOG_TARGET),
			owner,
			is_admin
		);
		Ok(is_admin)
	}

	/// Appends `input` to the pending list if it is a well formed address that has not received
	/// the airdrop yet. Proposing an address that is already pending leaves the list unchanged.
	pub async fn propose_candidate(&self, input: &str) -> Result<CandidateOutcome, AirdropError> {
		self.ensure_loaded().await?;
		let candidate =
			parse_address(input).ok_or_else(|| AirdropError::InvalidAddress(input.trim().to_string()))?;

		if self.airdrop.has_received(candidate).await.map_err(AirdropError::Query)? {
			return Err(AirdropError::AlreadyAirdropped(candidate));
		}

		let mut pending = self.pending.write().await;
		if pending.contains(&candidate) {
			return Ok(CandidateOutcome::AlreadyPending);
		}
		pending.push(candidate);

		log::info!(
			target: self.log_target.as_str(),
			"-[{}] 📝 Queued airdrop candidate: {:?} (pending: {})",
			sub_display_format(SUB_LOG_TARGET),
			candidate,
			pending.len()
		);
		Ok(CandidateOutcome::Queued)
	}

	/// Submits one airdrop per pending candidate, strictly in order, waiting for each
	/// confirmation before the next submission.
	///
	/// The batch stops at the first failure. Confirmed recipients are removed from the pending
	/// list in every case, and the returned report (or [`AirdropError::BatchInterrupted`])
	/// tells which recipients succeeded, which one failed and which were never attempted.
	pub async fn submit_airdrop(&self) -> Result<AirdropReport, AirdropError> {
		self.ensure_loaded().await?;
		if !self.is_admin() {
			return Err(AirdropError::NotAuthorized(self.account));
		}
		let _guard = self.write_lock.try_lock().map_err(|_| AirdropError::OperationInProgress)?;

		let batch = self.pending().await;
		if batch.is_empty() {
			return Err(AirdropError::NothingToSubmit);
		}

		// ownership may have been transferred since load
		let owner = self.airdrop.owner().await.map_err(AirdropError::Query)?;
		if owner != self.account {
			self.is_admin.store(false, Ordering::SeqCst);
			log_and_capture!(
				warn,
				self.log_target.as_str(),
				SUB_LOG_TARGET,
				"⚠️  Airdrop ownership has moved to {:?}, submission rejected",
				owner
			);
			return Err(AirdropError::NotAuthorized(self.account));
		}

		*self.state.write().await = AirdropState::Submitting;
		let report = self.execute_batch(batch).await;
		self.pending.write().await.retain(|address| !report.succeeded.contains(address));
		*self.state.write().await = AirdropState::Ready;

		if report.failed.is_some() {
			log_and_capture!(
				error,
				self.log_target.as_str(),
				SUB_LOG_TARGET,
				"❗️ Airdrop batch interrupted: {}",
				report
			);
			return Err(AirdropError::BatchInterrupted(report));
		}
		log::info!(
			target: self.log_target.as_str(),
			"-[{}] 🎉 Airdrop batch completed: {}",
			sub_display_format(SUB_LOG_TARGET),
			report
		);
		Ok(report)
	}

	async fn execute_batch(&self, batch: Vec<Address>) -> AirdropReport {
		let mut report = AirdropReport::default();
		let mut candidates = batch.into_iter();

		while let Some(recipient) = candidates.next() {
			match self.airdrop_to(recipient).await {
				Ok(()) => report.succeeded.push(recipient),
				Err(error) => {
					report.failed = Some(FailedCandidate { address: recipient, error });
					report.not_attempted = candidates.by_ref().collect();
					break;
				},
			}
		}
		report
	}

	async fn airdrop_to(&self, recipient: Address) -> Result<(), LedgerError> {
		let tx_hash = self.airdrop.airdrop(recipient).await?;
		self.airdrop.wait_for_confirmation(tx_hash).await?;

		log::info!(
			target: self.log_target.as_str(),
			"-[{}] 🎁 Airdropped to {:?}",
			sub_display_format(SUB_LOG_TARGET),
			recipient
		);
		Ok(())
	}

	async fn ensure_loaded(&self) -> Result<(), AirdropError> {
		match self.state().await {
			AirdropState::Initializing => Err(AirdropError::NotLoaded),
			_ => Ok(()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		errors::ErrorKind,
		mock::{Call, MockLedger},
	};

	const A: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
	const B: &str = "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC";

	fn admin() -> Address {
		Address::repeat_byte(0xad)
	}

	fn address(input: &str) -> Address {
		parse_address(input).unwrap()
	}

	async fn loaded(ledger: MockLedger) -> (Arc<AirdropCoordinator<MockLedger>>, Arc<MockLedger>) {
		let ledger = Arc::new(ledger);
		let coordinator = Arc::new(AirdropCoordinator::new(admin(), ledger.clone(), "test".into()));
		coordinator.load().await.unwrap();
		(coordinator, ledger)
	}

	#[tokio::test]
	async fn load_derives_admin_flag_from_owner() {
		let (coordinator, _) = loaded(MockLedger::new(admin())).await;
		assert!(coordinator.is_admin());
		assert_eq!(coordinator.state().await, AirdropState::Ready);

		let (coordinator, _) =
			loaded(MockLedger::new(admin()).with_owner(Address::repeat_byte(0x01))).await;
		assert!(!coordinator.is_admin());
	}

	#[tokio::test]
	async fn proposals_require_loaded_state() {
		let ledger = Arc::new(MockLedger::new(admin()));
		let coordinator = AirdropCoordinator::new(admin(), ledger.clone(), "test".into());

		assert!(matches!(coordinator.propose_candidate(A).await, Err(AirdropError::NotLoaded)));
		assert!(matches!(coordinator.submit_airdrop().await, Err(AirdropError::NotLoaded)));
		assert!(ledger.calls().is_empty());
	}

	#[tokio::test]
	async fn malformed_addresses_are_rejected_without_query() {
		let (coordinator, ledger) = loaded(MockLedger::new(admin())).await;

		for input in ["", "0x1234", "not an address", "0x70997970c51812dc3a010c7d01b50e0d17dc79zz"] {
			let err = coordinator.propose_candidate(input).await.unwrap_err();
			assert!(matches!(err, AirdropError::InvalidAddress(_)), "{input:?}");
			assert_eq!(err.kind(), ErrorKind::Validation);
		}
		// bad checksum
		let err = coordinator
			.propose_candidate("0x70997970c51812dc3A010C7d01b50e0d17dc79C8")
			.await
			.unwrap_err();
		assert!(matches!(err, AirdropError::InvalidAddress(_)));

		assert_eq!(ledger.calls(), vec![Call::Owner]);
		assert!(coordinator.pending().await.is_empty());
	}

	#[tokio::test]
	async fn duplicate_proposals_are_suppressed() {
		let (coordinator, _) = loaded(MockLedger::new(admin())).await;

		assert_eq!(coordinator.propose_candidate(A).await.unwrap(), CandidateOutcome::Queued);
		assert_eq!(
			coordinator.propose_candidate(&A.to_lowercase()).await.unwrap(),
			CandidateOutcome::AlreadyPending
		);
		assert_eq!(coordinator.pending().await, vec![address(A)]);
	}

	#[tokio::test]
	async fn received_addresses_are_not_queued() {
		let (coordinator, _) = loaded(MockLedger::new(admin()).with_received(address(B))).await;
		coordinator.propose_candidate(A).await.unwrap();

		let err = coordinator.propose_candidate(B).await.unwrap_err();
		assert!(matches!(err, AirdropError::AlreadyAirdropped(account) if account == address(B)));
		assert_eq!(coordinator.pending().await, vec![address(A)]);
	}

	#[tokio::test]
	async fn failed_receipt_query_leaves_list_unchanged() {
		let (coordinator, ledger) = loaded(MockLedger::new(admin())).await;
		coordinator.propose_candidate(A).await.unwrap();
		ledger.fail("has_received", LedgerError::Transport("down".into()));

		let err = coordinator.propose_candidate(B).await.unwrap_err();
		assert!(matches!(err, AirdropError::Query(LedgerError::Transport(_))));
		assert_eq!(err.kind(), ErrorKind::Remote);
		assert_eq!(coordinator.pending().await, vec![address(A)]);
	}

	#[tokio::test]
	async fn non_admin_submission_makes_no_remote_calls() {
		let (coordinator, ledger) =
			loaded(MockLedger::new(admin()).with_owner(Address::repeat_byte(0x01))).await;
		coordinator.propose_candidate(A).await.unwrap();
		let calls = ledger.calls().len();

		let err = coordinator.submit_airdrop().await.unwrap_err();
		assert!(matches!(err, AirdropError::NotAuthorized(account) if account == admin()));
		assert_eq!(err.kind(), ErrorKind::Authorization);
		assert_eq!(ledger.calls().len(), calls);
		assert_eq!(coordinator.pending().await, vec![address(A)]);
	}

	#[tokio::test]
	async fn empty_list_has_nothing_to_submit() {
		let (coordinator, ledger) = loaded(MockLedger::new(admin())).await;

		assert!(matches!(coordinator.submit_airdrop().await, Err(AirdropError::NothingToSubmit)));
		assert_eq!(ledger.calls(), vec![Call::Owner]);
	}

	#[tokio::test]
	async fn full_batch_clears_pending_list() {
		let (coordinator, ledger) = loaded(MockLedger::new(admin())).await;
		coordinator.propose_candidate(A).await.unwrap();
		coordinator.propose_candidate(B).await.unwrap();

		let report = coordinator.submit_airdrop().await.unwrap();
		assert!(report.is_complete());
		assert_eq!(report.succeeded, vec![address(A), address(B)]);
		assert!(coordinator.pending().await.is_empty());
		assert!(ledger.has_received(address(A)) && ledger.has_received(address(B)));
		assert_eq!(coordinator.state().await, AirdropState::Ready);
	}

	#[tokio::test]
	async fn batch_stops_at_first_failure_and_keeps_the_rest() {
		const C: &str = "0x90F79bf6EB2c4f870365E785982E1f101E93b906";
		let (coordinator, ledger) =
			loaded(MockLedger::new(admin()).reverting_airdrop_for(address(B))).await;
		for candidate in [A, B, C] {
			coordinator.propose_candidate(candidate).await.unwrap();
		}

		let err = coordinator.submit_airdrop().await.unwrap_err();
		assert_eq!(err.kind(), ErrorKind::Remote);
		let report = match err {
			AirdropError::BatchInterrupted(report) => report,
			other => panic!("unexpected error: {other:?}"),
		};
		assert_eq!(report.succeeded, vec![address(A)]);
		assert!(matches!(
			report.failed,
			Some(FailedCandidate { address: failed, error: LedgerError::Reverted(_) }) if failed == address(B)
		));
		assert_eq!(report.not_attempted, vec![address(C)]);

		assert_eq!(coordinator.pending().await, vec![address(B), address(C)]);
		assert_eq!(ledger.submissions(), vec![Call::Airdrop(address(A)), Call::Airdrop(address(B))]);
	}

	#[tokio::test]
	async fn partial_failure_leaves_failed_candidate_pending() {
		let (coordinator, _) =
			loaded(MockLedger::new(admin()).reverting_airdrop_for(address(B))).await;
		coordinator.propose_candidate(A).await.unwrap();
		coordinator.propose_candidate(B).await.unwrap();

		let err = coordinator.submit_airdrop().await.unwrap_err();
		let report = match err {
			AirdropError::BatchInterrupted(report) => report,
			other => panic!("unexpected error: {other:?}"),
		};
		assert_eq!(report.succeeded, vec![address(A)]);
		assert_eq!(report.failed.map(|failed| failed.address), Some(address(B)));
		assert_eq!(coordinator.pending().await, vec![address(B)]);
	}

	#[tokio::test]
	async fn lost_ownership_is_detected_before_submission() {
		let (coordinator, ledger) = loaded(MockLedger::new(admin())).await;
		coordinator.propose_candidate(A).await.unwrap();
		ledger.set_owner(Address::repeat_byte(0x01));

		let err = coordinator.submit_airdrop().await.unwrap_err();
		assert!(matches!(err, AirdropError::NotAuthorized(_)));
		assert!(!coordinator.is_admin());
		assert!(ledger.submissions().is_empty());
		assert_eq!(coordinator.pending().await, vec![address(A)]);
	}

	#[tokio::test]
	async fn concurrent_submission_is_rejected() {
		let (coordinator, ledger) = loaded(MockLedger::new(admin()).holding_confirmations()).await;
		coordinator.propose_candidate(A).await.unwrap();

		let first = tokio::spawn({
			let coordinator = coordinator.clone();
			async move { coordinator.submit_airdrop().await }
		});
		ledger.confirmation_held().await;
		assert_eq!(coordinator.state().await, AirdropState::Submitting);

		// proposals are still accepted while a batch is running
		assert_eq!(coordinator.propose_candidate(B).await.unwrap(), CandidateOutcome::Queued);
		assert!(matches!(
			coordinator.submit_airdrop().await,
			Err(AirdropError::OperationInProgress)
		));

		ledger.release();
		let report = first.await.unwrap().unwrap();
		assert_eq!(report.succeeded, vec![address(A)]);
		assert_eq!(coordinator.pending().await, vec![address(B)]);
	}
}
