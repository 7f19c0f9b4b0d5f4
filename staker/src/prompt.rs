use std::{io::Write, sync::Arc};

use ethers::types::Address;
use htk_client::eth::UserPrompt;
use htk_primitives::utils::short_address;
use tokio::{
	io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin},
	sync::Mutex,
};

/// Line based terminal input shared by the interactive shell and the prompt. Every read goes
/// through this one buffer.
pub struct TerminalInput<R = BufReader<Stdin>> {
	lines: Mutex<Lines<R>>,
}

impl TerminalInput {
	pub fn stdin() -> Self {
		Self::new(BufReader::new(tokio::io::stdin()))
	}
}

impl<R: AsyncBufRead + Unpin + Send> TerminalInput<R> {
	pub fn new(reader: R) -> Self {
		Self { lines: Mutex::new(reader.lines()) }
	}

	/// Returns the next line without its terminator, or `None` at the end of input.
	pub async fn next_line(&self) -> std::io::Result<Option<String>> {
		self.lines.lock().await.next_line().await
	}
}

/// Asks every account access and transaction request on the terminal.
pub struct TerminalPrompt<R = BufReader<Stdin>> {
	input: Arc<TerminalInput<R>>,
}

impl<R: AsyncBufRead + Unpin + Send> TerminalPrompt<R> {
	pub fn new(input: Arc<TerminalInput<R>>) -> Self {
		Self { input }
	}

	async fn ask(&self, question: &str) -> bool {
		print!("{} [y/N] ", question);
		if std::io::stdout().flush().is_err() {
			return false;
		}

		match self.input.next_line().await {
			Ok(Some(answer)) => is_yes(&answer),
			Ok(None) | Err(_) => false,
		}
	}
}

#[async_trait::async_trait]
impl<R: AsyncBufRead + Unpin + Send> UserPrompt for TerminalPrompt<R> {
	async fn allow_account_access(&self, account: Address, chain_id: u64) -> bool {
		self.ask(&format!(
			"Allow access to account {} on chain {}?",
			short_address(&account),
			chain_id
		))
		.await
	}

	async fn confirm_transaction(&self, description: &str) -> bool {
		self.ask(&format!("Sign and submit {}?", description)).await
	}
}

fn is_yes(answer: &str) -> bool {
	matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
