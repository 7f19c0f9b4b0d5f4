pub mod airdrop_cmd;
pub mod shell_cmd;
pub mod stake_cmd;

pub use airdrop_cmd::AirdropCmd;
pub use stake_cmd::AmountCmd;

use ethers::types::Address;
use htk_client::airdrop::AirdropReport;
use htk_primitives::utils::short_address;

/// Prints the per recipient outcome of an airdrop batch.
pub(crate) fn print_report(report: &AirdropReport) {
	for recipient in &report.succeeded {
		println!("  ✅ {}", short_address(recipient));
	}
	if let Some(failed) = &report.failed {
		println!("  ❌ {} ({})", short_address(&failed.address), failed.error);
	}
	for recipient in &report.not_attempted {
		println!("  ⏸  {} (not attempted)", short_address(recipient));
	}
}

/// Lists queued candidates, one short address per line.
pub(crate) fn format_pending(pending: &[Address]) -> String {
	let mut out = format!("{} pending address(es)\n", pending.len());
	for address in pending {
		out.push_str(&format!("  {}\n", short_address(address)));
	}
	out
}
