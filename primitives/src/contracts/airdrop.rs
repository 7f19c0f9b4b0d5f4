use ethers::prelude::abigen;

abigen!(
	AirdropContract,
	r#"[
		function owner() external view returns (address)
		function hasReceived(address account) external view returns (bool)
		function airdrop(address recipient) external
	]"#
);
