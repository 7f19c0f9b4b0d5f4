use ethers::prelude::abigen;

abigen!(
	StakingContract,
	r#"[
		function stake(uint256 amount) external returns (bool)
		function withdraw(uint256 amount) external returns (bool)
		function getStakedBalance(address account) external view returns (uint256)
	]"#
);
