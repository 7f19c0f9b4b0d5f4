use ethers::prelude::abigen;

abigen!(
	Erc20Contract,
	r#"[
		function balanceOf(address owner) external view returns (uint256)
		function allowance(address owner, address spender) external view returns (uint256)
		function decimals() external view returns (uint8)
		function approve(address spender, uint256 amount) external returns (bool)
	]"#
);
