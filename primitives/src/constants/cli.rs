/// The default path for the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// The default call interval in milliseconds used when polling for receipts. (=3s)
pub const DEFAULT_CALL_INTERVAL_MS: u64 = 3_000;

/// The default count required for block confirmations. (=1 block)
pub const DEFAULT_BLOCK_CONFIRMATIONS: u64 = 1;

/// The maximum call interval allowed in milliseconds. (=60s)
pub const MAX_CALL_INTERVAL_MS: u64 = 60_000;

/// The maximum block confirmations allowed. (=100 blocks)
pub const MAX_BLOCK_CONFIRMATIONS: u64 = 100;

/// The time given to in-flight futures on shutdown before the runtime drops them. (=10s)
pub const DEFAULT_SHUTDOWN_TIMEOUT_SEC: u64 = 10;
