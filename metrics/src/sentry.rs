use sentry::ClientInitGuard;
use std::borrow::Cow;

use htk_primitives::{cli::SentryConfig, utils::sub_display_format};

pub const LOG_TARGET: &str = "htk-staker";
const SUB_LOG_TARGET: &str = "sentry-client";

/// Builds a sentry client only when the sentry config exists and is enabled.
pub fn build_sentry_client(sentry_config: Option<SentryConfig>) -> Option<ClientInitGuard> {
	let sentry_config = sentry_config?;
	let dsn = sentry_config.dsn.unwrap_or_default();

	if sentry_config.is_enabled && !dsn.is_empty() {
		let environment: Option<Cow<'static, str>> = sentry_config.environment.map(Cow::Owned);
		let sentry_client = sentry::init((
			dsn,
			sentry::ClientOptions {
				release: sentry::release_name!(),
				environment: environment.clone(),
				..Default::default()
			},
		));
		log::info!(
			target: LOG_TARGET,
			"-[{}] 🔨 Initializing sentry client with environment: {}",
			sub_display_format(SUB_LOG_TARGET),
			environment.unwrap_or_default()
		);
		return Some(sentry_client);
	}
	None
}
