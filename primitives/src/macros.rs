/// Logs a message and captures it in Sentry with the specified level.
///
/// The log target is usually the connected network's name and the sub target names the
/// component emitting the message.
///
/// ```ignore
/// log_and_capture!(error, &chain_name, SUB_LOG_TARGET,
///     "❗️ Failed to submit stake transaction: {}", err);
///
/// // Info level logging (no Sentry capture)
/// log_and_capture!(info, &chain_name, SUB_LOG_TARGET, "🔖 Transaction confirmed: {:?}", hash);
/// ```
#[macro_export]
macro_rules! log_and_capture {
	(error, $target:expr, $sub_target:expr, $fmt:literal $($arg:tt)*) => {{
		let log_msg = format!(
			"-[{}] {}",
			$crate::utils::sub_display_format($sub_target),
			format!($fmt $($arg)*)
		);
		log::error!(target: $target, "{log_msg}");
		sentry::capture_message(&format!("[{}]{log_msg}", $target), sentry::Level::Error);
	}};

	(warn, $target:expr, $sub_target:expr, $fmt:literal $($arg:tt)*) => {{
		let log_msg = format!(
			"-[{}] {}",
			$crate::utils::sub_display_format($sub_target),
			format!($fmt $($arg)*)
		);
		log::warn!(target: $target, "{log_msg}");
		sentry::capture_message(&format!("[{}]{log_msg}", $target), sentry::Level::Warning);
	}};

	(info, $target:expr, $sub_target:expr, $fmt:literal $($arg:tt)*) => {{
		log::info!(
			target: $target,
			"-[{}] {}",
			$crate::utils::sub_display_format($sub_target),
			format!($fmt $($arg)*)
		);
	}};
}
