use htk_metrics::LOG_TARGET;
use htk_primitives::{
	cli::Configuration, constants::cli::DEFAULT_SHUTDOWN_TIMEOUT_SEC, sub_display_format,
};

use futures::{future::FutureExt, pin_mut, select, Future};
use sentry::ClientInitGuard;
use std::{io, time::Duration};

const SUB_LOG_TARGET: &str = "runner";

#[cfg(target_family = "unix")]
async fn shutdown_signal() -> io::Result<()> {
	use tokio::signal::unix::{signal, SignalKind};

	let mut stream_int = signal(SignalKind::interrupt())?;
	let mut stream_term = signal(SignalKind::terminate())?;

	let t1 = stream_int.recv().fuse();
	let t2 = stream_term.recv().fuse();

	pin_mut!(t1, t2);

	select! {
		_ = t1 => {},
		_ = t2 => {},
	}

	Ok(())
}

#[cfg(not(target_family = "unix"))]
async fn shutdown_signal() -> io::Result<()> {
	tokio::signal::ctrl_c().await
}

/// Drives `func` to completion unless `shutdown` resolves first. A command cut off by the
/// shutdown signal is reported as [`io::ErrorKind::Interrupted`].
async fn main<F, S, E>(func: F, shutdown: S) -> Result<(), E>
where
	F: Future<Output = Result<(), E>> + futures::future::FusedFuture,
	S: Future<Output = io::Result<()>>,
	E: From<io::Error>,
{
	let t1 = shutdown.fuse();
	let t2 = func;

	pin_mut!(t1, t2);

	select! {
		res = t1 => {
			res?;
			log::warn!(
				target: LOG_TARGET,
				"-[{}] ⚠️  Shutdown signal received before the command completed",
				sub_display_format(SUB_LOG_TARGET),
			);
			Err(io::Error::new(io::ErrorKind::Interrupted, "interrupted before the command completed")
				.into())
		},
		res = t2 => res,
	}
}

/// Build a single threaded tokio runtime. Every coordinator is driven cooperatively on it.
pub fn build_runtime() -> Result<tokio::runtime::Runtime, std::io::Error> {
	tokio::runtime::Builder::new_current_thread().enable_all().build()
}

/// A staker CLI runtime that runs a single command until it completes or the process is
/// signalled to stop.
pub struct Runner {
	config: Configuration,
	tokio_runtime: tokio::runtime::Runtime,
	pub sentry_client: Option<ClientInitGuard>,
}

impl Runner {
	pub fn new(config: Configuration, tokio_runtime: tokio::runtime::Runtime) -> Runner {
		let sentry_client = htk_metrics::build_sentry_client(config.staker_config.sentry_config.clone());
		Runner { config, tokio_runtime, sentry_client }
	}

	pub fn run_until_exit<F, E>(self, command: impl FnOnce(Configuration) -> F) -> Result<(), E>
	where
		F: Future<Output = Result<(), E>>,
		E: From<std::io::Error>,
	{
		let res = self.tokio_runtime.block_on(main(command(self.config).fuse(), shutdown_signal()));

		// Submitted transactions are not cancellable. Whatever is still awaiting a receipt gets a
		// short grace period before the runtime drops it.
		self.tokio_runtime.shutdown_timeout(Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SEC));

		res
	}
}
