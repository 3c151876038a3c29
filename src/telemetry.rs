//! Tracing setup.
//!
//! The router only emits `tracing` events; installing a subscriber is up to
//! the host. Browser builds usually bring their own console layer, so the
//! helper here is for native hosts (tests, server-side tooling).

/// Installs a `fmt` subscriber filtered by `RUST_LOG`, or by
/// `default_filter` when `RUST_LOG` is unset or invalid.
///
/// Returns `false` if a global subscriber was already installed.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_tracing(default_filter: &str) -> bool {
	use tracing_subscriber::EnvFilter;
	use tracing_subscriber::fmt;

	let filter = EnvFilter::try_from_default_env()
		.or_else(|_| EnvFilter::try_new(default_filter))
		.unwrap_or_else(|_| EnvFilter::new("info"));

	fmt::Subscriber::builder()
		.with_env_filter(filter)
		.with_target(true)
		.try_init()
		.is_ok()
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_second_install_is_reported() {
		init_tracing("linkdash=debug");
		assert!(!init_tracing("info"));
	}
}
