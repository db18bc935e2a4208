//! Structured logging setup.
//!
//! The subscriber is installed before configuration is read, so loading
//! itself is logged. The configured level is applied afterwards through a
//! reload handle.

use tracing::Subscriber;
use tracing_subscriber::{
    layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry,
};

/// Adjusts the level of an installed subscriber.
pub struct LogHandle {
    filter: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

impl LogHandle {
    /// Switch this crate's log level. A `RUST_LOG` filter is left alone.
    pub fn set_level(&self, level: &str) {
        if self.from_env {
            return;
        }
        if let Err(e) = self.filter.reload(crate_filter(level)) {
            tracing::warn!(error = %e, level, "Failed to apply log level");
        }
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_level` applies to this crate.
pub fn init(default_level: &str) -> LogHandle {
    let (filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (crate_filter(default_level), false),
    };

    let (subscriber, handle) = subscriber(filter, from_env);
    // A second init (tests, embedding) keeps the first subscriber.
    let _ = subscriber.try_init();
    handle
}

fn crate_filter(level: &str) -> EnvFilter {
    EnvFilter::new(format!("cacheroute={}", level))
}

fn subscriber(
    filter: EnvFilter,
    from_env: bool,
) -> (impl Subscriber + Send + Sync + 'static, LogHandle) {
    let (filter, handle) = reload::Layer::new(filter);
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));
    (
        subscriber,
        LogHandle {
            filter: handle,
            from_env,
        },
    )
}
