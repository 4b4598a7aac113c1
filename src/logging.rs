//! Logging initialization.
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! caller's choice. The binary calls [`init`] once at startup.
//!
//! The filter is read from `RULESHIFT_LOG` (same syntax as `RUST_LOG`), e.g.
//! `RULESHIFT_LOG=ruleshift::generator=debug`.

use std::sync::Once;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the filter directives.
pub const ENV_VAR: &str = "RULESHIFT_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable events at `info` and above on stderr.
    Development,
    /// Warnings only (scarcity, exhaustion).
    Quiet,
    /// Installs nothing; tests capture or ignore events themselves.
    Test,
}

impl Profile {
    fn default_directive(self) -> Option<&'static str> {
        match self {
            Profile::Development => Some("ruleshift=info"),
            Profile::Quiet => Some("ruleshift=warn"),
            Profile::Test => None,
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Install the global subscriber for `profile`. Later calls are no-ops, as
/// is a call made after another subscriber was installed elsewhere.
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let Some(default) = profile.default_directive() else {
            return;
        };
        let filter = EnvFilter::try_from_env(ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .finish()
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init(Profile::Test);
        init(Profile::Test);
        init(Profile::Quiet);
    }

    #[test]
    fn profiles_pick_their_default_level() {
        assert_eq!(Profile::Development.default_directive(), Some("ruleshift=info"));
        assert_eq!(Profile::Quiet.default_directive(), Some("ruleshift=warn"));
        assert_eq!(Profile::Test.default_directive(), None);
    }
}
