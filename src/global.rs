//! Process-wide facade
//!
//! Nothing in the crate requires it; it exists for callers that do not want
//! to pass a [`Log`] around.

use crate::config::Settings;
use crate::core::{ChannelConfig, Log, Result, Severity};
use once_cell::sync::OnceCell;

static GLOBAL: OnceCell<Log> = OnceCell::new();

/// The process-wide facade, built from the environment on first use unless
/// [`set_global`] ran first.
pub fn global() -> &'static Log {
    GLOBAL.get_or_init(default_log)
}

/// Install `log` as the process-wide facade.
///
/// Fails with the given facade if one is already installed.
pub fn set_global(log: Log) -> std::result::Result<(), Log> {
    GLOBAL.set(log)
}

/// Info, Warning and Error channels writing to the file named by the
/// severity's `ALOG_LOGGER_*` key (when set) and to the console.
///
/// A construction failure is reported on stderr and yields a facade with no
/// channels.
pub fn default_log() -> Log {
    match build_default(&Settings::from_env()) {
        Ok(log) => log,
        Err(e) => {
            eprintln!("[LOGGER ERROR] default logger could not be started: {}", e);
            Log::unconfigured()
        }
    }
}

fn build_default(settings: &Settings) -> Result<Log> {
    let mut builder = settings.builder();
    for severity in Severity::ALL {
        builder = builder.channel(severity, default_channel(severity, settings));
    }
    builder.build()
}

#[cfg_attr(
    not(any(feature = "file", feature = "console")),
    allow(unused_mut, unused_variables)
)]
fn default_channel(severity: Severity, settings: &Settings) -> ChannelConfig {
    let mut channel = ChannelConfig::new(settings.channel_capacity);

    #[cfg(feature = "file")]
    {
        let path = crate::config::get_env_str(severity.env_key());
        if !path.trim().is_empty() {
            channel = channel.strategy(crate::strategies::FileStrategy::new(path.trim()));
        }
    }

    #[cfg(feature = "console")]
    {
        let console = crate::strategies::ConsoleStrategy::new();
        channel = channel.strategy(console.with_color(severity.color_code()));
    }

    channel
}
