use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(500);
pub const DEFAULT_WINDOW: usize = 1;

#[derive(Debug, Clone)]
pub struct Config {
    /// Pause between the end of one probe cycle and the start of the next.
    pub interval: Duration,
    /// How long a single echo request may wait for its reply.
    pub timeout: Duration,
    /// How long `stop` waits for a monitor loop before aborting it.
    pub grace_period: Duration,
    /// Number of recent probes the delivery percentages are computed over.
    pub window: usize,
    /// Accept DNS host names in addition to IPv4 addresses.
    pub allow_hostnames: bool,
    /// Quiet level of the terminal front end.
    pub quiet: u8,
    /// Disables colored terminal output.
    pub no_color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
            grace_period: DEFAULT_GRACE_PERIOD,
            window: DEFAULT_WINDOW,
            allow_hostnames: false,
            quiet: 0,
            no_color: false,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval.is_zero() {
            return Err(ConfigError::ZeroDuration("interval"));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroDuration("timeout"));
        }
        if self.grace_period.is_zero() {
            return Err(ConfigError::ZeroDuration("grace period"));
        }
        if self.window == 0 {
            return Err(ConfigError::EmptyWindow);
        }
        Ok(())
    }
}
