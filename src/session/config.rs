//! Session configuration.

/// Knobs controlling a [`Client`](crate::session::Client)'s dialogue
/// timing and retry behavior.
#[derive(Debug, Clone)]
pub struct Config {
    /// Serial port path (or other transport-specific address). Ignored by
    /// non-serial transports.
    pub port: String,
    /// Baud rate. Every known controller speaks at 19200.
    pub baudrate: u32,
    /// Per-read timeout.
    pub timeout: std::time::Duration,
    /// Retry budget for transport-level faults (timeouts, bad checksums)
    /// on a single outgoing frame.
    pub max_retries_transport: u32,
    /// Retry budget the session machine applies on top of
    /// `max_retries_transport` for `PCMI_ER_TRY_AGAIN` responses. See
    /// DESIGN.md for why these are tracked separately.
    pub max_retries_session: u32,
}

impl Config {
    /// A config bound to `port` with every other field at its default.
    pub fn new(port: impl Into<String>) -> Self {
        Config {
            port: port.into(),
            ..Config::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: String::new(),
            baudrate: 19200,
            timeout: std::time::Duration::from_secs(5),
            max_retries_transport: 6,
            max_retries_session: 3,
        }
    }
}
