use std::fmt;

/// Errors produced while framing, decoding or driving a PCMI session.
///
/// Construction logs at the severity appropriate to the kind: fatal kinds log
/// at `error!`, retryable kinds log at `warn!`. Callers should match on the
/// variant rather than parse the `Display` text.
#[derive(Debug)]
pub enum PcmiError {
    /// The transport failed at the OS level (open/close/read/write). Fatal
    /// to the current session.
    Transport(std::io::Error),
    /// A blocking read exceeded its configured bound. Retryable.
    Timeout,
    /// A frame arrived with a checksum that didn't match its payload.
    /// Retryable.
    Checksum {
        /// Checksum byte computed locally.
        expected: u8,
        /// Checksum byte carried by the frame.
        actual: u8,
    },
    /// Frame structure was invalid: unknown command, an RLI/VLI that
    /// overruns the buffer, malformed hex ASCII, or a header/frame length
    /// mismatch. Fatal to the current download; the session may continue.
    Protocol(String),
    /// A record-level invariant was violated (zone number out of range,
    /// cross-field mismatch). Fatal to the current record only.
    Parse(String),
    /// The controller reported an error frame (0xC0..0xDB).
    Controller {
        /// The raw error command byte.
        code: u8,
        /// Human-readable message from the fixed error table.
        message: &'static str,
    },
    /// `connect()` did not receive `SN_ACK`.
    Connection(String),
}

/// Result alias used throughout this crate.
pub type Result<T> = std::result::Result<T, PcmiError>;

impl PcmiError {
    /// Build a [`PcmiError::Protocol`] error, logging at `error!`.
    pub fn protocol<M: Into<String>>(msg: M) -> Self {
        let msg = msg.into();
        log::error!("protocol error: {msg}");
        PcmiError::Protocol(msg)
    }

    /// Build a [`PcmiError::Parse`] error, logging at `error!`.
    pub fn parse<M: Into<String>>(msg: M) -> Self {
        let msg = msg.into();
        log::error!("parse error: {msg}");
        PcmiError::Parse(msg)
    }

    /// Build a [`PcmiError::Connection`] error, logging at `error!`.
    pub fn connection<M: Into<String>>(msg: M) -> Self {
        let msg = msg.into();
        log::error!("connection error: {msg}");
        PcmiError::Connection(msg)
    }

    /// Build a [`PcmiError::Checksum`] error, logging at `warn!` since it is
    /// retryable by the session machine.
    pub fn checksum(expected: u8, actual: u8) -> Self {
        log::warn!("checksum mismatch: expected {expected:02X}, got {actual:02X}");
        PcmiError::Checksum { expected, actual }
    }

    /// Build a [`PcmiError::Timeout`] error, logging at `warn!`.
    pub fn timeout() -> Self {
        log::warn!("read timed out");
        PcmiError::Timeout
    }

    /// Build a [`PcmiError::Controller`] error from a raw error code,
    /// looking up its message in the fixed table. Logs at `error!` unless
    /// the code is one of the two transient operational codes, in which
    /// case it logs at `warn!` since the session machine may retry or
    /// surface it as transient rather than fatal.
    pub fn controller(code: u8) -> Self {
        let message = crate::wire::command::controller_error_message(code);
        if matches!(code, crate::wire::command::ER_TRY_AGAIN | crate::wire::command::ER_HANDS_OFF)
        {
            log::warn!("controller reported {code:02X}: {message}");
        } else {
            log::error!("controller reported {code:02X}: {message}");
        }
        PcmiError::Controller { code, message }
    }

    /// True when the session machine's retry policy applies to this error:
    /// timeouts, checksum mismatches, and `PCMI_ER_TRY_AGAIN`.
    pub fn is_retryable(&self) -> bool {
        match self {
            PcmiError::Timeout | PcmiError::Checksum { .. } => true,
            PcmiError::Controller { code, .. } => *code == crate::wire::command::ER_TRY_AGAIN,
            _ => false,
        }
    }
}

impl fmt::Display for PcmiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PcmiError::Transport(e) => write!(f, "transport error: {e}"),
            PcmiError::Timeout => write!(f, "read timed out"),
            PcmiError::Checksum { expected, actual } => {
                write!(f, "checksum mismatch: expected {expected:02X}, got {actual:02X}")
            }
            PcmiError::Protocol(msg) => write!(f, "protocol error: {msg}"),
            PcmiError::Parse(msg) => write!(f, "parse error: {msg}"),
            PcmiError::Controller { code, message } => {
                write!(f, "controller error {code:02X}: {message}")
            }
            PcmiError::Connection(msg) => write!(f, "connection error: {msg}"),
        }
    }
}

impl std::error::Error for PcmiError {}

impl From<std::io::Error> for PcmiError {
    fn from(err: std::io::Error) -> Self {
        log::error!("transport error: {err}");
        PcmiError::Transport(err)
    }
}
