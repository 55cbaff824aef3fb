//! The transport boundary: an opaque byte-stream interface the session
//! machine drives. Everything above this trait is pure and synchronous;
//! everything below it is where real I/O (or a scripted test double)
//! happens.

pub mod mock;
#[cfg(feature = "serial-transport")]
pub mod serial;

use std::time::Duration;

use crate::tools::error::Result;

/// An opaque, half-duplex byte stream. The session machine is the only
/// consumer; a production implementation binds to RS-485 serial hardware,
/// a test implementation plays back scripted bytes.
pub trait Transport {
    /// Open the underlying connection. Idempotent if already open.
    fn open(&mut self) -> Result<()>;
    /// Close the underlying connection. Idempotent if already closed.
    fn close(&mut self) -> Result<()>;
    /// Whether the connection is currently open.
    fn is_open(&self) -> bool;
    /// Write `bytes` in full.
    fn write(&mut self, bytes: &[u8]) -> Result<()>;
    /// Read up to `max_len` bytes, waiting at most `timeout` for the first
    /// byte to arrive.
    fn read(&mut self, max_len: usize, timeout: Duration) -> Result<Vec<u8>>;
    /// Read bytes up to and including `terminator`, waiting at most
    /// `timeout` total. Used for CR-delimited and bare-ack frames.
    fn read_until(&mut self, terminator: u8, timeout: Duration) -> Result<Vec<u8>>;
    /// Drop any buffered input/output the driver may be holding, so a
    /// fresh dialogue starts from a clean slate.
    fn discard_buffers(&mut self) -> Result<()>;
}
