//! Production transport: RS-485 serial, 19200 baud, 8 data bits, mark
//! parity (used for 9-bit addressing on this bus), 1 stop bit.

use std::io::{Read, Write};
use std::time::Duration;

use serialport::SerialPort;

use crate::tools::error::{PcmiError, Result};
use crate::transport::Transport;

/// Baud rate every known PCMI controller speaks at.
pub const BAUD_RATE: u32 = 19200;

/// A serial-backed [`Transport`] bound to a port path, opened lazily.
pub struct SerialTransport {
    port_path: String,
    port: Option<Box<dyn SerialPort>>,
}

impl SerialTransport {
    /// Build a transport bound to `port_path` (e.g. `/dev/ttyUSB0` or
    /// `COM3`). Does not open the port.
    pub fn new(port_path: impl Into<String>) -> Self {
        SerialTransport {
            port_path: port_path.into(),
            port: None,
        }
    }

    fn port_mut(&mut self) -> Result<&mut Box<dyn SerialPort>> {
        self.port
            .as_mut()
            .ok_or_else(|| PcmiError::connection("serial port is not open"))
    }
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("port_path", &self.port_path)
            .field("open", &self.port.is_some())
            .finish()
    }
}

impl Transport for SerialTransport {
    fn open(&mut self) -> Result<()> {
        if self.port.is_some() {
            return Ok(());
        }
        let port = serialport::new(&self.port_path, BAUD_RATE)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::Mark)
            .stop_bits(serialport::StopBits::One)
            .timeout(Duration::from_millis(100))
            .open()
            .map_err(|e| PcmiError::connection(format!("opening {}: {e}", self.port_path)))?;
        log::info!("opened serial port {}", self.port_path);
        self.port = Some(port);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.port = None;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.port_mut()?.write_all(bytes)?;
        Ok(())
    }

    fn read(&mut self, max_len: usize, timeout: Duration) -> Result<Vec<u8>> {
        let port = self.port_mut()?;
        port.set_timeout(timeout)
            .map_err(|e| PcmiError::connection(e.to_string()))?;
        let mut buf = vec![0u8; max_len];
        let n = port.read(&mut buf).map_err(|e| {
            if e.kind() == std::io::ErrorKind::TimedOut {
                PcmiError::timeout()
            } else {
                PcmiError::Transport(e)
            }
        })?;
        buf.truncate(n);
        Ok(buf)
    }

    fn read_until(&mut self, terminator: u8, timeout: Duration) -> Result<Vec<u8>> {
        let deadline = std::time::Instant::now() + timeout;
        let mut out = Vec::new();
        loop {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            if remaining.is_zero() {
                return Err(PcmiError::timeout());
            }
            let chunk = self.read(1, remaining)?;
            if chunk.is_empty() {
                return Err(PcmiError::timeout());
            }
            out.push(chunk[0]);
            if chunk[0] == terminator {
                return Ok(out);
            }
        }
    }

    fn discard_buffers(&mut self) -> Result<()> {
        self.port_mut()?
            .clear(serialport::ClearBuffer::All)
            .map_err(|e| PcmiError::connection(e.to_string()))
    }
}
