//! A scripted transport double: queues of canned response bytes, played
//! back in order, with every write recorded for assertions. Used in place
//! of [`serial::SerialTransport`](super::serial::SerialTransport) in tests.

use std::collections::VecDeque;
use std::time::Duration;

use crate::tools::error::{PcmiError, Result};
use crate::transport::Transport;

/// A drop-in [`Transport`] that plays back a queue of canned responses and
/// records every write it receives.
#[derive(Debug, Default)]
pub struct MockTransport {
    open: bool,
    responses: VecDeque<Vec<u8>>,
    pending: Vec<u8>,
    pub writes: Vec<Vec<u8>>,
    discard_count: usize,
}

impl MockTransport {
    /// An empty mock transport, closed until [`Transport::open`] is called.
    pub fn new() -> Self {
        MockTransport::default()
    }

    /// Queue one frame's worth of bytes to be returned by a future read.
    pub fn queue_response(&mut self, bytes: impl Into<Vec<u8>>) {
        self.responses.push_back(bytes.into());
    }

    /// Every byte sequence written so far, in order.
    pub fn writes(&self) -> &[Vec<u8>] {
        &self.writes
    }

    /// How many times `discard_buffers` has been called.
    pub fn discard_count(&self) -> usize {
        self.discard_count
    }

    fn refill_if_empty(&mut self) {
        if self.pending.is_empty() {
            if let Some(next) = self.responses.pop_front() {
                self.pending = next;
            }
        }
    }
}

impl Transport for MockTransport {
    fn open(&mut self) -> Result<()> {
        self.open = true;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.open = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        if !self.open {
            return Err(PcmiError::connection("transport is not open"));
        }
        self.writes.push(bytes.to_vec());
        Ok(())
    }

    fn read(&mut self, max_len: usize, _timeout: Duration) -> Result<Vec<u8>> {
        if !self.open {
            return Err(PcmiError::connection("transport is not open"));
        }
        self.refill_if_empty();
        if self.pending.is_empty() {
            return Err(PcmiError::timeout());
        }
        let take = max_len.min(self.pending.len());
        Ok(self.pending.drain(0..take).collect())
    }

    fn read_until(&mut self, terminator: u8, _timeout: Duration) -> Result<Vec<u8>> {
        if !self.open {
            return Err(PcmiError::connection("transport is not open"));
        }
        self.refill_if_empty();
        if self.pending.is_empty() {
            return Err(PcmiError::timeout());
        }
        match self.pending.iter().position(|b| *b == terminator) {
            Some(pos) => Ok(self.pending.drain(0..=pos).collect()),
            None => {
                // Bare acks have no terminator; hand back whatever one
                // queued response holds and let the caller classify it.
                Ok(std::mem::take(&mut self.pending))
            }
        }
    }

    fn discard_buffers(&mut self) -> Result<()> {
        self.discard_count += 1;
        self.pending.clear();
        self.responses.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plays_back_queued_responses_in_order() {
        let mut t = MockTransport::new();
        t.open().unwrap();
        t.queue_response(vec![0x86]);
        t.queue_response(vec![0x88]);

        assert_eq!(t.read_until(0x0D, Duration::from_secs(1)).unwrap(), vec![0x86]);
        assert_eq!(t.read_until(0x0D, Duration::from_secs(1)).unwrap(), vec![0x88]);
    }

    #[test]
    fn records_writes() {
        let mut t = MockTransport::new();
        t.open().unwrap();
        t.write(&[0x85, 0x30, 0x38]).unwrap();
        assert_eq!(t.writes(), &[vec![0x85, 0x30, 0x38]]);
    }

    #[test]
    fn write_before_open_fails() {
        let mut t = MockTransport::new();
        assert!(t.write(&[0x01]).is_err());
    }

    #[test]
    fn read_with_no_queued_response_times_out() {
        let mut t = MockTransport::new();
        t.open().unwrap();
        assert!(t.read_until(0x0D, Duration::from_secs(1)).is_err());
    }
}
