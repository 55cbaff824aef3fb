//! The lazy per-record download sequence returned by
//! [`Client::download`](crate::session::Client::download).

use crate::record::Record;
use crate::session::client::Client;
use crate::tools::error::Result;
use crate::transport::Transport;
use crate::wire::command;
use crate::wire::frame::Frame;

/// An `Iterator<Item = Result<Record>>` over one download dialogue. Reads
/// are pulled one at a time: the next record is not requested from the
/// controller until the caller asks this iterator for it. Dropping a
/// `Download` before it's exhausted sends `PCMI_BREAK` and returns the
/// session to [`State::Connected`](crate::session::State::Connected), so a
/// caller that stops partway through (an early `break`, a short-circuiting
/// `?`) never leaves the dialogue half-finished.
pub struct Download<'a, T: Transport> {
    client: &'a mut Client<T>,
    request_command: u8,
    pending: Option<Frame>,
    done: bool,
}

impl<'a, T: Transport> Download<'a, T> {
    pub(crate) fn new(client: &'a mut Client<T>, request_command: u8, first: Frame) -> Self {
        Download {
            client,
            request_command,
            pending: Some(first),
            done: false,
        }
    }

    fn finish(&mut self) {
        self.done = true;
    }
}

impl<'a, T: Transport> std::fmt::Debug for Download<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Download")
            .field("request_command", &self.request_command)
            .field("done", &self.done)
            .finish()
    }
}

impl<'a, T: Transport> Iterator for Download<'a, T> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let frame = match self.pending.take() {
            Some(frame) => frame,
            None => match self.client.request_next() {
                Ok(frame) => frame,
                Err(e) => {
                    self.finish();
                    self.client.fail_download();
                    return Some(Err(e));
                }
            },
        };

        if frame.command() == command::END_OF_RECORD {
            self.finish();
            self.client.finish_download();
            return None;
        }

        let payload_hex = match &frame {
            Frame::Record { payload_hex, .. } => payload_hex.clone(),
            Frame::BareAck { command: cmd } => {
                self.finish();
                self.client.fail_download();
                return Some(Err(crate::tools::error::PcmiError::protocol(format!(
                    "unexpected bare ack {cmd:#04X} during download"
                ))));
            }
        };

        // queue the next pull so the following `next()` call asks for a
        // fresh frame instead of replaying this one
        self.pending = None;

        match self.client.decode_frame(frame.command(), &payload_hex) {
            Ok(record) => Some(Ok(record)),
            Err(e) => {
                self.finish();
                self.client.fail_download();
                Some(Err(e))
            }
        }
    }
}

impl<'a, T: Transport> Drop for Download<'a, T> {
    fn drop(&mut self) {
        if !self.done {
            self.client.abandon_download();
        }
    }
}
