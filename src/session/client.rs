//! The session machine: connect, pull-download, ack/retry, disconnect.
//! Single-threaded, synchronous, no internal parallelism — the transport's
//! blocking read/write calls are the only suspension points.

use crate::record::device::DeviceRegistry;
use crate::record::{self, Record};
use crate::session::config::Config;
use crate::session::download::Download;
use crate::session::state::State;
use crate::tools::error::{PcmiError, Result};
use crate::transport::Transport;
use crate::wire::command;
use crate::wire::frame::{self, Frame, FrameOutcome};

/// Drives one PCMI dialogue over a [`Transport`]. Construction does not
/// open the transport; [`Client::connect`] does.
pub struct Client<T: Transport> {
    transport: T,
    config: Config,
    registry: DeviceRegistry,
    state: State,
    last_outgoing: Vec<u8>,
}

impl<T: Transport> Client<T> {
    /// Build a client bound to `transport`, using the process-wide
    /// [`DeviceRegistry::standard`] for device decoding.
    pub fn new(config: Config, transport: T) -> Self {
        Client {
            transport,
            config,
            registry: DeviceRegistry::standard(),
            state: State::Disconnected,
            last_outgoing: Vec::new(),
        }
    }

    /// Current session state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Borrow the underlying transport. Mainly useful in tests, to inspect
    /// what a session actually wrote to the wire.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Open the transport and run the serial-number handshake. On any
    /// failure the client returns to [`State::Disconnected`] and the
    /// transport is closed.
    pub fn connect(&mut self, serial_number: &str) -> Result<()> {
        self.transport.open()?;
        self.state = State::Connecting;

        let outgoing = frame::build_connect_frame(serial_number)?;
        let result = self.send_with_retries(outgoing);

        match result {
            Ok(frame) if frame.command() == command::SN_ACK => {
                self.state = State::Connected;
                Ok(())
            }
            Ok(frame) => {
                let _ = self.transport.close();
                self.state = State::Disconnected;
                Err(PcmiError::connection(format!(
                    "connect: unexpected response {:#04X}",
                    frame.command()
                )))
            }
            Err(e) => {
                let _ = self.transport.close();
                self.state = State::Disconnected;
                Err(e)
            }
        }
    }

    /// Begin a pull-download dialogue driven by `request_command` (e.g.
    /// `wire::command::SEND_ZONE_PARM`). Returns a lazy iterator of decoded
    /// records; dropping it before exhaustion sends `PCMI_BREAK` and
    /// returns the session to [`State::Connected`].
    pub fn download(&mut self, request_command: u8) -> Result<Download<'_, T>> {
        if !self.state.can_start_download() {
            return Err(PcmiError::protocol(format!(
                "cannot start a download from state {:?}",
                self.state
            )));
        }
        self.state = State::Downloading;

        let outgoing = frame::build_bare_frame(request_command);
        match self.send_with_retries(outgoing) {
            Ok(frame) => Ok(Download::new(self, request_command, frame)),
            Err(e) => {
                self.state = State::Error;
                Err(e)
            }
        }
    }

    /// Send `PCMI_BREAK`, wait for `PCMI_BR_ACK` (best-effort: a timeout on
    /// this exchange is swallowed, since closing the transport is
    /// sufficient), close the transport, and return to
    /// [`State::Disconnected`]. Idempotent.
    pub fn disconnect(&mut self) -> Result<()> {
        if self.state == State::Disconnected {
            return Ok(());
        }
        let outgoing = frame::build_bare_frame(command::BREAK);
        let _ = self.send_with_retries(outgoing);
        let _ = self.transport.close();
        self.state = State::Disconnected;
        Ok(())
    }

    /// Abandon an in-progress download: send `PCMI_BREAK`, drain the
    /// response, return to [`State::Connected`]. Used by
    /// [`Download`](crate::session::download::Download)'s `Drop` impl when
    /// the caller stops consuming before `PCMI_END_OF_RECORD`.
    pub(crate) fn abandon_download(&mut self) {
        let outgoing = frame::build_bare_frame(command::BREAK);
        let _ = self.send_with_retries(outgoing);
        self.state = State::Connected;
    }

    /// Return to [`State::Connected`] after a download dialogue runs to
    /// completion (`PCMI_END_OF_RECORD` seen). Used by
    /// [`Download`](crate::session::download::Download) instead of
    /// `abandon_download`, since no `PCMI_BREAK` is needed here.
    pub(crate) fn finish_download(&mut self) {
        self.state = State::Connected;
    }

    /// Mark the session as broken after a download dialogue fails in a way
    /// that isn't a clean `PCMI_BREAK`-able abandonment (a decode error, an
    /// unexpected frame, a controller error). No further requests can be
    /// sent without a fresh [`Client::connect`].
    pub(crate) fn fail_download(&mut self) {
        self.state = State::Error;
    }

    /// Decode one data-string frame into a [`Record`] using this client's
    /// registry.
    pub(crate) fn decode_frame(&self, command: u8, payload_hex: &str) -> Result<Record> {
        record::decode(command, payload_hex, &self.registry)
    }

    /// Send `outgoing`, ask for the next frame, send `PCMI_OK_SEND_NEXT`,
    /// and read the frame that follows. Used by
    /// [`Download`](crate::session::download::Download) to pull the next
    /// record.
    pub(crate) fn request_next(&mut self) -> Result<Frame> {
        let outgoing = frame::build_bare_frame(command::OK_SEND_NEXT);
        self.send_with_retries(outgoing)
    }

    /// Write `outgoing`, then read frames until one is neither a transient
    /// transport fault nor a `PCMI_ER_TRY_AGAIN`, retrying the same
    /// `outgoing` bytes under the configured budgets. `PCMI_ER_HANDS_OFF`
    /// and `PCMI_ER_START_UP` and any other controller error in `0xC0..0xDB`
    /// surface immediately as typed errors rather than being retried here.
    fn send_with_retries(&mut self, outgoing: Vec<u8>) -> Result<Frame> {
        self.transport.write(&outgoing)?;
        self.last_outgoing = outgoing;

        let mut transport_attempts = 0u32;
        let mut session_attempts = 0u32;

        loop {
            match self.read_one_frame() {
                Err(e @ (PcmiError::Timeout | PcmiError::Checksum { .. })) => {
                    transport_attempts += 1;
                    if transport_attempts > self.config.max_retries_transport {
                        self.state = State::Error;
                        return Err(e);
                    }
                    self.transport.write(&self.last_outgoing.clone())?;
                    continue;
                }
                Err(e) => return Err(e),
                Ok(frame) => {
                    let cmd = frame.command();
                    if cmd == command::ER_TRY_AGAIN {
                        session_attempts += 1;
                        if session_attempts > self.config.max_retries_session {
                            self.state = State::Error;
                            return Err(PcmiError::controller(cmd));
                        }
                        self.transport.write(&self.last_outgoing.clone())?;
                        continue;
                    }
                    if cmd == command::ER_HANDS_OFF || cmd == command::ER_START_UP {
                        return Err(PcmiError::controller(cmd));
                    }
                    if command::is_error(cmd) {
                        return Err(PcmiError::controller(cmd));
                    }
                    return Ok(frame);
                }
            }
        }
    }

    fn read_one_frame(&mut self) -> Result<Frame> {
        let timeout = self.config.timeout;
        let first = self.transport.read(1, timeout)?;
        let cmd = *first.first().ok_or_else(PcmiError::timeout)?;

        let mut buffer = vec![cmd];
        if !command::is_bare_ack(cmd) {
            let rest = self.transport.read_until(0x0D, timeout)?;
            buffer.extend_from_slice(&rest);
        }

        match frame::read_frame(&buffer) {
            FrameOutcome::Frame(f) => Ok(f),
            FrameOutcome::BadChecksum { expected, actual } => {
                Err(PcmiError::checksum(expected, actual))
            }
            FrameOutcome::NeedMoreBytes => Err(PcmiError::protocol(
                "frame incomplete after reading to the CR terminator".to_string(),
            )),
            FrameOutcome::Malformed(msg) => Err(PcmiError::protocol(msg)),
        }
    }
}

impl<T: Transport> std::fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("state", &self.state)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;

    fn record_frame(command: u8, payload_hex: &str) -> Vec<u8> {
        let mut region = vec![command];
        region.extend_from_slice(crate::wire::length::encode_1byte_rli(payload_hex.len() / 2).unwrap().as_bytes());
        region.extend_from_slice(payload_hex.as_bytes());
        frame::finish_outgoing_frame(&region)
    }

    #[test]
    fn connect_succeeds_on_sn_ack() {
        let mut transport = MockTransport::new();
        transport.queue_response(vec![command::SN_ACK]);
        let mut client = Client::new(Config::new("mock"), transport);

        client.connect("99999999").unwrap();
        assert_eq!(client.state(), State::Connected);
    }

    #[test]
    fn connect_fails_and_returns_to_disconnected_on_unexpected_reply() {
        let mut transport = MockTransport::new();
        transport.queue_response(vec![command::AT_ACK]);
        let mut client = Client::new(Config::new("mock"), transport);

        assert!(client.connect("99999999").is_err());
        assert_eq!(client.state(), State::Disconnected);
    }

    #[test]
    fn download_yields_records_then_stops_at_end_of_record() {
        let mut transport = MockTransport::new();
        transport.queue_response(vec![command::SN_ACK]);

        let mut zone_payload = format!("{:04X}{:02X}{:02X}{:02X}", 10u16, 3u8, 1u8, 2u8);
        zone_payload.push_str("010203");
        zone_payload.push_str("00960096");
        zone_payload.push_str("03E8FC18");
        zone_payload.push_str("0032");
        zone_payload.push_str("3264");

        transport.queue_response(record_frame(command::ZONE_PARM_DATA, &zone_payload));
        transport.queue_response(vec![command::END_OF_RECORD]);

        let mut client = Client::new(Config::new("mock"), transport);
        client.connect("99999999").unwrap();

        let mut download = client.download(command::SEND_ZONE_PARM).unwrap();
        let first = download.next().unwrap().unwrap();
        assert!(matches!(first, Record::ZoneParameters(_)));
        assert!(download.next().is_none());
        drop(download);
        assert_eq!(client.state(), State::Connected);
    }

    #[test]
    fn dropping_a_download_early_sends_break() {
        let mut transport = MockTransport::new();
        transport.queue_response(vec![command::SN_ACK]);
        let mut zone_payload = format!("{:04X}{:02X}{:02X}{:02X}", 10u16, 3u8, 1u8, 2u8);
        zone_payload.push_str("010203");
        zone_payload.push_str("00960096");
        zone_payload.push_str("03E8FC18");
        zone_payload.push_str("0032");
        zone_payload.push_str("3264");
        transport.queue_response(record_frame(command::ZONE_PARM_DATA, &zone_payload));
        transport.queue_response(vec![command::BR_ACK]);

        let mut client = Client::new(Config::new("mock"), transport);
        client.connect("99999999").unwrap();
        {
            let mut download = client.download(command::SEND_ZONE_PARM).unwrap();
            let _ = download.next().unwrap().unwrap();
        }
        assert_eq!(client.state(), State::Connected);
    }
}
