//! # pcmi-client
//!
//! A client library for the PCMI serial-bus protocol used by livestock and
//! greenhouse environmental controllers: a half-duplex, hex-ASCII,
//! checksummed request/response dialogue over RS-485.
//!
//! The crate is organized bottom-up:
//!
//! - [`wire`] — framing primitives: hex-ASCII codec, checksum, RLI/VLI
//!   length indicators, the two endian strategies, and frame
//!   classification. Pure, synchronous, no I/O.
//! - [`record`] — typed decoders for every record kind a controller sends:
//!   zone parameters/variables, device parameters/variables, history,
//!   alarm, and version records.
//! - [`transport`] — the byte-stream boundary, with a serial
//!   implementation (behind the `serial-transport` feature) and a scripted
//!   mock for tests.
//! - [`session`] — the dialogue state machine: `Client::connect`, the lazy
//!   pull-download iterator, retry policy, and `Client::disconnect`.
//!
//! ```no_run
//! use pcmi_client::session::{Client, Config};
//! use pcmi_client::transport::serial::SerialTransport;
//! use pcmi_client::wire::command;
//!
//! # fn main() -> Result<(), pcmi_client::error::PcmiError> {
//! let transport = SerialTransport::new("/dev/ttyUSB0");
//! let mut client = Client::new(Config::new("/dev/ttyUSB0"), transport);
//! client.connect("12345678")?;
//! for record in client.download(command::SEND_ZONE_PARM)? {
//!     let record = record?;
//!     println!("{record:?}");
//! }
//! client.disconnect()?;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![cfg_attr(test, deny(warnings))]

mod tools;

pub mod record;
pub mod session;
pub mod transport;
pub mod wire;

pub use crate::tools::error;

#[cfg(test)]
mod tests {
    pub fn init() {
        std::env::set_var("RUST_LOG", "debug");
        env_logger::builder().is_test(true).try_init().ok();
    }
}
