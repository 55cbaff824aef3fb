//! Wire-level framing: hex ASCII and checksum primitives, the endian
//! strategy, the hex cursor, command classification, and frame reading.
//! Everything here is pure and synchronous; it never touches the transport.

pub mod checksum;
pub mod command;
pub mod cursor;
pub mod endian;
pub mod frame;
pub mod hexcodec;
pub mod length;
