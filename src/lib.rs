//! Packet encoder for a serial-to-CAN bridge driving motor controllers.
//!
//! Every packet on the serial link is a five byte [`Header`] (channel and
//! data length packed in one byte, then the little endian arbitration id)
//! followed by the CAN payload. The [`command`] module builds the payloads
//! for the speed controllers and the actuator controllers, [`decode`] reads
//! packets back the way the bridge does, and with the `std` feature
//! [`transport`] talks to the bridge over a serial port.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod command;
pub mod consts;
pub mod decode;
mod error;
mod frame;
mod header;
#[cfg(feature = "std")]
pub mod transport;

pub use command::{
    encode_actuator_controller_command, encode_speed_controller_command, ActuatorCommand,
    Heartbeat, SpeedControllerCommand,
};
pub use decode::{decode_packet, Message, Packets, RawPacket};
pub use error::DecodeError;
pub use error::EncodingRangeError;
#[cfg(feature = "std")]
pub use error::TransportError;
pub use frame::{Frame, Packet};
pub use header::{encode_header, Header};

pub use embedded_can::{ExtendedId, Id, StandardId};
