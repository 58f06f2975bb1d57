//! Error types.
use thiserror::Error;

/// A value does not fit the wire field it is packed into.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum EncodingRangeError {
    /// Channel does not fit the 3 bit header field.
    #[error("channel {0} out of range (max 7)")]
    Channel(u8),
    /// Data length does not fit the 5 bit header field.
    #[error("data length {0} out of range (max 31)")]
    DataLength(u8),
    /// Base plus device id is not a valid extended CAN identifier.
    #[error("device id {device_id} on base {base:#x} is not a 29 bit identifier")]
    ArbitrationId { base: u32, device_id: u32 },
    /// Scaled position does not fit the payload integer.
    #[error("position {0} degrees cannot be packed")]
    Position(f64),
    /// More payload than a CAN frame carries.
    #[error("payload of {0} bytes exceeds 8")]
    PayloadTooLong(usize),
    /// Remote frames have no place in the bridge packet format.
    #[error("remote frames cannot be sent through the bridge")]
    RemoteFrame,
    /// The bridge transmits extended identifiers only.
    #[error("standard id {0:#x} cannot be sent through the bridge")]
    StandardId(u16),
    /// Output buffer cannot hold the encoded packet.
    #[error("buffer of {have} bytes, need {need}")]
    BufferTooSmall { need: usize, have: usize },
}

/// A byte stream from the serial link could not be split into packets.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The stream ends inside a packet.
    #[error("incomplete packet")]
    Incomplete,
    /// Channel names a controller the bridge does not have.
    #[error("invalid CAN controller number: {0}")]
    UnknownController(u8),
}

/// Failures of the serial link to the bridge.
#[cfg(feature = "std")]
#[derive(Error, Debug)]
pub enum TransportError {
    /// Opening or configuring the port failed.
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),
    /// Reading or writing the port failed, timeouts included.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The command could not be encoded; nothing was written.
    #[error(transparent)]
    Encoding(#[from] EncodingRangeError),
}
