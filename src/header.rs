//! The five byte header that precedes every packet on the serial link.
//!
//! ```text
//! byte 0      bits 0..3  channel (CAN controller on the bridge)
//!             bits 3..8  data length
//! bytes 1..5  arbitration id, little endian
//! ```
use crate::consts::{HEADER_LEN, MAX_CHANNEL, MAX_DATA_LENGTH};
use crate::error::EncodingRangeError;
use nom::number::streaming::{le_u32, u8 as byte};
use nom::sequence::tuple;
use nom::IResult;

/// Packet header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    channel: u8,
    data_length: u8,
    arbitration_id: u32,
}

impl Header {
    /// Builds a header, rejecting fields that do not fit their bit budget.
    pub fn new(
        channel: u8,
        data_length: u8,
        arbitration_id: u32,
    ) -> Result<Self, EncodingRangeError> {
        if channel > MAX_CHANNEL {
            return Err(EncodingRangeError::Channel(channel));
        }
        if data_length > MAX_DATA_LENGTH {
            return Err(EncodingRangeError::DataLength(data_length));
        }

        Ok(Self {
            channel,
            data_length,
            arbitration_id,
        })
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn data_length(&self) -> u8 {
        self.data_length
    }

    pub fn arbitration_id(&self) -> u32 {
        self.arbitration_id
    }

    /// Packs the header into its wire form.
    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let [a, b, c, d] = self.arbitration_id.to_le_bytes();
        [self.channel | (self.data_length << 3), a, b, c, d]
    }

    /// Parses a header. Any byte is a valid header byte, so this only fails
    /// when the input is short.
    pub fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, (packed, arbitration_id)) = tuple((byte, le_u32))(input)?;

        Ok((
            input,
            Self {
                channel: packed & MAX_CHANNEL,
                data_length: packed >> 3,
                arbitration_id,
            },
        ))
    }
}

/// Encodes a header from its raw fields.
pub fn encode_header(
    channel: u8,
    data_length: u8,
    arbitration_id: u32,
) -> Result<[u8; HEADER_LEN], EncodingRangeError> {
    Ok(Header::new(channel, data_length, arbitration_id)?.encode())
}
