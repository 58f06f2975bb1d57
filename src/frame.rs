use crate::consts::{HEADER_LEN, MAX_FRAME_DATA};
use crate::error::EncodingRangeError;
use crate::header::Header;
use embedded_can::{ExtendedId, Frame as _, Id};

/// CAN frame as handed to the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    id: Id,
    remote: bool,
    dlc: u8,
    data: [u8; MAX_FRAME_DATA],
}

impl Frame {
    /// Data frame with an extended identifier, the form the bridge transmits.
    pub fn extended(raw_id: u32, data: &[u8]) -> Option<Self> {
        let id = ExtendedId::new(raw_id)?;
        <Self as embedded_can::Frame>::new(id, data)
    }

    /// Raw value of the identifier, standard or extended.
    pub fn raw_id(&self) -> u32 {
        match self.id {
            Id::Standard(id) => id.as_raw() as u32,
            Id::Extended(id) => id.as_raw(),
        }
    }
}

impl embedded_can::Frame for Frame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        if data.len() > MAX_FRAME_DATA {
            return None;
        }

        let mut data_all = [0; MAX_FRAME_DATA];
        data_all[0..data.len()].copy_from_slice(data);

        Some(Self {
            id: id.into(),
            remote: false,
            dlc: data.len() as u8,
            data: data_all,
        })
    }

    fn new_remote(id: impl Into<Id>, dlc: usize) -> Option<Self> {
        if dlc > MAX_FRAME_DATA {
            return None;
        }

        Some(Self {
            id: id.into(),
            remote: true,
            dlc: dlc as u8,
            data: [0; MAX_FRAME_DATA],
        })
    }

    fn id(&self) -> Id {
        self.id
    }

    fn dlc(&self) -> usize {
        self.dlc as usize
    }

    fn data(&self) -> &[u8] {
        if self.remote {
            return &[];
        }

        &self.data[0..self.dlc()]
    }

    fn is_extended(&self) -> bool {
        matches!(self.id, Id::Extended(_))
    }

    fn is_remote_frame(&self) -> bool {
        self.remote
    }
}

/// Identifier the bridge puts on the bus. The bridge only transmits extended
/// data frames, and it reads `data_length` payload bytes after every header.
fn bridge_id(frame: &Frame) -> Result<u32, EncodingRangeError> {
    if frame.remote {
        return Err(EncodingRangeError::RemoteFrame);
    }

    match frame.id {
        Id::Extended(id) => Ok(id.as_raw()),
        Id::Standard(id) => Err(EncodingRangeError::StandardId(id.as_raw())),
    }
}

/// A frame addressed to one CAN controller of the bridge.
///
/// Only extended data frames can be encoded; remote frames and standard
/// identifiers are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet {
    pub channel: u8,
    pub frame: Frame,
}

impl Packet {
    pub fn new(channel: u8, frame: Frame) -> Self {
        Self { channel, frame }
    }

    /// Converts any `embedded_can` frame into a packet.
    pub fn from_frame(
        channel: u8,
        frame: &impl embedded_can::Frame,
    ) -> Result<Self, EncodingRangeError> {
        if frame.is_remote_frame() {
            return Err(EncodingRangeError::RemoteFrame);
        }

        let converted = Frame::new(frame.id(), frame.data())
            .ok_or(EncodingRangeError::PayloadTooLong(frame.dlc()))?;
        bridge_id(&converted)?;

        Ok(Self {
            channel,
            frame: converted,
        })
    }

    pub fn header(&self) -> Result<Header, EncodingRangeError> {
        Header::new(self.channel, self.frame.dlc, bridge_id(&self.frame)?)
    }

    /// Bytes this packet occupies on the wire.
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + self.frame.data().len()
    }

    /// Writes header and payload to `buf`, returning the number of bytes written.
    pub fn encode_into(&self, buf: &mut [u8]) -> Result<usize, EncodingRangeError> {
        let header = self.header()?.encode();
        let len = self.encoded_len();
        if buf.len() < len {
            return Err(EncodingRangeError::BufferTooSmall {
                need: len,
                have: buf.len(),
            });
        }

        buf[..HEADER_LEN].copy_from_slice(&header);
        buf[HEADER_LEN..len].copy_from_slice(self.frame.data());

        log::trace!(
            "packet channel={} id={:#x} len={}",
            self.channel,
            self.frame.raw_id(),
            self.frame.dlc
        );

        Ok(len)
    }
}
