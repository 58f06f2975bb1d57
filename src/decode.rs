//! Bridge side of the link: splits a byte stream back into packets the way
//! the bridge firmware reads them (header, arbitration id, then `data_length`
//! payload bytes) and recognises the controller commands in them.
use crate::consts::{
    ACTUATOR_DEVICE_SPAN, ACTUATOR_POSITION_SETPOINT, BRIDGE_CONTROLLER_COUNT, HEARTBEAT_ID,
    SPEED_CONTROLLER_DEVICE_MASK, SPEED_CONTROLLER_POSITION_SETPOINT,
};
use crate::error::DecodeError;
use crate::header::Header;
use nom::bytes::streaming::take;
use nom::IResult;

/// A packet borrowed from the input stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPacket<'a> {
    pub header: Header,
    pub data: &'a [u8],
}

/// What a packet asks of the bus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message {
    Heartbeat,
    SpeedControllerSetpoint { device_id: u32, turns: f32 },
    /// `position` is in 1/10000 degree.
    ActuatorSetpoint { device_id: u32, position: i32 },
    Other,
}

impl RawPacket<'_> {
    pub fn classify(&self) -> Message {
        let id = self.header.arbitration_id();

        match *self.data {
            [_, _, _, _, _, _, _, _] if id == HEARTBEAT_ID => Message::Heartbeat,
            [a, b, c, d, _, _, _, _]
                if id & !SPEED_CONTROLLER_DEVICE_MASK == SPEED_CONTROLLER_POSITION_SETPOINT =>
            {
                Message::SpeedControllerSetpoint {
                    device_id: id & SPEED_CONTROLLER_DEVICE_MASK,
                    turns: f32::from_le_bytes([a, b, c, d]),
                }
            }
            [a, b, c, d]
                if (ACTUATOR_POSITION_SETPOINT
                    ..ACTUATOR_POSITION_SETPOINT + ACTUATOR_DEVICE_SPAN)
                    .contains(&id) =>
            {
                Message::ActuatorSetpoint {
                    device_id: id - ACTUATOR_POSITION_SETPOINT,
                    position: i32::from_be_bytes([a, b, c, d]),
                }
            }
            _ => Message::Other,
        }
    }
}

/// Parses one packet without checking the channel.
pub fn parse_packet(input: &[u8]) -> IResult<&[u8], RawPacket<'_>> {
    let (input, header) = Header::parse(input)?;
    let (input, data) = take(header.data_length() as usize)(input)?;

    Ok((input, RawPacket { header, data }))
}

/// Parses one packet, returning it with the remaining input.
pub fn decode_packet(input: &[u8]) -> Result<(RawPacket<'_>, &[u8]), DecodeError> {
    // every byte sequence is well formed, so running out of input is the only failure
    let (rest, packet) = parse_packet(input).map_err(|_| DecodeError::Incomplete)?;

    let channel = packet.header.channel();
    if channel >= BRIDGE_CONTROLLER_COUNT {
        log::warn!("invalid CAN controller number: {}", channel);
        return Err(DecodeError::UnknownController(channel));
    }

    Ok((packet, rest))
}

/// Iterates the packets of a byte stream. Stops after the first error.
#[derive(Debug, Clone)]
pub struct Packets<'a> {
    input: &'a [u8],
    failed: bool,
}

impl<'a> Packets<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            failed: false,
        }
    }

    /// Input not consumed yet.
    pub fn remaining(&self) -> &'a [u8] {
        self.input
    }
}

impl<'a> Iterator for Packets<'a> {
    type Item = Result<RawPacket<'a>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.input.is_empty() {
            return None;
        }

        match decode_packet(self.input) {
            Ok((packet, rest)) => {
                self.input = rest;
                Some(Ok(packet))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{encode_actuator_controller_command, encode_speed_controller_command};

    #[test]
    fn decode_speed_controller_command() {
        let bytes = encode_speed_controller_command(1, 1, 90.0).unwrap();
        let messages: Vec<_> = Packets::new(&bytes)
            .map(|packet| packet.unwrap().classify())
            .collect();

        assert_eq!(
            messages,
            [
                Message::Heartbeat,
                Message::SpeedControllerSetpoint {
                    device_id: 1,
                    turns: 0.25
                },
            ]
        );
    }

    #[test]
    fn decode_actuator_command() {
        let bytes = encode_actuator_controller_command(2, 3, 45.0).unwrap();
        let (packet, rest) = decode_packet(&bytes).unwrap();

        assert!(rest.is_empty());
        assert_eq!(packet.header.channel(), 2);
        assert_eq!(packet.header.data_length(), 4);
        assert_eq!(
            packet.classify(),
            Message::ActuatorSetpoint {
                device_id: 3,
                position: 450000
            }
        );
    }

    #[test]
    fn decode_mixed_stream() {
        let mut stream = Vec::new();
        stream.extend_from_slice(&encode_actuator_controller_command(0, 0, -1.0).unwrap());
        stream.extend_from_slice(&encode_speed_controller_command(5, 63, 720.0).unwrap());
        // header only, zero length
        stream.extend_from_slice(&[0x03, 0x00, 0x00, 0x00, 0x00]);

        let messages: Vec<_> = Packets::new(&stream)
            .map(|packet| packet.unwrap().classify())
            .collect();

        assert_eq!(
            messages,
            [
                Message::ActuatorSetpoint {
                    device_id: 0,
                    position: -10000
                },
                Message::Heartbeat,
                Message::SpeedControllerSetpoint {
                    device_id: 63,
                    turns: 2.0
                },
                Message::Other,
            ]
        );
    }

    #[test]
    fn incomplete_packet() {
        let bytes = encode_actuator_controller_command(2, 3, 45.0).unwrap();
        assert_eq!(decode_packet(&bytes[..3]), Err(DecodeError::Incomplete));
        assert_eq!(decode_packet(&bytes[..8]), Err(DecodeError::Incomplete));

        let mut packets = Packets::new(&bytes[..8]);
        assert_eq!(packets.next(), Some(Err(DecodeError::Incomplete)));
        assert_eq!(packets.next(), None);
        assert_eq!(packets.remaining(), &bytes[..8]);
    }

    #[test]
    fn unknown_controller() {
        let bytes = encode_actuator_controller_command(6, 0, 0.0).unwrap();
        assert_eq!(
            decode_packet(&bytes),
            Err(DecodeError::UnknownController(6))
        );

        let bytes = encode_speed_controller_command(7, 0, 0.0).unwrap();
        let results: Vec<_> = Packets::new(&bytes).collect();
        assert_eq!(results, [Err(DecodeError::UnknownController(7))]);
    }

    #[test]
    fn classify_other() {
        // actuator id with speed controller sized payload
        let bytes = [0x40, 0x00, 0x04, 0x00, 0x00, 0, 0, 0, 0, 0, 0, 0, 0];
        let (packet, _) = decode_packet(&bytes).unwrap();
        assert_eq!(packet.classify(), Message::Other);

        let (_, packet) = parse_packet(&[0x00, 0x40, 0x18, 0x01, 0x01]).unwrap();
        assert_eq!(packet.classify(), Message::Other);
    }

    #[test]
    fn empty_stream() {
        assert_eq!(Packets::new(&[]).next(), None);
    }
}
