//! Position commands for the two controller families on the bus.
//!
//! The speed controllers take a little endian `f32` in turns and stop
//! listening unless they keep seeing the robot controller heartbeat, so every
//! speed controller command is sent as two packets: heartbeat, then setpoint.
//! The actuator controllers take a big endian `i32` in 1/10000 degree.
use crate::consts::{
    ACTUATOR_POSITION_SCALE, ACTUATOR_POSITION_SETPOINT, DEGREES_PER_TURN, HEADER_LEN,
    HEARTBEAT_ID, HEARTBEAT_PAYLOAD, MAX_EXTENDED_ID, SPEED_CONTROLLER_POSITION_SETPOINT,
};
use crate::error::EncodingRangeError;
use crate::frame::{Frame, Packet};

/// Encoded size of a heartbeat packet.
pub const HEARTBEAT_LEN: usize = HEADER_LEN + 8;

/// Encoded size of a speed controller command, heartbeat included.
pub const SPEED_CONTROLLER_COMMAND_LEN: usize = HEARTBEAT_LEN + HEADER_LEN + 8;

/// Encoded size of an actuator command.
pub const ACTUATOR_COMMAND_LEN: usize = HEADER_LEN + 4;

fn arbitration_id(base: u32, device_id: u32) -> Result<u32, EncodingRangeError> {
    base.checked_add(device_id)
        .filter(|id| *id <= MAX_EXTENDED_ID)
        .ok_or(EncodingRangeError::ArbitrationId { base, device_id })
}

fn command_frame(base: u32, device_id: u32, data: &[u8]) -> Result<Frame, EncodingRangeError> {
    let id = arbitration_id(base, device_id)?;
    Frame::extended(id, data).ok_or(EncodingRangeError::PayloadTooLong(data.len()))
}

fn encode_packets<const N: usize>(packets: &[Packet]) -> Result<[u8; N], EncodingRangeError> {
    let mut buf = [0u8; N];
    let mut offset = 0;
    for packet in packets {
        offset += packet.encode_into(&mut buf[offset..])?;
    }
    debug_assert_eq!(offset, N);

    Ok(buf)
}

/// Scales degrees to the actuator fixed point, rounding half away from zero.
fn actuator_position(degree: f64) -> Result<i32, EncodingRangeError> {
    let scaled = degree * ACTUATOR_POSITION_SCALE;
    // also rejects NaN; inside the range the truncation below cannot saturate
    if !(i32::MIN as f64 - 0.5..i32::MAX as f64 + 0.5).contains(&scaled) {
        return Err(EncodingRangeError::Position(degree));
    }

    let truncated = scaled as i64;
    let fraction = scaled - truncated as f64;
    let rounded = if fraction >= 0.5 {
        truncated + 1
    } else if fraction <= -0.5 {
        truncated - 1
    } else {
        truncated
    };

    i32::try_from(rounded).map_err(|_| EncodingRangeError::Position(degree))
}

/// Robot controller heartbeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heartbeat {
    pub channel: u8,
}

impl Heartbeat {
    pub fn new(channel: u8) -> Self {
        Self { channel }
    }

    pub fn packet(&self) -> Result<Packet, EncodingRangeError> {
        let frame = Frame::extended(HEARTBEAT_ID, &HEARTBEAT_PAYLOAD).ok_or(
            EncodingRangeError::ArbitrationId {
                base: HEARTBEAT_ID,
                device_id: 0,
            },
        )?;
        Ok(Packet::new(self.channel, frame))
    }

    pub fn encode(&self) -> Result<[u8; HEARTBEAT_LEN], EncodingRangeError> {
        encode_packets(&[self.packet()?])
    }
}

/// Position setpoint for a brushless speed controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedControllerCommand {
    pub channel: u8,
    pub device_id: u32,
    /// Target angle; not range checked.
    pub degree: f64,
}

impl SpeedControllerCommand {
    pub fn new(channel: u8, device_id: u32, degree: f64) -> Self {
        Self {
            channel,
            device_id,
            degree,
        }
    }

    /// Setpoint in turns as sent on the wire.
    pub fn turns(&self) -> f32 {
        (self.degree / DEGREES_PER_TURN) as f32
    }

    pub fn payload(&self) -> [u8; 8] {
        let [a, b, c, d] = self.turns().to_le_bytes();
        [a, b, c, d, 0, 0, 0, 0]
    }

    /// Heartbeat followed by the setpoint.
    pub fn packets(&self) -> Result<[Packet; 2], EncodingRangeError> {
        let setpoint = command_frame(
            SPEED_CONTROLLER_POSITION_SETPOINT,
            self.device_id,
            &self.payload(),
        )?;

        Ok([
            Heartbeat::new(self.channel).packet()?,
            Packet::new(self.channel, setpoint),
        ])
    }

    pub fn encode(&self) -> Result<[u8; SPEED_CONTROLLER_COMMAND_LEN], EncodingRangeError> {
        encode_packets(&self.packets()?)
    }
}

/// Position setpoint for an actuator controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActuatorCommand {
    pub channel: u8,
    pub device_id: u32,
    pub degree: f64,
}

impl ActuatorCommand {
    pub fn new(channel: u8, device_id: u32, degree: f64) -> Self {
        Self {
            channel,
            device_id,
            degree,
        }
    }

    /// Position in 1/10000 degree.
    pub fn position(&self) -> Result<i32, EncodingRangeError> {
        actuator_position(self.degree)
    }

    pub fn packet(&self) -> Result<Packet, EncodingRangeError> {
        let payload = self.position()?.to_be_bytes();
        let frame = command_frame(ACTUATOR_POSITION_SETPOINT, self.device_id, &payload)?;
        Ok(Packet::new(self.channel, frame))
    }

    pub fn encode(&self) -> Result<[u8; ACTUATOR_COMMAND_LEN], EncodingRangeError> {
        encode_packets(&[self.packet()?])
    }
}

/// Encodes a heartbeat and a speed controller position setpoint.
pub fn encode_speed_controller_command(
    channel: u8,
    device_id: u32,
    degree: f64,
) -> Result<[u8; SPEED_CONTROLLER_COMMAND_LEN], EncodingRangeError> {
    SpeedControllerCommand::new(channel, device_id, degree).encode()
}

/// Encodes an actuator controller position setpoint.
pub fn encode_actuator_controller_command(
    channel: u8,
    device_id: u32,
    degree: f64,
) -> Result<[u8; ACTUATOR_COMMAND_LEN], EncodingRangeError> {
    ActuatorCommand::new(channel, device_id, degree).encode()
}
