//! Wire constants shared by the encoder and the decoder.

/// Arbitration id base for the speed controller position setpoint.
/// The controller's device id is added to it.
pub const SPEED_CONTROLLER_POSITION_SETPOINT: u32 = 0x0205_0100;

/// Arbitration id base for the actuator controller position setpoint.
pub const ACTUATOR_POSITION_SETPOINT: u32 = 0x400;

/// Arbitration id of the heartbeat the speed controllers expect from the
/// robot controller. Without it they refuse to move.
pub const HEARTBEAT_ID: u32 = 0x0101_1840;

/// Heartbeat payload.
pub const HEARTBEAT_PAYLOAD: [u8; 8] = [0xFF; 8];

/// Highest channel number that fits the 3 bit header field.
pub const MAX_CHANNEL: u8 = 0x07;

/// Highest data length that fits the 5 bit header field.
pub const MAX_DATA_LENGTH: u8 = 0x1F;

/// Size of the packed header: one header byte plus the arbitration id.
pub const HEADER_LEN: usize = 5;

/// Largest payload a classic CAN frame carries.
pub const MAX_FRAME_DATA: usize = 8;

/// Number of CAN controllers populated on the bridge. Channels at or above
/// this are dropped by the bridge firmware.
pub const BRIDGE_CONTROLLER_COUNT: u8 = 6;

/// Highest raw value of a 29 bit extended CAN identifier.
pub const MAX_EXTENDED_ID: u32 = 0x1FFF_FFFF;

/// Mask of the device number carried in the low bits of a speed controller id.
pub const SPEED_CONTROLLER_DEVICE_MASK: u32 = 0x3F;

/// Number of actuator device ids addressable above [`ACTUATOR_POSITION_SETPOINT`].
pub const ACTUATOR_DEVICE_SPAN: u32 = 0x100;

/// Fixed point scale of the actuator position payload (units per degree).
pub const ACTUATOR_POSITION_SCALE: f64 = 10_000.0;

/// Degrees in one turn of the speed controller position payload.
pub const DEGREES_PER_TURN: f64 = 360.0;
