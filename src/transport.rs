//! Serial link to the bridge.
//!
//! Reads block until a byte arrives or the configured timeout runs out; a
//! timeout surfaces as [`TransportError::Io`] with kind `TimedOut`.
use crate::command::{ActuatorCommand, SpeedControllerCommand};
use crate::consts::{HEADER_LEN, MAX_FRAME_DATA};
use crate::error::TransportError;
use crate::frame::Packet;
use serialport::SerialPort;
use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

/// Where the bridge is and how to talk to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    pub port: String,
    pub baud_rate: u32,
    pub timeout: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyACM0".into(),
            baud_rate: 115_200,
            timeout: Duration::from_secs(1),
        }
    }
}

impl BridgeConfig {
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            ..Self::default()
        }
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Open connection to the bridge.
pub struct Bridge<P = Box<dyn SerialPort>> {
    port: P,
}

impl Bridge {
    pub fn open(config: &BridgeConfig) -> Result<Self, TransportError> {
        let port = serialport::new(config.port.as_str(), config.baud_rate)
            .timeout(config.timeout)
            .open()?;

        log::debug!(
            "opened {} at {} baud, timeout {:?}",
            config.port,
            config.baud_rate,
            config.timeout
        );

        Ok(Self { port })
    }
}

impl<P: Read + Write> Bridge<P> {
    /// Wraps an already open port.
    pub fn from_port(port: P) -> Self {
        Self { port }
    }

    pub fn into_inner(self) -> P {
        self.port
    }

    pub fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.port.write_all(bytes)?;
        self.port.flush()?;
        log::debug!("wrote {} bytes: {:02X?}", bytes.len(), bytes);
        Ok(())
    }

    pub fn send_packet(&mut self, packet: &Packet) -> Result<(), TransportError> {
        let mut buf = [0u8; HEADER_LEN + MAX_FRAME_DATA];
        let len = packet.encode_into(&mut buf)?;
        self.write(&buf[..len])
    }

    pub fn send_speed_controller_command(
        &mut self,
        command: &SpeedControllerCommand,
    ) -> Result<(), TransportError> {
        self.write(&command.encode()?)
    }

    pub fn send_actuator_command(
        &mut self,
        command: &ActuatorCommand,
    ) -> Result<(), TransportError> {
        self.write(&command.encode()?)
    }

    /// Reads up to and including the next `\n`. Returns what was read if the
    /// port reaches end of file first.
    pub fn read_line(&mut self) -> Result<Vec<u8>, TransportError> {
        let mut line = Vec::new();
        let mut byte = [0u8; 1];

        loop {
            match self.port.read(&mut byte) {
                Ok(0) => break,
                Ok(_) => {
                    line.push(byte[0]);
                    if byte[0] == b'\n' {
                        break;
                    }
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }

        log::debug!("read line: {:?}", String::from_utf8_lossy(&line));
        Ok(line)
    }

    pub fn read_lines(&mut self, count: usize) -> Result<Vec<Vec<u8>>, TransportError> {
        (0..count).map(|_| self.read_line()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;
    use std::io::{self, Cursor};

    #[derive(Default)]
    struct MockPort {
        input: Cursor<Vec<u8>>,
        written: Vec<u8>,
    }

    impl MockPort {
        fn with_input(input: &[u8]) -> Self {
            Self {
                input: Cursor::new(input.to_vec()),
                written: Vec::new(),
            }
        }
    }

    impl Read for MockPort {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for MockPort {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct TimedOutPort;

    impl Read for TimedOutPort {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::TimedOut, "timed out"))
        }
    }

    impl Write for TimedOutPort {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn config_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.port, "/dev/ttyACM0");
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.timeout, Duration::from_secs(1));

        let config = BridgeConfig::new("/dev/ttyUSB1")
            .with_baud_rate(921_600)
            .with_timeout(Duration::from_millis(50));
        assert_eq!(config.port, "/dev/ttyUSB1");
        assert_eq!(config.baud_rate, 921_600);
        assert_eq!(config.timeout, Duration::from_millis(50));
    }

    #[test]
    fn send_commands() {
        let mut bridge = Bridge::from_port(MockPort::default());
        bridge
            .send_speed_controller_command(&SpeedControllerCommand::new(1, 1, 90.0))
            .unwrap();
        bridge
            .send_actuator_command(&ActuatorCommand::new(2, 3, 45.0))
            .unwrap();

        let written = bridge.into_inner().written;
        assert_eq!(written.len(), 26 + 9);
        assert_eq!(&written[..5], &[0x41, 0x40, 0x18, 0x01, 0x01]);
        assert_eq!(
            &written[26..],
            &[0x22, 0x03, 0x04, 0x00, 0x00, 0x00, 0x06, 0xDD, 0xD0]
        );
    }

    #[test]
    fn send_packet() {
        let mut bridge = Bridge::from_port(MockPort::default());
        let frame = Frame::extended(0, &[]).unwrap();
        bridge.send_packet(&Packet::new(5, frame)).unwrap();
        assert_eq!(bridge.into_inner().written, [0x05, 0x00, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn encoding_error_writes_nothing() {
        let mut bridge = Bridge::from_port(MockPort::default());
        let result = bridge.send_actuator_command(&ActuatorCommand::new(8, 0, 0.0));
        assert!(matches!(result, Err(TransportError::Encoding(_))));
        assert!(bridge.into_inner().written.is_empty());
    }

    #[test]
    fn read_lines() {
        let mut bridge = Bridge::from_port(MockPort::with_input(
            b"[DEBUG] Got header\r\n[DEBUG] Got data\npartial",
        ));
        let lines = bridge.read_lines(2).unwrap();
        assert_eq!(
            lines,
            [
                b"[DEBUG] Got header\r\n".to_vec(),
                b"[DEBUG] Got data\n".to_vec()
            ]
        );
        assert_eq!(bridge.read_line().unwrap(), b"partial");
        assert!(bridge.read_line().unwrap().is_empty());
    }

    #[test]
    fn read_timeout() {
        let mut bridge = Bridge::from_port(TimedOutPort);
        match bridge.read_line() {
            Err(TransportError::Io(err)) => assert_eq!(err.kind(), ErrorKind::TimedOut),
            other => panic!("unexpected {:?}", other),
        }
    }
}
