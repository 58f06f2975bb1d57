use serial_can_bridge::transport::{Bridge, BridgeConfig};
use serial_can_bridge::{ActuatorCommand, SpeedControllerCommand};
use std::env;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut config = BridgeConfig::default().with_timeout(Duration::from_secs(2));
    if let Some(port) = args.get(1) {
        config.port = port.clone();
    }
    if let Some(baud_rate) = args.get(2) {
        config.baud_rate = baud_rate.parse()?;
    }

    // Connect to the bridge.
    let mut bridge = Bridge::open(&config)?;

    // Quarter turn on speed controller 1, heartbeat included.
    bridge.send_speed_controller_command(&SpeedControllerCommand::new(1, 1, 90.0))?;
    for line in bridge.read_lines(4)? {
        print!("{}", String::from_utf8_lossy(&line));
    }

    // 45 degrees on actuator 3.
    bridge.send_actuator_command(&ActuatorCommand::new(2, 3, 45.0))?;
    for line in bridge.read_lines(4)? {
        print!("{}", String::from_utf8_lossy(&line));
    }

    Ok(())
}
