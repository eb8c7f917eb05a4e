//! Request telemetry from the arm controller and print the end-effector
//! position for a fixed number of measurements.
//!
//! Usage: ARMKIN_ADDR=10.0.0.5 cargo run --example positions
//! `ARMKIN_CYCLES` sets how many measurements are printed (default 5).

fn main() {
    env_logger::init();

    let config = match armkin::Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let client = match armkin::ArmClient::connect(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to open telemetry socket: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = client.send_request() {
        eprintln!("Failed to send request to {}: {}", client.endpoint(), e);
        std::process::exit(1);
    }

    let mut printed = 0;
    while printed < config.cycles {
        let measurement = match client.recv_measurement() {
            Ok(m) => m,
            Err(armkin::ArmkinError::InvalidPacket { expected, actual }) => {
                eprintln!("Skipping {} byte datagram (expected {})", actual, expected);
                continue;
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        };

        let sample = client.solve(&measurement);
        println!("Received message {}:", sample.timestamp);
        println!("End-effector position");
        println!("{}", sample.position);
        println!();
        printed += 1;
    }
}
