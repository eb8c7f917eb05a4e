//! Stream end-effector poses as JSON lines.
//!
//! {"t":1596314,"x":-1.3980,"y":-0.5330,"z":-0.0400}
//!
//! Usage: cargo run --release --example stream_json

use std::io::{self, Write};
use std::time::Duration;

fn main() {
    env_logger::init();

    let client = match armkin::ArmClient::connect_from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to connect: {}", e);
            std::process::exit(1);
        }
    };

    eprintln!("Endpoint: {}", client.endpoint());

    let stream = match client.start_stream() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to start stream: {}", e);
            std::process::exit(1);
        }
    };

    eprintln!("Streaming JSON (Ctrl+C to stop)...");

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut idle_timeouts: u32 = 0;

    loop {
        match stream.recv_timeout(Duration::from_secs(2)) {
            Ok(sample) => {
                idle_timeouts = 0;
                let p = sample.position;
                let _ = writeln!(
                    out,
                    "{{\"t\":{},\"x\":{:.4},\"y\":{:.4},\"z\":{:.4}}}",
                    sample.timestamp, p.x, p.y, p.z,
                );
                let _ = out.flush();
            }
            Err(armkin::ArmkinError::Timeout) => {
                idle_timeouts += 1;
                eprintln!("No telemetry for 2s (timeout #{})", idle_timeouts);
                if idle_timeouts >= 15 {
                    eprintln!("Stopping after 30s without telemetry");
                    break;
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                break;
            }
        }
    }
}
