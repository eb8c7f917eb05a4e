//! Stand-in arm controller for local testing.
//!
//! Answers each `get` request with a burst of measurements that sweep every
//! joint through a slow sine.
//!
//! Usage: cargo run --example fake_arm [port] [count]

use armkin::protocol::{self, encode_measurement};
use armkin::Measurement;
use std::net::UdpSocket;
use std::time::Duration;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let port: u16 = args
        .next()
        .and_then(|v| v.parse().ok())
        .unwrap_or(protocol::DEFAULT_PORT);
    let count: u64 = args.next().and_then(|v| v.parse().ok()).unwrap_or(100);

    let socket = UdpSocket::bind(("0.0.0.0", port)).unwrap_or_else(|e| {
        eprintln!("Failed to bind port {}: {}", port, e);
        std::process::exit(1);
    });
    eprintln!("Fake arm listening on udp/{} ({} samples per request)", port, count);

    let mut timestamp: u64 = 0;
    let mut buf = [0u8; protocol::RECV_BUFFER_SIZE];
    loop {
        let (len, peer) = match socket.recv_from(&mut buf) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("recv error: {}", e);
                continue;
            }
        };
        if !protocol::is_request(&buf[..len]) {
            log::warn!("Ignoring {} byte datagram from {}", len, peer);
            continue;
        }
        log::info!("Request from {}", peer);

        for _ in 0..count {
            timestamp += 1;
            let phase = timestamp as f64 * 0.02;
            let mut angles = [0.0; armkin::JOINT_COUNT];
            for (i, a) in angles.iter_mut().enumerate() {
                *a = 45.0 * (phase + i as f64).sin();
            }
            let packet = encode_measurement(&Measurement { timestamp, angles });
            if let Err(e) = socket.send_to(&packet, peer) {
                eprintln!("send error: {}", e);
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
    }
}
