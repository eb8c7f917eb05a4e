use crate::types::{JointAngles, Measurement, JOINT_COUNT};
use crate::{ArmkinError, Result};

// -- Endpoint defaults --
pub const DEFAULT_ADDR: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8088;

/// Request payload that asks the arm controller for telemetry.
pub const REQUEST: &[u8; 3] = b"get";

// -- Packet geometry --
pub const TIMESTAMP_SIZE: usize = 8;
pub const ANGLE_SIZE: usize = 8;
pub const MEASUREMENT_SIZE: usize = TIMESTAMP_SIZE + JOINT_COUNT * ANGLE_SIZE;

/// Receive buffer size. Larger than a measurement so oversized datagrams are
/// detected instead of silently truncated.
pub const RECV_BUFFER_SIZE: usize = 1024;

/// Decode one telemetry datagram.
///
/// Packet layout (little-endian, no framing):
/// - `[0..8]`: u64 timestamp
/// - `[8..56]`: 6x f64 joint angles in degrees, base joint first
pub fn parse_measurement(data: &[u8]) -> Result<Measurement> {
    if data.len() != MEASUREMENT_SIZE {
        return Err(ArmkinError::InvalidPacket {
            expected: MEASUREMENT_SIZE,
            actual: data.len(),
        });
    }

    let (ts_bytes, angle_bytes) = data.split_at(TIMESTAMP_SIZE);
    let mut ts = [0u8; TIMESTAMP_SIZE];
    ts.copy_from_slice(ts_bytes);
    let timestamp = u64::from_le_bytes(ts);

    let mut angles: JointAngles = [0.0; JOINT_COUNT];
    for (angle, chunk) in angles.iter_mut().zip(angle_bytes.chunks_exact(ANGLE_SIZE)) {
        let mut raw = [0u8; ANGLE_SIZE];
        raw.copy_from_slice(chunk);
        *angle = f64::from_le_bytes(raw);
    }

    Ok(Measurement { timestamp, angles })
}

/// Encode a measurement in the wire layout read by [`parse_measurement`].
pub fn encode_measurement(measurement: &Measurement) -> [u8; MEASUREMENT_SIZE] {
    let mut buf = [0u8; MEASUREMENT_SIZE];
    buf[..TIMESTAMP_SIZE].copy_from_slice(&measurement.timestamp.to_le_bytes());
    for (chunk, angle) in buf[TIMESTAMP_SIZE..]
        .chunks_exact_mut(ANGLE_SIZE)
        .zip(measurement.angles.iter())
    {
        chunk.copy_from_slice(&angle.to_le_bytes());
    }
    buf
}

/// True if `data` is a telemetry request.
pub fn is_request(data: &[u8]) -> bool {
    data == &REQUEST[..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measurement_size() {
        assert_eq!(MEASUREMENT_SIZE, 56);
    }

    #[test]
    fn test_parse_measurement() {
        // timestamp = 0x0102030405060708, angles = [1.0, -2.5, 0, 90, -180, 0.125]
        let mut data = vec![0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01];
        for a in [1.0f64, -2.5, 0.0, 90.0, -180.0, 0.125] {
            data.extend_from_slice(&a.to_le_bytes());
        }

        let m = parse_measurement(&data).unwrap();
        assert_eq!(m.timestamp, 0x0102_0304_0506_0708);
        assert_eq!(m.angles, [1.0, -2.5, 0.0, 90.0, -180.0, 0.125]);
    }

    #[test]
    fn test_parse_known_bytes() {
        // 1.0f64 LE = 00 00 00 00 00 00 F0 3F
        let mut data = [0u8; MEASUREMENT_SIZE];
        data[0] = 42;
        data[8 + 6] = 0xF0;
        data[8 + 7] = 0x3F;
        let m = parse_measurement(&data).unwrap();
        assert_eq!(m.timestamp, 42);
        assert_eq!(m.angles[0], 1.0);
        assert_eq!(m.angles[1..], [0.0; 5]);
    }

    #[test]
    fn test_parse_rejects_wrong_size() {
        for len in [0, 8, 55, 57, 64] {
            let data = vec![0u8; len];
            match parse_measurement(&data) {
                Err(ArmkinError::InvalidPacket { expected, actual }) => {
                    assert_eq!(expected, 56);
                    assert_eq!(actual, len);
                }
                other => panic!("len {}: expected InvalidPacket, got {:?}", len, other),
            }
        }
    }

    #[test]
    fn test_encode_layout() {
        let buf = encode_measurement(&Measurement {
            timestamp: 7,
            angles: [0.0, 0.0, 0.0, 0.0, 0.0, -1.0],
        });
        assert_eq!(buf[0], 7);
        assert_eq!(&buf[48..56], &(-1.0f64).to_le_bytes());
        assert_eq!(parse_measurement(&buf).unwrap().angles[5], -1.0);
    }

    #[test]
    fn test_is_request() {
        assert!(is_request(b"get"));
        assert!(!is_request(b"get\n"));
        assert!(!is_request(b""));
    }
}
