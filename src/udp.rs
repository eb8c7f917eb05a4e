use crate::protocol::{self, RECV_BUFFER_SIZE};
use crate::types::Measurement;
use crate::{ArmkinError, Result};
use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

/// Datagram transport to the arm controller.
///
/// The socket is bound to an ephemeral local port. Replies are not filtered
/// by source address.
pub struct UdpTransport {
    socket: UdpSocket,
    endpoint: SocketAddr,
}

impl UdpTransport {
    pub fn open(endpoint: SocketAddr, recv_timeout: Duration) -> Result<Self> {
        let local: SocketAddr = if endpoint.is_ipv4() {
            ([0, 0, 0, 0], 0).into()
        } else {
            (std::net::Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local)?;
        // A zero duration is rejected by set_read_timeout; treat it as blocking.
        let timeout = if recv_timeout.is_zero() {
            None
        } else {
            Some(recv_timeout)
        };
        socket.set_read_timeout(timeout)?;

        log::debug!(
            "UDP transport bound to {} for {}",
            socket.local_addr()?,
            endpoint
        );

        Ok(Self { socket, endpoint })
    }

    pub fn endpoint(&self) -> SocketAddr {
        self.endpoint
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Send the `"get"` telemetry request.
    pub fn send_request(&self) -> Result<()> {
        let sent = self.socket.send_to(protocol::REQUEST, self.endpoint)?;
        log::trace!("Sent {} byte request to {}", sent, self.endpoint);
        Ok(())
    }

    /// Receive and decode one measurement.
    ///
    /// Returns [`ArmkinError::Timeout`] when nothing arrives within the read
    /// timeout and [`ArmkinError::InvalidPacket`] for a datagram of the wrong
    /// size.
    pub fn recv_measurement(&self) -> Result<Measurement> {
        let mut buf = [0u8; RECV_BUFFER_SIZE];
        let (len, from) = self.socket.recv_from(&mut buf).map_err(|e| match e.kind() {
            ErrorKind::WouldBlock | ErrorKind::TimedOut => ArmkinError::Timeout,
            _ => ArmkinError::Io(e),
        })?;

        if from != self.endpoint {
            log::debug!("Datagram from {} (endpoint is {})", from, self.endpoint);
        }

        protocol::parse_measurement(&buf[..len])
    }

    /// Send a request and wait for its reply.
    pub fn transaction(&self) -> Result<Measurement> {
        self.send_request()?;
        self.recv_measurement()
    }

    pub fn set_recv_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.socket.set_read_timeout(timeout)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::encode_measurement;

    fn loopback_peer() -> UdpSocket {
        let peer = UdpSocket::bind("127.0.0.1:0").unwrap();
        peer.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
        peer
    }

    #[test]
    fn test_transaction_over_loopback() {
        let peer = loopback_peer();
        let transport =
            UdpTransport::open(peer.local_addr().unwrap(), Duration::from_secs(2)).unwrap();

        transport.send_request().unwrap();
        let mut buf = [0u8; 16];
        let (len, client) = peer.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..len], b"get");

        let m = Measurement {
            timestamp: 1234,
            angles: [1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        };
        peer.send_to(&encode_measurement(&m), client).unwrap();

        assert_eq!(transport.recv_measurement().unwrap(), m);
    }

    #[test]
    fn test_recv_times_out() {
        let peer = loopback_peer();
        let transport =
            UdpTransport::open(peer.local_addr().unwrap(), Duration::from_millis(50)).unwrap();
        assert!(matches!(
            transport.recv_measurement(),
            Err(ArmkinError::Timeout)
        ));
    }

    #[test]
    fn test_short_datagram_is_invalid_packet() {
        let peer = loopback_peer();
        let transport =
            UdpTransport::open(peer.local_addr().unwrap(), Duration::from_secs(2)).unwrap();
        let client = transport.local_addr().unwrap();
        let client: SocketAddr = ([127, 0, 0, 1], client.port()).into();

        peer.send_to(&[0u8; 12], client).unwrap();
        match transport.recv_measurement() {
            Err(ArmkinError::InvalidPacket { actual, .. }) => assert_eq!(actual, 12),
            other => panic!("expected InvalidPacket, got {:?}", other),
        }
    }
}
