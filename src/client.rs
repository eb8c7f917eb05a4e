use crate::config::Config;
use crate::geometry::LinkGeometry;
use crate::kinematics;
use crate::stream::PoseStream;
use crate::types::{Measurement, PoseSample};
use crate::udp::UdpTransport;
use crate::Result;
use std::net::SocketAddr;
use std::time::Instant;

/// Connection to an arm controller's telemetry endpoint.
///
/// Owns the transport and the link geometry used to turn each measurement
/// into a pose.
pub struct ArmClient {
    transport: UdpTransport,
    geometry: LinkGeometry,
    epoch: Instant,
}

impl ArmClient {
    /// Open a client using `ARMKIN_*` environment settings.
    pub fn connect_from_env() -> Result<ArmClient> {
        Self::connect(&Config::from_env()?)
    }

    pub fn connect(config: &Config) -> Result<ArmClient> {
        let endpoint = config.endpoint()?;
        let transport = UdpTransport::open(endpoint, config.recv_timeout)?;

        log::info!(
            "Arm telemetry client ready: endpoint={} local={}",
            endpoint,
            transport.local_addr()?
        );

        Ok(ArmClient {
            transport,
            geometry: config.geometry,
            epoch: Instant::now(),
        })
    }

    pub fn endpoint(&self) -> SocketAddr {
        self.transport.endpoint()
    }

    pub fn geometry(&self) -> &LinkGeometry {
        &self.geometry
    }

    /// Send the telemetry request without waiting for a reply.
    pub fn send_request(&self) -> Result<()> {
        self.transport.send_request()
    }

    /// Read the next reply without sending a request.
    pub fn recv_measurement(&self) -> Result<Measurement> {
        self.transport.recv_measurement()
    }

    /// Request one measurement and wait for it.
    pub fn next_measurement(&self) -> Result<Measurement> {
        self.transport.transaction()
    }

    /// Request one measurement and compute the end-effector pose for it.
    pub fn next_pose(&self) -> Result<PoseSample> {
        let measurement = self.next_measurement()?;
        Ok(self.solve(&measurement))
    }

    /// Compute the pose for an already decoded measurement.
    pub fn solve(&self, measurement: &Measurement) -> PoseSample {
        sample_from(measurement, &self.geometry, self.epoch)
    }

    /// Hand the transport to a background reader.
    ///
    /// The reader polls the socket every 100 ms, so `Config::recv_timeout`
    /// no longer applies; use [`PoseStream::recv_timeout`] to bound waits.
    pub fn start_stream(self) -> Result<PoseStream> {
        PoseStream::start(self.transport, self.geometry)
    }
}

pub(crate) fn sample_from(
    measurement: &Measurement,
    geometry: &LinkGeometry,
    epoch: Instant,
) -> PoseSample {
    let pose = kinematics::compute_pose_fixed(&measurement.angles, geometry);
    PoseSample {
        timestamp: measurement.timestamp,
        angles: measurement.angles,
        pose,
        position: pose.position(),
        host_timestamp_s: epoch.elapsed().as_secs_f64(),
    }
}
