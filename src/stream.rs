use crate::client::sample_from;
use crate::geometry::LinkGeometry;
use crate::types::PoseSample;
use crate::udp::UdpTransport;
use crate::{ArmkinError, Result};
use crossbeam_channel::{Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const CHANNEL_CAPACITY: usize = 256;

/// Socket read timeout used by the reader so it can poll the stop flag.
const READ_POLL: Duration = Duration::from_millis(100);

/// Handle to a running pose stream.
///
/// A background thread owns the socket, decodes each telemetry datagram and
/// runs forward kinematics on it before handing the sample over.
pub struct PoseStream {
    receiver: Receiver<PoseSample>,
    stop_flag: Arc<AtomicBool>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl PoseStream {
    /// Send the telemetry request and start the reader thread.
    pub(crate) fn start(transport: UdpTransport, geometry: LinkGeometry) -> Result<PoseStream> {
        transport.set_recv_timeout(Some(READ_POLL))?;
        transport.send_request()?;

        let (sender, receiver) = crossbeam_channel::bounded(CHANNEL_CAPACITY);
        let stop_flag = Arc::new(AtomicBool::new(false));
        let stop_clone = stop_flag.clone();

        let thread = std::thread::Builder::new()
            .name("armkin-reader".into())
            .spawn(move || {
                reader_loop(transport, geometry, sender, stop_clone);
            })?;

        Ok(PoseStream {
            receiver,
            stop_flag,
            thread: Some(thread),
        })
    }

    /// Receive the next sample (blocks until available).
    pub fn recv(&self) -> Result<PoseSample> {
        self.receiver.recv().map_err(|_| ArmkinError::StreamStopped)
    }

    /// Try to receive a sample without blocking.
    pub fn try_recv(&self) -> Option<PoseSample> {
        self.receiver.try_recv().ok()
    }

    /// Receive a sample with a timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<PoseSample> {
        self.receiver.recv_timeout(timeout).map_err(|e| match e {
            crossbeam_channel::RecvTimeoutError::Timeout => ArmkinError::Timeout,
            crossbeam_channel::RecvTimeoutError::Disconnected => ArmkinError::StreamStopped,
        })
    }

    /// Check if the reader is still running.
    pub fn is_active(&self) -> bool {
        !self.stop_flag.load(Ordering::Relaxed)
    }

    /// Stop the stream and wait for the reader thread to finish.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for PoseStream {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn reader_loop(
    transport: UdpTransport,
    geometry: LinkGeometry,
    sender: Sender<PoseSample>,
    stop_flag: Arc<AtomicBool>,
) {
    let epoch = Instant::now();

    log::info!("Pose reader started for {}", transport.endpoint());

    loop {
        if stop_flag.load(Ordering::Relaxed) {
            log::info!("Pose reader stopping (stop flag set)");
            break;
        }

        let measurement = match transport.recv_measurement() {
            Ok(m) => m,
            Err(ArmkinError::Timeout) => continue,
            Err(e @ ArmkinError::InvalidPacket { .. }) => {
                log::warn!("Dropping datagram: {}", e);
                continue;
            }
            Err(e) => {
                log::warn!("Telemetry read error: {}", e);
                continue;
            }
        };

        log::debug!(
            "Measurement {} angles={:?}",
            measurement.timestamp,
            measurement.angles
        );

        let sample = sample_from(&measurement, &geometry, epoch);
        if let Err(e) = sender.try_send(sample) {
            match e {
                crossbeam_channel::TrySendError::Full(_) => {
                    log::trace!("Pose channel full, dropping sample");
                }
                crossbeam_channel::TrySendError::Disconnected(_) => {
                    log::info!("Pose channel disconnected, stopping reader");
                    break;
                }
            }
        }
    }

    stop_flag.store(true, Ordering::Relaxed);
}
