//! C FFI layer for armkin.
//!
//! Provides the kinematics engine as plain functions plus an opaque
//! handle-based client API for C/C++ consumers.
//! The generated C header is written to `include/armkin.h` by cbindgen.

use crate::client::ArmClient;
use crate::config::Config;
use crate::error::LastError;
use crate::geometry::LinkGeometry;
use crate::kinematics;
use crate::stream::PoseStream;
use crate::types::{LinkParameters, PoseSample};
use crate::ArmkinError;
use std::ffi::{c_char, c_int, CStr};
use std::time::Duration;

/// Last error message for C consumers, kept per calling thread.
static LAST_ERROR: LastError = LastError::new();

/// Opaque client handle for C consumers.
pub struct AkClient(ArmClient);

/// Opaque pose stream handle for C consumers.
pub struct AkPoseStream(PoseStream);

/// End-effector position in C-compatible layout.
#[repr(C)]
pub struct AkPosition {
    /// [x, y, z] in meters.
    pub xyz: [f64; 3],
}

/// Pose sample in C-compatible layout.
#[repr(C)]
pub struct AkPoseSample {
    /// Controller timestamp from the measurement.
    pub timestamp: u64,
    /// Joint angles in degrees.
    pub angles_deg: [f64; 6],
    /// End-effector position [x, y, z] in meters.
    pub position: [f64; 3],
    /// Base-to-end-effector transform, flat row-major (16 elements).
    pub transform: [f64; 16],
    /// Host steady-clock timestamp in seconds.
    pub host_timestamp_s: f64,
}

impl From<&PoseSample> for AkPoseSample {
    fn from(sample: &PoseSample) -> Self {
        AkPoseSample {
            timestamp: sample.timestamp,
            angles_deg: sample.angles,
            position: sample.position.to_array(),
            transform: sample.pose.transform.to_flat(),
            host_timestamp_s: sample.host_timestamp_s,
        }
    }
}

/// Compute the end-effector position for the default arm geometry.
/// `angles` holds `len` joint angles in degrees; `len` must be 6.
/// Returns 0 on success, -1 on error (check ak_last_error()).
///
/// # Safety
/// `angles` must point to `len` doubles, `out` to a writable `AkPosition`.
#[no_mangle]
pub unsafe extern "C" fn ak_compute_position(
    angles: *const f64,
    len: usize,
    out: *mut AkPosition,
) -> c_int {
    if angles.is_null() || out.is_null() {
        return -1;
    }
    let angles = std::slice::from_raw_parts(angles, len);

    match kinematics::compute_pose(angles, &LinkGeometry::default()) {
        Ok(pose) => {
            out.write(AkPosition {
                xyz: pose.position().to_array(),
            });
            0
        }
        Err(e) => {
            LAST_ERROR.set(&e);
            -1
        }
    }
}

/// Build one joint's DH transform into `out` (16 doubles, row-major).
/// `theta` and `link_twist` are in radians.
///
/// # Safety
/// `out` must point to 16 writable doubles, or be null.
#[no_mangle]
pub unsafe extern "C" fn ak_build_transform(
    theta: f64,
    link_length: f64,
    link_offset: f64,
    link_twist: f64,
    out: *mut f64,
) -> c_int {
    if out.is_null() {
        return -1;
    }
    let params = LinkParameters::new(link_length, link_offset, link_twist);
    let flat = kinematics::build_transform(theta, &params).to_flat();
    std::ptr::copy_nonoverlapping(flat.as_ptr(), out, flat.len());
    0
}

/// Open a telemetry client to `addr:port`.
/// `addr` may be NULL to use `ARMKIN_*` environment settings.
/// Returns NULL on error (check ak_last_error()).
///
/// # Safety
/// `addr` must be a valid null-terminated string, or null.
#[no_mangle]
pub unsafe extern "C" fn ak_connect(addr: *const c_char, port: u16) -> *mut AkClient {
    let config = if addr.is_null() {
        Config::from_env()
    } else {
        match CStr::from_ptr(addr).to_str() {
            Ok(host) => Ok(Config::default().with_endpoint(host, port)),
            Err(e) => Err(ArmkinError::InvalidConfig(format!("address is not UTF-8: {}", e))),
        }
    };

    match config.and_then(|c| ArmClient::connect(&c)) {
        Ok(client) => Box::into_raw(Box::new(AkClient(client))),
        Err(e) => {
            LAST_ERROR.set(&e);
            std::ptr::null_mut()
        }
    }
}

/// Close a client and free its resources.
///
/// # Safety
/// `client` must be a pointer returned by `ak_connect`, or null.
#[no_mangle]
pub unsafe extern "C" fn ak_disconnect(client: *mut AkClient) {
    if !client.is_null() {
        drop(Box::from_raw(client));
    }
}

/// Request one measurement and compute its pose.
/// Returns 0 on success, -1 on error/timeout.
///
/// # Safety
/// `client` and `out` must be valid pointers, or null.
#[no_mangle]
pub unsafe extern "C" fn ak_next_pose(client: *const AkClient, out: *mut AkPoseSample) -> c_int {
    if client.is_null() || out.is_null() {
        return -1;
    }
    let client = &*client;

    match client.0.next_pose() {
        Ok(sample) => {
            out.write(AkPoseSample::from(&sample));
            0
        }
        Err(e) => {
            LAST_ERROR.set(&e);
            -1
        }
    }
}

/// Start a background pose stream. Consumes the client: the handle must not
/// be used or disconnected afterwards, even on failure.
/// Returns NULL on error.
///
/// # Safety
/// `client` must be a pointer returned by `ak_connect`, or null.
#[no_mangle]
pub unsafe extern "C" fn ak_start_stream(client: *mut AkClient) -> *mut AkPoseStream {
    if client.is_null() {
        return std::ptr::null_mut();
    }
    let client = Box::from_raw(client);

    match client.0.start_stream() {
        Ok(stream) => Box::into_raw(Box::new(AkPoseStream(stream))),
        Err(e) => {
            LAST_ERROR.set(&e);
            std::ptr::null_mut()
        }
    }
}

/// Receive the next pose sample with timeout.
/// `timeout_ms`: timeout in milliseconds (0 = try without blocking, -1 = block forever).
/// Returns 0 on success, -1 on error/timeout.
///
/// # Safety
/// `stream` and `out` must be valid pointers, or null.
#[no_mangle]
pub unsafe extern "C" fn ak_stream_recv(
    stream: *mut AkPoseStream,
    out: *mut AkPoseSample,
    timeout_ms: c_int,
) -> c_int {
    if stream.is_null() || out.is_null() {
        return -1;
    }
    let stream = &*stream;

    let result = if timeout_ms == 0 {
        stream.0.try_recv().ok_or(ArmkinError::Timeout)
    } else if timeout_ms < 0 {
        stream.0.recv()
    } else {
        stream
            .0
            .recv_timeout(Duration::from_millis(timeout_ms as u64))
    };

    match result {
        Ok(sample) => {
            out.write(AkPoseSample::from(&sample));
            0
        }
        Err(e) => {
            LAST_ERROR.set(&e);
            -1
        }
    }
}

/// Check if the pose stream is still active.
///
/// # Safety
/// `stream` must be a valid stream pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn ak_stream_is_active(stream: *const AkPoseStream) -> bool {
    if stream.is_null() {
        return false;
    }
    let stream = &*stream;
    stream.0.is_active()
}

/// Stop a pose stream and free its resources.
///
/// # Safety
/// `stream` must be a pointer returned by `ak_start_stream`, or null.
#[no_mangle]
pub unsafe extern "C" fn ak_stop_stream(stream: *mut AkPoseStream) {
    if !stream.is_null() {
        drop(Box::from_raw(stream));
    }
}

/// Get the last error recorded on the calling thread. Returns NULL if no error.
/// The returned pointer is valid until the next failing armkin call on the
/// same thread.
#[no_mangle]
pub extern "C" fn ak_last_error() -> *const c_char {
    LAST_ERROR.as_ptr()
}
