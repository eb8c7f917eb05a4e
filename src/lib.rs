//! # armkin - forward kinematics for a six-axis DH arm
//!
//! Turns joint-angle telemetry into end-effector positions. Provides:
//! - Denavit-Hartenberg transform builder and base-to-tip chain composer
//! - Fixed link geometry of the stock arm, optionally overridden at startup
//! - UDP telemetry client and a background pose stream
//! - C FFI for integration with C/C++ consumers
//!
//! ## Quick Start
//! ```no_run
//! use armkin::{ArmClient, Config};
//! use std::time::Duration;
//!
//! let client = ArmClient::connect(&Config::default()).unwrap();
//! let stream = client.start_stream().unwrap();
//! for _ in 0..5 {
//!     let sample = stream.recv_timeout(Duration::from_secs(1)).unwrap();
//!     println!("pos: {}", sample.position);
//! }
//! ```
//!
//! The engine alone needs no I/O:
//! ```
//! use armkin::{compute_pose, LinkGeometry};
//!
//! let pose = compute_pose(&[0.0; 6], &LinkGeometry::default()).unwrap();
//! let p = pose.position();
//! assert!((p.x + 1.398).abs() < 1e-9);
//! ```

pub mod error;
pub mod types;
pub mod transform;
pub mod geometry;
pub mod kinematics;
pub mod protocol;
pub mod config;
pub mod udp;
pub mod client;
pub mod stream;
pub mod ffi;

pub use error::ArmkinError;
pub use types::*;
pub use transform::Transform;
pub use geometry::LinkGeometry;
pub use kinematics::{build_transform, compute_pose, compute_pose_fixed};
pub use config::Config;
pub use client::ArmClient;
pub use stream::PoseStream;

/// Result type alias for armkin operations.
pub type Result<T> = std::result::Result<T, ArmkinError>;
