use crate::transform::Transform;

/// Number of revolute joints in the arm.
pub const JOINT_COUNT: usize = 6;

/// Joint angles in degrees, one per joint counted from the base.
pub type JointAngles = [f64; JOINT_COUNT];

/// DH geometry of one link. Immutable once the table is built.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkParameters {
    /// Link length `a` in meters.
    pub link_length: f64,
    /// Link offset `d` in meters.
    pub link_offset: f64,
    /// Link twist `alpha` in radians.
    pub link_twist: f64,
}

impl LinkParameters {
    pub const fn new(link_length: f64, link_offset: f64, link_twist: f64) -> Self {
        Self {
            link_length,
            link_offset,
            link_twist,
        }
    }
}

/// One decoded telemetry record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub timestamp: u64,
    /// Joint angles in degrees.
    pub angles: JointAngles,
}

/// End-effector position in the base frame, meters.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Position {
    fn from(v: [f64; 3]) -> Self {
        Self {
            x: v[0],
            y: v[1],
            z: v[2],
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:+.6} {:+.6} {:+.6}]", self.x, self.y, self.z)
    }
}

/// Cumulative base-to-end-effector transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub transform: Transform,
}

impl Pose {
    pub fn position(&self) -> Position {
        self.transform.translation().into()
    }

    /// 3x3 row-major orientation of the end-effector frame.
    pub fn rotation(&self) -> [[f64; 3]; 3] {
        self.transform.rotation()
    }
}

/// A measurement together with the pose computed from it.
#[derive(Debug, Clone, Copy)]
pub struct PoseSample {
    pub timestamp: u64,
    pub angles: JointAngles,
    pub pose: Pose,
    pub position: Position,
    /// Host steady-clock time the pose was computed, seconds since the client
    /// was connected or, for streamed samples, since the stream started.
    pub host_timestamp_s: f64,
}
