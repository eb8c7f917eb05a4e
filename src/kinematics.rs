//! Denavit-Hartenberg forward kinematics.
//!
//! Each joint contributes one standard DH transform built from its angle and
//! fixed link geometry. The transforms are right-multiplied base to tip, so
//! joint `i` is expressed in the frame left by joints `0..i`.
//!
//! Non-finite angles are not rejected: they propagate through the trig and
//! matrix products as NaN or infinity.

use crate::geometry::LinkGeometry;
use crate::transform::Transform;
use crate::types::{JointAngles, LinkParameters, Pose};
use crate::{ArmkinError, Result};

/// Homogeneous transform of a single joint.
///
/// `theta` is in radians. The bottom row is written as literal constants so
/// it is exactly `[0, 0, 0, 1]`.
pub fn build_transform(theta: f64, params: &LinkParameters) -> Transform {
    let (sin_t, cos_t) = theta.sin_cos();
    let (sin_a, cos_a) = params.link_twist.sin_cos();
    let a = params.link_length;
    let d = params.link_offset;

    Transform::from_rows([
        [cos_t, -sin_t * cos_a, sin_t * sin_a, a * cos_t],
        [sin_t, cos_t * cos_a, -cos_t * sin_a, a * sin_t],
        [0.0, sin_a, cos_a, d],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// End-effector pose for a set of joint angles in degrees.
///
/// Fails with [`ArmkinError::InvalidInput`] if `angles` does not hold exactly
/// one value per joint of `table`.
pub fn compute_pose(angles: &[f64], table: &LinkGeometry) -> Result<Pose> {
    if angles.len() != table.len() {
        return Err(ArmkinError::InvalidInput {
            expected: table.len(),
            actual: angles.len(),
        });
    }

    let mut acc = Transform::IDENTITY;
    for (i, &deg) in angles.iter().enumerate() {
        let params = table.geometry(i)?;
        acc = acc * build_transform(deg.to_radians(), &params);
    }

    Ok(Pose { transform: acc })
}

/// Same as [`compute_pose`] for callers already holding a full angle set.
pub fn compute_pose_fixed(angles: &JointAngles, table: &LinkGeometry) -> Pose {
    let mut acc = Transform::IDENTITY;
    for (deg, params) in angles.iter().zip(table.links()) {
        acc = acc * build_transform(deg.to_radians(), params);
    }
    Pose { transform: acc }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::DEFAULT_LINKS;
    use crate::types::Position;

    const TOL: f64 = 1e-9;

    // Default arm at all-zero angles: every joint reduces to
    // [[1,0,0,a],[0,cos(alpha),-sin(alpha),0],[0,sin(alpha),cos(alpha),d]].
    const ZERO_POSE_POSITION: [f64; 3] = [-1.398, -0.533, -0.04];

    const SAMPLE_ANGLES: [f64; 6] = [10.0, -35.0, 60.0, 15.0, -45.0, 30.0];

    fn assert_close(actual: Position, expected: [f64; 3]) {
        let actual = actual.to_array();
        for i in 0..3 {
            assert!(
                (actual[i] - expected[i]).abs() < TOL,
                "axis {}: {} != {}",
                i,
                actual[i],
                expected[i]
            );
        }
    }

    fn sample_params() -> Vec<(f64, LinkParameters)> {
        let mut out = Vec::new();
        for &theta in &[0.0, 0.3, -1.2, 2.9, std::f64::consts::PI, -7.5] {
            for params in DEFAULT_LINKS.iter() {
                out.push((theta, *params));
            }
            out.push((theta, LinkParameters::new(1.5, -0.7, 0.42)));
            out.push((theta, LinkParameters::new(-3.0, 12.0, -2.6)));
        }
        out
    }

    #[test]
    fn test_identity_joint() {
        let t = build_transform(0.0, &LinkParameters::new(0.0, 0.0, 0.0));
        assert_eq!(t, Transform::IDENTITY);
    }

    #[test]
    fn test_bottom_row_is_exact() {
        for (theta, params) in sample_params() {
            let t = build_transform(theta, &params);
            assert_eq!(t.bottom_row(), [0.0, 0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_rotation_block_is_orthonormal() {
        for (theta, params) in sample_params() {
            let r = build_transform(theta, &params).rotation();
            for i in 0..3 {
                for j in 0..3 {
                    let dot: f64 = (0..3).map(|k| r[k][i] * r[k][j]).sum();
                    let expected = if i == j { 1.0 } else { 0.0 };
                    assert!(
                        (dot - expected).abs() < TOL,
                        "columns {} and {}: dot = {}",
                        i,
                        j,
                        dot
                    );
                }
            }
        }
    }

    #[test]
    fn test_translation_column() {
        let params = LinkParameters::new(2.0, 0.5, 0.0);
        let t = build_transform(std::f64::consts::FRAC_PI_2, &params);
        let [x, y, z] = t.translation();
        assert!(x.abs() < TOL);
        assert!((y - 2.0).abs() < TOL);
        assert_eq!(z, 0.5);
    }

    #[test]
    fn test_zero_angles_default_arm() {
        let pose = compute_pose(&[0.0; 6], &LinkGeometry::default()).unwrap();
        assert_close(pose.position(), ZERO_POSE_POSITION);
        assert_eq!(pose.transform.bottom_row(), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_sample_configuration() {
        let pose = compute_pose(&SAMPLE_ANGLES, &LinkGeometry::default()).unwrap();
        assert_close(
            pose.position(),
            [-0.8076476807592826, -0.609279568953567, 0.338254187198165],
        );
    }

    #[test]
    fn test_base_rotation_turns_position() {
        // Joint 0 rotates about the base z axis, so 90 degrees maps (x, y) to (-y, x).
        let pose = compute_pose(&[90.0, 0.0, 0.0, 0.0, 0.0, 0.0], &LinkGeometry::default()).unwrap();
        assert_close(pose.position(), [0.533, -1.398, -0.04]);
    }

    #[test]
    fn test_composition_order_matters() {
        let table = LinkGeometry::default();
        let forward = compute_pose(&SAMPLE_ANGLES, &table).unwrap().position();

        let mut reversed = Transform::IDENTITY;
        for i in (0..6).rev() {
            let params = table.geometry(i).unwrap();
            reversed = reversed * build_transform(SAMPLE_ANGLES[i].to_radians(), &params);
        }
        let reversed: Position = reversed.translation().into();

        let diff = (forward.x - reversed.x).abs()
            + (forward.y - reversed.y).abs()
            + (forward.z - reversed.z).abs();
        assert!(diff > 1e-3, "reversed chain matched forward chain: {:?}", forward);
    }

    #[test]
    fn test_deterministic() {
        let table = LinkGeometry::default();
        let a = compute_pose(&SAMPLE_ANGLES, &table).unwrap();
        let b = compute_pose(&SAMPLE_ANGLES, &table).unwrap();
        for (x, y) in a.transform.to_flat().iter().zip(b.transform.to_flat().iter()) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }

    #[test]
    fn test_fixed_matches_slice() {
        let table = LinkGeometry::default();
        let a = compute_pose(&SAMPLE_ANGLES, &table).unwrap();
        let b = compute_pose_fixed(&SAMPLE_ANGLES, &table);
        assert_eq!(a, b);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let table = LinkGeometry::default();
        for angles in [&[0.0; 5][..], &[0.0; 7][..], &[][..]] {
            match compute_pose(angles, &table) {
                Err(ArmkinError::InvalidInput { expected, actual }) => {
                    assert_eq!(expected, 6);
                    assert_eq!(actual, angles.len());
                }
                other => panic!("expected InvalidInput, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_nan_propagates() {
        let mut angles = [0.0; 6];
        angles[3] = f64::NAN;
        let pose = compute_pose(&angles, &LinkGeometry::default()).unwrap();
        assert!(pose.position().x.is_nan());
    }
}
