//! Joint angle calculation using dot product
//!
//! Angles are measured in the image plane (x, y). Depth is ignored
//! because detector z is too noisy to trust for angles.

use serde::Serialize;

use crate::pose::{Joint, Landmark, Pose};

/// Rays shorter than this have no direction
const MIN_RAY_LENGTH: f32 = 1e-6;

/// Interior angle at `vertex` between rays to `a` and `c`, in degrees
///
/// Uses dot product formula: cos(θ) = (v1 · v2) / (|v1| × |v2|)
///
/// Returns `None` if any point is missing or a ray has zero length.
/// Callers must treat `None` as "no signal", not as 0°.
pub fn angle_at_vertex(
    a: Option<&Landmark>,
    vertex: Option<&Landmark>,
    c: Option<&Landmark>,
) -> Option<f32> {
    let (a, vertex, c) = (a?, vertex?, c?);

    let v1 = (a.x - vertex.x, a.y - vertex.y);
    let v2 = (c.x - vertex.x, c.y - vertex.y);

    let mag1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
    let mag2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();

    if !(mag1 >= MIN_RAY_LENGTH && mag2 >= MIN_RAY_LENGTH) {
        return None;
    }

    let dot = v1.0 * v2.0 + v1.1 * v2.1;
    let cos_angle = (dot / (mag1 * mag2)).clamp(-1.0, 1.0);

    Some(cos_angle.acos().to_degrees())
}

// ============================================================================
// NAMED JOINT ANGLES
// ============================================================================

/// The eight joints that are scored by angle rather than position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AngleJoint {
    LeftKnee,
    RightKnee,
    LeftElbow,
    RightElbow,
    LeftHip,
    RightHip,
    LeftShoulder,
    RightShoulder,
}

impl AngleJoint {
    pub const ALL: [AngleJoint; 8] = [
        AngleJoint::LeftKnee,
        AngleJoint::RightKnee,
        AngleJoint::LeftElbow,
        AngleJoint::RightElbow,
        AngleJoint::LeftHip,
        AngleJoint::RightHip,
        AngleJoint::LeftShoulder,
        AngleJoint::RightShoulder,
    ];

    /// (ray end, vertex, ray end)
    pub fn triple(self) -> (Joint, Joint, Joint) {
        use Joint::*;
        match self {
            AngleJoint::LeftKnee => (LeftHip, LeftKnee, LeftAnkle),
            AngleJoint::RightKnee => (RightHip, RightKnee, RightAnkle),
            AngleJoint::LeftElbow => (LeftShoulder, LeftElbow, LeftWrist),
            AngleJoint::RightElbow => (RightShoulder, RightElbow, RightWrist),
            AngleJoint::LeftHip => (LeftShoulder, LeftHip, LeftKnee),
            AngleJoint::RightHip => (RightShoulder, RightHip, RightKnee),
            AngleJoint::LeftShoulder => (LeftElbow, LeftShoulder, LeftHip),
            AngleJoint::RightShoulder => (RightElbow, RightShoulder, RightHip),
        }
    }

    /// Landmark the angle is measured at
    pub fn vertex(self) -> Joint {
        self.triple().1
    }

    /// Angle joint measured at `joint`, if any
    pub fn at_vertex(joint: Joint) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.vertex() == joint)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Angles for the eight scored joints of one pose
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct JointAngles {
    angles: [Option<f32>; 8],
}

impl JointAngles {
    pub fn get(&self, joint: AngleJoint) -> Option<f32> {
        self.angles[joint.slot()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (AngleJoint, Option<f32>)> + '_ {
        AngleJoint::ALL.into_iter().map(move |j| (j, self.get(j)))
    }
}

/// Compute all eight joint angles of a pose
pub fn joint_angles(pose: &Pose) -> JointAngles {
    let mut angles = [None; 8];
    for joint in AngleJoint::ALL {
        let (a, vertex, c) = joint.triple();
        angles[joint.slot()] = angle_at_vertex(pose.get(a), pose.get(vertex), pose.get(c));
    }
    JointAngles { angles }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lm(x: f32, y: f32) -> Landmark {
        Landmark::new(x, y, 0.0)
    }

    #[test]
    fn test_straight_line() {
        let angle = angle_at_vertex(Some(&lm(0.0, 0.0)), Some(&lm(0.5, 0.0)), Some(&lm(1.0, 0.0)));
        assert!((angle.unwrap() - 180.0).abs() < 1.0);
    }

    #[test]
    fn test_right_angle() {
        let angle = angle_at_vertex(Some(&lm(0.0, 0.0)), Some(&lm(0.5, 0.0)), Some(&lm(0.5, 0.5)));
        assert!((angle.unwrap() - 90.0).abs() < 1.0);
    }

    #[test]
    fn test_depth_is_ignored() {
        let a = Landmark::new(0.0, 0.0, 5.0);
        let c = Landmark::new(0.5, 0.5, -3.0);
        let angle = angle_at_vertex(Some(&a), Some(&lm(0.5, 0.0)), Some(&c));
        assert!((angle.unwrap() - 90.0).abs() < 1.0);
    }

    #[test]
    fn test_degenerate_cases_have_no_signal() {
        let v = lm(0.5, 0.5);
        assert_eq!(angle_at_vertex(None, Some(&v), Some(&lm(1.0, 1.0))), None);
        assert_eq!(angle_at_vertex(Some(&v), Some(&v), Some(&lm(1.0, 1.0))), None);
        assert_eq!(angle_at_vertex(Some(&lm(f32::NAN, 0.0)), Some(&v), Some(&lm(1.0, 1.0))), None);
    }

    #[test]
    fn test_joint_angles_on_partial_pose() {
        let mut pose = Pose::empty();
        pose.set(Joint::LeftShoulder, lm(0.4, 0.3));
        pose.set(Joint::LeftElbow, lm(0.4, 0.45));
        pose.set(Joint::LeftWrist, lm(0.4, 0.6));

        let angles = joint_angles(&pose);
        assert!((angles.get(AngleJoint::LeftElbow).unwrap() - 180.0).abs() < 1.0);
        assert_eq!(angles.get(AngleJoint::RightElbow), None);
        assert_eq!(angles.get(AngleJoint::LeftKnee), None);
        assert_eq!(angles.iter().filter(|(_, a)| a.is_some()).count(), 1);
    }

    #[test]
    fn test_vertex_mapping() {
        assert_eq!(AngleJoint::LeftKnee.vertex(), Joint::LeftKnee);
        assert_eq!(AngleJoint::RightHip.vertex(), Joint::RightHip);
        assert_eq!(AngleJoint::at_vertex(Joint::RightShoulder), Some(AngleJoint::RightShoulder));
        assert_eq!(AngleJoint::at_vertex(Joint::LeftWrist), None);
    }
}
