//! Shared poses for integration tests

#![allow(dead_code)]

use dance_web::{Joint, Landmark, Pose};

/// Full 33-landmark standing body. `wrist_y` moves both wrists and the
/// hand points that hang off them.
pub fn full_pose(wrist_y: f32) -> Pose {
    let mut pose = Pose::new(vec![None; 33]);
    let face = [
        (Joint::Nose, 0.50, 0.15),
        (Joint::LeftEyeInner, 0.49, 0.13),
        (Joint::LeftEye, 0.48, 0.13),
        (Joint::LeftEyeOuter, 0.47, 0.13),
        (Joint::RightEyeInner, 0.51, 0.13),
        (Joint::RightEye, 0.52, 0.13),
        (Joint::RightEyeOuter, 0.53, 0.13),
        (Joint::LeftEar, 0.46, 0.14),
        (Joint::RightEar, 0.54, 0.14),
        (Joint::MouthLeft, 0.49, 0.17),
        (Joint::MouthRight, 0.51, 0.17),
    ];
    let body = [
        (Joint::LeftShoulder, 0.42, 0.30),
        (Joint::RightShoulder, 0.58, 0.30),
        (Joint::LeftElbow, 0.40, 0.45),
        (Joint::RightElbow, 0.60, 0.45),
        (Joint::LeftHip, 0.45, 0.60),
        (Joint::RightHip, 0.55, 0.60),
        (Joint::LeftKnee, 0.45, 0.75),
        (Joint::RightKnee, 0.55, 0.75),
        (Joint::LeftAnkle, 0.45, 0.90),
        (Joint::RightAnkle, 0.55, 0.90),
        (Joint::LeftHeel, 0.44, 0.92),
        (Joint::RightHeel, 0.56, 0.92),
        (Joint::LeftFootIndex, 0.43, 0.94),
        (Joint::RightFootIndex, 0.57, 0.94),
    ];
    let hands = [
        (Joint::LeftWrist, 0.40, 0.0),
        (Joint::RightWrist, 0.60, 0.0),
        (Joint::LeftPinky, 0.39, 0.02),
        (Joint::RightPinky, 0.61, 0.02),
        (Joint::LeftIndex, 0.40, 0.03),
        (Joint::RightIndex, 0.60, 0.03),
        (Joint::LeftThumb, 0.41, 0.02),
        (Joint::RightThumb, 0.59, 0.02),
    ];

    for (joint, x, y) in face.into_iter().chain(body) {
        pose.set(joint, Landmark::new(x, y, 0.0));
    }
    for (joint, x, dy) in hands {
        pose.set(joint, Landmark::new(x, wrist_y + dy, 0.0));
    }
    pose
}

/// Arms down
pub fn pose_a() -> Pose {
    full_pose(0.6)
}

/// Arms raised
pub fn pose_b() -> Pose {
    full_pose(0.2)
}

/// Apply `x' = x * scale + dx`, `y' = y * scale + dy`, `z' = z * scale`
pub fn transform(pose: &Pose, scale: f32, dx: f32, dy: f32) -> Pose {
    Pose::new(
        pose.iter()
            .map(|lm| {
                lm.map(|lm| {
                    Landmark::new(lm.x * scale + dx, lm.y * scale + dy, lm.z * scale)
                        .with_visibility(lm.visibility)
                })
            })
            .collect(),
    )
}
