//! Landmark and pose types
//!
//! A pose is the list of MediaPipe body landmarks for one frame. Entries
//! may be missing (occluded or malformed input), so every accessor is
//! total and hands back `Option`.

use serde::{Deserialize, Serialize};

// ============================================================================
// JOINT INDICES (MediaPipe Pose - 33 total)
// ============================================================================

/// Number of body landmarks produced by the detector
pub const LANDMARK_COUNT: usize = 33;

/// Anatomical joint index. Discriminants are the detector's landmark indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[repr(usize)]
pub enum Joint {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl Joint {
    /// Every joint, in index order
    pub const ALL: [Joint; LANDMARK_COUNT] = [
        Joint::Nose,
        Joint::LeftEyeInner,
        Joint::LeftEye,
        Joint::LeftEyeOuter,
        Joint::RightEyeInner,
        Joint::RightEye,
        Joint::RightEyeOuter,
        Joint::LeftEar,
        Joint::RightEar,
        Joint::MouthLeft,
        Joint::MouthRight,
        Joint::LeftShoulder,
        Joint::RightShoulder,
        Joint::LeftElbow,
        Joint::RightElbow,
        Joint::LeftWrist,
        Joint::RightWrist,
        Joint::LeftPinky,
        Joint::RightPinky,
        Joint::LeftIndex,
        Joint::RightIndex,
        Joint::LeftThumb,
        Joint::RightThumb,
        Joint::LeftHip,
        Joint::RightHip,
        Joint::LeftKnee,
        Joint::RightKnee,
        Joint::LeftAnkle,
        Joint::RightAnkle,
        Joint::LeftHeel,
        Joint::RightHeel,
        Joint::LeftFootIndex,
        Joint::RightFootIndex,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Joints used to estimate how much a body is moving between two poses
pub const MOTION_JOINTS: [Joint; 10] = [
    Joint::LeftShoulder, Joint::RightShoulder,
    Joint::LeftElbow, Joint::RightElbow,
    Joint::LeftWrist, Joint::RightWrist,
    Joint::LeftHip, Joint::RightHip,
    Joint::LeftKnee, Joint::RightKnee,
];

// ============================================================================
// LANDMARK DATA STRUCTURE
// ============================================================================

fn full_visibility() -> f32 {
    1.0
}

/// A single 3D landmark point (normalized image coordinates)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,  // 0-1 normalized, origin top-left
    pub y: f32,  // 0-1 normalized
    #[serde(default)]
    pub z: f32,  // Relative depth, same scale as x
    #[serde(default = "full_visibility")]
    pub visibility: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, visibility: 1.0 }
    }

    pub fn with_visibility(mut self, visibility: f32) -> Self {
        self.visibility = visibility;
        self
    }

    /// A landmark without usable image coordinates counts as missing
    pub fn is_usable(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Visibility clamped to [0, 1]; non-finite values read as fully visible
    pub fn confidence(&self) -> f32 {
        if self.visibility.is_finite() {
            self.visibility.clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Depth with non-finite values read as 0
    pub fn depth(&self) -> f32 {
        if self.z.is_finite() { self.z } else { 0.0 }
    }
}

// ============================================================================
// POSE
// ============================================================================

/// Landmarks for one frame, indexed by [`Joint`]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pose {
    landmarks: Vec<Option<Landmark>>,
}

impl Pose {
    pub fn new(landmarks: Vec<Option<Landmark>>) -> Self {
        Self { landmarks }
    }

    /// Pose with every landmark present
    pub fn from_landmarks(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks: landmarks.into_iter().map(Some).collect() }
    }

    /// Detector found nobody
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// Landmark at a raw index, `None` if absent or unusable
    pub fn at(&self, index: usize) -> Option<&Landmark> {
        self.landmarks
            .get(index)
            .and_then(Option::as_ref)
            .filter(|lm| lm.is_usable())
    }

    pub fn get(&self, joint: Joint) -> Option<&Landmark> {
        self.at(joint.index())
    }

    pub fn set(&mut self, joint: Joint, landmark: Landmark) {
        let index = joint.index();
        if self.landmarks.len() <= index {
            self.landmarks.resize(index + 1, None);
        }
        self.landmarks[index] = Some(landmark);
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&Landmark>> + '_ {
        (0..self.landmarks.len()).map(move |i| self.at(i))
    }

    /// Parse the flat layout sent from JavaScript: 4 floats per landmark
    /// (x, y, z, visibility). A non-finite x marks a missing landmark.
    ///
    /// Returns `None` if the length is not a multiple of 4 or holds more
    /// than 33 landmarks.
    pub fn from_flat(data: &[f32]) -> Option<Self> {
        if data.len() % 4 != 0 || data.len() / 4 > LANDMARK_COUNT {
            return None;
        }

        let landmarks = data
            .chunks_exact(4)
            .map(|c| {
                let lm = Landmark { x: c[0], y: c[1], z: c[2], visibility: c[3] };
                lm.is_usable().then_some(lm)
            })
            .collect();

        Some(Self { landmarks })
    }

    /// Inverse of [`Pose::from_flat`]; missing landmarks become NaN
    pub fn to_flat(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.landmarks.len() * 4);
        for lm in self.iter() {
            match lm {
                Some(lm) => out.extend_from_slice(&[lm.x, lm.y, lm.depth(), lm.confidence()]),
                None => out.extend_from_slice(&[f32::NAN, f32::NAN, f32::NAN, 0.0]),
            }
        }
        out
    }
}
