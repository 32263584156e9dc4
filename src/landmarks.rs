//! Pose landmark universe and the orientation-specific subsets measured by the
//! angle engine.

use serde::{Deserialize, Serialize};

/// BlazePose / MediaPipe 33-point landmark indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(usize)]
pub enum PoseLandmark {
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

impl PoseLandmark {
    pub const COUNT: usize = 33;

    /// Every landmark in index order
    pub const ALL: [Self; Self::COUNT] = [
        Self::Nose,
        Self::LeftEyeInner,
        Self::LeftEye,
        Self::LeftEyeOuter,
        Self::RightEyeInner,
        Self::RightEye,
        Self::RightEyeOuter,
        Self::LeftEar,
        Self::RightEar,
        Self::MouthLeft,
        Self::MouthRight,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftPinky,
        Self::RightPinky,
        Self::LeftIndex,
        Self::RightIndex,
        Self::LeftThumb,
        Self::RightThumb,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
        Self::LeftHeel,
        Self::RightHeel,
        Self::LeftFootIndex,
        Self::RightFootIndex,
    ];

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Which side of the body the landmark belongs to, `None` for the nose
    #[must_use]
    pub fn side(self) -> Option<Side> {
        use PoseLandmark::*;
        match self {
            Nose => None,
            LeftEyeInner | LeftEye | LeftEyeOuter | LeftEar | MouthLeft | LeftShoulder | LeftElbow
            | LeftWrist | LeftPinky | LeftIndex | LeftThumb | LeftHip | LeftKnee | LeftAnkle
            | LeftHeel | LeftFootIndex => Some(Side::Left),
            _ => Some(Side::Right),
        }
    }
}

/// Body side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// Three landmarks describing an angle, vertex in the middle
pub type AngleTriple = [PoseLandmark; 3];

/// Which landmarks a session keeps and which angles it measures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandmarkSet {
    /// `None` means the unfiltered set of all landmarks
    side: Option<Side>,
    landmarks: Vec<PoseLandmark>,
    /// Shoulder, hip, knee
    pub hip_angle: AngleTriple,
    /// Hip, knee, ankle
    pub knee_angle: AngleTriple,
    connections: Vec<(PoseLandmark, PoseLandmark)>,
}

const LEFT_CONNECTIONS: [(PoseLandmark, PoseLandmark); 7] = [
    (PoseLandmark::LeftShoulder, PoseLandmark::LeftElbow),
    (PoseLandmark::LeftElbow, PoseLandmark::LeftWrist),
    (PoseLandmark::LeftShoulder, PoseLandmark::LeftHip),
    (PoseLandmark::LeftHip, PoseLandmark::LeftKnee),
    (PoseLandmark::LeftKnee, PoseLandmark::LeftAnkle),
    (PoseLandmark::LeftAnkle, PoseLandmark::LeftHeel),
    (PoseLandmark::LeftHeel, PoseLandmark::LeftFootIndex),
];

const RIGHT_CONNECTIONS: [(PoseLandmark, PoseLandmark); 7] = [
    (PoseLandmark::RightShoulder, PoseLandmark::RightElbow),
    (PoseLandmark::RightElbow, PoseLandmark::RightWrist),
    (PoseLandmark::RightShoulder, PoseLandmark::RightHip),
    (PoseLandmark::RightHip, PoseLandmark::RightKnee),
    (PoseLandmark::RightKnee, PoseLandmark::RightAnkle),
    (PoseLandmark::RightAnkle, PoseLandmark::RightHeel),
    (PoseLandmark::RightHeel, PoseLandmark::RightFootIndex),
];

const TORSO_CONNECTIONS: [(PoseLandmark, PoseLandmark); 2] = [
    (PoseLandmark::LeftShoulder, PoseLandmark::RightShoulder),
    (PoseLandmark::LeftHip, PoseLandmark::RightHip),
];

impl LandmarkSet {
    /// Every landmark; angles default to the right side of the body
    #[must_use]
    pub fn all() -> Self {
        let mut connections = LEFT_CONNECTIONS.to_vec();
        connections.extend_from_slice(&RIGHT_CONNECTIONS);
        connections.extend_from_slice(&TORSO_CONNECTIONS);
        Self {
            side: None,
            landmarks: PoseLandmark::ALL.to_vec(),
            hip_angle: Self::hip_triple(Side::Right),
            knee_angle: Self::knee_triple(Side::Right),
            connections,
        }
    }

    /// One side of the body plus the nose
    #[must_use]
    pub fn for_side(side: Side) -> Self {
        let landmarks = PoseLandmark::ALL
            .iter()
            .copied()
            .filter(|lm| lm.side().map_or(true, |s| s == side))
            .collect();
        let connections = match side {
            Side::Left => LEFT_CONNECTIONS.to_vec(),
            Side::Right => RIGHT_CONNECTIONS.to_vec(),
        };
        Self {
            side: Some(side),
            landmarks,
            hip_angle: Self::hip_triple(side),
            knee_angle: Self::knee_triple(side),
            connections,
        }
    }

    fn hip_triple(side: Side) -> AngleTriple {
        match side {
            Side::Left => [PoseLandmark::LeftShoulder, PoseLandmark::LeftHip, PoseLandmark::LeftKnee],
            Side::Right => [PoseLandmark::RightShoulder, PoseLandmark::RightHip, PoseLandmark::RightKnee],
        }
    }

    fn knee_triple(side: Side) -> AngleTriple {
        match side {
            Side::Left => [PoseLandmark::LeftHip, PoseLandmark::LeftKnee, PoseLandmark::LeftAnkle],
            Side::Right => [PoseLandmark::RightHip, PoseLandmark::RightKnee, PoseLandmark::RightAnkle],
        }
    }

    #[must_use]
    pub fn side(&self) -> Option<Side> {
        self.side
    }

    #[must_use]
    pub fn contains(&self, landmark: PoseLandmark) -> bool {
        self.side.map_or(true, |side| landmark.side().map_or(true, |s| s == side))
    }

    #[must_use]
    pub fn landmarks(&self) -> &[PoseLandmark] {
        &self.landmarks
    }

    /// Pairs joined by a line when drawing the skeleton
    #[must_use]
    pub fn connections(&self) -> &[(PoseLandmark, PoseLandmark)] {
        &self.connections
    }
}

impl Default for LandmarkSet {
    fn default() -> Self {
        Self::all()
    }
}
