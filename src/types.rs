use std::time::Instant;

/// Named skeletal landmarks, one per tracked joint of a body.
///
/// The set and ordering follow the 25-joint camera-space skeleton the sensor
/// reports. Every [`BodyFrame`] carries exactly one entry per member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Joint {
    SpineBase,
    SpineMid,
    Neck,
    Head,
    ShoulderLeft,
    ElbowLeft,
    WristLeft,
    HandLeft,
    ShoulderRight,
    ElbowRight,
    WristRight,
    HandRight,
    HipLeft,
    KneeLeft,
    AnkleLeft,
    FootLeft,
    HipRight,
    KneeRight,
    AnkleRight,
    FootRight,
    SpineShoulder,
    HandTipLeft,
    ThumbLeft,
    HandTipRight,
    ThumbRight,
}

impl Joint {
    pub const COUNT: usize = 25;

    pub const ALL: [Joint; Joint::COUNT] = [
        Joint::SpineBase,
        Joint::SpineMid,
        Joint::Neck,
        Joint::Head,
        Joint::ShoulderLeft,
        Joint::ElbowLeft,
        Joint::WristLeft,
        Joint::HandLeft,
        Joint::ShoulderRight,
        Joint::ElbowRight,
        Joint::WristRight,
        Joint::HandRight,
        Joint::HipLeft,
        Joint::KneeLeft,
        Joint::AnkleLeft,
        Joint::FootLeft,
        Joint::HipRight,
        Joint::KneeRight,
        Joint::AnkleRight,
        Joint::FootRight,
        Joint::SpineShoulder,
        Joint::HandTipLeft,
        Joint::ThumbLeft,
        Joint::HandTipRight,
        Joint::ThumbRight,
    ];
}

/// Tracking quality of a single joint observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackingState {
    Tracked,
    Inferred,
    NotTracked,
}

/// A point in sensor camera space, in meters.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Position { x, y, z }
    }
}

/// One joint observation: where it is and how well the sensor saw it.
#[derive(Clone, Copy, Debug)]
pub struct JointData {
    pub position: Position,
    pub tracking: TrackingState,
}

impl Default for JointData {
    fn default() -> Self {
        JointData {
            position: Position::default(),
            tracking: TrackingState::NotTracked,
        }
    }
}

/// Open-state of a hand as reported by the sensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandState {
    Open,
    Closed,
    Lasso,
    Unknown,
}

/// Confidence the sensor attaches to a hand-state reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackingConfidence {
    High,
    Low,
}

/// Hand-state reading plus its confidence.
#[derive(Clone, Copy, Debug)]
pub struct HandData {
    pub state: HandState,
    pub confidence: TrackingConfidence,
}

impl Default for HandData {
    fn default() -> Self {
        HandData {
            state: HandState::Unknown,
            confidence: TrackingConfidence::Low,
        }
    }
}

/// One sensor-tick snapshot of a single person's skeleton.
///
/// Every [`Joint`] has exactly one slot; untracked joints keep a
/// `NotTracked` entry whose position is meaningless and must not feed
/// recognition predicates. Frames are consumed synchronously by the engine
/// and never retained past the dispatch cycle.
#[derive(Clone, Debug)]
pub struct BodyFrame {
    pub body_id: u64,
    pub joints: [JointData; Joint::COUNT],
    pub hand_left: HandData,
    pub hand_right: HandData,
    pub tracked: bool,
}

impl BodyFrame {
    /// A tracked body with every joint still `NotTracked`.
    pub fn new(body_id: u64) -> Self {
        BodyFrame {
            body_id,
            joints: [JointData::default(); Joint::COUNT],
            hand_left: HandData::default(),
            hand_right: HandData::default(),
            tracked: true,
        }
    }

    /// A body the sensor has lost; the engine discards its state on sight.
    pub fn untracked(body_id: u64) -> Self {
        let mut body = BodyFrame::new(body_id);
        body.tracked = false;
        body
    }

    pub fn joint(&self, joint: Joint) -> &JointData {
        &self.joints[joint as usize]
    }

    pub fn set_joint(&mut self, joint: Joint, position: Position, tracking: TrackingState) {
        self.joints[joint as usize] = JointData { position, tracking };
    }

    /// Position of a joint, or `None` when the sensor is not tracking it.
    /// Inferred joints still yield a position.
    pub fn tracked_position(&self, joint: Joint) -> Option<Position> {
        let data = self.joint(joint);
        match data.tracking {
            TrackingState::Tracked | TrackingState::Inferred => Some(data.position),
            TrackingState::NotTracked => None,
        }
    }
}

/// All bodies visible at one sensor tick, in sensor delivery order.
#[derive(Clone, Debug)]
pub struct FrameBatch {
    pub frame_index: u64,
    pub timestamp: Instant,
    pub bodies: Vec<BodyFrame>,
}

impl FrameBatch {
    pub fn new(frame_index: u64, bodies: Vec<BodyFrame>) -> Self {
        FrameBatch {
            frame_index,
            timestamp: Instant::now(),
            bodies,
        }
    }
}

/// Emitted the frame a gesture's state machine reaches recognition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecognitionEvent {
    pub gesture: String,
    pub body_id: u64,
    pub frame_index: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_joint_enumerator_has_a_slot() {
        let body = BodyFrame::new(1);
        for joint in Joint::ALL {
            assert_eq!(body.joint(joint).tracking, TrackingState::NotTracked);
        }
        assert_eq!(Joint::ALL.len(), Joint::COUNT);
    }

    #[test]
    fn not_tracked_joints_yield_no_position() {
        let mut body = BodyFrame::new(1);
        assert!(body.tracked_position(Joint::Head).is_none());

        body.set_joint(
            Joint::Head,
            Position::new(0.0, 0.6, 2.0),
            TrackingState::Inferred,
        );
        assert_eq!(
            body.tracked_position(Joint::Head),
            Some(Position::new(0.0, 0.6, 2.0))
        );
    }
}
