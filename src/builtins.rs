//! Built-in posture and gesture definitions.
//!
//! Thresholds are camera-space meters and belong to each definition, not to
//! the engine. All comparisons use inclusive bounds.

use crate::gesture::{FrameWindow, Gesture};
use crate::types::{BodyFrame, HandState, Joint, Position};

// ClapHands: hands start level and apart, stay level, finish together.
const CLAP_LEVEL_EPS: f32 = 0.12;
const CLAP_SPREAD_MIN: f32 = 0.55;
const CLAP_CLOSE_EPS: f32 = 0.12;
const CLAP_MIN_FRAMES: u32 = 3;
const CLAP_MAX_FRAMES: u32 = 30;

// SwipeRightHand: open right hand travels right at roughly constant height.
const SWIPE_LEVEL_EPS: f32 = 0.20;
const SWIPE_TRAVEL_MIN: f32 = 0.35;
const SWIPE_MIN_FRAMES: u32 = 4;
const SWIPE_MAX_FRAMES: u32 = 45;

fn open_hand_position(body: &BodyFrame, hand: Joint) -> Option<Position> {
    let state = match hand {
        Joint::HandLeft => body.hand_left.state,
        Joint::HandRight => body.hand_right.state,
        _ => return None,
    };
    if state != HandState::Open {
        return None;
    }
    body.tracked_position(hand)
}

/// Right hand open and raised above the head.
pub struct RightHandUp;

impl Gesture for RightHandUp {
    fn name(&self) -> &str {
        "RightHandUp"
    }

    fn test_initial(&self, body: &BodyFrame) -> bool {
        let Some(hand) = open_hand_position(body, Joint::HandRight) else {
            return false;
        };
        let Some(head) = body.tracked_position(Joint::Head) else {
            return false;
        };
        hand.y >= head.y
    }
}

/// Both hands open and raised above the head.
pub struct TwoHandsUp;

impl Gesture for TwoHandsUp {
    fn name(&self) -> &str {
        "TwoHandsUp"
    }

    fn test_initial(&self, body: &BodyFrame) -> bool {
        let (Some(left), Some(right)) = (
            open_hand_position(body, Joint::HandLeft),
            open_hand_position(body, Joint::HandRight),
        ) else {
            return false;
        };
        let Some(head) = body.tracked_position(Joint::Head) else {
            return false;
        };
        left.y >= head.y && right.y >= head.y
    }
}

/// Both hands open and held below the head.
pub struct TwoHandsBottom;

impl Gesture for TwoHandsBottom {
    fn name(&self) -> &str {
        "TwoHandsBottom"
    }

    fn test_initial(&self, body: &BodyFrame) -> bool {
        let (Some(left), Some(right)) = (
            open_hand_position(body, Joint::HandLeft),
            open_hand_position(body, Joint::HandRight),
        ) else {
            return false;
        };
        let Some(head) = body.tracked_position(Joint::Head) else {
            return false;
        };
        left.y <= head.y && right.y <= head.y
    }
}

/// Hands held level and apart, then brought together while level.
pub struct ClapHands;

impl ClapHands {
    fn hands(body: &BodyFrame) -> Option<(Position, Position)> {
        let left = body.tracked_position(Joint::HandLeft)?;
        let right = body.tracked_position(Joint::HandRight)?;
        Some((left, right))
    }

    fn hands_level(left: Position, right: Position) -> bool {
        (left.y - right.y).abs() <= CLAP_LEVEL_EPS
    }
}

impl Gesture for ClapHands {
    fn name(&self) -> &str {
        "ClapHands"
    }

    fn window(&self) -> FrameWindow {
        FrameWindow::spanning(CLAP_MIN_FRAMES, CLAP_MAX_FRAMES)
    }

    fn test_initial(&self, body: &BodyFrame) -> bool {
        let Some((left, right)) = Self::hands(body) else {
            return false;
        };
        Self::hands_level(left, right) && (left.x - right.x).abs() >= CLAP_SPREAD_MIN
    }

    fn test_running(&self, body: &BodyFrame, _start: &BodyFrame) -> bool {
        let Some((left, right)) = Self::hands(body) else {
            return false;
        };
        Self::hands_level(left, right)
    }

    fn test_end(&self, body: &BodyFrame, _start: &BodyFrame) -> bool {
        let Some((left, right)) = Self::hands(body) else {
            return false;
        };
        (left.x - right.x).abs() <= CLAP_CLOSE_EPS
    }
}

/// Open right hand sweeping rightwards from beside the right shoulder.
pub struct SwipeRightHand;

impl Gesture for SwipeRightHand {
    fn name(&self) -> &str {
        "SwipeRightHand"
    }

    fn window(&self) -> FrameWindow {
        FrameWindow::spanning(SWIPE_MIN_FRAMES, SWIPE_MAX_FRAMES)
    }

    fn test_initial(&self, body: &BodyFrame) -> bool {
        let Some(hand) = open_hand_position(body, Joint::HandRight) else {
            return false;
        };
        let Some(shoulder) = body.tracked_position(Joint::ShoulderRight) else {
            return false;
        };
        hand.x <= shoulder.x
    }

    fn test_running(&self, body: &BodyFrame, start: &BodyFrame) -> bool {
        let Some(hand) = open_hand_position(body, Joint::HandRight) else {
            return false;
        };
        let Some(origin) = start.tracked_position(Joint::HandRight) else {
            return false;
        };
        (hand.y - origin.y).abs() <= SWIPE_LEVEL_EPS
    }

    fn test_end(&self, body: &BodyFrame, start: &BodyFrame) -> bool {
        let (Some(hand), Some(origin)) = (
            body.tracked_position(Joint::HandRight),
            start.tracked_position(Joint::HandRight),
        ) else {
            return false;
        };
        hand.x - origin.x >= SWIPE_TRAVEL_MIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::Gesture;
    use crate::types::{HandState, Position, TrackingState};

    fn standing_body() -> BodyFrame {
        let mut body = BodyFrame::new(1);
        body.set_joint(Joint::Head, Position::new(0.0, 0.6, 2.0), TrackingState::Tracked);
        body.set_joint(
            Joint::ShoulderRight,
            Position::new(0.2, 0.4, 2.0),
            TrackingState::Tracked,
        );
        body.set_joint(
            Joint::HandLeft,
            Position::new(-0.3, 0.0, 2.0),
            TrackingState::Tracked,
        );
        body.set_joint(
            Joint::HandRight,
            Position::new(0.3, 0.0, 2.0),
            TrackingState::Tracked,
        );
        body.hand_left.state = HandState::Open;
        body.hand_right.state = HandState::Open;
        body
    }

    #[test]
    fn right_hand_up_requires_open_hand_above_head() {
        let mut body = standing_body();
        body.set_joint(
            Joint::HandRight,
            Position::new(0.2, 0.9, 2.0),
            TrackingState::Tracked,
        );
        assert!(RightHandUp.test_initial(&body));

        body.hand_right.state = HandState::Closed;
        assert!(!RightHandUp.test_initial(&body));
    }

    #[test]
    fn right_hand_up_ignores_untracked_joints() {
        let mut body = standing_body();
        body.set_joint(
            Joint::HandRight,
            Position::new(0.2, 0.9, 2.0),
            TrackingState::NotTracked,
        );
        assert!(!RightHandUp.test_initial(&body));
    }

    #[test]
    fn two_hands_up_needs_both_hands_above_head() {
        let mut body = standing_body();
        body.set_joint(
            Joint::HandLeft,
            Position::new(-0.2, 0.9, 2.0),
            TrackingState::Tracked,
        );
        body.set_joint(
            Joint::HandRight,
            Position::new(0.2, 0.9, 2.0),
            TrackingState::Tracked,
        );
        assert!(TwoHandsUp.test_initial(&body));
        assert!(!TwoHandsBottom.test_initial(&body));

        body.set_joint(
            Joint::HandLeft,
            Position::new(-0.2, 0.1, 2.0),
            TrackingState::Tracked,
        );
        assert!(!TwoHandsUp.test_initial(&body));
    }

    #[test]
    fn two_hands_bottom_matches_lowered_open_hands() {
        let body = standing_body();
        assert!(TwoHandsBottom.test_initial(&body));
    }

    #[test]
    fn clap_initial_needs_level_and_spread_hands() {
        let body = standing_body();
        assert!(ClapHands.test_initial(&body));

        let mut uneven = standing_body();
        uneven.set_joint(
            Joint::HandLeft,
            Position::new(-0.3, 0.4, 2.0),
            TrackingState::Tracked,
        );
        assert!(!ClapHands.test_initial(&uneven));

        let mut narrow = standing_body();
        narrow.set_joint(
            Joint::HandLeft,
            Position::new(-0.1, 0.0, 2.0),
            TrackingState::Tracked,
        );
        narrow.set_joint(
            Joint::HandRight,
            Position::new(0.1, 0.0, 2.0),
            TrackingState::Tracked,
        );
        assert!(!ClapHands.test_initial(&narrow));
    }

    #[test]
    fn clap_end_fires_when_hands_meet() {
        let start = standing_body();
        let mut closed = standing_body();
        closed.set_joint(
            Joint::HandLeft,
            Position::new(-0.04, 0.0, 2.0),
            TrackingState::Tracked,
        );
        closed.set_joint(
            Joint::HandRight,
            Position::new(0.04, 0.0, 2.0),
            TrackingState::Tracked,
        );
        assert!(ClapHands.test_running(&closed, &start));
        assert!(ClapHands.test_end(&closed, &start));
        assert!(!ClapHands.test_end(&start, &start));
    }

    #[test]
    fn swipe_tracks_rightward_travel_from_the_start_snapshot() {
        let mut start = standing_body();
        start.set_joint(
            Joint::HandRight,
            Position::new(0.1, 0.2, 2.0),
            TrackingState::Tracked,
        );
        assert!(SwipeRightHand.test_initial(&start));

        let mut mid = start.clone();
        mid.set_joint(
            Joint::HandRight,
            Position::new(0.3, 0.25, 2.0),
            TrackingState::Tracked,
        );
        assert!(SwipeRightHand.test_running(&mid, &start));
        assert!(!SwipeRightHand.test_end(&mid, &start));

        let mut done = start.clone();
        done.set_joint(
            Joint::HandRight,
            Position::new(0.5, 0.2, 2.0),
            TrackingState::Tracked,
        );
        assert!(SwipeRightHand.test_end(&done, &start));
    }

    #[test]
    fn swipe_running_fails_when_the_hand_drops() {
        let mut start = standing_body();
        start.set_joint(
            Joint::HandRight,
            Position::new(0.1, 0.2, 2.0),
            TrackingState::Tracked,
        );

        let mut dropped = start.clone();
        dropped.set_joint(
            Joint::HandRight,
            Position::new(0.3, -0.3, 2.0),
            TrackingState::Tracked,
        );
        assert!(!SwipeRightHand.test_running(&dropped, &start));
    }
}
