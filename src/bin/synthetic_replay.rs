//! Feeds a scripted skeleton sequence through the engine and logs every
//! recognition. Run with `RUST_LOG=info` to see the events.

use std::{thread, time::Duration};

use anyhow::Result;
use crossbeam_channel::bounded;
use gesture_stream::{
    AllGesturesFactory, BodyFrame, FrameBatch, GestureEngine, HandState, Joint, Position,
    TrackingState, start_scripted_stream,
};

const TICK: Duration = Duration::from_millis(33);

fn main() -> Result<()> {
    env_logger::init();

    let mut engine = GestureEngine::from_factory(&AllGesturesFactory)?;
    log::info!("catalog: {:?}", engine.gesture_names());

    engine.subscribe(|event| {
        log::info!(
            "recognized {} (body {}, frame {})",
            event.gesture,
            event.body_id,
            event.frame_index
        );
    });

    let (frame_tx, frame_rx) = bounded(4);
    let feed = start_scripted_stream(build_script(), TICK, frame_tx)?;
    engine.start(frame_rx)?;

    // Let the script play out, then tear down.
    thread::sleep(TICK * 40);
    feed.stop();
    engine.stop();
    Ok(())
}

/// One body clapping over ten frames, then raising both hands.
fn build_script() -> Vec<FrameBatch> {
    let mut script = Vec::new();
    let mut frame_index = 0;

    // Hands level and apart, closing a little each tick.
    for step in 0..10 {
        frame_index += 1;
        let spread = 0.8 - 0.08 * step as f32;
        let mut body = standing_body(1);
        body.set_joint(
            Joint::HandLeft,
            Position::new(-spread / 2.0, 0.0, 2.0),
            TrackingState::Tracked,
        );
        body.set_joint(
            Joint::HandRight,
            Position::new(spread / 2.0, 0.0, 2.0),
            TrackingState::Tracked,
        );
        script.push(FrameBatch::new(frame_index, vec![body]));
    }

    // A few frames of both hands above the head.
    for _ in 0..3 {
        frame_index += 1;
        let mut body = standing_body(1);
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
        script.push(FrameBatch::new(frame_index, vec![body]));
    }

    script
}

fn standing_body(body_id: u64) -> BodyFrame {
    let mut body = BodyFrame::new(body_id);
    body.set_joint(Joint::Head, Position::new(0.0, 0.6, 2.0), TrackingState::Tracked);
    body.set_joint(
        Joint::ShoulderRight,
        Position::new(0.2, 0.4, 2.0),
        TrackingState::Tracked,
    );
    body.hand_left.state = HandState::Open;
    body.hand_right.state = HandState::Open;
    body
}
