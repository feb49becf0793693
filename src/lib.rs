//! Temporal gesture recognition over skeletal body-frame streams.
//!
//! A [`GestureEngine`] consumes [`FrameBatch`] snapshots from an external
//! sensor feed and decides, frame by frame and body by body, whether any
//! cataloged gesture definition has just been recognized. Instantaneous
//! postures re-fire on every matching frame; temporal gestures run a
//! per-(gesture, body) windowed attempt machine. Recognition results are
//! published to subscribers as [`RecognitionEvent`]s.

pub mod builtins;
pub mod catalog;
pub mod engine;
pub mod gesture;
pub mod source;
pub mod types;

// Re-exports for convenience
pub use catalog::{AllGesturesFactory, CatalogError, GestureCatalog, GestureFactory};
pub use engine::{EngineError, GestureEngine, StopSignal, SubscriptionId};
pub use gesture::{FrameWindow, Gesture};
pub use source::{FrameFeed, start_scripted_stream};
pub use types::{
    BodyFrame, FrameBatch, HandData, HandState, Joint, JointData, Position, RecognitionEvent,
    TrackingConfidence, TrackingState,
};
