use std::mem;

use crate::types::BodyFrame;

/// Frame-count bounds of a gesture attempt, inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameWindow {
    pub min_frames: u32,
    pub max_frames: u32,
}

impl FrameWindow {
    /// Single-frame window: the posture case.
    pub fn instant() -> Self {
        FrameWindow {
            min_frames: 1,
            max_frames: 1,
        }
    }

    /// Windowed bounds for a temporal gesture.
    ///
    /// # Panics
    /// When `min_frames > max_frames` or `min_frames == 0`; both are
    /// construction-time definition bugs, not runtime conditions.
    pub fn spanning(min_frames: u32, max_frames: u32) -> Self {
        assert!(min_frames >= 1, "frame window starts at one frame");
        assert!(min_frames <= max_frames, "frame window bounds inverted");
        FrameWindow {
            min_frames,
            max_frames,
        }
    }

    pub fn is_instant(&self) -> bool {
        self.min_frames == 1 && self.max_frames == 1
    }
}

/// A recognizable gesture or posture definition.
///
/// Definitions are stateless and pure: the same body frame against the same
/// attempt baseline always produces the same answer. All temporal memory is
/// held by the engine, keyed per (gesture, body) — never on the definition,
/// so one definition instance safely serves every tracked body.
///
/// Postures implement only [`Gesture::test_initial`] and keep the default
/// instant window; the engine then evaluates them level-triggered, firing on
/// every frame the predicate holds. Temporal gestures override
/// [`Gesture::window`] and the running/end predicates, which receive `start`:
/// the body snapshot captured the frame the initial condition matched.
pub trait Gesture: Send + Sync {
    /// Unique name within a catalog.
    fn name(&self) -> &str;

    fn window(&self) -> FrameWindow {
        FrameWindow::instant()
    }

    /// Entry predicate; for postures, the whole recognition test.
    fn test_initial(&self, body: &BodyFrame) -> bool;

    /// Must keep holding while an attempt is priming.
    fn test_running(&self, _body: &BodyFrame, _start: &BodyFrame) -> bool {
        false
    }

    /// Completion predicate, checked once the counter reaches `min_frames`.
    fn test_end(&self, _body: &BodyFrame, _start: &BodyFrame) -> bool {
        false
    }
}

/// Attempt phase for one (gesture, body) pair.
#[derive(Clone, Debug, Default)]
pub(crate) enum Phase {
    #[default]
    Idle,
    Priming {
        counter: u32,
        start: BodyFrame,
    },
}

/// The engine-owned temporal memory of one (gesture, body) pair.
#[derive(Clone, Debug, Default)]
pub(crate) struct AttemptState {
    phase: Phase,
}

impl AttemptState {
    /// Advances the attempt by one frame and reports whether the gesture was
    /// recognized at this frame.
    ///
    /// Instant windows bypass the machine entirely: the initial predicate is
    /// re-evaluated every frame with no debouncing. Windowed attempts follow
    /// idle -> priming -> recognized/abort, with the abort paths (running
    /// predicate fails, or the counter passes `max_frames` before the end
    /// predicate holds) silently returning to idle.
    pub(crate) fn step(&mut self, gesture: &dyn Gesture, body: &BodyFrame) -> bool {
        let window = gesture.window();
        if window.is_instant() {
            return gesture.test_initial(body);
        }

        match mem::take(&mut self.phase) {
            Phase::Idle => {
                if gesture.test_initial(body) {
                    self.phase = Phase::Priming {
                        counter: 1,
                        start: body.clone(),
                    };
                }
                false
            }
            Phase::Priming { counter, start } => {
                let counter = counter + 1;
                if !gesture.test_running(body, &start) {
                    return false;
                }
                if counter > window.max_frames {
                    return false;
                }
                if counter >= window.min_frames && gesture.test_end(body, &start) {
                    return true;
                }
                self.phase = Phase::Priming { counter, start };
                false
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn is_idle(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }
}
