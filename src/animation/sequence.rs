//! Animation chaining helpers
//!
//! Small conveniences over [`AnimationControl`] for the patterns effects use
//! most: play an intro once and settle into a loop, or run a fixed sequence.

use super::state::{AnimationControl, TrackHandle};

/// One step of an animation sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequenceStep<'a> {
    /// Animation name
    pub animation: &'a str,
    /// Whether the step loops
    pub looping: bool,
    /// Start delay, with `add_animation` semantics
    pub delay: f32,
}

impl<'a> SequenceStep<'a> {
    /// Step that plays once right after the previous one
    #[must_use]
    pub const fn once(animation: &'a str) -> Self {
        Self {
            animation,
            looping: false,
            delay: 0.0,
        }
    }

    /// Step that loops once reached
    #[must_use]
    pub const fn looped(animation: &'a str) -> Self {
        Self {
            animation,
            looping: true,
            delay: 0.0,
        }
    }

    /// Override the start delay
    #[must_use]
    pub const fn after(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }
}

/// Play `appear` once on track 0, then loop `idle`.
///
/// Returns the handle of the `appear` entry, whose completion marks the
/// moment the loop takes over.
pub fn play_appear_then_loop(
    target: &mut impl AnimationControl,
    appear: &str,
    idle: &str,
) -> Option<TrackHandle> {
    let handle = target.set_animation(0, appear, false)?;
    target.add_animation(0, idle, true, 0.0);
    Some(handle)
}

/// Replace track `track` with `steps`, played in order.
///
/// The first step is set immediately and its delay ignored. Steps whose
/// animation is missing are skipped with a warning from the target. Returns
/// the handle of the last step that was scheduled.
pub fn play_sequence(
    target: &mut impl AnimationControl,
    track: usize,
    steps: &[SequenceStep<'_>],
) -> Option<TrackHandle> {
    let mut last = None;
    for step in steps {
        let handle = if last.is_none() {
            target.set_animation(track, step.animation, step.looping)
        } else {
            target.add_animation(track, step.animation, step.looping, step.delay)
        };
        if handle.is_some() {
            last = handle;
        }
    }
    last
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::animation::{AnimationState, SkeletonData};

    fn state() -> AnimationState {
        let data = SkeletonData::new("hero")
            .with_clip("take_damage", 0.3)
            .with_clip("death", 1.0)
            .with_clip("death_idle", 2.0);
        AnimationState::new(Arc::new(data))
    }

    #[test]
    fn test_appear_then_loop() {
        let mut state = state();
        let appear = play_appear_then_loop(&mut state, "death", "death_idle").unwrap();

        let mut completed = Vec::new();
        state.update(1.5, &mut completed);
        assert_eq!(completed, vec![appear]);
        assert_eq!(state.current_animation(0), Some("death_idle"));
    }

    #[test]
    fn test_sequence_runs_in_order() {
        let mut state = state();
        let steps = [
            SequenceStep::once("take_damage"),
            SequenceStep::once("death"),
            SequenceStep::looped("death_idle"),
        ];
        let last = play_sequence(&mut state, 0, &steps).unwrap();
        assert_eq!(state.queued(0), 2);

        let mut completed = Vec::new();
        state.update(1.4, &mut completed);
        assert_eq!(completed.len(), 2);
        assert_eq!(state.current_handle(0), Some(last));
    }

    #[test]
    fn test_sequence_skips_missing_steps() {
        let mut state = state();
        let steps = [
            SequenceStep::once("missing"),
            SequenceStep::once("death"),
            SequenceStep::once("also_missing").after(0.5),
        ];
        let last = play_sequence(&mut state, 0, &steps).unwrap();

        assert_eq!(state.current_handle(0), Some(last));
        assert_eq!(state.queued(0), 0);
    }
}
