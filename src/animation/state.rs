//! Track-based animation playback
//!
//! Provides the animation control surface the pool manager drives, plus a
//! reference implementation that schedules clips on indexed tracks.
//!
//! # Completion Semantics
//!
//! - A non-looping entry reports completion exactly once, on the update in
//!   which its playhead reaches the clip duration
//! - Looping entries never report completion
//! - An entry replaced by `set_animation` or removed by `clear_tracks` is
//!   interrupted and never reports completion
//! - Queued entries (from `add_animation`) start when the previous entry has
//!   played for their delay, carrying the overflow time forward

use std::collections::VecDeque;
use std::sync::Arc;

use smallvec::SmallVec;

use super::clip::SkeletonData;

// ============================================================================
// Control Surface
// ============================================================================

/// Identifies one scheduled entry on one track.
///
/// Handles are unique per animation state; a new `set_animation` on the same
/// track yields a different handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackHandle {
    track: usize,
    serial: u64,
}

impl TrackHandle {
    /// Track index this entry was scheduled on
    #[must_use]
    #[inline]
    pub const fn track(self) -> usize {
        self.track
    }
}

/// Animation playback operations required by pooled instances.
pub trait AnimationControl {
    /// Replace whatever plays on `track` with `name`.
    ///
    /// Returns `None` if the animation does not exist.
    fn set_animation(&mut self, track: usize, name: &str, looping: bool) -> Option<TrackHandle>;

    /// Queue `name` on `track` after the last scheduled entry.
    ///
    /// `delay > 0` starts it that many seconds after the previous entry
    /// started; `delay <= 0` is added to the previous entry's duration.
    fn add_animation(
        &mut self,
        track: usize,
        name: &str,
        looping: bool,
        delay: f32,
    ) -> Option<TrackHandle>;

    /// Remove all entries from all tracks without reporting completions.
    fn clear_tracks(&mut self);

    /// Return the skeleton to its setup pose.
    fn reset_to_neutral_pose(&mut self);

    /// Advance playback by `delta` seconds, pushing every entry that
    /// finished during this step into `completed`.
    fn update(&mut self, delta: f32, completed: &mut Vec<TrackHandle>);
}

// ============================================================================
// Reference Implementation
// ============================================================================

/// Pose the skeleton is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pose {
    /// Setup (bind) pose
    #[default]
    Setup,
    /// Posed by animation
    Animated,
}

/// One scheduled clip
#[derive(Debug, Clone)]
struct TrackEntry {
    handle: TrackHandle,
    animation: String,
    duration: f32,
    looping: bool,
    /// Seconds since the entry started (negative while a delay is pending)
    elapsed: f32,
    /// Start offset relative to the previous entry's start
    delay: f32,
    completed: bool,
}

impl TrackEntry {
    fn playhead(&self) -> f32 {
        let elapsed = self.elapsed.max(0.0);
        if self.looping && self.duration > 0.0 {
            elapsed % self.duration
        } else {
            elapsed.min(self.duration)
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Track {
    current: Option<TrackEntry>,
    queue: VecDeque<TrackEntry>,
}

impl Track {
    fn advance(&mut self, delta: f32, completed: &mut Vec<TrackHandle>) {
        let Some(entry) = self.current.as_mut() else {
            return;
        };
        entry.elapsed += delta;

        while let Some(entry) = self.current.as_mut() {
            if !entry.looping && !entry.completed && entry.elapsed >= entry.duration {
                entry.completed = true;
                completed.push(entry.handle);
            }

            let starts_next = self
                .queue
                .front()
                .is_some_and(|next| entry.elapsed >= next.delay);
            if !starts_next {
                return;
            }

            let overflow = entry.elapsed;
            if let Some(mut next) = self.queue.pop_front() {
                next.elapsed = overflow - next.delay;
                self.current = Some(next);
            }
        }
    }
}

/// Per-instance animation state over shared skeleton data.
#[derive(Debug, Clone)]
pub struct AnimationState {
    /// Skeleton this state plays animations from
    data: Arc<SkeletonData>,
    /// Tracks by index
    tracks: SmallVec<[Track; 2]>,
    /// Next entry serial
    next_serial: u64,
    /// Playback speed multiplier
    time_scale: f32,
    /// Current pose
    pose: Pose,
}

impl AnimationState {
    /// Create an idle state for `data`
    #[must_use]
    pub fn new(data: Arc<SkeletonData>) -> Self {
        Self {
            data,
            tracks: SmallVec::new(),
            next_serial: 0,
            time_scale: 1.0,
            pose: Pose::Setup,
        }
    }

    /// Skeleton data
    #[must_use]
    pub fn data(&self) -> &SkeletonData {
        &self.data
    }

    /// Playback speed multiplier
    #[must_use]
    pub const fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Set playback speed (clamped to non-negative)
    pub fn set_time_scale(&mut self, time_scale: f32) {
        self.time_scale = time_scale.max(0.0);
    }

    /// Current pose
    #[must_use]
    pub const fn pose(&self) -> Pose {
        self.pose
    }

    /// Name of the entry currently playing on `track`
    #[must_use]
    pub fn current_animation(&self, track: usize) -> Option<&str> {
        self.current(track).map(|entry| entry.animation.as_str())
    }

    /// Handle of the entry currently playing on `track`
    #[must_use]
    pub fn current_handle(&self, track: usize) -> Option<TrackHandle> {
        self.current(track).map(|entry| entry.handle)
    }

    /// Playhead of the entry currently playing on `track`, in seconds
    #[must_use]
    pub fn playhead(&self, track: usize) -> Option<f32> {
        self.current(track).map(TrackEntry::playhead)
    }

    /// Number of entries waiting behind the current one on `track`
    #[must_use]
    pub fn queued(&self, track: usize) -> usize {
        self.tracks.get(track).map_or(0, |t| t.queue.len())
    }

    /// Check whether any track has an entry
    #[must_use]
    pub fn has_tracks(&self) -> bool {
        self.tracks
            .iter()
            .any(|track| track.current.is_some() || !track.queue.is_empty())
    }

    fn current(&self, track: usize) -> Option<&TrackEntry> {
        self.tracks.get(track).and_then(|t| t.current.as_ref())
    }

    fn track_mut(&mut self, index: usize) -> &mut Track {
        if self.tracks.len() <= index {
            self.tracks.resize_with(index + 1, Track::default);
        }
        &mut self.tracks[index]
    }

    fn new_entry(&mut self, track: usize, name: &str, looping: bool) -> Option<TrackEntry> {
        let Some(clip) = self.data.find_animation(name) else {
            log::warn!(
                "Animation '{}' not found on skeleton '{}'",
                name,
                self.data.name
            );
            return None;
        };
        let duration = clip.duration;

        let handle = TrackHandle {
            track,
            serial: self.next_serial,
        };
        self.next_serial += 1;

        Some(TrackEntry {
            handle,
            animation: name.to_string(),
            duration,
            looping,
            elapsed: 0.0,
            delay: 0.0,
            completed: false,
        })
    }
}

impl AnimationControl for AnimationState {
    fn set_animation(&mut self, track: usize, name: &str, looping: bool) -> Option<TrackHandle> {
        let entry = self.new_entry(track, name, looping)?;
        let handle = entry.handle;

        let slot = self.track_mut(track);
        slot.queue.clear();
        slot.current = Some(entry);
        self.pose = Pose::Animated;

        Some(handle)
    }

    fn add_animation(
        &mut self,
        track: usize,
        name: &str,
        looping: bool,
        delay: f32,
    ) -> Option<TrackHandle> {
        let mut entry = self.new_entry(track, name, looping)?;
        let handle = entry.handle;

        let slot = self.track_mut(track);
        let previous_duration = slot
            .queue
            .back()
            .or(slot.current.as_ref())
            .map(|previous| previous.duration);

        match previous_duration {
            Some(duration) => {
                entry.delay = if delay > 0.0 {
                    delay
                } else {
                    (duration + delay).max(0.0)
                };
                slot.queue.push_back(entry);
            }
            None => {
                entry.elapsed = -delay.max(0.0);
                slot.current = Some(entry);
            }
        }
        self.pose = Pose::Animated;

        Some(handle)
    }

    fn clear_tracks(&mut self) {
        self.tracks.clear();
    }

    fn reset_to_neutral_pose(&mut self) {
        self.pose = Pose::Setup;
    }

    fn update(&mut self, delta: f32, completed: &mut Vec<TrackHandle>) {
        let delta = delta * self.time_scale;
        if delta <= 0.0 {
            return;
        }
        for track in &mut self.tracks {
            track.advance(delta, completed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AnimationState {
        let data = SkeletonData::new("fx")
            .with_clip("intro", 1.0)
            .with_clip("attack", 0.5)
            .with_clip("idle", 2.0);
        AnimationState::new(Arc::new(data))
    }

    fn step(state: &mut AnimationState, delta: f32) -> Vec<TrackHandle> {
        let mut completed = Vec::new();
        state.update(delta, &mut completed);
        completed
    }

    #[test]
    fn test_missing_animation() {
        let mut state = state();
        assert!(state.set_animation(0, "nope", false).is_none());
        assert!(!state.has_tracks());
    }

    #[test]
    fn test_completion_fires_once() {
        let mut state = state();
        let handle = state.set_animation(0, "attack", false).unwrap();

        assert!(step(&mut state, 0.3).is_empty());
        assert_eq!(step(&mut state, 0.3), vec![handle]);
        assert!(step(&mut state, 1.0).is_empty(), "Must not fire twice");
        assert!((state.playhead(0).unwrap() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_looping_never_completes() {
        let mut state = state();
        state.set_animation(0, "attack", true).unwrap();

        assert!(step(&mut state, 5.2).is_empty());
        assert!((state.playhead(0).unwrap() - 0.2).abs() < 1e-3);
    }

    #[test]
    fn test_interrupted_entry_never_completes() {
        let mut state = state();
        let first = state.set_animation(0, "attack", false).unwrap();
        step(&mut state, 0.25);

        let second = state.set_animation(0, "intro", false).unwrap();
        assert_ne!(first, second);

        let completed = step(&mut state, 2.0);
        assert_eq!(completed, vec![second]);
    }

    #[test]
    fn test_clear_tracks_suppresses_completion() {
        let mut state = state();
        state.set_animation(0, "attack", false).unwrap();
        state.clear_tracks();

        assert!(step(&mut state, 1.0).is_empty());
        assert!(!state.has_tracks());
    }

    #[test]
    fn test_queued_entry_starts_after_previous() {
        let mut state = state();
        let intro = state.set_animation(0, "intro", false).unwrap();
        let idle = state.add_animation(0, "idle", true, 0.0).unwrap();
        assert_eq!(state.queued(0), 1);

        assert_eq!(step(&mut state, 1.25), vec![intro]);
        assert_eq!(state.current_animation(0), Some("idle"));
        assert_eq!(state.current_handle(0), Some(idle));
        assert!((state.playhead(0).unwrap() - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_positive_delay_is_relative_to_previous_start() {
        let mut state = state();
        state.set_animation(0, "idle", true).unwrap();
        state.add_animation(0, "attack", false, 0.5).unwrap();

        step(&mut state, 0.4);
        assert_eq!(state.current_animation(0), Some("idle"));
        step(&mut state, 0.2);
        assert_eq!(state.current_animation(0), Some("attack"));
    }

    #[test]
    fn test_add_on_empty_track_waits_for_delay() {
        let mut state = state();
        let handle = state.add_animation(1, "attack", false, 0.5).unwrap();
        assert_eq!(handle.track(), 1);

        assert!(step(&mut state, 0.9).is_empty());
        assert_eq!(step(&mut state, 0.2), vec![handle]);
    }

    #[test]
    fn test_chain_completes_each_entry_in_one_large_step() {
        let mut state = state();
        let a = state.set_animation(0, "attack", false).unwrap();
        let b = state.add_animation(0, "attack", false, 0.0).unwrap();
        let c = state.add_animation(0, "intro", false, 0.0).unwrap();

        assert_eq!(step(&mut state, 10.0), vec![a, b, c]);
    }

    #[test]
    fn test_time_scale_and_pose() {
        let mut state = state();
        assert_eq!(state.pose(), Pose::Setup);

        let handle = state.set_animation(0, "intro", false).unwrap();
        assert_eq!(state.pose(), Pose::Animated);

        state.set_time_scale(2.0);
        assert_eq!(step(&mut state, 0.5), vec![handle]);

        state.reset_to_neutral_pose();
        assert_eq!(state.pose(), Pose::Setup);
    }
}
