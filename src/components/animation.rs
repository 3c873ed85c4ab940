//! Per-actor animation playback over a shared [`AnimationSet`].

use std::sync::Arc;

use bevy_ecs::prelude::Component;

use crate::geometry::Rect;
use crate::resources::animationstore::{AnimationDef, AnimationSet};

/// Live playback cursor of one actor.
///
/// The frame clock hard-resets on every frame advance: leftover time past a
/// frame's duration is dropped, not carried into the next frame. Ticking
/// advances at most one frame.
#[derive(Debug, Clone, Component)]
pub struct Animator {
    set: Arc<AnimationSet>,
    current: String,
    frame_index: usize,
    elapsed: f32,
    done: bool,
    region: Rect,
}

impl Animator {
    /// Start playing `initial` from `set`.
    ///
    /// # Panics
    /// When `initial` is not part of `set`; catalogues are validated at load.
    pub fn new(set: Arc<AnimationSet>, initial: &str) -> Self {
        let mut animator = Self {
            set,
            current: String::new(),
            frame_index: 0,
            elapsed: 0.0,
            done: false,
            region: Rect::default(),
        };
        animator.play(initial);
        animator
    }

    /// Restart at frame 0 of `name`, even if it is already playing.
    pub fn play(&mut self, name: &str) {
        let region = self.set.def(name).frames[0].region;
        self.current.clear();
        self.current.push_str(name);
        self.frame_index = 0;
        self.elapsed = 0.0;
        self.done = false;
        self.region = region;
    }

    /// Advance by `dt` milliseconds.
    ///
    /// Returns the name of the animation that just finished when a
    /// non-looping animation without successor passes its last frame. That
    /// happens once; the animator then stays done until the next `play`.
    pub fn tick(&mut self, dt: f32) -> Option<String> {
        if self.done {
            return None;
        }

        let set = Arc::clone(&self.set);
        let def: &AnimationDef = set.def(&self.current);

        self.elapsed += dt;
        if self.elapsed < def.frames[self.frame_index].duration {
            return None;
        }
        self.elapsed = 0.0;

        let next_index = self.frame_index + 1;
        if next_index <= def.last_index() {
            self.frame_index = next_index;
        } else if def.looping {
            self.frame_index = 0;
        } else if let Some(next) = &def.next {
            self.play(next);
            return None;
        } else {
            self.done = true;
            return Some(self.current.clone());
        }

        self.region = def.frames[self.frame_index].region;
        None
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn is_playing(&self, name: &str) -> bool {
        self.current == name
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Source region of the frame on screen.
    pub fn region(&self) -> Rect {
        self.region
    }

    pub fn set(&self) -> &Arc<AnimationSet> {
        &self.set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOGUE: &str = r#"{
        "walk": {"looping": true, "frames": [
            {"region": [0, 0, 8, 8], "duration": 100},
            {"region": [8, 0, 8, 8], "duration": 100},
            {"region": [16, 0, 8, 8], "duration": 100}
        ]},
        "land": {"next": "walk", "frames": [
            {"region": [0, 8, 8, 8], "duration": 50},
            {"region": [8, 8, 8, 8], "duration": 50}
        ]},
        "die": {"frames": [
            {"region": [0, 16, 8, 8], "duration": 40},
            {"region": [8, 16, 8, 8], "duration": 40}
        ]}
    }"#;

    fn animator(name: &str) -> Animator {
        let set = AnimationSet::from_json("test", CATALOGUE).unwrap();
        Animator::new(Arc::new(set), name)
    }

    #[test]
    fn test_play_resets_cursor() {
        let mut a = animator("walk");
        a.tick(100.0);
        a.tick(30.0);
        assert_eq!(a.frame_index(), 1);
        a.play("walk");
        assert_eq!(a.frame_index(), 0);
        assert_eq!(a.elapsed(), 0.0);
        assert_eq!(a.region(), Rect::new(0.0, 0.0, 8.0, 8.0));
    }

    #[test]
    fn test_looping_closes_after_full_cycle() {
        let mut a = animator("walk");
        for _ in 0..12 {
            assert!(a.tick(25.0).is_none());
        }
        assert_eq!(a.frame_index(), 0);
        assert!(a.elapsed().abs() < 1e-6);
        assert_eq!(a.region(), Rect::new(0.0, 0.0, 8.0, 8.0));
        assert!(!a.is_done());
    }

    #[test]
    fn test_overshoot_is_dropped() {
        let mut a = animator("walk");
        a.tick(180.0);
        assert_eq!(a.frame_index(), 1);
        assert_eq!(a.elapsed(), 0.0);
    }

    #[test]
    fn test_successor_plays_silently() {
        let mut a = animator("land");
        assert!(a.tick(50.0).is_none());
        assert_eq!(a.frame_index(), 1);
        assert!(a.tick(50.0).is_none());
        assert!(a.is_playing("walk"));
        assert_eq!(a.frame_index(), 0);
        assert!(!a.is_done());
    }

    #[test]
    fn test_end_reported_once() {
        let mut a = animator("die");
        assert!(a.tick(40.0).is_none());
        assert_eq!(a.tick(40.0).as_deref(), Some("die"));
        assert!(a.is_done());
        assert_eq!(a.frame_index(), 1);
        assert_eq!(a.region(), Rect::new(8.0, 16.0, 8.0, 8.0));
        assert!(a.tick(40.0).is_none());
        assert!(a.tick(400.0).is_none());
    }
}
