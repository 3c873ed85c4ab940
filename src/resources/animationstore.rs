//! Animation catalogue registry.
//!
//! Each actor kind owns one [`AnimationSet`]: its named animations, each an
//! ordered list of frames (source region + duration in milliseconds), a loop
//! flag and an optional successor played when a non-looping animation ends.
//! Sets are shared read-only between every actor of the kind through an
//! [`Arc`].
//!
//! Catalogues are validated when loaded: no empty frame lists, and every
//! successor must name an animation of the same set. Kinds also declare the
//! animation names their state machines play; [`AnimationStore::require`]
//! checks those up front so playback never meets a missing name.

use std::path::Path;
use std::sync::Arc;

use bevy_ecs::prelude::Resource;
use log::info;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::geometry::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationFrame {
    /// Source rectangle in the kind's sprite sheet.
    pub region: Rect,
    /// Milliseconds the frame stays on screen.
    pub duration: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationDef {
    #[serde(default)]
    pub looping: bool,
    #[serde(default)]
    pub next: Option<String>,
    pub frames: Vec<AnimationFrame>,
}

impl AnimationDef {
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn last_index(&self) -> usize {
        self.frames.len().saturating_sub(1)
    }

    /// Sum of every frame duration.
    pub fn total_duration(&self) -> f32 {
        self.frames.iter().map(|f| f.duration).sum()
    }
}

/// All animations of one actor kind.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationSet {
    kind: String,
    animations: FxHashMap<String, AnimationDef>,
}

impl AnimationSet {
    pub fn new(
        kind: impl Into<String>,
        animations: FxHashMap<String, AnimationDef>,
    ) -> Result<Self, LoadError> {
        let set = Self {
            kind: kind.into(),
            animations,
        };
        set.validate()?;
        Ok(set)
    }

    /// Parse a JSON object keyed by animation name.
    pub fn from_json(kind: impl Into<String>, text: &str) -> Result<Self, LoadError> {
        let kind = kind.into();
        let animations: FxHashMap<String, AnimationDef> = serde_json::from_str(text)
            .map_err(|e| LoadError::json(format!("animations for '{kind}'"), e))?;
        Self::new(kind, animations)
    }

    fn validate(&self) -> Result<(), LoadError> {
        let mut names: Vec<&String> = self.animations.keys().collect();
        names.sort();
        for name in names {
            let def = &self.animations[name];
            if def.frames.is_empty() {
                return Err(LoadError::EmptyAnimation {
                    kind: self.kind.clone(),
                    name: name.clone(),
                });
            }
            if let Some(next) = &def.next {
                if !self.animations.contains_key(next) {
                    return Err(LoadError::MissingAnimation {
                        kind: self.kind.clone(),
                        name: next.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn get(&self, name: &str) -> Option<&AnimationDef> {
        self.animations.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.animations.contains_key(name)
    }

    /// Lookup for names already checked by [`AnimationStore::require`].
    ///
    /// # Panics
    /// When `name` is not part of the set.
    pub fn def(&self, name: &str) -> &AnimationDef {
        match self.animations.get(name) {
            Some(def) => def,
            None => unreachable!("animation '{}/{}' was never validated", self.kind, name),
        }
    }
}

/// Central registry of animation sets keyed by actor kind.
#[derive(Resource, Debug, Clone, Default)]
pub struct AnimationStore {
    sets: FxHashMap<String, Arc<AnimationSet>>,
}

impl AnimationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, set: AnimationSet) {
        self.sets.insert(set.kind.clone(), Arc::new(set));
    }

    /// Load `<kind>.json` for every JSON file in `dir`.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, LoadError> {
        let dir = dir.as_ref();
        let mut paths: Vec<_> = std::fs::read_dir(dir)
            .map_err(|e| LoadError::io(dir, e))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut store = Self::new();
        for path in paths {
            let Some(kind) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let text = std::fs::read_to_string(&path).map_err(|e| LoadError::io(&path, e))?;
            store.insert(AnimationSet::from_json(kind, &text)?);
        }
        info!("Loaded {} animation catalogues from {:?}", store.sets.len(), dir);
        Ok(store)
    }

    pub fn get(&self, kind: &str) -> Option<Arc<AnimationSet>> {
        self.sets.get(kind).cloned()
    }

    /// Shared set for `kind`, verified to contain every name in `names`.
    pub fn require(&self, kind: &str, names: &[&str]) -> Result<Arc<AnimationSet>, LoadError> {
        let set = self
            .get(kind)
            .ok_or_else(|| LoadError::MissingCatalogue(kind.to_string()))?;
        if let Some(missing) = names.iter().find(|n| !set.contains(n)) {
            return Err(LoadError::MissingAnimation {
                kind: kind.to_string(),
                name: missing.to_string(),
            });
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOBLIN: &str = r#"{
        "idle": {"looping": true, "frames": [{"region": [0, 0, 80, 64], "duration": 100}]},
        "attack": {"frames": [
            {"region": [0, 64, 80, 64], "duration": 80},
            {"region": [80, 64, 80, 64], "duration": 80}
        ]},
        "windup": {"next": "attack", "frames": [{"region": [0, 128, 80, 64], "duration": 50}]}
    }"#;

    #[test]
    fn test_parse_catalogue() {
        let set = AnimationSet::from_json("goblin", GOBLIN).unwrap();
        let attack = set.def("attack");
        assert!(!attack.looping);
        assert_eq!(attack.frame_count(), 2);
        assert_eq!(attack.total_duration(), 160.0);
        assert_eq!(set.def("windup").next.as_deref(), Some("attack"));
        assert_eq!(set.def("idle").frames[0].region, Rect::new(0.0, 0.0, 80.0, 64.0));
    }

    #[test]
    fn test_dangling_successor_is_rejected() {
        let text = r#"{"a": {"next": "b", "frames": [{"region": [0,0,1,1], "duration": 1}]}}"#;
        assert!(matches!(
            AnimationSet::from_json("k", text),
            Err(LoadError::MissingAnimation { name, .. }) if name == "b"
        ));
    }

    #[test]
    fn test_empty_animation_is_rejected() {
        let text = r#"{"a": {"frames": []}}"#;
        assert!(matches!(
            AnimationSet::from_json("k", text),
            Err(LoadError::EmptyAnimation { .. })
        ));
    }

    #[test]
    fn test_require_reports_missing_names() {
        let mut store = AnimationStore::new();
        store.insert(AnimationSet::from_json("goblin", GOBLIN).unwrap());
        assert!(store.require("goblin", &["idle", "attack"]).is_ok());
        assert!(matches!(
            store.require("goblin", &["idle", "run"]),
            Err(LoadError::MissingAnimation { name, .. }) if name == "run"
        ));
        assert!(matches!(
            store.require("player", &[]),
            Err(LoadError::MissingCatalogue(_))
        ));
    }
}
