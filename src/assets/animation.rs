//! Frame-strip animations
//!
//! An animation is a vertical strip of equally sized frames in one texture.
//! Texture decoding is the host's business; this module only tracks which
//! frame is current and which part of the texture it occupies.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_ANIMATION;
use crate::error::{LevelError, Result};
use crate::geom::Rect;

/// How playback behaves after the last frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Playback {
    /// Never drawn, never finishes on its own
    #[default]
    None,
    /// Wraps back to the first frame
    Loop,
    /// Stops on the last frame and reports finished
    Once,
}

impl TryFrom<u32> for Playback {
    type Error = String;

    fn try_from(value: u32) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Playback::None),
            1 => Ok(Playback::Loop),
            2 => Ok(Playback::Once),
            other => Err(format!("unknown playback type {other}")),
        }
    }
}

impl From<Playback> for u32 {
    fn from(value: Playback) -> Self {
        match value {
            Playback::None => 0,
            Playback::Loop => 1,
            Playback::Once => 2,
        }
    }
}

fn one() -> u32 {
    1
}

/// On-disk animation descriptor (`data/animation/<id>.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationDesc {
    /// Texture path relative to the resource root
    pub path: String,
    /// Frame width; 0 means "same as the texture", which the host resolves
    #[serde(default)]
    pub frame_width: u32,
    pub frame_height: u32,
    /// Seconds per frame
    pub frame_duration: f64,
    #[serde(default = "one")]
    pub frame_count: u32,
    #[serde(rename = "type")]
    pub playback: Playback,
}

/// Playback state for one animation instance
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    id: String,
    path: String,
    frame_width: u32,
    frame_height: u32,
    frame_duration: f64,
    frame_count: u32,
    playback: Playback,
    keyframe: f64,
}

impl Animation {
    pub fn from_desc(id: &str, desc: &AnimationDesc) -> Self {
        Self {
            id: id.to_string(),
            path: desc.path.clone(),
            frame_width: desc.frame_width,
            frame_height: desc.frame_height,
            frame_duration: desc.frame_duration,
            frame_count: desc.frame_count.max(1),
            playback: desc.playback,
            keyframe: 0.0,
        }
    }

    /// The fallback animation: no texture, never drawn
    pub fn placeholder() -> Self {
        Self {
            id: DEFAULT_ANIMATION.to_string(),
            path: String::new(),
            frame_width: 0,
            frame_height: 0,
            frame_duration: 0.0,
            frame_count: 1,
            playback: Playback::None,
            keyframe: 0.0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn playback(&self) -> Playback {
        self.playback
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Advance playback by `dt` seconds
    pub fn advance(&mut self, dt: f64) {
        if self.keyframe >= self.frame_count as f64 {
            match self.playback {
                Playback::Loop => {
                    self.keyframe = 0.0;
                    return;
                }
                Playback::None | Playback::Once => return,
            }
        }
        if self.frame_duration > 0.0 {
            self.keyframe += dt / self.frame_duration;
        } else {
            // No frame timing: runs to the end in a single step
            self.keyframe = self.frame_count as f64;
        }
    }

    /// Index of the frame on screen
    pub fn current_frame(&self) -> u32 {
        (self.keyframe.floor() as u32).min(self.frame_count - 1)
    }

    /// Region of the texture holding the current frame
    pub fn frame_rect(&self) -> Rect {
        Rect::new(
            0.0,
            self.current_frame() as f64 * self.frame_height as f64,
            self.frame_width as f64,
            self.frame_height as f64,
        )
    }

    pub fn frame_size(&self) -> DVec2 {
        DVec2::new(self.frame_width as f64, self.frame_height as f64)
    }

    /// Playback has run past the last frame
    pub fn is_finished(&self) -> bool {
        self.keyframe >= self.frame_count as f64
    }

    pub fn reset(&mut self) {
        self.keyframe = 0.0;
    }
}

/// Named animation descriptors; hands out fresh instances by id
#[derive(Debug, Clone, Default)]
pub struct AnimationLibrary {
    descs: HashMap<String, AnimationDesc>,
}

impl AnimationLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.json` descriptor in `dir`; the file stem is the id
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut library = Self::new();
        let entries = fs::read_dir(dir).map_err(|e| LevelError::io(dir, e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| LevelError::io(dir, e))?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in paths {
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let text = fs::read_to_string(&path).map_err(|e| LevelError::io(&path, e))?;
            let desc: AnimationDesc = serde_json::from_str(&text)?;
            library.insert(id, desc)?;
        }

        log::info!("Loaded {} animations from {}", library.len(), dir.display());
        Ok(library)
    }

    /// Register a descriptor under `id`
    pub fn insert(&mut self, id: &str, desc: AnimationDesc) -> Result<()> {
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(LevelError::InvalidAnimationId(id.to_string()));
        }
        if self.descs.contains_key(id) {
            return Err(LevelError::DuplicateAnimation(id.to_string()));
        }
        log::debug!("Registered animation {id}");
        self.descs.insert(id.to_string(), desc);
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.descs.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.descs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descs.is_empty()
    }

    /// Sorted ids, for editor pickers
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.descs.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// A fresh instance of `id`, or of `"default"` when `id` is unknown
    pub fn get(&self, id: &str) -> Animation {
        if let Some(desc) = self.descs.get(id) {
            return Animation::from_desc(id, desc);
        }
        if id != DEFAULT_ANIMATION {
            log::warn!("Unknown animation {id}, using default");
        }
        match self.descs.get(DEFAULT_ANIMATION) {
            Some(desc) => Animation::from_desc(DEFAULT_ANIMATION, desc),
            None => Animation::placeholder(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn desc(frames: u32, playback: Playback) -> AnimationDesc {
        AnimationDesc {
            path: "player/fall.png".into(),
            frame_width: 32,
            frame_height: 32,
            frame_duration: 0.1,
            frame_count: frames,
            playback,
        }
    }

    #[test]
    fn test_once_finishes_and_holds() {
        let mut anim = Animation::from_desc("fall", &desc(3, Playback::Once));
        for _ in 0..3 {
            assert!(!anim.is_finished());
            anim.advance(0.1);
        }
        assert!(anim.is_finished());
        anim.advance(0.1);
        assert_eq!(anim.current_frame(), 2);
        anim.reset();
        assert!(!anim.is_finished());
        assert_eq!(anim.current_frame(), 0);
    }

    #[test]
    fn test_loop_wraps() {
        let mut anim = Animation::from_desc("walk", &desc(2, Playback::Loop));
        anim.advance(0.15);
        assert_eq!(anim.current_frame(), 1);
        assert_eq!(anim.frame_rect(), Rect::new(0.0, 32.0, 32.0, 32.0));
        anim.advance(0.1);
        anim.advance(0.01);
        assert_eq!(anim.current_frame(), 0);
    }

    #[test]
    fn test_untimed_animation_finishes_in_one_step() {
        let mut anim = Animation::placeholder();
        assert!(!anim.is_finished());
        anim.advance(SIM_DT);
        assert!(anim.is_finished());
        assert_eq!(anim.current_frame(), 0);

        let mut looped = Animation::from_desc(
            "flat",
            &AnimationDesc {
                frame_duration: 0.0,
                ..desc(3, Playback::Loop)
            },
        );
        looped.advance(SIM_DT);
        assert!(looped.is_finished());
        looped.advance(SIM_DT);
        assert_eq!(looped.current_frame(), 0);
    }

    #[test]
    fn test_library_falls_back_to_default() {
        let library = AnimationLibrary::new();
        let anim = library.get("missing");
        assert_eq!(anim.id(), DEFAULT_ANIMATION);
        assert_eq!(anim.playback(), Playback::None);
    }

    #[test]
    fn test_library_rejects_bad_ids() {
        let mut library = AnimationLibrary::new();
        assert!(matches!(
            library.insert("bad id", desc(1, Playback::Loop)),
            Err(LevelError::InvalidAnimationId(_))
        ));
        assert!(matches!(
            library.insert("", desc(1, Playback::Loop)),
            Err(LevelError::InvalidAnimationId(_))
        ));
        library.insert("ok_1", desc(1, Playback::Loop)).unwrap();
        assert!(matches!(
            library.insert("ok_1", desc(1, Playback::Loop)),
            Err(LevelError::DuplicateAnimation(_))
        ));
    }

    #[test]
    fn test_descriptor_json() {
        let d: AnimationDesc = serde_json::from_str(
            r#"{"path": "a.png", "frame_height": 16, "frame_duration": 0.2, "type": 2}"#,
        )
        .unwrap();
        assert_eq!(d.playback, Playback::Once);
        assert_eq!(d.frame_count, 1);
        assert!(serde_json::from_str::<AnimationDesc>(
            r#"{"path": "a.png", "frame_height": 16, "frame_duration": 0.2, "type": 9}"#
        )
        .is_err());
    }

    #[test]
    fn test_load_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("torch.json"),
            r#"{"path": "torch.png", "frame_height": 8, "frame_duration": 0.1, "type": 1, "frame_count": 4}"#,
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let library = AnimationLibrary::load_dir(dir.path()).unwrap();
        assert_eq!(library.ids(), vec!["torch"]);
        assert_eq!(library.get("torch").frame_count(), 4);
    }

    #[test]
    fn test_load_dir_rejects_malformed() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.json"), r#"{"path": 3}"#).unwrap();
        assert!(matches!(
            AnimationLibrary::load_dir(dir.path()),
            Err(LevelError::Json(_))
        ));
    }
}
