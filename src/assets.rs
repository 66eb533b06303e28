//! Sprite sheet metadata and animation lookup
//!
//! Metadata is the JSON that sits next to a sprite sheet image:
//!
//! ```json
//! { "idle": { "frames": 2, "sprites": [ {"x": 0, "y": 0, "w": 25, "h": 37}, ... ] } }
//! ```
//!
//! A sprite may carry a `mask` (rows of `#`/`.`) describing its solid pixels;
//! without one the whole frame rect is solid. Decoding the image itself is the
//! renderer's job.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::AssetError;
use crate::sim::mask::CollisionMask;
use crate::sim::player::Action;

/// One frame's source rect on the sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SpriteMeta {
    #[serde(flatten)]
    rect: FrameRect,
    #[serde(default)]
    mask: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ActionMeta {
    frames: usize,
    sprites: Vec<SpriteMeta>,
}

/// A resolved animation frame: sheet rect plus scaled collision mask
#[derive(Debug, Clone)]
pub struct SpriteFrame {
    pub rect: FrameRect,
    pub mask: Arc<CollisionMask>,
    /// `mask` mirrored, for frames drawn flipped
    pub mirrored: Arc<CollisionMask>,
}

impl SpriteFrame {
    fn new(rect: FrameRect, mask: CollisionMask) -> Self {
        let mirrored = Arc::new(mask.flipped_x());
        Self {
            rect,
            mask: Arc::new(mask),
            mirrored,
        }
    }

    /// Collision mask for the facing the frame is drawn with
    pub fn mask_facing(&self, facing_left: bool) -> &Arc<CollisionMask> {
        if facing_left { &self.mirrored } else { &self.mask }
    }
}

/// Sprite sheet: action name -> frames. The action set is fixed at load time.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    actions: BTreeMap<String, Vec<SpriteFrame>>,
}

impl SpriteSheet {
    /// Parse metadata JSON; frames are upscaled by `scale` (2 = scale2x)
    pub fn from_json(json: &str, scale: u32) -> Result<Self, AssetError> {
        let meta: BTreeMap<String, ActionMeta> = serde_json::from_str(json)?;
        let scale = scale.max(1);
        let mut actions = BTreeMap::new();

        for (name, action) in meta {
            if action.frames == 0 || action.sprites.is_empty() {
                return Err(AssetError::EmptyAction(name));
            }
            if action.frames != action.sprites.len() {
                return Err(AssetError::FrameCountMismatch {
                    action: name,
                    declared: action.frames,
                    listed: action.sprites.len(),
                });
            }

            let mut frames = Vec::with_capacity(action.frames);
            for (index, sprite) in action.sprites.into_iter().enumerate() {
                let rect = sprite.rect;
                let mask = match sprite.mask {
                    Some(rows) => {
                        let mask = CollisionMask::from_rows(&rows);
                        if mask.width() != rect.w || mask.height() != rect.h {
                            return Err(AssetError::MaskSizeMismatch {
                                action: name,
                                frame: index,
                                got_w: mask.width(),
                                got_h: mask.height(),
                                want_w: rect.w,
                                want_h: rect.h,
                            });
                        }
                        mask
                    }
                    None => CollisionMask::filled(rect.w, rect.h),
                };
                frames.push(SpriteFrame::new(rect, mask.scaled(scale)));
            }
            actions.insert(name, frames);
        }

        log::debug!(
            "Loaded sprite sheet with actions {:?}",
            actions.keys().collect::<Vec<_>>()
        );
        Ok(Self { actions })
    }

    /// Solid-rectangle sheet for headless runs and tests. Every action gets
    /// `frames` frames of `w`x`h` (before scaling).
    pub fn placeholder(w: u32, h: u32, frames: usize, scale: u32) -> Self {
        let scale = scale.max(1);
        let mask = Arc::new(CollisionMask::filled(w, h).scaled(scale));
        let actions = ["idle", "walk", "run", "jump", "death"]
            .iter()
            .enumerate()
            .map(|(row, name)| {
                let frames = (0..frames.max(1))
                    .map(|i| SpriteFrame {
                        rect: FrameRect {
                            x: i as u32 * w,
                            y: row as u32 * h,
                            w,
                            h,
                        },
                        mask: Arc::clone(&mask),
                        mirrored: Arc::clone(&mask),
                    })
                    .collect();
                (name.to_string(), frames)
            })
            .collect();
        Self { actions }
    }

    pub fn has_action(&self, action: &str) -> bool {
        self.actions.contains_key(action)
    }

    pub fn frame_count(&self, action: &str) -> Result<usize, AssetError> {
        self.actions
            .get(action)
            .map(Vec::len)
            .ok_or_else(|| AssetError::UnknownAction(action.to_string()))
    }

    /// Frame lookup; an index past the end clamps to the last frame
    pub fn frame(&self, action: &str, index: usize) -> Result<&SpriteFrame, AssetError> {
        let frames = self
            .actions
            .get(action)
            .ok_or_else(|| AssetError::UnknownAction(action.to_string()))?;
        Ok(&frames[index.min(frames.len() - 1)])
    }
}

/// The player's frames resolved per `Action`, so lookups cannot fail at tick time
#[derive(Debug, Clone)]
pub struct PlayerAnimations {
    frames: [Vec<SpriteFrame>; Action::COUNT],
}

impl PlayerAnimations {
    /// Resolve every player action against the sheet. Missing actions are a
    /// fatal configuration error.
    pub fn from_sheet(sheet: &SpriteSheet) -> Result<Self, AssetError> {
        let resolve = |action: Action| -> Result<Vec<SpriteFrame>, AssetError> {
            let name = action
                .sheet_names()
                .iter()
                .find(|n| sheet.has_action(n))
                .ok_or_else(|| AssetError::UnknownAction(action.sheet_names()[0].to_string()))?;
            let count = sheet.frame_count(name)?;
            (0..count).map(|i| sheet.frame(name, i).cloned()).collect()
        };
        Ok(Self {
            frames: [
                resolve(Action::Idle)?,
                resolve(Action::Walk)?,
                resolve(Action::Jump)?,
                resolve(Action::Death)?,
            ],
        })
    }

    pub fn frame_count(&self, action: Action) -> usize {
        self.frames[action as usize].len()
    }

    pub fn frame(&self, action: Action, index: usize) -> &SpriteFrame {
        let frames = &self.frames[action as usize];
        &frames[index.min(frames.len() - 1)]
    }
}
