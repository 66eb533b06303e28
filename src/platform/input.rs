//! Input events, key bindings and per-tick input assembly

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::sim::{MoveIntent, TickInput};

/// Physical keys the game cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Space,
    Enter,
    Escape,
    P,
    R,
    A,
    D,
    W,
}

/// One polled event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Window closed / terminal interrupted
    Quit,
    KeyDown(Key),
    KeyUp(Key),
}

/// Source of input events, polled once per frame
pub trait InputSource {
    fn poll(&mut self) -> Vec<InputEvent>;
}

/// Which keys drive which command. Several keys may share a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub move_left: Vec<Key>,
    pub move_right: Vec<Key>,
    pub jump: Vec<Key>,
    pub pause: Vec<Key>,
    pub restart: Vec<Key>,
    pub quit: Vec<Key>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: vec![Key::Left, Key::A],
            move_right: vec![Key::Right, Key::D],
            jump: vec![Key::Space, Key::Up, Key::W],
            pause: vec![Key::P],
            restart: vec![Key::Enter, Key::R],
            quit: vec![Key::Escape],
        }
    }
}

/// Tracks held keys between polls and produces one `TickInput` per frame.
///
/// Movement is level-triggered (held keys); jump, pause and restart are
/// edge-triggered so holding a key does not repeat the command.
#[derive(Debug, Clone, Default)]
pub struct Controls {
    bindings: KeyBindings,
    held: HashSet<Key>,
    /// One-shot flags collected since the last `take_tick_input`
    jump: bool,
    pause: bool,
    restart: bool,
    quit: bool,
    /// Demo mode: the autopilot drives movement
    pub idle_mode: bool,
}

impl Controls {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            ..Default::default()
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    fn any_held(&self, keys: &[Key]) -> bool {
        keys.iter().any(|k| self.held.contains(k))
    }

    /// Fold one event into the held set and one-shot flags
    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::Quit => self.quit = true,
            InputEvent::KeyDown(key) => {
                // Key repeat arrives as repeated KeyDown; only the first is an edge
                if !self.held.insert(key) {
                    return;
                }
                let b = &self.bindings;
                if b.jump.contains(&key) {
                    self.jump = true;
                }
                if b.pause.contains(&key) {
                    self.pause = true;
                }
                if b.restart.contains(&key) {
                    self.restart = true;
                }
                if b.quit.contains(&key) {
                    self.quit = true;
                }
            }
            InputEvent::KeyUp(key) => {
                self.held.remove(&key);
            }
        }
    }

    pub fn handle_all(&mut self, events: impl IntoIterator<Item = InputEvent>) {
        for event in events {
            self.handle(event);
        }
    }

    /// Build this frame's input and clear the one-shot flags
    pub fn take_tick_input(&mut self) -> TickInput {
        let input = TickInput {
            intent: MoveIntent {
                left: self.any_held(&self.bindings.move_left),
                right: self.any_held(&self.bindings.move_right),
                jump: self.jump,
            },
            pause: self.pause,
            restart: self.restart,
            idle_mode: self.idle_mode,
        };
        self.jump = false;
        self.pause = false;
        self.restart = false;
        input
    }
}

/// Replays a fixed list of per-frame event batches, then reports nothing
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<Vec<InputEvent>>,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = Vec<InputEvent>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// Queue `events` after `idle_frames` empty frames
    pub fn then(mut self, idle_frames: usize, events: Vec<InputEvent>) -> Self {
        self.frames.extend(std::iter::repeat_n(Vec::new(), idle_frames));
        self.frames.push_back(events);
        self
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Vec<InputEvent> {
        self.frames.pop_front().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_keys_drive_movement() {
        let mut controls = Controls::new(KeyBindings::default());
        controls.handle(InputEvent::KeyDown(Key::Right));
        let input = controls.take_tick_input();
        assert!(input.intent.right && !input.intent.left);

        // Still held next frame
        assert!(controls.take_tick_input().intent.right);

        controls.handle(InputEvent::KeyUp(Key::Right));
        assert!(!controls.take_tick_input().intent.right);
    }

    #[test]
    fn test_both_directions_cancel() {
        let mut controls = Controls::new(KeyBindings::default());
        controls.handle_all([InputEvent::KeyDown(Key::Left), InputEvent::KeyDown(Key::D)]);
        assert_eq!(controls.take_tick_input().intent.direction(), 0);
    }

    #[test]
    fn test_jump_and_pause_are_edges() {
        let mut controls = Controls::new(KeyBindings::default());
        controls.handle(InputEvent::KeyDown(Key::Space));
        controls.handle(InputEvent::KeyDown(Key::P));
        let input = controls.take_tick_input();
        assert!(input.intent.jump && input.pause);

        // Auto-repeat does not re-trigger
        controls.handle(InputEvent::KeyDown(Key::Space));
        controls.handle(InputEvent::KeyDown(Key::P));
        let input = controls.take_tick_input();
        assert!(!input.intent.jump && !input.pause);

        controls.handle(InputEvent::KeyUp(Key::P));
        controls.handle(InputEvent::KeyDown(Key::P));
        assert!(controls.take_tick_input().pause);
    }

    #[test]
    fn test_quit_from_event_or_key() {
        let mut controls = Controls::new(KeyBindings::default());
        assert!(!controls.quit_requested());
        controls.handle(InputEvent::KeyDown(Key::Escape));
        assert!(controls.quit_requested());

        let mut controls = Controls::new(KeyBindings::default());
        controls.handle(InputEvent::Quit);
        assert!(controls.quit_requested());
    }

    #[test]
    fn test_scripted_input() {
        let mut script = ScriptedInput::default()
            .then(2, vec![InputEvent::KeyDown(Key::Space)])
            .then(0, vec![InputEvent::Quit]);
        assert!(script.poll().is_empty());
        assert!(script.poll().is_empty());
        assert_eq!(script.poll(), vec![InputEvent::KeyDown(Key::Space)]);
        assert_eq!(script.poll(), vec![InputEvent::Quit]);
        assert!(script.poll().is_empty());
    }

    #[test]
    fn test_bindings_from_json() {
        let bindings: KeyBindings = serde_json::from_str(r#"{ "jump": ["W"] }"#).unwrap();
        assert_eq!(bindings.jump, vec![Key::W]);
        assert_eq!(bindings.pause, vec![Key::P]);
    }
}
