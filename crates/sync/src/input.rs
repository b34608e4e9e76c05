use serde::{Deserialize, Serialize};

/// Key or button transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyAction {
    Release,
    Press,
    Repeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardEvent {
    pub key: i32,
    pub scancode: i32,
    pub action: KeyAction,
    pub mods: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharEvent {
    pub character: u32,
    pub mods: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouseButtonEvent {
    pub button: i32,
    pub action: KeyAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MousePosEvent {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MouseScrollEvent {
    pub xoffset: f64,
    pub yoffset: f64,
}

/// The flushed, serializable contents of an [`InputEventBuffer`], shipped in
/// the frame snapshot and dispatched in FIFO order per event type on every
/// node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputBatch {
    pub keyboard: Vec<KeyboardEvent>,
    pub chars: Vec<CharEvent>,
    pub mouse_buttons: Vec<MouseButtonEvent>,
    pub mouse_positions: Vec<MousePosEvent>,
    pub mouse_scrolls: Vec<MouseScrollEvent>,
}

impl InputBatch {
    pub fn is_empty(&self) -> bool {
        self.keyboard.is_empty()
            && self.chars.is_empty()
            && self.mouse_buttons.is_empty()
            && self.mouse_positions.is_empty()
            && self.mouse_scrolls.is_empty()
    }
}

/// Per-type FIFO queues of input events, accumulated on the master between
/// frames and flushed into the snapshot at sync time.
///
/// Order within a type is preserved; interleaving across types is not (the
/// queues are separate).
#[derive(Debug, Clone, Default)]
pub struct InputEventBuffer {
    batch: InputBatch,
}

impl InputEventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_keyboard(&mut self, event: KeyboardEvent) {
        self.batch.keyboard.push(event);
    }

    pub fn push_char(&mut self, event: CharEvent) {
        self.batch.chars.push(event);
    }

    pub fn push_mouse_button(&mut self, event: MouseButtonEvent) {
        self.batch.mouse_buttons.push(event);
    }

    pub fn push_mouse_pos(&mut self, event: MousePosEvent) {
        self.batch.mouse_positions.push(event);
    }

    pub fn push_mouse_scroll(&mut self, event: MouseScrollEvent) {
        self.batch.mouse_scrolls.push(event);
    }

    /// Move the accumulated events out, leaving the buffer empty for the
    /// next frame.
    pub fn flush(&mut self) -> InputBatch {
        std::mem::take(&mut self.batch)
    }

    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }
}
