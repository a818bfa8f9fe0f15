//! Deferred draw requests.
//!
//! The decision core never touches the renderer. It appends requests here and the host drains
//! the queue once per frame.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Winning side.
    pub const SUCCESS: Color = Color::rgb(0, 200, 83);
    /// Losing side.
    pub const DANGER: Color = Color::rgb(229, 57, 53);
    /// Ties, guards, and anything else that ends without a winner.
    pub const CAUTION: Color = Color::rgb(255, 193, 7);
    pub const TEXT: Color = Color::rgb(255, 255, 255);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TextRequest {
    pub text: String,
    pub position: Point,
    pub color: Color,
    pub size: f32,
    pub align: TextAlign,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameRequest {
    pub rect: Rect,
    pub color: Color,
    pub thickness: f32,
}

#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DrawQueue {
    texts: Vec<TextRequest>,
    frames: Vec<FrameRequest>,
}

impl DrawQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_text(&mut self, request: TextRequest) {
        self.texts.push(request);
    }

    pub fn text(
        &mut self,
        text: impl Into<String>,
        position: Point,
        color: Color,
        size: f32,
        align: TextAlign,
    ) {
        self.push_text(TextRequest {
            text: text.into(),
            position,
            color,
            size,
            align,
        });
    }

    pub fn frame(&mut self, rect: Rect, color: Color, thickness: f32) {
        self.frames.push(FrameRequest {
            rect,
            color,
            thickness,
        });
    }

    pub fn texts(&self) -> &[TextRequest] {
        &self.texts
    }

    pub fn frames(&self) -> &[FrameRequest] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty() && self.frames.is_empty()
    }

    /// Hands everything queued so far to the renderer and leaves the queue empty.
    pub fn drain(&mut self) -> (Vec<TextRequest>, Vec<FrameRequest>) {
        (
            core::mem::take(&mut self.texts),
            core::mem::take(&mut self.frames),
        )
    }

    pub fn clear(&mut self) {
        self.texts.clear();
        self.frames.clear();
    }
}
