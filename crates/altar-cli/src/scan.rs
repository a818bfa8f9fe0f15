//! Two-panel scan fixtures.
//!
//! A fixture stands in for one frame of host UI: panel text, where each panel sits, and whether
//! its button is still clickable. Each panel becomes a [`FakeElement`] with its button as child.

use std::path::Path;
use std::sync::Arc;

use altar_core::{ElementRef, FakeElement, Rect};
use altar_decide::{AltarKind, AltarUnit, SidePanel};
use altar_mods::CachedMatcher;
use anyhow::{Context, Result};
use serde::Deserialize;

const BUTTON_HEIGHT: f32 = 24.0;

#[derive(Debug, Clone, Deserialize)]
pub struct ScanFixture {
    pub kind: AltarKind,
    pub top: PanelFixture,
    pub bottom: PanelFixture,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PanelFixture {
    pub text: String,
    pub rect: Rect,
    #[serde(default = "clickable")]
    pub button_valid: bool,
}

fn clickable() -> bool {
    true
}

impl ScanFixture {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scan from {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse scan from {}", path.display()))
    }

    /// Panel ids are 1 (top) and 3 (bottom); their buttons are 2 and 4.
    pub fn into_unit(self, matcher: &CachedMatcher) -> AltarUnit {
        let (top, top_button) = self.top.build(1, matcher);
        let (bottom, bottom_button) = self.bottom.build(3, matcher);
        AltarUnit::new(self.kind, top, bottom).with_buttons(Some(top_button), Some(bottom_button))
    }
}

impl PanelFixture {
    fn build(self, id: u64, matcher: &CachedMatcher) -> (SidePanel, ElementRef) {
        let panel = FakeElement::new(id, self.rect).with_text(self.text).into_ref();
        let button_rect = Rect::new(self.rect.x, self.rect.y, self.rect.width, BUTTON_HEIGHT);
        let button = FakeElement::new(id + 1, button_rect).into_ref();
        button.set_valid(self.button_valid);
        FakeElement::adopt(&panel, Arc::clone(&button));

        let side = SidePanel::from_element(panel as ElementRef, matcher);
        (side, button as ElementRef)
    }
}
