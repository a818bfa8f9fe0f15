use core::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use crate::Rect;

/// Capability surface of a host UI element.
///
/// The decision core only ever asks an element whether it is still alive, where it is, what it
/// says, and who its relatives are. Each host API gets its own adapter; tests use
/// [`FakeElement`].
pub trait ScreenElement: Send + Sync + Debug {
    /// Stable identity for as long as the host keeps the element alive.
    fn id(&self) -> u64;
    fn is_valid(&self) -> bool;
    fn is_visible(&self) -> bool;
    fn rect(&self) -> Rect;
    fn text(&self) -> Option<String>;
    fn parent(&self) -> Option<ElementRef>;
    fn children(&self) -> Vec<ElementRef>;
}

pub type ElementRef = Arc<dyn ScreenElement>;

/// Valid, visible, and still attached to a valid parent (if it has one).
pub fn is_live(element: &dyn ScreenElement) -> bool {
    element.is_valid()
        && element.is_visible()
        && element.parent().map_or(true, |p| p.is_valid())
}

/// In-memory element. Validity and visibility can be flipped after construction so tests can
/// model an element disappearing between selection and click.
#[derive(Debug)]
pub struct FakeElement {
    id: u64,
    valid: AtomicBool,
    visible: AtomicBool,
    rect: Mutex<Rect>,
    text: Option<String>,
    parent: Mutex<Weak<FakeElement>>,
    children: Mutex<Vec<Arc<FakeElement>>>,
}

impl FakeElement {
    pub fn new(id: u64, rect: Rect) -> Self {
        Self {
            id,
            valid: AtomicBool::new(true),
            visible: AtomicBool::new(true),
            rect: Mutex::new(rect),
            text: None,
            parent: Mutex::new(Weak::new()),
            children: Mutex::new(Vec::new()),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn into_ref(self) -> Arc<FakeElement> {
        Arc::new(self)
    }

    /// Links `child` under `parent` in both directions.
    pub fn adopt(parent: &Arc<FakeElement>, child: Arc<FakeElement>) {
        *child.parent.lock().unwrap_or_else(PoisonError::into_inner) = Arc::downgrade(parent);
        parent
            .children
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(child);
    }

    pub fn set_valid(&self, valid: bool) {
        self.valid.store(valid, Ordering::SeqCst);
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
    }

    pub fn set_rect(&self, rect: Rect) {
        *self.rect.lock().unwrap_or_else(PoisonError::into_inner) = rect;
    }
}

impl ScreenElement for FakeElement {
    fn id(&self) -> u64 {
        self.id
    }

    fn is_valid(&self) -> bool {
        self.valid.load(Ordering::SeqCst)
    }

    fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    fn rect(&self) -> Rect {
        *self.rect.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn text(&self) -> Option<String> {
        self.text.clone()
    }

    fn parent(&self) -> Option<ElementRef> {
        let parent = self
            .parent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .upgrade()?;
        Some(parent as ElementRef)
    }

    fn children(&self) -> Vec<ElementRef> {
        self.children
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|c| Arc::clone(c) as ElementRef)
            .collect()
    }
}
