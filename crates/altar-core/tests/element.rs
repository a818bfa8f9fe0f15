use std::sync::Arc;

use altar_core::{is_live, ElementRef, FakeElement, Rect, ScreenElement};

#[test]
fn fake_element_navigation_and_liveness() {
    let panel = FakeElement::new(1, Rect::new(0.0, 0.0, 100.0, 50.0)).into_ref();
    let button = FakeElement::new(2, Rect::new(10.0, 10.0, 20.0, 10.0))
        .with_text("Select")
        .into_ref();
    FakeElement::adopt(&panel, Arc::clone(&button));

    let children = panel.children();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].id(), 2);
    assert_eq!(button.parent().map(|p| p.id()), Some(1));
    assert!(is_live(button.as_ref()));

    panel.set_valid(false);
    assert!(!is_live(button.as_ref()), "orphaned by an invalid parent");

    panel.set_valid(true);
    button.set_visible(false);
    assert!(!is_live(button.as_ref()));
}

#[test]
fn degenerate_rects() {
    assert!(!Rect::new(0.0, 0.0, 1.0, 1.0).is_degenerate());
    assert!(Rect::new(0.0, 0.0, 0.0, 1.0).is_degenerate());
    assert!(Rect::new(0.0, 0.0, 5.0, -1.0).is_degenerate());
    assert!(Rect::new(f32::NAN, 0.0, 5.0, 5.0).is_degenerate());
    assert!(Rect::new(0.0, f32::INFINITY, 5.0, 5.0).is_degenerate());
}

#[test]
fn element_ref_is_shareable_across_threads() {
    let el: ElementRef = FakeElement::new(9, Rect::new(1.0, 2.0, 3.0, 4.0)).into_ref();
    let handle = std::thread::spawn({
        let el = Arc::clone(&el);
        move || el.rect()
    });
    assert_eq!(handle.join().ok(), Some(Rect::new(1.0, 2.0, 3.0, 4.0)));
}
