//! Property-based tests for rectangle clipping.
//!
//! Run with: cargo test -p ili9341 --test clip_proptest

use ili9341::display::{clip, clip_point};
use ili9341::{Orientation, Rect, ScreenSize};
use proptest::prelude::*;

fn any_orientation() -> impl Strategy<Value = Orientation> {
    prop_oneof![
        Just(Orientation::Portrait),
        Just(Orientation::Landscape),
        Just(Orientation::PortraitFlip),
        Just(Orientation::LandscapeFlip),
    ]
}

fn any_rect() -> impl Strategy<Value = Rect> {
    (0u16..400, 0u16..400, 0u16..=u16::MAX, 0u16..=u16::MAX)
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

proptest! {
    /// A clipped rectangle is non-empty and lies entirely on screen.
    #[test]
    fn clipped_rect_is_contained(rect in any_rect(), o in any_orientation()) {
        let size = o.screen_size();
        if let Some(c) = clip(rect, size) {
            prop_assert!(c.w > 0 && c.h > 0);
            prop_assert!(u32::from(c.x) + u32::from(c.w) <= u32::from(size.width));
            prop_assert!(u32::from(c.y) + u32::from(c.h) <= u32::from(size.height));
            prop_assert_eq!((c.x, c.y), (rect.x, rect.y), "origin never moves");
        }
    }

    /// Clipping is idempotent.
    #[test]
    fn clip_is_idempotent(rect in any_rect(), o in any_orientation()) {
        let size = o.screen_size();
        if let Some(c) = clip(rect, size) {
            prop_assert_eq!(clip(c, size), Some(c));
        }
    }

    /// Nothing survives when the origin is off screen or the area is zero.
    #[test]
    fn degenerate_rects_vanish(rect in any_rect()) {
        let size = ScreenSize::new(240, 320);
        let degenerate = rect.x >= 240 || rect.y >= 320 || rect.w == 0 || rect.h == 0;
        prop_assert_eq!(clip(rect, size).is_none(), degenerate);
    }

    /// A point survives iff it is strictly inside the screen.
    #[test]
    fn point_clip_uses_strict_bounds(x in 0u16..400, y in 0u16..400) {
        let size = ScreenSize::new(320, 240);
        prop_assert_eq!(clip_point(x, y, size).is_some(), x < 320 && y < 240);
    }
}
