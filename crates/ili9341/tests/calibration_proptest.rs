//! Property-based tests for touch calibration.
//!
//! Run with: cargo test -p ili9341 --test calibration_proptest
#![allow(clippy::arithmetic_side_effects)]

use ili9341::touch::{interpolate, RawSample};
use ili9341::{Calibration, Orientation};
use proptest::prelude::*;

fn any_calibration() -> impl Strategy<Value = Calibration> {
    (0u16..2000, 0u16..2000, 1u16..2000, 1u16..2000).prop_map(|(x0, y0, dx, dy)| {
        Calibration::new(x0, y0, x0.saturating_add(dx), y0.saturating_add(dy))
    })
}

proptest! {
    /// Calibrated points never leave `[0, span]` on either axis, whatever the raw input.
    #[test]
    fn calibrated_point_stays_in_range(
        cal in any_calibration(),
        x in 0u16..=u16::MAX,
        y in 0u16..=u16::MAX,
    ) {
        for o in [Orientation::Portrait, Orientation::Landscape] {
            let size = o.screen_size();
            let (x_span, y_span) = if o.is_portrait() {
                (size.width, size.height)
            } else {
                (size.height, size.width)
            };
            let p = cal.to_screen(RawSample { x, y }, o);
            prop_assert!(p.x <= x_span, "{:?} -> {:?}", (x, y), p);
            prop_assert!(p.y <= y_span, "{:?} -> {:?}", (x, y), p);
        }
    }

    /// Raw input outside the calibrated range maps like the nearest bound.
    #[test]
    fn out_of_range_saturates(cal in any_calibration(), below in 0u16..100) {
        let o = Orientation::Portrait;
        let low = cal.to_screen(RawSample { x: cal.min_x.saturating_sub(below), y: cal.min_y }, o);
        let edge = cal.to_screen(RawSample { x: cal.min_x, y: cal.min_y }, o);
        prop_assert_eq!(low, edge);
    }

    /// Larger raw readings never map further from the origin edge.
    #[test]
    fn mapping_is_monotone_decreasing(cal in any_calibration(), a in 0u16..4096, b in 0u16..4096) {
        let o = Orientation::Portrait;
        let pa = cal.to_screen(RawSample { x: a, y: a }, o);
        let pb = cal.to_screen(RawSample { x: b, y: b }, o);
        if a <= b {
            prop_assert!(pa.x >= pb.x && pa.y >= pb.y);
        }
    }

    /// Interpolation hits both endpoints exactly.
    #[test]
    fn interpolate_hits_endpoints(x0 in -5000i32..5000, dx in 1i32..5000, y0 in -500i32..500, y1 in -500i32..500) {
        let x1 = x0 + dx;
        prop_assert_eq!(interpolate(x0, x0, x1, y0, y1), y0);
        prop_assert_eq!(interpolate(x1, x0, x1, y0, y1), y1);
    }
}
