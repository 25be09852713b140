#![no_main]

use filterkit_layout::{Anchor, PlacementQuery, resolve};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (f64, f64, f64, f64, f64)| {
    let (trigger_right_edge, viewport_width, trigger_width, content_width, offset) = input;
    let query = PlacementQuery {
        trigger_right_edge,
        viewport_width,
        trigger_width,
        content_width,
        offset,
    };
    let result = resolve(&query);
    let style = result.style();

    let finite = [trigger_right_edge, viewport_width, trigger_width, content_width, offset]
        .iter()
        .all(|v| v.is_finite());
    if !finite {
        assert!(result.is_neutral(), "non-finite input must be neutral");
        assert!(style.is_empty());
        return;
    }

    // Offset lands on exactly one side, opposite the anchor.
    match result.anchor {
        Some(Anchor::Right) => assert!(style.left.is_some() && style.right.is_none()),
        Some(Anchor::Left) => assert!(style.right.is_some() && style.left.is_none()),
        None => panic!("finite input resolved to neutral"),
    }
    assert_eq!(result.min_width.is_some(), content_width < trigger_width);
});
