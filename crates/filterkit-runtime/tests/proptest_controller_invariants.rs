//! Property-based invariant tests for the filter controller.
//!
//! ## Invariants
//!
//! 1. Live edit without debounce: one `on_change` per value-changing edit
//!    that leaves the form dirty, carrying the latest values
//! 2. Debounce: a burst inside the window produces exactly one `on_change`
//!    with the burst's final values
//! 3. Cancel restores the last submitted snapshot and clears `dirty`
//! 4. Dirty is exactly "values differ from snapshot"

use std::cell::RefCell;
use std::rc::Rc;

use filterkit_runtime::{FilterController, FilterMode, FilterValues};
use proptest::prelude::*;
use web_time::{Duration, Instant};

// ── Strategies ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Edit(String, String),
    Submit,
    Cancel,
    Clear,
}

fn arb_field() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["keywords", "category", "city"]).prop_map(str::to_owned)
}

fn arb_text() -> impl Strategy<Value = String> {
    // Includes the empty string, which removes the field.
    prop::string::string_regex("[a-c]{0,3}").unwrap()
}

fn arb_edit() -> impl Strategy<Value = (String, String)> {
    (arb_field(), arb_text())
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => arb_edit().prop_map(|(f, v)| Op::Edit(f, v)),
        1 => Just(Op::Submit),
        1 => Just(Op::Cancel),
        1 => Just(Op::Clear),
    ]
}

type Changes = Rc<RefCell<Vec<FilterValues>>>;

fn live_controller(debounce: bool, window: Duration) -> (FilterController, Changes) {
    let changes: Changes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);
    let controller = FilterController::builder(FilterMode::LiveEdit)
        .use_debounce(debounce)
        .debounce_window(window)
        .on_change(move |v| sink.borrow_mut().push(v.clone()))
        .build()
        .unwrap();
    (controller, changes)
}

// ── 1. Live edit without debounce ─────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn live_edit_notifies_per_dirty_change(edits in prop::collection::vec(arb_edit(), 1..40)) {
        let (mut controller, changes) = live_controller(false, Duration::ZERO);
        let now = Instant::now();

        let mut expected = Vec::new();
        let mut model = FilterValues::new();
        for (field, text) in &edits {
            let changed = model.set(field.as_str(), text.as_str());
            controller.apply_edit(field.as_str(), text.as_str(), now);
            if changed && model != FilterValues::new() {
                expected.push(model.clone());
            }
            prop_assert_eq!(controller.values(), &model);
        }

        prop_assert_eq!(&*changes.borrow(), &expected);
    }
}

// ── 2. Debounce coalescing ────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn burst_within_window_fires_once(
        texts in prop::collection::vec("[a-z]{1,6}", 1..20),
        gap_ms in 0u64..100,
        window_ms in 200u64..1000,
    ) {
        // Distinct, non-empty values so every edit changes the form.
        let texts: Vec<String> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| format!("{t}{i}"))
            .collect();
        let window = Duration::from_millis(window_ms);
        let (mut controller, changes) = live_controller(true, window);
        let t0 = Instant::now();

        let mut last_edit = t0;
        for (i, text) in texts.iter().enumerate() {
            last_edit = t0 + Duration::from_millis(gap_ms * i as u64);
            controller.apply_edit("keywords", text.as_str(), last_edit);
            // Ticking mid-burst never fires: each gap is shorter than the window.
            prop_assert!(!controller.tick(last_edit));
        }

        prop_assert!(!controller.tick(last_edit + window - Duration::from_millis(1)));
        prop_assert!(changes.borrow().is_empty());

        prop_assert!(controller.tick(last_edit + window));
        prop_assert!(!controller.tick(last_edit + window * 3));

        let changes = changes.borrow();
        prop_assert_eq!(changes.len(), 1);
        let last = texts.last().unwrap();
        prop_assert_eq!(&changes[0], &FilterValues::new().with("keywords", last.as_str()));
    }
}

// ── 3 & 4. Explicit submit snapshot ───────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn cancel_restores_last_submit(ops in prop::collection::vec(arb_op(), 1..50)) {
        let initial = FilterValues::new().with("keywords", "boat");
        let submits: Changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&submits);
        let mut controller = FilterController::builder(FilterMode::ExplicitSubmit)
            .initial_values(initial.clone())
            .on_submit(move |v| sink.borrow_mut().push(v.clone()))
            .on_cancel(|| {})
            .on_clear(|| {})
            .build()
            .unwrap();
        let now = Instant::now();

        let mut committed = initial;
        for op in &ops {
            match op {
                Op::Edit(field, text) => {
                    controller.apply_edit(field.as_str(), text.as_str(), now);
                }
                Op::Submit => {
                    controller.submit().unwrap();
                    committed = controller.values().clone();
                }
                Op::Cancel => {
                    controller.cancel().unwrap();
                    prop_assert_eq!(controller.values(), &committed);
                    prop_assert!(!controller.is_dirty());
                }
                Op::Clear => {
                    controller.clear().unwrap();
                    prop_assert!(controller.values().is_empty());
                }
            }
            prop_assert_eq!(controller.snapshot(), &committed);
            prop_assert_eq!(controller.is_dirty(), controller.values() != &committed);
        }

        let submit_count = ops.iter().filter(|op| matches!(op, Op::Submit)).count();
        prop_assert_eq!(submits.borrow().len(), submit_count);
    }
}
