#![no_main]

use std::cell::Cell;
use std::rc::Rc;

use arbitrary::Arbitrary;
use filterkit_runtime::{FilterController, FilterMode, FilterValues};
use libfuzzer_sys::fuzz_target;
use web_time::{Duration, Instant};

#[derive(Debug, Arbitrary)]
enum Op {
    Edit { field: u8, text: String },
    Remove { field: u8 },
    Advance { ms: u16 },
    Submit,
    Cancel,
    Clear,
    Flush,
    Reinitialize { text: String },
}

#[derive(Debug, Arbitrary)]
struct Input {
    live: bool,
    debounce: bool,
    window_ms: u16,
    ops: Vec<Op>,
}

const FIELDS: [&str; 3] = ["keywords", "category", "city"];

fuzz_target!(|input: Input| {
    let changes = Rc::new(Cell::new(0usize));
    let sink = Rc::clone(&changes);
    let builder = if input.live {
        FilterController::builder(FilterMode::LiveEdit)
            .on_change(move |_| sink.set(sink.get() + 1))
    } else {
        FilterController::builder(FilterMode::ExplicitSubmit)
            .on_submit(|_| {})
            .on_cancel(|| {})
            .on_clear(|| {})
    };
    let Ok(mut controller) = builder
        .use_debounce(input.debounce)
        .debounce_window(Duration::from_millis(u64::from(input.window_ms)))
        .build()
    else {
        return;
    };

    let mut now = Instant::now();
    for op in input.ops {
        match op {
            Op::Edit { field, text } => {
                let name = FIELDS[usize::from(field) % FIELDS.len()];
                controller.apply_edit(name, text, now);
            }
            Op::Remove { field } => {
                controller.remove_field(FIELDS[usize::from(field) % FIELDS.len()], now);
            }
            Op::Advance { ms } => {
                now += Duration::from_millis(u64::from(ms));
                controller.tick(now);
            }
            Op::Submit => {
                assert_eq!(controller.submit().is_ok(), !input.live);
            }
            Op::Cancel => {
                if controller.cancel().is_ok() {
                    assert_eq!(controller.values(), controller.snapshot());
                }
            }
            Op::Clear => {
                if controller.clear().is_ok() {
                    assert!(controller.values().is_empty());
                }
            }
            Op::Flush => {
                controller.flush();
            }
            Op::Reinitialize { text } => {
                controller.reinitialize(FilterValues::new().with("keywords", text));
            }
        }

        assert_eq!(
            controller.is_dirty(),
            controller.values() != controller.snapshot(),
            "dirty must track snapshot divergence"
        );
        if let Some(deadline) = controller.next_deadline() {
            assert!(controller.is_dirty(), "pending notification on a clean form");
            assert!(deadline >= now);
        }
    }

    if !input.live {
        assert_eq!(changes.get(), 0, "explicit submit never notifies on_change");
    }
});
