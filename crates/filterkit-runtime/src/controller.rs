#![forbid(unsafe_code)]

//! Filter form controller.
//!
//! [`FilterController`] sits between raw field edits coming from the
//! rendering layer and the host that applies filters. It supports two
//! policies, fixed at construction:
//!
//! - **Live edit**: every edit that leaves the form dirty is reported through
//!   `on_change`, either immediately or after a trailing-edge debounce.
//! - **Explicit submit**: edits accumulate until the user submits, cancels
//!   or clears.
//!
//! # Invariants
//!
//! 1. The mode never changes after [`FilterControllerBuilder::build`].
//! 2. `on_change` fires only in live-edit mode, and only while `dirty`.
//! 3. `on_submit` fires only through [`FilterController::submit`].
//! 4. At most one debounced notification is pending; it carries the values
//!    current when it fires.
//! 5. After [`cancel`](FilterController::cancel), values equal the snapshot
//!    from the last submit (or construction/reinitialize) and `dirty` is
//!    false.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Missing callback for the mode | [`ConfigError`] from `build()` |
//! | `submit`/`cancel`/`clear` in live-edit | [`InvalidStateError`] |
//! | Edit that stores an identical value | No-op, [`EditOutcome::Idle`] |
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use web_time::{Duration, Instant};
//! use filterkit_runtime::{EditOutcome, FilterController, FilterMode};
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&seen);
//! let mut controller = FilterController::builder(FilterMode::LiveEdit)
//!     .use_debounce(true)
//!     .on_change(move |values| sink.borrow_mut().push(values.clone()))
//!     .build()
//!     .unwrap();
//!
//! let t0 = Instant::now();
//! let outcome = controller.apply_edit("keywords", "bike", t0);
//! assert!(matches!(outcome, EditOutcome::Scheduled { .. }));
//!
//! assert!(controller.tick(t0 + Duration::from_millis(600)));
//! assert_eq!(seen.borrow().len(), 1);
//! ```

use std::fmt;

use tracing::{debug, info_span, warn};
use web_time::{Duration, Instant};

use crate::config::{FilterConfig, FilterMode};
use crate::debounce::Debouncer;
use crate::error::{CallbackKind, ConfigError, InvalidStateError};
use crate::values::{FieldValue, FilterValues};

type ValuesCallback = Box<dyn FnMut(&FilterValues)>;
type ActionCallback = Box<dyn FnMut()>;

/// Host callbacks, shaped by mode so a live-edit controller cannot hold a
/// submit callback and vice versa.
enum Callbacks {
    Live {
        on_change: ValuesCallback,
    },
    Explicit {
        on_submit: ValuesCallback,
        on_cancel: ActionCallback,
        on_clear: ActionCallback,
    },
}

/// What an edit did to the notification pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Nothing to report: explicit-submit mode, an unchanged value, or a
    /// clean form with nothing pending.
    Idle,
    /// `on_change` was invoked synchronously.
    Notified,
    /// A debounced notification is pending until `deadline`.
    Scheduled { deadline: Instant },
    /// The form became clean and the pending notification was dropped.
    Cancelled,
}

/// Builder for [`FilterController`]. Validation happens in [`build`](Self::build).
pub struct FilterControllerBuilder {
    config: FilterConfig,
    initial_values: FilterValues,
    on_change: Option<ValuesCallback>,
    on_submit: Option<ValuesCallback>,
    on_cancel: Option<ActionCallback>,
    on_clear: Option<ActionCallback>,
}

impl FilterControllerBuilder {
    /// Start a builder for the given mode with default settings.
    #[must_use]
    pub fn new(mode: FilterMode) -> Self {
        Self::from_config(&FilterConfig {
            mode,
            ..FilterConfig::default()
        })
    }

    /// Start a builder from loaded configuration.
    #[must_use]
    pub fn from_config(config: &FilterConfig) -> Self {
        Self {
            config: config.clone(),
            initial_values: FilterValues::new(),
            on_change: None,
            on_submit: None,
            on_cancel: None,
            on_clear: None,
        }
    }

    /// Debounce live-edit change notifications.
    #[must_use]
    pub fn use_debounce(mut self, enabled: bool) -> Self {
        self.config.use_debounce = enabled;
        self
    }

    #[must_use]
    pub fn debounce_window(mut self, window: Duration) -> Self {
        self.config = self.config.with_debounce_window(window);
        self
    }

    #[must_use]
    pub fn keep_dirty_on_reinitialize(mut self, keep: bool) -> Self {
        self.config.keep_dirty_on_reinitialize = keep;
        self
    }

    /// Committed values at construction.
    #[must_use]
    pub fn initial_values(mut self, values: FilterValues) -> Self {
        self.initial_values = values;
        self
    }

    #[must_use]
    pub fn on_change(mut self, f: impl FnMut(&FilterValues) + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_submit(mut self, f: impl FnMut(&FilterValues) + 'static) -> Self {
        self.on_submit = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_cancel(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_cancel = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_clear(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_clear = Some(Box::new(f));
        self
    }

    /// Validate the callback set for the mode and build the controller.
    pub fn build(self) -> Result<FilterController, ConfigError> {
        let mode = self.config.mode;
        let callbacks = match mode {
            FilterMode::LiveEdit => match self.on_change {
                Some(on_change) => Callbacks::Live { on_change },
                None => {
                    return Err(ConfigError {
                        mode,
                        missing: vec![CallbackKind::Change],
                    });
                }
            },
            FilterMode::ExplicitSubmit => match (self.on_submit, self.on_cancel, self.on_clear) {
                (Some(on_submit), Some(on_cancel), Some(on_clear)) => Callbacks::Explicit {
                    on_submit,
                    on_cancel,
                    on_clear,
                },
                (on_submit, on_cancel, on_clear) => {
                    let missing = [
                        (on_submit.is_none(), CallbackKind::Submit),
                        (on_cancel.is_none(), CallbackKind::Cancel),
                        (on_clear.is_none(), CallbackKind::Clear),
                    ]
                    .into_iter()
                    .filter_map(|(is_missing, kind)| is_missing.then_some(kind))
                    .collect();
                    return Err(ConfigError { mode, missing });
                }
            },
        };

        let debouncer = self
            .config
            .debounces()
            .then(|| Debouncer::new(self.config.debounce_window()));

        debug!(
            mode = mode.as_str(),
            debounce = debouncer.is_some(),
            window_ms = self.config.debounce_window_ms,
            initial_fields = self.initial_values.len(),
            "filter controller built"
        );

        Ok(FilterController {
            config: self.config,
            values: self.initial_values.clone(),
            snapshot: self.initial_values,
            dirty: false,
            debouncer,
            callbacks,
        })
    }
}

/// Live-edit / explicit-submit lifecycle of one filter form.
pub struct FilterController {
    config: FilterConfig,
    values: FilterValues,
    snapshot: FilterValues,
    dirty: bool,
    /// Present only for debounced live-edit controllers.
    debouncer: Option<Debouncer>,
    callbacks: Callbacks,
}

impl fmt::Debug for FilterController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterController")
            .field("mode", &self.config.mode)
            .field("values", &self.values)
            .field("snapshot", &self.snapshot)
            .field("dirty", &self.dirty)
            .field("debouncer", &self.debouncer)
            .finish()
    }
}

impl FilterController {
    /// Start building a controller.
    #[must_use]
    pub fn builder(mode: FilterMode) -> FilterControllerBuilder {
        FilterControllerBuilder::new(mode)
    }

    #[must_use]
    pub fn mode(&self) -> FilterMode {
        self.config.mode
    }

    #[must_use]
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Current field values.
    #[must_use]
    pub fn values(&self) -> &FilterValues {
        &self.values
    }

    /// Last committed values.
    #[must_use]
    pub fn snapshot(&self) -> &FilterValues {
        &self.snapshot
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether a debounced notification is waiting to fire.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.debouncer.as_ref().is_some_and(Debouncer::is_pending)
    }

    /// When the host loop must call [`tick`](Self::tick) next.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.as_ref().and_then(Debouncer::deadline)
    }

    /// Set a field value. Empty values remove the field.
    pub fn apply_edit(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
        now: Instant,
    ) -> EditOutcome {
        let name = name.into();
        let changed = self.values.set(name.as_str(), value);
        self.after_edit(&name, changed, now)
    }

    /// Remove a field, as when an input is emptied.
    pub fn remove_field(&mut self, name: &str, now: Instant) -> EditOutcome {
        let changed = self.values.remove(name).is_some();
        self.after_edit(name, changed, now)
    }

    fn after_edit(&mut self, field: &str, changed: bool, now: Instant) -> EditOutcome {
        if !changed {
            return EditOutcome::Idle;
        }
        self.dirty = self.values != self.snapshot;

        if self.config.mode == FilterMode::ExplicitSubmit {
            return EditOutcome::Idle;
        }

        match self.debouncer.as_mut() {
            Some(debouncer) if self.dirty => {
                let deadline = debouncer.schedule(now);
                debug!(
                    field,
                    window_ms = debouncer.window().as_millis() as u64,
                    "change notification scheduled"
                );
                EditOutcome::Scheduled { deadline }
            }
            Some(debouncer) => {
                if debouncer.cancel() {
                    debug!(field, "form clean, pending change notification dropped");
                    EditOutcome::Cancelled
                } else {
                    EditOutcome::Idle
                }
            }
            None if self.dirty => {
                self.notify_change();
                EditOutcome::Notified
            }
            None => EditOutcome::Idle,
        }
    }

    /// Fire the debounced notification if its deadline has passed.
    ///
    /// Returns `true` if `on_change` was invoked.
    pub fn tick(&mut self, now: Instant) -> bool {
        let due = self
            .debouncer
            .as_mut()
            .is_some_and(|debouncer| debouncer.poll(now));
        if due && self.dirty {
            self.notify_change();
            return true;
        }
        false
    }

    /// Fire a pending notification now, regardless of its deadline.
    pub fn flush(&mut self) -> bool {
        let pending = self.debouncer.as_mut().is_some_and(Debouncer::cancel);
        if pending && self.dirty {
            self.notify_change();
            return true;
        }
        false
    }

    /// Drop a pending notification without firing it.
    pub fn cancel_pending(&mut self) -> bool {
        self.debouncer.as_mut().is_some_and(Debouncer::cancel)
    }

    /// Invoke `on_submit` with the current values and commit them.
    pub fn submit(&mut self) -> Result<(), InvalidStateError> {
        match &mut self.callbacks {
            Callbacks::Explicit { on_submit, .. } => {
                dispatch(self.config.mode, CallbackKind::Submit, self.values.len(), || {
                    on_submit(&self.values)
                });
            }
            Callbacks::Live { .. } => return Err(invalid(self.config.mode, "submit")),
        }
        self.snapshot = self.values.clone();
        self.dirty = false;
        Ok(())
    }

    /// Restore the last committed values and invoke `on_cancel`.
    pub fn cancel(&mut self) -> Result<(), InvalidStateError> {
        match &mut self.callbacks {
            Callbacks::Explicit { on_cancel, .. } => {
                self.values = self.snapshot.clone();
                self.dirty = false;
                dispatch(self.config.mode, CallbackKind::Cancel, self.values.len(), || {
                    on_cancel()
                });
                Ok(())
            }
            Callbacks::Live { .. } => Err(invalid(self.config.mode, "cancel")),
        }
    }

    /// Empty every field and invoke `on_clear`. Does not commit.
    pub fn clear(&mut self) -> Result<(), InvalidStateError> {
        match &mut self.callbacks {
            Callbacks::Explicit { on_clear, .. } => {
                self.values.clear();
                self.dirty = self.values != self.snapshot;
                dispatch(self.config.mode, CallbackKind::Clear, 0, || on_clear());
                Ok(())
            }
            Callbacks::Live { .. } => Err(invalid(self.config.mode, "clear")),
        }
    }

    /// Replace the committed snapshot with values fed back by the host.
    ///
    /// With `keep_dirty_on_reinitialize`, fields the user edited since the
    /// previous snapshot keep their edited value.
    pub fn reinitialize(&mut self, initial: FilterValues) {
        let next = if self.config.keep_dirty_on_reinitialize {
            let mut merged = initial.clone();
            for name in self.values.changed_fields(&self.snapshot) {
                match self.values.get(&name) {
                    Some(value) => {
                        merged.set(name.as_str(), value.clone());
                    }
                    None => {
                        merged.remove(&name);
                    }
                }
            }
            merged
        } else {
            initial.clone()
        };

        self.snapshot = initial;
        self.values = next;
        self.dirty = self.values != self.snapshot;

        if !self.dirty && self.cancel_pending() {
            debug!("reinitialized clean, pending change notification dropped");
        }
    }

    fn notify_change(&mut self) {
        if let Callbacks::Live { on_change } = &mut self.callbacks {
            dispatch(self.config.mode, CallbackKind::Change, self.values.len(), || {
                on_change(&self.values)
            });
        }
    }
}

/// Run a host callback inside a `filter.notify` span with its duration.
fn dispatch(mode: FilterMode, callback: CallbackKind, fields: usize, f: impl FnOnce()) {
    let start = Instant::now();
    let span = info_span!(
        "filter.notify",
        mode = mode.as_str(),
        callback = callback.as_str(),
        fields,
        duration_us = tracing::field::Empty
    );
    let _guard = span.enter();
    f();
    span.record("duration_us", start.elapsed().as_micros() as u64);
}

fn invalid(mode: FilterMode, operation: &'static str) -> InvalidStateError {
    warn!(operation, mode = mode.as_str(), "filter operation not available in mode");
    InvalidStateError { operation, mode }
}
