#![forbid(unsafe_code)]

//! Keyword search filter.
//!
//! [`KeywordFilter`] wires a single text field to a [`FilterController`] and
//! reports `(url_param, keyword)` pairs to the host. It comes in two
//! presentations:
//!
//! - **Popup**: the keyword input floats below a trigger button. Edits are
//!   batched; submit applies them, clear removes the filter, cancel discards
//!   them. Content placement is resolved against the viewport.
//! - **Plain**: the input sits inline (e.g. in a mobile filter panel) and
//!   every change is reported, optionally debounced.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use filterkit_widgets::{FilterSubmission, KeywordFilter, KeywordFilterConfig, Presentation};
//! use web_time::Instant;
//!
//! let submitted = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&submitted);
//! let config = KeywordFilterConfig::new("search", "keyword", "keywords", "Keyword")
//!     .presentation(Presentation::Popup);
//! let mut filter = KeywordFilter::new(config, move |s| sink.borrow_mut().push(s)).unwrap();
//!
//! filter.open();
//! filter.type_keyword("bike", Instant::now());
//! filter.submit().unwrap();
//!
//! assert_eq!(
//!     submitted.borrow()[0],
//!     FilterSubmission { url_param: "keywords".into(), value: Some("bike".into()) }
//! );
//! assert!(!filter.is_open());
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use filterkit_layout::{PlacementQuery, PositionStyle, TriggerGeometry, resolve_or_neutral};
use filterkit_runtime::{
    ConfigError, DEFAULT_DEBOUNCE_WINDOW_MS, EditOutcome, FilterController, FilterMode,
    FilterValues, InvalidStateError,
};
use tracing::debug;
use web_time::{Duration, Instant};

/// How the filter is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Presentation {
    /// Floating content opened from a trigger button; explicit submit.
    #[default]
    Popup,
    /// Inline content; changes apply as the user types.
    Plain,
}

/// What the host receives when the filter applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSubmission {
    /// Query parameter the host persists the keyword under.
    pub url_param: String,
    /// The keyword, or `None` when the filter was cleared.
    pub value: Option<String>,
}

/// Settings for a [`KeywordFilter`].
#[derive(Debug, Clone)]
pub struct KeywordFilterConfig {
    pub id: String,
    /// Form field name holding the keyword.
    pub name: String,
    pub url_param: String,
    pub label: String,
    /// Keyword currently applied by the host.
    pub initial_value: Option<String>,
    pub presentation: Presentation,
    /// Pixels between the trigger and the popup content.
    pub content_placement_offset: f64,
    /// Plain presentation only.
    pub use_debounce: bool,
    pub debounce_window: Duration,
}

impl KeywordFilterConfig {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        url_param: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url_param: url_param.into(),
            label: label.into(),
            initial_value: None,
            presentation: Presentation::default(),
            content_placement_offset: 0.0,
            use_debounce: false,
            debounce_window: Duration::from_millis(DEFAULT_DEBOUNCE_WINDOW_MS),
        }
    }

    #[must_use]
    pub fn presentation(mut self, presentation: Presentation) -> Self {
        self.presentation = presentation;
        self
    }

    #[must_use]
    pub fn initial_value(mut self, value: impl Into<String>) -> Self {
        self.initial_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn content_placement_offset(mut self, offset: f64) -> Self {
        self.content_placement_offset = offset;
        self
    }

    /// Debounce plain-presentation changes.
    #[must_use]
    pub fn debounced(mut self, window: Duration) -> Self {
        self.use_debounce = true;
        self.debounce_window = window;
        self
    }

    fn initial_values(&self) -> FilterValues {
        FilterValues::new().with(
            self.name.as_str(),
            self.initial_value.clone().unwrap_or_default(),
        )
    }
}

type SubmitSink = Rc<RefCell<dyn FnMut(FilterSubmission)>>;
type LabelFormatter = Box<dyn Fn(&str, &str) -> String>;

/// Keyword filter in popup or plain presentation.
pub struct KeywordFilter {
    config: KeywordFilterConfig,
    controller: FilterController,
    sink: SubmitSink,
    open: Rc<Cell<bool>>,
    selected_label: LabelFormatter,
}

impl fmt::Debug for KeywordFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeywordFilter")
            .field("config", &self.config)
            .field("controller", &self.controller)
            .field("open", &self.open.get())
            .finish()
    }
}

impl KeywordFilter {
    /// Build the filter and its controller. `on_submit` receives every
    /// applied or cleared keyword.
    pub fn new(
        config: KeywordFilterConfig,
        on_submit: impl FnMut(FilterSubmission) + 'static,
    ) -> Result<Self, ConfigError> {
        let sink: SubmitSink = Rc::new(RefCell::new(on_submit));
        let open = Rc::new(Cell::new(false));

        let controller = match config.presentation {
            Presentation::Popup => Self::popup_controller(&config, &sink, &open)?,
            Presentation::Plain => Self::plain_controller(&config, &sink)?,
        };

        Ok(Self {
            config,
            controller,
            sink,
            open,
            selected_label: Box::new(|label, keyword| format!("{label}: {keyword}")),
        })
    }

    fn popup_controller(
        config: &KeywordFilterConfig,
        sink: &SubmitSink,
        open: &Rc<Cell<bool>>,
    ) -> Result<FilterController, ConfigError> {
        let (submit_sink, clear_sink) = (Rc::clone(sink), Rc::clone(sink));
        let (submit_open, cancel_open, clear_open) =
            (Rc::clone(open), Rc::clone(open), Rc::clone(open));
        let name = config.name.clone();
        let (submit_param, clear_param) = (config.url_param.clone(), config.url_param.clone());

        FilterController::builder(FilterMode::ExplicitSubmit)
            .keep_dirty_on_reinitialize(true)
            .initial_values(config.initial_values())
            .on_submit(move |values| {
                let value = values.get(&name).map(ToString::to_string);
                (&mut *submit_sink.borrow_mut())(FilterSubmission {
                    url_param: submit_param.clone(),
                    value,
                });
                submit_open.set(false);
            })
            .on_cancel(move || cancel_open.set(false))
            .on_clear(move || {
                (&mut *clear_sink.borrow_mut())(FilterSubmission {
                    url_param: clear_param.clone(),
                    value: None,
                });
                clear_open.set(false);
            })
            .build()
    }

    fn plain_controller(
        config: &KeywordFilterConfig,
        sink: &SubmitSink,
    ) -> Result<FilterController, ConfigError> {
        let sink = Rc::clone(sink);
        let name = config.name.clone();
        let url_param = config.url_param.clone();

        FilterController::builder(FilterMode::LiveEdit)
            .use_debounce(config.use_debounce)
            .debounce_window(config.debounce_window)
            .initial_values(config.initial_values())
            .on_change(move |values| {
                (&mut *sink.borrow_mut())(FilterSubmission {
                    url_param: url_param.clone(),
                    value: values.get(&name).map(ToString::to_string),
                });
            })
            .build()
    }

    /// Replace the label shown when a keyword is applied.
    /// The formatter receives `(label, keyword)`.
    #[must_use]
    pub fn with_selected_label(mut self, f: impl Fn(&str, &str) -> String + 'static) -> Self {
        self.selected_label = Box::new(f);
        self
    }

    #[must_use]
    pub fn config(&self) -> &KeywordFilterConfig {
        &self.config
    }

    #[must_use]
    pub fn presentation(&self) -> Presentation {
        self.config.presentation
    }

    #[must_use]
    pub fn controller(&self) -> &FilterController {
        &self.controller
    }

    /// DOM-style id of the filter root for the current presentation.
    #[must_use]
    pub fn element_id(&self) -> String {
        match self.config.presentation {
            Presentation::Popup => format!("{}.popup", self.config.id),
            Presentation::Plain => format!("{}.plain", self.config.id),
        }
    }

    #[must_use]
    pub fn input_id(&self) -> String {
        format!("{}-input", self.config.id)
    }

    /// Whether the host currently applies a keyword.
    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.config
            .initial_value
            .as_deref()
            .is_some_and(|v| !v.is_empty())
    }

    /// Trigger/heading label.
    #[must_use]
    pub fn label(&self) -> String {
        match self.config.initial_value.as_deref() {
            Some(keyword) if !keyword.is_empty() => (self.selected_label)(&self.config.label, keyword),
            _ => self.config.label.clone(),
        }
    }

    /// Keyword currently in the input.
    #[must_use]
    pub fn keyword(&self) -> Option<&str> {
        self.controller
            .values()
            .get(&self.config.name)
            .and_then(|v| v.as_text())
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    pub fn open(&mut self) {
        if !self.open.replace(true) {
            debug!(filter = %self.config.id, "filter opened");
        }
    }

    pub fn close(&mut self) {
        if self.open.replace(false) {
            debug!(filter = %self.config.id, "filter closed");
        }
    }

    pub fn toggle(&mut self) {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    /// Forward a keystroke-level edit of the input.
    pub fn type_keyword(&mut self, text: &str, now: Instant) -> EditOutcome {
        self.controller
            .apply_edit(self.config.name.as_str(), text, now)
    }

    /// Drive the debounce timer (plain presentation).
    pub fn tick(&mut self, now: Instant) -> bool {
        self.controller.tick(now)
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.controller.next_deadline()
    }

    /// Apply the typed keyword (popup presentation).
    pub fn submit(&mut self) -> Result<(), InvalidStateError> {
        self.controller.submit()
    }

    /// Discard typed changes and close (popup presentation).
    pub fn cancel(&mut self) -> Result<(), InvalidStateError> {
        self.controller.cancel()
    }

    /// Remove the keyword filter.
    ///
    /// Popup: clears the form, reports `None` and closes. Plain: drops any
    /// pending change and reports `None` directly. Either way the filter is
    /// no longer selected.
    pub fn clear(&mut self) -> Result<(), InvalidStateError> {
        match self.config.presentation {
            Presentation::Popup => self.controller.clear()?,
            Presentation::Plain => {
                self.controller.cancel_pending();
                self.controller.reinitialize(FilterValues::new());
                (&mut *self.sink.borrow_mut())(FilterSubmission {
                    url_param: self.config.url_param.clone(),
                    value: None,
                });
            }
        }
        self.config.initial_value = None;
        Ok(())
    }

    /// Host feedback after it applied (or removed) a keyword.
    pub fn reinitialize(&mut self, initial_value: Option<String>) {
        self.config.initial_value = initial_value;
        let values = self.config.initial_values();
        self.controller.reinitialize(values);
    }

    /// Positioning for the popup content. Plain content flows inline and
    /// always gets an empty style.
    #[must_use]
    pub fn content_style(
        &self,
        trigger: Option<TriggerGeometry>,
        content_width: Option<f64>,
        viewport_width: f64,
    ) -> PositionStyle {
        if self.config.presentation == Presentation::Plain {
            return PositionStyle::default();
        }
        let query = PlacementQuery::measure(
            trigger,
            content_width,
            viewport_width,
            self.config.content_placement_offset,
        );
        resolve_or_neutral(query.as_ref()).style()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Log = Rc<RefCell<Vec<FilterSubmission>>>;

    fn filter(config: KeywordFilterConfig) -> (KeywordFilter, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let filter = KeywordFilter::new(config, move |s| sink.borrow_mut().push(s)).unwrap();
        (filter, log)
    }

    fn config() -> KeywordFilterConfig {
        KeywordFilterConfig::new("SearchFilters.keyword", "keyword", "keywords", "Keyword")
    }

    fn submission(value: Option<&str>) -> FilterSubmission {
        FilterSubmission {
            url_param: "keywords".into(),
            value: value.map(str::to_owned),
        }
    }

    #[test]
    fn ids_follow_presentation() {
        let (popup, _) = filter(config());
        assert_eq!(popup.element_id(), "SearchFilters.keyword.popup");
        assert_eq!(popup.input_id(), "SearchFilters.keyword-input");

        let (plain, _) = filter(config().presentation(Presentation::Plain));
        assert_eq!(plain.element_id(), "SearchFilters.keyword.plain");
    }

    #[test]
    fn label_reflects_selection() {
        let (unselected, _) = filter(config());
        assert!(!unselected.is_selected());
        assert_eq!(unselected.label(), "Keyword");

        let (selected, _) = filter(config().initial_value("bike"));
        assert!(selected.is_selected());
        assert_eq!(selected.label(), "Keyword: bike");

        let custom = selected.with_selected_label(|_, kw| format!("\u{201c}{kw}\u{201d}"));
        assert_eq!(custom.label(), "\u{201c}bike\u{201d}");

        let (empty, _) = filter(config().initial_value(""));
        assert!(!empty.is_selected());
        assert_eq!(empty.label(), "Keyword");
    }

    #[test]
    fn popup_submit_reports_keyword_and_closes() {
        let (mut f, log) = filter(config());
        f.open();
        assert!(f.is_open());

        f.type_keyword("bike", Instant::now());
        assert!(log.borrow().is_empty());
        f.submit().unwrap();

        assert_eq!(*log.borrow(), vec![submission(Some("bike"))]);
        assert!(!f.is_open());
    }

    #[test]
    fn popup_clear_reports_none() {
        let (mut f, log) = filter(config().initial_value("bike"));
        f.open();
        f.clear().unwrap();
        assert_eq!(*log.borrow(), vec![submission(None)]);
        assert!(!f.is_open());
        assert_eq!(f.keyword(), None);
    }

    #[test]
    fn popup_cancel_restores_keyword() {
        let (mut f, log) = filter(config().initial_value("bike"));
        f.open();
        f.type_keyword("boat", Instant::now());
        assert_eq!(f.keyword(), Some("boat"));

        f.cancel().unwrap();
        assert_eq!(f.keyword(), Some("bike"));
        assert!(!f.is_open());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn plain_reports_each_change() {
        let (mut f, log) = filter(config().presentation(Presentation::Plain));
        let t0 = Instant::now();
        assert_eq!(f.type_keyword("b", t0), EditOutcome::Notified);
        f.type_keyword("bi", t0);
        assert_eq!(
            *log.borrow(),
            vec![submission(Some("b")), submission(Some("bi"))]
        );
        assert!(f.submit().is_err());
    }

    #[test]
    fn plain_debounced_reports_final_keyword() {
        let window = Duration::from_millis(300);
        let (mut f, log) = filter(
            config()
                .presentation(Presentation::Plain)
                .debounced(window),
        );
        let t0 = Instant::now();
        f.type_keyword("b", t0);
        f.type_keyword("bike", t0 + Duration::from_millis(100));
        assert_eq!(f.next_deadline(), Some(t0 + Duration::from_millis(400)));

        assert!(!f.tick(t0 + Duration::from_millis(399)));
        assert!(f.tick(t0 + Duration::from_millis(400)));
        assert_eq!(*log.borrow(), vec![submission(Some("bike"))]);
    }

    #[test]
    fn plain_clear_drops_pending_and_reports_none() {
        let (mut f, log) = filter(
            config()
                .presentation(Presentation::Plain)
                .initial_value("bike")
                .debounced(Duration::from_millis(300)),
        );
        let t0 = Instant::now();
        f.type_keyword("boat", t0);
        f.clear().unwrap();

        assert!(!f.tick(t0 + Duration::from_secs(1)));
        assert_eq!(*log.borrow(), vec![submission(None)]);
        assert_eq!(f.keyword(), None);
    }

    #[test]
    fn clear_deselects_in_both_presentations() {
        for presentation in [Presentation::Popup, Presentation::Plain] {
            let (mut f, _) = filter(config().presentation(presentation).initial_value("bike"));
            assert_eq!(f.label(), "Keyword: bike");

            f.clear().unwrap();
            assert!(!f.is_selected());
            assert_eq!(f.label(), "Keyword");
        }
    }

    #[test]
    fn reinitialize_updates_selection() {
        let (mut f, _) = filter(config());
        f.reinitialize(Some("kayak".into()));
        assert!(f.is_selected());
        assert_eq!(f.keyword(), Some("kayak"));
        assert!(!f.controller().is_dirty());
    }

    #[test]
    fn popup_style_uses_offset() {
        let (f, _) = filter(config().content_placement_offset(12.0));
        let trigger = TriggerGeometry {
            right_edge: 900.0,
            width: 80.0,
        };

        let style = f.content_style(Some(trigger), Some(300.0), 1000.0);
        assert_eq!(style.right, Some(12.0));
        assert_eq!(style.left, None);

        assert!(f.content_style(None, Some(300.0), 1000.0).is_empty());
    }

    #[test]
    fn plain_style_is_empty() {
        let (f, _) = filter(config().presentation(Presentation::Plain));
        let trigger = TriggerGeometry {
            right_edge: 100.0,
            width: 80.0,
        };
        assert!(f.content_style(Some(trigger), Some(50.0), 1000.0).is_empty());
    }

    #[test]
    fn toggle_flips_open_state() {
        let (mut f, _) = filter(config());
        f.toggle();
        assert!(f.is_open());
        f.toggle();
        assert!(!f.is_open());
    }
}
