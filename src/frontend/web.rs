//! Browser bindings for the platform-independent widgets in `crate::ui`.

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
    time::Duration,
};

use js_sys::Function;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{window, MediaQueryList, MediaQueryListEvent, Storage};
use yew::Callback;

use crate::ui::{
    motion::SmoothScroll,
    schedule::Timed,
    scroll::{ScrollFlags, ScrollTracker},
    theme::{
        PreferenceStore, PresentationSink, ResolvedTheme, StorageError, ThemeController,
        ThemePreference,
    },
};

const COLOR_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";
const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

fn local_storage() -> Option<Storage> {
    window()?.local_storage().ok().flatten()
}

fn media_query(query: &str) -> Option<MediaQueryList> {
    window()?.match_media(query).ok().flatten()
}

pub fn prefers_reduced_motion() -> bool {
    media_query(REDUCED_MOTION_QUERY)
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

pub fn scroll_offset() -> f64 {
    window().and_then(|w| w.scroll_y().ok()).unwrap_or(0.0)
}

/// `window.localStorage`.
pub struct LocalStore;

impl PreferenceStore for LocalStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let storage = local_storage().ok_or(StorageError::Unavailable)?;
        storage
            .get_item(key)
            .map_err(|error| StorageError::Rejected(format!("{error:?}")))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = local_storage().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|error| StorageError::Rejected(format!("{error:?}")))
    }
}

pub type WebThemeController = ThemeController<LocalStore, DocumentSink>;

/// Marker classes on `<html>` and `<body>`, plus the color-scheme listener.
pub struct DocumentSink {
    controller: Weak<RefCell<WebThemeController>>,
    listener: Option<(MediaQueryList, Closure<dyn FnMut(MediaQueryListEvent)>)>,
}

impl DocumentSink {
    fn new(controller: Weak<RefCell<WebThemeController>>) -> Self {
        Self {
            controller,
            listener: None,
        }
    }
}

impl PresentationSink for DocumentSink {
    fn apply_theme(&mut self, theme: ResolvedTheme) {
        let Some(document) = window().and_then(|w| w.document()) else {
            return;
        };
        let [light, dark] = ResolvedTheme::MARKERS;
        let targets = [
            document.document_element(),
            document.body().map(Into::into),
        ];

        for element in targets.into_iter().flatten() {
            let classes = element.class_list();
            let _ = classes.remove_2(light, dark);
            let _ = classes.add_1(theme.as_str());
        }
    }

    fn system_prefers_dark(&self) -> Option<bool> {
        media_query(COLOR_SCHEME_QUERY).map(|mq| mq.matches())
    }

    fn watch_system_preference(&mut self, active: bool) {
        if let Some((query, callback)) = self.listener.take() {
            let _ = query
                .remove_event_listener_with_callback("change", callback.as_ref().unchecked_ref());
        }
        if !active {
            return;
        }

        let Some(query) = media_query(COLOR_SCHEME_QUERY) else {
            return;
        };
        let controller = self.controller.clone();
        let callback = Closure::<dyn FnMut(MediaQueryListEvent)>::new(
            move |event: MediaQueryListEvent| {
                if let Some(controller) = controller.upgrade() {
                    controller.borrow_mut().on_system_preference_changed(event.matches());
                }
            },
        );

        if query
            .add_event_listener_with_callback("change", callback.as_ref().unchecked_ref())
            .is_ok()
        {
            self.listener = Some((query, callback));
        }
    }
}

pub fn mount_theme(default: ThemePreference) -> Rc<RefCell<WebThemeController>> {
    Rc::new_cyclic(|weak| {
        RefCell::new(ThemeController::mount(
            LocalStore,
            DocumentSink::new(weak.clone()),
            default,
        ))
    })
}

fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|performance| performance.now())
        .unwrap_or(0.0)
}

/// A pending `setTimeout` that owns its callback. Dropping it clears the
/// timer and frees the closure, so re-arming never leaks.
struct Timeout {
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

impl Timeout {
    fn new(delay_ms: i32, callback: Closure<dyn FnMut()>) -> Option<Self> {
        let handle = window()?
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref::<Function>(),
                delay_ms,
            )
            .ok()?;
        Some(Self {
            handle,
            _callback: callback,
        })
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        if let Some(win) = window() {
            win.clear_timeout_with_handle(self.handle);
        }
    }
}

struct TickerState<T> {
    machine: T,
    epoch_ms: f64,
    timeout: Option<Timeout>,
    on_change: Callback<()>,
    stopped: bool,
}

impl<T> TickerState<T> {
    fn now(&self) -> Duration {
        Duration::from_secs_f64(((now_ms() - self.epoch_ms) / 1_000.0).max(0.0))
    }
}

/// Drives a [`Timed`] machine with `setTimeout`, keeping exactly one timer
/// pending for its earliest deadline. Logical time starts at construction.
pub struct Ticker<T> {
    state: Rc<RefCell<TickerState<T>>>,
}

impl<T> Clone for Ticker<T> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<T> PartialEq for Ticker<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl<T: Timed + 'static> Ticker<T> {
    pub fn new(build: impl FnOnce(Duration) -> T, on_change: Callback<()>) -> Self {
        Self {
            state: Rc::new(RefCell::new(TickerState {
                machine: build(Duration::ZERO),
                epoch_ms: now_ms(),
                timeout: None,
                on_change,
                stopped: false,
            })),
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.state.borrow().machine)
    }

    /// Mutate the machine at the current logical time, then re-arm the timer
    /// and notify the view.
    pub fn update<R>(&self, f: impl FnOnce(&mut T, Duration) -> R) -> R {
        let (result, on_change) = {
            let mut state = self.state.borrow_mut();
            let now = state.now();
            (f(&mut state.machine, now), state.on_change.clone())
        };
        schedule(&self.state);
        on_change.emit(());
        result
    }

    /// Like [`Ticker::update`], but only re-renders when `f` reports a change.
    pub fn update_if(&self, f: impl FnOnce(&mut T, Duration) -> bool) -> bool {
        let (changed, on_change) = {
            let mut state = self.state.borrow_mut();
            let now = state.now();
            (f(&mut state.machine, now), state.on_change.clone())
        };
        schedule(&self.state);
        if changed {
            on_change.emit(());
        }
        changed
    }

    pub fn start(&self) {
        self.state.borrow_mut().stopped = false;
        schedule(&self.state);
    }

    pub fn stop(&self, teardown: impl FnOnce(&mut T)) {
        let mut state = self.state.borrow_mut();
        state.stopped = true;
        state.timeout = None;
        teardown(&mut state.machine);
    }
}

fn schedule<T: Timed + 'static>(state: &Rc<RefCell<TickerState<T>>>) {
    let mut guard = state.borrow_mut();
    guard.timeout = None;
    if guard.stopped {
        return;
    }
    let Some(deadline) = guard.machine.next_deadline() else {
        return;
    };

    let remaining = deadline.saturating_sub(guard.now());
    let delay_ms = (remaining.as_secs_f64() * 1_000.0).ceil().min(f64::from(i32::MAX)) as i32;
    let weak = Rc::downgrade(state);
    // Re-arming below drops this closure mid-call; wasm-bindgen defers the
    // free until the call returns.
    let callback = Closure::<dyn FnMut()>::new(move || {
        let Some(state) = weak.upgrade() else {
            return;
        };
        let on_change = {
            let mut guard = state.borrow_mut();
            let now = guard.now();
            guard.machine.fire(now);
            guard.on_change.clone()
        };
        schedule(&state);
        on_change.emit(());
    });

    guard.timeout = Timeout::new(delay_ms, callback);
}

/// Sample the scroll offset on the next animation frame.
pub fn request_scroll_sample(
    tracker: Rc<RefCell<ScrollTracker>>,
    on_change: Callback<ScrollFlags>,
) {
    let Some(win) = window() else {
        return;
    };
    let callback = Closure::once_into_js(move || {
        let changed = tracker.borrow_mut().on_animation_frame(scroll_offset());
        if let Some(flags) = changed {
            on_change.emit(flags);
        }
    });
    let _ = win.request_animation_frame(callback.unchecked_ref());
}

/// Animate a [`SmoothScroll`] one animation frame at a time.
pub fn run_smooth_scroll(scroll: SmoothScroll) {
    request_scroll_frame(Rc::new(RefCell::new(scroll)));
}

fn request_scroll_frame(scroll: Rc<RefCell<SmoothScroll>>) {
    let Some(win) = window() else {
        return;
    };
    let callback = Closure::once_into_js(move |timestamp: f64| {
        let (position, done) = scroll
            .borrow_mut()
            .sample(Duration::from_secs_f64(timestamp.max(0.0) / 1_000.0));
        if let Some(win) = window() {
            win.scroll_to_with_x_and_y(0.0, position);
        }
        if !done {
            request_scroll_frame(scroll);
        }
    });
    let _ = win.request_animation_frame(callback.unchecked_ref());
}

/// Smooth-scroll to the element matching `selector`, clearing the header.
pub fn scroll_to_selector(selector: &str) {
    let Some(element) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.query_selector(selector).ok().flatten())
    else {
        return;
    };
    let top = element.get_bounding_client_rect().top();
    run_smooth_scroll(SmoothScroll::to_element(scroll_offset(), top, prefers_reduced_motion()));
}

pub fn scroll_to_top() {
    run_smooth_scroll(SmoothScroll::to_offset(scroll_offset(), 0.0, prefers_reduced_motion()));
}

/// Toggle a marker class on `<body>`.
pub fn set_body_class(class: &str, present: bool) {
    let Some(body) = window().and_then(|w| w.document()).and_then(|d| d.body()) else {
        return;
    };
    let classes = body.class_list();
    let _ = if present {
        classes.add_1(class)
    } else {
        classes.remove_1(class)
    };
}
