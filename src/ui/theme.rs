//! Tri-state theme preference, its persistence, and reconciliation against the
//! OS color scheme.
//!
//! The controller never touches the DOM or storage directly: the host hands it
//! a [`PreferenceStore`] and a [`PresentationSink`], and forwards OS
//! color-scheme changes through
//! [`ThemeController::on_system_preference_changed`].

use thiserror::Error;

pub const THEME_KEY: &str = "portfolio-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
    System,
}

impl ThemePreference {
    pub const ALL: [Self; 3] = [Self::Light, Self::Dark, Self::System];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "system" => Some(Self::System),
            _ => None,
        }
    }

    /// Order used by the header toggle button.
    pub fn cycled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::System,
            Self::System => Self::Light,
        }
    }

    pub fn toggle_label(self) -> String {
        let next = self.cycled().as_str();
        format!("Switch to {next} theme")
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Light => "◐",
            Self::Dark => "◑",
            Self::System => "◒",
        }
    }
}

/// Concrete theme after collapsing [`ThemePreference::System`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedTheme {
    Light,
    Dark,
}

impl ResolvedTheme {
    pub const MARKERS: [&'static str; 2] = ["light", "dark"];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn from_prefers_dark(prefers_dark: bool) -> Self {
        if prefers_dark {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

pub fn resolve(preference: ThemePreference, system_prefers_dark: bool) -> ResolvedTheme {
    match preference {
        ThemePreference::Light => ResolvedTheme::Light,
        ThemePreference::Dark => ResolvedTheme::Dark,
        ThemePreference::System => ResolvedTheme::from_prefers_dark(system_prefers_dark),
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("client storage is unavailable")]
    Unavailable,
    #[error("client storage rejected write: {0}")]
    Rejected(String),
}

/// Durable key/value storage (browser `localStorage`).
pub trait PreferenceStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Where resolved themes become visible.
pub trait PresentationSink {
    /// Replace the theme markers on the document root and body so that
    /// exactly one of [`ResolvedTheme::MARKERS`] remains.
    fn apply_theme(&mut self, theme: ResolvedTheme);

    /// Current OS color-scheme preference; `None` when it cannot be queried.
    fn system_prefers_dark(&self) -> Option<bool>;

    /// Start or stop forwarding OS color-scheme changes to the controller.
    fn watch_system_preference(&mut self, active: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(ThemePreference, ResolvedTheme)>;

pub struct ThemeController<S, P> {
    store: S,
    sink: P,
    storage_key: &'static str,
    preference: ThemePreference,
    resolved: ResolvedTheme,
    watching_system: bool,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<S: PreferenceStore, P: PresentationSink> ThemeController<S, P> {
    pub fn mount(store: S, sink: P, default: ThemePreference) -> Self {
        Self::mount_with_key(store, sink, THEME_KEY, default)
    }

    pub fn mount_with_key(
        store: S,
        sink: P,
        storage_key: &'static str,
        default: ThemePreference,
    ) -> Self {
        let preference = match store.read(storage_key) {
            Ok(Some(value)) => ThemePreference::parse(&value).unwrap_or(default),
            Ok(None) => default,
            Err(error) => {
                tracing::debug!(%error, "theme preference unreadable, using default");
                default
            }
        };

        let mut controller = Self {
            store,
            sink,
            storage_key,
            preference,
            resolved: ResolvedTheme::Light,
            watching_system: false,
            listeners: Vec::new(),
            next_subscription: 0,
        };
        controller.reconcile();
        controller
    }

    pub fn preference(&self) -> ThemePreference {
        self.preference
    }

    pub fn resolved(&self) -> ResolvedTheme {
        self.resolved
    }

    pub fn sink(&self) -> &P {
        &self.sink
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persist `preference`, then make it current and apply it.
    pub fn set_preference(&mut self, preference: ThemePreference) {
        if let Err(error) = self.store.write(self.storage_key, preference.as_str()) {
            tracing::debug!(%error, "theme preference not persisted");
        }
        self.preference = preference;
        self.reconcile();
        self.notify();
    }

    /// Forwarded from the OS color-scheme change event.
    pub fn on_system_preference_changed(&mut self, prefers_dark: bool) {
        if self.preference != ThemePreference::System {
            return;
        }
        self.resolved = ResolvedTheme::from_prefers_dark(prefers_dark);
        self.sink.apply_theme(self.resolved);
        self.notify();
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(ThemePreference, ResolvedTheme) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn unmount(&mut self) {
        self.set_watching(false);
        self.listeners.clear();
    }

    fn reconcile(&mut self) {
        let prefers_dark = self.sink.system_prefers_dark().unwrap_or(false);
        self.resolved = resolve(self.preference, prefers_dark);
        self.sink.apply_theme(self.resolved);
        self.set_watching(self.preference == ThemePreference::System);
    }

    fn set_watching(&mut self, active: bool) {
        if self.watching_system != active {
            self.watching_system = active;
            self.sink.watch_system_preference(active);
        }
    }

    fn notify(&mut self) {
        let (preference, resolved) = (self.preference, self.resolved);
        for (_, listener) in &mut self.listeners {
            listener(preference, resolved);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Default)]
    struct MemoryStore {
        values: HashMap<String, String>,
        unavailable: bool,
        writes: usize,
    }

    impl PreferenceStore for MemoryStore {
        fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
            if self.unavailable {
                return Err(StorageError::Unavailable);
            }
            Ok(self.values.get(key).cloned())
        }

        fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.unavailable {
                return Err(StorageError::Unavailable);
            }
            self.writes += 1;
            self.values.insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct ClassListSink {
        root: Vec<String>,
        body: Vec<String>,
        prefers_dark: Option<bool>,
        watching: bool,
    }

    fn replace_marker(classes: &mut Vec<String>, theme: ResolvedTheme) {
        classes.retain(|class| !ResolvedTheme::MARKERS.contains(&class.as_str()));
        classes.push(theme.as_str().to_string());
    }

    impl PresentationSink for ClassListSink {
        fn apply_theme(&mut self, theme: ResolvedTheme) {
            replace_marker(&mut self.root, theme);
            replace_marker(&mut self.body, theme);
        }

        fn system_prefers_dark(&self) -> Option<bool> {
            self.prefers_dark
        }

        fn watch_system_preference(&mut self, active: bool) {
            self.watching = active;
        }
    }

    fn markers(classes: &[String]) -> Vec<&str> {
        classes
            .iter()
            .map(String::as_str)
            .filter(|class| ResolvedTheme::MARKERS.contains(class))
            .collect()
    }

    fn sink_with_body_class(prefers_dark: Option<bool>) -> ClassListSink {
        ClassListSink {
            body: vec!["font-sans".to_string()],
            prefers_dark,
            ..Default::default()
        }
    }

    #[test]
    fn mount_defaults_to_light_without_stored_value() {
        let controller = ThemeController::mount(
            MemoryStore::default(),
            sink_with_body_class(Some(true)),
            ThemePreference::Light,
        );

        assert_eq!(controller.preference(), ThemePreference::Light);
        assert_eq!(controller.resolved(), ResolvedTheme::Light);
        assert_eq!(markers(&controller.sink().root), vec!["light"]);
        assert!(!controller.sink().watching);
    }

    #[test]
    fn mount_restores_stored_preference() {
        let mut store = MemoryStore::default();
        store.values.insert(THEME_KEY.to_string(), "dark".to_string());

        let controller = ThemeController::mount(
            store,
            sink_with_body_class(None),
            ThemePreference::Light,
        );

        assert_eq!(controller.preference(), ThemePreference::Dark);
        assert_eq!(markers(&controller.sink().body), vec!["dark"]);
    }

    #[test]
    fn mount_ignores_unknown_stored_value() {
        let mut store = MemoryStore::default();
        store.values.insert(THEME_KEY.to_string(), "sepia".to_string());

        let controller = ThemeController::mount(
            store,
            sink_with_body_class(None),
            ThemePreference::Light,
        );

        assert_eq!(controller.preference(), ThemePreference::Light);
    }

    #[test]
    fn every_preference_leaves_exactly_one_marker_on_root_and_body() {
        for prefers_dark in [Some(true), Some(false), None] {
            let mut controller = ThemeController::mount(
                MemoryStore::default(),
                sink_with_body_class(prefers_dark),
                ThemePreference::Light,
            );

            for preference in ThemePreference::ALL {
                controller.set_preference(preference);
                let expected = resolve(preference, prefers_dark.unwrap_or(false)).as_str();

                assert_eq!(markers(&controller.sink().root), vec![expected]);
                assert_eq!(markers(&controller.sink().body), vec![expected]);
                assert!(controller.sink().body.contains(&"font-sans".to_string()));
            }
        }
    }

    #[test]
    fn setting_same_preference_twice_is_idempotent() {
        let mut controller = ThemeController::mount(
            MemoryStore::default(),
            sink_with_body_class(None),
            ThemePreference::Light,
        );

        controller.set_preference(ThemePreference::Dark);
        let root_once = controller.sink().root.clone();
        let body_once = controller.sink().body.clone();
        let stored_once = controller.store().values.get(THEME_KEY).cloned();

        controller.set_preference(ThemePreference::Dark);

        assert_eq!(controller.sink().root, root_once);
        assert_eq!(controller.sink().body, body_once);
        assert_eq!(controller.store().values.get(THEME_KEY).cloned(), stored_once);
        assert_eq!(stored_once.as_deref(), Some("dark"));
    }

    #[test]
    fn system_preference_follows_os_changes_only_while_selected() {
        let mut controller = ThemeController::mount(
            MemoryStore::default(),
            sink_with_body_class(Some(false)),
            ThemePreference::Light,
        );

        controller.set_preference(ThemePreference::System);
        assert!(controller.sink().watching);
        assert_eq!(controller.resolved(), ResolvedTheme::Light);

        controller.on_system_preference_changed(true);
        assert_eq!(controller.resolved(), ResolvedTheme::Dark);
        assert_eq!(markers(&controller.sink().root), vec!["dark"]);

        controller.set_preference(ThemePreference::Light);
        assert!(!controller.sink().watching);

        controller.on_system_preference_changed(true);
        assert_eq!(controller.resolved(), ResolvedTheme::Light);
        assert_eq!(markers(&controller.sink().root), vec!["light"]);
    }

    #[test]
    fn unavailable_storage_still_updates_session_state() {
        let store = MemoryStore {
            unavailable: true,
            ..Default::default()
        };
        let mut controller = ThemeController::mount(
            store,
            sink_with_body_class(None),
            ThemePreference::Light,
        );

        controller.set_preference(ThemePreference::Dark);

        assert_eq!(controller.preference(), ThemePreference::Dark);
        assert_eq!(controller.store().writes, 0);
        assert_eq!(markers(&controller.sink().root), vec!["dark"]);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[derive(Clone, Default)]
    struct CapturedLog(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    #[cfg(not(target_arch = "wasm32"))]
    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn storage_failures_are_logged_at_debug() {
        let log = CapturedLog::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer({
                let log = log.clone();
                move || log.clone()
            })
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let store = MemoryStore {
                unavailable: true,
                ..Default::default()
            };
            let mut controller = ThemeController::mount(
                store,
                sink_with_body_class(None),
                ThemePreference::Light,
            );
            controller.set_preference(ThemePreference::Dark);
        });

        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("DEBUG"), "{output}");
        assert!(output.contains("theme preference unreadable"), "{output}");
        assert!(output.contains("theme preference not persisted"), "{output}");
    }

    #[test]
    fn subscribers_see_changes_until_unsubscribed() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut controller = ThemeController::mount(
            MemoryStore::default(),
            sink_with_body_class(Some(true)),
            ThemePreference::Light,
        );

        let id = {
            let seen = Rc::clone(&seen);
            controller.subscribe(move |preference, resolved| {
                seen.borrow_mut().push((preference, resolved))
            })
        };

        controller.set_preference(ThemePreference::System);
        assert!(controller.unsubscribe(id));
        controller.set_preference(ThemePreference::Light);

        assert_eq!(
            *seen.borrow(),
            vec![(ThemePreference::System, ResolvedTheme::Dark)]
        );
        assert!(!controller.unsubscribe(id));
    }

    #[test]
    fn unmount_stops_watching_system_preference() {
        let mut controller = ThemeController::mount(
            MemoryStore::default(),
            sink_with_body_class(None),
            ThemePreference::System,
        );
        assert!(controller.sink().watching);

        controller.unmount();

        assert!(!controller.sink().watching);
    }
}
