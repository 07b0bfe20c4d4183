//! Single-page portfolio rendered with yew.

mod hooks;
mod sections;
mod web;

use std::{cell::RefCell, rc::Rc};

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{window, MouseEvent};
use yew::prelude::*;

use crate::ui::{
    motion::ScrollActivity,
    nav::NAV_ITEMS,
    theme::{ResolvedTheme, ThemePreference},
};
use hooks::{use_scroll_flags, use_ticker};
use sections::{
    About, Certifications, Contact, Education, Experience, Footer, Hero, Projects, Skills,
    Testimonials,
};
use web::{mount_theme, scroll_to_selector, scroll_to_top, set_body_class, WebThemeController};

const SCROLLING_CLASS: &str = "is-scrolling";

/// Theme state shared through context; equality follows the rendered state.
#[derive(Clone)]
pub struct ThemeHandle {
    controller: Rc<RefCell<WebThemeController>>,
    preference: ThemePreference,
    resolved: ResolvedTheme,
}

impl PartialEq for ThemeHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.controller, &other.controller)
            && self.preference == other.preference
            && self.resolved == other.resolved
    }
}

impl ThemeHandle {
    pub fn preference(&self) -> ThemePreference {
        self.preference
    }

    pub fn resolved(&self) -> ResolvedTheme {
        self.resolved
    }

    pub fn set_preference(&self, preference: ThemePreference) {
        self.controller.borrow_mut().set_preference(preference);
    }
}

#[function_component(ThemeToggle)]
fn theme_toggle() -> Html {
    let Some(theme) = use_context::<ThemeHandle>() else {
        return Html::default();
    };
    let preference = theme.preference();

    let onclick = {
        let theme = theme.clone();
        Callback::from(move |_: MouseEvent| theme.set_preference(preference.cycled()))
    };

    html! {
        <button
            class="theme-toggle"
            type="button"
            aria-label={preference.toggle_label()}
            aria-pressed={(theme.resolved() == ResolvedTheme::Dark).to_string()}
            {onclick}
        >
            <span aria-hidden="true">{preference.icon()}</span>
        </button>
    }
}

/// Keeps the body's scrolling marker in sync with scroll activity.
#[function_component(ScrollActivityMarker)]
fn scroll_activity_marker() -> Html {
    let activity = use_ticker(|_| ScrollActivity::default(), ScrollActivity::unmount);
    let active = activity.read(ScrollActivity::is_active);

    {
        let activity = activity.clone();
        use_effect_with((), move |_| {
            let listener = Closure::<dyn FnMut()>::new(move || {
                activity.update_if(|activity, now| activity.on_scroll(now));
            });
            let win = window();
            if let Some(win) = win.as_ref() {
                let _ = win
                    .add_event_listener_with_callback("scroll", listener.as_ref().unchecked_ref());
            }
            move || {
                if let Some(win) = win {
                    let _ = win.remove_event_listener_with_callback(
                        "scroll",
                        listener.as_ref().unchecked_ref(),
                    );
                }
                set_body_class(SCROLLING_CLASS, false);
            }
        });
    }

    use_effect_with(active, |active| {
        set_body_class(SCROLLING_CLASS, *active);
        || ()
    });

    Html::default()
}

#[function_component(App)]
fn app() -> Html {
    let controller = (*use_memo((), |_| mount_theme(ThemePreference::default()))).clone();
    let theme = use_state_eq(|| {
        let controller = controller.borrow();
        (controller.preference(), controller.resolved())
    });
    let menu_open = use_state_eq(|| false);
    let flags = use_scroll_flags();

    {
        let controller = controller.clone();
        let theme = theme.setter();
        use_effect_with((), move |_| {
            let subscription = controller
                .borrow_mut()
                .subscribe(move |preference, resolved| theme.set((preference, resolved)));
            move || {
                let mut controller = controller.borrow_mut();
                controller.unsubscribe(subscription);
                controller.unmount();
            }
        });
    }

    let (preference, resolved) = *theme;
    let handle = ThemeHandle {
        controller,
        preference,
        resolved,
    };

    let on_toggle_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |_: MouseEvent| menu_open.set(!*menu_open))
    };

    let nav_links = NAV_ITEMS.iter().map(|&item| {
        let menu_open = menu_open.clone();
        let onclick = Callback::from(move |event: MouseEvent| {
            event.prevent_default();
            menu_open.set(false);
            scroll_to_selector(&item.href());
        });
        html! {
            <li><a href={item.href()} {onclick}>{item.label}</a></li>
        }
    });

    let on_back_to_top = Callback::from(|_: MouseEvent| scroll_to_top());

    html! {
        <ContextProvider<ThemeHandle> context={handle}>
            <ScrollActivityMarker />
            <a class="skip-link" href="#content">{"Skip to main content"}</a>
            <header class={classes!("site-header", flags.is_scrolled.then_some("is-scrolled"))}>
                <nav
                    class={classes!("site-nav", (*menu_open).then_some("nav-open"))}
                    aria-label="Primary"
                >
                    <button
                        class="nav-toggle"
                        type="button"
                        aria-label="Toggle navigation"
                        aria-expanded={(*menu_open).to_string()}
                        onclick={on_toggle_menu}
                    >
                        <span aria-hidden="true">{if *menu_open { "✕" } else { "☰" }}</span>
                    </button>
                    <ul class="nav-links">
                        { for nav_links }
                    </ul>
                </nav>
                <ThemeToggle />
            </header>

            <main id="content">
                <Hero />
                <About />
                <Skills />
                <Projects />
                <Experience />
                <Education />
                <Certifications />
                <Testimonials />
                <Contact />
            </main>

            <Footer />

            <button
                class={classes!("back-to-top", flags.is_visible.then_some("is-visible"))}
                type="button"
                aria-label="Back to top"
                aria-hidden={(!flags.is_visible).to_string()}
                onclick={on_back_to_top}
            >
                {"↑"}
            </button>
        </ContextProvider<ThemeHandle>>
    }
}

pub fn run() {
    console_error_panic_hook::set_once();
    // Browser console sink for `tracing` events (via the `log` bridge).
    let _ = console_log::init_with_level(log::Level::Debug);

    yew::Renderer::<App>::with_root(
        window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("app"))
            .expect("missing #app mount point"),
    )
    .render();
}
