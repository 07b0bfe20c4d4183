use std::{cell::RefCell, rc::Rc, time::Duration};

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::window;
use yew::prelude::*;

use super::web::{request_scroll_sample, scroll_offset, Ticker};
use crate::ui::{
    schedule::Timed,
    scroll::{ScrollFlags, ScrollTracker},
};

/// Own a [`Timed`] machine for the lifetime of the component. Every timer
/// firing and every [`Ticker::update`] re-renders the caller; `teardown`
/// runs on unmount after the pending timer is cleared.
#[hook]
pub fn use_ticker<T, F>(build: F, teardown: fn(&mut T)) -> Ticker<T>
where
    T: Timed + 'static,
    F: FnOnce(Duration) -> T + 'static,
{
    let rerender = use_force_update();
    let ticker = use_memo((), move |_| {
        Ticker::new(build, Callback::from(move |()| rerender.force_update()))
    });
    let ticker = (*ticker).clone();

    {
        let ticker = ticker.clone();
        use_effect_with((), move |_| {
            ticker.start();
            move || ticker.stop(teardown)
        });
    }

    ticker
}

/// Header and back-to-top flags, recomputed at most once per animation frame.
#[hook]
pub fn use_scroll_flags() -> ScrollFlags {
    let flags = use_state_eq(|| ScrollFlags::from_offset(scroll_offset()));

    {
        let flags = flags.setter();
        use_effect_with((), move |_| {
            let tracker = Rc::new(RefCell::new(ScrollTracker::new(scroll_offset())));
            let on_change = Callback::from(move |next: ScrollFlags| flags.set(next));
            let listener = {
                let tracker = Rc::clone(&tracker);
                Closure::<dyn FnMut()>::new(move || {
                    if tracker.borrow_mut().on_scroll() {
                        request_scroll_sample(Rc::clone(&tracker), on_change.clone());
                    }
                })
            };

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
                tracker.borrow_mut().unmount();
            }
        });
    }

    *flags
}
