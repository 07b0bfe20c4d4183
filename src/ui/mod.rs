//! Platform-independent state for the page's self-driving widgets.
//!
//! Nothing in here depends on the browser; `frontend` wires these machines to
//! the DOM and to `setTimeout`, tests drive them on a logical clock.

pub mod carousel;
pub mod contact_form;
pub mod motion;
pub mod nav;
pub mod schedule;
pub mod scroll;
pub mod theme;
pub mod typewriter;
