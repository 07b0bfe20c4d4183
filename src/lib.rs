pub mod api;
pub mod ui;

#[cfg(not(target_arch = "wasm32"))]
pub mod backend;

#[cfg(target_arch = "wasm32")]
pub mod frontend;
