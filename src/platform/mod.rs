//! Platform layer
//!
//! Translates host events into simulation input:
//! - Keyboard state by `KeyboardEvent.code` (`input`)
//! - The wasm-bindgen surface a browser page drives (`web`)

pub mod input;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::KeyState;
