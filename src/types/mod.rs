//! Core value types for themeconv.
//!
//! - `Colour` - 8-bit ARGB colour values plus source-string normalisation
//! - `ColorType` / `ColorValue` - how the host interprets a stored colour

mod color_type;
mod colour;

pub use color_type::{swap_argb_abgr, ColorType, ColorValue};
pub use colour::{compound, revise, Colour};
