//! Drawing on the ILI9341
//!
//! Everything that puts pixels on the panel: geometry and clipping, the
//! RGB565 palette, the command set, the chunked transfer engine, shape
//! rasterization, bitmap text and the `embedded-graphics` target.

mod color;
pub mod command;
mod draw_target;
mod font;
mod geometry;
mod raster;
mod text;
pub(crate) mod transfer;

pub use color::Color565;
pub use command::{Command, INIT_SEQUENCE};
pub use font::{glyph_index, Font, GlyphRows, FIRST_GLYPH, LAST_GLYPH};
pub use geometry::{clip, clip_point, Orientation, Rect, ScreenSize};
pub use text::{TextStyle, TextWrap};
