// Refs:
//   Build Your Own Text Editor: https://viewsourcecode.org/snaptoken/kilo/index.html
//   VT100 User Guide: https://vt100.net/docs/vt100-ug/chapter3.html

mod editor;
mod error;
mod input;
mod row;
mod screen;
mod signal;
mod status_bar;
mod text_buffer;


pub use crate::editor::Editor;
pub use crate::error::{Error, Result};
pub use crate::input::{InputSeq, InputSequences, StdinRawMode};
pub use crate::screen::VERSION;
