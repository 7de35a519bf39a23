//! LANTERN Capture Log
//!
//! Ordered, append-only capture of the lines a snippet emits.
//! Sequence numbers start at 0 and never skip.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cursor;
pub mod line;
pub mod sink;

pub use cursor::{Direction, LineCursor};
pub use line::{LogLine, Origin};
pub use sink::{CaptureSink, Lines};
