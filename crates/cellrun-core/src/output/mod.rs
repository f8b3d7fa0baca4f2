//! Output relay to the display surface.

mod relay;

pub use relay::{BufferSink, Notice, OutputSink, SinkEvent, relay};
