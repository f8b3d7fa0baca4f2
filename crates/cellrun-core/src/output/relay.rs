//! Display surface for captured output.

use std::fmt;

/// A failure announcement shown ahead of the failing step's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    CompileFailed,
    LinkFailed,
    RunFailed,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CompileFailed => "Compilation failed:",
            Self::LinkFailed => "Linking failed:",
            Self::RunFailed => "Execution failed:",
        })
    }
}

/// Where relayed text and rendered HTML end up.
///
/// The notebook host, a terminal, or a test buffer.
pub trait OutputSink {
    /// One line of captured process output, without its newline.
    fn line(&mut self, line: &str);

    /// A rendered HTML document.
    fn html(&mut self, html: &str);

    /// A failure announcement. Printed as a plain line by default.
    fn notice(&mut self, notice: Notice) {
        self.line(&notice.to_string());
    }
}

/// Forward `text` to `sink` line by line.
///
/// Splits on `\n` only, so blank lines and `\r` survive. The newline that
/// terminates the last line does not produce an extra empty line, and empty
/// text relays nothing.
pub fn relay(text: &str, sink: &mut dyn OutputSink) {
    if text.is_empty() {
        return;
    }
    let text = text.strip_suffix('\n').unwrap_or(text);
    for line in text.split('\n') {
        sink.line(line);
    }
}

/// An event recorded by [`BufferSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Line(String),
    Html(String),
    Notice(Notice),
}

/// Collects everything in memory.
#[derive(Debug, Clone, Default)]
pub struct BufferSink {
    events: Vec<SinkEvent>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    /// All relayed lines, each terminated by `\n`.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for event in &self.events {
            if let SinkEvent::Line(line) = event {
                text.push_str(line);
                text.push('\n');
            }
        }
        text
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SinkEvent::Notice(notice) => Some(*notice),
                _ => None,
            })
            .collect()
    }

    pub fn html_documents(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SinkEvent::Html(html) => Some(html.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl OutputSink for BufferSink {
    fn line(&mut self, line: &str) {
        self.events.push(SinkEvent::Line(line.to_string()));
    }

    fn html(&mut self, html: &str) {
        self.events.push(SinkEvent::Html(html.to_string()));
    }

    fn notice(&mut self, notice: Notice) {
        self.events.push(SinkEvent::Notice(notice));
    }
}
