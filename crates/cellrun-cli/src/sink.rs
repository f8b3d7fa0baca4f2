//! Terminal display surface.

use std::fs;
use std::io;
use std::path::PathBuf;

use cellrun_core::{Notice, OutputSink};

use crate::colors;

/// Prints relayed lines to stdout.
///
/// HTML goes to stdout too, unless a file was requested; the file is only
/// written by [`TerminalSink::finish`].
pub struct TerminalSink {
    color: bool,
    html_out: Option<PathBuf>,
    pending_html: Option<String>,
}

impl TerminalSink {
    pub fn new(html_out: Option<PathBuf>) -> Self {
        Self {
            color: colors::stdout_is_tty(),
            html_out,
            pending_html: None,
        }
    }

    /// Write any HTML destined for a file.
    pub fn finish(self) -> io::Result<()> {
        if let (Some(path), Some(html)) = (self.html_out, self.pending_html) {
            fs::write(&path, html)?;
            tracing::info!("Wrote highlighted source to {}", path.display());
        }
        Ok(())
    }
}

impl OutputSink for TerminalSink {
    fn line(&mut self, line: &str) {
        println!("{line}");
    }

    fn html(&mut self, html: &str) {
        if self.html_out.is_some() {
            self.pending_html = Some(html.to_string());
        } else {
            print!("{html}");
        }
    }

    fn notice(&mut self, notice: Notice) {
        let text = notice.to_string();
        println!("{}", colors::paint(&text, colors::RED, self.color));
    }
}
