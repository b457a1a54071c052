//! Destination for `print` output.
//!
//! Enum dispatch over the three sinks the interpreter needs: stdout for the
//! CLI, a line buffer for tests and embedding, and a silent sink.

use std::sync::Arc;

use parking_lot::Mutex;

/// Line buffer capturing `print` output.
#[derive(Debug, Default)]
pub struct BufferPrintHandler {
    lines: Mutex<Vec<String>>,
}

impl BufferPrintHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn println(&self, line: &str) {
        self.lines.lock().push(line.to_string());
    }

    /// All captured lines, in print order.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

/// Print sink.
#[derive(Debug)]
pub enum PrintHandlerImpl {
    /// Writes each line to stdout.
    Stdout,
    /// Captures lines in memory.
    Buffer(BufferPrintHandler),
    /// Discards all output.
    Silent,
}

impl PrintHandlerImpl {
    /// Emit one line.
    pub fn println(&self, line: &str) {
        match self {
            Self::Stdout => println!("{line}"),
            Self::Buffer(h) => h.println(line),
            Self::Silent => {}
        }
    }

    /// Captured lines (empty for sinks that do not capture).
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Buffer(h) => h.lines(),
            Self::Stdout | Self::Silent => Vec::new(),
        }
    }

    /// Captured output joined with trailing newlines.
    pub fn get_output(&self) -> String {
        self.lines().iter().fold(String::new(), |mut out, line| {
            out.push_str(line);
            out.push('\n');
            out
        })
    }

    pub fn clear(&self) {
        if let Self::Buffer(h) = self {
            h.clear();
        }
    }
}

/// Shared print handler. The caller keeps a clone to read captured output
/// after the interpreter is done.
pub type SharedPrintHandler = Arc<PrintHandlerImpl>;

pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Stdout)
}

pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Buffer(BufferPrintHandler::new()))
}

pub fn silent_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Silent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_handler_keeps_lines_in_order() {
        let handler = buffer_handler();
        handler.println("1");
        handler.println("two");
        assert_eq!(handler.lines(), vec!["1".to_string(), "two".to_string()]);
        assert_eq!(handler.get_output(), "1\ntwo\n");
    }

    #[test]
    fn buffer_handler_clear_empties_buffer() {
        let handler = buffer_handler();
        handler.println("x");
        handler.clear();
        assert!(handler.lines().is_empty());
    }

    #[test]
    fn silent_and_stdout_capture_nothing() {
        let silent = silent_handler();
        silent.println("hidden");
        assert_eq!(silent.get_output(), "");
        assert!(stdout_handler().lines().is_empty());
    }
}
