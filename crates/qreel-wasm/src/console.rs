//! Console logging - routes `tracing` output to the browser console

use std::io;
use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsValue;
use web_sys::console;

/// Install the console subscriber. Keeps an already installed one.
pub(crate) fn init_logging() {
    let level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let installed = tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .with_max_level(level)
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .try_init();

    if installed.is_err() {
        console::debug_1(&"[qreel] tracing subscriber already set".into());
    }
}

/// Hands out one writer per event, picking the console method by level
struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// Buffers one formatted event and emits it on drop
struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self {
            level,
            buffer: Vec::with_capacity(128),
        }
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buffer.is_empty() {
            return;
        }

        let line = String::from_utf8_lossy(&self.buffer);
        let message = JsValue::from_str(line.trim_end());

        if self.level == Level::ERROR {
            console::error_1(&message);
        } else if self.level == Level::WARN {
            console::warn_1(&message);
        } else if self.level == Level::INFO {
            console::info_1(&message);
        } else if self.level == Level::DEBUG {
            console::debug_1(&message);
        } else {
            console::log_1(&message);
        }
    }
}
