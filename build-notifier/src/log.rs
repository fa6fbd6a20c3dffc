// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The per-build text log. Everything the notifier has to say to the user
//! goes through here; like the metrics themselves it is best-effort, so
//! write failures are swallowed.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Cheaply cloneable handle on the build's log sink. Clones share the
/// underlying writer, which lets the transport error handler keep writing
/// to the same log after the emission pass has returned.
#[derive(Clone)]
pub struct BuildLog {
    sink: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl BuildLog {
    pub fn new<W: Write + Send + 'static>(sink: W) -> Self {
        BuildLog {
            sink: Arc::new(Mutex::new(Box::new(sink))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn line(&self, msg: impl AsRef<str>) {
        if let Ok(mut sink) = self.sink.lock() {
            let _ = writeln!(sink, "{}", msg.as_ref());
        }
    }

    /// A log that keeps its lines in memory, for asserting on what a pass
    /// reported.
    pub fn capture() -> (Self, CapturedLog) {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let log = Self::new(SharedBuf(Arc::clone(&buf)));
        (log, CapturedLog { buf })
    }
}

struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Ok(mut bytes) = self.0.lock() {
            bytes.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Clone)]
pub struct CapturedLog {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLog {
    pub fn lines(&self) -> Vec<String> {
        let bytes = match self.buf.lock() {
            Ok(bytes) => bytes.clone(),
            Err(_) => return Vec::new(),
        };
        String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }
}
