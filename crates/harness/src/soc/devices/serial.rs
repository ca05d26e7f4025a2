//! Serial-output device.
//!
//! A write-only device at a single fixed address. The low byte of every write
//! is emitted as one character. Output is either forwarded to the host's
//! stdout (buffered, flushed on newline) or captured in memory for tests.

use std::io::{self, Write};

use tracing::warn;

/// Flush stdout once this many bytes are pending even without a newline.
const TX_BUFFER_FLUSH_THRESHOLD: usize = 4096;

/// Where emitted characters go.
#[derive(Debug)]
enum SerialSink {
    /// Host stdout, with a pending buffer.
    Stdout(Vec<u8>),
    /// In-memory capture.
    Capture(Vec<u8>),
}

/// Serial-output device.
#[derive(Debug)]
pub struct SerialPort {
    /// Address the device answers on.
    addr: u32,
    sink: SerialSink,
    /// Characters emitted so far.
    bytes_written: u64,
}

impl SerialPort {
    /// Creates a serial device at `addr` that forwards characters to stdout.
    pub const fn stdout(addr: u32) -> Self {
        Self {
            addr,
            sink: SerialSink::Stdout(Vec::new()),
            bytes_written: 0,
        }
    }

    /// Creates a serial device at `addr` that keeps characters in memory.
    pub const fn capturing(addr: u32) -> Self {
        Self {
            addr,
            sink: SerialSink::Capture(Vec::new()),
            bytes_written: 0,
        }
    }

    /// Returns the device address.
    pub const fn addr(&self) -> u32 {
        self.addr
    }

    /// Emits the low byte of `data` as one character.
    pub fn write_u32(&mut self, data: u32) {
        let byte = (data & 0xFF) as u8;
        self.bytes_written += 1;
        let flush_now = match &mut self.sink {
            SerialSink::Stdout(pending) => {
                pending.push(byte);
                byte == b'\n' || pending.len() >= TX_BUFFER_FLUSH_THRESHOLD
            }
            SerialSink::Capture(buf) => {
                buf.push(byte);
                false
            }
        };
        if flush_now {
            self.flush();
        }
    }

    /// Pushes pending stdout output to the host.
    pub fn flush(&mut self) {
        if let SerialSink::Stdout(pending) = &mut self.sink {
            if pending.is_empty() {
                return;
            }
            let mut out = io::stdout().lock();
            if let Err(e) = out.write_all(pending).and_then(|()| out.flush()) {
                warn!("serial output lost: {e}");
            }
            pending.clear();
        }
    }

    /// Returns captured output; empty when forwarding to stdout.
    pub fn captured(&self) -> &[u8] {
        match &self.sink {
            SerialSink::Capture(buf) => buf,
            SerialSink::Stdout(_) => &[],
        }
    }

    /// Returns the number of characters emitted.
    pub const fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

impl Drop for SerialPort {
    fn drop(&mut self) {
        self.flush();
    }
}
