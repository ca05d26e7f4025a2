use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use dutbench_core::config::HarnessConfig;
use dutbench_core::core::RefCore;
use dutbench_core::sim::{Harness, load_bytes};
use dutbench_core::soc::AddressSpace;
use tempfile::NamedTempFile;
use tracing_subscriber::fmt::MakeWriter;

/// Installs a test subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("debug")
        .try_init();
}

/// Shared buffer that a scoped subscriber formats events into.
#[derive(Clone, Debug, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Returns the formatted output so far.
    pub fn contents(&self) -> String {
        let buf = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Runs `f` under a subscriber of its own and returns its result together
/// with everything logged meanwhile.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let capture = LogCapture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(capture.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();
    let value = tracing::subscriber::with_default(subscriber, f);
    (value, capture.contents())
}

/// Default configuration with a smaller memory window.
pub fn config_with_memory(size: u32) -> HarnessConfig {
    let mut config = HarnessConfig::default();
    config.memory.size = size;
    config
}

/// Encodes instruction words as a little-endian image.
pub fn image(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

/// Writes `data` to a fresh temporary file.
pub fn temp_image(data: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(data).unwrap();
    file.flush().unwrap();
    file
}

/// Address space with captured serial output.
pub fn address_space(config: &HarnessConfig) -> AddressSpace {
    AddressSpace::capturing(config)
}

/// Harness around the reference core with `program` loaded at the memory base.
pub fn ref_harness(config: &HarnessConfig, program: &[u32]) -> Harness<RefCore> {
    init_tracing();
    let mut mem = AddressSpace::capturing(config);
    let _ = load_bytes(&image(program), &mut mem);
    Harness::with_address_space(config, mem, RefCore::from_config(config))
}
