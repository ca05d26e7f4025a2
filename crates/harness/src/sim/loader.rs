//! Program image loader.
//!
//! Copies a raw binary image into the address space before simulation. The
//! image has no header: it is a sequence of little-endian 32-bit words written
//! one after another from the memory base.
//!
//! Only a missing or unreadable file is an error. An image larger than memory
//! is truncated and a length that is not a multiple of four drops the trailing
//! bytes; both are diagnosed and the load continues.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{info, warn};

use crate::common::constants::WORD_BYTES;
use crate::common::error::LoadError;
use crate::soc::AddressSpace;

/// Outcome of a successful load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadReport {
    /// Address of the first word (the memory base).
    pub first: u32,
    /// Address of the last word written, `None` for an empty image.
    pub last: Option<u32>,
    /// Number of words written.
    pub words: usize,
    /// The image did not fit and was cut short.
    pub truncated: bool,
    /// Bytes after the last whole word that were not written.
    pub trailing_bytes: usize,
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.last {
            Some(last) => write!(
                f,
                "Successfully loaded instructions to memory. Start addr: {:#010x}, End addr: {:#010x}",
                self.first, last
            ),
            None => write!(
                f,
                "Loaded empty image. Start addr: {:#010x}, no instructions written",
                self.first
            ),
        }
    }
}

/// Reads the image at `path` and writes it into `mem` from the memory base.
///
/// # Errors
///
/// Returns [`LoadError::Open`] if the file cannot be opened and
/// [`LoadError::Read`] if reading it fails.
pub fn load_image(path: impl AsRef<Path>, mem: &mut AddressSpace) -> Result<LoadReport, LoadError> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut bytes = Vec::new();
    let _ = file
        .read_to_end(&mut bytes)
        .map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    let report = load_bytes(&bytes, mem);
    info!(path = %path.display(), words = report.words, "image loaded");
    Ok(report)
}

/// Writes `bytes` into `mem` as little-endian words from the memory base.
///
/// Truncation and trailing bytes are diagnosed independently; an oversized
/// image with a ragged tail gets both warnings.
pub fn load_bytes(bytes: &[u8], mem: &mut AddressSpace) -> LoadReport {
    let base = mem.base();
    let capacity = (mem.size() / WORD_BYTES) as usize;
    let chunks = bytes.chunks_exact(WORD_BYTES as usize);
    let trailing_bytes = chunks.remainder().len();
    let available = chunks.len();

    let mut addr = base;
    let mut last = None;
    let mut words = 0;
    for chunk in chunks.take(capacity) {
        let word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        mem.write(addr, word, WORD_BYTES as u8);
        last = Some(addr);
        words += 1;
        addr = addr.wrapping_add(WORD_BYTES);
    }

    let truncated = available > capacity;
    if truncated {
        warn!(
            "physical memory full: cannot load more instructions ({words} of {available} words written)"
        );
    }
    if trailing_bytes != 0 {
        warn!("incomplete instruction read from file: {trailing_bytes} trailing byte(s) dropped");
    }

    LoadReport {
        first: base,
        last,
        words,
        truncated,
        trailing_bytes,
    }
}
