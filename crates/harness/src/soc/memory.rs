//! Physical memory backing store.
//!
//! A zero-initialized byte array mapped at a base address. All multi-byte
//! accesses are little-endian. Bounds are checked against the whole access,
//! not just its first byte.

/// Backing storage for the memory window.
#[derive(Debug)]
pub struct PhysMemory {
    /// First address of the window.
    base: u32,
    /// Window contents; `data.len()` is the window size.
    data: Vec<u8>,
}

impl PhysMemory {
    /// Allocates a zeroed window of `size` bytes at `base`.
    pub fn new(base: u32, size: u32) -> Self {
        Self {
            base,
            data: vec![0; size as usize],
        }
    }

    /// Returns the first address of the window.
    pub const fn base(&self) -> u32 {
        self.base
    }

    /// Returns the window length in bytes.
    pub fn size(&self) -> u32 {
        self.data.len() as u32
    }

    /// Returns one past the last address, widened so it cannot wrap.
    pub fn end(&self) -> u64 {
        u64::from(self.base) + self.data.len() as u64
    }

    /// Translates `[addr, addr + len)` to a storage offset.
    ///
    /// Returns `None` unless the whole range lies inside the window.
    pub fn offset(&self, addr: u32, len: u32) -> Option<usize> {
        if addr < self.base || u64::from(addr) + u64::from(len) > self.end() {
            return None;
        }
        Some((addr - self.base) as usize)
    }

    /// Reads four bytes at `offset` and assembles them little-endian.
    ///
    /// The caller has already bounds-checked the access through [`Self::offset`].
    pub fn read_u32(&self, offset: usize) -> u32 {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.data[offset..offset + 4]);
        u32::from_le_bytes(bytes)
    }

    /// Stores the low `len` bytes of `data` little-endian at `offset`.
    pub fn write_le(&mut self, offset: usize, data: u32, len: usize) {
        let bytes = data.to_le_bytes();
        self.data[offset..offset + len].copy_from_slice(&bytes[..len]);
    }

    /// Returns the byte at `addr` without side effects, if it is in the window.
    pub fn peek(&self, addr: u32) -> Option<u8> {
        self.offset(addr, 1).map(|off| self.data[off])
    }

    /// Returns the whole window contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}
