//! Instruction trace ring (itrace).
//!
//! Keeps the most recent `N` fetch events in a fixed array with a write cursor,
//! so recording never allocates. At termination the ring is read back oldest
//! first, each entry tagged with its position in the overall fetch sequence.

use std::io::{self, Write};

use crate::common::constants::ITRACE_DEPTH;

/// One `(pc, instr)` sample taken from the DUT's outputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FetchEvent {
    /// Program counter output at sampling time.
    pub pc: u32,
    /// Instruction output at sampling time.
    pub instr: u32,
}

/// A retained fetch event with its sequence number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceEntry {
    /// Zero-based index of this event among all events ever recorded.
    pub index: u64,
    /// Program counter.
    pub pc: u32,
    /// Instruction word.
    pub instr: u32,
}

/// Fixed-capacity circular log of fetch events.
#[derive(Clone, Debug)]
pub struct TraceBuffer<const N: usize = ITRACE_DEPTH> {
    events: [FetchEvent; N],
    /// Next slot to overwrite.
    pos: usize,
    total_recorded: u64,
}

impl<const N: usize> TraceBuffer<N> {
    /// Creates an empty ring.
    pub const fn new() -> Self {
        const { assert!(N > 0, "itrace capacity must be non-zero") };
        Self {
            events: [FetchEvent { pc: 0, instr: 0 }; N],
            pos: 0,
            total_recorded: 0,
        }
    }

    /// Records one fetch event, overwriting the oldest once the ring is full.
    pub const fn record(&mut self, pc: u32, instr: u32) {
        self.events[self.pos] = FetchEvent { pc, instr };
        self.pos = (self.pos + 1) % N;
        self.total_recorded += 1;
    }

    /// Returns the ring capacity.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Returns how many events are retained: `min(total_recorded, N)`.
    pub fn len(&self) -> usize {
        usize::try_from(self.total_recorded).map_or(N, |total| total.min(N))
    }

    /// Returns `true` if nothing has been recorded.
    pub const fn is_empty(&self) -> bool {
        self.total_recorded == 0
    }

    /// Returns the number of events ever recorded.
    pub const fn total_recorded(&self) -> u64 {
        self.total_recorded
    }

    /// Returns the retained events, oldest first.
    pub fn snapshot(&self) -> Vec<TraceEntry> {
        let n = self.len();
        let start = (self.pos + N - n) % N;
        let first_index = self.total_recorded - n as u64;
        (0..n)
            .map(|j| {
                let ev = self.events[(start + j) % N];
                TraceEntry {
                    index: first_index + j as u64,
                    pc: ev.pc,
                    instr: ev.instr,
                }
            })
            .collect()
    }

    /// Writes the retained events, oldest first, one per line.
    ///
    /// # Errors
    ///
    /// Propagates any error from `out`.
    pub fn dump<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "\n  === itrace ===")?;
        for entry in self.snapshot() {
            writeln!(
                out,
                "  [{:>3}] pc={:#010x} instr={:#010x}",
                entry.index, entry.pc, entry.instr
            )?;
        }
        Ok(())
    }
}

impl<const N: usize> Default for TraceBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
