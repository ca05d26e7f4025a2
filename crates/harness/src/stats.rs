//! Run statistics collection and reporting.
//!
//! Tracks what a run cost and what it touched:
//! 1. **Cycles:** Reset cycles and running cycles driven by the harness.
//! 2. **Host time:** Wall-clock duration and the resulting simulation rate.
//! 3. **Memory traffic:** Reads, writes, faults and dropped writes seen by the
//!    address space, plus characters emitted on the serial device.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crate::soc::AccessStats;

/// Statistics for one harness run.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Full clock cycles spent in the reset sequence.
    pub reset_cycles: u64,
    /// Full clock cycles spent running after reset release.
    pub cycles: u64,
    /// Fetch events recorded into the itrace ring.
    pub fetches_recorded: u64,
}

impl SimStats {
    /// Starts a new statistics record; host time is measured from now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            reset_cycles: 0,
            cycles: 0,
            fetches_recorded: 0,
        }
    }

    /// Host time elapsed since the record was created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Simulated running cycles per host second, in kHz.
    pub fn khz(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.cycles as f64 / secs / 1_000.0
        } else {
            0.0
        }
    }

    /// Writes a human-readable summary of the run.
    ///
    /// # Errors
    ///
    /// Propagates any error from `out`.
    pub fn print<W: Write + ?Sized>(
        &self,
        mem: &AccessStats,
        serial_bytes: u64,
        out: &mut W,
    ) -> io::Result<()> {
        writeln!(out, "\n==========================================================")?;
        writeln!(out, "HARNESS STATISTICS")?;
        writeln!(out, "==========================================================")?;
        writeln!(out, "host_seconds             {:.4} s", self.elapsed().as_secs_f64())?;
        writeln!(out, "sim_rate                 {:.2} kHz", self.khz())?;
        writeln!(out, "reset_cycles             {}", self.reset_cycles)?;
        writeln!(out, "cycles                   {}", self.cycles)?;
        writeln!(out, "itrace.recorded          {}", self.fetches_recorded)?;
        writeln!(out, "mem.reads                {}", mem.reads)?;
        writeln!(out, "mem.writes               {}", mem.writes)?;
        writeln!(out, "mem.faults               {}", mem.faults)?;
        writeln!(out, "mem.faults_suppressed    {}", mem.suppressed_faults)?;
        writeln!(out, "mem.writes_dropped       {}", mem.dropped_writes)?;
        writeln!(out, "serial.bytes             {serial_bytes}")?;
        Ok(())
    }
}

impl Default for SimStats {
    fn default() -> Self {
        Self::new()
    }
}
