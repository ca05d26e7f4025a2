//! Simulation driver.
//!
//! Owns the DUT, the address space and the itrace ring, and walks the run
//! through its phases:
//!
//! `ResetLow -> ResetHigh -> ResetReleased -> Running -> {Passed | Failed}`
//!
//! 1. **Reset:** One cycle with reset low and fault reporting off, one cycle with
//!    reset high, then reset low again with fault reporting on.
//! 2. **Running:** Each iteration samples `(pc, instr)` into the itrace, advances
//!    one full clock cycle and checks for a latched memory fault or a halt.
//! 3. **Termination:** A fault fails the run after one more itrace sample. A halt
//!    passes the run if the result register is zero and fails it otherwise.
//!
//! The driver never exits the process; callers map [`RunOutcome::exit_code`].

use std::io::{self, Write};

use tracing::{debug, error, info};

use crate::common::constants::{
    BAD_TRAP_MARKER, EXIT_FAIL, EXIT_PASS, GOOD_TRAP_MARKER, ITRACE_DEPTH,
};
use crate::common::error::{AccessFault, ConfigError};
use crate::config::HarnessConfig;
use crate::sim::dut::Dut;
use crate::sim::itrace::{FetchEvent, TraceBuffer};
use crate::soc::AddressSpace;
use crate::stats::SimStats;

/// Position of the run in the reset/termination state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Not yet reset; reset low, fault reporting off.
    ResetLow,
    /// Reset asserted for one cycle.
    ResetHigh,
    /// Reset released, fault reporting on.
    ResetReleased,
    /// Executing the program.
    Running,
    /// Halted with a zero result register.
    Passed,
    /// Faulted, or halted with a non-zero result register.
    Failed,
}

/// Why a run failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureCause {
    /// The DUT halted with a non-zero result register.
    BadTrap {
        /// Program counter at the halt.
        pc: u32,
        /// Result register value.
        result: u32,
    },
    /// The DUT read outside the memory window.
    MemoryFault(AccessFault),
}

/// Terminal state of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The DUT halted with a zero result register.
    Passed {
        /// Program counter at the halt.
        pc: u32,
        /// Running cycles simulated.
        cycles: u64,
    },
    /// The run failed.
    Failed {
        /// What went wrong.
        cause: FailureCause,
        /// Running cycles simulated.
        cycles: u64,
    },
}

impl RunOutcome {
    /// Process exit status for this outcome: 0 for pass, 1 for fail.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Passed { .. } => EXIT_PASS,
            Self::Failed { .. } => EXIT_FAIL,
        }
    }

    /// Returns `true` for a passing run.
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Passed { .. })
    }

    /// Running cycles simulated before termination.
    pub const fn cycles(&self) -> u64 {
        match *self {
            Self::Passed { cycles, .. } | Self::Failed { cycles, .. } => cycles,
        }
    }
}

/// Test harness: one DUT, one address space, one itrace ring.
#[derive(Debug)]
pub struct Harness<D: Dut> {
    dut: D,
    mem: AddressSpace,
    itrace: TraceBuffer<ITRACE_DEPTH>,
    itrace_enabled: bool,
    result_reg: usize,
    phase: Phase,
    outcome: Option<RunOutcome>,
    stats: SimStats,
}

impl<D: Dut> Harness<D> {
    /// Creates a harness with a fresh address space built from `config`.
    ///
    /// `config` is expected to have passed [`HarnessConfig::validate`]; use
    /// [`Harness::checked`] for a configuration assembled in code.
    pub fn new(config: &HarnessConfig, dut: D) -> Self {
        Self::with_address_space(config, AddressSpace::new(config), dut)
    }

    /// Validates `config`, then creates a harness around `mem`.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] from [`HarnessConfig::validate`].
    pub fn checked(config: &HarnessConfig, mem: AddressSpace, dut: D) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_address_space(config, mem, dut))
    }

    /// Creates a harness around an existing address space.
    ///
    /// As with [`Harness::new`], `config` is not validated here.
    pub fn with_address_space(config: &HarnessConfig, mem: AddressSpace, dut: D) -> Self {
        Self {
            dut,
            mem,
            itrace: TraceBuffer::new(),
            itrace_enabled: config.general.itrace,
            result_reg: config.general.result_reg,
            phase: Phase::ResetLow,
            outcome: None,
            stats: SimStats::new(),
        }
    }

    /// Returns the address space.
    pub const fn mem(&self) -> &AddressSpace {
        &self.mem
    }

    /// Returns the address space mutably, e.g. for loading an image.
    pub const fn mem_mut(&mut self) -> &mut AddressSpace {
        &mut self.mem
    }

    /// Returns the DUT.
    pub const fn dut(&self) -> &D {
        &self.dut
    }

    /// Returns the DUT mutably.
    pub const fn dut_mut(&mut self) -> &mut D {
        &mut self.dut
    }

    /// Returns the itrace ring.
    pub const fn itrace(&self) -> &TraceBuffer<ITRACE_DEPTH> {
        &self.itrace
    }

    /// Returns the current phase.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the terminal outcome once the run has finished.
    pub const fn outcome(&self) -> Option<RunOutcome> {
        self.outcome
    }

    /// Returns the run statistics.
    pub const fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Advances one full clock cycle: clock low then evaluate, clock high then
    /// evaluate.
    fn single_cycle(&mut self) {
        self.dut.set_clk(false);
        self.dut.eval(&mut self.mem);
        self.dut.set_clk(true);
        self.dut.eval(&mut self.mem);
    }

    /// Samples the DUT's fetch outputs into the itrace ring.
    fn record_itrace(&mut self) {
        if self.itrace_enabled {
            self.itrace.record(self.dut.pc(), self.dut.instr());
            self.stats.fetches_recorded += 1;
        }
    }

    /// Runs the reset sequence and returns the DUT's `(pc, instr)` afterwards.
    ///
    /// Reads outside the window are not reported as faults until reset is
    /// released. Writes are checked throughout. A fault latched before reset
    /// is discarded.
    pub fn reset(&mut self) -> FetchEvent {
        self.phase = Phase::ResetLow;
        self.mem.set_fault_reporting(false);
        self.dut.set_rst(false);
        self.single_cycle();

        self.phase = Phase::ResetHigh;
        self.dut.set_rst(true);
        self.single_cycle();
        self.stats.reset_cycles += 2;

        self.phase = Phase::ResetReleased;
        self.dut.set_rst(false);
        if let Some(stale) = self.mem.take_fault() {
            debug!("discarding {stale} latched before reset");
        }
        self.mem.set_fault_reporting(true);

        let after = FetchEvent {
            pc: self.dut.pc(),
            instr: self.dut.instr(),
        };
        info!(pc = after.pc, instr = after.instr, "reset released");
        self.phase = Phase::Running;
        after
    }

    /// Runs one iteration of the main loop.
    ///
    /// Resets the DUT first if that has not happened. Returns the outcome once
    /// the run reaches a terminal phase; further calls return it again without
    /// clocking the DUT.
    pub fn step(&mut self) -> Option<RunOutcome> {
        if let Some(outcome) = self.outcome {
            return Some(outcome);
        }
        if self.phase != Phase::Running {
            let _ = self.reset();
        }

        self.record_itrace();
        self.single_cycle();
        self.stats.cycles += 1;

        if let Some(fault) = self.mem.take_fault() {
            self.record_itrace();
            error!(cycle = self.stats.cycles, "run aborted on {fault}");
            return Some(self.finish(RunOutcome::Failed {
                cause: FailureCause::MemoryFault(fault),
                cycles: self.stats.cycles,
            }));
        }

        if self.dut.halted() {
            let pc = self.dut.pc();
            let result = self.dut.read_reg(self.result_reg);
            debug!(pc, result, "halt");
            let outcome = if result == 0 {
                RunOutcome::Passed {
                    pc,
                    cycles: self.stats.cycles,
                }
            } else {
                error!(pc, result, "bad trap");
                RunOutcome::Failed {
                    cause: FailureCause::BadTrap { pc, result },
                    cycles: self.stats.cycles,
                }
            };
            return Some(self.finish(outcome));
        }
        None
    }

    /// Runs until the DUT passes, fails or faults.
    pub fn run(&mut self) -> RunOutcome {
        loop {
            if let Some(outcome) = self.step() {
                return outcome;
            }
        }
    }

    fn finish(&mut self, outcome: RunOutcome) -> RunOutcome {
        self.phase = if outcome.is_pass() {
            Phase::Passed
        } else {
            Phase::Failed
        };
        self.mem.serial_mut().flush();
        info!(
            cycles = outcome.cycles(),
            exit_code = outcome.exit_code(),
            "run finished"
        );
        self.outcome = Some(outcome);
        outcome
    }

    /// Writes the termination report.
    ///
    /// Halts report the breakpoint PC and a good or bad trap marker on `out`.
    /// Every failure also dumps the itrace ring on `diag`.
    ///
    /// # Errors
    ///
    /// Propagates any error from the writers.
    pub fn report<O, E>(&self, outcome: &RunOutcome, out: &mut O, diag: &mut E) -> io::Result<()>
    where
        O: Write + ?Sized,
        E: Write + ?Sized,
    {
        match *outcome {
            RunOutcome::Passed { pc, .. } => {
                writeln!(out, "EBREAK instruction encountered at pc={pc:#x}")?;
                writeln!(out, "{GOOD_TRAP_MARKER}")?;
            }
            RunOutcome::Failed { cause, .. } => {
                match cause {
                    FailureCause::BadTrap { pc, result } => {
                        writeln!(out, "EBREAK instruction encountered at pc={pc:#x}")?;
                        writeln!(diag, "result register x{} = {result:#x}", self.result_reg)?;
                    }
                    FailureCause::MemoryFault(fault) => writeln!(diag, "{fault}")?,
                }
                writeln!(out, "{BAD_TRAP_MARKER}")?;
                out.flush()?;
                if self.itrace_enabled {
                    self.itrace.dump(diag)?;
                }
            }
        }
        out.flush()
    }
}
