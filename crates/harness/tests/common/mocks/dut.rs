use dutbench_core::common::AccessFault;
use dutbench_core::sim::Dut;
use dutbench_core::soc::MemoryPort;

/// A DUT that replays a fixed fetch sequence and performs scripted accesses.
///
/// Cycle 0 is the state right after reset. Every posedge without reset moves
/// to the next cycle and presents `fetches[cycle]` (the last entry repeats).
#[derive(Debug, Default)]
pub struct ScriptedDut {
    clk: bool,
    prev_clk: bool,
    rst: bool,
    cycle: u64,
    pc: u32,
    instr: u32,
    halted: bool,
    result: u32,
    /// `(pc, instr)` presented on each cycle.
    pub fetches: Vec<(u32, u32)>,
    /// Address read on every evaluation while not yet out of reset.
    pub reset_read: Option<u32>,
    /// `(cycle, addr)`: read `addr` on the posedge entering `cycle`.
    pub read_on_cycle: Option<(u64, u32)>,
    /// `(cycle, result)`: halt with `result` on the posedge entering `cycle`.
    pub halt_on_cycle: Option<(u64, u32)>,
    /// Posedges seen with reset high.
    pub resets_seen: u32,
    /// Posedges seen with reset low after the first reset.
    pub cycles_run: u64,
    /// Results of every scripted read, in order.
    pub read_results: Vec<Result<u32, AccessFault>>,
}

impl ScriptedDut {
    pub fn new(fetches: Vec<(u32, u32)>) -> Self {
        Self {
            fetches,
            ..Self::default()
        }
    }

    pub fn halt_on(mut self, cycle: u64, result: u32) -> Self {
        self.halt_on_cycle = Some((cycle, result));
        self
    }

    pub fn read_on(mut self, cycle: u64, addr: u32) -> Self {
        self.read_on_cycle = Some((cycle, addr));
        self
    }

    pub fn read_during_reset(mut self, addr: u32) -> Self {
        self.reset_read = Some(addr);
        self
    }

    fn present(&mut self) {
        let idx = (self.cycle as usize).min(self.fetches.len().saturating_sub(1));
        if let Some(&(pc, instr)) = self.fetches.get(idx) {
            self.pc = pc;
            self.instr = instr;
        }
    }
}

impl Dut for ScriptedDut {
    fn set_clk(&mut self, level: bool) {
        self.clk = level;
    }

    fn set_rst(&mut self, level: bool) {
        self.rst = level;
    }

    fn eval(&mut self, mem: &mut dyn MemoryPort) {
        let posedge = self.clk && !self.prev_clk;
        self.prev_clk = self.clk;

        if let Some(addr) = self.reset_read {
            if self.rst || self.resets_seen == 0 {
                self.read_results.push(mem.read32(addr));
            }
        }

        if !posedge {
            return;
        }
        if self.rst {
            self.resets_seen += 1;
            self.cycle = 0;
            self.halted = false;
            self.present();
            return;
        }
        if self.resets_seen == 0 || self.halted {
            return;
        }

        self.cycle += 1;
        self.cycles_run += 1;
        self.present();
        if let Some((cycle, addr)) = self.read_on_cycle {
            if cycle == self.cycle {
                self.read_results.push(mem.read32(addr));
            }
        }
        if let Some((cycle, result)) = self.halt_on_cycle {
            if cycle == self.cycle {
                self.halted = true;
                self.result = result;
            }
        }
    }

    fn pc(&self) -> u32 {
        self.pc
    }

    fn instr(&self) -> u32 {
        self.instr
    }

    fn halted(&self) -> bool {
        self.halted
    }

    fn read_reg(&self, index: usize) -> u32 {
        if index == 10 { self.result } else { 0 }
    }
}
