//! # Simulation Driver Tests
//!
//! End-to-end runs on the reference core plus scripted-DUT runs that pin down
//! reset sequencing, fault precedence and itrace capture.

use dutbench_core::common::{AccessFault, ConfigError};
use dutbench_core::common::constants::{EXIT_FAIL, EXIT_PASS, PHYS_MEM_BASE};
use dutbench_core::config::HarnessConfig;
use dutbench_core::sim::{FailureCause, Harness, Phase, RunOutcome};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::builder::*;
use crate::common::harness::{address_space, config_with_memory, init_tracing, ref_harness};
use crate::common::mocks::dut::ScriptedDut;

const BASE: u32 = PHYS_MEM_BASE;
const SMALL: u32 = 0x1000;

fn report<D: dutbench_core::Dut>(harness: &Harness<D>, outcome: &RunOutcome) -> (String, String) {
    let mut out = Vec::new();
    let mut diag = Vec::new();
    harness.report(outcome, &mut out, &mut diag).unwrap();
    (
        String::from_utf8(out).unwrap(),
        String::from_utf8(diag).unwrap(),
    )
}

fn scripted(config: &HarnessConfig, dut: ScriptedDut) -> Harness<ScriptedDut> {
    init_tracing();
    Harness::with_address_space(config, address_space(config), dut)
}

fn fetches(n: u32) -> Vec<(u32, u32)> {
    (0..n).map(|i| (BASE + 4 * i, NOP + (i << 20))).collect()
}

#[test]
fn nops_then_ebreak_pass() {
    let config = HarnessConfig::default();
    let mut harness = ref_harness(&config, &[NOP, NOP, EBREAK]);
    let outcome = harness.run();

    assert_eq!(outcome, RunOutcome::Passed { pc: BASE + 8, cycles: 3 });
    assert_eq!(outcome.exit_code(), EXIT_PASS);
    assert_eq!(harness.phase(), Phase::Passed);

    let (out, diag) = report(&harness, &outcome);
    assert_eq!(out, "EBREAK instruction encountered at pc=0x80000008\nHIT GOOD TRAP\n");
    assert_eq!(diag, "");

    let pcs: Vec<u32> = harness.itrace().snapshot().iter().map(|e| e.pc).collect();
    assert_eq!(pcs, vec![BASE, BASE + 4, BASE + 8]);
}

#[test]
fn nonzero_result_is_bad_trap() {
    let config = config_with_memory(SMALL);
    let mut harness = ref_harness(&config, &[addi(10, 0, 5), EBREAK]);
    let outcome = harness.run();

    assert_eq!(
        outcome,
        RunOutcome::Failed {
            cause: FailureCause::BadTrap { pc: BASE + 4, result: 5 },
            cycles: 2,
        }
    );
    assert_eq!(outcome.exit_code(), EXIT_FAIL);
    assert_eq!(harness.phase(), Phase::Failed);

    let (out, diag) = report(&harness, &outcome);
    assert_eq!(out, "EBREAK instruction encountered at pc=0x80000004\nHIT BAD TRAP\n");
    assert!(diag.contains("result register x10 = 0x5"));
    assert!(diag.contains("=== itrace ==="));
    assert!(diag.contains("  [  0] pc=0x80000000 instr=0x00500513"));
    assert!(diag.contains("  [  1] pc=0x80000004 instr=0x00100073"));
}

#[test]
fn store_past_end_faults_in_its_cycle() {
    let config = config_with_memory(SMALL);
    let mut harness = ref_harness(&config, &[lui(5, BASE + SMALL), sw(0, 5, 16), EBREAK]);
    let outcome = harness.run();

    let fault = AccessFault::ReadOutOfBounds { addr: BASE + SMALL + 16 };
    assert_eq!(
        outcome,
        RunOutcome::Failed {
            cause: FailureCause::MemoryFault(fault),
            cycles: 2,
        }
    );
    assert_eq!(harness.mem().stats().dropped_writes, 1);

    let (out, diag) = report(&harness, &outcome);
    assert_eq!(out, "HIT BAD TRAP\n");
    assert!(diag.starts_with("physical memory read out of bounds: 0x80001010\n"));
    assert!(diag.contains("=== itrace ==="));
    assert_eq!(harness.itrace().total_recorded(), 3);
}

#[test]
fn load_from_unmapped_address_faults() {
    let config = config_with_memory(SMALL);
    let mut harness = ref_harness(&config, &[lw(5, 0, 0x40), EBREAK]);
    let outcome = harness.run();
    assert!(matches!(
        outcome,
        RunOutcome::Failed {
            cause: FailureCause::MemoryFault(AccessFault::ReadOutOfBounds { addr: 0x40 }),
            cycles: 1,
        }
    ));
}

#[test]
fn running_off_the_end_faults() {
    let config = config_with_memory(16);
    let mut harness = ref_harness(&config, &[NOP, NOP, NOP, NOP]);
    let outcome = harness.run();
    assert!(matches!(
        outcome,
        RunOutcome::Failed { cause: FailureCause::MemoryFault(_), cycles: 4 }
    ));
}

#[test]
fn serial_output_through_reference_core() {
    let config = config_with_memory(SMALL);
    let mut harness = ref_harness(
        &config,
        &[
            lui(5, 0xa000_0000),
            addi(6, 0, i32::from(b'h')),
            sb(6, 5, 0x3f8),
            addi(6, 0, i32::from(b'i')),
            sb(6, 5, 0x3f8),
            EBREAK,
        ],
    );
    let outcome = harness.run();
    assert!(outcome.is_pass());
    assert_eq!(harness.mem().serial().captured(), b"hi");
    assert_eq!(harness.mem().stats().faults, 0);
}

#[test]
fn clock_read_through_reference_core() {
    let config = config_with_memory(SMALL);
    let mut harness = ref_harness(&config, &[lui(5, 0xa000_0000), lw(6, 5, 0x48), EBREAK]);
    assert!(harness.run().is_pass());
    assert!(!harness.mem().has_fault());
}

#[test]
fn reset_reports_first_fetch() {
    let config = config_with_memory(SMALL);
    let dut = ScriptedDut::new(vec![(BASE, EBREAK)]);
    let mut harness = scripted(&config, dut);
    assert_eq!(harness.phase(), Phase::ResetLow);

    let after = harness.reset();
    assert_eq!((after.pc, after.instr), (BASE, EBREAK));
    assert_eq!(harness.phase(), Phase::Running);
    assert_eq!(harness.dut().resets_seen, 1);
    assert_eq!(harness.stats().reset_cycles, 2);
    assert!(harness.mem().fault_reporting());
    assert!(harness.itrace().is_empty());
}

#[test]
fn reads_during_reset_do_not_fault() {
    let config = config_with_memory(SMALL);
    let dut = ScriptedDut::new(fetches(2)).read_during_reset(0x10).halt_on(1, 0);
    let mut harness = scripted(&config, dut);
    let outcome = harness.run();

    assert!(outcome.is_pass());
    let results = &harness.dut().read_results;
    assert!(!results.is_empty());
    assert!(results.iter().all(|r| *r == Ok(0)));
    assert!(harness.mem().stats().suppressed_faults > 0);
    assert_eq!(harness.mem().stats().faults, 0);
}

#[test]
fn fault_latched_before_reset_is_discarded() {
    let config = config_with_memory(SMALL);
    let mut mem = address_space(&config);
    assert!(mem.read32(0x4).is_err());
    assert!(mem.has_fault());

    let dut = ScriptedDut::new(fetches(2)).halt_on(1, 0);
    let mut harness = Harness::with_address_space(&config, mem, dut);
    let _ = harness.reset();
    assert!(!harness.mem().has_fault());
    assert!(harness.run().is_pass());
}

#[test]
fn fault_ends_run_with_post_fault_sample() {
    let config = config_with_memory(SMALL);
    let dut = ScriptedDut::new(fetches(8)).read_on(3, 0x4);
    let mut harness = scripted(&config, dut);
    let outcome = harness.run();

    assert_eq!(outcome.cycles(), 3);
    assert_eq!(harness.dut().cycles_run, 3);
    let snap = harness.itrace().snapshot();
    let pcs: Vec<u32> = snap.iter().map(|e| e.pc).collect();
    assert_eq!(pcs, vec![BASE, BASE + 4, BASE + 8, BASE + 12]);
    assert_eq!(snap.last().map(|e| e.index), Some(3));
}

#[test]
fn fault_takes_precedence_over_halt() {
    let config = config_with_memory(SMALL);
    let dut = ScriptedDut::new(fetches(4)).read_on(2, 0x4).halt_on(2, 0);
    let mut harness = scripted(&config, dut);
    let outcome = harness.run();
    assert!(matches!(
        outcome,
        RunOutcome::Failed { cause: FailureCause::MemoryFault(_), cycles: 2 }
    ));
}

#[test]
fn long_run_keeps_last_32_fetches() {
    let config = config_with_memory(SMALL);
    let dut = ScriptedDut::new(fetches(64)).halt_on(40, 1);
    let mut harness = scripted(&config, dut);
    let outcome = harness.run();

    assert!(!outcome.is_pass());
    let itrace = harness.itrace();
    assert_eq!(itrace.total_recorded(), 40);
    assert_eq!(itrace.len(), 32);
    let snap = itrace.snapshot();
    assert_eq!(snap[0].index, 8);
    assert_eq!(snap[0].pc, BASE + 32);
    assert_eq!(snap[31].pc, BASE + 4 * 39);

    let (_, diag) = report(&harness, &outcome);
    let lines: Vec<&str> = diag.lines().filter(|l| l.contains("pc=0x")).collect();
    assert_eq!(lines.len(), 32);
    assert!(lines[0].starts_with("  [  8] pc=0x80000020"));
}

#[test]
fn itrace_can_be_disabled() {
    let mut config = config_with_memory(SMALL);
    config.general.itrace = false;
    let dut = ScriptedDut::new(fetches(4)).halt_on(2, 7);
    let mut harness = scripted(&config, dut);
    let outcome = harness.run();

    assert!(harness.itrace().is_empty());
    assert_eq!(harness.stats().fetches_recorded, 0);
    let (out, diag) = report(&harness, &outcome);
    assert!(out.ends_with("HIT BAD TRAP\n"));
    assert!(!diag.contains("itrace"));
}

#[test]
fn step_after_finish_repeats_outcome() {
    let config = config_with_memory(SMALL);
    let dut = ScriptedDut::new(fetches(4)).halt_on(1, 0);
    let mut harness = scripted(&config, dut);

    let first = harness.step();
    assert!(matches!(first, Some(RunOutcome::Passed { cycles: 1, .. })));
    assert_eq!(harness.step(), first);
    assert_eq!(harness.outcome(), first);
    assert_eq!(harness.dut().cycles_run, 1);
    assert_eq!(harness.stats().cycles, 1);
}

#[test]
fn step_resets_on_first_call() {
    let config = config_with_memory(SMALL);
    let dut = ScriptedDut::new(fetches(4)).halt_on(3, 0);
    let mut harness = scripted(&config, dut);

    assert_eq!(harness.step(), None);
    assert_eq!(harness.phase(), Phase::Running);
    assert_eq!(harness.dut().resets_seen, 1);
    assert_eq!(harness.step(), None);
    assert!(harness.step().is_some_and(|o| o.is_pass()));
}

#[test]
fn custom_result_register() {
    let mut config = config_with_memory(SMALL);
    config.general.result_reg = 11;
    let mut harness = ref_harness(&config, &[addi(10, 0, 5), EBREAK]);
    assert!(harness.run().is_pass());
}

#[rstest]
#[case::x0(0)]
#[case::past_gprs(40)]
fn checked_rejects_unusable_result_register(#[case] reg: usize) {
    let mut config = config_with_memory(SMALL);
    config.general.result_reg = reg;
    let dut = ScriptedDut::new(fetches(2)).halt_on(1, 0);
    let err = Harness::checked(&config, address_space(&config), dut).unwrap_err();
    assert!(matches!(err, ConfigError::ResultRegister(r) if r == reg));
}

#[test]
fn checked_accepts_valid_config() {
    let config = config_with_memory(SMALL);
    let dut = ScriptedDut::new(fetches(2)).halt_on(1, 0);
    let mut harness = Harness::checked(&config, address_space(&config), dut).unwrap();
    assert!(harness.run().is_pass());
}

#[rstest]
#[case(RunOutcome::Passed { pc: 0, cycles: 1 }, 0)]
#[case(RunOutcome::Failed { cause: FailureCause::BadTrap { pc: 0, result: 1 }, cycles: 1 }, 1)]
#[case(
    RunOutcome::Failed {
        cause: FailureCause::MemoryFault(AccessFault::ReadOutOfBounds { addr: 0 }),
        cycles: 1,
    },
    1
)]
fn exit_codes(#[case] outcome: RunOutcome, #[case] code: i32) {
    assert_eq!(outcome.exit_code(), code);
    assert_eq!(outcome.is_pass(), code == 0);
}

#[test]
fn boxed_dut_runs() {
    let config = config_with_memory(SMALL);
    let dut: Box<dyn dutbench_core::Dut> =
        Box::new(ScriptedDut::new(fetches(2)).halt_on(1, 0));
    let mut harness = Harness::with_address_space(&config, address_space(&config), dut);
    assert!(harness.run().is_pass());
}
