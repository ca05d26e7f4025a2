/// Scripted device under test.
pub mod dut;
