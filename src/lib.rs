#[macro_use]
extern crate bitflags;
extern crate log;

pub mod cpu;
pub mod mmu;

pub use cpu::{Cpu, CpuError, RegisterState};
pub use mmu::MemoryBus;

/// Step the CPU `instructions` times and return the cycles consumed,
/// stopping at the first instruction which fails
pub fn run_headless_instructions(cpu: &mut Cpu, instructions: usize) -> Result<u64, CpuError> {
    let start = cpu.cycles();

    for _ in 0..instructions {
        cpu.step()?;
    }

    Ok(cpu.cycles() - start)
}
