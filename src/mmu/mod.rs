mod regions;

pub use mmu::regions::MemoryRegion;

use log::debug;
use mmu::regions::{ExpansionRom, IoRegisters, Ram, Rom, SaveRam};
use std::error::Error;
use std::fmt;

pub const MEMORY_SIZE: usize = 0x10000;
pub const PRG_BANK_SIZE: usize = 0x4000;

const PRG_LOWER_BANK: u16 = 0x8000;
const PRG_UPPER_BANK: u16 = 0xC000;

/// Ascending by upper bound, address decoding depends on this order
const REGIONS: [&'static dyn MemoryRegion; 5] = [&Ram, &IoRegisters, &ExpansionRom, &SaveRam, &Rom];

/// Raised when an access falls outside every region
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MemoryError {
    UnmappedAddress(u32),
}
impl Error for MemoryError {}
impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryError::UnmappedAddress(address) => write!(f, "Unmapped memory location {:X}", address),
        }
    }
}

/// The 2A03's 64KB address space.
///
/// A single array backs every region, mirrors are materialised on write so
/// that reads are always a direct lookup.
pub struct MemoryBus {
    memory: Box<[u8]>,
}

impl MemoryBus {
    pub fn new() -> Self {
        MemoryBus {
            memory: vec![0; MEMORY_SIZE].into_boxed_slice(),
        }
    }

    fn region_for(address: u16) -> Result<&'static dyn MemoryRegion, MemoryError> {
        REGIONS
            .iter()
            .find(|region| address <= region.end())
            .cloned()
            .ok_or(MemoryError::UnmappedAddress(address as u32))
    }

    pub fn read(&self, address: u16) -> Result<u8, MemoryError> {
        Ok(MemoryBus::region_for(address)?.read(&self.memory, address))
    }

    pub fn write(&mut self, address: u16, value: u8) -> Result<(), MemoryError> {
        debug!("CPU address space write {:04X} = {:02X}", address, value);

        MemoryBus::region_for(address)?.write(&mut self.memory, address, value);
        Ok(())
    }

    /// Name of the region which owns an address, for debuggers
    pub fn region_name(&self, address: u16) -> Result<&'static str, MemoryError> {
        Ok(MemoryBus::region_for(address)?.name())
    }

    /// Copy bytes straight into the backing array, ignoring region rules.
    ///
    /// This is how a host places program images into ROM. Nothing is
    /// written if the image would run past $FFFF.
    pub fn load(&mut self, address: u16, bytes: &[u8]) -> Result<(), MemoryError> {
        let start = address as usize;
        let end = start + bytes.len();
        if end > MEMORY_SIZE {
            return Err(MemoryError::UnmappedAddress(MEMORY_SIZE as u32));
        }

        self.memory[start..end].copy_from_slice(bytes);
        Ok(())
    }

    /// Place a single 16KB PRG bank at both $8000 and $C000 so that the
    /// vectors at the top of memory come from that bank
    pub fn load_prg_bank(&mut self, bank: &[u8]) -> Result<(), MemoryError> {
        let bank = &bank[..bank.len().min(PRG_BANK_SIZE)];
        self.load(PRG_LOWER_BANK, bank)?;
        self.load(PRG_UPPER_BANK, bank)
    }

    /// Read only view of the full address space
    pub fn memory(&self) -> &[u8] {
        &self.memory
    }
}

impl Default for MemoryBus {
    fn default() -> Self {
        MemoryBus::new()
    }
}
