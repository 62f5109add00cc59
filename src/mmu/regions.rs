use log::debug;

/// A window of the CPU address space with its own write semantics.
///
/// Regions are stateless, the bus owns the single backing array and
/// passes it in on every access. Regions are consulted in ascending order
/// and the first one whose inclusive `end` is at or above the address
/// owns it.
pub trait MemoryRegion {
    fn name(&self) -> &'static str;

    /// Inclusive upper bound of the region
    fn end(&self) -> u16;

    fn read(&self, memory: &[u8], address: u16) -> u8 {
        memory[address as usize]
    }

    fn write(&self, memory: &mut [u8], address: u16, value: u8) {
        memory[address as usize] = value;
    }
}

const RAM_SIZE: u16 = 0x0800;
const PPU_REGISTER_COUNT: u16 = 8;
const PPU_REGISTERS_START: u16 = 0x2000;
const APU_IO_REGISTERS_START: u16 = 0x4000;

/// $0000-$1FFF: zero page, stack and RAM followed by three mirrors of it
pub(super) struct Ram;

impl MemoryRegion for Ram {
    fn name(&self) -> &'static str {
        "RAM"
    }

    fn end(&self) -> u16 {
        0x1FFF
    }

    fn write(&self, memory: &mut [u8], address: u16, value: u8) {
        let base = address % RAM_SIZE;
        for mirror in 0..4 {
            memory[(base + mirror * RAM_SIZE) as usize] = value;
        }
    }
}

/// $2000-$401F: PPU registers mirrored every 8 bytes up to $3FFF, then
/// the APU & controller registers
pub(super) struct IoRegisters;

impl MemoryRegion for IoRegisters {
    fn name(&self) -> &'static str {
        "IO Registers"
    }

    fn end(&self) -> u16 {
        0x401F
    }

    fn write(&self, memory: &mut [u8], address: u16, value: u8) {
        if address < APU_IO_REGISTERS_START {
            let base = PPU_REGISTERS_START + (address % PPU_REGISTER_COUNT);
            for mirror in (base..APU_IO_REGISTERS_START).step_by(PPU_REGISTER_COUNT as usize) {
                memory[mirror as usize] = value;
            }
        } else {
            memory[address as usize] = value;
        }
    }
}

/// $4020-$5FFF
pub(super) struct ExpansionRom;

impl MemoryRegion for ExpansionRom {
    fn name(&self) -> &'static str {
        "Expansion ROM"
    }

    fn end(&self) -> u16 {
        0x5FFF
    }
}

/// $6000-$7FFF: battery backed on some cartridges, persisting it is up to the host
pub(super) struct SaveRam;

impl MemoryRegion for SaveRam {
    fn name(&self) -> &'static str {
        "Save RAM"
    }

    fn end(&self) -> u16 {
        0x7FFF
    }
}

/// $8000-$FFFF: lower bank at $8000, upper bank at $C000
pub(super) struct Rom;

impl MemoryRegion for Rom {
    fn name(&self) -> &'static str {
        "PRG ROM"
    }

    fn end(&self) -> u16 {
        0xFFFF
    }

    fn write(&self, _: &mut [u8], address: u16, value: u8) {
        debug!("Discarding write to ROM {:04X} = {:02X}", address, value);
    }
}
