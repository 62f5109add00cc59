use cpu::status_flags::StatusFlags;

#[derive(Debug)]
pub(super) struct Registers {
    // Accumulator
    pub(super) a: u8,

    // X, Y - index registers
    pub(super) x: u8,
    pub(super) y: u8,

    // Offset into the stack page $0100-$01FF
    pub(super) stack_pointer: u8,
    pub(super) program_counter: u16,
    pub(super) status_register: StatusFlags,
}

impl Registers {
    pub(super) fn new(pc: u16) -> Self {
        Registers {
            a: 0x0,
            x: 0x0,
            y: 0x0,
            stack_pointer: 0xFD,
            status_register: StatusFlags::power_on(),
            program_counter: pc,
        }
    }
}

/// A snapshot of everything observable about the CPU from the outside.
///
/// Hosts read this to drive debuggers and can hand one back to
/// `Cpu::reset` to force the CPU into a known state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RegisterState {
    pub program_counter: u16,
    pub stack_pointer: u8,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub status: u8,
    pub cycles: u64,
}

impl RegisterState {
    /// The state nestest.log expects when the automated test starts at $C000
    pub fn nestest() -> Self {
        RegisterState {
            program_counter: 0xC000,
            stack_pointer: 0xFD,
            a: 0x0,
            x: 0x0,
            y: 0x0,
            status: 0x24,
            cycles: 0,
        }
    }
}

impl Default for RegisterState {
    fn default() -> Self {
        RegisterState {
            program_counter: 0x0000,
            stack_pointer: 0xFD,
            a: 0x0,
            x: 0x0,
            y: 0x0,
            status: StatusFlags::power_on().bits(),
            cycles: 0,
        }
    }
}
