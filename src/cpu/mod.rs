mod interrupts;
mod opcodes;
mod registers;
mod status_flags;
mod trace;

pub use cpu::opcodes::{describe, AddressingMode, Opcode, Operation};
pub use cpu::registers::RegisterState;
pub use cpu::status_flags::StatusFlags;
pub use cpu::trace::TraceLine;

use cpu::interrupts::Interrupt;
use cpu::registers::Registers;
use log::{error, info};
use mmu::{MemoryBus, MemoryError};
use std::error::Error;
use std::fmt;

/// This type is used to represent a CPU cycle to make it clearer when
/// we're talking about cycles which type we mean.
pub type CpuCycle = u64;

const STACK_PAGE: u16 = 0x0100;

/// Errors which stop a single instruction from completing.
///
/// Nothing here is recovered from inside the CPU, the host decides whether
/// to halt, skip the instruction or patch memory and carry on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CpuError {
    /// The byte at PC is not one of the 151 documented opcodes
    UnsupportedOpcode(u8),
    Memory(MemoryError),
}
impl Error for CpuError {}
impl fmt::Display for CpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpuError::UnsupportedOpcode(opcode) => write!(f, "Instruction not supported - opcode {:02X}", opcode),
            CpuError::Memory(e) => write!(f, "{}", e),
        }
    }
}
impl From<MemoryError> for CpuError {
    fn from(error: MemoryError) -> Self {
        CpuError::Memory(error)
    }
}

/// The bytes following an opcode, fetched before the instruction executes.
/// Only the first `bytes() - 1` of them are meaningful for a given opcode.
#[derive(Debug, Copy, Clone, Default)]
pub(crate) struct OperandBytes {
    pub(crate) low: u8,
    pub(crate) high: u8,
}

impl OperandBytes {
    fn word(&self) -> u16 {
        self.low as u16 | ((self.high as u16) << 8)
    }
}

/// An effective address along with whether indexing moved it onto another page
#[derive(Debug, Copy, Clone)]
struct EffectiveAddress {
    address: u16,
    page_crossed: bool,
}

impl EffectiveAddress {
    fn direct(address: u16) -> Self {
        EffectiveAddress {
            address,
            page_crossed: false,
        }
    }

    fn indexed(base: u16, index: u8) -> Self {
        let address = base.wrapping_add(index as u16);
        EffectiveAddress {
            address,
            page_crossed: base & 0xFF00 != address & 0xFF00,
        }
    }
}

pub struct Cpu {
    registers: Registers,
    cycles: CpuCycle,
    bus: MemoryBus,
}

impl Cpu {
    /// Power on the CPU, the program counter is taken from the RESET vector
    pub fn new(bus: MemoryBus) -> Result<Self, CpuError> {
        let pc = read_vector(&bus, Interrupt::RESET)?;

        Ok(Cpu {
            registers: Registers::new(pc),
            cycles: 0,
            bus,
        })
    }

    /// Create a CPU already forced into the given state
    pub fn with_state(bus: MemoryBus, state: RegisterState) -> Self {
        let mut cpu = Cpu {
            registers: Registers::new(state.program_counter),
            cycles: 0,
            bus,
        };
        cpu.reset(state);
        cpu
    }

    /// Force every register and the cycle counter to known values, used by
    /// harnesses which need to line up with a reference log
    pub fn reset(&mut self, state: RegisterState) {
        self.registers.program_counter = state.program_counter;
        self.registers.stack_pointer = state.stack_pointer;
        self.registers.a = state.a;
        self.registers.x = state.x;
        self.registers.y = state.y;
        self.registers.status_register = StatusFlags::from_byte(state.status);
        self.cycles = state.cycles;
    }

    pub fn state(&self) -> RegisterState {
        RegisterState {
            program_counter: self.registers.program_counter,
            stack_pointer: self.registers.stack_pointer,
            a: self.registers.a,
            x: self.registers.x,
            y: self.registers.y,
            status: self.registers.status_register.bits(),
            cycles: self.cycles,
        }
    }

    pub fn program_counter(&self) -> u16 {
        self.registers.program_counter
    }

    pub fn stack_pointer(&self) -> u8 {
        self.registers.stack_pointer
    }

    pub fn a(&self) -> u8 {
        self.registers.a
    }

    pub fn x(&self) -> u8 {
        self.registers.x
    }

    pub fn y(&self) -> u8 {
        self.registers.y
    }

    pub fn status(&self) -> StatusFlags {
        self.registers.status_register
    }

    pub fn cycles(&self) -> CpuCycle {
        self.cycles
    }

    pub fn bus(&self) -> &MemoryBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut MemoryBus {
        &mut self.bus
    }

    pub fn into_bus(self) -> MemoryBus {
        self.bus
    }

    /// Execute exactly one instruction, returning the cycles it took.
    ///
    /// On `UnsupportedOpcode` nothing has been modified, PC still points
    /// at the offending byte.
    pub fn step(&mut self) -> Result<CpuCycle, CpuError> {
        let pc = self.registers.program_counter;
        let opcode = self.fetch_opcode(pc)?;
        let operand = self.fetch_operand(pc, opcode)?;

        info!("{}", self.trace_line(pc, opcode, operand));

        let cycles_before = self.cycles;
        self.registers.program_counter = pc.wrapping_add(opcode.bytes() as u16);
        let base_cycles = opcode.execute(self, operand)?;
        self.cycles += base_cycles;

        Ok(self.cycles - cycles_before)
    }

    /// Trace line for the instruction at PC, without executing it
    pub fn trace_next(&self) -> Result<TraceLine, CpuError> {
        let pc = self.registers.program_counter;
        let opcode = self.fetch_opcode(pc)?;
        let operand = self.fetch_operand(pc, opcode)?;

        Ok(self.trace_line(pc, opcode, operand))
    }

    fn fetch_opcode(&self, pc: u16) -> Result<&'static Opcode, CpuError> {
        let byte = self.bus.read(pc)?;
        describe(byte).map_err(|e| {
            error!("Unsupported opcode {:02X} at {:04X}", byte, pc);
            e
        })
    }

    fn fetch_operand(&self, pc: u16, opcode: &Opcode) -> Result<OperandBytes, MemoryError> {
        let mut operand = OperandBytes::default();
        if opcode.bytes() > 1 {
            operand.low = self.bus.read(pc.wrapping_add(1))?;
        }
        if opcode.bytes() > 2 {
            operand.high = self.bus.read(pc.wrapping_add(2))?;
        }

        Ok(operand)
    }

    fn trace_line(&self, pc: u16, opcode: &Opcode, operand: OperandBytes) -> TraceLine {
        TraceLine::new(pc, opcode, operand, &self.state())
    }

    fn read_byte(&self, address: u16) -> Result<u8, MemoryError> {
        self.bus.read(address)
    }

    fn write_byte(&mut self, address: u16, value: u8) -> Result<(), MemoryError> {
        self.bus.write(address, value)
    }

    fn push_to_stack(&mut self, value: u8) -> Result<(), MemoryError> {
        self.write_byte(self.registers.stack_pointer as u16 | STACK_PAGE, value)?;
        self.registers.stack_pointer = self.registers.stack_pointer.wrapping_sub(1);
        Ok(())
    }

    fn pop_from_stack(&mut self) -> Result<u8, MemoryError> {
        self.registers.stack_pointer = self.registers.stack_pointer.wrapping_add(1);
        self.read_byte(self.registers.stack_pointer as u16 | STACK_PAGE)
    }

    /// High byte first so that the low byte ends up at the lower address
    fn push_word_to_stack(&mut self, value: u16) -> Result<(), MemoryError> {
        self.push_to_stack((value >> 8) as u8)?;
        self.push_to_stack(value as u8)
    }

    fn pop_word_from_stack(&mut self) -> Result<u16, MemoryError> {
        let low = self.pop_from_stack()?;
        let high = self.pop_from_stack()?;
        Ok(low as u16 | ((high as u16) << 8))
    }

    fn read_zero_page_word(&self, pointer: u8) -> Result<u16, MemoryError> {
        let low = self.read_byte(pointer as u16)?;
        let high = self.read_byte(pointer.wrapping_add(1) as u16)?;
        Ok(low as u16 | ((high as u16) << 8))
    }

    /// Address computation shared by the read & write paths, no cycles are charged here
    fn effective_address(&self, mode: AddressingMode, operand: OperandBytes) -> Result<EffectiveAddress, MemoryError> {
        Ok(match mode {
            AddressingMode::ZeroPage => EffectiveAddress::direct(operand.low as u16),
            // Zero page indexing never leaves page zero
            AddressingMode::ZeroPageXIndexed => {
                EffectiveAddress::direct(operand.low.wrapping_add(self.registers.x) as u16)
            }
            AddressingMode::ZeroPageYIndexed => {
                EffectiveAddress::direct(operand.low.wrapping_add(self.registers.y) as u16)
            }
            AddressingMode::Absolute => EffectiveAddress::direct(operand.word()),
            AddressingMode::AbsoluteXIndexed => EffectiveAddress::indexed(operand.word(), self.registers.x),
            AddressingMode::AbsoluteYIndexed => EffectiveAddress::indexed(operand.word(), self.registers.y),
            AddressingMode::IndirectXIndexed => EffectiveAddress::direct(
                self.read_zero_page_word(operand.low.wrapping_add(self.registers.x))?,
            ),
            AddressingMode::IndirectYIndexed => {
                EffectiveAddress::indexed(self.read_zero_page_word(operand.low)?, self.registers.y)
            }
            AddressingMode::Indirect => {
                // The 6502 never carries into the pointer high byte, a pointer
                // at $xxFF takes its high byte from $xx00
                let pointer = operand.word();
                let low = self.read_byte(pointer)?;
                let high = self.read_byte((pointer & 0xFF00) | (pointer.wrapping_add(1) & 0x00FF))?;
                EffectiveAddress::direct(low as u16 | ((high as u16) << 8))
            }
            AddressingMode::Accumulator
            | AddressingMode::Immediate
            | AddressingMode::Implied
            | AddressingMode::Relative => panic!("{:?} mode has no effective address", mode), // Coding bug, see OPCODE_TABLE
        })
    }

    /// Read path address resolution, charges a cycle if indexing crossed a page
    fn load_address(&mut self, mode: AddressingMode, operand: OperandBytes) -> Result<u16, MemoryError> {
        let effective_address = self.effective_address(mode, operand)?;
        if effective_address.page_crossed {
            self.cycles += 1;
        }

        Ok(effective_address.address)
    }

    fn load(&mut self, mode: AddressingMode, operand: OperandBytes) -> Result<u8, MemoryError> {
        match mode {
            AddressingMode::Immediate => Ok(operand.low),
            AddressingMode::Accumulator => Ok(self.registers.a),
            _ => {
                let address = self.load_address(mode, operand)?;
                self.read_byte(address)
            }
        }
    }

    /// Write path, indexed stores never pay the page crossing cycle
    fn store(&mut self, mode: AddressingMode, operand: OperandBytes, value: u8) -> Result<(), MemoryError> {
        let effective_address = self.effective_address(mode, operand)?;
        self.write_byte(effective_address.address, value)
    }

    /// Apply `operation` to the accumulator or to memory depending on the addressing mode
    fn read_modify_write<F>(&mut self, mode: AddressingMode, operand: OperandBytes, operation: F) -> Result<(), MemoryError>
    where
        F: FnOnce(&mut Cpu, u8) -> u8,
    {
        match mode {
            AddressingMode::Accumulator => {
                let a = self.registers.a;
                self.registers.a = operation(self, a);
            }
            _ => {
                let address = self.load_address(mode, operand)?;
                let value = self.read_byte(address)?;
                let result = operation(self, value);
                self.write_byte(address, result)?;
            }
        }

        Ok(())
    }

    fn branch(&mut self, condition: bool, operand: OperandBytes) {
        if condition {
            let next_instruction = self.registers.program_counter;
            let target = next_instruction.wrapping_add(operand.low as i8 as u16);

            self.cycles += if target & 0xFF00 == next_instruction & 0xFF00 { 1 } else { 2 };
            self.registers.program_counter = target;
        }
    }

    fn adc(&mut self, operand: u8) {
        let result: u16 = match self.registers.status_register.contains(StatusFlags::CARRY_FLAG) {
            true => 1u16 + self.registers.a as u16 + operand as u16,
            false => self.registers.a as u16 + operand as u16,
        };
        self.registers.status_register.set(
            StatusFlags::OVERFLOW_FLAG,
            (self.registers.a as u16 ^ result) & (operand as u16 ^ result) & 0x80 > 0,
        );
        self.registers.a = (result & 0xFF) as u8;
        self.set_negative_zero_flags(self.registers.a);
        self.registers
            .status_register
            .set(StatusFlags::CARRY_FLAG, result > u8::MAX as u16);
    }

    fn sbc(&mut self, operand: u8) {
        let borrow = match self.registers.status_register.contains(StatusFlags::CARRY_FLAG) {
            true => 0i16,
            false => 1i16,
        };
        let result = self.registers.a as i16 - operand as i16 - borrow;
        let truncated = result as u8;

        // Overflow when the operands differ in sign and the result's sign differs from A's
        self.registers.status_register.set(
            StatusFlags::OVERFLOW_FLAG,
            (self.registers.a ^ operand) & (self.registers.a ^ truncated) & 0x80 != 0,
        );
        self.registers
            .status_register
            .set(StatusFlags::CARRY_FLAG, result >= 0);
        self.registers.a = truncated;
        self.set_negative_zero_flags(truncated);
    }

    fn compare(&mut self, operand: u8, register: u8) {
        let result = register.wrapping_sub(operand);
        self.registers
            .status_register
            .set(StatusFlags::CARRY_FLAG, register >= operand);
        self.set_negative_zero_flags(result);
    }

    fn bit(&mut self, operand: u8) {
        let result = self.registers.a & operand;
        self.registers
            .status_register
            .set(StatusFlags::ZERO_FLAG, result == 0);
        self.registers
            .status_register
            .set(StatusFlags::OVERFLOW_FLAG, operand & 0b0100_0000 != 0);
        self.registers
            .status_register
            .set(StatusFlags::NEGATIVE_FLAG, operand & 0b1000_0000 != 0);
    }

    fn asl(&mut self, operand: u8) -> u8 {
        let result = operand << 1;
        self.registers
            .status_register
            .set(StatusFlags::CARRY_FLAG, operand & 0b1000_0000 != 0);
        self.set_negative_zero_flags(result);

        result
    }

    fn lsr(&mut self, operand: u8) -> u8 {
        let result = operand >> 1;
        self.registers
            .status_register
            .set(StatusFlags::CARRY_FLAG, operand & 1 == 1);
        self.set_negative_zero_flags(result);

        result
    }

    fn rol(&mut self, operand: u8) -> u8 {
        let mut result = operand << 1;
        if self.registers.status_register.contains(StatusFlags::CARRY_FLAG) {
            result |= 1;
        }
        self.registers
            .status_register
            .set(StatusFlags::CARRY_FLAG, operand & 0b1000_0000 != 0);
        self.set_negative_zero_flags(result);

        result
    }

    fn ror(&mut self, operand: u8) -> u8 {
        let mut result = operand >> 1;
        if self.registers.status_register.contains(StatusFlags::CARRY_FLAG) {
            result |= 0b1000_0000;
        }
        self.registers
            .status_register
            .set(StatusFlags::CARRY_FLAG, operand & 1 == 1);
        self.set_negative_zero_flags(result);

        result
    }

    fn decrement(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.set_negative_zero_flags(result);

        result
    }

    fn increment(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.set_negative_zero_flags(result);

        result
    }

    fn set_negative_zero_flags(&mut self, operand: u8) {
        self.registers.status_register.set_zero_negative(operand);
    }
}

fn read_vector(bus: &MemoryBus, interrupt: Interrupt) -> Result<u16, MemoryError> {
    let low = bus.read(interrupt.offset())?;
    let high = bus.read(interrupt.offset().wrapping_add(1))?;
    Ok(low as u16 | ((high as u16) << 8))
}
