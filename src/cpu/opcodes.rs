use cpu::interrupts::Interrupt;
use cpu::status_flags::StatusFlags;
use cpu::{read_vector, Cpu, CpuCycle, CpuError, OperandBytes};
use mmu::MemoryError;

/// RTI is charged the same as BRK, not the 6 cycles in its table entry
const BRK_CYCLES: CpuCycle = 7;

/// One documented instruction: what it does, how it addresses memory and
/// what it costs before any page crossing or branch penalties.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Opcode {
    pub(super) opcode: u8,
    pub(super) operation: Operation,
    pub(super) address_mode: AddressingMode,
    pub(super) cycles: CpuCycle,
}

impl Opcode {
    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn address_mode(&self) -> AddressingMode {
        self.address_mode
    }

    /// Three letter mnemonic e.g. "LDA"
    pub fn mnemonic(&self) -> String {
        format!("{:?}", self.operation)
    }

    /// Length of the instruction including the opcode byte
    pub fn bytes(&self) -> u8 {
        match self.address_mode.instruction_length() {
            InstructionLength::OneByte => 1,
            InstructionLength::TwoByte => 2,
            InstructionLength::ThreeByte => 3,
        }
    }

    pub fn base_cycles(&self) -> CpuCycle {
        self.cycles
    }

    /// Run the instruction against the CPU. PC has already been moved past
    /// the instruction by the time this is called.
    ///
    /// Returns the fixed cycle cost, page crossing and branch penalties are
    /// added to the CPU's counter directly as they happen.
    pub(super) fn execute(&self, cpu: &mut Cpu, operand: OperandBytes) -> Result<CpuCycle, MemoryError> {
        let mode = self.address_mode;

        match self.operation {
            Operation::ADC => {
                let value = cpu.load(mode, operand)?;
                cpu.adc(value);
            }
            Operation::AND => {
                let value = cpu.load(mode, operand)?;
                cpu.registers.a &= value;
                cpu.set_negative_zero_flags(cpu.registers.a);
            }
            Operation::ASL => cpu.read_modify_write(mode, operand, Cpu::asl)?,
            Operation::BCC => {
                let condition = !cpu.registers.status_register.contains(StatusFlags::CARRY_FLAG);
                cpu.branch(condition, operand);
            }
            Operation::BCS => {
                let condition = cpu.registers.status_register.contains(StatusFlags::CARRY_FLAG);
                cpu.branch(condition, operand);
            }
            Operation::BEQ => {
                let condition = cpu.registers.status_register.contains(StatusFlags::ZERO_FLAG);
                cpu.branch(condition, operand);
            }
            Operation::BIT => {
                let value = cpu.load(mode, operand)?;
                cpu.bit(value);
            }
            Operation::BMI => {
                let condition = cpu.registers.status_register.contains(StatusFlags::NEGATIVE_FLAG);
                cpu.branch(condition, operand);
            }
            Operation::BNE => {
                let condition = !cpu.registers.status_register.contains(StatusFlags::ZERO_FLAG);
                cpu.branch(condition, operand);
            }
            Operation::BPL => {
                let condition = !cpu.registers.status_register.contains(StatusFlags::NEGATIVE_FLAG);
                cpu.branch(condition, operand);
            }
            Operation::BRK => {
                // Skipped entirely while interrupts are disabled
                if cpu.registers.status_register.contains(StatusFlags::INTERRUPT_DISABLE_FLAG) {
                    return Ok(0);
                }

                let pushed_status = cpu.registers.status_register.pushed_copy();
                cpu.push_word_to_stack(cpu.registers.program_counter)?;
                cpu.push_to_stack(pushed_status)?;
                cpu.registers
                    .status_register
                    .insert(StatusFlags::INTERRUPT_DISABLE_FLAG | StatusFlags::BREAK_FLAG);
                cpu.registers.program_counter = read_vector(&cpu.bus, Interrupt::IRQ_BRK)?;
            }
            Operation::BVC => {
                let condition = !cpu.registers.status_register.contains(StatusFlags::OVERFLOW_FLAG);
                cpu.branch(condition, operand);
            }
            Operation::BVS => {
                let condition = cpu.registers.status_register.contains(StatusFlags::OVERFLOW_FLAG);
                cpu.branch(condition, operand);
            }
            Operation::CLC => cpu.registers.status_register.remove(StatusFlags::CARRY_FLAG),
            Operation::CLD => cpu.registers.status_register.remove(StatusFlags::DECIMAL_FLAG),
            Operation::CLI => cpu
                .registers
                .status_register
                .remove(StatusFlags::INTERRUPT_DISABLE_FLAG),
            Operation::CLV => cpu.registers.status_register.remove(StatusFlags::OVERFLOW_FLAG),
            Operation::CMP => {
                let value = cpu.load(mode, operand)?;
                cpu.compare(value, cpu.registers.a);
            }
            Operation::CPX => {
                let value = cpu.load(mode, operand)?;
                cpu.compare(value, cpu.registers.x);
            }
            Operation::CPY => {
                let value = cpu.load(mode, operand)?;
                cpu.compare(value, cpu.registers.y);
            }
            Operation::DEC => cpu.read_modify_write(mode, operand, Cpu::decrement)?,
            Operation::DEX => cpu.registers.x = cpu.decrement(cpu.registers.x),
            Operation::DEY => cpu.registers.y = cpu.decrement(cpu.registers.y),
            Operation::EOR => {
                let value = cpu.load(mode, operand)?;
                cpu.registers.a ^= value;
                cpu.set_negative_zero_flags(cpu.registers.a);
            }
            Operation::INC => cpu.read_modify_write(mode, operand, Cpu::increment)?,
            Operation::INX => cpu.registers.x = cpu.increment(cpu.registers.x),
            Operation::INY => cpu.registers.y = cpu.increment(cpu.registers.y),
            Operation::JMP => {
                cpu.registers.program_counter = cpu.effective_address(mode, operand)?.address;
            }
            Operation::JSR => {
                // Return address is the last byte of the JSR itself
                let return_address = cpu.registers.program_counter.wrapping_sub(1);
                cpu.push_word_to_stack(return_address)?;
                cpu.registers.program_counter = operand.word();
            }
            Operation::LDA => {
                cpu.registers.a = cpu.load(mode, operand)?;
                cpu.set_negative_zero_flags(cpu.registers.a);
            }
            Operation::LDX => {
                cpu.registers.x = cpu.load(mode, operand)?;
                cpu.set_negative_zero_flags(cpu.registers.x);
            }
            Operation::LDY => {
                cpu.registers.y = cpu.load(mode, operand)?;
                cpu.set_negative_zero_flags(cpu.registers.y);
            }
            Operation::LSR => cpu.read_modify_write(mode, operand, Cpu::lsr)?,
            Operation::NOP => {}
            Operation::ORA => {
                let value = cpu.load(mode, operand)?;
                cpu.registers.a |= value;
                cpu.set_negative_zero_flags(cpu.registers.a);
            }
            Operation::PHA => cpu.push_to_stack(cpu.registers.a)?,
            Operation::PHP => {
                let pushed_status = cpu.registers.status_register.pushed_copy();
                cpu.push_to_stack(pushed_status)?;
            }
            Operation::PLA => {
                cpu.registers.a = cpu.pop_from_stack()?;
                cpu.set_negative_zero_flags(cpu.registers.a);
            }
            Operation::PLP => {
                let mut status = StatusFlags::from_byte(cpu.pop_from_stack()?);
                status.remove(StatusFlags::BREAK_FLAG);
                status.insert(StatusFlags::UNUSED_FLAG);
                cpu.registers.status_register = status;
            }
            Operation::ROL => cpu.read_modify_write(mode, operand, Cpu::rol)?,
            Operation::ROR => cpu.read_modify_write(mode, operand, Cpu::ror)?,
            Operation::RTI => {
                let mut status = StatusFlags::from_byte(cpu.pop_from_stack()?);
                status.insert(StatusFlags::UNUSED_FLAG);
                cpu.registers.status_register = status;
                cpu.registers.program_counter = cpu.pop_word_from_stack()?;

                return Ok(BRK_CYCLES);
            }
            Operation::RTS => {
                cpu.registers.program_counter = cpu.pop_word_from_stack()?.wrapping_add(1);
            }
            Operation::SBC => {
                let value = cpu.load(mode, operand)?;
                cpu.sbc(value);
            }
            Operation::SEC => cpu.registers.status_register.insert(StatusFlags::CARRY_FLAG),
            Operation::SED => cpu.registers.status_register.insert(StatusFlags::DECIMAL_FLAG),
            Operation::SEI => cpu
                .registers
                .status_register
                .insert(StatusFlags::INTERRUPT_DISABLE_FLAG),
            Operation::STA => cpu.store(mode, operand, cpu.registers.a)?,
            Operation::STX => cpu.store(mode, operand, cpu.registers.x)?,
            Operation::STY => cpu.store(mode, operand, cpu.registers.y)?,
            Operation::TAX => {
                cpu.registers.x = cpu.registers.a;
                cpu.set_negative_zero_flags(cpu.registers.x);
            }
            Operation::TAY => {
                cpu.registers.y = cpu.registers.a;
                cpu.set_negative_zero_flags(cpu.registers.y);
            }
            Operation::TSX => {
                cpu.registers.x = cpu.registers.stack_pointer;
                cpu.set_negative_zero_flags(cpu.registers.x);
            }
            Operation::TXA => {
                cpu.registers.a = cpu.registers.x;
                cpu.set_negative_zero_flags(cpu.registers.a);
            }
            Operation::TXS => cpu.registers.stack_pointer = cpu.registers.x,
            Operation::TYA => {
                cpu.registers.a = cpu.registers.y;
                cpu.set_negative_zero_flags(cpu.registers.a);
            }
        }

        Ok(self.cycles)
    }
}

/// Look up the table entry for an opcode byte
pub fn describe(opcode: u8) -> Result<&'static Opcode, CpuError> {
    OPCODE_TABLE[opcode as usize]
        .as_ref()
        .ok_or(CpuError::UnsupportedOpcode(opcode))
}

#[derive(Debug)]
pub(super) enum InstructionLength {
    OneByte,
    TwoByte,
    ThreeByte,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AddressingMode {
    Accumulator,
    Absolute,
    AbsoluteXIndexed,
    AbsoluteYIndexed,
    Immediate,
    Implied,
    Indirect,
    IndirectXIndexed,
    IndirectYIndexed,
    Relative,
    ZeroPage,
    ZeroPageXIndexed,
    ZeroPageYIndexed,
}

impl AddressingMode {
    pub(super) fn instruction_length(&self) -> InstructionLength {
        match self {
            AddressingMode::Accumulator => InstructionLength::OneByte,
            AddressingMode::Absolute => InstructionLength::ThreeByte,
            AddressingMode::AbsoluteXIndexed => InstructionLength::ThreeByte,
            AddressingMode::AbsoluteYIndexed => InstructionLength::ThreeByte,
            AddressingMode::Immediate => InstructionLength::TwoByte,
            AddressingMode::Implied => InstructionLength::OneByte,
            AddressingMode::Indirect => InstructionLength::ThreeByte,
            AddressingMode::IndirectXIndexed => InstructionLength::TwoByte,
            AddressingMode::IndirectYIndexed => InstructionLength::TwoByte,
            AddressingMode::Relative => InstructionLength::TwoByte,
            AddressingMode::ZeroPage => InstructionLength::TwoByte,
            AddressingMode::ZeroPageXIndexed => InstructionLength::TwoByte,
            AddressingMode::ZeroPageYIndexed => InstructionLength::TwoByte,
        }
    }
}

/// The 56 documented 6502 operations
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operation {
    ADC,
    AND,
    ASL,
    BCC,
    BCS,
    BEQ,
    BIT,
    BMI,
    BNE,
    BPL,
    BRK,
    BVC,
    BVS,
    CLC,
    CLD,
    CLI,
    CLV,
    CMP,
    CPX,
    CPY,
    DEC,
    DEX,
    DEY,
    EOR,
    INC,
    INX,
    INY,
    JMP,
    JSR,
    LDA,
    LDX,
    LDY,
    LSR,
    NOP,
    ORA,
    PHA,
    PHP,
    PLA,
    PLP,
    ROL,
    ROR,
    RTI,
    RTS,
    SBC,
    SEC,
    SED,
    SEI,
    STA,
    STX,
    STY,
    TAX,
    TAY,
    TSX,
    TXA,
    TXS,
    TYA,
}

/// Indexed by opcode byte, `None` marks the undocumented opcodes
static OPCODE_TABLE: [Option<Opcode>; 0x100] = [
    // 0x00-0x0F
    Some(Opcode {
        opcode: 0x00,
        operation: Operation::BRK,
        address_mode: AddressingMode::Implied,
        cycles: 7,
    }),
    Some(Opcode {
        opcode: 0x01,
        operation: Operation::ORA,
        address_mode: AddressingMode::IndirectXIndexed,
        cycles: 6,
    }),
    None, // 0x02
    None, // 0x03
    None, // 0x04
    Some(Opcode {
        opcode: 0x05,
        operation: Operation::ORA,
        address_mode: AddressingMode::ZeroPage,
        cycles: 3,
    }),
    Some(Opcode {
        opcode: 0x06,
        operation: Operation::ASL,
        address_mode: AddressingMode::ZeroPage,
        cycles: 5,
    }),
    None, // 0x07
    Some(Opcode {
        opcode: 0x08,
        operation: Operation::PHP,
        address_mode: AddressingMode::Implied,
        cycles: 3,
    }),
    Some(Opcode {
        opcode: 0x09,
        operation: Operation::ORA,
        address_mode: AddressingMode::Immediate,
        cycles: 2,
    }),
    Some(Opcode {
        opcode: 0x0A,
        operation: Operation::ASL,
        address_mode: AddressingMode::Accumulator,
        cycles: 2,
    }),
    None, // 0x0B
    None, // 0x0C
    Some(Opcode {
        opcode: 0x0D,
        operation: Operation::ORA,
        address_mode: AddressingMode::Absolute,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0x0E,
        operation: Operation::ASL,
        address_mode: AddressingMode::Absolute,
        cycles: 6,
    }),
    None, // 0x0F
    // 0x10-0x1F
    Some(Opcode {
        opcode: 0x10,
        operation: Operation::BPL,
        address_mode: AddressingMode::Relative,
        cycles: 2,
    }),
    Some(Opcode {
        opcode: 0x11,
        operation: Operation::ORA,
        address_mode: AddressingMode::IndirectYIndexed,
        cycles: 5,
    }),
    None, // 0x12
    None, // 0x13
    None, // 0x14
    Some(Opcode {
        opcode: 0x15,
        operation: Operation::ORA,
        address_mode: AddressingMode::ZeroPageXIndexed,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0x16,
        operation: Operation::ASL,
        address_mode: AddressingMode::ZeroPageXIndexed,
        cycles: 6,
    }),
    None, // 0x17
    Some(Opcode {
        opcode: 0x18,
        operation: Operation::CLC,
        address_mode: AddressingMode::Implied,
        cycles: 2,
    }),
    Some(Opcode {
        opcode: 0x19,
        operation: Operation::ORA,
        address_mode: AddressingMode::AbsoluteYIndexed,
        cycles: 4,
    }),
    None, // 0x1A
    None, // 0x1B
    None, // 0x1C
    Some(Opcode {
        opcode: 0x1D,
        operation: Operation::ORA,
        address_mode: AddressingMode::AbsoluteXIndexed,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0x1E,
        operation: Operation::ASL,
        address_mode: AddressingMode::AbsoluteXIndexed,
        cycles: 7,
    }),
    None, // 0x1F
    // 0x20-0x2F
    Some(Opcode {
        opcode: 0x20,
        operation: Operation::JSR,
        address_mode: AddressingMode::Absolute,
        cycles: 6,
    }),
    Some(Opcode {
        opcode: 0x21,
        operation: Operation::AND,
        address_mode: AddressingMode::IndirectXIndexed,
        cycles: 6,
    }),
    None, // 0x22
    None, // 0x23
    Some(Opcode {
        opcode: 0x24,
        operation: Operation::BIT,
        address_mode: AddressingMode::ZeroPage,
        cycles: 3,
    }),
    Some(Opcode {
        opcode: 0x25,
        operation: Operation::AND,
        address_mode: AddressingMode::ZeroPage,
        cycles: 3,
    }),
    Some(Opcode {
        opcode: 0x26,
        operation: Operation::ROL,
        address_mode: AddressingMode::ZeroPage,
        cycles: 5,
    }),
    None, // 0x27
    Some(Opcode {
        opcode: 0x28,
        operation: Operation::PLP,
        address_mode: AddressingMode::Implied,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0x29,
        operation: Operation::AND,
        address_mode: AddressingMode::Immediate,
        cycles: 2,
    }),
    Some(Opcode {
        opcode: 0x2A,
        operation: Operation::ROL,
        address_mode: AddressingMode::Accumulator,
        cycles: 2,
    }),
    None, // 0x2B
    Some(Opcode {
        opcode: 0x2C,
        operation: Operation::BIT,
        address_mode: AddressingMode::Absolute,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0x2D,
        operation: Operation::AND,
        address_mode: AddressingMode::Absolute,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0x2E,
        operation: Operation::ROL,
        address_mode: AddressingMode::Absolute,
        cycles: 6,
    }),
    None, // 0x2F
    // 0x30-0x3F
    Some(Opcode {
        opcode: 0x30,
        operation: Operation::BMI,
        address_mode: AddressingMode::Relative,
        cycles: 2,
    }),
    Some(Opcode {
        opcode: 0x31,
        operation: Operation::AND,
        address_mode: AddressingMode::IndirectYIndexed,
        cycles: 5,
    }),
    None, // 0x32
    None, // 0x33
    None, // 0x34
    Some(Opcode {
        opcode: 0x35,
        operation: Operation::AND,
        address_mode: AddressingMode::ZeroPageXIndexed,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0x36,
        operation: Operation::ROL,
        address_mode: AddressingMode::ZeroPageXIndexed,
        cycles: 6,
    }),
    None, // 0x37
    Some(Opcode {
        opcode: 0x38,
        operation: Operation::SEC,
        address_mode: AddressingMode::Implied,
        cycles: 2,
    }),
    Some(Opcode {
        opcode: 0x39,
        operation: Operation::AND,
        address_mode: AddressingMode::AbsoluteYIndexed,
        cycles: 4,
    }),
    None, // 0x3A
    None, // 0x3B
    None, // 0x3C
    Some(Opcode {
        opcode: 0x3D,
        operation: Operation::AND,
        address_mode: AddressingMode::AbsoluteXIndexed,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0x3E,
        operation: Operation::ROL,
        address_mode: AddressingMode::AbsoluteXIndexed,
        cycles: 7,
    }),
    None, // 0x3F
    // 0x40-0x4F
    Some(Opcode {
        opcode: 0x40,
        operation: Operation::RTI,
        address_mode: AddressingMode::Implied,
        cycles: 6,
    }),
    Some(Opcode {
        opcode: 0x41,
        operation: Operation::EOR,
        address_mode: AddressingMode::IndirectXIndexed,
        cycles: 6,
    }),
    None, // 0x42
    None, // 0x43
    None, // 0x44
    Some(Opcode {
        opcode: 0x45,
        operation: Operation::EOR,
        address_mode: AddressingMode::ZeroPage,
        cycles: 3,
    }),
    Some(Opcode {
        opcode: 0x46,
        operation: Operation::LSR,
        address_mode: AddressingMode::ZeroPage,
        cycles: 5,
    }),
    None, // 0x47
    Some(Opcode {
        opcode: 0x48,
        operation: Operation::PHA,
        address_mode: AddressingMode::Implied,
        cycles: 3,
    }),
    Some(Opcode {
        opcode: 0x49,
        operation: Operation::EOR,
        address_mode: AddressingMode::Immediate,
        cycles: 2,
    }),
    Some(Opcode {
        opcode: 0x4A,
        operation: Operation::LSR,
        address_mode: AddressingMode::Accumulator,
        cycles: 2,
    }),
    None, // 0x4B
    Some(Opcode {
        opcode: 0x4C,
        operation: Operation::JMP,
        address_mode: AddressingMode::Absolute,
        cycles: 3,
    }),
    Some(Opcode {
        opcode: 0x4D,
        operation: Operation::EOR,
        address_mode: AddressingMode::Absolute,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0x4E,
        operation: Operation::LSR,
        address_mode: AddressingMode::Absolute,
        cycles: 6,
    }),
    None, // 0x4F
    // 0x50-0x5F
    Some(Opcode {
        opcode: 0x50,
        operation: Operation::BVC,
        address_mode: AddressingMode::Relative,
        cycles: 2,
    }),
    Some(Opcode {
        opcode: 0x51,
        operation: Operation::EOR,
        address_mode: AddressingMode::IndirectYIndexed,
        cycles: 5,
    }),
    None, // 0x52
    None, // 0x53
    None, // 0x54
    Some(Opcode {
        opcode: 0x55,
        operation: Operation::EOR,
        address_mode: AddressingMode::ZeroPageXIndexed,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0x56,
        operation: Operation::LSR,
        address_mode: AddressingMode::ZeroPageXIndexed,
        cycles: 6,
    }),
    None, // 0x57
    Some(Opcode {
        opcode: 0x58,
        operation: Operation::CLI,
        address_mode: AddressingMode::Implied,
        cycles: 2,
    }),
    Some(Opcode {
        opcode: 0x59,
        operation: Operation::EOR,
        address_mode: AddressingMode::AbsoluteYIndexed,
        cycles: 4,
    }),
    None, // 0x5A
    None, // 0x5B
    None, // 0x5C
    Some(Opcode {
        opcode: 0x5D,
        operation: Operation::EOR,
        address_mode: AddressingMode::AbsoluteXIndexed,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0x5E,
        operation: Operation::LSR,
        address_mode: AddressingMode::AbsoluteXIndexed,
        cycles: 7,
    }),
    None, // 0x5F
    // 0x60-0x6F
    Some(Opcode {
        opcode: 0x60,
        operation: Operation::RTS,
        address_mode: AddressingMode::Implied,
        cycles: 6,
    }),
    Some(Opcode {
        opcode: 0x61,
        operation: Operation::ADC,
        address_mode: AddressingMode::IndirectXIndexed,
        cycles: 6,
    }),
    None, // 0x62
    None, // 0x63
    None, // 0x64
    Some(Opcode {
        opcode: 0x65,
        operation: Operation::ADC,
        address_mode: AddressingMode::ZeroPage,
        cycles: 3,
    }),
    Some(Opcode {
        opcode: 0x66,
        operation: Operation::ROR,
        address_mode: AddressingMode::ZeroPage,
        cycles: 5,
    }),
    None, // 0x67
    Some(Opcode {
        opcode: 0x68,
        operation: Operation::PLA,
        address_mode: AddressingMode::Implied,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0x69,
        operation: Operation::ADC,
        address_mode: AddressingMode::Immediate,
        cycles: 2,
    }),
    Some(Opcode {
        opcode: 0x6A,
        operation: Operation::ROR,
        address_mode: AddressingMode::Accumulator,
        cycles: 2,
    }),
    None, // 0x6B
    Some(Opcode {
        opcode: 0x6C,
        operation: Operation::JMP,
        address_mode: AddressingMode::Indirect,
        cycles: 5,
    }),
    Some(Opcode {
        opcode: 0x6D,
        operation: Operation::ADC,
        address_mode: AddressingMode::Absolute,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0x6E,
        operation: Operation::ROR,
        address_mode: AddressingMode::Absolute,
        cycles: 6,
    }),
    None, // 0x6F
    // 0x70-0x7F
    Some(Opcode {
        opcode: 0x70,
        operation: Operation::BVS,
        address_mode: AddressingMode::Relative,
        cycles: 2,
    }),
    Some(Opcode {
        opcode: 0x71,
        operation: Operation::ADC,
        address_mode: AddressingMode::IndirectYIndexed,
        cycles: 5,
    }),
    None, // 0x72
    None, // 0x73
    None, // 0x74
    Some(Opcode {
        opcode: 0x75,
        operation: Operation::ADC,
        address_mode: AddressingMode::ZeroPageXIndexed,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0x76,
        operation: Operation::ROR,
        address_mode: AddressingMode::ZeroPageXIndexed,
        cycles: 6,
    }),
    None, // 0x77
    Some(Opcode {
        opcode: 0x78,
        operation: Operation::SEI,
        address_mode: AddressingMode::Implied,
        cycles: 2,
    }),
    Some(Opcode {
        opcode: 0x79,
        operation: Operation::ADC,
        address_mode: AddressingMode::AbsoluteYIndexed,
        cycles: 4,
    }),
    None, // 0x7A
    None, // 0x7B
    None, // 0x7C
    Some(Opcode {
        opcode: 0x7D,
        operation: Operation::ADC,
        address_mode: AddressingMode::AbsoluteXIndexed,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0x7E,
        operation: Operation::ROR,
        address_mode: AddressingMode::AbsoluteXIndexed,
        cycles: 7,
    }),
    None, // 0x7F
    // 0x80-0x8F
    None, // 0x80
    Some(Opcode {
        opcode: 0x81,
        operation: Operation::STA,
        address_mode: AddressingMode::IndirectXIndexed,
        cycles: 6,
    }),
    None, // 0x82
    None, // 0x83
    Some(Opcode {
        opcode: 0x84,
        operation: Operation::STY,
        address_mode: AddressingMode::ZeroPage,
        cycles: 3,
    }),
    Some(Opcode {
        opcode: 0x85,
        operation: Operation::STA,
        address_mode: AddressingMode::ZeroPage,
        cycles: 3,
    }),
    Some(Opcode {
        opcode: 0x86,
        operation: Operation::STX,
        address_mode: AddressingMode::ZeroPage,
        cycles: 3,
    }),
    None, // 0x87
    Some(Opcode {
        opcode: 0x88,
        operation: Operation::DEY,
        address_mode: AddressingMode::Implied,
        cycles: 2,
    }),
    None, // 0x89
    Some(Opcode {
        opcode: 0x8A,
        operation: Operation::TXA,
        address_mode: AddressingMode::Implied,
        cycles: 2,
    }),
    None, // 0x8B
    Some(Opcode {
        opcode: 0x8C,
        operation: Operation::STY,
        address_mode: AddressingMode::Absolute,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0x8D,
        operation: Operation::STA,
        address_mode: AddressingMode::Absolute,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0x8E,
        operation: Operation::STX,
        address_mode: AddressingMode::Absolute,
        cycles: 4,
    }),
    None, // 0x8F
    // 0x90-0x9F
    Some(Opcode {
        opcode: 0x90,
        operation: Operation::BCC,
        address_mode: AddressingMode::Relative,
        cycles: 2,
    }),
    Some(Opcode {
        opcode: 0x91,
        operation: Operation::STA,
        address_mode: AddressingMode::IndirectYIndexed,
        cycles: 6,
    }),
    None, // 0x92
    None, // 0x93
    Some(Opcode {
        opcode: 0x94,
        operation: Operation::STY,
        address_mode: AddressingMode::ZeroPageXIndexed,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0x95,
        operation: Operation::STA,
        address_mode: AddressingMode::ZeroPageXIndexed,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0x96,
        operation: Operation::STX,
        address_mode: AddressingMode::ZeroPageYIndexed,
        cycles: 4,
    }),
    None, // 0x97
    Some(Opcode {
        opcode: 0x98,
        operation: Operation::TYA,
        address_mode: AddressingMode::Implied,
        cycles: 2,
    }),
    Some(Opcode {
        opcode: 0x99,
        operation: Operation::STA,
        address_mode: AddressingMode::AbsoluteYIndexed,
        cycles: 5,
    }),
    Some(Opcode {
        opcode: 0x9A,
        operation: Operation::TXS,
        address_mode: AddressingMode::Implied,
        cycles: 2,
    }),
    None, // 0x9B
    None, // 0x9C
    Some(Opcode {
        opcode: 0x9D,
        operation: Operation::STA,
        address_mode: AddressingMode::AbsoluteXIndexed,
        cycles: 5,
    }),
    None, // 0x9E
    None, // 0x9F
    // 0xA0-0xAF
    Some(Opcode {
        opcode: 0xA0,
        operation: Operation::LDY,
        address_mode: AddressingMode::Immediate,
        cycles: 2,
    }),
    Some(Opcode {
        opcode: 0xA1,
        operation: Operation::LDA,
        address_mode: AddressingMode::IndirectXIndexed,
        cycles: 6,
    }),
    Some(Opcode {
        opcode: 0xA2,
        operation: Operation::LDX,
        address_mode: AddressingMode::Immediate,
        cycles: 2,
    }),
    None, // 0xA3
    Some(Opcode {
        opcode: 0xA4,
        operation: Operation::LDY,
        address_mode: AddressingMode::ZeroPage,
        cycles: 3,
    }),
    Some(Opcode {
        opcode: 0xA5,
        operation: Operation::LDA,
        address_mode: AddressingMode::ZeroPage,
        cycles: 3,
    }),
    Some(Opcode {
        opcode: 0xA6,
        operation: Operation::LDX,
        address_mode: AddressingMode::ZeroPage,
        cycles: 3,
    }),
    None, // 0xA7
    Some(Opcode {
        opcode: 0xA8,
        operation: Operation::TAY,
        address_mode: AddressingMode::Implied,
        cycles: 2,
    }),
    Some(Opcode {
        opcode: 0xA9,
        operation: Operation::LDA,
        address_mode: AddressingMode::Immediate,
        cycles: 2,
    }),
    Some(Opcode {
        opcode: 0xAA,
        operation: Operation::TAX,
        address_mode: AddressingMode::Implied,
        cycles: 2,
    }),
    None, // 0xAB
    Some(Opcode {
        opcode: 0xAC,
        operation: Operation::LDY,
        address_mode: AddressingMode::Absolute,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0xAD,
        operation: Operation::LDA,
        address_mode: AddressingMode::Absolute,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0xAE,
        operation: Operation::LDX,
        address_mode: AddressingMode::Absolute,
        cycles: 4,
    }),
    None, // 0xAF
    // 0xB0-0xBF
    Some(Opcode {
        opcode: 0xB0,
        operation: Operation::BCS,
        address_mode: AddressingMode::Relative,
        cycles: 2,
    }),
    Some(Opcode {
        opcode: 0xB1,
        operation: Operation::LDA,
        address_mode: AddressingMode::IndirectYIndexed,
        cycles: 5,
    }),
    None, // 0xB2
    None, // 0xB3
    Some(Opcode {
        opcode: 0xB4,
        operation: Operation::LDY,
        address_mode: AddressingMode::ZeroPageXIndexed,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0xB5,
        operation: Operation::LDA,
        address_mode: AddressingMode::ZeroPageXIndexed,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0xB6,
        operation: Operation::LDX,
        address_mode: AddressingMode::ZeroPageYIndexed,
        cycles: 4,
    }),
    None, // 0xB7
    Some(Opcode {
        opcode: 0xB8,
        operation: Operation::CLV,
        address_mode: AddressingMode::Implied,
        cycles: 2,
    }),
    Some(Opcode {
        opcode: 0xB9,
        operation: Operation::LDA,
        address_mode: AddressingMode::AbsoluteYIndexed,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0xBA,
        operation: Operation::TSX,
        address_mode: AddressingMode::Implied,
        cycles: 2,
    }),
    None, // 0xBB
    Some(Opcode {
        opcode: 0xBC,
        operation: Operation::LDY,
        address_mode: AddressingMode::AbsoluteXIndexed,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0xBD,
        operation: Operation::LDA,
        address_mode: AddressingMode::AbsoluteXIndexed,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0xBE,
        operation: Operation::LDX,
        address_mode: AddressingMode::AbsoluteYIndexed,
        cycles: 4,
    }),
    None, // 0xBF
    // 0xC0-0xCF
    Some(Opcode {
        opcode: 0xC0,
        operation: Operation::CPY,
        address_mode: AddressingMode::Immediate,
        cycles: 2,
    }),
    Some(Opcode {
        opcode: 0xC1,
        operation: Operation::CMP,
        address_mode: AddressingMode::IndirectXIndexed,
        cycles: 6,
    }),
    None, // 0xC2
    None, // 0xC3
    Some(Opcode {
        opcode: 0xC4,
        operation: Operation::CPY,
        address_mode: AddressingMode::ZeroPage,
        cycles: 3,
    }),
    Some(Opcode {
        opcode: 0xC5,
        operation: Operation::CMP,
        address_mode: AddressingMode::ZeroPage,
        cycles: 3,
    }),
    Some(Opcode {
        opcode: 0xC6,
        operation: Operation::DEC,
        address_mode: AddressingMode::ZeroPage,
        cycles: 5,
    }),
    None, // 0xC7
    Some(Opcode {
        opcode: 0xC8,
        operation: Operation::INY,
        address_mode: AddressingMode::Implied,
        cycles: 2,
    }),
    Some(Opcode {
        opcode: 0xC9,
        operation: Operation::CMP,
        address_mode: AddressingMode::Immediate,
        cycles: 2,
    }),
    Some(Opcode {
        opcode: 0xCA,
        operation: Operation::DEX,
        address_mode: AddressingMode::Implied,
        cycles: 2,
    }),
    None, // 0xCB
    Some(Opcode {
        opcode: 0xCC,
        operation: Operation::CPY,
        address_mode: AddressingMode::Absolute,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0xCD,
        operation: Operation::CMP,
        address_mode: AddressingMode::Absolute,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0xCE,
        operation: Operation::DEC,
        address_mode: AddressingMode::Absolute,
        cycles: 6,
    }),
    None, // 0xCF
    // 0xD0-0xDF
    Some(Opcode {
        opcode: 0xD0,
        operation: Operation::BNE,
        address_mode: AddressingMode::Relative,
        cycles: 2,
    }),
    Some(Opcode {
        opcode: 0xD1,
        operation: Operation::CMP,
        address_mode: AddressingMode::IndirectYIndexed,
        cycles: 5,
    }),
    None, // 0xD2
    None, // 0xD3
    None, // 0xD4
    Some(Opcode {
        opcode: 0xD5,
        operation: Operation::CMP,
        address_mode: AddressingMode::ZeroPageXIndexed,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0xD6,
        operation: Operation::DEC,
        address_mode: AddressingMode::ZeroPageXIndexed,
        cycles: 6,
    }),
    None, // 0xD7
    Some(Opcode {
        opcode: 0xD8,
        operation: Operation::CLD,
        address_mode: AddressingMode::Implied,
        cycles: 2,
    }),
    Some(Opcode {
        opcode: 0xD9,
        operation: Operation::CMP,
        address_mode: AddressingMode::AbsoluteYIndexed,
        cycles: 4,
    }),
    None, // 0xDA
    None, // 0xDB
    None, // 0xDC
    Some(Opcode {
        opcode: 0xDD,
        operation: Operation::CMP,
        address_mode: AddressingMode::AbsoluteXIndexed,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0xDE,
        operation: Operation::DEC,
        address_mode: AddressingMode::AbsoluteXIndexed,
        cycles: 7,
    }),
    None, // 0xDF
    // 0xE0-0xEF
    Some(Opcode {
        opcode: 0xE0,
        operation: Operation::CPX,
        address_mode: AddressingMode::Immediate,
        cycles: 2,
    }),
    Some(Opcode {
        opcode: 0xE1,
        operation: Operation::SBC,
        address_mode: AddressingMode::IndirectXIndexed,
        cycles: 6,
    }),
    None, // 0xE2
    None, // 0xE3
    Some(Opcode {
        opcode: 0xE4,
        operation: Operation::CPX,
        address_mode: AddressingMode::ZeroPage,
        cycles: 3,
    }),
    Some(Opcode {
        opcode: 0xE5,
        operation: Operation::SBC,
        address_mode: AddressingMode::ZeroPage,
        cycles: 3,
    }),
    Some(Opcode {
        opcode: 0xE6,
        operation: Operation::INC,
        address_mode: AddressingMode::ZeroPage,
        cycles: 5,
    }),
    None, // 0xE7
    Some(Opcode {
        opcode: 0xE8,
        operation: Operation::INX,
        address_mode: AddressingMode::Implied,
        cycles: 2,
    }),
    Some(Opcode {
        opcode: 0xE9,
        operation: Operation::SBC,
        address_mode: AddressingMode::Immediate,
        cycles: 2,
    }),
    Some(Opcode {
        opcode: 0xEA,
        operation: Operation::NOP,
        address_mode: AddressingMode::Implied,
        cycles: 2,
    }),
    None, // 0xEB
    Some(Opcode {
        opcode: 0xEC,
        operation: Operation::CPX,
        address_mode: AddressingMode::Absolute,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0xED,
        operation: Operation::SBC,
        address_mode: AddressingMode::Absolute,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0xEE,
        operation: Operation::INC,
        address_mode: AddressingMode::Absolute,
        cycles: 6,
    }),
    None, // 0xEF
    // 0xF0-0xFF
    Some(Opcode {
        opcode: 0xF0,
        operation: Operation::BEQ,
        address_mode: AddressingMode::Relative,
        cycles: 2,
    }),
    Some(Opcode {
        opcode: 0xF1,
        operation: Operation::SBC,
        address_mode: AddressingMode::IndirectYIndexed,
        cycles: 5,
    }),
    None, // 0xF2
    None, // 0xF3
    None, // 0xF4
    Some(Opcode {
        opcode: 0xF5,
        operation: Operation::SBC,
        address_mode: AddressingMode::ZeroPageXIndexed,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0xF6,
        operation: Operation::INC,
        address_mode: AddressingMode::ZeroPageXIndexed,
        cycles: 6,
    }),
    None, // 0xF7
    Some(Opcode {
        opcode: 0xF8,
        operation: Operation::SED,
        address_mode: AddressingMode::Implied,
        cycles: 2,
    }),
    Some(Opcode {
        opcode: 0xF9,
        operation: Operation::SBC,
        address_mode: AddressingMode::AbsoluteYIndexed,
        cycles: 4,
    }),
    None, // 0xFA
    None, // 0xFB
    None, // 0xFC
    Some(Opcode {
        opcode: 0xFD,
        operation: Operation::SBC,
        address_mode: AddressingMode::AbsoluteXIndexed,
        cycles: 4,
    }),
    Some(Opcode {
        opcode: 0xFE,
        operation: Operation::INC,
        address_mode: AddressingMode::AbsoluteXIndexed,
        cycles: 7,
    }),
    None, // 0xFF
];

#[cfg(test)]
mod test {
    use super::{describe, AddressingMode, Operation, OPCODE_TABLE};
    use cpu::{Cpu, CpuError, RegisterState, StatusFlags};
    use mmu::MemoryBus;

    /// CPU at $C000 in the nestest state with `program` placed there
    fn cpu_with_program(program: &[u8]) -> Cpu {
        let mut bus = MemoryBus::new();
        bus.load(0xC000, program).unwrap();
        Cpu::with_state(bus, RegisterState::nestest())
    }

    #[test]
    fn test_table_has_all_documented_opcodes() {
        assert_eq!(OPCODE_TABLE.iter().filter(|o| o.is_some()).count(), 151);
        for (byte, entry) in OPCODE_TABLE.iter().enumerate() {
            if let Some(opcode) = entry {
                assert_eq!(opcode.opcode as usize, byte);
            }
        }
    }

    #[test]
    fn test_describe() {
        let lda = describe(0xBD).unwrap();
        assert_eq!(lda.operation(), Operation::LDA);
        assert_eq!(lda.address_mode(), AddressingMode::AbsoluteXIndexed);
        assert_eq!(lda.mnemonic(), "LDA");
        assert_eq!(lda.bytes(), 3);
        assert_eq!(lda.base_cycles(), 4);

        assert_eq!(describe(0x0A).unwrap().bytes(), 1);
        assert_eq!(describe(0x10).unwrap().bytes(), 2);
        assert_eq!(describe(0x6C).unwrap().address_mode(), AddressingMode::Indirect);
        assert_eq!(describe(0x02), Err(CpuError::UnsupportedOpcode(0x02)));
        assert_eq!(describe(0xFF), Err(CpuError::UnsupportedOpcode(0xFF)));
    }

    #[test]
    fn test_unsupported_opcode_leaves_state_untouched() {
        let mut cpu = cpu_with_program(&[0x02]);
        let before = cpu.state();
        assert_eq!(cpu.step(), Err(CpuError::UnsupportedOpcode(0x02)));
        assert_eq!(cpu.state(), before);
    }

    #[test]
    fn test_brk_pushes_state_and_jumps_to_vector() {
        let mut bus = MemoryBus::new();
        bus.load(0xC000, &[0x00]).unwrap();
        bus.load(0xFFFE, &[0x00, 0x80]).unwrap();
        let mut cpu = Cpu::with_state(
            bus,
            RegisterState {
                status: 0x20,
                ..RegisterState::nestest()
            },
        );

        assert_eq!(cpu.step().unwrap(), 7);
        assert_eq!(cpu.program_counter(), 0x8000);
        assert_eq!(cpu.stack_pointer(), 0xFA);
        assert!(cpu
            .status()
            .contains(StatusFlags::BREAK_FLAG | StatusFlags::INTERRUPT_DISABLE_FLAG));
        assert_eq!(cpu.bus().read(0x01FD).unwrap(), 0xC0);
        assert_eq!(cpu.bus().read(0x01FC).unwrap(), 0x01);
        assert_eq!(cpu.bus().read(0x01FB).unwrap(), 0x30);
    }

    #[test]
    fn test_brk_is_skipped_when_interrupts_disabled() {
        let mut cpu = cpu_with_program(&[0x00]);
        assert_eq!(cpu.step().unwrap(), 0);
        assert_eq!(cpu.program_counter(), 0xC001);
        assert_eq!(cpu.stack_pointer(), 0xFD);
    }

    #[test]
    fn test_rti_restores_state_and_costs_brk_cycles() {
        let mut cpu = cpu_with_program(&[0x40]);
        cpu.reset(RegisterState {
            stack_pointer: 0xFA,
            ..RegisterState::nestest()
        });
        // Status (with break), PCL, PCH
        cpu.bus_mut().write(0x01FB, 0b1001_0001).unwrap();
        cpu.bus_mut().write(0x01FC, 0x34).unwrap();
        cpu.bus_mut().write(0x01FD, 0x12).unwrap();

        assert_eq!(cpu.step().unwrap(), 7);
        assert_eq!(cpu.program_counter(), 0x1234);
        assert_eq!(cpu.stack_pointer(), 0xFD);
        assert_eq!(cpu.status().bits(), 0b1011_0001);
    }

    #[test]
    fn test_jsr_rts_round_trip() {
        // JSR $C010 ... RTS at $C010
        let mut program = vec![0xEA; 0x11];
        program[0..3].copy_from_slice(&[0x20, 0x10, 0xC0]);
        program[0x10] = 0x60;
        let mut cpu = cpu_with_program(&program);

        assert_eq!(cpu.step().unwrap(), 6);
        assert_eq!(cpu.program_counter(), 0xC010);
        assert_eq!(cpu.stack_pointer(), 0xFB);
        assert_eq!(cpu.bus().read(0x01FD).unwrap(), 0xC0);
        assert_eq!(cpu.bus().read(0x01FC).unwrap(), 0x02);

        assert_eq!(cpu.step().unwrap(), 6);
        assert_eq!(cpu.program_counter(), 0xC003);
        assert_eq!(cpu.stack_pointer(), 0xFD);
    }

    #[test]
    fn test_php_plp_break_flag_handling() {
        // PHP, PLP
        let mut cpu = cpu_with_program(&[0x08, 0x28]);
        cpu.step().unwrap();
        assert_eq!(cpu.bus().read(0x01FD).unwrap(), 0x34);
        assert!(!cpu.status().contains(StatusFlags::BREAK_FLAG));

        cpu.step().unwrap();
        assert_eq!(cpu.status().bits(), 0x24);
        assert_eq!(cpu.stack_pointer(), 0xFD);
    }

    #[test]
    fn test_pha_pla_round_trip() {
        // LDA #$80, PHA, LDA #$00, PLA
        let mut cpu = cpu_with_program(&[0xA9, 0x80, 0x48, 0xA9, 0x00, 0x68]);
        for _ in 0..4 {
            cpu.step().unwrap();
        }
        assert_eq!(cpu.a(), 0x80);
        assert_eq!(cpu.stack_pointer(), 0xFD);
        assert!(cpu.status().contains(StatusFlags::NEGATIVE_FLAG));
        assert!(!cpu.status().contains(StatusFlags::ZERO_FLAG));
    }

    #[test]
    fn test_jmp_indirect_page_bug() {
        let mut cpu = cpu_with_program(&[0x6C, 0xFF, 0x02]);
        cpu.bus_mut().write(0x02FF, 0x40).unwrap();
        cpu.bus_mut().write(0x0200, 0x80).unwrap();
        cpu.bus_mut().write(0x0300, 0x50).unwrap();

        assert_eq!(cpu.step().unwrap(), 5);
        assert_eq!(cpu.program_counter(), 0x8040);
    }

    #[test]
    fn test_transfers() {
        // LDX #$00, TXS, TSX, LDY #$FF, TYA
        let mut cpu = cpu_with_program(&[0xA2, 0x00, 0x9A, 0xBA, 0xA0, 0xFF, 0x98]);
        cpu.step().unwrap();
        cpu.step().unwrap();
        assert_eq!(cpu.stack_pointer(), 0x00);
        cpu.step().unwrap();
        assert!(cpu.status().contains(StatusFlags::ZERO_FLAG));
        cpu.step().unwrap();
        cpu.step().unwrap();
        assert_eq!(cpu.a(), 0xFF);
        assert!(cpu.status().contains(StatusFlags::NEGATIVE_FLAG));
    }

    #[test]
    fn test_read_modify_write_on_memory() {
        // INC $10 ; ASL $10 ; DEC $10
        let mut cpu = cpu_with_program(&[0xE6, 0x10, 0x06, 0x10, 0xC6, 0x10]);
        cpu.bus_mut().write(0x0010, 0x7F).unwrap();

        assert_eq!(cpu.step().unwrap(), 5);
        assert_eq!(cpu.bus().read(0x0010).unwrap(), 0x80);
        cpu.step().unwrap();
        assert_eq!(cpu.bus().read(0x0010).unwrap(), 0x00);
        assert!(cpu.status().contains(StatusFlags::CARRY_FLAG | StatusFlags::ZERO_FLAG));
        cpu.step().unwrap();
        assert_eq!(cpu.bus().read(0x0010).unwrap(), 0xFF);
    }

    #[test]
    fn test_indexed_store_has_no_page_penalty_but_load_does() {
        // LDX #$01, STA $02FF,X, LDA $02FF,X
        let mut cpu = cpu_with_program(&[0xA2, 0x01, 0x9D, 0xFF, 0x02, 0xBD, 0xFF, 0x02]);
        cpu.step().unwrap();
        assert_eq!(cpu.step().unwrap(), 5);
        assert_eq!(cpu.step().unwrap(), 5);
    }

    #[test]
    fn test_read_modify_write_abs_x_page_cross() {
        // LDX #$01, INC $02FF,X, LDX #$00, INC $0200,X
        let mut cpu = cpu_with_program(&[0xA2, 0x01, 0xFE, 0xFF, 0x02, 0xA2, 0x00, 0xFE, 0x00, 0x02]);
        cpu.step().unwrap();
        assert_eq!(cpu.step().unwrap(), 8);
        assert_eq!(cpu.bus().read(0x0300).unwrap(), 0x01);

        cpu.step().unwrap();
        assert_eq!(cpu.step().unwrap(), 7);
        assert_eq!(cpu.bus().read(0x0200).unwrap(), 0x01);
    }

    #[test]
    fn test_indirect_y_store_has_no_page_penalty_but_load_does() {
        // LDY #$10, LDA #$5A, STA ($40),Y, LDA #$00, LDA ($40),Y
        let mut cpu = cpu_with_program(&[0xA0, 0x10, 0xA9, 0x5A, 0x91, 0x40, 0xA9, 0x00, 0xB1, 0x40]);
        cpu.bus_mut().write(0x0040, 0xF8).unwrap();
        cpu.bus_mut().write(0x0041, 0x02).unwrap();

        cpu.step().unwrap();
        cpu.step().unwrap();
        assert_eq!(cpu.step().unwrap(), 6);
        assert_eq!(cpu.bus().read(0x0308).unwrap(), 0x5A);

        cpu.step().unwrap();
        assert_eq!(cpu.step().unwrap(), 6);
        assert_eq!(cpu.a(), 0x5A);
    }

    #[test]
    fn test_branch_taken_across_page() {
        // BNE -4 from $C000 lands on $BFFE
        let mut cpu = cpu_with_program(&[0xD0, 0xFC]);
        assert_eq!(cpu.step().unwrap(), 4);
        assert_eq!(cpu.program_counter(), 0xBFFE);
    }
}
