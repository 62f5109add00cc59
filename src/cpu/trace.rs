use cpu::opcodes::{AddressingMode, Opcode};
use cpu::registers::RegisterState;
use cpu::OperandBytes;
use std::fmt;

/// One line of an execution trace in the nestest.log column layout, e.g.
///
/// `C000  4C F5 C5  JMP $C5F5                       A:00 X:00 Y:00 P:24 SP:FD CYC:0`
///
/// Registers are the values before the instruction executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceLine {
    pub program_counter: u16,
    pub bytes: Vec<u8>,
    pub disassembly: String,
    pub registers: RegisterState,
}

impl TraceLine {
    pub(super) fn new(pc: u16, opcode: &Opcode, operand: OperandBytes, registers: &RegisterState) -> Self {
        let bytes = [opcode.opcode, operand.low, operand.high][..opcode.bytes() as usize].to_vec();

        TraceLine {
            program_counter: pc,
            bytes,
            disassembly: disassemble(pc, opcode, operand),
            registers: *registers,
        }
    }
}

fn disassemble(pc: u16, opcode: &Opcode, operand: OperandBytes) -> String {
    let mnemonic = opcode.mnemonic();
    let word = operand.word();

    match opcode.address_mode {
        AddressingMode::Implied => mnemonic,
        AddressingMode::Accumulator => format!("{} A", mnemonic),
        AddressingMode::Immediate => format!("{} #${:02X}", mnemonic, operand.low),
        AddressingMode::ZeroPage => format!("{} ${:02X}", mnemonic, operand.low),
        AddressingMode::ZeroPageXIndexed => format!("{} ${:02X},X", mnemonic, operand.low),
        AddressingMode::ZeroPageYIndexed => format!("{} ${:02X},Y", mnemonic, operand.low),
        AddressingMode::Absolute => format!("{} ${:04X}", mnemonic, word),
        AddressingMode::AbsoluteXIndexed => format!("{} ${:04X},X", mnemonic, word),
        AddressingMode::AbsoluteYIndexed => format!("{} ${:04X},Y", mnemonic, word),
        AddressingMode::Indirect => format!("{} (${:04X})", mnemonic, word),
        AddressingMode::IndirectXIndexed => format!("{} (${:02X},X)", mnemonic, operand.low),
        AddressingMode::IndirectYIndexed => format!("{} (${:02X}),Y", mnemonic, operand.low),
        AddressingMode::Relative => {
            let target = pc.wrapping_add(2).wrapping_add(operand.low as i8 as u16);
            format!("{} ${:04X}", mnemonic, target)
        }
    }
}

impl fmt::Display for TraceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self
            .bytes
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<String>>()
            .join(" ");

        write!(
            f,
            "{:04X}  {:8}  {:31} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
            self.program_counter,
            bytes,
            self.disassembly,
            self.registers.a,
            self.registers.x,
            self.registers.y,
            self.registers.status,
            self.registers.stack_pointer,
            self.registers.cycles,
        )
    }
}

#[cfg(test)]
mod test {
    use cpu::{Cpu, RegisterState};
    use mmu::MemoryBus;

    fn trace_of(program: &[u8]) -> String {
        let mut bus = MemoryBus::new();
        bus.load(0xC000, program).unwrap();
        Cpu::with_state(bus, RegisterState::nestest())
            .trace_next()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_matches_nestest_columns() {
        assert_eq!(
            trace_of(&[0x4C, 0xF5, 0xC5]),
            "C000  4C F5 C5  JMP $C5F5                       A:00 X:00 Y:00 P:24 SP:FD CYC:0"
        );
    }

    #[test]
    fn test_register_columns_are_fixed() {
        for program in [vec![0xEA], vec![0xA9, 0x05], vec![0xB1, 0x33], vec![0xBD, 0x00, 0x02]].iter() {
            let line = trace_of(program);
            assert_eq!(&line[48..50], "A:", "{}", line);
            assert_eq!(&line[53..55], "X:", "{}", line);
            assert_eq!(&line[58..60], "Y:", "{}", line);
            assert_eq!(&line[63..65], "P:", "{}", line);
            assert_eq!(&line[68..71], "SP:", "{}", line);
        }
    }

    #[test]
    fn test_disassembly() {
        assert!(trace_of(&[0x0A]).starts_with("C000  0A        ASL A "));
        assert!(trace_of(&[0xA9, 0x05]).starts_with("C000  A9 05     LDA #$05 "));
        assert!(trace_of(&[0xB1, 0x33]).starts_with("C000  B1 33     LDA ($33),Y "));
        assert!(trace_of(&[0x96, 0x10]).starts_with("C000  96 10     STX $10,Y "));
        assert!(trace_of(&[0x6C, 0x00, 0x02]).starts_with("C000  6C 00 02  JMP ($0200) "));
        assert!(trace_of(&[0xD0, 0xFC]).starts_with("C000  D0 FC     BNE $BFFE "));
    }

    #[test]
    fn test_trace_next_does_not_execute() {
        let mut bus = MemoryBus::new();
        bus.load(0xC000, &[0xE8]).unwrap();
        let cpu = Cpu::with_state(bus, RegisterState::nestest());
        let line = cpu.trace_next().unwrap();
        assert_eq!(line.bytes, vec![0xE8]);
        assert_eq!(line.disassembly, "INX");
        assert_eq!(cpu.x(), 0);
        assert_eq!(cpu.program_counter(), 0xC000);
    }
}
