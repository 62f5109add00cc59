extern crate rust_2a03;

use rust_2a03::{Cpu, CpuError, MemoryBus, RegisterState};

/// Place `program` at $8000 and power on through the reset vector
fn boot(program: &[u8]) -> Cpu {
    let mut bus = MemoryBus::new();
    bus.load(0x8000, program).unwrap();
    bus.load(0xFFFC, &[0x00, 0x80]).unwrap();
    Cpu::new(bus).unwrap()
}

fn state(program_counter: u16, stack_pointer: u8, a: u8, x: u8, y: u8, status: u8, cycles: u64) -> RegisterState {
    RegisterState {
        program_counter,
        stack_pointer,
        a,
        x,
        y,
        status,
        cycles,
    }
}

macro_rules! program_tests {
    ($($name:ident: $value:expr,)*) => {
    $(
        #[test]
        fn $name() {
            let (program, instructions, expected): (Vec<u8>, usize, RegisterState) = $value;
            let mut cpu = boot(&program);
            rust_2a03::run_headless_instructions(&mut cpu, instructions).unwrap();

            assert_eq!(cpu.state(), expected);
        }
    )*
    }
}

program_tests! {
    // LDA #$05, ADC #$03, STA $10
    add_and_store: (vec![0xA9, 0x05, 0x69, 0x03, 0x85, 0x10], 3, state(0x8006, 0xFD, 0x08, 0x00, 0x00, 0x20, 7)),
    // SEC, LDA #$00, SBC #$01
    subtract_with_borrow: (vec![0x38, 0xA9, 0x00, 0xE9, 0x01], 3, state(0x8005, 0xFD, 0xFF, 0x00, 0x00, 0xA0, 6)),
    // LDX #$03, DEX, BNE -3
    countdown_loop: (vec![0xA2, 0x03, 0xCA, 0xD0, 0xFD], 7, state(0x8005, 0xFD, 0x00, 0x00, 0x00, 0x22, 16)),
    // LDA #$42, PHA, LDA #$00, PLA
    push_pull_accumulator: (vec![0xA9, 0x42, 0x48, 0xA9, 0x00, 0x68], 4, state(0x8006, 0xFD, 0x42, 0x00, 0x00, 0x20, 11)),
    // JSR $8004, NOP, LDY #$07, RTS
    subroutine_call: (vec![0x20, 0x04, 0x80, 0xEA, 0xA0, 0x07, 0x60], 4, state(0x8004, 0xFD, 0x00, 0x00, 0x07, 0x20, 16)),
    // LDA #$80, CMP #$7F, CLC, ROR A
    compare_and_rotate: (vec![0xA9, 0x80, 0xC9, 0x7F, 0x18, 0x6A], 4, state(0x8006, 0xFD, 0x40, 0x00, 0x00, 0x20, 8)),
    // LDY #$FF, INY, BEQ +2, BRK, NOP, SED, NOP
    branch_over_brk: (vec![0xA0, 0xFF, 0xC8, 0xF0, 0x02, 0x00, 0xEA, 0xF8, 0xEA], 5, state(0x8009, 0xFD, 0x00, 0x00, 0x00, 0x2A, 11)),
}

#[test]
fn add_and_store_writes_zero_page() {
    let mut cpu = boot(&[0xA9, 0x05, 0x69, 0x03, 0x85, 0x10]);
    let cycles = rust_2a03::run_headless_instructions(&mut cpu, 3).unwrap();

    assert_eq!(cycles, 7);
    assert_eq!(cpu.bus().read(0x0010).unwrap(), 0x08);
    assert_eq!(cpu.bus().read(0x0810).unwrap(), 0x08);
}

#[test]
fn indirect_indexed_store_and_load() {
    // Pointer at $10 -> $0200, then STA ($10),Y and LDA ($10),Y with Y=5
    let mut cpu = boot(&[
        0xA9, 0x00, 0x85, 0x10, // LDA #$00, STA $10
        0xA9, 0x02, 0x85, 0x11, // LDA #$02, STA $11
        0xA0, 0x05, // LDY #$05
        0xA9, 0x77, 0x91, 0x10, // LDA #$77, STA ($10),Y
        0xA9, 0x00, 0xB1, 0x10, // LDA #$00, LDA ($10),Y
    ]);
    rust_2a03::run_headless_instructions(&mut cpu, 9).unwrap();

    assert_eq!(cpu.bus().read(0x0205).unwrap(), 0x77);
    assert_eq!(cpu.a(), 0x77);
}

#[test]
fn brk_and_rti_round_trip() {
    // CLI, BRK, <padding>, NOP with the handler at $9000 being a single RTI
    let mut bus = MemoryBus::new();
    bus.load(0x8000, &[0x58, 0x00, 0xEA, 0xEA]).unwrap();
    bus.load(0x9000, &[0x40]).unwrap();
    bus.load(0xFFFC, &[0x00, 0x80, 0x00, 0x90]).unwrap();
    let mut cpu = Cpu::new(bus).unwrap();

    rust_2a03::run_headless_instructions(&mut cpu, 2).unwrap();
    assert_eq!(cpu.program_counter(), 0x9000);
    assert_eq!(cpu.stack_pointer(), 0xFA);

    rust_2a03::run_headless_instructions(&mut cpu, 2).unwrap();
    assert_eq!(cpu.state(), state(0x8003, 0xFD, 0x00, 0x00, 0x00, 0x30, 18));
}

#[test]
fn unsupported_opcode_stops_the_run() {
    // NOP, NOP, then an undocumented opcode
    let mut cpu = boot(&[0xEA, 0xEA, 0xFF]);

    assert_eq!(
        rust_2a03::run_headless_instructions(&mut cpu, 10),
        Err(CpuError::UnsupportedOpcode(0xFF))
    );
    assert_eq!(cpu.program_counter(), 0x8002);
    assert_eq!(cpu.cycles(), 4);

    // The host can patch memory and carry on
    cpu.bus_mut().load(0x8002, &[0xEA]).unwrap();
    assert_eq!(cpu.step(), Ok(2));
}

#[test]
fn writes_to_rom_are_ignored() {
    // LDA #$00, STA $8000
    let mut cpu = boot(&[0xA9, 0x00, 0x8D, 0x00, 0x80]);
    rust_2a03::run_headless_instructions(&mut cpu, 2).unwrap();

    assert_eq!(cpu.bus().read(0x8000).unwrap(), 0xA9);
}

#[test]
fn power_on_state() {
    let cpu = boot(&[]);

    assert_eq!(cpu.state(), state(0x8000, 0xFD, 0x00, 0x00, 0x00, 0x20, 0));
}
