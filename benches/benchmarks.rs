extern crate criterion;
extern crate rust_2a03;

use criterion::{criterion_group, criterion_main, Criterion};
use rust_2a03::{Cpu, MemoryBus};

/// Copies a 256 byte page back and forth forever
const COPY_LOOP: [u8; 16] = [
    0xA2, 0x00, // LDX #$00
    0xBD, 0x00, 0x02, // LDA $0200,X
    0x9D, 0x00, 0x03, // STA $0300,X
    0xE8, // INX
    0xD0, 0xF7, // BNE -9
    0x4C, 0x00, 0x80, // JMP $8000
    0xEA, 0xEA,
];

fn copy_loop(instructions: usize) {
    let mut bus = MemoryBus::new();
    bus.load(0x8000, &COPY_LOOP).unwrap();
    bus.load(0xFFFC, &[0x00, 0x80]).unwrap();
    let mut cpu = Cpu::new(bus).unwrap();
    rust_2a03::run_headless_instructions(&mut cpu, instructions).unwrap();
}

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("copy loop 100k instructions", |b| b.iter(|| copy_loop(100_000)));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
