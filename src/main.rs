extern crate clap;
extern crate log;
extern crate log4rs;
extern crate rust_2a03;

use clap::Parser;
use log::{error, info};
use rust_2a03::{Cpu, MemoryBus, RegisterState};
use std::error::Error;
use std::fs;
use std::num::ParseIntError;
use std::process;

#[derive(Parser, Debug)]
#[clap(version = "1.0", author = "David Tyler <davet.code@gmail.com>")]
struct Opts {
    /// Raw program image, no header is interpreted
    program_file: String,
    #[clap(short = 'l', long = "log_config", default_value = "config/log4rs.yaml")]
    log_config: String,
    #[clap(short = 'a', long = "load-address", default_value = "8000", parse(try_from_str = parse_hex))]
    load_address: u16,
    /// Leading bytes of the file to ignore e.g. 16 for an iNES header
    #[clap(long = "skip", default_value = "0")]
    skip: usize,
    /// Place the image at both $8000 and $C000 as a single 16KB PRG bank
    #[clap(long = "mirror-bank")]
    mirror_bank: bool,
    /// Initial PC, read from the reset vector when omitted
    #[clap(short = 's', long = "start", parse(try_from_str = parse_hex))]
    start: Option<u16>,
    #[clap(short = 'n', long = "instructions", default_value = "10000")]
    instructions: usize,
}

fn parse_hex(value: &str) -> Result<u16, ParseIntError> {
    u16::from_str_radix(value.trim_start_matches("0x").trim_start_matches('$'), 16)
}

fn main() {
    let opts: Opts = Opts::parse();
    log4rs::init_file(&opts.log_config, Default::default()).unwrap();

    info!("Logging Configured");

    if let Err(why) = run(&opts) {
        error!("Halting: {}", why);
        process::exit(1);
    }
}

fn run(opts: &Opts) -> Result<(), Box<dyn Error>> {
    let image = fs::read(&opts.program_file)?;
    let program = image.get(opts.skip..).unwrap_or(&[]);

    let mut bus = MemoryBus::new();
    if opts.mirror_bank {
        bus.load_prg_bank(program)?;
    } else {
        bus.load(opts.load_address, program)?;
    }
    info!("Loaded {} bytes from {}", program.len(), opts.program_file);

    let mut cpu = match opts.start {
        Some(program_counter) => Cpu::with_state(
            bus,
            RegisterState {
                program_counter,
                ..RegisterState::default()
            },
        ),
        None => Cpu::new(bus)?,
    };

    let result = rust_2a03::run_headless_instructions(&mut cpu, opts.instructions);
    info!("Final state {:?}", cpu.state());

    let cycles = result?;
    info!("Executed {} instructions in {} cycles", opts.instructions, cycles);

    Ok(())
}
