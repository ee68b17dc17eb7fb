//! dmg-core: Sharp LR35902 (DMG Game Boy) CPU, memory bus, and background
//! scanline renderer. Headless smoke-test runner: loads a ROM, runs it for
//! a fixed number of instructions, and prints the final register file.

use std::env;
use std::fs;
use std::process;

use dmg_core::display::NullSink;
use dmg_core::Machine;

const DEFAULT_STEPS: u64 = 1_000_000;

fn main() {
    let mut args = env::args().skip(1);
    let rom_path = match args.next() {
        Some(p) => p,
        None => {
            eprintln!("usage: dmg-core <rom-path>");
            process::exit(1);
        }
    };

    let rom = fs::read(&rom_path).unwrap_or_else(|e| {
        eprintln!("failed to read {rom_path}: {e}");
        process::exit(1);
    });

    let mut machine = Machine::new(rom, 0).unwrap_or_else(|e| {
        eprintln!("failed to load cartridge: {e}");
        process::exit(1);
    });

    let mut sink = NullSink::default();

    for _ in 0..DEFAULT_STEPS {
        if let Err(e) = machine.step(&mut sink) {
            eprintln!("stopped: {e}");
            break;
        }
    }

    println!("{:?}", machine.cpu());
}
