//! Inspection surface for an external debugger front-end: register
//! snapshot, breakpoint set, memory dump. No command loop lives here — the
//! interactive REPL is explicitly the excluded front-end (§4.9); a host
//! drives this through its own UI.

use std::collections::HashSet;

use crate::bus::Bus;
use crate::cpu::Cpu;
use crate::disasm;

/// Copy of every register at one point in time, decoupled from the live
/// `Cpu` so a host can hold on to it (e.g. to render a "previous step" pane)
/// without borrowing the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterSnapshot {
    pub af: u16,
    pub bc: u16,
    pub de: u16,
    pub hl: u16,
    pub sp: u16,
    pub pc: u16,
    pub ime: bool,
}

impl RegisterSnapshot {
    pub fn capture(cpu: &Cpu) -> RegisterSnapshot {
        RegisterSnapshot {
            af: cpu.af(),
            bc: cpu.bc(),
            de: cpu.de(),
            hl: cpu.hl(),
            sp: cpu.sp(),
            pc: cpu.pc(),
            ime: cpu.ime(),
        }
    }
}

/// Caller-owned set of addresses that should halt a `run_until_breakpoint`
/// style loop. The core never consults this on its own; a host's run loop
/// checks `cpu.pc()` against it between `step()` calls.
#[derive(Debug, Clone, Default)]
pub struct Breakpoints(HashSet<u16>);

impl Breakpoints {
    pub fn new() -> Breakpoints {
        Breakpoints(HashSet::new())
    }

    pub fn insert(&mut self, address: u16) {
        self.0.insert(address);
    }

    pub fn remove(&mut self, address: u16) {
        self.0.remove(&address);
    }

    pub fn contains(&self, address: u16) -> bool {
        self.0.contains(&address)
    }
}

/// Read `len` bytes starting at `address` for a hex-dump view. Reads that
/// fall outside every mapped region come back as whatever [`Bus::read`]
/// returns for that location (the floating-bus default), never an error.
pub fn dump_memory(bus: &Bus, address: u16, len: u16) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(len as usize);
    let mut addr = address;
    for _ in 0..len {
        bytes.push(bus.read(addr).unwrap_or(0xff));
        addr = addr.wrapping_add(1);
    }
    bytes
}

/// Disassemble the next `count` instructions from the current PC, for a
/// debugger's instruction-stream pane.
pub fn disassemble_from_pc(cpu: &Cpu, count: usize) -> Vec<disasm::Line> {
    disasm::disassemble_range(cpu.bus(), cpu.pc(), count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::Cartridge;
    use crate::display::Display;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cpu_with_rom(rom: Vec<u8>) -> Cpu {
        let cart = Cartridge::from_vec(rom);
        let mut rng = StdRng::seed_from_u64(11);
        let display = Display::new(&mut rng);
        let bus = Bus::new(cart, display, &mut rng);
        Cpu::new(bus)
    }

    #[test]
    fn breakpoints_track_membership() {
        let mut bp = Breakpoints::new();
        bp.insert(0x0150);
        assert!(bp.contains(0x0150));
        bp.remove(0x0150);
        assert!(!bp.contains(0x0150));
    }

    #[test]
    fn snapshot_captures_current_registers() {
        let mut cpu = cpu_with_rom(vec![0u8; 0x8000]);
        cpu.set_bc(0xbeef);
        let snap = RegisterSnapshot::capture(&cpu);
        assert_eq!(snap.bc, 0xbeef);
    }

    #[test]
    fn dump_memory_reads_requested_length() {
        let cpu = cpu_with_rom(vec![0u8; 0x8000]);
        let bytes = dump_memory(cpu.bus(), 0xc000, 16);
        assert_eq!(bytes.len(), 16);
    }
}
