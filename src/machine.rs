//! Top-level assembly: wires a cartridge into a bus, a bus into a CPU, and
//! exposes the run loop a host actually calls.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::bootrom;
use crate::bus::Bus;
use crate::cartridge::Cartridge;
use crate::cpu::Cpu;
use crate::display::{Display, HostSink};
use crate::error::Error;

/// Owns the whole emulated console: cartridge, bus, CPU, display. No
/// lifetimes, no back-pointers — the bus owns its RAM and the cartridge by
/// value, and the CPU owns the bus by value (§9).
pub struct Machine {
    cpu: Cpu,
}

impl Machine {
    /// Build a machine from cartridge ROM bytes, with a reproducible
    /// power-on memory fill seeded from `seed`.
    pub fn new(rom: Vec<u8>, seed: u64) -> Result<Machine, Error> {
        let cartridge = Cartridge::from_bytes(rom)?;
        let mut rng = StdRng::seed_from_u64(seed);
        let display = Display::new(&mut rng);
        let bus = Bus::new(cartridge, display, &mut rng);
        Ok(Machine { cpu: Cpu::new(bus) })
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    /// Skip the boot ROM animation and jump straight to cartridge code with
    /// the canonical post-boot snapshot already in place.
    pub fn skip_boot(&mut self) -> Result<(), Error> {
        self.cpu.skip_boot()
    }

    /// Run a single fetch/decode/execute/display-tick cycle.
    pub fn step(&mut self, sink: &mut impl HostSink) -> Result<(), Error> {
        self.cpu.step(sink)
    }

    /// Run until the core raises an error (an unimplemented or illegal
    /// opcode, or a failed post-boot verification). The host decides what
    /// to do with it — retry, log, or exit.
    pub fn run(&mut self, sink: &mut impl HostSink) -> Error {
        self.cpu.run(sink)
    }

    pub fn boot_rom_bytes() -> &'static [u8; 0x100] {
        &bootrom::BOOTROM
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::NullSink;

    #[test]
    fn new_machine_boots_with_rom_mapped_at_zero() {
        let rom = vec![0u8; 0x8000];
        let machine = Machine::new(rom, 1).unwrap();
        assert!(machine.cpu().bus().boot_rom_active());
    }

    #[test]
    fn skip_boot_disables_boot_rom_overlay() {
        let rom = vec![0u8; 0x8000];
        let mut machine = Machine::new(rom, 1).unwrap();
        machine.skip_boot().unwrap();
        assert!(!machine.cpu().bus().boot_rom_active());
        assert_eq!(machine.cpu().pc(), 0x0100);
    }

    #[test]
    fn step_executes_one_instruction() {
        let mut rom = vec![0u8; 0x8000];
        rom[0x100] = 0x00; // NOP
        let mut machine = Machine::new(rom, 1).unwrap();
        machine.skip_boot().unwrap();
        let mut sink = NullSink::default();
        machine.step(&mut sink).unwrap();
        assert_eq!(machine.cpu().pc(), 0x0101);
    }
}
