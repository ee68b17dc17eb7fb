//! Sound register bank: backs $FF10-$FF3F with real storage and the
//! hardware's read-back quirks, without generating any audio (accurate
//! audio is out of scope; see the crate-level non-goals).
//!
//! Several of these registers are write-only or only partially readable on
//! real hardware; the bits that can't be read back always read as 1. NR52's
//! channel-status bits reflect whether a channel has been triggered since
//! last reset, not any ongoing envelope/length/frequency simulation.

/// OR-mask applied on read: bits set here always read as 1, matching the
/// write-only/partial fields documented for each NR register. `0xff` marks
/// a register that's entirely unreadable (or unused).
const READ_MASK: [u8; 0x16] = [
    0x80, 0x3f, 0x00, 0xff, 0xbf, // ff10-ff14
    0xff, 0x3f, 0x00, 0xff, 0xbf, // ff15(unused)-ff19
    0x7f, 0xff, 0x9f, 0xff, 0xbf, // ff1a-ff1e
    0xff, 0xff, 0x00, 0x00, 0xbf, // ff1f(unused)-ff23
    0x00, 0x00, // ff24-ff25
];

const WAVE_BASE: u16 = 0xff30;
const WAVE_SIZE: usize = 0x10;

pub struct SoundRegisters {
    /// Raw bytes for ff10..=ff25, as last written.
    regs: [u8; 0x16],
    wave: [u8; WAVE_SIZE],
    enabled: bool,
    /// Whether each of the four channels has been triggered since the APU
    /// was last powered on, for NR52's status bits.
    running: [bool; 4],
}

impl SoundRegisters {
    pub fn new() -> SoundRegisters {
        SoundRegisters { regs: [0; 0x16], wave: [0; WAVE_SIZE], enabled: false, running: [false; 4] }
    }

    pub fn read(&self, address: u16) -> u8 {
        if address == 0xff26 {
            return self.nr52();
        }

        if (WAVE_BASE..WAVE_BASE + WAVE_SIZE as u16).contains(&address) {
            return self.wave[(address - WAVE_BASE) as usize];
        }

        let index = (address - 0xff10) as usize;
        match self.regs.get(index) {
            Some(&raw) => raw | READ_MASK.get(index).copied().unwrap_or(0xff),
            None => 0xff,
        }
    }

    pub fn write(&mut self, address: u16, value: u8) {
        if address == 0xff26 {
            self.set_nr52(value);
            return;
        }

        if (WAVE_BASE..WAVE_BASE + WAVE_SIZE as u16).contains(&address) {
            self.wave[(address - WAVE_BASE) as usize] = value;
            return;
        }

        if !self.enabled {
            return;
        }

        let index = (address - 0xff10) as usize;
        if let Some(slot) = self.regs.get_mut(index) {
            *slot = value;
        }

        if matches!(address, 0xff14 | 0xff19 | 0xff1e | 0xff23) && value & 0x80 != 0 {
            let channel = match address {
                0xff14 => 0,
                0xff19 => 1,
                0xff1e => 2,
                _ => 3,
            };
            self.running[channel] = true;
        }
    }

    fn nr52(&self) -> u8 {
        let status = self
            .running
            .iter()
            .enumerate()
            .fold(0u8, |acc, (i, &running)| acc | ((running as u8) << i));

        (self.enabled as u8) << 7 | 0x70 | status
    }

    fn set_nr52(&mut self, value: u8) {
        self.enabled = value & 0x80 != 0;
        if !self.enabled {
            self.regs = [0; 0x16];
            self.running = [false; 4];
        }
    }
}

impl Default for SoundRegisters {
    fn default() -> SoundRegisters {
        SoundRegisters::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_only_bits_read_back_as_one() {
        let mut s = SoundRegisters::new();
        s.write(0xff26, 0x80);
        s.write(0xff11, 0x00);
        assert_eq!(s.read(0xff11), 0x3f);
    }

    #[test]
    fn disabled_apu_ignores_writes_except_nr52() {
        let mut s = SoundRegisters::new();
        s.write(0xff11, 0x80);
        assert_eq!(s.read(0xff11), 0xff);
    }

    #[test]
    fn trigger_sets_nr52_channel_status() {
        let mut s = SoundRegisters::new();
        s.write(0xff26, 0x80);
        s.write(0xff11, 0x80);
        s.write(0xff14, 0x87);
        assert_eq!(s.read(0xff26), 0xf1);
    }

    #[test]
    fn powering_off_clears_status_and_registers() {
        let mut s = SoundRegisters::new();
        s.write(0xff26, 0x80);
        s.write(0xff14, 0x87);
        s.write(0xff26, 0x00);
        assert_eq!(s.read(0xff26), 0x70);
        assert_eq!(s.read(0xff12), 0xff);
    }

    #[test]
    fn wave_ram_always_writable() {
        let mut s = SoundRegisters::new();
        s.write(0xff30, 0xab);
        assert_eq!(s.read(0xff30), 0xab);
    }
}
