//! Cartridge ROM storage and header parsing.
//!
//! Basic ROM banking only: a fixed bank 0 and a single switchable window at
//! 0x4000..0x7FFF. MBC-specific RAM banking, batteries, and real-time clocks
//! are out of scope; the bus treats any write below 0x8000 as a bank-select
//! request regardless of the cartridge's declared MBC type (§4.4).

pub mod header;

use crate::error::Error;
use header::{Header, ROM_BANK_SIZE};

pub struct Cartridge {
    rom: Vec<u8>,
    header: Header,
    /// Bank currently mapped at 0x4000..0x7FFF. Never 0: a bank-select
    /// write of 0 substitutes bank 1 (§4.4, §8 invariant 5).
    selected_bank: u8,
}

impl Cartridge {
    /// Build a cartridge from a raw ROM image. At least two 16KiB banks
    /// (32KiB) are required; anything shorter can't hold a valid header.
    pub fn from_bytes(rom: Vec<u8>) -> Result<Cartridge, Error> {
        if rom.len() < 2 * ROM_BANK_SIZE {
            return Err(Error::memory("cartridge", rom.len() as u16, "ROM shorter than two banks"));
        }

        let header = Header::parse(&rom);

        Ok(Cartridge { rom, header, selected_bank: 1 })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn title(&self) -> Option<&str> {
        self.header.title.as_deref()
    }

    pub fn rom_banks(&self) -> u16 {
        self.header.rom_banks
    }

    /// Currently selected bank for the 0x4000..0x7FFF window.
    pub fn selected_bank(&self) -> u8 {
        self.selected_bank
    }

    /// Handle a write below 0x8000: select a new ROM bank. The request is
    /// first reduced modulo the cartridge's declared bank count so
    /// out-of-range writes can't select nonexistent banks; only then is a
    /// result of 0 remapped to bank 1 (§4.4, §8 invariant 5).
    pub fn select_bank(&mut self, requested: u8) {
        let banks = self.header.rom_banks.max(1) as u8;
        let wanted = requested % banks;
        self.selected_bank = if wanted == 0 { 1 } else { wanted };
    }

    /// Read a byte from fixed bank 0, `offset` in 0x0000..0x4000.
    pub fn read_bank0(&self, offset: u16) -> u8 {
        self.rom.get(offset as usize).copied().unwrap_or(0xff)
    }

    /// Read a byte from the currently switched-in bank, `offset` in
    /// 0x0000..0x4000 (bank-relative, not bus-absolute).
    pub fn read_switchable(&self, offset: u16) -> u8 {
        let addr = self.selected_bank as usize * ROM_BANK_SIZE + offset as usize;
        self.rom.get(addr).copied().unwrap_or(0xff)
    }

    /// Create a cartridge from an in-memory ROM image for tests, skipping
    /// on-disk save-file concerns entirely (this core has none).
    #[cfg(test)]
    pub fn from_vec(rom: Vec<u8>) -> Cartridge {
        Cartridge::from_bytes(rom).expect("test ROM too short")
    }
}

impl std::fmt::Debug for Cartridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "'{}' (type {:#04x}, {} ROM banks, {} RAM banks, bank {} selected)",
            self.title().unwrap_or("<INVALID>"),
            self.header.cart_type,
            self.header.rom_banks,
            self.header.ram_banks,
            self.selected_bank,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_rom(banks: usize) -> Vec<u8> {
        let mut rom = vec![0u8; banks * ROM_BANK_SIZE];
        // Mark the first byte of each bank with its own index for the bank
        // switch tests below.
        for bank in 0..banks {
            rom[bank * ROM_BANK_SIZE] = bank as u8;
        }
        rom
    }

    #[test]
    fn rejects_short_roms() {
        assert!(Cartridge::from_bytes(vec![0u8; 100]).is_err());
    }

    #[test]
    fn defaults_to_bank_one() {
        let cart = Cartridge::from_vec(test_rom(4));
        assert_eq!(cart.selected_bank(), 1);
        assert_eq!(cart.read_switchable(0), 1);
    }

    #[test]
    fn bank_zero_select_maps_to_bank_one() {
        let mut cart = Cartridge::from_vec(test_rom(4));
        cart.select_bank(2);
        assert_eq!(cart.read_switchable(0), 2);

        cart.select_bank(0);
        assert_eq!(cart.selected_bank(), 1);
        assert_eq!(cart.read_switchable(0), 1);
    }

    #[test]
    fn bank_select_wraps_modulo_bank_count() {
        let mut cart = Cartridge::from_vec(test_rom(4));
        cart.select_bank(5);
        assert_eq!(cart.selected_bank(), 1);
    }

    #[test]
    fn bank_select_modulo_landing_on_zero_maps_to_bank_one() {
        // 4 banks: requesting bank 4 (nonzero) must still land on 1, since
        // modulo is taken before the zero-substitution, not after.
        let mut cart = Cartridge::from_vec(test_rom(4));
        cart.select_bank(4);
        assert_eq!(cart.selected_bank(), 1);
    }
}
