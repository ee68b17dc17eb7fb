//! The 16-bit address space router.
//!
//! The bus is the sole mutator of cartridge bank selection, boot-ROM
//! visibility, and LCD I/O registers (§5); every other component only
//! observes those through bus reads. It owns the cartridge and the display
//! by value so nothing needs a back-pointer into its own mutable state.

use log::{debug, warn};

use crate::bootrom::BOOTROM;
use crate::cartridge::Cartridge;
use crate::display::Display;
use crate::error::Error;
use crate::mem::Region;
use crate::sound::SoundRegisters;

const WORK_RAM_BASE: u16 = 0xc000;
const WORK_RAM_SIZE: usize = 0x2000;
const WORK_RAM_MIRROR_BASE: u16 = 0xe000;
const WORK_RAM_MIRROR_END: u16 = 0xfdff;
const EXT_RAM_BASE: u16 = 0xa000;
const EXT_RAM_SIZE: usize = 0x2000;

const LOW_IO_START: u16 = 0xff00;
const LOW_IO_END: u16 = 0xff0f;
const SOUND_IO_START: u16 = 0xff10;
const SOUND_IO_END: u16 = 0xff3f;
const LCD_IO_START: u16 = 0xff40;
const LCD_IO_END: u16 = 0xff4b;
const BOOTROM_DISABLE: u16 = 0xff50;
const IE: u16 = 0xffff;

/// Joypad, serial and timer registers (§4.4): plain byte storage with the
/// real power-on defaults, seeded once and never ticked. Timer counting and
/// interrupt delivery beyond IME are out of scope; these exist so reads and
/// writes round-trip instead of falling through to the unmapped catch-all.
const LOW_IO_DEFAULTS: [u8; 0x10] = [
    0xcf, 0x00, 0x7e, 0xff, 0x00, 0x00, 0x00, 0x00, // ff00-ff07
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xe1, // ff08-ff0f
];

pub struct Bus {
    cartridge: Cartridge,
    display: Display,
    work_ram: Region,
    ext_ram: Region,
    low_io: [u8; 0x10],
    sound: SoundRegisters,
    ie: u8,
    boot_rom_active: bool,
}

impl Bus {
    pub fn new(cartridge: Cartridge, display: Display, rng: &mut impl rand::RngCore) -> Bus {
        Bus {
            cartridge,
            display,
            work_ram: Region::randomized("work-ram", WORK_RAM_BASE, WORK_RAM_SIZE, rng),
            ext_ram: Region::randomized("ext-ram", EXT_RAM_BASE, EXT_RAM_SIZE, rng),
            low_io: LOW_IO_DEFAULTS,
            sound: SoundRegisters::new(),
            ie: 0x00,
            boot_rom_active: true,
        }
    }

    pub fn cartridge(&self) -> &Cartridge {
        &self.cartridge
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut Display {
        &mut self.display
    }

    pub fn boot_rom_active(&self) -> bool {
        self.boot_rom_active
    }

    pub fn read(&self, address: u16) -> Result<u8, Error> {
        if (LCD_IO_START..=LCD_IO_END).contains(&address) {
            return Ok(self.display.read_register(address));
        }

        match address {
            0x0000..=0x00ff if self.boot_rom_active => Ok(BOOTROM[address as usize]),
            0x0000..=0x3fff => Ok(self.cartridge.read_bank0(address)),
            0x4000..=0x7fff => Ok(self.cartridge.read_switchable(address - 0x4000)),
            0x8000..=0x9fff => self.display.read_vram(address),
            EXT_RAM_BASE..=0xbfff => self.ext_ram.read(address),
            WORK_RAM_BASE..=0xdfff => self.work_ram.read(address),
            WORK_RAM_MIRROR_BASE..=WORK_RAM_MIRROR_END => self.work_ram.read(address - 0x2000),
            LOW_IO_START..=LOW_IO_END => Ok(self.low_io[(address - LOW_IO_START) as usize]),
            SOUND_IO_START..=SOUND_IO_END => Ok(self.sound.read(address)),
            BOOTROM_DISABLE => Ok(if self.boot_rom_active { 1 } else { 0 }),
            IE => Ok(self.ie),
            _ => {
                debug!("read from unmapped address {address:#06x}");
                Ok(0xff)
            }
        }
    }

    pub fn read16(&self, address: u16) -> Result<u16, Error> {
        let lo = self.read(address)?;
        let hi = self.read(address.wrapping_add(1))?;
        Ok(crate::util::pack16(hi, lo))
    }

    pub fn write(&mut self, address: u16, value: u8) -> Result<(), Error> {
        if (LCD_IO_START..=LCD_IO_END).contains(&address) {
            self.display.write_register(address, value);
            return Ok(());
        }

        if address == BOOTROM_DISABLE {
            if self.boot_rom_active {
                debug!("boot rom disabled");
                self.boot_rom_active = false;
            }
            return Ok(());
        }

        if address < 0x8000 {
            self.cartridge.select_bank(value);
            return Ok(());
        }

        match address {
            0x8000..=0x9fff => self.display.write_vram(address, value),
            EXT_RAM_BASE..=0xbfff => self.ext_ram.write(address, value),
            WORK_RAM_BASE..=0xdfff => {
                self.work_ram.write(address, value)?;
                if address <= 0xddff {
                    self.work_ram.write(address + 0x2000, value)?;
                }
                Ok(())
            }
            WORK_RAM_MIRROR_BASE..=WORK_RAM_MIRROR_END => {
                self.work_ram.write(address - 0x2000, value)
            }
            LOW_IO_START..=LOW_IO_END => {
                self.low_io[(address - LOW_IO_START) as usize] = value;
                Ok(())
            }
            SOUND_IO_START..=SOUND_IO_END => {
                self.sound.write(address, value);
                Ok(())
            }
            IE => {
                self.ie = value;
                Ok(())
            }
            _ => {
                warn!("write to unmapped address {address:#06x} (value {value:#04x})");
                Ok(())
            }
        }
    }

    pub fn write16(&mut self, address: u16, value: u16) -> Result<(), Error> {
        let (hi, lo) = crate::util::unpack16(value);
        self.write(address, lo)?;
        self.write(address.wrapping_add(1), hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn bus_with_rom(banks: usize) -> Bus {
        let mut rom = vec![0u8; banks * 0x4000];
        for bank in 0..banks {
            rom[bank * 0x4000] = bank as u8;
        }
        let cart = Cartridge::from_vec(rom);
        let mut rng = StdRng::seed_from_u64(1);
        let display = Display::new(&mut rng);
        Bus::new(cart, display, &mut rng)
    }

    #[test]
    fn boot_rom_overlays_cart_rom() {
        let bus = bus_with_rom(2);
        assert_eq!(bus.read(0x0000).unwrap(), BOOTROM[0]);
    }

    #[test]
    fn disabling_boot_rom_exposes_cart_rom() {
        let mut bus = bus_with_rom(2);
        bus.write(0xff50, 1).unwrap();
        assert!(!bus.boot_rom_active());
        assert_eq!(bus.read(0x0000).unwrap(), bus.cartridge().read_bank0(0));
    }

    #[test]
    fn work_ram_mirrors() {
        let mut bus = bus_with_rom(2);
        bus.write(0xc010, 0x42).unwrap();
        assert_eq!(bus.read(0xe010).unwrap(), 0x42);

        bus.write(0xe020, 0x99).unwrap();
        assert_eq!(bus.read(0xc020).unwrap(), 0x99);
    }

    #[test]
    fn bank_switch_write_does_not_touch_rom() {
        let mut bus = bus_with_rom(4);
        bus.write(0x2000, 2).unwrap();
        assert_eq!(bus.cartridge().selected_bank(), 2);
        assert_eq!(bus.read(0x4000).unwrap(), 2);
    }

    #[test]
    fn ly_write_resets_to_zero() {
        let mut bus = bus_with_rom(2);
        bus.write(0xff44, 0x50).unwrap();
        assert_eq!(bus.read(0xff44).unwrap(), 0);
    }
}
