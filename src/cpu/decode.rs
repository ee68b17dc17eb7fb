//! Pure fetch/decode: given a bus and a PC, produce the next instruction's
//! shape without touching any CPU state (§4.2).

use crate::bus::Bus;
use crate::error::Error;
use crate::opcodes::{self, ArgKind, Cycles, FlagEffect, OpcodeInfo};

/// Resolved operand for a decoded instruction, already adjusted per the
/// 0xE0/0xF0 "add 0xff00" rule where applicable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    None,
    Imm8(u8),
    Imm16(u16),
    Addr8(u16),
    Addr16(u16),
    Rel8(i8),
}

#[derive(Debug, Clone)]
pub struct Decoded {
    pub opcode: u8,
    pub prefixed: bool,
    pub pc: u16,
    pub next_pc: u16,
    pub cycles: Cycles,
    pub flags: FlagEffect,
    pub mnemonic: &'static str,
    pub arg: Operand,
    pub raw: Vec<u8>,
}

/// Fetch and decode the instruction at `pc`. Never mutates `bus`.
pub fn decode(bus: &Bus, pc: u16) -> Result<Decoded, Error> {
    let first = bus.read(pc)?;

    if first == 0xcb {
        let cb_opcode = bus.read(pc.wrapping_add(1))?;
        let info = opcodes::CB[cb_opcode as usize];
        return Ok(Decoded {
            opcode: cb_opcode,
            prefixed: true,
            pc,
            next_pc: pc.wrapping_add(2),
            cycles: info.cycles,
            flags: info.flags,
            mnemonic: info.mnemonic,
            arg: Operand::None,
            raw: vec![first, cb_opcode],
        });
    }

    if opcodes::is_illegal(first) {
        return Err(Error::Decode { pc, opcode: first, raw: vec![first], prefixed: false });
    }

    let info: OpcodeInfo = opcodes::PRIMARY[first as usize];
    let mut raw = vec![first];

    let arg = match info.arg {
        ArgKind::Void => Operand::None,
        ArgKind::D8 => {
            let b = bus.read(pc.wrapping_add(1))?;
            raw.push(b);
            Operand::Imm8(b)
        }
        ArgKind::D16 => {
            let lo = bus.read(pc.wrapping_add(1))?;
            let hi = bus.read(pc.wrapping_add(2))?;
            raw.push(lo);
            raw.push(hi);
            Operand::Imm16(crate::util::pack16(hi, lo))
        }
        ArgKind::A8 => {
            let b = bus.read(pc.wrapping_add(1))?;
            raw.push(b);
            let base = if opcodes::ADD_0XFF00_OPCODES.contains(&first) { 0xff00 } else { 0 };
            Operand::Addr8(base + b as u16)
        }
        ArgKind::A16 => {
            let lo = bus.read(pc.wrapping_add(1))?;
            let hi = bus.read(pc.wrapping_add(2))?;
            raw.push(lo);
            raw.push(hi);
            Operand::Addr16(crate::util::pack16(hi, lo))
        }
        ArgKind::R8 => {
            let b = bus.read(pc.wrapping_add(1))?;
            raw.push(b);
            Operand::Rel8(crate::util::u8_to_signed(b))
        }
    };

    let next_pc = pc.wrapping_add(info.length as u16);

    Ok(Decoded {
        opcode: first,
        prefixed: false,
        pc,
        next_pc,
        cycles: info.cycles,
        flags: info.flags,
        mnemonic: info.mnemonic,
        arg,
        raw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::Cartridge;
    use crate::display::Display;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn bus_with(bytes: &[u8]) -> Bus {
        let mut rom = vec![0u8; 0x8000];
        rom[..bytes.len()].copy_from_slice(bytes);
        let cart = Cartridge::from_vec(rom);
        let mut rng = StdRng::seed_from_u64(3);
        let display = Display::new(&mut rng);
        let mut bus = Bus::new(cart, display, &mut rng);
        bus.write(0xff50, 1).unwrap(); // expose cart ROM at 0x0000
        bus
    }

    #[test]
    fn decodes_nop() {
        let bus = bus_with(&[0x00]);
        let d = decode(&bus, 0).unwrap();
        assert_eq!(d.mnemonic, "NOP");
        assert_eq!(d.next_pc, 1);
    }

    #[test]
    fn decodes_d16_little_endian() {
        let bus = bus_with(&[0x01, 0x34, 0x12]); // LD BC, 0x1234
        let d = decode(&bus, 0).unwrap();
        assert_eq!(d.arg, Operand::Imm16(0x1234));
        assert_eq!(d.next_pc, 3);
    }

    #[test]
    fn decodes_signed_r8() {
        let bus = bus_with(&[0x18, 0xfb]); // JR -5
        let d = decode(&bus, 0).unwrap();
        assert_eq!(d.arg, Operand::Rel8(-5));
    }

    #[test]
    fn a8_gets_0xff00_offset() {
        let bus = bus_with(&[0xe0, 0x47]); // LDH (0xff47), A
        let d = decode(&bus, 0).unwrap();
        assert_eq!(d.arg, Operand::Addr8(0xff47));
    }

    #[test]
    fn cb_prefixed_reads_second_byte() {
        let bus = bus_with(&[0xcb, 0x7c]); // BIT 7, H
        let d = decode(&bus, 0).unwrap();
        assert!(d.prefixed);
        assert_eq!(d.opcode, 0x7c);
        assert_eq!(d.next_pc, 2);
    }

    #[test]
    fn illegal_opcode_fails() {
        let bus = bus_with(&[0xd3]);
        assert!(decode(&bus, 0).is_err());
    }
}
