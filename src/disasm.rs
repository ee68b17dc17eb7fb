//! Text disassembly, built directly on top of the same decode step the CPU
//! uses — no separate opcode table, no separate decoding logic (§4.8).

use crate::bus::Bus;
use crate::cpu::decode::{decode, Operand};
use crate::error::Error;
use crate::opcodes::cb_operand_name;

/// One disassembled instruction: its text and the address immediately
/// after it, so callers can walk a stream without re-decoding lengths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub address: u16,
    pub text: String,
    pub next_address: u16,
}

/// Decode and format the instruction at `address`.
pub fn decode_at(bus: &Bus, address: u16) -> Result<Line, Error> {
    let d = decode(bus, address)?;

    let text = if d.prefixed {
        format!("CB {} {}", d.mnemonic, cb_operand_name(d.opcode & 7))
    } else {
        match d.arg {
            Operand::None => d.mnemonic.to_string(),
            Operand::Imm8(v) => substitute(d.mnemonic, "d8", &format!("${v:02x}")),
            Operand::Imm16(v) => substitute(d.mnemonic, "d16", &format!("${v:04x}")),
            Operand::Addr8(v) => substitute(d.mnemonic, "a8", &format!("${v:04x}")),
            Operand::Addr16(v) => substitute(d.mnemonic, "a16", &format!("${v:04x}")),
            Operand::Rel8(v) => substitute(d.mnemonic, "r8", &format!("${:04x}", d.next_pc.wrapping_add(v as i16 as u16))),
        }
    };

    let raw = d.raw.iter().map(|b| format!("{b:02x}")).collect::<Vec<_>>().join(" ");

    Ok(Line { address, text: format!("${address:04x}:  {raw:<8}  {text}"), next_address: d.next_pc })
}

/// Replace the placeholder token the table uses (`d8`, `a16`, ...) with the
/// actual decoded value, the way the Python disassembler substitutes into
/// its mnemonic template.
fn substitute(mnemonic: &str, token: &str, value: &str) -> String {
    if mnemonic.contains(token) {
        mnemonic.replace(token, value)
    } else {
        mnemonic.to_string()
    }
}

/// Disassemble `count` instructions starting at `address`.
pub fn disassemble_range(bus: &Bus, address: u16, count: usize) -> Vec<Line> {
    let mut lines = Vec::with_capacity(count);
    let mut addr = address;
    for _ in 0..count {
        match decode_at(bus, addr) {
            Ok(line) => {
                addr = line.next_address;
                lines.push(line);
            }
            Err(_) => break,
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::Cartridge;
    use crate::display::Display;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bus_with(bytes: &[u8]) -> Bus {
        let mut rom = vec![0u8; 0x8000];
        rom[..bytes.len()].copy_from_slice(bytes);
        let cart = Cartridge::from_vec(rom);
        let mut rng = StdRng::seed_from_u64(9);
        let display = Display::new(&mut rng);
        let mut bus = Bus::new(cart, display, &mut rng);
        bus.write(0xff50, 1).unwrap();
        bus
    }

    #[test]
    fn substitutes_immediate_into_mnemonic() {
        let bus = bus_with(&[0x3e, 0x42]); // LD A, d8
        let line = decode_at(&bus, 0).unwrap();
        assert!(line.text.contains("$42"));
        assert_eq!(line.next_address, 2);
    }

    #[test]
    fn disassembles_a_short_range() {
        let bus = bus_with(&[0x00, 0x00, 0xc3, 0x00, 0x01]);
        let lines = disassemble_range(&bus, 0, 3);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2].address, 2);
    }

    #[test]
    fn cb_instructions_name_their_operand() {
        let bus = bus_with(&[0xcb, 0x00]); // RLC B
        let line = decode_at(&bus, 0).unwrap();
        assert!(line.text.contains('B'));
    }
}
