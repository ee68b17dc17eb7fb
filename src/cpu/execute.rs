//! Instruction semantics. Given a freshly-decoded instruction (PC already
//! advanced past it), mutate the CPU/bus and report whether a conditional
//! branch was taken, so [`super::Cpu::step`] can resolve its cycle cost
//! (§4.3).

use super::{Cpu, Flags};
use crate::error::Error;
use crate::opcodes::{FlagEffect, FlagSlot};

use super::decode::{Decoded, Operand};

pub fn execute(cpu: &mut Cpu, decoded: &Decoded) -> Result<bool, Error> {
    if decoded.prefixed {
        execute_cb(cpu, decoded)
    } else {
        execute_primary(cpu, decoded)
    }
}

// -- operand extraction -------------------------------------------------
//
// Every call site below is paired with the `ArgKind` the opcode table
// assigns that exact opcode, so the variant always matches; `decode`
// is the sole producer of `Decoded` and guarantees the pairing.

fn imm8(d: &Decoded) -> u8 {
    match d.arg {
        Operand::Imm8(v) => v,
        _ => unreachable!("opcode {:#04x} has no d8 operand", d.opcode),
    }
}

fn imm16(d: &Decoded) -> u16 {
    match d.arg {
        Operand::Imm16(v) => v,
        _ => unreachable!("opcode {:#04x} has no d16 operand", d.opcode),
    }
}

fn addr(d: &Decoded) -> u16 {
    match d.arg {
        Operand::Addr8(v) | Operand::Addr16(v) => v,
        _ => unreachable!("opcode {:#04x} has no address operand", d.opcode),
    }
}

fn rel(d: &Decoded) -> i8 {
    match d.arg {
        Operand::Rel8(v) => v,
        _ => unreachable!("opcode {:#04x} has no r8 operand", d.opcode),
    }
}

// -- flag application -----------------------------------------------------

/// Computed Z/N/H/C values for one instruction, applied through the
/// opcode table's [`FlagEffect`] slots (Unused/Zero/One/Calc).
#[derive(Default, Clone, Copy)]
struct Calc {
    z: bool,
    n: bool,
    h: bool,
    c: bool,
}

fn apply_flags(flags: &mut Flags, effect: FlagEffect, calc: Calc) {
    flags.z = resolve(effect.z, flags.z, calc.z);
    flags.n = resolve(effect.n, flags.n, calc.n);
    flags.h = resolve(effect.h, flags.h, calc.h);
    flags.c = resolve(effect.c, flags.c, calc.c);
}

fn resolve(slot: FlagSlot, current: bool, calc: bool) -> bool {
    match slot {
        FlagSlot::Unused => current,
        FlagSlot::Zero => false,
        FlagSlot::One => true,
        FlagSlot::Calc => calc,
    }
}

// -- 8-bit ALU --------------------------------------------------------

fn add8(cpu: &mut Cpu, operand: u8, with_carry: bool, effect: FlagEffect) {
    let a = cpu.regs.a;
    let carry = if with_carry && cpu.flags.c { 1u8 } else { 0 };
    let result = a.wrapping_add(operand).wrapping_add(carry);
    let h = (a & 0xf) + (operand & 0xf) + carry > 0xf;
    let c = a as u16 + operand as u16 + carry as u16 > 0xff;
    apply_flags(&mut cpu.flags, effect, Calc { z: result == 0, n: false, h, c });
    cpu.regs.a = result;
}

fn sub8(cpu: &mut Cpu, operand: u8, with_carry: bool, effect: FlagEffect, store: bool) {
    let a = cpu.regs.a;
    let carry = if with_carry && cpu.flags.c { 1u8 } else { 0 };
    let result = a.wrapping_sub(operand).wrapping_sub(carry);
    let h = (a & 0xf) < (operand & 0xf) + carry;
    let c = (a as u16) < operand as u16 + carry as u16;
    apply_flags(&mut cpu.flags, effect, Calc { z: result == 0, n: true, h, c });
    if store {
        cpu.regs.a = result;
    }
}

fn and8(cpu: &mut Cpu, operand: u8, effect: FlagEffect) {
    let result = cpu.regs.a & operand;
    apply_flags(&mut cpu.flags, effect, Calc { z: result == 0, n: false, h: true, c: false });
    cpu.regs.a = result;
}

fn or8(cpu: &mut Cpu, operand: u8, effect: FlagEffect) {
    let result = cpu.regs.a | operand;
    apply_flags(&mut cpu.flags, effect, Calc { z: result == 0, n: false, h: false, c: false });
    cpu.regs.a = result;
}

fn xor8(cpu: &mut Cpu, operand: u8, effect: FlagEffect) {
    let result = cpu.regs.a ^ operand;
    apply_flags(&mut cpu.flags, effect, Calc { z: result == 0, n: false, h: false, c: false });
    cpu.regs.a = result;
}

fn inc8(cpu: &mut Cpu, index: u8, effect: FlagEffect) -> Result<(), Error> {
    let v = cpu.get_r8(index)?;
    let result = v.wrapping_add(1);
    apply_flags(&mut cpu.flags, effect, Calc { z: result == 0, n: false, h: (v & 0xf) == 0xf, c: false });
    cpu.set_r8(index, result)
}

fn dec8(cpu: &mut Cpu, index: u8, effect: FlagEffect) -> Result<(), Error> {
    let v = cpu.get_r8(index)?;
    let result = v.wrapping_sub(1);
    apply_flags(&mut cpu.flags, effect, Calc { z: result == 0, n: true, h: (v & 0xf) == 0, c: false });
    cpu.set_r8(index, result)
}

fn add_hl(cpu: &mut Cpu, operand: u16, effect: FlagEffect) {
    let hl = cpu.hl();
    let result = hl.wrapping_add(operand);
    let h = (hl & 0xfff) + (operand & 0xfff) > 0xfff;
    let c = hl as u32 + operand as u32 > 0xffff;
    apply_flags(&mut cpu.flags, effect, Calc { z: false, n: false, h, c });
    cpu.set_hl(result);
}

/// `ADD SP, r8` and `LD HL, SP+r8` share this: sign-extend the offset,
/// compute half/full carry on the low byte as if it were an 8-bit add.
fn sp_plus_signed(cpu: &mut Cpu, offset: i8, effect: FlagEffect) -> u16 {
    let sp = cpu.sp();
    let operand = offset as i16 as u16;
    let result = sp.wrapping_add(operand);
    let h = (sp & 0xf) + (operand & 0xf) > 0xf;
    let c = (sp & 0xff) + (operand & 0xff) > 0xff;
    apply_flags(&mut cpu.flags, effect, Calc { z: false, n: false, h, c });
    result
}

fn daa(cpu: &mut Cpu, effect: FlagEffect) {
    let mut a = cpu.regs.a;
    let mut adjust = 0u8;
    let mut carry = cpu.flags.c;

    if cpu.flags.h || (!cpu.flags.n && (a & 0xf) > 9) {
        adjust |= 0x06;
    }
    if cpu.flags.c || (!cpu.flags.n && a > 0x99) {
        adjust |= 0x60;
        carry = true;
    }
    a = if cpu.flags.n { a.wrapping_sub(adjust) } else { a.wrapping_add(adjust) };

    apply_flags(&mut cpu.flags, effect, Calc { z: a == 0, n: cpu.flags.n, h: false, c: carry });
    cpu.regs.a = a;
}

// -- rotates/shifts, shared by RLCA/RLA/... and the CB shift group ------

fn rlc(v: u8) -> (u8, bool) {
    let c = v & 0x80 != 0;
    (v.rotate_left(1), c)
}

fn rrc(v: u8) -> (u8, bool) {
    let c = v & 0x01 != 0;
    (v.rotate_right(1), c)
}

fn rl(v: u8, carry_in: bool) -> (u8, bool) {
    let c = v & 0x80 != 0;
    ((v << 1) | carry_in as u8, c)
}

fn rr(v: u8, carry_in: bool) -> (u8, bool) {
    let c = v & 0x01 != 0;
    ((v >> 1) | ((carry_in as u8) << 7), c)
}

fn sla(v: u8) -> (u8, bool) {
    (v << 1, v & 0x80 != 0)
}

fn sra(v: u8) -> (u8, bool) {
    ((v >> 1) | (v & 0x80), v & 0x01 != 0)
}

fn swap(v: u8) -> (u8, bool) {
    ((v << 4) | (v >> 4), false)
}

fn srl(v: u8) -> (u8, bool) {
    (v >> 1, v & 0x01 != 0)
}

// -- stack helpers for control flow --------------------------------------

fn call(cpu: &mut Cpu, target: u16) -> Result<(), Error> {
    let return_to = cpu.pc();
    cpu.push_word(return_to)?;
    cpu.set_pc(target);
    Ok(())
}

fn ret(cpu: &mut Cpu) -> Result<(), Error> {
    let target = cpu.pop_word()?;
    cpu.set_pc(target);
    Ok(())
}

// -- primary table --------------------------------------------------------

fn execute_primary(cpu: &mut Cpu, d: &Decoded) -> Result<bool, Error> {
    let op = d.opcode;

    if (0x40..=0x7f).contains(&op) && op != 0x76 {
        let dst = (op >> 3) & 7;
        let src = op & 7;
        let v = cpu.get_r8(src)?;
        cpu.set_r8(dst, v)?;
        return Ok(false);
    }

    if (0x80..=0xbf).contains(&op) {
        let group = (op - 0x80) >> 3;
        let reg = op & 7;
        let v = cpu.get_r8(reg)?;
        match group {
            0 => add8(cpu, v, false, d.flags),
            1 => add8(cpu, v, true, d.flags),
            2 => sub8(cpu, v, false, d.flags, true),
            3 => sub8(cpu, v, true, d.flags, true),
            4 => and8(cpu, v, d.flags),
            5 => xor8(cpu, v, d.flags),
            6 => or8(cpu, v, d.flags),
            _ => sub8(cpu, v, false, d.flags, false), // CP
        }
        return Ok(false);
    }

    match op {
        0x00 => {}
        0x01 => cpu.set_bc(imm16(d)),
        0x02 => cpu.bus_mut().write(cpu.bc(), cpu.regs.a)?,
        0x03 => cpu.set_bc(cpu.bc().wrapping_add(1)),
        0x04 => inc8(cpu, 0, d.flags)?,
        0x05 => dec8(cpu, 0, d.flags)?,
        0x06 => cpu.regs.b = imm8(d),
        0x07 => {
            let (v, c) = rlc(cpu.regs.a);
            cpu.regs.a = v;
            apply_flags(&mut cpu.flags, d.flags, Calc { z: false, n: false, h: false, c });
        }
        0x08 => {
            let target = imm16(d);
            cpu.bus_mut().write16(target, cpu.sp())?;
        }
        0x09 => add_hl(cpu, cpu.bc(), d.flags),
        0x0a => cpu.regs.a = cpu.bus().read(cpu.bc())?,
        0x0b => cpu.set_bc(cpu.bc().wrapping_sub(1)),
        0x0c => inc8(cpu, 1, d.flags)?,
        0x0d => dec8(cpu, 1, d.flags)?,
        0x0e => cpu.regs.c = imm8(d),
        0x0f => {
            let (v, c) = rrc(cpu.regs.a);
            cpu.regs.a = v;
            apply_flags(&mut cpu.flags, d.flags, Calc { z: false, n: false, h: false, c });
        }

        0x10 => return Err(Error::NotImplemented { mnemonic: "STOP", opcode: op, pc: d.pc }),
        0x11 => cpu.set_de(imm16(d)),
        0x12 => cpu.bus_mut().write(cpu.de(), cpu.regs.a)?,
        0x13 => cpu.set_de(cpu.de().wrapping_add(1)),
        0x14 => inc8(cpu, 2, d.flags)?,
        0x15 => dec8(cpu, 2, d.flags)?,
        0x16 => cpu.regs.d = imm8(d),
        0x17 => {
            let (v, c) = rl(cpu.regs.a, cpu.flags.c);
            cpu.regs.a = v;
            apply_flags(&mut cpu.flags, d.flags, Calc { z: false, n: false, h: false, c });
        }
        0x18 => {
            cpu.set_pc(cpu.pc().wrapping_add(rel(d) as i16 as u16));
        }
        0x19 => add_hl(cpu, cpu.de(), d.flags),
        0x1a => cpu.regs.a = cpu.bus().read(cpu.de())?,
        0x1b => cpu.set_de(cpu.de().wrapping_sub(1)),
        0x1c => inc8(cpu, 3, d.flags)?,
        0x1d => dec8(cpu, 3, d.flags)?,
        0x1e => cpu.regs.e = imm8(d),
        0x1f => {
            let (v, c) = rr(cpu.regs.a, cpu.flags.c);
            cpu.regs.a = v;
            apply_flags(&mut cpu.flags, d.flags, Calc { z: false, n: false, h: false, c });
        }

        0x20 => {
            if !cpu.flags.z {
                cpu.set_pc(cpu.pc().wrapping_add(rel(d) as i16 as u16));
                return Ok(true);
            }
            return Ok(false);
        }
        0x21 => cpu.set_hl(imm16(d)),
        0x22 => {
            cpu.bus_mut().write(cpu.hl(), cpu.regs.a)?;
            cpu.set_hl(cpu.hl().wrapping_add(1));
        }
        0x23 => cpu.set_hl(cpu.hl().wrapping_add(1)),
        0x24 => inc8(cpu, 4, d.flags)?,
        0x25 => dec8(cpu, 4, d.flags)?,
        0x26 => cpu.regs.h = imm8(d),
        0x27 => daa(cpu, d.flags),
        0x28 => {
            if cpu.flags.z {
                cpu.set_pc(cpu.pc().wrapping_add(rel(d) as i16 as u16));
                return Ok(true);
            }
            return Ok(false);
        }
        0x29 => add_hl(cpu, cpu.hl(), d.flags),
        0x2a => {
            cpu.regs.a = cpu.bus().read(cpu.hl())?;
            cpu.set_hl(cpu.hl().wrapping_add(1));
        }
        0x2b => cpu.set_hl(cpu.hl().wrapping_sub(1)),
        0x2c => inc8(cpu, 5, d.flags)?,
        0x2d => dec8(cpu, 5, d.flags)?,
        0x2e => cpu.regs.l = imm8(d),
        0x2f => {
            cpu.regs.a = !cpu.regs.a;
            apply_flags(&mut cpu.flags, d.flags, Calc { z: false, n: true, h: true, c: false });
        }

        0x30 => {
            if !cpu.flags.c {
                cpu.set_pc(cpu.pc().wrapping_add(rel(d) as i16 as u16));
                return Ok(true);
            }
            return Ok(false);
        }
        0x31 => cpu.set_sp(imm16(d)),
        0x32 => {
            cpu.bus_mut().write(cpu.hl(), cpu.regs.a)?;
            cpu.set_hl(cpu.hl().wrapping_sub(1));
        }
        0x33 => cpu.set_sp(cpu.sp().wrapping_add(1)),
        0x34 => inc8(cpu, 6, d.flags)?,
        0x35 => dec8(cpu, 6, d.flags)?,
        0x36 => cpu.bus_mut().write(cpu.hl(), imm8(d))?,
        0x37 => apply_flags(&mut cpu.flags, d.flags, Calc { z: false, n: false, h: false, c: true }),
        0x38 => {
            if cpu.flags.c {
                cpu.set_pc(cpu.pc().wrapping_add(rel(d) as i16 as u16));
                return Ok(true);
            }
            return Ok(false);
        }
        0x39 => add_hl(cpu, cpu.sp(), d.flags),
        0x3a => {
            cpu.regs.a = cpu.bus().read(cpu.hl())?;
            cpu.set_hl(cpu.hl().wrapping_sub(1));
        }
        0x3b => cpu.set_sp(cpu.sp().wrapping_sub(1)),
        0x3c => inc8(cpu, 7, d.flags)?,
        0x3d => dec8(cpu, 7, d.flags)?,
        0x3e => cpu.regs.a = imm8(d),
        0x3f => {
            let c = !cpu.flags.c;
            apply_flags(&mut cpu.flags, d.flags, Calc { z: false, n: false, h: false, c });
        }

        0x76 => return Err(Error::NotImplemented { mnemonic: "HALT", opcode: op, pc: d.pc }),

        0xc0 => {
            if !cpu.flags.z {
                ret(cpu)?;
                return Ok(true);
            }
            return Ok(false);
        }
        0xc1 => {
            let v = cpu.pop_word()?;
            cpu.set_bc(v);
        }
        0xc2 => {
            if !cpu.flags.z {
                cpu.set_pc(addr(d));
                return Ok(true);
            }
            return Ok(false);
        }
        0xc3 => cpu.set_pc(addr(d)),
        0xc4 => {
            if !cpu.flags.z {
                call(cpu, addr(d))?;
                return Ok(true);
            }
            return Ok(false);
        }
        0xc5 => cpu.push_word(cpu.bc())?,
        0xc6 => add8(cpu, imm8(d), false, d.flags),
        0xc7 => call(cpu, 0x00)?,
        0xc8 => {
            if cpu.flags.z {
                ret(cpu)?;
                return Ok(true);
            }
            return Ok(false);
        }
        0xc9 => ret(cpu)?,
        0xca => {
            if cpu.flags.z {
                cpu.set_pc(addr(d));
                return Ok(true);
            }
            return Ok(false);
        }
        0xcb => unreachable!("0xCB is always consumed as a prefix by decode"),
        0xcc => {
            if cpu.flags.z {
                call(cpu, addr(d))?;
                return Ok(true);
            }
            return Ok(false);
        }
        0xcd => call(cpu, addr(d))?,
        0xce => add8(cpu, imm8(d), true, d.flags),
        0xcf => call(cpu, 0x08)?,

        0xd0 => {
            if !cpu.flags.c {
                ret(cpu)?;
                return Ok(true);
            }
            return Ok(false);
        }
        0xd1 => {
            let v = cpu.pop_word()?;
            cpu.set_de(v);
        }
        0xd2 => {
            if !cpu.flags.c {
                cpu.set_pc(addr(d));
                return Ok(true);
            }
            return Ok(false);
        }
        0xd4 => {
            if !cpu.flags.c {
                call(cpu, addr(d))?;
                return Ok(true);
            }
            return Ok(false);
        }
        0xd5 => cpu.push_word(cpu.de())?,
        0xd6 => sub8(cpu, imm8(d), false, d.flags, true),
        0xd7 => call(cpu, 0x10)?,
        0xd8 => {
            if cpu.flags.c {
                ret(cpu)?;
                return Ok(true);
            }
            return Ok(false);
        }
        0xd9 => {
            ret(cpu)?;
            cpu.ime = true;
        }
        0xda => {
            if cpu.flags.c {
                cpu.set_pc(addr(d));
                return Ok(true);
            }
            return Ok(false);
        }
        0xdc => {
            if cpu.flags.c {
                call(cpu, addr(d))?;
                return Ok(true);
            }
            return Ok(false);
        }
        0xde => sub8(cpu, imm8(d), true, d.flags, true),
        0xdf => call(cpu, 0x18)?,

        0xe0 => cpu.bus_mut().write(addr(d), cpu.regs.a)?,
        0xe1 => {
            let v = cpu.pop_word()?;
            cpu.set_hl(v);
        }
        0xe2 => cpu.bus_mut().write(0xff00 + cpu.regs.c as u16, cpu.regs.a)?,
        0xe5 => cpu.push_word(cpu.hl())?,
        0xe6 => and8(cpu, imm8(d), d.flags),
        0xe7 => call(cpu, 0x20)?,
        0xe8 => {
            let r8 = rel(d);
            let result = sp_plus_signed(cpu, r8, d.flags);
            cpu.set_sp(result);
        }
        0xe9 => cpu.set_pc(cpu.hl()),
        0xea => cpu.bus_mut().write(addr(d), cpu.regs.a)?,
        0xee => xor8(cpu, imm8(d), d.flags),
        0xef => call(cpu, 0x28)?,

        0xf0 => cpu.regs.a = cpu.bus().read(addr(d))?,
        0xf1 => {
            let v = cpu.pop_word()?;
            let (hi, lo) = crate::util::unpack16(v);
            cpu.regs.a = hi;
            cpu.flags = Flags::from_byte(lo);
        }
        0xf2 => cpu.regs.a = cpu.bus().read(0xff00 + cpu.regs.c as u16)?,
        0xf3 => cpu.ime = false,
        0xf5 => cpu.push_word(cpu.af())?,
        0xf6 => or8(cpu, imm8(d), d.flags),
        0xf7 => call(cpu, 0x30)?,
        0xf8 => {
            let r8 = rel(d);
            let result = sp_plus_signed(cpu, r8, d.flags);
            cpu.set_hl(result);
        }
        0xf9 => cpu.set_sp(cpu.hl()),
        0xfa => cpu.regs.a = cpu.bus().read(addr(d))?,
        0xfb => cpu.ime = true,
        0xfe => sub8(cpu, imm8(d), false, d.flags, false),
        0xff => call(cpu, 0x38)?,

        _ => return Err(Error::Decode { pc: d.pc, opcode: op, raw: d.raw.clone(), prefixed: false }),
    }

    Ok(false)
}

// -- CB-prefixed table ----------------------------------------------------

fn execute_cb(cpu: &mut Cpu, d: &Decoded) -> Result<bool, Error> {
    let op = d.opcode;
    let reg = op & 7;

    if op < 0x40 {
        let group = op >> 3;
        let v = cpu.get_r8(reg)?;
        let (result, c) = match group {
            0 => rlc(v),
            1 => rrc(v),
            2 => rl(v, cpu.flags.c),
            3 => rr(v, cpu.flags.c),
            4 => sla(v),
            5 => sra(v),
            6 => swap(v),
            _ => srl(v),
        };
        apply_flags(&mut cpu.flags, d.flags, Calc { z: result == 0, n: false, h: false, c });
        cpu.set_r8(reg, result)?;
        return Ok(false);
    }

    if op < 0x80 {
        let bit = (op - 0x40) >> 3;
        let v = cpu.get_r8(reg)?;
        let zero = v & (1 << bit) == 0;
        apply_flags(&mut cpu.flags, d.flags, Calc { z: zero, n: false, h: true, c: false });
        return Ok(false);
    }

    if op < 0xc0 {
        let bit = (op - 0x80) >> 3;
        let v = cpu.get_r8(reg)?;
        cpu.set_r8(reg, v & !(1 << bit))?;
        return Ok(false);
    }

    let bit = (op - 0xc0) >> 3;
    let v = cpu.get_r8(reg)?;
    cpu.set_r8(reg, v | (1 << bit))?;
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::Bus;
    use crate::cartridge::Cartridge;
    use crate::cpu::decode;
    use crate::display::Display;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn cpu_with_program(bytes: &[u8]) -> Cpu {
        let mut rom = vec![0u8; 0x8000];
        rom[0x100..0x100 + bytes.len()].copy_from_slice(bytes);
        let cart = Cartridge::from_vec(rom);
        let mut rng = StdRng::seed_from_u64(7);
        let display = Display::new(&mut rng);
        let bus = Bus::new(cart, display, &mut rng);
        let mut cpu = Cpu::new(bus);
        cpu.set_pc(0x100);
        cpu.bus_mut().write(0xff50, 1).unwrap();
        cpu
    }

    fn step_once(cpu: &mut Cpu) {
        let d = decode::decode(cpu.bus(), cpu.pc()).unwrap();
        cpu.set_pc(d.next_pc);
        execute(cpu, &d).unwrap();
    }

    #[test]
    fn ld_bc_d16_loads_immediate() {
        let mut cpu = cpu_with_program(&[0x01, 0x34, 0x12]);
        step_once(&mut cpu);
        assert_eq!(cpu.bc(), 0x1234);
    }

    #[test]
    fn inc_b_sets_zero_and_half_carry() {
        let mut cpu = cpu_with_program(&[0x04]);
        cpu.set_bc(0x0f00);
        step_once(&mut cpu);
        assert_eq!(cpu.bc() >> 8, 0x10);
    }

    #[test]
    fn add_a_b_computes_carry() {
        let mut cpu = cpu_with_program(&[0x80]);
        cpu.set_af(0xff00);
        cpu.set_bc(0x0100);
        step_once(&mut cpu);
        assert_eq!(cpu.af() >> 8, 0x00);
        assert_eq!(cpu.af() & 0x10, 0x10); // carry set
        assert_eq!(cpu.af() & 0x80, 0x80); // zero set
    }

    #[test]
    fn jr_nz_taken_when_not_zero() {
        let mut cpu = cpu_with_program(&[0x20, 0x05]); // JR NZ, +5
        cpu.set_af(0x0000);
        step_once(&mut cpu);
        assert_eq!(cpu.pc(), 0x100 + 2 + 5);
    }

    #[test]
    fn call_and_ret_roundtrip_pc() {
        let mut cpu = cpu_with_program(&[0xcd, 0x00, 0x02, 0xc9]); // CALL 0x0200; (at 0x200) RET
        cpu.set_sp(0xfffe);
        step_once(&mut cpu); // CALL
        assert_eq!(cpu.pc(), 0x0200);
        cpu.bus_mut().write(0x0200, 0xc9).unwrap();
        step_once(&mut cpu); // RET
        assert_eq!(cpu.pc(), 0x103);
    }

    #[test]
    fn cb_bit_7_h_sets_zero_when_clear() {
        let mut cpu = cpu_with_program(&[0xcb, 0x7c]); // BIT 7, H
        cpu.set_hl(0x0000);
        step_once(&mut cpu);
        assert!(cpu.af() & 0x80 != 0);
    }

    #[test]
    fn cb_swap_a_clears_carry() {
        let mut cpu = cpu_with_program(&[0xcb, 0x37]); // SWAP A
        cpu.set_af(0xf0f0);
        step_once(&mut cpu);
        assert_eq!(cpu.af() >> 8, 0x0f);
        assert_eq!(cpu.af() & 0x10, 0);
    }

    #[test]
    fn xor_a_zeroes_accumulator_and_sets_only_zero_flag() {
        let mut cpu = cpu_with_program(&[0xaf]); // XOR A
        cpu.set_af(0x3c00);
        step_once(&mut cpu);
        assert_eq!(cpu.af(), 0x0080);
    }

    #[test]
    fn ld_r_r_leaves_register_file_and_flags_unchanged() {
        let mut cpu = cpu_with_program(&[0x7f]); // LD A, A
        cpu.set_af(0x5230);
        cpu.set_bc(0x1122);
        step_once(&mut cpu);
        assert_eq!(cpu.af(), 0x5230);
        assert_eq!(cpu.bc(), 0x1122);
    }

    #[test]
    fn daa_corrects_bcd_addition() {
        // 0x45 + 0x38 in BCD should read 0x83, not the raw binary 0x7d.
        let mut cpu = cpu_with_program(&[0x80, 0x27]); // ADD A,B ; DAA
        cpu.set_af(0x4500);
        cpu.set_bc(0x3800);
        step_once(&mut cpu);
        step_once(&mut cpu);
        assert_eq!(cpu.af() >> 8, 0x83);
    }
}
