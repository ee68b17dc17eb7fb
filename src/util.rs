//! Small free functions shared across the core: byte packing and the
//! post-boot snapshot used both to skip the boot ROM and to verify it ran
//! correctly.

use crate::bus::Bus;
use crate::cpu::Cpu;
use crate::error::{Error, VerificationFailure};

/// Reinterpret a raw byte as the Game Boy's signed 8-bit relative operand.
pub fn u8_to_signed(byte: u8) -> i8 {
    byte as i8
}

/// Combine `hi`/`lo` into a 16-bit big-endian value, as register pairs do.
pub fn pack16(hi: u8, lo: u8) -> u16 {
    ((hi as u16) << 8) | lo as u16
}

/// Split a 16-bit value into `(hi, lo)`.
pub fn unpack16(value: u16) -> (u8, u8) {
    ((value >> 8) as u8, (value & 0xff) as u8)
}

/// One post-boot register or memory location this core checks.
struct Expectation {
    name: &'static str,
    expected: u16,
    actual: fn(&Cpu, &Bus) -> Result<u16, Error>,
}

fn register_expectations() -> Vec<Expectation> {
    vec![
        Expectation { name: "AF", expected: 0x01b0, actual: |c, _| Ok(c.af()) },
        Expectation { name: "BC", expected: 0x0013, actual: |c, _| Ok(c.bc()) },
        Expectation { name: "DE", expected: 0x00d8, actual: |c, _| Ok(c.de()) },
        Expectation { name: "HL", expected: 0x014d, actual: |c, _| Ok(c.hl()) },
        Expectation { name: "SP", expected: 0xfffe, actual: |c, _| Ok(c.sp()) },
        Expectation { name: "PC", expected: 0x0100, actual: |c, _| Ok(c.pc()) },
    ]
}

/// `(address, expected byte)` pairs from the canonical post-boot snapshot
/// (§6), excluding the register file handled separately above.
const MEMORY_SNAPSHOT: &[(u16, u8)] = &[
    (0xff05, 0x00), (0xff06, 0x00), (0xff07, 0x00),
    (0xff10, 0x80), (0xff11, 0xbf), (0xff12, 0xf3), (0xff14, 0xbf),
    (0xff16, 0x3f), (0xff17, 0x00), (0xff19, 0xbf), (0xff1a, 0x7f),
    (0xff1b, 0xff), (0xff1c, 0x9f), (0xff1e, 0xbf), (0xff20, 0xff),
    (0xff21, 0x00), (0xff22, 0x00), (0xff23, 0xbf), (0xff24, 0x77),
    (0xff25, 0xf3), (0xff26, 0xf1), (0xff40, 0x91), (0xff42, 0x00),
    (0xff43, 0x00), (0xff45, 0x00), (0xff47, 0xfc), (0xff48, 0xff),
    (0xff49, 0xff), (0xff4a, 0x00), (0xff4b, 0x00), (0xffff, 0x00),
];

/// Compare the current register file and a fixed set of memory locations
/// against the canonical post-boot snapshot (§6). Returns every mismatch
/// rather than stopping at the first one, so a single failed run reports
/// everything wrong at once.
pub fn verify_post_boot(cpu: &Cpu, bus: &Bus) -> Result<(), Error> {
    let mut failures = Vec::new();

    for expectation in register_expectations() {
        let actual = (expectation.actual)(cpu, bus)?;
        if actual != expectation.expected {
            failures.push(VerificationFailure {
                location: expectation.name.to_string(),
                expected: expectation.expected,
                actual,
            });
        }
    }

    for &(address, expected) in MEMORY_SNAPSHOT {
        let actual = bus.read(address)? as u16;
        if actual != expected as u16 {
            failures.push(VerificationFailure {
                location: format!("${address:04x}"),
                expected: expected as u16,
                actual,
            });
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(Error::Verification(failures))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack_roundtrip() {
        for hi in 0..=0xffu16 {
            let lo = (0xff - hi) as u8;
            let packed = pack16(hi as u8, lo);
            assert_eq!(unpack16(packed), (hi as u8, lo));
        }
    }

    #[test]
    fn signed_conversion_matches_twos_complement() {
        assert_eq!(u8_to_signed(0x00), 0);
        assert_eq!(u8_to_signed(0x7f), 127);
        assert_eq!(u8_to_signed(0x80), -128);
        assert_eq!(u8_to_signed(0xff), -1);
    }
}
