//! Named, offset-addressed memory regions backing the bus.
//!
//! A `Region` is the building block the bus maps the 16-bit address space
//! onto: work RAM, external work RAM, and (owned by the display) video RAM
//! are all plain `Region`s. Cartridge ROM banks are kept separately by
//! [`crate::cartridge::Cartridge`] since they are read-only and bank-switched
//! rather than linearly addressed.

use rand::RngCore;

use crate::error::Error;

/// A fixed-size, optionally read-only byte array mapped at some base
/// address on the bus.
///
/// Power-on contents are pseudo-random by design (see the module docs):
/// real Game Boy hardware does not zero-initialize RAM, and cartridge code
/// that assumes otherwise is a bug worth exposing rather than hiding.
#[derive(Debug, Clone)]
pub struct Region {
    name: &'static str,
    base: u16,
    data: Vec<u8>,
    read_only: bool,
}

impl Region {
    /// Create a region of `len` bytes at `base`, filled with pseudo-random
    /// garbage drawn from `rng`.
    pub fn randomized(name: &'static str, base: u16, len: usize, rng: &mut impl RngCore) -> Region {
        let mut data = vec![0u8; len];
        rng.fill_bytes(&mut data);

        Region { name, base, data, read_only: false }
    }

    /// Create a region of `len` bytes at `base`, filled with zeroes.
    ///
    /// Used for regions whose reset behaviour is architecturally
    /// deterministic (the boot ROM overlay, cartridge-derived data) rather
    /// than power-on garbage.
    pub fn zeroed(name: &'static str, base: u16, len: usize) -> Region {
        Region { name, base, data: vec![0u8; len], read_only: false }
    }

    /// Wrap already-loaded bytes as a read-only region (e.g. a boot ROM
    /// image or cartridge ROM bank).
    pub fn from_bytes_read_only(name: &'static str, base: u16, data: Vec<u8>) -> Region {
        Region { name, base, data, read_only: true }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn base(&self) -> u16 {
        self.base
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Translate an absolute bus address into an in-region index, checking
    /// bounds.
    fn index(&self, address: u16) -> Result<usize, Error> {
        let offset = address.wrapping_sub(self.base) as usize;
        if offset < self.data.len() {
            Ok(offset)
        } else {
            Err(Error::memory(self.name, address, "address out of range"))
        }
    }

    pub fn read(&self, address: u16) -> Result<u8, Error> {
        self.index(address).map(|i| self.data[i])
    }

    pub fn write(&mut self, address: u16, value: u8) -> Result<(), Error> {
        if self.read_only {
            return Err(Error::memory(self.name, address, "write to read-only region"));
        }

        let i = self.index(address)?;
        self.data[i] = value;
        Ok(())
    }

    /// Raw slice access for bulk readers (the debugger's memory dump, the
    /// display's tile/map decoder).
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0xc0ffee)
    }

    #[test]
    fn read_write_roundtrip() {
        let mut r = Region::randomized("test", 0xc000, 0x2000, &mut rng());
        r.write(0xc010, 0x42).unwrap();
        assert_eq!(r.read(0xc010).unwrap(), 0x42);
    }

    #[test]
    fn out_of_range_read_fails() {
        let r = Region::zeroed("test", 0xc000, 0x10);
        assert!(r.read(0xc010).is_err());
    }

    #[test]
    fn read_only_write_fails() {
        let mut r = Region::from_bytes_read_only("rom", 0x0000, vec![1, 2, 3]);
        assert!(r.write(0x0001, 0xff).is_err());
        assert_eq!(r.read(0x0001).unwrap(), 2);
    }

    #[test]
    fn reproducible_with_seeded_rng() {
        let a = Region::randomized("a", 0, 64, &mut rng());
        let b = Region::randomized("b", 0, 64, &mut rng());
        assert_eq!(a.as_slice(), b.as_slice());
    }
}
