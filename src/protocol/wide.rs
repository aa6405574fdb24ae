//! Wide string: satu code unit 32-bit per karakter
//!
//! Di wire setiap karakter dikirim sebagai u32 big-endian, jadi representasi
//! di memori juga memakai `u32` supaya code unit yang bukan `char` valid
//! (misalnya surrogate) tetap utuh setelah round-trip.

use std::fmt;

/// Owned wide string (sequence of 32-bit code units).
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct WideString {
    units: Vec<u32>,
}

impl WideString {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap raw code units tanpa validasi
    pub fn from_units(units: Vec<u32>) -> Self {
        Self { units }
    }

    #[inline(always)]
    pub fn units(&self) -> &[u32] {
        &self.units
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn push(&mut self, unit: u32) {
        self.units.push(unit);
    }

    /// Convert ke `String`, code unit invalid diganti U+FFFD
    pub fn to_string_lossy(&self) -> String {
        self.units
            .iter()
            .map(|&u| char::from_u32(u).unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    }
}

impl From<&str> for WideString {
    fn from(s: &str) -> Self {
        Self {
            units: s.chars().map(u32::from).collect(),
        }
    }
}

impl fmt::Debug for WideString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WideString({:?})", self.to_string_lossy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_keeps_code_points() {
        let w = WideString::from("Aé€");
        assert_eq!(w.units(), &[0x41, 0xE9, 0x20AC]);
        assert_eq!(w.to_string_lossy(), "Aé€");
    }

    #[test]
    fn test_lossy_replaces_surrogates() {
        let w = WideString::from_units(vec![0x48, 0xD800, 0x49]);
        assert_eq!(w.len(), 3);
        assert_eq!(w.to_string_lossy(), "H\u{FFFD}I");
    }
}
