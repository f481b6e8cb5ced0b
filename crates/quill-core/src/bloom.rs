//! Fixed-size Bloom filter used as the per-comment `voters` field.
//!
//! The filter is 256 bytes (2048 bits) with 11 probes per key. Probes are
//! consecutive 11-bit windows read from the low end of the key's SHA-256
//! digest interpreted as a big-endian integer, each masked to the bit count.
//! The byte layout is what the `comments.voters` column stores, so it must
//! stay stable across releases.

use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// Size of the serialised filter in bytes.
pub const FILTER_BYTES: usize = 256;

/// Number of probe positions derived from each key.
const PROBES: usize = 11;

/// Total number of addressable bits.
const BITS: usize = FILTER_BYTES * 8;

/// Probabilistic set of voter identities (remote addresses).
#[derive(Clone, PartialEq, Eq)]
pub struct Bloomfilter {
  array:    [u8; FILTER_BYTES],
  elements: usize,
}

impl Bloomfilter {
  /// An empty filter.
  pub fn new() -> Self {
    Self { array: [0; FILTER_BYTES], elements: 0 }
  }

  /// Rehydrate a filter from its stored bytes.
  ///
  /// The element count is not persisted, so the result reports zero elements.
  pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
    let array: [u8; FILTER_BYTES] =
      bytes.try_into().map_err(|_| Error::InvalidFilterLength {
        expected: FILTER_BYTES,
        actual:   bytes.len(),
      })?;
    Ok(Self { array, elements: 0 })
  }

  pub fn add(&mut self, key: &str) {
    for i in probes(key) {
      self.array[i / 8] |= 1 << (i % 8);
    }
    self.elements += 1;
  }

  /// May return false positives, never false negatives.
  pub fn contains(&self, key: &str) -> bool {
    probes(key).all(|i| self.array[i / 8] & (1 << (i % 8)) != 0)
  }

  /// Keys added since construction (not since the bytes were first written).
  pub fn elements(&self) -> usize { self.elements }

  pub fn as_bytes(&self) -> &[u8] { &self.array }

  pub fn into_bytes(self) -> Vec<u8> { self.array.to_vec() }
}

impl Default for Bloomfilter {
  fn default() -> Self { Self::new() }
}

impl std::fmt::Debug for Bloomfilter {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let set: u32 = self.array.iter().map(|b| b.count_ones()).sum();
    f.debug_struct("Bloomfilter")
      .field("elements", &self.elements)
      .field("bits_set", &set)
      .finish()
  }
}

impl<S: AsRef<str>> FromIterator<S> for Bloomfilter {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    let mut filter = Self::new();
    for key in iter {
      filter.add(key.as_ref());
    }
    filter
  }
}

/// Bit positions for `key`.
fn probes(key: &str) -> impl Iterator<Item = usize> {
  let digest = Sha256::digest(key.as_bytes());
  let width = BITS.trailing_zeros() as usize;
  (0..PROBES).map(move |probe| {
    let mut value = 0usize;
    for bit in 0..width {
      // Bit `j` of the big-endian integer lives in byte `31 - j / 8`.
      let j = probe * PROBES + bit;
      let byte = digest[digest.len() - 1 - j / 8];
      if (byte >> (j % 8)) & 1 == 1 {
        value |= 1 << bit;
      }
    }
    value & (BITS - 1)
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn added_keys_are_members() {
    let filter: Bloomfilter = ["127.0.0.0", "10.1.2.0"].into_iter().collect();
    assert!(filter.contains("127.0.0.0"));
    assert!(filter.contains("10.1.2.0"));
    assert_eq!(filter.elements(), 2);
  }

  #[test]
  fn empty_filter_contains_nothing() {
    let filter = Bloomfilter::new();
    assert!(!filter.contains("127.0.0.0"));
    assert!(filter.as_bytes().iter().all(|b| *b == 0));
  }

  #[test]
  fn single_key_sets_at_most_one_bit_per_probe() {
    let filter: Bloomfilter = ["127.0.0.0"].into_iter().collect();
    let set: u32 = filter.as_bytes().iter().map(|b| b.count_ones()).sum();
    assert!(set >= 1);
    assert!(set as usize <= PROBES);
  }

  #[test]
  fn construction_is_deterministic() {
    let a: Bloomfilter = ["127.0.0.0"].into_iter().collect();
    let b: Bloomfilter = ["127.0.0.0"].into_iter().collect();
    assert_eq!(a.as_bytes(), b.as_bytes());
  }

  #[test]
  fn from_bytes_preserves_membership() {
    let original: Bloomfilter = ["192.168.0.0"].into_iter().collect();
    let restored = Bloomfilter::from_bytes(original.as_bytes()).unwrap();
    assert!(restored.contains("192.168.0.0"));
    assert_eq!(restored.elements(), 0);
  }

  #[test]
  fn from_bytes_rejects_wrong_length() {
    let err = Bloomfilter::from_bytes(&[0u8; 12]).unwrap_err();
    assert!(matches!(
      err,
      Error::InvalidFilterLength { expected: FILTER_BYTES, actual: 12 }
    ));
  }
}
