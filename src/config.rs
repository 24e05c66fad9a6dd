//! Hashing and table-shape configuration.

use crate::layout::BUCKET_SIZE;

/// Pluggable hash function: full key bytes in, 32-bit hash out.
pub type HashFn = fn(&[u8]) -> u32;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

// Floor for derived bucket counts; tiny buffers still get a usable spread.
const MIN_DERIVED_BUCKETS: usize = 10;

// Share of the buffer given to the bucket array when the caller supplies
// no configuration.
const BUCKET_ARRAY_SHARE_PERCENT: usize = 12;

/// 32-bit FNV-1a, the default hash function.
#[must_use]
pub fn fnv1a_32(data: &[u8]) -> u32 {
    let mut hash = FNV_OFFSET_BASIS;
    for &byte in data {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Table shape: the hash function and the fixed length of the bucket array.
///
/// The bucket count never changes after `U8Map::new`; there is no rehashing.
#[derive(Debug, Clone, Copy)]
pub struct U8MapConfig {
    /// Hash applied to every key
    pub hash: HashFn,
    /// Number of chain slots in the bucket array
    pub bucket_count: usize,
}

impl U8MapConfig {
    /// Derives a configuration for a buffer of `buffer_size` bytes: FNV-1a
    /// hashing and a bucket array sized to roughly 12% of the buffer, with
    /// a floor of 10 slots.
    #[must_use]
    pub fn for_buffer_size(buffer_size: usize) -> Self {
        let by_share = buffer_size * BUCKET_ARRAY_SHARE_PERCENT / 100 / BUCKET_SIZE;
        U8MapConfig {
            hash: fnv1a_32,
            bucket_count: by_share.max(MIN_DERIVED_BUCKETS),
        }
    }
}
