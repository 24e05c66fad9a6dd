use crate::arena::Arena;
use crate::config::{HashFn, U8MapConfig};
use crate::error::U8MapError;
use crate::iter::U8MapIter;
use crate::layout::{self, BUCKET_SIZE, RECORD_HEADER_SIZE, WORD_SIZE};

/// Iteration state: current bucket, current record, records yielded so far,
/// and the sticky end-of-table flag. The generation snapshot detects
/// mutation since the last reset.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    bucket: usize,
    record: Option<usize>,
    traversed: usize,
    exhausted: bool,
    generation: u64,
}

impl Cursor {
    fn start(generation: u64) -> Self {
        Cursor {
            bucket: 0,
            record: None,
            traversed: 0,
            exhausted: false,
            generation,
        }
    }
}

/// A separate-chaining hash map for byte keys and byte values, stored
/// entirely in a client-provided buffer.
///
/// Buffer layout: `[bucket array][arena]`. Each bucket holds the head and
/// tail of a singly-linked chain of records; records live in the arena and
/// are linked by offsets from the arena base. New entries append to their
/// chain's tail, so iteration within a bucket follows insertion order.
#[derive(Debug)]
pub struct U8Map<'a> {
    buffer: &'a mut [u8],
    hash: HashFn,
    bucket_count: usize,
    data_start: usize,
    entry_count: usize,
    buckets_occupied: usize,
    arena: Arena,
    cursor: Cursor,
    generation: u64,
}

impl<'a> U8Map<'a> {
    /// Creates a map with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns `U8MapError::InvalidConfiguration` if `config.bucket_count`
    /// is 0, and `U8MapError::BufferTooSmall` if the buffer cannot hold the
    /// bucket array.
    pub fn new(buffer: &'a mut [u8], config: U8MapConfig) -> Result<Self, U8MapError> {
        if config.bucket_count == 0 {
            return Err(U8MapError::InvalidConfiguration {
                parameter: "bucket_count",
                value: 0,
            });
        }

        let required = Self::min_buffer_size(config.bucket_count);
        if buffer.len() < required {
            return Err(U8MapError::BufferTooSmall {
                required,
                provided: buffer.len(),
            });
        }

        let arena = Arena::new(buffer.len() - required);
        let mut map = Self {
            buffer,
            hash: config.hash,
            bucket_count: config.bucket_count,
            data_start: required,
            entry_count: 0,
            buckets_occupied: 0,
            arena,
            cursor: Cursor::start(0),
            generation: 0,
        };
        for bucket in 0..map.bucket_count {
            map.set_chain_head(bucket, None);
            map.set_chain_tail(bucket, None);
        }
        Ok(map)
    }

    /// Creates a map with a configuration derived from the buffer size:
    /// FNV-1a hashing and a bucket array of roughly 12% of the buffer.
    ///
    /// # Errors
    ///
    /// Returns `U8MapError::BufferTooSmall` if the buffer cannot hold the
    /// derived bucket array.
    pub fn with_default_config(buffer: &'a mut [u8]) -> Result<Self, U8MapError> {
        let config = U8MapConfig::for_buffer_size(buffer.len());
        Self::new(buffer, config)
    }

    /// Smallest buffer that `new` accepts for `bucket_count` buckets. A
    /// buffer of exactly this size holds an empty map; the first insert
    /// reports `BufferOverflow`.
    #[must_use]
    pub const fn min_buffer_size(bucket_count: usize) -> usize {
        bucket_count * BUCKET_SIZE
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entry_count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    /// Fixed length of the bucket array.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    /// Number of buckets whose chain holds at least one entry.
    #[must_use]
    pub fn occupied_buckets(&self) -> usize {
        self.buckets_occupied
    }

    /// Bytes still available for new records. Space held by the free list
    /// is not counted: it is not contiguous and can only be reused record
    /// by record.
    #[must_use]
    pub fn available_bytes(&self) -> usize {
        self.arena.available()
    }

    /// Bytes consumed so far: the bucket array plus every record ever
    /// carved from the arena, freed records included.
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.data_start + self.arena.used()
    }

    #[must_use]
    pub fn buffer_capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Inserts or updates an entry. An existing entry is rewritten in
    /// place when the new value fits the stored one; otherwise the record
    /// is recycled through the free list and the entry is stored afresh.
    ///
    /// On `BufferOverflow` the map is unchanged, including a still-present
    /// previous value for the key.
    ///
    /// # Errors
    ///
    /// Returns `U8MapError::EmptyKey` for a zero-length key and
    /// `U8MapError::BufferOverflow` when the arena cannot hold the record.
    pub fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), U8MapError> {
        if key.is_empty() {
            return Err(U8MapError::EmptyKey);
        }

        let required = RECORD_HEADER_SIZE + key.len() + value.len();
        let (bucket, found) = self.locate(key);

        if let Some((record, prev)) = found {
            let data = &self.buffer[self.data_start..];
            if value.len() <= layout::value_size(data, record) {
                // Hot path: same size or smaller, rewrite in place. The
                // record keeps its original capacity.
                let start = self.data_start;
                layout::overwrite_value(&mut self.buffer[start..], record, value);
                self.generation += 1;
                return Ok(());
            }

            // The stored slot is too small. Confirm a new record can be
            // obtained before unlinking anything, so a full arena leaves
            // the entry untouched. The record being displaced counts as a
            // candidate because it reaches the free list first.
            let own_capacity = layout::capacity(data, record);
            if !self.arena.can_allocate(data, required, Some(own_capacity)) {
                return Err(U8MapError::BufferOverflow {
                    requested: required,
                    available: self.arena.available(),
                });
            }
            self.unlink(bucket, record, prev);
            let start = self.data_start;
            self.arena.free(&mut self.buffer[start..], record);
            self.entry_count -= 1;
        }

        let start = self.data_start;
        let record = match self.arena.allocate(&mut self.buffer[start..], required) {
            Some(record) => record,
            None => {
                return Err(U8MapError::BufferOverflow {
                    requested: required,
                    available: self.arena.available(),
                });
            }
        };
        layout::write_entry(&mut self.buffer[start..], record, key, value);
        self.append(bucket, record);
        self.entry_count += 1;
        self.generation += 1;
        Ok(())
    }

    /// Removes an entry, returning whether the key was present. The
    /// record's storage joins the free list for reuse; arena usage does
    /// not shrink.
    pub fn remove(&mut self, key: &[u8]) -> bool {
        let (bucket, found) = self.locate(key);
        match found {
            Some((record, prev)) => {
                self.unlink(bucket, record, prev);
                let start = self.data_start;
                self.arena.free(&mut self.buffer[start..], record);
                self.entry_count -= 1;
                self.generation += 1;
                true
            }
            None => false,
        }
    }

    /// Borrows the value stored for `key`. The borrow ends at the next
    /// mutating call; insert and remove may move or rewrite the record.
    #[must_use]
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        let (_, found) = self.locate(key);
        found.map(|(record, _)| layout::value(&self.buffer[self.data_start..], record))
    }

    #[must_use]
    pub fn contains_key(&self, key: &[u8]) -> bool {
        let (_, found) = self.locate(key);
        found.is_some()
    }

    /// Yields the next live entry, or `None` once every entry has been
    /// visited. The end state is sticky until `reset_cursor`. A map
    /// mutated since the last reset ends the traversal immediately rather
    /// than walking links that may have moved to the free list.
    pub fn next_item(&mut self) -> Option<(&[u8], &[u8])> {
        if self.cursor.exhausted {
            return None;
        }
        if self.cursor.generation != self.generation {
            self.cursor.exhausted = true;
            return None;
        }

        while self.cursor.bucket < self.bucket_count && self.cursor.traversed < self.entry_count {
            if self.cursor.record.is_none() {
                // Entering a new bucket; start from its chain head.
                self.cursor.record = self.chain_head(self.cursor.bucket);
            }

            match self.cursor.record {
                Some(record) => {
                    let start = self.data_start;
                    self.cursor.record = layout::next(&self.buffer[start..], record);
                    if self.cursor.record.is_none() {
                        self.cursor.bucket += 1;
                    }
                    self.cursor.traversed += 1;
                    let data = &self.buffer[start..];
                    return Some((layout::key(data, record), layout::value(data, record)));
                }
                None => self.cursor.bucket += 1,
            }
        }

        self.cursor.exhausted = true;
        None
    }

    /// Restores the cursor to the first bucket so iteration starts over.
    pub fn reset_cursor(&mut self) {
        self.cursor = Cursor::start(self.generation);
    }

    /// Returns a borrowing iterator over all live entries. Entries come
    /// out in ascending bucket order and, within a bucket, in insertion
    /// order; no ordering holds across buckets.
    #[must_use]
    pub fn iter(&self) -> U8MapIter<'_, 'a> {
        self.into_iter()
    }

    /// Chain walk. Returns the bucket index and, when the key is present,
    /// the matching record together with its predecessor. The predecessor
    /// is needed to fix the chain tail on unlink.
    fn locate(&self, key: &[u8]) -> (usize, Option<(usize, Option<usize>)>) {
        let bucket = ((self.hash)(key) as usize) % self.bucket_count;
        let data = &self.buffer[self.data_start..];
        let mut prev = None;
        let mut current = self.chain_head(bucket);
        while let Some(record) = current {
            if layout::key(data, record) == key {
                return (bucket, Some((record, prev)));
            }
            prev = current;
            current = layout::next(data, record);
        }
        (bucket, None)
    }

    fn append(&mut self, bucket: usize, record: usize) {
        match self.chain_tail(bucket) {
            Some(tail) => {
                let start = self.data_start;
                layout::set_next(&mut self.buffer[start..], tail, Some(record));
            }
            None => {
                self.set_chain_head(bucket, Some(record));
                self.buckets_occupied += 1;
            }
        }
        self.set_chain_tail(bucket, Some(record));
    }

    fn unlink(&mut self, bucket: usize, record: usize, prev: Option<usize>) {
        let start = self.data_start;
        let following = layout::next(&self.buffer[start..], record);
        match prev {
            Some(p) => layout::set_next(&mut self.buffer[start..], p, following),
            None => self.set_chain_head(bucket, following),
        }
        if self.chain_tail(bucket) == Some(record) {
            self.set_chain_tail(bucket, prev);
        }
        if self.chain_head(bucket).is_none() {
            self.buckets_occupied -= 1;
        }
    }

    pub(crate) fn chain_head(&self, bucket: usize) -> Option<usize> {
        layout::read_link(self.buffer, bucket * BUCKET_SIZE)
    }

    fn chain_tail(&self, bucket: usize) -> Option<usize> {
        layout::read_link(self.buffer, bucket * BUCKET_SIZE + WORD_SIZE)
    }

    fn set_chain_head(&mut self, bucket: usize, link: Option<usize>) {
        layout::write_link(self.buffer, bucket * BUCKET_SIZE, link);
    }

    fn set_chain_tail(&mut self, bucket: usize, link: Option<usize>) {
        layout::write_link(self.buffer, bucket * BUCKET_SIZE + WORD_SIZE, link);
    }

    pub(crate) fn arena_data(&self) -> &[u8] {
        &self.buffer[self.data_start..]
    }
}
