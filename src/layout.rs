//! Raw field access for bucket cells and records.
//!
//! Every multi-byte field in the buffer is a little-endian word. Chain
//! links are offsets from the arena base; `usize::MAX` encodes the empty
//! link, so offset 0 stays a valid record address.
//!
//! Record layout, header words first, bytes inline:
//!
//! ```text
//! [ next | capacity | key_size | value_size | key bytes... | value bytes... ]
//! ```
//!
//! Invariants upheld by the callers and checked here by bounds-checked
//! slicing:
//! - `capacity` is written once, when the record is carved from the arena,
//!   and never changes while the record remains allocated;
//! - `RECORD_HEADER_SIZE + key_size + value_size <= capacity` at all times;
//! - a record's full capacity lies inside the arena region.

pub(crate) const WORD_SIZE: usize = core::mem::size_of::<usize>();

/// One bucket cell: head and tail links of the chain.
pub(crate) const BUCKET_SIZE: usize = 2 * WORD_SIZE;

/// Record header: next link, capacity, key size, value size.
pub(crate) const RECORD_HEADER_SIZE: usize = 4 * WORD_SIZE;

const NIL_WORD: usize = usize::MAX;

const NEXT_OFFSET: usize = 0;
const CAPACITY_OFFSET: usize = WORD_SIZE;
const KEY_SIZE_OFFSET: usize = 2 * WORD_SIZE;
const VALUE_SIZE_OFFSET: usize = 3 * WORD_SIZE;

#[allow(clippy::expect_used)]
pub(crate) fn read_word(buffer: &[u8], offset: usize) -> usize {
    let bytes = buffer
        .get(offset..offset + WORD_SIZE)
        .expect("word bounds checked during construction");
    usize::from_le_bytes(bytes.try_into().expect("exactly one word"))
}

#[allow(clippy::expect_used)]
pub(crate) fn write_word(buffer: &mut [u8], offset: usize, value: usize) {
    buffer
        .get_mut(offset..offset + WORD_SIZE)
        .expect("word bounds checked during construction")
        .copy_from_slice(&value.to_le_bytes());
}

pub(crate) fn read_link(buffer: &[u8], offset: usize) -> Option<usize> {
    match read_word(buffer, offset) {
        NIL_WORD => None,
        word => Some(word),
    }
}

pub(crate) fn write_link(buffer: &mut [u8], offset: usize, link: Option<usize>) {
    write_word(buffer, offset, link.unwrap_or(NIL_WORD));
}

/// Link to the next record in the same chain, or in the free list.
pub(crate) fn next(data: &[u8], record: usize) -> Option<usize> {
    read_link(data, record + NEXT_OFFSET)
}

pub(crate) fn set_next(data: &mut [u8], record: usize, link: Option<usize>) {
    write_link(data, record + NEXT_OFFSET, link);
}

/// Total byte span reserved for the record when it was carved.
pub(crate) fn capacity(data: &[u8], record: usize) -> usize {
    read_word(data, record + CAPACITY_OFFSET)
}

pub(crate) fn set_capacity(data: &mut [u8], record: usize, capacity: usize) {
    write_word(data, record + CAPACITY_OFFSET, capacity);
}

pub(crate) fn key_size(data: &[u8], record: usize) -> usize {
    read_word(data, record + KEY_SIZE_OFFSET)
}

pub(crate) fn value_size(data: &[u8], record: usize) -> usize {
    read_word(data, record + VALUE_SIZE_OFFSET)
}

#[allow(clippy::expect_used)]
pub(crate) fn key(data: &[u8], record: usize) -> &[u8] {
    let start = record + RECORD_HEADER_SIZE;
    data.get(start..start + key_size(data, record))
        .expect("key span validated on insert")
}

#[allow(clippy::expect_used)]
pub(crate) fn value(data: &[u8], record: usize) -> &[u8] {
    let start = record + RECORD_HEADER_SIZE + key_size(data, record);
    data.get(start..start + value_size(data, record))
        .expect("value span validated on insert")
}

/// Populates a freshly allocated record. The capacity word is left alone;
/// the allocator owns it.
#[allow(clippy::expect_used)]
pub(crate) fn write_entry(data: &mut [u8], record: usize, key: &[u8], value: &[u8]) {
    set_next(data, record, None);
    write_word(data, record + KEY_SIZE_OFFSET, key.len());
    write_word(data, record + VALUE_SIZE_OFFSET, value.len());

    let key_start = record + RECORD_HEADER_SIZE;
    data.get_mut(key_start..key_start + key.len())
        .expect("record span validated by the allocator")
        .copy_from_slice(key);

    if !value.is_empty() {
        let value_start = key_start + key.len();
        data.get_mut(value_start..value_start + value.len())
            .expect("record span validated by the allocator")
            .copy_from_slice(value);
    }
}

/// Rewrites the value bytes in place. Only legal when the new value is no
/// longer than the stored one; the caller checks before calling.
#[allow(clippy::expect_used)]
pub(crate) fn overwrite_value(data: &mut [u8], record: usize, value: &[u8]) {
    if !value.is_empty() {
        let start = record + RECORD_HEADER_SIZE + key_size(data, record);
        data.get_mut(start..start + value.len())
            .expect("record span validated by the allocator")
            .copy_from_slice(value);
    }
    write_word(data, record + VALUE_SIZE_OFFSET, value.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_round_trip() {
        let mut buffer = [0u8; 32];
        write_word(&mut buffer, 8, 0x1234_5678);
        assert_eq!(read_word(&buffer, 8), 0x1234_5678);
        assert_eq!(read_word(&buffer, 0), 0);
    }

    #[test]
    fn test_link_encoding() {
        let mut buffer = [0u8; 16];
        write_link(&mut buffer, 0, None);
        assert_eq!(read_link(&buffer, 0), None);
        write_link(&mut buffer, 0, Some(0));
        assert_eq!(read_link(&buffer, 0), Some(0));
        write_link(&mut buffer, 8, Some(42));
        assert_eq!(read_link(&buffer, 8), Some(42));
    }

    #[test]
    fn test_entry_round_trip() {
        let mut data = [0u8; 128];
        set_capacity(&mut data, 0, RECORD_HEADER_SIZE + 5 + 5);
        write_entry(&mut data, 0, b"hello", b"world");

        assert_eq!(next(&data, 0), None);
        assert_eq!(key_size(&data, 0), 5);
        assert_eq!(value_size(&data, 0), 5);
        assert_eq!(key(&data, 0), b"hello");
        assert_eq!(value(&data, 0), b"world");
        assert_eq!(capacity(&data, 0), RECORD_HEADER_SIZE + 10);
    }

    #[test]
    fn test_overwrite_value_shrinks_size_not_capacity() {
        let mut data = [0u8; 128];
        set_capacity(&mut data, 0, RECORD_HEADER_SIZE + 1 + 5);
        write_entry(&mut data, 0, b"k", b"alpha");

        overwrite_value(&mut data, 0, b"be");
        assert_eq!(value(&data, 0), b"be");
        assert_eq!(value_size(&data, 0), 2);
        assert_eq!(capacity(&data, 0), RECORD_HEADER_SIZE + 6);
        assert_eq!(key(&data, 0), b"k");
    }

    #[test]
    fn test_empty_value_entry() {
        let mut data = [0u8; 64];
        set_capacity(&mut data, 0, RECORD_HEADER_SIZE + 3);
        write_entry(&mut data, 0, b"key", b"");

        assert_eq!(key(&data, 0), b"key");
        assert_eq!(value(&data, 0), b"");
        assert_eq!(value_size(&data, 0), 0);
    }
}
