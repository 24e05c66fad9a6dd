//! Record allocator: a bump pointer over the arena tail plus a FIFO free
//! list of reclaimed records, reused first-fit.
//!
//! `used` only ever grows; freed records are recycled in place, never
//! compacted, merged, or split. A record that once satisfied some size
//! keeps its full capacity and stays reusable for any request up to it.

use crate::layout;

#[derive(Debug)]
pub(crate) struct Arena {
    total: usize,
    used: usize,
    free_head: Option<usize>,
    free_tail: Option<usize>,
}

impl Arena {
    pub(crate) fn new(total: usize) -> Self {
        Arena {
            total,
            used: 0,
            free_head: None,
            free_tail: None,
        }
    }

    /// Bytes never yet carved from the arena. Free-list capacity is not
    /// counted: it is not contiguous and can only satisfy requests record
    /// by record.
    pub(crate) fn available(&self) -> usize {
        self.total - self.used
    }

    pub(crate) fn used(&self) -> usize {
        self.used
    }

    /// Returns the offset of a record with capacity for `size_required`
    /// bytes, or `None` when neither the free list nor the remaining
    /// arena can provide one.
    ///
    /// The free list is walked head to tail and the first fitting record
    /// wins, with its original capacity intact and its `next` cleared.
    pub(crate) fn allocate(&mut self, data: &mut [u8], size_required: usize) -> Option<usize> {
        let mut prev: Option<usize> = None;
        let mut current = self.free_head;
        while let Some(record) = current {
            let following = layout::next(data, record);
            if layout::capacity(data, record) >= size_required {
                match prev {
                    Some(p) => layout::set_next(data, p, following),
                    None => self.free_head = following,
                }
                if self.free_tail == Some(record) {
                    self.free_tail = prev;
                }
                layout::set_next(data, record, None);
                return Some(record);
            }
            prev = current;
            current = following;
        }

        if size_required <= self.total - self.used {
            let record = self.used;
            self.used += size_required;
            layout::set_capacity(data, record, size_required);
            return Some(record);
        }

        None
    }

    /// Whether `allocate` would succeed for `size_required`. `incoming`
    /// names the capacity of a record that will join the free list before
    /// the allocation actually runs.
    pub(crate) fn can_allocate(
        &self,
        data: &[u8],
        size_required: usize,
        incoming: Option<usize>,
    ) -> bool {
        if size_required <= self.total - self.used {
            return true;
        }
        if let Some(capacity) = incoming {
            if capacity >= size_required {
                return true;
            }
        }
        let mut current = self.free_head;
        while let Some(record) = current {
            if layout::capacity(data, record) >= size_required {
                return true;
            }
            current = layout::next(data, record);
        }
        false
    }

    /// Appends a reclaimed record to the free-list tail.
    pub(crate) fn free(&mut self, data: &mut [u8], record: usize) {
        layout::set_next(data, record, None);
        match self.free_tail {
            Some(tail) => layout::set_next(data, tail, Some(record)),
            None => self.free_head = Some(record),
        }
        self.free_tail = Some(record);
    }
}
