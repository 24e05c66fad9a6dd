use crate::core::U8Map;
use crate::layout;

/// Iterator over the live entries of a `U8Map`.
///
/// Holding the iterator keeps the map borrowed, so the chains cannot
/// change mid-traversal.
pub struct U8MapIter<'m, 'a> {
    map: &'m U8Map<'a>,
    bucket: usize,
    record: Option<usize>,
    traversed: usize,
}

impl<'m, 'a> Iterator for U8MapIter<'m, 'a> {
    type Item = (&'m [u8], &'m [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let map = self.map;
        let data = map.arena_data();

        while self.bucket < map.bucket_count() && self.traversed < map.len() {
            if self.record.is_none() {
                self.record = map.chain_head(self.bucket);
            }

            match self.record {
                Some(record) => {
                    self.record = layout::next(data, record);
                    if self.record.is_none() {
                        self.bucket += 1;
                    }
                    self.traversed += 1;
                    return Some((layout::key(data, record), layout::value(data, record)));
                }
                None => self.bucket += 1,
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.map.len() - self.traversed;
        (remaining, Some(remaining))
    }
}

impl<'m, 'a> ExactSizeIterator for U8MapIter<'m, 'a> {}

impl<'m, 'a> IntoIterator for &'m U8Map<'a> {
    type Item = (&'m [u8], &'m [u8]);
    type IntoIter = U8MapIter<'m, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        U8MapIter {
            map: self,
            bucket: 0,
            record: None,
            traversed: 0,
        }
    }
}
