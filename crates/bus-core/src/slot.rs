//! Handler-table slot variants for per-page dispatch.

use crate::layout::NUM_PAGES;
use crate::Width;

/// Caller-installed read handler: maps an access address to a value.
pub type SpecialReadFn = Box<dyn FnMut(u32) -> u32>;

/// Caller-installed write handler: receives the access address and value.
pub type SpecialWriteFn = Box<dyn FnMut(u32, u32)>;

/// Read behavior of one (page, width) table entry.
pub(crate) enum ReadSlot {
    /// Dispatch into the RAM image.
    Ram,
    /// Unmapped: report the fault and trip the bus into sink mode.
    Fail,
    /// Post-trip inert behavior (fixed per-width value).
    Sink,
    /// Caller-installed peripheral handler.
    Special(SpecialReadFn),
}

/// Write behavior of one (page, width) table entry.
pub(crate) enum WriteSlot {
    Ram,
    Fail,
    Sink,
    Special(SpecialWriteFn),
}

/// Total number of entries in one dispatch table.
pub(crate) const TABLE_LEN: usize = NUM_PAGES * Width::COUNT;

/// Flat table entry for page `page` at `width`.
pub(crate) const fn slot_index(page: usize, width: Width) -> usize {
    page * Width::COUNT + width.table_index()
}

#[cfg(test)]
mod tests {
    use super::{slot_index, TABLE_LEN};
    use crate::layout::NUM_PAGES;
    use crate::Width;

    #[test]
    fn slot_indices_are_dense_and_in_bounds() {
        let mut next = 0;
        for page in 0..NUM_PAGES {
            for width in Width::ALL {
                assert_eq!(slot_index(page, width), next);
                next += 1;
            }
        }
        assert_eq!(next, TABLE_LEN);
    }
}
