//! Page geometry for the 24-bit paged address space.
//!
//! The bus divides a 16 MiB guest address space into 256 pages of 64 KiB
//! each; the page is the unit of handler assignment. Address bits above
//! the 24-bit bus are ignored, as on a physical 24-bit address bus, so a
//! page lookup can never land outside the table.

/// Number of low-order address bits selecting a byte within a page.
pub const PAGE_SHIFT: u32 = 16;

/// Size in bytes of one page (64 KiB).
pub const PAGE_SIZE_BYTES: u32 = 1 << PAGE_SHIFT;

/// Size in KiB of one page.
pub const PAGE_SIZE_KIB: u32 = PAGE_SIZE_BYTES / 1024;

/// Number of pages covering the guest address space.
pub const NUM_PAGES: usize = 256;

/// Total size in bytes of the guest address space (16 MiB).
pub const ADDRESS_SPACE_BYTES: usize = NUM_PAGES << PAGE_SHIFT;

/// Mask selecting the address bits carried by the 24-bit bus.
pub const ADDRESS_MASK: u32 = 0x00FF_FFFF;

const _: () = assert_page_layout();

const fn assert_page_layout() {
    assert!(NUM_PAGES.is_power_of_two(), "page count must be a power of two");
    assert!(
        ADDRESS_MASK as usize == ADDRESS_SPACE_BYTES - 1,
        "address mask must cover exactly the paged address space"
    );
    assert!(
        PAGE_SIZE_KIB as usize * 1024 * NUM_PAGES == ADDRESS_SPACE_BYTES,
        "pages must tile the address space"
    );
}

/// Masks an address down to the bits carried by the bus.
#[must_use]
pub const fn bus_address(addr: u32) -> u32 {
    addr & ADDRESS_MASK
}

/// Returns the page index owning `addr`.
#[must_use]
pub const fn page_index(addr: u32) -> usize {
    (bus_address(addr) >> PAGE_SHIFT) as usize
}

/// Returns the base address of page `page`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn page_base(page: usize) -> u32 {
    (page as u32) << PAGE_SHIFT
}
