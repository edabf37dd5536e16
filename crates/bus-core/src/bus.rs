//! The bus context object: dispatch tables, trip-wire, special ranges.

use std::fmt;

use crate::error::{InitError, ReserveError};
use crate::hooks::{console_invalid_hook, console_trace_hook, InvalidHook, TraceHook};
use crate::layout::{page_base, page_index, NUM_PAGES, PAGE_SIZE_KIB};
use crate::ram::RamImage;
use crate::slot::{slot_index, ReadSlot, SpecialReadFn, SpecialWriteFn, WriteSlot, TABLE_LEN};
use crate::{AccessKind, Width};

/// Construction-time configuration for a bus instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct BusConfig {
    /// Guest RAM capacity in KiB; must be a whole number of 64 KiB
    /// pages. `0` is valid and maps no RAM at all.
    pub ram_kib: u32,
    /// Initial state of the trace-enable flag.
    pub trace_enabled: bool,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            ram_kib: 1024,
            trace_enabled: false,
        }
    }
}

/// Paged memory bus for a 68k-style CPU core.
///
/// Every guest access resolves through a flat per-page handler table in
/// constant time. Pages below the configured RAM capacity are
/// RAM-backed; pages at the top of the address space can be reserved
/// for caller-installed peripheral handlers; everything else is
/// unmapped. The first access to an unmapped page reports the fault
/// through the invalid hook and trips the whole bus into sink mode, a
/// terminal state in which reads return inert values and writes are
/// dropped (see [`Width::sink_read_value`]).
///
/// The bus assumes single-threaded, synchronous CPU stepping and
/// provides no internal locking; wrap it behind one external mutual
/// exclusion boundary if the embedding requires more.
pub struct Bus {
    ram: RamImage,
    ram_pages: usize,
    read_table: Box<[ReadSlot]>,
    write_table: Box<[WriteSlot]>,
    ended: bool,
    trace_enabled: bool,
    trace_hook: TraceHook,
    invalid_hook: InvalidHook,
    special_cursor: usize,
}

impl fmt::Debug for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bus")
            .field("ram_pages", &self.ram_pages)
            .field("ended", &self.ended)
            .field("trace_enabled", &self.trace_enabled)
            .field("special_cursor", &self.special_cursor)
            .finish_non_exhaustive()
    }
}

impl Bus {
    /// Builds a bus per `config`: allocates the RAM image, installs RAM
    /// handlers below `ram_kib / 64` pages and fail handlers everywhere
    /// else, and installs the console default hooks.
    ///
    /// # Errors
    ///
    /// Returns [`InitError::CapacityNotPageAligned`] when `ram_kib` is
    /// not a multiple of 64, [`InitError::CapacityTooLarge`] when the
    /// capacity exceeds the 16 MiB address space, and
    /// [`InitError::Allocation`] when the buffer cannot be allocated.
    pub fn new(config: &BusConfig) -> Result<Self, InitError> {
        #[allow(clippy::cast_possible_truncation)]
        let max_kib = NUM_PAGES as u32 * PAGE_SIZE_KIB;
        if config.ram_kib % PAGE_SIZE_KIB != 0 {
            return Err(InitError::CapacityNotPageAligned {
                ram_kib: config.ram_kib,
            });
        }
        if config.ram_kib > max_kib {
            return Err(InitError::CapacityTooLarge {
                ram_kib: config.ram_kib,
                max_kib,
            });
        }
        let ram = RamImage::allocate(config.ram_kib as usize * 1024)?;
        let mut bus = Self {
            ram,
            ram_pages: (config.ram_kib / PAGE_SIZE_KIB) as usize,
            read_table: std::iter::repeat_with(|| ReadSlot::Fail)
                .take(TABLE_LEN)
                .collect(),
            write_table: std::iter::repeat_with(|| WriteSlot::Fail)
                .take(TABLE_LEN)
                .collect(),
            ended: false,
            trace_enabled: config.trace_enabled,
            trace_hook: console_trace_hook(),
            invalid_hook: console_invalid_hook(),
            special_cursor: NUM_PAGES,
        };
        bus.install_default_slots();
        Ok(bus)
    }

    /// Builds a bus with `ram_kib` KiB of RAM and default settings.
    ///
    /// # Errors
    ///
    /// Same as [`Bus::new`].
    pub fn with_ram_kib(ram_kib: u32) -> Result<Self, InitError> {
        Self::new(&BusConfig {
            ram_kib,
            ..BusConfig::default()
        })
    }

    fn install_default_slots(&mut self) {
        for page in 0..NUM_PAGES {
            for width in Width::ALL {
                let idx = slot_index(page, width);
                if page < self.ram_pages {
                    self.read_table[idx] = ReadSlot::Ram;
                    self.write_table[idx] = WriteSlot::Ram;
                } else {
                    self.read_table[idx] = ReadSlot::Fail;
                    self.write_table[idx] = WriteSlot::Fail;
                }
            }
        }
    }

    /// Reinitializes the bus in place: zeroes RAM, rebuilds the handler
    /// table (dropping any installed special handlers), clears the
    /// trip-wire, and resets the reservation cursor. Hooks and the
    /// trace flag survive a reset.
    pub fn reset(&mut self) {
        self.ram.clear();
        self.special_cursor = NUM_PAGES;
        self.ended = false;
        self.install_default_slots();
    }

    // ----- dispatch -----

    fn dispatch_read(&mut self, width: Width, addr: u32) -> u32 {
        let idx = slot_index(page_index(addr), width);
        match &mut self.read_table[idx] {
            ReadSlot::Special(handler) => handler(addr),
            ReadSlot::Ram => self.ram.read(width, addr),
            ReadSlot::Sink => width.sink_read_value(),
            ReadSlot::Fail => {
                (self.invalid_hook)(AccessKind::Read, width, addr);
                self.sink_all();
                0
            }
        }
    }

    fn dispatch_write(&mut self, width: Width, addr: u32, value: u32) {
        let idx = slot_index(page_index(addr), width);
        match &mut self.write_table[idx] {
            WriteSlot::Special(handler) => handler(addr, value),
            WriteSlot::Ram => self.ram.write(width, addr, value),
            WriteSlot::Sink => {}
            WriteSlot::Fail => {
                (self.invalid_hook)(AccessKind::Write, width, addr);
                self.sink_all();
            }
        }
    }

    fn sink_all(&mut self) {
        for slot in self.read_table.iter_mut() {
            *slot = ReadSlot::Sink;
        }
        for slot in self.write_table.iter_mut() {
            *slot = WriteSlot::Sink;
        }
        self.ended = true;
    }

    /// Reads a value of `width` at `addr`, firing the trace hook after
    /// the handler when tracing is enabled.
    pub fn read(&mut self, width: Width, addr: u32) -> u32 {
        let value = self.dispatch_read(width, addr);
        if self.trace_enabled {
            (self.trace_hook)(AccessKind::Read, width, addr, value);
        }
        value
    }

    /// Writes the low `width` bits of `value` at `addr`, firing the
    /// trace hook after the handler when tracing is enabled.
    pub fn write(&mut self, width: Width, addr: u32, value: u32) {
        self.dispatch_write(width, addr, value);
        if self.trace_enabled {
            (self.trace_hook)(AccessKind::Write, width, addr, value);
        }
    }

    // ----- CPU-core-facing façade -----

    /// Reads one byte at `addr`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn read8(&mut self, addr: u32) -> u8 {
        self.read(Width::Byte, addr) as u8
    }

    /// Reads a big-endian 16-bit value at `addr`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn read16(&mut self, addr: u32) -> u16 {
        self.read(Width::Word, addr) as u16
    }

    /// Reads a big-endian 32-bit value at `addr`.
    pub fn read32(&mut self, addr: u32) -> u32 {
        self.read(Width::Long, addr)
    }

    /// Writes one byte at `addr`.
    pub fn write8(&mut self, addr: u32, value: u8) {
        self.write(Width::Byte, addr, u32::from(value));
    }

    /// Writes a big-endian 16-bit value at `addr`.
    pub fn write16(&mut self, addr: u32, value: u16) {
        self.write(Width::Word, addr, u32::from(value));
    }

    /// Writes a big-endian 32-bit value at `addr`.
    pub fn write32(&mut self, addr: u32, value: u32) {
        self.write(Width::Long, addr, value);
    }

    // ----- tool-facing silent access -----

    /// Reads without perturbing the trace stream: tracing is disabled
    /// for exactly this access and the prior flag is restored
    /// afterwards, even when the access itself trips the bus.
    pub fn peek(&mut self, width: Width, addr: u32) -> u32 {
        let saved = self.trace_enabled;
        self.trace_enabled = false;
        let value = self.read(width, addr);
        self.trace_enabled = saved;
        value
    }

    /// Writes without perturbing the trace stream; see [`Bus::peek`].
    pub fn poke(&mut self, width: Width, addr: u32, value: u32) {
        let saved = self.trace_enabled;
        self.trace_enabled = false;
        self.write(width, addr, value);
        self.trace_enabled = saved;
    }

    // ----- hooks & status -----

    /// Replaces the invalid-access hook.
    pub fn set_invalid_hook(&mut self, hook: InvalidHook) {
        self.invalid_hook = hook;
    }

    /// Replaces the trace hook.
    pub fn set_trace_hook(&mut self, hook: TraceHook) {
        self.trace_hook = hook;
    }

    /// Enables or disables per-access tracing.
    pub fn set_trace_enabled(&mut self, on: bool) {
        self.trace_enabled = on;
    }

    /// Returns the current trace-enable flag.
    #[must_use]
    pub const fn trace_enabled(&self) -> bool {
        self.trace_enabled
    }

    /// Returns `true` once the trip-wire has fired; terminal until
    /// [`Bus::reset`] or re-construction.
    #[must_use]
    pub const fn is_ended(&self) -> bool {
        self.ended
    }

    /// Number of RAM-backed pages at the bottom of the address space.
    #[must_use]
    pub const fn ram_pages(&self) -> usize {
        self.ram_pages
    }

    /// Pages still available between the RAM region and the lowest
    /// special-range reservation.
    #[must_use]
    pub const fn remaining_special_pages(&self) -> usize {
        self.special_cursor - self.ram_pages
    }

    // ----- special ranges -----

    /// Reserves `pages` whole pages at the top of the address space,
    /// growing downward from the previous reservation. Returns the base
    /// address of the span. Reserved pages keep their fail handlers
    /// until the caller installs special handlers for them.
    ///
    /// # Errors
    ///
    /// Returns [`ReserveError::WouldOverlapRam`] when the span would
    /// descend into the RAM page range.
    pub fn reserve_special_range(&mut self, pages: usize) -> Result<u32, ReserveError> {
        let begin = self
            .special_cursor
            .checked_sub(pages)
            .filter(|begin| *begin >= self.ram_pages)
            .ok_or(ReserveError::WouldOverlapRam {
                pages,
                cursor: self.special_cursor,
            })?;
        self.special_cursor = begin;
        Ok(page_base(begin))
    }

    /// Installs a read handler for `width` on the page containing
    /// `base_addr`. Multi-page reservations are installed page by page.
    /// The page must have been reserved via
    /// [`Bus::reserve_special_range`].
    pub fn set_special_read_handler(&mut self, base_addr: u32, width: Width, handler: SpecialReadFn) {
        let page = page_index(base_addr);
        debug_assert!(
            page >= self.special_cursor,
            "special read handler installed outside the reserved range"
        );
        self.read_table[slot_index(page, width)] = ReadSlot::Special(handler);
    }

    /// Installs a write handler for `width` on the page containing
    /// `base_addr`; see [`Bus::set_special_read_handler`].
    pub fn set_special_write_handler(
        &mut self,
        base_addr: u32,
        width: Width,
        handler: SpecialWriteFn,
    ) {
        let page = page_index(base_addr);
        debug_assert!(
            page >= self.special_cursor,
            "special write handler installed outside the reserved range"
        );
        self.write_table[slot_index(page, width)] = WriteSlot::Special(handler);
    }
}
