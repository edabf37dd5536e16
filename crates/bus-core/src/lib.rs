//! Paged memory bus core for a 68k-style CPU emulator.
//!
//! Every instruction fetch and data access of the emulated CPU core
//! passes through [`Bus`]: a 16 MiB guest address space split into 256
//! pages of 64 KiB, each page carrying one handler per access width and
//! direction. Pages are RAM-backed, reserved for caller-installed
//! peripheral handlers, or unmapped. Dispatch is O(1) per access and
//! multi-byte transfers are big-endian with no alignment faults.
//!
//! The failure policy is deliberate: the first access to an unmapped
//! page is reported once through the invalid hook, then the whole bus
//! trips into terminal sink mode where reads return inert values (16-bit
//! reads yield a no-op opcode so a fetch loop spins harmlessly) and
//! writes are dropped. A buggy guest halts deterministically instead of
//! taking the host down.

/// Page geometry for the 24-bit address space.
pub mod layout;
pub use layout::{
    bus_address, page_base, page_index, ADDRESS_MASK, ADDRESS_SPACE_BYTES, NUM_PAGES, PAGE_SHIFT,
    PAGE_SIZE_BYTES, PAGE_SIZE_KIB,
};

/// Access widths and directions.
pub mod access;
pub use access::{AccessKind, Width, SINK_WORD_VALUE};

/// Bus construction and reservation errors.
pub mod error;
pub use error::{InitError, ReserveError};

/// Injectable trace and invalid-access hooks.
pub mod hooks;
pub use hooks::{
    console_invalid_hook, console_trace_hook, noop_invalid_hook, noop_trace_hook, InvalidHook,
    TraceHook,
};

mod ram;
mod slot;
pub use slot::{SpecialReadFn, SpecialWriteFn};

/// The bus context object and access façade.
pub mod bus;
pub use bus::{Bus, BusConfig};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
#[cfg(test)]
use tracing_subscriber as _;
