//! Access widths and directions for bus transactions.

use std::fmt;

/// Value returned by 16-bit reads once the bus has tripped into sink
/// mode. This is the m68k `RESET` opcode, so an emulated fetch loop
/// spins harmlessly instead of decoding garbage.
pub const SINK_WORD_VALUE: u32 = 0x4E70;

/// Operand width of a single bus transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Width {
    /// 8-bit access.
    Byte,
    /// 16-bit access.
    Word,
    /// 32-bit access.
    Long,
}

impl Width {
    /// Number of distinct widths, one handler-table column each.
    pub const COUNT: usize = 3;

    /// All widths in table-column order.
    pub const ALL: [Self; Self::COUNT] = [Self::Byte, Self::Word, Self::Long];

    /// Handler-table column for this width.
    #[must_use]
    pub const fn table_index(self) -> usize {
        match self {
            Self::Byte => 0,
            Self::Word => 1,
            Self::Long => 2,
        }
    }

    /// Access size in bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::Byte => 8,
            Self::Word => 16,
            Self::Long => 32,
        }
    }

    /// Access size in bytes.
    #[must_use]
    pub const fn bytes(self) -> u32 {
        self.bits() / 8
    }

    /// Value produced by a read at this width once the bus is in sink
    /// mode: zero, except for the 16-bit no-op sentinel.
    #[must_use]
    pub const fn sink_read_value(self) -> u32 {
        match self {
            Self::Byte | Self::Long => 0,
            Self::Word => SINK_WORD_VALUE,
        }
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// Direction of a bus transaction, as reported to hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum AccessKind {
    /// A read from the guest address space.
    Read,
    /// A write to the guest address space.
    Write,
}

impl AccessKind {
    /// One-letter symbol used in diagnostic output.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Read => 'R',
            Self::Write => 'W',
        }
    }
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
