use thiserror::Error;

/// Failures reported by bus construction.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum InitError {
    /// Requested RAM does not fit below the top of the address space.
    #[error("ram capacity {ram_kib} KiB exceeds the {max_kib} KiB address space")]
    CapacityTooLarge {
        /// Requested capacity in KiB.
        ram_kib: u32,
        /// Largest mappable capacity in KiB.
        max_kib: u32,
    },
    /// Requested RAM is not a whole number of 64 KiB pages.
    #[error("ram capacity {ram_kib} KiB is not a multiple of the 64 KiB page size")]
    CapacityNotPageAligned {
        /// Requested capacity in KiB.
        ram_kib: u32,
    },
    /// The guest RAM buffer could not be allocated.
    #[error("failed to allocate {bytes} bytes of guest ram")]
    Allocation {
        /// Size of the failed allocation in bytes.
        bytes: usize,
    },
}

/// Failure reported by special-range reservation.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ReserveError {
    /// The requested span would descend into the RAM page range.
    #[error("reserving {pages} pages would overlap ram (cursor at page {cursor})")]
    WouldOverlapRam {
        /// Number of pages requested.
        pages: usize,
        /// Reservation cursor at the time of the request.
        cursor: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::{InitError, ReserveError};

    #[test]
    fn init_errors_render_their_capacities() {
        let err = InitError::CapacityTooLarge {
            ram_kib: 32768,
            max_kib: 16384,
        };
        assert_eq!(
            err.to_string(),
            "ram capacity 32768 KiB exceeds the 16384 KiB address space"
        );
        let err = InitError::CapacityNotPageAligned { ram_kib: 96 };
        assert_eq!(
            err.to_string(),
            "ram capacity 96 KiB is not a multiple of the 64 KiB page size"
        );
    }

    #[test]
    fn reserve_error_renders_the_request() {
        let err = ReserveError::WouldOverlapRam { pages: 4, cursor: 2 };
        assert_eq!(
            err.to_string(),
            "reserving 4 pages would overlap ram (cursor at page 2)"
        );
    }
}
