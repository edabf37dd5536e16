//! Injectable trace and invalid-access reporting hooks.
//!
//! Both hooks default to console reporting through [`tracing`]; headless
//! embedders and tests can swap in the no-op variants or their own
//! closures via [`Bus::set_trace_hook`](crate::Bus::set_trace_hook) and
//! [`Bus::set_invalid_hook`](crate::Bus::set_invalid_hook).

use crate::{AccessKind, Width};

/// Observer invoked after every access (while tracing is enabled) with
/// the direction, width, address, and transferred value.
pub type TraceHook = Box<dyn FnMut(AccessKind, Width, u32, u32)>;

/// Observer invoked on an invalid access with the direction, width, and
/// address. Fires exactly once per bus lifetime: the same access trips
/// the bus into sink mode, after which nothing is unmapped.
pub type InvalidHook = Box<dyn FnMut(AccessKind, Width, u32)>;

/// Default trace hook, reporting at TRACE level as `R(16): 00f000: 4e75`.
#[must_use]
pub fn console_trace_hook() -> TraceHook {
    Box::new(|kind, width, addr, value| {
        tracing::trace!(target: "bus", "{kind}({width}): {addr:06x}: {value:x}");
    })
}

/// Default invalid-access hook, reporting at WARN level.
#[must_use]
pub fn console_invalid_hook() -> InvalidHook {
    Box::new(|kind, width, addr| {
        tracing::warn!(target: "bus", "INVALID: {kind}({width}): {addr:06x}");
    })
}

/// Trace hook that discards every event.
#[must_use]
pub fn noop_trace_hook() -> TraceHook {
    Box::new(|_, _, _, _| {})
}

/// Invalid-access hook that discards every event.
#[must_use]
pub fn noop_invalid_hook() -> InvalidHook {
    Box::new(|_, _, _| {})
}

#[cfg(test)]
mod tests {
    use super::{console_invalid_hook, console_trace_hook, noop_invalid_hook, noop_trace_hook};
    use crate::{AccessKind, Width};

    #[test]
    fn default_hooks_accept_events() {
        let mut trace = console_trace_hook();
        trace(AccessKind::Read, Width::Word, 0x00F000, 0x4E75);
        let mut invalid = console_invalid_hook();
        invalid(AccessKind::Write, Width::Long, 0x200000);
    }

    #[test]
    fn noop_hooks_accept_events() {
        let mut trace = noop_trace_hook();
        trace(AccessKind::Write, Width::Byte, 0, 0);
        let mut invalid = noop_invalid_hook();
        invalid(AccessKind::Read, Width::Byte, 0);
    }
}
