//! Traced bus session: RAM traffic, a peripheral page, and a trip-wire
//! fault, reported through a `tracing` console subscriber.
//!
//! Run with `cargo run --example trace_session`.

use bus_core::{Bus, BusConfig, Width};
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;
use tracing as _;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::TRACE)
        .with_target(false)
        .init();

    let mut bus = Bus::new(&BusConfig {
        ram_kib: 128,
        trace_enabled: true,
    })
    .expect("bus construction");

    bus.write32(0x000000, 0xAABB_CCDD);
    let _ = bus.read16(0x000002);

    // A one-page peripheral region at the top of the address space.
    let base = bus.reserve_special_range(1).expect("reservation");
    bus.set_special_read_handler(base, Width::Word, Box::new(|_| 0x0745));
    let id = bus.read16(base);
    println!("peripheral id register: {id:#06x}");

    // Debugger-style peek: no trace line for this one.
    let silent = bus.peek(Width::Long, 0x000000);
    println!("silent peek: {silent:#010x}");

    // Branch into unmapped memory: reported once, then the bus is inert.
    let _ = bus.read16(0x400000);
    println!("ended: {}", bus.is_ended());
    println!("post-trip fetch: {:#06x}", bus.read16(0x000000));
}
