//! Timer-driven event queue.
//!
//! Events are produced by the `esp_timer` callbacks in
//! [`drivers::hw_timer`](crate::drivers::hw_timer) and consumed by the main
//! control loop, which processes them one at a time in FIFO order.
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Control timer    │────▶│  Event Queue │────▶│  Main Loop   │
//! │ Housekeeping tmr │────▶│  (lock-free) │     │  (consumer)  │
//! └──────────────────┘     └──────────────┘     └──────────────┘
//! ```

use core::sync::atomic::{AtomicU8, Ordering};

/// Maximum number of pending events.
/// Power of 2 for efficient ring buffer modulo.
const EVENT_QUEUE_CAP: usize = 16;

/// Loop events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Event {
    /// Run one decision tick.
    ControlTick = 1,
    /// Once per second: counter flush and status line checks.
    HousekeepingTick = 2,
}

impl Event {
    fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(Self::ControlTick),
            2 => Some(Self::HousekeepingTick),
            _ => None,
        }
    }
}

// ── Lock-free SPSC ring buffer ────────────────────────────────
//
// Timer task writes (produce), main loop reads (consume).  Slots are
// atomics so no `static mut` is needed.

static EVENT_HEAD: AtomicU8 = AtomicU8::new(0);
static EVENT_TAIL: AtomicU8 = AtomicU8::new(0);
static EVENT_BUFFER: [AtomicU8; EVENT_QUEUE_CAP] = [const { AtomicU8::new(0) }; EVENT_QUEUE_CAP];

/// Push an event into the queue.
/// Safe to call from timer-callback context (lock-free).
/// Returns `false` if the queue is full (event dropped).
pub fn push_event(event: Event) -> bool {
    let head = EVENT_HEAD.load(Ordering::Relaxed);
    let tail = EVENT_TAIL.load(Ordering::Acquire);
    let next_head = (head + 1) % EVENT_QUEUE_CAP as u8;

    if next_head == tail {
        return false;
    }

    EVENT_BUFFER[head as usize].store(event as u8, Ordering::Relaxed);
    EVENT_HEAD.store(next_head, Ordering::Release);
    true
}

/// Pop the next event from the queue.
/// Called from the main loop (single consumer).
pub fn pop_event() -> Option<Event> {
    let tail = EVENT_TAIL.load(Ordering::Relaxed);
    let head = EVENT_HEAD.load(Ordering::Acquire);

    if tail == head {
        return None;
    }

    let raw = EVENT_BUFFER[tail as usize].load(Ordering::Relaxed);
    EVENT_TAIL.store((tail + 1) % EVENT_QUEUE_CAP as u8, Ordering::Release);
    Event::from_u8(raw)
}

/// Drain all pending events into a callback, FIFO.
pub fn drain_events(mut handler: impl FnMut(Event)) {
    while let Some(event) = pop_event() {
        handler(event);
    }
}

/// Number of pending events.
pub fn queue_len() -> usize {
    let head = EVENT_HEAD.load(Ordering::Relaxed) as usize;
    let tail = EVENT_TAIL.load(Ordering::Relaxed) as usize;
    (head + EVENT_QUEUE_CAP - tail) % EVENT_QUEUE_CAP
}
