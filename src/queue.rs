//! Bounded sample queue between the sensor producer and the control loop.
//!
//! The producer runs in an asynchronous (possibly interrupt-driven)
//! context and must never block: `push` onto a full queue refuses the
//! sample and returns immediately. Drop policy is **drop-newest**: the
//! first `capacity` accepted pushes survive, matching the behavior of a
//! full RTOS queue that rejects the send.
//!
//! Queue-full is bounded backpressure, not an error: the sensor samples
//! faster than the loop needs fresh data relative to the window size.
//!
//! The ring storage is preallocated once and never grows. A mutex around
//! the head/tail indices is the deliberately simple substitute for a
//! lock-free ring; with one producer and one consumer the critical
//! sections are a handful of instructions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// A single scalar sensor reading.
pub type Sample = f32;

struct Ring {
    buf: Vec<Sample>,
    head: usize,
    tail: usize,
    len: usize,
}

/// Bounded FIFO queue of sensor samples.
///
/// Cheaply cloneable handle; clones share the same ring. One clone lives
/// with the producer, one with the consumer.
#[derive(Clone)]
pub struct SampleQueue {
    ring: Arc<Mutex<Ring>>,
    capacity: usize,
    dropped: Arc<AtomicU64>,
}

impl SampleQueue {
    /// Create a queue with the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. Config validation rejects that
    /// before a queue is ever constructed.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be > 0");
        Self {
            ring: Arc::new(Mutex::new(Ring {
                buf: vec![0.0; capacity],
                head: 0,
                tail: 0,
                len: 0,
            })),
            capacity,
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Push a sample from the producer context.
    ///
    /// Never blocks. Returns `true` if the sample was accepted, `false`
    /// if the queue was full and the sample was dropped.
    pub fn push(&self, sample: Sample) -> bool {
        let mut ring = match self.ring.lock() {
            Ok(g) => g,
            // A poisoned lock means the consumer panicked mid-drain; the
            // producer still must not block or propagate.
            Err(poisoned) => poisoned.into_inner(),
        };
        if ring.len == self.capacity {
            drop(ring);
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        let tail = ring.tail;
        ring.buf[tail] = sample;
        ring.tail = (tail + 1) % self.capacity;
        ring.len += 1;
        true
    }

    /// Pop the oldest sample, if any. Never blocks.
    pub fn try_pop(&self) -> Option<Sample> {
        let mut ring = match self.ring.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        if ring.len == 0 {
            return None;
        }
        let head = ring.head;
        let sample = ring.buf[head];
        ring.head = (head + 1) % self.capacity;
        ring.len -= 1;
        Some(sample)
    }

    /// Number of samples currently queued.
    #[must_use]
    pub fn len(&self) -> usize {
        match self.ring.lock() {
            Ok(g) => g.len,
            Err(poisoned) => poisoned.into_inner().len,
        }
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fixed capacity of the queue.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total samples dropped because the queue was full.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for SampleQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleQueue")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .field("dropped", &self.dropped())
            .finish()
    }
}
