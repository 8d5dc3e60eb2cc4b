use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use uuid::Uuid;

use crate::types::PaymentId;

/// produces unique payment identifiers
///
/// Uniqueness across the engine's lifetime is the only contract; ids need not sort.
pub trait IdGenerator {
    fn next_id(&self) -> PaymentId;
}

/// random v4 uuids
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> PaymentId {
        Uuid::new_v4().to_string()
    }
}

/// deterministic `<prefix>-<n>` ids, handy for tests and demos
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new("pay")
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> PaymentId {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{:06}", self.prefix, n)
    }
}

impl<T: IdGenerator + ?Sized> IdGenerator for Arc<T> {
    fn next_id(&self) -> PaymentId {
        (**self).next_id()
    }
}
