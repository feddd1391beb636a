//! Common ID Types
//!
//! Type-safe snowflake ID wrappers for domain entities, and the generator
//! that mints them.
//!
//! Layout of a snowflake (most significant bit first):
//! `0 | 41 bits milliseconds since EPOCH_MS | 10 bits node | 12 bits sequence`

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Mutex;

use thiserror::Error;

/// Custom epoch (2010-11-04T01:42:54.657Z), the one most snowflake libraries share
pub const EPOCH_MS: i64 = 1_288_834_974_657;

const NODE_BITS: u32 = 10;
const SEQUENCE_BITS: u32 = 12;
const MAX_NODE: u16 = (1 << NODE_BITS) - 1;
const SEQUENCE_MASK: i64 = (1 << SEQUENCE_BITS) - 1;

/// Generic typed ID wrapper
///
/// Usage:
/// ```
/// use kernel::id::{Id, SnowflakeGenerator};
///
/// struct UserMarker;
/// type UserId = Id<UserMarker>;
///
/// let generator = SnowflakeGenerator::new(1).unwrap();
/// let id: UserId = generator.next_id();
/// assert!(id.value() > 0);
/// ```
pub struct Id<T> {
    value: i64,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    /// Wrap an existing numeric ID (e.g. loaded from the database)
    pub const fn from_i64(value: i64) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    pub const fn value(&self) -> i64 {
        self.value
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<Id<T>> for i64 {
    fn from(id: Id<T>) -> Self {
        id.value
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("snowflake node id must be between 0 and {MAX_NODE}, got {0}")]
pub struct InvalidNodeId(pub u16);

#[derive(Debug)]
struct GeneratorState {
    last_ms: i64,
    sequence: i64,
}

/// Snowflake ID generator
///
/// One instance per process, shared behind an `Arc`. IDs are strictly
/// increasing per generator even if the wall clock steps backwards.
#[derive(Debug)]
pub struct SnowflakeGenerator {
    node: i64,
    state: Mutex<GeneratorState>,
}

impl SnowflakeGenerator {
    pub fn new(node: u16) -> Result<Self, InvalidNodeId> {
        if node > MAX_NODE {
            return Err(InvalidNodeId(node));
        }
        Ok(Self {
            node: i64::from(node),
            state: Mutex::new(GeneratorState {
                last_ms: 0,
                sequence: 0,
            }),
        })
    }

    /// Mint the next ID
    pub fn next_id<T>(&self) -> Id<T> {
        Id::from_i64(self.next_raw())
    }

    fn next_raw(&self) -> i64 {
        // A poisoned lock only means another thread panicked mid-increment;
        // the counters are still usable.
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        let mut now = current_ms().max(state.last_ms);
        if now == state.last_ms {
            state.sequence = (state.sequence + 1) & SEQUENCE_MASK;
            if state.sequence == 0 {
                // Sequence exhausted: borrow the next millisecond
                now = state.last_ms + 1;
            }
        } else {
            state.sequence = 0;
        }
        state.last_ms = now;

        ((now - EPOCH_MS) << (NODE_BITS + SEQUENCE_BITS))
            | (self.node << SEQUENCE_BITS)
            | state.sequence
    }
}

fn current_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
