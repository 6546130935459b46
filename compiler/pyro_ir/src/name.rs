//! Identifiers as the analyses see them.
//!
//! Every local, global, parameter and imported binding the analyses reason
//! about is a [`Name`]. Equality and hashing are a single `u32` compare;
//! the text behind a name never matters after interning.

use std::fmt;
use std::hash::{Hash, Hasher};

/// A variable, attribute or module name handed out by
/// [`StringInterner`](crate::StringInterner).
///
/// The top 4 bits pick the interner shard and the low 28 bits the slot
/// within it, so names from different shards never collide.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// `""`, always shard 0 slot 0.
    pub const EMPTY: Name = Name(0);

    /// Highest slot a shard can hand out.
    pub const MAX_LOCAL: u32 = 0x0FFF_FFFF;

    /// Shards addressable by the 4 high bits.
    pub const NUM_SHARDS: usize = 16;

    /// Pack a shard and slot. Only the interner should need this.
    #[inline]
    pub const fn new(shard: u32, local: u32) -> Self {
        debug_assert!(shard < 16);
        debug_assert!(local <= Self::MAX_LOCAL);
        Name((shard << 28) | local)
    }

    /// Shard that handed out this name.
    #[inline]
    pub const fn shard(self) -> usize {
        (self.0 >> 28) as usize
    }

    /// Slot within [`shard`](Self::shard).
    #[inline]
    pub const fn local(self) -> usize {
        (self.0 & Self::MAX_LOCAL) as usize
    }

    /// The packed bits, for logging.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Rebuild a name from [`raw`](Self::raw). Unit tests mint names this way
    /// without an interner.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }
}

impl Hash for Name {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({}:{})", self.shard(), self.local())
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::EMPTY
    }
}
