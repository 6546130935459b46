//! Sharded string interner for variable and attribute names.
//!
//! Interning happens while syntax nodes are built; the analyses only ever
//! compare [`Name`]s. Each shard is guarded by its own lock so one interner
//! can be handed to several functions' builders at once.

use super::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// One shard's string-to-index table. Local indices are dense, so the
/// next free index is the table's length.
struct InternShard {
    map: FxHashMap<&'static str, u32>,
}

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InternError {
    /// Shard exceeded its local index space.
    #[error("interner shard {shard_idx} exceeded capacity: {count} strings, max is {max}", max = Name::MAX_LOCAL)]
    ShardOverflow { shard_idx: usize, count: usize },
}

impl InternShard {
    fn new() -> Self {
        Self {
            map: FxHashMap::default(),
        }
    }

    /// Shard 0 reserves local index 0 for `""`, which is `Name::EMPTY`.
    fn with_empty() -> Self {
        let mut shard = Self::new();
        shard.map.insert("", 0);
        shard
    }

    /// Insert a leaked string, returning its local index.
    fn insert(&mut self, shard_idx: usize, leaked: &'static str) -> Result<u32, InternError> {
        let count = self.map.len();
        let local = u32::try_from(count)
            .ok()
            .filter(|&local| local <= Name::MAX_LOCAL)
            .ok_or(InternError::ShardOverflow { shard_idx, count })?;
        self.map.insert(leaked, local);
        Ok(local)
    }
}

/// Maps identifier text to [`Name`]s.
///
/// The same text always yields the same `Name` for the lifetime of the
/// interner. Interned text is leaked and lives for the rest of the process.
pub struct StringInterner {
    shards: [RwLock<InternShard>; Name::NUM_SHARDS],
}

impl StringInterner {
    /// Create a new interner with pre-interned keywords and builtins.
    pub fn new() -> Self {
        let shards = std::array::from_fn(|i| {
            if i == 0 {
                RwLock::new(InternShard::with_empty())
            } else {
                RwLock::new(InternShard::new())
            }
        });

        let interner = Self { shards };
        interner.pre_intern_common();
        interner
    }

    /// Compute shard for a string based on its hash.
    #[inline]
    fn shard_for(s: &str) -> usize {
        let mut hash = 0u32;
        for byte in s.bytes().take(8) {
            hash = hash.wrapping_mul(31).wrapping_add(u32::from(byte));
        }
        (hash as usize) % Name::NUM_SHARDS
    }

    /// Fast path: return the name if `s` is already interned.
    fn find(&self, shard_idx: usize, s: &str) -> Option<Name> {
        let guard = self.shards[shard_idx].read();
        guard
            .map
            .get(s)
            .map(|&local| Name::new(shard_index(shard_idx), local))
    }

    /// Try to intern a string, returning its Name or an error on overflow.
    #[inline]
    pub fn try_intern(&self, s: &str) -> Result<Name, InternError> {
        let shard_idx = Self::shard_for(s);
        if let Some(name) = self.find(shard_idx, s) {
            return Ok(name);
        }

        let mut guard = self.shards[shard_idx].write();

        // Double-check after acquiring write lock
        if let Some(&local) = guard.map.get(s) {
            return Ok(Name::new(shard_index(shard_idx), local));
        }

        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let local = guard.insert(shard_idx, leaked)?;

        Ok(Name::new(shard_index(shard_idx), local))
    }

    /// Intern a string, returning its Name.
    ///
    /// # Panics
    /// Panics if a shard runs out of local indices. Use `try_intern` for
    /// fallible interning.
    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Pre-intern Python keywords and the builtins most functions touch.
    fn pre_intern_common(&self) {
        const COMMON: &[&str] = &[
            // Keywords that can appear as binders or are tested against
            "and",
            "as",
            "assert",
            "break",
            "class",
            "continue",
            "def",
            "del",
            "elif",
            "else",
            "except",
            "exec",
            "finally",
            "for",
            "from",
            "global",
            "if",
            "import",
            "in",
            "is",
            "lambda",
            "not",
            "or",
            "pass",
            "print",
            "raise",
            "return",
            "try",
            "while",
            "with",
            "yield",
            // Builtins
            "None",
            "True",
            "False",
            "self",
            "object",
            "len",
            "range",
            "xrange",
            "int",
            "str",
            "float",
            "list",
            "dict",
            "tuple",
            "isinstance",
            "__init__",
            "__name__",
        ];

        for s in COMMON {
            self.intern(s);
        }
    }

}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Shard index as the `u32` `Name::new` expects.
#[inline]
fn shard_index(shard_idx: usize) -> u32 {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "shard_idx is bounded by NUM_SHARDS (16)"
    )]
    let idx = shard_idx as u32;
    idx
}
