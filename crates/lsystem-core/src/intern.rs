//! Global name interning for module and variable identifiers.
//!
//! Every symbolic name appearing in an L-system (module names like `F` or `+`, variable
//! names bound by productions) is interned once into a compact [`NameId`]. Equality and
//! hashing on names then reduce to comparing small integers instead of strings, and the
//! derivation loop — which copies millions of module names across generations for a large
//! system — never touches the heap for a name it has already seen.
//!
//! Two sentinel names are always present at fixed ids: `[` and `]`, used throughout the
//! production matcher and the `%` cut-branch action as context-bracket markers.

use ahash::AHashMap;

/// Index into the name interner's storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NameId(u32);

impl NameId {
    #[inline]
    fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).expect("more than u32::MAX distinct names interned"))
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Id for the `[` context-bracket marker. Always present in a fresh [`Interner`].
pub const LEFT_BRACKET: NameId = NameId(0);
/// Id for the `]` context-bracket marker. Always present in a fresh [`Interner`].
pub const RIGHT_BRACKET: NameId = NameId(1);

/// Bidirectional string/id interner.
///
/// `intern` is the only way to create a [`NameId`]; `resolve` is total for any id this
/// interner produced. Strings are stored once and never removed, so a `NameId` is valid for
/// the lifetime of the `Interner` that minted it.
#[derive(Debug, Clone)]
pub struct Interner {
    strings: Vec<Box<str>>,
    ids: AHashMap<Box<str>, NameId>,
}

impl Default for Interner {
    fn default() -> Self {
        let mut interner = Self {
            strings: Vec::new(),
            ids: AHashMap::new(),
        };
        let left = interner.intern("[");
        let right = interner.intern("]");
        debug_assert_eq!(left, LEFT_BRACKET);
        debug_assert_eq!(right, RIGHT_BRACKET);
        interner
    }
}

impl Interner {
    /// Creates a fresh interner with only the `[`/`]` sentinels present.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id for `name`, allocating a new one if this is the first occurrence.
    pub fn intern(&mut self, name: &str) -> NameId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = NameId::from_index(self.strings.len());
        self.strings.push(name.into());
        self.ids.insert(name.into(), id);
        id
    }

    /// Looks up the string for a previously interned id.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this interner.
    #[must_use]
    pub fn resolve(&self, id: NameId) -> &str {
        &self.strings[id.index()]
    }

    /// Returns the id for `name` if it has already been interned, without allocating.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<NameId> {
        self.ids.get(name).copied()
    }

    /// Number of distinct names interned so far (including the two bracket sentinels).
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
