//! Symbol tables: global bindings, the per-match binding environment, and the ignore set.

use ahash::{AHashMap, AHashSet};

use crate::{intern::NameId, value::Value};

/// A flat name → value table. Used both as the persistent global bindings (`maxgen`,
/// `delta`, `width`, `distance`, user-defined scalars) and, layered underneath an [`Env`],
/// as the place formal-parameter bindings and successor instantiation look things up.
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    values: AHashMap<NameId, Value>,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: NameId, value: Value) {
        self.values.insert(name, value);
    }

    #[must_use]
    pub fn get(&self, name: NameId) -> Option<Value> {
        self.values.get(&name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NameId, Value)> + '_ {
        self.values.iter().map(|(&k, &v)| (k, v))
    }
}

/// The set of module names excluded from context matching entirely (skipped while
/// walking left/right context during production matching).
#[derive(Debug, Default, Clone)]
pub struct IgnoreSet {
    names: AHashSet<NameId>,
}

impl IgnoreSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: NameId) {
        self.names.insert(name);
    }

    #[must_use]
    pub fn contains(&self, name: NameId) -> bool {
        self.names.contains(&name)
    }
}

/// The binding environment used to evaluate a production's condition and to instantiate
/// its successor: global symbols, overlaid with whatever formal parameters this match
/// attempt has bound so far.
///
/// A fresh `Env` is built per match attempt, so binding failures from an earlier
/// production's attempt never leak into a later one's attempt against the same module.
#[derive(Debug, Clone)]
pub struct Env<'g> {
    globals: &'g SymbolTable,
    locals: AHashMap<NameId, Value>,
}

impl<'g> Env<'g> {
    #[must_use]
    pub fn new(globals: &'g SymbolTable) -> Self {
        Self {
            globals,
            locals: AHashMap::new(),
        }
    }

    /// Binds a formal parameter name to a value for the remainder of this match attempt.
    pub fn bind(&mut self, name: NameId, value: Value) {
        self.locals.insert(name, value);
    }

    /// Looks up `name`, preferring a local binding over the global table.
    #[must_use]
    pub fn get(&self, name: NameId) -> Option<Value> {
        self.locals.get(&name).copied().or_else(|| self.globals.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_binding_shadows_global() {
        let mut globals = SymbolTable::new();
        let name = name_for_test(5);
        globals.set(name, Value::Int(1));
        let mut env = Env::new(&globals);
        assert_eq!(env.get(name), Some(Value::Int(1)));
        env.bind(name, Value::Int(2));
        assert_eq!(env.get(name), Some(Value::Int(2)));
    }

    #[test]
    fn unbound_name_misses() {
        let globals = SymbolTable::new();
        let env = Env::new(&globals);
        assert_eq!(env.get(name_for_test(9)), None);
    }

    // `NameId` has no public constructor outside the interner; build one through it here
    // so tests stay within the crate's own construction rules.
    fn name_for_test(n: usize) -> NameId {
        let mut interner = crate::intern::Interner::new();
        for i in 0..n {
            interner.intern(&format!("__test_{i}"));
        }
        interner.intern(&format!("__test_{n}"))
    }
}
