//! A parsed L-system: its axiom, productions, globals, and ignore set.

use crate::{
    actions::ActionTable,
    env::{IgnoreSet, SymbolTable},
    module::ModuleList,
    production::Production,
};

/// Everything a grammar's `#define`s, `#ignore`, axiom, and production block describe,
/// bundled into one value the engine can derive and interpret.
#[derive(Debug, Clone)]
pub struct Model {
    pub axiom: ModuleList,
    pub productions: Vec<Production>,
    pub globals: SymbolTable,
    pub ignore: IgnoreSet,
}

impl Model {
    #[must_use]
    pub fn new(axiom: ModuleList, productions: Vec<Production>, globals: SymbolTable, ignore: IgnoreSet) -> Self {
        Self { axiom, productions, globals, ignore }
    }

    /// Reads a named global as a float, falling back to `default` if unset or non-numeric.
    /// Used for the well-known tuning globals: `delta`, `width`, `distance`.
    #[must_use]
    pub fn global_float(&self, name: crate::intern::NameId, default: f64) -> f64 {
        self.globals.get(name).and_then(crate::value::Value::as_float).unwrap_or(default)
    }
}

/// Bundles a [`Model`] with the action table that interprets it. Kept separate from `Model`
/// since the action table is usually the engine's default bindings, not something a grammar
/// file customizes per run.
#[derive(Debug, Clone)]
pub struct Program {
    pub model: Model,
    pub actions: ActionTable,
}

impl Program {
    #[must_use]
    pub fn new(model: Model, actions: ActionTable) -> Self {
        Self { model, actions }
    }
}
