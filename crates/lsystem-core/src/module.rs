//! Modules — the atoms of an L-system string — and the list that holds a generation of them.

use smallvec::SmallVec;

use crate::{
    diagnostics::DiagnosticSink,
    env::Env,
    expr::Expression,
    intern::{NameId, LEFT_BRACKET, RIGHT_BRACKET},
    rng::Rng,
    value::Value,
};

/// A module's parameter list. Most modules carry zero to four arguments (`F(d)`, `t(x,y,z,e)`,
/// ...), so this stays on the stack for the common case instead of allocating, the same
/// trade-off worth making for parameter lists that are almost always this small.
pub type ParamList = SmallVec<[Expression; 4]>;

/// One symbol in an L-system string, with its (possibly empty) parameter list.
///
/// The same type serves three roles depending on what its `params` hold: a production's
/// formal predecessor (`Expression::Name`s awaiting binding), a production's successor
/// template (arbitrary expressions awaiting instantiation), and a live module in a
/// generation's string (always `Expression::Value`s, the result of instantiation).
#[derive(Debug, Clone)]
pub struct Module {
    pub name: NameId,
    pub params: ParamList,
    /// Excluded from context matching when set (an `#ignore`-declared module name).
    pub ignore: bool,
}

impl Module {
    #[must_use]
    pub fn new(name: NameId, params: impl Into<ParamList>) -> Self {
        Self { name, params: params.into(), ignore: false }
    }

    #[must_use]
    pub fn with_ignore(name: NameId, params: impl Into<ParamList>, ignore: bool) -> Self {
        Self { name, params: params.into(), ignore }
    }

    #[must_use]
    pub fn is_left_bracket(&self) -> bool {
        self.name == LEFT_BRACKET
    }

    #[must_use]
    pub fn is_right_bracket(&self) -> bool {
        self.name == RIGHT_BRACKET
    }

    /// Same name and same parameter count as `other`.
    #[must_use]
    pub fn conforms(&self, other: &Self) -> bool {
        self.name == other.name && self.params.len() == other.params.len()
    }

    /// Binds this module's formal parameter names to `other`'s (already-evaluated) argument
    /// values in `env`. Requires every parameter here to be `Expression::Name` and every
    /// parameter in `other` to evaluate without depending on unbound formals (the value
    /// side is evaluated against the caller's symbol table before binding).
    ///
    /// Returns `false` if a formal is not a plain name.
    pub fn bind(&self, other: &Self, env: &mut Env<'_>, rng: &mut Rng, sink: &mut dyn DiagnosticSink) -> bool {
        if !self.conforms(other) {
            return true; // nothing to bind; `conforms` already gated the caller
        }
        for (formal, value_expr) in self.params.iter().zip(&other.params) {
            let Expression::Name(formal_name) = formal else {
                return false;
            };
            let value = value_expr.evaluate(env, rng, sink);
            env.bind(*formal_name, value);
        }
        true
    }

    /// Evaluates every parameter expression against `env`, producing a module whose
    /// parameters are all plain `Value`s.
    #[must_use]
    pub fn instantiate(&self, env: &Env<'_>, rng: &mut Rng, sink: &mut dyn DiagnosticSink) -> Self {
        let params: ParamList = self
            .params
            .iter()
            .map(|expr| Expression::Value(expr.evaluate(env, rng, sink)))
            .collect();
        Self::with_ignore(self.name, params, self.ignore)
    }

    /// Reads the `n`th parameter as a value, if present and already a plain `Value`. Used
    /// by the turtle interpreter, which only ever sees instantiated modules.
    #[must_use]
    pub fn arg(&self, n: usize) -> Option<Value> {
        match self.params.get(n)? {
            Expression::Value(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn arg_float(&self, n: usize) -> Option<f64> {
        self.arg(n)?.as_float()
    }
}

/// A full generation's worth of modules, as produced by the axiom or by one rewrite pass.
#[derive(Debug, Clone, Default)]
pub struct ModuleList {
    modules: Vec<Module>,
}

impl ModuleList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_vec(modules: Vec<Module>) -> Self {
        Self { modules }
    }

    pub fn push(&mut self, module: Module) {
        self.modules.push(module);
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Module] {
        &self.modules
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Module> {
        self.modules.iter()
    }
}

impl FromIterator<Module> for ModuleList {
    fn from_iter<T: IntoIterator<Item = Module>>(iter: T) -> Self {
        Self { modules: iter.into_iter().collect() }
    }
}
