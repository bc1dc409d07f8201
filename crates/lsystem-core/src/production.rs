//! Productions: context-sensitive, parametric, conditional, stochastic rewrite rules.

use crate::{
    diagnostics::{Diagnostic, DiagnosticSink},
    env::{Env, SymbolTable},
    expr::Expression,
    module::Module,
    rng::Rng,
};

/// The left-hand side of a production: the module being rewritten, with optional left and
/// right context lists.
#[derive(Debug, Clone)]
pub struct Predecessor {
    pub left: Option<Vec<Module>>,
    pub center: Module,
    pub right: Option<Vec<Module>>,
}

/// One weighted alternative on the right-hand side of a stochastic production.
#[derive(Debug, Clone)]
pub struct Successor {
    pub probability: f64,
    pub modules: Vec<Module>,
}

/// A full production: predecessor, optional condition, and one or more weighted successors.
#[derive(Debug, Clone)]
pub struct Production {
    pub predecessor: Predecessor,
    pub condition: Option<Expression>,
    pub successors: Vec<Successor>,
}

impl Production {
    /// Tests whether this production applies to the module at `index` within `context`,
    /// binding formal parameters (from the center module and any matched context) into a
    /// fresh [`Env`] built over `globals`. On success, returns the `Env` to instantiate the
    /// chosen successor against; on failure, the caller must retry with the next production
    /// against a fresh environment (match failures leave no lingering state).
    pub fn matches<'g>(
        &self,
        context: &[Module],
        index: usize,
        globals: &'g SymbolTable,
        rng: &mut Rng,
        sink: &mut dyn DiagnosticSink,
    ) -> Option<Env<'g>> {
        let mut env = Env::new(globals);
        let candidate = &context[index];

        if !self.predecessor.center.conforms(candidate) {
            return None;
        }
        if !self.predecessor.center.bind(candidate, &mut env, rng, sink) {
            return None;
        }

        if let Some(left) = &self.predecessor.left {
            if !match_left_context(left, context, index, &mut env, rng, sink) {
                return None;
            }
        }

        if let Some(right) = &self.predecessor.right {
            if !match_right_context(right, context, index, &mut env, rng, sink) {
                return None;
            }
        }

        match &self.condition {
            None => Some(env),
            Some(condition) => {
                let value = condition.evaluate(&env, rng, sink);
                if value.is_truthy_condition() {
                    Some(env)
                } else {
                    None
                }
            }
        }
    }

    /// Chooses a successor by walking cumulative probability against a single uniform draw,
    /// then instantiates every module on its right-hand side against `env`. Returns `None`
    /// (reporting [`Diagnostic::NoSuccessorChosen`]) if the probabilities never reach the
    /// draw — a malformed stochastic production, not a panic.
    pub fn produce(&self, env: &Env<'_>, rng: &mut Rng, sink: &mut dyn DiagnosticSink) -> Option<Vec<Module>> {
        let draw = rng.uniform_unit();
        let mut cumulative = 0.0;
        let chosen = self.successors.iter().find(|succ| {
            cumulative += succ.probability;
            draw <= cumulative
        });

        let Some(successor) = chosen else {
            sink.report(Diagnostic::NoSuccessorChosen);
            return None;
        };

        Some(successor.modules.iter().map(|m| m.instantiate(env, rng, sink)).collect())
    }
}

/// Walks `formal` right-to-left against `context` scanning backward from `index`, skipping
/// ignored modules and bracketed substrings, exactly as `Production::Matches`'s left-context
/// loop does. `A < B` matches `A[anything]B`.
fn match_left_context(
    formal: &[Module],
    context: &[Module],
    index: usize,
    env: &mut Env<'_>,
    rng: &mut Rng,
    sink: &mut dyn DiagnosticSink,
) -> bool {
    let mut value_idx = index;
    let mut brackets = 0i32;

    for formal_module in formal.iter().rev() {
        let found = loop {
            if value_idx == 0 {
                break None;
            }
            value_idx -= 1;
            let candidate = &context[value_idx];
            if candidate.ignore {
                continue;
            }
            if candidate.is_right_bracket() {
                brackets += 1;
                continue;
            }
            if candidate.is_left_bracket() {
                if brackets > 0 {
                    brackets -= 1;
                }
                continue;
            }
            if brackets == 0 {
                break Some(candidate);
            }
        };

        let Some(candidate) = found else {
            return false;
        };
        if !formal_module.conforms(candidate) {
            return false;
        }
        if !formal_module.bind(candidate, env, rng, sink) {
            return false;
        }
    }

    true
}

/// Walks `formal` left-to-right against `context` scanning forward from `index`. `[` and `]`
/// formals have asymmetric skip rules from ordinary formals (see the three-way
/// branch), matching `A > B` against `A[anything]B` while rejecting a sibling branch's
/// module as context (`A[B]C` does not make `C` a right context of `B`).
fn match_right_context(
    formal: &[Module],
    context: &[Module],
    index: usize,
    env: &mut Env<'_>,
    rng: &mut Rng,
    sink: &mut dyn DiagnosticSink,
) -> bool {
    let mut value_idx = index + 1;

    for formal_module in formal {
        let found = if formal_module.is_left_bracket() {
            loop {
                if value_idx >= context.len() {
                    break None;
                }
                let candidate = &context[value_idx];
                if candidate.ignore {
                    value_idx += 1;
                    continue;
                }
                break Some(candidate);
            }
        } else if formal_module.is_right_bracket() {
            let mut brackets = 0i32;
            loop {
                if value_idx >= context.len() {
                    break None;
                }
                let candidate = &context[value_idx];
                if candidate.is_right_bracket() {
                    if brackets == 0 {
                        break Some(candidate);
                    }
                    brackets -= 1;
                } else if candidate.is_left_bracket() {
                    brackets += 1;
                }
                value_idx += 1;
            }
        } else {
            let mut brackets = 0i32;
            let mut rejected = false;
            let result = loop {
                if value_idx >= context.len() {
                    break None;
                }
                let candidate = &context[value_idx];
                if candidate.ignore {
                    value_idx += 1;
                    continue;
                }
                if candidate.is_left_bracket() {
                    brackets += 1;
                    value_idx += 1;
                    continue;
                }
                if candidate.is_right_bracket() {
                    if brackets > 0 {
                        brackets -= 1;
                        value_idx += 1;
                        continue;
                    }
                    rejected = true;
                    break None;
                }
                if brackets == 0 {
                    break Some(candidate);
                }
                value_idx += 1;
            };
            if rejected {
                return false;
            }
            result
        };

        let Some(candidate) = found else {
            return false;
        };
        if !formal_module.conforms(candidate) {
            return false;
        }
        if !formal_module.bind(candidate, env, rng, sink) {
            return false;
        }
        value_idx += 1;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NullSink;
    use crate::intern::Interner;
    use crate::value::Value;

    fn simple_module(interner: &mut Interner, name: &str) -> Module {
        Module::new(interner.intern(name), vec![])
    }

    #[test]
    fn context_free_production_matches_center_only() {
        let mut interner = Interner::new();
        let f = simple_module(&mut interner, "F");
        let production = Production {
            predecessor: Predecessor { left: None, center: f.clone(), right: None },
            condition: None,
            successors: vec![Successor { probability: 1.0, modules: vec![f.clone()] }],
        };
        let globals = SymbolTable::new();
        let mut rng = Rng::from_seed(0);
        let mut sink = NullSink;
        let context = [f];
        assert!(production.matches(&context, 0, &globals, &mut rng, &mut sink).is_some());
    }

    #[test]
    fn right_context_matches_across_a_bracketed_branch() {
        // A[B]C: testing "A > C" should match, skipping the bracketed B.
        let mut interner = Interner::new();
        let a = simple_module(&mut interner, "A");
        let b = simple_module(&mut interner, "B");
        let c = simple_module(&mut interner, "C");
        let lb = Module::new(crate::intern::LEFT_BRACKET, vec![]);
        let rb = Module::new(crate::intern::RIGHT_BRACKET, vec![]);

        let context = vec![a.clone(), lb, b, rb, c.clone()];
        let production = Production {
            predecessor: Predecessor { left: None, center: a, right: Some(vec![c.clone()]) },
            condition: None,
            successors: vec![Successor { probability: 1.0, modules: vec![c] }],
        };
        let globals = SymbolTable::new();
        let mut rng = Rng::from_seed(0);
        let mut sink = NullSink;
        assert!(production.matches(&context, 0, &globals, &mut rng, &mut sink).is_some());
    }

    #[test]
    fn right_context_rejects_a_sibling_branch_module() {
        // A[B]C: testing "B > C" should NOT match; C is not B's right context.
        let mut interner = Interner::new();
        let a = simple_module(&mut interner, "A");
        let b = simple_module(&mut interner, "B");
        let c = simple_module(&mut interner, "C");
        let lb = Module::new(crate::intern::LEFT_BRACKET, vec![]);
        let rb = Module::new(crate::intern::RIGHT_BRACKET, vec![]);

        let context = vec![a, lb, b.clone(), rb, c.clone()];
        let production = Production {
            predecessor: Predecessor { left: None, center: b, right: Some(vec![c.clone()]) },
            condition: None,
            successors: vec![Successor { probability: 1.0, modules: vec![c] }],
        };
        let globals = SymbolTable::new();
        let mut rng = Rng::from_seed(0);
        let mut sink = NullSink;
        assert!(production.matches(&context, 2, &globals, &mut rng, &mut sink).is_none());
    }

    #[test]
    fn condition_gates_the_match() {
        let mut interner = Interner::new();
        let f = simple_module(&mut interner, "F");
        let production = Production {
            predecessor: Predecessor { left: None, center: f.clone(), right: None },
            condition: Some(Expression::Value(Value::Int(0))),
            successors: vec![Successor { probability: 1.0, modules: vec![f.clone()] }],
        };
        let globals = SymbolTable::new();
        let mut rng = Rng::from_seed(0);
        let mut sink = NullSink;
        let context = [f];
        assert!(production.matches(&context, 0, &globals, &mut rng, &mut sink).is_none());
    }

    #[test]
    fn produce_uses_cumulative_probability_walk() {
        let mut interner = Interner::new();
        let f = simple_module(&mut interner, "F");
        let g = simple_module(&mut interner, "G");
        let successors =
            vec![Successor { probability: 0.5, modules: vec![f.clone()] }, Successor { probability: 0.5, modules: vec![g.clone()] }];
        let production = Production {
            predecessor: Predecessor { left: None, center: f.clone(), right: None },
            condition: None,
            successors,
        };
        let globals = SymbolTable::new();
        let env = Env::new(&globals);
        let mut sink = NullSink;

        // A draw of exactly 0.0 should land in the first bucket (`<=` comparison).
        let mut rng = Rng::from_seed(0);
        rng.reseed(0);
        // Force a draw by using a seed whose first unit draw is small but nonzero;
        // instead directly verify both buckets are reachable over a few seeds.
        let mut saw_f = false;
        let mut saw_g = false;
        for seed in 0..20 {
            let mut rng = Rng::from_seed(seed);
            let produced = production.produce(&env, &mut rng, &mut sink).unwrap();
            if produced[0].name == f.name {
                saw_f = true;
            } else if produced[0].name == g.name {
                saw_g = true;
            }
        }
        assert!(saw_f && saw_g);
    }
}
