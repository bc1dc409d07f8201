//! One generation of parallel string rewriting.

use crate::{
    diagnostics::{Diagnostic, DiagnosticSink},
    env::SymbolTable,
    module::{Module, ModuleList},
    production::Production,
    rng::Rng,
};

/// Applies a set of productions to every module in `current`, producing the next
/// generation. Productions are tried in declaration order; the first one whose predecessor
/// and context match wins: productions are tried in declaration order and the first
/// whole match wins. A module with no matching production is copied forward unchanged, after
/// reporting [`Diagnostic::NoProductionMatched`].
pub fn rewrite(
    current: &ModuleList,
    productions: &[Production],
    globals: &SymbolTable,
    rng: &mut Rng,
    sink: &mut dyn DiagnosticSink,
) -> ModuleList {
    let context = current.as_slice();
    let mut next = Vec::with_capacity(context.len());

    for index in 0..context.len() {
        let mut applied = false;
        for production in productions {
            if let Some(env) = production.matches(context, index, globals, rng, sink) {
                if let Some(successor_modules) = production.produce(&env, rng, sink) {
                    next.extend(successor_modules);
                }
                applied = true;
                break;
            }
        }
        if !applied {
            sink.report(Diagnostic::NoProductionMatched(context[index].name));
            next.push(context[index].clone());
        }
    }

    ModuleList::from_vec(next)
}

/// Runs `generations` successive rewrite passes starting from `axiom`.
pub fn derive(
    axiom: &ModuleList,
    productions: &[Production],
    globals: &SymbolTable,
    generations: u32,
    rng: &mut Rng,
    sink: &mut dyn DiagnosticSink,
) -> ModuleList {
    let mut current = axiom.clone();
    for _ in 0..generations {
        current = rewrite(&current, productions, globals, rng, sink);
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingSink;
    use crate::intern::Interner;
    use crate::production::{Predecessor, Successor};

    #[test]
    fn unmatched_modules_are_copied_forward_with_a_diagnostic() {
        let mut interner = Interner::new();
        let f = Module::new(interner.intern("F"), vec![]);
        let axiom = ModuleList::from_vec(vec![f.clone()]);
        let globals = SymbolTable::new();
        let mut rng = Rng::from_seed(0);
        let mut sink = RecordingSink::default();

        let next = rewrite(&axiom, &[], &globals, &mut rng, &mut sink);
        assert_eq!(next.len(), 1);
        assert_eq!(next.as_slice()[0].name, f.name);
        assert_eq!(sink.events.len(), 1);
    }

    #[test]
    fn matched_production_replaces_its_predecessor() {
        let mut interner = Interner::new();
        let f = Module::new(interner.intern("F"), vec![]);
        let ff = vec![f.clone(), f.clone()];
        let production = crate::production::Production {
            predecessor: Predecessor { left: None, center: f.clone(), right: None },
            condition: None,
            successors: vec![Successor { probability: 1.0, modules: ff }],
        };
        let axiom = ModuleList::from_vec(vec![f]);
        let globals = SymbolTable::new();
        let mut rng = Rng::from_seed(0);
        let mut sink = RecordingSink::default();

        let next = rewrite(&axiom, &[production], &globals, &mut rng, &mut sink);
        assert_eq!(next.len(), 2);
        assert!(sink.events.is_empty());
    }

    #[test]
    fn derive_applies_generations_in_sequence() {
        let mut interner = Interner::new();
        let f = Module::new(interner.intern("F"), vec![]);
        let production = crate::production::Production {
            predecessor: Predecessor { left: None, center: f.clone(), right: None },
            condition: None,
            successors: vec![Successor { probability: 1.0, modules: vec![f.clone(), f.clone()] }],
        };
        let axiom = ModuleList::from_vec(vec![f]);
        let globals = SymbolTable::new();
        let mut rng = Rng::from_seed(0);
        let mut sink = RecordingSink::default();

        let result = derive(&axiom, &[production], &globals, 3, &mut rng, &mut sink);
        assert_eq!(result.len(), 8);
    }
}
