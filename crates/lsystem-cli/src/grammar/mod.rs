//! Parses the driver's plain-text L-system grammar format into a [`lsystem_core::Model`].
//!
//! A grammar file is a sequence of line-oriented statements: `#define`/`#ignore`
//! directives, exactly one `start:`/`axiom:` declaration, and any number of productions.
//! See [`parser`] for the concrete syntax this accepts.

mod error;
mod expr;
mod parser;
mod scanner;

pub use error::ParseError;

use lsystem_core::{Interner, Model};

/// Parses `source` into a [`Model`], interning every module and global name through
/// `interner`.
pub fn parse_model(source: &str, interner: &mut Interner) -> Result<Model, ParseError> {
    let parsed = parser::parse(source, interner)?;
    Ok(Model::new(parsed.axiom, parsed.productions, parsed.globals, parsed.ignore))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_small_branching_grammar_end_to_end() {
        let mut interner = Interner::new();
        let source = "\
#define delta 25.7
#ignore A

start: F

F -> F[+F]F[-F]F
";
        let model = parse_model(source, &mut interner).unwrap();
        assert_eq!(model.axiom.len(), 1);
        assert_eq!(model.productions.len(), 1);
        let delta = interner.intern("delta");
        assert_eq!(model.global_float(delta, 90.0), 25.7);
    }
}
