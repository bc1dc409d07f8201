//! Statement-level parsing: `#define`/`#ignore` directives, the axiom declaration, and
//! context-sensitive stochastic productions.
//!
//! The concrete syntax below is this driver's own design, written against the plainest
//! reading of the engine's module-string notation: one statement per line, `F(x,y)` for
//! parametric modules, `<`/`>` for left/right context, `:` for a guard condition, `->` for
//! the production arrow, `|` to separate stochastic successors, and a leading `(prob)` on a
//! successor to weight it.

use lsystem_core::{Env, Expression, IgnoreSet, Interner, Module, ModuleList, Predecessor, Production, Successor, SymbolTable, Value};

use super::{error::ParseError, expr::parse_expression, scanner::Scanner};

/// The fully parsed, but not-yet-ignore-resolved, pieces of a grammar file.
pub(crate) struct ParsedGrammar {
    pub axiom: ModuleList,
    pub productions: Vec<Production>,
    pub globals: SymbolTable,
    pub ignore: IgnoreSet,
}

/// Parses a complete grammar source into its axiom, productions, globals, and ignore set.
pub(crate) fn parse(source: &str, interner: &mut Interner) -> Result<ParsedGrammar, ParseError> {
    let mut scanner = Scanner::new(source);
    let mut axiom: Option<ModuleList> = None;
    let mut productions = Vec::new();
    let mut globals = SymbolTable::new();
    let mut ignore = IgnoreSet::new();

    scanner.skip_trivia();
    while !scanner.at_end() {
        if scanner.peek() == Some('#') {
            parse_directive(&mut scanner, interner, &mut globals, &mut ignore)?;
        } else if scanner.matches_keyword_at(0, "start") || scanner.matches_keyword_at(0, "axiom") {
            if axiom.is_some() {
                return Err(ParseError::new(scanner.position(), "axiom declared more than once"));
            }
            axiom = Some(parse_axiom(&mut scanner, interner)?);
        } else {
            productions.push(parse_production(&mut scanner, interner)?);
        }
        scanner.skip_trivia();
    }

    let Some(axiom) = axiom else {
        return Err(ParseError::new(scanner.position(), "grammar has no 'start:' or 'axiom:' declaration"));
    };

    let mut axiom = axiom;
    resolve_ignore_flags(&mut axiom, &mut productions, &ignore);

    Ok(ParsedGrammar { axiom, productions, globals, ignore })
}

/// `#define name expr` or `#ignore name [name...]`. The leading `#` is consumed by the
/// directive keyword itself (`#define`/`#ignore`), matching the convention that a bare `#`
/// followed by anything else is a comment, already skipped by [`Scanner::skip_trivia`].
fn parse_directive(
    scanner: &mut Scanner<'_>,
    interner: &mut Interner,
    globals: &mut SymbolTable,
    ignore: &mut IgnoreSet,
) -> Result<(), ParseError> {
    scanner.eat('#');
    if let Some(keyword) = read_keyword(scanner, &["define", "ignore"]) {
        scanner.skip_inline_ws();
        match keyword {
            "define" => {
                let Some(name) = scanner.read_identifier() else {
                    return Err(ParseError::new(scanner.position(), "expected a name after '#define'"));
                };
                scanner.skip_inline_ws();
                let value = parse_expression(scanner, interner, false)?;
                let env = Env::new(&*globals);
                let mut rng = lsystem_core::Rng::from_seed(0);
                let mut sink = lsystem_core::NullSink;
                let value = value.evaluate(&env, &mut rng, &mut sink);
                drop(env);
                globals.set(interner.intern(&name), value);
            }
            "ignore" => loop {
                scanner.skip_inline_ws();
                let Some(name) = scanner.read_identifier() else {
                    break;
                };
                ignore.insert(interner.intern(&name));
            },
            _ => unreachable!("read_keyword only returns one of the listed keywords"),
        }
        end_of_statement(scanner)?;
        Ok(())
    } else {
        Err(ParseError::new(scanner.position(), "unrecognized directive, expected 'define' or 'ignore'"))
    }
}

fn read_keyword<'k>(scanner: &mut Scanner<'_>, keywords: &[&'k str]) -> Option<&'k str> {
    for &keyword in keywords {
        if scanner.matches_keyword_at(0, keyword) {
            for _ in 0..keyword.len() {
                scanner.bump();
            }
            return Some(keyword);
        }
    }
    None
}

/// `start:` or `axiom:` followed by a module list on the same logical statement.
fn parse_axiom(scanner: &mut Scanner<'_>, interner: &mut Interner) -> Result<ModuleList, ParseError> {
    let _ = read_keyword(scanner, &["start", "axiom"]);
    scanner.skip_inline_ws();
    if !scanner.eat(':') {
        return Err(ParseError::new(scanner.position(), "expected ':' after 'start' or 'axiom'"));
    }
    scanner.skip_inline_ws();
    let modules = parse_module_list(scanner, interner, &EndSet::NEWLINE_OR_EOF)?;
    end_of_statement(scanner)?;
    Ok(ModuleList::from_vec(modules))
}

/// A full production statement: `[left <] center [> right] [: cond] -> successors`.
fn parse_production(scanner: &mut Scanner<'_>, interner: &mut Interner) -> Result<Production, ParseError> {
    let first = parse_module_list(scanner, interner, &EndSet::CONTEXT_OR_ARROW)?;
    scanner.skip_inline_ws();

    let (left, center_and_maybe_right) = if scanner.eat('<') {
        scanner.skip_inline_ws();
        let rest = parse_module_list(scanner, interner, &EndSet::CONTEXT_OR_ARROW)?;
        (Some(first), rest)
    } else {
        (None, first)
    };

    let mut modules = center_and_maybe_right;
    if modules.is_empty() {
        return Err(ParseError::new(scanner.position(), "production has no center module"));
    }
    let center = modules.remove(0);

    scanner.skip_inline_ws();
    let right = if scanner.eat('>') {
        scanner.skip_inline_ws();
        let right_modules = parse_module_list(scanner, interner, &EndSet::CONDITION_OR_ARROW)?;
        Some(right_modules)
    } else {
        None
    };

    scanner.skip_inline_ws();
    let condition = if scanner.eat(':') {
        scanner.skip_inline_ws();
        Some(parse_expression(scanner, interner, true)?)
    } else {
        None
    };

    scanner.skip_inline_ws();
    if !scanner.eat_arrow() {
        return Err(ParseError::new(scanner.position(), "expected '->' in production"));
    }
    scanner.skip_inline_ws();

    let successors = parse_successors(scanner, interner)?;
    end_of_statement(scanner)?;

    Ok(Production { predecessor: Predecessor { left, center, right }, condition, successors })
}

/// `succ1 | (0.3) succ2 | succ3`, defaulting to probability 1.0 for a lone successor.
fn parse_successors(scanner: &mut Scanner<'_>, interner: &mut Interner) -> Result<Vec<Successor>, ParseError> {
    let mut successors = Vec::new();
    loop {
        scanner.skip_inline_ws();
        let probability = if scanner.peek() == Some('(') {
            scanner.bump();
            let expr = parse_expression(scanner, interner, false)?;
            scanner.skip_inline_ws();
            if !scanner.eat(')') {
                return Err(ParseError::new(scanner.position(), "expected ')' after successor probability"));
            }
            let Expression::Value(value) = expr else {
                return Err(ParseError::new(scanner.position(), "successor probability must be a literal number"));
            };
            value.as_float().ok_or_else(|| ParseError::new(scanner.position(), "successor probability must be numeric"))?
        } else {
            1.0
        };
        scanner.skip_inline_ws();
        let modules = parse_module_list(scanner, interner, &EndSet::SUCCESSOR_SEPARATOR)?;
        successors.push(Successor { probability, modules });
        scanner.skip_inline_ws();
        if scanner.eat('|') {
            continue;
        }
        break;
    }
    Ok(successors)
}

/// Which characters terminate a module list in a given syntactic position. Needed because
/// `<`/`>`/`:`/`-` are ordinary binary operators inside a module's argument expressions but
/// statement punctuation outside of them — the module list parser only ever sees the
/// top-level boundary, never the inside of a `(...)` argument list.
struct EndSet {
    left_angle: bool,
    right_angle: bool,
    colon: bool,
    arrow: bool,
    pipe: bool,
}

impl EndSet {
    const NEWLINE_OR_EOF: Self = Self { left_angle: false, right_angle: false, colon: false, arrow: false, pipe: false };
    const CONTEXT_OR_ARROW: Self = Self { left_angle: true, right_angle: true, colon: true, arrow: true, pipe: false };
    const CONDITION_OR_ARROW: Self = Self { left_angle: false, right_angle: false, colon: true, arrow: true, pipe: false };
    const SUCCESSOR_SEPARATOR: Self = Self { left_angle: false, right_angle: false, colon: false, arrow: false, pipe: true };

    fn stops(&self, scanner: &Scanner<'_>) -> bool {
        match scanner.peek() {
            None | Some('\n') => true,
            Some('<') => self.left_angle,
            Some('>') => self.right_angle,
            Some(':') => self.colon,
            Some('|') => self.pipe,
            Some('-') if self.arrow && scanner.peek_at(1) == Some('>') => true,
            _ => false,
        }
    }
}

/// A sequence of modules: identifiers, `@`-named modules, and single-character drawing
/// symbols, each with an optional parenthesized argument list.
fn parse_module_list(scanner: &mut Scanner<'_>, interner: &mut Interner, end: &EndSet) -> Result<Vec<Module>, ParseError> {
    let mut modules = Vec::new();
    loop {
        scanner.skip_inline_ws();
        if end.stops(scanner) {
            break;
        }
        modules.push(parse_module(scanner, interner)?);
    }
    Ok(modules)
}

fn parse_module(scanner: &mut Scanner<'_>, interner: &mut Interner) -> Result<Module, ParseError> {
    let name = read_module_name(scanner)?;
    let name = interner.intern(&name);

    scanner.skip_inline_ws();
    let params = if scanner.peek() == Some('(') {
        scanner.bump();
        parse_argument_list(scanner, interner)?
    } else {
        Vec::new()
    };

    Ok(Module::new(name, params))
}

fn parse_argument_list(scanner: &mut Scanner<'_>, interner: &mut Interner) -> Result<Vec<Expression>, ParseError> {
    let mut args = Vec::new();
    scanner.skip_inline_ws();
    if scanner.eat(')') {
        return Ok(args);
    }
    loop {
        args.push(parse_expression(scanner, interner, false)?);
        scanner.skip_inline_ws();
        if scanner.eat(',') {
            continue;
        }
        if scanner.eat(')') {
            break;
        }
        return Err(ParseError::new(scanner.position(), "expected ',' or ')' in module arguments"));
    }
    Ok(args)
}

/// A module name is a single letter (`F`, `f`, `A`, `t`, ...), an `@`-prefixed name (`@Tx`,
/// `@md`, `@ma`, `@mw`), or a single punctuation symbol from the fixed drawing alphabet
/// (`+-&^\/|$[]{.}G!'~%` and the bracketless `"`).
///
/// Module names are deliberately single characters, not whole identifiers: classic L-system
/// strings pack adjacent same-letter modules with no separator (`FFFFFFFFFF` is ten `F`
/// modules, not one ten-letter name), so the module-list scanner must not greedily consume a
/// run of letters the way an expression-context identifier does.
fn read_module_name(scanner: &mut Scanner<'_>) -> Result<String, ParseError> {
    match scanner.peek() {
        Some(c) if c.is_alphabetic() || c == '_' => {
            scanner.bump();
            Ok(c.to_string())
        }
        Some('@') => {
            let mut name = String::from("@");
            scanner.bump();
            while matches!(scanner.peek(), Some(c) if c.is_alphanumeric()) {
                name.push(scanner.bump().expect("peeked alphanumeric"));
            }
            Ok(name)
        }
        Some(c) if "+-&^\\/|$[]{.}G!'~%\"".contains(c) => {
            scanner.bump();
            Ok(c.to_string())
        }
        _ => Err(ParseError::new(scanner.position(), "expected a module name")),
    }
}

/// Consumes the rest of the current line: trailing whitespace, an optional trailing comment,
/// and the newline (or end of input) that ends the statement.
fn end_of_statement(scanner: &mut Scanner<'_>) -> Result<(), ParseError> {
    scanner.skip_inline_ws();
    if scanner.peek() == Some('#') {
        while !matches!(scanner.peek(), None | Some('\n')) {
            scanner.bump();
        }
    }
    match scanner.peek() {
        None => Ok(()),
        Some('\n') => {
            scanner.bump();
            Ok(())
        }
        _ => Err(ParseError::new(scanner.position(), "expected end of line")),
    }
}

/// Walks every module reachable from the parsed grammar — the axiom and every production's
/// left/center/right predecessor modules and successor modules — stamping its final
/// `ignore` flag from the accumulated ignore set. A second pass is necessary because
/// `#ignore` directives may appear anywhere in the file relative to the productions that
/// need to honor them.
fn resolve_ignore_flags(axiom: &mut ModuleList, productions: &mut [Production], ignore: &IgnoreSet) {
    let mut axiom_modules: Vec<Module> = axiom.iter().cloned().collect();
    for module in &mut axiom_modules {
        stamp(module, ignore);
    }
    *axiom = ModuleList::from_vec(axiom_modules);

    for production in productions {
        if let Some(left) = &mut production.predecessor.left {
            for module in left {
                stamp(module, ignore);
            }
        }
        stamp(&mut production.predecessor.center, ignore);
        if let Some(right) = &mut production.predecessor.right {
            for module in right {
                stamp(module, ignore);
            }
        }
        for successor in &mut production.successors {
            for module in &mut successor.modules {
                stamp(module, ignore);
            }
        }
    }
}

fn stamp(module: &mut Module, ignore: &IgnoreSet) {
    module.ignore = ignore.contains(module.name);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_axiom_and_a_context_free_production() {
        let mut interner = Interner::new();
        let source = "start: F\nF -> F F\n";
        let grammar = parse(source, &mut interner).unwrap();
        assert_eq!(grammar.axiom.len(), 1);
        assert_eq!(grammar.productions.len(), 1);
        assert!(grammar.productions[0].predecessor.left.is_none());
        assert!(grammar.productions[0].predecessor.right.is_none());
    }

    #[test]
    fn parses_context_sensitive_production_with_condition() {
        let mut interner = Interner::new();
        let source = "start: B A\nB < A : 1 -> B\n";
        let grammar = parse(source, &mut interner).unwrap();
        let production = &grammar.productions[0];
        assert!(production.predecessor.left.is_some());
        assert!(production.condition.is_some());
    }

    #[test]
    fn parses_stochastic_successors_with_probabilities() {
        let mut interner = Interner::new();
        let source = "start: A\nA -> (0.5) F | (0.5) G\n";
        let grammar = parse(source, &mut interner).unwrap();
        assert_eq!(grammar.productions[0].successors.len(), 2);
        assert!((grammar.productions[0].successors[0].probability - 0.5).abs() < 1e-9);
    }

    #[test]
    fn parses_parametric_modules_with_arguments() {
        let mut interner = Interner::new();
        let source = "start: F(1,2)\nF(x,y) -> F(x+y,0)\n";
        let grammar = parse(source, &mut interner).unwrap();
        assert_eq!(grammar.axiom.as_slice()[0].params.len(), 2);
    }

    #[test]
    fn ignore_directive_is_resolved_onto_every_occurrence() {
        let mut interner = Interner::new();
        let source = "#ignore A\nstart: A B\nB < A -> A\n";
        let grammar = parse(source, &mut interner).unwrap();
        assert!(grammar.axiom.as_slice()[0].ignore);
        assert!(!grammar.axiom.as_slice()[1].ignore);
    }

    #[test]
    fn define_directive_evaluates_its_expression() {
        let mut interner = Interner::new();
        let source = "#define delta 22.5 + 2.5\nstart: F\nF -> F\n";
        let grammar = parse(source, &mut interner).unwrap();
        let delta = interner.intern("delta");
        assert_eq!(grammar.globals.get(delta), Some(Value::Float(25.0)));
    }

    #[test]
    fn later_define_directives_can_reference_earlier_ones() {
        let mut interner = Interner::new();
        let source = "#define base 10\n#define doubled base * 2\nstart: F\nF -> F\n";
        let grammar = parse(source, &mut interner).unwrap();
        let doubled = interner.intern("doubled");
        assert_eq!(grammar.globals.get(doubled), Some(Value::Int(20)));
    }

    #[test]
    fn rejects_a_grammar_with_no_axiom() {
        let mut interner = Interner::new();
        assert!(parse("F -> F\n", &mut interner).is_err());
    }
}
