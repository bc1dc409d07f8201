//! Recursive-descent expression parsing, shared by module argument lists, production
//! conditions, and successor probabilities.
//!
//! Precedence (loosest to tightest): `||`, `&&`, `==`/`!=`, relational, `+`/`-`, `*`/`/`/`%`,
//! `^` (right-associative), unary `-`/`~`/`!`, primary. This mirrors the usual
//! `expression.cpp` grammar, cross-checked against its operator-precedence table.

use lsystem_core::{BinOp, Builtin, Expression, Interner, UnOp, Value};

use super::{error::ParseError, scanner::Scanner};

/// Parses a full expression. `stop_at_arrow` is set while parsing a production's condition,
/// where a bare `-` immediately followed by `>` ends the condition (the production arrow)
/// rather than being consumed as subtraction.
pub(crate) fn parse_expression(scanner: &mut Scanner<'_>, interner: &mut Interner, stop_at_arrow: bool) -> Result<Expression, ParseError> {
    parse_logical_or(scanner, interner, stop_at_arrow)
}

fn parse_logical_or(scanner: &mut Scanner<'_>, interner: &mut Interner, stop_at_arrow: bool) -> Result<Expression, ParseError> {
    let mut lhs = parse_logical_and(scanner, interner, stop_at_arrow)?;
    loop {
        scanner.skip_inline_ws();
        if scanner.peek() == Some('|') && scanner.peek_at(1) == Some('|') {
            scanner.bump();
            scanner.bump();
            let rhs = parse_logical_and(scanner, interner, stop_at_arrow)?;
            lhs = Expression::Binary(BinOp::LogicalOr, Box::new(lhs), Box::new(rhs));
        } else {
            break;
        }
    }
    Ok(lhs)
}

fn parse_logical_and(scanner: &mut Scanner<'_>, interner: &mut Interner, stop_at_arrow: bool) -> Result<Expression, ParseError> {
    let mut lhs = parse_equality(scanner, interner, stop_at_arrow)?;
    loop {
        scanner.skip_inline_ws();
        if scanner.peek() == Some('&') && scanner.peek_at(1) == Some('&') {
            scanner.bump();
            scanner.bump();
            let rhs = parse_equality(scanner, interner, stop_at_arrow)?;
            lhs = Expression::Binary(BinOp::LogicalAnd, Box::new(lhs), Box::new(rhs));
        } else {
            break;
        }
    }
    Ok(lhs)
}

fn parse_equality(scanner: &mut Scanner<'_>, interner: &mut Interner, stop_at_arrow: bool) -> Result<Expression, ParseError> {
    let mut lhs = parse_relational(scanner, interner, stop_at_arrow)?;
    loop {
        scanner.skip_inline_ws();
        let op = if scanner.peek() == Some('=') && scanner.peek_at(1) == Some('=') {
            scanner.bump();
            scanner.bump();
            Some(BinOp::Eq)
        } else if scanner.peek() == Some('!') && scanner.peek_at(1) == Some('=') {
            scanner.bump();
            scanner.bump();
            Some(BinOp::Ne)
        } else {
            None
        };
        match op {
            Some(op) => {
                let rhs = parse_relational(scanner, interner, stop_at_arrow)?;
                lhs = Expression::Binary(op, Box::new(lhs), Box::new(rhs));
            }
            None => break,
        }
    }
    Ok(lhs)
}

fn parse_relational(scanner: &mut Scanner<'_>, interner: &mut Interner, stop_at_arrow: bool) -> Result<Expression, ParseError> {
    let mut lhs = parse_additive(scanner, interner, stop_at_arrow)?;
    loop {
        scanner.skip_inline_ws();
        let op = match scanner.peek() {
            Some('<') if scanner.peek_at(1) == Some('=') => {
                scanner.bump();
                scanner.bump();
                Some(BinOp::Le)
            }
            Some('>') if scanner.peek_at(1) == Some('=') => {
                scanner.bump();
                scanner.bump();
                Some(BinOp::Ge)
            }
            Some('<') => {
                scanner.bump();
                Some(BinOp::Lt)
            }
            Some('>') => {
                scanner.bump();
                Some(BinOp::Gt)
            }
            _ => None,
        };
        match op {
            Some(op) => {
                let rhs = parse_additive(scanner, interner, stop_at_arrow)?;
                lhs = Expression::Binary(op, Box::new(lhs), Box::new(rhs));
            }
            None => break,
        }
    }
    Ok(lhs)
}

fn parse_additive(scanner: &mut Scanner<'_>, interner: &mut Interner, stop_at_arrow: bool) -> Result<Expression, ParseError> {
    let mut lhs = parse_multiplicative(scanner, interner, stop_at_arrow)?;
    loop {
        scanner.skip_inline_ws();
        match scanner.peek() {
            Some('+') => {
                scanner.bump();
                let rhs = parse_multiplicative(scanner, interner, stop_at_arrow)?;
                lhs = Expression::Binary(BinOp::Add, Box::new(lhs), Box::new(rhs));
            }
            Some('-') if !(stop_at_arrow && scanner.peek_at(1) == Some('>')) => {
                scanner.bump();
                let rhs = parse_multiplicative(scanner, interner, stop_at_arrow)?;
                lhs = Expression::Binary(BinOp::Sub, Box::new(lhs), Box::new(rhs));
            }
            _ => break,
        }
    }
    Ok(lhs)
}

fn parse_multiplicative(scanner: &mut Scanner<'_>, interner: &mut Interner, stop_at_arrow: bool) -> Result<Expression, ParseError> {
    let mut lhs = parse_power(scanner, interner, stop_at_arrow)?;
    loop {
        scanner.skip_inline_ws();
        let op = match scanner.peek() {
            Some('*') => Some(BinOp::Mul),
            Some('/') => Some(BinOp::Div),
            Some('%') => Some(BinOp::Rem),
            _ => None,
        };
        match op {
            Some(op) => {
                scanner.bump();
                let rhs = parse_power(scanner, interner, stop_at_arrow)?;
                lhs = Expression::Binary(op, Box::new(lhs), Box::new(rhs));
            }
            None => break,
        }
    }
    Ok(lhs)
}

/// `^` is right-associative, matching the classic exponentiation convention (`2^3^2 == 2^9`).
fn parse_power(scanner: &mut Scanner<'_>, interner: &mut Interner, stop_at_arrow: bool) -> Result<Expression, ParseError> {
    let lhs = parse_unary(scanner, interner, stop_at_arrow)?;
    scanner.skip_inline_ws();
    if scanner.peek() == Some('^') {
        scanner.bump();
        let rhs = parse_power(scanner, interner, stop_at_arrow)?;
        Ok(Expression::Binary(BinOp::Pow, Box::new(lhs), Box::new(rhs)))
    } else {
        Ok(lhs)
    }
}

fn parse_unary(scanner: &mut Scanner<'_>, interner: &mut Interner, stop_at_arrow: bool) -> Result<Expression, ParseError> {
    scanner.skip_inline_ws();
    let op = match scanner.peek() {
        Some('-') if !(stop_at_arrow && scanner.peek_at(1) == Some('>')) => Some(UnOp::Neg),
        Some('~') => Some(UnOp::BitNot),
        Some('!') => Some(UnOp::LogicalNot),
        _ => None,
    };
    match op {
        Some(op) => {
            scanner.bump();
            let operand = parse_unary(scanner, interner, stop_at_arrow)?;
            Ok(Expression::Unary(op, Box::new(operand)))
        }
        None => parse_primary(scanner, interner, stop_at_arrow),
    }
}

fn parse_primary(scanner: &mut Scanner<'_>, interner: &mut Interner, stop_at_arrow: bool) -> Result<Expression, ParseError> {
    scanner.skip_inline_ws();
    match scanner.peek() {
        Some('(') => {
            scanner.bump();
            let inner = parse_expression(scanner, interner, false)?;
            scanner.skip_inline_ws();
            if !scanner.eat(')') {
                return Err(ParseError::new(scanner.position(), "expected ')' to close expression"));
            }
            Ok(inner)
        }
        Some(c) if c.is_ascii_digit() || (c == '.' && matches!(scanner.peek_at(1), Some(d) if d.is_ascii_digit())) => {
            parse_number(scanner)
        }
        Some(c) if c.is_alphabetic() || c == '_' => {
            let name = scanner.read_identifier().expect("checked alphabetic above");
            scanner.skip_inline_ws();
            if scanner.peek() == Some('(') {
                scanner.bump();
                let args = parse_argument_list(scanner, interner)?;
                let func = Builtin::lookup(&name);
                Ok(Expression::Call { func, name: interner.intern(&name), args })
            } else {
                Ok(Expression::Name(interner.intern(&name)))
            }
        }
        _ => Err(ParseError::new(scanner.position(), "expected a number, name, function call, or '('")),
    }
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
        return Err(ParseError::new(scanner.position(), "expected ',' or ')' in argument list"));
    }
    Ok(args)
}

fn parse_number(scanner: &mut Scanner<'_>) -> Result<Expression, ParseError> {
    let start = scanner.position();
    let mut text = String::new();
    let mut is_float = false;

    while matches!(scanner.peek(), Some(c) if c.is_ascii_digit()) {
        text.push(scanner.bump().expect("peeked digit"));
    }
    if scanner.peek() == Some('.') && matches!(scanner.peek_at(1), Some(d) if d.is_ascii_digit()) {
        is_float = true;
        text.push(scanner.bump().expect("peeked '.'"));
        while matches!(scanner.peek(), Some(c) if c.is_ascii_digit()) {
            text.push(scanner.bump().expect("peeked digit"));
        }
    }
    if matches!(scanner.peek(), Some('e' | 'E')) {
        let exponent_sign_offset = if matches!(scanner.peek_at(1), Some('+' | '-')) { 2 } else { 1 };
        if matches!(scanner.peek_at(exponent_sign_offset), Some(d) if d.is_ascii_digit()) {
            is_float = true;
            text.push(scanner.bump().expect("peeked exponent marker"));
            if matches!(scanner.peek(), Some('+' | '-')) {
                text.push(scanner.bump().expect("peeked exponent sign"));
            }
            while matches!(scanner.peek(), Some(c) if c.is_ascii_digit()) {
                text.push(scanner.bump().expect("peeked digit"));
            }
        }
    }

    if is_float {
        text.parse::<f64>().map(|v| Expression::Value(Value::Float(v))).map_err(|_| ParseError::new(start, "invalid float literal"))
    } else {
        text.parse::<i64>().map(|v| Expression::Value(Value::Int(v))).map_err(|_| ParseError::new(start, "invalid integer literal"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lsystem_core::{Env, NullSink, Rng, SymbolTable};

    fn eval_str(src: &str) -> Value {
        let mut interner = Interner::new();
        let mut scanner = Scanner::new(src);
        let expr = parse_expression(&mut scanner, &mut interner, false).unwrap();
        let globals = SymbolTable::new();
        let env = Env::new(&globals);
        let mut rng = Rng::from_seed(0);
        let mut sink = NullSink;
        expr.evaluate(&env, &mut rng, &mut sink)
    }

    #[test]
    fn parses_additive_and_multiplicative_precedence() {
        assert_eq!(eval_str("2 + 3 * 4"), Value::Int(14));
    }

    #[test]
    fn power_is_right_associative() {
        // 2 ^ (3 ^ 2) = 2 ^ 9 = 512, not (2^3)^2 = 64.
        let Value::Float(v) = eval_str("2 ^ 3 ^ 2") else { panic!("expected float") };
        assert!((v - 512.0).abs() < 1e-9);
    }

    #[test]
    fn parses_function_calls() {
        let Value::Float(v) = eval_str("sin(90)") else { panic!("expected float") };
        assert!((v - 1.0).abs() < 1e-9);
    }

    #[test]
    fn unary_minus_binds_tighter_than_power_rhs() {
        let Value::Float(v) = eval_str("2 ^ -1") else { panic!("expected float") };
        assert!((v - 0.5).abs() < 1e-9);
    }

    #[test]
    fn parses_float_literals_with_exponents() {
        assert_eq!(eval_str("1.5e2"), Value::Float(150.0));
    }
}
