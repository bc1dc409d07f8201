//! Expression AST: parsed arithmetic/logical expressions attached to module parameters,
//! production conditions, and production successors.

use crate::{
    diagnostics::{Diagnostic, DiagnosticSink},
    env::Env,
    intern::NameId,
    rng::Rng,
    value::Value,
};

/// Binary operator kinds, one variant per surface-syntax operator the expression grammar supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    /// `^`: power, not XOR.
    Pow,
    BitAnd,
    BitOr,
    LogicalAnd,
    LogicalOr,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Unary operator kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    BitNot,
    LogicalNot,
}

/// One of the fixed built-in functions callable from an expression. Arity and the
/// degrees/radians convention for each matches the engine's fixed function table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    /// `atan2(y, x)` — note the argument order.
    Atan2,
    Abs,
    Ceil,
    Floor,
    Exp,
    Log,
    Log10,
    Rand,
    Srand,
}

impl Builtin {
    /// Resolves a function name to its builtin, or `None` for an unimplemented function
    /// (which evaluates to `Undefined` with a diagnostic, not a parse error).
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        Some(match name {
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "asin" => Self::Asin,
            "acos" => Self::Acos,
            "atan" => Self::Atan,
            "atan2" => Self::Atan2,
            "abs" => Self::Abs,
            "ceil" => Self::Ceil,
            "floor" => Self::Floor,
            "exp" => Self::Exp,
            "log" => Self::Log,
            "log10" => Self::Log10,
            "rand" => Self::Rand,
            "srand" => Self::Srand,
            _ => return None,
        })
    }
}

/// A parsed expression tree.
#[derive(Debug, Clone)]
pub enum Expression {
    Value(Value),
    /// A reference to a bound name (formal parameter or global).
    Name(NameId),
    Unary(UnOp, Box<Expression>),
    Binary(BinOp, Box<Expression>, Box<Expression>),
    /// A call to one of the fixed builtins, unresolved function names included so the
    /// evaluator can report `UnresolvedName`-style diagnostics uniformly.
    Call { func: Option<Builtin>, name: NameId, args: Vec<Expression> },
}

fn to_radians(degrees: f64) -> f64 {
    degrees.to_radians()
}

fn to_degrees(radians: f64) -> f64 {
    radians.to_degrees()
}

impl Expression {
    /// Evaluates this expression against `env`, threading the shared PRNG stream through
    /// for `rand`/`srand` and reporting non-fatal lookup failures through `sink`.
    pub fn evaluate(&self, env: &Env<'_>, rng: &mut Rng, sink: &mut dyn DiagnosticSink) -> Value {
        match self {
            Self::Value(v) => *v,
            Self::Name(name) => match env.get(*name) {
                Some(v) => v,
                None => {
                    sink.report(Diagnostic::UnresolvedName(*name));
                    Value::Undefined
                }
            },
            Self::Unary(op, operand) => {
                let v = operand.evaluate(env, rng, sink);
                match op {
                    UnOp::Neg => v.neg(),
                    UnOp::BitNot => v.bit_not(),
                    UnOp::LogicalNot => v.logical_not(),
                }
            }
            Self::Binary(op, lhs, rhs) => {
                let l = lhs.evaluate(env, rng, sink);
                let r = rhs.evaluate(env, rng, sink);
                match op {
                    BinOp::Add => l.add(r),
                    BinOp::Sub => l.sub(r),
                    BinOp::Mul => l.mul(r),
                    BinOp::Div => l.div(r),
                    BinOp::Rem => l.rem(r),
                    BinOp::Pow => l.pow(r),
                    BinOp::BitAnd => l.bit_and(r),
                    BinOp::BitOr => l.bit_or(r),
                    BinOp::LogicalAnd => l.logical_and(r),
                    BinOp::LogicalOr => l.logical_or(r),
                    BinOp::Eq => l.eq_value(r),
                    BinOp::Ne => l.ne_value(r),
                    BinOp::Lt => l.lt(r),
                    BinOp::Le => l.le(r),
                    BinOp::Gt => l.gt(r),
                    BinOp::Ge => l.ge(r),
                }
            }
            Self::Call { func, name, args } => {
                let Some(func) = func else {
                    sink.report(Diagnostic::UnresolvedName(*name));
                    return Value::Undefined;
                };
                self.eval_call(*func, args, env, rng, sink)
            }
        }
    }

    fn eval_call(
        &self,
        func: Builtin,
        args: &[Expression],
        env: &Env<'_>,
        rng: &mut Rng,
        sink: &mut dyn DiagnosticSink,
    ) -> Value {
        let arg = |i: usize| args.get(i).map(|e| e.evaluate(env, rng, sink));
        let arg_float = |i: usize| arg(i).and_then(Value::as_float);

        match func {
            Builtin::Sin => arg_float(0).map_or(Value::Undefined, |x| Value::Float(to_radians(x).sin())),
            Builtin::Cos => arg_float(0).map_or(Value::Undefined, |x| Value::Float(to_radians(x).cos())),
            Builtin::Tan => arg_float(0).map_or(Value::Undefined, |x| Value::Float(to_radians(x).tan())),
            Builtin::Asin => arg_float(0).map_or(Value::Undefined, |x| Value::Float(to_degrees(x.asin()))),
            Builtin::Acos => arg_float(0).map_or(Value::Undefined, |x| Value::Float(to_degrees(x.acos()))),
            Builtin::Atan => arg_float(0).map_or(Value::Undefined, |x| Value::Float(to_degrees(x.atan()))),
            Builtin::Atan2 => match (arg_float(0), arg_float(1)) {
                (Some(y), Some(x)) => Value::Float(to_degrees(y.atan2(x))),
                _ => Value::Undefined,
            },
            Builtin::Abs => arg(0).map_or(Value::Undefined, Value::abs),
            Builtin::Ceil => arg_float(0).map_or(Value::Undefined, |x| Value::Int(x.ceil() as i64)),
            Builtin::Floor => arg_float(0).map_or(Value::Undefined, |x| Value::Int(x.floor() as i64)),
            Builtin::Exp => arg_float(0).map_or(Value::Undefined, |x| Value::Float(x.exp())),
            Builtin::Log => arg_float(0).map_or(Value::Undefined, |x| Value::Float(x.ln())),
            Builtin::Log10 => arg_float(0).map_or(Value::Undefined, |x| Value::Float(x.log10())),
            Builtin::Rand => {
                // `rand()` draws [0,1); `rand(n)` draws [0,n), scaling by the argument
                // if present.
                let scale = arg_float(0).unwrap_or(1.0);
                Value::Float(rng.uniform(scale))
            }
            Builtin::Srand => {
                let seed = arg_float(0).map_or_else(
                    || {
                        std::time::SystemTime::now()
                            .duration_since(std::time::UNIX_EPOCH)
                            .map(|d| d.as_secs())
                            .unwrap_or(0)
                    },
                    |x| x as u64,
                );
                Value::Int(rng.reseed(seed) as i64)
            }
        }
    }
}
