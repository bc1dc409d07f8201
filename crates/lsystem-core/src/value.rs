//! Dynamically typed scalar used for module parameters and expression results.
//!
//! A [`Value`] is one of `Int`, `Float`, or `Undefined`. `Undefined` is not an error type —
//! it is a first-class result that propagates silently through arithmetic, the way `NaN`
//! propagates through IEEE float math. Comparisons against `Undefined` are always `false`
//! (via `Undefined` itself, which a condition check treats as "does not hold").

use std::fmt;

/// A scalar value flowing through expressions and module parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    /// Result of an operation that has no meaningful value: division by zero, an
    /// unresolved variable, a type mismatch on a bitwise/logical operator, etc.
    Undefined,
}

/// Two-bit classification of a binary operator's operand types, used to dispatch the
/// int/int, int/float, float/int, float/float arithmetic rules in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpType {
    IntInt,
    IntFloat,
    FloatInt,
    FloatFloat,
    Undef,
}

impl Value {
    fn op_type(self, other: Self) -> OpType {
        match (self, other) {
            (Self::Int(_), Self::Int(_)) => OpType::IntInt,
            (Self::Int(_), Self::Float(_)) => OpType::IntFloat,
            (Self::Float(_), Self::Int(_)) => OpType::FloatInt,
            (Self::Float(_), Self::Float(_)) => OpType::FloatFloat,
            _ => OpType::Undef,
        }
    }

    /// Succeeds only if the stored kind is `Int`; no promotion.
    #[must_use]
    pub fn as_int(self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(i),
            _ => None,
        }
    }

    /// Succeeds for both `Int` (promoted) and `Float`.
    #[must_use]
    pub fn as_float(self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(i as f64),
            Self::Float(f) => Some(f),
            Self::Undefined => None,
        }
    }

    #[must_use]
    pub fn is_undefined(self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Absolute value; preserves the int/float tag of the operand.
    #[must_use]
    pub fn abs(self) -> Self {
        match self {
            Self::Int(i) => Self::Int(i.abs()),
            Self::Float(f) => Self::Float(f.abs()),
            Self::Undefined => Self::Undefined,
        }
    }

    #[must_use]
    pub fn neg(self) -> Self {
        match self {
            Self::Int(i) => Self::Int(-i),
            Self::Float(f) => Self::Float(-f),
            Self::Undefined => Self::Undefined,
        }
    }

    /// Bitwise complement. Requires an int operand.
    #[must_use]
    pub fn bit_not(self) -> Self {
        match self {
            Self::Int(i) => Self::Int(!i),
            _ => Self::Undefined,
        }
    }

    /// Logical complement. Requires an int operand; result is `0` or `1`.
    #[must_use]
    pub fn logical_not(self) -> Self {
        match self {
            Self::Int(i) => Self::Int(i64::from(i == 0)),
            _ => Self::Undefined,
        }
    }

    #[must_use]
    pub fn add(self, other: Self) -> Self {
        self.arith(other, |a, b| a.wrapping_add(b), |a, b| a + b)
    }

    #[must_use]
    pub fn sub(self, other: Self) -> Self {
        self.arith(other, |a, b| a.wrapping_sub(b), |a, b| a - b)
    }

    #[must_use]
    pub fn mul(self, other: Self) -> Self {
        self.arith(other, |a, b| a.wrapping_mul(b), |a, b| a * b)
    }

    fn arith(self, other: Self, int_op: impl Fn(i64, i64) -> i64, float_op: impl Fn(f64, f64) -> f64) -> Self {
        match self.op_type(other) {
            OpType::IntInt => {
                let (Self::Int(a), Self::Int(b)) = (self, other) else {
                    unreachable!()
                };
                Self::Int(int_op(a, b))
            }
            OpType::IntFloat | OpType::FloatInt | OpType::FloatFloat => {
                let a = self.as_float().unwrap();
                let b = other.as_float().unwrap();
                Self::Float(float_op(a, b))
            }
            OpType::Undef => Self::Undefined,
        }
    }

    /// Division always yields a float, even for two int operands. Division by zero (or
    /// either operand being `Undefined`) yields `Undefined`, never a signal.
    #[must_use]
    pub fn div(self, other: Self) -> Self {
        let (Some(a), Some(b)) = (self.as_float(), other.as_float()) else {
            return Self::Undefined;
        };
        if b == 0.0 {
            return Self::Undefined;
        }
        Self::Float(a / b)
    }

    /// Modulo requires two int operands; division by zero yields `Undefined`.
    #[must_use]
    pub fn rem(self, other: Self) -> Self {
        match (self, other) {
            (Self::Int(_), Self::Int(0)) => Self::Undefined,
            (Self::Int(a), Self::Int(b)) => Self::Int(a % b),
            _ => Self::Undefined,
        }
    }

    /// Power: `self ^ other`. Always produces a `Float`, even for two int operands (see
    /// `DESIGN.md` for why).
    #[must_use]
    pub fn pow(self, other: Self) -> Self {
        match (self.as_float(), other.as_float()) {
            (Some(a), Some(b)) => Self::Float(a.powf(b)),
            _ => Self::Undefined,
        }
    }

    /// Bitwise AND/OR require int operands on both sides.
    #[must_use]
    pub fn bit_and(self, other: Self) -> Self {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Self::Int(a & b),
            _ => Self::Undefined,
        }
    }

    #[must_use]
    pub fn bit_or(self, other: Self) -> Self {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Self::Int(a | b),
            _ => Self::Undefined,
        }
    }

    /// Logical AND/OR short-circuit on neither side; both operands must already be
    /// evaluated `Value`s (the expression evaluator does not special-case these as
    /// short-circuiting control flow).
    #[must_use]
    pub fn logical_and(self, other: Self) -> Self {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Self::Int(i64::from(a != 0 && b != 0)),
            _ => Self::Undefined,
        }
    }

    #[must_use]
    pub fn logical_or(self, other: Self) -> Self {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Self::Int(i64::from(a != 0 || b != 0)),
            _ => Self::Undefined,
        }
    }

    #[must_use]
    pub fn eq_value(self, other: Self) -> Self {
        self.compare(other, |o| o == std::cmp::Ordering::Equal)
    }

    #[must_use]
    pub fn ne_value(self, other: Self) -> Self {
        self.compare(other, |o| o != std::cmp::Ordering::Equal)
    }

    #[must_use]
    pub fn lt(self, other: Self) -> Self {
        self.compare(other, |o| o == std::cmp::Ordering::Less)
    }

    #[must_use]
    pub fn le(self, other: Self) -> Self {
        self.compare(other, |o| o != std::cmp::Ordering::Greater)
    }

    #[must_use]
    pub fn gt(self, other: Self) -> Self {
        self.compare(other, |o| o == std::cmp::Ordering::Greater)
    }

    #[must_use]
    pub fn ge(self, other: Self) -> Self {
        self.compare(other, |o| o != std::cmp::Ordering::Less)
    }

    fn compare(self, other: Self, accept: impl Fn(std::cmp::Ordering) -> bool) -> Self {
        let (Some(a), Some(b)) = (self.as_float(), other.as_float()) else {
            return Self::Undefined;
        };
        match a.partial_cmp(&b) {
            Some(ordering) => Self::Int(i64::from(accept(ordering))),
            None => Self::Undefined,
        }
    }

    /// Truthiness used by production conditions: only a non-zero int counts as true.
    /// `Undefined` and any float result count as false.
    #[must_use]
    pub fn is_truthy_condition(self) -> bool {
        matches!(self, Self::Int(i) if i != 0)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Undefined => write!(f, "undefined"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Int(i64::from(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn double_negation_is_identity() {
        for v in [Value::Int(7), Value::Int(-3), Value::Float(2.5), Value::Float(-0.0)] {
            assert_eq!(v.neg().neg(), v);
        }
    }

    #[test]
    fn additive_identity_holds() {
        for v in [Value::Int(7), Value::Float(2.5)] {
            assert_eq!(v.add(Value::Int(0)), v);
        }
    }

    #[test]
    fn multiplicative_identity_holds() {
        for v in [Value::Int(7), Value::Float(2.5)] {
            assert_eq!(v.mul(Value::Int(1)), v);
        }
    }

    #[test]
    fn addition_is_associative_for_like_types() {
        let (a, b, c) = (Value::Int(1), Value::Int(2), Value::Int(3));
        assert_eq!(a.add(b).add(c), a.add(b.add(c)));
        let (a, b, c) = (Value::Float(1.5), Value::Float(2.25), Value::Float(3.75));
        assert_eq!(a.add(b).add(c), a.add(b.add(c)));
    }

    #[test]
    fn int_int_division_promotes_to_float() {
        assert_eq!(Value::Int(7).div(Value::Int(2)), Value::Float(3.5));
    }

    #[test]
    fn division_by_zero_is_undefined_not_a_panic() {
        assert_eq!(Value::Int(1).div(Value::Int(0)), Value::Undefined);
        assert_eq!(Value::Float(1.0).div(Value::Float(0.0)), Value::Undefined);
    }

    #[test]
    fn modulo_requires_ints() {
        assert_eq!(Value::Int(7).rem(Value::Int(3)), Value::Int(1));
        assert_eq!(Value::Float(7.0).rem(Value::Int(3)), Value::Undefined);
        assert_eq!(Value::Int(7).rem(Value::Int(0)), Value::Undefined);
    }

    #[test]
    fn power_always_yields_float() {
        assert_eq!(Value::Int(2).pow(Value::Int(10)), Value::Float(1024.0));
    }

    #[test]
    fn bitwise_and_logical_ops_reject_floats() {
        assert_eq!(Value::Float(1.0).bit_and(Value::Int(1)), Value::Undefined);
        assert_eq!(Value::Float(1.0).logical_and(Value::Int(1)), Value::Undefined);
    }

    #[test]
    fn undefined_propagates_through_arithmetic() {
        assert_eq!(Value::Undefined.add(Value::Int(1)), Value::Undefined);
        assert_eq!(Value::Int(1).add(Value::Undefined), Value::Undefined);
    }

    #[test]
    fn comparisons_against_undefined_are_undefined() {
        assert_eq!(Value::Undefined.lt(Value::Int(1)), Value::Undefined);
        assert!(!Value::Undefined.lt(Value::Int(1)).is_truthy_condition());
    }

    #[test]
    fn truthiness_requires_nonzero_int() {
        assert!(Value::Int(1).is_truthy_condition());
        assert!(!Value::Int(0).is_truthy_condition());
        assert!(!Value::Float(1.0).is_truthy_condition());
        assert!(!Value::Undefined.is_truthy_condition());
    }
}
