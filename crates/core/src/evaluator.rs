//! Equation evaluator - pure arithmetic over an ordered run of tiles
//!
//! The first tile only seeds the expression with its number; its operator is
//! ignored. Every later tile contributes `operator number`, and the whole
//! expression is evaluated with `×`/`÷` binding tighter than `+`/`−`, so
//! `1 + 2 × 5` is 11.
//!
//! Arithmetic is exact: intermediate values are reduced fractions, and only
//! an integral final value is a usable result. Dividing by zero, ending on a
//! fraction, or overflowing `i64` yields an [`EvalError`] instead.

use std::fmt;

use thiserror::Error;

use crate::types::{Operator, Tile};

/// Why an equation has no integer value.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("result is not a whole number")]
    NonIntegral,
    #[error("arithmetic overflow")]
    Overflow,
}

pub type EvalResult<T> = Result<T, EvalError>;

/// Result of evaluating one equation.
///
/// `value` is what gets compared against the target; [`Evaluation::display`]
/// renders the same value for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Evaluation {
    pub value: EvalResult<i64>,
}

impl Evaluation {
    /// True when the equation has an integer value equal to `target`.
    pub fn matches(&self, target: i64) -> bool {
        self.value == Ok(target)
    }

    pub fn display(&self) -> EvaluationDisplay {
        EvaluationDisplay(self.value)
    }
}

/// Display adapter: the number, or `?` when the equation has no integer value.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationDisplay(EvalResult<i64>);

impl fmt::Display for EvaluationDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Ok(value) => write!(f, "{value}"),
            Err(_) => f.write_str("?"),
        }
    }
}

/// Evaluate tiles in the given order.
///
/// ```
/// use tui_target_core::evaluator::evaluate;
/// use tui_target_core::types::{Operator, Tile};
///
/// let tiles = [
///     Tile::new(Operator::Add, 1, 'A'),
///     Tile::new(Operator::Add, 2, 'I'),
///     Tile::new(Operator::Mul, 5, 'J'),
/// ];
/// let eval = evaluate(&tiles);
/// assert_eq!(eval.value, Ok(11));
/// assert!(eval.matches(11));
/// assert_eq!(eval.display().to_string(), "11");
/// ```
pub fn evaluate(tiles: &[Tile]) -> Evaluation {
    Evaluation {
        value: evaluate_exact(tiles).and_then(Fraction::into_integer),
    }
}

/// Human-readable form, e.g. `1 + 2 × 5` (first operator omitted).
pub fn expression(tiles: &[Tile]) -> String {
    let mut out = String::new();
    for (i, tile) in tiles.iter().enumerate() {
        if i == 0 {
            out.push_str(&tile.number.to_string());
        } else {
            out.push(' ');
            out.push(tile.operator.symbol());
            out.push(' ');
            out.push_str(&tile.number.to_string());
        }
    }
    out
}

fn evaluate_exact(tiles: &[Tile]) -> EvalResult<Fraction> {
    let Some((first, rest)) = tiles.split_first() else {
        return Ok(Fraction::ZERO);
    };

    // sum of finished terms, the sign joining the open term, and the open term
    let mut sum = Fraction::ZERO;
    let mut joiner = Operator::Add;
    let mut term = Fraction::from(first.number);

    for tile in rest {
        let n = Fraction::from(tile.number);
        match tile.operator {
            Operator::Mul => term = term.mul(n)?,
            Operator::Div => term = term.div(n)?,
            Operator::Add | Operator::Sub => {
                sum = join(sum, joiner, term)?;
                joiner = tile.operator;
                term = n;
            }
        }
    }

    join(sum, joiner, term)
}

fn join(sum: Fraction, joiner: Operator, term: Fraction) -> EvalResult<Fraction> {
    match joiner {
        Operator::Sub => sum.sub(term),
        _ => sum.add(term),
    }
}

/// Reduced fraction with a positive denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fraction {
    num: i64,
    den: i64,
}

impl Fraction {
    const ZERO: Fraction = Fraction { num: 0, den: 1 };

    fn new(num: i64, den: i64) -> EvalResult<Self> {
        if den == 0 {
            return Err(EvalError::DivisionByZero);
        }
        let g = gcd(num, den).max(1);
        let (mut num, mut den) = (num / g, den / g);
        if den < 0 {
            num = num.checked_neg().ok_or(EvalError::Overflow)?;
            den = den.checked_neg().ok_or(EvalError::Overflow)?;
        }
        Ok(Self { num, den })
    }

    fn add(self, rhs: Self) -> EvalResult<Self> {
        let num = checked(self.num.checked_mul(rhs.den))?
            .checked_add(checked(rhs.num.checked_mul(self.den))?)
            .ok_or(EvalError::Overflow)?;
        Self::new(num, checked(self.den.checked_mul(rhs.den))?)
    }

    fn sub(self, rhs: Self) -> EvalResult<Self> {
        let neg = Self {
            num: checked(rhs.num.checked_neg())?,
            den: rhs.den,
        };
        self.add(neg)
    }

    fn mul(self, rhs: Self) -> EvalResult<Self> {
        Self::new(
            checked(self.num.checked_mul(rhs.num))?,
            checked(self.den.checked_mul(rhs.den))?,
        )
    }

    fn div(self, rhs: Self) -> EvalResult<Self> {
        if rhs.num == 0 {
            return Err(EvalError::DivisionByZero);
        }
        Self::new(
            checked(self.num.checked_mul(rhs.den))?,
            checked(self.den.checked_mul(rhs.num))?,
        )
    }

    fn into_integer(self) -> EvalResult<i64> {
        if self.den == 1 {
            Ok(self.num)
        } else {
            Err(EvalError::NonIntegral)
        }
    }
}

impl From<i32> for Fraction {
    fn from(n: i32) -> Self {
        Self {
            num: n as i64,
            den: 1,
        }
    }
}

fn checked(v: Option<i64>) -> EvalResult<i64> {
    v.ok_or(EvalError::Overflow)
}

fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.unsigned_abs(), b.unsigned_abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.min(i64::MAX as u64) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(op: char, n: i32) -> Tile {
        Tile::new(Operator::from_char(op).unwrap(), n, '?')
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let eval = evaluate(&[t('+', 1), t('+', 2), t('×', 5)]);
        assert_eq!(eval.value, Ok(11));
        assert_eq!(eval.display().to_string(), "11");
    }

    #[test]
    fn first_operator_is_ignored() {
        assert_eq!(evaluate(&[t('-', 4), t('+', 3), t('+', 2)]).value, Ok(9));
        assert_eq!(evaluate(&[t('×', 4), t('+', 3), t('+', 2)]).value, Ok(9));
        assert_eq!(evaluate(&[t('÷', 4), t('+', 3), t('+', 2)]).value, Ok(9));
    }

    #[test]
    fn leading_product_then_sum() {
        assert_eq!(evaluate(&[t('+', 3), t('×', 4), t('−', 5)]).value, Ok(7));
        assert_eq!(evaluate(&[t('+', 3), t('−', 4), t('×', 5)]).value, Ok(-17));
    }

    #[test]
    fn left_to_right_within_same_precedence() {
        assert_eq!(evaluate(&[t('+', 9), t('-', 4), t('-', 3)]).value, Ok(2));
        assert_eq!(evaluate(&[t('+', 8), t('÷', 4), t('÷', 2)]).value, Ok(1));
    }

    #[test]
    fn intermediate_fractions_are_exact() {
        // 6 ÷ 4 × 2 = 3 only with exact arithmetic (floor would give 2)
        assert_eq!(evaluate(&[t('+', 6), t('÷', 4), t('×', 2)]).value, Ok(3));
        // 1 + 1 ÷ 2 + ... stays fractional
        assert_eq!(
            evaluate(&[t('+', 1), t('÷', 2), t('+', 1)]).value,
            Err(EvalError::NonIntegral)
        );
    }

    #[test]
    fn non_integral_result_is_rejected() {
        let eval = evaluate(&[t('+', 1), t('+', 3), t('÷', 2)]);
        assert_eq!(eval.value, Err(EvalError::NonIntegral));
        assert!(!eval.matches(2));
        assert_eq!(eval.display().to_string(), "?");
    }

    #[test]
    fn division_by_zero_is_rejected() {
        let eval = evaluate(&[t('+', 5), t('÷', 0), t('+', 1)]);
        assert_eq!(eval.value, Err(EvalError::DivisionByZero));
        assert!(!eval.matches(0));
    }

    #[test]
    fn overflow_is_reported() {
        let eval = evaluate(&[t('+', i32::MAX), t('×', i32::MAX), t('×', i32::MAX)]);
        assert_eq!(eval.value, Err(EvalError::Overflow));
    }

    #[test]
    fn expression_omits_first_operator() {
        assert_eq!(expression(&[t('×', 1), t('+', 2), t('×', 5)]), "1 + 2 × 5");
        assert_eq!(expression(&[]), "");
    }

    #[test]
    fn empty_and_single_tile() {
        assert_eq!(evaluate(&[]).value, Ok(0));
        assert_eq!(evaluate(&[t('−', 7)]).value, Ok(7));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn apply(a: i64, op: Operator, b: i64) -> i64 {
            match op {
                Operator::Add => a + b,
                Operator::Sub => a - b,
                Operator::Mul => a * b,
                Operator::Div => unreachable!("reference has no division"),
            }
        }

        /// Integer reference for `n0 op1 n1 op2 n2` without division.
        fn reference(n0: i64, op1: Operator, n1: i64, op2: Operator, n2: i64) -> i64 {
            match (op1 == Operator::Mul, op2 == Operator::Mul) {
                (true, true) => n0 * n1 * n2,
                (true, false) => apply(n0 * n1, op2, n2),
                (false, true) => apply(n0, op1, n1 * n2),
                (false, false) => apply(apply(n0, op1, n1), op2, n2),
            }
        }

        fn no_div() -> impl Strategy<Value = Operator> {
            prop::sample::select(vec![Operator::Add, Operator::Sub, Operator::Mul])
        }

        fn any_op() -> impl Strategy<Value = Operator> {
            prop::sample::select(Operator::ALL.to_vec())
        }

        proptest! {
            #[test]
            fn matches_integer_reference_without_division(
                op0 in any_op(),
                op1 in no_div(),
                op2 in no_div(),
                n in prop::array::uniform3(0i32..=99),
            ) {
                let tiles = [
                    Tile::new(op0, n[0], 'A'),
                    Tile::new(op1, n[1], 'B'),
                    Tile::new(op2, n[2], 'C'),
                ];
                let want = reference(n[0].into(), op1, n[1].into(), op2, n[2].into());
                prop_assert_eq!(evaluate(&tiles).value, Ok(want));
            }

            #[test]
            fn display_agrees_with_comparison_value(
                ops in prop::array::uniform3(any_op()),
                n in prop::array::uniform3(0i32..=9),
            ) {
                let tiles = [
                    Tile::new(ops[0], n[0], 'A'),
                    Tile::new(ops[1], n[1], 'B'),
                    Tile::new(ops[2], n[2], 'C'),
                ];
                let eval = evaluate(&tiles);
                let shown = eval.display().to_string();
                match eval.value {
                    Ok(v) => {
                        prop_assert_eq!(shown, v.to_string());
                        prop_assert!(eval.matches(v));
                    }
                    Err(_) => prop_assert_eq!(shown, "?"),
                }
            }
        }
    }
}
