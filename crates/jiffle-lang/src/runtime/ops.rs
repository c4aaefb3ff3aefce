//! Numeric semantics of the script operators.
//!
//! Every operator propagates the no-value marker (NaN). Anything else that
//! comes out non-finite is an error the evaluator reports with a location.

use crate::namespaces::{from_bool, truthy};
use crate::syntax::ast::{BinOp, UnOp};

pub fn binary(op: BinOp, l: f64, r: f64) -> Result<f64, String> {
    if l.is_nan() || r.is_nan() {
        return Ok(f64::NAN);
    }

    let v = match op {
        BinOp::Add => l + r,
        BinOp::Sub => l - r,
        BinOp::Mul => l * r,
        BinOp::Div => {
            if r == 0.0 { return Err("division by zero".into()); }
            l / r
        }
        BinOp::Mod => {
            if r == 0.0 { return Err("modulo by zero".into()); }
            l % r
        }
        BinOp::Pow   => l.powf(r),
        BinOp::Eq    => from_bool(l == r),
        BinOp::NotEq => from_bool(l != r),
        BinOp::Lt    => from_bool(l < r),
        BinOp::LtEq  => from_bool(l <= r),
        BinOp::Gt    => from_bool(l > r),
        BinOp::GtEq  => from_bool(l >= r),
        BinOp::And   => from_bool(truthy(l) && truthy(r)),
        BinOp::Or    => from_bool(truthy(l) || truthy(r)),
    };
    checked(v, op.symbol())
}

pub fn unary(op: UnOp, v: f64) -> f64 {
    if v.is_nan() {
        return f64::NAN;
    }
    match op {
        UnOp::Neg  => -v,
        UnOp::Plus => v,
        UnOp::Not  => from_bool(!truthy(v)),
    }
}

/// Reject a result that is infinite, or NaN where no operand was.
pub fn checked(v: f64, what: &str) -> Result<f64, String> {
    if v.is_infinite() {
        Err(format!("`{what}` produced an infinite result"))
    } else if v.is_nan() {
        Err(format!("`{what}` produced an undefined result"))
    } else {
        Ok(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bin(op: BinOp, l: f64, r: f64) -> f64 {
        binary(op, l, r).expect("operator failed")
    }

    #[test]
    fn arithmetic() {
        assert_eq!(bin(BinOp::Add, 1.0, 2.0), 3.0);
        assert_eq!(bin(BinOp::Sub, 1.0, 2.0), -1.0);
        assert_eq!(bin(BinOp::Mul, 3.0, 2.0), 6.0);
        assert_eq!(bin(BinOp::Div, 3.0, 2.0), 1.5);
        assert_eq!(bin(BinOp::Pow, 0.5, 3.0), 0.125);
    }

    #[test]
    fn remainder_follows_dividend_sign() {
        assert_eq!(bin(BinOp::Mod, 7.0, 3.0), 1.0);
        assert_eq!(bin(BinOp::Mod, -7.0, 3.0), -1.0);
    }

    #[test]
    fn comparisons_yield_one_or_zero() {
        assert_eq!(bin(BinOp::Lt, 1.0, 2.0), 1.0);
        assert_eq!(bin(BinOp::GtEq, 1.0, 2.0), 0.0);
        assert_eq!(bin(BinOp::Eq, 2.0, 2.0), 1.0);
        assert_eq!(bin(BinOp::NotEq, 2.0, 2.0), 0.0);
    }

    #[test]
    fn logic_uses_non_zero_truth() {
        assert_eq!(bin(BinOp::And, 5.0, -1.0), 1.0);
        assert_eq!(bin(BinOp::And, 5.0, 0.0), 0.0);
        assert_eq!(bin(BinOp::Or, 0.0, 0.0), 0.0);
        assert_eq!(bin(BinOp::Or, 0.0, 0.1), 1.0);
    }

    #[test]
    fn null_propagates_through_every_operator() {
        for op in [
            BinOp::Add, BinOp::Sub, BinOp::Mul, BinOp::Div, BinOp::Mod, BinOp::Pow,
            BinOp::Eq, BinOp::NotEq, BinOp::Lt, BinOp::LtEq, BinOp::Gt, BinOp::GtEq,
            BinOp::And, BinOp::Or,
        ] {
            assert!(bin(op, f64::NAN, 1.0).is_nan(), "{}", op.symbol());
            assert!(bin(op, 1.0, f64::NAN).is_nan(), "{}", op.symbol());
        }
        assert!(unary(UnOp::Neg, f64::NAN).is_nan());
        assert!(unary(UnOp::Not, f64::NAN).is_nan());
    }

    #[test]
    fn null_divided_by_zero_is_null() {
        assert!(bin(BinOp::Div, f64::NAN, 0.0).is_nan());
    }

    #[test]
    fn division_by_zero_fails() {
        assert!(binary(BinOp::Div, 1.0, 0.0).unwrap_err().contains("division by zero"));
        assert!(binary(BinOp::Mod, 1.0, 0.0).unwrap_err().contains("modulo by zero"));
    }

    #[test]
    fn overflow_and_undefined_results_fail() {
        assert!(binary(BinOp::Mul, 1e308, 10.0).unwrap_err().contains("infinite"));
        assert!(binary(BinOp::Pow, -8.0, 1.0 / 3.0).unwrap_err().contains("undefined"));
    }

    #[test]
    fn unary_ops() {
        assert_eq!(unary(UnOp::Neg, 2.0), -2.0);
        assert_eq!(unary(UnOp::Plus, 2.0), 2.0);
        assert_eq!(unary(UnOp::Not, 0.0), 1.0);
        assert_eq!(unary(UnOp::Not, 3.0), 0.0);
    }
}
