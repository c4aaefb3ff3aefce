//! Always-available math built-ins plus the explicit no-value helpers.

use super::{Export, FunctionKind, NamespaceInfo, NamespaceProvider, PixelContext, from_bool, truthy};

fn f(name: &'static str, arity: usize) -> Export {
    Export { name, arity, kind: FunctionKind::Math }
}

pub struct CoreNamespace;

impl NamespaceInfo for CoreNamespace {
    fn exports(&self) -> Vec<Export> {
        vec![
            f("sqrt", 1), f("abs", 1), f("exp", 1), f("log", 1), f("log10", 1),
            f("sin", 1), f("cos", 1), f("tan", 1),
            f("asin", 1), f("acos", 1), f("atan", 1),
            f("floor", 1), f("ceil", 1), f("round", 1), f("sign", 1),
            f("atan2", 2), f("pow", 2), f("min", 2), f("max", 2), f("hypot", 2),
            f("clamp", 3),
            f("isnull", 1),
            f("con", 3),
            Export { name: "null", arity: 0, kind: FunctionKind::Null },
        ]
    }
}

impl NamespaceProvider for CoreNamespace {
    fn call(&self, name: &str, args: &[f64], _ctx: &PixelContext) -> Option<f64> {
        let a = |i: usize| args.get(i).copied().unwrap_or(f64::NAN);
        let v = match name {
            "sqrt"   => a(0).sqrt(),
            "abs"    => a(0).abs(),
            "exp"    => a(0).exp(),
            "log"    => a(0).ln(),
            "log10"  => a(0).log10(),
            "sin"    => a(0).sin(),
            "cos"    => a(0).cos(),
            "tan"    => a(0).tan(),
            "asin"   => a(0).asin(),
            "acos"   => a(0).acos(),
            "atan"   => a(0).atan(),
            "floor"  => a(0).floor(),
            "ceil"   => a(0).ceil(),
            "round"  => a(0).round(),
            // f64::signum maps 0.0 to 1.0
            "sign"   => if a(0).is_nan() { f64::NAN } else if a(0) == 0.0 { 0.0 } else { a(0).signum() },
            "atan2"  => a(0).atan2(a(1)),
            "pow"    => a(0).powf(a(1)),
            "hypot"  => a(0).hypot(a(1)),
            // f64::min/max drop a NaN operand; the no-value marker must win
            "min"    => if a(0).is_nan() || a(1).is_nan() { f64::NAN } else { a(0).min(a(1)) },
            "max"    => if a(0).is_nan() || a(1).is_nan() { f64::NAN } else { a(0).max(a(1)) },
            "clamp"  => {
                let (v, lo, hi) = (a(0), a(1), a(2));
                if v.is_nan() || lo.is_nan() || hi.is_nan() { f64::NAN }
                else if v < lo { lo }
                else if v > hi { hi }
                else { v }
            }
            "isnull" => from_bool(a(0).is_nan()),
            "con"    => {
                let c = a(0);
                if c.is_nan() { f64::NAN } else if truthy(c) { a(1) } else { a(2) }
            }
            "null"   => f64::NAN,
            _ => return None,
        };
        Some(v)
    }
}
