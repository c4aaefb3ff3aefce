//! Expression evaluation over a flat slot environment.
//! Built-in calls go through the NamespaceRegistry; operators through `ops`.

use crate::analysis::SymbolTable;
use crate::error::RuntimeError;
use crate::namespaces::{FunctionKind, NamespaceRegistry, PixelContext, truthy};
use crate::syntax::ast::{Expr, Span};
use super::ops;

pub struct Evaluator<'a> {
    table: &'a SymbolTable,
    registry: &'a NamespaceRegistry,
}

impl<'a> Evaluator<'a> {
    pub fn new(table: &'a SymbolTable, registry: &'a NamespaceRegistry) -> Self {
        Self { table, registry }
    }

    /// Evaluate `expr` at the pixel in `ctx`. `env` holds one value per symbol slot.
    pub fn eval(&self, expr: &Expr, env: &[f64], ctx: &PixelContext) -> Result<f64, RuntimeError> {
        match expr {
            Expr::Number(n, _) => Ok(*n),

            Expr::Ident(name, span) => self.table.slot(name)
                .and_then(|s| env.get(s).copied())
                .ok_or_else(|| err(*span, ctx, format!("unresolved variable `{name}`"))),

            Expr::BinOp { left, op, right, span } => {
                let l = self.eval(left, env, ctx)?;
                let r = self.eval(right, env, ctx)?;
                ops::binary(*op, l, r).map_err(|m| err(*span, ctx, m))
            }

            Expr::UnOp { op, operand, .. } => {
                let v = self.eval(operand, env, ctx)?;
                Ok(ops::unary(*op, v))
            }

            Expr::Ternary { condition, then_expr, else_expr, .. } => {
                self.select(condition, then_expr, else_expr, env, ctx)
            }

            Expr::Call { callee, args, span } => self.call(callee, args, *span, env, ctx),
        }
    }

    /// Only the chosen branch is evaluated; a no-value condition yields no-value.
    fn select(&self, cond: &Expr, a: &Expr, b: &Expr, env: &[f64], ctx: &PixelContext) -> Result<f64, RuntimeError> {
        let c = self.eval(cond, env, ctx)?;
        if c.is_nan() {
            Ok(f64::NAN)
        } else if truthy(c) {
            self.eval(a, env, ctx)
        } else {
            self.eval(b, env, ctx)
        }
    }

    fn call(&self, callee: &str, args: &[Expr], span: Span, env: &[f64], ctx: &PixelContext) -> Result<f64, RuntimeError> {
        // `con` is the function form of `?:` and shares its laziness
        if callee == "con" && args.len() == 3 {
            return self.select(&args[0], &args[1], &args[2], env, ctx);
        }

        let values = args.iter()
            .map(|a| self.eval(a, env, ctx))
            .collect::<Result<Vec<_>, _>>()?;

        let v = self.registry.call_any(callee, &values, ctx)
            .ok_or_else(|| err(span, ctx, format!("unknown function `{callee}`")))?;

        if v.is_nan() {
            let may_be_null = values.iter().any(|a| a.is_nan())
                || self.table.function(callee).is_some_and(|e| e.kind == FunctionKind::Null);
            if may_be_null {
                return Ok(v);
            }
        }
        ops::checked(v, callee).map_err(|m| err(span, ctx, m))
    }
}

fn err(span: Span, ctx: &PixelContext, message: String) -> RuntimeError {
    RuntimeError::Arithmetic { line: span.line, column: span.column, x: ctx.x, y: ctx.y, message }
}
