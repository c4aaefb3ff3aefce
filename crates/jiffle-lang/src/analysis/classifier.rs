//! Pass 1: variable classifier
//!
//! Walks the statements once in program order and populates the symbol table:
//! - Seeds bound names (rasters positional, constants scalar)
//! - Classifies each right-hand side bottom-up, then records the target
//! - Flags every variable read before it has a value (S001)
//! - Resolves built-in calls, flagging unknown names (S002) and bad arity (S003)

use crate::syntax::ast::*;
use crate::error::{Error, ErrorCode};
use crate::namespaces::{FunctionKind, NamespaceRegistry};
use super::symbols::{Class, Seed, SymbolTable};

pub struct Classifier<'a> {
    registry: &'a NamespaceRegistry,
    pub table: SymbolTable,
    pub errors: Vec<Error>,
    /// Names already reported as unassigned, in order of first use.
    pub unassigned: Vec<String>,
}

impl<'a> Classifier<'a> {
    pub fn new<'n>(registry: &'a NamespaceRegistry, seeds: impl IntoIterator<Item = (&'n str, Seed)>) -> Self {
        let mut table = SymbolTable::new();
        for (name, seed) in seeds {
            table.seed(name, seed);
        }
        Self { registry, table, errors: Vec::new(), unassigned: Vec::new() }
    }

    pub fn classify(mut self, program: &Program) -> (SymbolTable, Vec<Error>, Vec<String>) {
        for stmt in &program.stmts {
            let class = self.classify_expr(&stmt.value);
            self.table.assign(&stmt.target, class, stmt.span);
        }
        (self.table, self.errors, self.unassigned)
    }

    // ── Expressions ───────────────────────────────────────────────────────────

    /// Returns `Scalar` or `Positional` for the value of `expr`.
    fn classify_expr(&mut self, expr: &Expr) -> Class {
        match expr {
            Expr::Number(..) => Class::Scalar,

            Expr::Ident(name, span) => {
                if !self.table.read(name, *span) {
                    self.report_unassigned(name, *span);
                    return Class::Scalar;
                }
                match self.table.class_of(name) {
                    Some(c) if c.is_positional() => Class::Positional,
                    _ => Class::Scalar,
                }
            }

            Expr::BinOp { left, right, .. } => {
                let l = self.classify_expr(left);
                let r = self.classify_expr(right);
                l.join(r)
            }

            Expr::UnOp { operand, .. } => self.classify_expr(operand),

            Expr::Ternary { condition, then_expr, else_expr, .. } => {
                let c = self.classify_expr(condition);
                let t = self.classify_expr(then_expr);
                let e = self.classify_expr(else_expr);
                c.join(t).join(e)
            }

            Expr::Call { callee, args, span } => self.classify_call(callee, args, *span),
        }
    }

    fn classify_call(&mut self, callee: &str, args: &[Expr], span: Span) -> Class {
        // Arguments are classified even when the call itself is bad, so that
        // unassigned reads inside them are still reported.
        let arg_class = args.iter()
            .map(|a| self.classify_expr(a))
            .fold(Class::Scalar, Class::join);

        let Some(export) = self.registry.lookup(callee) else {
            self.errors.push(Error::new(
                ErrorCode::S002,
                span.line, span.column,
                format!("unknown function `{callee}`"),
            ));
            return arg_class;
        };

        if export.arity != args.len() {
            self.errors.push(Error::new(
                ErrorCode::S003,
                span.line, span.column,
                format!("`{callee}` expects {} argument(s), got {}", export.arity, args.len()),
            ));
        }

        let class = match export.kind {
            FunctionKind::Positional => Class::Positional,
            FunctionKind::Info       => Class::Scalar,
            FunctionKind::Math | FunctionKind::Null => arg_class,
        };
        self.table.record_function(export);
        class
    }

    fn report_unassigned(&mut self, name: &str, span: Span) {
        if self.unassigned.iter().any(|n| n == name) {
            return;
        }
        self.unassigned.push(name.to_string());
        self.errors.push(Error::new(
            ErrorCode::S001,
            span.line, span.column,
            format!("`{name}` is read before it is assigned"),
        ));
    }
}
