//! Pass 2: hoisting planner
//!
//! Decides which statements run once before the pixel sweep. A statement is
//! hoisted when its target ends up Scalar and its right-hand side cannot see
//! anything that differs between pixels. Non-hoisted statements make their
//! target "varying" for every statement after them, so a hoisted statement
//! never reads a value the pre-pass did not compute.

use std::collections::HashSet;

use crate::syntax::ast::{Expr, Program};
use crate::namespaces::FunctionKind;
use super::symbols::{Class, SymbolTable};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plan {
    /// One flag per statement, in program order.
    pub hoisted: Vec<bool>,
}

impl Plan {
    pub fn hoisted_count(&self) -> usize {
        self.hoisted.iter().filter(|h| **h).count()
    }
}

pub fn plan(program: &Program, table: &SymbolTable) -> Plan {
    let mut varying: HashSet<&str> = table.iter()
        .filter(|s| s.class.is_positional())
        .map(|s| s.name.as_str())
        .collect();

    let mut hoisted = Vec::with_capacity(program.stmts.len());
    for stmt in &program.stmts {
        let scalar_target = table.class_of(&stmt.target) == Some(Class::Scalar);
        let h = scalar_target && !depends_on(&stmt.value, &varying, table);
        if !h {
            varying.insert(stmt.target.as_str());
        }
        hoisted.push(h);
    }
    Plan { hoisted }
}

fn depends_on(expr: &Expr, varying: &HashSet<&str>, table: &SymbolTable) -> bool {
    match expr {
        Expr::Number(..) => false,
        Expr::Ident(name, _) => varying.contains(name.as_str()),
        Expr::BinOp { left, right, .. } => {
            depends_on(left, varying, table) || depends_on(right, varying, table)
        }
        Expr::UnOp { operand, .. } => depends_on(operand, varying, table),
        Expr::Ternary { condition, then_expr, else_expr, .. } => {
            depends_on(condition, varying, table)
                || depends_on(then_expr, varying, table)
                || depends_on(else_expr, varying, table)
        }
        Expr::Call { callee, args, .. } => {
            let positional = table.function(callee)
                .is_some_and(|e| e.kind == FunctionKind::Positional);
            positional || args.iter().any(|a| depends_on(a, varying, table))
        }
    }
}
