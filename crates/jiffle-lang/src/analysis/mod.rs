pub mod symbols;
pub mod classifier;
pub mod planner;

#[cfg(test)]
mod tests;

use crate::syntax::ast;
use crate::error::{CompileError, ErrorCode};
use crate::namespaces::NamespaceRegistry;
use classifier::Classifier;
pub use planner::Plan;
pub use symbols::{Class, Seed, Symbol, SymbolTable};

// ─── Result ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Analysis {
    pub symbol_table: SymbolTable,
    pub plan: Plan,
}

// ─── Entry point ─────────────────────────────────────────────────────────────

/// Full analysis pipeline:
/// 1. Classifier: symbol table, classes, unassigned reads, call checks
/// 2. Planner: which statements run once before the sweep
///
/// Any S001 makes the result `CompileError::Unassigned` (carrying every other
/// diagnostic too); other errors make it `CompileError::Semantic`.
pub fn analyze<'n>(
    program: &ast::Program,
    registry: &NamespaceRegistry,
    seeds: impl IntoIterator<Item = (&'n str, Seed)>,
) -> Result<Analysis, CompileError> {
    // ── Pass 1: classify ──────────────────────────────────────────────────────
    let (table, errors, unassigned) = Classifier::new(registry, seeds).classify(program);

    if errors.iter().any(|e| e.code == ErrorCode::S001) {
        return Err(CompileError::Unassigned { names: unassigned, diagnostics: errors });
    }
    if !errors.is_empty() {
        return Err(CompileError::Semantic(errors));
    }

    // ── Pass 2: hoisting plan ─────────────────────────────────────────────────
    let plan = planner::plan(program, &table);

    tracing::debug!(
        symbols = table.len(),
        positional = table.iter().filter(|s| s.class.is_positional()).count(),
        hoisted = plan.hoisted_count(),
        "classified script"
    );

    Ok(Analysis { symbol_table: table, plan })
}
