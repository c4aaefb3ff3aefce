use std::collections::HashMap;
use crate::namespaces::Export;
use crate::syntax::ast::Span;

// ─── Symbol ───────────────────────────────────────────────────────────────────

/// Classification of a script variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    /// Same value for every pixel of a run.
    Scalar,
    /// Value may differ per pixel.
    Positional,
    /// Bound to a caller raster; per-pixel by nature.
    BufferBound,
    /// Read before any assignment or binding, and never assigned afterwards.
    Unassigned,
}

impl Class {
    pub fn is_positional(&self) -> bool {
        matches!(self, Class::Positional | Class::BufferBound)
    }

    /// Combine two expression classes: positional wins.
    pub fn join(self, other: Class) -> Class {
        if self.is_positional() || other.is_positional() { Class::Positional } else { Class::Scalar }
    }
}

/// How a name entered the table before the script was walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seed {
    /// Bound to a caller raster band.
    Raster,
    /// Bound to a caller-supplied constant.
    Constant,
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub class: Class,
    pub seed: Option<Seed>,
    /// Index into the per-run value slots.
    pub slot: usize,
    /// At least one statement assigns this name.
    pub assigned: bool,
    /// At least one expression reads this name.
    pub read: bool,
    /// First appearance in the script; `0:0` for names that only come from a binding.
    pub span: Span,
}

impl Symbol {
    /// Raster-bound and written by the script.
    pub fn is_output(&self) -> bool {
        self.seed == Some(Seed::Raster) && self.assigned
    }

    /// Raster-bound and read by the script.
    pub fn is_input(&self) -> bool {
        self.seed == Some(Seed::Raster) && self.read
    }

    /// Has a value at this point of the walk: bound, or assigned earlier.
    pub fn is_defined(&self) -> bool {
        self.seed.is_some() || self.class != Class::Unassigned
    }
}

// ─── SymbolTable ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    index: HashMap<String, usize>,
    /// Built-ins the script calls, resolved once at compile time.
    functions: HashMap<String, Export>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-classify a bound name. Raster bindings are positional, constants scalar.
    pub fn seed(&mut self, name: &str, seed: Seed) {
        let class = match seed {
            Seed::Raster   => Class::BufferBound,
            Seed::Constant => Class::Scalar,
        };
        let sym = self.entry(name, Span::new(0, 0));
        sym.class = class;
        sym.seed = Some(seed);
    }

    /// Record an assignment. Classification is monotonic: a name that is
    /// already positional stays positional.
    pub fn assign(&mut self, name: &str, class: Class, span: Span) {
        let sym = self.entry(name, span);
        sym.assigned = true;
        sym.class = match sym.class {
            Class::BufferBound => Class::BufferBound,
            Class::Positional  => Class::Positional,
            Class::Scalar | Class::Unassigned => class,
        };
    }

    /// Record a read. Returns `false` if the name has no value yet.
    pub fn read(&mut self, name: &str, span: Span) -> bool {
        let sym = self.entry(name, span);
        sym.read = true;
        sym.is_defined()
    }

    pub(crate) fn record_function(&mut self, export: Export) {
        self.functions.entry(export.name.to_string()).or_insert(export);
    }

    fn entry(&mut self, name: &str, span: Span) -> &mut Symbol {
        let idx = match self.index.get(name) {
            Some(&i) => i,
            None => {
                let slot = self.symbols.len();
                self.symbols.push(Symbol {
                    name: name.to_string(),
                    class: Class::Unassigned,
                    seed: None,
                    slot,
                    assigned: false,
                    read: false,
                    span,
                });
                self.index.insert(name.to_string(), slot);
                slot
            }
        };
        &mut self.symbols[idx]
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.index.get(name).map(|&i| &self.symbols[i])
    }

    pub fn class_of(&self, name: &str) -> Option<Class> {
        self.get(name).map(|s| s.class)
    }

    pub fn slot(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn function(&self, name: &str) -> Option<&Export> {
        self.functions.get(name)
    }

    /// Number of value slots a run needs.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// All symbols in slot order (bindings first, then order of appearance).
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_is_never_demoted() {
        let mut t = SymbolTable::new();
        t.assign("a", Class::Positional, Span::new(1, 1));
        t.assign("a", Class::Scalar, Span::new(2, 1));
        assert_eq!(t.class_of("a"), Some(Class::Positional));
    }

    #[test]
    fn scalar_is_promoted() {
        let mut t = SymbolTable::new();
        t.assign("a", Class::Scalar, Span::new(1, 1));
        t.assign("a", Class::Positional, Span::new(2, 1));
        assert_eq!(t.class_of("a"), Some(Class::Positional));
    }

    #[test]
    fn raster_seed_stays_buffer_bound() {
        let mut t = SymbolTable::new();
        t.seed("out", Seed::Raster);
        t.assign("out", Class::Scalar, Span::new(1, 1));
        let sym = t.get("out").unwrap();
        assert_eq!(sym.class, Class::BufferBound);
        assert!(sym.is_output());
        assert!(!sym.is_input());
    }

    #[test]
    fn read_before_assign_is_undefined() {
        let mut t = SymbolTable::new();
        assert!(!t.read("c", Span::new(1, 5)));
        assert_eq!(t.class_of("c"), Some(Class::Unassigned));
        t.assign("c", Class::Scalar, Span::new(2, 1));
        assert!(t.read("c", Span::new(3, 5)));
    }

    #[test]
    fn slots_follow_first_appearance() {
        let mut t = SymbolTable::new();
        t.seed("img", Seed::Raster);
        t.assign("b", Class::Scalar, Span::new(1, 1));
        t.assign("a", Class::Scalar, Span::new(2, 1));
        assert_eq!(t.slot("img"), Some(0));
        assert_eq!(t.slot("b"), Some(1));
        assert_eq!(t.slot("a"), Some(2));
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn join_prefers_positional() {
        assert_eq!(Class::Scalar.join(Class::Scalar), Class::Scalar);
        assert_eq!(Class::Scalar.join(Class::Positional), Class::Positional);
        assert_eq!(Class::BufferBound.join(Class::Scalar), Class::Positional);
    }
}
