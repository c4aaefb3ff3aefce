use crate::raster::Bounds;

// ─── Pixel context ────────────────────────────────────────────────────────────

/// What a built-in function can see while a script runs: the current pixel
/// and the processing domain. Copied into every call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelContext {
    pub x: i64,
    pub y: i64,
    pub bounds: Bounds,
}

impl PixelContext {
    /// Context used before the sweep starts (scalar pre-pass): parked on the
    /// domain origin.
    pub fn at_origin(bounds: Bounds) -> Self {
        Self { x: bounds.x, y: bounds.y, bounds }
    }
}

pub mod core;
pub mod coords;

// ─── Export ───────────────────────────────────────────────────────────────────

/// How a function call affects the classification of the expression around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    /// Value changes from pixel to pixel (`x()`, `row()`, …).
    Positional,
    /// Value is fixed for a whole run (`width()`, `height()`, …).
    Info,
    /// Pure function of its arguments; positional iff an argument is.
    Math,
    /// Like `Math`, but allowed to produce the no-value marker from valid
    /// arguments (`null()`).
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Export {
    pub name:  &'static str,
    pub arity: usize,
    pub kind:  FunctionKind,
}

// ─── Compile-time interface ───────────────────────────────────────────────────

/// What the classifier needs: names, arities and kinds only.
pub trait NamespaceInfo: Send + Sync {
    fn exports(&self) -> Vec<Export>;

    fn get_export(&self, name: &str) -> Option<Export> {
        self.exports().into_iter().find(|e| e.name == name)
    }
}

// ─── Runtime interface ────────────────────────────────────────────────────────

/// What the evaluator needs: call dispatch. Returns `None` when the name is
/// not one of this namespace's functions. Arity is checked at compile time.
pub trait NamespaceProvider: NamespaceInfo {
    fn call(&self, name: &str, args: &[f64], ctx: &PixelContext) -> Option<f64>;
}

// ─── Registry ─────────────────────────────────────────────────────────────────

pub struct NamespaceRegistry {
    providers: Vec<Box<dyn NamespaceProvider>>,
}

impl NamespaceRegistry {
    pub fn new() -> Self { Self { providers: Vec::new() } }

    pub fn register(&mut self, p: Box<dyn NamespaceProvider>) { self.providers.push(p); }

    /// Find a function by name across every namespace.
    pub fn lookup(&self, name: &str) -> Option<Export> {
        self.providers.iter().find_map(|p| p.get_export(name))
    }

    pub fn call_any(&self, name: &str, args: &[f64], ctx: &PixelContext) -> Option<f64> {
        self.providers.iter().find_map(|p| p.call(name, args, ctx))
    }

    pub fn standard() -> Self {
        let mut r = Self::new();
        r.register(Box::new(core::CoreNamespace));
        r.register(Box::new(coords::CoordsNamespace));
        r
    }
}

impl Default for NamespaceRegistry {
    fn default() -> Self { Self::standard() }
}

// ─── Shared helpers ───────────────────────────────────────────────────────────

/// Script truthiness: any non-zero value. Callers handle NaN first.
pub(crate) fn truthy(v: f64) -> bool {
    v != 0.0
}

pub(crate) fn from_bool(b: bool) -> f64 {
    if b { 1.0 } else { 0.0 }
}
