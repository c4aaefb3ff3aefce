//! A Jiffle script: source text, the caller's variable bindings and, once
//! compiled, the parsed program with its classification results.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::analysis::{self, Analysis, Plan, Seed, SymbolTable};
use crate::error::CompileError;
use crate::namespaces::NamespaceRegistry;
use crate::raster::{Raster, RasterHandle};
use crate::syntax::{self, ast::Program};

// ─── Bindings ─────────────────────────────────────────────────────────────────

/// What a script variable is attached to before compilation.
#[derive(Clone)]
pub enum Binding {
    /// One band of a caller-owned raster; read per pixel, written if assigned.
    Raster { raster: RasterHandle, band: usize },
    /// A constant the script may read without assigning it.
    Scalar(f64),
}

impl Binding {
    /// Band 0 of `raster`.
    pub fn raster<R: Raster + Send + 'static>(raster: &Arc<Mutex<R>>) -> Self {
        Self::band(raster, 0)
    }

    pub fn band<R: Raster + Send + 'static>(raster: &Arc<Mutex<R>>, band: usize) -> Self {
        let handle: RasterHandle = raster.clone();
        Self::Raster { raster: handle, band }
    }

    pub fn scalar(value: f64) -> Self {
        Self::Scalar(value)
    }

    fn seed(&self) -> Seed {
        match self {
            Self::Raster { .. } => Seed::Raster,
            Self::Scalar(_)     => Seed::Constant,
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raster { band, .. } => f.debug_struct("Raster").field("band", band).finish_non_exhaustive(),
            Self::Scalar(v) => f.debug_tuple("Scalar").field(v).finish(),
        }
    }
}

// ─── Script ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub(crate) struct Compiled {
    pub(crate) ast: Arc<Program>,
    pub(crate) analysis: Analysis,
}

pub struct Script {
    source: String,
    bindings: BTreeMap<String, Binding>,
    pub(crate) registry: NamespaceRegistry,
    pub(crate) compiled: Option<Compiled>,
}

impl Script {
    /// A script that has not been compiled yet.
    pub fn new<K: Into<String>>(source: impl Into<String>, bindings: impl IntoIterator<Item = (K, Binding)>) -> Self {
        Self {
            source: source.into(),
            bindings: bindings.into_iter().map(|(k, b)| (k.into(), b)).collect(),
            registry: NamespaceRegistry::standard(),
            compiled: None,
        }
    }

    /// Parse and classify. A no-op on an already compiled script; on failure
    /// the script stays non-compiled.
    pub fn compile(&mut self) -> Result<(), CompileError> {
        if self.compiled.is_some() {
            return Ok(());
        }

        let ast = syntax::parse(&self.source).map_err(CompileError::Syntax)?;
        let seeds = self.bindings.iter().map(|(name, b)| (name.as_str(), b.seed()));
        let analysis = analysis::analyze(&ast, &self.registry, seeds)?;

        tracing::debug!(
            statements = ast.stmts.len(),
            bindings = self.bindings.len(),
            "compiled script"
        );
        self.compiled = Some(Compiled { ast: Arc::new(ast), analysis });
        Ok(())
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled.is_some()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn bindings(&self) -> &BTreeMap<String, Binding> {
        &self.bindings
    }

    pub fn binding(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    /// Classification results; `None` until compiled.
    pub fn symbols(&self) -> Option<&SymbolTable> {
        self.compiled.as_ref().map(|c| &c.analysis.symbol_table)
    }

    pub fn ast(&self) -> Option<&Program> {
        self.compiled.as_ref().map(|c| c.ast.as_ref())
    }

    pub fn plan(&self) -> Option<&Plan> {
        self.compiled.as_ref().map(|c| &c.analysis.plan)
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Script")
            .field("source", &self.source)
            .field("bindings", &self.bindings)
            .field("compiled", &self.is_compiled())
            .finish()
    }
}
