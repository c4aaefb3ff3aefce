pub mod syntax;
pub mod analysis;
pub mod runtime;
pub mod error;
pub mod namespaces;
pub mod raster;
pub mod script;

pub use error::{CompileError, Error, ErrorCode, JobFailure, RuntimeError};
pub use syntax::token::{Token, TokenKind};
pub use analysis::{Class, Symbol, SymbolTable};
pub use raster::{Bounds, MemoryRaster, Raster, RasterHandle};
pub use script::{Binding, Script};
pub use runtime::{
    Event, Interpreter, InterpreterConfig, JobId, JobState, JobStatus, ListenerId, RunOptions, Runner,
};

// ─── Public API ───────────────────────────────────────────────────────────────

/// Parse and classify `source` against `bindings`. Returns a compiled script
/// ready for [`run`] or [`Interpreter::submit`].
pub fn compile<K: Into<String>>(
    source: &str,
    bindings: impl IntoIterator<Item = (K, Binding)>,
) -> Result<Script, CompileError> {
    let mut script = Script::new(source, bindings);
    script.compile()?;
    Ok(script)
}

/// Run a compiled script once over its domain with default options.
pub fn run(script: &Script) -> Result<(), RuntimeError> {
    Runner::default().run(script)
}
