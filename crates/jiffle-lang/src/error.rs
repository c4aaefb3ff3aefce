/// Error codes prefixed by phase: L = lexer, P = parser, S = semantic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Lexer
    L001, // unexpected character
    L002, // malformed number literal

    // Parser
    P001, // unexpected token
    P002, // missing expected token
    P003, // expression nested too deeply

    // Semantic / classifier
    S001, // variable read before assignment or binding
    S002, // unknown function
    S003, // wrong argument count
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::L001 => "L001",
            Self::L002 => "L002",
            Self::P001 => "P001",
            Self::P002 => "P002",
            Self::P003 => "P003",
            Self::S001 => "S001",
            Self::S002 => "S002",
            Self::S003 => "S003",
        }
    }
}

/// One located diagnostic produced while compiling a script.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("[{}] {line}:{column}: {message}", .code.as_str())]
pub struct Error {
    pub code: ErrorCode,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl Error {
    pub fn new(code: ErrorCode, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self { code, line, column, message: message.into() }
    }
}

fn join(errors: &[Error]) -> String {
    errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; ")
}

// ─── Compilation ──────────────────────────────────────────────────────────────

/// Why a script failed to compile. A failed script stays non-compiled.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    /// The source does not match the grammar (lexer or parser stage).
    #[error("syntax error: {}", join(.0))]
    Syntax(Vec<Error>),

    /// Variables read before any assignment or binding. `names` lists every
    /// offender once, in order of first use.
    #[error("variables used before assignment: {}", .names.join(", "))]
    Unassigned { names: Vec<String>, diagnostics: Vec<Error> },

    /// Unknown functions or wrong argument counts.
    #[error("semantic error: {}", join(.0))]
    Semantic(Vec<Error>),
}

impl CompileError {
    pub fn diagnostics(&self) -> &[Error] {
        match self {
            Self::Syntax(errs) | Self::Semantic(errs) => errs,
            Self::Unassigned { diagnostics, .. } => diagnostics,
        }
    }

    pub fn unassigned_names(&self) -> &[String] {
        match self {
            Self::Unassigned { names, .. } => names,
            _ => &[],
        }
    }

    pub fn has_code(&self, code: ErrorCode) -> bool {
        self.diagnostics().iter().any(|e| e.code == code)
    }
}

// ─── Execution ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuntimeError {
    #[error("script is not compiled")]
    NotCompiled,

    /// A raster binding is unusable: poisoned lock, band out of range,
    /// disagreeing bounds, or no raster at all.
    #[error("[binding] {0}")]
    Binding(String),

    /// Division by zero, an infinite result, or an undefined result at a pixel.
    #[error("[runtime] {line}:{column} at pixel ({x}, {y}): {message}")]
    Arithmetic {
        line: usize,
        column: usize,
        x: i64,
        y: i64,
        message: String,
    },
}

impl RuntimeError {
    pub fn binding(msg: impl Into<String>) -> Self {
        Self::Binding(msg.into())
    }
}

/// Cause carried by a `Failed` job event.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JobFailure {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("job panicked: {0}")]
    Panicked(String),

    /// Submitted after the worker pool shut down.
    #[error("worker pool is not running")]
    Unavailable,
}
