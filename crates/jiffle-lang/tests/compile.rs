//! Compile-stage tests through the public API.
//!
//! Covers syntax errors, unassigned variables, call checks and the
//! classification results exposed on a compiled script.

use jiffle_lang::{Binding, Bounds, Class, CompileError, ErrorCode, MemoryRaster, Script, compile};

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn no_bindings() -> Vec<(&'static str, Binding)> {
    Vec::new()
}

fn ok(src: &str) -> Script {
    compile(src, no_bindings()).unwrap_or_else(|e| panic!("compile failed: {e}"))
}

fn err(src: &str) -> CompileError {
    match compile(src, no_bindings()) {
        Ok(_) => panic!("expected compile to fail for: {src}"),
        Err(e) => e,
    }
}

fn class(s: &Script, name: &str) -> Class {
    s.symbols()
        .and_then(|t| t.class_of(name))
        .unwrap_or_else(|| panic!("no symbol `{name}`"))
}

// ─── Syntax ──────────────────────────────────────────────────────────────────

#[test]
fn empty_script_compiles() {
    let s = ok("");
    assert!(s.is_compiled());
    assert_eq!(s.ast().unwrap().stmts.len(), 0);
}

#[test]
fn comments_are_ignored() {
    let s = ok("// header\na = 1; /* block\ncomment */ b = a;");
    assert_eq!(s.ast().unwrap().stmts.len(), 2);
}

#[test]
fn missing_semicolon_is_syntax_error() {
    let e = err("a = 1");
    assert!(matches!(e, CompileError::Syntax(_)));
}

#[test]
fn unknown_character_is_lexer_error() {
    let e = err("a = 1 # 2;");
    assert!(e.has_code(ErrorCode::L001));
}

#[test]
fn malformed_exponent_is_lexer_error() {
    let e = err("a = 1e;");
    assert!(e.has_code(ErrorCode::L002));
}

#[test]
fn every_syntax_error_is_reported() {
    let e = err("a = ;\nb = 1 +;\nc = 2;");
    let lines: Vec<usize> = e.diagnostics().iter().map(|d| d.line).collect();
    assert_eq!(lines, vec![1, 2]);
}

#[test]
fn syntax_error_display_has_code_and_location() {
    let e = err("a = ;");
    let msg = e.to_string();
    assert!(msg.starts_with("syntax error: [P"), "{msg}");
    assert!(msg.contains("1:5"), "{msg}");
}

#[test]
fn deeply_nested_expression_is_syntax_error() {
    let src = format!("a = {}1{};", "(".repeat(2000), ")".repeat(2000));
    let e = err(&src);
    assert!(matches!(e, CompileError::Syntax(_)));
    assert!(e.has_code(ErrorCode::P003));
}

#[test]
fn long_flat_sum_is_syntax_error() {
    let src = format!("a = x(){};", " + x()".repeat(10_000));
    assert!(err(&src).has_code(ErrorCode::P003));
}

#[test]
fn trailing_comma_in_arguments_fails() {
    let e = err("a = sqrt(4,);");
    assert!(matches!(e, CompileError::Syntax(_)));
    assert!(e.has_code(ErrorCode::P001));
}

// ─── Unassigned variables ────────────────────────────────────────────────────

#[test]
fn read_before_assignment_fails() {
    let e = err("a = 3; b = a + c; c = 2;");
    assert_eq!(e.unassigned_names(), &["c".to_string()]);
    assert_eq!(e.to_string(), "variables used before assignment: c");
}

#[test]
fn failed_script_is_not_compiled() {
    let mut s = Script::new("a = 3; b = a + c; c = 2;", no_bindings());
    assert!(s.compile().is_err());
    assert!(!s.is_compiled());
}

#[test]
fn binding_makes_name_available() {
    let s = compile("b = c * 2;", [("c", Binding::scalar(4.0))]).unwrap();
    assert!(s.is_compiled());
    assert_eq!(class(&s, "c"), Class::Scalar);
}

// ─── Calls ───────────────────────────────────────────────────────────────────

#[test]
fn unknown_function_fails() {
    let e = err("a = wibble(1);");
    assert!(e.has_code(ErrorCode::S002));
}

#[test]
fn wrong_arity_fails() {
    let e = err("a = clamp(1, 2);");
    assert!(e.has_code(ErrorCode::S003));
}

// ─── Classification ──────────────────────────────────────────────────────────

#[test]
fn classification_example() {
    let s = ok("x = x(); y = 2.0; pos1 = 1 + x; yadd1 = 1 + y;");
    assert_eq!(class(&s, "x"), Class::Positional);
    assert_eq!(class(&s, "pos1"), Class::Positional);
    assert_eq!(class(&s, "y"), Class::Scalar);
    assert_eq!(class(&s, "yadd1"), Class::Scalar);
}

#[test]
fn raster_bindings_are_buffer_bound() {
    let img = MemoryRaster::filled(Bounds::new(0, 0, 4, 4), 0.0).shared();
    let out = MemoryRaster::filled(Bounds::new(0, 0, 4, 4), 0.0).shared();
    let s = compile(
        "out = img + 1;",
        [("img", Binding::raster(&img)), ("out", Binding::raster(&out))],
    ).unwrap();
    assert_eq!(class(&s, "img"), Class::BufferBound);
    assert_eq!(class(&s, "out"), Class::BufferBound);
    assert!(s.symbols().unwrap().get("out").unwrap().is_output());
    assert!(s.symbols().unwrap().get("img").unwrap().is_input());
}

#[test]
fn compile_twice_is_noop() {
    let mut s = Script::new("a = x();", no_bindings());
    s.compile().unwrap();
    let before = s.plan().cloned();
    s.compile().unwrap();
    assert_eq!(s.plan().cloned(), before);
}
