//! Classifier and planner tests.
//!
//! Covers classification rules, unassigned-read detection (S001), call checks
//! (S002, S003) and the hoisting plan.

#[cfg(test)]
mod tests {
    use crate::error::{CompileError, ErrorCode};
    use crate::namespaces::NamespaceRegistry;
    use crate::syntax;
    use crate::analysis::{self, Analysis, Class, Seed};

    // ─── Helpers ─────────────────────────────────────────────────────────────

    fn analyze_with(src: &str, seeds: &[(&str, Seed)]) -> Result<Analysis, CompileError> {
        let program = syntax::parse(src).expect("parse failed");
        analysis::analyze(&program, &NamespaceRegistry::standard(), seeds.iter().copied())
    }

    fn ok(src: &str) -> Analysis {
        analyze_with(src, &[]).expect("expected analysis to succeed")
    }

    fn ok_with(src: &str, seeds: &[(&str, Seed)]) -> Analysis {
        analyze_with(src, seeds).expect("expected analysis to succeed")
    }

    fn err(src: &str) -> CompileError {
        match analyze_with(src, &[]) {
            Ok(_) => panic!("expected analysis to fail"),
            Err(e) => e,
        }
    }

    fn class(a: &Analysis, name: &str) -> Class {
        a.symbol_table.class_of(name).unwrap_or_else(|| panic!("no symbol `{name}`"))
    }

    // ─── Classification ──────────────────────────────────────────────────────

    #[test]
    fn positional_and_scalar_split() {
        let a = ok("x = x(); y = 2.0; pos1 = 1 + x; yadd1 = 1 + y;");
        assert_eq!(class(&a, "x"), Class::Positional);
        assert_eq!(class(&a, "pos1"), Class::Positional);
        assert_eq!(class(&a, "y"), Class::Scalar);
        assert_eq!(class(&a, "yadd1"), Class::Scalar);
    }

    #[test]
    fn literal_is_scalar() {
        let a = ok("a = 3;");
        assert_eq!(class(&a, "a"), Class::Scalar);
    }

    #[test]
    fn every_positional_function_is_positional() {
        let a = ok("a = x(); b = y(); c = row(); d = col();");
        for n in ["a", "b", "c", "d"] {
            assert_eq!(class(&a, n), Class::Positional, "{n}");
        }
    }

    #[test]
    fn info_functions_are_scalar() {
        let a = ok("w = width(); h = height(); area = w * h; ox = xmin() + ymin();");
        for n in ["w", "h", "area", "ox"] {
            assert_eq!(class(&a, n), Class::Scalar, "{n}");
        }
    }

    #[test]
    fn transitive_dependency_is_positional() {
        let a = ok("a = y(); b = a * 2; c = b + 1; d = sqrt(c);");
        for n in ["a", "b", "c", "d"] {
            assert_eq!(class(&a, n), Class::Positional, "{n}");
        }
    }

    #[test]
    fn math_of_scalars_is_scalar() {
        let a = ok("a = max(1, 2); b = sqrt(a); c = null();");
        assert_eq!(class(&a, "b"), Class::Scalar);
        assert_eq!(class(&a, "c"), Class::Scalar);
    }

    #[test]
    fn ternary_branch_makes_positional() {
        let a = ok("t = 1 > 0 ? x() : 0;");
        assert_eq!(class(&a, "t"), Class::Positional);
    }

    #[test]
    fn classification_is_never_demoted() {
        let a = ok("a = x(); a = 5;");
        assert_eq!(class(&a, "a"), Class::Positional);
    }

    #[test]
    fn later_positional_assignment_promotes() {
        let a = ok("a = 5; b = a; a = x();");
        assert_eq!(class(&a, "a"), Class::Positional);
        // `b` only saw the scalar value of `a`
        assert_eq!(class(&a, "b"), Class::Scalar);
    }

    #[test]
    fn raster_binding_is_buffer_bound_and_positional() {
        let a = ok_with("out = in1 * 2;", &[("in1", Seed::Raster), ("out", Seed::Raster)]);
        assert_eq!(class(&a, "in1"), Class::BufferBound);
        assert_eq!(class(&a, "out"), Class::BufferBound);
        let out = a.symbol_table.get("out").unwrap();
        let inp = a.symbol_table.get("in1").unwrap();
        assert!(out.is_output() && !out.is_input());
        assert!(inp.is_input() && !inp.is_output());
    }

    #[test]
    fn expression_over_raster_is_positional() {
        let a = ok_with("k = img + 1; out = k;", &[("img", Seed::Raster), ("out", Seed::Raster)]);
        assert_eq!(class(&a, "k"), Class::Positional);
    }

    #[test]
    fn constant_binding_is_scalar_and_needs_no_assignment() {
        let a = ok_with("k = gain * 2;", &[("gain", Seed::Constant)]);
        assert_eq!(class(&a, "gain"), Class::Scalar);
        assert_eq!(class(&a, "k"), Class::Scalar);
    }

    #[test]
    fn unused_binding_is_legal() {
        let a = ok_with("a = 1;", &[("unused", Seed::Raster)]);
        let sym = a.symbol_table.get("unused").unwrap();
        assert!(!sym.is_input() && !sym.is_output());
    }

    #[test]
    fn variable_and_function_namespaces_are_separate() {
        let a = ok("y = 1; x = x() + y;");
        assert_eq!(class(&a, "y"), Class::Scalar);
        assert_eq!(class(&a, "x"), Class::Positional);
    }

    // ─── S001: unassigned ────────────────────────────────────────────────────

    #[test]
    fn s001_reports_exactly_the_unassigned_name() {
        let e = err("a = 3; b = a + c; c = 2;");
        assert_eq!(e.unassigned_names(), &["c".to_string()]);
        assert!(e.has_code(ErrorCode::S001));
    }

    #[test]
    fn s001_collects_every_name_once() {
        let e = err("a = p + q; b = p * r; c = q;");
        assert_eq!(e.unassigned_names(), &["p".to_string(), "q".to_string(), "r".to_string()]);
        let s001 = e.diagnostics().iter().filter(|d| d.code == ErrorCode::S001).count();
        assert_eq!(s001, 3);
    }

    #[test]
    fn s001_self_reference_in_first_assignment() {
        let e = err("a = a + 1;");
        assert_eq!(e.unassigned_names(), &["a".to_string()]);
    }

    #[test]
    fn s001_inside_call_arguments() {
        let e = err("a = max(1, b);");
        assert_eq!(e.unassigned_names(), &["b".to_string()]);
    }

    #[test]
    fn s001_location_points_at_read() {
        let e = err("a = 1;\nb = a + zz;");
        let d = &e.diagnostics()[0];
        assert_eq!((d.line, d.column), (2, 9));
        assert!(d.message.contains("zz"));
    }

    #[test]
    fn s001_never_assigned_name_is_marked_unassigned() {
        let program = syntax::parse("a = ghost;").unwrap();
        let (table, _, names) = crate::analysis::classifier::Classifier::new(
            &NamespaceRegistry::standard(),
            std::iter::empty::<(&str, Seed)>(),
        ).classify(&program);
        assert_eq!(names, vec!["ghost".to_string()]);
        assert_eq!(table.class_of("ghost"), Some(Class::Unassigned));
    }

    #[test]
    fn s001_wins_over_semantic_errors() {
        let e = err("a = nope(b);");
        assert!(matches!(e, CompileError::Unassigned { .. }));
        assert!(e.has_code(ErrorCode::S002));
    }

    // ─── S002 / S003: calls ──────────────────────────────────────────────────

    #[test]
    fn s002_unknown_function() {
        let e = err("a = frobnicate(1);");
        assert!(matches!(e, CompileError::Semantic(_)));
        assert!(e.has_code(ErrorCode::S002));
    }

    #[test]
    fn s003_wrong_argument_count() {
        let e = err("a = x(1);");
        assert!(e.has_code(ErrorCode::S003));
        let e = err("a = max(1);");
        assert!(e.has_code(ErrorCode::S003));
    }

    // ─── Hoisting plan ───────────────────────────────────────────────────────

    #[test]
    fn scalar_statements_are_hoisted() {
        let a = ok_with("k = 2; out = img * k;", &[("img", Seed::Raster), ("out", Seed::Raster)]);
        assert_eq!(a.plan.hoisted, vec![true, false]);
    }

    #[test]
    fn positional_target_is_not_hoisted_even_with_scalar_value() {
        let a = ok("a = 1; a = x();");
        assert_eq!(a.plan.hoisted, vec![false, false]);
    }

    #[test]
    fn scalar_reading_a_varying_value_is_not_hoisted() {
        // `b` classifies Scalar, but the statement computing `a = 1` runs per
        // pixel because `a` ends up positional, so `b` must follow it
        let a = ok("a = 1; b = a + 1; c = b * 2; a = x();");
        assert_eq!(class(&a, "b"), Class::Scalar);
        assert_eq!(a.plan.hoisted, vec![false, false, false, false]);
    }

    #[test]
    fn scalar_reassignment_stays_hoisted() {
        let a = ok("s = 1; p = x() + s; s = 2;");
        assert_eq!(a.plan.hoisted, vec![true, false, true]);
    }

    #[test]
    fn constant_bindings_do_not_block_hoisting() {
        let a = ok_with("k = gain * 2;", &[("gain", Seed::Constant)]);
        assert_eq!(a.plan.hoisted, vec![true]);
    }
}
