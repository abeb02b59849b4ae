//! spl-gen — lowers a type-checked AST to numbered BASIC in two passes.
//!
//! [`ir::generate`] walks `main`'s algorithm, inlining every procedure and
//! function call at its call site, and produces a flat [`ir::Line`] listing
//! addressed by symbolic `REM` labels rather than line numbers.
//! [`emit::emit_basic`] then numbers that listing and resolves every label —
//! "pick the shape" is kept separate from "pick the addresses", two stages
//! in all since BASIC has no register allocation or instruction selection
//! to speak of.
//!
//! Both stages report failures through the single fatal [`EmitError`] band:
//! unlike scope/type checking, a problem here means codegen was handed an
//! AST shape the earlier passes should already have rejected.

pub mod emit;
pub mod error;
pub mod ir;

pub use emit::emit_basic;
pub use error::EmitError;
pub use ir::{generate, render_intermediate, Line};

#[cfg(test)]
mod pipeline_tests {
    use super::*;
    use spl_lex::Lexer;
    use spl_par::{assign_ids, Parser};
    use spl_sem::{check_scopes, check_types};
    use spl_util::{Handler, Interner};

    fn compile_to_basic(src: &str) -> String {
        let mut interner = Interner::new();
        let tokens = Lexer::tokenize(src, &mut interner).unwrap();
        let mut program = Parser::parse_program(&tokens, &interner).unwrap();
        assign_ids(&mut program);
        let mut handler = Handler::new();
        let resolution = check_scopes(&program, &interner, &mut handler);
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());
        let mut type_handler = Handler::new();
        let _ = check_types(&program, &resolution, &interner, &mut type_handler);
        assert!(!type_handler.has_errors(), "{:?}", type_handler.diagnostics());
        let lines = generate(&program, &interner).unwrap();
        emit_basic(&lines).unwrap()
    }

    #[test]
    fn minimal_program_emits_a_single_stop() {
        let src = "glob { } proc { } func { } main { var { } halt }";
        assert_eq!(compile_to_basic(src), "10 STOP");
    }

    #[test]
    fn simple_assignment_then_halt() {
        let src = "glob { } proc { } func { } main { var { x } x = 3 ; halt }";
        assert_eq!(compile_to_basic(src), "10 x = 3\n20 STOP");
    }

    #[test]
    fn while_loop_lowers_to_three_resolved_jump_targets() {
        let src = "glob { } proc { } func { } main { var { i } i = 3; while ( i > 0 ) { print i ; i = ( i minus 1 ) } halt }";
        let out = compile_to_basic(src);
        let lines: Vec<&str> = out.lines().collect();
        // i = 3, then the while's IF/GOTO/body/GOTO-back, then STOP.
        assert_eq!(lines[0], "10 i = 3");
        assert!(lines[1].starts_with("20 IF i > 0 THEN "));
        assert!(lines[2].starts_with("30 GOTO "));
        assert_eq!(lines[3], "40 PRINT i");
        assert_eq!(lines[4], "50 i = (i - 1)");
        assert!(lines[5].starts_with("60 GOTO 20"));
        assert_eq!(lines[6], "70 STOP");
    }

    #[test]
    fn procedure_call_is_inlined_at_its_call_site() {
        let src =
            "glob { } proc { bump(x) { local { } x = ( x plus 1 ); halt } } func { } main { var { y } y = 0; bump(y); halt }";
        let out = compile_to_basic(src);
        // `bump`'s body textually substitutes its own parameter `x` with
        // the call's argument `y`; there is no CALL/RETURN machinery — the
        // inlined `halt` becomes its own `STOP`, ahead of main's own.
        assert!(out.contains("y = (y + 1)"));
        assert_eq!(out.lines().count(), 4);
    }

    #[test]
    fn function_call_assignment_inlines_and_rewrites_the_return() {
        // A function's `return` is a bare atom, never a term — so the
        // squared value is computed into a local first and that local is
        // what `return` names.
        let src = "glob { } proc { } func { sq(n) { local { tmp } tmp = ( n mult n ); return tmp } } main { var { r } r = sq(3); halt }";
        let out = compile_to_basic(src);
        assert!(out.contains("tmp = (3 * 3)"));
        assert!(out.contains("r = tmp"));
    }

    #[test]
    fn do_until_emits_a_single_repeat_label() {
        let src = "glob { } proc { } func { } main { var { i } i = 0; do { i = ( i plus 1 ) } until ( i eq 3 ) ; halt }";
        let out = compile_to_basic(src);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "10 i = 0");
        assert_eq!(lines[1], "20 i = (i + 1)");
        assert!(lines[2].starts_with("30 IF i = 3 THEN "));
        assert!(lines[3].starts_with("40 GOTO 20"));
    }

    #[test]
    fn while_loop_with_no_trailing_halt_still_resolves_its_exit_label() {
        let src = "glob { } proc { } func { } main { var { i } i = 3 ; while ( i > 0 ) { i = ( i minus 1 ) } }";
        let out = compile_to_basic(src);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "10 i = 3");
        assert!(lines[1].starts_with("20 IF i > 0 THEN "));
        assert!(lines[2].starts_with("30 GOTO "));
        assert_eq!(lines[3], "40 i = (i - 1)");
        assert!(lines[4].starts_with("50 GOTO 20"));
        // No trailing `halt` in the source, so the while's exit label `WE`
        // resolves to a synthesized final `STOP`.
        assert_eq!(lines[5], "60 STOP");
    }

    #[test]
    fn round_trip_codegen_is_deterministic() {
        let src = "glob { g } proc { } func { } main { var { x } x = ( g plus 1 ); halt }";
        let mut interner = Interner::new();
        let tokens = Lexer::tokenize(src, &mut interner).unwrap();
        let mut program = Parser::parse_program(&tokens, &interner).unwrap();
        assign_ids(&mut program);
        let first = render_intermediate(&generate(&program, &interner).unwrap());
        let second = render_intermediate(&generate(&program, &interner).unwrap());
        assert_eq!(first, second);
    }
}
