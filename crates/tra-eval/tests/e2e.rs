//! End-to-end tests for tra-eval: compile programs and run them over real
//! sources in every supported language.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use insta::assert_snapshot;
use rstest::{fixture, rstest};

use tra_dsl::format_program;
use tra_eval::{CompiledProgram, EvalError, EvalOptions, EvalSummary, Evaluator, compile};
use tra_syntax::{Cancellation, SupportedLanguage, SyntaxError};

fn compiled(src: &str) -> CompiledProgram {
    compile("<inline>", src).unwrap_or_else(|err| panic!("compile {src}: {err}"))
}

/// Evaluates `program` and returns everything it printed.
fn run(
    evaluator: &mut Evaluator,
    program: &str,
    source: &str,
    options: &EvalOptions,
) -> Result<(String, EvalSummary), EvalError> {
    let mut out = Vec::new();
    let summary = evaluator.eval(&compiled(program), source.as_bytes(), options, &mut out)?;
    let text = String::from_utf8(out).unwrap_or_else(|err| panic!("utf8: {err}"));
    Ok((text, summary))
}

fn output(program: &str, filename: &str, source: &str) -> String {
    let options = EvalOptions::new(filename);
    run(&mut Evaluator::new(), program, source, &options)
        .map(|(text, _)| text)
        .unwrap_or_else(|err| panic!("eval {program}: {err}"))
}

#[fixture]
fn evaluator() -> Evaluator {
    Evaluator::new()
}

// =============================================================================
// Happy Path
// =============================================================================

#[test]
fn root_capture_prints_identifier() {
    assert_eq!(
        output("(identifier) @id {print(@)}", "input.ts", "let a = 10;"),
        "a\n"
    );
}

#[test]
fn abbreviations_resolve_only_at_evaluation_time() {
    let src = r#"(id){print({id:"test",id2:@,id3:{id4:"test"}})}"#;
    let program = compiled(src);
    assert_eq!(format_program(program.ast()).trim_end(), src);

    assert_snapshot!(
        output(src, "input.js", "let a = 10;"),
        @r#"{"id":"test","id2":"a","id3":{"id4":"test"}}"#
    );
}

#[rstest]
#[case(
    "(func_item name: (identifier) @name) {print(@name)}",
    "lib.rs",
    "fn main() {}\nfn helper() {}\n",
    "main\nhelper\n"
)]
#[case(
    "(func_def name: (id) @name) {print(@name)}",
    "mod.py",
    "def first():\n    pass\n\ndef second():\n    pass\n",
    "first\nsecond\n"
)]
#[case(
    "(call_expression function: (id) @f) @call {print(@call)}",
    "app.tsx",
    "alert(1);\nconsole.log(2);\n",
    "alert(1)\n"
)]
#[case(
    "(function_declaration name: (identifier) @name) {print(@name)}",
    "main.go",
    "package main\n\nfunc main() {}\n\nfunc helper() int { return 1 }\n",
    "main\nhelper\n"
)]
#[case(
    "(method_declaration name: (identifier) @name) {print(@name)}",
    "App.java",
    "class App {\n  void start() {}\n  int stop() { return 0; }\n}\n",
    "start\nstop\n"
)]
#[case(
    "(number) {print(\"n\"); print(@)}",
    "calc.ts",
    "let x = 1 + 22;",
    "n\n1\nn\n22\n"
)]
fn programs_match_each_language(
    #[case] program: &str,
    #[case] filename: &str,
    #[case] source: &str,
    #[case] expected: &str,
) {
    assert_eq!(output(program, filename, source), expected);
}

#[test]
fn rules_run_in_declaration_order() {
    let program = "(number) {print(@)}\n(identifier) {print(@)}";
    assert_eq!(
        output(program, "input.ts", "let a = 1;\nlet b = 2;\n"),
        "1\n2\na\nb\n"
    );
}

#[rstest]
fn summary_counts_rules_and_matches(mut evaluator: Evaluator) {
    let options = EvalOptions::new("input.py");
    let (_, summary) = run(
        &mut evaluator,
        "(identifier) {print(@)}\n(integer) {print(@)}",
        "a = b + 1\n",
        &options,
    )
    .unwrap_or_else(|err| panic!("eval: {err}"));

    assert_eq!(
        summary,
        EvalSummary {
            patterns: 2,
            matches: 3
        }
    );
}

#[rstest]
fn symbol_tables_are_cached_per_language(mut evaluator: Evaluator) {
    let python = EvalOptions::new("a.py");
    let rust = EvalOptions::new("a.rs");
    for options in [&python, &python, &rust] {
        run(&mut evaluator, "(identifier) {print(@)}", "x", options)
            .unwrap_or_else(|err| panic!("eval: {err}"));
    }
    assert_eq!(evaluator.symbols().len(), 2);
}

#[rstest]
fn explicit_language_overrides_extension(mut evaluator: Evaluator) {
    let options = EvalOptions::new("<stdin>").with_language(Some(SupportedLanguage::Python));
    let (text, _) = run(&mut evaluator, "(identifier) {print(@)}", "value = 1", &options)
        .unwrap_or_else(|err| panic!("eval: {err}"));
    assert_eq!(text, "value\n");
}

#[test]
fn broken_input_is_still_matched() {
    let text = output("(identifier) @x {print(@x)}", "broken.py", "def ok(:\nvalue = 1\n");
    assert!(text.ends_with("value\n"), "{text:?}");
}

#[test]
fn error_nodes_can_be_matched_by_name() {
    let text = output(
        "(ERROR) {print(\"damaged\")}",
        "broken.py",
        "def ok(:\nvalue = 1\n",
    );
    assert!(text.starts_with("damaged\n"), "{text:?}");
}

// =============================================================================
// Unhappy Path
// =============================================================================

#[rstest]
fn unknown_extension_asks_for_language(mut evaluator: Evaluator) {
    let options = EvalOptions::new("notes.txt");
    let err = run(&mut evaluator, "(identifier) {print(@)}", "text", &options)
        .err()
        .map(|err| err.to_string());
    assert_snapshot!(
        err.unwrap_or_default(),
        @"could not determine language for notes.txt; pass --language explicitly"
    );
}

#[rstest]
fn unresolvable_symbol_reports_program_position(mut evaluator: Evaluator) {
    let options = EvalOptions::new("input.rs");
    let err = run(&mut evaluator, "(identifier)\n{print(@)}\n(zzz_qqq) {print(@)}", "x", &options)
        .err()
        .map(|err| err.to_string());
    assert_snapshot!(err.unwrap_or_default(), @"<inline>:3:2: unknown symbol zzz_qqq");
}

#[rstest]
fn implicit_root_capture_cannot_be_claimed(mut evaluator: Evaluator) {
    let program = compiled("(assignment left: (identifier) @__match) {print(@)}");
    let options = EvalOptions::new("input.py");
    let mut out = Vec::new();
    let err = evaluator
        .eval(&program, b"x = 1", &options, &mut out)
        .err()
        .map(|err| err.to_string());

    assert!(out.is_empty());
    assert_snapshot!(
        err.unwrap_or_default(),
        @"<inline>:1:32: capture @__match is reserved"
    );
}

#[rstest]
fn raw_symbols_reach_the_query_compiler(mut evaluator: Evaluator) {
    let options = EvalOptions::new("input.rs");
    let err = run(&mut evaluator, "(_not_a_node) {print(@)}", "fn main() {}", &options).err();
    assert!(
        matches!(
            err,
            Some(EvalError::Syntax(SyntaxError::QueryCompileError { .. }))
        ),
        "{err:?}"
    );
}

#[rstest]
fn cancellation_aborts_the_input(mut evaluator: Evaluator) {
    let cancelled = Cancellation::none().with_flag(Arc::new(AtomicBool::new(true)));
    let options = EvalOptions::new("input.py").with_cancellation(cancelled);
    let err = run(&mut evaluator, "(identifier) {print(@)}", "a = 1", &options).err();
    assert!(
        matches!(err, Some(EvalError::Syntax(SyntaxError::Cancelled))),
        "{err:?}"
    );
}

#[rstest]
fn output_before_an_action_error_is_kept(mut evaluator: Evaluator) {
    let program = compiled("(identifier) {print(@); print(@missing)}");
    let options = EvalOptions::new("input.py");
    let mut out = Vec::new();
    let err = evaluator
        .eval(&program, b"a = b", &options, &mut out)
        .err()
        .map(|err| err.to_string());

    assert_eq!(out, b"a\n");
    assert_eq!(
        err.as_deref(),
        Some("<inline>:1:31: unknown variable @missing")
    );
}

#[rstest]
fn invalid_utf8_inputs_print_raw_bytes(mut evaluator: Evaluator) {
    let program = compiled("(string) @s {print(@s); print({k: @s})}");
    let options = EvalOptions::new("input.py");
    let mut out = Vec::new();
    evaluator
        .eval(&program, b"x = \"caf\xe9\"\n", &options, &mut out)
        .unwrap_or_else(|err| panic!("eval: {err}"));

    let mut expected = b"\"caf\xe9\"\n".to_vec();
    expected.extend_from_slice("{\"k\":\"\\\"caf\u{fffd}\\\"\"}\n".as_bytes());
    assert_eq!(out, expected);
}

#[test]
fn malformed_programs_report_every_diagnostic() {
    let err = compile("prog.tra", "(a) {print({k: +})}\n(b) {print(}")
        .err()
        .map(|diagnostics| {
            diagnostics
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default();
    assert_snapshot!(err, @r"
    prog.tra:1:16: unexpected token PLUS(+), wanted expression
    prog.tra:2:12: expected RPAREN, got RCURLY_BRACKET(})
    ");
}
