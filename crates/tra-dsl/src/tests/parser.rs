//! Parser and formatter behaviour.

use insta::assert_snapshot;
use rstest::rstest;

use crate::{Diagnostic, Parsed, format_program, parse, parse_file};

fn messages(parsed: &Parsed) -> Vec<String> {
    parsed
        .diagnostics
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn reformat(src: &str) -> String {
    let program = parse_file("<test>", src).unwrap_or_else(|err| panic!("parse failed: {err}"));
    format_program(&program)
}

// =============================================================================
// Round trips
// =============================================================================

#[rstest]
#[case("(identifier){print(@)}")]
#[case(r#"(binary_expression operator: "!=" right: (null)){}"#)]
#[case(r#"(id){print({id:"test",id2:@,id3:{id4:"test"}})}"#)]
#[case("(identifier _) @id {print(\"Hello, World!\")}")]
#[case("(dotted_name (_) @prev-id . (identifier) @next-id) @m {print(@prev-id)}")]
#[case(r#"(call) @c {print(@c);print("done",1)}"#)]
fn formatting_reproduces_canonical_source(#[case] src: &str) {
    assert_eq!(reformat(src).trim_end(), src);
}

#[rstest]
#[case("(a)   @x\n{ print( @x ) }", "(a) @x {print(@x)}")]
#[case("(a){print(\"x\", \"y\")}", r#"(a){print("x","y")}"#)]
#[case("(a){print({k:\"v\" j:\"w\"})}", r#"(a){print({k:"v",j:"w"})}"#)]
#[case("(a){;print(@);;}", "(a){print(@)}")]
#[case("// leading\n(a) @x { print(@x) } // trailing", "(a) @x {print(@x)}")]
fn formatting_normalises_layout(#[case] src: &str, #[case] expected: &str) {
    assert_eq!(reformat(src).trim_end(), expected);
}

#[test]
fn formatted_output_parses_to_the_same_program() {
    let src = "(binary_expression\n  left: (identifier) @lhs\n  operator: \"+\") @bin\n{ print({lhs: @lhs, whole: @bin}) }\n(string) { print(@) }";
    let once = reformat(src);
    let twice = reformat(&once);
    assert_eq!(once, twice);
    assert_snapshot!(once.trim_end(), @r#"
    (binary_expression left: (identifier) @lhs operator: "+") @bin {print({lhs:@lhs,whole:@bin})}
    (string){print(@)}
    "#);
}

#[test]
fn abbreviations_are_kept_as_written() {
    let program = parse_file("<test>", "(ar_pat) @p {print(@p)}")
        .unwrap_or_else(|err| panic!("parse failed: {err}"));
    let rule = program
        .patterns
        .first()
        .unwrap_or_else(|| panic!("expected one rule"));
    assert_eq!(rule.pattern.symbol.name, "ar_pat");
    assert_eq!(rule.pattern.capture_name(), Some("p"));
}

// =============================================================================
// Error recovery
// =============================================================================

#[test]
fn malformed_dict_entry_reports_once_and_keeps_the_rule() {
    let parsed = parse("<test>", r#"(id){print({id:"test", + , id2:@})}"#);

    assert_eq!(
        messages(&parsed),
        vec!["<test>:1:24: expected entry, got PLUS"]
    );
    assert_eq!(parsed.program.patterns.len(), 1);
    assert_eq!(
        format_program(&parsed.program).trim_end(),
        r#"(id){print({id:"test",,id2:@})}"#
    );
}

#[test]
fn malformed_dict_value_reports_once() {
    let parsed = parse("<test>", "(id){print({id: +, other: @})}");

    assert_eq!(
        messages(&parsed),
        vec!["<test>:1:17: unexpected token PLUS(+), wanted expression"]
    );
    assert_eq!(parsed.program.patterns.len(), 1);
}

#[test]
fn unterminated_dict_becomes_bad_expression() {
    let parsed = parse("<test>", "(id){print({id:\"x\")}\n(b){}");

    assert_eq!(
        messages(&parsed),
        vec!["<test>:1:19: expected '}', unterminated dict starting at <test>:1:12"]
    );
    assert_eq!(
        format_program(&parsed.program),
        "(id){print()}\n(b){}\n"
    );
}

#[test]
fn junk_at_top_level_is_reported_once() {
    let parsed = parse("<test>", "print(@)\n(a){}");

    assert_eq!(
        messages(&parsed),
        vec!["<test>:1:1: unexpected token IDENT(print), wanted pattern or action block"]
    );
    assert_eq!(format_program(&parsed.program), "(a){}\n");
}

#[test]
fn errors_in_several_rules_are_all_reported() {
    let parsed = parse("prog.tra", "(a {}\n(b){print(@)}\n(c){+}");

    assert_snapshot!(messages(&parsed).join("\n"), @r"
    prog.tra:1:4: bad token in node pattern: LCURLY_BRACKET
    prog.tra:3:5: unexpected token PLUS(+), wanted statement
    ");
    assert_eq!(format_program(&parsed.program), "(b){print(@)}\n");
}

#[test]
fn missing_action_brace_resumes_at_next_line() {
    let parsed = parse("<test>", "(a) {print(@)\n(b){print(@)}");

    assert_eq!(
        messages(&parsed),
        vec!["<test>:2:1: unexpected token LPAREN((), wanted statement"]
    );
    assert_eq!(format_program(&parsed.program), "(b){print(@)}\n");
}

#[rstest]
#[case("(a @x){}", "<test>:1:4: bad token in node pattern: IDENT")]
#[case("(a){print(@}", "<test>:1:12: expected RPAREN, got RCURLY_BRACKET(})")]
#[case("(a)", "<test>:1:4: expected LCURLY_BRACKET, got EOF")]
#[case("(a){print(@)", "<test>:1:13: expected RCURLY_BRACKET, got EOF")]
#[case("(a){print(1.5)}", "<test>:1:11: unexpected token FLOAT(1.5), wanted expression")]
#[case("(a){print(99999999999999999999)}", "<test>:1:11: integer literal 99999999999999999999 out of range")]
fn syntax_errors_are_positioned(#[case] src: &str, #[case] expected: &str) {
    let err = parse_file("<test>", src)
        .err()
        .unwrap_or_else(|| panic!("expected a syntax error for {src:?}"));
    let first = err
        .iter()
        .next()
        .map(Diagnostic::to_string)
        .unwrap_or_default();
    assert_eq!(first, expected);
}

#[test]
fn lexical_errors_are_reported_without_parsing() {
    let parsed = parse("<test>", "(a){print(\"x)}");

    assert_eq!(
        messages(&parsed),
        vec!["<test>:1:11: unterminated string literal"]
    );
    assert!(parsed.program.patterns.is_empty());
}

#[test]
fn empty_program_is_valid() {
    let program = parse_file("<test>", "  // nothing here\n")
        .unwrap_or_else(|err| panic!("parse failed: {err}"));
    assert!(program.patterns.is_empty());
}
