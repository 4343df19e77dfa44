//! End-to-end pipeline tests through the public library surface.
//!
//! Each test feeds a complete source text to the driver and checks the
//! observable results: tokens, per-pass error lists, and message
//! contents.

use dartan_drv::{analyze_all, analyze_semantic, parse_syntax, tokenize};
use dartan_lex::TokenKind;

#[test]
fn scenario_typed_declaration_and_assignment() {
    let result = analyze_all("int x = 5; x = 10;");

    let kinds: Vec<TokenKind> = result.tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Ident,     // int
            TokenKind::Ident,     // x
            TokenKind::Eq,
            TokenKind::NumberInt, // 5
            TokenKind::Semicolon,
            TokenKind::Ident,     // x
            TokenKind::Eq,
            TokenKind::NumberInt, // 10
            TokenKind::Semicolon,
        ]
    );
    assert_eq!(result.tokens[0].lexeme, "int");
    assert!(result.syntax_errors.is_empty());
    assert!(result.semantic_errors.is_empty());
}

#[test]
fn scenario_immutable_reassignment() {
    let result = analyze_all("final int k = 1; k = 2;");
    assert_eq!(result.semantic_errors.len(), 1);
    let message = &result.semantic_errors[0].message;
    assert!(message.contains("inmutable"));
    assert!(message.contains("'k'"));
}

#[test]
fn scenario_final_without_initializer() {
    let result = analyze_all("final int k;");
    assert_eq!(result.semantic_errors.len(), 1);
    assert!(result.semantic_errors[0].message.contains("debe ser inicializada"));
    assert_eq!(result.semantic_errors[0].line, 1);
}

#[test]
fn scenario_int_to_double_is_implicit() {
    let result = analyze_all("int x = 3; double y = x;");
    assert!(result.is_clean());
}

#[test]
fn scenario_double_to_int_requires_cast() {
    let result = analyze_all("int a = 1; int b = 2.5;");
    assert_eq!(result.semantic_errors.len(), 1);
    let message = &result.semantic_errors[0].message;
    assert!(message.contains("'double'"));
    assert!(message.contains("'int'"));
    assert!(message.contains("conversión explícita"));
}

#[test]
fn scenario_continue_outside_loop() {
    let source = "for (int i = 0; i < 10; i = i + 1) { break; } continue;";
    let result = analyze_all(source);
    assert_eq!(result.semantic_errors.len(), 1);
    assert!(result.semantic_errors[0]
        .message
        .contains("'continue' fuera de un bucle"));
}

#[test]
fn scenario_function_missing_return() {
    let result = analyze_all("int add(int a, int b) { }");
    assert_eq!(result.semantic_errors.len(), 1);
    let message = &result.semantic_errors[0].message;
    assert!(message.contains("'add'"));
    assert!(message.contains("'int'"));
    assert!(message.contains("todos los caminos"));
}

#[test]
fn scenario_function_with_covered_returns() {
    let source = "int add(int a, int b) { if (a > b) { return a; } else { return b; } }";
    assert!(analyze_all(source).is_clean());
}

#[test]
fn scenario_arithmetic_on_int_and_string() {
    let result = analyze_all("print(1 + \"x\");");
    assert_eq!(result.semantic_errors.len(), 1);
    let message = &result.semantic_errors[0].message;
    assert!(message.contains("operandos numéricos"));
    assert!(message.contains("'int'"));
    assert!(message.contains("'String'"));
}

#[test]
fn scenario_null_operand_without_check() {
    let result = analyze_all("var s = null; var t = s + 1;");
    assert_eq!(result.semantic_errors.len(), 1);
    assert!(result.semantic_errors[0]
        .message
        .contains("null sin verificación"));
}

#[test]
fn scenario_class_member_resolution() {
    let result = analyze_all("class C { int v = 1; int get() { return v + 1; } }");
    assert!(result.is_clean());
}

#[test]
fn scenario_illegal_character_position() {
    // '@' sits at line 3, column 7.
    let source = "var a;\nvar b;\nvar c @ = 1;";
    let result = analyze_all(source);
    assert_eq!(result.lexical_errors.len(), 1);
    let error = &result.lexical_errors[0];
    assert_eq!(error.line, 3);
    assert_eq!(error.column, Some(7));
    assert!(error.message.contains("'@'"));
    // Lexing continued past the bad character.
    assert!(result.tokens.len() > 6);
}

// ==================== CROSS-PASS BEHAVIOR ====================

#[test]
fn passes_are_independent_and_repeatable() {
    let source = "final int k = 1;\nk = 2;";
    let first = analyze_semantic(source);
    let second = analyze_semantic(source);
    assert_eq!(first.errors, second.errors);

    // The standalone passes see the same source without interference.
    assert!(tokenize(source).errors.is_empty());
    assert!(parse_syntax(source).errors.is_empty());
}

#[test]
fn merged_errors_follow_pass_order() {
    let source = "@ int a = 1 1; z = 2;";
    let result = analyze_all(source);
    let merged = result.all_errors();
    assert!(merged.len() >= 3);

    let phases: Vec<_> = merged.iter().map(|e| e.phase).collect();
    let mut sorted = phases.clone();
    sorted.sort();
    assert_eq!(phases, sorted);
}

#[test]
fn syntax_errors_do_not_abort_the_parse() {
    let source = "int a = ;\nint b = 2;\nint c = ;\nint d = 4;";
    let analysis = parse_syntax(source);
    assert_eq!(analysis.errors.len(), 2);
    assert_eq!(analysis.program.statements.len(), 2);
}

#[test]
fn token_columns_round_trip_from_offsets() {
    let source = "var x = 1;\n  var y = 2;\n";
    let analysis = tokenize(source);
    for token in &analysis.tokens {
        assert_eq!(
            dartan_lex::find_column(source, token.span.start),
            token.span.column
        );
    }
}
