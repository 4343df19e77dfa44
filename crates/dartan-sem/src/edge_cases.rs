//! Edge case tests for dartan-sem

#[cfg(test)]
mod tests {
    use crate::analyze_source;

    // ==================== LOOP CONTEXT ====================

    #[test]
    fn test_edge_break_inside_loop_is_fine() {
        assert!(analyze_source("while (true) { break; }").is_empty());
        assert!(analyze_source("do { continue; } while (true);").is_empty());
        assert!(analyze_source("for (var x in xs) { break; }").len() <= 1); // xs undeclared only
    }

    #[test]
    fn test_edge_break_outside_loop() {
        let errors = analyze_source("break;");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("'break' fuera de un bucle"));
    }

    #[test]
    fn test_edge_continue_after_loop() {
        let source = "for (int i = 0; i < 10; i = i + 1) { break; } continue;";
        let errors = analyze_source(source);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("'continue' fuera de un bucle"));
    }

    #[test]
    fn test_edge_break_in_if_inside_loop() {
        let source = "while (true) { if (true) { break; } }";
        assert!(analyze_source(source).is_empty());
    }

    #[test]
    fn test_edge_break_in_function_inside_loop() {
        // The function body is not loop context even though the
        // declaration sits inside one.
        let source = "while (true) { void f() { break; } }";
        let errors = analyze_source(source);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("'break'"));
    }

    #[test]
    fn test_edge_nested_loop_break() {
        let source = "while (true) { while (true) { break; } break; }";
        assert!(analyze_source(source).is_empty());
    }

    // ==================== NULL AWARENESS ====================

    #[test]
    fn test_edge_null_in_arithmetic() {
        let errors = analyze_source("var s = null; var t = s + 1;");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("null sin verificación"));
    }

    #[test]
    fn test_edge_null_coalescing_is_null_aware() {
        assert!(analyze_source("var s = null; var t = s ?? 1;").is_empty());
    }

    #[test]
    fn test_edge_null_equality_is_null_aware() {
        assert!(analyze_source("var s = null; var e = s == null; var n = s != null;").is_empty());
    }

    #[test]
    fn test_edge_null_comparison_is_reported() {
        let errors = analyze_source("var s = null; var t = s < 1;");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("null sin verificación"));
    }

    // ==================== BINARY OPERATION TYPING ====================

    #[test]
    fn test_edge_arithmetic_on_int_and_string() {
        let errors = analyze_source("print(1 + \"x\");");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("operandos numéricos"));
        assert!(errors[0].message.contains("'int'"));
        assert!(errors[0].message.contains("'String'"));
    }

    #[test]
    fn test_edge_string_concatenation_is_fine() {
        assert!(analyze_source("print(\"a\" + \"b\");").is_empty());
    }

    #[test]
    fn test_edge_string_minus_string_is_reported() {
        let errors = analyze_source("print(\"a\" - \"b\");");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("operandos numéricos"));
    }

    #[test]
    fn test_edge_logical_requires_bool() {
        let errors = analyze_source("var x = 1 && true;");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("'bool'"));
    }

    #[test]
    fn test_edge_comparison_incompatible_types() {
        let errors = analyze_source("var x = \"a\" < 1;");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("tipos incompatibles"));
    }

    #[test]
    fn test_edge_mixed_numeric_comparison_is_fine() {
        assert!(analyze_source("var x = 1 < 2.5;").is_empty());
    }

    #[test]
    fn test_edge_well_typed_binops_are_silent() {
        let source = "int a = 1; int b = 2;\n\
                      var c = a + b * 2;\n\
                      var d = a < b && b >= a;\n\
                      var e = \"x\" + \"y\";\n\
                      var f = a == b || a != b;";
        assert!(analyze_source(source).is_empty());
    }

    #[test]
    fn test_edge_unknown_operands_are_skipped() {
        // `misterio()` is undeclared, so its type is unknown; the
        // binary node must not produce a diagnostic.
        assert!(analyze_source("var x = misterio() + 1;").is_empty());
    }

    #[test]
    fn test_edge_dynamic_operands_are_skipped() {
        assert!(analyze_source("var d; var x = d + 1;").is_empty());
    }

    // ==================== IDENTIFIER EXISTENCE ====================

    #[test]
    fn test_edge_undeclared_identifier_in_expression() {
        let errors = analyze_source("var x = nope;");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("identificador no declarado 'nope'"));
    }

    #[test]
    fn test_edge_forward_function_reference_is_fine() {
        // `tarde` is declared after its use; the whole-tree walk must
        // not flag it.
        let source = "var x = tarde();\nint tarde() { return 1; }";
        assert!(analyze_source(source).is_empty());
    }

    #[test]
    fn test_edge_function_name_as_value_resolves() {
        let source = "int uno() { return 1; }\nvar f = uno;";
        assert!(analyze_source(source).is_empty());
    }

    #[test]
    fn test_edge_block_scoped_variable_not_visible_outside() {
        let errors = analyze_source("{ int interno = 1; } var x = interno;");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("'interno'"));
    }

    #[test]
    fn test_edge_param_visible_in_body_only() {
        let source = "void f(int a) { print(a); } var x = a;";
        let errors = analyze_source(source);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("'a'"));
    }

    // ==================== PRINT VALIDATION ====================

    #[test]
    fn test_edge_print_is_valid() {
        assert!(analyze_source("print(1);").is_empty());
    }

    #[test]
    fn test_edge_single_arg_call_to_declared_function() {
        let source = "void log(int x) { }\nlog(3);";
        assert!(analyze_source(source).is_empty());
    }

    #[test]
    fn test_edge_print_name_mismatch() {
        let errors = analyze_source("imprimir(1);");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("'print'"));
        assert!(errors[0].message.contains("'imprimir'"));
    }

    // ==================== INPUT SHAPE ====================

    #[test]
    fn test_edge_stdin_read_infers_string() {
        // Assigning the read line to a String is clean; to an int it
        // is an incompatible initialization.
        assert!(analyze_source("String s = stdin.readLineSync();").is_empty());
        let errors = analyze_source("int n = stdin.readLineSync();");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("incompatible"));
    }

    // ==================== SCOPES AND CLASSES ====================

    #[test]
    fn test_edge_class_scope_is_dropped_after_members() {
        let source = "class C { int v = 1; } var x = v;";
        let errors = analyze_source(source);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("'v'"));
    }

    #[test]
    fn test_edge_class_method_parameter_and_field() {
        let source = "class C { int v = 1; int mas(int d) { return v + d; } }";
        assert!(analyze_source(source).is_empty());
    }

    #[test]
    fn test_edge_for_in_iterator_usable_in_body() {
        let source = "var xs = [1, 2]; for (var x in xs) { print(x); }";
        assert!(analyze_source(source).is_empty());
    }

    #[test]
    fn test_edge_for_in_over_final_iterator_variable() {
        let source = "final y = 1; var xs = [1]; for (y in xs) { }";
        let errors = analyze_source(source);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("inmutable"));
    }

    #[test]
    fn test_edge_bare_body_shares_scope() {
        // The bare-statement form declares into the surrounding scope;
        // a later redeclaration there collides.
        let source = "if (true) int x = 1; int x = 2;";
        let errors = analyze_source(source);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("ya declarada"));
    }

    #[test]
    fn test_edge_map_and_list_types() {
        let source = "Map m = {\"a\": 1}; List l = [1, 2]; Map v = {};";
        assert!(analyze_source(source).is_empty());
    }

    #[test]
    fn test_edge_empty_map_is_map_type_too() {
        let errors = analyze_source("List l = {};");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("'Map'"));
        assert!(errors[0].message.contains("'List'"));
    }
}
