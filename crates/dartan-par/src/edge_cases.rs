//! Edge case tests for dartan-par

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::parse_source;

    // ==================== RECOVERY ====================

    #[test]
    fn test_edge_recovery_skips_to_semicolon() {
        let (program, errors) = parse_source("int x = 1 2 3; int y = 4;");
        assert!(!errors.is_empty());
        assert_eq!(program.statements.len(), 1);
        assert!(matches!(program.statements[0], Stmt::VarDecl(ref d) if d.name == "y"));
    }

    #[test]
    fn test_edge_recovery_stops_at_rbrace() {
        // The error is inside the block; the block and the statement
        // after it both survive.
        let (program, errors) = parse_source("void f() { int x 1; } int z = 2;");
        assert!(!errors.is_empty());
        assert_eq!(program.statements.len(), 2);
    }

    #[test]
    fn test_edge_error_inside_block_keeps_siblings() {
        let (program, errors) = parse_source("{ int a = 1; ); int b = 2; }");
        assert!(!errors.is_empty());
        let Stmt::Block(block) = &program.statements[0] else {
            panic!("expected Block");
        };
        assert_eq!(block.statements.len(), 2);
    }

    #[test]
    fn test_edge_unclosed_block_single_eof_error() {
        let (_, errors) = parse_source("while (a) { x = 1;");
        let eof_count = errors
            .iter()
            .filter(|e| e.message.contains("fin de entrada"))
            .count();
        assert_eq!(eof_count, 1);
    }

    #[test]
    fn test_edge_garbage_between_statements() {
        // Recovery resumes at the next statement keyword.
        let (program, errors) = parse_source("int a = 1; , , var b = 2;");
        assert!(!errors.is_empty());
        assert_eq!(program.statements.len(), 2);
    }

    // ==================== NESTING ====================

    #[test]
    fn test_edge_deeply_nested_blocks() {
        let (program, errors) = parse_source("{ { { { int x = 1; } } } }");
        assert!(errors.is_empty());
        let mut current = &program.statements[0];
        for _ in 0..3 {
            let Stmt::Block(block) = current else {
                panic!("expected Block");
            };
            current = &block.statements[0];
        }
    }

    #[test]
    fn test_edge_loop_in_loop() {
        let source = "for (int i = 0; i < 3; i = i + 1) { while (x) { do { } while (y); } }";
        let (program, errors) = parse_source(source);
        assert!(errors.is_empty());
        assert!(matches!(program.statements[0], Stmt::For(_)));
    }

    #[test]
    fn test_edge_else_if_chain_depth() {
        let source = "if (a) { } else if (b) { } else if (c) { } else { }";
        let (program, errors) = parse_source(source);
        assert!(errors.is_empty());
        let Stmt::If(first) = &program.statements[0] else {
            panic!("expected If");
        };
        let Some(ElseArm::Elif(second)) = &first.else_arm else {
            panic!("expected first elif");
        };
        let Some(ElseArm::Elif(third)) = &second.else_arm else {
            panic!("expected second elif");
        };
        assert!(matches!(third.else_arm, Some(ElseArm::Else(_))));
    }

    // ==================== MISCELLANEOUS SHAPES ====================

    #[test]
    fn test_edge_arrow_function_with_call_body() {
        let (program, errors) = parse_source("int doble(int n) => mult(n, 2);");
        assert!(errors.is_empty());
        let Stmt::ArrowFunction(arrow) = &program.statements[0] else {
            panic!("expected ArrowFunction");
        };
        assert!(matches!(arrow.expr, Expr::Call(_)));
    }

    #[test]
    fn test_edge_void_arrow_function() {
        let (program, errors) = parse_source("void saluda() => imprimir(1);");
        assert!(errors.is_empty());
        let Stmt::ArrowFunction(arrow) = &program.statements[0] else {
            panic!("expected ArrowFunction");
        };
        assert_eq!(arrow.return_type, "void");
    }

    #[test]
    fn test_edge_dynamic_declaration_and_function() {
        let (program, errors) = parse_source("dynamic x = 1; dynamic f() { }");
        assert!(errors.is_empty());
        assert!(matches!(
            program.statements[0],
            Stmt::VarDecl(ref d) if d.declarator == Declarator::Typed("dynamic".to_string())
        ));
        assert!(matches!(program.statements[1], Stmt::Function(_)));
    }

    #[test]
    fn test_edge_empty_class() {
        let (program, errors) = parse_source("class Vacia { }");
        assert!(errors.is_empty());
        let Stmt::Class(class) = &program.statements[0] else {
            panic!("expected Class");
        };
        assert!(class.members.is_empty());
    }

    #[test]
    fn test_edge_class_member_recovery() {
        let (program, errors) = parse_source("class C { ??? final v = 1; }");
        assert!(!errors.is_empty());
        let Stmt::Class(class) = &program.statements[0] else {
            panic!("expected Class");
        };
        assert_eq!(class.members.len(), 1);
    }

    #[test]
    fn test_edge_nested_list_and_map() {
        let (program, errors) = parse_source("var m = {\"xs\": [1, [2, 3]], \"v\": {}};");
        assert!(errors.is_empty());
        let Stmt::VarDecl(decl) = &program.statements[0] else {
            panic!("expected VarDecl");
        };
        let Some(Expr::Map(entries, _)) = &decl.init else {
            panic!("expected map initializer");
        };
        assert_eq!(entries.len(), 2);
        assert!(matches!(entries[0].1, Expr::List(_, _)));
        assert!(matches!(entries[1].1, Expr::Map(_, _)));
    }

    #[test]
    fn test_edge_statement_positions_preserved() {
        let (program, errors) = parse_source("int a = 1;\nint b = 2;\n\nint c = 3;");
        assert!(errors.is_empty());
        let lines: Vec<u32> = program.statements.iter().map(|s| s.span().line).collect();
        assert_eq!(lines, vec![1, 2, 4]);
    }

    #[test]
    fn test_edge_keyword_cannot_be_variable_name() {
        let (_, errors) = parse_source("int while = 1;");
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_edge_bare_for_in_body() {
        let (program, errors) = parse_source("for (var x in xs) print(x);");
        assert!(errors.is_empty());
        let Stmt::ForIn(for_in) = &program.statements[0] else {
            panic!("expected ForIn");
        };
        assert!(!for_in.body.is_braced());
        assert!(matches!(for_in.body.statements()[0], Stmt::Print(_)));
    }
}
