//! Edge case tests for dartan-lex

#[cfg(test)]
mod tests {
    use crate::{find_column, tokenize, TokenKind, TokenValue};

    // ==================== EDGE CASES ====================

    #[test]
    fn test_edge_whitespace_only() {
        let (tokens, errors) = tokenize("  \t\n  \t  \n");
        assert!(tokens.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_edge_comment_only() {
        let (tokens, errors) = tokenize("// solo un comentario\n/* y otro */");
        assert!(tokens.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_edge_all_single_operators() {
        let (tokens, errors) = tokenize("+ - * / % ~ & | ^ < > = ! ? . ( ) { } [ ] ; , :");
        assert!(errors.is_empty());
        assert_eq!(tokens.len(), 24);
    }

    #[test]
    fn test_edge_adjacent_operators_split_correctly() {
        // `a<=b` must not lex `<` then `=`.
        let (tokens, _) = tokenize("a<=b");
        assert_eq!(tokens[1].kind, TokenKind::LtEq);
        // `x=--y` is ASSIGN then DECREMENT.
        let (tokens, _) = tokenize("x=--y");
        assert_eq!(tokens[1].kind, TokenKind::Eq);
        assert_eq!(tokens[2].kind, TokenKind::MinusMinus);
    }

    #[test]
    fn test_edge_keyword_prefix_identifiers() {
        // Identifiers that merely start with a keyword stay identifiers.
        let (tokens, _) = tokenize("variable formula constant ifs");
        for token in &tokens {
            assert_eq!(token.kind, TokenKind::Ident, "{}", token.lexeme);
        }
    }

    #[test]
    fn test_edge_underscore_identifier() {
        let (tokens, _) = tokenize("_ __ _a1");
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Ident));
    }

    #[test]
    fn test_edge_empty_string_literal() {
        let (tokens, errors) = tokenize(r#""""#);
        assert!(errors.is_empty());
        assert_eq!(tokens[0].value, TokenValue::Str(String::new()));
    }

    #[test]
    fn test_edge_string_with_other_quote_inside() {
        let (tokens, errors) = tokenize(r#""it's fine" '"also"'"#);
        assert!(errors.is_empty());
        assert_eq!(tokens[0].value, TokenValue::Str("it's fine".to_string()));
        assert_eq!(tokens[1].value, TokenValue::Str("\"also\"".to_string()));
    }

    #[test]
    fn test_edge_multiple_illegal_characters() {
        let (tokens, errors) = tokenize("@ # ` ∑");
        assert!(tokens.is_empty());
        assert_eq!(errors.len(), 4);
        for error in &errors {
            assert!(error.message.contains("Carácter ilegal"));
            assert_eq!(error.line, 1);
        }
    }

    #[test]
    fn test_edge_crlf_line_endings() {
        let (tokens, errors) = tokenize("a\r\nb");
        assert!(errors.is_empty());
        assert_eq!(tokens[0].span.line, 1);
        assert_eq!(tokens[1].span.line, 2);
        assert_eq!(tokens[1].span.column, 1);
    }

    #[test]
    fn test_edge_lexemes_match_source_slices() {
        let source = "while (x >= 10) { x = x ~/ 2; }";
        let (tokens, errors) = tokenize(source);
        assert!(errors.is_empty());
        for token in &tokens {
            assert_eq!(&source[token.span.start..token.span.end], token.lexeme);
        }
    }

    // ==================== PROPERTIES ====================

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Lexing any input terminates and never panics; token
            /// offsets are monotonically non-decreasing.
            #[test]
            fn prop_positions_monotonic(source in "[ -~\\n]{0,200}") {
                let (tokens, _) = tokenize(&source);
                let mut last = 0usize;
                for token in &tokens {
                    prop_assert!(token.span.start >= last);
                    last = token.span.start;
                }
            }

            /// The stored column of every token can be reconstituted
            /// from its byte offset alone.
            #[test]
            fn prop_columns_round_trip(source in "[ -~\\n]{0,200}") {
                let (tokens, _) = tokenize(&source);
                for token in &tokens {
                    prop_assert_eq!(
                        find_column(&source, token.span.start),
                        token.span.column
                    );
                }
            }

            /// Tokenizing twice yields identical streams and errors.
            #[test]
            fn prop_tokenize_deterministic(source in "[ -~\\n]{0,200}") {
                let first = tokenize(&source);
                let second = tokenize(&source);
                prop_assert_eq!(first.0, second.0);
                prop_assert_eq!(first.1, second.1);
            }
        }
    }
}
