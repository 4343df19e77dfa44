//! Expression parsing using Pratt binding powers.
//!
//! # Operator precedence (loosest to tightest)
//!
//! | Level | Operators | Associativity |
//! |-------|---------------------|---------------|
//! | 1 | `??` | Left |
//! | 2 | `\|\|` | Left |
//! | 3 | `&&` | Left |
//! | 4 | `==`, `!=` | Left |
//! | 5 | `<`, `>`, `<=`, `>=` | Left |
//! | 6 | `+`, `-` | Left |
//! | 7 | `*`, `/`, `%`, `~/` | Left |
//!
//! `a + b * c` parses as `a + (b * c)`; `a - b - c` parses as
//! `(a - b) - c`.

use dartan_lex::{TokenKind, TokenValue};

use crate::ast::*;
use crate::Parser;

/// Binding power levels. Higher numbers bind tighter; every operator is
/// left-associative, so the right power is always one above the left.
pub(crate) mod bp {
    /// Start of an expression
    pub const MIN: u8 = 0;

    /// Null-coalescing: `??`
    pub const IF_NULL: u8 = 2;

    /// Logical OR: `||`
    pub const LOGICAL_OR: u8 = 4;

    /// Logical AND: `&&`
    pub const LOGICAL_AND: u8 = 6;

    /// Equality: `==`, `!=`
    pub const EQUALITY: u8 = 8;

    /// Comparison: `<`, `>`, `<=`, `>=`
    pub const COMPARISON: u8 = 10;

    /// Additive: `+`, `-`
    pub const ADDITIVE: u8 = 12;

    /// Multiplicative: `*`, `/`, `%`, `~/`
    pub const MULTIPLICATIVE: u8 = 14;
}

/// Left/right binding powers of an infix operator token.
fn infix_binding_power(kind: TokenKind) -> Option<(u8, u8)> {
    let lbp = match kind {
        TokenKind::QuestionQuestion => bp::IF_NULL,
        TokenKind::PipePipe => bp::LOGICAL_OR,
        TokenKind::AmpAmp => bp::LOGICAL_AND,
        TokenKind::EqEq | TokenKind::BangEq => bp::EQUALITY,
        TokenKind::Lt | TokenKind::Gt | TokenKind::LtEq | TokenKind::GtEq => bp::COMPARISON,
        TokenKind::Plus | TokenKind::Minus => bp::ADDITIVE,
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent | TokenKind::TildeSlash => {
            bp::MULTIPLICATIVE
        }
        _ => return None,
    };
    Some((lbp, lbp + 1))
}

fn binop_from_token(kind: TokenKind) -> Option<BinOp> {
    let op = match kind {
        TokenKind::Plus => BinOp::Add,
        TokenKind::Minus => BinOp::Sub,
        TokenKind::Star => BinOp::Mul,
        TokenKind::Slash => BinOp::Div,
        TokenKind::Percent => BinOp::Mod,
        TokenKind::TildeSlash => BinOp::TruncDiv,
        TokenKind::EqEq => BinOp::Eq,
        TokenKind::BangEq => BinOp::Ne,
        TokenKind::Lt => BinOp::Lt,
        TokenKind::Gt => BinOp::Gt,
        TokenKind::LtEq => BinOp::Le,
        TokenKind::GtEq => BinOp::Ge,
        TokenKind::AmpAmp => BinOp::And,
        TokenKind::PipePipe => BinOp::Or,
        TokenKind::QuestionQuestion => BinOp::IfNull,
        _ => return None,
    };
    Some(op)
}

impl<'a> Parser<'a> {
    /// Parse a complete expression.
    pub(crate) fn parse_expr(&mut self) -> Option<Expr> {
        self.parse_expr_bp(bp::MIN)
    }

    /// Pratt loop: fold infix operators whose left power reaches
    /// `min_bp` around a primary expression.
    fn parse_expr_bp(&mut self, min_bp: u8) -> Option<Expr> {
        let mut lhs = self.parse_primary()?;

        loop {
            let Some((lbp, rbp)) = infix_binding_power(self.kind()) else {
                break;
            };
            if lbp < min_bp {
                break;
            }

            let op_token = self.bump();
            let op = binop_from_token(op_token.kind)?;
            let rhs = self.parse_expr_bp(rbp)?;
            lhs = Expr::Binary(BinaryExpr {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span: op_token.span,
            });
        }

        Some(lhs)
    }

    /// Atom: literal, identifier, call, input, list, map or
    /// parenthesized expression.
    fn parse_primary(&mut self) -> Option<Expr> {
        match self.kind() {
            TokenKind::Ident => {
                let name = self.bump();
                match self.kind() {
                    TokenKind::LParen => {
                        self.advance();
                        let args = self.parse_call_args()?;
                        Some(Expr::Call(CallExpr {
                            callee: name.lexeme,
                            args,
                            span: name.span,
                        }))
                    }
                    TokenKind::Dot => {
                        self.advance();
                        let method = self.expect(TokenKind::Ident, "el nombre del método")?;
                        self.expect(TokenKind::LParen, "'('")?;
                        self.expect(TokenKind::RParen, "')'")?;
                        Some(Expr::Input(InputExpr {
                            receiver: name.lexeme,
                            method: method.lexeme,
                            span: name.span,
                        }))
                    }
                    _ => Some(Expr::Ident(name.lexeme, name.span)),
                }
            }

            TokenKind::NumberInt => {
                let token = self.bump();
                let value = match token.value {
                    TokenValue::Int(v) => v,
                    _ => 0,
                };
                Some(Expr::Int(value, token.span))
            }

            TokenKind::NumberDouble => {
                let token = self.bump();
                let value = match token.value {
                    TokenValue::Double(v) => v,
                    _ => 0.0,
                };
                Some(Expr::Double(value, token.span))
            }

            TokenKind::Str => {
                let token = self.bump();
                let value = match token.value {
                    TokenValue::Str(s) => s,
                    _ => String::new(),
                };
                Some(Expr::Str(value, token.span))
            }

            TokenKind::True => {
                let token = self.bump();
                Some(Expr::Bool(true, token.span))
            }

            TokenKind::False => {
                let token = self.bump();
                Some(Expr::Bool(false, token.span))
            }

            TokenKind::Null => {
                let token = self.bump();
                Some(Expr::Null(token.span))
            }

            TokenKind::LBracket => self.parse_list_literal(),
            TokenKind::LBrace => self.parse_map_literal(),

            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen, "')'")?;
                Some(inner)
            }

            _ => {
                self.error_unexpected();
                None
            }
        }
    }

    /// Argument list with the `(` already consumed; consumes the `)`.
    pub(crate) fn parse_call_args(&mut self) -> Option<Vec<Expr>> {
        let mut args = Vec::new();
        if self.kind() != TokenKind::RParen {
            loop {
                args.push(self.parse_expr()?);
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "')'")?;
        Some(args)
    }

    /// `[ expr, … ]`
    fn parse_list_literal(&mut self) -> Option<Expr> {
        let open = self.bump();
        let mut elements = Vec::new();
        if self.kind() != TokenKind::RBracket {
            loop {
                elements.push(self.parse_expr()?);
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBracket, "']'")?;
        Some(Expr::List(elements, open.span))
    }

    /// `{ "clave": expr, … }` - keys are string literals.
    ///
    /// Empty and non-empty maps produce the same node kind.
    fn parse_map_literal(&mut self) -> Option<Expr> {
        let open = self.bump();
        let mut entries = Vec::new();
        if self.kind() != TokenKind::RBrace {
            loop {
                let key_token = self.expect(TokenKind::Str, "una clave de texto")?;
                let key_value = match key_token.value {
                    TokenValue::Str(s) => s,
                    _ => String::new(),
                };
                let key = Expr::Str(key_value, key_token.span);
                self.expect(TokenKind::Colon, "':'")?;
                let value = self.parse_expr()?;
                entries.push((key, value));
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Some(Expr::Map(entries, open.span))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::parse_source;

    fn expr_of(source: &str) -> Expr {
        let (program, errors) = parse_source(source);
        assert!(errors.is_empty(), "unexpected syntax errors: {errors:?}");
        match program.statements.into_iter().next() {
            Some(Stmt::VarDecl(decl)) => decl.init.expect("initializer"),
            other => panic!("expected a declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        let Expr::Binary(add) = expr_of("var r = a + b * c;") else {
            panic!("expected binary");
        };
        assert_eq!(add.op, BinOp::Add);
        let Expr::Binary(mul) = *add.rhs else {
            panic!("expected nested binary");
        };
        assert_eq!(mul.op, BinOp::Mul);
    }

    #[test]
    fn test_left_associativity() {
        let Expr::Binary(outer) = expr_of("var r = a - b - c;") else {
            panic!("expected binary");
        };
        assert_eq!(outer.op, BinOp::Sub);
        let Expr::Binary(inner) = *outer.lhs else {
            panic!("expected nested binary on the left");
        };
        assert_eq!(inner.op, BinOp::Sub);
    }

    #[test]
    fn test_if_null_is_loosest() {
        let Expr::Binary(outer) = expr_of("var r = a ?? b || c;") else {
            panic!("expected binary");
        };
        assert_eq!(outer.op, BinOp::IfNull);
        let Expr::Binary(rhs) = *outer.rhs else {
            panic!("expected nested binary");
        };
        assert_eq!(rhs.op, BinOp::Or);
    }

    #[test]
    fn test_comparison_and_logic_layers() {
        // (a < b) && (c == d)
        let Expr::Binary(and) = expr_of("var r = a < b && c == d;") else {
            panic!("expected binary");
        };
        assert_eq!(and.op, BinOp::And);
        let Expr::Binary(lt) = *and.lhs else {
            panic!();
        };
        assert_eq!(lt.op, BinOp::Lt);
        let Expr::Binary(eq) = *and.rhs else {
            panic!();
        };
        assert_eq!(eq.op, BinOp::Eq);
    }

    #[test]
    fn test_parentheses_override_precedence() {
        let Expr::Binary(mul) = expr_of("var r = (a + b) * c;") else {
            panic!("expected binary");
        };
        assert_eq!(mul.op, BinOp::Mul);
        let Expr::Binary(add) = *mul.lhs else {
            panic!("expected parenthesized addition");
        };
        assert_eq!(add.op, BinOp::Add);
    }

    #[test]
    fn test_trunc_div_is_multiplicative() {
        let Expr::Binary(add) = expr_of("var r = a + b ~/ c;") else {
            panic!("expected binary");
        };
        assert_eq!(add.op, BinOp::Add);
        let Expr::Binary(div) = *add.rhs else {
            panic!();
        };
        assert_eq!(div.op, BinOp::TruncDiv);
    }

    #[test]
    fn test_operator_span_is_operator_position() {
        // The '+' sits at byte 10, line 1, column 11.
        let source = "var r = ab + cd;";
        let offset = source.find('+').unwrap();
        let Expr::Binary(add) = expr_of(source) else {
            panic!("expected binary");
        };
        assert_eq!(add.span.start, offset);
        assert_eq!(add.span.column as usize, offset + 1);
    }

    #[test]
    fn test_literals() {
        assert!(matches!(expr_of("var r = 42;"), Expr::Int(42, _)));
        assert!(matches!(expr_of("var r = 2.5;"), Expr::Double(_, _)));
        assert!(matches!(expr_of("var r = true;"), Expr::Bool(true, _)));
        assert!(matches!(expr_of("var r = null;"), Expr::Null(_)));
        let Expr::Str(s, _) = expr_of("var r = \"hola\";") else {
            panic!("expected string literal");
        };
        assert_eq!(s, "hola");
    }

    #[test]
    fn test_list_literal() {
        let Expr::List(elements, _) = expr_of("var r = [1, 2, 3];") else {
            panic!("expected list");
        };
        assert_eq!(elements.len(), 3);
        assert!(matches!(expr_of("var r = [];"), Expr::List(ref e, _) if e.is_empty()));
    }

    #[test]
    fn test_map_literal_empty_and_full_same_kind() {
        let empty = expr_of("var r = {};");
        let full = expr_of("var r = {\"a\": 1, \"b\": 2};");
        assert!(matches!(empty, Expr::Map(ref e, _) if e.is_empty()));
        let Expr::Map(entries, _) = full else {
            panic!("expected map");
        };
        assert_eq!(entries.len(), 2);
        assert!(matches!(entries[0].0, Expr::Str(_, _)));
    }

    #[test]
    fn test_call_with_args() {
        let Expr::Call(call) = expr_of("var r = suma(1, 2);") else {
            panic!("expected call");
        };
        assert_eq!(call.callee, "suma");
        assert_eq!(call.args.len(), 2);
    }

    #[test]
    fn test_map_key_must_be_string() {
        let (_, errors) = parse_source("var r = {x: 1};");
        assert!(!errors.is_empty());
        assert!(errors[0].message.contains("una clave de texto"));
    }
}
