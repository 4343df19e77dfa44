//! Statement parsing - declarations, control flow, functions, classes.

use dartan_lex::TokenKind;

use crate::ast::*;
use crate::Parser;

impl<'a> Parser<'a> {
    /// Parse a statement.
    ///
    /// Statements starting with an identifier need two tokens of
    /// lookahead: `tipo ID (` is a function header, `tipo ID` a typed
    /// declaration, `ID =` an assignment and `ID (` a call statement.
    pub(crate) fn parse_stmt(&mut self) -> Option<Stmt> {
        match self.kind() {
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::Do => self.parse_do_while_stmt(),
            TokenKind::For => self.parse_for_stmt(),
            TokenKind::Break => self.parse_break_stmt(),
            TokenKind::Continue => self.parse_continue_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Class => self.parse_class_stmt(),
            TokenKind::Var | TokenKind::Final | TokenKind::Const => self.parse_var_decl(true),
            TokenKind::Void => self.parse_function_stmt(),
            TokenKind::Dynamic => {
                if self.peek_kind(1) == TokenKind::Ident && self.peek_kind(2) == TokenKind::LParen
                {
                    self.parse_function_stmt()
                } else {
                    self.parse_var_decl(true)
                }
            }
            TokenKind::LBrace => self.parse_block_stmt(),
            TokenKind::Ident => {
                if self.peek_kind(1) == TokenKind::Ident {
                    if self.peek_kind(2) == TokenKind::LParen {
                        self.parse_function_stmt()
                    } else {
                        self.parse_var_decl(true)
                    }
                } else if self.peek_kind(1) == TokenKind::Eq {
                    self.parse_assign(true)
                } else if self.peek_kind(1) == TokenKind::LParen {
                    self.parse_call_stmt()
                } else {
                    self.parse_expr_stmt()
                }
            }
            _ => self.parse_expr_stmt(),
        }
    }

    /// Parse the statements of a braced region up to the closing `}`.
    ///
    /// Failed statements are dropped after resynchronization; the brace
    /// itself is left for the caller to consume.
    pub(crate) fn parse_block_statements(&mut self) -> Vec<Stmt> {
        let mut statements = Vec::new();
        while !self.is_at_end() && self.kind() != TokenKind::RBrace {
            let before = self.position();
            match self.parse_stmt() {
                Some(stmt) => statements.push(stmt),
                None => {
                    if self.position() == before {
                        self.advance();
                    }
                    self.recover_to_sync_point();
                }
            }
        }
        statements
    }

    /// Statement block: `{ … }` or a single bare statement.
    pub(crate) fn parse_stmt_block(&mut self) -> Option<StmtBlock> {
        if self.kind() == TokenKind::LBrace {
            let open = self.bump();
            let statements = self.parse_block_statements();
            self.expect(TokenKind::RBrace, "'}'")?;
            Some(StmtBlock::Block(statements, open.span))
        } else {
            Some(StmtBlock::Single(Box::new(self.parse_stmt()?)))
        }
    }

    /// Variable declaration. `require_semi` is false inside `for`
    /// headers.
    ///
    /// `final`/`const` may be followed by an explicit type
    /// (`final int k = 1;`); the binding stays immutable and its type is
    /// inferred from the initializer, so the type word is only consumed.
    pub(crate) fn parse_var_decl(&mut self, require_semi: bool) -> Option<Stmt> {
        let decl_token = self.bump();
        let declarator = match decl_token.kind {
            TokenKind::Var => Declarator::Var,
            TokenKind::Final => Declarator::Final,
            TokenKind::Const => Declarator::Const,
            _ => Declarator::Typed(decl_token.lexeme.clone()),
        };

        if !matches!(declarator, Declarator::Typed(_))
            && self.kind() == TokenKind::Ident
            && self.peek_kind(1) == TokenKind::Ident
        {
            self.advance(); // the optional type word
        }

        let name = self.expect(TokenKind::Ident, "un identificador")?;
        let init = if self.match_kind(TokenKind::Eq) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        if require_semi {
            self.expect(TokenKind::Semicolon, "';'")?;
        }

        Some(Stmt::VarDecl(VarDeclStmt {
            declarator,
            name: name.lexeme,
            init,
            span: decl_token.span,
        }))
    }

    /// Assignment. `require_semi` is false inside `for` headers and
    /// updates.
    pub(crate) fn parse_assign(&mut self, require_semi: bool) -> Option<Stmt> {
        let name = self.bump();
        self.expect(TokenKind::Eq, "'='")?;
        let value = self.parse_expr()?;
        if require_semi {
            self.expect(TokenKind::Semicolon, "';'")?;
        }
        Some(Stmt::Assign(AssignStmt {
            name: name.lexeme,
            value,
            span: name.span,
        }))
    }

    fn parse_if_stmt(&mut self) -> Option<Stmt> {
        Some(Stmt::If(self.parse_if()?))
    }

    /// `if (cond) block [else if … | else block]`.
    ///
    /// Recursing for `else if` makes every `else` bind to the nearest
    /// open `if`.
    fn parse_if(&mut self) -> Option<IfStmt> {
        let if_token = self.expect(TokenKind::If, "'if'")?;
        self.expect(TokenKind::LParen, "'('")?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RParen, "')'")?;
        let then_block = self.parse_stmt_block()?;

        let else_arm = if self.match_kind(TokenKind::Else) {
            if self.kind() == TokenKind::If {
                Some(ElseArm::Elif(Box::new(self.parse_if()?)))
            } else {
                Some(ElseArm::Else(self.parse_stmt_block()?))
            }
        } else {
            None
        };

        Some(IfStmt {
            cond,
            then_block,
            else_arm,
            span: if_token.span,
        })
    }

    fn parse_while_stmt(&mut self) -> Option<Stmt> {
        let while_token = self.bump();
        self.expect(TokenKind::LParen, "'('")?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RParen, "')'")?;
        let body = self.parse_stmt_block()?;
        Some(Stmt::While(WhileStmt {
            cond,
            body,
            span: while_token.span,
        }))
    }

    fn parse_do_while_stmt(&mut self) -> Option<Stmt> {
        let do_token = self.bump();
        let body = self.parse_stmt_block()?;
        self.expect(TokenKind::While, "'while'")?;
        self.expect(TokenKind::LParen, "'('")?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RParen, "')'")?;
        self.expect(TokenKind::Semicolon, "';'")?;
        Some(Stmt::DoWhile(DoWhileStmt {
            body,
            cond,
            span: do_token.span,
        }))
    }

    /// `for` dispatches between the three-part header and `for-in` by
    /// lookahead right after the `(`.
    fn parse_for_stmt(&mut self) -> Option<Stmt> {
        let for_token = self.bump();
        self.expect(TokenKind::LParen, "'('")?;

        // `for (var x in …)`
        if self.kind() == TokenKind::Var
            && self.peek_kind(1) == TokenKind::Ident
            && self.peek_kind(2) == TokenKind::In
        {
            self.advance();
            let iterator = self.bump();
            self.advance(); // `in`
            let iterable = self.parse_expr()?;
            self.expect(TokenKind::RParen, "')'")?;
            let body = self.parse_stmt_block()?;
            return Some(Stmt::ForIn(ForInStmt {
                declares_iterator: true,
                iterator: iterator.lexeme,
                iterable,
                body,
                span: for_token.span,
            }));
        }

        // `for (x in …)`
        if self.kind() == TokenKind::Ident && self.peek_kind(1) == TokenKind::In {
            let iterator = self.bump();
            self.advance(); // `in`
            let iterable = self.parse_expr()?;
            self.expect(TokenKind::RParen, "')'")?;
            let body = self.parse_stmt_block()?;
            return Some(Stmt::ForIn(ForInStmt {
                declares_iterator: false,
                iterator: iterator.lexeme,
                iterable,
                body,
                span: for_token.span,
            }));
        }

        let init = if self.kind() == TokenKind::Semicolon {
            None
        } else {
            Some(Box::new(self.parse_for_init()?))
        };
        self.expect(TokenKind::Semicolon, "';'")?;

        let cond = if self.kind() == TokenKind::Semicolon {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Semicolon, "';'")?;

        let update = if self.kind() == TokenKind::RParen {
            None
        } else {
            Some(Box::new(self.parse_for_update()?))
        };
        self.expect(TokenKind::RParen, "')'")?;

        let body = self.parse_stmt_block()?;
        Some(Stmt::For(ForStmt {
            init,
            cond,
            update,
            body,
            span: for_token.span,
        }))
    }

    fn parse_for_init(&mut self) -> Option<Stmt> {
        match self.kind() {
            TokenKind::Var | TokenKind::Final | TokenKind::Const | TokenKind::Dynamic => {
                self.parse_var_decl(false)
            }
            TokenKind::Ident if self.peek_kind(1) == TokenKind::Ident => {
                self.parse_var_decl(false)
            }
            TokenKind::Ident if self.peek_kind(1) == TokenKind::Eq => self.parse_assign(false),
            _ => {
                self.error_expected("una declaración o asignación");
                None
            }
        }
    }

    fn parse_for_update(&mut self) -> Option<Stmt> {
        if self.kind() == TokenKind::Ident && self.peek_kind(1) == TokenKind::Eq {
            self.parse_assign(false)
        } else {
            self.error_expected("una asignación");
            None
        }
    }

    fn parse_break_stmt(&mut self) -> Option<Stmt> {
        let token = self.bump();
        self.expect(TokenKind::Semicolon, "';'")?;
        Some(Stmt::Break(token.span))
    }

    fn parse_continue_stmt(&mut self) -> Option<Stmt> {
        let token = self.bump();
        self.expect(TokenKind::Semicolon, "';'")?;
        Some(Stmt::Continue(token.span))
    }

    fn parse_return_stmt(&mut self) -> Option<Stmt> {
        let return_token = self.bump();
        let value = if self.kind() == TokenKind::Semicolon {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Semicolon, "';'")?;
        Some(Stmt::Return(ReturnStmt {
            value,
            span: return_token.span,
        }))
    }

    /// Function with an explicit return type (`tipo`, `void` or
    /// `dynamic`), either a braced body or an arrow body.
    fn parse_function_stmt(&mut self) -> Option<Stmt> {
        let ret_token = self.bump();
        let return_type = ret_token.lexeme.clone();
        let name = self.expect(TokenKind::Ident, "el nombre de la función")?;
        self.expect(TokenKind::LParen, "'('")?;
        let params = self.parse_params()?;

        if self.match_kind(TokenKind::FatArrow) {
            let expr = self.parse_expr()?;
            self.expect(TokenKind::Semicolon, "';'")?;
            return Some(Stmt::ArrowFunction(ArrowFunctionStmt {
                return_type,
                name: name.lexeme,
                params,
                expr,
                span: ret_token.span,
            }));
        }

        self.expect(TokenKind::LBrace, "'{'")?;
        let body = self.parse_block_statements();
        self.expect(TokenKind::RBrace, "'}'")?;

        if ret_token.kind == TokenKind::Void {
            Some(Stmt::FunctionVoid(FunctionVoidStmt {
                name: name.lexeme,
                params,
                body,
                span: ret_token.span,
            }))
        } else {
            Some(Stmt::Function(FunctionStmt {
                return_type,
                name: name.lexeme,
                params,
                body,
                span: ret_token.span,
            }))
        }
    }

    /// Parameter list, consuming the closing `)`.
    fn parse_params(&mut self) -> Option<Vec<Param>> {
        let mut params = Vec::new();
        if self.kind() != TokenKind::RParen {
            loop {
                let ty = match self.kind() {
                    TokenKind::Ident | TokenKind::Dynamic => self.bump(),
                    _ => {
                        self.error_expected("el tipo del parámetro");
                        return None;
                    }
                };
                let name = self.expect(TokenKind::Ident, "el nombre del parámetro")?;
                params.push(Param {
                    ty: ty.lexeme,
                    name: name.lexeme,
                    span: ty.span,
                });
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "')'")?;
        Some(params)
    }

    fn parse_class_stmt(&mut self) -> Option<Stmt> {
        let class_token = self.bump();
        let name = self.expect(TokenKind::Ident, "el nombre de la clase")?;
        self.expect(TokenKind::LBrace, "'{'")?;

        let mut members = Vec::new();
        while !self.is_at_end() && self.kind() != TokenKind::RBrace {
            let before = self.position();
            match self.parse_class_member() {
                Some(member) => members.push(member),
                None => {
                    if self.position() == before {
                        self.advance();
                    }
                    self.recover_to_sync_point();
                }
            }
        }
        self.expect(TokenKind::RBrace, "'}'")?;

        Some(Stmt::Class(ClassStmt {
            name: name.lexeme,
            members,
            span: class_token.span,
        }))
    }

    /// Class member: variable declaration or function.
    fn parse_class_member(&mut self) -> Option<Stmt> {
        match self.kind() {
            TokenKind::Var | TokenKind::Final | TokenKind::Const => self.parse_var_decl(true),
            TokenKind::Void => self.parse_function_stmt(),
            TokenKind::Dynamic | TokenKind::Ident => {
                if self.peek_kind(1) == TokenKind::Ident && self.peek_kind(2) == TokenKind::LParen
                {
                    self.parse_function_stmt()
                } else {
                    self.parse_var_decl(true)
                }
            }
            _ => {
                self.error_expected("un miembro de clase");
                None
            }
        }
    }

    /// Statement of shape `ID ( args ) ;`.
    ///
    /// A single argument is the print shape and gets its own node; any
    /// other arity is an ordinary expression statement.
    fn parse_call_stmt(&mut self) -> Option<Stmt> {
        let name = self.bump();
        self.advance(); // `(`, guaranteed by the dispatch lookahead
        let mut args = self.parse_call_args()?;
        self.expect(TokenKind::Semicolon, "';'")?;

        if args.len() == 1 {
            if let Some(arg) = args.pop() {
                return Some(Stmt::Print(PrintStmt {
                    callee: name.lexeme,
                    arg,
                    span: name.span,
                }));
            }
        }
        Some(Stmt::Expr(Expr::Call(CallExpr {
            callee: name.lexeme,
            args,
            span: name.span,
        })))
    }

    fn parse_block_stmt(&mut self) -> Option<Stmt> {
        let open = self.bump();
        let statements = self.parse_block_statements();
        self.expect(TokenKind::RBrace, "'}'")?;
        Some(Stmt::Block(BlockStmt {
            statements,
            span: open.span,
        }))
    }

    fn parse_expr_stmt(&mut self) -> Option<Stmt> {
        let expr = self.parse_expr()?;
        self.expect(TokenKind::Semicolon, "';'")?;
        Some(Stmt::Expr(expr))
    }
}
