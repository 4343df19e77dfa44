//! Whole-tree validations, run once the AST and function table are
//! complete.
//!
//! Checking expressions during the declaring walk would flag forward
//! references that are perfectly valid (a call to a function declared
//! further down, for instance). This walker therefore runs afterwards,
//! over the finished function table, and rebuilds the same scope shape
//! silently so identifiers resolve exactly as they did while
//! declaring. It owns four rules:
//!
//! - `break`/`continue` must be inside a loop (function bodies reset
//!   the loop context)
//! - every binary operation must satisfy its operand typing rule
//! - an identifier at expression position must name a visible variable
//!   or a declared function
//! - a call-shaped statement must target `print` or a declared function

use dartan_par::ast::*;
use dartan_util::{Diagnostic, Handler};

use crate::infer::{declaration_type, infer_type};
use crate::scope::{ScopeStack, VarInfo};
use crate::types::{FunctionTable, Ty};

pub(crate) struct TreeValidator<'a> {
    /// Mirrored scope stack; declarations here never diagnose.
    scopes: ScopeStack,
    functions: &'a FunctionTable,
    handler: &'a Handler,
}

impl<'a> TreeValidator<'a> {
    pub(crate) fn new(functions: &'a FunctionTable, handler: &'a Handler) -> Self {
        Self {
            scopes: ScopeStack::new(),
            functions,
            handler,
        }
    }

    pub(crate) fn validate(&mut self, program: &Program) {
        self.check_statements(&program.statements, false);
    }

    fn report(&self, line: u32, message: String) {
        self.handler.emit(Diagnostic::semantic(line, message));
    }

    fn check_statements(&mut self, statements: &[Stmt], in_loop: bool) {
        for stmt in statements {
            self.check_stmt(stmt, in_loop);
        }
    }

    fn check_stmt(&mut self, stmt: &Stmt, in_loop: bool) {
        match stmt {
            Stmt::VarDecl(decl) => {
                if let Some(init) = &decl.init {
                    self.check_expr(init);
                }
                let ty = declaration_type(decl, &self.scopes, self.functions);
                self.scopes.declare(
                    decl.name.clone(),
                    VarInfo {
                        ty,
                        is_final: decl.declarator == Declarator::Final,
                        is_const: decl.declarator == Declarator::Const,
                    },
                );
            }
            Stmt::Assign(assign) => self.check_expr(&assign.value),

            Stmt::If(if_stmt) => self.check_if(if_stmt, in_loop),
            Stmt::While(while_stmt) => {
                self.check_expr(&while_stmt.cond);
                self.check_block(&while_stmt.body, true);
            }
            Stmt::DoWhile(do_while) => {
                self.check_block(&do_while.body, true);
                self.check_expr(&do_while.cond);
            }
            Stmt::For(for_stmt) => {
                self.scopes.enter_scope();
                if let Some(init) = &for_stmt.init {
                    self.check_stmt(init, in_loop);
                }
                if let Some(cond) = &for_stmt.cond {
                    self.check_expr(cond);
                }
                if let Some(update) = &for_stmt.update {
                    self.check_stmt(update, in_loop);
                }
                self.check_block(&for_stmt.body, true);
                self.scopes.exit_scope();
            }
            Stmt::ForIn(for_in) => {
                self.scopes.enter_scope();
                // Also bound in the undeclared-iterator case: the
                // declaring walk already reported that, and a binding
                // suppresses cascading lookups in the body.
                if for_in.declares_iterator || self.scopes.lookup(&for_in.iterator).is_none() {
                    self.scopes
                        .declare(for_in.iterator.clone(), VarInfo::mutable(Ty::Dynamic));
                }
                self.check_expr(&for_in.iterable);
                self.check_block(&for_in.body, true);
                self.scopes.exit_scope();
            }

            Stmt::Break(span) => {
                if !in_loop {
                    self.report(
                        span.line,
                        format!("Línea {}: 'break' fuera de un bucle", span.line),
                    );
                }
            }
            Stmt::Continue(span) => {
                if !in_loop {
                    self.report(
                        span.line,
                        format!("Línea {}: 'continue' fuera de un bucle", span.line),
                    );
                }
            }

            Stmt::Function(function) => {
                self.check_function_body(&function.params, &function.body);
            }
            Stmt::FunctionVoid(function) => {
                self.check_function_body(&function.params, &function.body);
            }
            Stmt::ArrowFunction(function) => {
                self.scopes.enter_scope();
                self.declare_params(&function.params);
                self.check_expr(&function.expr);
                self.scopes.exit_scope();
            }

            Stmt::Return(ret) => {
                if let Some(value) = &ret.value {
                    self.check_expr(value);
                }
            }

            Stmt::Print(print) => {
                self.check_print(print);
                self.check_expr(&print.arg);
            }

            Stmt::Class(class) => {
                self.scopes.enter_scope();
                self.check_statements(&class.members, false);
                self.scopes.exit_scope();
            }
            Stmt::Block(block) => {
                self.scopes.enter_scope();
                self.check_statements(&block.statements, in_loop);
                self.scopes.exit_scope();
            }

            Stmt::Expr(expr) => self.check_expr(expr),
        }
    }

    fn check_if(&mut self, if_stmt: &IfStmt, in_loop: bool) {
        self.check_expr(&if_stmt.cond);
        self.check_block(&if_stmt.then_block, in_loop);
        match &if_stmt.else_arm {
            Some(ElseArm::Elif(next)) => self.check_if(next, in_loop),
            Some(ElseArm::Else(block)) => self.check_block(block, in_loop),
            None => {}
        }
    }

    fn check_block(&mut self, block: &StmtBlock, in_loop: bool) {
        match block {
            StmtBlock::Block(statements, _) => {
                self.scopes.enter_scope();
                self.check_statements(statements, in_loop);
                self.scopes.exit_scope();
            }
            StmtBlock::Single(stmt) => self.check_stmt(stmt, in_loop),
        }
    }

    /// A `break` inside a function declared inside a loop does not
    /// belong to that loop.
    fn check_function_body(&mut self, params: &[Param], body: &[Stmt]) {
        self.scopes.enter_scope();
        self.declare_params(params);
        self.check_statements(body, false);
        self.scopes.exit_scope();
    }

    fn declare_params(&mut self, params: &[Param]) {
        for param in params {
            self.scopes.declare(
                param.name.clone(),
                VarInfo::final_binding(Ty::from_name(&param.ty)),
            );
        }
    }

    /// The statement shape `ID ( expr ) ;` accepts `print` and
    /// declared functions; anything else is the print-name error.
    fn check_print(&self, print: &PrintStmt) {
        if print.callee == "print" || self.functions.contains_key(&print.callee) {
            return;
        }
        let line = print.span.line;
        self.report(
            line,
            format!(
                "Línea {}: solo se reconoce la función 'print', se encontró '{}'",
                line, print.callee
            ),
        );
    }

    // =========================================================================
    // EXPRESSION RULES
    // =========================================================================

    fn check_expr(&self, expr: &Expr) {
        match expr {
            Expr::Ident(name, span) => {
                if self.scopes.lookup(name).is_none() && !self.functions.contains_key(name) {
                    self.report(
                        span.line,
                        format!(
                            "Línea {}: identificador no declarado '{}'",
                            span.line, name
                        ),
                    );
                }
            }

            Expr::Binary(binary) => {
                self.check_expr(&binary.lhs);
                self.check_expr(&binary.rhs);
                self.validate_binary(binary);
            }

            Expr::List(elements, _) => {
                for element in elements {
                    self.check_expr(element);
                }
            }
            Expr::Map(entries, _) => {
                for (_, value) in entries {
                    self.check_expr(value);
                }
            }
            Expr::Call(call) => {
                for arg in &call.args {
                    self.check_expr(arg);
                }
            }

            Expr::Input(_)
            | Expr::Int(..)
            | Expr::Double(..)
            | Expr::Str(..)
            | Expr::Bool(..)
            | Expr::Null(_) => {}
        }
    }

    /// Operand typing of one binary node.
    ///
    /// Untypeable operands (`unknown`, `dynamic`) skip the node
    /// entirely rather than risk a false positive.
    fn validate_binary(&self, binary: &BinaryExpr) {
        let lt = infer_type(&binary.lhs, &self.scopes, self.functions);
        let rt = infer_type(&binary.rhs, &self.scopes, self.functions);
        if lt.is_unchecked() || rt.is_unchecked() {
            return;
        }

        let line = binary.span.line;
        let op = binary.op;

        if (lt == Ty::Null || rt == Ty::Null) && !op.tolerates_null() {
            self.report(
                line,
                format!("Línea {}: operación sobre valor null sin verificación", line),
            );
            return;
        }

        if op.is_arithmetic() {
            if op == BinOp::Add && lt == Ty::Str && rt == Ty::Str {
                return;
            }
            if !(lt.is_numeric() && rt.is_numeric()) {
                self.report(
                    line,
                    format!(
                        "Línea {}: operación aritmética '{}' requiere operandos numéricos (se encontró '{}' y '{}')",
                        line, op, lt, rt
                    ),
                );
            }
            return;
        }

        if op.is_logical() {
            if lt != Ty::Bool || rt != Ty::Bool {
                self.report(
                    line,
                    format!(
                        "Línea {}: operador lógico '{}' requiere operandos 'bool' (se encontró '{}' y '{}')",
                        line, op, lt, rt
                    ),
                );
            }
            return;
        }

        if op.is_ordering() && !(lt == rt || (lt.is_numeric() && rt.is_numeric())) {
            self.report(
                line,
                format!(
                    "Línea {}: comparación '{}' entre tipos incompatibles '{}' y '{}'",
                    line, op, lt, rt
                ),
            );
            return;
        }

        // Equality against null is the null-check idiom; other
        // equality mismatches follow the comparison rule.
        if op.is_equality()
            && lt != Ty::Null
            && rt != Ty::Null
            && !(lt == rt || (lt.is_numeric() && rt.is_numeric()))
        {
            self.report(
                line,
                format!(
                    "Línea {}: comparación '{}' entre tipos incompatibles '{}' y '{}'",
                    line, op, lt, rt
                ),
            );
        }
    }
}
