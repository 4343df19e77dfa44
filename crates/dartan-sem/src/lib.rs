//! dartan-sem - Semantic analyzer for the Dart subset.
//!
//! Walks the AST produced by `dartan-par` enforcing name, type,
//! mutability, return-coverage, loop-context and null-awareness rules.
//! The AST is never mutated; all findings are
//! [`Diagnostic`](dartan_util::Diagnostic)s.
//!
//! The analysis is two phases over the same tree:
//!
//! 1. A structural walk that manages the scope stack, registers
//!    functions at header sight, and performs declaration-time checks
//!    (redeclaration, missing initializers, initializer compatibility,
//!    assignment rules, return coverage).
//! 2. A whole-tree walk, after the function table is complete, for the
//!    checks that would otherwise fire on forward references: operand
//!    typing of every binary operation, identifier existence at
//!    expression position, `break`/`continue` loop context and the
//!    print-name rule. This walk rebuilds the same scopes silently so
//!    names resolve exactly as they did in phase one.
//!
//! All state lives in the [`SemanticAnalyzer`] instance; a fresh
//! instance per analysis is what makes runs independent.
//!
//! # Example
//!
//! ```
//! use dartan_sem::analyze_source;
//!
//! let errors = analyze_source("final int k = 1; k = 2;");
//! assert_eq!(errors.len(), 1);
//! assert!(errors[0].message.contains("inmutable"));
//! ```

pub mod infer;
pub mod scope;
pub mod types;

mod analysis;
mod edge_cases;

pub use infer::infer_type;
pub use scope::{ScopeStack, VarInfo};
pub use types::{can_implicitly_convert, FnSig, FunctionTable, Ty};

use dartan_par::ast::*;
use dartan_par::parse_source;
use dartan_util::{Diagnostic, Handler};

use crate::analysis::TreeValidator;
use crate::infer::declaration_type;

/// Analyze a parsed program, returning its semantic diagnostics in
/// source order.
pub fn analyze(program: &Program) -> Vec<Diagnostic> {
    SemanticAnalyzer::new().analyze(program)
}

/// Convenience: parse and analyze in one step, returning only the
/// semantic diagnostics.
pub fn analyze_source(source: &str) -> Vec<Diagnostic> {
    let (program, _) = parse_source(source);
    analyze(&program)
}

/// Return-coverage predicate: does every terminal path through the
/// statement list end in a `return`?
///
/// A free `return` in the list satisfies it. An `if` satisfies it only
/// when the then-branch, every `else if` branch and a final `else` all
/// do; without a final `else` some path falls through.
pub fn has_return_in_all_paths(statements: &[Stmt]) -> bool {
    for stmt in statements {
        match stmt {
            Stmt::Return(_) => return true,
            Stmt::If(if_stmt) if if_returns(if_stmt) => return true,
            Stmt::Block(block) if has_return_in_all_paths(&block.statements) => return true,
            _ => {}
        }
    }
    false
}

fn if_returns(if_stmt: &IfStmt) -> bool {
    if !block_returns(&if_stmt.then_block) {
        return false;
    }
    match &if_stmt.else_arm {
        None => false,
        Some(ElseArm::Else(block)) => block_returns(block),
        Some(ElseArm::Elif(next)) => if_returns(next),
    }
}

fn block_returns(block: &StmtBlock) -> bool {
    has_return_in_all_paths(block.statements())
}

/// The semantic pass. One instance per analysis; construction resets
/// every table.
pub struct SemanticAnalyzer {
    scopes: ScopeStack,
    functions: FunctionTable,
    handler: Handler,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self {
            scopes: ScopeStack::new(),
            functions: FunctionTable::new(),
            handler: Handler::new(),
        }
    }

    /// Run both phases and yield the diagnostics, stably sorted by
    /// line so the merged output reads in source order.
    pub fn analyze(mut self, program: &Program) -> Vec<Diagnostic> {
        self.walk_statements(&program.statements);
        debug_assert_eq!(
            self.scopes.depth(),
            1,
            "scope stack must unwind to the global frame"
        );

        TreeValidator::new(&self.functions, &self.handler).validate(program);

        let mut diagnostics = self.handler.into_diagnostics();
        diagnostics.sort_by_key(|d| d.line);
        diagnostics
    }

    fn report(&self, line: u32, message: String) {
        self.handler.emit(Diagnostic::semantic(line, message));
    }

    // =========================================================================
    // PHASE ONE: STRUCTURAL WALK
    // =========================================================================

    fn walk_statements(&mut self, statements: &[Stmt]) {
        for stmt in statements {
            self.walk_stmt(stmt);
        }
    }

    fn walk_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl(decl) => self.register_variable(decl),
            Stmt::Assign(assign) => self.validate_assignment(assign),

            Stmt::If(if_stmt) => self.walk_if(if_stmt),
            Stmt::While(while_stmt) => self.walk_block(&while_stmt.body),
            Stmt::DoWhile(do_while) => self.walk_block(&do_while.body),
            Stmt::For(for_stmt) => self.walk_for(for_stmt),
            Stmt::ForIn(for_in) => self.walk_for_in(for_in),

            Stmt::Function(function) => {
                self.declare_function(
                    &function.name,
                    Ty::from_name(&function.return_type),
                    &function.params,
                    function.span.line,
                );
                if !has_return_in_all_paths(&function.body) {
                    self.report(
                        function.span.line,
                        format!(
                            "Línea {}: la función '{}' debe retornar '{}' en todos los caminos",
                            function.span.line, function.name, function.return_type
                        ),
                    );
                }
                self.walk_function_body(&function.params, &function.body);
            }
            Stmt::FunctionVoid(function) => {
                self.declare_function(
                    &function.name,
                    Ty::from_name("void"),
                    &function.params,
                    function.span.line,
                );
                self.walk_function_body(&function.params, &function.body);
            }
            Stmt::ArrowFunction(function) => {
                // An arrow body is its own return; no coverage check.
                self.declare_function(
                    &function.name,
                    Ty::from_name(&function.return_type),
                    &function.params,
                    function.span.line,
                );
            }

            Stmt::Class(class) => {
                self.scopes.enter_scope();
                self.walk_statements(&class.members);
                self.scopes.exit_scope();
            }
            Stmt::Block(block) => {
                self.scopes.enter_scope();
                self.walk_statements(&block.statements);
                self.scopes.exit_scope();
            }

            // Expression-level rules run in the whole-tree phase.
            Stmt::Break(_)
            | Stmt::Continue(_)
            | Stmt::Return(_)
            | Stmt::Print(_)
            | Stmt::Expr(_) => {}
        }
    }

    fn walk_if(&mut self, if_stmt: &IfStmt) {
        self.walk_block(&if_stmt.then_block);
        match &if_stmt.else_arm {
            Some(ElseArm::Elif(next)) => self.walk_if(next),
            Some(ElseArm::Else(block)) => self.walk_block(block),
            None => {}
        }
    }

    /// A `for` gets one scope for its whole header-plus-body, so the
    /// loop variable of one loop never collides with the next loop's.
    fn walk_for(&mut self, for_stmt: &ForStmt) {
        self.scopes.enter_scope();
        if let Some(init) = &for_stmt.init {
            self.walk_stmt(init);
        }
        if let Some(update) = &for_stmt.update {
            self.walk_stmt(update);
        }
        self.walk_block(&for_stmt.body);
        self.scopes.exit_scope();
    }

    fn walk_for_in(&mut self, for_in: &ForInStmt) {
        self.scopes.enter_scope();
        if for_in.declares_iterator {
            // The element type of the iterable is not tracked.
            self.scopes
                .declare(for_in.iterator.clone(), VarInfo::mutable(Ty::Dynamic));
        } else {
            let line = for_in.span.line;
            match self.scopes.lookup(&for_in.iterator) {
                None => self.report(
                    line,
                    format!(
                        "Línea {}: asignación a identificador no declarado '{}'",
                        line, for_in.iterator
                    ),
                ),
                Some(info) if info.is_immutable() => self.report(
                    line,
                    format!(
                        "Línea {}: no se puede asignar a la variable inmutable '{}'",
                        line, for_in.iterator
                    ),
                ),
                Some(_) => {}
            }
        }
        self.walk_block(&for_in.body);
        self.scopes.exit_scope();
    }

    /// Only the braced form opens a scope of its own.
    fn walk_block(&mut self, block: &StmtBlock) {
        match block {
            StmtBlock::Block(statements, _) => {
                self.scopes.enter_scope();
                self.walk_statements(statements);
                self.scopes.exit_scope();
            }
            StmtBlock::Single(stmt) => self.walk_stmt(stmt),
        }
    }

    /// Register a function at header sight, so its body (and anything
    /// after it) can call it, recursion included.
    ///
    /// A repeated name overwrites the previous entry.
    fn declare_function(&mut self, name: &str, return_type: Ty, params: &[Param], line: u32) {
        let params = params
            .iter()
            .map(|p| (Ty::from_name(&p.ty), p.name.clone()))
            .collect();
        self.functions.insert(
            name.to_string(),
            FnSig {
                return_type,
                params,
                line,
            },
        );
    }

    /// Parameters are final bindings in the function's scope.
    fn walk_function_body(&mut self, params: &[Param], body: &[Stmt]) {
        self.scopes.enter_scope();
        for param in params {
            self.scopes.declare(
                param.name.clone(),
                VarInfo::final_binding(Ty::from_name(&param.ty)),
            );
        }
        self.walk_statements(body);
        self.scopes.exit_scope();
    }

    // =========================================================================
    // DECLARATION-TIME CHECKS
    // =========================================================================

    fn register_variable(&mut self, decl: &VarDeclStmt) {
        let line = decl.span.line;

        if self.scopes.is_declared_in_current(&decl.name) {
            self.report(
                line,
                format!(
                    "Línea {}: variable '{}' ya declarada en este ámbito",
                    line, decl.name
                ),
            );
            return;
        }

        let is_final = decl.declarator == Declarator::Final;
        let is_const = decl.declarator == Declarator::Const;

        if (is_final || is_const) && decl.init.is_none() {
            let word = if is_final { "final" } else { "const" };
            self.report(
                line,
                format!(
                    "Línea {}: la variable {} '{}' debe ser inicializada",
                    line, word, decl.name
                ),
            );
        }

        if let Declarator::Typed(type_name) = &decl.declarator {
            let declared = Ty::from_name(type_name);
            if let Some(init) = &decl.init {
                let et = infer_type(init, &self.scopes, &self.functions);
                // Unknown would be a forward-reference false positive;
                // dynamic is exempt from static checking.
                if !et.is_unchecked() && !can_implicitly_convert(&et, &declared) {
                    if et.is_numeric() && declared.is_numeric() {
                        self.report(
                            line,
                            format!(
                                "Línea {}: '{}' a '{}' puede requerir conversión explícita (cast)",
                                line, et, declared
                            ),
                        );
                    } else {
                        self.report(
                            line,
                            format!(
                                "Línea {}: inicialización incompatible: no se puede asignar '{}' a '{}'",
                                line, et, declared
                            ),
                        );
                    }
                }
            }
        }

        let ty = declaration_type(decl, &self.scopes, &self.functions);
        self.scopes.declare(
            decl.name.clone(),
            VarInfo {
                ty,
                is_final,
                is_const,
            },
        );
    }

    fn validate_assignment(&mut self, assign: &AssignStmt) {
        let line = assign.span.line;

        let info = match self.scopes.lookup(&assign.name) {
            Some(info) => info,
            None => {
                self.report(
                    line,
                    format!(
                        "Línea {}: asignación a identificador no declarado '{}'",
                        line, assign.name
                    ),
                );
                return;
            }
        };

        if info.is_immutable() {
            self.report(
                line,
                format!(
                    "Línea {}: no se puede asignar a la variable inmutable '{}'",
                    line, assign.name
                ),
            );
            return;
        }

        let dt = info.ty.clone();
        let et = infer_type(&assign.value, &self.scopes, &self.functions);
        if dt.is_unchecked() || et.is_unchecked() {
            return;
        }

        if dt.is_numeric() && et.is_numeric() {
            if et == Ty::Double && dt == Ty::Int {
                self.report(
                    line,
                    format!(
                        "Línea {}: asignar 'double' a 'int' puede requerir conversión explícita (cast)",
                        line
                    ),
                );
            }
            return;
        }

        if et == dt {
            return;
        }

        if dt == Ty::Str || dt == Ty::Bool {
            self.report(
                line,
                format!("Línea {}: no se puede asignar '{}' a '{}'", line, et, dt),
            );
            return;
        }

        if !can_implicitly_convert(&et, &dt) {
            self.report(
                line,
                format!(
                    "Línea {}: '{}' no se convierte implícitamente a '{}'",
                    line, et, dt
                ),
            );
        }
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
