//! AST node definitions for the Dart subset.
//!
//! Nodes are algebraic: every statement and expression form is one
//! variant of [`Stmt`] or [`Expr`], so walkers can match exhaustively
//! and accidental shape changes fail to compile. Nodes are immutable
//! once the parser builds them; the semantic pass only reads them.
//!
//! Every node carries a [`Span`]. Binary expressions additionally carry
//! the span of the operator itself so type diagnostics point at the
//! operator, not at the left operand.

use std::fmt;

use dartan_util::Span;

/// AST root: the statement list of a compilation unit.
#[derive(Debug, Clone)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

/// How a variable declaration introduces its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declarator {
    /// `var`
    Var,
    /// `final`
    Final,
    /// `const`
    Const,
    /// Explicit type name used positionally (`int`, `double`, a user
    /// type, or `dynamic`)
    Typed(String),
}

/// Statement forms of the subset.
#[derive(Debug, Clone)]
pub enum Stmt {
    VarDecl(VarDeclStmt),
    Assign(AssignStmt),
    If(IfStmt),
    While(WhileStmt),
    DoWhile(DoWhileStmt),
    For(ForStmt),
    ForIn(ForInStmt),
    Break(Span),
    Continue(Span),
    Function(FunctionStmt),
    FunctionVoid(FunctionVoidStmt),
    ArrowFunction(ArrowFunctionStmt),
    Return(ReturnStmt),
    Print(PrintStmt),
    Class(ClassStmt),
    Block(BlockStmt),
    Expr(Expr),
}

impl Stmt {
    /// Span of the statement's leading token.
    pub fn span(&self) -> Span {
        match self {
            Stmt::VarDecl(s) => s.span,
            Stmt::Assign(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::DoWhile(s) => s.span,
            Stmt::For(s) => s.span,
            Stmt::ForIn(s) => s.span,
            Stmt::Break(span) | Stmt::Continue(span) => *span,
            Stmt::Function(s) => s.span,
            Stmt::FunctionVoid(s) => s.span,
            Stmt::ArrowFunction(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Print(s) => s.span,
            Stmt::Class(s) => s.span,
            Stmt::Block(s) => s.span,
            Stmt::Expr(e) => e.span(),
        }
    }
}

/// `var|final|const|tipo ID [= Expr] ;`
#[derive(Debug, Clone)]
pub struct VarDeclStmt {
    pub declarator: Declarator,
    pub name: String,
    pub init: Option<Expr>,
    pub span: Span,
}

/// `ID = Expr ;`
#[derive(Debug, Clone)]
pub struct AssignStmt {
    pub name: String,
    pub value: Expr,
    pub span: Span,
}

/// `if (cond) block [else …]`.
///
/// An `else if` chain is encoded through [`ElseArm::Elif`]: the chained
/// `if` hangs off its predecessor, which also gives the nearest-`if`
/// dangling-else resolution for free.
#[derive(Debug, Clone)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_block: StmtBlock,
    pub else_arm: Option<ElseArm>,
    pub span: Span,
}

/// What follows an `else`.
#[derive(Debug, Clone)]
pub enum ElseArm {
    /// `else if (…) …`, the next link of the chain
    Elif(Box<IfStmt>),
    /// final `else`
    Else(StmtBlock),
}

/// Body of a control-flow statement.
///
/// Only the braced form opens a lexical scope; a bare statement shares
/// the surrounding scope.
#[derive(Debug, Clone)]
pub enum StmtBlock {
    /// `{ … }`
    Block(Vec<Stmt>, Span),
    /// single statement
    Single(Box<Stmt>),
}

impl StmtBlock {
    /// The statements of the block, regardless of form.
    pub fn statements(&self) -> &[Stmt] {
        match self {
            StmtBlock::Block(stmts, _) => stmts,
            StmtBlock::Single(stmt) => std::slice::from_ref(stmt),
        }
    }

    /// True for the braced form, which opens its own scope.
    pub fn is_braced(&self) -> bool {
        matches!(self, StmtBlock::Block(..))
    }
}

/// `while (cond) block`
#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: StmtBlock,
    pub span: Span,
}

/// `do block while (cond) ;`
#[derive(Debug, Clone)]
pub struct DoWhileStmt {
    pub body: StmtBlock,
    pub cond: Expr,
    pub span: Span,
}

/// `for (init? ; cond? ; update?) block`
#[derive(Debug, Clone)]
pub struct ForStmt {
    pub init: Option<Box<Stmt>>,
    pub cond: Option<Expr>,
    pub update: Option<Box<Stmt>>,
    pub body: StmtBlock,
    pub span: Span,
}

/// `for (var ID in iterable) block` or `for (ID in iterable) block`
#[derive(Debug, Clone)]
pub struct ForInStmt {
    /// Whether the iterator was introduced with `var`
    pub declares_iterator: bool,
    pub iterator: String,
    pub iterable: Expr,
    pub body: StmtBlock,
    pub span: Span,
}

/// Typed function: `tipo ID (params) { … }`
#[derive(Debug, Clone)]
pub struct FunctionStmt {
    pub return_type: String,
    pub name: String,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// `void ID (params) { … }`
#[derive(Debug, Clone)]
pub struct FunctionVoidStmt {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// `tipo|void ID (params) => Expr ;`
#[derive(Debug, Clone)]
pub struct ArrowFunctionStmt {
    pub return_type: String,
    pub name: String,
    pub params: Vec<Param>,
    pub expr: Expr,
    pub span: Span,
}

/// `tipo ID` inside a parameter list
#[derive(Debug, Clone)]
pub struct Param {
    pub ty: String,
    pub name: String,
    pub span: Span,
}

/// `return [Expr] ;`
#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

/// Statement of shape `ID ( Expr ) ;` with exactly one argument.
///
/// The grammar only recognizes the shape; whether the callee may be
/// called like this is decided semantically.
#[derive(Debug, Clone)]
pub struct PrintStmt {
    pub callee: String,
    pub arg: Expr,
    pub span: Span,
}

/// `class ID { members }` where members are variable declarations and
/// functions.
#[derive(Debug, Clone)]
pub struct ClassStmt {
    pub name: String,
    pub members: Vec<Stmt>,
    pub span: Span,
}

/// Free-standing `{ … }` statement.
#[derive(Debug, Clone)]
pub struct BlockStmt {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

/// Expression forms of the subset.
#[derive(Debug, Clone)]
pub enum Expr {
    Ident(String, Span),
    Int(i64, Span),
    Double(f64, Span),
    /// String literal. A dedicated variant, so a literal `"x"` can never
    /// be confused with an identifier spelled `x`.
    Str(String, Span),
    Bool(bool, Span),
    Null(Span),
    List(Vec<Expr>, Span),
    /// Map literal; keys are string-literal expressions
    Map(Vec<(Expr, Expr)>, Span),
    Call(CallExpr),
    /// `ID . ID ( )`, e.g. `stdin.readLineSync()`
    Input(InputExpr),
    Binary(BinaryExpr),
}

impl Expr {
    /// Span of the expression (for [`Expr::Binary`], the operator's own
    /// span).
    pub fn span(&self) -> Span {
        match self {
            Expr::Ident(_, span)
            | Expr::Int(_, span)
            | Expr::Double(_, span)
            | Expr::Str(_, span)
            | Expr::Bool(_, span)
            | Expr::Null(span)
            | Expr::List(_, span)
            | Expr::Map(_, span) => *span,
            Expr::Call(call) => call.span,
            Expr::Input(input) => input.span,
            Expr::Binary(binary) => binary.span,
        }
    }
}

/// `ID ( args )`
#[derive(Debug, Clone)]
pub struct CallExpr {
    pub callee: String,
    pub args: Vec<Expr>,
    pub span: Span,
}

/// `ID . ID ( )`
#[derive(Debug, Clone)]
pub struct InputExpr {
    pub receiver: String,
    pub method: String,
    pub span: Span,
}

/// `lhs op rhs`; `span` locates the operator
#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub op: BinOp,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
    pub span: Span,
}

/// Binary operators, grouped by typing rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
    /// `~/`
    TruncDiv,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Le,
    /// `>=`
    Ge,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `??`
    IfNull,
}

impl BinOp {
    /// Arithmetic operators require numeric operands (`+` additionally
    /// accepts two strings).
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod | BinOp::TruncDiv
        )
    }

    /// `==` and `!=`.
    pub fn is_equality(self) -> bool {
        matches!(self, BinOp::Eq | BinOp::Ne)
    }

    /// Ordering comparisons `<`, `>`, `<=`, `>=`.
    pub fn is_ordering(self) -> bool {
        matches!(self, BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge)
    }

    /// `&&` and `||`.
    pub fn is_logical(self) -> bool {
        matches!(self, BinOp::And | BinOp::Or)
    }

    /// Operators that are null-aware by definition: applying them to a
    /// `Null` operand is not a diagnostic.
    pub fn tolerates_null(self) -> bool {
        matches!(self, BinOp::IfNull | BinOp::Eq | BinOp::Ne)
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::TruncDiv => "~/",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
            BinOp::IfNull => "??",
        };
        f.write_str(text)
    }
}
