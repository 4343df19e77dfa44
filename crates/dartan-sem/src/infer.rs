//! Expression type inference.
//!
//! One-shot, bottom-up inference over the completed scope and function
//! state. There is no unification: every expression either has a tag or
//! is [`Ty::Unknown`], and `Unknown` deliberately poisons nothing - the
//! validators skip what they cannot type instead of guessing.

use dartan_par::ast::{BinOp, Declarator, Expr, VarDeclStmt};

use crate::scope::ScopeStack;
use crate::types::{FunctionTable, Ty};

/// Infer the type tag of an expression.
///
/// - literals map to their literal type (`null` → `Null`)
/// - identifiers resolve through the scope stack
/// - calls resolve through the function table
/// - `recv.method()` is `String` for `readLineSync`, the shape the
///   subset reads input with
pub fn infer_type(expr: &Expr, scopes: &ScopeStack, functions: &FunctionTable) -> Ty {
    match expr {
        Expr::Null(_) => Ty::Null,
        Expr::Bool(..) => Ty::Bool,
        Expr::Int(..) => Ty::Int,
        Expr::Double(..) => Ty::Double,
        Expr::Str(..) => Ty::Str,
        Expr::List(..) => Ty::List,
        Expr::Map(..) => Ty::Map,

        Expr::Ident(name, _) => scopes
            .lookup(name)
            .map(|info| info.ty.clone())
            .unwrap_or(Ty::Unknown),

        Expr::Call(call) => functions
            .get(&call.callee)
            .map(|sig| sig.return_type.clone())
            .unwrap_or(Ty::Unknown),

        Expr::Input(input) => {
            if input.method == "readLineSync" {
                Ty::Str
            } else {
                Ty::Unknown
            }
        }

        Expr::Binary(binary) => {
            let lt = infer_type(&binary.lhs, scopes, functions);
            let rt = infer_type(&binary.rhs, scopes, functions);
            infer_binary(binary.op, &lt, &rt)
        }
    }
}

/// Result type of a binary operation over already-inferred operands.
fn infer_binary(op: BinOp, lt: &Ty, rt: &Ty) -> Ty {
    if op.is_arithmetic() {
        if op == BinOp::Add && *lt == Ty::Str && *rt == Ty::Str {
            return Ty::Str;
        }
        if lt.is_numeric() && rt.is_numeric() {
            if *lt == Ty::Double || *rt == Ty::Double {
                return Ty::Double;
            }
            return Ty::Int;
        }
        return Ty::Unknown;
    }

    if op.is_ordering() || op.is_equality() || op.is_logical() {
        return Ty::Bool;
    }

    // `a ?? b` has the type of whichever operand is not Null.
    if *lt == Ty::Null {
        rt.clone()
    } else {
        lt.clone()
    }
}

/// Type a declaration stores for its variable.
///
/// `var`/`final`/`const` infer from the initializer (or fall back to
/// `dynamic`); an explicit type name wins regardless of the
/// initializer. Shared between the declaring walk and the whole-tree
/// walk so both see identical scopes.
pub(crate) fn declaration_type(
    decl: &VarDeclStmt,
    scopes: &ScopeStack,
    functions: &FunctionTable,
) -> Ty {
    match &decl.declarator {
        Declarator::Typed(name) => Ty::from_name(name),
        Declarator::Var | Declarator::Final | Declarator::Const => decl
            .init
            .as_ref()
            .map(|init| infer_type(init, scopes, functions))
            .unwrap_or(Ty::Dynamic),
    }
}
