//! Scope stack - lexical scoping as a vector of maps.
//!
//! Frame 0 is the global scope and is never popped; every braced block,
//! function body, loop header and class body pushes one frame on entry
//! and pops it on exit, in LIFO order matching the nesting. Lookup
//! walks from the innermost frame outward, which is what makes
//! shadowing across scopes legal while redeclaration within one scope
//! stays detectable.

use rustc_hash::FxHashMap;

use crate::types::Ty;

/// What the analyzer knows about a declared variable.
#[derive(Clone, Debug)]
pub struct VarInfo {
    pub ty: Ty,
    pub is_final: bool,
    pub is_const: bool,
}

impl VarInfo {
    /// A mutable binding of the given type.
    pub fn mutable(ty: Ty) -> Self {
        Self {
            ty,
            is_final: false,
            is_const: false,
        }
    }

    /// A final binding, as used for function parameters.
    pub fn final_binding(ty: Ty) -> Self {
        Self {
            ty,
            is_final: true,
            is_const: false,
        }
    }

    /// Assignment to this binding is rejected.
    pub fn is_immutable(&self) -> bool {
        self.is_final || self.is_const
    }
}

/// Stack of name → [`VarInfo`] frames.
pub struct ScopeStack {
    frames: Vec<FxHashMap<String, VarInfo>>,
}

impl ScopeStack {
    /// A stack holding only the global frame.
    pub fn new() -> Self {
        Self {
            frames: vec![FxHashMap::default()],
        }
    }

    /// Number of live frames; always at least 1.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Push a fresh frame.
    pub fn enter_scope(&mut self) {
        self.frames.push(FxHashMap::default());
    }

    /// Pop the innermost frame. The global frame stays; popping it
    /// would be an analyzer bug.
    pub fn exit_scope(&mut self) {
        debug_assert!(self.frames.len() > 1, "attempted to pop the global scope");
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Insert a binding into the innermost frame, shadowing outer
    /// frames and overwriting within the frame.
    pub fn declare(&mut self, name: impl Into<String>, info: VarInfo) {
        // The stack is never empty, so the unwrap-free form is a plain
        // last_mut on a non-empty vec.
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.into(), info);
        }
    }

    /// Whether `name` is already bound in the innermost frame
    /// (redeclaration check; outer frames don't count).
    pub fn is_declared_in_current(&self, name: &str) -> bool {
        self.frames
            .last()
            .map(|frame| frame.contains_key(name))
            .unwrap_or(false)
    }

    /// Resolve `name`, innermost frame first.
    pub fn lookup(&self, name: &str) -> Option<&VarInfo> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(name))
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}
