//! Scope stack for name resolution.
//!
//! This module provides `ScopeStack`, a single stack of bindings interleaved
//! with scope-boundary markers. It handles:
//! - Opening a scope keyed by the node that owns it
//! - Binding names in the innermost open scope
//! - Innermost-first lookup, so inner bindings shadow outer ones
//! - Popping every binding of a scope when it closes
//!
//! The stack is empty outside an active walk and always mirrors exactly the
//! scopes that are currently open.

use spl_core::NodeId;

// ============================================================================
// Types
// ============================================================================

/// A name bound on the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// The bound name.
    pub name: String,
    /// The declaration node that introduced the binding.
    pub decl: NodeId,
    /// The scope the binding belongs to.
    pub scope: NodeId,
}

#[derive(Debug, Clone)]
enum Entry {
    Boundary(NodeId),
    Binding(Binding),
}

// ============================================================================
// ScopeStack
// ============================================================================

#[derive(Debug, Default)]
pub struct ScopeStack {
    entries: Vec<Entry>,
    /// Open scopes, innermost last.
    open: Vec<NodeId>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new innermost scope owned by `scope`.
    pub fn enter(&mut self, scope: NodeId) {
        self.entries.push(Entry::Boundary(scope));
        self.open.push(scope);
    }

    /// Close the innermost scope, dropping its bindings.
    ///
    /// Returns the closed scope, or `None` if no scope was open.
    pub fn exit(&mut self) -> Option<NodeId> {
        let scope = self.open.pop()?;
        while let Some(entry) = self.entries.pop() {
            if matches!(entry, Entry::Boundary(_)) {
                break;
            }
        }
        Some(scope)
    }

    /// The innermost open scope.
    pub fn current(&self) -> Option<NodeId> {
        self.open.last().copied()
    }

    /// Bind `name` to `decl` in the innermost scope.
    ///
    /// Returns the scope the binding landed in, or `None` if no scope is open.
    pub fn bind(&mut self, name: impl Into<String>, decl: NodeId) -> Option<NodeId> {
        let scope = self.current()?;
        self.entries.push(Entry::Binding(Binding {
            name: name.into(),
            decl,
            scope,
        }));
        Some(scope)
    }

    /// The innermost visible binding for `name`.
    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.visible(name).next()
    }

    /// Every visible binding for `name`, innermost first.
    pub fn visible<'s, 'n>(&'s self, name: &'n str) -> impl Iterator<Item = &'s Binding> + use<'s, 'n> {
        self.entries.iter().rev().filter_map(move |entry| match entry {
            Entry::Binding(b) if b.name == name => Some(b),
            _ => None,
        })
    }

    /// Number of open scopes.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
