//! Symbol table produced by scope resolution.
//!
//! Every identifier occurrence in the tree, declaration or use, gets its own
//! [`SemanticInfo`] keyed by node id. Uses copy the scope, declaration and
//! unique id of the declaration they resolve to.

use rustc_hash::FxHashMap;
use spl_core::{NodeId, ProgramBlocks};

// ============================================================================
// Types
// ============================================================================

/// Resolution result for one identifier occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticInfo {
    /// The identifier as written.
    pub symbol_name: String,
    /// The scope block the binding belongs to.
    pub scope_level: NodeId,
    /// The canonical declaration node.
    pub declaration_node: NodeId,
    /// Name used for this symbol in generated code.
    pub unique_id: String,
}

/// Category of a binding's scope, independent of nesting depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeClass {
    Global,
    Procedure,
    Function,
    /// A definition body or `main`.
    Local,
}

/// The three scope-class sentinels of a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeClasses {
    /// The `glob` block.
    pub global: NodeId,
    /// The `proc` block.
    pub procedures: NodeId,
    /// The `func` block.
    pub functions: NodeId,
}

impl ScopeClasses {
    pub fn from_blocks(blocks: ProgramBlocks) -> Self {
        Self {
            global: blocks.globals,
            procedures: blocks.procs,
            functions: blocks.funcs,
        }
    }

    pub fn classify(&self, scope: NodeId) -> ScopeClass {
        if scope == self.global {
            ScopeClass::Global
        } else if scope == self.procedures {
            ScopeClass::Procedure
        } else if scope == self.functions {
            ScopeClass::Function
        } else {
            ScopeClass::Local
        }
    }

    /// Whether bindings in `scope` name procedures or functions.
    pub fn is_callable(&self, scope: NodeId) -> bool {
        matches!(
            self.classify(scope),
            ScopeClass::Procedure | ScopeClass::Function
        )
    }
}

// ============================================================================
// SymbolTable
// ============================================================================

#[derive(Debug, Clone)]
pub struct SymbolTable {
    entries: FxHashMap<NodeId, SemanticInfo>,
    /// Procedure/function name declaration -> definition node.
    definitions: FxHashMap<NodeId, NodeId>,
    classes: ScopeClasses,
}

impl SymbolTable {
    pub fn new(classes: ScopeClasses) -> Self {
        Self {
            entries: FxHashMap::default(),
            definitions: FxHashMap::default(),
            classes,
        }
    }

    pub(crate) fn insert(&mut self, node: NodeId, info: SemanticInfo) {
        self.entries.insert(node, info);
    }

    pub(crate) fn insert_definition(&mut self, name_decl: NodeId, def: NodeId) {
        self.definitions.insert(name_decl, def);
    }

    /// Resolution info for an identifier occurrence.
    pub fn get(&self, node: NodeId) -> Option<&SemanticInfo> {
        self.entries.get(&node)
    }

    /// Unique id of an identifier occurrence.
    pub fn unique_id(&self, node: NodeId) -> Option<&str> {
        self.get(node).map(|info| info.unique_id.as_str())
    }

    /// The procedure or function definition a call-target name resolves to.
    pub fn definition_of(&self, name: NodeId) -> Option<NodeId> {
        let decl = self.get(name)?.declaration_node;
        self.definitions.get(&decl).copied()
    }

    pub fn classes(&self) -> ScopeClasses {
        self.classes
    }

    /// Scope class of the binding an occurrence resolves to.
    pub fn class_of(&self, node: NodeId) -> Option<ScopeClass> {
        self.get(node).map(|info| self.classes.classify(info.scope_level))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SemanticInfo)> {
        self.entries.iter().map(|(id, info)| (*id, info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes() -> ScopeClasses {
        ScopeClasses {
            global: NodeId::new(0),
            procedures: NodeId::new(1),
            functions: NodeId::new(2),
        }
    }

    #[test]
    fn classify_scopes() {
        let c = classes();
        assert_eq!(c.classify(NodeId::new(0)), ScopeClass::Global);
        assert_eq!(c.classify(NodeId::new(1)), ScopeClass::Procedure);
        assert_eq!(c.classify(NodeId::new(2)), ScopeClass::Function);
        assert_eq!(c.classify(NodeId::new(3)), ScopeClass::Local);
        assert!(c.is_callable(NodeId::new(2)));
        assert!(!c.is_callable(NodeId::new(0)));
    }

    #[test]
    fn definition_through_declaration() {
        let mut table = SymbolTable::new(classes());
        let decl = NodeId::new(10);
        let def = NodeId::new(11);
        let call_target = NodeId::new(20);
        let info = SemanticInfo {
            symbol_name: "p".into(),
            scope_level: NodeId::new(1),
            declaration_node: decl,
            unique_id: "p1".into(),
        };
        table.insert(decl, info.clone());
        table.insert(call_target, info);
        table.insert_definition(decl, def);

        assert_eq!(table.definition_of(call_target), Some(def));
        assert_eq!(table.class_of(call_target), Some(ScopeClass::Procedure));
        assert_eq!(table.unique_id(call_target), Some("p1"));
        assert_eq!(table.definition_of(NodeId::new(99)), None);
        assert_eq!(table.len(), 2);
    }
}
