//! Two-scope symbol table resolving identifiers to VM segments.
//!
//! Class-level `static`/`field` declarations live for the whole file; the
//! subroutine scope holding arguments and locals is replaced at every
//! subroutine header. Each (scope, kind) pair owns an independent index
//! counter starting at zero.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::vm::Segment;

/// A symbol's storage class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Static,
    Field,
    Argument,
    Local,
}

const CLASS_KINDS: &[SymbolKind] = &[SymbolKind::Static, SymbolKind::Field];
const SUBROUTINE_KINDS: &[SymbolKind] = &[SymbolKind::Argument, SymbolKind::Local];

impl SymbolKind {
    /// Parse a textual kind tag; unrecognized tags fall back to `Field`.
    fn from_tag(tag: &str) -> SymbolKind {
        match tag {
            "static" => SymbolKind::Static,
            "arg" => SymbolKind::Argument,
            "local" => SymbolKind::Local,
            _ => SymbolKind::Field,
        }
    }

    /// The VM segment variables of this kind live in.
    pub fn segment(self) -> Segment {
        match self {
            SymbolKind::Static => Segment::Static,
            SymbolKind::Field => Segment::This,
            SymbolKind::Argument => Segment::Argument,
            SymbolKind::Local => Segment::Local,
        }
    }
}

/// A defined symbol: name, declared type, storage class and index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub ty: String,
    pub kind: SymbolKind,
    pub index: u16,
}

/// One scope: entries in declaration order plus per-kind index counters.
#[derive(Debug)]
struct Scope {
    entries: IndexMap<String, Entry>,
    counters: HashMap<SymbolKind, u16>,
}

impl Scope {
    fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            counters: HashMap::new(),
        }
    }

    fn define(&mut self, name: &str, ty: &str, kind: SymbolKind) -> Option<&Entry> {
        if self.entries.contains_key(name) {
            return None;
        }

        let counter = self.counters.entry(kind).or_insert(0);
        let index = *counter;
        *counter += 1;

        self.entries.insert(
            name.to_string(),
            Entry {
                name: name.to_string(),
                ty: ty.to_string(),
                kind,
                index,
            },
        );
        self.entries.get(name)
    }

    fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    fn count(&self, kind: SymbolKind) -> u16 {
        self.counters.get(&kind).copied().unwrap_or(0)
    }
}

/// The two-scope table driving identifier resolution.
pub struct SymbolTable {
    class_scope: Scope,
    subroutine_scope: Scope,
    subroutine_name: String,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            class_scope: Scope::new(),
            subroutine_scope: Scope::new(),
            subroutine_name: String::new(),
        }
    }

    /// Allocate the next index of the tagged kind in the owning scope and
    /// store the entry. Redefining an existing name is a no-op.
    pub fn define(&mut self, name: &str, ty: &str, kind_tag: &str) -> Option<&Entry> {
        let kind = SymbolKind::from_tag(kind_tag);
        if CLASS_KINDS.contains(&kind) {
            self.class_scope.define(name, ty, kind)
        } else {
            self.subroutine_scope.define(name, ty, kind)
        }
    }

    /// Resolve a name, subroutine scope first. A miss means the name refers
    /// to a class or subroutine; that is for the caller to decide.
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.subroutine_scope
            .get(name)
            .or_else(|| self.class_scope.get(name))
    }

    /// Replace the subroutine scope with a fresh one. Methods reserve
    /// argument slot 0 for the implicit receiver.
    pub fn switch_subroutine_to(&mut self, name: &str, func_type: &str) {
        let mut scope = Scope::new();
        if func_type == "method" {
            scope.counters.insert(SymbolKind::Argument, 1);
        }
        self.subroutine_scope = scope;
        self.subroutine_name = name.to_string();
    }

    /// Name of the subroutine whose scope is currently installed.
    pub fn subroutine_name(&self) -> &str {
        &self.subroutine_name
    }

    /// The current index counter for a kind, i.e. how many slots of it have
    /// been handed out in the owning scope.
    pub fn count(&self, kind: SymbolKind) -> u16 {
        if CLASS_KINDS.contains(&kind) {
            self.class_scope.count(kind)
        } else {
            debug_assert!(SUBROUTINE_KINDS.contains(&kind));
            self.subroutine_scope.count(kind)
        }
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_count_per_kind() {
        let mut table = SymbolTable::new();
        table.define("a", "int", "field");
        table.define("b", "int", "static");
        table.define("c", "int", "field");

        assert_eq!(table.get("a").unwrap().index, 0);
        assert_eq!(table.get("b").unwrap().index, 0);
        assert_eq!(table.get("c").unwrap().index, 1);
        assert_eq!(table.count(SymbolKind::Field), 2);
        assert_eq!(table.count(SymbolKind::Static), 1);
    }

    #[test]
    fn test_redefinition_is_noop() {
        let mut table = SymbolTable::new();
        assert!(table.define("x", "int", "field").is_some());
        assert!(table.define("x", "boolean", "field").is_none());

        let entry = table.get("x").unwrap();
        assert_eq!(entry.ty, "int");
        assert_eq!(entry.index, 0);
        assert_eq!(table.count(SymbolKind::Field), 1);
    }

    #[test]
    fn test_unknown_tag_falls_back_to_field() {
        let mut table = SymbolTable::new();
        let entry = table.define("x", "int", "bogus").unwrap();
        assert_eq!(entry.kind, SymbolKind::Field);
    }

    #[test]
    fn test_lookup_prefers_subroutine_scope() {
        let mut table = SymbolTable::new();
        table.define("x", "int", "field");
        table.define("x", "Point", "local");

        let entry = table.get("x").unwrap();
        assert_eq!(entry.kind, SymbolKind::Local);
        assert_eq!(entry.ty, "Point");
    }

    #[test]
    fn test_switch_resets_subroutine_scope() {
        let mut table = SymbolTable::new();
        table.define("x", "int", "local");
        table.switch_subroutine_to("draw", "function");

        assert!(table.get("x").is_none());
        assert_eq!(table.count(SymbolKind::Local), 0);
        assert_eq!(table.subroutine_name(), "draw");
    }

    #[test]
    fn test_method_reserves_argument_zero() {
        let mut table = SymbolTable::new();
        table.switch_subroutine_to("dist", "method");
        assert_eq!(table.count(SymbolKind::Argument), 1);

        let entry = table.define("other", "Point", "arg").unwrap();
        assert_eq!(entry.index, 1);

        table.switch_subroutine_to("origin", "function");
        let entry = table.define("scale", "int", "arg").unwrap();
        assert_eq!(entry.index, 0);
    }

    #[test]
    fn test_segment_mapping() {
        assert_eq!(SymbolKind::Field.segment(), Segment::This);
        assert_eq!(SymbolKind::Static.segment(), Segment::Static);
        assert_eq!(SymbolKind::Argument.segment(), Segment::Argument);
        assert_eq!(SymbolKind::Local.segment(), Segment::Local);
    }

    #[test]
    fn test_class_scope_survives_switch() {
        let mut table = SymbolTable::new();
        table.define("size", "int", "field");
        table.switch_subroutine_to("grow", "method");
        assert_eq!(table.get("size").unwrap().kind, SymbolKind::Field);
    }
}
