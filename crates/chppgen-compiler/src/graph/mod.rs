//! Type graph: every struct and union reachable from the root types.
//!
//! Entries live in an arena indexed by [`TypeId`]. Edges are stored as id
//! lists sorted by type name, so every traversal over them is deterministic.

mod build;
mod cycles;


pub use build::build;
pub use cycles::check_acyclic;

use chppgen_core::{Aggregate, Annotation, Literal, TypeSpec};
use indexmap::IndexMap;

/// Index of a [`TypeEntry`] in its [`TypeGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One member of a struct or union, with its annotations attached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberDescriptor {
    pub name: String,
    pub ty: TypeSpec,
    /// Struct or union named by the member's type spec.
    pub nested: Option<String>,
    pub annotations: Vec<Annotation>,
}

impl MemberDescriptor {
    pub fn array_len(&self) -> Option<usize> {
        self.ty.array_len()
    }

    pub fn is_nested(&self) -> bool {
        self.nested.is_some()
    }

    pub fn rewrite_type(&self) -> Option<&str> {
        self.annotations.iter().find_map(|a| match a {
            Annotation::RewriteType { type_override } => Some(type_override.as_str()),
            _ => None,
        })
    }

    pub fn var_len_array(&self) -> Option<&str> {
        self.annotations.iter().find_map(|a| match a {
            Annotation::VarLenArray { length_field } => Some(length_field.as_str()),
            _ => None,
        })
    }

    pub fn fixed_value(&self) -> Option<&Literal> {
        self.annotations.iter().find_map(|a| match a {
            Annotation::FixedValue { value } => Some(value),
            _ => None,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeEntry {
    pub name: String,
    pub kind: Aggregate,
    pub members: Vec<MemberDescriptor>,
    /// Types nested directly in this one.
    pub dependencies: Vec<TypeId>,
    /// Types this one is nested in.
    pub appears_in: Vec<TypeId>,
    /// This type or a transitive dependency has a `var_len_array` member.
    pub var_len: bool,
}

impl TypeEntry {
    pub fn is_union(&self) -> bool {
        self.kind.is_union()
    }

    pub fn member(&self, name: &str) -> Option<&MemberDescriptor> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// Closure of the root types under "contains".
#[derive(Clone, Debug, Default)]
pub struct TypeGraph {
    entries: Vec<TypeEntry>,
    ids: IndexMap<String, TypeId>,
    roots: Vec<TypeId>,
}

impl TypeGraph {
    pub fn get(&self, id: TypeId) -> &TypeEntry {
        &self.entries[id.index()]
    }

    pub fn id(&self, name: &str) -> Option<TypeId> {
        self.ids.get(name).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&TypeEntry> {
        self.id(name).map(|id| self.get(id))
    }

    /// Root types in request order.
    pub fn roots(&self) -> &[TypeId] {
        &self.roots
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (TypeId(i as u32), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `false` for names outside the graph.
    pub fn is_var_len(&self, name: &str) -> bool {
        self.by_name(name).is_some_and(|entry| entry.var_len)
    }

    /// Nested entry of `member`, if it names a type in the graph.
    pub fn nested(&self, member: &MemberDescriptor) -> Option<&TypeEntry> {
        member.nested.as_deref().and_then(|name| self.by_name(name))
    }

    fn push(&mut self, entry: TypeEntry) -> TypeId {
        let id = TypeId(self.entries.len() as u32);
        self.ids.insert(entry.name.clone(), id);
        self.entries.push(entry);
        id
    }

    fn get_mut(&mut self, id: TypeId) -> &mut TypeEntry {
        &mut self.entries[id.index()]
    }
}
