//! Symbol tables built up during parsing: frame slots, globals, and the
//! tag/typedef/enum-constant namespaces.

use crate::types::{Aggregate, EnumDef, Type};
use indexmap::IndexMap;
use std::rc::Rc;

/// A local variable bound to a frame slot at `rbp - offset`.
#[derive(Debug, PartialEq, Clone)]
pub struct LocalVar {
    pub name: String,
    pub ty: Type,
    pub offset: usize,
}

/// A global initializer; only integer constants are representable.
#[derive(Debug, PartialEq, Clone)]
pub enum GlobalInit {
    Scalar(i64),
    List(Vec<i64>),
}

#[derive(Debug, PartialEq, Clone)]
pub struct GlobalVar {
    pub name: String,
    pub ty: Type,
    pub init: Option<GlobalInit>,
}

/// The type namespaces: struct/union/enum tags, typedef names, and enum
/// constants. Insertion order is preserved so diagnostics and emission stay
/// deterministic.
#[derive(Debug, PartialEq, Default)]
pub struct DefinedTypes {
    pub struct_tags: IndexMap<String, Rc<Aggregate>>,
    pub union_tags: IndexMap<String, Rc<Aggregate>>,
    pub enum_tags: IndexMap<String, Rc<EnumDef>>,
    pub typedefs: IndexMap<String, Type>,
    /// Enum constants are a flat namespace, independent of their tag.
    pub enum_constants: IndexMap<String, i64>,
}

impl DefinedTypes {
    pub fn enum_constant(&self, name: &str) -> Option<i64> {
        self.enum_constants.get(name).copied()
    }

    pub fn is_typedef(&self, name: &str) -> bool {
        self.typedefs.contains_key(name)
    }
}
