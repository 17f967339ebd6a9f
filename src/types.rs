//! The C type model: scalar types, pointers, arrays and tagged aggregates,
//! together with size, alignment and layout computation.

use std::rc::Rc;

/// A member of a struct or union, with its resolved byte offset.
///
/// A member without a name is an anonymous nested struct or union; its own
/// members are addressed through it by accumulating offsets.
#[derive(Debug, PartialEq, Clone)]
pub struct Member {
    pub name: Option<String>,
    pub ty: Type,
    pub offset: usize,
}

/// A laid-out struct or union body.
#[derive(Debug, PartialEq, Clone)]
pub struct Aggregate {
    pub tag: Option<String>,
    pub members: Vec<Member>,
    pub size: usize,
    pub align: usize,
}

/// An enum definition with its sequentially numbered constants.
#[derive(Debug, PartialEq, Clone)]
pub struct EnumDef {
    pub tag: Option<String>,
    pub constants: Vec<(String, i64)>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Type {
    Void,
    Char,
    Int,
    Pointer(Box<Type>),
    Array(Box<Type>, usize),
    Struct(Rc<Aggregate>),
    Union(Rc<Aggregate>),
    Enum(Rc<EnumDef>),
}

impl Type {
    /// The size of a value of this type in bytes.
    pub fn size(&self) -> usize {
        match self {
            Type::Void => 1,
            Type::Char => 1,
            Type::Int => 4,
            Type::Pointer(_) => 8,
            Type::Array(base, n) => base.size() * n,
            Type::Struct(agg) | Type::Union(agg) => agg.size,
            Type::Enum(_) => 4,
        }
    }

    /// The alignment requirement of this type in bytes.
    pub fn align(&self) -> usize {
        match self {
            Type::Void => 1,
            Type::Char => 1,
            Type::Int => 4,
            Type::Pointer(_) => 8,
            Type::Array(base, _) => base.align(),
            Type::Struct(agg) | Type::Union(agg) => agg.align,
            Type::Enum(_) => 4,
        }
    }

    /// Whether the type belongs to the integer family.
    pub fn is_integer(&self) -> bool {
        matches!(self, Type::Char | Type::Int | Type::Enum(_))
    }

    /// Whether the type is a pointer or an array (which decays to one).
    pub fn is_pointer_like(&self) -> bool {
        matches!(self, Type::Pointer(_) | Type::Array(..))
    }

    /// The pointed-to or element type, if any.
    pub fn base(&self) -> Option<&Type> {
        match self {
            Type::Pointer(base) | Type::Array(base, _) => Some(base),
            _ => None,
        }
    }

    /// Applies array-to-pointer decay; other types are returned unchanged.
    pub fn decay(&self) -> Type {
        match self {
            Type::Array(base, _) => Type::Pointer(base.clone()),
            other => other.clone(),
        }
    }

    /// The aggregate body behind a struct or union type.
    pub fn aggregate(&self) -> Option<&Rc<Aggregate>> {
        match self {
            Type::Struct(agg) | Type::Union(agg) => Some(agg),
            _ => None,
        }
    }
}

/// Rounds `n` up to the next multiple of `align`.
pub fn align_up(n: usize, align: usize) -> usize {
    (n + align - 1) / align * align
}

impl Aggregate {
    /// Lays out a struct body: each member is placed at the running cursor
    /// rounded up to its own alignment, and the total size is the end of the
    /// last member rounded up to the widest alignment.
    pub fn layout_struct(tag: Option<String>, members: Vec<(Option<String>, Type)>) -> Self {
        let mut laid_out = Vec::with_capacity(members.len());
        let mut cursor = 0;
        let mut align = 1;
        for (name, ty) in members {
            let offset = align_up(cursor, ty.align());
            cursor = offset + ty.size();
            align = align.max(ty.align());
            laid_out.push(Member { name, ty, offset });
        }
        let size = align_up(cursor, align);
        Aggregate {
            tag,
            members: laid_out,
            size,
            align,
        }
    }

    /// Lays out a union body: every member sits at offset zero and the total
    /// size is the largest member rounded up to the widest alignment.
    pub fn layout_union(tag: Option<String>, members: Vec<(Option<String>, Type)>) -> Self {
        let mut laid_out = Vec::with_capacity(members.len());
        let mut size = 0;
        let mut align = 1;
        for (name, ty) in members {
            size = size.max(ty.size());
            align = align.max(ty.align());
            laid_out.push(Member {
                name,
                ty,
                offset: 0,
            });
        }
        let size = align_up(size, align);
        Aggregate {
            tag,
            members: laid_out,
            size,
            align,
        }
    }
}

/// Finds a member by name, searching anonymous nested aggregates recursively.
/// The returned offset accumulates the offsets of the anonymous members
/// crossed on the way down.
pub fn find_member<'a>(agg: &'a Aggregate, name: &str) -> Option<(usize, &'a Type)> {
    for member in &agg.members {
        match &member.name {
            Some(n) if n == name => return Some((member.offset, &member.ty)),
            Some(_) => {}
            None => {
                if let Some(inner) = member.ty.aggregate() {
                    if let Some((offset, ty)) = find_member(inner, name) {
                        return Some((member.offset + offset, ty));
                    }
                }
            }
        }
    }
    None
}
