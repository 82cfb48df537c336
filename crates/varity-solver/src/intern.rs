//! Type interning for structural deduplication.
//!
//! This module implements the interning engine that converts `TypeData`
//! structures into lightweight `TypeId` handles.
//!
//! Benefits:
//! - O(1) structural equality (just compare `TypeId` values)
//! - Memory efficient (each unique structure stored once)
//! - Shareable: the interner is `Sync`, so independent call sites can be
//!   checked on different threads against the same type expressions
//!
//! The interner also owns the type variable table. Declaring a type variable
//! always allocates a fresh `TypeVarId`, so variable identity never depends on
//! the variable's name.

use crate::types::*;
use rustc_hash::{FxHashMap, FxHasher};
use smallvec::SmallVec;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};
use varity_common::limits::TYPE_LIST_INLINE;
use varity_common::{Atom, ShardedInterner};

const SHARD_BITS: u32 = 4;
const SHARD_COUNT: usize = 1 << SHARD_BITS;
const SHARD_MASK: u32 = (SHARD_COUNT as u32) - 1;

pub type TypeListBuffer = SmallVec<[TypeId; TYPE_LIST_INLINE]>;

struct TypeShard {
    key_to_index: RwLock<FxHashMap<TypeData, u32>>,
    index_to_key: RwLock<Vec<TypeData>>,
}

impl TypeShard {
    fn new() -> Self {
        TypeShard {
            key_to_index: RwLock::new(FxHashMap::default()),
            index_to_key: RwLock::new(Vec::new()),
        }
    }
}

struct SliceInterner<T> {
    items: Vec<Arc<[T]>>,
    map: FxHashMap<Arc<[T]>, u32>,
}

impl<T> SliceInterner<T>
where
    T: Eq + Hash,
{
    fn new() -> Self {
        let empty: Arc<[T]> = Arc::from(Vec::new());
        let mut map = FxHashMap::default();
        map.insert(empty.clone(), 0);
        SliceInterner {
            items: vec![empty],
            map,
        }
    }

    fn intern(&mut self, items: &[T]) -> u32
    where
        T: Clone,
    {
        if items.is_empty() {
            return 0;
        }

        if let Some(&id) = self.map.get(items) {
            return id;
        }

        let arc: Arc<[T]> = Arc::from(items);
        let id = self.items.len() as u32;
        self.items.push(arc.clone());
        self.map.insert(arc, id);
        id
    }

    fn get(&self, id: u32) -> Option<Arc<[T]>> {
        self.items.get(id as usize).cloned()
    }

    fn empty(&self) -> Arc<[T]> {
        self.items[0].clone()
    }
}

/// Type interning table.
/// Thread-safe via `RwLock` for concurrent access.
pub struct TypeInterner {
    /// Sharded storage for non-intrinsic types
    shards: [TypeShard; SHARD_COUNT],
    /// String interner for variable, parameter and declaration names
    pub string_interner: ShardedInterner,
    type_lists: RwLock<SliceInterner<TypeId>>,
    type_vars: RwLock<Vec<TypeVarInfo>>,
}

impl TypeInterner {
    /// Create a new type interner with pre-registered intrinsics.
    pub fn new() -> Self {
        TypeInterner {
            shards: std::array::from_fn(|_| TypeShard::new()),
            string_interner: {
                let interner = ShardedInterner::new();
                interner.intern_common();
                interner
            },
            type_lists: RwLock::new(SliceInterner::new()),
            type_vars: RwLock::new(Vec::new()),
        }
    }

    /// Intern a string into an Atom.
    pub fn intern_string(&self, s: &str) -> Atom {
        self.string_interner.intern(s)
    }

    /// Resolve an Atom back to its string value.
    /// This is used when formatting types for error messages.
    pub fn resolve_atom(&self, atom: Atom) -> String {
        self.string_interner.resolve(atom).to_string()
    }

    // =========================================================================
    // Type variables
    // =========================================================================

    /// Declare a new type variable. Every call returns a distinct identity,
    /// even for a name that was declared before.
    pub fn declare_type_var(&self, name: &str, kind: VarKind) -> TypeVarId {
        let name = self.intern_string(name);
        let mut vars = self.type_vars.write().expect("type_vars lock poisoned");
        let id = TypeVarId(vars.len() as u32);
        vars.push(TypeVarInfo { name, kind });
        id
    }

    pub fn type_var_info(&self, var: TypeVarId) -> Option<TypeVarInfo> {
        let vars = self.type_vars.read().expect("type_vars lock poisoned");
        vars.get(var.0 as usize).cloned()
    }

    /// Kind of a declared variable. Unknown ids are treated as ordinary.
    pub fn type_var_kind(&self, var: TypeVarId) -> VarKind {
        self.type_var_info(var)
            .map(|info| info.kind)
            .unwrap_or(VarKind::Single)
    }

    pub fn type_var_name(&self, var: TypeVarId) -> String {
        self.type_var_info(var)
            .map(|info| self.resolve_atom(info.name))
            .unwrap_or_else(|| format!("?{}", var.0))
    }

    // =========================================================================
    // Types
    // =========================================================================

    /// Intern a type and return its `TypeId`.
    /// If the structure already exists, returns the existing `TypeId`.
    ///
    /// This performs no validation; use `TypeFactory` to build types from
    /// user-written annotations.
    pub fn intern(&self, key: TypeData) -> TypeId {
        if let Some(id) = self.get_intrinsic_id(&key) {
            return id;
        }

        let mut hasher = FxHasher::default();
        key.hash(&mut hasher);
        let shard_idx = (hasher.finish() as usize) & (SHARD_COUNT - 1);
        let shard = &self.shards[shard_idx];

        {
            let map = shard
                .key_to_index
                .read()
                .expect("shard key_to_index lock poisoned");
            if let Some(&local_index) = map.get(&key) {
                return self.make_id(local_index, shard_idx as u32);
            }
        }

        let mut map = shard
            .key_to_index
            .write()
            .expect("shard key_to_index lock poisoned");
        let mut storage = shard
            .index_to_key
            .write()
            .expect("shard index_to_key lock poisoned");

        if let Some(&local_index) = map.get(&key) {
            return self.make_id(local_index, shard_idx as u32);
        }

        let local_index = storage.len() as u32;
        if local_index > ((u32::MAX - TypeId::FIRST_USER) >> SHARD_BITS) {
            return TypeId::ERROR;
        }

        storage.push(key.clone());
        map.insert(key, local_index);

        self.make_id(local_index, shard_idx as u32)
    }

    /// Look up the `TypeData` for a given `TypeId`.
    pub fn lookup(&self, id: TypeId) -> Option<TypeData> {
        if id.is_intrinsic() || id.is_error() {
            return self.get_intrinsic_key(id);
        }

        let raw_val = id.0.checked_sub(TypeId::FIRST_USER)?;
        let shard_idx = (raw_val & SHARD_MASK) as usize;
        let local_index = raw_val >> SHARD_BITS;

        let shard = self.shards.get(shard_idx)?;
        let storage = shard
            .index_to_key
            .read()
            .expect("shard index_to_key lock poisoned");
        storage.get(local_index as usize).cloned()
    }

    pub fn intern_type_list(&self, members: &[TypeId]) -> TypeListId {
        let mut lists = self.type_lists.write().expect("type_lists lock poisoned");
        TypeListId(lists.intern(members))
    }

    pub fn type_list(&self, id: TypeListId) -> Arc<[TypeId]> {
        let lists = self.type_lists.read().expect("type_lists lock poisoned");
        lists.get(id.0).unwrap_or_else(|| lists.empty())
    }

    /// Number of interned types, intrinsics included.
    pub fn len(&self) -> usize {
        let user: usize = self
            .shards
            .iter()
            .map(|shard| {
                shard
                    .index_to_key
                    .read()
                    .map(|storage| storage.len())
                    .unwrap_or(0)
            })
            .sum();
        TypeId::FIRST_USER as usize + user
    }

    /// Check if the interner is empty (only has intrinsics)
    pub fn is_empty(&self) -> bool {
        self.len() <= TypeId::FIRST_USER as usize
    }

    #[inline]
    fn make_id(&self, local_index: u32, shard_idx: u32) -> TypeId {
        let raw_val = (local_index << SHARD_BITS) | (shard_idx & SHARD_MASK);
        TypeId(TypeId::FIRST_USER + raw_val)
    }

    fn get_intrinsic_id(&self, key: &TypeData) -> Option<TypeId> {
        match key {
            TypeData::Intrinsic(kind) => Some(kind.to_type_id()),
            TypeData::Error => Some(TypeId::ERROR),
            _ => None,
        }
    }

    fn get_intrinsic_key(&self, id: TypeId) -> Option<TypeData> {
        if id.is_error() {
            return Some(TypeData::Error);
        }
        IntrinsicKind::from_type_id(id).map(TypeData::Intrinsic)
    }

    // =========================================================================
    // Unchecked convenience constructors
    // =========================================================================

    /// Reference to a type variable of either kind.
    ///
    /// Ordinary variables intern as `TypeVar`; variadic variables intern as
    /// the bare `VariadicVar` reference (wrap it with `TypeFactory::unpack`).
    pub fn type_var(&self, var: TypeVarId) -> TypeId {
        match self.type_var_kind(var) {
            VarKind::Single => self.intern(TypeData::TypeVar(var)),
            VarKind::Variadic => self.intern(TypeData::VariadicVar(var)),
        }
    }

    /// `*Ts` for a variadic variable.
    pub fn unpacked_var(&self, var: TypeVarId) -> TypeId {
        let bare = self.intern(TypeData::VariadicVar(var));
        self.intern(TypeData::Unpack(bare))
    }

    pub fn instance(&self, def: crate::def::DefId) -> TypeId {
        self.intern(TypeData::Instance(def))
    }

    pub fn unparameterized(&self, def: crate::def::DefId) -> TypeId {
        self.intern(TypeData::Unparameterized(def))
    }

    pub fn unbounded_tuple(&self, element: TypeId) -> TypeId {
        self.intern(TypeData::UnboundedTuple(element))
    }

    /// Classify one element of an interned list.
    pub fn list_item(&self, id: TypeId) -> ListItem {
        let Some(TypeData::Unpack(inner)) = self.lookup(id) else {
            return ListItem::Fixed(id);
        };
        match self.lookup(inner) {
            Some(TypeData::VariadicVar(var)) => ListItem::Variadic(var),
            Some(TypeData::UnboundedTuple(element)) => ListItem::Unbounded(element),
            _ => ListItem::Fixed(id),
        }
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod tests;
