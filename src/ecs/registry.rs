use std::any::{Any, TypeId};
use std::collections::HashMap;

use super::entity::{EntityAllocator, EntityId};

/// Marker trait for anything storable as an ECS component.
pub trait Component: 'static + Send + Sync {}
impl<T: 'static + Send + Sync> Component for T {}

/// Signature bitmask: one bit per registered component type, assigned
/// monotonically at first use (spec §4.1). 64 component types is far more
/// than this simulation ever registers.
type Signature = u64;

trait ErasedColumn: Any + Send + Sync {
    fn remove(&mut self, index: usize);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct Column<C: Component> {
    slots: Vec<Option<C>>,
}

impl<C: Component> Default for Column<C> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<C: Component> Column<C> {
    fn ensure_len(&mut self, len: usize) {
        if self.slots.len() < len {
            self.slots.resize_with(len, || None);
        }
    }
}

impl<C: Component> ErasedColumn for Column<C> {
    fn remove(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = None;
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Single-writer ECS storage: entity ids, per-component columns, and
/// signature bitmasks. See spec §4.1.
#[derive(Default)]
pub struct Registry {
    allocator: EntityAllocator,
    signatures: Vec<Signature>,
    type_bits: HashMap<TypeId, u32>,
    next_bit: u32,
    columns: HashMap<TypeId, Box<dyn ErasedColumn>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_entity(&mut self) -> EntityId {
        let id = self.allocator.allocate();
        let index = id.index() as usize;
        if self.signatures.len() <= index {
            self.signatures.resize(index + 1, 0);
        } else {
            self.signatures[index] = 0;
        }
        id
    }

    /// Removes all components and returns `id` to the free list. No-op if
    /// `id` is already destroyed.
    pub fn destroy(&mut self, id: EntityId) {
        if !self.allocator.is_alive(id) {
            return;
        }
        let index = id.index() as usize;
        let signature = self.signatures[index];
        for (type_id, bit) in self.type_bits.iter() {
            if signature & (1 << bit) != 0 {
                if let Some(column) = self.columns.get_mut(type_id) {
                    column.remove(index);
                }
            }
        }
        self.signatures[index] = 0;
        self.allocator.free(id);
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.allocator.is_alive(id)
    }

    fn bit_for<C: Component>(&mut self) -> u32 {
        let type_id = TypeId::of::<C>();
        if let Some(bit) = self.type_bits.get(&type_id) {
            return *bit;
        }
        let bit = self.next_bit;
        assert!(bit < 64, "ECS registry supports at most 64 component types");
        self.next_bit += 1;
        self.type_bits.insert(type_id, bit);
        self.columns.insert(type_id, Box::new(Column::<C>::default()));
        bit
    }

    fn existing_bit<C: Component>(&self) -> Option<u32> {
        self.type_bits.get(&TypeId::of::<C>()).copied()
    }

    pub fn set<C: Component>(&mut self, id: EntityId, value: C) {
        let bit = self.bit_for::<C>();
        let index = id.index() as usize;
        if self.signatures.len() <= index {
            self.signatures.resize(index + 1, 0);
        }
        self.signatures[index] |= 1 << bit;

        let column = self
            .columns
            .get_mut(&TypeId::of::<C>())
            .expect("column registered in bit_for")
            .as_any_mut()
            .downcast_mut::<Column<C>>()
            .expect("column type matches bit");
        column.ensure_len(index + 1);
        column.slots[index] = Some(value);
    }

    pub fn get<C: Component>(&self, id: EntityId) -> Option<&C> {
        let column = self.columns.get(&TypeId::of::<C>())?;
        let column = column.as_any().downcast_ref::<Column<C>>()?;
        column.slots.get(id.index() as usize)?.as_ref()
    }

    pub fn get_mut<C: Component>(&mut self, id: EntityId) -> Option<&mut C> {
        let column = self.columns.get_mut(&TypeId::of::<C>())?;
        let column = column.as_any_mut().downcast_mut::<Column<C>>()?;
        column.slots.get_mut(id.index() as usize)?.as_mut()
    }

    pub fn has<C: Component>(&self, id: EntityId) -> bool {
        let Some(bit) = self.existing_bit::<C>() else {
            return false;
        };
        let index = id.index() as usize;
        self.signatures
            .get(index)
            .map(|sig| sig & (1 << bit) != 0)
            .unwrap_or(false)
    }

    pub fn remove<C: Component>(&mut self, id: EntityId) {
        let Some(bit) = self.existing_bit::<C>() else {
            return;
        };
        let index = id.index() as usize;
        if let Some(sig) = self.signatures.get_mut(index) {
            *sig &= !(1 << bit);
        }
        if let Some(column) = self.columns.get_mut(&TypeId::of::<C>()) {
            column.remove(index);
        }
    }

    fn signature_mask(&self, type_ids: &[TypeId]) -> Signature {
        let mut mask = 0;
        for type_id in type_ids {
            if let Some(bit) = self.type_bits.get(type_id) {
                mask |= 1 << bit;
            } else {
                // A component type that was never registered can never
                // match anything; force an impossible mask.
                return Signature::MAX;
            }
        }
        mask
    }

    /// Iterates live entity ids whose signature is a superset of the given
    /// component types. Order is ascending entity index, which is stable
    /// within a single view instance (spec §4.1).
    pub fn view(&self, type_ids: &[TypeId]) -> Vec<EntityId> {
        let mask = self.signature_mask(type_ids);
        self.signatures
            .iter()
            .enumerate()
            .filter(|(index, sig)| {
                self.allocator.is_alive(EntityId::from_index(*index as u32)) && (*sig & mask) == mask
            })
            .map(|(index, _)| EntityId::from_index(index as u32))
            .collect()
    }

    pub fn view1<A: Component>(&self) -> Vec<EntityId> {
        self.view(&[TypeId::of::<A>()])
    }

    pub fn view2<A: Component, B: Component>(&self) -> Vec<EntityId> {
        self.view(&[TypeId::of::<A>(), TypeId::of::<B>()])
    }

    pub fn view3<A: Component, B: Component, C: Component>(&self) -> Vec<EntityId> {
        self.view(&[TypeId::of::<A>(), TypeId::of::<B>(), TypeId::of::<C>()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pos(f32, f32);
    struct Vel(f32, f32);

    #[test]
    fn set_get_has_remove_roundtrip() {
        let mut reg = Registry::new();
        let e = reg.new_entity();
        assert!(!reg.has::<Pos>(e));
        reg.set(e, Pos(1.0, 2.0));
        assert!(reg.has::<Pos>(e));
        assert_eq!(reg.get::<Pos>(e).map(|p| (p.0, p.1)), Some((1.0, 2.0)));
        reg.remove::<Pos>(e);
        assert!(!reg.has::<Pos>(e));
        assert!(reg.get::<Pos>(e).is_none());
    }

    #[test]
    fn view_filters_by_signature_superset() {
        let mut reg = Registry::new();
        let a = reg.new_entity();
        let b = reg.new_entity();
        reg.set(a, Pos(0.0, 0.0));
        reg.set(a, Vel(1.0, 1.0));
        reg.set(b, Pos(0.0, 0.0));

        let both = reg.view2::<Pos, Vel>();
        assert_eq!(both, vec![a]);

        let just_pos = reg.view1::<Pos>();
        assert_eq!(just_pos, vec![a, b]);
    }

    #[test]
    fn destroy_clears_components_and_is_idempotent() {
        let mut reg = Registry::new();
        let e = reg.new_entity();
        reg.set(e, Pos(1.0, 1.0));
        reg.destroy(e);
        assert!(!reg.is_alive(e));
        assert!(reg.get::<Pos>(e).is_none());
        // Idempotent: destroying twice must not panic.
        reg.destroy(e);
    }

    #[test]
    fn destroyed_entity_excluded_from_views_even_if_slot_reused() {
        let mut reg = Registry::new();
        let a = reg.new_entity();
        reg.set(a, Pos(0.0, 0.0));
        reg.destroy(a);
        let b = reg.new_entity();
        assert_eq!(b, a, "free list should hand back the same index");
        assert!(reg.view1::<Pos>().is_empty());
    }
}
