use std::collections::HashMap;

use crate::error::PoolError;
use crate::identity::DrawableIdentity;
use crate::layout::UniformBlock;
use crate::records::UniformRecord;

/// Fixed-capacity slot array laid out exactly as the shader uniform array.
///
/// The first `active_count()` slots are always exactly the live records, in
/// no particular order; the shader loops over `0..active_count`. Removing a
/// record moves the last live record into the freed slot and remaps its
/// identity, so every operation is O(1).
#[derive(Debug, Clone)]
pub struct UniformPool<R: UniformRecord> {
    records: Vec<R>,
    /// Identity owning each active slot, indexed by slot.
    owners: Vec<DrawableIdentity>,
    slots: HashMap<DrawableIdentity, usize>,
}

impl<R: UniformRecord> UniformPool<R> {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: vec![R::blank(); capacity],
            owners: Vec::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.records.len()
    }

    pub fn active_count(&self) -> usize {
        self.owners.len()
    }

    pub fn is_full(&self) -> bool {
        self.active_count() == self.capacity()
    }

    pub fn contains(&self, identity: DrawableIdentity) -> bool {
        self.slots.contains_key(&identity)
    }

    /// Physical slot currently holding `identity`.
    pub fn slot_of(&self, identity: DrawableIdentity) -> Option<usize> {
        self.slots.get(&identity).copied()
    }

    /// Identities of the active slots, in slot order.
    pub fn identities(&self) -> &[DrawableIdentity] {
        &self.owners
    }

    /// The whole array, blanks included; what the shader binds.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn active_records(&self) -> &[R] {
        &self.records[..self.active_count()]
    }

    /// Borrow the backing array for binding. Nothing is copied.
    pub fn block(&self) -> UniformBlock<'_, R> {
        UniformBlock {
            records: &self.records,
            count: self.active_count() as u32,
        }
    }

    pub fn create(&mut self) -> Result<DrawableIdentity, PoolError> {
        if self.is_full() {
            return Err(PoolError::CapacityExceeded {
                kind: R::KIND,
                capacity: self.capacity(),
            });
        }
        let identity = DrawableIdentity::new();
        let slot = self.owners.len();
        self.records[slot] = R::blank();
        self.owners.push(identity);
        self.slots.insert(identity, slot);
        Ok(identity)
    }

    pub fn get(&self, identity: DrawableIdentity) -> Result<&R, PoolError> {
        let slot = self.lookup(identity)?;
        Ok(&self.records[slot])
    }

    /// Mutate the record in place; visible on the next read of `records()`.
    pub fn update<F>(&mut self, identity: DrawableIdentity, f: F) -> Result<(), PoolError>
    where
        F: FnOnce(&mut R),
    {
        let slot = self.lookup(identity)?;
        f(&mut self.records[slot]);
        Ok(())
    }

    pub fn remove(&mut self, identity: DrawableIdentity) -> Result<(), PoolError> {
        let slot = self
            .slots
            .remove(&identity)
            .ok_or(PoolError::UnknownIdentity {
                kind: R::KIND,
                identity,
            })?;

        let last = self.owners.len() - 1;
        if slot != last {
            self.records.swap(slot, last);
            let moved = self.owners[last];
            self.owners[slot] = moved;
            self.slots.insert(moved, slot);
        }
        self.owners.pop();
        self.records[last] = R::blank();
        Ok(())
    }

    fn lookup(&self, identity: DrawableIdentity) -> Result<usize, PoolError> {
        self.slot_of(identity).ok_or(PoolError::UnknownIdentity {
            kind: R::KIND,
            identity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::UniformPool;
    use crate::error::PoolError;
    use crate::identity::DrawableIdentity;
    use crate::layout::CircleUniform;
    use crate::records::UniformRecord;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn set_radius(pool: &mut UniformPool<CircleUniform>, id: DrawableIdentity, r: f32) {
        pool.update(id, |c| c.radius = r).unwrap();
    }

    /// Live records occupy exactly `[0, active_count)` and resolve through
    /// their identities; everything past the active range is blank.
    fn assert_compact(pool: &UniformPool<CircleUniform>, model: &HashMap<DrawableIdentity, f32>) {
        assert_eq!(pool.active_count(), model.len());
        for (id, radius) in model {
            let slot = pool.slot_of(*id).unwrap();
            assert!(slot < pool.active_count());
            assert_eq!(pool.records()[slot].radius, *radius);
            assert_eq!(pool.identities()[slot], *id);
        }
        for blank in &pool.records()[pool.active_count()..] {
            assert_eq!(*blank, CircleUniform::blank());
        }
    }

    #[test]
    fn slots_stay_compact_under_interleaved_operations() {
        let mut pool = UniformPool::<CircleUniform>::new(6);
        let mut model: HashMap<DrawableIdentity, f32> = HashMap::new();
        let mut live: Vec<DrawableIdentity> = Vec::new();
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;

        for step in 0..500 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let roll = (seed >> 33) as usize;
            if roll % 3 != 0 && !pool.is_full() {
                let id = pool.create().unwrap();
                set_radius(&mut pool, id, step as f32);
                model.insert(id, step as f32);
                live.push(id);
            } else if !live.is_empty() {
                let id = live.swap_remove(roll % live.len());
                pool.remove(id).unwrap();
                model.remove(&id);
            }
            assert_compact(&pool, &model);
        }
    }

    #[test]
    fn identity_survives_removal_of_others() {
        let mut pool = UniformPool::<CircleUniform>::new(4);
        let a = pool.create().unwrap();
        let b = pool.create().unwrap();
        let c = pool.create().unwrap();
        set_radius(&mut pool, c, 30.0);

        pool.remove(a).unwrap();
        assert_eq!(pool.slot_of(c), Some(0));
        let d = pool.create().unwrap();
        pool.remove(b).unwrap();
        set_radius(&mut pool, d, 40.0);

        assert_eq!(pool.get(c).unwrap().radius, 30.0);
        set_radius(&mut pool, c, 31.0);
        assert_eq!(pool.get(c).unwrap().radius, 31.0);
        assert_eq!(pool.get(d).unwrap().radius, 40.0);
        assert_eq!(pool.active_count(), 2);
    }

    #[test]
    fn full_pool_rejects_create() {
        let mut pool = UniformPool::<CircleUniform>::new(1);
        pool.create().unwrap();
        assert_eq!(
            pool.create(),
            Err(PoolError::CapacityExceeded {
                kind: "circle",
                capacity: 1
            })
        );
    }

    #[test]
    fn removed_identity_is_unknown() {
        let mut pool = UniformPool::<CircleUniform>::new(2);
        let a = pool.create().unwrap();
        pool.remove(a).unwrap();
        let unknown = PoolError::UnknownIdentity {
            kind: "circle",
            identity: a,
        };
        assert_eq!(pool.remove(a), Err(unknown.clone()));
        assert_eq!(pool.update(a, |c| c.radius = 1.0), Err(unknown.clone()));
        assert_eq!(pool.get(a).err(), Some(unknown));
        assert!(!pool.contains(a));
    }

    #[test]
    fn zero_capacity_pool_is_always_full() {
        let mut pool = UniformPool::<CircleUniform>::new(0);
        assert!(pool.is_full());
        assert!(pool.create().is_err());
        assert!(pool.records().is_empty());
    }
}
