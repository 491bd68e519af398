use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::registrant::{identity, SharedRegistrant};

/// Ordered set of registrants, deduplicated by identity.
///
/// Performance characteristics:
/// - `insert()` / `remove()` are O(n); sets are expected to stay small
/// - `snapshot()` clones the `Rc` handles, never the registrants
#[derive(Default)]
pub struct Registry {
    entries: Vec<SharedRegistrant>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `registrant` unless the same handle is already present.
    ///
    /// Returns `true` when inserted.
    pub fn insert(&mut self, registrant: SharedRegistrant) -> bool {
        if self.contains(&registrant) {
            return false;
        }
        self.entries.push(registrant);
        true
    }

    /// Removes `registrant` by identity. Returns `true` when it was present.
    pub fn remove<R: ?Sized>(&mut self, registrant: &Rc<RefCell<R>>) -> bool {
        let id = identity(registrant);
        match self.entries.iter().position(|e| identity(e) == id) {
            Some(index) => {
                // `remove` rather than `swap_remove`: insertion order is dispatch order.
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains<R: ?Sized>(&self, registrant: &Rc<RefCell<R>>) -> bool {
        let id = identity(registrant);
        self.entries.iter().any(|e| identity(e) == id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy of the current order, used as the iteration source for one tick.
    pub fn snapshot(&self) -> Vec<SharedRegistrant> {
        self.entries.clone()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("len", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registrant::shared;

    fn noop() -> Rc<RefCell<impl FnMut(f64)>> {
        shared(|_dt: f64| {})
    }

    #[test]
    fn insert_rejects_same_handle() {
        let mut reg = Registry::new();
        let a = noop();

        assert!(reg.insert(a.clone()));
        assert!(!reg.insert(a.clone()));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn equal_closures_are_distinct_registrants() {
        let mut reg = Registry::new();
        assert!(reg.insert(noop()));
        assert!(reg.insert(noop()));
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut reg = Registry::new();
        let a = noop();
        let b = noop();
        reg.insert(a.clone());

        assert!(!reg.remove(&b));
        assert_eq!(reg.len(), 1);
        assert!(reg.contains(&a));
    }

    #[test]
    fn remove_accepts_erased_handle() {
        let mut reg = Registry::new();
        let a: SharedRegistrant = noop();
        reg.insert(a.clone());

        assert!(reg.remove(&a));
        assert!(reg.is_empty());
    }

    #[test]
    fn remove_preserves_order_of_others() {
        let mut reg = Registry::new();
        let handles: Vec<_> = (0..4).map(|_| noop()).collect();
        for h in &handles {
            reg.insert(h.clone());
        }

        reg.remove(&handles[1]);

        let order: Vec<usize> = reg.snapshot().iter().map(identity).collect();
        let expected: Vec<usize> = [0, 2, 3].iter().map(|&i| identity(&handles[i])).collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn mixed_sequences_match_model() {
        // Deterministic pseudo-random walk over register/unregister calls,
        // checked against a plain Vec model after every step.
        let handles: Vec<_> = (0..5).map(|_| noop()).collect();
        let mut reg = Registry::new();
        let mut model: Vec<usize> = Vec::new();
        let mut seed: u32 = 0x2545_f491;

        for _ in 0..500 {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let pick = (seed >> 16) as usize % handles.len();
            let id = identity(&handles[pick]);

            if (seed >> 24) & 1 == 0 {
                let inserted = reg.insert(handles[pick].clone());
                assert_eq!(inserted, !model.contains(&id));
                if inserted {
                    model.push(id);
                }
            } else {
                let removed = reg.remove(&handles[pick]);
                assert_eq!(removed, model.contains(&id));
                model.retain(|m| *m != id);
            }

            let order: Vec<usize> = reg.snapshot().iter().map(identity).collect();
            assert_eq!(order, model);
        }
    }
}
