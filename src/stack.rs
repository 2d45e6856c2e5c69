/// The root set: a bounded, ordered stack of references to objects the
/// program can directly observe. This is the sole source of reachability
/// roots for the collector. The same object may be pushed more than once.
use crate::error::{err_overflow, err_underflow, RuntimeError};
use crate::object::ObjectRef;

pub struct RootStack {
    slots: Vec<ObjectRef>,
    capacity: usize,
}

impl RootStack {
    pub fn new(capacity: usize) -> RootStack {
        RootStack {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a root at the top of the stack
    pub fn push(&mut self, obj_ref: ObjectRef) -> Result<(), RuntimeError> {
        if self.slots.len() == self.capacity {
            return Err(err_overflow());
        }
        self.slots.push(obj_ref);
        Ok(())
    }

    /// Remove and return the top root. The vacated slot is removed
    /// outright, so no dangling reference remains to be scanned.
    pub fn pop(&mut self) -> Result<ObjectRef, RuntimeError> {
        self.slots.pop().ok_or_else(err_underflow)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> ObjectRef {
        self.slots[index]
    }

    /// Enumerate the roots bottom-up, for the collector's mark phase
    pub fn iter(&self) -> impl Iterator<Item = ObjectRef> + '_ {
        self.slots.iter().copied()
    }

    /// Drop every root at once; teardown runs this before its final
    /// collection so that nothing survives it.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn push_then_pop_returns_same_ref() {
        let mut roots = RootStack::new(4);
        roots.push(ObjectRef(9)).unwrap();
        assert_eq!(roots.pop().unwrap(), ObjectRef(9));
        assert!(roots.is_empty());
    }

    #[test]
    fn push_beyond_capacity_overflows() {
        let mut roots = RootStack::new(2);
        roots.push(ObjectRef(0)).unwrap();
        roots.push(ObjectRef(1)).unwrap();

        let err = roots.push(ObjectRef(2)).unwrap_err();
        assert_eq!(err.error_kind(), ErrorKind::StackOverflow);
        assert_eq!(roots.len(), 2);
    }

    #[test]
    fn pop_empty_underflows() {
        let mut roots = RootStack::new(2);
        let err = roots.pop().unwrap_err();
        assert_eq!(err.error_kind(), ErrorKind::StackUnderflow);
    }

    #[test]
    fn duplicates_are_allowed() {
        let mut roots = RootStack::new(4);
        roots.push(ObjectRef(5)).unwrap();
        roots.push(ObjectRef(5)).unwrap();

        let all: Vec<ObjectRef> = roots.iter().collect();
        assert_eq!(all, vec![ObjectRef(5), ObjectRef(5)]);
    }

    #[test]
    fn clear_empties_the_stack() {
        let mut roots = RootStack::new(4);
        roots.push(ObjectRef(1)).unwrap();
        roots.push(ObjectRef(2)).unwrap();
        roots.clear();
        assert!(roots.is_empty());
    }

    #[test]
    fn get_indexes_from_the_bottom() {
        let mut roots = RootStack::new(4);
        roots.push(ObjectRef(1)).unwrap();
        roots.push(ObjectRef(2)).unwrap();
        assert_eq!(roots.get(0), ObjectRef(1));
        assert_eq!(roots.get(1), ObjectRef(2));
    }
}
