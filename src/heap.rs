/// The object store: an arena of object slots addressed by `ObjectRef`
/// indices, threaded into an intrusive allocation list through each
/// object's `next` field.
///
/// Freed slots go on a free list and are reused by later allocations.
/// An `ObjectRef` held across a collection that reclaimed its object may
/// therefore alias a newly allocated object in the recycled slot; handles
/// are only stable while the object they name stays reachable.
use crate::object::{Object, ObjectKind, ObjectRef};

enum Slot {
    Used(Object),
    Free { next_free: Option<u32> },
}

pub struct Heap {
    slots: Vec<Slot>,
    free: Option<u32>,
    head: Option<ObjectRef>,
    live: usize,
}

impl Heap {
    pub fn new() -> Heap {
        Heap {
            slots: Vec::new(),
            free: None,
            head: None,
            live: 0,
        }
    }

    /// Allocate an object of the given kind and link it as the new head
    /// of the allocation list. The caller is responsible for running the
    /// collector's threshold check first.
    pub fn alloc(&mut self, kind: ObjectKind) -> ObjectRef {
        let mut object = Object::new(kind);
        object.next = self.head;

        let index = match self.free {
            Some(index) => {
                match self.slots[index as usize] {
                    Slot::Free { next_free } => self.free = next_free,
                    Slot::Used(_) => unreachable!("free list points at a live slot"),
                }
                self.slots[index as usize] = Slot::Used(object);
                index
            }
            None => {
                self.slots.push(Slot::Used(object));
                (self.slots.len() - 1) as u32
            }
        };

        let obj_ref = ObjectRef(index);
        self.head = Some(obj_ref);
        self.live += 1;
        obj_ref
    }

    /// Unlink `node` from the allocation list, given the slot that refers
    /// to it: `None` for the list head, otherwise the predecessor node.
    /// The slot is returned to the free list. Used only by the sweep phase.
    pub fn unlink(&mut self, prev: Option<ObjectRef>, node: ObjectRef) {
        let next = self.get(node).next;

        match prev {
            None => self.head = next,
            Some(prev) => self.get_mut(prev).next = next,
        }

        self.slots[node.index()] = Slot::Free {
            next_free: self.free,
        };
        self.free = Some(node.0);
        self.live -= 1;
    }

    pub fn get(&self, obj_ref: ObjectRef) -> &Object {
        match &self.slots[obj_ref.index()] {
            Slot::Used(object) => object,
            Slot::Free { .. } => panic!("{} refers to a freed slot", obj_ref),
        }
    }

    pub fn get_mut(&mut self, obj_ref: ObjectRef) -> &mut Object {
        match &mut self.slots[obj_ref.index()] {
            Slot::Used(object) => object,
            Slot::Free { .. } => panic!("{} refers to a freed slot", obj_ref),
        }
    }

    /// Slot access for handles that may be stale, e.g. typed into the
    /// console. Returns `None` for a freed or never-allocated slot.
    pub fn try_get(&self, obj_ref: ObjectRef) -> Option<&Object> {
        match self.slots.get(obj_ref.index()) {
            Some(Slot::Used(object)) => Some(object),
            _ => None,
        }
    }

    /// Point a pair's `first` field at `target`. Panics if `obj_ref` is
    /// not a pair; the console guards for that, internal callers know.
    pub fn set_first(&mut self, obj_ref: ObjectRef, target: Option<ObjectRef>) {
        match &mut self.get_mut(obj_ref).kind {
            ObjectKind::Pair { first, .. } => *first = target,
            ObjectKind::Scalar(_) => panic!("{} is not a pair", obj_ref),
        }
    }

    /// Point a pair's `second` field at `target`.
    pub fn set_second(&mut self, obj_ref: ObjectRef, target: Option<ObjectRef>) {
        match &mut self.get_mut(obj_ref).kind {
            ObjectKind::Pair { second, .. } => *second = target,
            ObjectKind::Scalar(_) => panic!("{} is not a pair", obj_ref),
        }
    }

    pub fn head(&self) -> Option<ObjectRef> {
        self.head
    }

    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Traverse the allocation list in link order, starting from the
    /// current head. Allocation during traversal is not supported.
    pub fn iter(&self) -> ListIter<'_> {
        ListIter {
            heap: self,
            cursor: self.head,
        }
    }
}

/// Lazy in-order traversal of the allocation list
pub struct ListIter<'heap> {
    heap: &'heap Heap,
    cursor: Option<ObjectRef>,
}

impl<'heap> Iterator for ListIter<'heap> {
    type Item = ObjectRef;

    fn next(&mut self) -> Option<ObjectRef> {
        let current = self.cursor?;
        self.cursor = self.heap.get(current).next;
        Some(current)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn alloc_links_at_head() {
        let mut heap = Heap::new();
        let a = heap.alloc(ObjectKind::Scalar(1));
        let b = heap.alloc(ObjectKind::Scalar(2));

        assert_eq!(heap.head(), Some(b));
        assert_eq!(heap.get(b).next, Some(a));
        assert_eq!(heap.get(a).next, None);
        assert_eq!(heap.live_count(), 2);
    }

    #[test]
    fn iter_walks_most_recent_first() {
        let mut heap = Heap::new();
        let a = heap.alloc(ObjectKind::Scalar(1));
        let b = heap.alloc(ObjectKind::Scalar(2));
        let c = heap.alloc(ObjectKind::Scalar(3));

        let order: Vec<ObjectRef> = heap.iter().collect();
        assert_eq!(order, vec![c, b, a]);
    }

    #[test]
    fn unlink_head_advances_head() {
        let mut heap = Heap::new();
        let a = heap.alloc(ObjectKind::Scalar(1));
        let b = heap.alloc(ObjectKind::Scalar(2));

        heap.unlink(None, b);

        assert_eq!(heap.head(), Some(a));
        assert_eq!(heap.live_count(), 1);
        assert!(heap.try_get(b).is_none());
    }

    #[test]
    fn unlink_interior_relinks_predecessor() {
        let mut heap = Heap::new();
        let a = heap.alloc(ObjectKind::Scalar(1));
        let b = heap.alloc(ObjectKind::Scalar(2));
        let c = heap.alloc(ObjectKind::Scalar(3));

        // list is c -> b -> a; remove b
        heap.unlink(Some(c), b);

        let order: Vec<ObjectRef> = heap.iter().collect();
        assert_eq!(order, vec![c, a]);
        assert_eq!(heap.live_count(), 2);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut heap = Heap::new();
        let a = heap.alloc(ObjectKind::Scalar(1));
        let _b = heap.alloc(ObjectKind::Scalar(2));

        heap.unlink(None, heap.head().unwrap());
        let c = heap.alloc(ObjectKind::Scalar(3));

        // the recycled slot gives c the same index the freed object had
        assert_eq!(c.index(), 1);
        assert_ne!(c, a);
    }

    #[test]
    fn stale_handle_aliases_recycled_slot() {
        // Index reuse means a handle that outlives its object observes
        // whatever gets allocated into the slot next.
        let mut heap = Heap::new();
        let _keep = heap.alloc(ObjectKind::Scalar(1));
        let stale = heap.alloc(ObjectKind::Scalar(2));

        heap.unlink(None, stale);
        let replacement = heap.alloc(ObjectKind::Scalar(99));

        assert_eq!(stale, replacement);
        assert_eq!(heap.get(stale).kind, ObjectKind::Scalar(99));
    }

    #[test]
    fn pair_fields_can_be_rewired() {
        let mut heap = Heap::new();
        let a = heap.alloc(ObjectKind::Scalar(1));
        let p = heap.alloc(ObjectKind::empty_pair());

        heap.set_first(p, Some(a));
        heap.set_second(p, Some(p));

        match heap.get(p).kind {
            ObjectKind::Pair { first, second } => {
                assert_eq!(first, Some(a));
                assert_eq!(second, Some(p));
            }
            _ => panic!("expected a pair"),
        }
    }
}
