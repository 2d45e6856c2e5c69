use std::fmt;

/// An index into the heap arena, used wherever one object refers to
/// another. Copyable and comparable by identity (slot index). A nullable
/// reference is an `Option<ObjectRef>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef(pub u32);

impl ObjectRef {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The two kinds of heap object. Exhaustive pattern matches over this
/// enum are relied on throughout allocation, marking and sweeping, so
/// adding a kind is a compile-checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Scalar(i64),
    Pair {
        first: Option<ObjectRef>,
        second: Option<ObjectRef>,
    },
}

impl ObjectKind {
    /// A Pair with both fields nil, ready to be wired up
    pub fn empty_pair() -> ObjectKind {
        ObjectKind::Pair {
            first: None,
            second: None,
        }
    }
}

/// A heap node: the mark bit, the link to the next node in the
/// allocation list (most recently allocated first), and the payload.
#[derive(Debug)]
pub struct Object {
    pub mark: bool,
    pub next: Option<ObjectRef>,
    pub kind: ObjectKind,
}

impl Object {
    /// A freshly allocated object is unmarked; the heap sets `next`
    /// when it links the node in.
    pub fn new(kind: ObjectKind) -> Object {
        Object {
            mark: false,
            next: None,
            kind,
        }
    }
}
