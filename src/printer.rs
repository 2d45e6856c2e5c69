/// Rendering for the demo harness and console. Pair fields are printed
/// one level deep, children as bare handles, so cyclic graphs print in
/// finite space.
use itertools::Itertools;

use crate::heap::Heap;
use crate::object::{ObjectKind, ObjectRef};
use crate::stack::RootStack;

/// Render a nullable reference the way a pair field sees it
pub fn print_field(field: Option<ObjectRef>) -> String {
    match field {
        Some(obj_ref) => format!("{}", obj_ref),
        None => String::from("nil"),
    }
}

/// Render one object: `#3=5` for a scalar, `#4=(#3 . nil)` for a pair
pub fn print_object(heap: &Heap, obj_ref: ObjectRef) -> String {
    match heap.get(obj_ref).kind {
        ObjectKind::Scalar(value) => format!("{}={}", obj_ref, value),
        ObjectKind::Pair { first, second } => format!(
            "{}=({} . {})",
            obj_ref,
            print_field(first),
            print_field(second)
        ),
    }
}

/// Render the whole allocation list, most recently allocated first
pub fn print_heap(heap: &Heap) -> String {
    if heap.live_count() == 0 {
        return String::from("heap: empty");
    }
    let listing = heap.iter().map(|obj_ref| print_object(heap, obj_ref)).join(" ");
    format!("heap: {}", listing)
}

/// Render the root stack, bottom first
pub fn print_roots(roots: &RootStack) -> String {
    if roots.is_empty() {
        return String::from("stack: empty");
    }
    let listing = roots.iter().map(|obj_ref| format!("{}", obj_ref)).join(" ");
    format!("stack: {}", listing)
}
