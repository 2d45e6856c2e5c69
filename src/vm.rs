/// The virtual machine runtime: an owned value tying together the heap,
/// the root stack and the collector. Every operation takes `&mut self`;
/// there is no process-wide state, so independent runtimes coexist and
/// unit tests construct as many as they like.
use crate::collector::{CollectStats, Collector};
use crate::error::RuntimeError;
use crate::heap::Heap;
use crate::object::{ObjectKind, ObjectRef};
use crate::stack::RootStack;

/// Default root stack capacity, matching the original machine
pub const STACK_MAX_SIZE: usize = 256;

/// Default initial collection threshold
pub const INITIAL_GC_THRESHOLD: usize = 8;

pub struct Vm {
    heap: Heap,
    roots: RootStack,
    collector: Collector,
    verbose: bool,
}

impl Vm {
    pub fn new(stack_capacity: usize, initial_threshold: usize) -> Vm {
        Vm {
            heap: Heap::new(),
            roots: RootStack::new(stack_capacity),
            collector: Collector::new(initial_threshold),
            verbose: false,
        }
    }

    /// When enabled, every collection (automatic or forced) reports what
    /// it reclaimed on stdout. The demo harness and console turn this on.
    pub fn verbose(mut self, enabled: bool) -> Vm {
        self.verbose = enabled;
        self
    }

    /// Allocate a scalar and push it onto the root stack
    pub fn push_scalar(&mut self, value: i64) -> Result<ObjectRef, RuntimeError> {
        let obj_ref = self.alloc(ObjectKind::Scalar(value));
        self.roots.push(obj_ref)?;
        Ok(obj_ref)
    }

    /// Pop two roots and push a pair referencing them. The first pop
    /// becomes `first`, the second pop becomes `second`: pushing 1 then 2
    /// and calling `push_pair` yields the pair (2, 1).
    ///
    /// The pair is allocated before the operands are popped so that both
    /// stay rooted if the allocation triggers a collection. If the stack
    /// is too shallow the half-built pair is left unrooted for the next
    /// collection to reclaim.
    pub fn push_pair(&mut self) -> Result<ObjectRef, RuntimeError> {
        let obj_ref = self.alloc(ObjectKind::empty_pair());

        let first = self.roots.pop()?;
        self.heap.set_first(obj_ref, Some(first));
        let second = self.roots.pop()?;
        self.heap.set_second(obj_ref, Some(second));

        self.roots.push(obj_ref)?;
        Ok(obj_ref)
    }

    /// Remove and return the top root
    pub fn pop(&mut self) -> Result<ObjectRef, RuntimeError> {
        self.roots.pop()
    }

    /// Rewire a pair's `first` field, e.g. to build a cycle
    pub fn set_pair_first(&mut self, pair: ObjectRef, target: Option<ObjectRef>) {
        self.heap.set_first(pair, target);
    }

    /// Rewire a pair's `second` field
    pub fn set_pair_second(&mut self, pair: ObjectRef, target: Option<ObjectRef>) {
        self.heap.set_second(pair, target);
    }

    /// Force a full collection
    pub fn collect(&mut self) -> CollectStats {
        let stats = self.collector.collect(&mut self.heap, &self.roots);
        if self.verbose {
            println!(
                "collected {} objects, {} remaining",
                stats.reclaimed, stats.surviving
            );
        }
        stats
    }

    /// Drop every root, then collect: reclaims the whole heap
    pub fn teardown(&mut self) -> CollectStats {
        self.roots.clear();
        self.collect()
    }

    /// Threshold check plus allocation: the collector may run a full
    /// collection here, synchronously, before the new object is created
    fn alloc(&mut self, kind: ObjectKind) -> ObjectRef {
        if self.collector.should_collect(&self.heap) {
            self.collect();
        }
        self.heap.alloc(kind)
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn roots(&self) -> &RootStack {
        &self.roots
    }

    pub fn live_count(&self) -> usize {
        self.heap.live_count()
    }
}

impl Default for Vm {
    fn default() -> Vm {
        Vm::new(STACK_MAX_SIZE, INITIAL_GC_THRESHOLD)
    }
}
