//! Integration tests for concurrent registry population: racing callers
//! must converge on a single factory per value type.

use std::any::{Any, TypeId};
use std::sync::{Arc, Barrier};
use std::thread;

use capsule_runtime::{Capsule, CapsuleRuntime, Manifest, ValueType};

#[derive(Debug, Clone, PartialEq)]
struct Sample {
    sequence: u64,
}

#[derive(Debug)]
struct SampleCapsule {
    value: Sample,
}

impl SampleCapsule {
    fn new(value: Sample) -> Self {
        Self { value }
    }
}

impl Capsule for SampleCapsule {
    fn value_type(&self) -> TypeId {
        TypeId::of::<Sample>()
    }

    fn value_type_name(&self) -> &'static str {
        std::any::type_name::<Sample>()
    }

    fn into_value(self: Box<Self>) -> Box<dyn Any + Send> {
        Box::new(self.value)
    }
}

fn runtime() -> CapsuleRuntime {
    CapsuleRuntime::with_table(Manifest::builder().register(SampleCapsule::new).build())
}

#[test]
fn test_racing_get_converges_on_one_factory() {
    const THREADS: usize = 8;

    let runtime = Arc::new(runtime());
    let barrier = Arc::new(Barrier::new(THREADS));

    let mut handles = Vec::with_capacity(THREADS);
    for _ in 0..THREADS {
        let runtime = Arc::clone(&runtime);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            runtime.registry().get(ValueType::of::<Sample>()).unwrap()
        }));
    }

    let factories: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    for factory in &factories[1..] {
        assert!(Arc::ptr_eq(&factories[0], factory));
    }
    assert_eq!(runtime.registry().cached_len(), 1);
}

#[test]
fn test_concurrent_wrapping_stays_consistent() {
    const THREADS: usize = 4;
    const PER_THREAD: u64 = 100;

    let runtime = Arc::new(runtime());
    let barrier = Arc::new(Barrier::new(THREADS));

    let mut handles = Vec::with_capacity(THREADS);
    for thread_index in 0..THREADS {
        let runtime = Arc::clone(&runtime);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            for i in 0..PER_THREAD {
                let sequence = thread_index as u64 * PER_THREAD + i;
                let capsule = runtime.wrap(Sample { sequence }).unwrap();
                let back: Sample = runtime.unwrap(capsule).unwrap();
                assert_eq!(back.sequence, sequence);
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(runtime.registry().cached_len(), 1);
}
