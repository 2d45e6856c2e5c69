/// Scripted demonstration scenarios, runnable with `--demo`. Each one
/// builds a small object graph, forces a collection and tears the
/// runtime down, printing what the collector reclaimed along the way.
use crate::error::RuntimeError;
use crate::printer::print_heap;
use crate::vm::Vm;

fn demo_vm() -> Vm {
    Vm::default().verbose(true)
}

fn preserved_roots() -> Result<(), RuntimeError> {
    println!("1: objects on the stack are preserved");
    let mut vm = demo_vm();
    vm.push_scalar(1)?;
    vm.push_scalar(2)?;

    vm.collect();
    vm.teardown();
    Ok(())
}

fn unreached_objects() -> Result<(), RuntimeError> {
    println!("2: unreached objects are collected");
    let mut vm = demo_vm();
    vm.push_scalar(1)?;
    vm.push_scalar(2)?;
    vm.pop()?;
    vm.pop()?;
    vm.push_scalar(3)?;
    vm.push_scalar(4)?;

    vm.collect();
    vm.teardown();
    Ok(())
}

fn nested_pairs() -> Result<(), RuntimeError> {
    println!("3: nested objects are reached through one root");
    let mut vm = demo_vm();
    vm.push_scalar(1)?;
    vm.push_scalar(2)?;
    vm.push_pair()?;
    vm.push_scalar(3)?;
    vm.push_scalar(4)?;
    vm.push_pair()?;
    vm.push_pair()?;

    println!("{}", print_heap(vm.heap()));
    vm.collect();
    vm.teardown();
    Ok(())
}

fn cycles() -> Result<(), RuntimeError> {
    println!("4: a rooted cycle survives; unrooted it is reclaimed");
    let mut vm = demo_vm();
    vm.push_scalar(1)?;
    vm.push_scalar(2)?;
    let a = vm.push_pair()?;
    vm.push_scalar(3)?;
    vm.push_scalar(4)?;
    let b = vm.push_pair()?;

    vm.set_pair_second(a, Some(b));
    vm.set_pair_second(b, Some(a));

    println!("{}", print_heap(vm.heap()));
    vm.collect();

    // drop both roots: nothing refers to the cycle from outside, the
    // case naive reference counting would leak
    vm.pop()?;
    vm.pop()?;
    vm.collect();

    vm.teardown();
    Ok(())
}

pub fn run_all() -> Result<(), RuntimeError> {
    preserved_roots()?;
    unreached_objects()?;
    nested_pairs()?;
    cycles()?;
    Ok(())
}
