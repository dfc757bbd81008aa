//! Canned IR programs
//!
//! Small modules assembled through the public builder API. The driver
//! prints them and the tests use them as end-to-end fixtures.

use crate::{IrBuilder, IrError, Module, Type};

/// A named sample program
pub struct Sample {
    pub name: &'static str,
    pub description: &'static str,
    pub build: fn() -> Result<Module, IrError>,
}

pub const SAMPLES: &[Sample] = &[
    Sample {
        name: "arithmetic",
        description: "stack slot, store, load and add in a single block",
        build: arithmetic,
    },
    Sample {
        name: "branch",
        description: "signed comparisons, conditional branch and zext",
        build: branch,
    },
    Sample {
        name: "call",
        description: "globals, calls to value and void functions, getelementptr",
        build: call,
    },
];

pub fn find(name: &str) -> Option<&'static Sample> {
    SAMPLES.iter().find(|s| s.name == name)
}

/// `main` stores 10 into a stack slot, reloads it and returns it plus 20
pub fn arithmetic() -> Result<Module, IrError> {
    let mut module = Module::new("arithmetic");
    let main = module.add_function("main", Type::function(Type::int32(), vec![]))?;
    let entry = module.create_block("entry", Some(main))?;
    let ten = module.const_i32(10)?;
    let twenty = module.const_i32(20)?;

    let mut builder = IrBuilder::at(&mut module, entry);
    let slot = builder.create_alloca(Type::int32())?;
    builder.create_store(ten, slot)?;
    let loaded = builder.create_load(Type::int32(), slot)?;
    let sum = builder.create_add(loaded, twenty)?;
    builder.create_ret(sum)?;

    Ok(module)
}

/// `max(a, b)` choosing between two returning blocks, and `is_positive(x)` widening
/// its `i1` comparison to `i32`
pub fn branch() -> Result<Module, IrError> {
    let mut module = Module::new("branch");
    let binary_ty = Type::function(Type::int32(), vec![Type::int32(), Type::int32()]);
    let max = module.add_function("max", binary_ty)?;
    let (a, b) = (module.args(max)[0], module.args(max)[1]);
    module.set_name(a, "a")?;
    module.set_name(b, "b")?;
    let entry = module.create_block("entry", Some(max))?;
    let then_block = module.create_block("then", Some(max))?;
    let else_block = module.create_block("else", Some(max))?;

    let is_positive = module.add_function("is_positive", Type::function(Type::int32(), vec![Type::int32()]))?;
    let x = module.args(is_positive)[0];
    module.set_name(x, "x")?;
    let body = module.create_block("entry", Some(is_positive))?;
    let zero = module.const_i32(0)?;

    let mut builder = IrBuilder::at(&mut module, entry);
    let greater = builder.create_icmp_gt(a, b)?;
    builder.create_cond_br(greater, then_block, else_block)?;
    builder.set_insert_point(then_block);
    builder.create_ret(a)?;
    builder.set_insert_point(else_block);
    builder.create_ret(b)?;

    builder.set_insert_point(body);
    let positive = builder.create_icmp_gt(x, zero)?;
    let widened = builder.create_zext(positive, Type::int32())?;
    builder.create_ret(widened)?;

    Ok(module)
}

/// Globals read and written from several functions, with one call that
/// yields a value and one that does not
pub fn call() -> Result<Module, IrError> {
    let mut module = Module::new("call");
    let three = module.const_i32(3)?;
    let limit = module.add_global("limit", Type::int32(), true, Some(three))?;
    let counter = module.add_global("counter", Type::int32(), false, None)?;

    let square = module.add_function("square", Type::function(Type::int32(), vec![Type::int32()]))?;
    let n = module.args(square)[0];
    module.set_name(n, "n")?;
    let square_entry = module.create_block("entry", Some(square))?;

    let tick = module.add_function("tick", Type::function(Type::void(), vec![]))?;
    let tick_entry = module.create_block("entry", Some(tick))?;

    let main = module.add_function("main", Type::function(Type::int32(), vec![]))?;
    let main_entry = module.create_block("entry", Some(main))?;

    let one = module.const_i32(1)?;
    let zero = module.const_i32(0)?;

    let mut builder = IrBuilder::at(&mut module, square_entry);
    let product = builder.create_mul(n, n)?;
    builder.create_ret(product)?;

    builder.set_insert_point(tick_entry);
    let current = builder.create_load(Type::int32(), counter)?;
    let next = builder.create_add(current, one)?;
    builder.create_store(next, counter)?;
    builder.create_ret_void()?;

    builder.set_insert_point(main_entry);
    let slot = builder.create_alloca(Type::int32())?;
    let element = builder.create_gep(slot, vec![zero])?;
    let bound = builder.create_load(Type::int32(), limit)?;
    let squared = builder.create_call(square, vec![bound.into()])?;
    builder.create_store(squared, element)?;
    builder.create_call(tick, vec![])?;
    let result = builder.create_load(Type::int32(), slot)?;
    builder.create_ret(result)?;

    Ok(module)
}
