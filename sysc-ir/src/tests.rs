//! Unit tests for the IR crate

use super::*;

fn int_fn(module: &mut Module, name: &str, params: usize) -> FunctionId {
    let ty = Type::function(Type::int32(), vec![Type::int32(); params]);
    module.add_function(name, ty).unwrap()
}

#[test]
fn test_ir_values() {
    let mut module = Module::new("test");
    let constant = module.const_i32(42).unwrap();
    let main = int_fn(&mut module, "main", 1);
    let arg = module.args(main)[0];
    let global = module.add_global("g", Type::int32(), false, None).unwrap();

    assert_eq!(module.display_value(constant).to_string(), "42");
    assert_eq!(module.display_value(main).to_string(), "@main");
    assert_eq!(module.display_value(global).to_string(), "@g");
    assert_eq!(module.display_value(arg).to_string(), "%arg0");
    assert_eq!(module.const_value(constant), Some(42));
    assert_eq!(module.argument_index(arg), Some(0));
    assert!(module[constant].operands().is_empty());
}

#[test]
fn test_operands_register_uses() {
    let mut module = Module::new("test");
    let main = int_fn(&mut module, "main", 2);
    let entry = module.create_block("entry", Some(main)).unwrap();
    let (a, b) = (module.args(main)[0], module.args(main)[1]);

    let add = module.binary_inst(BinaryOp::Add, a, b, Some(entry)).unwrap();
    assert_eq!(module.uses(a), &[Use { user: add.into(), operand: 0 }]);
    assert_eq!(module.uses(b), &[Use { user: add.into(), operand: 1 }]);
    assert_eq!(module.operand(add, 0), Some(a));
    assert_eq!(module.operand(add, 1), Some(b));
    assert_eq!(module.num_operands(add), 2);
}

#[test]
fn test_set_operand_moves_use_edge() {
    let mut module = Module::new("test");
    let main = int_fn(&mut module, "main", 2);
    let entry = module.create_block("entry", Some(main)).unwrap();
    let (a, b) = (module.args(main)[0], module.args(main)[1]);
    let c = module.const_i32(7).unwrap();

    let add = module.binary_inst(BinaryOp::Add, a, b, Some(entry)).unwrap();
    module.set_operand(add, 1, c).unwrap();

    assert_eq!(module.operand(add, 1), Some(c));
    assert!(module.uses(b).is_empty());
    assert_eq!(module.uses(c), &[Use { user: add.into(), operand: 1 }]);
    assert_eq!(module.uses(a).len(), 1);
}

#[test]
fn test_set_operand_out_of_range() {
    let mut module = Module::new("test");
    let main = int_fn(&mut module, "main", 1);
    let entry = module.create_block("entry", Some(main)).unwrap();
    let a = module.args(main)[0];
    let ret = module.ret_inst(Some(a), Some(entry)).unwrap();

    let err = module.set_operand(ret, 1, a).unwrap_err();
    assert_eq!(err, IrError::OperandIndexOutOfRange { index: 1, num_operands: 1 });
    assert_eq!(module.uses(a).len(), 1);
}

#[test]
fn test_add_operand_grows_user() {
    let mut module = Module::new("test");
    let callee = int_fn(&mut module, "f", 0);
    let main = int_fn(&mut module, "main", 0);
    let entry = module.create_block("entry", Some(main)).unwrap();
    let call = module.call_inst(callee, vec![], Some(entry)).unwrap();
    let extra = module.const_i32(1).unwrap();

    module.add_operand(call, extra).unwrap();
    assert_eq!(module.num_operands(call), 2);
    assert_eq!(module.uses(extra), &[Use { user: call.into(), operand: 1 }]);
    assert_eq!(module.uses(callee), &[Use { user: call.into(), operand: 0 }]);
}

#[test]
fn test_replace_all_uses_with() {
    let mut module = Module::new("test");
    let main = int_fn(&mut module, "main", 2);
    let entry = module.create_block("entry", Some(main)).unwrap();
    let (a, b) = (module.args(main)[0], module.args(main)[1]);

    let mut builder = IrBuilder::at(&mut module, entry);
    let sum = builder.create_add(a, b).unwrap();
    let doubled = builder.create_mul(a, a).unwrap();
    builder.create_ret(sum).unwrap();

    module.replace_all_uses_with(a, b).unwrap();

    assert!(module.uses(a).is_empty());
    assert_eq!(module.operand_number(sum, a), None);
    assert_eq!(module.operand_number(doubled, a), None);
    assert_eq!(module.operand(doubled, 0), Some(b));
    assert_eq!(module.operand(doubled, 1), Some(b));
    // one pre-existing edge from `sum`, plus the three moved ones
    assert_eq!(module.uses(b).len(), 4);
    for edge in module.uses(b) {
        assert_eq!(module.operand(edge.user, edge.operand), Some(b));
    }
}

#[test]
fn test_replace_all_uses_with_itself() {
    let mut module = Module::new("test");
    let main = int_fn(&mut module, "main", 1);
    let entry = module.create_block("entry", Some(main)).unwrap();
    let a = module.args(main)[0];
    module.ret_inst(Some(a), Some(entry)).unwrap();

    module.replace_all_uses_with(a, a).unwrap();
    assert_eq!(module.uses(a).len(), 1);
}

#[test]
fn test_basic_block() {
    let mut module = Module::new("test");
    let main = int_fn(&mut module, "main", 0);
    let block = module.create_block("entry", Some(main)).unwrap();
    assert!(module[block].is_empty());
    assert!(!module.has_terminator(block));
    assert_eq!(module[block].parent(), Some(main));
    assert!(Type::same(module.ty(block), &Type::label()));

    let slot = module.alloca_inst(Type::int32(), Some(block)).unwrap();
    assert!(!module[block].is_empty());
    assert!(!module.has_terminator(block));
    assert_eq!(module[slot].parent(), Some(block));

    let zero = module.const_i32(0).unwrap();
    let ret = module.ret_inst(Some(zero), Some(block)).unwrap();
    assert!(module.has_terminator(block));
    assert_eq!(module.terminator(block), Some(ret));
    assert_eq!(module.instructions(block), &[slot, ret]);
}

#[test]
fn test_no_instruction_after_terminator() {
    let mut module = Module::new("test");
    let main = int_fn(&mut module, "main", 0);
    let block = module.create_block("entry", Some(main)).unwrap();
    module.ret_inst(None, Some(block)).unwrap();
    let values_before = module.num_values();

    let err = module.alloca_inst(Type::int32(), Some(block)).unwrap_err();
    assert_eq!(err, IrError::BlockAlreadyTerminated { block: "entry".to_string() });
    assert_eq!(module.num_values(), values_before);
    assert_eq!(module.instructions(block).len(), 1);
}

#[test]
fn test_detached_instruction_and_block() {
    let mut module = Module::new("test");
    let main = int_fn(&mut module, "main", 0);
    let block = module.create_block("later", None).unwrap();
    assert!(module.blocks(main).is_empty());
    assert_eq!(module[block].parent(), None);

    let ret = module.ret_inst(None, None).unwrap();
    assert_eq!(module[ret].parent(), None);

    module.append_instruction(block, ret).unwrap();
    module.add_basic_block(main, block).unwrap();
    assert_eq!(module[ret].parent(), Some(block));
    assert_eq!(module.blocks(main), &[block]);

    assert!(matches!(module.append_instruction(block, ret), Err(IrError::BlockAlreadyTerminated { .. })));
    assert!(matches!(module.add_basic_block(main, block), Err(IrError::AlreadyAttached { .. })));
}

#[test]
fn test_function() {
    let mut module = Module::new("test");
    let ty = Type::function(Type::int32(), vec![Type::int32(), Type::int32_ptr()]);
    let function = module.add_function("test", ty).unwrap();

    let args = module.args(function).to_vec();
    assert_eq!(args.len(), 2);
    assert!(Type::same(module.ty(args[0]), &Type::int32()));
    assert!(Type::same(module.ty(args[1]), &Type::int32_ptr()));
    assert_eq!(module.name(args[1]), "arg1");
    assert!(Type::same(module.return_type(function).unwrap(), &Type::int32()));
    assert_eq!(module.entry_block(function), None);
    assert_eq!(module.functions(), &[function]);
}

#[test]
fn test_function_requires_function_type() {
    let mut module = Module::new("test");
    let err = module.add_function("bad", Type::int32()).unwrap_err();
    assert!(matches!(err, IrError::InvalidOperandType { .. }));
    assert!(module.functions().is_empty());
}

#[test]
fn test_instruction_result_types() {
    let mut module = Module::new("test");
    let main = int_fn(&mut module, "main", 1);
    let entry = module.create_block("entry", Some(main)).unwrap();
    let a = module.args(main)[0];

    let mut builder = IrBuilder::at(&mut module, entry);
    let slot = builder.create_alloca(Type::array(Type::int32(), 4)).unwrap();
    let cmp = builder.create_icmp_lt(a, a).unwrap();
    let wide = builder.create_zext(cmp, Type::integer(64)).unwrap();
    let gep = builder.create_gep(slot, vec![a]).unwrap();
    let store = builder.create_store(a, gep).unwrap();

    assert_eq!(module.ty(slot).to_string(), "[4 x i32]*");
    assert_eq!(module.allocated_type(slot).map(|t| t.to_string()), Some("[4 x i32]".to_string()));
    assert!(Type::same(module.ty(cmp), &Type::int1()));
    assert_eq!(module.ty(wide).to_string(), "i64");
    assert_eq!(module.ty(gep).to_string(), "[4 x i32]*");
    assert!(Type::same(module.ty(store), &Type::void()));
    assert_eq!(module.opcode(cmp), Opcode::ICmp(ICmpPredicate::Slt));
    assert!(!module[cmp].is_terminator());
}

#[test]
fn test_memory_requires_pointer() {
    let mut module = Module::new("test");
    let main = int_fn(&mut module, "main", 1);
    let entry = module.create_block("entry", Some(main)).unwrap();
    let a = module.args(main)[0];

    assert!(matches!(
        module.load_inst(Type::int32(), a, Some(entry)),
        Err(IrError::InvalidOperandType { context: "load address", .. })
    ));
    assert!(matches!(
        module.store_inst(a, a, Some(entry)),
        Err(IrError::InvalidOperandType { context: "store address", .. })
    ));
    assert!(matches!(
        module.gep_inst(a, vec![], Some(entry)),
        Err(IrError::InvalidOperandType { .. })
    ));
    assert!(module.instructions(entry).is_empty());
    assert!(module.uses(a).is_empty());
}

#[test]
fn test_call_argument_count() {
    let mut module = Module::new("test");
    let callee = int_fn(&mut module, "f", 2);
    let main = int_fn(&mut module, "main", 0);
    let entry = module.create_block("entry", Some(main)).unwrap();
    let one = module.const_i32(1).unwrap();

    let err = module.call_inst(callee, vec![one], Some(entry)).unwrap_err();
    assert_eq!(
        err,
        IrError::ArgumentCountMismatch { callee: "f".to_string(), expected: 2, found: 1 }
    );
}

#[test]
fn test_global_initializer_must_be_constant() {
    let mut module = Module::new("test");
    let main = int_fn(&mut module, "main", 1);
    let a = module.args(main)[0];

    let err = module.add_global("g", Type::int32(), true, Some(a)).unwrap_err();
    assert!(matches!(err, IrError::InvalidOperandType { context: "global initializer", .. }));
    assert!(module.globals().is_empty());

    let five = module.const_i32(5).unwrap();
    let g = module.add_global("g", Type::int32(), true, Some(five)).unwrap();
    assert!(module[g].is_constant());
    assert_eq!(module.global_initializer(g), Some(five));
    assert_eq!(module.ty(g).to_string(), "i32*");
    assert_eq!(module.get_global("g"), Some(g));
}

#[test]
fn test_foreign_handles_are_rejected() {
    let mut small = Module::new("small");
    let mut large = Module::new("large");
    for i in 0..4 {
        large.const_i32(i).unwrap();
    }
    let foreign = large.const_i32(99).unwrap();

    assert_eq!(small.set_name(foreign, "x"), Err(IrError::UnknownValue(foreign)));
    assert_eq!(small.ret_inst(Some(foreign), None), Err(IrError::UnknownValue(foreign)));
    assert_eq!(small.num_values(), 0);
}

/// Builds `a` = [@main, entry, 7] and `b` = [@other, entry, 99], so every
/// handle of `b` has an index that is also in range for `a`.
fn twin_modules() -> (Module, Module, BlockId, ValueId, BlockId, ValueId) {
    let mut a = Module::new("a");
    let main = int_fn(&mut a, "main", 0);
    let entry = a.create_block("entry", Some(main)).unwrap();
    let seven = a.const_i32(7).unwrap();

    let mut b = Module::new("b");
    let other = int_fn(&mut b, "other", 0);
    let foreign_block = b.create_block("entry", Some(other)).unwrap();
    let foreign = b.const_i32(99).unwrap();

    (a, b, entry, seven, foreign_block, foreign)
}

#[test]
fn test_foreign_handle_with_in_range_index() {
    let (mut a, b, entry, seven, foreign_block, foreign) = twin_modules();
    assert_eq!(foreign.index(), seven.index());
    assert_eq!(foreign_block.as_value().index(), entry.as_value().index());
    assert!(b.owns(foreign));
    assert!(!a.owns(foreign));
    assert!(a.get(foreign).is_none());

    assert_eq!(a.ret_inst(Some(foreign), Some(entry)), Err(IrError::UnknownValue(foreign)));
    assert_eq!(
        a.br_inst(foreign_block, Some(entry)),
        Err(IrError::UnknownValue(foreign_block.as_value()))
    );
    assert_eq!(
        a.append_instruction(foreign_block, InstId(seven)),
        Err(IrError::UnknownValue(foreign_block.as_value()))
    );
    assert_eq!(a.set_name(foreign, "x"), Err(IrError::UnknownValue(foreign)));
    assert_eq!(a.replace_all_uses_with(seven, foreign), Err(IrError::UnknownValue(foreign)));

    assert!(a.instructions(entry).is_empty());
    assert_eq!(a.num_values(), 3);
    assert_eq!(a.name(seven), "");
}

#[test]
#[should_panic(expected = "does not belong to module 'a'")]
fn test_indexing_with_foreign_block_panics() {
    let (a, _b, _entry, _seven, foreign_block, _foreign) = twin_modules();
    let _ = a.instructions(foreign_block);
}

#[test]
fn test_cloned_module_accepts_original_handles() {
    let (a, _b, entry, seven, _foreign_block, _foreign) = twin_modules();
    let mut copy = a.clone();
    copy.ret_inst(Some(seven), Some(entry)).unwrap();
    assert!(copy.has_terminator(entry));
    assert!(!a.has_terminator(entry));
}

#[test]
fn test_operands_only_on_users() {
    let mut module = Module::new("test");
    let main = int_fn(&mut module, "main", 1);
    let entry = module.create_block("entry", Some(main)).unwrap();
    let a = module.args(main)[0];
    let c = module.const_i32(1).unwrap();
    let d = module.const_i32(2).unwrap();

    for non_user in [c, a, entry.as_value(), main.as_value()] {
        assert!(matches!(module.add_operand(non_user, d), Err(IrError::NotAUser { .. })));
        assert!(matches!(module.set_operand(non_user, 0, d), Err(IrError::NotAUser { .. })));
        assert_eq!(module.num_operands(non_user), 0);
    }
    assert!(matches!(
        module.add_operand(c, d),
        Err(IrError::NotAUser { kind: "constant", .. })
    ));

    // only call and getelementptr are variable-arity
    let slot = module.alloca_inst(Type::int32(), Some(entry)).unwrap();
    assert!(matches!(
        module.add_operand(slot, d),
        Err(IrError::NotAUser { kind: "alloca", .. })
    ));
    assert_eq!(module.num_operands(slot), 0);
    assert!(module.uses(d).is_empty());

    let gep = module.gep_inst(slot.into(), vec![], Some(entry)).unwrap();
    module.add_operand(gep, d).unwrap();
    assert_eq!(module.operand(gep, 1), Some(d));
    assert_eq!(module.uses(d), &[Use { user: gep.into(), operand: 1 }]);
}

#[test]
fn test_global_initializer_stays_constant() {
    let mut module = Module::new("test");
    let main = int_fn(&mut module, "main", 1);
    let a = module.args(main)[0];
    let five = module.const_i32(5).unwrap();
    let six = module.const_i32(6).unwrap();
    let g = module.add_global("g", Type::int32(), true, Some(five)).unwrap();

    assert!(matches!(
        module.set_operand(g, 0, a),
        Err(IrError::InvalidOperandType { context: "global initializer", .. })
    ));
    assert!(matches!(
        module.replace_all_uses_with(five, a),
        Err(IrError::InvalidOperandType { context: "global initializer", .. })
    ));
    assert_eq!(module.global_initializer(g), Some(five));
    assert!(module.uses(a).is_empty());

    module.set_operand(g, 0, six).unwrap();
    assert_eq!(module.global_initializer(g), Some(six));
    assert!(module.uses(five).is_empty());
    assert_eq!(module.display_global(g).to_string(), "@g = constant i32 6");
}

#[test]
fn test_arena_index_limit() {
    assert_eq!(crate::module::slot_index(0), Ok(0));
    assert_eq!(crate::module::slot_index(u32::MAX as usize), Ok(u32::MAX));
    if let Some(len) = (u32::MAX as usize).checked_add(1) {
        assert_eq!(crate::module::slot_index(len), Err(IrError::ArenaExhausted));
    }
}

#[test]
fn test_ir_builder_names_exhausted() {
    let mut module = Module::new("test");
    let main = int_fn(&mut module, "main", 1);
    let callee = int_fn(&mut module, "f", 0);
    let entry = module.create_block("entry", Some(main)).unwrap();
    let a = module.args(main)[0];

    let mut builder = IrBuilder::at(&mut module, entry);
    builder.next_name = u32::MAX - 1;
    let last = builder.create_add(a, a).unwrap();
    assert_eq!(builder.create_mul(a, a), Err(IrError::NamesExhausted));
    assert_eq!(builder.create_alloca(Type::int32()), Err(IrError::NamesExhausted));
    assert_eq!(builder.create_call(callee, vec![]), Err(IrError::NamesExhausted));
    // results without a name are still allowed
    builder.create_ret(last).unwrap();

    assert_eq!(module.name(last), (u32::MAX - 1).to_string());
    assert_eq!(module.instructions(entry).len(), 2);
}

#[test]
fn test_ir_builder_naming() {
    let mut module = Module::new("test");
    let first = int_fn(&mut module, "first", 2);
    let second = int_fn(&mut module, "second", 2);
    let b1 = module.create_block("entry", Some(first)).unwrap();
    let b2 = module.create_block("entry", Some(second)).unwrap();
    let b3 = module.create_block("exit", Some(second)).unwrap();
    let (x, y) = (module.args(first)[0], module.args(first)[1]);
    let (p, q) = (module.args(second)[0], module.args(second)[1]);

    let mut builder = IrBuilder::new(&mut module);
    builder.set_insert_point(b1);
    let i0 = builder.create_add(x, y).unwrap();
    let i1 = builder.create_sub(i0, y).unwrap();
    builder.create_ret(i1).unwrap();

    builder.set_insert_point(b2);
    let i2 = builder.create_sdiv(p, q).unwrap();
    let i3 = builder.create_srem(p, q).unwrap();
    builder.create_br(b3).unwrap();

    builder.set_insert_point(b3);
    let i4 = builder.create_icmp_ne(i2, i3).unwrap();
    let i5 = builder.create_zext(i4, Type::int32()).unwrap();
    builder.create_ret(i5).unwrap();
    assert_eq!(builder.insert_point(), Some(b3));

    let names: Vec<&str> = [i0, i1, i2, i3, i4, i5].iter().map(|i| module.name(*i)).collect();
    assert_eq!(names, ["0", "1", "2", "3", "4", "5"]);
}

#[test]
fn test_ir_builder_void_results_are_unnamed() {
    let mut module = Module::new("test");
    let proc_ty = Type::function(Type::void(), vec![]);
    let callee = module.add_function("log", proc_ty).unwrap();
    let value_fn = int_fn(&mut module, "value", 0);
    let main = int_fn(&mut module, "main", 0);
    let entry = module.create_block("entry", Some(main)).unwrap();
    let exit = module.create_block("exit", Some(main)).unwrap();

    let mut builder = IrBuilder::at(&mut module, entry);
    let slot = builder.create_alloca(Type::int32()).unwrap();
    let call_void = builder.create_call(callee, vec![]).unwrap();
    let call_value = builder.create_call(value_fn, vec![]).unwrap();
    let store = builder.create_store(call_value, slot).unwrap();
    let br = builder.create_br(exit).unwrap();
    builder.set_insert_point(exit);
    let ret = builder.create_ret_void().unwrap();

    assert_eq!(module.name(slot), "0");
    assert_eq!(module.name(call_void), "");
    assert_eq!(module.name(call_value), "1");
    for unnamed in [store, br, ret] {
        assert_eq!(module.name(unnamed), "");
    }
}

#[test]
fn test_ir_builder_without_insert_point() {
    let mut module = Module::new("test");
    let one = module.const_i32(1).unwrap();
    let mut builder = IrBuilder::new(&mut module);
    assert_eq!(builder.create_add(one, one), Err(IrError::NoInsertPoint));
    assert_eq!(builder.create_ret_void(), Err(IrError::NoInsertPoint));
    assert_eq!(builder.module().num_values(), 1);
}

#[test]
fn test_module() {
    let mut module = Module::new("test");
    let main = int_fn(&mut module, "main", 0);
    let init = module.const_i32(42).unwrap();
    let global = module.add_global("global_var", Type::int32(), false, Some(init)).unwrap();

    assert_eq!(module.module_name(), "test");
    assert_eq!(module.functions().len(), 1);
    assert_eq!(module.globals().len(), 1);
    assert_eq!(module.get_function("main"), Some(main));
    assert_eq!(module.get_global("global_var"), Some(global));
    assert!(module.get_function("missing").is_none());
}

#[test]
fn test_module_stats() {
    let module = samples::call().unwrap();
    let stats = module.stats();
    assert_eq!(stats.name, "call");
    assert_eq!(stats.globals, 2);
    assert_eq!(stats.functions, 3);
    assert_eq!(stats.blocks, 3);
    assert_eq!(stats.instructions, 2 + 4 + 8);
    assert_eq!(stats.open_blocks, 0);
}
