// kiz-vm - End-to-end execution tests
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! End-to-end tests: source text in, printed output (or error) out.

mod common;

use common::{eval_expr, run_program, run_uncaught};

// =============================================================================
// Literals, arithmetic and the numeric tower
// =============================================================================

#[test]
fn arithmetic_basics() {
    assert_prints!("print(1 + 2)", ["3"]);
    assert_prints!("print(7 - 10)", ["-3"]);
    assert_prints!("print(6 * 7)", ["42"]);
    assert_prints!("print(2 ^ 10)", ["1024"]);
    assert_prints!("print(7 % 3)", ["1"]);
}

#[test]
fn division_of_ints_is_decimal() {
    assert_prints!("print(1 / 4)", ["0.25"]);
    assert_prints!("print(1 / 3)", ["0.3333333333"]);
}

#[test]
fn int_decimal_promotion() {
    assert_prints!("print(1 + 0.5)", ["1.5"]);
    assert_prints!("print(0.5 + 1)", ["1.5"]);
    assert_prints!("print(2 * 1.5)", ["3"]);
}

#[test]
fn negative_power_is_decimal() {
    assert_prints!("print(2 ^ -2)", ["0.25"]);
}

#[test]
fn modulo_sign_follows_divisor() {
    assert_prints!("print(-7 % 3)", ["2"]);
    assert_prints!("print(7 % -3)", ["-2"]);
}

#[test]
fn bigint_arithmetic_keeps_precision() {
    assert_prints!(
        "print(100000000000000000000 * 100000000000000000000)",
        ["10000000000000000000000000000000000000000"]
    );
}

#[test]
fn unary_minus_dispatches_neg() {
    assert_prints!("x = 5\nprint(-x)", ["-5"]);
}

#[test]
fn division_by_zero_raises() {
    assert_errors!("print(1 / 0)", "ZeroDivisionError");
    assert_errors!("print(1 % 0)", "ZeroDivisionError");
}

#[test]
fn wrong_operand_type_raises() {
    assert_errors!("print(1 + \"a\")", "TypeError");
}

// =============================================================================
// Comparison and logic
// =============================================================================

#[test]
fn comparisons() {
    assert_prints!("print(1 < 2)", ["True"]);
    assert_prints!("print(2 <= 2)", ["True"]);
    assert_prints!("print(3 > 4)", ["False"]);
    assert_prints!("print(4 >= 5)", ["False"]);
    assert_prints!("print(1 == 1)", ["True"]);
    assert_prints!("print(1 != 1)", ["False"]);
}

#[test]
fn and_or_return_the_operand() {
    // `and`/`or` yield the deciding operand, not a coerced Bool.
    assert_prints!("print(1 and 2)", ["2"]);
    assert_prints!("print(false and 2)", ["False"]);
    assert_prints!("print(nil or \"x\")", ["x"]);
    assert_prints!("print(1 or 2)", ["1"]);
}

#[test]
fn not_always_yields_bool() {
    assert_prints!("print(not nil)", ["True"]);
    assert_prints!("print(not 1)", ["False"]);
}

#[test]
fn is_compares_identity() {
    assert_prints!(
        "a = [1]\nb = [1]\nprint(a is a)\nprint(a is b)",
        ["True", "False"]
    );
}

#[test]
fn string_comparison_and_concat() {
    assert_prints!("print(\"ab\" + \"cd\")", ["abcd"]);
    assert_prints!("print(\"ab\" * 3)", ["ababab"]);
    assert_prints!("print(\"a\" == \"a\")", ["True"]);
}

// =============================================================================
// Control flow
// =============================================================================

#[test]
fn if_else_chains() {
    let source = "x = 2\nif x == 1\n  print(\"one\")\nelse if x == 2\n  print(\"two\")\nelse\n  print(\"many\")\nend";
    assert_prints!(source, ["two"]);
}

#[test]
fn while_loop_with_break_and_next() {
    let source = r#"
i = 0
while true
  i = i + 1
  if i == 2
    next
  end
  if i > 4
    break
  end
  print(i)
end
"#;
    assert_prints!(source, ["1", "3", "4"]);
}

#[test]
fn nil_and_false_are_falsy() {
    assert_prints!("if nil\n  print(\"t\")\nelse\n  print(\"f\")\nend", ["f"]);
    assert_prints!("if false\n  print(\"t\")\nelse\n  print(\"f\")\nend", ["f"]);
    assert_prints!("if 0\n  print(\"t\")\nelse\n  print(\"f\")\nend", ["f"]);
    assert_prints!("if 1\n  print(\"t\")\nelse\n  print(\"f\")\nend", ["t"]);
}

// =============================================================================
// Functions and closures
// =============================================================================

#[test]
fn function_call_and_return() {
    assert_prints!("fn add(a, b)\n  return a + b\nend\nprint(add(2, 3))", ["5"]);
}

#[test]
fn function_without_return_yields_nil() {
    assert_prints!("fn noop()\nend\nprint(noop())", ["Nil"]);
}

#[test]
fn closures_over_locals() {
    // The canonical closure shape: the returned function outlives its
    // defining frame.
    let source = r#"
fn make_adder(n)
  fn adder(x)
    return x + n
  end
  return adder
end
add5 = make_adder(5)
print(add5(3))
"#;
    assert_prints!(source, ["8"]);
}

#[test]
fn closures_capture_independently() {
    let source = r#"
fn make_adder(n)
  fn adder(x)
    return x + n
  end
  return adder
end
add1 = make_adder(1)
add10 = make_adder(10)
print(add1(5))
print(add10(5))
"#;
    assert_prints!(source, ["6", "15"]);
}

#[test]
fn recursion() {
    let source = r#"
fn fact(n)
  if n < 2
    return 1
  end
  return n * fact(n - 1)
end
print(fact(10))
"#;
    assert_prints!(source, ["3628800"]);
}

#[test]
fn lambdas_are_values() {
    assert_prints!("twice = fn(x)\n  return x * 2\nend\nprint(twice(21))", ["42"]);
}

#[test]
fn nonlocal_rebinds_enclosing_frame() {
    let source = r#"
fn outer()
  count = 0
  fn bump()
    nonlocal count = count + 1
    return count
  end
  bump()
  bump()
  return count
end
print(outer())
"#;
    assert_prints!(source, ["2"]);
}

#[test]
fn global_rebinds_main_frame() {
    let source = r#"
g = 1
fn set_it()
  global g = 42
end
set_it()
print(g)
"#;
    assert_prints!(source, ["42"]);
}

#[test]
fn arity_mismatch_raises() {
    assert_errors!("fn f(a)\n  return a\nend\nf(1, 2)", "TypeError");
}

#[test]
fn calling_uncallable_raises() {
    assert_errors!("x = create()\nx()", "try to call an uncallable object");
}

#[test]
fn undefined_variable_raises() {
    assert_errors!("print(missing)", "Undefined variable 'missing'");
}

// =============================================================================
// Lists and iteration
// =============================================================================

#[test]
fn list_literals_and_indexing() {
    assert_prints!("xs = [10, 20, 30]\nprint(xs[0])\nprint(xs[2])", ["10", "30"]);
    assert_prints!("xs = [1]\nxs[0] = 9\nprint(xs[0])", ["9"]);
}

#[test]
fn list_methods() {
    assert_prints!("xs = [1]\nxs.append(2)\nprint(xs)", ["[1, 2]"]);
    assert_prints!("xs = [1, 2]\nxs.reverse()\nprint(xs)", ["[2, 1]"]);
    assert_prints!("xs = [1]\nxs.extend([2, 3])\nprint(xs)", ["[1, 2, 3]"]);
    assert_prints!("print([1] + [2])", ["[1, 2]"]);
    assert_prints!("print([0] * 3)", ["[0, 0, 0]"]);
    assert_prints!("print([1, 2] == [1, 2])", ["True"]);
    assert_prints!("print([1, 2].contains(2))", ["True"]);
    assert_prints!("print([1, 2].contains(5))", ["False"]);
}

#[test]
fn for_loop_over_a_list() {
    let source = r#"
total = 0
for x : [10, 20, 30]
  total = total + x
end
print(total)
"#;
    assert_prints!(source, ["60"]);
}

#[test]
fn for_loop_is_restartable() {
    // __next__ leaves the cursor at 0, so the same list iterates twice.
    let source = r#"
xs = [1, 2]
for x : xs
  print(x)
end
for x : xs
  print(x)
end
"#;
    assert_prints!(source, ["1", "2", "1", "2"]);
}

#[test]
fn false_element_stops_iteration_early() {
    // The exhaustion sentinel is Bool(false); a false element is
    // indistinguishable from the end of the list.
    let source = r#"
for x : [1, false, 2]
  print(x)
end
print("done")
"#;
    assert_prints!(source, ["1", "done"]);
}

#[test]
fn list_index_out_of_range_raises() {
    assert_errors!("xs = [1]\nprint(xs[5])", "KeyError");
}

// =============================================================================
// Dictionaries
// =============================================================================

#[test]
fn dictionary_round_trip() {
    let source = "d = { \"a\" = 1, \"b\" = 2 }\nprint(d[\"a\"] + d[\"b\"])";
    assert_prints!(source, ["3"]);
}

#[test]
fn dictionary_update_and_contains() {
    let source = r#"
d = { "a" = 1 }
d["a"] = 5
d["b"] = 6
print(d["a"])
print(d["b"])
print(d.__contains__("a"))
print(d.__contains__("zzz"))
"#;
    assert_prints!(source, ["5", "6", "True", "False"]);
}

#[test]
fn dictionary_int_keys() {
    assert_prints!("d = { 1 = \"one\" }\nprint(d[1])", ["one"]);
}

#[test]
fn dictionary_missing_key_raises() {
    assert_errors!("d = { \"a\" = 1 }\nprint(d[\"b\"])", "KeyError");
}

#[test]
fn dictionary_merge() {
    assert_prints!(
        "d = { \"a\" = 1 } + { \"b\" = 2 }\nprint(d[\"b\"])",
        ["2"]
    );
}

// =============================================================================
// Prototypes and objects
// =============================================================================

#[test]
fn prototype_extension() {
    let source = r#"
object Animal
  speak = fn(self)
    return "hello"
  end
end
object Dog : Animal
end
d = create(Dog)
print(d.speak(d))
"#;
    assert_prints!(source, ["hello"]);
}

#[test]
fn own_attribute_shadows_prototype() {
    let source = r#"
object Base
  x = 1
end
object Derived : Base
  x = 2
end
d = create(Derived)
print(d.x)
"#;
    assert_prints!(source, ["2"]);
}

#[test]
fn attribute_assignment_shadows_inherited() {
    let source = r#"
object Base
  x = 1
end
o = create(Base)
print(o.x)
o.x = 9
print(o.x)
"#;
    assert_prints!(source, ["1", "9"]);
}

#[test]
fn ischild_walks_the_chain() {
    let source = r#"
object A
end
object B : A
end
b = create(B)
print(ischild(b, B))
print(ischild(b, A))
print(ischild(b, Object))
"#;
    assert_prints!(source, ["True", "True", "True"]);
}

#[test]
fn every_variant_is_a_child_of_its_prototype() {
    assert_prints!("print(ischild(1, Int))", ["True"]);
    assert_prints!("print(ischild(\"s\", Str))", ["True"]);
    assert_prints!("print(ischild([1], List))", ["True"]);
    assert_prints!("print(ischild({ \"a\" = 1 }, Dict))", ["True"]);
    assert_prints!("print(ischild(true, Bool))", ["True"]);
    assert_prints!("print(ischild(1.5, Decimal))", ["True"]);
}

#[test]
fn missing_attribute_raises_name_error() {
    assert_errors!("o = create()\nprint(o.missing)", "NameError");
}

#[test]
fn builtin_attr_functions() {
    let source = r#"
o = create()
setattr(o, "x", 7)
print(hasattr(o, "x"))
print(getattr(o, "x"))
delattr(o, "x")
print(hasattr(o, "x"))
"#;
    assert_prints!(source, ["True", "7", "False"]);
}

// =============================================================================
// Exceptions
// =============================================================================

#[test]
fn exception_with_matching_catch() {
    let source = r#"
try
  throw Error("E", "boom")
catch e : Error
  print(e.__name__)
  print(e.__msg__)
end
print("after")
"#;
    assert_prints!(source, ["E", "boom", "after"]);
}

#[test]
fn uncaught_error_has_a_traceback() {
    // Two frames are captured: the call site and the body of f.
    let source = "fn f()\n  throw Error(\"X\", \"msg\")\nend\nf()";
    let uncaught = run_uncaught(source);
    assert_eq!(uncaught.name, "X");
    assert_eq!(uncaught.message, "msg");
    assert_eq!(uncaught.positions.len(), 2);
}

#[test]
fn unmatched_catch_reraises() {
    // The unwinder inspects one armed marker per frame, so the rethrow
    // must cross a frame boundary to reach the outer handler.
    let source = r#"
object Special : Error
end
fn risky()
  try
    throw Error("E", "inner")
  catch e : Special
    print("wrong")
  end
end
try
  risky()
catch e : Error
  print("outer")
end
"#;
    assert_prints!(source, ["outer"]);
}

#[test]
fn first_matching_catch_wins() {
    let source = r#"
try
  throw Error("E", "boom")
catch e : Object
  print("object")
catch e : Error
  print("error")
end
"#;
    assert_prints!(source, ["object"]);
}

#[test]
fn exception_unwinds_nested_frames() {
    let source = r#"
fn deep()
  throw Error("D", "from deep")
end
fn middle()
  deep()
  print("unreachable")
end
try
  middle()
catch e : Error
  print(e.__msg__)
end
"#;
    assert_prints!(source, ["from deep"]);
}

#[test]
fn native_errors_are_catchable() {
    let source = r#"
try
  print(1 / 0)
catch e : Error
  print(e.__name__)
end
"#;
    assert_prints!(source, ["ZeroDivisionError"]);
}

#[test]
fn throw_from_catch_propagates_outward() {
    let source = r#"
fn inner()
  try
    throw Error("A", "first")
  catch e : Error
    throw Error("B", "second")
  end
end
try
  inner()
catch e : Error
  print(e.__name__)
end
"#;
    assert_prints!(source, ["B"]);
}

#[test]
fn execution_continues_after_handled_error() {
    let source = r#"
try
  throw Error("E", "x")
catch e : Error
end
print("alive")
"#;
    assert_prints!(source, ["alive"]);
}

#[test]
fn user_defined_error_prototypes() {
    let source = r#"
object MyError : Error
end
e = create(MyError)
e.__name__ = "MyError"
e.__msg__ = "custom"
try
  throw Error("E", "plain")
catch err : MyError
  print("wrong")
catch err : Error
  print("right")
end
"#;
    assert_prints!(source, ["right"]);
}

#[test]
fn throwing_a_non_error_raises_type_error() {
    assert_errors!("throw 42", "TypeError");
}

// =============================================================================
// Builtins
// =============================================================================

#[test]
fn type_constructors() {
    assert_prints!("print(Int(\"42\"))", ["42"]);
    assert_prints!("print(Str(42))", ["42"]);
    assert_prints!("print(Bool(1))", ["True"]);
    assert_prints!("print(Bool(nil))", ["False"]);
    assert_prints!("print(Decimal(\"1.5\"))", ["1.5"]);
}

#[test]
fn get_refc_reports_a_positive_count() {
    let source = "x = [1]\nprint(get_refc(x) > 0)";
    assert_prints!(source, ["True"]);
}

#[test]
fn now_is_monotonic_enough() {
    assert_prints!("a = now()\nb = now()\nprint(b >= a)", ["True"]);
}

#[test]
fn reserved_builtins_return_nil() {
    assert_prints!("print(range(3))", ["Nil"]);
    assert_prints!("print(type_of(1))", ["Nil"]);
}

#[test]
fn print_joins_arguments_with_spaces() {
    assert_prints!("print(1, \"a\", nil)", ["1 a Nil"]);
}

// =============================================================================
// REPL-mode evaluation
// =============================================================================

#[test]
fn repl_returns_trailing_expression_value() {
    assert_eq!(eval_expr("1 + 2").unwrap(), "3");
    assert_eq!(eval_expr("\"hi\"").unwrap(), "\"hi\"");
    assert_eq!(eval_expr("x = 1").unwrap(), "Nil");
}

#[test]
fn repl_keeps_stack_clean_between_statements() {
    // Non-final expression statements are popped.
    assert_eq!(eval_expr("1\n2\n3").unwrap(), "3");
}

// =============================================================================
// Operand stack discipline
// =============================================================================

#[test]
fn stack_is_empty_after_a_module_completes() {
    let mut vm = kiz_vm::Vm::new();
    vm.capture_output();
    let source = "x = 1\nprint(x)\nfn f()\n  return 2\nend\nf()\nif x\n  y = 2\nend";
    vm.add_source("<test>", source);
    let code = kiz_vm::compile_source(source).unwrap();
    let module = kiz_core::Object::module("<test>", "<test>", Some(std::rc::Rc::new(code)));
    vm.set_main_module(module).unwrap();
    assert_eq!(vm.stack_depth(), 0);
    assert_eq!(vm.frame_depth(), 1);
}

#[test]
fn output_of_sequential_programs() {
    assert_eq!(
        run_program("print(1)\nprint(2)").unwrap(),
        vec!["1".to_string(), "2".to_string()]
    );
}
