//! Integration tests for the MiniJava compiler.
//!
//! These tests drive the full pipeline (analysis + generation) on packages
//! built with `minijava::ast::build` and run the generated programs on the
//! harness interpreter.


use minijava::ast::build::*;
use minijava::ast::{BinaryOp, Expr, MemberFlags, Stmt};
use minijava::compiler::{CompileOptions, Op, Reg};
use minijava::core::{CompilationError, ErrorKind};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use test_harness::*;

fn le(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::Le, left, right)
}

fn ne(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::Ne, left, right)
}

fn gt(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::Gt, left, right)
}

fn user_calls(program: &minijava::compiler::Program) -> Vec<(usize, i32)> {
    program
        .instructions()
        .iter()
        .enumerate()
        .filter(|(_, i)| matches!(i.op, Op::Call | Op::CallI) && i.r == Reg::CB)
        .map(|(addr, i)| (addr, i.d))
        .collect()
}

// =============================================================================
// Required scenarios
// =============================================================================

#[test]
fn test_minimal_program() {
    let program = compile(main_package(vec![], vec![println(int_lit(1))], vec![]));

    assert_eq!(program.get(4).map(|i| i.op), Some(Op::Halt));
    assert!(!program.has_unpatched());
    assert!(program.patches().iter().all(|note| {
        program.get(note.addr).is_some_and(|i| i.d >= 0)
    }));

    let run = run(&program);
    assert!(run.halted(), "{:?}", run.fault);
    assert_eq!(run.output, vec![1]);
}

#[test]
fn test_forward_call_targets_final_address() {
    let program = compile(main_package(
        vec![],
        vec![call_stmt(id("a"), vec![])],
        vec![
            method(
                MemberFlags::STATIC,
                void(),
                "a",
                vec![],
                vec![call_stmt(id("b"), vec![])],
            ),
            method(
                MemberFlags::STATIC,
                void(),
                "b",
                vec![],
                vec![println(int_lit(2))],
            ),
        ],
    ));

    // main: CALL a; RETURN   a: CALL b; RETURN   b: ...
    let main = program.entry_addr();
    let (a, b) = (main + 2, main + 4);
    let calls = user_calls(&program);
    let (main_at, a_at, b_at) = (main as i32, a as i32, b as i32);
    assert_eq!(
        calls,
        vec![(3, main_at), (main, a_at), (a, b_at), (b + 1, 5)]
    );
    assert!(!program.has_unpatched());
    assert_eq!(run(&program).output, vec![2]);
}

#[test]
fn test_static_context_violation() {
    let diagnostics = errors_of(main_package(
        vec![field(MemberFlags::empty(), int(), "count")],
        vec![println(read(id("count")))],
        vec![],
    ));
    assert_eq!(diagnostics.error_count(), 1);
    assert_eq!(diagnostics.count_of(ErrorKind::Identification), 1);
    assert!(matches!(
        diagnostics.iter().next(),
        Some(CompilationError::StaticContext { .. })
    ));
}

#[test]
fn test_short_circuit_false_and_call() {
    let f = method(
        MemberFlags::STATIC,
        boolean(),
        "f",
        vec![],
        vec![println(int_lit(99)), ret(bool_lit(true))],
    );
    let gated = and(bool_lit(false), call(id("f"), vec![]));
    let program = compile(main_package(
        vec![],
        vec![if_stmt(gated, println(int_lit(1)), None)],
        vec![f],
    ));

    // main is a lone RETURN; the calls left are the entry call and println in f
    let first = program.get(program.entry_addr()).map(|i| i.op);
    assert_eq!(first, Some(Op::Return));
    assert_eq!(user_calls(&program).len(), 2);
    assert_eq!(run(&program).output, Vec::<i32>::new());
}

#[test]
fn test_short_circuit_unknown_and_call() {
    let f = method(
        MemberFlags::STATIC,
        boolean(),
        "f",
        vec![],
        vec![println(int_lit(99)), ret(bool_lit(true))],
    );
    let gated = || and(read(id("flag")), call(id("f"), vec![]));
    let program = compile(main_package(
        vec![field(MemberFlags::STATIC, boolean(), "flag")],
        vec![
            if_stmt(gated(), println(int_lit(1)), None),
            assign(id("flag"), bool_lit(true)),
            if_stmt(gated(), println(int_lit(2)), None),
        ],
        vec![f],
    ));

    let main = program.entry_addr();
    let code = program.instructions();
    // LOAD flag; JUMPIF(0) skip; CALL f ...
    assert_eq!(code[main].op, Op::Load);
    assert_eq!((code[main + 1].op, code[main + 1].n), (Op::JumpIf, 0));
    assert_eq!(code[main + 2].op, Op::Call);

    assert_eq!(run(&program).output, vec![99, 2]);
}

#[test]
fn test_block_shadowing() {
    let run = run_package(main_package(
        vec![],
        vec![
            var(int(), "x", int_lit(1)),
            block(vec![var(int(), "x", int_lit(2)), println(read(id("x")))]),
            block(vec![
                var(int(), "y", int_lit(5)),
                println(add(read(id("x")), read(id("y")))),
            ]),
            println(read(id("x"))),
        ],
        vec![],
    ));
    assert_eq!(run.output, vec![2, 6, 1]);
}

#[test]
fn test_return_completeness() {
    let missing = method(
        MemberFlags::STATIC,
        int(),
        "sign",
        vec![param(int(), "n")],
        vec![if_stmt(lt(read(id("n")), int_lit(0)), ret(neg(int_lit(1))), None)],
    );
    let diagnostics = errors_of(main_package(vec![], vec![], vec![missing]));
    assert_eq!(diagnostics.error_count(), 1);
    assert_eq!(diagnostics.count_of(ErrorKind::Type), 1);
    assert!(matches!(
        diagnostics.iter().next(),
        Some(CompilationError::MissingReturn { method, .. }) if method == "sign"
    ));

    let complete = method(
        MemberFlags::STATIC,
        int(),
        "sign",
        vec![param(int(), "n")],
        vec![if_stmt(
            lt(read(id("n")), int_lit(0)),
            ret(neg(int_lit(1))),
            Some(ret(int_lit(1))),
        )],
    );
    let run = run_package(main_package(
        vec![],
        vec![println(call(id("sign"), vec![neg(int_lit(4))]))],
        vec![complete],
    ));
    assert_eq!(run.output, vec![-1]);
}

#[test]
fn test_type_errors_accumulate() {
    let diagnostics = errors_of(main_package(
        vec![],
        vec![
            var(int(), "a", bool_lit(true)).at(3),
            var(boolean(), "b", int_lit(1)).at(4),
            println(add(int_lit(1), bool_lit(false))).at(5),
        ],
        vec![],
    ));
    assert_eq!(diagnostics.lines(), vec![3, 4, 5]);
    assert_eq!(diagnostics.count_of(ErrorKind::Type), 3);
}

// =============================================================================
// Programs
// =============================================================================

#[test]
fn test_recursion() {
    let fact = method(
        MemberFlags::STATIC,
        int(),
        "fact",
        vec![param(int(), "n")],
        vec![if_stmt(
            le(read(id("n")), int_lit(1)),
            ret(int_lit(1)),
            Some(ret(mul(
                read(id("n")),
                call(id("fact"), vec![sub(read(id("n")), int_lit(1))]),
            ))),
        )],
    );
    let run = run_package(main_package(
        vec![],
        vec![
            println(call(id("fact"), vec![int_lit(5)])),
            println(call(id("fact"), vec![int_lit(10)])),
        ],
        vec![fact],
    ));
    assert_eq!(run.output, vec![120, 3_628_800]);
}

#[test]
fn test_objects_and_instance_methods() {
    let counter = class(
        "Counter",
        vec![field(MemberFlags::PRIVATE, int(), "count")],
        vec![
            method(
                MemberFlags::empty(),
                void(),
                "bump",
                vec![param(int(), "by")],
                vec![assign(path("this.count"), add(read(id("count")), read(id("by"))))],
            ),
            method(
                MemberFlags::empty(),
                int(),
                "get",
                vec![],
                vec![ret(read(id("count")))],
            ),
            method(
                MemberFlags::empty(),
                int(),
                "twice",
                vec![],
                vec![
                    call_stmt(id("bump"), vec![read(id("count"))]),
                    ret(call(id("get"), vec![])),
                ],
            ),
        ],
    );
    let main = class(
        "Main",
        vec![],
        vec![main_method(vec![
            var(class_type("Counter"), "a", new_object("Counter")),
            var(class_type("Counter"), "b", new_object("Counter")),
            call_stmt(path("a.bump"), vec![int_lit(3)]),
            call_stmt(path("b.bump"), vec![int_lit(10)]),
            println(call(path("a.twice"), vec![])),
            println(call(path("b.get"), vec![])),
        ])],
    );
    let run = run_package(package(vec![main, counter]));
    assert_eq!(run.output, vec![6, 10]);
}

#[test]
fn test_linked_fields_and_null() {
    let node = class(
        "Node",
        vec![
            field(MemberFlags::empty(), int(), "value"),
            field(MemberFlags::empty(), class_type("Node"), "next"),
        ],
        vec![],
    );
    let body = vec![
        var(class_type("Node"), "head", new_object("Node")),
        assign(path("head.value"), int_lit(1)),
        assign(path("head.next"), new_object("Node")),
        assign(path("head.next.value"), int_lit(2)),
        var(int(), "sum", int_lit(0)),
        var(class_type("Node"), "n", read(id("head"))),
        while_stmt(
            ne(read(id("n")), null()),
            block(vec![
                assign(id("sum"), add(read(id("sum")), read(path("n.value")))),
                assign(id("n"), read(path("n.next"))),
            ]),
        ),
        println(read(id("sum"))),
        // guarded dereference of null
        if_stmt(
            and(
                ne(read(id("n")), null()),
                gt(read(path("n.value")), int_lit(0)),
            ),
            println(int_lit(-1)),
            Some(println(int_lit(0))),
        ),
    ];
    let run = run_package(package(vec![class("Main", vec![], vec![main_method(body)]), node]));
    assert!(run.halted(), "{:?}", run.fault);
    assert_eq!(run.output, vec![3, 0]);
}

#[test]
fn test_arrays_and_for_loops() {
    let body = vec![
        var(array(int()), "a", new_array(int(), int_lit(5))),
        for_stmt(
            Some(var(int(), "i", int_lit(0))),
            Some(lt(read(id("i")), read(path("a.length")))),
            Some(assign(id("i"), add(read(id("i")), int_lit(1)))),
            index_assign(id("a"), read(id("i")), mul(read(id("i")), read(id("i")))),
        ),
        var(int(), "total", int_lit(0)),
        for_stmt(
            Some(var(int(), "i", int_lit(0))),
            Some(lt(read(id("i")), int_lit(5))),
            Some(assign(id("i"), add(read(id("i")), int_lit(1)))),
            assign(
                id("total"),
                add(read(id("total")), index(id("a"), read(id("i")))),
            ),
        ),
        println(read(id("total"))),
        println(read(path("a.length"))),
    ];
    let run = run_package(main_package(vec![], body, vec![]));
    assert_eq!(run.output, vec![30, 5]);
}

#[test]
fn test_loop_carried_locals_are_not_folded() {
    let body = vec![
        var(int(), "x", int_lit(1)),
        var(int(), "i", int_lit(0)),
        while_stmt(
            lt(read(id("i")), int_lit(3)),
            block(vec![
                println(read(id("x"))),
                assign(id("x"), mul(read(id("x")), int_lit(2))),
                assign(id("i"), add(read(id("i")), int_lit(1))),
            ]),
        ),
        println(read(id("x"))),
    ];
    let run = run_package(main_package(vec![], body, vec![]));
    assert_eq!(run.output, vec![1, 2, 4, 8]);
}

#[test]
fn test_ternary_and_statics() {
    let body = vec![
        assign(id("limit"), int_lit(10)),
        var(int(), "v", int_lit(7)),
        println(ternary(lt(read(id("v")), read(id("limit"))), int_lit(1), int_lit(2))),
        assign(id("limit"), int_lit(3)),
        println(ternary(lt(read(id("v")), read(id("limit"))), int_lit(1), int_lit(2))),
        println(ternary(bool_lit(true), read(path("Main.limit")), int_lit(0))),
    ];
    let run = run_package(main_package(
        vec![field(MemberFlags::STATIC, int(), "limit")],
        body,
        vec![],
    ));
    assert_eq!(run.output, vec![1, 2, 3]);
}

#[test]
fn test_division_by_zero_faults_at_run_time() {
    let run = run_package(main_package(
        vec![],
        vec![
            println(int_lit(1)),
            println(binary(BinaryOp::Div, int_lit(1), int_lit(0))),
        ],
        vec![],
    ));
    assert_eq!(run.output, vec![1]);
    assert_eq!(run.fault, Some(Fault::DivideByZero));
}

#[test]
fn test_facade_reports_diagnostics() {
    let mut bad = main_package(vec![], vec![println(read(id("missing")))], vec![]);
    let failure = minijava::compile(&mut bad).unwrap_err();
    assert!(failure.to_string().starts_with("1 error(s) found:\n"));
    match failure {
        minijava::Failure::Rejected(diagnostics) => assert_eq!(diagnostics.error_count(), 1),
        other => panic!("expected rejection, got {other:?}"),
    }
}

// =============================================================================
// Folding soundness
// =============================================================================

/// Integer expressions over literals, a known local `k` and a static `s`
/// whose value is only known at run time.
fn int_expr() -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![
        (-20i32..20).prop_map(int_lit),
        Just(read(id("k"))),
        Just(read(id("s"))),
    ];
    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| add(a, b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| sub(a, b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| mul(a, b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| binary(BinaryOp::Div, a, b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| binary(BinaryOp::Mod, a, b)),
            inner.clone().prop_map(neg),
            (bool_expr_over(inner.clone()), inner.clone(), inner)
                .prop_map(|(c, a, b)| ternary(c, a, b)),
        ]
    })
}

fn bool_expr_over(ints: BoxedStrategy<Expr>) -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![
        any::<bool>().prop_map(bool_lit),
        (ints.clone(), ints.clone()).prop_map(|(a, b)| lt(a, b)),
        (ints.clone(), ints).prop_map(|(a, b)| eq(a, b)),
    ];
    leaf.prop_recursive(2, 8, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| and(a, b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| or(a, b)),
            inner.prop_map(not),
        ]
    })
}

fn folding_program(k: i32, s: i32, expr: Expr) -> minijava::ast::Package {
    let body: Vec<Stmt> = vec![
        assign(id("s"), int_lit(s)),
        var(int(), "k", int_lit(k)),
        println(expr),
    ];
    main_package(vec![field(MemberFlags::STATIC, int(), "s")], body, vec![])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn folding_matches_unfolded_execution(
        k in -10i32..10,
        s in -10i32..10,
        expr in int_expr(),
    ) {
        let folding = CompileOptions::default();
        let unfolded = CompileOptions { fold_constants: false };
        let folded = try_compile(folding_program(k, s, expr.clone()), folding)
            .expect("valid program");
        let plain = try_compile(folding_program(k, s, expr), unfolded)
            .expect("valid program");

        prop_assert_eq!(run(&folded), run(&plain));
    }
}
