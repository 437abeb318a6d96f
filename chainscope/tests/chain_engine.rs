use chainscope::runtime::values::Arity;
use chainscope::{
    engine, engine_with_config, final_value, AmbiguityPolicy, Binding, Block, ChainEngine,
    EngineConfig, Object, Phase, Receiver, ReplacementPolicy, RuntimeError, Value,
};
use pretty_assertions::assert_eq;
use std::cell::Cell;
use std::rc::Rc;

fn numbers() -> Vec<i64> {
    vec![1, 2, 3, 4, 5, 6, 7, 8]
}

fn times(factor: Value) -> Value {
    Value::function("times", Arity::Fixed(1), move |args| {
        args[0].send("*", vec![factor.clone()])
    })
}

/// A vector that also knows a few operations of its own.
fn collection() -> Value {
    Object::builder("Collection")
        .payload(numbers())
        .method("multiply", |this, args| {
            let factor = args.into_iter().next().unwrap_or(Value::Integer(2));
            this.send("map", vec![times(factor)])
        })
        .method("to_be_duplicated", |this, _args| {
            let twice = Value::function("twice", Arity::Fixed(1), |args| {
                Ok(Value::Vector(vec![args[0].clone(), args[0].clone()]))
            });
            this.send("flat_map", vec![twice])
        })
        .method("square_evens", |this, _args| {
            let squared = engine(
                this.clone(),
                Some(Block::scoped(Binding::new(this.clone()), |cx| {
                    cx.call("select", vec![Value::keyword("even?")])?;
                    let square = Value::function("square", Arity::Fixed(1), |args| {
                        args[0].send("*", vec![args[0].clone()])
                    });
                    cx.call("map", vec![square])
                })),
            )?;
            Ok(Value::Engine(squared))
        })
        .build()
}

/// The receiver the blocks below are written in.
fn example() -> Value {
    Object::builder("Example")
        .method("even", |_this, args| {
            let rem = args[0].send("%", vec![Value::Integer(2)])?;
            Ok(Value::Boolean(rem == Value::Integer(0)))
        })
        .method("seven", |_this, _args| Ok(Value::Integer(7)))
        .method("to_be_duplicated", |_this, _args| Ok(Value::from("outside")))
        .build()
}

fn predicate<F>(test: F) -> Value
where
    F: Fn(&Value) -> bool + 'static,
{
    Value::function("predicate", Arity::Fixed(1), move |args| {
        Ok(Value::Boolean(test(&args[0])))
    })
}

fn below(limit: Value) -> Value {
    Value::function("below", Arity::Fixed(1), move |args| {
        args[0].send("<", vec![limit.clone()])
    })
}

#[test]
fn returns_the_final_value_immediately() {
    let reversed = final_value(
        collection(),
        Block::scoped(Binding::new(example()), |cx| cx.ident("reverse")),
    )
    .unwrap();
    assert_eq!(reversed, Value::from(vec![8, 7, 6, 5, 4, 3, 2, 1]));
    assert_eq!(collection(), reversed.send("reverse", vec![]).unwrap());
}

#[test]
fn zero_parameter_block_selects_evens() {
    let outer = example();
    let even = Value::function("even", Arity::Fixed(1), move |args| outer.send("even", args));
    let chain = engine(
        collection(),
        Some(Block::scoped(Binding::new(example()), move |cx| {
            cx.call("select", vec![even])
        })),
    )
    .unwrap();

    assert_eq!(chain.finish(), Value::from(vec![2, 4, 6, 8]));
    assert_eq!(chain.original(), Value::from(numbers()));
}

#[test]
fn one_parameter_block_gets_the_engine() {
    let chain = engine(
        collection(),
        Some(Block::yielding(|e| {
            assert_eq!(e.original(), collection());
            e.send("select", vec![Value::keyword("even?")])
        })),
    )
    .unwrap();
    assert_eq!(chain.finish(), Value::from(vec![2, 4, 6, 8]));
}

#[test]
fn callable_blocks_follow_their_arity() {
    let one = Value::function("roll", Arity::Fixed(1), |args| {
        args[0].send("reverse", vec![])
    });
    let chain = engine(collection(), Some(Block::callable(one))).unwrap();
    assert_eq!(chain.current(), Value::from(vec![8, 7, 6, 5, 4, 3, 2, 1]));

    let ran = Rc::new(Cell::new(0));
    let counter = ran.clone();
    let zero = Value::function("tick", Arity::Fixed(0), move |_| {
        counter.set(counter.get() + 1);
        Ok(Value::Nil)
    });
    let chain = engine(collection(), Some(Block::callable(zero))).unwrap();
    assert_eq!(ran.get(), 1);
    assert_eq!(chain.current(), collection());
}

#[test]
fn unsupported_arity_fails_before_anything_runs() {
    for arity in [Arity::Fixed(2), Arity::Variadic(0)] {
        let ran = Rc::new(Cell::new(false));
        let flag = ran.clone();
        let block = Value::function("block", arity.clone(), move |_| {
            flag.set(true);
            Ok(Value::Nil)
        });
        let chain = ChainEngine::begin(collection());
        let err = chain.run(Block::callable(block)).unwrap_err();

        assert_eq!(err, RuntimeError::UnsupportedBlockArity(arity));
        assert!(err.to_string().starts_with("don't know how to handle block arity"));
        assert!(!ran.get());
        assert_eq!(chain.phase(), Phase::Initialized);
        assert_eq!(chain.current(), collection());
    }
}

#[test]
fn inside_disambiguates_a_shadowed_method() {
    let scope = Binding::new(example()).with_local("multiply", "go forth and");
    let chain = engine(
        collection(),
        Some(Block::scoped(scope, |cx| {
            cx.inside().send("multiply", vec![Value::Integer(3)])
        })),
    )
    .unwrap();
    assert_eq!(
        chain.finish(),
        collection().send("multiply", vec![Value::Integer(3)]).unwrap()
    );
}

#[test]
fn variable_shadows_subject_method() {
    let scope = Binding::new(example()).with_local("reverse", 2);
    let chain = engine(
        collection(),
        Some(Block::scoped(scope, |cx| {
            let limit = cx.ident("reverse")?;
            cx.call("select", vec![below(limit)])
        })),
    )
    .unwrap();
    assert_eq!(chain.finish(), Value::from(vec![1]));
}

#[test]
fn forced_call_ignores_a_local() {
    let scope = Binding::new(example()).with_local("delete", "doggone");
    let result = final_value(
        collection(),
        Block::scoped(scope, |cx| cx.call("delete", vec![Value::Integer(2)])),
    )
    .unwrap();
    assert_eq!(result, Value::Integer(2));
}

#[test]
fn empty_call_forces_the_method() {
    let scope = Binding::new(example()).with_local("reverse", "sdrawkcab");
    let forced = final_value(
        collection(),
        Block::scoped(scope.clone(), |cx| cx.call("reverse", vec![])),
    )
    .unwrap();
    assert_eq!(forced, collection().send("reverse", vec![]).unwrap());

    let bare = final_value(collection(), Block::scoped(scope, |cx| cx.ident("reverse"))).unwrap();
    assert_ne!(bare, collection().send("reverse", vec![]).unwrap());
    assert_eq!(bare, collection());
}

#[test]
fn command_with_a_plain_local_reads_the_local() {
    let scope = Binding::new(example()).with_local("multiply", "go forth and");
    let chain = ChainEngine::begin(collection());
    chain
        .run(Block::scoped(scope.clone(), |cx| {
            let value = cx.command("multiply", vec![Value::Integer(3)])?;
            assert_eq!(value, Value::from("go forth and"));
            Ok(value)
        }))
        .unwrap();
    assert_eq!(chain.current(), collection());

    chain
        .run(Block::scoped(scope, |cx| cx.call("multiply", vec![Value::Integer(3)])))
        .unwrap();
    assert_eq!(
        chain.finish(),
        Value::from(vec![3, 6, 9, 12, 15, 18, 21, 24])
    );
}

#[test]
fn explicit_outside_access() {
    let scope = Binding::new(example()).with_local("selection", 8);
    let chain = engine(
        collection(),
        Some(Block::scoped(scope.clone(), |cx| {
            let selection = cx.outside().get("selection")?;
            cx.call("select", vec![predicate(move |x| *x == selection)])
        })),
    )
    .unwrap();
    assert_eq!(chain.finish(), Value::from(vec![8]));

    let chain = engine(
        collection(),
        Some(Block::scoped(scope, |cx| {
            let seven = cx.outside().get("seven")?;
            cx.call("select", vec![predicate(move |x| *x == seven)])
        })),
    )
    .unwrap();
    assert_eq!(chain.finish(), Value::from(vec![7]));
}

#[test]
fn inside_can_be_held_in_a_variable() {
    let scope = Binding::new(example()).with_local("filter", "hello");
    let chain = engine(
        collection(),
        Some(Block::scoped(scope, |cx| {
            let irl = cx.inside().clone();
            let less_one = Value::function("less_one", Arity::Fixed(1), |args| {
                args[0].send("-", vec![Value::Integer(1)])
            });
            irl.send("map", vec![less_one])
        })),
    )
    .unwrap();
    assert_eq!(chain.finish(), Value::from(vec![0, 1, 2, 3, 4, 5, 6, 7]));
}

#[test]
fn calls_captured_lambdas_directly() {
    let plus_four = Value::function("fn", Arity::Fixed(1), |args| {
        args[0].send("+", vec![Value::Integer(4)])
    });
    let scope = Binding::new(example()).with_local("fn", plus_four);
    let chain = engine(
        collection(),
        Some(Block::scoped(scope, |cx| {
            let limit = cx.call("fn", vec![Value::Integer(1)])?;
            cx.call("select", vec![below(limit)])
        })),
    )
    .unwrap();
    assert_eq!(chain.finish(), Value::from(vec![1, 2, 3, 4]));
}

#[test]
fn calls_captured_call_objects_directly() {
    let three = Object::builder("Callable")
        .method("call", |_this, _args| Ok(Value::Integer(3)))
        .build();
    let scope = Binding::new(example()).with_local("fn", three);
    let chain = engine(
        collection(),
        Some(Block::scoped(scope, |cx| {
            let limit = cx.call("fn", vec![Value::Integer(1)])?;
            cx.call("select", vec![below(limit)])
        })),
    )
    .unwrap();
    assert_eq!(chain.finish(), Value::from(vec![1, 2]));
}

#[test]
fn captured_lambdas_are_plain_values_too() {
    let odd = Value::function("fn", Arity::Fixed(1), |args| args[0].send("odd?", vec![]));
    let scope = Binding::new(example()).with_local("fn", odd);
    let chain = engine(
        collection(),
        Some(Block::scoped(scope, |cx| {
            let odd = cx.ident("fn")?;
            cx.call("select", vec![odd])
        })),
    )
    .unwrap();
    assert_eq!(chain.finish(), Value::from(vec![1, 3, 5, 7]));
}

#[test]
fn strict_ambiguity_is_undispatchable() {
    let config = EngineConfig::default().with_ambiguity(AmbiguityPolicy::Strict);
    let err = engine_with_config(
        collection(),
        Some(Block::scoped(Binding::new(example()), |cx| {
            cx.ident("to_be_duplicated")
        })),
        config,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::UndispatchableAmbiguity { ref name, .. } if name == "to_be_duplicated"
    ));
}

#[test]
fn escaping_ambiguity_leaves_the_chain_alone() {
    let chain = ChainEngine::begin(collection());
    chain
        .run(Block::scoped(Binding::new(example()), |cx| {
            let result = cx.ident("to_be_duplicated")?;
            assert_eq!(result, Value::from("outside"));
            Ok(result)
        }))
        .unwrap();
    assert_eq!(chain.current(), collection());
}

#[test]
fn ambiguity_with_the_original_continues_the_chain() {
    let chain = engine(
        collection(),
        Some(Block::scoped(Binding::new(collection()), |cx| {
            cx.ident("to_be_duplicated")
        })),
    )
    .unwrap();
    assert_eq!(chain.current().send("len", vec![]).unwrap(), Value::Integer(16));
}

#[test]
fn nested_chains() {
    let squares = collection().send("square_evens", vec![]).unwrap();
    assert!(matches!(squares, Value::Engine(_)));
    assert_eq!(squares, Value::from(vec![4, 16, 36, 64]));

    let squares_doubled = engine(
        collection(),
        Some(Block::scoped(Binding::new(example()), |cx| {
            cx.ident("square_evens")?;
            cx.call("*", vec![Value::Integer(2)])
        })),
    )
    .unwrap();

    assert!(squares_doubled.to_string().contains("ChainEngine"));
    assert_eq!(
        squares_doubled.current(),
        Value::from(vec![4, 16, 36, 64, 4, 16, 36, 64])
    );

    let counted = squares_doubled
        .chain(Some(Block::scoped(Binding::new(example()), |cx| {
            cx.ident("count")
        })))
        .unwrap();
    assert_eq!(Value::Engine(counted), Value::Integer(8));
    assert_eq!(squares_doubled.finish(), Value::Integer(8));
}

#[test]
fn chain_without_a_block_is_the_same_engine() {
    let chain = engine(collection(), None).unwrap();
    assert!(chain.ptr_eq(&chain.chain(None).unwrap()));
    assert!(chain.ptr_eq(&chain.as_engine()));
}

#[test]
fn inspection() {
    let chain = engine(collection(), None).unwrap();
    assert!(chain.to_string().starts_with("#<ChainEngine original:"));
    assert_eq!(chain.original(), collection());
    assert!(!chain.current().is_identical(&chain.original()));
}

#[test]
fn responds_to_forwards_to_current() {
    let chain = engine(collection(), None).unwrap();
    assert!(chain.responds_to("len"));
    assert!(chain.responds_to("multiply"));
    assert!(!chain.responds_to("finish"));
}

#[test]
fn finishing_without_a_block_duplicates() {
    let subject = Value::from(numbers());
    let value = ChainEngine::begin(subject.clone()).finish();
    assert_eq!(value, subject);
    assert!(!value.is_identical(&subject));
}

#[test]
fn same_type_policy_breaks_on_type_change() {
    let config = EngineConfig::default().with_replacement(ReplacementPolicy::ReplaceIfSameType);
    let chain = engine_with_config(
        numbers(),
        Some(Block::scoped(Binding::toplevel(), |cx| {
            let count = cx.ident("count")?;
            assert_eq!(count, Value::Integer(8));
            cx.call("reverse", vec![])
        })),
        config,
    )
    .unwrap();
    assert_eq!(chain.finish(), Value::from(vec![8, 7, 6, 5, 4, 3, 2, 1]));
}

#[test]
fn failure_keeps_the_last_assigned_value() {
    let chain = ChainEngine::begin(numbers());
    let err = chain
        .run(Block::scoped(Binding::toplevel(), |cx| {
            cx.ident("reverse")?;
            cx.ident("marie_celeste")?;
            cx.ident("sort")
        }))
        .unwrap_err();
    assert!(matches!(err, RuntimeError::NoMethod { ref name, .. } if name == "marie_celeste"));
    assert_eq!(chain.current(), Value::from(vec![8, 7, 6, 5, 4, 3, 2, 1]));
}

#[test]
fn running_again_after_finish() {
    let chain = ChainEngine::begin(numbers());
    chain
        .run(Block::yielding(|e| e.send("take", vec![Value::Integer(3)])))
        .unwrap();
    assert_eq!(chain.finish(), Value::from(vec![1, 2, 3]));
    assert_eq!(chain.phase(), Phase::Finished);

    chain
        .run(Block::yielding(|e| e.send("reverse", vec![])))
        .unwrap();
    assert_eq!(chain.phase(), Phase::Running);
    assert_eq!(chain.finish(), Value::from(vec![3, 2, 1]));
}

#[test]
fn sorting_mixed_kinds_is_a_type_error() {
    let mixed: Vec<Value> = (0..64)
        .map(|i| if i % 2 == 0 { Value::from("s") } else { Value::Integer(i) })
        .collect();
    let err = final_value(
        mixed,
        Block::scoped(Binding::toplevel(), |cx| cx.call("sort", vec![])),
    )
    .unwrap_err();
    assert!(matches!(err, RuntimeError::TypeError { ref operation, .. } if operation == "sort"));
}
