//! Native method tables.
//!
//! Each value kind carries a fixed table of methods; these make up the
//! capability set a subject exposes to the resolver. The base methods below
//! are answered by every value and are therefore never grounds
//! for an ambiguity between two scopes.

use crate::runtime::dispatch::Receiver;
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::values::{Arity, Value};
use lazy_static::lazy_static;
use std::cmp::Ordering;
use std::collections::HashMap;

pub type NativeMethod = fn(&Value, Vec<Value>) -> RuntimeResult<Value>;

type MethodTable = HashMap<&'static str, NativeMethod>;

/// Behaviors shared by all values.
pub const BASE_METHODS: &[&str] = &[
    "inspect",
    "to_s",
    "type",
    "==",
    "!=",
    "nil?",
    "dup",
    "respond_to?",
];

pub fn is_base_method(name: &str) -> bool {
    BASE_METHODS.contains(&name)
}

fn table(entries: &[(&'static str, NativeMethod)]) -> MethodTable {
    entries.iter().copied().collect()
}

lazy_static! {
    static ref VECTOR_METHODS: MethodTable = table(&[
        ("select", vector_select as NativeMethod),
        ("filter", vector_select as NativeMethod),
        ("reject", vector_reject as NativeMethod),
        ("map", vector_map as NativeMethod),
        ("flat_map", vector_flat_map as NativeMethod),
        ("reverse", vector_reverse as NativeMethod),
        ("sort", vector_sort as NativeMethod),
        ("count", vector_count as NativeMethod),
        ("len", vector_len as NativeMethod),
        ("first", vector_first as NativeMethod),
        ("last", vector_last as NativeMethod),
        ("sum", vector_sum as NativeMethod),
        ("take", vector_take as NativeMethod),
        ("drop", vector_drop as NativeMethod),
        ("push", vector_push as NativeMethod),
        ("delete", vector_delete as NativeMethod),
        ("include?", vector_include as NativeMethod),
        ("empty?", vector_empty as NativeMethod),
        ("at", vector_at as NativeMethod),
        ("+", vector_concat as NativeMethod),
        ("*", vector_repeat as NativeMethod),
    ]);
    static ref NUMBER_METHODS: MethodTable = table(&[
        ("+", number_add as NativeMethod),
        ("-", number_sub as NativeMethod),
        ("*", number_mul as NativeMethod),
        ("/", number_div as NativeMethod),
        ("%", number_rem as NativeMethod),
        ("<", number_lt as NativeMethod),
        ("<=", number_le as NativeMethod),
        (">", number_gt as NativeMethod),
        (">=", number_ge as NativeMethod),
        ("abs", number_abs as NativeMethod),
        ("even?", integer_even as NativeMethod),
        ("odd?", integer_odd as NativeMethod),
    ]);
    static ref STRING_METHODS: MethodTable = table(&[
        ("len", string_len as NativeMethod),
        ("upcase", string_upcase as NativeMethod),
        ("downcase", string_downcase as NativeMethod),
        ("reverse", string_reverse as NativeMethod),
        ("include?", string_include as NativeMethod),
        ("empty?", string_empty as NativeMethod),
        ("+", string_concat as NativeMethod),
        ("*", string_repeat as NativeMethod),
    ]);
    static ref MAP_METHODS: MethodTable = table(&[
        ("get", map_get as NativeMethod),
        ("keys", map_keys as NativeMethod),
        ("values", map_values as NativeMethod),
        ("len", map_len as NativeMethod),
        ("has_key?", map_has_key as NativeMethod),
    ]);
    static ref BOOLEAN_METHODS: MethodTable = table(&[("not", boolean_not as NativeMethod)]);
    static ref FUNCTION_METHODS: MethodTable =
        table(&[("call", function_call as NativeMethod), ("arity", function_arity as NativeMethod)]);
}

/// Find the native method `name` for the receiver's kind.
pub fn lookup(receiver: &Value, name: &str) -> Option<NativeMethod> {
    let methods: &MethodTable = match receiver {
        Value::Vector(_) => &*VECTOR_METHODS,
        Value::Integer(_) => &*NUMBER_METHODS,
        Value::Float(_) if name != "even?" && name != "odd?" => &*NUMBER_METHODS,
        Value::String(_) => &*STRING_METHODS,
        Value::Map(_) => &*MAP_METHODS,
        Value::Boolean(_) => &*BOOLEAN_METHODS,
        Value::Function(_) => &*FUNCTION_METHODS,
        _ => return None,
    };
    methods.get(name).copied()
}

/// Answer one of the base methods, or fail with `NoMethod`.
pub fn send_base(receiver: &Value, name: &str, args: Vec<Value>) -> RuntimeResult<Value> {
    match name {
        "inspect" => {
            expect_args(name, &args, 0)?;
            Ok(Value::String(receiver.to_string()))
        }
        "to_s" => {
            expect_args(name, &args, 0)?;
            Ok(match receiver {
                Value::String(s) => Value::String(s.clone()),
                other => Value::String(other.to_string()),
            })
        }
        "type" => {
            expect_args(name, &args, 0)?;
            Ok(Value::String(receiver.type_name().to_string()))
        }
        "==" => {
            expect_args(name, &args, 1)?;
            Ok(Value::Boolean(*receiver == args[0]))
        }
        "!=" => {
            expect_args(name, &args, 1)?;
            Ok(Value::Boolean(*receiver != args[0]))
        }
        "nil?" => {
            expect_args(name, &args, 0)?;
            Ok(Value::Boolean(matches!(receiver, Value::Nil)))
        }
        "dup" => {
            expect_args(name, &args, 0)?;
            Ok(receiver.duplicate())
        }
        "respond_to?" => {
            expect_args(name, &args, 1)?;
            match &args[0] {
                Value::Keyword(n) | Value::String(n) => Ok(Value::Boolean(receiver.responds_to(n))),
                other => Err(RuntimeError::type_error(
                    "keyword",
                    other.type_name(),
                    "respond_to?",
                )),
            }
        }
        _ => Err(RuntimeError::no_method(name, receiver.to_string())),
    }
}

fn expect_args(name: &str, args: &[Value], expected: usize) -> RuntimeResult<()> {
    if args.len() != expected {
        return Err(RuntimeError::ArityMismatch {
            function: name.to_string(),
            expected: expected.to_string(),
            actual: args.len(),
        });
    }
    Ok(())
}

fn expect_integer(value: &Value, operation: &str) -> RuntimeResult<i64> {
    match value {
        Value::Integer(n) => Ok(*n),
        other => Err(RuntimeError::type_error("integer", other.type_name(), operation)),
    }
}

fn as_vector<'a>(receiver: &'a Value, operation: &str) -> RuntimeResult<&'a Vec<Value>> {
    match receiver {
        Value::Vector(items) => Ok(items),
        other => Err(RuntimeError::type_error("vector", other.type_name(), operation)),
    }
}

fn as_str<'a>(receiver: &'a Value, operation: &str) -> RuntimeResult<&'a str> {
    match receiver {
        Value::String(s) => Ok(s),
        other => Err(RuntimeError::type_error("string", other.type_name(), operation)),
    }
}

/// Apply a per-element callback: either an invocable value or a keyword
/// naming a method to send to the element.
fn call_with(func: &Value, item: Value, operation: &str) -> RuntimeResult<Value> {
    match func {
        Value::Keyword(name) => item.send(name, vec![]),
        f if f.is_invocable() => f.invoke(vec![item]),
        other => Err(RuntimeError::type_error(
            "function or keyword",
            other.type_name(),
            operation,
        )),
    }
}

/// Exact ordering of an integer against a float that is not NaN.
fn cmp_int_float(n: i64, f: f64) -> Ordering {
    // 2^63, the first float past i64::MAX
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if f >= LIMIT {
        return Ordering::Less;
    }
    if f < -LIMIT {
        return Ordering::Greater;
    }
    let whole = f.floor();
    match n.cmp(&(whole as i64)) {
        Ordering::Equal if f > whole => Ordering::Less,
        other => other,
    }
}

fn compare(a: &Value, b: &Value, operation: &str) -> RuntimeResult<Ordering> {
    let ordering = match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => Some(x.cmp(y)),
        (Value::Integer(x), Value::Float(y)) if !y.is_nan() => Some(cmp_int_float(*x, *y)),
        (Value::Float(x), Value::Integer(y)) if !x.is_nan() => {
            Some(cmp_int_float(*y, *x).reverse())
        }
        (Value::Float(x), Value::Float(y)) => x.partial_cmp(y),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    };
    ordering.ok_or_else(|| {
        RuntimeError::type_error(a.type_name(), b.type_name(), operation)
    })
}

// Vector methods

fn vector_select(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("select", &args, 1)?;
    let mut out = Vec::new();
    for item in as_vector(receiver, "select")? {
        if call_with(&args[0], item.clone(), "select")?.is_truthy() {
            out.push(item.clone());
        }
    }
    Ok(Value::Vector(out))
}

fn vector_reject(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("reject", &args, 1)?;
    let mut out = Vec::new();
    for item in as_vector(receiver, "reject")? {
        if !call_with(&args[0], item.clone(), "reject")?.is_truthy() {
            out.push(item.clone());
        }
    }
    Ok(Value::Vector(out))
}

fn vector_map(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("map", &args, 1)?;
    as_vector(receiver, "map")?
        .iter()
        .map(|item| call_with(&args[0], item.clone(), "map"))
        .collect::<RuntimeResult<Vec<_>>>()
        .map(Value::Vector)
}

fn vector_flat_map(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("flat_map", &args, 1)?;
    let mut out = Vec::new();
    for item in as_vector(receiver, "flat_map")? {
        match call_with(&args[0], item.clone(), "flat_map")? {
            Value::Vector(inner) => out.extend(inner),
            single => out.push(single),
        }
    }
    Ok(Value::Vector(out))
}

fn vector_reverse(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("reverse", &args, 0)?;
    let mut items = as_vector(receiver, "reverse")?.clone();
    items.reverse();
    Ok(Value::Vector(items))
}

fn vector_sort(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("sort", &args, 0)?;
    let mut items = as_vector(receiver, "sort")?.clone();
    check_sortable(&items)?;
    // every pair is comparable once the elements share one sortable kind
    items.sort_by(|a, b| compare(a, b, "sort").unwrap_or(Ordering::Equal));
    Ok(Value::Vector(items))
}

/// Elements must all be numbers (no NaN) or all be strings.
fn check_sortable(items: &[Value]) -> RuntimeResult<()> {
    let mut kind = None;
    for item in items {
        let this = match item {
            Value::Integer(_) => "number",
            Value::Float(f) if !f.is_nan() => "number",
            Value::String(_) => "string",
            Value::Float(_) => return Err(RuntimeError::type_error("number", "NaN", "sort")),
            other => {
                return Err(RuntimeError::type_error(
                    "number or string",
                    other.type_name(),
                    "sort",
                ))
            }
        };
        match kind {
            None => kind = Some(this),
            Some(expected) if expected != this => {
                return Err(RuntimeError::type_error(expected, item.type_name(), "sort"));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

fn vector_count(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    let items = as_vector(receiver, "count")?;
    match args.as_slice() {
        [] => Ok(Value::from(items.len())),
        [pred] => {
            let mut n = 0usize;
            for item in items {
                if call_with(pred, item.clone(), "count")?.is_truthy() {
                    n += 1;
                }
            }
            Ok(Value::from(n))
        }
        _ => Err(RuntimeError::ArityMismatch {
            function: "count".to_string(),
            expected: Arity::Range(0, 1).to_string(),
            actual: args.len(),
        }),
    }
}

fn vector_len(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("len", &args, 0)?;
    Ok(Value::from(as_vector(receiver, "len")?.len()))
}

fn vector_first(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("first", &args, 0)?;
    Ok(as_vector(receiver, "first")?.first().cloned().unwrap_or(Value::Nil))
}

fn vector_last(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("last", &args, 0)?;
    Ok(as_vector(receiver, "last")?.last().cloned().unwrap_or(Value::Nil))
}

fn vector_sum(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("sum", &args, 0)?;
    as_vector(receiver, "sum")?
        .iter()
        .try_fold(Value::Integer(0), |acc, item| number_add(&acc, vec![item.clone()]))
}

fn vector_take(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("take", &args, 1)?;
    let n = expect_integer(&args[0], "take")?.max(0) as usize;
    Ok(Value::Vector(
        as_vector(receiver, "take")?.iter().take(n).cloned().collect(),
    ))
}

fn vector_drop(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("drop", &args, 1)?;
    let n = expect_integer(&args[0], "drop")?.max(0) as usize;
    Ok(Value::Vector(
        as_vector(receiver, "drop")?.iter().skip(n).cloned().collect(),
    ))
}

fn vector_push(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("push", &args, 1)?;
    let mut items = as_vector(receiver, "push")?.clone();
    items.extend(args);
    Ok(Value::Vector(items))
}

/// Returns the deleted element, or nil when it was not present.
fn vector_delete(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("delete", &args, 1)?;
    let items = as_vector(receiver, "delete")?;
    Ok(if items.contains(&args[0]) {
        args[0].clone()
    } else {
        Value::Nil
    })
}

fn vector_include(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("include?", &args, 1)?;
    Ok(Value::Boolean(as_vector(receiver, "include?")?.contains(&args[0])))
}

fn vector_empty(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("empty?", &args, 0)?;
    Ok(Value::Boolean(as_vector(receiver, "empty?")?.is_empty()))
}

fn vector_at(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("at", &args, 1)?;
    let items = as_vector(receiver, "at")?;
    let index = expect_integer(&args[0], "at")?;
    let index = if index < 0 {
        items.len() as i64 + index
    } else {
        index
    };
    Ok(usize::try_from(index)
        .ok()
        .and_then(|i| items.get(i))
        .cloned()
        .unwrap_or(Value::Nil))
}

fn vector_concat(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("+", &args, 1)?;
    let mut items = as_vector(receiver, "+")?.clone();
    items.extend(as_vector(&args[0], "+")?.iter().cloned());
    Ok(Value::Vector(items))
}

fn vector_repeat(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("*", &args, 1)?;
    let times = expect_integer(&args[0], "*")?.max(0) as usize;
    let items = as_vector(receiver, "*")?;
    check_repeat_len(items.len(), times)?;
    Ok(Value::Vector(
        std::iter::repeat(items.iter().cloned())
            .take(times)
            .flatten()
            .collect(),
    ))
}

/// Upper bound on the length a repeat may produce.
const MAX_REPEAT_LEN: usize = 1 << 24;

fn check_repeat_len(len: usize, times: usize) -> RuntimeResult<()> {
    match len.checked_mul(times) {
        Some(total) if total <= MAX_REPEAT_LEN => Ok(()),
        _ => Err(RuntimeError::Generic(format!(
            "repeat result too large in *: {} x {}",
            len, times
        ))),
    }
}

// Number methods

fn arithmetic(
    receiver: &Value,
    args: &[Value],
    operation: &str,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> RuntimeResult<Value> {
    expect_args(operation, args, 1)?;
    match (receiver, &args[0]) {
        (Value::Integer(a), Value::Integer(b)) => int_op(*a, *b)
            .map(Value::Integer)
            .ok_or_else(|| RuntimeError::Generic(format!("integer overflow in {}", operation))),
        (Value::Integer(a), Value::Float(b)) => Ok(Value::Float(float_op(*a as f64, *b))),
        (Value::Float(a), Value::Integer(b)) => Ok(Value::Float(float_op(*a, *b as f64))),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(float_op(*a, *b))),
        (_, other) => Err(RuntimeError::type_error("number", other.type_name(), operation)),
    }
}

fn number_add(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    arithmetic(receiver, &args, "+", i64::checked_add, |a, b| a + b)
}

fn number_sub(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    arithmetic(receiver, &args, "-", i64::checked_sub, |a, b| a - b)
}

fn number_mul(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    arithmetic(receiver, &args, "*", i64::checked_mul, |a, b| a * b)
}

fn number_div(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    if matches!(args.first(), Some(Value::Integer(0))) && matches!(receiver, Value::Integer(_)) {
        return Err(RuntimeError::DivisionByZero);
    }
    arithmetic(receiver, &args, "/", i64::checked_div, |a, b| a / b)
}

fn number_rem(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    if matches!(args.first(), Some(Value::Integer(0))) && matches!(receiver, Value::Integer(_)) {
        return Err(RuntimeError::DivisionByZero);
    }
    arithmetic(receiver, &args, "%", i64::checked_rem, |a, b| a % b)
}

fn comparison(
    receiver: &Value,
    args: &[Value],
    operation: &str,
    accept: fn(Ordering) -> bool,
) -> RuntimeResult<Value> {
    expect_args(operation, args, 1)?;
    Ok(Value::Boolean(accept(compare(receiver, &args[0], operation)?)))
}

fn number_lt(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    comparison(receiver, &args, "<", Ordering::is_lt)
}

fn number_le(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    comparison(receiver, &args, "<=", Ordering::is_le)
}

fn number_gt(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    comparison(receiver, &args, ">", Ordering::is_gt)
}

fn number_ge(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    comparison(receiver, &args, ">=", Ordering::is_ge)
}

fn number_abs(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("abs", &args, 0)?;
    match receiver {
        Value::Integer(n) => n
            .checked_abs()
            .map(Value::Integer)
            .ok_or_else(|| RuntimeError::Generic("integer overflow in abs".to_string())),
        Value::Float(f) => Ok(Value::Float(f.abs())),
        other => Err(RuntimeError::type_error("number", other.type_name(), "abs")),
    }
}

fn integer_even(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("even?", &args, 0)?;
    Ok(Value::Boolean(expect_integer(receiver, "even?")? % 2 == 0))
}

fn integer_odd(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("odd?", &args, 0)?;
    Ok(Value::Boolean(expect_integer(receiver, "odd?")? % 2 != 0))
}

// String methods

fn string_len(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("len", &args, 0)?;
    Ok(Value::from(as_str(receiver, "len")?.chars().count()))
}

fn string_upcase(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("upcase", &args, 0)?;
    Ok(Value::String(as_str(receiver, "upcase")?.to_uppercase()))
}

fn string_downcase(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("downcase", &args, 0)?;
    Ok(Value::String(as_str(receiver, "downcase")?.to_lowercase()))
}

fn string_reverse(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("reverse", &args, 0)?;
    Ok(Value::String(as_str(receiver, "reverse")?.chars().rev().collect()))
}

fn string_include(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("include?", &args, 1)?;
    let needle = as_str(&args[0], "include?")?;
    Ok(Value::Boolean(as_str(receiver, "include?")?.contains(needle)))
}

fn string_empty(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("empty?", &args, 0)?;
    Ok(Value::Boolean(as_str(receiver, "empty?")?.is_empty()))
}

fn string_concat(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("+", &args, 1)?;
    let mut s = as_str(receiver, "+")?.to_string();
    s.push_str(as_str(&args[0], "+")?);
    Ok(Value::String(s))
}

fn string_repeat(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("*", &args, 1)?;
    let times = expect_integer(&args[0], "*")?.max(0) as usize;
    let s = as_str(receiver, "*")?;
    check_repeat_len(s.len(), times)?;
    Ok(Value::String(s.repeat(times)))
}

// Map methods

fn map_key(key: &Value, operation: &str) -> RuntimeResult<String> {
    match key {
        Value::String(s) | Value::Keyword(s) => Ok(s.clone()),
        other => Err(RuntimeError::type_error("string or keyword", other.type_name(), operation)),
    }
}

fn map_get(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("get", &args, 1)?;
    let key = map_key(&args[0], "get")?;
    match receiver {
        Value::Map(m) => Ok(m.get(&key).cloned().unwrap_or(Value::Nil)),
        other => Err(RuntimeError::type_error("map", other.type_name(), "get")),
    }
}

fn map_keys(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("keys", &args, 0)?;
    match receiver {
        Value::Map(m) => Ok(Value::Vector(m.keys().cloned().map(Value::String).collect())),
        other => Err(RuntimeError::type_error("map", other.type_name(), "keys")),
    }
}

fn map_values(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("values", &args, 0)?;
    match receiver {
        Value::Map(m) => Ok(Value::Vector(m.values().cloned().collect())),
        other => Err(RuntimeError::type_error("map", other.type_name(), "values")),
    }
}

fn map_len(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("len", &args, 0)?;
    match receiver {
        Value::Map(m) => Ok(Value::from(m.len())),
        other => Err(RuntimeError::type_error("map", other.type_name(), "len")),
    }
}

fn map_has_key(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("has_key?", &args, 1)?;
    let key = map_key(&args[0], "has_key?")?;
    match receiver {
        Value::Map(m) => Ok(Value::Boolean(m.contains_key(&key))),
        other => Err(RuntimeError::type_error("map", other.type_name(), "has_key?")),
    }
}

fn boolean_not(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("not", &args, 0)?;
    Ok(Value::Boolean(!receiver.is_truthy()))
}

// Function methods

fn function_call(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    receiver.invoke(args)
}

fn function_arity(receiver: &Value, args: Vec<Value>) -> RuntimeResult<Value> {
    expect_args("arity", &args, 0)?;
    match receiver {
        Value::Function(f) => Ok(Value::String(f.arity().to_string())),
        other => Err(RuntimeError::type_error("function", other.type_name(), "arity")),
    }
}
