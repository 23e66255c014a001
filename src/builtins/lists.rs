//! List operations: cons, car, cdr, length, list
//!
//! - `cons`: Construct a new pair
//! - `car`: Head of a pair; nil for nil
//! - `cdr`: Tail of a pair; nil for nil
//! - `length`: Element count of a proper list, byte length of a string
//! - `list`: Fresh proper list of the arguments

use crate::error::{EvalError, PRED_LISTP};
use crate::interp::Interp;
use crate::value::{Arity, BuiltinDef, Value};

static CONS: BuiltinDef = BuiltinDef {
    name: "cons",
    arity: Arity::Fixed(2),
    eval_args: true,
    run: builtin_cons,
};

static CAR: BuiltinDef = BuiltinDef {
    name: "car",
    arity: Arity::Fixed(1),
    eval_args: true,
    run: builtin_car,
};

static CDR: BuiltinDef = BuiltinDef {
    name: "cdr",
    arity: Arity::Fixed(1),
    eval_args: true,
    run: builtin_cdr,
};

static LENGTH: BuiltinDef = BuiltinDef {
    name: "length",
    arity: Arity::Fixed(1),
    eval_args: true,
    run: builtin_length,
};

static LIST: BuiltinDef = BuiltinDef {
    name: "list",
    arity: Arity::Variadic,
    eval_args: true,
    run: builtin_list,
};

/// Allocates a new cons of the two arguments.
fn builtin_cons(interp: &mut Interp, args: &[Value]) -> Result<Value, EvalError> {
    Ok(interp.cons(args[0], args[1]))
}

/// Head of a cons; the car of nil is nil.
fn builtin_car(interp: &mut Interp, args: &[Value]) -> Result<Value, EvalError> {
    if args[0].is_nil() {
        return Ok(Value::Nil);
    }
    match interp.heap().cons_parts(args[0]) {
        Some((car, _)) => Ok(car),
        None => Err(EvalError::wrong_type(PRED_LISTP)),
    }
}

/// Tail of a cons; the cdr of nil is nil.
fn builtin_cdr(interp: &mut Interp, args: &[Value]) -> Result<Value, EvalError> {
    if args[0].is_nil() {
        return Ok(Value::Nil);
    }
    match interp.heap().cons_parts(args[0]) {
        Some((_, cdr)) => Ok(cdr),
        None => Err(EvalError::wrong_type(PRED_LISTP)),
    }
}

/// Length of a proper list or byte length of a string. Dotted lists and
/// other values fail the listp predicate.
fn builtin_length(interp: &mut Interp, args: &[Value]) -> Result<Value, EvalError> {
    let byte_len = interp.heap().str_value(args[0]).map(|s| s.len());
    if let Some(len) = byte_len {
        return Ok(interp.fixnum(len as i64));
    }
    match interp.list_items(args[0]) {
        Some(items) => {
            let len = items.len() as i64;
            Ok(interp.fixnum(len))
        }
        None => Err(EvalError::wrong_type(PRED_LISTP)),
    }
}

/// Fresh proper list of the arguments, in order.
fn builtin_list(interp: &mut Interp, args: &[Value]) -> Result<Value, EvalError> {
    Ok(interp.list_from(args))
}

/// Register all list builtins in the environment.
pub fn register(interp: &mut Interp) {
    for def in [&CONS, &CAR, &CDR, &LENGTH, &LIST] {
        interp.define_builtin(def);
    }
}
