//! Comparison operations: <, eq, equal, not
//!
//! - `<`: Numeric less-than over two fixnums
//! - `eq`: Identity equality (fixnums compare by value)
//! - `equal`: Structural equality over strings and conses
//! - `not`: t for nil, nil for everything else

use crate::error::{EvalError, PRED_INTEGERP};
use crate::interp::Interp;
use crate::value::{Arity, BuiltinDef, Value};

static LT: BuiltinDef = BuiltinDef {
    name: "<",
    arity: Arity::Fixed(2),
    eval_args: true,
    run: builtin_lt,
};

static EQ: BuiltinDef = BuiltinDef {
    name: "eq",
    arity: Arity::Fixed(2),
    eval_args: true,
    run: builtin_eq,
};

static EQUAL: BuiltinDef = BuiltinDef {
    name: "equal",
    arity: Arity::Fixed(2),
    eval_args: true,
    run: builtin_equal,
};

static NOT: BuiltinDef = BuiltinDef {
    name: "not",
    arity: Arity::Fixed(1),
    eval_args: true,
    run: builtin_not,
};

/// Numeric less-than; both arguments must be fixnums.
fn builtin_lt(interp: &mut Interp, args: &[Value]) -> Result<Value, EvalError> {
    let wrong_type = EvalError::WrongTypeArgument {
        predicate: PRED_INTEGERP,
    };
    let a = interp
        .heap()
        .fixnum_value(args[0])
        .ok_or_else(|| wrong_type.clone())?;
    let b = interp.heap().fixnum_value(args[1]).ok_or(wrong_type)?;
    Ok(interp.bool_value(a < b))
}

/// Identity equality: same object, or fixnums with the same value.
fn builtin_eq(interp: &mut Interp, args: &[Value]) -> Result<Value, EvalError> {
    let truth = interp.heap().eq_values(args[0], args[1]);
    Ok(interp.bool_value(truth))
}

/// Structural equality: eq, byte-equal strings, or recursively equal
/// conses.
fn builtin_equal(interp: &mut Interp, args: &[Value]) -> Result<Value, EvalError> {
    let truth = interp.heap().equal_values(args[0], args[1]);
    Ok(interp.bool_value(truth))
}

/// Logical negation under nil-is-false truthiness.
fn builtin_not(interp: &mut Interp, args: &[Value]) -> Result<Value, EvalError> {
    Ok(interp.bool_value(args[0].is_nil()))
}

/// Register all comparison builtins in the environment.
pub fn register(interp: &mut Interp) {
    for def in [&LT, &EQ, &EQUAL, &NOT] {
        interp.define_builtin(def);
    }
}
