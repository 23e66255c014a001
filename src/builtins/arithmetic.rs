//! Arithmetic operations: +, -, *
//!
//! Variadic fixnum operations; arithmetic wraps at machine width.
//!
//! - `+`: Sum of all arguments (identity: 0)
//! - `-`: Subtract subsequent args from first, negate if single, 0 if none
//! - `*`: Product of all arguments (identity: 1)

use crate::error::{EvalError, PRED_INTEGERP};
use crate::interp::Interp;
use crate::value::{Arity, BuiltinDef, Value};

static ADD: BuiltinDef = BuiltinDef {
    name: "+",
    arity: Arity::Variadic,
    eval_args: true,
    run: builtin_add,
};

static SUB: BuiltinDef = BuiltinDef {
    name: "-",
    arity: Arity::Variadic,
    eval_args: true,
    run: builtin_sub,
};

static MUL: BuiltinDef = BuiltinDef {
    name: "*",
    arity: Arity::Variadic,
    eval_args: true,
    run: builtin_mul,
};

fn fixnum_arg(interp: &Interp, value: Value) -> Result<i64, EvalError> {
    interp
        .heap()
        .fixnum_value(value)
        .ok_or(EvalError::WrongTypeArgument {
            predicate: PRED_INTEGERP,
        })
}

/// Returns the sum of all arguments; `(+)` is 0.
fn builtin_add(interp: &mut Interp, args: &[Value]) -> Result<Value, EvalError> {
    let mut sum: i64 = 0;
    for arg in args {
        sum = sum.wrapping_add(fixnum_arg(interp, *arg)?);
    }
    Ok(interp.fixnum(sum))
}

/// Left-associative subtraction; `(- 5)` negates, `(-)` is 0.
fn builtin_sub(interp: &mut Interp, args: &[Value]) -> Result<Value, EvalError> {
    let Some((first, rest)) = args.split_first() else {
        return Ok(interp.fixnum(0));
    };
    let first = fixnum_arg(interp, *first)?;
    if rest.is_empty() {
        return Ok(interp.fixnum(first.wrapping_neg()));
    }
    let mut result = first;
    for arg in rest {
        result = result.wrapping_sub(fixnum_arg(interp, *arg)?);
    }
    Ok(interp.fixnum(result))
}

/// Returns the product of all arguments; `(*)` is 1.
fn builtin_mul(interp: &mut Interp, args: &[Value]) -> Result<Value, EvalError> {
    let mut product: i64 = 1;
    for arg in args {
        product = product.wrapping_mul(fixnum_arg(interp, *arg)?);
    }
    Ok(interp.fixnum(product))
}

/// Register all arithmetic builtins in the environment.
pub fn register(interp: &mut Interp) {
    for def in [&ADD, &SUB, &MUL] {
        interp.define_builtin(def);
    }
}
