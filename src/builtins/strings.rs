//! String operations: concat, stringify
//!
//! - `concat`: Byte concatenation of two strings
//! - `stringify`: Readable rendering of any value as a new string

use crate::error::{EvalError, PRED_STRINGP};
use crate::interp::Interp;
use crate::printer::stringify;
use crate::value::{Arity, BuiltinDef, Value};

static CONCAT: BuiltinDef = BuiltinDef {
    name: "concat",
    arity: Arity::Fixed(2),
    eval_args: true,
    run: builtin_concat,
};

static STRINGIFY: BuiltinDef = BuiltinDef {
    name: "stringify",
    arity: Arity::Fixed(1),
    eval_args: true,
    run: builtin_stringify,
};

/// New string holding the bytes of both arguments, in order.
fn builtin_concat(interp: &mut Interp, args: &[Value]) -> Result<Value, EvalError> {
    let wrong_type = EvalError::WrongTypeArgument {
        predicate: PRED_STRINGP,
    };
    let heap = interp.heap();
    let joined = match (heap.str_value(args[0]), heap.str_value(args[1])) {
        (Some(a), Some(b)) => format!("{a}{b}"),
        _ => return Err(wrong_type),
    };
    Ok(interp.string(joined))
}

/// Renders the argument the way `print` would, as a string value.
fn builtin_stringify(interp: &mut Interp, args: &[Value]) -> Result<Value, EvalError> {
    let rendered = stringify(interp.heap(), args[0]);
    Ok(interp.string(rendered))
}

/// Register all string builtins in the environment.
pub fn register(interp: &mut Interp) {
    for def in [&CONCAT, &STRINGIFY] {
        interp.define_builtin(def);
    }
}
