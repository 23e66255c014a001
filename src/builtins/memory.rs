//! Memory management: garbage-collect
//!
//! Collection itself runs only at quiescent points, so the builtin records
//! a request that the driver honors once the current top-level form has
//! finished. Sweeping mid-evaluation could free values held only in native
//! stack frames.

use crate::error::EvalError;
use crate::interp::Interp;
use crate::value::{Arity, BuiltinDef, Value};

static GARBAGE_COLLECT: BuiltinDef = BuiltinDef {
    name: "garbage-collect",
    arity: Arity::Fixed(0),
    eval_args: true,
    run: builtin_garbage_collect,
};

/// Requests a full collection cycle. Returns nil.
fn builtin_garbage_collect(interp: &mut Interp, _args: &[Value]) -> Result<Value, EvalError> {
    interp.request_collect();
    Ok(Value::Nil)
}

/// Register the memory builtins in the environment.
pub fn register(interp: &mut Interp) {
    interp.define_builtin(&GARBAGE_COLLECT);
}
