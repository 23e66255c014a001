//! Variable assignment: set
//!
//! `set` writes a symbol's binding slot. Under an active `let` or lambda
//! frame this is the innermost binding; when the symbol was unbound before
//! the frame, the assigned value survives the frame's exit.

use crate::error::{EvalError, PRED_SYMBOLP};
use crate::interp::Interp;
use crate::value::{Arity, BuiltinDef, Value};

static SET: BuiltinDef = BuiltinDef {
    name: "set",
    arity: Arity::Fixed(2),
    eval_args: true,
    run: builtin_set,
};

/// `(set sym value)`: stores into the binding slot of `sym`. Returns the
/// value.
fn builtin_set(interp: &mut Interp, args: &[Value]) -> Result<Value, EvalError> {
    let sym = interp
        .heap()
        .symbol_id(args[0])
        .ok_or(EvalError::WrongTypeArgument {
            predicate: PRED_SYMBOLP,
        })?;
    interp.assign(sym, args[1]);
    Ok(args[1])
}

/// Register the variable builtins in the environment.
pub fn register(interp: &mut Interp) {
    interp.define_builtin(&SET);
}
