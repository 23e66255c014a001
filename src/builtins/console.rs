//! Console output: print
//!
//! `print` writes the readable rendering of its argument and a newline to
//! standard output, then returns the argument.

use crate::error::EvalError;
use crate::interp::Interp;
use crate::printer::stringify;
use crate::value::{Arity, BuiltinDef, Value};

static PRINT: BuiltinDef = BuiltinDef {
    name: "print",
    arity: Arity::Fixed(1),
    eval_args: true,
    run: builtin_print,
};

/// Prints the value followed by a newline. Returns the value.
fn builtin_print(interp: &mut Interp, args: &[Value]) -> Result<Value, EvalError> {
    println!("{}", stringify(interp.heap(), args[0]));
    Ok(args[0])
}

/// Register the console builtins in the environment.
pub fn register(interp: &mut Interp) {
    interp.define_builtin(&PRINT);
}
