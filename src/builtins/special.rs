//! Special forms: quote, progn, if, while, lambda, let
//!
//! These receive their argument forms unevaluated and decide themselves
//! what to evaluate and when.

use crate::error::{EvalError, PRED_LISTP, PRED_SYMBOLP};
use crate::eval::{eval, eval_progn};
use crate::interp::Interp;
use crate::value::{Arity, BuiltinDef, ObjId, Value};

static QUOTE: BuiltinDef = BuiltinDef {
    name: "quote",
    arity: Arity::Fixed(1),
    eval_args: false,
    run: special_quote,
};

static PROGN: BuiltinDef = BuiltinDef {
    name: "progn",
    arity: Arity::Variadic,
    eval_args: false,
    run: special_progn,
};

static IF: BuiltinDef = BuiltinDef {
    name: "if",
    arity: Arity::Variadic,
    eval_args: false,
    run: special_if,
};

static WHILE: BuiltinDef = BuiltinDef {
    name: "while",
    arity: Arity::Variadic,
    eval_args: false,
    run: special_while,
};

static LAMBDA: BuiltinDef = BuiltinDef {
    name: "lambda",
    arity: Arity::Variadic,
    eval_args: false,
    run: special_lambda,
};

static LET: BuiltinDef = BuiltinDef {
    name: "let",
    arity: Arity::Variadic,
    eval_args: false,
    run: special_let,
};

/// Returns the quoted form untouched.
fn special_quote(_interp: &mut Interp, args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::wrong_arg_count("quote", args.len()));
    }
    Ok(args[0])
}

/// Evaluates the body in order; value of the last form, nil if empty.
fn special_progn(interp: &mut Interp, args: &[Value]) -> Result<Value, EvalError> {
    eval_progn(interp, args)
}

/// `(if cond then else...)`: the else forms run as an implicit progn.
fn special_if(interp: &mut Interp, args: &[Value]) -> Result<Value, EvalError> {
    if args.len() < 2 {
        return Err(EvalError::wrong_arg_count("if", args.len()));
    }
    let condition = eval(interp, args[0])?;
    if condition.is_truthy() {
        eval(interp, args[1])
    } else {
        eval_progn(interp, &args[2..])
    }
}

/// `(while cond body...)`: condition and body strictly alternate. Returns
/// the last body result, nil if the loop never ran.
fn special_while(interp: &mut Interp, args: &[Value]) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Err(EvalError::wrong_arg_count("while", 0));
    }
    let mut result = Value::Nil;
    loop {
        let condition = eval(interp, args[0])?;
        if !condition.is_truthy() {
            return Ok(result);
        }
        result = eval_progn(interp, &args[1..])?;
    }
}

/// `(lambda params body...)`: validates the parameter list and allocates
/// the function object. Nothing is captured; the body sees the dynamic
/// bindings live at call time.
fn special_lambda(interp: &mut Interp, args: &[Value]) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Err(EvalError::wrong_arg_count("lambda", 0));
    }
    let params = args[0];
    let param_list = interp
        .list_items(params)
        .ok_or(EvalError::WrongTypeArgument {
            predicate: PRED_LISTP,
        })?;
    for param in &param_list {
        if interp.heap().symbol_id(*param).is_none() {
            return Err(EvalError::wrong_type(PRED_SYMBOLP));
        }
    }
    let body = interp.list_from(&args[1..]);
    Ok(interp.lambda(params, body))
}

/// `(let bindings body...)`: initializers run left-to-right in the outer
/// environment, then all bindings take effect as one frame.
fn special_let(interp: &mut Interp, args: &[Value]) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Err(EvalError::wrong_arg_count("let", 0));
    }
    let binding_forms = interp
        .list_items(args[0])
        .ok_or(EvalError::WrongTypeArgument {
            predicate: PRED_LISTP,
        })?;

    let mut bindings: Vec<(ObjId, Value)> = Vec::with_capacity(binding_forms.len());
    for form in binding_forms {
        // Bare symbol binds nil
        if let Some(sym) = interp.heap().symbol_id(form) {
            bindings.push((sym, Value::Nil));
            continue;
        }
        let entry = interp
            .list_items(form)
            .ok_or(EvalError::WrongTypeArgument {
                predicate: PRED_LISTP,
            })?;
        let (symbol, init) = match entry.as_slice() {
            [symbol] => (*symbol, None),
            [symbol, init] => (*symbol, Some(*init)),
            _ => {
                return Err(EvalError::LispError(
                    "let: binding may have at most one value form".to_string(),
                ))
            }
        };
        let sym = interp
            .heap()
            .symbol_id(symbol)
            .ok_or(EvalError::WrongTypeArgument {
                predicate: PRED_SYMBOLP,
            })?;
        let value = match init {
            Some(init) => eval(interp, init)?,
            None => Value::Nil,
        };
        bindings.push((sym, value));
    }

    interp.push_frame(bindings);
    let result = eval_progn(interp, &args[1..]);
    interp.pop_frame();
    result
}

/// Register all special forms in the environment.
pub fn register(interp: &mut Interp) {
    for def in [&QUOTE, &PROGN, &IF, &WHILE, &LAMBDA, &LET] {
        interp.define_builtin(def);
    }
}
