// ABOUTME: Evaluator module: dispatch, application, signal propagation

use crate::error::{fatal, EvalError, PRED_LISTP};
use crate::interp::Interp;
use crate::value::{Arity, BuiltinDef, Object, Value};

/// How a form is handled, copied out of the heap so evaluation can borrow
/// the interpreter mutably.
enum Shape {
    SelfEval,
    Symbol,
    Apply { head: Value, tail: Value },
}

enum Callable {
    Builtin(&'static BuiltinDef),
    Lambda { params: Value, body: Value },
    Other,
}

/// Evaluates one form.
///
/// Nil and the literal kinds evaluate to themselves; a symbol reads its
/// innermost dynamic binding; a cons is an application. A pending signal
/// short-circuits everything through `?`.
pub fn eval(interp: &mut Interp, form: Value) -> Result<Value, EvalError> {
    let id = match form {
        Value::Nil => return Ok(Value::Nil),
        Value::Obj(id) => id,
    };
    let shape = match interp.heap().get(id) {
        Object::Fixnum(_) | Object::Str(_) | Object::Builtin(_) | Object::Lambda { .. } => {
            Shape::SelfEval
        }
        Object::Symbol(_) => Shape::Symbol,
        Object::Cons { car, cdr } => Shape::Apply {
            head: *car,
            tail: *cdr,
        },
    };
    match shape {
        Shape::SelfEval => Ok(form),
        Shape::Symbol => interp.lookup(id).ok_or(EvalError::VoidVariable(form)),
        Shape::Apply { head, tail } => apply_form(interp, head, tail),
    }
}

/// Evaluates forms in order and returns the last result, nil if none.
pub fn eval_progn(interp: &mut Interp, forms: &[Value]) -> Result<Value, EvalError> {
    let mut result = Value::Nil;
    for form in forms {
        result = eval(interp, *form)?;
    }
    Ok(result)
}

/// Application: evaluate the head to a callable, then dispatch on its
/// kind. The form's tail must be a proper list.
fn apply_form(interp: &mut Interp, head: Value, tail: Value) -> Result<Value, EvalError> {
    let callable = eval(interp, head)?;
    let args = interp
        .list_items(tail)
        .ok_or(EvalError::WrongTypeArgument {
            predicate: PRED_LISTP,
        })?;

    let target = match interp.heap().obj(callable) {
        Some(Object::Builtin(def)) => Callable::Builtin(*def),
        Some(Object::Lambda { params, body }) => Callable::Lambda {
            params: *params,
            body: *body,
        },
        _ => Callable::Other,
    };

    match target {
        Callable::Builtin(def) => {
            // Special forms get the tail untouched
            if !def.eval_args {
                return (def.run)(interp, &args);
            }
            if let Arity::Fixed(expected) = def.arity {
                if args.len() != expected {
                    return Err(EvalError::wrong_arg_count(def.name, args.len()));
                }
            }
            let mut evaled = Vec::with_capacity(args.len());
            for arg in &args {
                evaled.push(eval(interp, *arg)?);
            }
            (def.run)(interp, &evaled)
        }
        Callable::Lambda { params, body } => apply_lambda(interp, params, body, &args),
        Callable::Other => Err(EvalError::InvalidFunction(callable)),
    }
}

/// Calls a user lambda: arguments are evaluated left-to-right, bound as
/// one dynamic frame, and the body runs as an implicit progn. The frame is
/// popped whether the body returned or signalled.
fn apply_lambda(
    interp: &mut Interp,
    params: Value,
    body: Value,
    args: &[Value],
) -> Result<Value, EvalError> {
    let mut evaled = Vec::with_capacity(args.len());
    for arg in args {
        evaled.push(eval(interp, *arg)?);
    }

    // The lambda special form validated both lists at construction.
    let Some(param_list) = interp.list_items(params) else {
        fatal("lambda parameter list is not a proper list");
    };
    if evaled.len() != param_list.len() {
        return Err(EvalError::wrong_arg_count("lambda", evaled.len()));
    }
    let Some(body_forms) = interp.list_items(body) else {
        fatal("lambda body is not a proper list");
    };

    let mut bindings = Vec::with_capacity(param_list.len());
    for (param, value) in param_list.iter().zip(evaled) {
        let Some(sym) = interp.heap().symbol_id(*param) else {
            fatal("lambda parameter is not a symbol");
        };
        bindings.push((sym, value));
    }

    interp.push_frame(bindings);
    let result = eval_progn(interp, &body_forms);
    interp.pop_frame();
    result
}
