// ABOUTME: Signal types for recoverable errors and the fatal-abort path

use thiserror::Error;

use crate::interp::Interp;
use crate::value::Value;

// ===== Predicate names used in wrong-type-argument signals =====
pub const PRED_LISTP: &str = "listp";
pub const PRED_SYMBOLP: &str = "symbolp";
pub const PRED_INTEGERP: &str = "integerp";
pub const PRED_STRINGP: &str = "stringp";

/// A pending signal, propagated as an error result until the top-level
/// handler renders it. Each variant corresponds to one user-visible
/// condition symbol; `into_condition` builds the `(symbol . data)` cons the
/// driver prints.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// The reader could not make a form out of the input.
    #[error("invalid-syntax: {0}")]
    InvalidSyntax(String),

    /// A form's head evaluated to something that cannot be applied.
    #[error("invalid-function")]
    InvalidFunction(Value),

    /// A symbol was read before any binding existed for it.
    #[error("void-variable")]
    VoidVariable(Value),

    /// An argument had the wrong kind; carries the predicate it failed.
    #[error("wrong-type-argument: {predicate}")]
    WrongTypeArgument { predicate: &'static str },

    /// A call provided a number of arguments the callee does not accept.
    #[error("wrong-number-of-arguments: {name} got {provided}")]
    WrongNumberOfArguments {
        name: &'static str,
        provided: usize,
    },

    /// Anything else a program can provoke.
    #[error("{0}")]
    LispError(String),
}

impl EvalError {
    pub fn wrong_type(predicate: &'static str) -> Self {
        EvalError::WrongTypeArgument { predicate }
    }

    pub fn wrong_arg_count(name: &'static str, provided: usize) -> Self {
        EvalError::WrongNumberOfArguments { name, provided }
    }

    /// The condition symbol's name, as the user sees it.
    pub fn condition_name(&self) -> &'static str {
        match self {
            EvalError::InvalidSyntax(_) => "invalid-syntax",
            EvalError::InvalidFunction(_) => "invalid-function",
            EvalError::VoidVariable(_) => "void-variable",
            EvalError::WrongTypeArgument { .. } => "wrong-type-argument",
            EvalError::WrongNumberOfArguments { .. } => "wrong-number-of-arguments",
            EvalError::LispError(_) => "lisp-error",
        }
    }

    /// Builds the `(symbol . data)` condition cons for the top-level
    /// handler. Allocates, so it must run before the handler's collection.
    pub fn into_condition(self, interp: &mut Interp) -> Value {
        let data = match &self {
            EvalError::InvalidSyntax(message) => interp.string(message.clone()),
            EvalError::InvalidFunction(value) => *value,
            EvalError::VoidVariable(symbol) => *symbol,
            EvalError::WrongTypeArgument { predicate } => interp.intern(predicate),
            EvalError::WrongNumberOfArguments { provided, .. } => interp.fixnum(*provided as i64),
            EvalError::LispError(message) => interp.string(message.clone()),
        };
        let symbol = interp.intern(self.condition_name());
        interp.cons(symbol, data)
    }
}

/// Reports an invariant violation and aborts the process. Reserved for
/// states only buggy interpreter code can reach; anything a user program
/// can cause signals an `EvalError` instead.
pub fn fatal(message: &str) -> ! {
    eprintln!("fatal: {message}");
    std::process::abort()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::Interp;
    use crate::printer::stringify;

    #[test]
    fn test_condition_names() {
        assert_eq!(
            EvalError::VoidVariable(Value::Nil).condition_name(),
            "void-variable"
        );
        assert_eq!(
            EvalError::wrong_type(PRED_LISTP).condition_name(),
            "wrong-type-argument"
        );
        assert_eq!(
            EvalError::wrong_arg_count("car", 3).condition_name(),
            "wrong-number-of-arguments"
        );
    }

    #[test]
    fn test_void_variable_condition_renders_symbol() {
        let mut interp = Interp::new();
        let sym = interp.intern("unknown-var");
        let condition = EvalError::VoidVariable(sym).into_condition(&mut interp);
        assert_eq!(
            stringify(interp.heap(), condition),
            "(void-variable . unknown-var)"
        );
    }

    #[test]
    fn test_wrong_type_condition_carries_predicate() {
        let mut interp = Interp::new();
        let condition = EvalError::wrong_type(PRED_LISTP).into_condition(&mut interp);
        assert_eq!(
            stringify(interp.heap(), condition),
            "(wrong-type-argument . listp)"
        );
    }
}
