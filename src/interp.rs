// ABOUTME: Interpreter state: heap, intern table, environment, GC plumbing

use crate::builtins;
use crate::env::Env;
use crate::error::fatal;
use crate::heap::Heap;
use crate::intern::Interns;
use crate::value::{BuiltinDef, ObjId, Object, Value};

/// One interpreter session. Owns every subsystem the evaluator touches;
/// the driver keeps a single instance for the life of the process.
pub struct Interp {
    heap: Heap,
    interns: Interns,
    env: Env,
    t: Value,
    gc_requested: bool,
}

impl Default for Interp {
    fn default() -> Self {
        Self::new()
    }
}

impl Interp {
    /// Builds a session with the builtin suite registered and `t` bound to
    /// itself.
    pub fn new() -> Self {
        let mut interp = Interp {
            heap: Heap::new(),
            interns: Interns::new(),
            env: Env::new(),
            t: Value::Nil,
            gc_requested: false,
        };
        let t = interp.intern("t");
        interp.t = t;
        let Some(t_id) = interp.heap.symbol_id(t) else {
            fatal("interned value is not a symbol");
        };
        interp.env.assign(t_id, t);
        builtins::register_builtins(&mut interp);
        interp
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// The canonical truth value.
    pub fn t(&self) -> Value {
        self.t
    }

    pub fn bool_value(&self, truth: bool) -> Value {
        if truth {
            self.t
        } else {
            Value::Nil
        }
    }

    // ------------------------------------------------------------------
    // Allocation
    // ------------------------------------------------------------------

    pub fn intern(&mut self, name: &str) -> Value {
        self.interns.intern(&mut self.heap, name)
    }

    pub fn cons(&mut self, car: Value, cdr: Value) -> Value {
        self.heap.alloc(Object::Cons { car, cdr })
    }

    pub fn fixnum(&mut self, n: i64) -> Value {
        self.heap.alloc(Object::Fixnum(n))
    }

    pub fn string(&mut self, text: String) -> Value {
        self.heap.alloc(Object::Str(text))
    }

    pub fn lambda(&mut self, params: Value, body: Value) -> Value {
        self.heap.alloc(Object::Lambda { params, body })
    }

    /// Builds a proper list of `items`, in order.
    pub fn list_from(&mut self, items: &[Value]) -> Value {
        let mut list = Value::Nil;
        for item in items.iter().rev() {
            list = self.cons(*item, list);
        }
        list
    }

    /// The elements of a proper list, or None if `list` is dotted or not a
    /// list at all. Nil is the empty list.
    pub fn list_items(&self, list: Value) -> Option<Vec<Value>> {
        let mut items = Vec::new();
        let mut rest = list;
        loop {
            match rest {
                Value::Nil => return Some(items),
                Value::Obj(_) => match self.heap.cons_parts(rest) {
                    Some((car, cdr)) => {
                        items.push(car);
                        rest = cdr;
                    }
                    None => return None,
                },
            }
        }
    }

    // ------------------------------------------------------------------
    // Environment
    // ------------------------------------------------------------------

    pub fn lookup(&self, sym: ObjId) -> Option<Value> {
        self.env.lookup(sym)
    }

    pub fn assign(&mut self, sym: ObjId, value: Value) {
        self.env.assign(sym, value);
    }

    pub fn push_frame(&mut self, bindings: Vec<(ObjId, Value)>) {
        self.env.push_frame(bindings);
    }

    pub fn pop_frame(&mut self) {
        self.env.pop_frame();
    }

    pub fn frame_depth(&self) -> usize {
        self.env.frame_depth()
    }

    /// Interns the builtin's name and binds it globally.
    pub fn define_builtin(&mut self, def: &'static BuiltinDef) {
        let symbol = self.intern(def.name);
        let Some(sym_id) = self.heap.symbol_id(symbol) else {
            fatal("interned value is not a symbol");
        };
        let value = self.heap.alloc(Object::Builtin(def));
        self.env.assign(sym_id, value);
    }

    // ------------------------------------------------------------------
    // Collection
    // ------------------------------------------------------------------

    /// Asks for a collection at the next quiescent point. Sweeping here,
    /// mid-evaluation, could reclaim values held only in native frames.
    pub fn request_collect(&mut self) {
        self.gc_requested = true;
    }

    pub fn collect_requested(&self) -> bool {
        self.gc_requested
    }

    /// Runs a full mark-and-sweep cycle. `extra_roots` is for values the
    /// caller is still holding, typically the form just driven.
    pub fn collect(&mut self, extra_roots: &[Value]) -> usize {
        self.gc_requested = false;
        let mut roots: Vec<Value> = Vec::with_capacity(extra_roots.len() + 1);
        roots.extend(self.interns.roots());
        roots.extend(self.env.roots());
        roots.push(self.t);
        roots.extend_from_slice(extra_roots);
        self.heap.collect(&roots)
    }
}
