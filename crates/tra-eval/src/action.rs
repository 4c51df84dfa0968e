//! Runs action blocks against the bindings of one match.

use std::io::Write;

use tra_dsl::{Action, Call, Dict, Expr, SourceFile, Stmt};

use crate::bindings::Bindings;
use crate::error::EvalError;
use crate::value::{DictValue, Value};

const PRINT: &str = "print";

/// Evaluation state for one match.
pub(crate) struct ActionContext<'r, 't, W> {
    file: &'r SourceFile,
    bindings: &'r Bindings<'t>,
    out: &'r mut W,
}

impl<'r, 't, W: Write> ActionContext<'r, 't, W> {
    pub(crate) const fn new(
        file: &'r SourceFile,
        bindings: &'r Bindings<'t>,
        out: &'r mut W,
    ) -> Self {
        Self {
            file,
            bindings,
            out,
        }
    }

    /// Runs every statement of `action` in order.
    pub(crate) fn run(&mut self, action: &Action) -> Result<(), EvalError> {
        for stmt in &action.stmts {
            match stmt {
                Stmt::Call(call) => self.call(call)?,
            }
        }
        Ok(())
    }

    fn call(&mut self, call: &Call) -> Result<(), EvalError> {
        match call.name.name.as_str() {
            PRINT => self.print(call),
            other => Err(EvalError::UnknownFunction {
                name: other.to_owned(),
                position: self.file.position(call.name.pos),
            }),
        }
    }

    fn print(&mut self, call: &Call) -> Result<(), EvalError> {
        let [arg] = call.args.as_slice() else {
            return Err(EvalError::Arity {
                function: PRINT.to_owned(),
                expected: 1,
                actual: call.args.len(),
                position: self.file.position(call.name.pos),
            });
        };
        let value = self.eval(arg)?;
        write_value(&mut *self.out, &value)
    }

    /// Evaluates `expr` against the current bindings.
    pub(crate) fn eval(&self, expr: &Expr) -> Result<Value<'t>, EvalError> {
        match expr {
            Expr::Ident(ident) => {
                self.bindings
                    .get(&ident.name)
                    .cloned()
                    .ok_or_else(|| EvalError::UnknownVariable {
                        name: ident.name.clone(),
                        position: self.file.position(ident.pos),
                    })
            }
            Expr::Int(int) => Ok(Value::Int(int.value)),
            Expr::String(string) => Ok(Value::String(string.value().into_owned())),
            Expr::Dict(dict) => self.eval_dict(dict).map(Value::Dict),
            Expr::Bad(bad) => Err(EvalError::MalformedExpression {
                position: self.file.position(bad.span.start),
            }),
        }
    }

    /// A bare identifier key is looked up as a variable and falls back to
    /// its own name when unbound.
    fn eval_dict(&self, dict: &Dict) -> Result<DictValue<'t>, EvalError> {
        let mut result = DictValue::new();
        for entry in &dict.entries {
            let key = match &entry.key {
                Expr::Ident(ident) => self
                    .bindings
                    .get(&ident.name)
                    .cloned()
                    .unwrap_or_else(|| Value::String(ident.name.clone())),
                other => self.eval(other)?,
            };
            if matches!(key, Value::Dict(_)) {
                return Err(EvalError::UnsupportedKey {
                    kind: key.type_name(),
                    position: self.file.position(expr_start(&entry.key)),
                });
            }
            let value = self.eval(&entry.value)?;
            result.insert(key, value);
        }
        Ok(result)
    }
}

fn expr_start(expr: &Expr) -> usize {
    match expr {
        Expr::Ident(ident) => ident.pos,
        Expr::Int(int) => int.pos,
        Expr::String(string) => string.pos,
        Expr::Dict(dict) => dict.lbrace,
        Expr::Bad(bad) => bad.span.start,
    }
}

/// Prints `value` on its own line: strings and integers as themselves,
/// nodes as their exact source bytes and dicts as one-line JSON.
pub(crate) fn write_value<W: Write>(out: &mut W, value: &Value<'_>) -> Result<(), EvalError> {
    match value {
        Value::Int(int) => writeln!(out, "{int}")?,
        Value::String(string) => writeln!(out, "{string}")?,
        Value::Node(node) => {
            out.write_all(node.bytes())?;
            out.write_all(b"\n")?;
        }
        Value::Dict(dict) => {
            serde_json::to_writer(&mut *out, dict)?;
            out.write_all(b"\n")?;
        }
    }
    Ok(())
}
