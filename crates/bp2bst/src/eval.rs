//! Variable binding and expression evaluation.

use crate::ast::{Assigner, Def, Expression, File, Module, Property};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    #[error("undefined variable '{name}'")]
    UndefinedVariable { name: String },
}

/// Per-file variable scope. Reset between files; owns no global state.
#[derive(Default)]
pub struct Evaluator {
    variables: HashMap<String, Expression>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every top-level assignment in source order, folding `+=`
    /// into an `Operator` node over the prior binding.
    pub fn register_file(&mut self, file: &File) {
        for def in &file.defs {
            if let Def::Assignment(a) = def {
                match a.assigner {
                    Assigner::Set => {
                        self.variables.insert(a.name.clone(), a.value.clone());
                    }
                    Assigner::Append => {
                        let merged = match self.variables.get(&a.name) {
                            Some(prior) => Expression::Operator {
                                left: Box::new(prior.clone()),
                                op: "+".to_string(),
                                right: Box::new(a.value.clone()),
                            },
                            None => a.value.clone(),
                        };
                        self.variables.insert(a.name.clone(), merged);
                    }
                }
            }
        }
    }

    pub fn evaluate(&self, expr: &Expression) -> Result<Expression, EvalError> {
        match expr {
            Expression::String(_) | Expression::Bool(_) | Expression::Int(_) => Ok(expr.clone()),
            Expression::VariableRef(name) => {
                let bound = self
                    .variables
                    .get(name)
                    .ok_or_else(|| EvalError::UndefinedVariable { name: name.clone() })?;
                self.evaluate(bound)
            }
            Expression::Operator { left, op, right } if op == "+" => {
                let l = self.evaluate(left)?;
                let r = self.evaluate(right)?;
                Ok(fold_plus(l, r))
            }
            Expression::Operator { left, op, right } => {
                let l = self.evaluate(left)?;
                let r = self.evaluate(right)?;
                Ok(Expression::Operator {
                    left: Box::new(l),
                    op: op.clone(),
                    right: Box::new(r),
                })
            }
            Expression::List(items) => {
                let values = items
                    .iter()
                    .map(|i| self.evaluate(i))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Expression::List(values))
            }
            Expression::Map(props) => {
                let evaluated = props
                    .iter()
                    .map(|p| Ok(Property::new(p.name.clone(), self.evaluate(&p.value)?)))
                    .collect::<Result<Vec<_>, EvalError>>()?;
                Ok(Expression::Map(evaluated))
            }
            // Deferred: select expressions are preserved verbatim.
            Expression::Select { .. } => Ok(expr.clone()),
        }
    }

    pub fn evaluate_module(&self, module: &Module) -> Result<Module, EvalError> {
        let properties = module
            .properties
            .iter()
            .map(|p| Ok(Property::new(p.name.clone(), self.evaluate(&p.value)?)))
            .collect::<Result<Vec<_>, EvalError>>()?;
        Ok(Module {
            module_type: module.module_type.clone(),
            properties,
            span: module.span,
        })
    }
}

fn fold_plus(left: Expression, right: Expression) -> Expression {
    match (left, right) {
        (Expression::List(mut a), Expression::List(b)) => {
            a.extend(b);
            Expression::List(a)
        }
        (Expression::String(mut a), Expression::String(b)) => {
            a.push_str(&b);
            Expression::String(a)
        }
        (l, r) => Expression::Operator {
            left: Box::new(l),
            op: "+".to_string(),
            right: Box::new(r),
        },
    }
}

/// Returns the string value of `expr`, or `None` if it is not a plain string.
pub fn as_string(expr: &Expression) -> Option<&str> {
    match expr {
        Expression::String(s) => Some(s.as_str()),
        _ => None,
    }
}

pub fn as_bool(expr: &Expression) -> Option<bool> {
    match expr {
        Expression::Bool(b) => Some(*b),
        _ => None,
    }
}

pub fn as_map(expr: &Expression) -> Option<&[Property]> {
    match expr {
        Expression::Map(props) => Some(props.as_slice()),
        _ => None,
    }
}

/// Returns the element strings of `expr` if it is a `List` whose members are
/// all plain strings; otherwise an empty vector (missing data is absent data,
/// not an error — see §4.3 of the spec).
pub fn as_string_list(expr: &Expression) -> Vec<String> {
    match expr {
        Expression::List(items) => items
            .iter()
            .filter_map(|i| as_string(i).map(|s| s.to_string()))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Assigner;
    use crate::tokens::Span;

    fn assign(name: &str, value: Expression, assigner: Assigner) -> Def {
        Def::Assignment(Assignment {
            name: name.to_string(),
            value,
            assigner,
            span: Span::dummy(),
        })
    }

    use crate::ast::Assignment;

    #[test]
    fn list_concatenation() {
        let mut ev = Evaluator::new();
        let file = File {
            name: "t".into(),
            defs: vec![assign(
                "base",
                Expression::List(vec![Expression::String("-O2".into())]),
                Assigner::Set,
            )],
        };
        ev.register_file(&file);
        let expr = Expression::Operator {
            left: Box::new(Expression::VariableRef("base".into())),
            op: "+".into(),
            right: Box::new(Expression::List(vec![Expression::String("-Wall".into())])),
        };
        let result = ev.evaluate(&expr).unwrap();
        assert_eq!(
            result,
            Expression::List(vec![
                Expression::String("-O2".into()),
                Expression::String("-Wall".into())
            ])
        );
    }

    #[test]
    fn plus_assign_builds_operator_over_prior_binding() {
        let mut ev = Evaluator::new();
        let file = File {
            name: "t".into(),
            defs: vec![
                assign("x", Expression::String("a".into()), Assigner::Set),
                assign("x", Expression::String("b".into()), Assigner::Append),
            ],
        };
        ev.register_file(&file);
        let result = ev.evaluate(&Expression::VariableRef("x".into())).unwrap();
        assert_eq!(result, Expression::String("ab".into()));
    }

    #[test]
    fn undefined_variable_errors() {
        let ev = Evaluator::new();
        let err = ev.evaluate(&Expression::VariableRef("nope".into())).unwrap_err();
        assert_eq!(err, EvalError::UndefinedVariable { name: "nope".into() });
    }

    #[test]
    fn idempotent_on_ground_values() {
        let ev = Evaluator::new();
        let expr = Expression::List(vec![Expression::String("x".into())]);
        let once = ev.evaluate(&expr).unwrap();
        let twice = ev.evaluate(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn select_is_deferred() {
        let ev = Evaluator::new();
        let expr = Expression::Select {
            func_name: "f".into(),
            func_args: vec![],
            cases: vec![],
        };
        assert_eq!(ev.evaluate(&expr).unwrap(), expr);
    }
}
