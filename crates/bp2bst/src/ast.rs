//! Typed AST for Android Blueprint (`Android.bp`) files.

use crate::tokens::Span;
use serde::Serialize;

/// A Blueprint expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expression {
    String(String),
    Bool(bool),
    Int(i64),
    List(Vec<Expression>),
    Map(Vec<Property>),
    VariableRef(String),
    Operator {
        left: Box<Expression>,
        op: String,
        right: Box<Expression>,
    },
    Select {
        func_name: String,
        func_args: Vec<String>,
        cases: Vec<(Vec<Expression>, Expression)>,
    },
}

impl Expression {
    /// The sentinel produced for the `unset` keyword (see §4.2 of the spec).
    pub const UNSET: &'static str = "__unset__";

    pub fn unset() -> Self {
        Expression::String(Self::UNSET.to_string())
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Expression::String(s) if s == Self::UNSET)
    }
}

/// A single `name: value` entry inside a module or map body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub name: String,
    pub value: Expression,
}

impl Property {
    pub fn new(name: impl Into<String>, value: Expression) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// The assignment operator used by a top-level variable binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Assigner {
    Set,
    Append,
}

/// A top-level `name = expr` or `name += expr` binding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub name: String,
    pub value: Expression,
    pub assigner: Assigner,
    #[serde(skip)]
    pub span: Span,
}

/// A Blueprint module: `type { ...properties... }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Module {
    #[serde(rename = "type")]
    pub module_type: String,
    pub properties: Vec<Property>,
    #[serde(skip)]
    pub span: Span,
}

impl Module {
    pub fn new(module_type: impl Into<String>, properties: Vec<Property>) -> Self {
        Self {
            module_type: module_type.into(),
            properties,
            span: Span::dummy(),
        }
    }

    /// A module's name is the value of its `"name"` property when that value
    /// is a string; modules without a string-valued `name` are unnamed.
    pub fn name(&self) -> Option<&str> {
        self.properties.iter().find_map(|p| {
            if p.name == "name" {
                match &p.value {
                    Expression::String(s) => Some(s.as_str()),
                    _ => None,
                }
            } else {
                None
            }
        })
    }

    pub fn property(&self, name: &str) -> Option<&Expression> {
        self.properties.iter().find(|p| p.name == name).map(|p| &p.value)
    }
}

/// A single top-level definition: either an assignment or a module.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Def {
    Assignment(Assignment),
    Module(Module),
}

/// A parsed Blueprint file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct File {
    pub name: String,
    pub defs: Vec<Def>,
}

impl File {
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.defs.iter().filter_map(|d| match d {
            Def::Module(m) => Some(m),
            _ => None,
        })
    }
}
