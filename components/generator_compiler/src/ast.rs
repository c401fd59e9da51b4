//! Generator body syntax tree
//!
//! Trees are built with Rust constructors; there is no source parser. A
//! suspension (`yield` / `yield*`) may only appear as the right-hand side of
//! a statement, never nested inside a larger expression.

use std::fmt;
use std::rc::Rc;

use core_types::{JsResult, Value};

use crate::function::GeneratorFunction;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+` (numeric addition or string concatenation)
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `===`
    StrictEq,
    /// `!==`
    StrictNe,
}

impl BinaryOp {
    /// Source spelling
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNe => "!==",
        }
    }
}

/// Signature of host functions callable from a generator body
pub type NativeFn = dyn Fn(&[Value]) -> JsResult<Value>;

/// A named host function
#[derive(Clone)]
pub struct HostFunction {
    /// Name used in stack frames
    pub name: Rc<str>,
    func: Rc<NativeFn>,
}

impl HostFunction {
    /// Wrap a closure
    pub fn new(name: &str, func: impl Fn(&[Value]) -> JsResult<Value> + 'static) -> Self {
        HostFunction {
            name: Rc::from(name),
            func: Rc::new(func),
        }
    }

    /// Invoke with evaluated arguments
    pub fn call(&self, args: &[Value]) -> JsResult<Value> {
        (self.func)(args)
    }
}

impl fmt::Debug for HostFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostFunction({})", self.name)
    }
}

/// Expressions (never suspend)
#[derive(Debug, Clone)]
pub enum Expr {
    /// Literal value
    Const(Value),
    /// Local variable or parameter
    Local(String),
    /// Binary operation
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    /// Logical not
    Not(Box<Expr>),
    /// Array literal
    Array(Vec<Expr>),
    /// Host function call
    Call(HostFunction, Vec<Expr>),
    /// Call of another compiled generator; evaluates to a fresh generator
    Spawn(Rc<GeneratorFunction>, Vec<Expr>),
}

impl Expr {
    /// Integer literal
    pub fn int(n: i32) -> Self {
        Expr::Const(Value::Smi(n))
    }

    /// String literal
    pub fn str(s: &str) -> Self {
        Expr::Const(Value::string(s))
    }

    /// `undefined`
    pub fn undefined() -> Self {
        Expr::Const(Value::Undefined)
    }

    /// Variable reference
    pub fn local(name: &str) -> Self {
        Expr::Local(name.to_string())
    }

    /// Binary operation
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    /// `lhs + rhs`
    pub fn add(lhs: Expr, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Add, lhs, rhs)
    }

    /// `lhs < rhs`
    pub fn lt(lhs: Expr, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Lt, lhs, rhs)
    }

    /// `!operand`
    pub fn not(operand: Expr) -> Self {
        Expr::Not(Box::new(operand))
    }

    /// Host call
    pub fn call(func: &HostFunction, args: Vec<Expr>) -> Self {
        Expr::Call(func.clone(), args)
    }

    /// Generator call
    pub fn spawn(func: &Rc<GeneratorFunction>, args: Vec<Expr>) -> Self {
        Expr::Spawn(Rc::clone(func), args)
    }
}

/// Right-hand side of a statement
#[derive(Debug, Clone)]
pub enum Rhs {
    /// Plain expression
    Expr(Expr),
    /// `yield e`; evaluates to the value sent by the next `next(v)`
    Yield(Expr),
    /// `yield* e`; evaluates to the delegated iterator's final value
    Delegate(Expr),
}

impl From<Expr> for Rhs {
    fn from(expr: Expr) -> Self {
        Rhs::Expr(expr)
    }
}

/// `catch (param) { body }`
#[derive(Debug, Clone)]
pub struct CatchClause {
    /// Binding for the caught value
    pub param: Option<String>,
    /// Handler body
    pub body: Vec<Stmt>,
}

/// Statements
#[derive(Debug, Clone)]
pub enum Stmt {
    /// `let name = rhs`
    Let(String, Rhs),
    /// `name = rhs`
    Assign(String, Rhs),
    /// `rhs;`
    Eval(Rhs),
    /// `if (test) { then } else { otherwise }`
    If {
        /// Condition
        test: Expr,
        /// Consequent block
        then: Vec<Stmt>,
        /// Alternate block
        otherwise: Vec<Stmt>,
    },
    /// `while (test) { body }`
    While {
        /// Condition
        test: Expr,
        /// Loop body
        body: Vec<Stmt>,
    },
    /// `try { block } catch (x) { .. } finally { .. }`
    Try {
        /// Protected block
        block: Vec<Stmt>,
        /// Catch clause
        handler: Option<CatchClause>,
        /// Finally block
        finalizer: Option<Vec<Stmt>>,
    },
    /// `return e`
    Return(Option<Expr>),
    /// `throw e`
    Throw(Expr),
}

impl Stmt {
    /// `let name = expr`
    pub fn let_(name: &str, rhs: impl Into<Rhs>) -> Self {
        Stmt::Let(name.to_string(), rhs.into())
    }

    /// `name = expr`
    pub fn assign(name: &str, rhs: impl Into<Rhs>) -> Self {
        Stmt::Assign(name.to_string(), rhs.into())
    }

    /// `yield e;`
    pub fn yield_(value: Expr) -> Self {
        Stmt::Eval(Rhs::Yield(value))
    }

    /// `yield* e;`
    pub fn delegate(source: Expr) -> Self {
        Stmt::Eval(Rhs::Delegate(source))
    }

    /// Expression statement
    pub fn expr(expr: Expr) -> Self {
        Stmt::Eval(Rhs::Expr(expr))
    }

    /// `return e`
    pub fn ret(value: Expr) -> Self {
        Stmt::Return(Some(value))
    }
}

/// `function* name(params) { body }`
#[derive(Debug, Clone)]
pub struct GeneratorDecl {
    /// Function name
    pub name: String,
    /// Parameter names
    pub params: Vec<String>,
    /// Body statements
    pub body: Vec<Stmt>,
}

impl GeneratorDecl {
    /// Declare a generator
    pub fn new(name: &str, params: &[&str], body: Vec<Stmt>) -> Self {
        GeneratorDecl {
            name: name.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
            body,
        }
    }
}
