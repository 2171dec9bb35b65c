use std::fmt;

use num_bigint::BigInt;
use rust_decimal::Decimal;

use crate::interpreter::types::{Function, Type, Variable};

/// Represents a literal value in the language.
///
/// `Literal` covers the constant values that can appear directly in source
/// code. Character and string literals are stored with their escape sequences
/// already decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// `NIL`
    Nil,
    /// `TRUE` or `FALSE`.
    Boolean(bool),
    /// An integer literal such as `42` or `-7`.
    Integer(BigInt),
    /// A decimal literal such as `3.14`.
    Decimal(Decimal),
    /// A character literal such as `'a'` or `'\n'`.
    Character(char),
    /// A string literal such as `"hello"`.
    String(String),
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Integer(value.into())
    }
}

impl From<Decimal> for Literal {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<char> for Literal {
    fn from(value: char) -> Self {
        Self::Character(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// The root of a parsed program.
///
/// A program is a list of global fields followed by a list of methods, in
/// source order. Exactly one `Source` exists per program.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Source {
    /// Global variables declared with `LET`.
    pub fields:  Vec<Field>,
    /// Methods declared with `DEF`.
    pub methods: Vec<Method>,
}

/// A global variable: `LET name (: Type)? (= value)?`.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Name of the variable.
    pub name:      String,
    /// The declared type, if written.
    pub type_name: Option<String>,
    /// The initializer, if written.
    pub value:     Option<Expr>,
    /// Binding resolved by the analyzer.
    pub variable:  Option<Variable>,
    /// Offset of the field's name.
    pub offset:    usize,
}

/// A method parameter, optionally typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Name of the parameter.
    pub name:      String,
    /// The declared type, if written. Untyped parameters are `Any`.
    pub type_name: Option<String>,
}

/// A method definition:
/// `DEF name(params) (: Type)? DO statements END`.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    /// Name of the method.
    pub name:             String,
    /// The parameters, in declaration order.
    pub parameters:       Vec<Parameter>,
    /// The declared return type, if written. Methods without one return `Nil`.
    pub return_type_name: Option<String>,
    /// The body.
    pub body:             Vec<Stmt>,
    /// Signature resolved by the analyzer.
    pub function:         Option<Function>,
    /// Offset of the method's name.
    pub offset:           usize,
}

/// A statement together with the offset of its first token.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    /// What the statement does.
    pub kind:   StmtKind,
    /// Offset of the statement's first token.
    pub offset: usize,
}

impl Stmt {
    /// Wraps a statement kind with its offset.
    #[must_use]
    pub const fn new(kind: StmtKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

/// The statement forms of the language.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// An expression evaluated for its side effects: `expr;`.
    Expression(Expr),
    /// A local variable: `LET name (: Type)? (= value)?`.
    Declaration {
        /// Name of the variable.
        name:      String,
        /// The declared type, if written.
        type_name: Option<String>,
        /// The initializer, if written.
        value:     Option<Expr>,
        /// Binding resolved by the analyzer.
        variable:  Option<Variable>,
    },
    /// `receiver = value;`
    Assignment {
        /// The assigned expression; must be an access.
        receiver: Expr,
        /// The new value.
        value:    Expr,
    },
    /// `IF condition DO then (ELSE otherwise)? END`.
    If {
        /// Must evaluate to a boolean.
        condition: Expr,
        /// Runs when the condition holds.
        then_body: Vec<Stmt>,
        /// Runs otherwise. Possibly empty.
        else_body: Vec<Stmt>,
    },
    /// `FOR name IN iterable DO body END`.
    For {
        /// The loop variable, bound once per element.
        name:     String,
        /// Must evaluate to an integer iterable.
        iterable: Expr,
        /// The loop body.
        body:     Vec<Stmt>,
    },
    /// `WHILE condition DO body END`.
    While {
        /// Re-evaluated before every iteration.
        condition: Expr,
        /// The loop body.
        body:      Vec<Stmt>,
    },
    /// `RETURN value;`
    Return(Expr),
}

/// An expression together with its offset and the static type assigned to it
/// by the analyzer.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// What the expression computes.
    pub kind:   ExprKind,
    /// Offset of the expression's first token.
    pub offset: usize,
    /// Static type, filled in by the analyzer.
    pub ty:     Option<Type>,
}

impl Expr {
    /// Creates an unannotated expression.
    #[must_use]
    pub const fn new(kind: ExprKind, offset: usize) -> Self {
        Self { kind,
               offset,
               ty: None }
    }
}

/// The expression forms of the language.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// A constant.
    Literal(Literal),
    /// A parenthesized expression.
    Group(Box<Expr>),
    /// A binary operation.
    Binary {
        /// The operator.
        op:    BinaryOperator,
        /// Left operand.
        left:  Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
    },
    /// A variable or field read: `name` or `receiver.name`.
    Access {
        /// The object whose field is read, if any.
        receiver: Option<Box<Expr>>,
        /// The variable or field name.
        name:     String,
        /// Binding resolved by the analyzer.
        variable: Option<Variable>,
    },
    /// A call: `name(args)` or `receiver.name(args)`.
    Function {
        /// The object whose method is called, if any.
        receiver:  Option<Box<Expr>>,
        /// The function or method name.
        name:      String,
        /// The arguments, in order.
        arguments: Vec<Expr>,
        /// Signature resolved by the analyzer.
        function:  Option<Function>,
    },
}

/// Represents a binary operator.
///
/// Binary operators include logic, comparisons and arithmetic.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Logical and (`AND`)
    And,
    /// Logical or (`OR`)
    Or,
    /// Less than (`<`)
    Less,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than (`>`)
    Greater,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
    /// Addition or concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
}

impl BinaryOperator {
    /// Maps the text of a token to its operator, if it is one.
    ///
    /// # Example
    /// ```
    /// use plc::ast::BinaryOperator;
    ///
    /// assert_eq!(BinaryOperator::from_symbol("<="), Some(BinaryOperator::LessEqual));
    /// assert_eq!(BinaryOperator::from_symbol("AND"), Some(BinaryOperator::And));
    /// assert_eq!(BinaryOperator::from_symbol("and"), None);
    /// ```
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "AND" => Self::And,
            "OR" => Self::Or,
            "<" => Self::Less,
            "<=" => Self::LessEqual,
            ">" => Self::Greater,
            ">=" => Self::GreaterEqual,
            "==" => Self::Equal,
            "!=" => Self::NotEqual,
            "+" => Self::Add,
            "-" => Self::Sub,
            "*" => Self::Mul,
            "/" => Self::Div,
            _ => return None,
        };
        Some(op)
    }

    /// The source spelling of the operator.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }

    /// `AND` and `OR`.
    #[must_use]
    pub const fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    /// The relational and equality operators.
    #[must_use]
    pub const fn is_comparison(self) -> bool {
        matches!(self,
                 Self::Less
                 | Self::LessEqual
                 | Self::Greater
                 | Self::GreaterEqual
                 | Self::Equal
                 | Self::NotEqual)
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
