/// Name of the free variable.
pub const VARIABLE_NAME: &str = "x";

/// Name of the only recognized mathematical constant (Euler's number).
pub const EULER_NAME: &str = "e";

/// A parsed single-variable calculation producing an `f64`.
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    // Binary real ops.
    Add(Box<Expression>, Box<Expression>),
    Div(Box<Expression>, Box<Expression>),
    Mul(Box<Expression>, Box<Expression>),
    Pow(Box<Expression>, Box<Expression>),
    Sub(Box<Expression>, Box<Expression>),

    // Unary real ops.
    Neg(Box<Expression>),
    Pos(Box<Expression>),

    // Constant.
    Literal(f64),

    /// Named constant. Only [`EULER_NAME`] has a value of its own; every other
    /// name evaluates to the free variable.
    Constant(String),

    // Input variable.
    Variable,

    /// Function application. Arguments are kept in source order.
    Call(Function, Vec<Expression>),
}

/// Functions callable from an [`Expression`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Function {
    /// `log(a)` is the natural log, `log(a, b)` is the log of `a` in base `b`.
    Log,
    Sin,
    Cos,
    Tan,
    Arcsin,
    Arccos,
    Arctan,
    Abs,
    /// Any other name. Calling it yields the free variable and ignores the
    /// arguments.
    Unknown(String),
}

impl Function {
    pub fn from_name(name: &str) -> Self {
        match name {
            "log" => Self::Log,
            "sin" | "sen" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "arcsin" | "arcsen" => Self::Arcsin,
            "arccos" => Self::Arccos,
            "arctan" => Self::Arctan,
            "mod" | "abs" => Self::Abs,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Log => "log",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Arcsin => "arcsin",
            Self::Arccos => "arccos",
            Self::Arctan => "arctan",
            Self::Abs => "abs",
            Self::Unknown(name) => name,
        }
    }
}

impl Expression {
    /// Identifiers that are neither [`VARIABLE_NAME`] nor [`EULER_NAME`] and
    /// therefore silently stand in for the free variable.
    pub fn variable_aliases(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.visit(&mut |expr| {
            if let Self::Constant(name) = expr {
                if name != EULER_NAME && !names.contains(&name.as_str()) {
                    names.push(name.as_str());
                }
            }
        });
        names
    }

    /// Names of called functions that are not recognized.
    pub fn unknown_functions(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.visit(&mut |expr| {
            if let Self::Call(Function::Unknown(name), _) = expr {
                if !names.contains(&name.as_str()) {
                    names.push(name.as_str());
                }
            }
        });
        names
    }

    /// Pre-order traversal of every node in the tree.
    fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Expression)) {
        f(self);
        match self {
            Self::Add(lhs, rhs)
            | Self::Div(lhs, rhs)
            | Self::Mul(lhs, rhs)
            | Self::Pow(lhs, rhs)
            | Self::Sub(lhs, rhs) => {
                lhs.visit(f);
                rhs.visit(f);
            }
            Self::Neg(only) | Self::Pos(only) => only.visit(f),
            Self::Call(_, args) => {
                for arg in args {
                    arg.visit(f);
                }
            }
            Self::Literal(_) | Self::Constant(_) | Self::Variable => {}
        }
    }
}
