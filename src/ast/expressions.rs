use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "mod",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationalOperator {
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
}

impl RelationalOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            RelationalOperator::Equal => "=",
            RelationalOperator::NotEqual => "<>",
            RelationalOperator::Less => "<",
            RelationalOperator::Greater => ">",
            RelationalOperator::LessEqual => "<=",
            RelationalOperator::GreaterEqual => ">=",
        }
    }

    pub fn holds(&self, left: i32, right: i32) -> bool {
        match self {
            RelationalOperator::Equal => left == right,
            RelationalOperator::NotEqual => left != right,
            RelationalOperator::Less => left < right,
            RelationalOperator::Greater => left > right,
            RelationalOperator::LessEqual => left <= right,
            RelationalOperator::GreaterEqual => left >= right,
        }
    }

    /// The comparator that holds exactly when `self` does not.
    pub fn negate(&self) -> Self {
        match self {
            RelationalOperator::Equal => RelationalOperator::NotEqual,
            RelationalOperator::NotEqual => RelationalOperator::Equal,
            RelationalOperator::Less => RelationalOperator::GreaterEqual,
            RelationalOperator::GreaterEqual => RelationalOperator::Less,
            RelationalOperator::Greater => RelationalOperator::LessEqual,
            RelationalOperator::LessEqual => RelationalOperator::Greater,
        }
    }
}

/// `left <op> right`; only ever built directly under `IF`/`WHILE` by the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub operator: RelationalOperator,
    pub left: Expression,
    pub right: Expression,
}

impl Condition {
    pub fn new(operator: RelationalOperator, left: Expression, right: Expression) -> Self {
        Self { operator, left, right }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Number(i32),
    Variable(String),
    Binary {
        operator: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// A comparison used as a value: 1 when it holds, 0 otherwise.
    Relational(Box<Condition>),
    /// Procedures return the final value of their own name.
    Call {
        name: String,
        args: Vec<Expression>,
    },
}

impl Expression {
    pub fn binary(operator: BinaryOperator, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Unary minus is `0 - operand`.
    pub fn negation(operand: Expression) -> Self {
        Expression::binary(BinaryOperator::Subtract, Expression::Number(0), operand)
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Expression::Variable(name.into())
    }

    pub fn call(name: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::Call { name: name.into(), args }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.operator.symbol(), self.right)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Number(n) if *n < 0 => write!(f, "(-{})", n.unsigned_abs()),
            Expression::Number(n) => write!(f, "{}", n),
            Expression::Variable(name) => write!(f, "{}", name),
            Expression::Binary { operator, left, right } => {
                write!(f, "({} {} {})", left, operator.symbol(), right)
            }
            Expression::Relational(condition) => write!(f, "[{}]", condition),
            Expression::Call { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}
