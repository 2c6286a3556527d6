use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeOperator {
    And,
    Or,
}

impl CompositeOperator {
    pub fn keyword(self) -> &'static str {
        match self {
            CompositeOperator::And => "and",
            CompositeOperator::Or => "or",
        }
    }
}

impl fmt::Display for CompositeOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// An `and`/`or` group was built without operands. It would render to an
    /// empty `(  )` group, which is not valid SQL.
    EmptyComposite {
        operator: CompositeOperator,
    },
    ExpressionTooDeep {
        depth: usize,
        max: usize,
    },
    InvalidQuery {
        reason: String,
    },
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::EmptyComposite { operator } => {
                write!(f, "'{operator}' expression requires at least one operand")
            }
            QueryError::ExpressionTooDeep { depth, max } => write!(
                f,
                "expression depth {depth} exceeds maximum allowed depth of {max}"
            ),
            QueryError::InvalidQuery { reason } => write!(f, "invalid query: {reason}"),
        }
    }
}

impl std::error::Error for QueryError {}
