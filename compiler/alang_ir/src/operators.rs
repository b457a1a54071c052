//! Arithmetic and comparison operators.

/// Variadic integer arithmetic operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "+" => Some(ArithOp::Add),
            "-" => Some(ArithOp::Sub),
            "*" => Some(ArithOp::Mul),
            "/" => Some(ArithOp::Div),
            _ => None,
        }
    }

    pub fn as_symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        }
    }

    /// Minimum operand count. `-` alone negates; the rest need two.
    pub fn min_operands(self) -> usize {
        match self {
            ArithOp::Sub => 1,
            ArithOp::Add | ArithOp::Mul | ArithOp::Div => 2,
        }
    }
}

/// Integer comparison operator, valid only in condition position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CmpOp {
    Lt,
    Gt,
    Eq,
    Ne,
    Le,
    Ge,
}

impl CmpOp {
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "<" => Some(CmpOp::Lt),
            ">" => Some(CmpOp::Gt),
            "=" => Some(CmpOp::Eq),
            "!=" => Some(CmpOp::Ne),
            "<=" => Some(CmpOp::Le),
            ">=" => Some(CmpOp::Ge),
            _ => None,
        }
    }

    pub fn as_symbol(self) -> &'static str {
        match self {
            CmpOp::Lt => "<",
            CmpOp::Gt => ">",
            CmpOp::Eq => "=",
            CmpOp::Ne => "!=",
            CmpOp::Le => "<=",
            CmpOp::Ge => ">=",
        }
    }

    /// Signed comparison.
    pub fn apply(self, left: i64, right: i64) -> bool {
        match self {
            CmpOp::Lt => left < right,
            CmpOp::Gt => left > right,
            CmpOp::Eq => left == right,
            CmpOp::Ne => left != right,
            CmpOp::Le => left <= right,
            CmpOp::Ge => left >= right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_roundtrip() {
        for op in [ArithOp::Add, ArithOp::Sub, ArithOp::Mul, ArithOp::Div] {
            assert_eq!(ArithOp::from_symbol(op.as_symbol()), Some(op));
        }
        for op in [CmpOp::Lt, CmpOp::Gt, CmpOp::Eq, CmpOp::Ne, CmpOp::Le, CmpOp::Ge] {
            assert_eq!(CmpOp::from_symbol(op.as_symbol()), Some(op));
        }
    }

    #[test]
    fn test_cmp_is_signed() {
        assert!(CmpOp::Lt.apply(-5, 3));
        assert!(CmpOp::Ge.apply(3, 3));
        assert!(!CmpOp::Ne.apply(0, 0));
    }

    #[test]
    fn test_min_operands() {
        assert_eq!(ArithOp::Sub.min_operands(), 1);
        assert_eq!(ArithOp::Div.min_operands(), 2);
    }
}
