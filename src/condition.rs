//! Comparison expressions: an operator and an operand, applied to a column.
//!
//! Expressions are written the way they appear in a predicates file, for
//! example `"> 300"`, `"<= 1"` or `"== 'PBE'"`. A bare identifier operand
//! refers to another column of the same row (`"> pressure"`). The grammar
//! lives in `condition.pest`.
use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;

use std::fmt;
use std::str::FromStr;

use crate::error::{PinpointError, Result};
use crate::value::Value;

#[derive(Parser)]
#[grammar = "condition.pest"]
struct ConditionParser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Operator {
    pub const ALL: [Operator; 6] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Lt,
        Operator::Le,
        Operator::Gt,
        Operator::Ge,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
        }
    }

    /// Ordering operators need both sides to be comparable kinds.
    pub fn is_ordering(&self) -> bool {
        !matches!(self, Operator::Eq | Operator::Ne)
    }
}

impl FromStr for Operator {
    type Err = PinpointError;
    fn from_str(s: &str) -> Result<Self> {
        let symbol = s.trim();
        Operator::ALL
            .into_iter()
            .find(|op| op.symbol() == symbol)
            .ok_or_else(|| PinpointError::Condition {
                expression: s.to_string(),
                message: "expected one of ==, !=, <, <=, >, >=".to_string(),
            })
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Literal(Value),
    Column(String),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operand::Literal(Value::Text(s)) => write!(f, "'{}'", s),
            Operand::Literal(v) => write!(f, "{}", v),
            Operand::Column(c) => write!(f, "{}", c),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    operator: Operator,
    operand: Operand,
}

impl Comparison {
    pub fn new(operator: Operator, operand: Operand) -> Self {
        Self { operator, operand }
    }
    pub fn literal(operator: Operator, value: impl Into<Value>) -> Self {
        Self::new(operator, Operand::Literal(value.into()))
    }
    pub fn operator(&self) -> Operator {
        self.operator
    }
    pub fn operand(&self) -> &Operand {
        &self.operand
    }

    /// Parses an expression such as `"> 300"`.
    pub fn parse(expression: &str) -> Result<Self> {
        let invalid = |message: String| PinpointError::Condition {
            expression: expression.to_string(),
            message,
        };
        let comparison = ConditionParser::parse(Rule::comparison, expression)
            .map_err(|e| invalid(e.variant.message().into_owned()))?
            .next()
            .ok_or_else(|| invalid("empty expression".to_string()))?;
        let mut inner = comparison.into_inner();
        let operator = match inner.next() {
            Some(pair) => pair.as_str().parse::<Operator>()?,
            None => return Err(invalid("missing operator".to_string())),
        };
        let operand = match inner.next() {
            Some(pair) => parse_operand(pair).map_err(invalid)?,
            None => return Err(invalid("missing operand".to_string())),
        };
        Ok(Self { operator, operand })
    }

    /// Builds a comparison from a separately given operator and operand, as
    /// typed at the refinement prompt (`pressure,<=,1`).
    pub fn from_parts(operator: &str, operand: &str) -> Result<Self> {
        let operator: Operator = operator.parse()?;
        Self::parse(&format!("{} {}", operator, operand.trim()))
    }
}

fn parse_operand(pair: Pair<Rule>) -> std::result::Result<Operand, String> {
    match pair.as_rule() {
        Rule::number => {
            let text = pair.as_str();
            match text.parse::<i64>() {
                Ok(i) => Ok(Operand::Literal(Value::Int(i))),
                Err(_) => text
                    .parse::<f64>()
                    .map(|x| Operand::Literal(Value::Float(x)))
                    .map_err(|e| format!("invalid number '{}': {}", text, e)),
            }
        }
        Rule::string => {
            let inner = pair.into_inner().next().map(|p| p.as_str()).unwrap_or("");
            Ok(Operand::Literal(Value::Text(inner.to_string())))
        }
        Rule::boolean => Ok(Operand::Literal(Value::Bool(pair.as_str().eq_ignore_ascii_case("true")))),
        Rule::column => Ok(Operand::Column(pair.as_str().to_string())),
        other => Err(format!("unexpected {:?}", other)),
    }
}

impl FromStr for Comparison {
    type Err = PinpointError;
    fn from_str(s: &str) -> Result<Self> {
        Comparison::parse(s)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.operator, self.operand)
    }
}
