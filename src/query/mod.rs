pub mod ast;
pub mod errors;
pub mod evaluator;
pub mod lexer;
pub mod parser;


pub use ast::{Operator, Predicate, QueryNode};
pub use errors::ParseError;
pub use evaluator::{QueryEvaluator, evaluate_query};
pub use parser::parse_query;
