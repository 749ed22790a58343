pub mod valuation_calculator;
pub mod valuation_model;

pub use valuation_calculator::*;
pub use valuation_model::*;

#[cfg(test)]
mod valuation_calculator_tests;
