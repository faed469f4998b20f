//! # Argument Validation
//!
//! Pure checks applied to request arguments before any ledger access.
//! Every check reports the 1-based position of the offending argument.

use crate::domain::entities::ContractTerms;
use crate::errors::RegistryError;

/// Require exactly `expected` arguments.
pub fn expect_arity<S: AsRef<str>>(args: &[S], expected: usize) -> Result<(), RegistryError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(RegistryError::Arity {
            expected,
            actual: args.len(),
        })
    }
}

/// Require a non-empty argument.
pub fn require_non_empty(value: &str, position: usize) -> Result<&str, RegistryError> {
    if value.is_empty() {
        Err(RegistryError::EmptyArgument { position })
    } else {
        Ok(value)
    }
}

/// Parse a base-10 signed integer, with an optional leading sign.
pub fn parse_integer(value: &str, position: usize) -> Result<i64, RegistryError> {
    value.parse::<i64>().map_err(|_| RegistryError::NotNumeric {
        position,
        value: value.to_string(),
    })
}

/// Validate `[product_type, max_temperature_f]` into contract terms.
///
/// Checks run in a fixed order: arity, empty product type, empty temperature,
/// numeric temperature.
pub fn contract_terms_from_args<S: AsRef<str>>(args: &[S]) -> Result<ContractTerms, RegistryError> {
    expect_arity(args, 2)?;
    let product_type = require_non_empty(args[0].as_ref(), 1)?;
    let temperature = require_non_empty(args[1].as_ref(), 2)?;
    let max_temperature_f = parse_integer(temperature, 2)?;
    Ok(ContractTerms::new(product_type, max_temperature_f))
}

/// Validate `[initial_holding]`.
pub fn initial_holding_from_args<S: AsRef<str>>(args: &[S]) -> Result<i64, RegistryError> {
    expect_arity(args, 1)?;
    parse_integer(args[0].as_ref(), 1)
}

/// Validate `[key]`.
pub fn single_key_from_args<S: AsRef<str>>(args: &[S]) -> Result<&str, RegistryError> {
    expect_arity(args, 1)?;
    Ok(args[0].as_ref())
}
