//! Defines the `Dialect` trait for database-specific SQL syntax.

use model::core::value::Value;

// Largest DECIMAL MySQL accepts.
const MAX_DECIMAL_PRECISION: i64 = 65;
const MAX_DECIMAL_SCALE: i64 = 30;

pub trait Dialect: Send + Sync {
    /// Wraps an identifier (like a table or column name) in the correct
    /// quotation marks for the dialect, escaping embedded quote characters.
    ///
    /// - MySQL uses backticks: `` `my_column` ``
    fn quote_identifier(&self, ident: &str) -> String;

    /// Returns the placeholder for a parameterized query. `value` is the
    /// parameter bound at `index`, for dialects that must type it.
    ///
    /// - MySQL uses `?`, cast to an exact DECIMAL for decimal values
    fn get_placeholder(&self, index: usize, value: &Value) -> String;
}

#[derive(Debug, Clone, Default)]
pub struct MySql;

impl Dialect for MySql {
    fn quote_identifier(&self, ident: &str) -> String {
        format!("`{}`", ident.replace('`', "``"))
    }

    fn get_placeholder(&self, _index: usize, value: &Value) -> String {
        match value {
            // A bare string parameter is compared to a DECIMAL column as a
            // double, which loses digits past 2^53.
            Value::Decimal(d) => {
                let (precision, scale) = decimal_type(d);
                format!("CAST(? AS DECIMAL({precision},{scale}))")
            }
            _ => "?".into(),
        }
    }
}

/// Smallest `DECIMAL(precision, scale)` holding `d` exactly, within MySQL's
/// limits.
fn decimal_type(d: &bigdecimal::BigDecimal) -> (i64, i64) {
    let (unscaled, exponent) = d.as_bigint_and_exponent();
    let digits = unscaled.to_string().trim_start_matches('-').len() as i64;
    let integer_digits = (digits - exponent).max(1);
    let scale = exponent.clamp(0, MAX_DECIMAL_SCALE);
    let precision = (integer_digits + scale).min(MAX_DECIMAL_PRECISION);
    (precision, scale)
}
