use std::fmt;

/// Amounts are stored as SQLite REAL, so they travel as `f64`.
pub type Amount = f64;

/// Format an amount with two decimals for display.
/// Example: 42.5 -> "42.50", -3.0 -> "-3.00"
pub fn format_amount(amount: Amount) -> String {
    format!("{:.2}", amount)
}

/// Parse a decimal string into an amount.
/// Accepts an optional sign and any number of decimals; rejects NaN and infinities.
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseAmountError::InvalidFormat);
    }
    // f64::from_str also accepts "inf" and "NaN"; only plain decimals are allowed here.
    if !input
        .chars()
        .all(|c| c.is_ascii_digit() || c == '.' || c == '-' || c == '+')
    {
        return Err(ParseAmountError::InvalidFormat);
    }
    let amount: Amount = input
        .parse()
        .map_err(|_| ParseAmountError::InvalidFormat)?;
    if !amount.is_finite() {
        return Err(ParseAmountError::NotFinite);
    }
    Ok(amount)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    InvalidFormat,
    NotFinite,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::InvalidFormat => write!(f, "invalid amount format"),
            ParseAmountError::NotFinite => write!(f, "amount must be a finite number"),
        }
    }
}

impl std::error::Error for ParseAmountError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(42.5), "42.50");
        assert_eq!(format_amount(15.0), "15.00");
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(-3.0), "-3.00");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("42.50"), Ok(42.5));
        assert_eq!(parse_amount("15"), Ok(15.0));
        assert_eq!(parse_amount(".5"), Ok(0.5));
        assert_eq!(parse_amount("-12.25"), Ok(-12.25));
        assert_eq!(parse_amount(" 7 "), Ok(7.0));
    }

    #[test]
    fn test_parse_amount_invalid() {
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("12.34.56").is_err());
        assert!(parse_amount("").is_err());
        assert!(parse_amount("inf").is_err());
        assert!(parse_amount("NaN").is_err());
    }
}
