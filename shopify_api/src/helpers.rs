use crate::ShopifyApiError;

/// Shopify expresses money amounts as decimal strings, e.g. "12.50".
pub fn parse_money(amount: &str) -> Result<f64, ShopifyApiError> {
    let value = amount
        .trim()
        .parse::<f64>()
        .map_err(|e| ShopifyApiError::InvalidMoneyAmount(format!("{amount}. {e}")))?;
    if !value.is_finite() || value < 0.0 {
        return Err(ShopifyApiError::InvalidMoneyAmount(amount.to_string()));
    }
    Ok(value)
}

#[cfg(test)]
mod test {
    use super::parse_money;

    #[test]
    fn parses_decimal_strings() {
        assert_eq!(parse_money("12.50").unwrap(), 12.5);
        assert_eq!(parse_money("0").unwrap(), 0.0);
        assert_eq!(parse_money(" 29.99 ").unwrap(), 29.99);
        assert_eq!(parse_money("100").unwrap(), 100.0);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_money("").is_err());
        assert!(parse_money("12,50").is_err());
        assert!(parse_money("free").is_err());
        assert!(parse_money("-1.00").is_err());
        assert!(parse_money("NaN").is_err());
        assert!(parse_money("inf").is_err());
    }
}
