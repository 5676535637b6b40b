//! 주문 파라미터 검증.

use crate::error::ValidationError;

/// 허용되는 주문 방향.
pub const ORDER_SIDES: [&str; 2] = ["buy", "sell"];

/// 허용되는 주문 유형.
pub const ORDER_TYPES: [&str; 4] = ["market", "limit", "stop", "stop_limit"];

/// 기본 최소 수량.
pub const DEFAULT_MIN_QUANTITY: i64 = 1;

/// 기본 최소 가격.
pub const DEFAULT_MIN_PRICE: f64 = 0.01;

/// 주문 방향(buy/sell)을 검증합니다.
pub fn validate_order_side(side: &str) -> Result<String, ValidationError> {
    let side = side.trim().to_lowercase();

    if side.is_empty() {
        return Err(ValidationError::Order("order side must not be empty".into()));
    }
    if !ORDER_SIDES.contains(&side.as_str()) {
        return Err(ValidationError::Order(format!(
            "order side '{}' must be 'buy' or 'sell'",
            side
        )));
    }

    Ok(side)
}

/// 주문 수량을 검증합니다.
pub fn validate_quantity(qty: i64, min_qty: i64) -> Result<i64, ValidationError> {
    if qty < min_qty {
        return Err(ValidationError::Order(format!(
            "quantity must be >= {}, got {}",
            min_qty, qty
        )));
    }

    Ok(qty)
}

/// 주문 가격을 검증하고 소수점 둘째 자리로 반올림합니다.
pub fn validate_price(price: f64, min_price: f64) -> Result<f64, ValidationError> {
    if !price.is_finite() {
        return Err(ValidationError::Order(format!(
            "price must be numeric, got {}",
            price
        )));
    }
    if price < min_price {
        return Err(ValidationError::Order(format!(
            "price must be >= {}, got {}",
            min_price, price
        )));
    }

    round_cents(price)
}

/// 소수점 둘째 자리로 반올림합니다.
///
/// 이진 값의 정확한 십진 전개를 기준으로 반올림하며, 정확한 중간값은 짝수 쪽으로
/// 보냅니다 (`2.675` → `2.67`, `0.125` → `0.12`).
fn round_cents(price: f64) -> Result<f64, ValidationError> {
    format!("{:.2}", price)
        .parse()
        .map_err(|e| ValidationError::Order(format!("price {} cannot be rounded: {}", price, e)))
}

/// 주문 유형을 검증합니다.
pub fn validate_order_type(order_type: &str) -> Result<String, ValidationError> {
    let order_type = order_type.trim().to_lowercase();

    if order_type.is_empty() {
        return Err(ValidationError::Order("order type must not be empty".into()));
    }
    if !ORDER_TYPES.contains(&order_type.as_str()) {
        return Err(ValidationError::Order(format!(
            "order type '{}' must be one of: {}",
            order_type,
            ORDER_TYPES.join(", ")
        )));
    }

    Ok(order_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationKind;

    #[test]
    fn test_order_side() {
        assert_eq!(validate_order_side("BUY").unwrap(), "buy");
        assert_eq!(validate_order_side(" sell ").unwrap(), "sell");
        assert_eq!(
            validate_order_side("hold").unwrap_err().kind(),
            ValidationKind::Order
        );
        assert!(validate_order_side("").is_err());
    }

    #[test]
    fn test_quantity() {
        assert_eq!(validate_quantity(100, DEFAULT_MIN_QUANTITY).unwrap(), 100);
        assert!(validate_quantity(0, DEFAULT_MIN_QUANTITY).is_err());
        assert!(validate_quantity(-5, DEFAULT_MIN_QUANTITY).is_err());
        assert_eq!(validate_quantity(10, 10).unwrap(), 10);
    }

    #[test]
    fn test_price_rounding_is_idempotent() {
        let once = validate_price(150.503, DEFAULT_MIN_PRICE).unwrap();
        assert_eq!(once, 150.5);
        assert_eq!(validate_price(once, DEFAULT_MIN_PRICE).unwrap(), once);
    }

    #[test]
    fn test_price_rounds_exact_decimal_value() {
        // 2.675는 이진수로 2.67499...이므로 내림
        assert_eq!(validate_price(2.675, DEFAULT_MIN_PRICE).unwrap(), 2.67);
        // 0.125는 정확한 중간값이므로 짝수 쪽
        assert_eq!(validate_price(0.125, DEFAULT_MIN_PRICE).unwrap(), 0.12);
        assert_eq!(validate_price(0.135, DEFAULT_MIN_PRICE).unwrap(), 0.14);
        assert_eq!(validate_price(99.999, DEFAULT_MIN_PRICE).unwrap(), 100.0);
    }

    #[test]
    fn test_price_rejects_invalid() {
        assert!(validate_price(0.0, DEFAULT_MIN_PRICE).is_err());
        assert!(validate_price(0.001, DEFAULT_MIN_PRICE).is_err());
        assert!(validate_price(f64::NAN, DEFAULT_MIN_PRICE).is_err());
        assert!(validate_price(f64::INFINITY, DEFAULT_MIN_PRICE).is_err());
    }

    #[test]
    fn test_order_type() {
        assert_eq!(validate_order_type("MARKET").unwrap(), "market");
        assert_eq!(validate_order_type("stop_limit").unwrap(), "stop_limit");
        assert!(validate_order_type("trailing").is_err());
    }
}
