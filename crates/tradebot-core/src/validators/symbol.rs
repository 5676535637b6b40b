//! 주식 심볼 검증.

use std::collections::HashSet;

use crate::error::ValidationError;

/// 심볼 최대 길이.
pub const MAX_SYMBOL_LEN: usize = 5;

/// 주식 심볼을 검증합니다.
///
/// 앞뒤 공백을 제거하고 대문자로 변환한 뒤, 1~5자의 영문자인지 확인합니다.
pub fn validate_symbol(symbol: &str) -> Result<String, ValidationError> {
    let symbol = symbol.trim().to_uppercase();

    if symbol.is_empty() {
        return Err(ValidationError::Symbol("symbol must not be empty".into()));
    }

    let valid = symbol.len() <= MAX_SYMBOL_LEN && symbol.chars().all(|c| c.is_ascii_uppercase());
    if !valid {
        return Err(ValidationError::Symbol(format!(
            "'{}' must contain only letters (1-{} characters)",
            symbol, MAX_SYMBOL_LEN
        )));
    }

    Ok(symbol)
}

/// 심볼 목록을 검증합니다.
///
/// 각 심볼을 [`validate_symbol`]로 검증하고, 처음 등장한 순서를 유지하며
/// 중복을 제거합니다.
pub fn validate_symbols_list<S: AsRef<str>>(symbols: &[S]) -> Result<Vec<String>, ValidationError> {
    if symbols.is_empty() {
        return Err(ValidationError::Symbol(
            "symbol list must not be empty".into(),
        ));
    }

    let mut seen = HashSet::with_capacity(symbols.len());
    let mut validated = Vec::with_capacity(symbols.len());

    for symbol in symbols {
        let symbol = validate_symbol(symbol.as_ref())?;
        if seen.insert(symbol.clone()) {
            validated.push(symbol);
        }
    }

    Ok(validated)
}
