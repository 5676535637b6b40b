//! API 키 및 URL 검증.

use url::Url;

use crate::error::ValidationError;

/// 기본 API 키 최소 길이.
pub const DEFAULT_API_KEY_MIN_LEN: usize = 10;

/// 예제 설정 파일에 남아 있는 자리표시자 접두어.
pub const PLACEHOLDER_PREFIXES: [&str; 2] = ["tu_", "your_"];

/// 자격증명이 예제 자리표시자인지 확인합니다.
pub fn is_placeholder(value: &str) -> bool {
    PLACEHOLDER_PREFIXES
        .iter()
        .any(|prefix| value.starts_with(prefix))
}

/// API 키를 검증합니다.
///
/// 공백을 제거한 뒤 비어 있거나, `min_len`보다 짧거나, 자리표시자이면 실패합니다.
pub fn validate_api_key(api_key: &str, min_len: usize) -> Result<String, ValidationError> {
    let api_key = api_key.trim();

    if api_key.is_empty() {
        return Err(ValidationError::Config("API key must not be empty".into()));
    }
    if api_key.chars().count() < min_len {
        return Err(ValidationError::Config(format!(
            "API key must be at least {} characters, got {}",
            min_len,
            api_key.chars().count()
        )));
    }
    if is_placeholder(api_key) {
        return Err(ValidationError::Config(
            "API key looks like a placeholder; set your real key".into(),
        ));
    }

    Ok(api_key.to_string())
}

/// URL을 검증합니다.
///
/// 스킴과 호스트가 있어야 하며, `require_https`이면 스킴이 `https`여야 합니다.
pub fn validate_url(url: &str, require_https: bool) -> Result<String, ValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(ValidationError::Config("URL must not be empty".into()));
    }

    let parsed = Url::parse(url)
        .map_err(|e| ValidationError::Config(format!("invalid URL '{}': {}", url, e)))?;

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(ValidationError::Config(format!("URL has no host: {}", url)));
    }
    if require_https && parsed.scheme() != "https" {
        return Err(ValidationError::Config(format!(
            "URL must use HTTPS, got scheme '{}'",
            parsed.scheme()
        )));
    }

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationKind;

    #[test]
    fn test_api_key() {
        assert_eq!(
            validate_api_key("  PK1234567890ABCDEF ", DEFAULT_API_KEY_MIN_LEN).unwrap(),
            "PK1234567890ABCDEF"
        );
        assert!(validate_api_key("", DEFAULT_API_KEY_MIN_LEN).is_err());
        assert!(validate_api_key("PKSHORT", DEFAULT_API_KEY_MIN_LEN).is_err());
    }

    #[test]
    fn test_api_key_placeholders() {
        for key in ["tu_api_key_aqui", "your_api_key_here"] {
            let err = validate_api_key(key, DEFAULT_API_KEY_MIN_LEN).unwrap_err();
            assert_eq!(err.kind(), ValidationKind::Config);
        }
    }

    #[test]
    fn test_url_https_required() {
        assert!(validate_url("http://api.example.com", true).is_err());
        assert_eq!(
            validate_url("https://api.alpaca.markets", true).unwrap(),
            "https://api.alpaca.markets"
        );
        assert_eq!(
            validate_url("http://localhost:8080", false).unwrap(),
            "http://localhost:8080"
        );
    }

    #[test]
    fn test_url_missing_parts() {
        assert!(validate_url("", true).is_err());
        assert!(validate_url("api.alpaca.markets", true).is_err());
        assert!(validate_url("https://", true).is_err());
        assert!(validate_url("mailto:ops@example.com", false).is_err());
    }
}
