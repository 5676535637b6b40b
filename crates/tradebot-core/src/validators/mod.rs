//! 재사용 가능한 값 검증기.
//!
//! 모든 검증기는 순수 함수입니다: 같은 입력에 대해 항상 같은 결과를 반환하며
//! 부수 효과가 없습니다. 성공 시 정규화된 값을, 실패 시 분류된
//! [`ValidationError`](crate::error::ValidationError)를 반환합니다.
//!
//! ```
//! use tradebot_core::validators::{validate_symbol, validate_quantity};
//!
//! assert_eq!(validate_symbol("aapl").unwrap(), "AAPL");
//! assert_eq!(validate_quantity(100, 1).unwrap(), 100);
//! ```

mod credentials;
mod date;
mod order;
mod range;
mod symbol;

pub use credentials::*;
pub use date::*;
pub use order::*;
pub use range::*;
pub use symbol::*;
