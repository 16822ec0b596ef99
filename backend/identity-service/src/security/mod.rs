pub mod password;
pub mod token;

pub use token::{generate_jti, Claims, TokenCodec, TokenError, TokenKind};
