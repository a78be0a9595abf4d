use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use wisecamp::models::Id;

/// Signing key for tokens issued by the mock API.
pub const SECRET: &str = "wisecamp-test-secret";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Id of the signed-in user.
    pub sub: Id,
    pub exp: usize,
}

pub fn generate_token(user_id: Id) -> String {
    let exp = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::hours(24))
        .expect("valid timestamp")
        .timestamp() as usize;

    encode(
        &Header::default(),
        &Claims { sub: user_id, exp },
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("token encodes")
}

pub fn verify_token(token: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(SECRET.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| format!("Invalid token: {}", e))
}
