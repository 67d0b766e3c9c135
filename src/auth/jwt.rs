use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Role;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    /// Employee record paired with the user.
    pub eid: Uuid,
    pub role: Role,
    /// Holds the registration capability.
    pub reg: bool,
    pub exp: i64,
}

impl Claims {
    pub fn new(
        user_id: Uuid,
        employee_id: Uuid,
        role: Role,
        can_register: bool,
        ttl_minutes: i64,
    ) -> Self {
        Self {
            sub: user_id,
            eid: employee_id,
            role,
            reg: can_register,
            exp: (Utc::now() + Duration::minutes(ttl_minutes)).timestamp(),
        }
    }
}

pub fn encode_token(claims: &Claims, secret: &str) -> Result<String, String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| format!("JWT encode failed: {e}"))
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| format!("JWT decode failed: {e}"))
}
