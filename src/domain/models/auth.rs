use serde::{Deserialize, Serialize};

/// Claims of the Ed25519 JWT minted by the external identity service. This
/// backend only verifies; it never issues tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub exp: usize,
    pub iat: usize,
    pub role: String, // "customer" | "staff"
    pub csrf_token: String,
}
