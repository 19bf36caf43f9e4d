//! Signed Session Tokens
//!
//! The cookie carries `session_id.signature` where the signature is
//! HMAC-SHA256 over the session ID string, URL-safe base64 encoded.
//! The token proves the cookie was issued by this server; the session
//! itself lives server-side.

use uuid::Uuid;

use crate::error::{GateError, GateResult};

/// Mint a signed token for a session ID
pub fn mint_session_token(session_id: Uuid, secret: &[u8; 32]) -> String {
    let session_id = session_id.to_string();
    let signature = platform::crypto::hmac_sha256(secret, session_id.as_bytes());

    format!(
        "{}.{}",
        session_id,
        platform::crypto::to_base64_url(&signature)
    )
}

/// Parse and verify a signed session token
pub fn parse_session_token(token: &str, secret: &[u8; 32]) -> GateResult<Uuid> {
    let (session_id_str, signature_b64) = token
        .split_once('.')
        .ok_or(GateError::SessionInvalid)?;

    let signature = platform::crypto::from_base64_url(signature_b64)
        .map_err(|_| GateError::SessionInvalid)?;

    if !platform::crypto::verify_hmac_sha256(secret, session_id_str.as_bytes(), &signature) {
        return Err(GateError::SessionInvalid);
    }

    session_id_str
        .parse()
        .map_err(|_| GateError::SessionInvalid)
}
