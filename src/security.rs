use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Issue a signed session token of the form `username.expiry.signature`.
///
/// The signature is an HMAC-SHA256 over `username|expiry`, so neither the
/// username nor the expiry can be altered without the server-side secret.
pub fn issue_session_token(username: &str, ttl_secs: i64, secret: &str) -> String {
    let expires_at = chrono::Utc::now().timestamp() + ttl_secs;
    let signature = sign(username, expires_at, secret);
    format!("{username}.{expires_at}.{signature}")
}

/// Verify a session token, returning the username when the signature
/// checks out and the token has not expired.
pub fn verify_session_token(token: &str, secret: &str) -> Option<String> {
    let (rest, signature) = token.rsplit_once('.')?;
    let (username, expiry_str) = rest.rsplit_once('.')?;
    let expires_at: i64 = expiry_str.parse().ok()?;

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            tracing::error!("Failed to create HMAC instance");
            return None;
        }
    };
    mac.update(format!("{username}|{expires_at}").as_bytes());

    let sig_bytes = match hex::decode(signature) {
        Ok(bytes) => bytes,
        Err(_) => {
            tracing::warn!("Invalid hex signature in session token");
            return None;
        }
    };

    if mac.verify_slice(&sig_bytes).is_err() {
        tracing::warn!("Session token signature mismatch");
        return None;
    }

    if expires_at < chrono::Utc::now().timestamp() {
        return None;
    }

    Some(username.to_string())
}

fn sign(username: &str, expires_at: i64, secret: &str) -> String {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            tracing::error!("Failed to create HMAC instance");
            return String::new();
        }
    };
    mac.update(format!("{username}|{expires_at}").as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-session-secret";

    #[test]
    fn test_token_round_trip() {
        let token = issue_session_token("admin", 60, SECRET);
        assert_eq!(verify_session_token(&token, SECRET), Some("admin".to_string()));
    }

    #[test]
    fn test_tampered_username_rejected() {
        let token = issue_session_token("admin", 60, SECRET);
        let tampered = token.replacen("admin", "mallory", 1);
        assert_eq!(verify_session_token(&tampered, SECRET), None);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_session_token("admin", 60, SECRET);
        assert_eq!(verify_session_token(&token, "other-secret"), None);
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = issue_session_token("admin", -10, SECRET);
        assert_eq!(verify_session_token(&token, SECRET), None);
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert_eq!(verify_session_token("not-a-token", SECRET), None);
        assert_eq!(verify_session_token("a.b.c", SECRET), None);
        assert_eq!(verify_session_token("", SECRET), None);
    }
}
