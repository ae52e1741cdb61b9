//! Request signing for the marketplace and its queue sub-service
//!
//! The two endpoints use different signature versions. The marketplace signs
//! `service || operation || timestamp` with HMAC-SHA1 (signature version 1);
//! the queue endpoint signs a canonicalized query string with HMAC-SHA256
//! (signature version 2). Both are pure functions over their inputs with no
//! error conditions.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::Sha256;

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

/// Sign a marketplace request (signature version 1).
///
/// The payload is the byte-exact concatenation of service name, operation
/// name, and RFC 3339 timestamp, with no delimiter. The signature must be
/// computed over the same timestamp that is transmitted in the request.
pub fn sign(secret_key: &str, service: &str, operation: &str, timestamp: &str) -> String {
    let mut mac =
        HmacSha1::new_from_slice(secret_key.as_bytes()).expect("HMAC accepts any key length");
    mac.update(service.as_bytes());
    mac.update(operation.as_bytes());
    mac.update(timestamp.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// Sign a queue request (signature version 2).
///
/// Canonicalizes the parameter set, prepends `method\nhost\npath\n`, and
/// signs with HMAC-SHA256. The `Signature` parameter itself must not be in
/// `params` when this is called.
pub fn sign_request(
    secret_key: &str,
    method: &str,
    host: &str,
    path: &str,
    params: &[(String, String)],
) -> String {
    let payload = format!(
        "{}\n{}\n{}\n{}",
        method,
        host,
        path,
        canonical_query(params)
    );
    let mut mac =
        HmacSha256::new_from_slice(secret_key.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// Percent-encode each pair, sort by encoded key, join `k=v` with `&`.
///
/// Lexicographic order over the encoded keys, not insertion order; the
/// service recomputes the same canonical form on its side.
pub fn canonical_query(params: &[(String, String)]) -> String {
    let mut encoded: Vec<String> = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect();
    encoded.sort();
    encoded.join("&")
}
