//! Hash related utils.

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use hmac::Hmac;
use hmac::Mac;
use sha1::Sha1;

/// Base64 encode
pub fn base64_encode(content: &[u8]) -> String {
    BASE64_STANDARD.encode(content)
}

/// HMAC with SHA1 hash.
pub fn hmac_sha1(key: &[u8], content: &[u8]) -> Vec<u8> {
    // SAFETY: HMAC's new_from_slice always returns Ok - it handles any key length
    let mut h = Hmac::<Sha1>::new_from_slice(key).unwrap();
    h.update(content);

    h.finalize().into_bytes().to_vec()
}

/// Base64 encoded HMAC with SHA1 hash.
///
/// Use this function instead of `base64_encode(&hmac_sha1(key, content))` can
/// reduce extra copy.
pub fn base64_hmac_sha1(key: &[u8], content: &[u8]) -> String {
    // SAFETY: HMAC's new_from_slice always returns Ok - it handles any key length
    let mut h = Hmac::<Sha1>::new_from_slice(key).unwrap();
    h.update(content);

    base64_encode(&h.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_base64_hmac_sha1() {
        // RFC 2202 style vector, checked against openssl:
        // echo -n "The quick brown fox jumps over the lazy dog" \
        //   | openssl dgst -sha1 -hmac "key" -binary | base64
        assert_eq!(
            base64_hmac_sha1(
                b"key",
                b"The quick brown fox jumps over the lazy dog"
            ),
            "3nybhbi3iqa8ino29wqQcBydtNk="
        );
    }

    #[test]
    fn test_hmac_sha1_deterministic() {
        let a = hmac_sha1(b"secret", b"payload");
        let b = hmac_sha1(b"secret", b"payload");
        assert_eq!(a, b);

        // Any single byte change in key or content changes the signature.
        assert_ne!(hmac_sha1(b"secret", b"payload"), hmac_sha1(b"secret", b"payloae"));
        assert_ne!(hmac_sha1(b"secret", b"payload"), hmac_sha1(b"secres", b"payload"));
    }
}
