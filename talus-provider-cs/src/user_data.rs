//! User-data encoding
//!
//! The control plane expects base64. Operators paste either raw cloud-init
//! scripts or already-encoded blobs; encoding twice would corrupt the
//! latter, so input that already decodes cleanly passes through untouched.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Encode user data for transmission unless it is already valid base64
pub fn encode_user_data(raw: &str) -> String {
    if STANDARD.decode(raw).is_ok() {
        raw.to_string()
    } else {
        STANDARD.encode(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_encoded() {
        let encoded = encode_user_data("#!/bin/bash\necho hello");
        assert_eq!(
            STANDARD.decode(&encoded).unwrap(),
            b"#!/bin/bash\necho hello"
        );
    }

    #[test]
    fn valid_base64_passes_through() {
        let already = STANDARD.encode("#!/bin/bash\necho hello");
        assert_eq!(encode_user_data(&already), already);
    }

    #[test]
    fn encoding_is_idempotent() {
        let once = encode_user_data("not base64!");
        let twice = encode_user_data(&once);
        assert_eq!(once, twice);
    }
}
