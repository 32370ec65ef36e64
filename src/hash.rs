use sha2::{Digest, Sha256};

/// Hex digits of the URL digest kept in cache names.
const CACHE_DIGEST_HEX_LEN: usize = 16;

/// SHA-256 hex digest of `value`.
pub fn sha256_hex(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hex::encode(hasher.finalize())
}

/// Filesystem-safe cache name for a remote URL: readable tail plus a digest of the full URL.
///
/// The digest uses a fixed algorithm so cache entries survive toolchain upgrades.
pub fn url_cache_name(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let tail = without_query
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();
    let mut readable: String = tail
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_') {
                ch
            } else {
                '_'
            }
        })
        .collect();
    if readable.is_empty() {
        readable.push_str("download");
    }
    let digest = sha256_hex(url);
    format!("{readable}-{}", &digest[..CACHE_DIGEST_HEX_LEN])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_matches_known_vector() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn cache_names_are_pinned_and_distinct() {
        let a = url_cache_name("https://example.org/packs/ASLCitizen.zip");
        assert_eq!(a, "ASLCitizen.zip-83d38ac87e2cbf14");
        let b = url_cache_name("https://example.org/other/ASLCitizen.zip");
        assert_ne!(a, b);
    }

    #[test]
    fn cache_names_drop_query_and_unsafe_characters() {
        let name = url_cache_name("https://drive.google.com/uc?id=abc&export=download");
        assert!(name.starts_with("uc-"), "{name}");
        let odd = url_cache_name("https://example.org/a%20b/");
        assert!(odd.starts_with("a_20b-"), "{odd}");
    }
}
