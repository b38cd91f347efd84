//! URL-safe slug helpers.
//!
//! Slugs are lowercase ASCII alphanumerics separated by single hyphens.
//! Auto-generated slugs carry a random 3-character token so that sibling
//! categories created from the same name rarely collide; collisions are
//! still possible and surface as uniqueness violations from the store.

use rand::Rng;

const TOKEN_LEN: usize = 3;
const TOKEN_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Marker embedded in every auto-generated slug.
const SLUG_MARKER: &str = "pickBetter";

/// Reduce arbitrary text to a URL-safe slug.
///
/// Lowercases, keeps ASCII alphanumerics, collapses runs of whitespace,
/// underscores and hyphens into a single hyphen, and drops everything else.
///
/// ```
/// use shopkit_catalog::slug::slugify;
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// assert_eq!(slugify("  Gaming__Laptops  "), "gaming-laptops");
/// ```
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_hyphen = true;
        }
        // Anything else is dropped.
    }

    out
}

/// A random 3-character lowercase-alphanumeric token.
pub fn rand_token() -> String {
    let mut rng = rand::thread_rng();
    (0..TOKEN_LEN)
        .map(|_| TOKEN_CHARSET[rng.gen_range(0..TOKEN_CHARSET.len())] as char)
        .collect()
}

/// Generate a slug for a category created without one.
///
/// Concatenates a random token, the fixed marker and the name, then
/// slugifies the whole thing. Non-deterministic by design; the store
/// retries on a uniqueness violation rather than checking up front.
pub fn generate_slug(name: &str) -> String {
    slugify(&format!("{}-{}{}", rand_token(), SLUG_MARKER, name))
}

/// True when every character is legal in a slug.
pub fn is_url_safe(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Electronics"), "electronics");
        assert_eq!(slugify("Home & Garden"), "home-garden");
        assert_eq!(slugify("USB-C Cables"), "usb-c-cables");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("a  -  b"), "a-b");
        assert_eq!(slugify("--edge--"), "edge");
    }

    #[test]
    fn test_slugify_drops_symbols() {
        assert_eq!(slugify("100% Cotton!"), "100-cotton");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn test_rand_token_shape() {
        for _ in 0..50 {
            let t = rand_token();
            assert_eq!(t.len(), TOKEN_LEN);
            assert!(t.bytes().all(|b| TOKEN_CHARSET.contains(&b)));
        }
    }

    #[test]
    fn test_generate_slug_is_url_safe() {
        let s = generate_slug("Gaming Laptops");
        assert!(is_url_safe(&s));
        assert!(s.ends_with("gaming-laptops"));
        assert!(s.contains("pickbetter"));
    }

    #[test]
    fn test_generate_slug_from_hostile_name() {
        let s = generate_slug("  ***  ");
        // The token and marker alone still yield a non-empty slug.
        assert!(is_url_safe(&s));
    }
}
