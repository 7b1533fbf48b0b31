pub mod url_validator;

/// 路径段被服务自身占用，不能作为自定义短码
const RESERVED_SLUGS: &[&str] = &["shorten", "analytics", "healthz"];

/// 随机短码默认长度
pub const DEFAULT_SLUG_LENGTH: usize = 6;

/// 自定义短码最大长度
const MAX_SLUG_LENGTH: usize = 64;

pub fn generate_slug(length: usize) -> String {
    use std::iter;

    // 随机选择字母和数字
    let chars = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

    // 生成指定长度的随机字符串
    iter::repeat_with(|| chars[rand::random_range(0..chars.len())] as char)
        .take(length)
        .collect()
}

/// 校验自定义短码：1-64 位字母、数字、`-` 或 `_`
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= MAX_SLUG_LENGTH
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

pub fn is_reserved_slug(slug: &str) -> bool {
    RESERVED_SLUGS.contains(&slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_slug_has_requested_length() {
        for len in [1, 6, 12, 32] {
            assert_eq!(generate_slug(len).len(), len);
        }
    }

    #[test]
    fn generated_slug_is_alphanumeric() {
        for _ in 0..100 {
            let slug = generate_slug(DEFAULT_SLUG_LENGTH);
            assert!(slug.chars().all(|c| c.is_ascii_alphanumeric()), "{}", slug);
        }
    }

    #[test]
    fn generated_slugs_vary() {
        let a = generate_slug(DEFAULT_SLUG_LENGTH);
        let b = generate_slug(DEFAULT_SLUG_LENGTH);
        let c = generate_slug(DEFAULT_SLUG_LENGTH);
        // 62^6 个取值，三连碰撞基本不可能
        assert!(!(a == b && b == c), "{} {} {}", a, b, c);
    }

    #[test]
    fn valid_slugs() {
        assert!(is_valid_slug("promo1"));
        assert!(is_valid_slug("a"));
        assert!(is_valid_slug("my-link_2024"));
        assert!(is_valid_slug(&"x".repeat(64)));
    }

    #[test]
    fn invalid_slugs() {
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("has space"));
        assert!(!is_valid_slug("a/b"));
        assert!(!is_valid_slug("héllo"));
        assert!(!is_valid_slug(&"x".repeat(65)));
    }

    #[test]
    fn reserved_slugs_are_detected() {
        assert!(is_reserved_slug("shorten"));
        assert!(is_reserved_slug("analytics"));
        assert!(is_reserved_slug("healthz"));
        assert!(!is_reserved_slug("promo1"));
    }
}
