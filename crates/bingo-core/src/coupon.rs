//! 优惠券码与完整性哈希
//!
//! 券码形态：品牌前 3 位大写 + 折扣百分比 + "OFF" + 6 位随机大写字母数字。
//! 完整性哈希由券码、用户 ID 与服务端密钥确定性推导，核销时重算比对，
//! 防止伪造或移花接木到其他账户。

use rand::Rng;
use sha2::{Digest, Sha256};

/// 可兑换品牌白名单
pub const BRANDS: [&str; 4] = ["Myntra", "Zara", "Ajio", "Trends"];

/// 随机后缀字符集
const SUFFIX_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// 后缀长度
const SUFFIX_LEN: usize = 6;

/// 哈希截断长度（hex 字符数）
const HASH_LEN: usize = 16;

/// 品牌是否在白名单内
pub fn is_valid_brand(brand: &str) -> bool {
    BRANDS.contains(&brand)
}

/// 生成人类可读的券码，如 MYN35OFFK4X9QZ
pub fn coupon_code<R: Rng + ?Sized>(brand: &str, discount_pct: u8, rng: &mut R) -> String {
    let prefix: String = brand.chars().take(3).collect::<String>().to_uppercase();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| {
            let idx = rng.random_range(0..SUFFIX_CHARSET.len());
            SUFFIX_CHARSET[idx] as char
        })
        .collect();
    format!("{}{}OFF{}", prefix, discount_pct, suffix)
}

/// 计算券的完整性哈希：sha256("{secret}:{code}:{user_id}") 取前 16 个 hex 字符
///
/// 相同输入永远产生相同输出，核销校验依赖这一点。
pub fn coupon_hash(secret: &str, code: &str, user_id: &str) -> String {
    let digest = Sha256::digest(format!("{}:{}:{}", secret, code, user_id).as_bytes());
    digest
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<String>()[..HASH_LEN]
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_brand_allow_list() {
        for brand in BRANDS {
            assert!(is_valid_brand(brand));
        }
        assert!(!is_valid_brand("Amazon"));
        assert!(!is_valid_brand("myntra"));
    }

    #[test]
    fn test_coupon_code_shape() {
        let mut rng = StdRng::seed_from_u64(42);
        let code = coupon_code("Myntra", 35, &mut rng);
        assert!(code.starts_with("MYN35OFF"));
        assert_eq!(code.len(), "MYN35OFF".len() + SUFFIX_LEN);
        assert!(
            code["MYN35OFF".len()..]
                .bytes()
                .all(|b| SUFFIX_CHARSET.contains(&b))
        );
    }

    #[test]
    fn test_coupon_code_deterministic_with_seeded_rng() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        assert_eq!(coupon_code("Zara", 60, &mut a), coupon_code("Zara", 60, &mut b));
    }

    #[test]
    fn test_hash_is_deterministic() {
        let h1 = coupon_hash("secret", "MYN35OFFK4X9QZ", "u001");
        let h2 = coupon_hash("secret", "MYN35OFFK4X9QZ", "u001");
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), HASH_LEN);
        assert!(h1.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_depends_on_all_inputs() {
        let base = coupon_hash("secret", "CODE", "u001");
        assert_ne!(base, coupon_hash("secret", "CODE", "u002"));
        assert_ne!(base, coupon_hash("secret", "OTHER", "u001"));
        assert_ne!(base, coupon_hash("other-secret", "CODE", "u001"));
    }
}
