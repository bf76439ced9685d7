//! EAN-13 校驗位。
//!
//! 由左至右，索引 0,2,4... 的數字權重為 1，索引 1,3,5... 權重為 3；
//! 校驗位 = (10 - 加權總和 % 10) % 10。

use crate::domain::model::BODY_LENGTH;

/// 前 12 位的加權總和；非數字字元視為 0 (呼叫端保證輸入為數字)
pub fn weighted_sum(body: &str) -> u32 {
    body.bytes()
        .take(BODY_LENGTH)
        .enumerate()
        .map(|(i, b)| {
            let digit = b.wrapping_sub(b'0') as u32 % 10;
            if i % 2 == 0 {
                digit
            } else {
                digit * 3
            }
        })
        .sum()
}

/// 計算 12 位主體的校驗位 (0..=9)
pub fn compute_check_digit(body: &str) -> u8 {
    ((10 - weighted_sum(body) % 10) % 10) as u8
}

/// 完整 13 位碼的校驗位是否正確
pub fn is_valid_ean13(code: &str) -> bool {
    code.len() == BODY_LENGTH + 1
        && code.bytes().all(|b| b.is_ascii_digit())
        && compute_check_digit(&code[..BODY_LENGTH]) == code.as_bytes()[BODY_LENGTH] - b'0'
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_known_vectors() {
        assert_eq!(compute_check_digit("400638133393"), 1);
        assert_eq!(compute_check_digit("000000000000"), 0);
        assert_eq!(compute_check_digit("690123456789"), 2);
    }

    #[test]
    fn test_checksum_relation_holds_for_random_bodies() {
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..1000 {
            let body: String = (0..12)
                .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
                .collect();
            let check = compute_check_digit(&body);
            assert!(check <= 9);
            assert_eq!((weighted_sum(&body) + check as u32) % 10, 0);
        }
    }

    #[test]
    fn test_is_valid_ean13() {
        assert!(is_valid_ean13("4006381333931"));
        assert!(!is_valid_ean13("4006381333932"));
        assert!(!is_valid_ean13("400638133393"));
        assert!(!is_valid_ean13("40063813339a1"));
    }
}
