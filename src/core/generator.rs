use crate::core::checksum::compute_check_digit;
use crate::domain::model::{CodeRecord, BODY_LENGTH};
use rand::Rng;

/// 隨機產生 `length` 位數字，每位獨立且均勻取自 0-9
pub fn random_digits<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// 以前綴產生一筆完整 EAN-13；不保證唯一性，去重由批次負責
pub fn generate_code<R: Rng + ?Sized>(rng: &mut R, prefix: &str) -> CodeRecord {
    let prefix_length = prefix.len();
    let product_code_length = BODY_LENGTH.saturating_sub(prefix_length);
    let product_code = random_digits(rng, product_code_length);

    let body = format!("{}{}", prefix, product_code);
    let check_digit = compute_check_digit(&body);

    CodeRecord {
        full_code: format!("{}{}", body, check_digit),
        prefix: prefix.to_string(),
        prefix_length,
        product_code,
        product_code_length,
        check_digit: check_digit.to_string(),
    }
}
