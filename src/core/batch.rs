use crate::core::generator::generate_code;
use crate::domain::model::{CodeRecord, GeneratedBatch, GenerationRequest};
use rand::Rng;
use std::collections::HashSet;

/// 每個要求的條碼最多嘗試幾次
pub const ATTEMPTS_PER_CODE: usize = 100;

/// 重複產生直到湊滿 `count` 個不重複的條碼，或嘗試次數達到 `count * 100`。
/// 嘗試次數用盡只會得到較少的結果，不會回傳錯誤。
pub fn generate_batch<R: Rng + ?Sized>(rng: &mut R, request: &GenerationRequest) -> GeneratedBatch {
    generate_batch_with(request, |prefix| generate_code(rng, prefix))
}

/// 以任意產生器執行去重迴圈
pub fn generate_batch_with<F>(request: &GenerationRequest, mut next: F) -> GeneratedBatch
where
    F: FnMut(&str) -> CodeRecord,
{
    let max_attempts = request.count * ATTEMPTS_PER_CODE;
    let mut seen = HashSet::with_capacity(request.count);
    let mut records = Vec::with_capacity(request.count);
    let mut attempts = 0;

    while records.len() < request.count && attempts < max_attempts {
        let record = next(&request.prefix);
        if seen.insert(record.full_code.clone()) {
            records.push(record);
        }
        attempts += 1;
    }

    tracing::debug!(
        "Generated {}/{} codes in {} attempts",
        records.len(),
        request.count,
        attempts
    );

    GeneratedBatch {
        records,
        attempts,
        requested: request.count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::checksum::compute_check_digit;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn request(prefix: &str, count: usize) -> GenerationRequest {
        GenerationRequest {
            prefix: prefix.to_string(),
            count,
        }
    }

    #[test]
    fn test_full_batch_without_prefix() {
        let mut rng = StdRng::seed_from_u64(2024);
        let batch = generate_batch(&mut rng, &request("", 50));

        assert_eq!(batch.records.len(), 50);
        assert!(batch.attempts <= 5000);
        assert!(batch.shortfall().is_none());

        let unique: HashSet<_> = batch.records.iter().map(|r| &r.full_code).collect();
        assert_eq!(unique.len(), 50);
        for record in &batch.records {
            assert_eq!(record.full_code.len(), 13);
            let body = format!("{}{}", record.prefix, record.product_code);
            assert_eq!(compute_check_digit(&body).to_string(), record.check_digit);
        }
    }

    #[test]
    fn test_batch_with_longest_prefix() {
        let mut rng = StdRng::seed_from_u64(8);
        let batch = generate_batch(&mut rng, &request("12345678", 10));
        assert!(batch.records.len() <= 10);
        assert!(batch.records.iter().all(|r| r.full_code.starts_with("12345678")));
    }

    #[test]
    fn test_budget_is_enforced_when_codes_repeat() {
        let fixed = CodeRecord {
            full_code: "4006381333931".to_string(),
            prefix: "400".to_string(),
            prefix_length: 3,
            product_code: "638133393".to_string(),
            product_code_length: 9,
            check_digit: "1".to_string(),
        };
        let mut calls = 0;
        let batch = generate_batch_with(&request("400", 3), |_| {
            calls += 1;
            fixed.clone()
        });

        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.attempts, 300);
        assert_eq!(calls, 300);
        assert!(batch.shortfall().is_some());
    }

    #[test]
    fn test_stops_as_soon_as_count_is_reached() {
        let mut rng = StdRng::seed_from_u64(99);
        let batch = generate_batch(&mut rng, &request("690", 1));
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.attempts, 1);
    }
}
