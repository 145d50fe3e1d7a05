use crate::domain::quotes::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One supplier's per-kg price against a reference landed price
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierBenchmark {
    /// Supplier name
    pub supplier_name: String,
    /// Product grade
    pub grade: String,
    /// Base price per kg
    pub price_per_kg: Decimal,
    /// `price_per_kg - reference`; negative means cheaper than the reference
    pub premium_over_reference: Decimal,
}

/// Ranks suppliers cheapest first against a per-kg reference price.
///
/// Suppliers with equal prices keep their input order.
pub fn benchmark_suppliers(
    suppliers: &[SupplierQuote],
    reference_per_kg: Decimal,
) -> Vec<SupplierBenchmark> {
    let mut benchmarks: Vec<SupplierBenchmark> = suppliers
        .iter()
        .map(|s| {
            let price_per_kg = s.price_per_kg();
            SupplierBenchmark {
                supplier_name: s.supplier_name.clone(),
                grade: s.grade.clone(),
                price_per_kg,
                premium_over_reference: price_per_kg - reference_per_kg,
            }
        })
        .collect();

    benchmarks.sort_by(|a, b| a.price_per_kg.cmp(&b.price_per_kg));
    benchmarks
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn supplier(name: &str, price_per_mt: Decimal) -> SupplierQuote {
        SupplierQuote {
            supplier_name: name.to_string(),
            price_per_mt,
            grade: "Aluminium Ingot P1020".to_string(),
            last_updated: chrono::Utc.with_ymd_and_hms(2026, 1, 30, 10, 30, 0).unwrap(),
            change_percent: dec!(0.3),
        }
    }

    #[test]
    fn test_benchmark_sorted_cheapest_first() {
        let suppliers = vec![
            supplier("Hindalco", dec!(218500)),
            supplier("Vedanta", dec!(217800)),
            supplier("NALCO", dec!(218100)),
        ];

        let ranked = benchmark_suppliers(&suppliers, dec!(218.15));

        let names: Vec<&str> = ranked.iter().map(|b| b.supplier_name.as_str()).collect();
        assert_eq!(names, vec!["Vedanta", "NALCO", "Hindalco"]);
        assert_eq!(ranked[0].price_per_kg, dec!(217.8));
        assert_eq!(ranked[0].premium_over_reference, dec!(-0.35));
        assert_eq!(ranked[2].premium_over_reference, dec!(0.35));
    }

    #[test]
    fn test_benchmark_empty() {
        assert!(benchmark_suppliers(&[], dec!(218.15)).is_empty());
    }
}
