//! Golden tests for catalog normalization and the dose engine.
//!
//! Each case runs a raw record through normalization and calculation.

use pediatric_dose_core::catalog::Catalog;
use pediatric_dose_core::engine::DoseEngine;
use pediatric_dose_core::models::{DrugId, NumericField, RawDrugRecord};
use pediatric_dose_core::selection::SelectionTracker;

/// One normalization + calculation case.
struct GoldenCase {
    id: &'static str,
    dosages: NumericField,
    concentration: NumericField,
    doses_per_day: i64,
    weight_kg: f64,
    chosen_dosage: f64,
    expected_total_ml: f64,
    expected_dose_ml: f64,
}

fn get_golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            id: "reference-scenario",
            dosages: NumericField::Sequence(vec![10.0, 15.0, 20.0]),
            concentration: NumericField::Scalar(250.0),
            doses_per_day: 3,
            weight_kg: 12.5,
            chosen_dosage: 15.0,
            expected_total_ml: 3.75,
            expected_dose_ml: 1.25,
        },
        GoldenCase {
            id: "text-encoded-fields",
            dosages: NumericField::Text("[10,15,20]".into()),
            concentration: NumericField::Text("[250]".into()),
            doses_per_day: 3,
            weight_kg: 12.5,
            chosen_dosage: 15.0,
            expected_total_ml: 3.75,
            expected_dose_ml: 1.25,
        },
        GoldenCase {
            id: "concentration-sequence-first-element",
            dosages: NumericField::Sequence(vec![10.0]),
            concentration: NumericField::Sequence(vec![125.0, 250.0]),
            doses_per_day: 2,
            weight_kg: 10.0,
            chosen_dosage: 10.0,
            // 10 * 10 * 5 / 125
            expected_total_ml: 4.0,
            expected_dose_ml: 2.0,
        },
        GoldenCase {
            id: "single-daily-dose",
            dosages: NumericField::Text("[8]".into()),
            concentration: NumericField::Text("100".into()),
            doses_per_day: 1,
            weight_kg: 20.0,
            chosen_dosage: 8.0,
            // 20 * 8 * 5 / 100
            expected_total_ml: 8.0,
            expected_dose_ml: 8.0,
        },
        GoldenCase {
            id: "four-times-daily",
            dosages: NumericField::Sequence(vec![5.0, 10.0]),
            concentration: NumericField::Scalar(100.0),
            doses_per_day: 4,
            weight_kg: 8.0,
            chosen_dosage: 10.0,
            // 8 * 10 * 5 / 100
            expected_total_ml: 4.0,
            expected_dose_ml: 1.0,
        },
        GoldenCase {
            id: "infant-weight",
            dosages: NumericField::Sequence(vec![15.0]),
            concentration: NumericField::Scalar(120.0),
            doses_per_day: 4,
            weight_kg: 4.2,
            chosen_dosage: 15.0,
            // 4.2 * 15 * 5 / 120
            expected_total_ml: 2.625,
            expected_dose_ml: 0.65625,
        },
    ]
}

#[test]
fn test_golden_cases() {
    let engine = DoseEngine::default();

    for case in get_golden_cases() {
        let record = RawDrugRecord::new(
            "1",
            "Drug",
            case.dosages.clone(),
            case.concentration.clone(),
            case.doses_per_day,
        );
        let load = Catalog::load(vec![record]);
        assert!(load.warnings.is_empty(), "[{}] unexpected warnings", case.id);

        let mut tracker = SelectionTracker::new();
        let drug_id = DrugId::new("1");
        tracker.select(&load.catalog, &drug_id).unwrap();
        tracker
            .set_dosage(&load.catalog, &drug_id, case.chosen_dosage)
            .unwrap();

        let results = engine.calculate(case.weight_kg, tracker.selection(), &load.catalog);
        let result = results
            .get("Drug")
            .unwrap_or_else(|| panic!("[{}] missing result", case.id));

        assert!(
            (result.total_volume_ml - case.expected_total_ml).abs() < 1e-9,
            "[{}] total: expected {}, got {}",
            case.id,
            case.expected_total_ml,
            result.total_volume_ml
        );
        assert!(
            (result.dose_volume_ml - case.expected_dose_ml).abs() < 1e-9,
            "[{}] per dose: expected {}, got {}",
            case.id,
            case.expected_dose_ml,
            result.dose_volume_ml
        );
    }
}

#[test]
fn test_rejected_records() {
    let bad = vec![
        ("zero-concentration", RawDrugRecord::new("1", "A", vec![10.0], 0.0, 3)),
        ("negative-dosage", RawDrugRecord::new("2", "B", vec![10.0, -1.0], 250.0, 3)),
        ("zero-doses-per-day", RawDrugRecord::new("3", "C", vec![10.0], 250.0, 0)),
        ("empty-dosage-text", RawDrugRecord::new("4", "D", "[]", 250.0, 3)),
        ("garbage-concentration", RawDrugRecord::new("5", "E", vec![10.0], "abc", 3)),
        ("blank-name", RawDrugRecord::new("6", " ", vec![10.0], 250.0, 3)),
    ];

    for (case, record) in bad {
        let load = Catalog::load(vec![record]);
        assert!(load.catalog.is_empty(), "[{}] should be rejected", case);
        assert_eq!(load.warnings.len(), 1, "[{}] should warn once", case);
    }
}
