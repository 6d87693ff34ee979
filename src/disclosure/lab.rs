//! Lab orders: truth lookup plus imperfect test performance

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::config::TestCharacteristics;
use crate::core::error::{Result, SimError};
use crate::core::types::{LabTest, SampleId, SampleType, VillageId};
use crate::truth::samples::LabSample;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabOrder {
    pub sample_type: SampleType,
    pub village_id: VillageId,
    pub test: LabTest,
    pub source_description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestResult {
    Positive,
    Negative,
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TestResult::Positive => "positive",
            TestResult::Negative => "negative",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabResult {
    pub sample_id: SampleId,
    pub sample_type: SampleType,
    pub village_id: VillageId,
    pub test: LabTest,
    pub source_description: String,
    pub result: TestResult,
    pub turnaround_days: u32,
    pub cost: u32,
}

/// True status for a sample type in a village; no matching sample means negative
pub fn true_status(samples: &[LabSample], sample_type: SampleType, village_id: VillageId) -> bool {
    samples
        .iter()
        .any(|s| s.sample_type == sample_type && s.village_id == village_id && s.true_positive)
}

/// Run one order through the lab
///
/// The observed result is positive with probability `sensitivity` when the
/// truth is positive and `1 - specificity` when it is negative. `order_number`
/// numbers the returned sample id.
pub fn process_lab_order(
    order: &LabOrder,
    order_number: usize,
    samples: &[LabSample],
    characteristics: &TestCharacteristics,
    rng: &mut ChaCha8Rng,
) -> Result<LabResult> {
    if order.test.sample_type() != order.sample_type {
        return Err(SimError::InvalidLabOrder(format!(
            "{} cannot be run on {} (needs {})",
            order.test,
            order.sample_type,
            order.test.sample_type()
        )));
    }
    if characteristics.test != order.test {
        return Err(SimError::InvalidLabOrder(format!(
            "characteristics for {} supplied for a {} order",
            characteristics.test, order.test
        )));
    }

    let truly_positive = true_status(samples, order.sample_type, order.village_id);
    let p_positive = if truly_positive {
        characteristics.sensitivity
    } else {
        1.0 - characteristics.specificity
    };
    let result = if rng.gen_bool(p_positive) {
        TestResult::Positive
    } else {
        TestResult::Negative
    };

    tracing::debug!(
        "Lab order {}: {} on {} from {} -> {}",
        order_number,
        order.test,
        order.sample_type,
        order.village_id,
        result
    );

    Ok(LabResult {
        sample_id: SampleId(format!("LAB-{:04}", order_number)),
        sample_type: order.sample_type,
        village_id: order.village_id,
        test: order.test,
        source_description: order.source_description.clone(),
        result,
        turnaround_days: characteristics.turnaround_days,
        cost: characteristics.cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use rand::SeedableRng;

    fn sample(sample_type: SampleType, village: u32, positive: bool) -> LabSample {
        LabSample {
            id: SampleId("LS-001".into()),
            sample_type,
            village_id: VillageId(village),
            true_positive: positive,
        }
    }

    fn order(test: LabTest, village: u32) -> LabOrder {
        LabOrder {
            sample_type: test.sample_type(),
            village_id: VillageId(village),
            test,
            source_description: "Case from Nalu".into(),
        }
    }

    #[test]
    fn test_true_status_unmatched_is_negative() {
        let samples = vec![sample(SampleType::PigSerum, 1, true)];
        assert!(true_status(&samples, SampleType::PigSerum, VillageId(1)));
        assert!(!true_status(&samples, SampleType::PigSerum, VillageId(3)));
        assert!(!true_status(&samples, SampleType::MosquitoPool, VillageId(1)));
    }

    #[test]
    fn test_mismatched_test_rejected() {
        let config = SimulationConfig::default();
        let chars = config.test_characteristics(LabTest::JeAbPig).unwrap();
        let mut bad = order(LabTest::JeAbPig, 1);
        bad.sample_type = SampleType::HumanCsf;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(
            process_lab_order(&bad, 1, &[], chars, &mut rng),
            Err(SimError::InvalidLabOrder(_))
        ));
    }

    #[test]
    fn test_result_carries_cost_and_turnaround() {
        let config = SimulationConfig::default();
        let chars = config.test_characteristics(LabTest::JePcrMosquito).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = process_lab_order(&order(LabTest::JePcrMosquito, 2), 7, &[], chars, &mut rng).unwrap();
        assert_eq!(result.sample_id, SampleId("LAB-0007".into()));
        assert_eq!(result.cost, chars.cost);
        assert_eq!(result.turnaround_days, chars.turnaround_days);
    }

    #[test]
    fn test_perfect_test_reports_truth() {
        let mut chars = SimulationConfig::default()
            .test_characteristics(LabTest::JeIgmCsf)
            .unwrap()
            .clone();
        chars.sensitivity = 1.0;
        chars.specificity = 1.0;
        let samples = vec![sample(SampleType::HumanCsf, 1, true)];
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for n in 0..50 {
            let pos = process_lab_order(&order(LabTest::JeIgmCsf, 1), n, &samples, &chars, &mut rng).unwrap();
            let neg = process_lab_order(&order(LabTest::JeIgmCsf, 2), n, &samples, &chars, &mut rng).unwrap();
            assert_eq!(pos.result, TestResult::Positive);
            assert_eq!(neg.result, TestResult::Negative);
        }
    }
}
