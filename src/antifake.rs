//! 위조 케이블 판별: 구리 함량 가치 대비 구입가 비교와 육안 점검 목록.
//!
//! 구리 무게는 밀도 기반 공식(단면적 × 길이 × 8.96 g/cm³)으로만 추정한다.

use serde::Serialize;

/// 구리 밀도 [g/cm³]. mm² × m × 밀도 × 0.001 = kg.
pub const COPPER_DENSITY_G_CM3: f64 = 8.96;

/// 이 비율 미만이면 위험(구리값과 거의 같은 가격).
pub const DANGER_RATIO: f64 = 1.1;
/// 이 비율 미만이면 의심.
pub const SUSPICIOUS_RATIO: f64 = 1.35;

/// 점검 화면에서 고를 수 있는 단면적 [mm²].
pub const CHECK_SIZES_MM2: [f64; 13] = [
    1.0, 1.5, 2.5, 4.0, 6.0, 10.0, 16.0, 25.0, 35.0, 50.0, 70.0, 95.0, 120.0,
];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AntiFakeError {
    #[error("입력 오류 ({0}): 유한한 양수여야 합니다.")]
    InvalidInput(&'static str),
}

/// 가치 점검 입력값.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueCheckInput {
    pub cross_section_mm2: f64,
    pub length_m: f64,
    /// LME 구리 기준가 [USD/t]
    pub copper_price_per_tonne: f64,
    /// 실제 구입가 [USD]
    pub paid_price: f64,
}

impl Default for ValueCheckInput {
    fn default() -> Self {
        Self {
            cross_section_mm2: 2.5,
            length_m: 100.0,
            copper_price_per_tonne: 9392.0,
            paid_price: 150.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictStatus {
    Safe,
    Suspicious,
    Danger,
}

impl VerdictStatus {
    /// 구입가/구리값 비율로 판정한다.
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio < DANGER_RATIO {
            VerdictStatus::Danger
        } else if ratio < SUSPICIOUS_RATIO {
            VerdictStatus::Suspicious
        } else {
            VerdictStatus::Safe
        }
    }

    /// 번역 키
    pub fn label_key(&self) -> &'static str {
        match self {
            VerdictStatus::Safe => crate::i18n::keys::ANTIFAKE_SAFE,
            VerdictStatus::Suspicious => crate::i18n::keys::ANTIFAKE_SUSPICIOUS,
            VerdictStatus::Danger => crate::i18n::keys::ANTIFAKE_DANGER,
        }
    }
}

/// 가치 점검 결과.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueVerdict {
    pub copper_weight_kg: f64,
    pub copper_value: f64,
    pub price_per_kg: f64,
    /// 구입가 / 구리값
    pub ratio: f64,
    /// 구입가 중 구리값이 차지하는 비중 [%]
    pub copper_share_pct: f64,
    pub status: VerdictStatus,
}

/// 도체 구리 무게 [kg].
pub fn copper_weight_kg(cross_section_mm2: f64, length_m: f64) -> f64 {
    cross_section_mm2 * length_m * COPPER_DENSITY_G_CM3 * 0.001
}

/// 구입가가 구리 원가에 비해 지나치게 낮은지 판정한다.
pub fn check_value(input: ValueCheckInput) -> Result<ValueVerdict, AntiFakeError> {
    positive("cross_section_mm2", input.cross_section_mm2)?;
    positive("length_m", input.length_m)?;
    positive("copper_price_per_tonne", input.copper_price_per_tonne)?;
    if !input.paid_price.is_finite() || input.paid_price < 0.0 {
        return Err(AntiFakeError::InvalidInput("paid_price"));
    }

    let weight = copper_weight_kg(input.cross_section_mm2, input.length_m);
    let price_per_kg = input.copper_price_per_tonne / 1000.0;
    let value = weight * price_per_kg;
    let ratio = input.paid_price / value;
    let copper_share_pct = if ratio > 0.0 {
        (100.0 / ratio).round()
    } else {
        f64::INFINITY
    };

    Ok(ValueVerdict {
        copper_weight_kg: weight,
        copper_value: value,
        price_per_kg,
        ratio,
        copper_share_pct,
        status: VerdictStatus::from_ratio(ratio),
    })
}

fn positive(field: &'static str, v: f64) -> Result<(), AntiFakeError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(AntiFakeError::InvalidInput(field))
    }
}

/// 육안 점검 항목 (제목 키, 설명 키).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InspectionItem {
    pub title_key: &'static str,
    pub desc_key: &'static str,
}

pub fn inspection_checklist() -> &'static [InspectionItem] {
    use crate::i18n::keys::*;
    &[
        InspectionItem {
            title_key: INSPECT_COPPER_COLOR_TITLE,
            desc_key: INSPECT_COPPER_COLOR_DESC,
        },
        InspectionItem {
            title_key: INSPECT_INSULATION_TITLE,
            desc_key: INSPECT_INSULATION_DESC,
        },
        InspectionItem {
            title_key: INSPECT_CONCENTRIC_TITLE,
            desc_key: INSPECT_CONCENTRIC_DESC,
        },
        InspectionItem {
            title_key: INSPECT_MARKING_TITLE,
            desc_key: INSPECT_MARKING_DESC,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_case_is_safe() {
        // 2.5 mm² × 100 m → 2.24 kg, 9.392 USD/kg → 21.04 USD
        let v = check_value(ValueCheckInput::default()).unwrap();
        assert!((v.copper_weight_kg - 2.24).abs() < 1e-9);
        assert!((v.copper_value - 21.038).abs() < 1e-2);
        assert_eq!(v.status, VerdictStatus::Safe);
    }

    #[test]
    fn price_at_copper_value_is_danger() {
        let v = check_value(ValueCheckInput {
            paid_price: 22.0,
            ..ValueCheckInput::default()
        })
        .unwrap();
        assert_eq!(v.status, VerdictStatus::Danger);
        assert!(v.copper_share_pct > 90.0);
    }

    #[test]
    fn thresholds_are_half_open() {
        assert_eq!(VerdictStatus::from_ratio(1.0999), VerdictStatus::Danger);
        assert_eq!(VerdictStatus::from_ratio(1.1), VerdictStatus::Suspicious);
        assert_eq!(VerdictStatus::from_ratio(1.35), VerdictStatus::Safe);
    }

    #[test]
    fn rejects_zero_length() {
        let err = check_value(ValueCheckInput {
            length_m: 0.0,
            ..ValueCheckInput::default()
        })
        .unwrap_err();
        assert_eq!(err, AntiFakeError::InvalidInput("length_m"));
    }

    #[test]
    fn checklist_has_four_items() {
        assert_eq!(inspection_checklist().len(), 4);
    }
}
