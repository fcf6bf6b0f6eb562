use super::sizing::{SizingError, SizingInput, SizingResult};
use super::tables::{Material, MountType, Scenario, SizingMode};

/// 입력 폼에서 받은 그대로의 문자열 값. 선택 항목은 이미 열거형으로 받는다.
#[derive(Debug, Clone)]
pub struct RawSizingInput {
    pub power_kw: String,
    pub voltage_v: String,
    pub distance_m: String,
    pub ambient_temp_c: String,
    pub power_factor: String,
    pub allowed_drop_pct: String,
    pub group_factor: String,
    pub scenario: Scenario,
    pub mount_type: MountType,
    pub material: Material,
    pub mode: SizingMode,
}

impl Default for RawSizingInput {
    fn default() -> Self {
        Self::from_input(&SizingInput::default())
    }
}

impl RawSizingInput {
    pub fn from_input(input: &SizingInput) -> Self {
        Self {
            power_kw: input.rated_power_kw.to_string(),
            voltage_v: input.line_voltage_v.to_string(),
            distance_m: input.distance_m.to_string(),
            ambient_temp_c: input.ambient_temp_c.to_string(),
            power_factor: input.power_factor.to_string(),
            allowed_drop_pct: input.allowed_drop_pct.to_string(),
            group_factor: input.group_factor.to_string(),
            scenario: input.scenario,
            mount_type: input.mount_type,
            material: input.material,
            mode: input.mode,
        }
    }

    /// 문자열을 숫자로 바꾸고 검증까지 마친 입력을 만든다.
    /// basic 모드에서는 pro 전용 칸이 비어 있거나 잘못되어도 무시한다.
    pub fn parse(&self) -> Result<SizingInput, SizingError> {
        let pro = self.mode == SizingMode::Pro;
        let defaults = SizingInput::default();
        let optional = |field: &'static str, raw: &str, fallback: f64| {
            if pro {
                parse_number(field, raw)
            } else {
                Ok(parse_number(field, raw).unwrap_or(fallback))
            }
        };
        let input = SizingInput {
            rated_power_kw: parse_number("rated_power_kw", &self.power_kw)?,
            line_voltage_v: parse_number("line_voltage_v", &self.voltage_v)?,
            distance_m: parse_number("distance_m", &self.distance_m)?,
            ambient_temp_c: parse_number("ambient_temp_c", &self.ambient_temp_c)?,
            power_factor: optional("power_factor", &self.power_factor, defaults.power_factor)?,
            allowed_drop_pct: optional(
                "allowed_drop_pct",
                &self.allowed_drop_pct,
                defaults.allowed_drop_pct,
            )?,
            group_factor: optional("group_factor", &self.group_factor, defaults.group_factor)?,
            scenario: self.scenario,
            mount_type: self.mount_type,
            material: self.material,
            mode: self.mode,
        };
        input.validate()?;
        Ok(input)
    }
}

/// 유한한 실수로 해석되지 않으면 해당 필드의 입력 오류를 돌려준다.
pub fn parse_number(field: &'static str, raw: &str) -> Result<f64, SizingError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(SizingError::InvalidInput {
            field,
            reason: "숫자로 해석할 수 없습니다.",
        }),
    }
}

/// 공유용 한 줄 요약.
pub fn share_text(input: &SizingInput, result: &SizingResult) -> String {
    format!(
        "WireExpert Report: {}kW @ {}V. Recommended: {}mm² Cable. Certified by IEC.",
        input.rated_power_kw, input.line_voltage_v, result.recommended_cable_mm2
    )
}
