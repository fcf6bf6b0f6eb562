use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use super::tables::{
    base_size_index, select_breaker, Material, MountType, Scenario, SizingMode, BREAKER_MARGIN,
    CABLE_SIZES, MAX_CONDUCTOR_TEMP_C, REFERENCE_AMBIENT_C, THREE_PHASE_THRESHOLD_V,
};

/// 케이블 선정 입력 오류. 계산 전체를 거부하며 부분 결과는 없다.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SizingError {
    #[error("입력 오류 ({field}): {reason}")]
    InvalidInput {
        field: &'static str,
        reason: &'static str,
    },
}

impl SizingError {
    pub fn field(&self) -> &'static str {
        match self {
            SizingError::InvalidInput { field, .. } => field,
        }
    }
}

/// 케이블 선정 입력값. 직렬화 필드명은 원격 계산 API 스키마를 따른다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingInput {
    /// 부하 유효전력 [kW]
    #[serde(rename = "power")]
    pub rated_power_kw: f64,
    /// 선간 전압 [V]. 300 V 초과는 3상.
    #[serde(rename = "voltage")]
    pub line_voltage_v: f64,
    /// 편도 포설 거리 [m]
    #[serde(rename = "distance")]
    pub distance_m: f64,
    pub scenario: Scenario,
    pub mount_type: MountType,
    pub material: Material,
    /// 주위 온도 [°C], 70 미만
    #[serde(rename = "temp")]
    pub ambient_temp_c: f64,
    pub mode: SizingMode,
    /// pro 모드에서만 사용
    pub power_factor: f64,
    /// pro 모드에서만 사용 [%]
    pub allowed_drop_pct: f64,
    /// pro 모드에서만 사용, 1 이상
    pub group_factor: f64,
}

impl Default for SizingInput {
    fn default() -> Self {
        Self {
            rated_power_kw: 15.0,
            line_voltage_v: 380.0,
            distance_m: 50.0,
            scenario: Scenario::General,
            mount_type: MountType::Concealed,
            material: Material::Copper,
            ambient_temp_c: 30.0,
            mode: SizingMode::Basic,
            power_factor: 0.85,
            allowed_drop_pct: 5.0,
            group_factor: 1.0,
        }
    }
}

/// 모드와 시나리오를 반영해 실제 계산에 쓰이는 계수들.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveParams {
    pub power_factor: f64,
    pub drop_limit_pct: f64,
    pub group_factor: f64,
    pub ib_factor: f64,
    pub margin_steps: usize,
}

impl SizingInput {
    pub fn is_three_phase(&self) -> bool {
        self.line_voltage_v > THREE_PHASE_THRESHOLD_V
    }

    pub fn effective_params(&self) -> EffectiveParams {
        let policy = self.scenario.policy();
        match self.mode {
            SizingMode::Basic => EffectiveParams {
                power_factor: policy.power_factor,
                drop_limit_pct: policy.drop_limit_pct,
                group_factor: 1.0,
                ib_factor: policy.ib_factor,
                margin_steps: policy.margin_steps,
            },
            SizingMode::Pro => EffectiveParams {
                power_factor: self.power_factor,
                drop_limit_pct: self.allowed_drop_pct,
                group_factor: self.group_factor,
                ib_factor: policy.ib_factor,
                margin_steps: policy.margin_steps,
            },
        }
    }

    /// 정의역을 벗어난 값이 있으면 첫 번째 문제 필드를 보고한다.
    /// pro 전용 필드는 pro 모드일 때만 검사한다.
    pub fn validate(&self) -> Result<(), SizingError> {
        positive("rated_power_kw", self.rated_power_kw)?;
        positive("line_voltage_v", self.line_voltage_v)?;
        non_negative("distance_m", self.distance_m)?;
        finite("ambient_temp_c", self.ambient_temp_c)?;
        if self.ambient_temp_c >= MAX_CONDUCTOR_TEMP_C {
            return Err(SizingError::InvalidInput {
                field: "ambient_temp_c",
                reason: "주위 온도는 70°C 미만이어야 합니다.",
            });
        }
        if self.mode == SizingMode::Pro {
            positive("power_factor", self.power_factor)?;
            if self.power_factor > 1.0 {
                return Err(SizingError::InvalidInput {
                    field: "power_factor",
                    reason: "역률은 0 초과 1 이하여야 합니다.",
                });
            }
            positive("allowed_drop_pct", self.allowed_drop_pct)?;
            finite("group_factor", self.group_factor)?;
            if self.group_factor < 1.0 {
                return Err(SizingError::InvalidInput {
                    field: "group_factor",
                    reason: "집합 계수는 1 이상이어야 합니다.",
                });
            }
        }
        Ok(())
    }
}

fn finite(field: &'static str, v: f64) -> Result<(), SizingError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(SizingError::InvalidInput {
            field,
            reason: "유한한 숫자가 아닙니다.",
        })
    }
}

fn positive(field: &'static str, v: f64) -> Result<(), SizingError> {
    finite(field, v)?;
    if v > 0.0 {
        Ok(())
    } else {
        Err(SizingError::InvalidInput {
            field,
            reason: "0보다 커야 합니다.",
        })
    }
}

fn non_negative(field: &'static str, v: f64) -> Result<(), SizingError> {
    finite(field, v)?;
    if v >= 0.0 {
        Ok(())
    } else {
        Err(SizingError::InvalidInput {
            field,
            reason: "음수일 수 없습니다.",
        })
    }
}

/// 케이블 선정 결과. 전류와 전압강하는 직렬화 시 소수 둘째 자리로 반올림된다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingResult {
    #[serde(serialize_with = "round2")]
    pub load_current_a: f64,
    pub recommended_breaker_a: u32,
    pub recommended_cable_mm2: f64,
    #[serde(serialize_with = "round2")]
    pub voltage_drop_pct: f64,
    #[serde(default)]
    pub scenario: Scenario,
}

fn round2<S: Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64((v * 100.0).round() / 100.0)
}

impl std::fmt::Display for SizingResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Ib={:.2} A, breaker={} A, cable={} mm², drop={:.2} %",
            self.load_current_a,
            self.recommended_breaker_a,
            self.recommended_cable_mm2,
            self.voltage_drop_pct
        )
    }
}

/// 온도 보정계수 kt = sqrt((70 - Ta) / (70 - 30)).
pub fn temperature_factor(ambient_temp_c: f64) -> f64 {
    ((MAX_CONDUCTOR_TEMP_C - ambient_temp_c) / (MAX_CONDUCTOR_TEMP_C - REFERENCE_AMBIENT_C)).sqrt()
}

/// 단면적 `cross_section_mm2`에서의 전압강하 [%].
///
/// ΔU% = k · Ib · (ρ · L / S) / U · 100, k = √3 (3상) 또는 2 (단상 왕복)
pub fn voltage_drop_pct(
    three_phase: bool,
    load_current_a: f64,
    material: Material,
    distance_m: f64,
    cross_section_mm2: f64,
    line_voltage_v: f64,
) -> f64 {
    let phase_factor = if three_phase { 3f64.sqrt() } else { 2.0 };
    let resistance = material.resistivity() * distance_m / cross_section_mm2;
    phase_factor * load_current_a * resistance / line_voltage_v * 100.0
}

/// 부하 조건으로부터 차단기와 케이블 단면적을 선정한다.
///
/// 1. 부하 전류 Ib (역률, 기동 여유 배수 반영)
/// 2. 1.25·Ib 이상인 최소 표준 차단기
/// 3. 온도/포설/집합 보정 후 목표 허용전류로 기본 단면적 선정, 시나리오 여유 단계 가산
/// 4. 허용 전압강하를 만족할 때까지 한 단계씩 증가 (최대 단면적에서 멈춤)
pub fn size_cable(input: &SizingInput) -> Result<SizingResult, SizingError> {
    input.validate()?;
    let params = input.effective_params();
    let three_phase = input.is_three_phase();
    let power_w = input.rated_power_kw * 1000.0;

    let base_current = if three_phase {
        power_w / (3f64.sqrt() * input.line_voltage_v * params.power_factor)
    } else {
        power_w / (input.line_voltage_v * params.power_factor)
    };
    let ib = base_current * params.ib_factor;
    if !ib.is_finite() {
        return Err(overflow(current_culprit(input)));
    }

    let breaker = select_breaker(ib * BREAKER_MARGIN);

    let kt = temperature_factor(input.ambient_temp_c);
    let km = input.mount_type.derating();
    let target_capacity = ib / (kt * km * params.group_factor);

    let last = CABLE_SIZES.len() - 1;
    let mut idx = (base_size_index(target_capacity) + params.margin_steps).min(last);

    let drop_at = |idx: usize| {
        voltage_drop_pct(
            three_phase,
            ib,
            input.material,
            input.distance_m,
            CABLE_SIZES[idx].mm2,
            input.line_voltage_v,
        )
    };
    let mut drop = drop_at(idx);
    while drop > params.drop_limit_pct && idx < last {
        idx += 1;
        drop = drop_at(idx);
    }

    if !drop.is_finite() {
        return Err(overflow("distance_m"));
    }

    debug!(
        ib,
        target_capacity,
        breaker,
        cable_mm2 = CABLE_SIZES[idx].mm2,
        drop,
        "cable sized"
    );

    Ok(SizingResult {
        load_current_a: ib,
        recommended_breaker_a: breaker,
        recommended_cable_mm2: CABLE_SIZES[idx].mm2,
        voltage_drop_pct: drop,
        scenario: input.scenario,
    })
}

/// 부하 전류나 전압강하가 유한한 실수 범위를 벗어났을 때의 입력 오류.
fn overflow(field: &'static str) -> SizingError {
    SizingError::InvalidInput {
        field,
        reason: "계산 결과가 유한한 값이 아닙니다.",
    }
}

/// 전류가 발산한 원인. pro 모드에서 전력/전압 비가 유한하면 역률 탓이다.
fn current_culprit(input: &SizingInput) -> &'static str {
    let per_volt = input.rated_power_kw * 1000.0 / input.line_voltage_v;
    if input.mode == SizingMode::Pro && per_volt.is_finite() {
        "power_factor"
    } else {
        "rated_power_kw"
    }
}
