//! 차단기/케이블 표준 테이블과 시나리오별 설계 정책.
//!
//! 모든 선정 결과는 여기 정의된 고정 테이블의 원소 중 하나이며 보간하지 않는다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::i18n::keys;

/// 표준 차단기 정격 전류 [A], 오름차순.
pub const BREAKER_RATINGS_A: [u32; 19] = [
    6, 10, 16, 20, 25, 32, 40, 50, 63, 80, 100, 125, 160, 200, 250, 315, 400, 500, 630,
];

/// 차단기 정격은 부하 전류의 1.25배 이상이어야 한다.
pub const BREAKER_MARGIN: f64 = 1.25;

/// 표준 단면적 한 칸: 공칭 단면적과 30°C 기준 허용전류.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CableSize {
    pub mm2: f64,
    pub ampacity_a: f64,
}

impl CableSize {
    pub const fn new(mm2: f64, ampacity_a: f64) -> Self {
        Self { mm2, ampacity_a }
    }
}

/// 표준 단면적 [mm²]과 기준 허용전류 [A] (IEC 60364-5-52 간이판), 오름차순.
pub const CABLE_SIZES: [CableSize; 16] = [
    CableSize::new(1.5, 18.0),
    CableSize::new(2.5, 25.0),
    CableSize::new(4.0, 34.0),
    CableSize::new(6.0, 43.0),
    CableSize::new(10.0, 60.0),
    CableSize::new(16.0, 80.0),
    CableSize::new(25.0, 106.0),
    CableSize::new(35.0, 131.0),
    CableSize::new(50.0, 159.0),
    CableSize::new(70.0, 202.0),
    CableSize::new(95.0, 244.0),
    CableSize::new(120.0, 282.0),
    CableSize::new(150.0, 324.0),
    CableSize::new(185.0, 371.0),
    CableSize::new(240.0, 436.0),
    CableSize::new(300.0, 500.0),
];

/// 도체 최고 허용 온도 [°C].
pub const MAX_CONDUCTOR_TEMP_C: f64 = 70.0;
/// 허용전류 테이블의 기준 주위 온도 [°C].
pub const REFERENCE_AMBIENT_C: f64 = 30.0;
/// 이 값을 넘는 선간 전압은 3상으로 본다 [V].
pub const THREE_PHASE_THRESHOLD_V: f64 = 300.0;

/// 열거형 문자열 파싱 실패.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("알 수 없는 {kind} 값: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// 부하 용도(설치 시나리오).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Scenario {
    #[serde(rename = "lighting")]
    Lighting,
    #[serde(rename = "homeAC")]
    HomeAc,
    #[default]
    #[serde(rename = "general")]
    General,
    #[serde(rename = "industrial")]
    Industrial,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::Lighting,
        Scenario::HomeAc,
        Scenario::General,
        Scenario::Industrial,
    ];

    pub fn as_code(&self) -> &'static str {
        match self {
            Scenario::Lighting => "lighting",
            Scenario::HomeAc => "homeAC",
            Scenario::General => "general",
            Scenario::Industrial => "industrial",
        }
    }

    pub fn label_key(&self) -> &'static str {
        match self {
            Scenario::Lighting => keys::SCENARIO_LIGHTING,
            Scenario::HomeAc => keys::SCENARIO_HOME_AC,
            Scenario::General => keys::SCENARIO_GENERAL,
            Scenario::Industrial => keys::SCENARIO_INDUSTRIAL,
        }
    }

    /// 결과 화면에 붙는 시나리오별 설계 메모.
    pub fn strategy_key(&self) -> &'static str {
        match self {
            Scenario::Lighting => keys::STRATEGY_LIGHTING,
            Scenario::HomeAc => keys::STRATEGY_HOME_AC,
            Scenario::General => keys::STRATEGY_GENERAL,
            Scenario::Industrial => keys::STRATEGY_INDUSTRIAL,
        }
    }

    /// 이 시나리오의 기본 설계 정책.
    pub fn policy(self) -> &'static ScenarioPolicy {
        let idx = match self {
            Scenario::Lighting => 0,
            Scenario::HomeAc => 1,
            Scenario::General => 2,
            Scenario::Industrial => 3,
        };
        &SCENARIO_POLICIES[idx]
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

impl FromStr for Scenario {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lighting" | "light" => Ok(Scenario::Lighting),
            "homeac" | "home-ac" | "ac" => Ok(Scenario::HomeAc),
            "general" => Ok(Scenario::General),
            "industrial" => Ok(Scenario::Industrial),
            _ => Err(ParseEnumError::new("scenario", s)),
        }
    }
}

/// 시나리오별 기본값 묶음. 분기 대신 이 테이블 하나로 정책을 관리한다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioPolicy {
    pub scenario: Scenario,
    /// basic 모드 역률
    pub power_factor: f64,
    /// basic 모드 허용 전압강하 [%]
    pub drop_limit_pct: f64,
    /// 기동 전류 여유 배수
    pub ib_factor: f64,
    /// 열적 선정 후 올리는 단면적 단계 수
    pub margin_steps: usize,
}

pub const SCENARIO_POLICIES: [ScenarioPolicy; 4] = [
    ScenarioPolicy {
        scenario: Scenario::Lighting,
        power_factor: 0.95,
        drop_limit_pct: 3.0,
        ib_factor: 1.0,
        margin_steps: 0,
    },
    ScenarioPolicy {
        scenario: Scenario::HomeAc,
        power_factor: 0.82,
        drop_limit_pct: 5.0,
        ib_factor: 1.0,
        margin_steps: 1,
    },
    ScenarioPolicy {
        scenario: Scenario::General,
        power_factor: 0.85,
        drop_limit_pct: 5.0,
        ib_factor: 1.3,
        margin_steps: 0,
    },
    ScenarioPolicy {
        scenario: Scenario::Industrial,
        power_factor: 0.85,
        drop_limit_pct: 5.0,
        ib_factor: 1.0,
        margin_steps: 2,
    },
];

/// 포설 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MountType {
    Surface,
    #[default]
    Concealed,
}

impl MountType {
    pub const ALL: [MountType; 2] = [MountType::Surface, MountType::Concealed];

    pub fn as_code(&self) -> &'static str {
        match self {
            MountType::Surface => "surface",
            MountType::Concealed => "concealed",
        }
    }

    pub fn label_key(&self) -> &'static str {
        match self {
            MountType::Surface => keys::MOUNT_SURFACE,
            MountType::Concealed => keys::MOUNT_CONCEALED,
        }
    }

    /// 방열 조건에 따른 보정계수 km. 매입(전선관)은 20% 감소.
    pub fn derating(&self) -> f64 {
        match self {
            MountType::Surface => 1.0,
            MountType::Concealed => 0.8,
        }
    }
}

impl fmt::Display for MountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

impl FromStr for MountType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "surface" | "exposed" => Ok(MountType::Surface),
            "concealed" | "conduit" => Ok(MountType::Concealed),
            _ => Err(ParseEnumError::new("mount type", s)),
        }
    }
}

/// 도체 재질.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Material {
    #[default]
    #[serde(rename = "CU")]
    Copper,
    #[serde(rename = "AL")]
    Aluminum,
}

impl Material {
    pub const ALL: [Material; 2] = [Material::Copper, Material::Aluminum];

    pub fn as_code(&self) -> &'static str {
        match self {
            Material::Copper => "CU",
            Material::Aluminum => "AL",
        }
    }

    pub fn label_key(&self) -> &'static str {
        match self {
            Material::Copper => keys::MATERIAL_CU,
            Material::Aluminum => keys::MATERIAL_AL,
        }
    }

    /// 저항률 [Ω·mm²/m].
    pub fn resistivity(&self) -> f64 {
        match self {
            Material::Copper => 0.0178,
            Material::Aluminum => 0.0285,
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

impl FromStr for Material {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cu" | "copper" => Ok(Material::Copper),
            "al" | "aluminum" | "aluminium" => Ok(Material::Aluminum),
            _ => Err(ParseEnumError::new("material", s)),
        }
    }
}

/// 계산 모드. basic은 시나리오 기본값, pro는 사용자 지정값을 쓴다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizingMode {
    #[default]
    Basic,
    Pro,
}

impl SizingMode {
    pub fn as_code(&self) -> &'static str {
        match self {
            SizingMode::Basic => "basic",
            SizingMode::Pro => "pro",
        }
    }
}

impl fmt::Display for SizingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

impl FromStr for SizingMode {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(SizingMode::Basic),
            "pro" | "expert" => Ok(SizingMode::Pro),
            _ => Err(ParseEnumError::new("mode", s)),
        }
    }
}

/// 요구 전류 이상인 가장 작은 표준 차단기. 없으면 최대 정격.
pub fn select_breaker(required_a: f64) -> u32 {
    BREAKER_RATINGS_A
        .iter()
        .copied()
        .find(|&b| f64::from(b) >= required_a)
        .unwrap_or(BREAKER_RATINGS_A[BREAKER_RATINGS_A.len() - 1])
}

/// 기준 허용전류가 목표값 이상인 가장 작은 단면적의 인덱스. 없으면 마지막 인덱스.
pub fn base_size_index(target_capacity_a: f64) -> usize {
    CABLE_SIZES
        .iter()
        .position(|s| s.ampacity_a >= target_capacity_a)
        .unwrap_or(CABLE_SIZES.len() - 1)
}

pub fn is_standard_breaker(rating_a: u32) -> bool {
    BREAKER_RATINGS_A.contains(&rating_a)
}

pub fn is_standard_size(mm2: f64) -> bool {
    CABLE_SIZES.iter().any(|s| s.mm2 == mm2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_ascending() {
        assert!(BREAKER_RATINGS_A.windows(2).all(|w| w[0] < w[1]));
        assert!(CABLE_SIZES.windows(2).all(|w| w[0].mm2 < w[1].mm2));
        assert!(CABLE_SIZES
            .windows(2)
            .all(|w| w[0].ampacity_a < w[1].ampacity_a));
    }

    #[test]
    fn policy_lookup_matches_scenario() {
        for scenario in Scenario::ALL {
            assert_eq!(scenario.policy().scenario, scenario);
        }
        assert_eq!(Scenario::HomeAc.policy().margin_steps, 1);
        assert_eq!(Scenario::Industrial.policy().margin_steps, 2);
        assert!((Scenario::General.policy().ib_factor - 1.3).abs() < 1e-12);
    }

    #[test]
    fn breaker_falls_back_to_largest() {
        assert_eq!(select_breaker(0.5), 6);
        assert_eq!(select_breaker(43.6), 50);
        assert_eq!(select_breaker(50.0), 50);
        assert_eq!(select_breaker(10_000.0), 630);
    }

    #[test]
    fn base_index_falls_back_to_largest() {
        assert_eq!(base_size_index(18.0), 0);
        assert_eq!(base_size_index(43.57), 4);
        assert_eq!(base_size_index(900.0), CABLE_SIZES.len() - 1);
    }

    #[test]
    fn enum_codes_parse_back() {
        assert_eq!("homeAC".parse::<Scenario>(), Ok(Scenario::HomeAc));
        assert_eq!("CU".parse::<Material>(), Ok(Material::Copper));
        assert_eq!("al".parse::<Material>(), Ok(Material::Aluminum));
        assert_eq!("Concealed".parse::<MountType>(), Ok(MountType::Concealed));
        assert_eq!("pro".parse::<SizingMode>(), Ok(SizingMode::Pro));
        assert!("tunnel".parse::<MountType>().is_err());
    }
}
