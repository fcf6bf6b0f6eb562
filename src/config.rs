use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cable::SizingInput;

/// 기본 설정 파일 이름 (작업 디렉터리 기준).
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// 외부 서비스 접속 설정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// 요청 하나의 타임아웃 [s]
    pub timeout_secs: u64,
    /// 첫 시도 이후 재시도 횟수
    pub retries: u32,
    /// 첫 재시도 전 대기 [ms], 이후 두 배씩
    pub backoff_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_secs: 10,
            retries: 2,
            backoff_ms: 300,
        }
    }
}

/// 전기요금 화면 기본값.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillDefaults {
    pub price_per_kwh: f64,
    pub hours_per_day: f64,
}

impl Default for BillDefaults {
    fn default() -> Self {
        Self {
            price_per_kwh: 0.15,
            hours_per_day: 8.0,
        }
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// cn / en / kh 또는 auto(시스템 로케일)
    pub language: String,
    /// 언어팩(.toml) 디렉터리
    pub language_pack_dir: Option<String>,
    /// tracing 최대 레벨 (error/warn/info/debug/trace)
    pub log_level: String,
    /// GUI에서 CJK/크메르 글꼴로 쓸 파일 경로
    pub font_path: Option<String>,
    pub api: ApiConfig,
    /// 케이블 계산기 초기 입력값
    pub calculator: SizingInput,
    pub bill: BillDefaults,
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "auto".to_string(),
            language_pack_dir: None,
            log_level: "info".to_string(),
            font_path: None,
            api: ApiConfig::default(),
            calculator: SizingInput::default(),
            bill: BillDefaults::default(),
            path: None,
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("설정 파싱 오류: {0}")]
    Serde(#[from] toml::de::Error),
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// config.toml을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default() -> Result<Config, ConfigError> {
    load_from(DEFAULT_CONFIG_FILE)
}

/// 주어진 경로의 설정을 로드한다. 파일이 없으면 기본값으로 새로 만든다.
pub fn load_from(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let mut cfg = if path.exists() {
        let content = fs::read_to_string(path)?;
        toml::from_str::<Config>(&content)?
    } else {
        let cfg = Config::default();
        write_config(&cfg, path)?;
        cfg
    };
    cfg.path = Some(path.to_path_buf());
    Ok(cfg)
}

fn write_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(cfg)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

impl Config {
    /// 설정을 로드했던 파일(없으면 config.toml)에 저장한다.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = self
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        write_config(self, &path)
    }

    /// 지정한 경로에 저장하고 이후 저장 경로로 기억한다.
    pub fn save_to(&mut self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        write_config(self, path)?;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cable::Scenario;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("wet_cfg_{}_{name}", std::process::id()))
            .join("config.toml")
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let path = temp_path("create");
        let _ = fs::remove_file(&path);
        let cfg = load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.language, "auto");
        assert_eq!(cfg.path(), Some(path.as_path()));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let path = temp_path("partial");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            "language = \"en\"\n[api]\nretries = 5\n[calculator]\nscenario = \"industrial\"\n",
        )
        .unwrap();
        let cfg = load_from(&path).unwrap();
        assert_eq!(cfg.language, "en");
        assert_eq!(cfg.api.retries, 5);
        assert_eq!(cfg.api.timeout_secs, 10);
        assert_eq!(cfg.calculator.scenario, Scenario::Industrial);
        assert_eq!(cfg.calculator.rated_power_kw, 15.0);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn save_round_trips() {
        let path = temp_path("save");
        let mut cfg = Config {
            language: "kh".into(),
            ..Config::default()
        };
        cfg.save_to(&path).unwrap();
        let loaded = load_from(&path).unwrap();
        assert_eq!(loaded.language, "kh");
        assert_eq!(loaded.api, cfg.api);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn broken_toml_is_reported() {
        let path = temp_path("broken");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "language = [").unwrap();
        assert!(matches!(load_from(&path), Err(ConfigError::Serde(_))));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
