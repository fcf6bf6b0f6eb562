//! 케이블 선정 엔진: 부하 전류, 차단기, 단면적, 전압강하.

pub mod request;
pub mod sizing;
pub mod tables;

pub use request::*;
pub use sizing::*;
pub use tables::*;

/// 같은 입력 스키마로 선정 결과를 내는 계산 경로. 로컬 엔진과 원격 API가 구현한다.
pub trait CableSizer {
    type Error: std::error::Error;

    fn size(&self, input: &SizingInput) -> Result<SizingResult, Self::Error>;
}

/// 이 크레이트 안의 순수 계산 엔진.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSizer;

impl CableSizer for LocalSizer {
    type Error = SizingError;

    fn size(&self, input: &SizingInput) -> Result<SizingResult, SizingError> {
        size_cable(input)
    }
}
