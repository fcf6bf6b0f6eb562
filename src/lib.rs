//! 전기 설비 계산 도구 모음. 계산 로직을 라이브러리로 두고 CLI와 GUI가 함께 쓴다.
//!
//! 핵심은 [`cable::size_cable`]: 부하 조건으로부터 차단기와 케이블 단면적을 선정한다.

pub mod advisor;
pub mod antifake;
pub mod api;
pub mod app;
pub mod bill;
pub mod cable;
pub mod config;
pub mod i18n;
pub mod logging;
pub mod market;
pub mod ui_cli;
