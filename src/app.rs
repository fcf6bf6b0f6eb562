use tracing::debug;

use crate::api::{ApiClient, ApiError};
use crate::cable::LocalSizer;
use crate::config::{Config, ConfigError};
use crate::i18n::{self, keys, Language, Translator};
use crate::ui_cli::{self, MenuChoice};
use crate::{antifake::AntiFakeError, bill::BillError, cable::SizingError};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    #[error("케이블 계산 오류: {0}")]
    Sizing(#[from] SizingError),
    #[error("전기요금 계산 오류: {0}")]
    Bill(#[from] BillError),
    #[error("위조 판별 오류: {0}")]
    AntiFake(#[from] AntiFakeError),
    #[error("원격 서비스 오류: {0}")]
    Api(#[from] ApiError),
    #[error("JSON 출력 오류: {0}")]
    Json(#[from] serde_json::Error),
}

/// 하단 탭.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Home,
    Tools,
    Profile,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Home, Tab::Tools, Tab::Profile];

    pub fn label_key(&self) -> &'static str {
        match self {
            Tab::Home => keys::TAB_HOME,
            Tab::Tools => keys::TAB_TOOLS,
            Tab::Profile => keys::TAB_PROFILE,
        }
    }
}

/// 탭 위에 열리는 도구 화면.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Calc,
    AntiFake,
    Market,
    Bill,
    Advisor,
}

impl Tool {
    pub const ALL: [Tool; 5] = [
        Tool::Calc,
        Tool::AntiFake,
        Tool::Market,
        Tool::Bill,
        Tool::Advisor,
    ];

    pub fn label_key(&self) -> &'static str {
        match self {
            Tool::Calc => keys::TOOL_CALC,
            Tool::AntiFake => keys::TOOL_ANTIFAKE,
            Tool::Market => keys::TOOL_MARKET,
            Tool::Bill => keys::TOOL_BILL,
            Tool::Advisor => keys::TOOL_ADVISOR,
        }
    }

    pub fn desc_key(&self) -> &'static str {
        match self {
            Tool::Calc => keys::TOOL_CALC_DESC,
            Tool::AntiFake => keys::TOOL_ANTIFAKE_DESC,
            Tool::Market => keys::TOOL_MARKET_DESC,
            Tool::Bill => keys::TOOL_BILL_DESC,
            Tool::Advisor => keys::TOOL_ADVISOR_DESC,
        }
    }
}

/// 화면 상태. 값 타입이며 전이마다 새 상태를 만든다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppState {
    pub tab: Tab,
    pub tool: Option<Tool>,
    pub language: Language,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// 탭을 고르면 열린 도구는 닫힌다.
    SelectTab(Tab),
    OpenTool(Tool),
    CloseTool,
    SetLanguage(Language),
}

impl AppState {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    pub fn apply(self, transition: Transition) -> AppState {
        match transition {
            Transition::SelectTab(tab) => AppState {
                tab,
                tool: None,
                ..self
            },
            Transition::OpenTool(tool) => AppState {
                tool: Some(tool),
                ..self
            },
            Transition::CloseTool => AppState { tool: None, ..self },
            Transition::SetLanguage(language) => AppState { language, ..self },
        }
    }
}

/// 보관하는 최근 전이 수. 넘치면 오래된 것부터 버린다.
pub const HISTORY_LIMIT: usize = 128;

/// 현재 상태와 이번 세션의 최근 전이 기록.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    state: AppState,
    history: Vec<Transition>,
}

impl Navigator {
    pub fn new(initial: AppState) -> Self {
        Self {
            state: initial,
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn history(&self) -> &[Transition] {
        &self.history
    }

    pub fn dispatch(&mut self, transition: Transition) -> AppState {
        let next = self.state.apply(transition);
        debug!(?transition, from = ?self.state, to = ?next, "state transition");
        self.state = next;
        if self.history.len() == HISTORY_LIMIT {
            self.history.remove(0);
        }
        self.history.push(transition);
        next
    }
}

/// CLI 애플리케이션의 메인 루프를 실행한다.
pub fn run(config: &mut Config, tr: &mut Translator) -> Result<(), AppError> {
    let client = ApiClient::from_config(&config.api);
    let mut nav = Navigator::new(AppState::new(tr.language()));
    loop {
        let tool = match ui_cli::main_menu(tr)? {
            MenuChoice::CableSizing => Tool::Calc,
            MenuChoice::Bill => Tool::Bill,
            MenuChoice::AntiFake => Tool::AntiFake,
            MenuChoice::Market => Tool::Market,
            MenuChoice::Advisor => Tool::Advisor,
            MenuChoice::Settings => {
                nav.dispatch(Transition::SelectTab(Tab::Profile));
                if let Some(lang) = ui_cli::handle_settings(tr, config)? {
                    nav.dispatch(Transition::SetLanguage(lang));
                    *tr = Translator::new_with_pack(
                        lang.as_code(),
                        config.language_pack_dir.as_deref(),
                    );
                    config.save()?;
                }
                nav.dispatch(Transition::SelectTab(Tab::Home));
                continue;
            }
            MenuChoice::Exit => {
                config.save()?;
                println!("{}", tr.t(i18n::keys::APP_EXIT));
                break;
            }
        };

        nav.dispatch(Transition::OpenTool(tool));
        let outcome = match tool {
            Tool::Calc => ui_cli::handle_cable_sizing(tr, config, &LocalSizer),
            Tool::Bill => ui_cli::handle_bill(tr, config),
            Tool::AntiFake => ui_cli::handle_antifake(tr, &client),
            Tool::Market => ui_cli::handle_market(tr, &client),
            Tool::Advisor => ui_cli::handle_advisor(tr, &client),
        };
        nav.dispatch(Transition::CloseTool);

        // 계산 입력 오류는 메뉴로 돌아가고, 입출력 오류만 루프를 끝낸다.
        match outcome {
            Ok(()) => {}
            Err(AppError::Io(e)) => return Err(AppError::Io(e)),
            Err(e) => println!("{}: {e}", tr.t(keys::ERROR_PREFIX)),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_tool_keeps_tab() {
        let s = AppState::default()
            .apply(Transition::SelectTab(Tab::Tools))
            .apply(Transition::OpenTool(Tool::Bill));
        assert_eq!(s.tab, Tab::Tools);
        assert_eq!(s.tool, Some(Tool::Bill));
    }

    #[test]
    fn navigator_records_history() {
        let mut nav = Navigator::new(AppState::new(Language::En));
        nav.dispatch(Transition::OpenTool(Tool::Calc));
        nav.dispatch(Transition::CloseTool);
        assert_eq!(nav.history().len(), 2);
        assert_eq!(nav.state().tool, None);
        assert_eq!(nav.state().language, Language::En);
    }

    #[test]
    fn history_keeps_only_recent_transitions() {
        let mut nav = Navigator::default();
        for _ in 0..HISTORY_LIMIT {
            nav.dispatch(Transition::SelectTab(Tab::Tools));
        }
        nav.dispatch(Transition::OpenTool(Tool::Market));
        assert_eq!(nav.history().len(), HISTORY_LIMIT);
        assert_eq!(nav.history().last(), Some(&Transition::OpenTool(Tool::Market)));
        assert_eq!(nav.state().tool, Some(Tool::Market));
    }
}
