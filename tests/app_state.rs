use wire_expert_toolbox::{
    app::{AppState, Navigator, Tab, Tool, Transition},
    i18n::{keys, Language, Translator},
};

#[test]
fn default_state_is_home_without_tool() {
    let s = AppState::default();
    assert_eq!(s.tab, Tab::Home);
    assert_eq!(s.tool, None);
    assert_eq!(s.language, Language::Cn);
}

#[test]
fn selecting_tab_closes_tool() {
    let mut nav = Navigator::new(AppState::new(Language::Kh));
    nav.dispatch(Transition::OpenTool(Tool::Market));
    let s = nav.dispatch(Transition::SelectTab(Tab::Tools));
    assert_eq!(s.tab, Tab::Tools);
    assert_eq!(s.tool, None);
    assert_eq!(s.language, Language::Kh);
}

#[test]
fn language_change_keeps_screen() {
    let s = AppState::default()
        .apply(Transition::OpenTool(Tool::Calc))
        .apply(Transition::SetLanguage(Language::En));
    assert_eq!(s.tool, Some(Tool::Calc));
    assert_eq!(s.language, Language::En);
}

#[test]
fn every_tab_and_tool_has_labels() {
    for code in ["cn", "en", "kh"] {
        let tr = Translator::new(code);
        for tab in Tab::ALL {
            assert!(!tr.t(tab.label_key()).is_empty());
        }
        for tool in Tool::ALL {
            assert!(!tr.t(tool.label_key()).is_empty());
            assert!(!tr.t(tool.desc_key()).is_empty());
        }
    }
}

#[test]
fn khmer_falls_back_to_english() {
    let kh = Translator::new("kh");
    let en = Translator::new("en");
    assert_eq!(kh.t(keys::MARKET_RANGE_OPTIONS), en.t(keys::MARKET_RANGE_OPTIONS));
    assert_ne!(kh.t(keys::TAB_HOME), en.t(keys::TAB_HOME));
}

#[test]
fn unknown_key_is_marked_missing() {
    assert_eq!(Translator::new("en").t("no.such.key"), "[missing translation]");
}
