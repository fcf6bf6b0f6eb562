use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const APP_TITLE: &str = "general.app_title";
    pub const APP_TAGLINE: &str = "general.app_tagline";
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";
    pub const BACK: &str = "general.back";

    pub const MAIN_MENU_TITLE: &str = "main_menu.title";
    pub const MAIN_MENU_CABLE: &str = "main_menu.cable";
    pub const MAIN_MENU_BILL: &str = "main_menu.bill";
    pub const MAIN_MENU_ANTIFAKE: &str = "main_menu.antifake";
    pub const MAIN_MENU_MARKET: &str = "main_menu.market";
    pub const MAIN_MENU_ADVISOR: &str = "main_menu.advisor";
    pub const MAIN_MENU_SETTINGS: &str = "main_menu.settings";
    pub const MAIN_MENU_EXIT: &str = "main_menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const PROMPT_SELECT: &str = "prompt.select";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";
    pub const ERROR_INVALID_NUMBER: &str = "error.invalid_number";

    pub const TAB_HOME: &str = "tab.home";
    pub const TAB_TOOLS: &str = "tab.tools";
    pub const TAB_PROFILE: &str = "tab.profile";

    pub const TOOL_CALC: &str = "tool.calc";
    pub const TOOL_CALC_DESC: &str = "tool.calc_desc";
    pub const TOOL_ANTIFAKE: &str = "tool.antifake";
    pub const TOOL_ANTIFAKE_DESC: &str = "tool.antifake_desc";
    pub const TOOL_MARKET: &str = "tool.market";
    pub const TOOL_MARKET_DESC: &str = "tool.market_desc";
    pub const TOOL_BILL: &str = "tool.bill";
    pub const TOOL_BILL_DESC: &str = "tool.bill_desc";
    pub const TOOL_ADVISOR: &str = "tool.advisor";
    pub const TOOL_ADVISOR_DESC: &str = "tool.advisor_desc";

    pub const CABLE_HEADING: &str = "cable.heading";
    pub const CABLE_MODE_BASIC: &str = "cable.mode_basic";
    pub const CABLE_MODE_PRO: &str = "cable.mode_pro";
    pub const CABLE_CALCULATE: &str = "cable.calculate";
    pub const CABLE_REMOTE: &str = "cable.remote";
    pub const CABLE_SHARE: &str = "cable.share";
    pub const CABLE_COPIED: &str = "cable.copied";
    pub const CABLE_SAVE_REPORT: &str = "cable.save_report";
    pub const CABLE_SAVED: &str = "cable.saved";
    pub const CABLE_SCENARIO_OPTIONS: &str = "cable.scenario_options";
    pub const CABLE_MOUNT_OPTIONS: &str = "cable.mount_options";
    pub const CABLE_MATERIAL_OPTIONS: &str = "cable.material_options";
    pub const CABLE_MODE_OPTIONS: &str = "cable.mode_options";
    pub const PROMPT_POWER_KW: &str = "prompt.power_kw";
    pub const PROMPT_VOLTAGE: &str = "prompt.voltage";
    pub const PROMPT_DISTANCE: &str = "prompt.distance";
    pub const PROMPT_AMBIENT: &str = "prompt.ambient";
    pub const PROMPT_POWER_FACTOR: &str = "prompt.power_factor";
    pub const PROMPT_DROP_LIMIT: &str = "prompt.drop_limit";
    pub const PROMPT_GROUP_FACTOR: &str = "prompt.group_factor";
    pub const LABEL_SCENARIO: &str = "label.scenario";
    pub const LABEL_MOUNT: &str = "label.mount";
    pub const LABEL_MATERIAL: &str = "label.material";
    pub const LABEL_MODE: &str = "label.mode";
    pub const RESULT_LOAD_CURRENT: &str = "result.load_current";
    pub const RESULT_BREAKER: &str = "result.breaker";
    pub const RESULT_CABLE: &str = "result.cable";
    pub const RESULT_DROP: &str = "result.drop";
    pub const SCENARIO_LIGHTING: &str = "scenario.lighting";
    pub const SCENARIO_HOME_AC: &str = "scenario.home_ac";
    pub const SCENARIO_GENERAL: &str = "scenario.general";
    pub const SCENARIO_INDUSTRIAL: &str = "scenario.industrial";
    pub const STRATEGY_LIGHTING: &str = "strategy.lighting";
    pub const STRATEGY_HOME_AC: &str = "strategy.home_ac";
    pub const STRATEGY_GENERAL: &str = "strategy.general";
    pub const STRATEGY_INDUSTRIAL: &str = "strategy.industrial";
    pub const MOUNT_SURFACE: &str = "mount.surface";
    pub const MOUNT_CONCEALED: &str = "mount.concealed";
    pub const MATERIAL_CU: &str = "material.cu";
    pub const MATERIAL_AL: &str = "material.al";

    pub const BILL_HEADING: &str = "bill.heading";
    pub const PROMPT_BILL_POWER: &str = "prompt.bill_power";
    pub const PROMPT_BILL_HOURS: &str = "prompt.bill_hours";
    pub const PROMPT_BILL_PRICE: &str = "prompt.bill_price";
    pub const RESULT_DAILY_KWH: &str = "result.daily_kwh";
    pub const RESULT_DAILY_COST: &str = "result.daily_cost";
    pub const RESULT_MONTHLY_COST: &str = "result.monthly_cost";
    pub const RESULT_YEARLY_COST: &str = "result.yearly_cost";

    pub const ANTIFAKE_HEADING: &str = "antifake.heading";
    pub const ANTIFAKE_MODE_VALUE: &str = "antifake.mode_value";
    pub const ANTIFAKE_MODE_VISUAL: &str = "antifake.mode_visual";
    pub const ANTIFAKE_OPTIONS: &str = "antifake.options";
    pub const PROMPT_CROSS_SECTION: &str = "prompt.cross_section";
    pub const PROMPT_LENGTH: &str = "prompt.length";
    pub const PROMPT_COPPER_PRICE: &str = "prompt.copper_price";
    pub const PROMPT_PAID_PRICE: &str = "prompt.paid_price";
    pub const RESULT_COPPER_WEIGHT: &str = "result.copper_weight";
    pub const RESULT_COPPER_VALUE: &str = "result.copper_value";
    pub const RESULT_PRICE_RATIO: &str = "result.price_ratio";
    pub const RESULT_COPPER_SHARE: &str = "result.copper_share";
    pub const ANTIFAKE_SAFE: &str = "antifake.safe";
    pub const ANTIFAKE_SUSPICIOUS: &str = "antifake.suspicious";
    pub const ANTIFAKE_DANGER: &str = "antifake.danger";
    pub const INSPECT_COPPER_COLOR_TITLE: &str = "inspect.copper_color_title";
    pub const INSPECT_COPPER_COLOR_DESC: &str = "inspect.copper_color_desc";
    pub const INSPECT_INSULATION_TITLE: &str = "inspect.insulation_title";
    pub const INSPECT_INSULATION_DESC: &str = "inspect.insulation_desc";
    pub const INSPECT_CONCENTRIC_TITLE: &str = "inspect.concentric_title";
    pub const INSPECT_CONCENTRIC_DESC: &str = "inspect.concentric_desc";
    pub const INSPECT_MARKING_TITLE: &str = "inspect.marking_title";
    pub const INSPECT_MARKING_DESC: &str = "inspect.marking_desc";

    pub const MARKET_HEADING: &str = "market.heading";
    pub const MARKET_LATEST: &str = "market.latest";
    pub const MARKET_CHANGE: &str = "market.change";
    pub const MARKET_HIGH: &str = "market.high";
    pub const MARKET_LOW: &str = "market.low";
    pub const MARKET_PER_KG: &str = "market.per_kg";
    pub const MARKET_REFRESH: &str = "market.refresh";
    pub const MARKET_LOADING: &str = "market.loading";
    pub const MARKET_OFFLINE: &str = "market.offline";
    pub const MARKET_UPDATED: &str = "market.updated";
    pub const MARKET_RANGE_OPTIONS: &str = "market.range_options";
    pub const MARKET_RANGE_DAY: &str = "market.range_day";
    pub const MARKET_RANGE_WEEK: &str = "market.range_week";
    pub const MARKET_RANGE_MONTH: &str = "market.range_month";

    pub const ADVISOR_HEADING: &str = "advisor.heading";
    pub const ADVISOR_GREETING: &str = "advisor.greeting";
    pub const ADVISOR_PROMPT: &str = "advisor.prompt";
    pub const ADVISOR_SEND: &str = "advisor.send";
    pub const ADVISOR_THINKING: &str = "advisor.thinking";
    pub const ADVISOR_EXIT_HINT: &str = "advisor.exit_hint";
    pub const ADVISOR_CONNECTION_ERROR: &str = "advisor.connection_error";

    pub const SETTINGS_HEADING: &str = "settings.heading";
    pub const SETTINGS_CURRENT_LANGUAGE: &str = "settings.current_language";
    pub const SETTINGS_OPTIONS: &str = "settings.options";
    pub const SETTINGS_PROMPT_CHANGE: &str = "settings.prompt_change";
    pub const SETTINGS_INVALID: &str = "settings.invalid";
    pub const SETTINGS_SAVED: &str = "settings.saved";
    pub const PROFILE_LANGUAGE: &str = "profile.language";
    pub const PROFILE_SERVER: &str = "profile.server";
    pub const PROFILE_VERSION: &str = "profile.version";
}

/// 지원 언어. 기본은 중국어.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    Cn,
    En,
    Kh,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Cn, Language::En, Language::Kh];

    /// 정규화된 코드(cn/en/kh)만 받는다.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "cn" => Some(Language::Cn),
            "en" => Some(Language::En),
            "kh" => Some(Language::Kh),
            _ => None,
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Cn => "cn",
            Language::En => "en",
            Language::Kh => "kh",
        }
    }

    /// 언어 선택기에 보여줄 자국어 이름.
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::Cn => "中文",
            Language::En => "English",
            Language::Kh => "ខ្មែរ",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드로 번역기를 생성한다. 알 수 없는 코드는 cn으로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: normalize_lang(lang_code).unwrap_or_default(),
            overrides: None,
        }
    }

    /// 언어 코드 + 언어팩 디렉터리(locales/ 등)를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let lang = normalize_lang(lang_code).unwrap_or_default();
        let overrides = pack_dir
            .and_then(|dir| load_overrides(dir, lang))
            .or_else(|| load_overrides("locales", lang));
        Self { lang, overrides }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    pub fn language_code(&self) -> &'static str {
        self.lang.as_code()
    }

    /// 언어팩에서 키를 조회한다. 언어팩에 없으면 None.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.overrides.as_ref().and_then(|m| m.get(key).cloned())
    }

    /// 번역을 가져온다. 언어팩 → 현재 언어 → en → cn 순으로 찾는다.
    pub fn t(&self, key: &str) -> Cow<'static, str> {
        if let Some(v) = self.lookup(key) {
            return Cow::Owned(v);
        }
        let builtin = match self.lang {
            Language::Kh => kh(key).or_else(|| en(key)).unwrap_or_else(|| cn(key)),
            Language::En => en(key).unwrap_or_else(|| cn(key)),
            Language::Cn => cn(key),
        };
        Cow::Borrowed(builtin)
    }
}

/// CLI 플래그/설정/시스템 순으로 언어를 결정한다.
pub fn resolve_language(cli_arg: Option<&str>, config_lang: &str) -> Language {
    cli_arg
        .and_then(normalize_lang)
        .or_else(|| normalize_lang(config_lang))
        .or_else(detect_system_language)
        .unwrap_or_default()
}

/// 사용자 입력/로케일 문자열을 지원 언어로 바꾼다. "auto"와 빈 값은 None.
pub fn normalize_lang(code: &str) -> Option<Language> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "auto" | "" => None,
        "cn" | "zh" => Some(Language::Cn),
        "en" => Some(Language::En),
        "kh" | "km" => Some(Language::Kh),
        other if other.starts_with("zh") => Some(Language::Cn),
        other if other.starts_with("en") => Some(Language::En),
        other if other.starts_with("km") => Some(Language::Kh),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<Language> {
    let lang = loc.split(['.', '_', '-']).next().unwrap_or_default();
    normalize_lang(lang)
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<Language> {
    if let Some(lang) = get_locale().as_deref().and_then(normalize_locale_string) {
        return Some(lang);
    }
    for var in ["LC_ALL", "LANG"] {
        if let Ok(value) = std::env::var(var) {
            if let Some(lang) = normalize_locale_string(&value) {
                return Some(lang);
            }
        }
    }
    None
}

/// `{dir}/{code}.toml` 언어팩을 로드한다.
fn load_overrides(dir: &str, lang: Language) -> Option<HashMap<String, String>> {
    let path = Path::new(dir).join(format!("{}.toml", lang.as_code()));
    let content = fs::read_to_string(path).ok()?;
    parse_toml_to_map(&content)
}

/// 중첩 테이블을 점(.)으로 이은 평탄한 키 맵으로 바꾼다.
pub fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

fn cn(key: &str) -> &'static str {
    use keys::*;
    match key {
        APP_TITLE => "电工专家工具箱",
        APP_TAGLINE => "专业电缆选型与电工工具",
        ERROR_PREFIX => "错误",
        APP_EXIT => "程序已退出。",
        BACK => "返回",
        MAIN_MENU_TITLE => "\n=== 电工专家工具箱 ===",
        MAIN_MENU_CABLE => "1) 电缆选型计算",
        MAIN_MENU_BILL => "2) 电费估算",
        MAIN_MENU_ANTIFAKE => "3) 假电缆鉴别",
        MAIN_MENU_MARKET => "4) 铜价行情",
        MAIN_MENU_ADVISOR => "5) AI 顾问",
        MAIN_MENU_SETTINGS => "6) 设置",
        MAIN_MENU_EXIT => "0) 退出",
        PROMPT_MENU_SELECT => "请选择菜单: ",
        PROMPT_SELECT => "选择: ",
        INVALID_SELECTION_RETRY => "输入无效，请重新选择。",
        ERROR_INVALID_NUMBER => "请输入数字。",
        TAB_HOME => "首页",
        TAB_TOOLS => "工具",
        TAB_PROFILE => "我的",
        TOOL_CALC => "电缆选型",
        TOOL_CALC_DESC => "按负载、距离和敷设方式推荐线径与断路器",
        TOOL_ANTIFAKE => "假电缆鉴别",
        TOOL_ANTIFAKE_DESC => "用铜价核算电缆是否偷工减料",
        TOOL_MARKET => "铜价行情",
        TOOL_MARKET_DESC => "LME 现货铜价与走势",
        TOOL_BILL => "电费估算",
        TOOL_BILL_DESC => "按功率和使用时长估算电费",
        TOOL_ADVISOR => "AI 顾问",
        TOOL_ADVISOR_DESC => "电工问题随时问",
        CABLE_HEADING => "\n-- 电缆选型计算 --",
        CABLE_MODE_BASIC => "基础模式",
        CABLE_MODE_PRO => "专业模式",
        CABLE_CALCULATE => "计算",
        CABLE_REMOTE => "使用云端计算",
        CABLE_SHARE => "复制分享文本",
        CABLE_COPIED => "已复制到剪贴板",
        CABLE_SAVE_REPORT => "保存报告",
        CABLE_SAVED => "报告已保存:",
        CABLE_SCENARIO_OPTIONS => "场景: 1) 照明  2) 家用空调  3) 一般动力  4) 工业",
        CABLE_MOUNT_OPTIONS => "敷设: 1) 明敷  2) 暗敷(穿管)",
        CABLE_MATERIAL_OPTIONS => "导体: 1) 铜  2) 铝",
        CABLE_MODE_OPTIONS => "模式: 1) 基础  2) 专业",
        PROMPT_POWER_KW => "负载功率 [kW]: ",
        PROMPT_VOLTAGE => "线电压 [V] (220/380/400): ",
        PROMPT_DISTANCE => "线路长度 [m]: ",
        PROMPT_AMBIENT => "环境温度 [°C]: ",
        PROMPT_POWER_FACTOR => "功率因数 (0~1]: ",
        PROMPT_DROP_LIMIT => "允许压降 [%]: ",
        PROMPT_GROUP_FACTOR => "成组系数 (≥1): ",
        LABEL_SCENARIO => "使用场景",
        LABEL_MOUNT => "敷设方式",
        LABEL_MATERIAL => "导体材料",
        LABEL_MODE => "计算模式",
        RESULT_LOAD_CURRENT => "负载电流:",
        RESULT_BREAKER => "推荐断路器:",
        RESULT_CABLE => "推荐线径:",
        RESULT_DROP => "电压降:",
        SCENARIO_LIGHTING => "照明",
        SCENARIO_HOME_AC => "家用空调",
        SCENARIO_GENERAL => "一般动力",
        SCENARIO_INDUSTRIAL => "工业",
        STRATEGY_LIGHTING => "照明回路压降限值 3%，保证灯光不闪烁。",
        STRATEGY_HOME_AC => "空调启动电流大，线径已加大一级。",
        STRATEGY_GENERAL => "已按 1.3 倍启动余量计算负载电流。",
        STRATEGY_INDUSTRIAL => "工业负载长期满载运行，线径已加大两级。",
        MOUNT_SURFACE => "明敷",
        MOUNT_CONCEALED => "暗敷(穿管)",
        MATERIAL_CU => "铜",
        MATERIAL_AL => "铝",
        BILL_HEADING => "\n-- 电费估算 --",
        PROMPT_BILL_POWER => "设备功率 [kW]: ",
        PROMPT_BILL_HOURS => "每天使用时长 [h]: ",
        PROMPT_BILL_PRICE => "电价 [/kWh]: ",
        RESULT_DAILY_KWH => "日用电量:",
        RESULT_DAILY_COST => "日电费:",
        RESULT_MONTHLY_COST => "月电费 (30 天):",
        RESULT_YEARLY_COST => "年电费 (365 天):",
        ANTIFAKE_HEADING => "\n-- 假电缆鉴别 --",
        ANTIFAKE_MODE_VALUE => "价格核算",
        ANTIFAKE_MODE_VISUAL => "外观检查",
        ANTIFAKE_OPTIONS => "1) 价格核算  2) 外观检查",
        PROMPT_CROSS_SECTION => "标称截面 [mm²]: ",
        PROMPT_LENGTH => "长度 [m]: ",
        PROMPT_COPPER_PRICE => "LME 铜价 [USD/t]: ",
        PROMPT_PAID_PRICE => "购买价格 [USD]: ",
        RESULT_COPPER_WEIGHT => "理论铜重:",
        RESULT_COPPER_VALUE => "铜材价值:",
        RESULT_PRICE_RATIO => "售价/铜价比:",
        RESULT_COPPER_SHARE => "铜价占售价:",
        ANTIFAKE_SAFE => "价格合理",
        ANTIFAKE_SUSPICIOUS => "价格可疑，请检查实际线径",
        ANTIFAKE_DANGER => "高风险：售价接近或低于铜材成本，极可能是假电缆",
        INSPECT_COPPER_COLOR_TITLE => "铜芯颜色",
        INSPECT_COPPER_COLOR_DESC => "纯铜呈紫红色，发黄或发白可能掺杂或为铜包铝。",
        INSPECT_INSULATION_TITLE => "绝缘层",
        INSPECT_INSULATION_DESC => "绝缘层应有弹性、难以撕开，火烧后离火自熄。",
        INSPECT_CONCENTRIC_TITLE => "偏心度",
        INSPECT_CONCENTRIC_DESC => "剖开截面，导体应位于正中，绝缘厚度均匀。",
        INSPECT_MARKING_TITLE => "印字标识",
        INSPECT_MARKING_DESC => "应清晰印有厂名、型号、截面和认证标志。",
        MARKET_HEADING => "\n-- 铜价行情 --",
        MARKET_LATEST => "最新价",
        MARKET_CHANGE => "涨跌幅",
        MARKET_HIGH => "最高",
        MARKET_LOW => "最低",
        MARKET_PER_KG => "每公斤",
        MARKET_REFRESH => "刷新",
        MARKET_LOADING => "加载中…",
        MARKET_OFFLINE => "无法连接行情服务，显示参考价格。",
        MARKET_UPDATED => "更新时间:",
        MARKET_RANGE_OPTIONS => "区间: 1) 日  2) 周  3) 月",
        MARKET_RANGE_DAY => "日",
        MARKET_RANGE_WEEK => "周",
        MARKET_RANGE_MONTH => "月",
        ADVISOR_HEADING => "\n-- AI 顾问 --",
        ADVISOR_GREETING => "你好！我是电工 AI 顾问，有什么可以帮你？",
        ADVISOR_PROMPT => "提问 (空行返回): ",
        ADVISOR_SEND => "发送",
        ADVISOR_THINKING => "思考中…",
        ADVISOR_EXIT_HINT => "输入空行返回主菜单。",
        ADVISOR_CONNECTION_ERROR => "连接出现问题，请稍后再试。",
        SETTINGS_HEADING => "\n-- 设置 --",
        SETTINGS_CURRENT_LANGUAGE => "当前语言:",
        SETTINGS_OPTIONS => "1) 中文  2) English  3) ខ្មែរ",
        SETTINGS_PROMPT_CHANGE => "输入编号更改 (回车取消): ",
        SETTINGS_INVALID => "输入无效，语言未更改。",
        SETTINGS_SAVED => "语言已更改为:",
        PROFILE_LANGUAGE => "语言",
        PROFILE_SERVER => "服务器地址",
        PROFILE_VERSION => "版本",
        _ => "[missing translation]",
    }
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        APP_TITLE => "WireExpert Toolbox",
        APP_TAGLINE => "Professional cable sizing and electrician tools",
        ERROR_PREFIX => "Error",
        APP_EXIT => "Exiting application.",
        BACK => "Back",
        MAIN_MENU_TITLE => "\n=== WireExpert Toolbox ===",
        MAIN_MENU_CABLE => "1) Cable Sizing",
        MAIN_MENU_BILL => "2) Electricity Bill",
        MAIN_MENU_ANTIFAKE => "3) Fake Cable Check",
        MAIN_MENU_MARKET => "4) Copper Market",
        MAIN_MENU_ADVISOR => "5) AI Advisor",
        MAIN_MENU_SETTINGS => "6) Settings",
        MAIN_MENU_EXIT => "0) Exit",
        PROMPT_MENU_SELECT => "Select menu: ",
        PROMPT_SELECT => "Select: ",
        INVALID_SELECTION_RETRY => "Invalid input. Please try again.",
        ERROR_INVALID_NUMBER => "Please enter a number.",
        TAB_HOME => "Home",
        TAB_TOOLS => "Tools",
        TAB_PROFILE => "Profile",
        TOOL_CALC => "Cable Sizing",
        TOOL_CALC_DESC => "Breaker and cross-section from load, distance and installation",
        TOOL_ANTIFAKE => "Fake Cable Check",
        TOOL_ANTIFAKE_DESC => "Compare the price against the copper it should contain",
        TOOL_MARKET => "Copper Market",
        TOOL_MARKET_DESC => "LME spot copper price and trend",
        TOOL_BILL => "Electricity Bill",
        TOOL_BILL_DESC => "Estimate running cost from power and hours",
        TOOL_ADVISOR => "AI Advisor",
        TOOL_ADVISOR_DESC => "Ask any wiring question",
        CABLE_HEADING => "\n-- Cable Sizing --",
        CABLE_MODE_BASIC => "Basic",
        CABLE_MODE_PRO => "Pro",
        CABLE_CALCULATE => "Calculate",
        CABLE_REMOTE => "Use cloud calculator",
        CABLE_SHARE => "Copy share text",
        CABLE_COPIED => "Copied to clipboard",
        CABLE_SAVE_REPORT => "Save report",
        CABLE_SAVED => "Report saved:",
        CABLE_SCENARIO_OPTIONS => "Scenario: 1) Lighting  2) Home AC  3) General  4) Industrial",
        CABLE_MOUNT_OPTIONS => "Installation: 1) Surface  2) Concealed (conduit)",
        CABLE_MATERIAL_OPTIONS => "Conductor: 1) Copper  2) Aluminum",
        CABLE_MODE_OPTIONS => "Mode: 1) Basic  2) Pro",
        PROMPT_POWER_KW => "Load power [kW]: ",
        PROMPT_VOLTAGE => "Line voltage [V] (220/380/400): ",
        PROMPT_DISTANCE => "Cable run length [m]: ",
        PROMPT_AMBIENT => "Ambient temperature [°C]: ",
        PROMPT_POWER_FACTOR => "Power factor (0~1]: ",
        PROMPT_DROP_LIMIT => "Allowed voltage drop [%]: ",
        PROMPT_GROUP_FACTOR => "Grouping factor (≥1): ",
        LABEL_SCENARIO => "Scenario",
        LABEL_MOUNT => "Installation",
        LABEL_MATERIAL => "Conductor",
        LABEL_MODE => "Mode",
        RESULT_LOAD_CURRENT => "Load current:",
        RESULT_BREAKER => "Recommended breaker:",
        RESULT_CABLE => "Recommended cable:",
        RESULT_DROP => "Voltage drop:",
        SCENARIO_LIGHTING => "Lighting",
        SCENARIO_HOME_AC => "Home AC",
        SCENARIO_GENERAL => "General",
        SCENARIO_INDUSTRIAL => "Industrial",
        STRATEGY_LIGHTING => "Lighting circuits are held to a 3% drop so lamps do not flicker.",
        STRATEGY_HOME_AC => "Compressor inrush: cable stepped up one size.",
        STRATEGY_GENERAL => "Load current includes a 1.3x starting margin.",
        STRATEGY_INDUSTRIAL => "Continuous duty: cable stepped up two sizes.",
        MOUNT_SURFACE => "Surface",
        MOUNT_CONCEALED => "Concealed (conduit)",
        MATERIAL_CU => "Copper",
        MATERIAL_AL => "Aluminum",
        BILL_HEADING => "\n-- Electricity Bill --",
        PROMPT_BILL_POWER => "Appliance power [kW]: ",
        PROMPT_BILL_HOURS => "Hours per day [h]: ",
        PROMPT_BILL_PRICE => "Tariff [/kWh]: ",
        RESULT_DAILY_KWH => "Daily energy:",
        RESULT_DAILY_COST => "Daily cost:",
        RESULT_MONTHLY_COST => "Monthly cost (30 days):",
        RESULT_YEARLY_COST => "Yearly cost (365 days):",
        ANTIFAKE_HEADING => "\n-- Fake Cable Check --",
        ANTIFAKE_MODE_VALUE => "Price check",
        ANTIFAKE_MODE_VISUAL => "Visual check",
        ANTIFAKE_OPTIONS => "1) Price check  2) Visual check",
        PROMPT_CROSS_SECTION => "Nominal cross-section [mm²]: ",
        PROMPT_LENGTH => "Length [m]: ",
        PROMPT_COPPER_PRICE => "LME copper [USD/t]: ",
        PROMPT_PAID_PRICE => "Price paid [USD]: ",
        RESULT_COPPER_WEIGHT => "Copper weight:",
        RESULT_COPPER_VALUE => "Copper value:",
        RESULT_PRICE_RATIO => "Price / copper ratio:",
        RESULT_COPPER_SHARE => "Copper share of price:",
        ANTIFAKE_SAFE => "Price looks reasonable",
        ANTIFAKE_SUSPICIOUS => "Suspicious price, measure the real conductor size",
        ANTIFAKE_DANGER => "High risk: price is at or below the copper cost, very likely fake",
        INSPECT_COPPER_COLOR_TITLE => "Copper colour",
        INSPECT_COPPER_COLOR_DESC => "Pure copper is reddish purple. Yellow or white cores suggest alloy or CCA.",
        INSPECT_INSULATION_TITLE => "Insulation",
        INSPECT_INSULATION_DESC => "Insulation should be elastic, hard to tear and self-extinguishing.",
        INSPECT_CONCENTRIC_TITLE => "Concentricity",
        INSPECT_CONCENTRIC_DESC => "Cut the cable: the conductor must sit centred with even insulation.",
        INSPECT_MARKING_TITLE => "Markings",
        INSPECT_MARKING_DESC => "Maker, type, cross-section and certification should be clearly printed.",
        MARKET_HEADING => "\n-- Copper Market --",
        MARKET_LATEST => "Latest",
        MARKET_CHANGE => "Change",
        MARKET_HIGH => "High",
        MARKET_LOW => "Low",
        MARKET_PER_KG => "per kg",
        MARKET_REFRESH => "Refresh",
        MARKET_LOADING => "Loading…",
        MARKET_OFFLINE => "Price service unreachable, showing reference prices.",
        MARKET_UPDATED => "Updated:",
        MARKET_RANGE_OPTIONS => "Range: 1) Day  2) Week  3) Month",
        MARKET_RANGE_DAY => "Day",
        MARKET_RANGE_WEEK => "Week",
        MARKET_RANGE_MONTH => "Month",
        ADVISOR_HEADING => "\n-- AI Advisor --",
        ADVISOR_GREETING => "Hi! I am your wiring advisor. How can I help?",
        ADVISOR_PROMPT => "Ask (empty line to return): ",
        ADVISOR_SEND => "Send",
        ADVISOR_THINKING => "Thinking…",
        ADVISOR_EXIT_HINT => "Enter an empty line to return to the menu.",
        ADVISOR_CONNECTION_ERROR => "I am having trouble connecting. Please try again later.",
        SETTINGS_HEADING => "\n-- Settings --",
        SETTINGS_CURRENT_LANGUAGE => "Current language:",
        SETTINGS_OPTIONS => "1) 中文  2) English  3) ខ្មែរ",
        SETTINGS_PROMPT_CHANGE => "Enter number to change (enter to cancel): ",
        SETTINGS_INVALID => "Invalid input; language unchanged.",
        SETTINGS_SAVED => "Language changed to:",
        PROFILE_LANGUAGE => "Language",
        PROFILE_SERVER => "Server",
        PROFILE_VERSION => "Version",
        _ => return None,
    })
}

/// 크메르어는 화면 골격만 번역되어 있고 나머지는 영어로 폴백한다.
fn kh(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        APP_TITLE => "ប្រអប់ឧបករណ៍អ្នកជំនាញខ្សែភ្លើង",
        ERROR_PREFIX => "កំហុស",
        APP_EXIT => "កំពុងចាកចេញ។",
        BACK => "ត្រឡប់ក្រោយ",
        MAIN_MENU_CABLE => "1) គណនាខ្សែភ្លើង",
        MAIN_MENU_BILL => "2) វិក្កយបត្រអគ្គិសនី",
        MAIN_MENU_ANTIFAKE => "3) ពិនិត្យខ្សែក្លែងក្លាយ",
        MAIN_MENU_MARKET => "4) តម្លៃស្ពាន់",
        MAIN_MENU_ADVISOR => "5) ទីប្រឹក្សា AI",
        MAIN_MENU_SETTINGS => "6) ការកំណត់",
        MAIN_MENU_EXIT => "0) ចាកចេញ",
        TAB_HOME => "ទំព័រដើម",
        TAB_TOOLS => "ឧបករណ៍",
        TAB_PROFILE => "ប្រវត្តិរូប",
        TOOL_CALC => "គណនាខ្សែភ្លើង",
        TOOL_ANTIFAKE => "ពិនិត្យខ្សែក្លែងក្លាយ",
        TOOL_MARKET => "តម្លៃស្ពាន់",
        TOOL_BILL => "វិក្កយបត្រអគ្គិសនី",
        TOOL_ADVISOR => "ទីប្រឹក្សា AI",
        CABLE_CALCULATE => "គណនា",
        ANTIFAKE_SAFE => "តម្លៃសមរម្យ",
        ANTIFAKE_SUSPICIOUS => "តម្លៃគួរឱ្យសង្ស័យ",
        ANTIFAKE_DANGER => "គ្រោះថ្នាក់ខ្ពស់",
        MARKET_REFRESH => "ធ្វើឱ្យថ្មី",
        ADVISOR_SEND => "ផ្ញើ",
        ADVISOR_CONNECTION_ERROR => "មានបញ្ហាក្នុងការភ្ជាប់។ សូមព្យាយាមម្តងទៀតនៅពេលក្រោយ។",
        SETTINGS_CURRENT_LANGUAGE => "ភាសាបច្ចុប្បន្ន:",
        PROFILE_LANGUAGE => "ភាសា",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_code_defaults_to_chinese() {
        assert_eq!(Translator::new("xx").language(), Language::Cn);
        assert_eq!(Translator::new("zh-CN").language(), Language::Cn);
        assert_eq!(Translator::new("km_KH").language(), Language::Kh);
    }

    #[test]
    fn khmer_falls_back_to_english() {
        let tr = Translator::new("kh");
        assert_eq!(tr.t(keys::TAB_HOME), "ទំព័រដើម");
        assert_eq!(tr.t(keys::MARKET_HIGH), "High");
    }

    #[test]
    fn every_key_has_chinese_text() {
        use keys::*;
        for key in [
            ADVISOR_CONNECTION_ERROR,
            ANTIFAKE_DANGER,
            INSPECT_MARKING_DESC,
            STRATEGY_INDUSTRIAL,
            PROFILE_VERSION,
        ] {
            assert_ne!(cn(key), "[missing translation]", "{key}");
            assert!(en(key).is_some(), "{key}");
        }
    }

    #[test]
    fn resolve_prefers_cli_then_config() {
        assert_eq!(resolve_language(Some("en"), "kh"), Language::En);
        assert_eq!(resolve_language(Some("auto"), "kh"), Language::Kh);
        assert_eq!(resolve_language(None, "cn"), Language::Cn);
    }

    #[test]
    fn toml_pack_is_flattened() {
        let map = parse_toml_to_map("[tab]\nhome = \"Start\"\n[general]\napp_exit = \"Bye\"")
            .expect("pack");
        assert_eq!(map.get("tab.home").map(String::as_str), Some("Start"));
        assert_eq!(map.get("general.app_exit").map(String::as_str), Some("Bye"));
    }

    #[test]
    fn pack_directory_overrides_builtin() {
        let dir = std::env::temp_dir().join(format!("wet_pack_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("en.toml"), "[tab]\nhome = \"Start\"\n").unwrap();
        let tr = Translator::new_with_pack("en", dir.to_str());
        assert_eq!(tr.t(keys::TAB_HOME), "Start");
        assert_eq!(tr.t(keys::TAB_TOOLS), "Tools");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
