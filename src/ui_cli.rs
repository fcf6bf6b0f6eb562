use std::io::{self, BufRead, Write};

use crate::advisor::Conversation;
use crate::antifake::{self, ValueCheckInput, ValueVerdict};
use crate::api::ApiClient;
use crate::app::AppError;
use crate::bill::{self, BillEstimate, BillInput};
use crate::cable::{
    share_text, CableSizer, Material, MountType, Scenario, SizingInput, SizingMode, SizingResult,
};
use crate::config::Config;
use crate::i18n::{keys, Language, Translator};
use crate::market::{MarketSnapshot, MarketSummary, PriceRange, MARKET_NAME};

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    CableSizing,
    Bill,
    AntiFake,
    Market,
    Advisor,
    Settings,
    Exit,
}

/// 메뉴 번호를 선택지로 바꾼다.
pub fn parse_menu_choice(sel: &str) -> Option<MenuChoice> {
    match sel.trim() {
        "1" => Some(MenuChoice::CableSizing),
        "2" => Some(MenuChoice::Bill),
        "3" => Some(MenuChoice::AntiFake),
        "4" => Some(MenuChoice::Market),
        "5" => Some(MenuChoice::Advisor),
        "6" => Some(MenuChoice::Settings),
        "0" => Some(MenuChoice::Exit),
        _ => None,
    }
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu(tr: &Translator) -> Result<MenuChoice, AppError> {
    for key in [
        keys::MAIN_MENU_TITLE,
        keys::MAIN_MENU_CABLE,
        keys::MAIN_MENU_BILL,
        keys::MAIN_MENU_ANTIFAKE,
        keys::MAIN_MENU_MARKET,
        keys::MAIN_MENU_ADVISOR,
        keys::MAIN_MENU_SETTINGS,
        keys::MAIN_MENU_EXIT,
    ] {
        println!("{}", tr.t(key));
    }
    read_menu_choice(tr, &mut io::stdin().lock())
}

/// 올바른 번호가 들어올 때까지 묻는다. 입력이 끝나면 종료로 본다.
fn read_menu_choice(tr: &Translator, input: &mut impl BufRead) -> Result<MenuChoice, AppError> {
    loop {
        let sel = match read_line_from(input, &tr.t(keys::PROMPT_MENU_SELECT)) {
            Ok(sel) => sel,
            Err(AppError::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                println!();
                return Ok(MenuChoice::Exit);
            }
            Err(e) => return Err(e),
        };
        match parse_menu_choice(&sel) {
            Some(choice) => return Ok(choice),
            None => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

/// 케이블 선정 메뉴를 처리한다. 마지막 입력은 다음 실행의 기본값으로 남긴다.
pub fn handle_cable_sizing<S>(tr: &Translator, cfg: &mut Config, sizer: &S) -> Result<(), AppError>
where
    S: CableSizer,
    AppError: From<S::Error>,
{
    println!("{}", tr.t(keys::CABLE_HEADING));
    let d = cfg.calculator.clone();
    let rated_power_kw = read_f64_or(tr, &tr.t(keys::PROMPT_POWER_KW), d.rated_power_kw)?;
    let line_voltage_v = read_f64_or(tr, &tr.t(keys::PROMPT_VOLTAGE), d.line_voltage_v)?;
    let distance_m = read_f64_or(tr, &tr.t(keys::PROMPT_DISTANCE), d.distance_m)?;
    let ambient_temp_c = read_f64_or(tr, &tr.t(keys::PROMPT_AMBIENT), d.ambient_temp_c)?;

    println!("{}", tr.t(keys::CABLE_SCENARIO_OPTIONS));
    let scenario = read_option(tr, &Scenario::ALL, d.scenario)?;
    println!("{}", tr.t(keys::CABLE_MOUNT_OPTIONS));
    let mount_type = read_option(tr, &MountType::ALL, d.mount_type)?;
    println!("{}", tr.t(keys::CABLE_MATERIAL_OPTIONS));
    let material = read_option(tr, &Material::ALL, d.material)?;
    println!("{}", tr.t(keys::CABLE_MODE_OPTIONS));
    let mode = read_option(tr, &[SizingMode::Basic, SizingMode::Pro], d.mode)?;

    let mut input = SizingInput {
        rated_power_kw,
        line_voltage_v,
        distance_m,
        scenario,
        mount_type,
        material,
        ambient_temp_c,
        mode,
        ..d
    };
    if mode == SizingMode::Pro {
        input.power_factor = read_f64_or(tr, &tr.t(keys::PROMPT_POWER_FACTOR), d.power_factor)?;
        input.allowed_drop_pct =
            read_f64_or(tr, &tr.t(keys::PROMPT_DROP_LIMIT), d.allowed_drop_pct)?;
        input.group_factor = read_f64_or(tr, &tr.t(keys::PROMPT_GROUP_FACTOR), d.group_factor)?;
    }

    let result = sizer.size(&input)?;
    print_sizing(tr, &input, &result);
    cfg.calculator = input;
    Ok(())
}

pub fn print_sizing(tr: &Translator, input: &SizingInput, result: &SizingResult) {
    println!(
        "{} {:.2} A",
        tr.t(keys::RESULT_LOAD_CURRENT),
        result.load_current_a
    );
    println!(
        "{} {} A",
        tr.t(keys::RESULT_BREAKER),
        result.recommended_breaker_a
    );
    println!(
        "{} {} mm²",
        tr.t(keys::RESULT_CABLE),
        result.recommended_cable_mm2
    );
    println!("{} {:.2} %", tr.t(keys::RESULT_DROP), result.voltage_drop_pct);
    println!("{}", tr.t(result.scenario.strategy_key()));
    println!("{}", share_text(input, result));
}

/// 전기요금 메뉴를 처리한다.
pub fn handle_bill(tr: &Translator, cfg: &Config) -> Result<(), AppError> {
    println!("{}", tr.t(keys::BILL_HEADING));
    let defaults = BillInput::default();
    let input = BillInput {
        power_kw: read_f64_or(tr, &tr.t(keys::PROMPT_BILL_POWER), defaults.power_kw)?,
        hours_per_day: read_f64_or(tr, &tr.t(keys::PROMPT_BILL_HOURS), cfg.bill.hours_per_day)?,
        price_per_kwh: read_f64_or(tr, &tr.t(keys::PROMPT_BILL_PRICE), cfg.bill.price_per_kwh)?,
    };
    let estimate = bill::estimate_bill(input)?;
    print_bill(tr, &estimate);
    Ok(())
}

pub fn print_bill(tr: &Translator, est: &BillEstimate) {
    println!("{} {:.2} kWh", tr.t(keys::RESULT_DAILY_KWH), est.daily_kwh);
    println!("{} {:.2}", tr.t(keys::RESULT_DAILY_COST), est.daily_cost);
    println!("{} {:.2}", tr.t(keys::RESULT_MONTHLY_COST), est.monthly_cost);
    println!("{} {:.2}", tr.t(keys::RESULT_YEARLY_COST), est.yearly_cost);
}

/// 위조 케이블 판별 메뉴를 처리한다.
pub fn handle_antifake(tr: &Translator, client: &ApiClient) -> Result<(), AppError> {
    println!("{}", tr.t(keys::ANTIFAKE_HEADING));
    println!("{}", tr.t(keys::ANTIFAKE_OPTIONS));
    let sel = read_line(&tr.t(keys::PROMPT_SELECT))?;
    if sel.trim() == "2" {
        print_checklist(tr);
        return Ok(());
    }

    let market_price = client
        .fetch_market(PriceRange::Day)
        .map(|s| s.price)
        .unwrap_or_else(|_| MarketSnapshot::reference().price);
    let d = ValueCheckInput::default();
    let input = ValueCheckInput {
        cross_section_mm2: read_f64_or(tr, &tr.t(keys::PROMPT_CROSS_SECTION), d.cross_section_mm2)?,
        length_m: read_f64_or(tr, &tr.t(keys::PROMPT_LENGTH), d.length_m)?,
        copper_price_per_tonne: read_f64_or(tr, &tr.t(keys::PROMPT_COPPER_PRICE), market_price)?,
        paid_price: read_f64_or(tr, &tr.t(keys::PROMPT_PAID_PRICE), d.paid_price)?,
    };
    let verdict = antifake::check_value(input)?;
    print_verdict(tr, &verdict);
    Ok(())
}

pub fn print_verdict(tr: &Translator, v: &ValueVerdict) {
    println!("{} {:.2} kg", tr.t(keys::RESULT_COPPER_WEIGHT), v.copper_weight_kg);
    println!(
        "{} {:.2} USD ({:.3} USD/kg)",
        tr.t(keys::RESULT_COPPER_VALUE),
        v.copper_value,
        v.price_per_kg
    );
    println!("{} {:.2}", tr.t(keys::RESULT_PRICE_RATIO), v.ratio);
    println!("{} {:.0} %", tr.t(keys::RESULT_COPPER_SHARE), v.copper_share_pct);
    println!(">> {}", tr.t(v.status.label_key()));
}

pub fn print_checklist(tr: &Translator) {
    for (i, item) in antifake::inspection_checklist().iter().enumerate() {
        println!("{}. {}", i + 1, tr.t(item.title_key));
        println!("   {}", tr.t(item.desc_key));
    }
}

/// 구리 시세 메뉴를 처리한다. 서비스에 닿지 못하면 기준 시세를 보여준다.
pub fn handle_market(tr: &Translator, client: &ApiClient) -> Result<(), AppError> {
    println!("{}", tr.t(keys::MARKET_HEADING));
    println!("{}", tr.t(keys::MARKET_RANGE_OPTIONS));
    let range = read_option(
        tr,
        &[PriceRange::Day, PriceRange::Week, PriceRange::Month],
        PriceRange::Day,
    )?;
    let snapshot = match client.fetch_market(range) {
        Ok(s) => s,
        Err(_) => {
            println!("{}", tr.t(keys::MARKET_OFFLINE));
            MarketSnapshot::reference()
        }
    };
    print_market(tr, &snapshot);
    Ok(())
}

pub fn print_market(tr: &Translator, snapshot: &MarketSnapshot) {
    let s = MarketSummary::from_snapshot(snapshot);
    let arrow = if s.is_up() { "▲" } else { "▼" };
    println!("{MARKET_NAME}");
    println!("{} {:.2} USD/t", tr.t(keys::MARKET_LATEST), s.latest);
    println!("{} {arrow} {:+.2} %", tr.t(keys::MARKET_CHANGE), s.change_pct);
    println!(
        "{} {:.2} / {} {:.2}",
        tr.t(keys::MARKET_HIGH),
        s.high,
        tr.t(keys::MARKET_LOW),
        s.low
    );
    println!(
        "{} {:.3} USD",
        tr.t(keys::MARKET_PER_KG),
        snapshot.price_per_kg()
    );
    for p in &snapshot.history {
        println!("  {:>8}  {:.2}", p.time, p.price);
    }
    if !snapshot.updated_at.is_empty() {
        println!("{} {}", tr.t(keys::MARKET_UPDATED), snapshot.updated_at);
    }
}

/// AI 어드바이저 대화. 빈 줄을 입력하면 메뉴로 돌아간다.
pub fn handle_advisor(tr: &Translator, client: &ApiClient) -> Result<(), AppError> {
    println!("{}", tr.t(keys::ADVISOR_HEADING));
    println!("{}", tr.t(keys::ADVISOR_GREETING));
    println!("{}", tr.t(keys::ADVISOR_EXIT_HINT));
    let mut chat = Conversation::new();
    loop {
        let prompt = match read_line(&tr.t(keys::ADVISOR_PROMPT)) {
            Err(AppError::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
            other => other?,
        };
        if !chat.send(client, &prompt, tr.language_code(), tr) {
            return Ok(());
        }
        if let Some(reply) = chat.last_reply() {
            println!("AI> {reply}");
        }
    }
}

/// 언어 설정을 처리한다. 바뀐 언어가 있으면 반환한다.
pub fn handle_settings(tr: &Translator, cfg: &mut Config) -> Result<Option<Language>, AppError> {
    println!("{}", tr.t(keys::SETTINGS_HEADING));
    println!(
        "{} {}",
        tr.t(keys::SETTINGS_CURRENT_LANGUAGE),
        tr.language().native_name()
    );
    println!("{}", tr.t(keys::SETTINGS_OPTIONS));
    let sel = read_line(&tr.t(keys::SETTINGS_PROMPT_CHANGE))?;
    if sel.trim().is_empty() {
        return Ok(None);
    }
    let lang = match sel.trim() {
        "1" => Language::Cn,
        "2" => Language::En,
        "3" => Language::Kh,
        _ => {
            println!("{}", tr.t(keys::SETTINGS_INVALID));
            return Ok(None);
        }
    };
    cfg.language = lang.as_code().to_string();
    println!("{} {}", tr.t(keys::SETTINGS_SAVED), lang.native_name());
    Ok(Some(lang))
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    read_line_from(&mut io::stdin().lock(), prompt)
}

/// 한 줄을 읽는다. 입력 스트림이 닫혀 있으면 `UnexpectedEof`.
fn read_line_from(input: &mut impl BufRead, prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    if input.read_line(&mut buf)? == 0 {
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    }
    Ok(buf)
}

/// 빈 입력이면 기본값을 쓰고, 숫자가 아니면 다시 묻는다.
fn read_f64_or(tr: &Translator, prompt: &str, default: f64) -> Result<f64, AppError> {
    let prompt = format!("{}[{default}] ", prompt);
    loop {
        let s = read_line(&prompt)?;
        let s = s.trim();
        if s.is_empty() {
            return Ok(default);
        }
        match s.parse::<f64>() {
            Ok(v) => return Ok(v),
            Err(_) => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}

/// 1부터 매긴 번호로 항목을 고른다. 빈 입력이면 기본값.
fn read_option<T: Copy>(tr: &Translator, options: &[T], default: T) -> Result<T, AppError> {
    loop {
        let s = read_line(&tr.t(keys::PROMPT_SELECT))?;
        let s = s.trim();
        if s.is_empty() {
            return Ok(default);
        }
        match s.parse::<usize>().ok().and_then(|n| n.checked_sub(1)) {
            Some(idx) if idx < options.len() => return Ok(options[idx]),
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_numbers_map_to_choices() {
        assert_eq!(parse_menu_choice(" 1\n"), Some(MenuChoice::CableSizing));
        assert_eq!(parse_menu_choice("5"), Some(MenuChoice::Advisor));
        assert_eq!(parse_menu_choice("0"), Some(MenuChoice::Exit));
        assert_eq!(parse_menu_choice("7"), None);
    }

    #[test]
    fn closed_input_leaves_menu() {
        let tr = Translator::new("en");
        let choice = read_menu_choice(&tr, &mut io::Cursor::new("")).unwrap();
        assert_eq!(choice, MenuChoice::Exit);
    }

    #[test]
    fn menu_retries_until_valid_number() {
        let tr = Translator::new("en");
        let choice = read_menu_choice(&tr, &mut io::Cursor::new("x\n9\n2\n")).unwrap();
        assert_eq!(choice, MenuChoice::Bill);
    }

    #[test]
    fn eof_is_reported_by_line_reader() {
        let err = read_line_from(&mut io::Cursor::new(""), "> ").unwrap_err();
        assert!(matches!(err, AppError::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof));
    }
}
