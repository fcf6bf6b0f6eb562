use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use wire_expert_toolbox::advisor::Conversation;
use wire_expert_toolbox::antifake::{self, ValueCheckInput};
use wire_expert_toolbox::api::ApiClient;
use wire_expert_toolbox::app::{self, AppError};
use wire_expert_toolbox::bill::{self, BillInput};
use wire_expert_toolbox::cable::{
    CableSizer, LocalSizer, Material, MountType, Scenario, SizingInput, SizingMode, SizingResult,
};
use wire_expert_toolbox::config::{self, Config, DEFAULT_CONFIG_FILE};
use wire_expert_toolbox::i18n::{self, keys, Translator};
use wire_expert_toolbox::logging;
use wire_expert_toolbox::market::{MarketSnapshot, PriceRange};
use wire_expert_toolbox::ui_cli;

#[derive(Parser, Debug)]
#[command(author, version, about = "WireExpert toolbox (console)", long_about = None)]
struct Cli {
    /// cn / en / kh (기본: 설정 파일 또는 시스템 로케일)
    #[arg(long, global = true)]
    lang: Option<String>,
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// error / warn / info / debug / trace
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// 없으면 대화형 메뉴를 띄운다
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 차단기와 케이블 단면적 선정
    Size(SizeArgs),
    /// 전기요금 추정
    Bill {
        #[arg(long)]
        power: Option<f64>,
        #[arg(long)]
        hours: Option<f64>,
        #[arg(long)]
        price: Option<f64>,
    },
    /// 위조 케이블 가격 점검
    Verify {
        #[arg(long, default_value_t = 2.5)]
        size: f64,
        #[arg(long, default_value_t = 100.0)]
        length: f64,
        #[arg(long)]
        paid: f64,
        /// LME 구리 [USD/t]. 없으면 시세 서비스 또는 기준 시세
        #[arg(long)]
        copper_price: Option<f64>,
        /// 육안 점검 목록도 출력
        #[arg(long)]
        visual: bool,
    },
    /// 구리 시세
    Market {
        #[arg(long, default_value = "day")]
        range: PriceRange,
        #[arg(long)]
        json: bool,
    },
    /// AI 어드바이저에게 질문
    Ask { prompt: Vec<String> },
}

#[derive(Args, Debug)]
struct SizeArgs {
    /// 부하 전력 [kW]
    #[arg(long)]
    power: Option<f64>,
    /// 선간 전압 [V]
    #[arg(long)]
    voltage: Option<f64>,
    /// 편도 거리 [m]
    #[arg(long)]
    distance: Option<f64>,
    #[arg(long)]
    scenario: Option<Scenario>,
    #[arg(long)]
    mount: Option<MountType>,
    #[arg(long)]
    material: Option<Material>,
    /// 주위 온도 [°C]
    #[arg(long)]
    temp: Option<f64>,
    /// pro 모드: 아래 세 값을 직접 지정
    #[arg(long)]
    pro: bool,
    #[arg(long)]
    power_factor: Option<f64>,
    /// 허용 전압강하 [%]
    #[arg(long)]
    drop_limit: Option<f64>,
    #[arg(long)]
    group_factor: Option<f64>,
    /// 원격 계산 API 사용
    #[arg(long)]
    remote: bool,
    #[arg(long)]
    json: bool,
}

impl SizeArgs {
    fn to_input(&self, defaults: &SizingInput) -> SizingInput {
        let d = defaults.clone();
        SizingInput {
            rated_power_kw: self.power.unwrap_or(d.rated_power_kw),
            line_voltage_v: self.voltage.unwrap_or(d.line_voltage_v),
            distance_m: self.distance.unwrap_or(d.distance_m),
            scenario: self.scenario.unwrap_or(d.scenario),
            mount_type: self.mount.unwrap_or(d.mount_type),
            material: self.material.unwrap_or(d.material),
            ambient_temp_c: self.temp.unwrap_or(d.ambient_temp_c),
            mode: if self.pro { SizingMode::Pro } else { d.mode },
            power_factor: self.power_factor.unwrap_or(d.power_factor),
            allowed_drop_pct: self.drop_limit.unwrap_or(d.allowed_drop_pct),
            group_factor: self.group_factor.unwrap_or(d.group_factor),
        }
    }
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 하위 명령 또는 대화형 메뉴를 실행한다.
fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut cfg = match config::load_from(&cli.config) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };
    let level = cli.log_level.clone().unwrap_or_else(|| cfg.log_level.clone());
    if let Err(err) = logging::init(&level) {
        eprintln!("logging: {err}");
    }

    let lang = i18n::resolve_language(cli.lang.as_deref(), &cfg.language);
    let mut tr = Translator::new_with_pack(lang.as_code(), cfg.language_pack_dir.as_deref());
    info!(lang = tr.language_code(), config = %cli.config.display(), "starting");

    match try_run(cli.command, &mut cfg, &mut tr) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}: {err}", tr.t(keys::ERROR_PREFIX));
            ExitCode::FAILURE
        }
    }
}

fn try_run(
    command: Option<Command>,
    cfg: &mut Config,
    tr: &mut Translator,
) -> Result<(), AppError> {
    let Some(command) = command else {
        return app::run(cfg, tr);
    };
    let client = ApiClient::from_config(&cfg.api);
    match command {
        Command::Size(args) => {
            let input = args.to_input(&cfg.calculator);
            let result = if args.remote {
                size_with(&client, &input)?
            } else {
                size_with(&LocalSizer, &input)?
            };
            if args.json {
                println!("{}", to_json(&result)?);
            } else {
                ui_cli::print_sizing(tr, &input, &result);
            }
        }
        Command::Bill { power, hours, price } => {
            let d = BillInput::default();
            let est = bill::estimate_bill(BillInput {
                power_kw: power.unwrap_or(d.power_kw),
                hours_per_day: hours.unwrap_or(cfg.bill.hours_per_day),
                price_per_kwh: price.unwrap_or(cfg.bill.price_per_kwh),
            })?;
            ui_cli::print_bill(tr, &est);
        }
        Command::Verify {
            size,
            length,
            paid,
            copper_price,
            visual,
        } => {
            let copper_price = match copper_price {
                Some(p) => p,
                None => market_or_reference(&client, PriceRange::Day, tr).price,
            };
            let verdict = antifake::check_value(ValueCheckInput {
                cross_section_mm2: size,
                length_m: length,
                copper_price_per_tonne: copper_price,
                paid_price: paid,
            })?;
            ui_cli::print_verdict(tr, &verdict);
            if visual {
                ui_cli::print_checklist(tr);
            }
        }
        Command::Market { range, json } => {
            let snapshot = market_or_reference(&client, range, tr);
            if json {
                println!("{}", to_json(&snapshot)?);
            } else {
                ui_cli::print_market(tr, &snapshot);
            }
        }
        Command::Ask { prompt } => {
            let mut chat = Conversation::new();
            if chat.send(&client, &prompt.join(" "), tr.language_code(), tr) {
                if let Some(reply) = chat.last_reply() {
                    println!("{reply}");
                }
            }
        }
    }
    Ok(())
}

fn size_with<S>(sizer: &S, input: &SizingInput) -> Result<SizingResult, AppError>
where
    S: CableSizer,
    AppError: From<S::Error>,
{
    Ok(sizer.size(input)?)
}

fn market_or_reference(client: &ApiClient, range: PriceRange, tr: &Translator) -> MarketSnapshot {
    match client.fetch_market(range) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            warn!(error = %err, "price service unreachable");
            eprintln!("{}", tr.t(keys::MARKET_OFFLINE));
            MarketSnapshot::reference()
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(value)?)
}
