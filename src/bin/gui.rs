#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui 기반 데스크톱 GUI 진입점.

use eframe::{egui, App, Frame};
use image::GenericImageView;
use rfd::FileDialog;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;
use std::{env, fs, path::Path, thread};
use tracing::{info, warn};
use wire_expert_toolbox::{
    advisor::{ChatRole, Conversation},
    antifake::{self, ValueCheckInput, VerdictStatus, CHECK_SIZES_MM2},
    api::{ApiClient, ApiError},
    app::{AppState, Navigator, Tab, Tool, Transition},
    bill::{self, BillInput},
    cable::{
        self, share_text, Material, MountType, RawSizingInput, Scenario, SizingInput, SizingMode,
        SizingResult,
    },
    config,
    i18n::{self, keys, Language, Translator},
    logging,
    market::{MarketSnapshot, MarketSummary, PriceRange, MARKET_NAME},
};

fn main() -> Result<(), eframe::Error> {
    // --lang xx 또는 --lang=xx (xx: auto/cn/en/kh)
    let mut cli_lang: Option<String> = None;
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        let a = &args[i];
        if let Some(val) = a.strip_prefix("--lang=") {
            cli_lang = Some(val.to_string());
        } else if a == "--lang" || a == "-L" {
            if i + 1 < args.len() {
                cli_lang = Some(args[i + 1].clone());
                i += 1;
            }
        }
        i += 1;
    }

    let mut app_cfg = config::load_or_default().unwrap_or_default();
    if let Err(e) = logging::init(&app_cfg.log_level) {
        eprintln!("logging: {e}");
    }
    if let Some(lang_cli) = cli_lang {
        app_cfg.language = i18n::resolve_language(Some(&lang_cli), &app_cfg.language)
            .as_code()
            .to_string();
    }

    let mut viewport = egui::ViewportBuilder::default().with_inner_size([460.0, 820.0]);
    if let Some(icon) = load_app_icon() {
        viewport = viewport.with_icon(icon);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "WireExpert Toolbox",
        options,
        Box::new(move |cc| {
            if let Err(e) = setup_fonts(&cc.egui_ctx, app_cfg.font_path.as_deref()) {
                warn!("font: {e}");
            }
            Box::new(GuiApp::new(app_cfg.clone()))
        }),
    )
}

fn load_app_icon() -> Option<egui::IconData> {
    let search = ["icon.png", "assets/icon.png", "../assets/icon.png"];
    let path = search.iter().find(|p| Path::new(*p).exists())?;
    let bytes = fs::read(path).ok()?;
    let img = image::load_from_memory(&bytes).ok()?;
    let rgba = img.to_rgba8();
    let (w, h) = img.dimensions();
    Some(egui::IconData {
        rgba: rgba.into_raw(),
        width: w,
        height: h,
    })
}

/// 찾은 글꼴을 순서대로 egui 기본 글꼴 앞에 등록한다.
fn apply_font_files(ctx: &egui::Context, files: Vec<(String, Vec<u8>)>) {
    let mut fonts = egui::FontDefinitions::default();
    for (idx, (name, bytes)) in files.into_iter().enumerate() {
        fonts
            .font_data
            .insert(name.clone(), egui::FontData::from_owned(bytes));
        for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
            fonts
                .families
                .entry(family)
                .or_default()
                .insert(idx, name.clone());
        }
    }
    ctx.set_fonts(fonts);
}

/// 중국어/크메르어 표시용 글꼴을 찾는다.
/// 1) 설정의 font_path
/// 2) assets/fonts/
/// 3) Windows/macOS/Linux 시스템 글꼴
fn setup_fonts(ctx: &egui::Context, custom: Option<&str>) -> Result<(), String> {
    let mut cjk: Vec<String> = Vec::new();
    if let Some(p) = custom {
        cjk.push(p.to_string());
    }
    cjk.extend(
        [
            "assets/fonts/NotoSansSC-Regular.otf",
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
            "/System/Library/Fonts/PingFang.ttc",
        ]
        .map(String::from),
    );
    if let Some(windir) = env::var_os("WINDIR") {
        let dir = Path::new(&windir).join("Fonts");
        for cand in ["msyh.ttc", "simhei.ttf", "simsun.ttc"] {
            cjk.push(dir.join(cand).to_string_lossy().into_owned());
        }
    }
    let mut khmer: Vec<String> = [
        "assets/fonts/NotoSansKhmer-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSansKhmer-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Khmer Sangam MN.ttf",
    ]
    .map(String::from)
    .to_vec();
    if let Some(windir) = env::var_os("WINDIR") {
        khmer.push(
            Path::new(&windir)
                .join("Fonts")
                .join("KhmerUI.ttf")
                .to_string_lossy()
                .into_owned(),
        );
    }

    let mut files = Vec::new();
    for (name, candidates) in [("cjk", &cjk), ("khmer", &khmer)] {
        if let Some(bytes) = candidates.iter().find_map(|p| fs::read(p).ok()) {
            files.push((name.to_string(), bytes));
        }
    }
    if files.is_empty() {
        return Err("No CJK/Khmer font found. Set font_path in config.toml.".into());
    }
    apply_font_files(ctx, files);
    Ok(())
}

/// 워커 스레드에서 요청을 실행하고 결과를 채널로 받는다.
fn spawn_request<T, F>(job: F) -> Receiver<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(job());
    });
    rx
}

/// 대기 중인 응답이 도착했으면 꺼낸다. 워커가 사라졌으면 슬롯을 비운다.
fn poll<T>(slot: &mut Option<Receiver<T>>) -> Option<T> {
    let rx = slot.as_ref()?;
    match rx.try_recv() {
        Ok(v) => {
            *slot = None;
            Some(v)
        }
        Err(TryRecvError::Empty) => None,
        Err(TryRecvError::Disconnected) => {
            *slot = None;
            None
        }
    }
}

/// 저장용 선정 보고서.
fn sizing_report(tr: &Translator, input: &SizingInput, result: &SizingResult) -> String {
    let mut out = String::new();
    out.push_str(&share_text(input, result));
    out.push_str("\n\n");
    out.push_str(&format!(
        "{}: {} kW, {} V, {} m, {} °C\n",
        txt(tr, keys::TOOL_CALC),
        input.rated_power_kw,
        input.line_voltage_v,
        input.distance_m,
        input.ambient_temp_c
    ));
    out.push_str(&format!(
        "{}: {} / {}: {} / {}: {} / {}: {}\n",
        txt(tr, keys::LABEL_SCENARIO),
        txt(tr, input.scenario.label_key()),
        txt(tr, keys::LABEL_MOUNT),
        txt(tr, input.mount_type.label_key()),
        txt(tr, keys::LABEL_MATERIAL),
        txt(tr, input.material.label_key()),
        txt(tr, keys::LABEL_MODE),
        input.mode
    ));
    out.push_str(&format!(
        "{} {:.2} A\n{} {} A\n{} {} mm²\n{} {:.2} %\n",
        txt(tr, keys::RESULT_LOAD_CURRENT),
        result.load_current_a,
        txt(tr, keys::RESULT_BREAKER),
        result.recommended_breaker_a,
        txt(tr, keys::RESULT_CABLE),
        result.recommended_cable_mm2,
        txt(tr, keys::RESULT_DROP),
        result.voltage_drop_pct
    ));
    out.push_str(&txt(tr, result.scenario.strategy_key()));
    out.push('\n');
    out
}

fn status_color(status: VerdictStatus) -> egui::Color32 {
    match status {
        VerdictStatus::Safe => egui::Color32::from_rgb(22, 163, 74),
        VerdictStatus::Suspicious => egui::Color32::from_rgb(217, 119, 6),
        VerdictStatus::Danger => egui::Color32::from_rgb(220, 38, 38),
    }
}

fn txt(tr: &Translator, key: &str) -> String {
    tr.t(key).into_owned()
}

fn parse_field(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn number_row(ui: &mut egui::Ui, label: &str, value: &mut String) {
    ui.label(label.trim_end_matches([':', ' ']));
    ui.add(egui::TextEdit::singleline(value).desired_width(120.0));
    ui.end_row();
}

struct GuiApp {
    config: config::Config,
    tr: Translator,
    nav: Navigator,
    client: ApiClient,
    status: Option<String>,

    calc_raw: RawSizingInput,
    calc_remote: bool,
    calc_result: Option<(SizingInput, SizingResult)>,
    calc_error: Option<String>,
    calc_pending: Option<(SizingInput, Receiver<Result<SizingResult, ApiError>>)>,

    bill_power: String,
    bill_hours: String,
    bill_price: String,

    af_visual: bool,
    af_size_mm2: f64,
    af_length: String,
    af_copper: String,
    af_paid: String,

    market: MarketSnapshot,
    market_range: PriceRange,
    market_offline: bool,
    market_requested: bool,
    market_pending: Option<Receiver<Result<MarketSnapshot, ApiError>>>,

    chat: Conversation,
    chat_input: String,
    chat_pending: Option<Receiver<Result<String, ApiError>>>,
}

impl GuiApp {
    fn new(config: config::Config) -> Self {
        let lang = i18n::resolve_language(None, &config.language);
        let tr = Translator::new_with_pack(lang.as_code(), config.language_pack_dir.as_deref());
        let client = ApiClient::from_config(&config.api);
        let bill_defaults = BillInput::default();
        let af = ValueCheckInput::default();
        let market = MarketSnapshot::reference();
        info!(lang = tr.language_code(), server = client.base_url(), "gui started");
        Self {
            calc_raw: RawSizingInput::from_input(&config.calculator),
            calc_remote: false,
            calc_result: None,
            calc_error: None,
            calc_pending: None,
            bill_power: bill_defaults.power_kw.to_string(),
            bill_hours: config.bill.hours_per_day.to_string(),
            bill_price: config.bill.price_per_kwh.to_string(),
            af_visual: false,
            af_size_mm2: af.cross_section_mm2,
            af_length: af.length_m.to_string(),
            af_copper: format!("{:.0}", market.price),
            af_paid: af.paid_price.to_string(),
            market,
            market_range: PriceRange::Day,
            market_offline: false,
            market_requested: false,
            market_pending: None,
            chat: Conversation::new(),
            chat_input: String::new(),
            chat_pending: None,
            nav: Navigator::new(AppState::new(tr.language())),
            tr,
            client,
            status: None,
            config,
        }
    }

    fn state(&self) -> AppState {
        self.nav.state()
    }

    fn set_language(&mut self, lang: Language) {
        if self.tr.language() == lang {
            return;
        }
        self.nav.dispatch(Transition::SetLanguage(lang));
        self.tr = Translator::new_with_pack(lang.as_code(), self.config.language_pack_dir.as_deref());
        self.config.language = lang.as_code().to_string();
        self.save_config();
    }

    fn save_config(&mut self) {
        if let Err(e) = self.config.save() {
            warn!(error = %e, "config save failed");
            self.status = Some(format!("{}: {e}", txt(&self.tr, keys::ERROR_PREFIX)));
        }
    }

    fn request_market(&mut self) {
        let client = self.client.clone();
        let range = self.market_range;
        self.market_requested = true;
        self.market_pending = Some(spawn_request(move || client.fetch_market(range)));
    }

    fn poll_workers(&mut self) {
        if let Some(res) = poll(&mut self.market_pending) {
            match res {
                Ok(snapshot) => {
                    self.market = snapshot;
                    self.market_offline = false;
                }
                Err(e) => {
                    warn!(error = %e, "market fetch failed, using reference");
                    self.market = MarketSnapshot::reference();
                    self.market_offline = true;
                }
            }
            self.af_copper = format!("{:.0}", self.market.price);
        }

        let calc_done = match self.calc_pending.as_mut() {
            Some((_, rx)) => match rx.try_recv() {
                Ok(res) => Some(res),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => Some(Err(ApiError::Transport("worker".into()))),
            },
            None => None,
        };
        if let Some(res) = calc_done {
            if let Some((input, _)) = self.calc_pending.take() {
                self.finish_calc(input, res.map_err(|e| e.to_string()));
            }
        }

        if let Some(reply) = poll(&mut self.chat_pending) {
            self.chat.push_reply(reply, &self.tr);
        }
    }

    fn is_busy(&self) -> bool {
        self.market_pending.is_some() || self.calc_pending.is_some() || self.chat_pending.is_some()
    }

    fn run_calc(&mut self) {
        let input = match self.calc_raw.parse() {
            Ok(input) => input,
            Err(e) => {
                self.calc_result = None;
                self.calc_error = Some(format!("{}: {e}", txt(&self.tr, keys::ERROR_PREFIX)));
                return;
            }
        };
        if self.calc_remote {
            let client = self.client.clone();
            let sent = input.clone();
            self.calc_error = None;
            self.calc_pending = Some((input, spawn_request(move || client.calculate(&sent))));
        } else {
            let res = cable::size_cable(&input).map_err(|e| e.to_string());
            self.finish_calc(input, res);
        }
    }

    fn finish_calc(&mut self, input: SizingInput, res: Result<SizingResult, String>) {
        match res {
            Ok(result) => {
                self.calc_error = None;
                self.config.calculator = input.clone();
                self.calc_result = Some((input, result));
                self.save_config();
            }
            Err(e) => {
                self.calc_result = None;
                self.calc_error = Some(format!("{}: {e}", txt(&self.tr, keys::ERROR_PREFIX)));
            }
        }
    }

    fn send_chat(&mut self) {
        if self.chat_pending.is_some() {
            return;
        }
        let Some(prompt) = self.chat.push_user(&self.chat_input) else {
            return;
        };
        self.chat_input.clear();
        let client = self.client.clone();
        let lang = self.tr.language_code();
        self.chat_pending = Some(spawn_request(move || client.chat(&prompt, lang)));
    }

    /// 하단 탭 바.
    fn ui_tab_bar(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        let current = self.state().tab;
        ui.columns(Tab::ALL.len(), |cols| {
            for (col, tab) in cols.iter_mut().zip(Tab::ALL) {
                col.vertical_centered_justified(|ui| {
                    let label = egui::RichText::new(txt(&tr, tab.label_key())).strong();
                    if ui.selectable_label(current == tab, label).clicked() {
                        self.nav.dispatch(Transition::SelectTab(tab));
                    }
                });
            }
        });
    }

    fn tool_card(&mut self, ui: &mut egui::Ui, tool: Tool) {
        let tr = self.tr.clone();
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            let title = egui::RichText::new(txt(&tr, tool.label_key())).strong().size(16.0);
            if ui.add(egui::Button::new(title).frame(false)).clicked() {
                self.nav.dispatch(Transition::OpenTool(tool));
            }
            ui.small(txt(&tr, tool.desc_key()));
        });
    }

    fn ui_home(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        ui.heading(txt(&tr, keys::APP_TITLE));
        ui.label(txt(&tr, keys::APP_TAGLINE));
        ui.add_space(8.0);

        let s = MarketSummary::from_snapshot(&self.market);
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.small(MARKET_NAME);
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(format!("{:.2} USD/t", s.latest)).size(20.0).strong());
                let color = if s.is_up() {
                    egui::Color32::from_rgb(22, 163, 74)
                } else {
                    egui::Color32::from_rgb(220, 38, 38)
                };
                ui.colored_label(color, format!("{:+.2} %", s.change_pct));
            });
        });
        ui.add_space(8.0);
        for tool in [Tool::Calc, Tool::AntiFake, Tool::Market] {
            self.tool_card(ui, tool);
            ui.add_space(4.0);
        }
    }

    fn ui_tools(&mut self, ui: &mut egui::Ui) {
        for tool in Tool::ALL {
            self.tool_card(ui, tool);
            ui.add_space(4.0);
        }
    }

    fn ui_profile(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        ui.vertical_centered(|ui| {
            ui.heading(txt(&tr, keys::APP_TITLE));
            ui.small(format!(
                "{} {}",
                txt(&tr, keys::PROFILE_VERSION),
                env!("CARGO_PKG_VERSION")
            ));
        });
        ui.separator();
        egui::Grid::new("profile_grid")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.label(txt(&tr, keys::PROFILE_LANGUAGE));
                let mut lang = self.tr.language();
                egui::ComboBox::from_id_source("profile_lang")
                    .selected_text(lang.native_name())
                    .show_ui(ui, |ui| {
                        for l in Language::ALL {
                            ui.selectable_value(&mut lang, l, l.native_name());
                        }
                    });
                ui.end_row();
                if lang != self.tr.language() {
                    self.set_language(lang);
                }

                ui.label(txt(&tr, keys::PROFILE_SERVER));
                ui.label(self.client.base_url());
                ui.end_row();
            });
        if let Some(msg) = &self.status {
            ui.small(msg);
        }
    }

    fn ui_calc(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        ui.heading(txt(&tr, keys::TOOL_CALC));
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.calc_raw.mode, SizingMode::Basic, txt(&tr, keys::CABLE_MODE_BASIC));
            ui.selectable_value(&mut self.calc_raw.mode, SizingMode::Pro, txt(&tr, keys::CABLE_MODE_PRO));
        });
        ui.separator();

        egui::Grid::new("calc_grid")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                number_row(ui, &txt(&tr, keys::PROMPT_POWER_KW), &mut self.calc_raw.power_kw);
                number_row(ui, &txt(&tr, keys::PROMPT_VOLTAGE), &mut self.calc_raw.voltage_v);
                number_row(ui, &txt(&tr, keys::PROMPT_DISTANCE), &mut self.calc_raw.distance_m);
                number_row(ui, &txt(&tr, keys::PROMPT_AMBIENT), &mut self.calc_raw.ambient_temp_c);

                ui.label(txt(&tr, keys::LABEL_SCENARIO));
                egui::ComboBox::from_id_source("calc_scenario")
                    .selected_text(txt(&tr, self.calc_raw.scenario.label_key()))
                    .show_ui(ui, |ui| {
                        for s in Scenario::ALL {
                            ui.selectable_value(&mut self.calc_raw.scenario, s, txt(&tr, s.label_key()));
                        }
                    });
                ui.end_row();

                ui.label(txt(&tr, keys::LABEL_MOUNT));
                egui::ComboBox::from_id_source("calc_mount")
                    .selected_text(txt(&tr, self.calc_raw.mount_type.label_key()))
                    .show_ui(ui, |ui| {
                        for m in MountType::ALL {
                            ui.selectable_value(&mut self.calc_raw.mount_type, m, txt(&tr, m.label_key()));
                        }
                    });
                ui.end_row();

                ui.label(txt(&tr, keys::LABEL_MATERIAL));
                egui::ComboBox::from_id_source("calc_material")
                    .selected_text(txt(&tr, self.calc_raw.material.label_key()))
                    .show_ui(ui, |ui| {
                        for m in Material::ALL {
                            ui.selectable_value(&mut self.calc_raw.material, m, txt(&tr, m.label_key()));
                        }
                    });
                ui.end_row();

                if self.calc_raw.mode == SizingMode::Pro {
                    number_row(ui, &txt(&tr, keys::PROMPT_POWER_FACTOR), &mut self.calc_raw.power_factor);
                    number_row(ui, &txt(&tr, keys::PROMPT_DROP_LIMIT), &mut self.calc_raw.allowed_drop_pct);
                    number_row(ui, &txt(&tr, keys::PROMPT_GROUP_FACTOR), &mut self.calc_raw.group_factor);
                }
            });

        ui.checkbox(&mut self.calc_remote, txt(&tr, keys::CABLE_REMOTE));
        ui.horizontal(|ui| {
            let busy = self.calc_pending.is_some();
            if ui
                .add_enabled(!busy, egui::Button::new(txt(&tr, keys::CABLE_CALCULATE)))
                .clicked()
            {
                self.run_calc();
            }
            if busy {
                ui.spinner();
            }
        });

        if let Some(err) = &self.calc_error {
            ui.colored_label(egui::Color32::from_rgb(220, 38, 38), err);
        }

        let Some((input, result)) = self.calc_result.clone() else {
            return;
        };
        ui.separator();
        egui::Grid::new("calc_result")
            .num_columns(2)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                ui.label(txt(&tr, keys::RESULT_LOAD_CURRENT));
                ui.strong(format!("{:.2} A", result.load_current_a));
                ui.end_row();
                ui.label(txt(&tr, keys::RESULT_BREAKER));
                ui.strong(format!("{} A", result.recommended_breaker_a));
                ui.end_row();
                ui.label(txt(&tr, keys::RESULT_CABLE));
                ui.strong(
                    egui::RichText::new(format!("{} mm²", result.recommended_cable_mm2)).size(20.0),
                );
                ui.end_row();
                ui.label(txt(&tr, keys::RESULT_DROP));
                ui.strong(format!("{:.2} %", result.voltage_drop_pct));
                ui.end_row();
            });
        ui.add(egui::Label::new(egui::RichText::new(txt(&tr, result.scenario.strategy_key())).small()).wrap(true));

        ui.horizontal(|ui| {
            if ui.button(txt(&tr, keys::CABLE_SHARE)).clicked() {
                let text = share_text(&input, &result);
                ui.output_mut(|o| o.copied_text = text);
                self.status = Some(txt(&tr, keys::CABLE_COPIED));
            }
            if ui.button(txt(&tr, keys::CABLE_SAVE_REPORT)).clicked() {
                if let Some(path) = FileDialog::new()
                    .set_file_name("wire_report.txt")
                    .add_filter("text", &["txt"])
                    .save_file()
                {
                    self.status = Some(match fs::write(&path, sizing_report(&tr, &input, &result)) {
                        Ok(()) => format!("{} {}", txt(&tr, keys::CABLE_SAVED), path.display()),
                        Err(e) => format!("{}: {e}", txt(&tr, keys::ERROR_PREFIX)),
                    });
                }
            }
        });
        if let Some(msg) = &self.status {
            ui.small(msg);
        }
    }

    fn ui_bill(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        ui.heading(txt(&tr, keys::TOOL_BILL));
        egui::Grid::new("bill_grid")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                number_row(ui, &txt(&tr, keys::PROMPT_BILL_POWER), &mut self.bill_power);
                number_row(ui, &txt(&tr, keys::PROMPT_BILL_HOURS), &mut self.bill_hours);
                number_row(ui, &txt(&tr, keys::PROMPT_BILL_PRICE), &mut self.bill_price);
            });
        ui.separator();

        let input = match (
            parse_field(&self.bill_power),
            parse_field(&self.bill_hours),
            parse_field(&self.bill_price),
        ) {
            (Some(power_kw), Some(hours_per_day), Some(price_per_kwh)) => BillInput {
                power_kw,
                hours_per_day,
                price_per_kwh,
            },
            _ => {
                ui.label(txt(&tr, keys::ERROR_INVALID_NUMBER));
                return;
            }
        };
        match bill::estimate_bill(input) {
            Ok(est) => {
                egui::Grid::new("bill_result").num_columns(2).show(ui, |ui| {
                    ui.label(txt(&tr, keys::RESULT_DAILY_KWH));
                    ui.strong(format!("{:.2} kWh", est.daily_kwh));
                    ui.end_row();
                    ui.label(txt(&tr, keys::RESULT_DAILY_COST));
                    ui.strong(format!("{:.2}", est.daily_cost));
                    ui.end_row();
                    ui.label(txt(&tr, keys::RESULT_MONTHLY_COST));
                    ui.strong(egui::RichText::new(format!("{:.2}", est.monthly_cost)).size(20.0));
                    ui.end_row();
                    ui.label(txt(&tr, keys::RESULT_YEARLY_COST));
                    ui.strong(format!("{:.2}", est.yearly_cost));
                    ui.end_row();
                });
            }
            Err(e) => {
                ui.colored_label(egui::Color32::from_rgb(220, 38, 38), e.to_string());
            }
        }
    }

    fn ui_antifake(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        ui.heading(txt(&tr, keys::TOOL_ANTIFAKE));
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.af_visual, false, txt(&tr, keys::ANTIFAKE_MODE_VALUE));
            ui.selectable_value(&mut self.af_visual, true, txt(&tr, keys::ANTIFAKE_MODE_VISUAL));
        });
        ui.separator();

        if self.af_visual {
            for (i, item) in antifake::inspection_checklist().iter().enumerate() {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.strong(format!("{}. {}", i + 1, txt(&tr, item.title_key)));
                    ui.add(egui::Label::new(txt(&tr, item.desc_key)).wrap(true));
                });
            }
            return;
        }

        egui::Grid::new("af_grid")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                ui.label(txt(&tr, keys::PROMPT_CROSS_SECTION).trim_end_matches([':', ' ']));
                egui::ComboBox::from_id_source("af_size")
                    .selected_text(format!("{} mm²", self.af_size_mm2))
                    .show_ui(ui, |ui| {
                        for s in CHECK_SIZES_MM2 {
                            ui.selectable_value(&mut self.af_size_mm2, s, format!("{s} mm²"));
                        }
                    });
                ui.end_row();
                number_row(ui, &txt(&tr, keys::PROMPT_LENGTH), &mut self.af_length);
                number_row(ui, &txt(&tr, keys::PROMPT_COPPER_PRICE), &mut self.af_copper);
                number_row(ui, &txt(&tr, keys::PROMPT_PAID_PRICE), &mut self.af_paid);
            });
        ui.separator();

        let (Some(length_m), Some(copper), Some(paid)) = (
            parse_field(&self.af_length),
            parse_field(&self.af_copper),
            parse_field(&self.af_paid),
        ) else {
            ui.label(txt(&tr, keys::ERROR_INVALID_NUMBER));
            return;
        };
        match antifake::check_value(ValueCheckInput {
            cross_section_mm2: self.af_size_mm2,
            length_m,
            copper_price_per_tonne: copper,
            paid_price: paid,
        }) {
            Ok(v) => {
                egui::Grid::new("af_result").num_columns(2).show(ui, |ui| {
                    ui.label(txt(&tr, keys::RESULT_COPPER_WEIGHT));
                    ui.strong(format!("{:.2} kg", v.copper_weight_kg));
                    ui.end_row();
                    ui.label(txt(&tr, keys::RESULT_COPPER_VALUE));
                    ui.strong(format!("{:.2} USD", v.copper_value));
                    ui.end_row();
                    ui.label(txt(&tr, keys::RESULT_PRICE_RATIO));
                    ui.strong(format!("{:.2}", v.ratio));
                    ui.end_row();
                    ui.label(txt(&tr, keys::RESULT_COPPER_SHARE));
                    ui.strong(format!("{:.0} %", v.copper_share_pct));
                    ui.end_row();
                });
                ui.add(
                    egui::Label::new(
                        egui::RichText::new(txt(&tr, v.status.label_key()))
                            .color(status_color(v.status))
                            .strong()
                            .size(16.0),
                    )
                    .wrap(true),
                );
            }
            Err(e) => {
                ui.colored_label(egui::Color32::from_rgb(220, 38, 38), e.to_string());
            }
        }
    }

    fn ui_market(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        if !self.market_requested {
            self.request_market();
        }
        ui.heading(txt(&tr, keys::TOOL_MARKET));
        ui.horizontal(|ui| {
            let before = self.market_range;
            for (range, key) in [
                (PriceRange::Day, keys::MARKET_RANGE_DAY),
                (PriceRange::Week, keys::MARKET_RANGE_WEEK),
                (PriceRange::Month, keys::MARKET_RANGE_MONTH),
            ] {
                ui.selectable_value(&mut self.market_range, range, txt(&tr, key));
            }
            let busy = self.market_pending.is_some();
            let refresh = ui.button(txt(&tr, keys::MARKET_REFRESH)).clicked();
            if (refresh || self.market_range != before) && !busy {
                self.request_market();
            }
            if busy {
                ui.spinner();
            }
        });
        if self.market_offline {
            ui.small(txt(&tr, keys::MARKET_OFFLINE));
        }
        ui.separator();

        let s = MarketSummary::from_snapshot(&self.market);
        ui.small(MARKET_NAME);
        ui.label(egui::RichText::new(format!("{:.2} USD/t", s.latest)).size(24.0).strong());
        let color = if s.is_up() {
            egui::Color32::from_rgb(22, 163, 74)
        } else {
            egui::Color32::from_rgb(220, 38, 38)
        };
        ui.colored_label(color, format!("{} {:+.2} %", txt(&tr, keys::MARKET_CHANGE), s.change_pct));
        ui.label(format!(
            "{} {:.2}  {} {:.2}  {} {:.3} USD",
            txt(&tr, keys::MARKET_HIGH),
            s.high,
            txt(&tr, keys::MARKET_LOW),
            s.low,
            txt(&tr, keys::MARKET_PER_KG),
            self.market.price_per_kg()
        ));

        sparkline(ui, &self.market, color);

        egui::Grid::new("market_history")
            .num_columns(2)
            .striped(true)
            .show(ui, |ui| {
                for p in &self.market.history {
                    ui.label(&p.time);
                    ui.label(format!("{:.2}", p.price));
                    ui.end_row();
                }
            });
        if !self.market.updated_at.is_empty() {
            ui.small(format!("{} {}", txt(&tr, keys::MARKET_UPDATED), self.market.updated_at));
        }
    }

    fn ui_advisor(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        ui.heading(txt(&tr, keys::TOOL_ADVISOR));
        ui.separator();
        egui::ScrollArea::vertical()
            .max_height(ui.available_height() - 48.0)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.label(txt(&tr, keys::ADVISOR_GREETING));
                for msg in self.chat.messages() {
                    let (who, color) = match msg.role {
                        ChatRole::User => ("You", egui::Color32::from_rgb(37, 99, 235)),
                        ChatRole::Bot => ("AI", ui.visuals().text_color()),
                    };
                    ui.horizontal_wrapped(|ui| {
                        ui.colored_label(color, format!("{who}>"));
                        ui.add(egui::Label::new(&msg.text).wrap(true));
                    });
                }
                if self.chat_pending.is_some() {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.small(txt(&tr, keys::ADVISOR_THINKING));
                    });
                }
            });
        ui.separator();
        ui.horizontal(|ui| {
            let resp = ui.add(
                egui::TextEdit::singleline(&mut self.chat_input)
                    .desired_width(ui.available_width() - 64.0),
            );
            let enter = resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let busy = self.chat_pending.is_some();
            if (ui
                .add_enabled(!busy, egui::Button::new(txt(&tr, keys::ADVISOR_SEND)))
                .clicked()
                || enter)
                && !busy
            {
                self.send_chat();
            }
        });
    }
}

/// 시세 이력 꺾은선.
fn sparkline(ui: &mut egui::Ui, snapshot: &MarketSnapshot, color: egui::Color32) {
    let (resp, painter) =
        ui.allocate_painter(egui::vec2(ui.available_width(), 120.0), egui::Sense::hover());
    let rect = resp.rect;
    painter.rect_filled(rect, 4.0, ui.visuals().extreme_bg_color);
    let prices: Vec<f64> = snapshot.history.iter().map(|p| p.price).collect();
    if prices.len() < 2 {
        return;
    }
    let lo = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = (hi - lo).max(1e-9);
    let step = rect.width() / (prices.len() - 1) as f32;
    let points: Vec<egui::Pos2> = prices
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let y = ((p - lo) / span) as f32;
            egui::pos2(
                rect.left() + step * i as f32,
                rect.bottom() - 8.0 - y * (rect.height() - 16.0),
            )
        })
        .collect();
    painter.add(egui::Shape::line(points, egui::Stroke::new(2.0, color)));
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.poll_workers();
        if self.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        let tr = self.tr.clone();

        // 상단 바
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.state().tool.is_some() && ui.button(format!("< {}", txt(&tr, keys::BACK))).clicked() {
                    self.nav.dispatch(Transition::CloseTool);
                }
                ui.heading(txt(&tr, keys::APP_TITLE));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let mut lang = self.tr.language();
                    egui::ComboBox::from_id_source("top_lang")
                        .selected_text(lang.native_name())
                        .show_ui(ui, |ui| {
                            for l in Language::ALL {
                                ui.selectable_value(&mut lang, l, l.native_name());
                            }
                        });
                    if lang != self.tr.language() {
                        self.set_language(lang);
                    }
                });
            });
        });

        egui::TopBottomPanel::bottom("tab_bar")
            .min_height(44.0)
            .show(ctx, |ui| {
                ui.add_space(4.0);
                self.ui_tab_bar(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let state = self.state();
            if state.tool == Some(Tool::Advisor) {
                self.ui_advisor(ui);
                return;
            }
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| match state.tool {
                    Some(Tool::Calc) => self.ui_calc(ui),
                    Some(Tool::AntiFake) => self.ui_antifake(ui),
                    Some(Tool::Market) => self.ui_market(ui),
                    Some(Tool::Bill) => self.ui_bill(ui),
                    Some(Tool::Advisor) => {}
                    None => match state.tab {
                        Tab::Home => self.ui_home(ui),
                        Tab::Tools => self.ui_tools(ui),
                        Tab::Profile => self.ui_profile(ui),
                    },
                });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> GuiApp {
        let mut cfg = config::Config::default();
        cfg.language = "en".into();
        GuiApp::new(cfg)
    }

    #[test]
    fn starts_on_home_in_configured_language() {
        let app = app();
        assert_eq!(app.state().tab, Tab::Home);
        assert_eq!(app.state().tool, None);
        assert_eq!(app.tr.language(), Language::En);
        assert_eq!(app.calc_raw.power_kw, "15");
    }

    #[test]
    fn tab_switch_closes_open_tool() {
        let mut app = app();
        app.nav.dispatch(Transition::OpenTool(Tool::Bill));
        app.nav.dispatch(Transition::SelectTab(Tab::Profile));
        assert_eq!(app.state().tool, None);
        assert_eq!(app.state().tab, Tab::Profile);
    }

    #[test]
    fn invalid_calc_input_shows_error() {
        let mut app = app();
        app.calc_raw.ambient_temp_c = "70".into();
        app.run_calc();
        assert!(app.calc_result.is_none());
        assert!(app.calc_error.as_deref().unwrap_or("").contains("ambient_temp_c"));
    }

    #[test]
    fn report_contains_share_line_and_results() {
        let tr = Translator::new("en");
        let input = SizingInput::default();
        let result = cable::size_cable(&input).unwrap();
        let report = sizing_report(&tr, &input, &result);
        assert!(report.starts_with("WireExpert Report: 15kW @ 380V."));
        assert!(report.contains("Recommended breaker: 50 A"));
    }

    #[test]
    fn poll_returns_worker_result_once() {
        let mut slot = Some(spawn_request(|| 7));
        let mut got = None;
        for _ in 0..200 {
            if let Some(v) = poll(&mut slot) {
                got = Some(v);
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(got, Some(7));
        assert!(slot.is_none());
    }
}
