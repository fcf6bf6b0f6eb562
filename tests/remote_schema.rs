use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use serde_json::{json, Value};
use wire_expert_toolbox::{
    advisor::Conversation,
    api::{ApiClient, ApiError},
    cable::{self, Scenario, SizingInput, SizingMode, SizingResult},
    i18n::Translator,
    market::PriceRange,
};

/// 한 번의 요청에 `status`와 `body`로 답하는 로컬 서버. 받은 요청 줄과 본문을 돌려준다.
fn serve_once(status: u16, body: &'static str) -> (String, mpsc::Receiver<(String, String)>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if line == "\r\n" || line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }
        }
        let mut payload = vec![0u8; content_length];
        reader.read_exact(&mut payload).unwrap();
        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
        .unwrap();
        stream.flush().unwrap();
        let _ = tx.send((request_line.trim_end().to_string(), String::from_utf8(payload).unwrap()));
    });
    (format!("http://{addr}"), rx)
}

fn client(base: &str) -> ApiClient {
    ApiClient::new(base, Duration::from_secs(5), 0, Duration::from_millis(1))
}

#[test]
fn request_uses_remote_field_names() {
    let input = SizingInput {
        scenario: Scenario::HomeAc,
        mode: SizingMode::Pro,
        ..SizingInput::default()
    };
    let v = serde_json::to_value(&input).unwrap();
    let obj = v.as_object().unwrap();
    let mut names: Vec<&str> = obj.keys().map(String::as_str).collect();
    names.sort_unstable();
    assert_eq!(
        names,
        [
            "allowed_drop_pct",
            "distance",
            "group_factor",
            "material",
            "mode",
            "mount_type",
            "power",
            "power_factor",
            "scenario",
            "temp",
            "voltage"
        ]
    );
    assert_eq!(v["scenario"], "homeAC");
    assert_eq!(v["material"], "CU");
    assert_eq!(v["mount_type"], "concealed");
    assert_eq!(v["mode"], "pro");
}

#[test]
fn response_is_rounded_on_the_wire() {
    let res = cable::size_cable(&SizingInput::default()).unwrap();
    let v = serde_json::to_value(&res).unwrap();
    assert_eq!(v["load_current_a"], json!(34.86));
    assert_eq!(v["recommended_breaker_a"], json!(50));
    assert_eq!(v["recommended_cable_mm2"], json!(10.0));
    assert_eq!(v["voltage_drop_pct"], json!(1.41));
    assert_eq!(v["scenario"], "general");
}

#[test]
fn partial_request_fills_defaults() {
    let input: SizingInput =
        serde_json::from_value(json!({"power": 5.5, "voltage": 220, "scenario": "lighting"}))
            .unwrap();
    assert_eq!(input.rated_power_kw, 5.5);
    assert_eq!(input.scenario, Scenario::Lighting);
    assert_eq!(input.distance_m, 50.0);
}

#[test]
fn remote_calculate_round_trip() {
    let (base, rx) = serve_once(
        200,
        r#"{"load_current_a":34.86,"recommended_breaker_a":50,"recommended_cable_mm2":10.0,"voltage_drop_pct":1.41,"scenario":"general"}"#,
    );
    let res: SizingResult = client(&base).calculate(&SizingInput::default()).unwrap();
    assert_eq!(res.recommended_breaker_a, 50);
    assert_eq!(res.recommended_cable_mm2, 10.0);

    let (line, body) = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(line.starts_with("POST /api/calculate "), "{line}");
    let sent: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(sent["power"], json!(15.0));
    assert_eq!(sent["temp"], json!(30.0));
}

#[test]
fn market_request_carries_range() {
    let (base, rx) = serve_once(200, r#"{"price":9500.0,"history":[{"time":"Mon","price":9400.0}]}"#);
    let snap = client(&base).fetch_market(PriceRange::Week).unwrap();
    assert_eq!(snap.price, 9500.0);
    let (line, _) = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(line.starts_with("GET /api/market/price?range=week "), "{line}");
}

#[test]
fn client_error_is_not_retried() {
    let (base, _rx) = serve_once(422, r#"{"detail":"bad"}"#);
    let c = ApiClient::new(&base, Duration::from_secs(5), 3, Duration::from_millis(1));
    assert!(matches!(c.calculate(&SizingInput::default()), Err(ApiError::Status(422))));
}

#[test]
fn malformed_body_is_decode_error() {
    let (base, _rx) = serve_once(200, r#"{"price":"#);
    assert!(matches!(
        client(&base).fetch_market(PriceRange::Day),
        Err(ApiError::Decode(_))
    ));
}

#[test]
fn advisor_reply_lands_in_conversation() {
    let (base, rx) = serve_once(200, r#"{"text":"Use 4 mm² for that run."}"#);
    let tr = Translator::new("en");
    let mut chat = Conversation::new();
    assert!(chat.send(&client(&base), "  what size for 20 m?  ", "en", &tr));
    assert_eq!(chat.last_reply(), Some("Use 4 mm² for that run."));
    let (_, body) = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    let sent: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(sent, json!({"prompt": "what size for 20 m?", "lang": "en"}));
}
