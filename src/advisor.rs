//! AI 어드바이저 대화 기록.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::ApiError;
use crate::i18n::{keys, Translator};

/// 질문을 받아 답변 문장을 돌려주는 상대. 원격 API 클라이언트가 구현한다.
pub trait Advisor {
    fn ask(&self, prompt: &str, lang: &str) -> Result<String, ApiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Bot,
            text: text.into(),
        }
    }
}

/// 채팅 화면 한 개의 대화 내용.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// 사용자 질문을 기록한다. 공백뿐인 질문은 무시하고 None.
    pub fn push_user(&mut self, prompt: &str) -> Option<String> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return None;
        }
        self.messages.push(ChatMessage::user(prompt));
        Some(prompt.to_string())
    }

    /// 어드바이저 응답(또는 실패)을 기록한다. 실패하면 번역된 연결 오류 문구를 남긴다.
    pub fn push_reply(&mut self, reply: Result<String, ApiError>, tr: &Translator) {
        let text = match reply {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "advisor request failed");
                tr.t(keys::ADVISOR_CONNECTION_ERROR).into_owned()
            }
        };
        self.messages.push(ChatMessage::bot(text));
    }

    /// 질문을 보내고 답변까지 기록한다. 빈 질문이면 아무것도 하지 않고 false.
    pub fn send(
        &mut self,
        advisor: &impl Advisor,
        prompt: &str,
        lang: &str,
        tr: &Translator,
    ) -> bool {
        let Some(prompt) = self.push_user(prompt) else {
            return false;
        };
        let reply = advisor.ask(&prompt, lang);
        self.push_reply(reply, tr);
        true
    }

    pub fn last_reply(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::Bot)
            .map(|m| m.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Echo {
        seen: RefCell<Vec<(String, String)>>,
    }

    impl Advisor for Echo {
        fn ask(&self, prompt: &str, lang: &str) -> Result<String, ApiError> {
            self.seen
                .borrow_mut()
                .push((prompt.to_string(), lang.to_string()));
            Ok(format!("re: {prompt}"))
        }
    }

    struct Offline;

    impl Advisor for Offline {
        fn ask(&self, _prompt: &str, _lang: &str) -> Result<String, ApiError> {
            Err(ApiError::Transport("connection refused".into()))
        }
    }

    #[test]
    fn send_trims_and_records_both_sides() {
        let tr = Translator::new("en");
        let advisor = Echo {
            seen: RefCell::new(Vec::new()),
        };
        let mut chat = Conversation::new();
        assert!(chat.send(&advisor, "  how thick for 5kW?  ", "en", &tr));
        assert_eq!(chat.messages().len(), 2);
        assert_eq!(chat.messages()[0], ChatMessage::user("how thick for 5kW?"));
        assert_eq!(chat.last_reply(), Some("re: how thick for 5kW?"));
        assert_eq!(advisor.seen.borrow()[0].1, "en");
    }

    #[test]
    fn blank_prompt_is_ignored() {
        let tr = Translator::new("en");
        let mut chat = Conversation::new();
        assert!(!chat.send(&Offline, "   ", "en", &tr));
        assert!(chat.is_empty());
    }

    #[test]
    fn failure_appends_localized_notice() {
        let tr = Translator::new("en");
        let mut chat = Conversation::new();
        chat.send(&Offline, "hello", "en", &tr);
        assert_eq!(
            chat.last_reply(),
            Some("I am having trouble connecting. Please try again later.")
        );
    }
}
