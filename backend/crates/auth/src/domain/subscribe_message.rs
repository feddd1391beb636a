//! Subscribe Message
//!
//! Template notification pushed to a user who subscribed to it in the
//! mini-program.

use std::collections::BTreeMap;

use crate::domain::value_object::open_id::OpenId;

/// Which build of the mini-program a tapped notification opens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MiniProgramState {
    Developer,
    Trial,
    #[default]
    Formal,
}

impl MiniProgramState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MiniProgramState::Developer => "developer",
            MiniProgramState::Trial => "trial",
            MiniProgramState::Formal => "formal",
        }
    }
}

/// Subscribe message payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeMessage {
    pub to_user: OpenId,
    pub template_id: String,
    /// Page opened when the notification is tapped
    pub page: Option<String>,
    /// Template keyword -> value
    pub data: BTreeMap<String, String>,
    pub state: MiniProgramState,
    pub lang: String,
}

impl SubscribeMessage {
    pub fn new(to_user: OpenId, template_id: impl Into<String>) -> Self {
        Self {
            to_user,
            template_id: template_id.into(),
            page: None,
            data: BTreeMap::new(),
            state: MiniProgramState::default(),
            lang: "zh_CN".to_string(),
        }
    }

    pub fn page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn state(mut self, state: MiniProgramState) -> Self {
        self.state = state;
        self
    }

    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }
}

/// Outcome of a send that reached the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    Rejected(crate::domain::identity::ProviderRejection),
}
