use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

use crate::error::VoiceReplyError;

/// Short language code selecting the spoken language and its default
/// speaking instruction.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VoiceTag {
    Jp,
    Zh,
    En,
}

impl VoiceTag {
    /// Language name the API expects in `language_type`.
    pub fn language_type(self) -> &'static str {
        match self {
            VoiceTag::Jp => "Japanese",
            VoiceTag::Zh => "Chinese",
            VoiceTag::En => "English",
        }
    }

    /// Instruction attached to requests for models that accept free-text
    /// instructions.
    pub fn default_instruction(self) -> &'static str {
        match self {
            VoiceTag::Jp => "自然で親しみやすい日本語で話してください。",
            VoiceTag::Zh => "自然で聞き取りやすい中国語で話してください。",
            VoiceTag::En => "Speak in clear and natural English.",
        }
    }

    /// Accepted tag names, sorted, for help and error text.
    pub fn names() -> Vec<String> {
        let mut names: Vec<String> = VoiceTag::iter().map(|tag| tag.to_string()).collect();
        names.sort();
        names
    }

    pub fn parse(raw: &str) -> Result<Self, VoiceReplyError> {
        VoiceTag::from_str(raw.trim()).map_err(|_| {
            VoiceReplyError::config(format!(
                "unknown voice tag '{raw}', expected one of: {}",
                VoiceTag::names().join(" | ")
            ))
        })
    }
}
