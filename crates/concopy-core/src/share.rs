//! Share links for copy functions
//!
//! A function is shared as JSON, base64-encoded (standard alphabet) and
//! URL-component encoded into the `f` parameter of an install fragment:
//!
//! ```text
//! <base>#/install?f=<data>
//! ```

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::error::{ConcopyError, Result};
use crate::function::CopyFunction;
use crate::store::now_ms;

pub const INSTALL_FRAGMENT: &str = "#/install?f=";
pub const SHARE_VERSION: u32 = 1;

pub const DEFAULT_NAME: &str = "Imported Function";
pub const DEFAULT_DESCRIPTION: &str = "Imported from share URL";
pub const DEFAULT_BACKGROUND_COLOR: &str = "#E91E63";
pub const DEFAULT_TEXT_COLOR: &str = "#FFFFFF";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareTheme {
    #[serde(default)]
    pub text_color: String,
    #[serde(default)]
    pub background_color: String,
}

/// Transported subset of a copy function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub code: String,
    /// URL pattern; empty when unset
    #[serde(default)]
    pub pattern: String,
    #[serde(default)]
    pub theme: Option<ShareTheme>,
    #[serde(default = "default_version")]
    pub version: u32,
}

fn default_version() -> u32 {
    SHARE_VERSION
}

fn or_default(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

impl SharePayload {
    pub fn from_function(func: &CopyFunction) -> Self {
        Self {
            name: func.name.clone(),
            description: func.description.clone(),
            code: func.code.clone(),
            pattern: func.url_pattern.clone().unwrap_or_default(),
            theme: Some(ShareTheme {
                text_color: func
                    .text_color
                    .clone()
                    .unwrap_or_else(|| DEFAULT_TEXT_COLOR.to_string()),
                background_color: func
                    .background_color
                    .clone()
                    .unwrap_or_else(|| DEFAULT_BACKGROUND_COLOR.to_string()),
            }),
            version: SHARE_VERSION,
        }
    }

    /// New function with a fresh id; empty fields take the import defaults
    pub fn into_function(self) -> CopyFunction {
        let theme = self.theme.unwrap_or(ShareTheme {
            text_color: String::new(),
            background_color: String::new(),
        });
        let now = now_ms();

        CopyFunction {
            id: uuid::Uuid::new_v4().to_string(),
            name: or_default(self.name, DEFAULT_NAME),
            description: or_default(self.description, DEFAULT_DESCRIPTION),
            code: self.code,
            url_pattern: Some(self.pattern).filter(|p| !p.is_empty()),
            background_color: Some(or_default(theme.background_color, DEFAULT_BACKGROUND_COLOR)),
            text_color: Some(or_default(theme.text_color, DEFAULT_TEXT_COLOR)),
            created_at: now,
            updated_at: now,
            ..CopyFunction::default()
        }
    }
}

/// The URL-encoded `f` parameter value for `func`
pub fn encode_share_data(func: &CopyFunction) -> Result<String> {
    let json = serde_json::to_string(&SharePayload::from_function(func))?;
    let encoded = STANDARD.encode(json);
    Ok(form_urlencoded::byte_serialize(encoded.as_bytes()).collect())
}

/// `<base>#/install?f=<data>`; any fragment already on `base` is replaced
pub fn encode_share_url(base: &str, func: &CopyFunction) -> Result<String> {
    let base = base.split_once('#').map_or(base, |(before, _)| before);
    Ok(format!("{}{}{}", base, INSTALL_FRAGMENT, encode_share_data(func)?))
}

/// Decode an `f` parameter value, URL-encoded or not
pub fn decode_share_data(encoded: &str) -> Result<SharePayload> {
    let unescaped: String = form_urlencoded::parse(format!("f={}", encoded).as_bytes())
        .next()
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default();
    // `+` in unescaped base64 reads as a space above
    let base64 = unescaped.trim().replace(' ', "+");

    let bytes = STANDARD
        .decode(base64.as_bytes())
        .map_err(|e| ConcopyError::ShareDecodeFailed(format!("invalid base64: {}", e)))?;
    let payload: SharePayload = serde_json::from_slice(&bytes)
        .map_err(|e| ConcopyError::ShareDecodeFailed(format!("invalid payload: {}", e)))?;

    if payload.version > SHARE_VERSION {
        tracing::warn!(version = payload.version, "share payload from a newer version");
    }
    Ok(payload)
}

/// Decode a full share URL
pub fn decode_share_url(url: &str) -> Result<SharePayload> {
    let fragment = url
        .find(INSTALL_FRAGMENT)
        .map(|at| &url[at..])
        .ok_or_else(|| ConcopyError::ShareDecodeFailed("not a share URL".to_string()))?;

    let query = fragment.split_once('?').map_or("", |(_, query)| query);
    let data = query
        .split('&')
        .find_map(|pair| pair.strip_prefix("f="))
        .filter(|data| !data.is_empty())
        .ok_or_else(|| ConcopyError::ShareDecodeFailed("no function data in URL".to_string()))?;

    decode_share_data(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared() -> CopyFunction {
        let mut func = CopyFunction::from_code(
            "f1",
            "Markdown ✓",
            "(page) => { return { text: `[${page.title}](${page.url})` } }",
        );
        func.description = "Links & more".to_string();
        func.url_pattern = Some("https://*.example.com/*".to_string());
        func.background_color = Some("#2196F3".to_string());
        func
    }

    #[test]
    fn test_url_carries_install_fragment() {
        let url = encode_share_url("chrome-extension://abc/options.html#/old", &shared()).unwrap();
        assert!(url.starts_with("chrome-extension://abc/options.html#/install?f="));
        let data = &url[url.find("f=").unwrap() + 2..];
        assert!(!data.contains(['+', '/', '=']));
    }

    #[test]
    fn test_decode_shared_url_into_function() {
        let url = encode_share_url("https://concopy.app/", &shared()).unwrap();
        let func = decode_share_url(&url).unwrap().into_function();

        assert_ne!(func.id, "f1");
        assert_eq!(func.name, "Markdown ✓");
        assert_eq!(func.code, shared().code);
        assert_eq!(func.url_pattern.as_deref(), Some("https://*.example.com/*"));
        assert_eq!(func.background_color.as_deref(), Some("#2196F3"));
        assert_eq!(func.text_color.as_deref(), Some(DEFAULT_TEXT_COLOR));
        assert!(func.created_at > 0);
    }

    #[test]
    fn test_decode_raw_base64_with_plus() {
        let json = r#"{"name":"n","code":"a>>>b???","version":1}"#;
        let raw = STANDARD.encode(json);
        assert!(raw.contains('+') && raw.contains('/'));
        let payload = decode_share_data(&raw).unwrap();
        assert_eq!(payload.code, "a>>>b???");
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let encoded = STANDARD.encode(r#"{"code":"x"}"#);
        let func = decode_share_data(&encoded).unwrap().into_function();
        assert_eq!(func.name, DEFAULT_NAME);
        assert_eq!(func.description, DEFAULT_DESCRIPTION);
        assert_eq!(func.background_color.as_deref(), Some(DEFAULT_BACKGROUND_COLOR));
        assert_eq!(func.url_pattern, None);
    }

    #[test]
    fn test_decode_errors() {
        for url in [
            "https://ex.com/",
            "https://ex.com/#/install?f=",
            "https://ex.com/#/install?f=!!!",
            "https://ex.com/#/install?f=bm90IGpzb24%3D",
        ] {
            let err = decode_share_url(url).unwrap_err();
            assert_eq!(err.code(), "SHARE_DECODE_FAILED", "{url}");
        }
    }
}
