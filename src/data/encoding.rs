//! Text decoding for delimited imports
//!
//! Maps an [`EncodingSelector`] onto a concrete codec. `Auto` and `System`
//! use the host locale's charset (`LC_ALL`, `LC_CTYPE`, `LANG`), and anything
//! that does not resolve falls back to UTF-8.

use crate::types::EncodingSelector;
use encoding_rs::{Encoding, GBK, UTF_8, WINDOWS_1252};
use std::borrow::Cow;

/// Locale variables consulted for the host charset, in priority order
const LOCALE_VARS: &[&str] = &["LC_ALL", "LC_CTYPE", "LANG"];

/// Resolve the codec for a selector
pub fn resolve_encoding(selector: EncodingSelector) -> &'static Encoding {
    match selector {
        EncodingSelector::Utf8 => UTF_8,
        EncodingSelector::Gbk => GBK,
        // WHATWG maps the ISO-8859-1 label onto windows-1252
        EncodingSelector::Latin1 => WINDOWS_1252,
        EncodingSelector::Auto | EncodingSelector::System => {
            locale_encoding(|var| std::env::var(var).ok()).unwrap_or(UTF_8)
        }
    }
}

/// Decode raw file bytes with the selected encoding.
///
/// A byte-order mark overrides the selection. Malformed sequences are
/// replaced with U+FFFD.
pub fn decode_text(bytes: &[u8], selector: EncodingSelector) -> Cow<'_, str> {
    let encoding = resolve_encoding(selector);
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::warn!(
            encoding = used.name(),
            "Input contained malformed sequences; replaced with U+FFFD"
        );
    }
    text
}

/// Charset named by the first non-empty locale variable, if it maps to a codec.
///
/// `lookup` abstracts the environment so the resolution can be tested.
pub fn locale_encoding(lookup: impl Fn(&str) -> Option<String>) -> Option<&'static Encoding> {
    let locale = LOCALE_VARS
        .iter()
        .filter_map(|var| lookup(var))
        .find(|value| !value.is_empty())?;

    // e.g. "zh_CN.GBK@modifier"
    let charset = locale.split_once('.')?.1;
    let charset = charset.split('@').next().unwrap_or(charset);
    let label = match charset.to_lowercase().as_str() {
        "utf8" => "utf-8".to_string(),
        other => other.to_string(),
    };
    Encoding::for_label(label.as_bytes())
}
