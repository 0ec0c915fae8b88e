//! エンドポイント応答の正規化
//!
//! API Gatewayを経由すると本体が `{"statusCode": 200, "body": "<JSON文字列>"}` の
//! ようなエンベロープに包まれて返ることがある。`ENVELOPE_RULES` を先頭から評価し、
//! 最初に一致した規則で本体を取り出して `AnalysisResponse` に変換する。
//!
//! 規則の順序には意味がある: 文字列 `body` はトップレベルの `success` より優先される。

use crate::error::{Error, Result};
use crate::types::AnalysisResponse;
use serde_json::Value;

/// エンベロープ展開規則
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeRule {
    /// `body` が空でない文字列 → JSONとしてパースして使う
    StringBody,
    /// `success` キーが存在する → そのまま使う
    DirectSuccess,
    /// `body` がオブジェクト → それを使う（配列は対象外）
    ObjectBody,
    /// それ以外 → そのまま使う
    Raw,
}

/// 評価順
pub const ENVELOPE_RULES: [EnvelopeRule; 4] = [
    EnvelopeRule::StringBody,
    EnvelopeRule::DirectSuccess,
    EnvelopeRule::ObjectBody,
    EnvelopeRule::Raw,
];

impl EnvelopeRule {
    pub fn name(&self) -> &'static str {
        match self {
            EnvelopeRule::StringBody => "string body",
            EnvelopeRule::DirectSuccess => "direct success",
            EnvelopeRule::ObjectBody => "object body",
            EnvelopeRule::Raw => "raw",
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            EnvelopeRule::StringBody => matches!(
                value.get("body"),
                Some(Value::String(body)) if !body.is_empty()
            ),
            EnvelopeRule::DirectSuccess => value
                .as_object()
                .is_some_and(|obj| obj.contains_key("success")),
            EnvelopeRule::ObjectBody => matches!(value.get("body"), Some(Value::Object(_))),
            EnvelopeRule::Raw => true,
        }
    }

    fn unwrap(self, value: Value) -> Result<Value> {
        match self {
            EnvelopeRule::StringBody => {
                let body = value
                    .get("body")
                    .and_then(Value::as_str)
                    .ok_or_else(|| Error::Parse("body is not a string".into()))?;
                serde_json::from_str(body)
                    .map_err(|e| Error::Parse(format!("body string is not valid JSON: {}", e)))
            }
            EnvelopeRule::ObjectBody => match value {
                Value::Object(mut obj) => obj
                    .remove("body")
                    .ok_or_else(|| Error::Parse("body is missing".into())),
                _ => Err(Error::Parse("response is not a JSON object".into())),
            },
            EnvelopeRule::DirectSuccess | EnvelopeRule::Raw => Ok(value),
        }
    }
}

/// 最初に一致する規則を返す
pub fn select_rule(value: &Value) -> EnvelopeRule {
    ENVELOPE_RULES
        .iter()
        .copied()
        .find(|rule| rule.matches(value))
        .unwrap_or(EnvelopeRule::Raw)
}

/// パース済みJSONを正規化
///
/// # Returns
/// * `Ok((rule, response))` - 適用した規則と正規化結果
/// * `Err(Error::Parse)` - 本体がオブジェクトでない場合（型の合わないフィールドは未提供扱い）
pub fn normalize(value: Value) -> Result<(EnvelopeRule, AnalysisResponse)> {
    let rule = select_rule(&value);
    let payload = rule.unwrap(value)?;

    if !payload.is_object() {
        return Err(Error::Parse(format!(
            "expected a JSON object after applying the {} rule",
            rule.name()
        )));
    }

    let response = serde_json::from_value(payload)
        .map_err(|e| Error::Parse(format!("unexpected response shape: {}", e)))?;
    Ok((rule, response))
}

/// レスポンスボディ文字列をパースして正規化
pub fn parse_response_body(body: &str) -> Result<(EnvelopeRule, AnalysisResponse)> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| Error::Parse(format!("response body is not valid JSON: {}", e)))?;
    normalize(value)
}
