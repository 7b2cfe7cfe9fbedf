//! Analysis sections and insight items.
//!
//! Both result kinds come straight out of model output, so they are parsed
//! all-or-nothing: one malformed entry discards the whole sequence.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One titled unit of the analysis result.
///
/// `content` stays schema-less; its shape is only inspected at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Heading, conventionally numbered ("1. 전처리").
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    /// Arbitrary section body.
    #[serde(default)]
    pub content: Value,
}

impl Section {
    /// Creates a new section.
    pub fn new(title: impl Into<String>, content: Value) -> Self {
        Self {
            title: title.into(),
            content,
        }
    }

    /// Heading for display: numeric prefix removed, positional fallback when empty.
    ///
    /// `index` is zero-based.
    pub fn display_title(&self, index: usize) -> String {
        if self.title.is_empty() {
            return format!("단계 {}", index + 1);
        }
        strip_numeric_prefix(&self.title).to_string()
    }
}

/// Treats an explicit `null` title like a missing one.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Ordered sections produced by the first model pass.
pub type AnalysisResult = Vec<Section>;

/// One insight entry.
///
/// Models answer with either `title`/`content` or `idea`/`description`; the
/// former wins when both are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawInsightItem")]
pub struct InsightItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl InsightItem {
    /// Creates a new insight item.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: Some(content.into()),
        }
    }

    /// Heading for display, with a positional fallback. `index` is zero-based.
    pub fn display_title(&self, index: usize) -> String {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => format!("인사이트 {}", index + 1),
        }
    }

    /// Body text, empty when the model omitted it.
    pub fn body(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }
}

#[derive(Deserialize)]
struct RawInsightItem {
    title: Option<String>,
    idea: Option<String>,
    content: Option<String>,
    description: Option<String>,
}

impl From<RawInsightItem> for InsightItem {
    fn from(raw: RawInsightItem) -> Self {
        Self {
            title: non_empty(raw.title).or(raw.idea),
            content: non_empty(raw.content).or(raw.description),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Ordered insight entries produced by the second model pass.
pub type InsightResult = Vec<InsightItem>;

/// Interprets a parsed model value as an analysis result.
///
/// Returns `None` unless the value is an array whose every entry is a section.
pub fn parse_analysis(value: Value) -> Option<AnalysisResult> {
    parse_sequence(value)
}

/// Interprets a parsed model value as an insight result.
///
/// Returns `None` unless the value is an array whose every entry is an insight.
pub fn parse_insights(value: Value) -> Option<InsightResult> {
    parse_sequence(value)
}

fn parse_sequence<T: serde::de::DeserializeOwned>(value: Value) -> Option<Vec<T>> {
    // serde would also accept positional arrays for structs; entries must be objects
    let entries_are_objects = value
        .as_array()
        .is_some_and(|entries| entries.iter().all(Value::is_object));
    if !entries_are_objects {
        return None;
    }
    serde_json::from_value(value).ok()
}

/// Removes a leading `N.` marker and at most one following whitespace char.
pub fn strip_numeric_prefix(title: &str) -> &str {
    let digits_end = title
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(title.len());

    if digits_end == 0 {
        return title;
    }

    let Some(rest) = title[digits_end..].strip_prefix('.') else {
        return title;
    };

    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_whitespace() => chars.as_str(),
        _ => rest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_numbered_prefix() {
        assert_eq!(strip_numeric_prefix("1. 전처리"), "전처리");
        assert_eq!(strip_numeric_prefix("12.유형 분류"), "유형 분류");
        assert_eq!(strip_numeric_prefix("3.  질문 분석"), " 질문 분석");
    }

    #[test]
    fn leaves_unnumbered_titles_alone() {
        assert_eq!(strip_numeric_prefix("상호작용 분석"), "상호작용 분석");
        assert_eq!(strip_numeric_prefix("4 상호작용"), "4 상호작용");
        assert_eq!(strip_numeric_prefix(".5 비율"), ".5 비율");
    }

    #[test]
    fn section_display_title_falls_back_to_position() {
        let section = Section::new("", json!(null));
        assert_eq!(section.display_title(2), "단계 3");
    }

    #[test]
    fn section_missing_fields_default() {
        let section: Section = serde_json::from_value(json!({})).unwrap();
        assert_eq!(section.title, "");
        assert_eq!(section.content, Value::Null);
    }

    #[test]
    fn section_null_title_reads_as_missing() {
        let result = parse_analysis(json!([{"title": null, "content": "본문"}])).unwrap();
        assert_eq!(result[0].title, "");
        assert_eq!(result[0].display_title(0), "단계 1");
    }

    #[test]
    fn parse_analysis_accepts_section_array() {
        let value = json!([
            {"title": "1. 전처리", "content": [{"speaker": "T1", "stage": "도입", "text": "안녕하세요"}]},
            {"title": "4. 상호작용 분석", "content": {"teacherCount": 1}}
        ]);
        let result = parse_analysis(value).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[1].display_title(1), "상호작용 분석");
    }

    #[test]
    fn parse_analysis_rejects_non_array() {
        assert!(parse_analysis(json!({"analysis": []})).is_none());
        assert!(parse_analysis(json!("text")).is_none());
    }

    #[test]
    fn parse_analysis_is_all_or_nothing() {
        let value = json!([
            {"title": "1. 전처리", "content": []},
            42
        ]);
        assert!(parse_analysis(value).is_none());

        let value = json!([{"title": 7, "content": []}]);
        assert!(parse_analysis(value).is_none());

        let value = json!([["1. 전처리", []]]);
        assert!(parse_analysis(value).is_none());
    }

    #[test]
    fn parse_analysis_accepts_empty_array() {
        assert_eq!(parse_analysis(json!([])), Some(vec![]));
    }

    #[test]
    fn insight_accepts_alternate_keys() {
        let items = parse_insights(json!([
            {"title": "5. 인사이트 도출", "content": "질문 비율을 높이세요"},
            {"idea": "모둠 활동", "description": "토의 시간을 늘리세요"}
        ]))
        .unwrap();

        assert_eq!(items[0], InsightItem::new("5. 인사이트 도출", "질문 비율을 높이세요"));
        assert_eq!(items[1], InsightItem::new("모둠 활동", "토의 시간을 늘리세요"));
    }

    #[test]
    fn insight_prefers_primary_keys() {
        let items = parse_insights(json!([
            {"title": "A", "idea": "B", "content": "C", "description": "D"}
        ]))
        .unwrap();
        assert_eq!(items[0], InsightItem::new("A", "C"));
    }

    #[test]
    fn insight_display_falls_back_to_position() {
        let items = parse_insights(json!([{"description": "본문"}])).unwrap();
        assert_eq!(items[0].display_title(0), "인사이트 1");
        assert_eq!(items[0].body(), "본문");
    }

    #[test]
    fn insight_with_non_string_body_invalidates_result() {
        assert!(parse_insights(json!([{"title": "A", "content": {"x": 1}}])).is_none());
    }

    #[test]
    fn insight_serializes_with_primary_keys() {
        let item = InsightItem::new("A", "B");
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({"title": "A", "content": "B"})
        );
    }
}
