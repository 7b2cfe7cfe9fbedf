//! Prompt templates for the two analysis passes.
//!
//! Both templates ask for a top-level JSON array of `{title, content}` objects
//! and forbid code fences, markdown and commentary. Inputs are embedded
//! verbatim; callers reject empty input before reaching this point.

use serde_json::{Map, Value};

use super::section::{AnalysisResult, Section};

/// Sampling temperature for the transcript analysis pass.
pub const ANALYSIS_TEMPERATURE: f32 = 0.3;

/// Sampling temperature for the insight pass.
pub const INSIGHT_TEMPERATURE: f32 = 0.4;

const TRANSCRIPT_SLOT: &str = "{{TRANSCRIPT}}";
const ANALYSIS_SLOT: &str = "{{ANALYSIS}}";

const ANALYSIS_TEMPLATE: &str = r#"
당신은 교육 데이터를 분석하는 전문가 GPT입니다.
아래 형식의 JSON 배열(최상위)에 각 단계별 결과를 "title", "content" 키로 넣어 반환하세요.
코드블록(```)이나 마크다운, 주석, 불필요한 안내문은 절대 사용하지 마세요.

[
  { "title": "1. 전처리", "content": [ { "speaker": "...", "stage": "...", "text": "..." }, ... ] },
  { "title": "2. 유형 분류", "content": [ { "id": 1, "types": ["설명","질문"] }, ... ] },
  { "title": "3. 질문 분석", "content": [ { "form": "...", "focus": "...", "bloom": "..." }, ... ] },
  { "title": "4. 상호작용 분석", "content": { "teacherCount":0, "studentCount":0, "ratio":0.0, "averageSentenceLength":0, "vocabularyDiversityIndex":0.0, "sentimentRatio":{"positive":0,"negative":0} } }
]

분석 절차:
1. [전처리] 발화를 화자, 수업 단계, 발화 내용으로 나눕니다.
2. [유형 분류] 각 발화의 유형(설명, 질문, 피드백, 응답 등)을 분류합니다.
3. [질문 분석] 교사 질문의 형태, 초점, Bloom 인지 수준을 분석합니다.
4. [상호작용 분석] 교사/학생 발화 수, 비율, 평균 문장 길이, 어휘 다양도, 감정 비율을 계산합니다.

사용자가 제공한 발화 데이터:
"""
{{TRANSCRIPT}}
"""
반드시 위 예시와 동일한 구조의 JSON 배열만 반환하세요.
"#;

const INSIGHT_TEMPLATE: &str = r#"
당신은 교사에게 수업 개선 아이디어와 종합 피드백을 제공하는 전문가입니다.
반드시 아래 형식의 JSON 배열만 출력하세요.
코드블록, 마크다운, 주석, 불필요한 안내문 절대 사용 금지. 한글만, 영어 금지.

[
  { "title": "5. 인사이트 도출", "content": "학습 개선 전략 및 실행 방안 요약" },
  { "title": "6. 최종 리포트",   "content": "종합 교사용 피드백" }
]

분석 결과:
{{ANALYSIS}}

반드시 위 예시와 동일한 구조로 JSON 배열만 반환하세요.
"#;

/// Builds the first-pass prompt around a raw transcript.
pub fn build_analysis_prompt(text: &str) -> String {
    ANALYSIS_TEMPLATE.replacen(TRANSCRIPT_SLOT, text, 1)
}

/// Builds the second-pass prompt around a prior analysis.
///
/// The analysis is embedded as JSON pretty-printed with two-space indentation.
pub fn build_insight_prompt(analysis: &AnalysisResult) -> String {
    let serialized = format!("{:#}", analysis_to_value(analysis));
    INSIGHT_TEMPLATE.replacen(ANALYSIS_SLOT, &serialized, 1)
}

fn analysis_to_value(analysis: &[Section]) -> Value {
    Value::Array(
        analysis
            .iter()
            .map(|section| {
                let mut object = Map::new();
                object.insert("title".to_string(), Value::String(section.title.clone()));
                object.insert("content".to_string(), section.content.clone());
                Value::Object(object)
            })
            .collect(),
    )
}
