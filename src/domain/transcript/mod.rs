//! Transcript analysis domain.
//!
//! Everything between raw model text and display-ready sections:
//!
//! - `prompts` - Fixed instruction templates for the analysis and insight passes
//! - `sanitizer` - Code-fence/heading stripping and strict JSON parsing
//! - `section` - Section and insight types with all-or-nothing parsing
//! - `renderer` - Shape classification and presentation building
//! - `errors` - Sanitization and analysis error types

mod errors;
mod prompts;
mod renderer;
mod sanitizer;
mod section;

pub use errors::{AnalysisError, SanitizeError};
pub use prompts::{
    build_analysis_prompt, build_insight_prompt, ANALYSIS_TEMPERATURE, INSIGHT_TEMPERATURE,
};
pub use renderer::{
    ContentKind, Presentation, RenderedInsight, RenderedSection, SectionRenderer, MISSING_CELL,
};
pub use sanitizer::ResponseSanitizer;
pub use section::{
    parse_analysis, parse_insights, strip_numeric_prefix, AnalysisResult, InsightItem,
    InsightResult, Section,
};
