//! Task body sub-format: the `Question` parameter value
//!
//! The marketplace accepts the task body as a single string parameter that is
//! itself a full XML document, identified by a schema-namespace attribute.
//! Two schemas exist: a free-text-answer form and an embeddable HTML page.

use serde::Serialize;

pub const QUESTION_FORM_SCHEMA_URL: &str =
    "http://mechanicalturk.amazonaws.com/AWSMechanicalTurkDataSchemas/2005-10-01/QuestionForm.xsd";
pub const HTML_QUESTION_SCHEMA_URL: &str =
    "http://mechanicalturk.amazonaws.com/AWSMechanicalTurkDataSchemas/2011-11-11/HTMLQuestion.xsd";

/// Free-text-answer question form
#[derive(Debug, Clone, Serialize)]
pub struct QuestionForm {
    #[serde(rename = "@xmlns")]
    xmlns: String,
    #[serde(rename = "Question")]
    pub question: Question,
}

#[derive(Debug, Clone, Serialize)]
pub struct Question {
    #[serde(rename = "QuestionIdentifier")]
    pub question_identifier: String,
    #[serde(rename = "DisplayName")]
    pub display_name: String,
    #[serde(rename = "IsRequired")]
    pub is_required: bool,
    #[serde(rename = "QuestionContent")]
    pub content: QuestionContent,
    #[serde(rename = "AnswerSpecification")]
    pub answer_specification: AnswerSpecification,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionContent {
    #[serde(rename = "Text")]
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerSpecification {
    #[serde(rename = "FreeTextAnswer")]
    pub free_text: FreeTextAnswer,
}

#[derive(Debug, Clone, Serialize)]
pub struct FreeTextAnswer {
    #[serde(rename = "Constraints")]
    pub constraints: Constraints,
    #[serde(rename = "DefaultText")]
    pub default_text: String,
    #[serde(rename = "NumberOfLinesSuggestion")]
    pub lines_suggestion: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Constraints {
    #[serde(rename = "Length")]
    pub length: LengthConstraint,
}

#[derive(Debug, Clone, Serialize)]
pub struct LengthConstraint {
    #[serde(rename = "@minLength")]
    pub min_length: u32,
    #[serde(rename = "@maxLength")]
    pub max_length: u32,
}

impl QuestionForm {
    /// Build a single free-text question form
    pub fn free_text(
        identifier: impl Into<String>,
        display_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            xmlns: QUESTION_FORM_SCHEMA_URL.to_string(),
            question: Question {
                question_identifier: identifier.into(),
                display_name: display_name.into(),
                is_required: true,
                content: QuestionContent { text: text.into() },
                answer_specification: AnswerSpecification {
                    free_text: FreeTextAnswer {
                        constraints: Constraints {
                            length: LengthConstraint {
                                min_length: 1,
                                max_length: 500,
                            },
                        },
                        default_text: String::new(),
                        lines_suggestion: 1,
                    },
                },
            },
        }
    }

    /// Serialize to the single string value the `Question` parameter carries
    pub fn to_xml(&self) -> Result<String, quick_xml::DeError> {
        quick_xml::se::to_string(self)
    }
}

/// Embeddable HTML page question
#[derive(Debug, Clone, Serialize)]
#[serde(rename = "HTMLQuestion")]
pub struct HtmlQuestion {
    #[serde(rename = "@xmlns")]
    xmlns: String,
    /// Full HTML page; escaped on serialization, unescaped by the service
    #[serde(rename = "HTMLContent")]
    pub html_content: String,
    /// Height of the embedding frame, in pixels
    #[serde(rename = "FrameHeight")]
    pub frame_height: u32,
}

impl HtmlQuestion {
    pub fn new(html_content: impl Into<String>, frame_height: u32) -> Self {
        Self {
            xmlns: HTML_QUESTION_SCHEMA_URL.to_string(),
            html_content: html_content.into(),
            frame_height,
        }
    }

    /// Serialize to the single string value the `Question` parameter carries
    pub fn to_xml(&self) -> Result<String, quick_xml::DeError> {
        quick_xml::se::to_string(self)
    }
}
