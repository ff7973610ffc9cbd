//! The structured study result returned by the model.
//!
//! Every section is optional. Which ones are present decides which result
//! tabs exist, so `None` and an empty list are kept apart.
//!
//! Inside a section only MCQ items and graph points are strict; the request
//! schema marks exactly those keys required. Free text defaults to empty.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiResponse {
    #[serde(default)]
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general_explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcqs: Option<Vec<Mcq>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_questions: Option<Vec<QuestionAnswer>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_questions: Option<Vec<QuestionAnswer>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper_check: Option<PaperCheck>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guess_paper: Option<GuessPaper>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub math_solution: Option<MathSolution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_data: Option<GraphData>,
}

impl AiResponse {
    pub fn mcq_list(&self) -> &[Mcq] {
        self.mcqs.as_deref().unwrap_or_default()
    }

    pub fn short_list(&self) -> &[QuestionAnswer] {
        self.short_questions.as_deref().unwrap_or_default()
    }

    pub fn long_list(&self) -> &[QuestionAnswer] {
        self.long_questions.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mcq {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

/// Grading report. Marks are whatever the model wrote, e.g. "7.5" or "N/A".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperCheck {
    #[serde(default)]
    pub obtained_marks: String,
    #[serde(default)]
    pub total_marks: String,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub mistakes: Vec<String>,
    #[serde(default)]
    pub corrections: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessPaper {
    #[serde(default)]
    pub important_topics: Vec<String>,
    #[serde(default)]
    pub expected_questions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MathSolution {
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub final_answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphData {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub x_label: String,
    #[serde(default)]
    pub y_label: String,
    #[serde(default)]
    pub data_points: Vec<GraphPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphPoint {
    pub x: f64,
    pub y: f64,
}
