pub mod gemini;
pub mod response;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InputError;

pub use response::{
    AiResponse, GraphData, GraphPoint, GuessPaper, MathSolution, Mcq, PaperCheck, QuestionAnswer,
};

/// Which task the backend is asked to perform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppMode {
    #[default]
    StudyMaterial,
    McqGenerator,
    PaperChecker,
    MathSolver,
    GraphPlotter,
    GuessPaper,
}

impl AppMode {
    pub const ALL: [AppMode; 6] = [
        AppMode::StudyMaterial,
        AppMode::McqGenerator,
        AppMode::MathSolver,
        AppMode::GraphPlotter,
        AppMode::PaperChecker,
        AppMode::GuessPaper,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            AppMode::StudyMaterial => "study-material",
            AppMode::McqGenerator => "mcq-generator",
            AppMode::PaperChecker => "paper-checker",
            AppMode::MathSolver => "math-solver",
            AppMode::GraphPlotter => "graph-plotter",
            AppMode::GuessPaper => "guess-paper",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AppMode::StudyMaterial => "Study Material",
            AppMode::McqGenerator => "MCQ Generator",
            AppMode::PaperChecker => "Paper Checker",
            AppMode::MathSolver => "Math Solver",
            AppMode::GraphPlotter => "Graph Plotter",
            AppMode::GuessPaper => "Guess Paper",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            AppMode::StudyMaterial => "Notes & summaries",
            AppMode::McqGenerator => "Create quizzes",
            AppMode::PaperChecker => "Grading & Feedback",
            AppMode::MathSolver => "Step-by-step help",
            AppMode::GraphPlotter => "Visualize functions",
            AppMode::GuessPaper => "Important topics",
        }
    }

    /// Hint shown in the empty prompt box.
    pub fn placeholder(self) -> &'static str {
        match self {
            AppMode::MathSolver => {
                "Type a math problem (e.g. Solve 2x + 5 = 15) or upload a photo of your homework..."
            }
            AppMode::GraphPlotter => "Enter a function to visualize (e.g. y = sin(x) * x)...",
            AppMode::McqGenerator => {
                "Paste your study notes, topic name, or upload a chapter PDF to generate quizzes..."
            }
            AppMode::PaperChecker => {
                "Upload a clear image of your solved paper or typed answer for grading..."
            }
            AppMode::StudyMaterial | AppMode::GuessPaper => {
                "What do you want to learn today? Type a topic or question..."
            }
        }
    }
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AppMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppMode::ALL
            .into_iter()
            .find(|mode| mode.slug() == s.trim())
            .ok_or_else(|| format!("unknown mode: {s}"))
    }
}

/// A single uploaded file sent inline with the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub bytes: Vec<u8>,
    pub media_type: String,
    pub file_name: Option<String>,
}

/// Everything the user submitted in one go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitRequest {
    pub prompt: String,
    pub mode: AppMode,
    pub attachment: Option<Attachment>,
}

impl SubmitRequest {
    pub fn validate(&self) -> Result<(), InputError> {
        let has_file = self
            .attachment
            .as_ref()
            .is_some_and(|file| !file.bytes.is_empty());
        if self.prompt.is_empty() && !has_file {
            return Err(InputError::EmptySubmission);
        }
        Ok(())
    }
}
