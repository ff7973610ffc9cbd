//! System instruction and response schema sent with every generation.

use serde_json::{Value, json};

use crate::models::AppMode;

/// Text part used when only a file was uploaded.
pub const FALLBACK_PROMPT: &str = "Analyze this content.";

const PREAMBLE: &str = "You are a world-class educational AI assistant.

**CRITICAL LANGUAGE RULE**:
- Detect the language of the user input (text or image).
- If the input is in **Urdu**, ALL generated output (Questions, Answers, MCQs, Explanations) MUST be in **Urdu**.
- Otherwise answer in the language of the input, defaulting to English.

**Tasks**:
1. Detect the subject automatically (Math, Physics, Chemistry, Biology, English, Islamiat, Pakistan Studies, CS, etc.).
2. If the input is handwritten or blurry, try your best to read it.
3. Structure your output strictly according to the requested JSON schema and return a single JSON object with no surrounding text.
";

pub fn mode_addendum(mode: AppMode) -> &'static str {
    match mode {
        AppMode::PaperChecker => {
            "Your primary task is to check the student's solved paper. Provide marks, point out specific mistakes, and show corrections. Fill 'paperCheck'."
        }
        AppMode::MathSolver => {
            "Your primary task is to solve the math problem step-by-step and give the final answer in 'mathSolution'. If a function is present, generate 'graphData' points for a graph (x from -10 to 10 usually)."
        }
        AppMode::GraphPlotter => {
            "Your MAIN task is to identify the function and generate 'graphData' with at least 20 data points (x, y) for smooth plotting. Also provide a 'generalExplanation' of the graph's properties (domain, range, intercept). Do NOT generate MCQs or long questions."
        }
        AppMode::McqGenerator => {
            "Your MAIN task is to generate exactly **10 High-Quality MCQs** based on the input content.
- Do NOT generate Short or Long questions.
- Ensure exactly one option is definitely correct and 'correctAnswer' repeats it verbatim.
- If input is Urdu, MCQs must be in Urdu."
        }
        AppMode::GuessPaper => {
            "Your primary task is to generate a 'Guess Paper' with important expected questions and topics based on the input content context. Fill 'guessPaper'."
        }
        AppMode::StudyMaterial => {
            "Generate study materials: MCQs, Short Questions, and Long Questions based on the content."
        }
    }
}

pub fn system_instruction(mode: AppMode) -> String {
    format!("{PREAMBLE}\n{}", mode_addendum(mode))
}

fn string_list() -> Value {
    json!({ "type": "ARRAY", "items": { "type": "STRING" } })
}

fn question_answer_list(answer_hint: &str) -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "question": { "type": "STRING" },
                "answer": { "type": "STRING", "description": answer_hint }
            }
        }
    })
}

/// Gemini schema describing [`crate::models::AiResponse`].
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "subject": {
                "type": "STRING",
                "description": "The detected subject (Math, Physics, Urdu, Islamiat, etc.)"
            },
            "topic": { "type": "STRING", "description": "The specific topic detected" },
            "generalExplanation": {
                "type": "STRING",
                "description": "A simple explanation. If input is Urdu, this MUST be in Urdu."
            },
            "mcqs": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "question": { "type": "STRING" },
                        "options": string_list(),
                        "correctAnswer": { "type": "STRING" }
                    },
                    "required": ["question", "options", "correctAnswer"]
                }
            },
            "shortQuestions": question_answer_list("3-5 lines answer"),
            "longQuestions": question_answer_list("Detailed conceptual answer"),
            "paperCheck": {
                "type": "OBJECT",
                "properties": {
                    "obtainedMarks": { "type": "STRING" },
                    "totalMarks": { "type": "STRING" },
                    "feedback": { "type": "STRING" },
                    "mistakes": string_list(),
                    "corrections": string_list()
                }
            },
            "guessPaper": {
                "type": "OBJECT",
                "properties": {
                    "importantTopics": string_list(),
                    "expectedQuestions": string_list()
                }
            },
            "mathSolution": {
                "type": "OBJECT",
                "properties": {
                    "steps": string_list(),
                    "finalAnswer": { "type": "STRING" }
                }
            },
            "graphData": {
                "type": "OBJECT",
                "description": "Only if a function is detected that can be plotted.",
                "properties": {
                    "title": { "type": "STRING" },
                    "xLabel": { "type": "STRING" },
                    "yLabel": { "type": "STRING" },
                    "dataPoints": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "x": { "type": "NUMBER" },
                                "y": { "type": "NUMBER" }
                            },
                            "required": ["x", "y"]
                        }
                    }
                }
            }
        }
    })
}
