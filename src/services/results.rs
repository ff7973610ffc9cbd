//! Presentation state for one study result.
//!
//! Which tabs exist is decided once, when the result arrives. Quiz state is
//! keyed by question index and lives exactly as long as the result.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ViewError;
use crate::models::AiResponse;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tab {
    #[default]
    Overview,
    Mcq,
    Short,
    Long,
    Math,
    Report,
    GuessPaper,
}

impl Tab {
    pub const ALL: [Tab; 7] = [
        Tab::Overview,
        Tab::Mcq,
        Tab::Short,
        Tab::Long,
        Tab::Math,
        Tab::Report,
        Tab::GuessPaper,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Tab::Overview => "overview",
            Tab::Mcq => "mcq",
            Tab::Short => "short",
            Tab::Long => "long",
            Tab::Math => "math",
            Tab::Report => "report",
            Tab::GuessPaper => "guess-paper",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Mcq => "MCQs",
            Tab::Short => "Short Qs",
            Tab::Long => "Long Qs",
            Tab::Math => "Math",
            Tab::Report => "Report",
            Tab::GuessPaper => "Guess Paper",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|tab| tab.slug() == s.trim())
            .ok_or_else(|| format!("unknown tab: {s}"))
    }
}

/// Tabs that have something to show, Overview always first.
pub fn eligible_tabs(response: &AiResponse) -> Vec<Tab> {
    let mut tabs = vec![Tab::Overview];
    if !response.mcq_list().is_empty() {
        tabs.push(Tab::Mcq);
    }
    if !response.short_list().is_empty() {
        tabs.push(Tab::Short);
    }
    if !response.long_list().is_empty() {
        tabs.push(Tab::Long);
    }
    if response.math_solution.is_some() || response.graph_data.is_some() {
        tabs.push(Tab::Math);
    }
    if response.paper_check.is_some() {
        tabs.push(Tab::Report);
    }
    if response.guess_paper.is_some() {
        tabs.push(Tab::GuessPaper);
    }
    tabs
}

/// Tab opened when a result first arrives.
///
/// Only MCQs and graphs steer away from Overview. A result holding just a
/// report or guess paper still opens on Overview.
pub fn initial_tab(response: &AiResponse) -> Tab {
    if !response.mcq_list().is_empty() && response.short_list().is_empty() {
        Tab::Mcq
    } else if response.graph_data.is_some() && response.mcqs.is_none() {
        Tab::Math
    } else {
        Tab::Overview
    }
}

/// How one MCQ option should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptionMark {
    Idle,
    Picked,
    /// The right answer, which the user did not pick.
    Correct,
    PickedCorrect,
    PickedWrong,
    Faded,
}

impl OptionMark {
    pub fn css_class(self) -> &'static str {
        match self {
            OptionMark::Idle => "opt",
            OptionMark::Picked => "opt picked",
            OptionMark::Correct => "opt correct",
            OptionMark::PickedCorrect => "opt correct picked",
            OptionMark::PickedWrong => "opt wrong",
            OptionMark::Faded => "opt faded",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuizState {
    pub selected: BTreeMap<usize, String>,
    pub revealed: BTreeMap<usize, bool>,
}

impl QuizState {
    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(&index).copied().unwrap_or(false)
    }

    pub fn selected(&self, index: usize) -> Option<&str> {
        self.selected.get(&index).map(String::as_str)
    }
}

/// Shortcut shown on the Overview tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverviewCard {
    pub tab: Tab,
    pub headline: String,
    pub caption: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    tabs: Vec<Tab>,
    active: Tab,
    quiz: QuizState,
}

impl ResultsView {
    pub fn new(response: &AiResponse) -> Self {
        Self {
            tabs: eligible_tabs(response),
            active: initial_tab(response),
            quiz: QuizState::default(),
        }
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn active_tab(&self) -> Tab {
        self.active
    }

    pub fn quiz(&self) -> &QuizState {
        &self.quiz
    }

    pub fn is_eligible(&self, tab: Tab) -> bool {
        self.tabs.contains(&tab)
    }

    pub fn select_tab(&mut self, tab: Tab) -> Result<(), ViewError> {
        if !self.is_eligible(tab) {
            return Err(ViewError::IneligibleTab(tab));
        }
        self.active = tab;
        Ok(())
    }

    /// Records a pick for question `index`. Ignored once the question is revealed.
    pub fn select_option(
        &mut self,
        response: &AiResponse,
        index: usize,
        option: &str,
    ) -> Result<(), ViewError> {
        let mcq = response
            .mcq_list()
            .get(index)
            .ok_or(ViewError::NoSuchQuestion(index))?;
        if self.quiz.is_revealed(index) {
            return Ok(());
        }
        if !mcq.options.iter().any(|candidate| candidate == option) {
            return Err(ViewError::NoSuchOption {
                index,
                option: option.to_string(),
            });
        }
        self.quiz.selected.insert(index, option.to_string());
        Ok(())
    }

    pub fn reveal(&mut self, response: &AiResponse, index: usize) -> Result<(), ViewError> {
        if index >= response.mcq_list().len() {
            return Err(ViewError::NoSuchQuestion(index));
        }
        if self.quiz.selected(index).is_none() {
            return Err(ViewError::NothingSelected(index));
        }
        self.quiz.revealed.insert(index, true);
        Ok(())
    }

    pub fn is_correct(&self, response: &AiResponse, index: usize) -> Option<bool> {
        let mcq = response.mcq_list().get(index)?;
        let selected = self.quiz.selected(index)?;
        Some(selected == mcq.correct_answer)
    }

    pub fn option_mark(&self, response: &AiResponse, index: usize, option: &str) -> OptionMark {
        let picked = self.quiz.selected(index) == Some(option);
        if !self.quiz.is_revealed(index) {
            return if picked {
                OptionMark::Picked
            } else {
                OptionMark::Idle
            };
        }

        let is_answer = response
            .mcq_list()
            .get(index)
            .is_some_and(|mcq| mcq.correct_answer == option);
        match (is_answer, picked) {
            (true, true) => OptionMark::PickedCorrect,
            (true, false) => OptionMark::Correct,
            (false, true) => OptionMark::PickedWrong,
            (false, false) => OptionMark::Faded,
        }
    }

    pub fn solved_count(&self) -> usize {
        self.quiz.revealed.values().filter(|revealed| **revealed).count()
    }

    pub fn overview_cards(&self, response: &AiResponse) -> Vec<OverviewCard> {
        let mut cards = Vec::new();
        let counts = [
            (Tab::Mcq, response.mcq_list().len(), "MCQs"),
            (Tab::Short, response.short_list().len(), "Short Qs"),
            (Tab::Long, response.long_list().len(), "Detailed Qs"),
        ];
        for (tab, count, caption) in counts {
            if self.is_eligible(tab) {
                cards.push(OverviewCard {
                    tab,
                    headline: count.to_string(),
                    caption,
                });
            }
        }
        if self.is_eligible(Tab::Math) {
            cards.push(OverviewCard {
                tab: Tab::Math,
                headline: "View Solution".to_string(),
                caption: "Math Analysis",
            });
        }
        cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GraphData, GraphPoint, GuessPaper, MathSolution, Mcq, PaperCheck, QuestionAnswer};
    use pretty_assertions::assert_eq;

    fn mcq(question: &str, options: &[&str], answer: &str) -> Mcq {
        Mcq {
            question: question.into(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer: answer.into(),
        }
    }

    fn qa() -> QuestionAnswer {
        QuestionAnswer {
            question: "Define force.".into(),
            answer: "A push or a pull.".into(),
        }
    }

    fn graph() -> GraphData {
        GraphData {
            title: "y = x^2".into(),
            x_label: "x".into(),
            y_label: "y".into(),
            data_points: vec![GraphPoint { x: 0.0, y: 0.0 }, GraphPoint { x: 1.0, y: 1.0 }],
        }
    }

    fn paper_check() -> PaperCheck {
        PaperCheck {
            obtained_marks: "6".into(),
            total_marks: "10".into(),
            feedback: "Show your working.".into(),
            mistakes: vec!["Q2 sign error".into()],
            corrections: vec!["x = -3".into()],
        }
    }

    fn arithmetic() -> AiResponse {
        AiResponse {
            subject: "Math".into(),
            mcqs: Some(vec![
                mcq("2+2=?", &["3", "4", "5"], "4"),
                mcq("3*3=?", &["6", "9"], "9"),
            ]),
            ..Default::default()
        }
    }

    #[test]
    fn test_initial_tab_mcq_when_no_short_questions() {
        assert_eq!(initial_tab(&arithmetic()), Tab::Mcq);

        let with_empty_short = AiResponse {
            short_questions: Some(Vec::new()),
            ..arithmetic()
        };
        assert_eq!(initial_tab(&with_empty_short), Tab::Mcq);

        let with_short = AiResponse {
            short_questions: Some(vec![qa()]),
            ..arithmetic()
        };
        assert_eq!(initial_tab(&with_short), Tab::Overview);
    }

    #[test]
    fn test_initial_tab_math_only_when_mcqs_absent() {
        let graph_only = AiResponse {
            graph_data: Some(graph()),
            ..Default::default()
        };
        assert_eq!(initial_tab(&graph_only), Tab::Math);

        let graph_with_empty_mcqs = AiResponse {
            graph_data: Some(graph()),
            mcqs: Some(Vec::new()),
            ..Default::default()
        };
        assert_eq!(initial_tab(&graph_with_empty_mcqs), Tab::Overview);
    }

    #[test]
    fn test_initial_tab_defaults_to_overview() {
        let report_only = AiResponse {
            paper_check: Some(paper_check()),
            ..Default::default()
        };
        assert_eq!(initial_tab(&report_only), Tab::Overview);

        let guess_only = AiResponse {
            guess_paper: Some(GuessPaper {
                important_topics: vec!["Kinematics".into()],
                expected_questions: vec![],
            }),
            ..Default::default()
        };
        assert_eq!(initial_tab(&guess_only), Tab::Overview);
        assert_eq!(initial_tab(&AiResponse::default()), Tab::Overview);
    }

    #[test]
    fn test_eligible_tabs_follow_present_sections() {
        assert_eq!(eligible_tabs(&AiResponse::default()), vec![Tab::Overview]);

        let everything = AiResponse {
            mcqs: Some(vec![mcq("q", &["a"], "a")]),
            short_questions: Some(vec![qa()]),
            long_questions: Some(vec![qa()]),
            math_solution: Some(MathSolution {
                steps: vec!["x = 1".into()],
                final_answer: "1".into(),
            }),
            paper_check: Some(paper_check()),
            guess_paper: Some(GuessPaper {
                important_topics: vec![],
                expected_questions: vec![],
            }),
            ..Default::default()
        };
        assert_eq!(eligible_tabs(&everything), Tab::ALL.to_vec());

        let empty_lists = AiResponse {
            mcqs: Some(Vec::new()),
            short_questions: Some(Vec::new()),
            long_questions: Some(Vec::new()),
            graph_data: Some(graph()),
            ..Default::default()
        };
        assert_eq!(eligible_tabs(&empty_lists), vec![Tab::Overview, Tab::Math]);
    }

    #[test]
    fn test_select_tab_rejects_ineligible() {
        let response = arithmetic();
        let mut view = ResultsView::new(&response);
        assert_eq!(view.active_tab(), Tab::Mcq);

        assert_eq!(
            view.select_tab(Tab::Report),
            Err(ViewError::IneligibleTab(Tab::Report))
        );
        assert_eq!(view.active_tab(), Tab::Mcq);

        view.select_tab(Tab::Overview).unwrap();
        assert_eq!(view.active_tab(), Tab::Overview);
    }

    #[test]
    fn test_reselect_before_reveal_overwrites() {
        let response = arithmetic();
        let mut view = ResultsView::new(&response);

        view.select_option(&response, 0, "3").unwrap();
        view.select_option(&response, 0, "4").unwrap();
        view.reveal(&response, 0).unwrap();

        assert_eq!(view.quiz().selected(0), Some("4"));
        assert_eq!(view.is_correct(&response, 0), Some(true));
    }

    #[test]
    fn test_selection_locked_after_reveal() {
        let response = arithmetic();
        let mut view = ResultsView::new(&response);

        view.select_option(&response, 0, "4").unwrap();
        view.reveal(&response, 0).unwrap();
        assert_eq!(view.solved_count(), 1);

        view.select_option(&response, 0, "3").unwrap();
        assert_eq!(view.quiz().selected(0), Some("4"));
        assert_eq!(view.is_correct(&response, 0), Some(true));
        assert_eq!(view.solved_count(), 1);
    }

    #[test]
    fn test_reveal_requires_a_selection() {
        let response = arithmetic();
        let mut view = ResultsView::new(&response);
        assert_eq!(view.reveal(&response, 1), Err(ViewError::NothingSelected(1)));
        assert_eq!(view.reveal(&response, 7), Err(ViewError::NoSuchQuestion(7)));
        assert_eq!(view.solved_count(), 0);
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        let response = arithmetic();
        let mut view = ResultsView::new(&response);
        assert_eq!(
            view.select_option(&response, 1, "10"),
            Err(ViewError::NoSuchOption {
                index: 1,
                option: "10".into()
            })
        );
        assert_eq!(view.quiz().selected(1), None);
    }

    #[test]
    fn test_correctness_is_exact_string_equality() {
        let response = AiResponse {
            mcqs: Some(vec![mcq("Capital?", &["Paris", "paris"], "Paris")]),
            ..Default::default()
        };
        let mut view = ResultsView::new(&response);
        view.select_option(&response, 0, "paris").unwrap();
        view.reveal(&response, 0).unwrap();
        assert_eq!(view.is_correct(&response, 0), Some(false));
    }

    #[test]
    fn test_option_marks_before_and_after_reveal() {
        let response = arithmetic();
        let mut view = ResultsView::new(&response);

        assert_eq!(view.option_mark(&response, 0, "3"), OptionMark::Idle);
        view.select_option(&response, 0, "3").unwrap();
        assert_eq!(view.option_mark(&response, 0, "3"), OptionMark::Picked);
        assert_eq!(view.option_mark(&response, 0, "4"), OptionMark::Idle);

        view.reveal(&response, 0).unwrap();
        assert_eq!(view.option_mark(&response, 0, "3"), OptionMark::PickedWrong);
        assert_eq!(view.option_mark(&response, 0, "4"), OptionMark::Correct);
        assert_eq!(view.option_mark(&response, 0, "5"), OptionMark::Faded);

        view.select_option(&response, 1, "9").unwrap();
        view.reveal(&response, 1).unwrap();
        assert_eq!(view.option_mark(&response, 1, "9"), OptionMark::PickedCorrect);
        assert_eq!(view.option_mark(&response, 1, "6"), OptionMark::Faded);
        assert_eq!(view.solved_count(), 2);
    }

    #[test]
    fn test_overview_cards() {
        let response = AiResponse {
            short_questions: Some(vec![qa(), qa()]),
            graph_data: Some(graph()),
            ..arithmetic()
        };
        let view = ResultsView::new(&response);
        let cards = view.overview_cards(&response);
        let summary: Vec<(Tab, &str)> = cards
            .iter()
            .map(|card| (card.tab, card.headline.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Tab::Mcq, "2"),
                (Tab::Short, "2"),
                (Tab::Math, "View Solution")
            ]
        );
    }

    #[test]
    fn test_tab_slugs_parse() {
        for tab in Tab::ALL {
            assert_eq!(tab.slug().parse::<Tab>(), Ok(tab));
        }
        assert!("chat".parse::<Tab>().is_err());
    }
}
