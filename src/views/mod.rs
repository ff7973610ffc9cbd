//! Server-rendered study page.

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::models::{AiResponse, AppMode};
use crate::services::chart::{self, ChartKind};
use crate::services::results::{ResultsView, Tab};
use crate::services::session::Session;

const CHART_WIDTH: f64 = 600.0;
const CHART_HEIGHT: f64 = 260.0;

const STYLE: &str = r#"
    body { font-family: Arial, sans-serif; margin: 40px auto; max-width: 960px; color: #1e293b; }
    .modes { display: grid; grid-template-columns: repeat(3, 1fr); gap: 8px; margin-bottom: 16px; }
    .mode { border: 1px solid #e2e8f0; border-radius: 8px; padding: 10px; display: block; text-align: left; background: white; }
    .mode.active { border-color: #6366f1; background: #eef2ff; }
    .mode small { display: block; color: #64748b; }
    textarea { width: 100%; min-height: 120px; }
    .error { background-color: #fef2f2; color: #991b1b; padding: 12px; border-radius: 8px; margin: 16px 0; }
    .loading { background-color: #f0f8ff; padding: 12px; border-radius: 8px; margin: 16px 0; }
    .tabs { display: flex; gap: 4px; flex-wrap: wrap; margin: 24px 0; }
    .tabs button { border: none; border-radius: 999px; padding: 8px 16px; background: #f1f5f9; }
    .tabs button.active { background: #0f172a; color: white; }
    .card { background-color: #f8fafc; padding: 20px; border-radius: 12px; margin: 12px 0; }
    .opt { display: block; width: 100%; text-align: left; padding: 10px; margin: 4px 0; border: 1px solid transparent; border-radius: 8px; background: #f8fafc; }
    .opt.picked { border-color: #6366f1; background: #eef2ff; }
    .opt.correct { border-color: #22c55e; background: #dcfce7; }
    .opt.wrong { border-color: #fca5a5; background: #fef2f2; opacity: 0.7; }
    .opt.faded { opacity: 0.4; }
    .verdict.right { color: #166534; }
    .verdict.wrong { color: #991b1b; }
    .final { background: #4f46e5; color: white; padding: 16px; border-radius: 12px; font-size: 1.5em; }
    .chart { background: white; border: 1px solid #e2e8f0; border-radius: 8px; }
"#;

pub fn render_page(session: &Session) -> String {
    let mut html = String::with_capacity(8 * 1024);
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html>
<head>
    <title>StudyHub</title>
    <meta charset="utf-8">
    <style>{STYLE}</style>
</head>
<body>
    <h1>StudyHub</h1>
"#
    );

    render_form(&mut html, session);

    if session.is_loading() {
        html.push_str(r#"<div class="loading">Generating&hellip; refresh to see the result.</div>"#);
    }
    if let Some(error) = session.error() {
        let _ = write!(html, r#"<div class="error">{}</div>"#, text(error));
    }
    if let (Some(result), Some(view)) = (session.result(), session.view()) {
        render_results(&mut html, result, view);
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_form(html: &mut String, session: &Session) {
    let draft = session.draft();
    let _ = write!(
        html,
        r#"<form method="post" action="/generate" enctype="multipart/form-data">
<input type="hidden" name="mode" value="{}"><div class="modes">"#,
        draft.mode.slug()
    );
    for mode in AppMode::ALL {
        let class = if mode == draft.mode { "mode active" } else { "mode" };
        let _ = write!(
            html,
            r#"<button type="submit" class="{class}" formaction="/mode" name="mode" value="{}">{}<small>{}</small></button>"#,
            mode.slug(),
            mode.label(),
            text(mode.description()),
        );
    }
    let disabled = if session.is_loading() { " disabled" } else { "" };
    let _ = write!(
        html,
        r#"</div>
<textarea name="prompt" dir="auto" placeholder="{}">{}</textarea>
<p><input type="file" name="file" accept="image/*,application/pdf"> {}</p>
<button type="submit"{disabled}>Generate</button>
</form>
<form method="post" action="/clear"><button type="submit">Clear</button></form>
"#,
        attr(draft.mode.placeholder()),
        text(&draft.prompt),
        draft
            .file_name
            .as_deref()
            .map(|name| format!("Last file: {}", text(name)))
            .unwrap_or_default(),
    );
}

fn render_results(html: &mut String, result: &AiResponse, view: &ResultsView) {
    html.push_str(r#"<form method="post" action="/tab" class="tabs">"#);
    for tab in view.tabs() {
        let class = if *tab == view.active_tab() { " class=\"active\"" } else { "" };
        let _ = write!(
            html,
            r#"<button name="tab" value="{}"{class}>{}</button>"#,
            tab.slug(),
            tab.label()
        );
    }
    html.push_str("</form>");

    match view.active_tab() {
        Tab::Overview => render_overview(html, result, view),
        Tab::Mcq => render_mcqs(html, result, view),
        Tab::Short => render_qa(html, "Short Questions", result.short_list()),
        Tab::Long => render_qa(html, "Detailed Explanations", result.long_list()),
        Tab::Math => render_math(html, result),
        Tab::Report => render_report(html, result),
        Tab::GuessPaper => render_guess_paper(html, result),
    }
}

fn render_overview(html: &mut String, result: &AiResponse, view: &ResultsView) {
    let _ = write!(html, r#"<div class="card" dir="auto"><h2>{}</h2>"#, text(&result.subject));
    if let Some(topic) = &result.topic {
        let _ = write!(html, "<h3>{}</h3>", text(topic));
    }
    if let Some(explanation) = &result.general_explanation {
        let _ = write!(html, "<p>{}</p>", text(explanation));
    }
    html.push_str("</div>");

    html.push_str(r#"<form method="post" action="/tab" class="tabs">"#);
    for card in view.overview_cards(result) {
        let _ = write!(
            html,
            r#"<button name="tab" value="{}"><strong>{}</strong> {}</button>"#,
            card.tab.slug(),
            text(&card.headline),
            card.caption
        );
    }
    html.push_str("</form>");
}

fn render_mcqs(html: &mut String, result: &AiResponse, view: &ResultsView) {
    let _ = write!(
        html,
        "<h2>Practice MCQs</h2><p>Solved: <strong>{}</strong></p>",
        view.solved_count()
    );

    for (idx, mcq) in result.mcq_list().iter().enumerate() {
        let revealed = view.quiz().is_revealed(idx);
        let _ = write!(
            html,
            r#"<div class="card" dir="auto"><p><strong>{}.</strong> {}</p><form method="post" action="/mcq/{idx}/select">"#,
            idx + 1,
            text(&mcq.question)
        );
        let disabled = if revealed { " disabled" } else { "" };
        for option in &mcq.options {
            let mark = view.option_mark(result, idx, option);
            let _ = write!(
                html,
                r#"<button class="{}" name="option" value="{}"{disabled}>{}</button>"#,
                mark.css_class(),
                attr(option),
                text(option)
            );
        }
        html.push_str("</form>");

        if revealed {
            if view.is_correct(result, idx) == Some(true) {
                html.push_str(r#"<p class="verdict right">Correct Answer!</p>"#);
            } else {
                let _ = write!(
                    html,
                    r#"<p class="verdict wrong">Incorrect. The right answer is: <strong>{}</strong></p>"#,
                    text(&mcq.correct_answer)
                );
            }
        } else if view.quiz().selected(idx).is_some() {
            let _ = write!(
                html,
                r#"<form method="post" action="/mcq/{idx}/reveal"><button type="submit">Check</button></form>"#
            );
        }
        html.push_str("</div>");
    }
}

fn render_qa(html: &mut String, heading: &str, items: &[crate::models::QuestionAnswer]) {
    let _ = write!(html, "<h2>{heading}</h2>");
    for (idx, item) in items.iter().enumerate() {
        let _ = write!(
            html,
            r#"<div class="card" dir="auto"><p><strong>Q{}: {}</strong></p><p>{}</p></div>"#,
            idx + 1,
            text(&item.question),
            text(&item.answer)
        );
    }
}

fn render_math(html: &mut String, result: &AiResponse) {
    if let Some(graph) = &result.graph_data {
        html.push_str("<h2>Graph Visualization</h2>");
        render_chart(html, graph);
    }
    if let Some(solution) = &result.math_solution {
        html.push_str(r#"<h2>Step-by-Step Solution</h2><ol dir="auto">"#);
        for step in &solution.steps {
            let _ = write!(html, "<li>{}</li>", text(step));
        }
        let _ = write!(
            html,
            r#"</ol><div class="final" dir="ltr">Final Answer: {}</div>"#,
            text(&solution.final_answer)
        );
    }
}

fn render_chart(html: &mut String, graph: &crate::models::GraphData) {
    let Some(plot) = chart::plot(graph, CHART_WIDTH, CHART_HEIGHT) else {
        return;
    };
    let title = if graph.title.is_empty() { "Graph" } else { &graph.title };
    let x_label = if graph.x_label.is_empty() { "x" } else { &graph.x_label };
    let y_label = if graph.y_label.is_empty() { "y" } else { &graph.y_label };

    let _ = write!(
        html,
        r#"<div class="card"><h3>{}</h3><svg class="chart" viewBox="-10 -10 {} {}" width="100%">"#,
        text(title),
        CHART_WIDTH + 20.0,
        CHART_HEIGHT + 20.0
    );
    match plot.kind {
        ChartKind::Line => {
            let points: Vec<String> = plot
                .points
                .iter()
                .map(|(x, y)| format!("{x:.1},{y:.1}"))
                .collect();
            let _ = write!(
                html,
                r##"<polyline fill="none" stroke="#8884d8" stroke-width="2" points="{}"/>"##,
                points.join(" ")
            );
        }
        ChartKind::Scatter => {
            for (x, y) in &plot.points {
                let _ = write!(html, r##"<circle cx="{x:.1}" cy="{y:.1}" r="5" fill="#8884d8"/>"##);
            }
        }
    }
    let _ = write!(
        html,
        "</svg><p>x: {} &middot; y: {}</p></div>",
        text(x_label),
        text(y_label)
    );
}

fn render_report(html: &mut String, result: &AiResponse) {
    html.push_str("<h2>Assessment Report</h2>");
    let Some(report) = &result.paper_check else {
        return;
    };
    let _ = write!(
        html,
        r#"<div class="card"><p>Obtained Marks: <strong>{}</strong> / Total Marks: <strong>{}</strong></p></div>
<div class="card" dir="auto"><h3>AI Feedback</h3><p><em>{}</em></p></div>"#,
        text(&report.obtained_marks),
        text(&report.total_marks),
        text(&report.feedback)
    );
    render_list(html, "Identified Mistakes", &report.mistakes);
    render_list(html, "Suggested Corrections", &report.corrections);
}

fn render_guess_paper(html: &mut String, result: &AiResponse) {
    html.push_str("<h2>Exam Predictions</h2>");
    let Some(guess) = &result.guess_paper else {
        return;
    };
    render_list(html, "High Priority Topics", &guess.important_topics);
    render_list(html, "Expected Questions", &guess.expected_questions);
}

fn render_list(html: &mut String, heading: &str, items: &[String]) {
    let _ = write!(html, r#"<div class="card" dir="auto"><h3>{heading}</h3><ul>"#);
    for item in items {
        let _ = write!(html, "<li>{}</li>", text(item));
    }
    html.push_str("</ul></div>");
}
