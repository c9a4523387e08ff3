use engine::BatchItemOutcome;
use shared::{DetectionResponse, MediaKind, RiskLevel};
use yew::prelude::*;

use super::super::Model;
use crate::components::utils::{format_confidence, format_seconds};

fn risk_class(risk: RiskLevel) -> &'static str {
    match risk {
        RiskLevel::Critical => "risk-critical",
        RiskLevel::High => "risk-high",
        RiskLevel::Medium => "risk-medium",
        RiskLevel::Low => "risk-low",
    }
}

pub fn render_results(model: &Model) -> Html {
    html! {
        <>
            { render_selected_result(model) }
            { render_batch_results(model) }
        </>
    }
}

fn render_selected_result(model: &Model) -> Html {
    let Some(selected_id) = model.selected_file_id else {
        return html! {};
    };
    let Some(result) = model.results.get(&selected_id) else {
        return html! {};
    };

    let analyzed_filename = model
        .files
        .get(&selected_id)
        .map_or_else(|| "Analyzed File".to_string(), |fd| fd.file.name());

    html! {
        <div class={classes!("results-container", risk_class(result.risk_level))}>
            <div class="result-header">
                <h2>
                    <i class="fa-solid fa-fire-flame-curved"></i>
                    { format!(" Results for {}", analyzed_filename) }
                    <span class={classes!("risk-badge", risk_class(result.risk_level))}>
                        { result.risk_level.to_string() }
                    </span>
                </h2>
            </div>
            { render_detection_counts(result) }
            <div class="result-meta">
                <span>{ format!("Max confidence: {}", format_confidence(result.max_confidence)) }</span>
                <span>{ format!("Processing time: {}", format_seconds(result.processing_time)) }</span>
            </div>
            { render_processed_media(result) }
        </div>
    }
}

fn render_detection_counts(result: &DetectionResponse) -> Html {
    html! {
        <div class="detection-counts">
            <div class="count-item">
                <i class="fa-solid fa-fire"></i>
                <span>{ format!(" Fire: {}", result.fire_count) }</span>
            </div>
            <div class="count-item">
                <i class="fa-solid fa-smog"></i>
                <span>{ format!(" Smoke: {}", result.smoke_count) }</span>
            </div>
            <div class="count-item">
                <i class="fa-solid fa-crosshairs"></i>
                <span>{ format!(" Total: {}", result.detection_count) }</span>
            </div>
        </div>
    }
}

fn render_processed_media(result: &DetectionResponse) -> Html {
    let Some(processed) = &result.processed_file else {
        return html! {};
    };

    match result.file_type {
        Some(MediaKind::Video) => html! {
            <video class="processed-media" src={processed.clone()} controls=true />
        },
        _ => html! {
            <img class="processed-media" src={processed.clone()} alt="Annotated detection output" />
        },
    }
}

fn render_batch_results(model: &Model) -> Html {
    let Some(outcomes) = &model.batch_results else {
        return html! {};
    };

    let completed = outcomes
        .iter()
        .filter(|o| matches!(o, BatchItemOutcome::Completed { .. }))
        .count();

    html! {
        <div class="batch-results">
            <h2>
                <i class="fa-solid fa-layer-group"></i>
                { format!(" Batch results: {} / {} completed", completed, outcomes.len()) }
            </h2>
            <ul class="batch-list">
                { for outcomes.iter().map(render_batch_item) }
            </ul>
        </div>
    }
}

fn render_batch_item(outcome: &BatchItemOutcome) -> Html {
    match outcome {
        BatchItemOutcome::Completed { filename, response } => html! {
            <li class={classes!("batch-item", risk_class(response.risk_level))}>
                <span class="batch-filename">{ filename.clone() }</span>
                <span>{ format!("{} detection(s)", response.detection_count) }</span>
                <span class={classes!("risk-badge", risk_class(response.risk_level))}>
                    { response.risk_level.to_string() }
                </span>
            </li>
        },
        BatchItemOutcome::Failed { filename, error } => html! {
            <li class="batch-item batch-failed">
                <span class="batch-filename">{ filename.clone() }</span>
                <span class="batch-error">
                    <i class="fa-solid fa-circle-exclamation"></i>
                    { format!(" {}", error) }
                </span>
            </li>
        },
    }
}
