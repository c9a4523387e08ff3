use engine::Severity;
use yew::prelude::*;

use super::super::{Model, Msg};

fn severity_class(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => "alert-success",
        Severity::Info => "alert-info",
        Severity::Warning => "alert-warning",
        Severity::Critical => "alert-critical",
    }
}

pub fn render_alert(model: &Model, ctx: &Context<Model>) -> Html {
    let Some(alert) = &model.alert else {
        return html! {};
    };

    html! {
        <div class={classes!("alert-toast", severity_class(alert.severity))}>
            <p>{ &alert.message }</p>
            <button
                class="alert-close"
                onclick={ctx.link().callback(|_| Msg::DismissAlert)}
            >
                <i class="fa-solid fa-times"></i>
            </button>
        </div>
    }
}

pub fn render_progress(model: &Model) -> Html {
    html! {
        <>
            { if let Some(progress) = &model.progress {
                html! {
                    <div class="progress-section">
                        <div class="progress-bar">
                            <div
                                class="progress-fill"
                                style={format!("width: {}%", progress.percent)}
                            ></div>
                        </div>
                        <p class="progress-label">
                            { format!("{} ({:.0}%)", progress.phase.label(), progress.percent) }
                        </p>
                    </div>
                }
            } else {
                html! {}
            }}
            { if let Some(batch) = &model.batch_progress {
                html! {
                    <p class="batch-progress-label">
                        { format!("Processing file {} of {}: {}", batch.index + 1, batch.total, batch.filename) }
                    </p>
                }
            } else {
                html! {}
            }}
        </>
    }
}
