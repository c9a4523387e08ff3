use shared::RiskLevel;
use yew::prelude::*;

use super::super::{Model, Msg};
use crate::components::utils::format_seconds;

const VISIBLE_ENTRIES: usize = 5;

fn risk_class(risk: RiskLevel) -> &'static str {
    match risk {
        RiskLevel::Critical => "risk-critical",
        RiskLevel::High => "risk-high",
        RiskLevel::Medium => "risk-medium",
        RiskLevel::Low => "risk-low",
    }
}

pub fn render_history(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();

    html! {
        <div class="history-panel">
            <div class="panel-header">
                <h2><i class="fa-solid fa-clock-rotate-left"></i>{" Recent Detections"}</h2>
                <button class="refresh-btn" onclick={link.callback(|_| Msg::RefreshHistory)}>
                    <i class="fa-solid fa-rotate"></i>{" Refresh"}
                </button>
            </div>
            { if model.history.is_empty() {
                html! { <p class="empty-panel">{"No detections recorded yet."}</p> }
            } else {
                html! {
                    <ul class="history-list">
                        { for model.history.iter().take(VISIBLE_ENTRIES).map(|record| {
                            html! {
                                <li class="history-item">
                                    <span class="history-timestamp">{ record.timestamp.clone() }</span>
                                    <span>{ format!("{} detection(s)", record.detection_count) }</span>
                                    <span class={classes!("risk-badge", risk_class(record.risk_level))}>
                                        { record.risk_level.to_string() }
                                    </span>
                                    <span>{ format_seconds(record.processing_time) }</span>
                                </li>
                            }
                        })}
                    </ul>
                }
            }}
        </div>
    }
}
