use yew::prelude::*;

use super::super::{Model, Msg};

pub fn render_stats(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let stats = &model.stats;

    html! {
        <div class="stats-panel">
            <div class="panel-header">
                <h2><i class="fa-solid fa-chart-simple"></i>{" Statistics"}</h2>
                <button class="refresh-btn" onclick={link.callback(|_| Msg::RefreshStats)}>
                    <i class="fa-solid fa-rotate"></i>{" Refresh"}
                </button>
            </div>
            <div class="stats-grid">
                <div class="stat-item">
                    <span class="stat-value">{ stats.total_detections }</span>
                    <span class="stat-label">{"Total detections"}</span>
                </div>
                <div class="stat-item">
                    <span class="stat-value">{ stats.fire_detections }</span>
                    <span class="stat-label">{"Fire"}</span>
                </div>
                <div class="stat-item">
                    <span class="stat-value">{ stats.smoke_detections }</span>
                    <span class="stat-label">{"Smoke"}</span>
                </div>
                <div class="stat-item">
                    <span class="stat-value">{ format!("{:.2}s", stats.avg_processing_time) }</span>
                    <span class="stat-label">{"Avg processing time"}</span>
                </div>
            </div>
            <div class="risk-breakdown">
                <span class="risk-badge risk-critical">{ format!("Critical: {}", stats.risk_levels.critical) }</span>
                <span class="risk-badge risk-high">{ format!("High: {}", stats.risk_levels.high) }</span>
                <span class="risk-badge risk-medium">{ format!("Medium: {}", stats.risk_levels.medium) }</span>
                <span class="risk-badge risk-low">{ format!("Low: {}", stats.risk_levels.low) }</span>
            </div>
        </div>
    }
}
