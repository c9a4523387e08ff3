use engine::LoopState;
use yew::prelude::*;

use super::super::{Model, Msg};

pub fn render_live_feed(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let feed_active = model.stream.is_some();

    let border_class = match model.live_alert {
        Some(alert) if alert.fire => Some("fire-alert"),
        Some(_) => Some("smoke-alert"),
        None => None,
    };

    let state_label = match model.engine.realtime_state() {
        LoopState::Running => "Monitoring",
        LoopState::Armed => "Armed (waiting for camera)",
        LoopState::Idle => "Idle",
    };

    html! {
        <div class="live-feed-section">
            <h2><i class="fa-solid fa-video"></i>{" Live Monitoring"}</h2>
            <div class={classes!("live-feed", border_class)}>
                <video
                    ref={model.video_ref.clone()}
                    autoplay=true
                    muted=true
                    playsinline=true
                />
                { match model.live_alert {
                    Some(alert) if alert.fire => html! {
                        <div class="live-banner fire">
                            <i class="fa-solid fa-fire"></i>{" FIRE DETECTED"}
                        </div>
                    },
                    Some(_) => html! {
                        <div class="live-banner smoke">
                            <i class="fa-solid fa-smog"></i>{" Smoke detected"}
                        </div>
                    },
                    None => html! {},
                }}
            </div>
            <div class="live-controls">
                { if feed_active {
                    html! {
                        <button class="analyze-btn" onclick={link.callback(|_| Msg::StopFeed)}>
                            <i class="fa-solid fa-video-slash"></i>{" Stop Camera"}
                        </button>
                    }
                } else {
                    html! {
                        <button class="analyze-btn" onclick={link.callback(|_| Msg::StartFeed)}>
                            <i class="fa-solid fa-video"></i>{" Start Camera"}
                        </button>
                    }
                }}
                <label class="realtime-toggle">
                    <input
                        type="checkbox"
                        checked={model.realtime_enabled}
                        onchange={link.callback(|_| Msg::ToggleRealtime)}
                    />
                    {" Realtime detection"}
                </label>
                <span class="realtime-state">{ state_label }</span>
            </div>
            { if let Some(error) = &model.feed_error {
                html! {
                    <div class="error-message">
                        <i class="fa-solid fa-circle-exclamation"></i>
                        <p>{ error }</p>
                    </div>
                }
            } else {
                html! {}
            }}
        </div>
    }
}
