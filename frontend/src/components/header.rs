use yew::prelude::*;

pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-fire"></i> {" Fire & Smoke Detection"}</h1>
            <p class="subtitle">{"Upload images or videos, or monitor a live camera feed"}</p>
        </header>
    }
}
