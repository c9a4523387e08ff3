use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use super::super::{Model, Msg};

pub fn render_settings(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let settings = model.engine.settings();

    let on_model_change = link.callback(|e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        Msg::SetModel(select.value())
    });

    let on_confidence_input = link.callback(|e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::SetConfidence(input.value().parse().unwrap_or(0.5))
    });

    html! {
        <div class="settings-panel">
            <h2><i class="fa-solid fa-sliders"></i>{" Detection Settings"}</h2>
            <div class="settings-row">
                <label for="model-select">{"Model:"}</label>
                <select id="model-select" onchange={on_model_change}>
                    { for model.models.iter().map(|m| {
                        html! {
                            <option
                                value={m.name.clone()}
                                selected={m.name == settings.model_id}
                                disabled={!m.loaded}
                            >
                                { format!("{} - {}", m.name, m.description) }
                            </option>
                        }
                    })}
                </select>
            </div>
            <div class="settings-row">
                <label for="confidence-slider">
                    { format!("Confidence threshold: {:.2}", settings.confidence_threshold) }
                </label>
                <input
                    id="confidence-slider"
                    type="range"
                    min="0"
                    max="1"
                    step="0.05"
                    value={settings.confidence_threshold.to_string()}
                    oninput={on_confidence_input}
                />
            </div>
            <div class="settings-row">
                <label for="persist-toggle">{"Save annotated results on the server"}</label>
                <input
                    id="persist-toggle"
                    type="checkbox"
                    checked={settings.persist}
                    onchange={link.callback(|_| Msg::TogglePersist)}
                />
            </div>
        </div>
    }
}
