use wasm_bindgen::JsCast;
use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

use super::super::{FileData, Model, Msg};
use crate::components::handlers::extract_media_files;
use crate::components::utils::{debounce, ellipsize};

pub fn render_upload_section(model: &Model, ctx: &Context<Model>) -> Html {
    let limit_reached = model.files.len() >= 15;
    html! {
        <div class="upload-section">
            { render_file_input_area(model, ctx, limit_reached) }
            { render_preview_area(model, ctx) }
        </div>
    }
}

fn render_file_input_area(model: &Model, ctx: &Context<Model>, limit_reached: bool) -> Html {
    if limit_reached {
        return html! {
            <p class="limit-reached">{"You have reached the maximum of 15 files."}</p>
        };
    }

    let link = ctx.link();
    let handle_change = link.batch_callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let files = input.files();
        let files_to_process = files.as_ref().map(extract_media_files).unwrap_or_default();

        input.set_value("");

        if !files_to_process.is_empty() {
            Some(Msg::FilesAdded(files_to_process))
        } else {
            None
        }
    });

    let handle_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(true)
    });

    let handle_drag_leave = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(false)
    });

    let handle_drop = link.callback(Msg::HandleDrop);
    let trigger_file_input = Callback::from(|_| {
        if let Some(input) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("file-input"))
        {
            if let Ok(html_input) = input.dyn_into::<web_sys::HtmlElement>() {
                html_input.click();
            }
        }
    });

    html! {
        <>
            <input
                type="file"
                id="file-input"
                multiple=true
                accept="image/*,video/*"
                style="display: none;"
                onchange={handle_change}
            />

            <button
                id="upload-button"
                class="analyze-btn"
                onclick={debounce(300, {
                    let trigger_file_input = trigger_file_input.clone();
                    move || trigger_file_input.emit(())
                })}
            >
                <i class="fa-solid fa-upload"></i> {" Select Files"}
            </button>

            <div
                id="drop-zone"
                class={classes!("upload-area", model.is_dragging.then_some("drag-over"))}
                ondragover={handle_drag_over}
                ondragleave={handle_drag_leave}
                ondrop={handle_drop}
                onclick={debounce(300, {
                    let trigger_file_input = trigger_file_input.clone();
                    move || trigger_file_input.emit(())
                })}
            >
                <div class="upload-placeholder">
                    <i class="fa-solid fa-cloud-arrow-up"></i>
                    <p>{"Drag & drop images or videos here, or click"}</p>
                    <p class="file-types">{"Supported formats: JPG, PNG, WEBP, MP4, AVI"}</p>
                </div>
            </div>
        </>
    }
}

fn render_preview_area(model: &Model, ctx: &Context<Model>) -> Html {
    if model.files.is_empty() {
        return html! {};
    }

    let link = ctx.link().clone();

    html! {
        <div id="preview-container">
            <h2>{ format!("Queued files: {} / 15", model.files.len()) }</h2>
            <div id="file-previews">
                {{
                    let mut sorted_files: Vec<&FileData> = model.files.values().collect();
                    sorted_files.sort_by_key(|fd| fd.id);
                    sorted_files.iter()
                        .map(|file_data| render_preview_item(model, ctx, file_data))
                        .collect::<Html>()
                }}
            </div>
            <div class="button-container">
                <button
                    class="analyze-btn"
                    style="background-color: var(--danger-color);"
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.callback(|_| Msg::ClearAllFiles).emit(())
                    })}
                >
                    <i class="fa-solid fa-trash"></i>{" Clear All"}
                </button>
                <button
                    class="analyze-btn"
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.callback(|_| Msg::AnalyzeSelected).emit(())
                    })}
                    disabled={model.loading || model.selected_file_id.is_none()}
                >
                    { render_analyze_button_content(model) }
                </button>
                <button
                    class="analyze-btn"
                    style="background-color: var(--primary-color);"
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.callback(|_| Msg::AnalyzeAll).emit(())
                    })}
                    disabled={model.loading}
                >
                    <i class="fa-solid fa-layer-group"></i>{" Analyze All"}
                </button>
            </div>
        </div>
    }
}

fn render_analyze_button_content(model: &Model) -> Html {
    if model.loading {
        html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Analyzing..."}</> }
    } else {
        let filename = model
            .selected_file_id
            .and_then(|id| model.files.get(&id))
            .map(|fd| fd.file.name())
            .unwrap_or_else(|| "Selected File".to_string());

        let display_name = ellipsize(&filename, 20);

        html! { <><i class="fa-solid fa-magnifying-glass"></i>{ format!(" Analyze \"{}\"", display_name) }</> }
    }
}

fn render_preview_item(model: &Model, ctx: &Context<Model>, file_data: &FileData) -> Html {
    let file_id = file_data.id;
    let link = ctx.link();
    let is_selected = model.selected_file_id == Some(file_id);
    let is_video = file_data.file.raw_mime_type().starts_with("video/");

    html! {
        <div
            class={classes!("preview-item", is_selected.then_some("selected"))}
            key={file_id.to_string()}
            onclick={link.callback(move |_| Msg::SelectFile(file_id))}
            title={format!("Click to select for analysis: {}", file_data.file.name())}
        >
            {
                match (&file_data.preview_url, is_video) {
                    (Some(url), false) => html! {
                        <img src={url.to_string()} alt={file_data.file.name()} />
                    },
                    (Some(url), true) => html! {
                        <video src={url.to_string()} muted=true />
                    },
                    (None, _) => html! {
                        <div class="preview-placeholder">{"..."}</div>
                    },
                }
            }
            <span class="preview-filename">{ file_data.file.name() }</span>
            <button
                class="remove-btn"
                title="Remove this file"
                onclick={link.callback(move |e: MouseEvent| {
                    e.stop_propagation();
                    Msg::RemoveFile(file_id)
                })}
            >
                <i class="fa-solid fa-times"></i>
            </button>
        </div>
    }
}
