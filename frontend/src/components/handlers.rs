use engine::{BatchInput, Severity, UiUpdate};
use gloo_file::{File as GlooFile, ObjectUrl, futures::read_as_bytes};
use wasm_bindgen_futures::spawn_local;
use web_sys::{DragEvent, FileList, HtmlVideoElement, MediaStream};
use yew::prelude::*;

use super::super::{FileData, Model, Msg};
use crate::components::utils::generate_id;
use crate::platform;

const MAX_FILES: usize = 15;

pub fn handle_files_added(model: &mut Model, ctx: &Context<Model>, files: Vec<GlooFile>) -> bool {
    let available_slots = MAX_FILES.saturating_sub(model.files.len());

    if files.len() > available_slots {
        model.engine.notify(
            Severity::Warning,
            format!(
                "Upload limit exceeded. You can only add {} more files.",
                available_slots
            ),
        );
        return true;
    }

    let mut new_selection = None;

    for file in files.into_iter() {
        let id = generate_id();
        let file_data = FileData {
            id,
            file: file.clone(),
            preview_url: None,
        };
        model.files.insert(id, file_data);

        let preview_url = ObjectUrl::from(file);
        ctx.link().send_message(Msg::AddPreview(id, preview_url));

        new_selection = Some(id);
    }

    if let Some(id) = new_selection {
        model.selected_file_id = Some(id);
    }

    true
}

pub fn handle_add_preview(model: &mut Model, id: u64, url: ObjectUrl) -> bool {
    if let Some(file_data) = model.files.get_mut(&id) {
        file_data.preview_url = Some(url);
        true
    } else {
        false
    }
}

pub fn handle_remove_file(model: &mut Model, id: u64) -> bool {
    if model.files.remove(&id).is_some() {
        model.results.remove(&id);

        if model.selected_file_id == Some(id) {
            model.selected_file_id = None;
        }

        if model.files.is_empty() {
            model.selected_file_id = None;
            model.results.clear();
        } else if model.selected_file_id.is_none() {
            model.selected_file_id = model.files.keys().last().cloned();
        }

        true
    } else {
        false
    }
}

pub fn handle_select_file(model: &mut Model, id: u64) -> bool {
    if model.selected_file_id != Some(id) && model.files.contains_key(&id) {
        model.selected_file_id = Some(id);
        true
    } else {
        false
    }
}

pub fn handle_clear_all_files(model: &mut Model) -> bool {
    model.files.clear();
    model.selected_file_id = None;
    model.results.clear();
    model.batch_results = None;
    true
}

/// Mirrors whatever the engine emits into component state.
pub fn handle_engine_update(model: &mut Model, update: UiUpdate) -> bool {
    match update {
        UiUpdate::Progress(progress) => {
            model.progress = progress;
        }
        UiUpdate::BatchProgress(progress) => {
            model.batch_progress = progress;
        }
        UiUpdate::Alert(alert) => {
            model.alert = alert;
        }
        UiUpdate::LiveAlert(alert) => {
            if let Some(alert) = &alert {
                if alert.audio {
                    platform::play_alert_cue();
                }
            }
            model.live_alert = alert;
        }
        UiUpdate::History(records) => {
            model.history = records;
        }
        UiUpdate::Models(models) => {
            model.models = models;
        }
        UiUpdate::Stats(stats) => {
            model.stats = stats;
        }
    }
    true
}

pub fn handle_analyze_selected(model: &mut Model, ctx: &Context<Model>) -> bool {
    let Some(file_id) = model.selected_file_id else {
        return false;
    };
    let Some(file_data) = model.files.get(&file_id) else {
        return false;
    };

    model.loading = true;
    model.batch_results = None;
    let file = file_data.file.clone();
    let engine = model.engine.clone();
    let link = ctx.link().clone();

    spawn_local(async move {
        let payload = match read_as_bytes(&file).await {
            Ok(payload) => payload,
            Err(err) => {
                log::error!("could not read {}: {err}", file.name());
                link.send_message(Msg::SingleFailed(file_id));
                return;
            }
        };
        match engine.submit_file(payload, file.name()).await {
            Ok(response) => link.send_message(Msg::SingleResult(file_id, response)),
            // the engine already raised the failure alert
            Err(_) => link.send_message(Msg::SingleFailed(file_id)),
        }
    });

    true
}

pub fn handle_analyze_all(model: &mut Model, ctx: &Context<Model>) -> bool {
    if model.files.is_empty() {
        return false;
    }

    model.loading = true;
    model.batch_results = None;

    let mut queued: Vec<&FileData> = model.files.values().collect();
    queued.sort_by_key(|fd| fd.id);
    let files: Vec<GlooFile> = queued.iter().map(|fd| fd.file.clone()).collect();

    let engine = model.engine.clone();
    let link = ctx.link().clone();

    spawn_local(async move {
        let mut inputs = Vec::with_capacity(files.len());
        for file in files {
            match read_as_bytes(&file).await {
                Ok(payload) => inputs.push(BatchInput {
                    payload,
                    filename: file.name(),
                }),
                // unreadable local files still take a batch slot so the
                // outcome covers every queued file
                Err(_) => inputs.push(BatchInput {
                    payload: Vec::new(),
                    filename: file.name(),
                }),
            }
        }
        let outcome = engine.submit_batch(inputs).await;
        link.send_message(Msg::BatchFinished(outcome));
    });

    true
}

pub fn handle_drop(model: &mut Model, ctx: &Context<Model>, event: DragEvent) -> bool {
    event.prevent_default();
    model.is_dragging = false;

    if let Some(data_transfer) = event.data_transfer() {
        if let Some(file_list) = data_transfer.files() {
            let files = extract_media_files(&file_list);
            if !files.is_empty() {
                ctx.link().send_message(Msg::FilesAdded(files));
            }
        }
    }

    true
}

pub fn handle_start_feed(model: &mut Model, ctx: &Context<Model>) -> bool {
    if model.stream.is_some() {
        return false;
    }
    model.feed_error = None;

    let link = ctx.link().clone();
    spawn_local(async move {
        match platform::open_camera().await {
            Ok(stream) => link.send_message(Msg::FeedStarted(stream)),
            Err(reason) => link.send_message(Msg::FeedFailed(reason)),
        }
    });

    true
}

pub fn handle_feed_started(model: &mut Model, stream: MediaStream) -> bool {
    if let Some(video) = model.video_ref.cast::<HtmlVideoElement>() {
        video.set_src_object(Some(&stream));
        let _ = video.play();
    }
    model.stream = Some(stream);
    model.feed_error = None;
    model.engine.feed_opened();
    true
}

pub fn handle_stop_feed(model: &mut Model) -> bool {
    if let Some(stream) = model.stream.take() {
        platform::stop_camera(&stream);
    }
    if let Some(video) = model.video_ref.cast::<HtmlVideoElement>() {
        video.set_src_object(None);
    }
    model.engine.feed_closed();
    true
}

pub fn extract_media_files(file_list: &FileList) -> Vec<GlooFile> {
    (0..file_list.length())
        .filter_map(|i| file_list.item(i))
        .filter(|file| {
            let kind = file.type_();
            kind.starts_with("image/") || kind.starts_with("video/")
        })
        .map(GlooFile::from)
        .collect()
}
