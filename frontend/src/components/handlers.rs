use super::super::{FileData, Model, Msg, Notice};
use super::utils::{extract_image_files, generate_id};
use crate::api;
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::{Credentials, PredictionResponse};
use wasm_bindgen_futures::spawn_local;
use web_sys::{ClipboardEvent, DragEvent, FileList};
use yew::prelude::*;

pub fn handle_submit_login(model: &mut Model, ctx: &Context<Model>) -> bool {
    let credentials = Credentials::new(model.username.clone(), model.password.clone());
    if !credentials.is_complete() || model.logging_in {
        return false;
    }
    model.logging_in = true;
    model.notice = None;

    let link = ctx.link().clone();
    spawn_local(async move {
        match api::login(&credentials).await {
            Ok(response) if response.authenticated => {
                link.send_message(Msg::LoginAccepted(credentials))
            }
            Ok(response) => link.send_message(Msg::LoginRejected(response.message)),
            Err(e) => link.send_message(Msg::LoginRejected(e)),
        }
    });
    true
}

pub fn handle_login_accepted(model: &mut Model, credentials: Credentials) -> bool {
    log::info!("Logged in as {}", credentials.username);
    model.session.login(credentials);
    model.logging_in = false;
    model.password.clear();
    model.notice = Some(Notice::Success("Login successful".into()));
    true
}

pub fn handle_login_rejected(model: &mut Model, message: String) -> bool {
    model.logging_in = false;
    model.notice = Some(Notice::Error(message));
    true
}

pub fn handle_logout(model: &mut Model) -> bool {
    if let Some(credentials) = model.session.credentials().cloned() {
        spawn_local(async move { api::logout(&credentials).await });
    }
    model.session.logout();
    handle_clear_image(model);
    model.notice = Some(Notice::Success("Session closed successfully.".into()));
    true
}

/// Replaces the current image with the first of `files` and runs the
/// prediction straight away.
pub fn handle_files_added(model: &mut Model, ctx: &Context<Model>, files: Vec<GlooFile>) -> bool {
    let Some(file) = files.into_iter().next() else {
        model.error = Some("No valid image files selected.".into());
        return true;
    };
    let Some(credentials) = model.session.credentials().cloned() else {
        return false;
    };

    model.error = None;
    model.result = None;
    model.loading = true;
    model.image = Some(FileData {
        preview_url: ObjectUrl::from(file.clone()),
        file: file.clone(),
    });

    let request_id = generate_id();
    model.session.begin_prediction(request_id);
    send_prediction_request(ctx, request_id, credentials, file);
    true
}

/// Shows a reply only if it answers the latest upload of this session.
pub fn handle_prediction_ready(
    model: &mut Model,
    request_id: u64,
    response: PredictionResponse,
) -> bool {
    if !model.session.finish_prediction(request_id) {
        log::debug!("Dropping stale prediction {}", request_id);
        return false;
    }
    model.result = Some(response);
    model.loading = false;
    true
}

pub fn handle_prediction_failed(model: &mut Model, request_id: u64, message: String) -> bool {
    if !model.session.finish_prediction(request_id) {
        log::debug!("Dropping stale prediction error {}", request_id);
        return false;
    }
    model.error = Some(message);
    model.loading = false;
    true
}

pub fn handle_clear_image(model: &mut Model) -> bool {
    model.session.cancel_prediction();
    model.image = None;
    model.result = None;
    model.error = None;
    model.loading = false;
    true
}

pub fn handle_drop(model: &mut Model, ctx: &Context<Model>, event: DragEvent) -> bool {
    event.prevent_default();
    model.is_dragging = false;

    if let Some(file_list) = event.data_transfer().and_then(|dt| dt.files()) {
        process_file_list(ctx, file_list);
    }

    true
}

pub fn handle_paste(model: &mut Model, ctx: &Context<Model>, event: ClipboardEvent) -> bool {
    if !model.session.is_authenticated() {
        return false;
    }
    if let Some(file_list) = event.clipboard_data().and_then(|dt| dt.files()) {
        if file_list.length() > 0 {
            event.prevent_default();
            process_file_list(ctx, file_list);
            return true;
        }
    }
    false
}

pub fn process_file_list(ctx: &Context<Model>, file_list: FileList) {
    let files = extract_image_files(&file_list);
    if files.is_empty() {
        log::warn!("Skipping upload without a supported image");
        ctx.link().send_message(Msg::SetError(Some(
            "Please choose a JPG, PNG, WEBP or GIF image.".into(),
        )));
    } else {
        ctx.link().send_message(Msg::FilesAdded(files));
    }
}

fn send_prediction_request(
    ctx: &Context<Model>,
    request_id: u64,
    credentials: Credentials,
    file: GlooFile,
) {
    let link = ctx.link().clone();
    spawn_local(async move {
        match api::predict(&credentials, &file).await {
            Ok(response) => link.send_message(Msg::PredictionReady(request_id, response)),
            Err(e) => {
                log::error!("Prediction {} failed: {}", request_id, e);
                link.send_message(Msg::PredictionFailed(request_id, e))
            }
        }
    });
}
