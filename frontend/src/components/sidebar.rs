use super::super::{Model, Msg, Notice};
use super::utils::{debounce, extract_image_files, ACCEPTED_TYPES};
use shared::View;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

pub fn render_sidebar(model: &Model, ctx: &Context<Model>) -> Html {
    html! {
        <>
            {
                match model.session.view() {
                    View::LoginForm => render_login_form(model, ctx),
                    View::Workspace => render_workspace_controls(model, ctx),
                }
            }
            { render_notice(model) }
        </>
    }
}

fn render_login_form(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let on_username = link.callback(|e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::UsernameChanged(input.value())
    });
    let on_password = link.callback(|e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::PasswordChanged(input.value())
    });
    let on_submit = link.callback(|e: SubmitEvent| {
        e.prevent_default();
        Msg::SubmitLogin
    });
    let can_submit = !model.username.is_empty() && !model.password.is_empty() && !model.logging_in;

    html! {
        <form class="login-form" onsubmit={on_submit}>
            <h2>{"Log in"}</h2>
            <label for="username-input">{"Username"}</label>
            <input
                id="username-input"
                type="text"
                autocomplete="username"
                value={model.username.clone()}
                oninput={on_username}
            />
            <label for="password-input">{"Password"}</label>
            <input
                id="password-input"
                type={ if model.show_password { "text" } else { "password" } }
                autocomplete="current-password"
                value={model.password.clone()}
                oninput={on_password}
            />
            <label class="checkbox">
                <input
                    type="checkbox"
                    checked={model.show_password}
                    onchange={link.callback(|_| Msg::ToggleShowPassword)}
                />
                {" Show password"}
            </label>
            <button type="submit" class="primary-btn" disabled={!can_submit}>
                {
                    if model.logging_in {
                        html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Logging in..."}</> }
                    } else {
                        html! { {"Log in"} }
                    }
                }
            </button>
        </form>
    }
}

fn render_workspace_controls(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let username = model
        .session
        .credentials()
        .map(|c| c.username.clone())
        .unwrap_or_default();

    html! {
        <div class="workspace-controls">
            <p class="signed-in">{ format!("Signed in as {}", username) }</p>
            <button class="secondary-btn" onclick={link.callback(|_| Msg::Logout)}>
                <i class="fa-solid fa-sign-out-alt"></i>{" Log out"}
            </button>
            <h3>{"Upload your image:"}</h3>
            { render_upload_area(model, ctx) }
        </div>
    }
}

fn render_upload_area(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let handle_change = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let files = input.files();
        let files_to_process = files.as_ref().map(extract_image_files).unwrap_or_default();

        input.set_value("");

        if !files_to_process.is_empty() {
            Msg::FilesAdded(files_to_process)
        } else {
            Msg::SetError(Some("No valid image files selected.".into()))
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

    let trigger_file_input = || {
        let input = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("file-input"))
            .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok());
        if let Some(input) = input {
            input.click();
        }
    };

    html! {
        <>
            <input
                type="file"
                id="file-input"
                accept={ACCEPTED_TYPES}
                style="display: none;"
                onchange={handle_change}
            />
            <div
                id="drop-zone"
                class={classes!("upload-area", model.is_dragging.then_some("drag-over"))}
                ondragover={handle_drag_over}
                ondragleave={handle_drag_leave}
                ondrop={link.callback(Msg::HandleDrop)}
                onclick={debounce(300, trigger_file_input)}
            >
                <i class="fa-solid fa-cloud-arrow-up"></i>
                <p>{"Select an image, drop it here, or paste it"}</p>
                <p class="file-types">{"JPG, PNG, WEBP, GIF"}</p>
            </div>
        </>
    }
}

fn render_notice(model: &Model) -> Html {
    match &model.notice {
        Some(Notice::Success(text)) => html! { <p class="notice success">{ text }</p> },
        Some(Notice::Error(text)) => html! { <p class="notice error">{ text }</p> },
        None => html! {},
    }
}
