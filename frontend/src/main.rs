mod api;
mod components;

use components::handlers;
use components::header::{render_header, render_welcome};
use components::preview_area::render_preview_area;
use components::results::render_results;
use components::scene::render_scene;
use components::sidebar::render_sidebar;
use components::utils::render_error_message;
use gloo_events::EventListener;
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::{Credentials, PredictionResponse, Session, View};
use wasm_bindgen::JsCast;
use web_sys::{ClipboardEvent, DragEvent};
use yew::prelude::*;

pub struct FileData {
    file: GlooFile,
    preview_url: ObjectUrl,
}

/// Sidebar feedback after login or logout.
#[derive(Clone, PartialEq)]
pub enum Notice {
    Success(String),
    Error(String),
}

pub enum Msg {
    // Access gate
    UsernameChanged(String),
    PasswordChanged(String),
    ToggleShowPassword,
    SubmitLogin,
    LoginAccepted(Credentials),
    LoginRejected(String),
    Logout,

    // Upload and prediction
    FilesAdded(Vec<GlooFile>),
    ClearImage,
    PredictionReady(u64, PredictionResponse),
    PredictionFailed(u64, String),

    // UI states
    SetError(Option<String>),
    SetDragging(bool),

    // Input events
    HandleDrop(DragEvent),
    HandlePaste(ClipboardEvent),
}

pub struct Model {
    session: Session,
    username: String,
    password: String,
    show_password: bool,
    logging_in: bool,
    notice: Option<Notice>,
    image: Option<FileData>,
    result: Option<PredictionResponse>,
    loading: bool,
    error: Option<String>,
    is_dragging: bool,
    _paste_listener: Option<EventListener>,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let paste_listener = web_sys::window().map(|window| {
            let link = ctx.link().clone();
            EventListener::new(&window, "paste", move |event| {
                if let Some(clipboard_event) = event.dyn_ref::<ClipboardEvent>() {
                    link.send_message(Msg::HandlePaste(clipboard_event.clone()));
                }
            })
        });

        Self {
            session: Session::default(),
            username: String::new(),
            password: String::new(),
            show_password: false,
            logging_in: false,
            notice: None,
            image: None,
            result: None,
            loading: false,
            error: None,
            is_dragging: false,
            _paste_listener: paste_listener,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::UsernameChanged(value) => {
                self.username = value;
                true
            }
            Msg::PasswordChanged(value) => {
                self.password = value;
                true
            }
            Msg::ToggleShowPassword => {
                self.show_password = !self.show_password;
                true
            }
            Msg::SubmitLogin => handlers::handle_submit_login(self, ctx),
            Msg::LoginAccepted(credentials) => handlers::handle_login_accepted(self, credentials),
            Msg::LoginRejected(message) => handlers::handle_login_rejected(self, message),
            Msg::Logout => handlers::handle_logout(self),

            Msg::FilesAdded(files) => handlers::handle_files_added(self, ctx, files),
            Msg::ClearImage => handlers::handle_clear_image(self),
            Msg::PredictionReady(request_id, response) => {
                handlers::handle_prediction_ready(self, request_id, response)
            }
            Msg::PredictionFailed(request_id, message) => {
                handlers::handle_prediction_failed(self, request_id, message)
            }

            Msg::SetError(error) => {
                self.error = error;
                self.loading = false;
                true
            }
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }

            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),
            Msg::HandlePaste(event) => handlers::handle_paste(self, ctx, event),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="app-layout">
                <aside class="sidebar">
                    { render_sidebar(self, ctx) }
                </aside>
                <main class="main-content">
                    {
                        match self.session.view() {
                            View::LoginForm => render_welcome(),
                            View::Workspace => html! {
                                <>
                                    { render_header() }
                                    { render_scene() }
                                    { render_preview_area(self, ctx) }
                                    { render_error_message(self) }
                                    { render_results(self) }
                                </>
                            },
                        }
                    }
                </main>
            </div>
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
