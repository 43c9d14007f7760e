use yew::prelude::*;

/// Title and introduction shown once logged in
pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <h1>{"MONILIA DETECTION IN CACAO PLANTATIONS 🌱"}</h1>
            <p class="subtitle">
                {"Welcome to the cacao disease detection tool. Upload a photo of a pod to find out whether it shows Monilia or another condition."}
            </p>
        </header>
    }
}

pub fn render_welcome() -> Html {
    html! {
        <header class="app-header">
            <h1>{"MONILIA DETECTION IN CACAO PLANTATIONS 🌱"}</h1>
            <p class="subtitle">{"Log in from the sidebar to start analyzing pods."}</p>
        </header>
    }
}
