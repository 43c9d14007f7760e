use super::super::{Model, Msg};
use yew::prelude::*;

pub fn render_preview_area(model: &Model, ctx: &Context<Model>) -> Html {
    let Some(image) = &model.image else {
        return html! {};
    };

    html! {
        <div id="preview-container">
            <img
                id="actual-image-preview"
                src={image.preview_url.to_string()}
                alt={image.file.name()}
            />
            <p class="caption">{ format!("Uploaded image: {}", image.file.name()) }</p>
            <button
                class="secondary-btn"
                disabled={model.loading}
                onclick={ctx.link().callback(|_| Msg::ClearImage)}
            >
                <i class="fa-solid fa-trash"></i>{" Clear"}
            </button>
            {
                if model.loading {
                    html! {
                        <div class="loading-preview">
                            <i class="fa-solid fa-spinner fa-spin fa-2x"></i>
                            <p>{"Running prediction..."}</p>
                        </div>
                    }
                } else {
                    html! {}
                }
            }
        </div>
    }
}
