use super::super::Model;
use shared::format_confidence;
use yew::prelude::*;

pub fn render_results(model: &Model) -> Html {
    let Some(result) = &model.result else {
        return html! {};
    };

    let diseased = result.condition().map(|c| c.is_diseased()).unwrap_or(false);
    let confidence = result.confidence * 100.0;

    html! {
        <div class={classes!("results-container", if diseased { "monilia-detected" } else { "healthy" })}>
            <div class="result-header">
                <h2>{ format!("Prediction: {}", result.class_label) }</h2>
                <div class="confidence-meter">
                    <div class="meter-label">{"Probability:"}</div>
                    <div class="meter">
                        <div class="meter-fill" style={format!("width: {}%", confidence)}></div>
                    </div>
                    <div class="meter-value">{ format_confidence(result.confidence) }</div>
                </div>
            </div>
            <div class="detailed-results">
                <div class="result-bars">
                    { for result.class_labels.iter().zip(&result.probabilities).map(|(label, &p)| {
                        let percentage = p * 100.0;
                        html! {
                            <div class="result-item">
                                <div class="result-label">{ label }</div>
                                <div class="result-bar-container">
                                    <div class="result-bar" style={format!("width: {}%", percentage)}></div>
                                </div>
                                <div class="result-value">{ format!("{:.1}%", percentage) }</div>
                            </div>
                        }
                    })}
                </div>
            </div>
            <div class="recommendations">
                <h3>{ &result.recommendation.title }</h3>
                <ul>
                    { for result.recommendation.items.iter().map(|item| html! { <li>{ item }</li> }) }
                </ul>
            </div>
        </div>
    }
}
