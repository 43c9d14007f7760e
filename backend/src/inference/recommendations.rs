use shared::{Condition, Recommendation};

/// Static agronomic advice for a predicted class label.
pub fn for_label(label: &str) -> Recommendation {
    match label.parse::<Condition>() {
        Ok(condition) => for_condition(condition),
        Err(_) => Recommendation {
            title: "No recommendations are available for this condition.".to_string(),
            items: Vec::new(),
        },
    }
}

pub fn for_condition(condition: Condition) -> Recommendation {
    let (title, items): (&str, &[&str]) = match condition {
        Condition::Monilia => (
            "Recommendations for managing Monilia",
            &[
                "Remove infected pods: pick and destroy affected fruit before it sporulates.",
                "Ventilation and shade: keep the plantation well aired and regulate shade.",
                "Chemical and biological control: apply fungicides and biological agents such as Trichoderma spp.",
                "Pruning: prune regularly to improve air circulation.",
            ],
        ),
        Condition::Sana => (
            "Recommendations for healthy plants",
            &[
                "Keep up good cultivation practices.",
                "Monitor regularly to prevent future problems.",
            ],
        ),
    };
    Recommendation {
        title: title.to_string(),
        items: items.iter().map(|s| s.to_string()).collect(),
    }
}
