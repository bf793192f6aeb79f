//! Service listings (repairs, detailing, inspections)

use crate::core::entity::ItemType;

impl_listing!(
    /// A service offered by a garage or provider
    Service,
    ItemType::Service,
    {
        name: String,
        #[serde(default)]
        category: Option<String>,
        #[serde(default)]
        provider_name: Option<String>,
        #[serde(default)]
        duration: Option<String>,
        #[serde(default)]
        rating: Option<f32>,
    },
    title = |s| s.name.clone(),
    subtitle = |s| {
        let parts: Vec<String> = s
            .provider_name
            .iter()
            .chain(s.category.iter())
            .cloned()
            .collect();
        if parts.is_empty() { None } else { Some(parts.join(" · ")) }
    },
    badges = |s| {
        let mut badges = Vec::new();
        if let Some(rating) = s.rating {
            badges.push(format!("★ {:.1}", rating));
        }
        badges.extend(s.duration.clone());
        badges
    },
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::Listing;
    use serde_json::json;

    #[test]
    fn test_service_card_fields() {
        let service: Service = serde_json::from_value(json!({
            "id": "svc-3",
            "name": "Full detailing",
            "provider_name": "Sparkle Auto",
            "category": "Cleaning",
            "rating": 4.5,
            "duration": "3 hours"
        }))
        .unwrap();

        assert_eq!(service.subtitle().as_deref(), Some("Sparkle Auto · Cleaning"));
        assert_eq!(service.badges(), vec!["★ 4.5", "3 hours"]);
        assert_eq!(service.price(), None);
    }
}
