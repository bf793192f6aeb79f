//! Vehicle listings

use crate::core::entity::ItemType;

impl_listing!(
    /// A car, truck or motorbike offered for sale
    Vehicle,
    ItemType::Vehicle,
    {
        make: String,
        model: String,
        #[serde(default)]
        year: Option<i32>,
        #[serde(default)]
        mileage: Option<u64>,
        #[serde(default)]
        fuel_type: Option<String>,
        #[serde(default)]
        transmission: Option<String>,
        #[serde(default)]
        body_type: Option<String>,
        #[serde(default)]
        color: Option<String>,
        #[serde(default)]
        condition: Option<String>,
        #[serde(default)]
        is_featured: bool,
    },
    title = |v| match v.year {
        Some(year) => format!("{} {} {}", year, v.make, v.model),
        None => format!("{} {}", v.make, v.model),
    },
    subtitle = |v| {
        let mut parts = Vec::new();
        if let Some(mileage) = v.mileage {
            parts.push(format!("{} km", crate::presentation::group_thousands(mileage)));
        }
        parts.extend(v.transmission.clone());
        parts.extend(v.fuel_type.clone());
        if parts.is_empty() { None } else { Some(parts.join(" · ")) }
    },
    badges = |v| {
        let mut badges = Vec::new();
        if v.is_featured {
            badges.push("Featured".to_string());
        }
        badges.extend(v.condition.clone());
        badges
    },
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::Listing;
    use serde_json::json;

    #[test]
    fn test_vehicle_from_backend_json() {
        let vehicle: Vehicle = serde_json::from_value(json!({
            "id": 42,
            "make": "Toyota",
            "model": "Hilux",
            "year": 2019,
            "price": 3_450_000,
            "mileage": 84500,
            "transmission": "Manual",
            "fuel_type": "Diesel",
            "condition": "Used",
            "is_featured": true,
            "images": ["https://cdn.example/hilux.jpg"]
        }))
        .unwrap();

        assert_eq!(vehicle.id(), "42");
        assert_eq!(vehicle.title(), "2019 Toyota Hilux");
        assert_eq!(
            vehicle.subtitle().as_deref(),
            Some("84,500 km · Manual · Diesel")
        );
        assert_eq!(vehicle.badges(), vec!["Featured", "Used"]);
        assert_eq!(Vehicle::resource_name(), "vehicles");
    }

    #[test]
    fn test_vehicle_missing_make_is_rejected() {
        let result = serde_json::from_value::<Vehicle>(json!({"id": 1, "model": "Hilux"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_vehicle_minimal() {
        let vehicle: Vehicle =
            serde_json::from_value(json!({"id": "v-1", "make": "Mazda", "model": "Demio"}))
                .unwrap();
        assert_eq!(vehicle.title(), "Mazda Demio");
        assert_eq!(vehicle.subtitle(), None);
        assert!(vehicle.badges().is_empty());
    }
}
