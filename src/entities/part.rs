//! Spare part listings

use crate::core::entity::ItemType;

impl_listing!(
    /// A spare part or accessory
    Part,
    ItemType::Part,
    {
        name: String,
        #[serde(default)]
        category: Option<String>,
        #[serde(default)]
        brand: Option<String>,
        #[serde(default)]
        part_number: Option<String>,
        #[serde(default)]
        compatible_makes: Vec<String>,
        #[serde(default)]
        condition: Option<String>,
        #[serde(default)]
        stock_quantity: Option<u32>,
    },
    title = |p| p.name.clone(),
    subtitle = |p| match (&p.brand, &p.category) {
        (Some(brand), Some(category)) => Some(format!("{} · {}", brand, category)),
        (Some(one), None) | (None, Some(one)) => Some(one.clone()),
        (None, None) => None,
    },
    badges = |p| {
        let mut badges = Vec::new();
        badges.extend(p.condition.clone());
        if p.stock_quantity == Some(0) {
            badges.push("Out of stock".to_string());
        }
        badges
    },
);
