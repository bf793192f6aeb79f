//! Macros for reducing boilerplate when defining listing types
//!
//! Every listing kind shares the same base fields and accessor methods;
//! only its extra fields and card presentation differ.

/// Define a listing struct with the shared listing fields and implement `Listing`
///
/// Injects: id, price, location, images, description, created_at
///
/// # Example
///
/// ```rust,ignore
/// impl_listing!(
///     Boat,
///     ItemType::Vehicle,
///     {
///         name: String,
///         #[serde(default)]
///         length_m: Option<f32>,
///     },
///     title = |b| b.name.clone(),
///     subtitle = |b| b.length_m.map(|l| format!("{} m", l)),
///     badges = |_b| Vec::new(),
/// );
/// ```
macro_rules! impl_listing {
    (
        $(#[$struct_meta:meta])*
        $type:ident,
        $item_type:expr,
        {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $field_ty:ty
            ),* $(,)?
        },
        title = |$t:ident| $title:expr,
        subtitle = |$s:ident| $subtitle:expr,
        badges = |$b:ident| $badges:expr $(,)?
    ) => {
        $(#[$struct_meta])*
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $type {
            /// Identifier, normalized to a string
            #[serde(deserialize_with = "crate::core::entity::deserialize_id")]
            pub id: String,

            /// Asking price
            #[serde(default, deserialize_with = "crate::core::entity::deserialize_price")]
            pub price: Option<f64>,

            /// Where the item is located
            #[serde(default)]
            pub location: Option<String>,

            /// Image URLs, first one is the cover
            #[serde(default)]
            pub images: Vec<String>,

            /// Free-form description
            #[serde(default)]
            pub description: Option<String>,

            /// When this listing was created
            #[serde(default)]
            pub created_at: Option<::chrono::DateTime<::chrono::Utc>>,

            $(
                $(#[$field_meta])*
                pub $field: $field_ty,
            )*
        }

        impl $crate::core::entity::Listing for $type {
            const ITEM_TYPE: $crate::core::entity::ItemType = $item_type;

            fn id(&self) -> &str {
                &self.id
            }

            fn price(&self) -> Option<f64> {
                self.price
            }

            fn location(&self) -> Option<&str> {
                self.location.as_deref()
            }

            fn images(&self) -> &[String] {
                &self.images
            }

            fn created_at(&self) -> Option<::chrono::DateTime<::chrono::Utc>> {
                self.created_at
            }

            fn title(&self) -> String {
                let $t = self;
                $title
            }

            fn subtitle(&self) -> Option<String> {
                let $s = self;
                $subtitle
            }

            fn badges(&self) -> Vec<String> {
                let $b = self;
                $badges
            }
        }
    };
}
