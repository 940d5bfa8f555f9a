use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(ProductId);

/// Catalog entry. Opaque to the controller; passed through unmodified for
/// rendering and detail-view linking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub brand: String,
    pub product_name: String,
    pub picture_url: String,
}

/// One completed page of results plus the continuation flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    pub items: Vec<Product>,
    pub has_more: bool,
}

/// Predefined categories offered as browse shortcuts next to the search box.
pub const AVAILABLE_CATEGORIES: [&str; 8] = [
    "Camera",
    "Laptop",
    "Headphone",
    "Speaker",
    "Earphone",
    "Mobile",
    "Playstation",
    "TV",
];
