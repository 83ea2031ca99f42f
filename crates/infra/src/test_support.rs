use chrono::{DateTime, TimeZone, Utc};

use plantify_core::ProductId;
use plantify_products::{Category, Product, ProductImages, ProductSummary, Rating};

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

/// Active product with a unique SKU derived from the name.
pub fn plant(name: &str, category: Category, price: f64) -> Product {
    Product {
        summary: ProductSummary {
            id: ProductId::new(),
            name: name.to_string(),
            description: String::new(),
            short_description: None,
            price,
            original_price: None,
            discount: None,
            category,
            subcategory: None,
            images: ProductImages {
                main: "/assets/main.jpg".to_string(),
                ..ProductImages::default()
            },
            stock: 5,
            sku: format!("SKU-{}", name.to_uppercase().replace(' ', "-")),
            rating: Rating::default(),
            badges: vec![],
            care_instructions: None,
            specifications: None,
            is_active: true,
            is_featured: false,
            tags: vec![],
            seo_title: None,
            seo_description: None,
            created_at: at(0),
            updated_at: at(0),
        },
        reviews: vec![],
    }
}
