//! Loosely-typed product payloads and their validation.
//!
//! Create and update requests share [`ProductDraft`]: every field is optional
//! so validation can report all missing/invalid fields in one pass. Updates
//! overlay a draft onto the stored product and re-validate the result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use plantify_core::{DomainResult, ProductId, ValidationErrors};

use crate::product::{
    Badge, CareInstructions, Category, Difficulty, Product, ProductImages, ProductSummary, Rating,
};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 1000;
pub const MAX_SHORT_DESCRIPTION_LEN: usize = 200;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftImages {
    pub main: Option<String>,
    pub hover: Option<String>,
    pub gallery: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSpecifications {
    pub height: Option<String>,
    pub spread: Option<String>,
    pub pot_size: Option<String>,
    pub plant_type: Option<String>,
    pub bloom_time: Option<String>,
    pub difficulty: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftRating {
    pub average: Option<f64>,
    pub count: Option<u32>,
}

/// Product payload for create (all required fields present) or update (any subset).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub price: Option<f64>,
    pub original_price: Option<f64>,
    pub discount: Option<f64>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub images: Option<DraftImages>,
    pub stock: Option<i64>,
    pub sku: Option<String>,
    pub rating: Option<DraftRating>,
    pub badges: Option<Vec<String>>,
    pub care_instructions: Option<CareInstructions>,
    pub specifications: Option<DraftSpecifications>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
}

macro_rules! overlay {
    ($base:ident, $patch:ident, $($field:ident),+ $(,)?) => {
        $( if $patch.$field.is_some() { $base.$field = $patch.$field; } )+
    };
}

impl ProductDraft {
    /// Fields set in `patch` replace the ones in `self`.
    ///
    /// Nested objects (images, rating, specifications) are replaced whole.
    pub fn overlay(mut self, patch: ProductDraft) -> Self {
        overlay!(
            self,
            patch,
            name,
            description,
            short_description,
            price,
            original_price,
            discount,
            category,
            subcategory,
            images,
            stock,
            sku,
            rating,
            badges,
            care_instructions,
            specifications,
            is_active,
            is_featured,
            tags,
            seo_title,
            seo_description,
        );
        self
    }

    /// Draft describing an existing product, used as the base for updates.
    pub fn from_product(product: &Product) -> Self {
        let p = &product.summary;
        Self {
            name: Some(p.name.clone()),
            description: Some(p.description.clone()),
            short_description: p.short_description.clone(),
            price: Some(p.price),
            original_price: p.original_price,
            discount: p.discount,
            category: Some(p.category.label().to_string()),
            subcategory: p.subcategory.clone(),
            images: Some(DraftImages {
                main: Some(p.images.main.clone()),
                hover: p.images.hover.clone(),
                gallery: Some(p.images.gallery.clone()),
            }),
            stock: Some(i64::from(p.stock)),
            sku: Some(p.sku.clone()),
            rating: Some(DraftRating {
                average: Some(p.rating.average),
                count: Some(p.rating.count),
            }),
            badges: Some(p.badges.iter().map(|b| b.label().to_string()).collect()),
            care_instructions: p.care_instructions.clone(),
            specifications: p.specifications.as_ref().map(|s| DraftSpecifications {
                height: s.height.clone(),
                spread: s.spread.clone(),
                pot_size: s.pot_size.clone(),
                plant_type: s.plant_type.clone(),
                bloom_time: s.bloom_time.clone(),
                difficulty: s.difficulty.map(|d| d.label().to_string()),
            }),
            is_active: Some(p.is_active),
            is_featured: Some(p.is_featured),
            tags: Some(p.tags.clone()),
            seo_title: p.seo_title.clone(),
            seo_description: p.seo_description.clone(),
        }
    }

    /// Validate into a new product with a fresh identity.
    pub fn into_new_product(self, id: ProductId, now: DateTime<Utc>) -> DomainResult<Product> {
        let summary = self.validate(id, now, now)?;
        Ok(Product {
            summary,
            reviews: Vec::new(),
        })
    }

    /// Overlay `patch` onto `existing`, re-validate, and keep identity, reviews and `createdAt`.
    pub fn apply_to(patch: ProductDraft, existing: &Product, now: DateTime<Utc>) -> DomainResult<Product> {
        let merged = Self::from_product(existing).overlay(patch);
        let summary = merged.validate(existing.summary.id, existing.summary.created_at, now)?;
        Ok(Product {
            summary,
            reviews: existing.reviews.clone(),
        })
    }

    fn validate(
        self,
        id: ProductId,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<ProductSummary> {
        let mut errors = ValidationErrors::new();

        let name = non_blank(self.name);
        match &name {
            None => errors.push("Product name is required"),
            Some(n) => errors.check(
                n.chars().count() > MAX_NAME_LEN,
                "Product name cannot be more than 100 characters",
            ),
        }

        let description = non_blank(self.description);
        match &description {
            None => errors.push("Product description is required"),
            Some(d) => errors.check(
                d.chars().count() > MAX_DESCRIPTION_LEN,
                "Description cannot be more than 1000 characters",
            ),
        }

        let short_description = non_blank(self.short_description);
        errors.check(
            short_description
                .as_ref()
                .is_some_and(|s| s.chars().count() > MAX_SHORT_DESCRIPTION_LEN),
            "Short description cannot be more than 200 characters",
        );

        match self.price {
            None => errors.push("Product price is required"),
            Some(p) => errors.check(!(p >= 0.0 && p.is_finite()), "Price cannot be negative"),
        }
        errors.check(
            self.original_price.is_some_and(|p| !(p >= 0.0 && p.is_finite())),
            "Original price cannot be negative",
        );
        if let Some(d) = self.discount {
            errors.check(d < 0.0, "Discount cannot be negative");
            errors.check(d > 100.0, "Discount cannot be more than 100%");
        }

        let category = match self.category.as_deref() {
            None | Some("") => {
                errors.push("Product category is required");
                None
            }
            Some(label) => {
                let parsed = Category::from_label(label);
                errors.check(parsed.is_none(), format!("{label} is not a valid category"));
                parsed
            }
        };

        let images = self.images.unwrap_or_default();
        let main_image = non_blank(images.main);
        errors.check(main_image.is_none(), "Main product image is required");

        let stock = self.stock.unwrap_or(0);
        errors.check(stock < 0, "Stock cannot be negative");
        errors.check(
            stock > i64::from(u32::MAX),
            "Stock cannot be more than 4294967295",
        );

        let sku = non_blank(self.sku);
        errors.check(sku.is_none(), "SKU is required");

        let rating = self.rating.unwrap_or_default();
        let average = rating.average.unwrap_or(0.0);
        errors.check(average < 0.0, "Rating cannot be negative");
        errors.check(average > 5.0, "Rating cannot be more than 5");

        let mut badges = Vec::new();
        for label in self.badges.unwrap_or_default() {
            match Badge::from_label(&label) {
                Some(b) => badges.push(b),
                None => errors.push(format!("{label} is not a valid badge")),
            }
        }

        let specifications = self.specifications.map(|s| {
            let difficulty = s.difficulty.and_then(|label| {
                let parsed = Difficulty::from_label(&label);
                errors.check(parsed.is_none(), format!("{label} is not a valid difficulty"));
                parsed
            });
            crate::product::Specifications {
                height: s.height,
                spread: s.spread,
                pot_size: s.pot_size,
                plant_type: s.plant_type,
                bloom_time: s.bloom_time,
                difficulty,
            }
        });

        errors.into_result()?;

        // All required fields were checked above; the fallbacks never apply.
        Ok(ProductSummary {
            id,
            name: name.unwrap_or_default(),
            description: description.unwrap_or_default(),
            short_description,
            price: self.price.unwrap_or_default(),
            original_price: self.original_price,
            discount: self.discount,
            category: category.unwrap_or(Category::IndoorPlants),
            subcategory: non_blank(self.subcategory),
            images: ProductImages {
                main: main_image.unwrap_or_default(),
                hover: non_blank(images.hover),
                gallery: images.gallery.unwrap_or_default(),
            },
            stock: u32::try_from(stock).unwrap_or_default(),
            sku: sku.unwrap_or_default(),
            rating: Rating {
                average,
                count: rating.count.unwrap_or(0),
            },
            badges,
            care_instructions: self.care_instructions,
            specifications,
            is_active: self.is_active.unwrap_or(true),
            is_featured: self.is_featured.unwrap_or(false),
            tags: self.tags.unwrap_or_default(),
            seo_title: self.seo_title,
            seo_description: self.seo_description,
            created_at,
            updated_at,
        })
    }
}

/// Trimmed value, `None` when missing or blank.
fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
