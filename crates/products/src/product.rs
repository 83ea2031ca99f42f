use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use plantify_core::{DomainError, DomainResult, Entity, ProductId, ReviewId, UserId, ValidationErrors};

/// Catalog category. Serialized as its storefront label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Indoor Plants")]
    IndoorPlants,
    #[serde(rename = "Flowering Plants")]
    FloweringPlants,
    #[serde(rename = "Low Maintenance Plants")]
    LowMaintenancePlants,
    #[serde(rename = "Air Purifying Plants")]
    AirPurifyingPlants,
    #[serde(rename = "Low Light Plants")]
    LowLightPlants,
    #[serde(rename = "Cacti & Succulents")]
    CactiAndSucculents,
    #[serde(rename = "Hanging Plants")]
    HangingPlants,
    #[serde(rename = "Medicinal & Aromatic Plants")]
    MedicinalAndAromaticPlants,
    #[serde(rename = "Pet-Friendly Plants")]
    PetFriendlyPlants,
    #[serde(rename = "Fruit Plants")]
    FruitPlants,
    Seeds,
    #[serde(rename = "Pots & Planters")]
    PotsAndPlanters,
    #[serde(rename = "Plant Care")]
    PlantCare,
    Bundles,
}

impl Category {
    pub const ALL: [Category; 14] = [
        Category::IndoorPlants,
        Category::FloweringPlants,
        Category::LowMaintenancePlants,
        Category::AirPurifyingPlants,
        Category::LowLightPlants,
        Category::CactiAndSucculents,
        Category::HangingPlants,
        Category::MedicinalAndAromaticPlants,
        Category::PetFriendlyPlants,
        Category::FruitPlants,
        Category::Seeds,
        Category::PotsAndPlanters,
        Category::PlantCare,
        Category::Bundles,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::IndoorPlants => "Indoor Plants",
            Category::FloweringPlants => "Flowering Plants",
            Category::LowMaintenancePlants => "Low Maintenance Plants",
            Category::AirPurifyingPlants => "Air Purifying Plants",
            Category::LowLightPlants => "Low Light Plants",
            Category::CactiAndSucculents => "Cacti & Succulents",
            Category::HangingPlants => "Hanging Plants",
            Category::MedicinalAndAromaticPlants => "Medicinal & Aromatic Plants",
            Category::PetFriendlyPlants => "Pet-Friendly Plants",
            Category::FruitPlants => "Fruit Plants",
            Category::Seeds => "Seeds",
            Category::PotsAndPlanters => "Pots & Planters",
            Category::PlantCare => "Plant Care",
            Category::Bundles => "Bundles",
        }
    }

    /// Exact (case-sensitive) label lookup.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Merchandising badge shown on product cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Badge {
    Trending,
    Bestseller,
    New,
    Sale,
    Limited,
}

impl Badge {
    pub fn label(self) -> &'static str {
        match self {
            Badge::Trending => "Trending",
            Badge::Bestseller => "Bestseller",
            Badge::New => "New",
            Badge::Sale => "Sale",
            Badge::Limited => "Limited",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Trending" => Some(Badge::Trending),
            "Bestseller" => Some(Badge::Bestseller),
            "New" => Some(Badge::New),
            "Sale" => Some(Badge::Sale),
            "Limited" => Some(Badge::Limited),
            _ => None,
        }
    }
}

/// Care difficulty for plants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Easy" => Some(Difficulty::Easy),
            "Medium" => Some(Difficulty::Medium),
            "Hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImages {
    pub main: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover: Option<String>,
    #[serde(default)]
    pub gallery: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareInstructions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specifications {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spread: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pot_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plant_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bloom_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

/// Aggregate customer rating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Mean review score in `[0, 5]`.
    pub average: f64,
    pub count: u32,
}

impl Rating {
    /// Recompute the aggregate from the full review list.
    ///
    /// No reviews yields `{ average: 0, count: 0 }`.
    pub fn from_reviews(reviews: &[Review]) -> Self {
        if reviews.is_empty() {
            return Self::default();
        }
        let total: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
        let count = u32::try_from(reviews.len()).unwrap_or(u32::MAX);
        Self {
            average: f64::from(total) / reviews.len() as f64,
            count,
        }
    }
}

/// A shopper review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub user: UserId,
    /// Whole stars, 1..=5.
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Review submission as received from a shopper.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewReview {
    pub user: Option<UserId>,
    pub rating: Option<f64>,
    pub comment: Option<String>,
}

pub const MAX_COMMENT_LEN: usize = 500;

impl NewReview {
    fn validate(self, now: DateTime<Utc>) -> DomainResult<Review> {
        let mut errors = ValidationErrors::new();
        errors.check(self.user.is_none(), "Reviewer is required");

        let stars = match self.rating {
            None => {
                errors.push("Rating is required");
                None
            }
            Some(r) if r.fract() == 0.0 && (1.0..=5.0).contains(&r) => Some(r as u8),
            Some(_) => {
                errors.push("Rating must be a whole number between 1 and 5");
                None
            }
        };

        let comment = self.comment.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());
        errors.check(
            comment.as_ref().is_some_and(|c| c.chars().count() > MAX_COMMENT_LEN),
            "Review comment cannot be more than 500 characters",
        );

        match (errors.into_result(), self.user, stars) {
            (Ok(()), Some(user), Some(rating)) => Ok(Review {
                id: ReviewId::new(),
                user,
                rating,
                comment,
                created_at: now,
            }),
            (Err(e), _, _) => Err(e),
            // Unreachable: missing user/rating always records an error above.
            _ => Err(DomainError::Validation(ValidationErrors::single("Invalid review"))),
        }
    }
}

/// List-view projection of a product: every field except reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    pub images: ProductImages,
    pub stock: u32,
    pub sku: String,
    pub rating: Rating,
    #[serde(default)]
    pub badges: Vec<Badge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub care_instructions: Option<CareInstructions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specifications: Option<Specifications>,
    pub is_active: bool,
    pub is_featured: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full product record as held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(flatten)]
    pub summary: ProductSummary,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Product {
    pub fn is_active(&self) -> bool {
        self.summary.is_active
    }

    pub fn sku(&self) -> &str {
        &self.summary.sku
    }

    /// Drop reviews for list views.
    pub fn into_summary(self) -> ProductSummary {
        self.summary
    }

    /// Soft delete: the record stays, listings stop showing it.
    pub fn deactivate(&mut self, now: DateTime<Utc>) {
        self.summary.is_active = false;
        self.summary.updated_at = now;
    }

    /// Append a review and recompute the aggregate rating.
    ///
    /// Each user may review a product once.
    pub fn add_review(&mut self, review: NewReview, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(user) = review.user {
            if self.reviews.iter().any(|r| r.user == user) {
                return Err(DomainError::conflict("You have already reviewed this product"));
            }
        }
        let review = review.validate(now)?;
        self.reviews.push(review);
        self.summary.rating = Rating::from_reviews(&self.reviews);
        self.summary.updated_at = now;
        Ok(())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.summary.id
    }
}
