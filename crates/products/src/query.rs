//! Catalog listing query: typed filter, sort resolution and pagination.
//!
//! Raw query-string values are coerced leniently and never rejected: bad
//! pagination falls back to defaults, bad price bounds are dropped.

use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::product::Product;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 12;

/// Free-text search term: trimmed, never empty, with a cached lowercase form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    raw: String,
    folded: String,
}

impl SearchTerm {
    /// `None` for missing or whitespace-only input.
    pub fn parse(input: &str) -> Option<Self> {
        let raw = input.trim();
        if raw.is_empty() {
            return None;
        }
        Some(Self {
            raw: raw.to_string(),
            folded: fold(raw),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Lowercased form used for every comparison.
    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// Case-insensitive literal substring test.
    pub fn found_in(&self, haystack: &str) -> bool {
        fold(haystack).contains(&self.folded)
    }
}

/// Case folding shared by filtering and scoring.
pub fn fold(s: &str) -> String {
    s.to_lowercase()
}

/// Inclusive bounds on `price`; either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceRange {
    /// `None` when both bounds are absent.
    pub fn new(min: Option<f64>, max: Option<f64>) -> Option<Self> {
        (min.is_some() || max.is_some()).then_some(Self { min, max })
    }

    pub fn contains(&self, price: f64) -> bool {
        self.min.is_none_or(|lo| price >= lo) && self.max.is_none_or(|hi| price <= hi)
    }
}

/// Base filter for listings. `isActive = true` is always implied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    /// Exact category label.
    pub category: Option<String>,
    pub price_range: Option<PriceRange>,
    pub search: Option<SearchTerm>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        let p = &product.summary;
        if !p.is_active {
            return false;
        }
        if let Some(category) = &self.category {
            if p.category.label() != category {
                return false;
            }
        }
        if let Some(range) = &self.price_range {
            if !range.contains(p.price) {
                return false;
            }
        }
        if let Some(term) = &self.search {
            let hit = term.found_in(&p.name)
                || term.found_in(&p.description)
                || p.short_description.as_deref().is_some_and(|s| term.found_in(s))
                || term.found_in(p.category.label())
                || p.tags.iter().any(|t| term.found_in(t));
            if !hit {
                return false;
            }
        }
        true
    }
}

/// Listing order requested by the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    PriceLow,
    PriceHigh,
    Rating,
    #[default]
    Newest,
    Popular,
}

impl SortKey {
    /// Unknown or missing values sort newest first.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("price-low") => SortKey::PriceLow,
            Some("price-high") => SortKey::PriceHigh,
            Some("rating") => SortKey::Rating,
            Some("popular") => SortKey::Popular,
            _ => SortKey::Newest,
        }
    }

    /// Primary order, then product id ascending so equal keys still order deterministically.
    pub fn compare(self, a: &Product, b: &Product) -> Ordering {
        let (a, b) = (&a.summary, &b.summary);
        let primary = match self {
            SortKey::PriceLow => a.price.total_cmp(&b.price),
            SortKey::PriceHigh => b.price.total_cmp(&a.price),
            SortKey::Rating => b.rating.average.total_cmp(&a.rating.average),
            SortKey::Newest => b.created_at.cmp(&a.created_at),
            SortKey::Popular => b.rating.count.cmp(&a.rating.count),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

/// Requested page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Zero values fall back to the defaults.
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: if page == 0 { DEFAULT_PAGE } else { page },
            limit: if limit == 0 { DEFAULT_LIMIT } else { limit },
        }
    }

    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Apply the window to an already ordered sequence.
    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        let skip = usize::try_from(self.skip()).unwrap_or(usize::MAX);
        let take = usize::try_from(self.limit).unwrap_or(usize::MAX);
        items.into_iter().skip(skip).take(take).collect()
    }

    pub fn info(&self, total: u64) -> PaginationInfo {
        PaginationInfo {
            page: self.page,
            limit: self.limit,
            total,
            pages: total.div_ceil(self.limit),
        }
    }
}

/// Pagination block returned with every listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    /// `ceil(total / limit)`.
    pub pages: u64,
}

/// Raw listing parameters exactly as they arrive on the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sort: Option<String>,
}

/// Fully resolved listing query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingQuery {
    pub filter: ProductFilter,
    pub sort: SortKey,
    pub page: PageRequest,
}

impl From<ListingParams> for ListingQuery {
    fn from(params: ListingParams) -> Self {
        let page = PageRequest::new(
            positive_int(params.page.as_deref()).unwrap_or(DEFAULT_PAGE),
            positive_int(params.limit.as_deref()).unwrap_or(DEFAULT_LIMIT),
        );
        let min = non_negative_float(params.min_price.as_deref());
        let max = non_negative_float(params.max_price.as_deref());

        Self {
            filter: ProductFilter {
                category: params.category.filter(|c| !c.is_empty()),
                price_range: PriceRange::new(min, max),
                search: params.search.as_deref().and_then(SearchTerm::parse),
            },
            sort: SortKey::from_param(params.sort.as_deref()),
            page,
        }
    }
}

/// Lenient integer parse: optional leading whitespace and sign, then leading digits.
///
/// `"3abc"` → 3, `"abc"` → `None`. Only strictly positive results are kept.
pub fn positive_int(input: Option<&str>) -> Option<u64> {
    let s = input?.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 || negative {
        return None;
    }
    // Overlong digit runs saturate instead of failing.
    let value = digits[..end].parse::<u64>().unwrap_or(u64::MAX);
    (value > 0).then_some(value)
}

/// Lenient float parse of the longest numeric prefix (`"12.5usd"` → 12.5).
///
/// Non-finite and negative values are dropped.
pub fn non_negative_float(input: Option<&str>) -> Option<f64> {
    let s = input?.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end = 1;
    }
    let int_digits = bytes[end..].iter().take_while(|b| b.is_ascii_digit()).count();
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = bytes[end + 1..].iter().take_while(|b| b.is_ascii_digit()).count();
        end += 1 + frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'-' | b'+')) {
            exp_end += 1;
        }
        let exp_digits = bytes[exp_end.min(bytes.len())..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }
    let value: f64 = s[..end].parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::Category;
    use crate::product::fixtures::{at, product};

    fn params(pairs: &[(&str, &str)]) -> ListingParams {
        let mut p = ListingParams::default();
        for (k, v) in pairs {
            let v = Some(v.to_string());
            match *k {
                "page" => p.page = v,
                "limit" => p.limit = v,
                "category" => p.category = v,
                "search" => p.search = v,
                "minPrice" => p.min_price = v,
                "maxPrice" => p.max_price = v,
                "sort" => p.sort = v,
                other => panic!("unknown param {other}"),
            }
        }
        p
    }

    #[test]
    fn integer_coercion_mirrors_lenient_parsing() {
        assert_eq!(positive_int(Some("3")), Some(3));
        assert_eq!(positive_int(Some("  7xyz")), Some(7));
        assert_eq!(positive_int(Some("+4")), Some(4));
        assert_eq!(positive_int(Some("0")), None);
        assert_eq!(positive_int(Some("-2")), None);
        assert_eq!(positive_int(Some("abc")), None);
        assert_eq!(positive_int(Some("")), None);
        assert_eq!(positive_int(None), None);
        assert_eq!(positive_int(Some("99999999999999999999999")), Some(u64::MAX));
    }

    #[test]
    fn float_coercion_takes_the_numeric_prefix() {
        assert_eq!(non_negative_float(Some("12.5usd")), Some(12.5));
        assert_eq!(non_negative_float(Some("100")), Some(100.0));
        assert_eq!(non_negative_float(Some(".5")), Some(0.5));
        assert_eq!(non_negative_float(Some("1e3")), Some(1000.0));
        assert_eq!(non_negative_float(Some("2e")), Some(2.0));
        assert_eq!(non_negative_float(Some("0")), Some(0.0));
        assert_eq!(non_negative_float(Some("-1")), None);
        assert_eq!(non_negative_float(Some("cheap")), None);
        assert_eq!(non_negative_float(Some(".")), None);
        assert_eq!(non_negative_float(Some("1e999")), None);
    }

    #[test]
    fn defaults_apply_to_missing_or_bad_pagination() {
        let q = ListingQuery::from(params(&[("page", "zero"), ("limit", "-5")]));
        assert_eq!(q.page, PageRequest { page: 1, limit: 12 });
        assert_eq!(q.sort, SortKey::Newest);
        assert_eq!(q.filter, ProductFilter::default());
    }

    #[test]
    fn whitespace_search_is_treated_as_absent() {
        let q = ListingQuery::from(params(&[("search", "   ")]));
        assert_eq!(q.filter.search, None);

        let q = ListingQuery::from(params(&[("search", "  Fern ")]));
        let term = q.filter.search.unwrap();
        assert_eq!(term.as_str(), "Fern");
        assert_eq!(term.folded(), "fern");
    }

    #[test]
    fn invalid_price_bounds_are_omitted() {
        let q = ListingQuery::from(params(&[("minPrice", "abc"), ("maxPrice", "500")]));
        assert_eq!(q.filter.price_range, Some(PriceRange { min: None, max: Some(500.0) }));

        let q = ListingQuery::from(params(&[("minPrice", "abc")]));
        assert_eq!(q.filter.price_range, None);
    }

    #[test]
    fn unknown_sort_falls_back_to_newest() {
        assert_eq!(SortKey::from_param(Some("cheapest")), SortKey::Newest);
        assert_eq!(SortKey::from_param(None), SortKey::Newest);
        assert_eq!(SortKey::from_param(Some("popular")), SortKey::Popular);
    }

    #[test]
    fn pagination_info_rounds_pages_up() {
        let info = PageRequest::new(3, 12).info(25);
        assert_eq!(info, PaginationInfo { page: 3, limit: 12, total: 25, pages: 3 });
        assert_eq!(PageRequest::new(1, 12).info(0).pages, 0);
        assert_eq!(PageRequest::new(1, 12).info(24).pages, 2);
    }

    #[test]
    fn slice_returns_the_requested_window() {
        let items: Vec<u32> = (0..25).collect();
        assert_eq!(PageRequest::new(3, 12).slice(items.clone()), vec![24]);
        assert_eq!(PageRequest::new(4, 12).slice(items.clone()), Vec::<u32>::new());
        assert_eq!(PageRequest::new(u64::MAX, u64::MAX).slice(items), Vec::<u32>::new());
    }

    #[test]
    fn filter_requires_active_products() {
        let mut p = product("Fern", Category::IndoorPlants, 10.0);
        assert!(ProductFilter::default().matches(&p));
        p.summary.is_active = false;
        assert!(!ProductFilter::default().matches(&p));
    }

    #[test]
    fn category_match_is_exact() {
        let p = product("Fern", Category::IndoorPlants, 10.0);
        let exact = ProductFilter {
            category: Some("Indoor Plants".to_string()),
            ..ProductFilter::default()
        };
        let loose = ProductFilter {
            category: Some("indoor plants".to_string()),
            ..ProductFilter::default()
        };
        assert!(exact.matches(&p));
        assert!(!loose.matches(&p));
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let p = product("Fern", Category::IndoorPlants, 10.0);
        let within = |min, max| ProductFilter {
            price_range: PriceRange::new(min, max),
            ..ProductFilter::default()
        };
        assert!(within(Some(10.0), Some(10.0)).matches(&p));
        assert!(!within(None, Some(9.99)).matches(&p));
        assert!(!within(Some(10.01), None).matches(&p));
    }

    #[test]
    fn search_covers_every_text_field() {
        let mut p = product("Fern", Category::IndoorPlants, 10.0);
        p.summary.description = "Lush fronds".to_string();
        p.summary.short_description = Some("Humidity lover".to_string());
        p.summary.tags = vec!["Pet-Safe".to_string()];

        for needle in ["fern", "FRONDS", "humidity", "indoor", "pet-safe"] {
            let f = ProductFilter {
                search: SearchTerm::parse(needle),
                ..ProductFilter::default()
            };
            assert!(f.matches(&p), "expected {needle} to match");
        }

        let miss = ProductFilter {
            search: SearchTerm::parse("cactus"),
            ..ProductFilter::default()
        };
        assert!(!miss.matches(&p));
    }

    #[test]
    fn search_term_is_literal_not_a_pattern() {
        let p = product("Fern", Category::IndoorPlants, 10.0);
        let f = ProductFilter {
            search: SearchTerm::parse("f.rn"),
            ..ProductFilter::default()
        };
        assert!(!f.matches(&p));
    }

    #[test]
    fn sort_orders_with_id_tie_break() {
        let mut cheap = product("A", Category::Seeds, 5.0);
        let mut pricey = product("B", Category::Seeds, 50.0);
        cheap.summary.created_at = at(10);
        pricey.summary.created_at = at(20);

        assert_eq!(SortKey::PriceLow.compare(&cheap, &pricey), Ordering::Less);
        assert_eq!(SortKey::PriceHigh.compare(&cheap, &pricey), Ordering::Greater);
        assert_eq!(SortKey::Newest.compare(&cheap, &pricey), Ordering::Greater);

        let twin = {
            let mut t = cheap.clone();
            t.summary.id = plantify_core::ProductId::new();
            t
        };
        let expected = cheap.summary.id.cmp(&twin.summary.id);
        assert_eq!(SortKey::PriceLow.compare(&cheap, &twin), expected);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn pages_is_ceil_of_total_over_limit(total in 0u64..1_000_000, limit in 1u64..500) {
                let info = PageRequest::new(1, limit).info(total);
                prop_assert!(info.pages * limit >= total);
                prop_assert!(info.pages == 0 || (info.pages - 1) * limit < total);
            }

            #[test]
            fn coerced_pagination_is_always_positive(page in ".{0,12}", limit in ".{0,12}") {
                let q = ListingQuery::from(ListingParams {
                    page: Some(page),
                    limit: Some(limit),
                    ..ListingParams::default()
                });
                prop_assert!(q.page.page >= 1);
                prop_assert!(q.page.limit >= 1);
            }

            #[test]
            fn price_range_only_admits_prices_inside(
                lo in 0.0f64..1000.0,
                span in 0.0f64..1000.0,
                price in 0.0f64..3000.0,
            ) {
                let range = PriceRange { min: Some(lo), max: Some(lo + span) };
                prop_assert_eq!(range.contains(price), lo <= price && price <= lo + span);
            }
        }
    }
}
