use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::catalog::{restaurants_by_categories, Restaurant};
use crate::error::ApiError;

pub const NO_CATEGORY_SELECTED: &str = "At least one category must be selected";
pub const NO_RESTAURANTS_FOUND: &str = "No restaurants found in selected categories";

/// Body of `POST /api/spin`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SpinRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub selected_categories: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mall_id: Option<String>,

    /// Free-form dietary preference, only recorded in the spin log.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_need: Option<String>,
}

impl SpinRequest {
    /// Mall to spin in; blank or missing ids fall back to `default_mall`.
    pub fn mall<'a>(&'a self, default_mall: &'a str) -> &'a str {
        match self.mall_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id,
            _ => default_mall,
        }
    }

    pub fn dietary_need(&self) -> &str {
        match self.dietary_need.as_deref().map(str::trim) {
            Some(need) if !need.is_empty() => need,
            _ => "any",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinResult {
    pub restaurant_name: String,
    pub restaurant_unit: String,
    pub restaurant_floor: String,
    pub category: String,
    pub timestamp: DateTime<Utc>,
    pub spin_id: Option<String>,
    pub logo: Option<String>,
}

impl SpinResult {
    pub fn new(restaurant: Restaurant, timestamp: DateTime<Utc>, spin_id: Option<String>) -> Self {
        SpinResult {
            restaurant_name: restaurant.name,
            restaurant_unit: restaurant.unit,
            restaurant_floor: restaurant.floor,
            category: restaurant.category,
            timestamp,
            spin_id,
            logo: restaurant.logo,
        }
    }
}

/// Pick one restaurant uniformly at random from the selected categories.
pub fn spin<R: Rng + ?Sized>(
    req: &SpinRequest,
    default_mall: &str,
    rng: &mut R,
) -> Result<Restaurant, ApiError> {
    if req.validate().is_err() {
        return Err(ApiError::bad_request(NO_CATEGORY_SELECTED));
    }
    let mall = req.mall(default_mall);
    let candidates = restaurants_by_categories(&req.selected_categories, mall);
    log::debug!(
        "spin mall={}, categories={}, candidates={}",
        mall,
        req.selected_categories.len(),
        candidates.len()
    );
    candidates
        .choose(rng)
        .cloned()
        .ok_or_else(|| ApiError::bad_request(NO_RESTAURANTS_FOUND))
}
