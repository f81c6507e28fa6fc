use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::outfit::Slot;
use crate::domain::user::UserId;
use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub i64);

/// Closed set of garment categories. Each category fills exactly one outfit slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Tops,
    Bottoms,
    Shoes,
    Accessories,
}

impl Category {
    pub const ALL: [Category; 4] =
        [Category::Tops, Category::Bottoms, Category::Shoes, Category::Accessories];

    /// Exact, case-sensitive match on the stored category name.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "tops" => Some(Self::Tops),
            "bottoms" => Some(Self::Bottoms),
            "shoes" => Some(Self::Shoes),
            "accessories" => Some(Self::Accessories),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tops => "tops",
            Self::Bottoms => "bottoms",
            Self::Shoes => "shoes",
            Self::Accessories => "accessories",
        }
    }

    pub fn slot(&self) -> Slot {
        match self {
            Self::Tops => Slot::Top,
            Self::Bottoms => Slot::Bottom,
            Self::Shoes => Slot::Shoes,
            Self::Accessories => Slot::Accessory,
        }
    }
}

/// A garment owned by a user.
///
/// `category` keeps the raw stored value: rows with a category outside the known
/// set still load, and the recommender simply never places them in a slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClothingItem {
    pub id: ItemId,
    pub user_id: UserId,
    pub name: String,
    pub category: String,
    pub image_url: Option<String>,
    pub colors: Vec<String>,
    pub seasons: Vec<String>,
    pub occasions: Vec<String>,
    pub wear_count: u32,
    pub last_worn: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ClothingItem {
    pub fn category(&self) -> Option<Category> {
        Category::parse(&self.category)
    }

    pub fn record_wear(&mut self, at: DateTime<Utc>) {
        self.wear_count = self.wear_count.saturating_add(1);
        self.last_worn = Some(at);
    }
}

/// Insert payload for a new wardrobe item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClothingItem {
    pub user_id: UserId,
    pub name: String,
    pub category: String,
    pub image_url: Option<String>,
    pub colors: Vec<String>,
    pub seasons: Vec<String>,
    pub occasions: Vec<String>,
}

impl NewClothingItem {
    pub fn new(user_id: UserId, name: impl Into<String>, category: Category) -> Self {
        Self {
            user_id,
            name: name.into(),
            category: category.as_str().to_string(),
            image_url: None,
            colors: Vec::new(),
            seasons: Vec::new(),
            occasions: Vec::new(),
        }
    }

    pub fn with_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.colors = colors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_seasons<I, S>(mut self, seasons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.seasons = seasons.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_occasions<I, S>(mut self, occasions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.occasions = occasions.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidRequest("item name must not be empty".to_string()));
        }
        if Category::parse(&self.category).is_none() {
            return Err(DomainError::InvalidRequest(format!(
                "unknown category `{}` (expected tops|bottoms|shoes|accessories)",
                self.category
            )));
        }
        Ok(())
    }

    pub fn into_item(self, id: ItemId, created_at: DateTime<Utc>) -> ClothingItem {
        ClothingItem {
            id,
            user_id: self.user_id,
            name: self.name,
            category: self.category,
            image_url: self.image_url,
            colors: self.colors,
            seasons: self.seasons,
            occasions: self.occasions,
            wear_count: 0,
            last_worn: None,
            created_at,
        }
    }
}
