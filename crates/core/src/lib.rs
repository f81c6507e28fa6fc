pub mod config;
pub mod domain;
pub mod errors;
pub mod recommend;

pub use domain::item::{Category, ClothingItem, ItemId, NewClothingItem};
pub use domain::outfit::{
    HistoryEntryId, NewOutfit, NewWearRecord, Outfit, OutfitHistoryEntry, OutfitId, Slot,
};
pub use domain::user::{UserId, DEMO_USER_ID};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use recommend::{
    DailyOutfit, EngineSettings, OutfitEngine, OutfitRequest, OutfitSuggestion, RankedItem,
    SuggestionOutcome, SuggestionStatus,
};
