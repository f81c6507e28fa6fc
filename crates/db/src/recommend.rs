//! Async glue between the repositories and the synchronous outfit engine.

use rand::Rng;
use tracing::info;

use wardrobe_core::domain::item::ClothingItem;
use wardrobe_core::domain::outfit::OutfitHistoryEntry;
use wardrobe_core::domain::user::UserId;
use wardrobe_core::errors::{ApplicationError, DomainError};
use wardrobe_core::recommend::{
    DailyOutfit, OutfitEngine, OutfitRequest, RankedItem, SuggestionOutcome,
};

use crate::repositories::{ItemCatalog, RepositoryError, WearHistoryRepository};

impl From<RepositoryError> for ApplicationError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::Invalid(domain) => ApplicationError::Domain(domain),
            other => ApplicationError::Persistence(other.to_string()),
        }
    }
}

/// Items and in-window history materialized for one engine call.
#[derive(Clone, Debug, Default)]
pub struct WardrobeSnapshot {
    pub items: Vec<ClothingItem>,
    pub recent_history: Vec<OutfitHistoryEntry>,
}

pub async fn load_snapshot<C, H>(
    catalog: &C,
    history: &H,
    engine: &OutfitEngine,
    user_id: UserId,
    request: &OutfitRequest,
) -> Result<WardrobeSnapshot, RepositoryError>
where
    C: ItemCatalog + ?Sized,
    H: WearHistoryRepository + ?Sized,
{
    let window_days = request.recent_window_days.unwrap_or(engine.settings().recent_window_days);
    let items = catalog.list_items(user_id).await?;
    let recent_history = history.recent_history(user_id, window_days, request.now).await?;
    Ok(WardrobeSnapshot { items, recent_history })
}

pub async fn suggest_for_user<C, H, R>(
    catalog: &C,
    history: &H,
    engine: &OutfitEngine,
    user_id: UserId,
    request: &OutfitRequest,
    rng: &mut R,
) -> Result<SuggestionOutcome, ApplicationError>
where
    C: ItemCatalog + ?Sized,
    H: WearHistoryRepository + ?Sized,
    R: Rng,
{
    request.validate()?;
    let snapshot = load_snapshot(catalog, history, engine, user_id, request).await?;
    let outcome =
        engine.suggest_with_rng(request, &snapshot.items, &snapshot.recent_history, rng)?;

    info!(
        event_name = "wardrobe.suggestion.completed",
        user_id = user_id.0,
        occasion = %request.occasion,
        weather = %request.weather,
        status = ?outcome.status,
        confidence_score = outcome.confidence_score,
        "outfit suggestion completed"
    );

    Ok(outcome)
}

pub async fn daily_for_user<C, H, R>(
    catalog: &C,
    history: &H,
    engine: &OutfitEngine,
    user_id: UserId,
    request: &OutfitRequest,
    rng: &mut R,
) -> Result<DailyOutfit, ApplicationError>
where
    C: ItemCatalog + ?Sized,
    H: WearHistoryRepository + ?Sized,
    R: Rng,
{
    let snapshot = load_snapshot(catalog, history, engine, user_id, request).await?;
    let daily =
        engine.daily_outfit_with_rng(request, &snapshot.items, &snapshot.recent_history, rng);

    if let Err(DomainError::IncompleteOutfit { missing }) = &daily {
        info!(
            event_name = "wardrobe.daily.incomplete",
            user_id = user_id.0,
            missing = ?missing,
            "daily outfit unavailable"
        );
    }

    Ok(daily?)
}

pub async fn rank_for_user<C, H>(
    catalog: &C,
    history: &H,
    engine: &OutfitEngine,
    user_id: UserId,
    request: &OutfitRequest,
) -> Result<Vec<RankedItem>, ApplicationError>
where
    C: ItemCatalog + ?Sized,
    H: WearHistoryRepository + ?Sized,
{
    request.validate()?;
    let snapshot = load_snapshot(catalog, history, engine, user_id, request).await?;
    Ok(engine.rank(request, &snapshot.items, &snapshot.recent_history)?)
}
