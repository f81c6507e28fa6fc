//! Outfit Recommendation Engine implementation

use std::collections::HashSet;

use rand::Rng;
use tracing::debug;

use super::scoring::ItemScorer;
use super::types::*;
use super::{RecommendResult, PARTIAL_MATCH_CONFIDENCE};
use crate::domain::item::{ClothingItem, ItemId};
use crate::domain::outfit::{OutfitHistoryEntry, Slot};
use crate::errors::DomainError;

/// Candidates grouped by the slot their category fills, in `Slot::ALL` order.
struct SlotBuckets<'a> {
    buckets: [Vec<&'a ClothingItem>; 4],
}

impl<'a> SlotBuckets<'a> {
    fn new(candidates: impl IntoIterator<Item = &'a ClothingItem>) -> Self {
        let mut buckets: [Vec<&'a ClothingItem>; 4] = Default::default();
        for item in candidates {
            // Unknown categories fill no slot.
            if let Some(category) = item.category() {
                buckets[slot_index(category.slot())].push(item);
            }
        }
        Self { buckets }
    }

    fn get(&self, slot: Slot) -> &[&'a ClothingItem] {
        &self.buckets[slot_index(slot)]
    }

    fn available_core_slots(&self) -> usize {
        Slot::CORE.iter().filter(|slot| !self.get(**slot).is_empty()).count()
    }

    fn total(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}

fn slot_index(slot: Slot) -> usize {
    match slot {
        Slot::Top => 0,
        Slot::Bottom => 1,
        Slot::Shoes => 2,
        Slot::Accessory => 3,
    }
}

/// Stateless recommender. Reads caller-supplied collections and never performs I/O.
#[derive(Debug, Clone, Default)]
pub struct OutfitEngine {
    scorer: ItemScorer,
    settings: EngineSettings,
}

impl OutfitEngine {
    /// Create a new engine with default weights and settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom settings
    pub fn with_settings(settings: EngineSettings) -> Self {
        Self { scorer: ItemScorer::new(), settings }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Suggest an outfit using the thread-local random source
    pub fn suggest(
        &self,
        request: &OutfitRequest,
        items: &[ClothingItem],
        recent_history: &[OutfitHistoryEntry],
    ) -> RecommendResult<SuggestionOutcome> {
        self.suggest_with_rng(request, items, recent_history, &mut rand::thread_rng())
    }

    /// Suggest an outfit drawing shortlist picks and jitter from `rng`.
    ///
    /// Every "can't build an outfit" case is a successful outcome; only a request
    /// missing occasion or weather is an error.
    pub fn suggest_with_rng<R: Rng>(
        &self,
        request: &OutfitRequest,
        items: &[ClothingItem],
        recent_history: &[OutfitHistoryEntry],
        rng: &mut R,
    ) -> RecommendResult<SuggestionOutcome> {
        request.validate()?;

        if items.is_empty() {
            debug!(
                event_name = "recommend.suggestion.empty_wardrobe",
                occasion = %request.occasion,
                weather = %request.weather,
                "wardrobe has no items"
            );
            return Ok(SuggestionOutcome::empty(request, SuggestionStatus::EmptyWardrobe, 0));
        }

        let recent = self.recently_worn(request, recent_history);
        let buckets = SlotBuckets::new(items.iter().filter(|item| {
            self.exclusion(item, &request.occasion, &request.weather, &recent).is_none()
        }));
        let available_core_slots = buckets.available_core_slots();

        debug!(
            event_name = "recommend.filter.completed",
            wardrobe_size = items.len(),
            recently_worn = recent.len(),
            candidates = buckets.total(),
            available_core_slots,
            "filtered wardrobe for suggestion"
        );

        match available_core_slots {
            0 => return Ok(SuggestionOutcome::empty(request, SuggestionStatus::NoMatch, 0)),
            1 => {
                return Ok(SuggestionOutcome::empty(
                    request,
                    SuggestionStatus::PartialMatch,
                    PARTIAL_MATCH_CONFIDENCE,
                ))
            }
            _ => {}
        }

        let mut suggestion = OutfitSuggestion::default();
        for slot in Slot::ALL {
            let picked = self.pick(buckets.get(slot), &request.occasion, request, rng);
            suggestion.set(slot, picked);
        }

        let jitter = self.jitter(rng);
        let confidence_score = self.scorer.confidence(
            &suggestion,
            &request.occasion,
            &request.weather,
            &self.settings,
            jitter,
        );

        debug!(
            event_name = "recommend.suggestion.built",
            filled_slots = suggestion.filled_slots(),
            confidence_score,
            "outfit suggestion built"
        );

        Ok(SuggestionOutcome {
            suggestion: Some(suggestion),
            confidence_score,
            status: SuggestionStatus::Suggested,
            message: None,
            occasion: request.occasion.clone(),
            weather: request.weather.clone(),
        })
    }

    /// Daily outfit using the thread-local random source
    pub fn daily_outfit(
        &self,
        request: &OutfitRequest,
        items: &[ClothingItem],
        recent_history: &[OutfitHistoryEntry],
    ) -> RecommendResult<DailyOutfit> {
        self.daily_outfit_with_rng(request, items, recent_history, &mut rand::thread_rng())
    }

    /// Stricter path: a complete top, bottom and shoes selection or an error.
    ///
    /// An empty occasion disables occasion filtering here; weather is still required.
    pub fn daily_outfit_with_rng<R: Rng>(
        &self,
        request: &OutfitRequest,
        items: &[ClothingItem],
        recent_history: &[OutfitHistoryEntry],
        rng: &mut R,
    ) -> RecommendResult<DailyOutfit> {
        request.validate_weather()?;

        if items.is_empty() {
            return Err(DomainError::EmptyWardrobe);
        }

        let occasion = request.occasion.trim();
        let recent = self.recently_worn(request, recent_history);
        let buckets = SlotBuckets::new(items.iter().filter(|item| {
            !recent.contains(&item.id)
                && (occasion.is_empty() || ItemScorer::matches_occasion(item, occasion))
                && ItemScorer::matches_weather(item, &request.weather)
        }));

        let missing: Vec<Slot> =
            Slot::CORE.into_iter().filter(|slot| buckets.get(*slot).is_empty()).collect();
        if !missing.is_empty() {
            debug!(
                event_name = "recommend.daily.incomplete",
                missing = ?missing,
                "daily outfit could not fill every core slot"
            );
            return Err(DomainError::IncompleteOutfit { missing });
        }

        let mut pick = |slot: Slot| self.pick(buckets.get(slot), occasion, request, rng);
        let top = pick(Slot::Top);
        let bottom = pick(Slot::Bottom);
        let shoes = pick(Slot::Shoes);
        let accessory = pick(Slot::Accessory);

        match (top, bottom, shoes) {
            (Some(top), Some(bottom), Some(shoes)) => Ok(DailyOutfit {
                top,
                bottom,
                shoes,
                accessory,
                weather: request.weather.clone(),
                occasion: (!occasion.is_empty()).then(|| occasion.to_string()),
            }),
            _ => Err(DomainError::InvariantViolation(
                "non-empty core slot produced no pick".to_string(),
            )),
        }
    }

    /// Score every placeable item before filtering, noting why filtered items would drop.
    ///
    /// Ordered by slot, then by descending score.
    pub fn rank(
        &self,
        request: &OutfitRequest,
        items: &[ClothingItem],
        recent_history: &[OutfitHistoryEntry],
    ) -> RecommendResult<Vec<RankedItem>> {
        request.validate()?;

        let recent = self.recently_worn(request, recent_history);
        let mut ranked: Vec<RankedItem> = items
            .iter()
            .filter_map(|item| {
                let slot = item.category()?.slot();
                Some(RankedItem {
                    item_id: item.id,
                    name: item.name.clone(),
                    slot,
                    score: self.scorer.score_item(
                        item,
                        &request.occasion,
                        &request.weather,
                        request.now,
                    ),
                    exclusion: self.exclusion(item, &request.occasion, &request.weather, &recent),
                })
            })
            .collect();

        ranked.sort_by(|a, b| a.slot.cmp(&b.slot).then_with(|| b.score.cmp(&a.score)));
        Ok(ranked)
    }

    fn window_days(&self, request: &OutfitRequest) -> u32 {
        request.recent_window_days.unwrap_or(self.settings.recent_window_days)
    }

    fn recently_worn(
        &self,
        request: &OutfitRequest,
        history: &[OutfitHistoryEntry],
    ) -> HashSet<ItemId> {
        let window_days = self.window_days(request);
        history
            .iter()
            .filter(|entry| entry.is_within_window(request.now, window_days))
            .flat_map(|entry| entry.item_ids.iter().copied())
            .collect()
    }

    fn exclusion(
        &self,
        item: &ClothingItem,
        occasion: &str,
        weather: &str,
        recent: &HashSet<ItemId>,
    ) -> Option<Exclusion> {
        if recent.contains(&item.id) {
            Some(Exclusion::RecentlyWorn)
        } else if !ItemScorer::matches_occasion(item, occasion) {
            Some(Exclusion::Occasion)
        } else if !ItemScorer::matches_weather(item, weather) {
            Some(Exclusion::Weather)
        } else {
            None
        }
    }

    /// Random pick among the top-scored shortlist. Ties keep wardrobe order.
    fn pick<R: Rng>(
        &self,
        candidates: &[&ClothingItem],
        occasion: &str,
        request: &OutfitRequest,
        rng: &mut R,
    ) -> Option<ClothingItem> {
        if candidates.is_empty() {
            return None;
        }

        let mut scored: Vec<(u32, &ClothingItem)> = candidates
            .iter()
            .map(|item| {
                (self.scorer.score_item(item, occasion, &request.weather, request.now), *item)
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        let shortlist_len = self.settings.shortlist_size.max(1).min(scored.len());
        let index = rng.gen_range(0..shortlist_len);
        Some(scored[index].1.clone())
    }

    fn jitter<R: Rng>(&self, rng: &mut R) -> f64 {
        if self.settings.jitter_ceiling == 0 {
            return 0.0;
        }
        rng.gen_range(0.0..f64::from(self.settings.jitter_ceiling))
    }
}
