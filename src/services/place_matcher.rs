// src/services/place_matcher.rs
// DOCUMENTATION: Place-name based card detection
// PURPOSE: Reverse-geocode the fix and match the place text against card store names

use crate::errors::DetectionError;
use crate::models::{KnownStoreDictionary, RewardCard};
use crate::services::ReverseGeocoder;
use serde::Serialize;

/// Which rule matched a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    /// Lowercased store name is a substring of the place text
    Exact,
    /// A dictionary keyword for the store name is a substring of the place text
    Keyword,
    /// A store-name word longer than 3 characters is a substring of the place text
    Fuzzy,
}

/// Card picked by place name
#[derive(Debug, Clone, Serialize)]
pub struct PlaceMatch<'a> {
    pub card: &'a RewardCard,
    pub rule: MatchRule,
    /// Lowercase text the card was matched against
    pub search_text: String,
}

/// Store-name words at or below this length never fuzzy-match
const MIN_FUZZY_WORD_LEN: usize = 3;

/// Place-name matcher
/// DOCUMENTATION: Borrows the geocoder and the dictionary; holds no mutable state, so
/// overlapping calls are independent
pub struct PlaceNameMatcher<'d, G: ?Sized> {
    geocoder: &'d G,
    dictionary: &'d KnownStoreDictionary,
}

impl<'d, G: ReverseGeocoder + ?Sized> PlaceNameMatcher<'d, G> {
    pub fn new(geocoder: &'d G, dictionary: &'d KnownStoreDictionary) -> Self {
        Self {
            geocoder,
            dictionary,
        }
    }

    /// Detect a card, keeping failures distinct from "no match"
    /// DOCUMENTATION: Only the first geocoding result is considered
    pub async fn try_detect<'a>(
        &self,
        latitude: f64,
        longitude: f64,
        cards: &'a [RewardCard],
    ) -> Result<Option<PlaceMatch<'a>>, DetectionError> {
        let places = self.geocoder.reverse_geocode(latitude, longitude).await?;

        let place = places.into_iter().next().ok_or(DetectionError::NoPlaces {
            latitude,
            longitude,
        })?;

        if let Some(label) = place.describe() {
            log::debug!("Reverse geocoded to {}", label);
        }

        let search_text = place.search_text();
        log::debug!("Place-name search text: {:?}", search_text);

        Ok(match_place_text(&search_text, cards, self.dictionary))
    }

    /// Detect a match by place name
    /// DOCUMENTATION: Fails softly. Geocoding errors and empty results are logged and
    /// reported as None, same as "no card matched"
    pub async fn detect_match<'a>(
        &self,
        latitude: f64,
        longitude: f64,
        cards: &'a [RewardCard],
    ) -> Option<PlaceMatch<'a>> {
        match self.try_detect(latitude, longitude, cards).await {
            Ok(found) => found,
            Err(e) => {
                log::warn!("Place-name detection skipped: {}", e);
                None
            }
        }
    }

    /// Detect a card by place name, failing softly like `detect_match`
    #[allow(dead_code)] // card-only entry point; the HTTP layer wants the rule too
    pub async fn detect_nearby_card_by_place_name<'a>(
        &self,
        latitude: f64,
        longitude: f64,
        cards: &'a [RewardCard],
    ) -> Option<&'a RewardCard> {
        self.detect_match(latitude, longitude, cards)
            .await
            .map(|m| m.card)
    }
}

/// Match place text against cards
/// DOCUMENTATION: Cards are tried in the given order and the first one matching any rule
/// wins. Per card the rules run exact, then keyword, then fuzzy. All comparisons are
/// plain substring tests on lowercase text
pub fn match_place_text<'a>(
    search_text: &str,
    cards: &'a [RewardCard],
    dictionary: &KnownStoreDictionary,
) -> Option<PlaceMatch<'a>> {
    let search = search_text.to_lowercase();

    cards.iter().find_map(|card| {
        match_card(&search, card, dictionary).map(|rule| PlaceMatch {
            card,
            rule,
            search_text: search.clone(),
        })
    })
}

fn match_card(search: &str, card: &RewardCard, dictionary: &KnownStoreDictionary) -> Option<MatchRule> {
    let card_name = card.store_name.to_lowercase();

    // An empty name is a substring of everything
    if !card_name.is_empty() && search.contains(&card_name) {
        return Some(MatchRule::Exact);
    }

    if let Some(keywords) = dictionary.keywords(&card.store_name) {
        if keywords
            .iter()
            .any(|keyword| search.contains(&keyword.to_lowercase()))
        {
            return Some(MatchRule::Keyword);
        }
    }

    let fuzzy = card_name
        .split_whitespace()
        .any(|word| word.chars().count() > MIN_FUZZY_WORD_LEN && search.contains(word));

    fuzzy.then_some(MatchRule::Fuzzy)
}
