use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::clients::openai::ReviewSummarizer;
use crate::clients::places::PlacesProvider;
use crate::config::SearchConfig;
use crate::models::place::PlaceReview;
use crate::models::shop::ShopItem;

/// Attaches AI review summaries to the leading shops.
///
/// Best effort: any failure for one shop is logged and leaves that shop
/// without a summary.
pub struct ReviewEnricher {
    places: Arc<dyn PlacesProvider>,
    summarizer: Option<Arc<dyn ReviewSummarizer>>,
    top: usize,
    reviews_per_place: usize,
    min_review_rating: f64,
}

impl ReviewEnricher {
    #[must_use]
    pub fn new(
        places: Arc<dyn PlacesProvider>,
        summarizer: Option<Arc<dyn ReviewSummarizer>>,
        config: &SearchConfig,
    ) -> Self {
        Self {
            places,
            summarizer,
            top: config.enrich_top,
            reviews_per_place: config.reviews_per_place,
            min_review_rating: config.min_review_rating,
        }
    }

    pub async fn enrich(&self, items: &mut [ShopItem]) {
        let Some(summarizer) = &self.summarizer else {
            return;
        };

        let summaries = join_all(
            items
                .iter()
                .take(self.top)
                .map(|item| self.summary_for(summarizer.as_ref(), item)),
        )
        .await;

        for (item, summary) in items.iter_mut().zip(summaries) {
            item.review_summary = summary;
        }
    }

    async fn summary_for(&self, summarizer: &dyn ReviewSummarizer, item: &ShopItem) -> Option<String> {
        let place_id = item.place_id.as_deref()?;

        let reviews = match self.places.fetch_reviews(place_id).await {
            Ok(reviews) => reviews,
            Err(e) => {
                warn!(place_id = %place_id, error = %e, "Review fetch failed");
                return None;
            }
        };

        let texts = positive_review_texts(&reviews, self.min_review_rating, self.reviews_per_place);
        if texts.is_empty() {
            debug!(place_id = %place_id, "No positive reviews to summarize");
            return None;
        }

        match summarizer.summarize(&texts).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(shop = %item.name, error = %e, "Review summary failed");
                None
            }
        }
    }
}

/// Trimmed, non-empty texts of reviews rated at least `min_rating`.
fn positive_review_texts(reviews: &[PlaceReview], min_rating: f64, limit: usize) -> Vec<String> {
    reviews
        .iter()
        .filter(|r| r.rating.unwrap_or(0.0) >= min_rating)
        .filter_map(|r| r.text.as_deref().map(str::trim))
        .filter(|t| !t.is_empty())
        .take(limit)
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::openai::SummarizeError;
    use crate::clients::places::{PhotoData, PlacesError};
    use crate::models::place::NearbySearchResponse;
    use crate::models::shop::SearchQuery;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn review(rating: f64, text: &str) -> PlaceReview {
        PlaceReview {
            rating: Some(rating),
            text: Some(text.to_string()),
        }
    }

    struct ReviewPlaces;

    #[async_trait]
    impl PlacesProvider for ReviewPlaces {
        async fn search_nearby(
            &self,
            _query: &SearchQuery,
        ) -> Result<NearbySearchResponse, PlacesError> {
            Ok(NearbySearchResponse::default())
        }

        async fn fetch_reviews(&self, place_id: &str) -> Result<Vec<PlaceReview>, PlacesError> {
            match place_id {
                "broken" => Err(PlacesError::Http {
                    status: 500,
                    body: String::new(),
                }),
                "quiet" => Ok(vec![review(2.0, "微妙")]),
                _ => Ok(vec![review(5.0, "最高"), review(1.0, "最悪"), review(4.0, "また来たい")]),
            }
        }

        async fn fetch_photo(&self, _: &str, _: u32) -> Result<PhotoData, PlacesError> {
            Err(PlacesError::Config("unused".to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingSummarizer {
        seen: Mutex<Vec<Vec<String>>>,
        fail_on: Option<String>,
    }

    #[async_trait]
    impl ReviewSummarizer for RecordingSummarizer {
        async fn summarize(&self, reviews: &[String]) -> Result<Option<String>, SummarizeError> {
            self.seen.lock().unwrap().push(reviews.to_vec());
            if self.fail_on.as_deref() == reviews.first().map(String::as_str) {
                return Err(SummarizeError::MissingApiKey);
            }
            Ok(Some(format!("{}件の高評価", reviews.len())))
        }
    }

    fn item(name: &str, place_id: Option<&str>) -> ShopItem {
        ShopItem {
            name: name.to_string(),
            vicinity: String::new(),
            lat: 35.0,
            lng: 139.0,
            open_now: None,
            rating: None,
            rating_count: None,
            photo_reference: None,
            place_id: place_id.map(ToString::to_string),
            distance_meters: 100,
            review_summary: None,
        }
    }

    fn enricher(summarizer: Option<Arc<dyn ReviewSummarizer>>) -> ReviewEnricher {
        ReviewEnricher::new(Arc::new(ReviewPlaces), summarizer, &SearchConfig::default())
    }

    #[test]
    fn test_positive_review_texts() {
        let reviews = vec![
            review(5.0, " 麺が旨い "),
            review(3.0, "普通"),
            PlaceReview {
                rating: None,
                text: Some("評価なし".to_string()),
            },
            review(4.0, "   "),
            review(4.0, "スープ最高"),
        ];

        assert_eq!(
            positive_review_texts(&reviews, 4.0, 5),
            ["麺が旨い", "スープ最高"]
        );
        assert_eq!(positive_review_texts(&reviews, 4.0, 1), ["麺が旨い"]);
    }

    #[tokio::test]
    async fn test_only_top_three_are_enriched() {
        let summarizer = Arc::new(RecordingSummarizer::default());
        let enricher = enricher(Some(summarizer.clone()));
        let mut items: Vec<ShopItem> = (0..5).map(|i| item(&format!("s{i}"), Some("ok"))).collect();

        enricher.enrich(&mut items).await;

        assert_eq!(summarizer.seen.lock().unwrap().len(), 3);
        assert!(items[..3].iter().all(|i| i.review_summary.as_deref() == Some("2件の高評価")));
        assert!(items[3..].iter().all(|i| i.review_summary.is_none()));
    }

    #[tokio::test]
    async fn test_failures_are_isolated_per_item() {
        let summarizer = Arc::new(RecordingSummarizer::default());
        let enricher = enricher(Some(summarizer));
        let mut items = vec![
            item("no-id", None),
            item("broken", Some("broken")),
            item("quiet", Some("quiet")),
        ];

        enricher.enrich(&mut items).await;

        assert!(items.iter().all(|i| i.review_summary.is_none()));
    }

    #[tokio::test]
    async fn test_summarizer_error_leaves_summary_unset() {
        let summarizer = Arc::new(RecordingSummarizer {
            fail_on: Some("最高".to_string()),
            ..Default::default()
        });
        let enricher = enricher(Some(summarizer));
        let mut items = vec![item("a", Some("ok"))];

        enricher.enrich(&mut items).await;

        assert!(items[0].review_summary.is_none());
    }

    #[tokio::test]
    async fn test_disabled_summarizer_is_a_no_op() {
        let enricher = enricher(None);
        let mut items = vec![item("a", Some("ok"))];

        enricher.enrich(&mut items).await;

        assert!(items[0].review_summary.is_none());
    }
}
