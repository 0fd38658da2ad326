use std::cmp::Ordering;

use crate::models::shop::ShopItem;

/// Recommended order: open shops first, then by rating, then by number of
/// ratings. Shops with unknown hours sort with closed ones. Stable, so ties
/// keep provider order.
pub fn sort_recommended(items: &mut [ShopItem]) {
    items.sort_by(|a, b| {
        let a_open = a.open_now == Some(true);
        let b_open = b.open_now == Some(true);

        b_open
            .cmp(&a_open)
            .then_with(|| {
                b.rating
                    .unwrap_or(0.0)
                    .partial_cmp(&a.rating.unwrap_or(0.0))
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| b.rating_count.unwrap_or(0).cmp(&a.rating_count.unwrap_or(0)))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, open_now: Option<bool>, rating: Option<f64>, count: Option<u32>) -> ShopItem {
        ShopItem {
            name: name.to_string(),
            vicinity: String::new(),
            lat: 35.0,
            lng: 139.0,
            open_now,
            rating,
            rating_count: count,
            photo_reference: None,
            place_id: None,
            distance_meters: 0,
            review_summary: None,
        }
    }

    #[test]
    fn test_open_shops_first() {
        let mut items = vec![
            item("closed-great", Some(false), Some(4.9), Some(100)),
            item("unknown", None, Some(4.8), Some(100)),
            item("open-ok", Some(true), Some(3.5), Some(10)),
        ];

        sort_recommended(&mut items);

        assert_eq!(items[0].name, "open-ok");
    }

    #[test]
    fn test_rating_then_count() {
        let mut items = vec![
            item("a", Some(true), Some(4.0), Some(50)),
            item("b", Some(true), Some(4.5), Some(10)),
            item("c", Some(true), Some(4.0), Some(500)),
            item("d", Some(true), None, None),
        ];

        sort_recommended(&mut items);

        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["b", "c", "a", "d"]);
    }

    #[test]
    fn test_ties_keep_provider_order() {
        let mut items = vec![
            item("first", None, None, None),
            item("second", None, None, None),
        ];

        sort_recommended(&mut items);

        assert_eq!(items[0].name, "first");
    }
}
