use crate::config::Config;
use crate::services::SearchOutcome;
use crate::state::SharedState;

pub async fn cmd_search_shops(
    config: Config,
    lat: f64,
    lng: f64,
    keyword: Option<String>,
    limit: usize,
) -> anyhow::Result<()> {
    let keyword = keyword.unwrap_or_else(|| config.search.keyword.clone());
    println!("Searching for '{keyword}' near {lat:.5}, {lng:.5}");

    let state = SharedState::new(config)?;
    let outcome = state
        .search_service
        .find_nearby(lat, lng, &keyword, limit.max(1))
        .await;

    let items = match outcome {
        SearchOutcome::Found(items) => items,
        SearchOutcome::NotFound => {
            println!("No shops found within the search radius.");
            return Ok(());
        }
        SearchOutcome::Unavailable => {
            anyhow::bail!("Places search is unavailable, check the API key and logs");
        }
    };

    println!();
    println!("Nearby Shops:");
    println!("{:-<60}", "");

    for item in &items {
        let rating = item.rating.map_or_else(
            || "no rating".to_string(),
            |r| format!("★{r} ({})", item.rating_count.unwrap_or(0)),
        );
        let open = match item.open_now {
            Some(true) => "open",
            Some(false) => "closed",
            None => "hours unknown",
        };

        println!("• {} ({}m)", item.name, item.distance_meters);
        if !item.vicinity.is_empty() {
            println!("  {}", item.vicinity);
        }
        println!("  {rating} | {open}");
        if let Some(place_id) = &item.place_id {
            println!("  ID: {place_id}");
        }
        println!();
    }

    Ok(())
}
