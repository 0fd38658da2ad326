pub mod bot;
pub use bot::BotService;

pub mod enrichment;
pub use enrichment::ReviewEnricher;

pub mod normalize;
pub use normalize::normalize;

pub mod ranking;

pub mod shop_search;
pub use shop_search::{SearchOutcome, ShopSearchService};
