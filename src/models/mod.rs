pub mod recommendation;
pub mod watchlist;
