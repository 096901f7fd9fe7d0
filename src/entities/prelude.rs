pub use super::comments::Entity as Comments;
pub use super::users::Entity as Users;
pub use super::watchlist_entries::Entity as WatchlistEntries;
