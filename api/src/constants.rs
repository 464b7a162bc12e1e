//! Application constants

/// Tweets shown per listing page
pub const PER_PAGE: u32 = 3;

/// Maximum tweet body length, in characters
pub const MAX_TWEET_LENGTH: usize = 280;

/// Default landing page (the tweet listing)
pub const ROOT_PATH: &str = "/";

/// Tweet listing page
pub const TWEETS_PATH: &str = "/tweets";

pub const NOTICE_CREATED: &str = "Tweet was successfully created.";
pub const NOTICE_UPDATED: &str = "Tweet was successfully updated.";
pub const NOTICE_DESTROYED: &str = "Tweet was successfully destroyed.";

/// Alert shown for any refused mutation; never says why
pub const ALERT_INVALID_ACTION: &str = "Invalid action";
