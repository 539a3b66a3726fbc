pub mod auto_gift_rules;
pub mod connections;
pub mod gift_events;
pub mod preferences;
pub mod recipient_profiles;
pub mod saved_searches;
