pub mod invitation_service;
pub mod session_store;
pub mod twitter_service;
pub mod wallet_service;
