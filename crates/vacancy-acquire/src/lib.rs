pub mod bassontop;
pub mod fetch;
pub mod output;
pub mod types;
