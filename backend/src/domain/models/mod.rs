pub mod admin;
pub mod audit;
pub mod blocklist;
pub mod payment;
pub mod reference;
