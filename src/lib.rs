pub mod books;
pub mod catalog;
pub mod checkout;
pub mod core;
pub mod parties;
pub mod patrons;
pub mod stats;
pub mod utils;
