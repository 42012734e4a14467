// Library for tests to access modules

pub mod config;
pub mod counter_repo;
pub mod format;
pub mod models;
pub mod netdev;
pub mod tracker;
pub mod worker;
