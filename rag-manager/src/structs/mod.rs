pub mod manager_config;
pub mod results;
