pub mod db;
pub mod env;
pub mod error;
pub mod models;
pub mod schema;
pub mod seed;
pub mod telemetry;
#[cfg(test)]
mod test;
