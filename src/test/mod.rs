mod db;
pub mod utils;
