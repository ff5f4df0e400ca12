pub mod config;
pub mod db;
pub mod domain;
pub mod models;
pub mod seed;
pub mod services;
