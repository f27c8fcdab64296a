pub mod analyzers;
pub mod city;
pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod output;
pub mod parser;
pub mod stats;
pub mod trip;
