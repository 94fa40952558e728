//! socialflow: a social-media performance dashboard that asks a hosted
//! Langflow chat flow for analysis and charts a fixed post dataset.

pub mod analytics;
pub mod charts;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod flow;
pub mod web;
