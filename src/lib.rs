//! Devsite - Content API for a company website
//!
//! This library provides blog articles with tag analytics (view counting,
//! related tags, related articles, tag reports) and job positions, served
//! over a JSON HTTP API.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
