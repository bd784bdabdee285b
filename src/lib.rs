//! Private Task Bot Library
//!
//! A single-owner Telegram bot that filters, cleans and processes the
//! owner's messages.
//!
//! This crate provides the core functionality for:
//! - Authorizing and filtering inbound messages
//! - Cleaning and chunking text content
//! - Routing owner commands against persisted JSON state
//! - Talking to the Telegram Bot API with rate limiting

pub mod commands;
pub mod config;
pub mod event;
pub mod logging;
pub mod pipeline;
pub mod simulate;
pub mod store;
pub mod telegram;
