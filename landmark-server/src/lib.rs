//! Landmark availability and trip-coordination server.
//!
//! Answers "is this landmark open right now, when is it open this week,
//! what do visitors think of it, and how far is it from here?"

pub mod cache;
pub mod catalog;
pub mod config;
pub mod directions;
pub mod domain;
pub mod ratings;
pub mod route;
pub mod schedule;
pub mod web;
