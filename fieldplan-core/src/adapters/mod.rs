//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - REST client for the hosted auth and document services
//! - In-memory backend for demo mode and tests
//! - Demo data generators

pub mod demo;
pub mod memory;
pub mod rest;
