//! # Web Request Handlers

pub mod webhook;
