// src/lib.rs
//! tool-scaffold library.

#![deny(missing_docs)]

pub mod catalog;
pub mod cli;
pub mod config;
pub mod detect;
pub mod discover;
pub mod error;
pub mod execute;
pub mod info;
pub mod install;
pub mod manifest;
pub mod plan;
pub mod resolve;
pub mod run;
pub mod select;
pub mod target;
