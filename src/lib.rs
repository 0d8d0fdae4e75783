pub mod camera;
pub mod command;
pub mod config;
pub mod cursor;
pub mod error;
pub mod io;
pub mod line_editor;
pub mod localizer;
pub mod matching;
pub mod metrics;
pub mod pose;
pub mod session;
pub mod tokenizer;
pub mod trajectory;

#[cfg(test)]
mod unit_test;

pub use crate::localizer::{Localizer, Report};
