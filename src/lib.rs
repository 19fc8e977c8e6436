//! Tokenize a sentence, plot its tokens in 3D and "predict" the next token length.
//!
//! The binary in `main.rs` only parses flags and starts [`ui::routes::run_server`];
//! everything else lives in the modules below.

pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod plot;
pub mod tokenizer;
pub mod ui;
