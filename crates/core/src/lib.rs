#![warn(clippy::all, missing_docs)]

//! Core domain logic for the 6/45 number picker.
//!
//! This crate hosts the number models, the manual selection state machine,
//! the draw engine that completes picks into a full draw, session
//! orchestration and configuration. The terminal UI and any future
//! frontends only talk to [`LottoSession`] (or [`SessionHandle`]).

pub mod config;
pub mod draw;
pub mod models;
pub mod selection;
pub mod session;

pub use config::AppConfig;
pub use draw::DrawEngine;
pub use models::{
    DrawResult, InvalidDraw, NumberBucket, DRAW_SIZE, NUMBER_MAX, NUMBER_MIN, PICK_LIMIT,
};
pub use selection::{Intent, Phase, PickRejection, SelectionState};
pub use session::{CompletedDraw, LottoSession, PickAccepted, SessionHandle, SessionSnapshot};
