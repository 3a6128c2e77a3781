//! Trade-show booklet generator for the Rocky Mountain Shoe Show.
//!
//! The crate turns show data (dates, venue, exhibitors, line/room listings)
//! into a printable Legal-size PDF booklet: title page, welcome page,
//! two-column exhibitor name cards, a line/room directory, notes pages padding
//! the sheet count to a multiple of four, and a closing thank-you page.
//!
//! [`booklet::generate`] is the high-level entry point; data comes from any
//! [`provider::ShowProvider`] implementation.

pub mod booklet;
pub mod config;
pub mod dates;
pub mod elements;
pub mod error;
pub mod fonts;
pub mod model;
pub mod provider;
pub mod renderer;
pub mod richtext;
pub mod table;

pub use booklet::{generate, render_booklet};
pub use config::Config;
pub use error::BookletError;
pub use provider::{JsonShowProvider, ShowProvider};
