//! Reusable UI components for the dashboard

pub mod platform_card;

pub use platform_card::PlatformCard;
