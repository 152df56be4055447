//! Persistence boundary for barn layouts
//!
//! One read (the layout snapshot) and one write (the complete placed set).
//! The editor only talks to the server through [`LayoutApi`].

pub mod client;
pub mod config;
pub mod dto;

pub use client::HttpLayoutApi;
pub use config::ApiConfig;
pub use dto::{BarnLayoutResponse, LayoutSaveRequest};

use thiserror::Error;

/// Errors talking to the layout API
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport, timeout or body decoding failure
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("{message}")]
    Server { status: u16, message: String },
}

impl ApiError {
    /// Server error with the server's own message, or a generic one
    pub fn server(status: u16, message: Option<String>) -> Self {
        Self::Server {
            status,
            message: message.unwrap_or_else(|| format!("server error (HTTP {})", status)),
        }
    }
}

/// Read and write access to barn layouts
pub trait LayoutApi {
    /// Load the current layout, unplaced pens and livestock counts of a barn
    fn fetch_layout(&self, barn_id: i64) -> Result<BarnLayoutResponse, ApiError>;

    /// Replace the stored layout of a barn with exactly `request.layouts`
    fn save_layout(&self, barn_id: i64, request: &LayoutSaveRequest) -> Result<(), ApiError>;
}

impl<T: LayoutApi + ?Sized> LayoutApi for &T {
    fn fetch_layout(&self, barn_id: i64) -> Result<BarnLayoutResponse, ApiError> {
        (**self).fetch_layout(barn_id)
    }

    fn save_layout(&self, barn_id: i64, request: &LayoutSaveRequest) -> Result<(), ApiError> {
        (**self).save_layout(barn_id, request)
    }
}
