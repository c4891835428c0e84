// Finance API collaborator
//
// Typed wire models, the HTTP client and the persisted session token.

pub mod client;
pub mod error;
pub mod token;
pub mod types;

pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
pub use token::TokenStore;
pub use types::{
    Category, CategoryRequest, CategoryType, EntryKind, EntryRequest, EntryResponse,
    FinancialSummary, LoginRequest,
};
