//! Records served by the API and their request payloads.

mod category;
mod item;
mod user;

pub use category::{Category, CategoryInput};
pub use item::{Item, ItemInput, ParseStockStatusError, StockStatus};
pub use user::{AccountView, Credentials, NewUser, TokenView, User};
