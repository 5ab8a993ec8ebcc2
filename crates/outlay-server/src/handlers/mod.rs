//! API route handlers

mod expenses;
mod health;
mod receipts;

pub use expenses::{expense_summary, get_expense, list_expenses};
pub use health::get_health;
pub use receipts::{upload_form, upload_receipt};
