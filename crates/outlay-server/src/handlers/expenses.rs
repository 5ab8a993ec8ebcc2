//! Expense listing handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{AppError, AppState, MAX_PAGE_LIMIT};
use outlay_core::models::{Category, CategoryTotal, ExpenseFilter, ExpenseRecord};

/// Query params for listing expenses
#[derive(Debug, Deserialize)]
pub struct ListExpensesQuery {
    /// Filter by category (travel, food, office, fuel, miscellaneous)
    pub category: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/expenses - List expenses, newest first
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListExpensesQuery>,
) -> Result<Json<Vec<ExpenseRecord>>, AppError> {
    let category = match &query.category {
        Some(category_str) => Some(category_str.parse::<Category>().map_err(|_| {
            AppError::bad_request(
                "Invalid category. Use: travel, food, office, fuel, miscellaneous",
            )
        })?),
        None => None,
    };

    if let Some(limit) = query.limit {
        if limit < 1 || limit > MAX_PAGE_LIMIT {
            return Err(AppError::bad_request(&format!(
                "limit must be between 1 and {}",
                MAX_PAGE_LIMIT
            )));
        }
    }

    let filter = ExpenseFilter {
        category,
        limit: query.limit,
        offset: query.offset,
    };

    let expenses = state.db.list_expenses(&filter)?;
    Ok(Json(expenses))
}

/// GET /api/expenses/:id - Get a specific expense
pub async fn get_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ExpenseRecord>, AppError> {
    let expense = state
        .db
        .get_expense(id)?
        .ok_or_else(|| AppError::not_found("Expense not found"))?;

    Ok(Json(expense))
}

/// GET /api/expenses/summary - Spending totals grouped by category
pub async fn expense_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CategoryTotal>>, AppError> {
    let totals = state.db.category_totals()?;
    Ok(Json(totals))
}
