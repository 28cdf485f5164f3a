pub mod budget_service;

pub use budget_service::BudgetService;
