pub mod auth_service;
pub mod history_service;
pub mod supplier_service;
pub mod topup_service;
