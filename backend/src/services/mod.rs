//! Business logic services for the Toko Back-Office Platform

pub mod auth;
pub mod product;
pub mod purchase;
pub mod report;
pub mod sale;
pub mod supplier;
pub mod user;

pub use auth::AuthService;
pub use product::ProductService;
pub use purchase::PurchaseService;
pub use report::ReportService;
pub use sale::SaleService;
pub use supplier::SupplierService;
pub use user::UserService;
