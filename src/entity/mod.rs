pub mod audit_logs;
pub mod cart_items;

pub use audit_logs::Entity as AuditLogs;
pub use cart_items::Entity as CartItems;
