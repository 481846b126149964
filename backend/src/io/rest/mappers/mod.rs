pub mod admin_mapper;
pub mod audit_mapper;
pub mod blocklist_mapper;
pub mod payment_mapper;
pub mod reference_mapper;

pub use admin_mapper::AdminMapper;
pub use audit_mapper::AuditMapper;
pub use blocklist_mapper::BlocklistMapper;
pub use payment_mapper::PaymentMapper;
pub use reference_mapper::ReferenceMapper;
