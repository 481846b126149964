use shared::{LookupOption, ReferenceItem};

use crate::domain::models::reference::ReferenceEntry;

pub struct ReferenceMapper;

impl ReferenceMapper {
    pub fn to_item(domain: ReferenceEntry) -> ReferenceItem {
        ReferenceItem {
            id: domain.id,
            name: domain.name,
            faculty_id: domain.faculty_id,
        }
    }

    /// Id/name pair for form selects
    pub fn to_option(domain: ReferenceEntry) -> LookupOption {
        LookupOption {
            id: domain.id,
            name: domain.name,
        }
    }

    pub fn to_options(domain: Vec<ReferenceEntry>) -> Vec<LookupOption> {
        domain.into_iter().map(Self::to_option).collect()
    }
}
