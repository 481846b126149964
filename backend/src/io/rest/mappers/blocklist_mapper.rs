use shared::{BlocklistEntry, CreateBlocklistEntryRequest};

use crate::domain::commands::blocklist::BlockIdentifierCommand;
use crate::domain::models::blocklist::BlockedIdentifier;

pub struct BlocklistMapper;

impl BlocklistMapper {
    pub fn to_dto(domain: BlockedIdentifier) -> BlocklistEntry {
        BlocklistEntry {
            id: domain.id,
            identifier: domain.identifier,
            reason: domain.reason,
            name: domain.name,
            kind: domain.kind,
            faculty: domain.faculty,
            school: domain.school,
        }
    }

    pub fn to_command(dto: CreateBlocklistEntryRequest) -> BlockIdentifierCommand {
        BlockIdentifierCommand {
            identifier: dto.identifier,
            name: dto.name,
            kind: dto.kind,
            faculty: dto.faculty,
            school: dto.school,
            reason: dto.reason,
        }
    }
}
