pub mod show;
pub mod team;

pub use show::{Show, ShowDraft, ShowPatch};
pub use team::{TeamMember, TeamMemberInput};
