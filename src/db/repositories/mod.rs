pub mod dictionary;
pub mod layout;
pub mod show;
pub mod team;

pub use dictionary::DictionaryRepository;
pub use layout::TableLayout;
pub use show::ShowRepository;
pub use team::{ReplaceSummary, TeamRepository};
