//! Concrete mappers, one per persistable entity kind.

mod asm;
mod feat;
mod language;
mod proficiency;

pub use asm::AsmMapper;
pub use feat::FeatMapper;
pub use language::LanguageMapper;
pub use proficiency::ProficiencyMapper;
