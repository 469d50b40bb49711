//! Item operations - one file per verb

mod archive;
mod create;
mod delete;
mod load;
mod purge;
mod relocate;
mod sweep;
mod unarchive;
mod update;

pub use archive::ArchiveItem;
pub use create::CreateItem;
pub use delete::DeleteItem;
pub use load::LoadItems;
pub use purge::PurgeItem;
pub use relocate::RelocateItem;
pub use sweep::{spawn_periodic_sweep, SweepArchive, ARCHIVE_THRESHOLD_DAYS};
pub use unarchive::UnarchiveItem;
pub use update::UpdateItem;
