mod backup_cmd;
mod note;
mod render;
mod sync_cmd;
mod task;
mod transfer_cmd;

pub use backup_cmd::BackupCommand;
pub use note::NoteCommand;
pub use render::RenderCommand;
pub use sync_cmd::SyncCommand;
pub use task::TaskCommand;
pub use transfer_cmd::{ExportCommand, ImportCommand};
