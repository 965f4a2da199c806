pub mod error;
pub use error::AppError;

pub mod config;
pub use config::{Config, FileListConfig};

pub mod logging;
pub use logging::Logger;

pub mod model {
    pub mod entry;
    pub use entry::{FileEntry, ModifiedAt};

    pub mod file_types;
    pub use file_types::{FileTypeId, FileTypeRegistry};

    pub mod sanitize;

    pub mod sort;
    pub use sort::{SortField, SortKey, SortSpec};

    pub mod search;
    pub use search::SearchState;

    pub mod catalog;
    pub use catalog::EntryCatalog;

    pub mod notification;
    pub use notification::{Notification, NotificationLevel};
}

pub mod fs {
    pub mod enumerator;
    pub use enumerator::{ArchiveReader, DirEnumerator, EntryEnumerator, RawEntry};

    pub mod archive;
    pub use archive::TarEnumerator;

    pub mod operations;
    pub use operations::{FileOperator, FsOperator, Operation};

    pub mod workdir;
}

pub mod controller {
    pub mod actions;
    pub use actions::Action;

    pub mod mode;
    pub use mode::NavigationMode;

    pub mod file_list;
    pub use file_list::FileList;
}

pub mod view {
    pub mod theme;

    pub mod layout;

    pub mod scroll;

    pub mod file_table;
    pub use file_table::FileTableView;
}

pub mod util {
    pub mod color;

    pub mod humanize;
}

pub use controller::FileList;
