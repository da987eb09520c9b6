/// Default directory searched for the store when no explicit path is given
pub const DEFAULT_DATA_DIR: &str = "data";

/// File name of the plain store inside the data directory
pub const DEFAULT_DB_FILE: &str = "aifm.db";

/// File name of the gzip-compressed store inside the data directory
pub const DEFAULT_COMPRESSED_DB_FILE: &str = "aifm.db.gz";

/// Bookkeeping table written by the collector; excluded from bulk reads
pub const METADATA_TABLE: &str = "collection_metadata";

/// Maximum worksheet name length accepted by spreadsheet applications
pub const SHEET_NAME_MAX_LEN: usize = 31;

/// Storage format of every date column
pub const DATE_STORAGE_FORMAT: &str = "%Y%m%d";

/// Prefix of scratch files holding a decompressed store
pub const SCRATCH_FILE_PREFIX: &str = "fundread-";
