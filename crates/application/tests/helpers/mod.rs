mod builders;
mod mock_record_source;

pub use builders::*;
pub use mock_record_source::MockRecordSource;
