pub mod discovery;
pub mod framework;
pub mod id;
pub mod options;
pub mod result;
pub mod status;
pub mod summary;

pub use discovery::{DiscoveredSuite, TestDiscoveryResult};
pub use framework::Framework;
pub use options::TestRunOptions;
pub use result::{CoverageSummary, ErrorDetail, TestCase, TestRunResult, TestSuite};
pub use status::TestStatus;
pub use summary::{RunSummary, aggregate};
