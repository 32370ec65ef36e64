use std::collections::HashSet;
use std::sync::{Mutex, OnceLock};

use tracing::warn;

use crate::schema::DatasetInfo;

static WARNED: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();

/// Log the data-usage notice for `info` (once per dataset per process).
///
/// Returns `true` when the notice was emitted by this call.
pub fn dataset_warning(info: &DatasetInfo) -> bool {
    let warned = WARNED.get_or_init(|| Mutex::new(HashSet::new()));
    let first = match warned.lock() {
        Ok(mut seen) => seen.insert(info.name.clone()),
        Err(poisoned) => poisoned.into_inner().insert(info.name.clone()),
    };
    if first {
        warn!(
            "[sign_datasets:{}] this loader provides access to '{}' without claiming ownership or defining its license; \
             check the dataset's terms before use ({})",
            info.name, info.name, info.homepage
        );
    }
    first
}
