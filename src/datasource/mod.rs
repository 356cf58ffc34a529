//! Data sources
//!
//! Read-only queries over the same vendor lists the reconcilers use. Each one
//! compiles its filters, materializes the list through the pager, filters
//! locally, flattens entries the way the matching resource's read does, and
//! identifies the result set by a digest of the sorted entity ids.

mod bmc;
mod sdn;

use std::sync::Arc;

use regex::Regex;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::{Error, Result};
use crate::resource::{DataSource, ResourceData};
use crate::zenlayer::{BmcApi, SdnApi};

pub use bmc::{InstanceTypesDataSource, InstancesDataSource};
pub use sdn::{
    CloudRegionsDataSource, CloudRoutersDataSource, DatacentersDataSource, PortsDataSource,
    PrivateConnectsDataSource,
};

/// Optional path the flattened list is dumped to as JSON
pub const RESULT_OUTPUT_FILE: &str = "result_output_file";
pub const NAME_REGEX: &str = "name_regex";

/// Every data source, sharing the given service handles
pub fn all(sdn: Arc<dyn SdnApi>, bmc: Arc<dyn BmcApi>) -> Vec<Arc<dyn DataSource>> {
    vec![
        Arc::new(PortsDataSource::new(sdn.clone())),
        Arc::new(PrivateConnectsDataSource::new(sdn.clone())),
        Arc::new(CloudRoutersDataSource::new(sdn.clone())),
        Arc::new(DatacentersDataSource::new(sdn.clone())),
        Arc::new(CloudRegionsDataSource::new(sdn)),
        Arc::new(InstancesDataSource::new(bmc.clone())),
        Arc::new(InstanceTypesDataSource::new(bmc)),
    ]
}

/// Order-independent identifier of a result set: hex SHA-256 over the
/// sorted ids
pub fn result_digest<I, S>(ids: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut sorted: Vec<S> = ids.into_iter().collect();
    sorted.sort_by(|a, b| a.as_ref().cmp(b.as_ref()));

    let mut hasher = Sha256::new();
    for id in &sorted {
        hasher.update(id.as_ref().as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}

/// Compile the `name_regex` argument, if any
pub(crate) fn name_filter(data: &ResourceData) -> Result<Option<Regex>> {
    data.get_str(NAME_REGEX)
        .map(|pattern| {
            Regex::new(pattern)
                .map_err(|err| Error::validation(format!("invalid {NAME_REGEX}: {err}")))
        })
        .transpose()
}

pub(crate) fn matches(filter: &Option<Regex>, name: &str) -> bool {
    filter.as_ref().map_or(true, |re| re.is_match(name))
}

/// Optional list-of-strings argument
pub(crate) fn id_list(data: &ResourceData, key: &str) -> Result<Vec<String>> {
    Ok(data.get_as::<Vec<String>>(key)?.unwrap_or_default())
}

/// Store the flattened list under `key`, set the digest id, and dump the
/// list to `result_output_file` when requested
pub(crate) async fn finish<T: Serialize>(
    data: &mut ResourceData,
    key: &str,
    ids: Vec<String>,
    items: &[T],
) -> Result<()> {
    let count = ids.len();
    data.set_id(result_digest(ids));
    data.set_as(key, &items)?;

    if let Some(path) = data.get_str(RESULT_OUTPUT_FILE) {
        let json = serde_json::to_string_pretty(&items)?;
        tokio::fs::write(path, json).await?;
        info!(path, count, "Wrote data source result");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_ignores_order() {
        assert_eq!(result_digest(["b", "a", "c"]), result_digest(["c", "b", "a"]));
        assert_ne!(result_digest(["a", "b"]), result_digest(["a", "c"]));
    }

    #[test]
    fn test_digest_separates_ids() {
        assert_ne!(result_digest(["ab", "c"]), result_digest(["a", "bc"]));
    }

    #[test]
    fn test_digest_of_empty_set_is_stable() {
        let empty: [&str; 0] = [];
        assert_eq!(
            result_digest(empty),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_invalid_name_regex_is_validation_error() {
        let mut data = ResourceData::default();
        data.set(NAME_REGEX, "(unclosed");
        assert!(name_filter(&data).unwrap_err().is_validation());

        data.set(NAME_REGEX, "^edge-");
        let filter = name_filter(&data).unwrap();
        assert!(matches(&filter, "edge-1"));
        assert!(!matches(&filter, "core-1"));
        assert!(matches(&None, "anything"));
    }
}
