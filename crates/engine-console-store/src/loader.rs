//! Fixture loading.
//!
//! The catalog is assembled from eight JSON documents, read in a fixed order:
//! six engine categories followed by the realtime and batch pool documents.
//! Documents come either from the set compiled into the binary or from a
//! directory holding files with the same names.

use std::collections::HashMap;
use std::path::PathBuf;

use engine_console_core::{Engine, FlagGroup, PoolId, ResourcePool};
use serde::Deserialize;

use crate::catalog::Catalog;
use crate::error::{Result, StoreError};

/// Engine documents in load order.
pub const ENGINE_DOCUMENTS: [&str; 6] = [
    "default-engine.json",
    "dw-batch-engine.json",
    "starrocks-engine.json",
    "flink-session-engines.json",
    "flink-resource-pool-engines.json",
    "automq-engines.json",
];

/// Pool documents in load order.
pub const POOL_DOCUMENTS: [&str; 2] = ["realtime-pools.json", "batch-pools.json"];

/// Where fixture documents are read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FixtureSource {
    /// The documents compiled into the binary.
    #[default]
    Bundled,
    /// A directory containing the documents by name.
    Directory(PathBuf),
}

#[derive(Debug, Deserialize)]
struct EngineDocument {
    version: String,
    engines: Vec<Engine>,
}

#[derive(Debug, Deserialize)]
struct PoolDocument {
    version: String,
    pools: Vec<ResourcePool>,
}

/// The bundled text of a fixture document.
#[must_use]
pub fn bundled_document(name: &str) -> Option<&'static str> {
    let text = match name {
        "default-engine.json" => include_str!("../fixtures/default-engine.json"),
        "dw-batch-engine.json" => include_str!("../fixtures/dw-batch-engine.json"),
        "starrocks-engine.json" => include_str!("../fixtures/starrocks-engine.json"),
        "flink-session-engines.json" => include_str!("../fixtures/flink-session-engines.json"),
        "flink-resource-pool-engines.json" => {
            include_str!("../fixtures/flink-resource-pool-engines.json")
        }
        "automq-engines.json" => include_str!("../fixtures/automq-engines.json"),
        "realtime-pools.json" => include_str!("../fixtures/realtime-pools.json"),
        "batch-pools.json" => include_str!("../fixtures/batch-pools.json"),
        _ => return None,
    };
    Some(text)
}

fn read_document(source: &FixtureSource, name: &str) -> Result<String> {
    match source {
        FixtureSource::Bundled => bundled_document(name)
            .map(str::to_owned)
            .ok_or_else(|| StoreError::UnknownDocument(name.to_string())),
        FixtureSource::Directory(dir) => {
            std::fs::read_to_string(dir.join(name)).map_err(|source| StoreError::Io {
                document: name.to_string(),
                source,
            })
        }
    }
}

fn parse_document<T: serde::de::DeserializeOwned>(name: &str, text: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|source| StoreError::Serialization {
        document: name.to_string(),
        source,
    })
}

/// Copy each pool's flag group onto the engines that reference it.
///
/// Engines whose fixture already names a group keep it.
fn stamp_flag_groups(engines: &mut [Engine], pools: &[ResourcePool]) {
    let groups: HashMap<&PoolId, FlagGroup> =
        pools.iter().map(|p| (&p.id, p.flag_group)).collect();

    for engine in engines {
        if engine.flag_group != FlagGroup::None {
            continue;
        }
        if let Some(group) = engine
            .resource_pool_id
            .as_ref()
            .and_then(|pool_id| groups.get(pool_id))
        {
            engine.flag_group = *group;
        }
    }
}

/// Read every fixture document and assemble the catalog.
///
/// # Errors
///
/// Returns an error if a document is missing or malformed, or if an id
/// occurs twice.
pub fn load_catalog(source: &FixtureSource) -> Result<Catalog> {
    let mut engines = Vec::new();
    for name in ENGINE_DOCUMENTS {
        let doc: EngineDocument = parse_document(name, &read_document(source, name)?)?;
        tracing::debug!(
            document = name,
            version = %doc.version,
            engines = doc.engines.len(),
            "Read engine fixture"
        );
        engines.extend(doc.engines);
    }

    let mut pools = Vec::new();
    for name in POOL_DOCUMENTS {
        let doc: PoolDocument = parse_document(name, &read_document(source, name)?)?;
        tracing::debug!(
            document = name,
            version = %doc.version,
            pools = doc.pools.len(),
            "Read pool fixture"
        );
        pools.extend(doc.pools);
    }

    stamp_flag_groups(&mut engines, &pools);
    Catalog::new(engines, pools)
}
