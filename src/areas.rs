// src/areas.rs
// Region-name cache: an explicitly constructed, process-wide object
// with load-on-start and best-effort persist-on-update semantics. Never
// consulted in the aggregation hot path — only when formatting export
// metadata.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::{fs, io::Write};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// One node of the upstream region tree (countries → regions → cities).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaNode {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub areas: Vec<AreaNode>,
}

/// Flat id → display-name mapping backed by a JSON file.
#[derive(Debug)]
pub struct AreaCache {
    path: PathBuf,
    names: RwLock<HashMap<i64, String>>,
}

impl AreaCache {
    /// Load the cache from `path`. A missing or unreadable file is not
    /// an error — the cache starts empty and fills on the first areas
    /// refresh.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let names = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<HashMap<i64, String>>(&raw) {
                Ok(map) => {
                    info!(path = %path.display(), entries = map.len(), "loaded area cache");
                    map
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "area cache unreadable, starting empty");
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self {
            path,
            names: RwLock::new(names),
        }
    }

    /// Display name for a region id, with a synthetic label when the
    /// id is unknown.
    pub fn resolve_name(&self, id: i64) -> String {
        let names = self.names.read().expect("area cache lock poisoned");
        names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("Region {id}"))
    }

    pub fn len(&self) -> usize {
        self.names.read().expect("area cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Merge a freshly fetched region tree into the cache and persist.
    /// Persistence is best effort: a write failure is logged, never
    /// propagated.
    pub fn update_from_tree(&self, tree: &[AreaNode]) {
        let mut flat = HashMap::new();
        flatten_into(tree, &mut flat);
        {
            let mut names = self.names.write().expect("area cache lock poisoned");
            names.extend(flat);
        }
        if let Err(e) = self.persist() {
            warn!(path = %self.path.display(), error = %e, "area cache persist failed");
        }
    }

    fn persist(&self) -> anyhow::Result<()> {
        let names = self.names.read().expect("area cache lock poisoned");
        let json = serde_json::to_string_pretty(&*names)?;
        let mut file = fs::File::create(&self.path)
            .with_context(|| format!("creating {}", self.path.display()))?;
        file.write_all(json.as_bytes())
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

fn flatten_into(nodes: &[AreaNode], out: &mut HashMap<i64, String>) {
    for node in nodes {
        if let Ok(id) = node.id.parse::<i64>() {
            out.insert(id, node.name.clone());
        }
        flatten_into(&node.areas, out);
    }
}
