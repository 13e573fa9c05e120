//! Inventory and request file loading.
//!
//! Both files are headed CSV. Rows are parsed into typed records and checked
//! for the uniqueness rules of the pool and the request batch before any
//! allocation happens.

use crate::model::{Request, RequestId, ResourceRecord};
use crate::pool::{PoolError, ResourcePool};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Errors that can occur while loading input files
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed record in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid inventory {}: {source}", .path.display())]
    Inventory {
        path: PathBuf,
        #[source]
        source: PoolError,
    },

    #[error("Duplicate request_id {request_id} in {}", .path.display())]
    DuplicateRequestId { path: PathBuf, request_id: RequestId },
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the VLAN inventory file into a fresh pool
pub fn load_resources(path: &Path) -> Result<ResourcePool, LoadError> {
    log::info!("Loading VLAN inventory from {}", path.display());
    let pool = load_resources_from(open(path)?, path)?;
    log::info!("Loaded {} VLAN resources", pool.len());
    Ok(pool)
}

/// Load an inventory from any reader. `origin` names the source in errors.
pub fn load_resources_from<R: Read>(reader: R, origin: &Path) -> Result<ResourcePool, LoadError> {
    let mut pool = ResourcePool::new();
    for record in csv_reader(reader).deserialize::<ResourceRecord>() {
        let record = record.map_err(|source| LoadError::Csv {
            path: origin.to_path_buf(),
            source,
        })?;
        pool.insert(record).map_err(|source| LoadError::Inventory {
            path: origin.to_path_buf(),
            source,
        })?;
    }
    Ok(pool)
}

/// Load the request file
pub fn load_requests(path: &Path) -> Result<Vec<Request>, LoadError> {
    log::info!("Loading requests from {}", path.display());
    let requests = load_requests_from(open(path)?, path)?;
    log::info!(
        "Loaded {} requests ({} redundant)",
        requests.len(),
        requests.iter().filter(|r| r.redundant).count()
    );
    Ok(requests)
}

/// Load requests from any reader, in file order. `origin` names the source in errors.
pub fn load_requests_from<R: Read>(reader: R, origin: &Path) -> Result<Vec<Request>, LoadError> {
    let mut seen = HashSet::new();
    let mut requests = Vec::new();
    for request in csv_reader(reader).deserialize::<Request>() {
        let request = request.map_err(|source| LoadError::Csv {
            path: origin.to_path_buf(),
            source,
        })?;
        if !seen.insert(request.request_id) {
            return Err(LoadError::DuplicateRequestId {
                path: origin.to_path_buf(),
                request_id: request.request_id,
            });
        }
        requests.push(request);
    }
    Ok(requests)
}
