//! Opaque per-device identity for the remote table backend.
//!
//! Generated once, cached next to the local data files. There is no other
//! authentication; the id is the row key.

use std::fs;
use std::path::Path;

use anyhow::Result;
use rand::distributions::Alphanumeric;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const DEVICE_ID_FILE: &str = "device_id";
const DEVICE_ID_LEN: usize = 32;

pub fn load_or_create(base_dir: &Path) -> Result<String> {
    let path = base_dir.join(DEVICE_ID_FILE);
    if path.exists() {
        let cached = fs::read_to_string(&path)?;
        let cached = cached.trim();
        if !cached.is_empty() {
            return Ok(cached.to_string());
        }
    }

    let id = generate();
    fs::create_dir_all(base_dir)?;
    fs::write(&path, &id)?;
    Ok(id)
}

fn generate() -> String {
    let mut rng = SmallRng::from_entropy();
    (0..DEVICE_ID_LEN)
        .map(|_| rng.sample(Alphanumeric) as char)
        .collect()
}
