//! Basic usage of the statekv store.
//!
//! This demo shows:
//! - Opening a store in a directory
//! - Point reads, writes, and deletes
//! - Matching on the NotFound outcome
//! - Range scans with a cursor
//!
//! Run with: `cargo run --example basic_usage`

use statekv::backends::RedbStore;
use statekv::{Cursor, Store, StoreError};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let dir = tempfile::tempdir()?;
    let store = RedbStore::open(dir.path().join("state"))?;

    // Persist some connector state.
    store.put(b"cursor:main", b"block:1042")?;
    store.put(b"receipt:a1", b"confirmed")?;
    store.put(b"receipt:b2", b"pending")?;

    let value = store.get(b"cursor:main")?;
    println!("cursor:main = {}", String::from_utf8_lossy(&value));

    // Key absence is a first-class outcome, not a string to parse.
    match store.get(b"cursor:backup") {
        Ok(value) => println!("cursor:backup = {}", String::from_utf8_lossy(&value)),
        Err(StoreError::NotFound) => println!("cursor:backup not tracked yet"),
        Err(e) => return Err(e.into()),
    }

    // Scan every receipt in key order: [receipt:, receipt;) covers all
    // keys with the receipt: prefix.
    let mut cur = store.range(b"receipt:", b"receipt;")?;
    while cur.next()? {
        println!(
            "{} = {}",
            String::from_utf8_lossy(cur.key()),
            String::from_utf8_lossy(cur.value()),
        );
    }
    drop(cur);

    store.delete(b"receipt:b2")?;
    store.close()?;
    Ok(())
}
