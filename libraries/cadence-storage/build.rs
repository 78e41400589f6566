//! Build script for cadence-storage.
//!
//! `sqlx::migrate!` embeds the SQL files at compile time, so a changed migration
//! has to force a rebuild.

fn main() {
    println!("cargo:rerun-if-changed=migrations");
}
